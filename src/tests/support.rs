use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::{GenScoreError, GenScoreResult};
use crate::generator::{ReplyFormat, TextGenerator};

#[derive(Clone)]
enum Outcome {
    Reply(String),
    Upstream(u16, String),
}

/// Deterministic generator that records every prompt it receives
#[derive(Clone)]
pub struct FakeGenerator {
    outcome: Outcome,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Reply(text.into()),
            prompts: Arc::default(),
        }
    }

    pub fn failing_upstream(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Upstream(status, body.into()),
            prompts: Arc::default(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    fn model(&self) -> &str {
        "fake-model"
    }

    async fn generate(&self, prompt: &str, _format: ReplyFormat) -> GenScoreResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.outcome {
            Outcome::Reply(text) => Ok(text.clone()),
            Outcome::Upstream(status, body) => Err(GenScoreError::upstream(*status, body.clone())),
        }
    }
}

pub struct SlowGenerator {
    pub delay: Duration,
}

#[async_trait]
impl TextGenerator for SlowGenerator {
    fn model(&self) -> &str {
        "slow-model"
    }

    async fn generate(&self, _prompt: &str, _format: ReplyFormat) -> GenScoreResult<String> {
        tokio::time::sleep(self.delay).await;
        Ok("{}".to_string())
    }
}
