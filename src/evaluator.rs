use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::audit_mode::{AuditMode, DEFAULT_AUDIT_MODE};
use crate::errors::{GenScoreError, GenScoreResult};
use crate::extract::extract_json_object;
use crate::generator::{ReplyFormat, TextGenerator};
use crate::prompt::{build_audit_prompt, PING_PROMPT};
use crate::scoring::TrustScorer;
use crate::verdict::{ModelVerdict, ScoredResult};

pub const MODEL_FAILURE_SIGNAL: &str = "Model call failed";
pub const INVALID_JSON_SIGNAL: &str = "Invalid JSON from model";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub prompt: String,
    pub response: String,
    /// Absent and `null` both mean the default mode.
    #[serde(default)]
    pub audit_mode: Option<String>,
}

impl EvaluationRequest {
    pub fn new(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
            audit_mode: None,
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.audit_mode = Some(mode.into());
        self
    }

    pub fn mode_label(&self) -> &str {
        self.audit_mode.as_deref().unwrap_or(DEFAULT_AUDIT_MODE)
    }
}

/// Runs one audit per request. Holds no per-request state, so a single
/// instance is shared across handlers.
#[derive(Clone)]
pub struct Evaluator {
    generator: Arc<dyn TextGenerator>,
    scorer: TrustScorer,
    timeout: Duration,
}

impl Evaluator {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self {
            generator,
            scorer: TrustScorer::default(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Evaluate a prompt/response pair. Never fails: any problem reaching or
    /// reading the model yields a blocking verdict.
    pub async fn evaluate(&self, req: &EvaluationRequest) -> ScoredResult {
        let mode = AuditMode::parse(req.mode_label());
        let span = tracing::info_span!(
            "evaluate",
            request_id = %uuid::Uuid::new_v4(),
            mode = %mode,
            model = %self.generator.model(),
        );

        async move {
            match self.audit(req, mode).await {
                Ok(verdict) => {
                    let result = self.scorer.score(mode, verdict);
                    tracing::info!(
                        gen_score = result.gen_score,
                        decision = %result.decision,
                        "evaluation complete"
                    );
                    result
                }
                Err(err) => {
                    let signal = if err.is_malformed_output() {
                        INVALID_JSON_SIGNAL
                    } else {
                        MODEL_FAILURE_SIGNAL
                    };
                    tracing::warn!(error = %err, "evaluation failed closed");
                    ScoredResult::fail_closed(signal, err.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn audit(&self, req: &EvaluationRequest, mode: AuditMode) -> GenScoreResult<ModelVerdict> {
        let instruction = build_audit_prompt(&req.prompt, &req.response, mode);
        let raw = self.call(&instruction, ReplyFormat::Json).await?;
        tracing::debug!(reply_chars = raw.len(), "model replied");

        let object = extract_json_object(&raw)?;
        Ok(ModelVerdict::from_value(&serde_json::Value::Object(object)))
    }

    /// Send the fixed connectivity probe and return the model's raw text
    pub async fn ping(&self) -> GenScoreResult<String> {
        self.call(PING_PROMPT, ReplyFormat::Text).await
    }

    async fn call(&self, prompt: &str, format: ReplyFormat) -> GenScoreResult<String> {
        tokio::time::timeout(self.timeout, self.generator.generate(prompt, format))
            .await
            .map_err(|_| GenScoreError::Timeout {
                millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{FakeGenerator, SlowGenerator};
    use crate::verdict::{Accuracy, Decision, RiskLevel};

    fn evaluator(generator: FakeGenerator) -> Evaluator {
        Evaluator::new(Arc::new(generator), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn fenced_partial_verdict_scores_baseline() {
        let fake = FakeGenerator::replying(
            "Sure! ```json\n{\"accuracy\":\"Partially Correct\",\"risk_level\":\"Low\",\"contains_hallucination\":false,\"overall_rating\":\"Good\",\"short_explanation\":\"mostly right\"}\n```",
        );
        let result = evaluator(fake).evaluate(&EvaluationRequest::new("q", "a")).await;
        assert_eq!(result.verdict.accuracy, Accuracy::PartiallyCorrect);
        assert_eq!(result.gen_score, 65);
        assert_eq!(result.decision, Decision::Allow);
        assert_eq!(result.verdict.short_explanation, "mostly right");
    }

    #[tokio::test]
    async fn unparsable_reply_fails_closed() {
        let fake = FakeGenerator::replying("I'm sorry, I can't help with that.");
        let result = evaluator(fake).evaluate(&EvaluationRequest::new("q", "a")).await;
        assert_eq!(result.gen_score, 0);
        assert_eq!(result.decision, Decision::Block);
        assert_eq!(result.verdict.risk_level, RiskLevel::High);
        assert_eq!(result.verdict.hallucination_signals, vec![INVALID_JSON_SIGNAL]);
    }

    #[tokio::test]
    async fn transport_error_fails_closed_with_detail() {
        let fake = FakeGenerator::failing_upstream(503, "model overloaded");
        let result = evaluator(fake).evaluate(&EvaluationRequest::new("q", "a")).await;
        assert_eq!(result.decision, Decision::Block);
        assert!(result.verdict.contains_hallucination);
        assert!(result.verdict.short_explanation.contains("model overloaded"));
        assert_eq!(result.verdict.hallucination_signals, vec![MODEL_FAILURE_SIGNAL]);
    }

    #[tokio::test]
    async fn slow_model_times_out_and_blocks() {
        let slow = SlowGenerator {
            delay: Duration::from_millis(200),
        };
        let eval = Evaluator::new(Arc::new(slow), Duration::from_millis(20));
        let result = eval.evaluate(&EvaluationRequest::new("q", "a")).await;
        assert_eq!(result.decision, Decision::Block);
        assert!(result.verdict.short_explanation.contains("timed out"));
    }

    #[tokio::test]
    async fn mode_reaches_the_instruction_text() {
        let fake = FakeGenerator::replying("{\"risk_level\":\"Low\"}");
        let eval = evaluator(fake.clone());
        eval.evaluate(&EvaluationRequest::new("q", "a").with_mode("Hallucination Detection"))
            .await;
        let seen = fake.prompts();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("AUDIT FOCUS: HALLUCINATION DETECTION"));
    }

    #[tokio::test]
    async fn identical_requests_yield_identical_results() {
        let fake = FakeGenerator::replying(
            "{\"accuracy\":\"Factually Correct\",\"risk_level\":\"Medium\",\"contains_hallucination\":false,\"overall_rating\":\"Excellent\",\"short_explanation\":\"ok\",\"confidence\":0.8}",
        );
        let eval = evaluator(fake);
        let req = EvaluationRequest::new("Who wrote Hamlet?", "Shakespeare").with_mode("Factual Accuracy");
        let first = eval.evaluate(&req).await;
        let second = eval.evaluate(&req).await;
        assert_eq!(first, second);
        assert_eq!(first.gen_score, 75);
        assert_eq!(first.decision, Decision::Review);
    }

    #[tokio::test]
    async fn ping_returns_raw_text() {
        let fake = FakeGenerator::replying("Gemini is working fine for GEN-SCORE AI");
        let eval = evaluator(fake.clone());
        assert_eq!(eval.ping().await.unwrap(), "Gemini is working fine for GEN-SCORE AI");
        assert_eq!(fake.prompts(), vec![PING_PROMPT.to_string()]);
    }

    #[test]
    fn request_defaults_mode_when_absent_or_null() {
        let req: EvaluationRequest =
            serde_json::from_str(r#"{"prompt":"p","response":"r"}"#).unwrap();
        assert_eq!(req.mode_label(), DEFAULT_AUDIT_MODE);

        let req: EvaluationRequest =
            serde_json::from_str(r#"{"prompt":"p","response":"r","audit_mode":null}"#).unwrap();
        assert_eq!(req.audit_mode, None);
        assert_eq!(req.mode_label(), DEFAULT_AUDIT_MODE);

        let req = EvaluationRequest::new("p", "r").with_mode("Legal Compliance");
        assert_eq!(req.mode_label(), "Legal Compliance");
    }
}
