use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config_loader::ServiceConfig;
use crate::errors::{excerpt, GenScoreError, GenScoreResult};

/// Shape of reply requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    Json,
    Text,
}

/// A text-generation backend. Injected into the evaluator so tests can swap
/// in a deterministic stub.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str, format: ReplyFormat) -> GenScoreResult<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: Option<String>,
}

/// Client for the Gemini `generateContent` REST API
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: &str,
        api_base: &str,
        timeout: Duration,
    ) -> GenScoreResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenScoreError::network("build_http_client", e))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.trim_start_matches("models/").to_string(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> GenScoreResult<Self> {
        Self::new(
            config.api_key.clone(),
            &config.model,
            &config.api_base,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Models available to this key that support `generateContent`
    pub async fn list_models(&self) -> GenScoreResult<Vec<ModelInfo>> {
        let url = format!("{}/models", self.api_base);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self
                .http
                .get(&url)
                .header("x-goog-api-key", &self.api_key)
                .query(&[("pageSize", "1000")]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| GenScoreError::network("list_models", e))?;
            let page: ListModelsResponse = read_json(resp, "list_models").await?;

            models.extend(
                page.models
                    .into_iter()
                    .filter(|m| {
                        m.supported_generation_methods
                            .iter()
                            .any(|method| method == "generateContent")
                    })
                    .map(|m| ModelInfo {
                        name: m.name,
                        display_name: m.display_name,
                    }),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, format: ReplyFormat) -> GenScoreResult<String> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });
        if format == ReplyFormat::Json {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "calling generateContent");

        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenScoreError::network("generate_content", e))?;

        let reply: GenerateContentResponse = read_json(resp, "generate_content").await?;
        reply.into_text()
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
    operation: &str,
) -> GenScoreResult<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GenScoreError::upstream(status.as_u16(), excerpt(&body, 512)));
    }
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| GenScoreError::network(operation, e))?;
    serde_json::from_slice(&bytes).map_err(|e| GenScoreError::serialization(operation, e))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> GenScoreResult<String> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("prompt blocked: {r}"))
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(GenScoreError::empty_reply(reason));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate
                .finish_reason
                .map(|r| format!("empty candidate (finish reason {r})"))
                .unwrap_or_else(|| "empty candidate".to_string());
            return Err(GenScoreError::empty_reply(reason));
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<RemoteModel>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteModel {
    name: String,
    display_name: Option<String>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}
