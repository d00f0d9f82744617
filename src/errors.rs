//! Error taxonomy for the GEN-SCORE service
//!
//! Library code returns [`GenScoreResult`]. Only configuration errors are
//! allowed to stop the process; everything raised while talking to the
//! model is absorbed by the evaluator and turned into a blocking verdict.

use thiserror::Error;

/// Main error type for the evaluation pipeline
#[derive(Error, Debug)]
pub enum GenScoreError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Network operation failed: {operation} - {source}")]
    Network {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Model service returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Model returned no usable text: {reason}")]
    EmptyReply { reason: String },

    #[error("Model call timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("Could not extract a JSON verdict from model output: {excerpt}")]
    Unparsable { excerpt: String },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Type alias for Result with GenScoreError
pub type GenScoreResult<T> = Result<T, GenScoreError>;

impl GenScoreError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(operation: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            operation: operation.into(),
            source,
        }
    }

    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    pub fn empty_reply(reason: impl Into<String>) -> Self {
        Self::EmptyReply {
            reason: reason.into(),
        }
    }

    /// Create an unparsable-output error, keeping only a short excerpt of the raw text
    pub fn unparsable(raw: &str) -> Self {
        const MAX_EXCERPT: usize = 120;
        Self::Unparsable {
            excerpt: excerpt(raw.trim(), MAX_EXCERPT),
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// True when the failure means the model output itself could not be trusted,
    /// as opposed to the model never answering.
    pub fn is_malformed_output(&self) -> bool {
        matches!(
            self,
            GenScoreError::Unparsable { .. } | GenScoreError::Serialization { .. }
        )
    }
}

/// First `max_chars` characters of `s`, with `...` appended when cut
pub(crate) fn excerpt(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

impl From<figment::Error> for GenScoreError {
    fn from(err: figment::Error) -> Self {
        GenScoreError::config(err.to_string())
    }
}
