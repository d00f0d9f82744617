//! Library root for the `genscore` crate
//!
//! Audits an AI response by asking a generative model to judge it, then turns
//! that judgement into a bounded trust score and an allow/review/block decision.

// Error handling
pub mod api_errors;
pub mod errors;

// Configuration & CLI
pub mod cli;
pub mod config_loader;

// Verdict model and scoring
pub mod audit_mode;
pub mod extract;
pub mod prompt;
pub mod scoring;
pub mod verdict;

// Model access and orchestration
pub mod evaluator;
pub mod generator;

// Web server interface
pub mod web;

#[cfg(test)]
mod tests {
    pub mod support;
}

pub use errors::{GenScoreError, GenScoreResult};
pub use evaluator::{EvaluationRequest, Evaluator};
pub use generator::{GeminiClient, ReplyFormat, TextGenerator};
pub use verdict::{Decision, ModelVerdict, ScoredResult};
