use crate::audit_mode::AuditMode;
use crate::verdict::{Accuracy, Decision, ModelVerdict, OverallRating, RiskLevel, ScoredResult};

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// Explanation substituted when the legal veto fires
pub const LEGAL_BLOCK_MESSAGE: &str =
    "Blocked in Legal Compliance mode: the model flagged legal risk above Low. Human review is required before this response can be used.";

/// Point values for the verdict-to-score mapping
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreWeights {
    pub factually_correct: i32,
    pub partially_correct: i32,
    pub factually_incorrect: i32,
    pub unknown_accuracy: i32,
    pub hallucination_penalty: i32,
    pub excellent_bonus: i32,
    pub poor_penalty: i32,
    pub very_poor_penalty: i32,
    pub medium_risk_penalty: i32,
    pub block_below: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            factually_correct: 90,
            partially_correct: 65,
            factually_incorrect: 20,
            unknown_accuracy: 50,
            hallucination_penalty: 40,
            excellent_bonus: 5,
            poor_penalty: 10,
            very_poor_penalty: 20,
            medium_risk_penalty: 20,
            block_below: 40,
        }
    }
}

/// Outcome of the decision state machine
#[derive(Debug, Clone, PartialEq)]
pub struct Judgement {
    pub gen_score: u8,
    pub decision: Decision,
    pub explanation_override: Option<&'static str>,
}

/// Verdict scorer.
///
/// Risk level is applied only as an override in [`TrustScorer::decide`], never
/// as an additive penalty in [`TrustScorer::raw_score`].
#[derive(Debug, Clone, Default)]
pub struct TrustScorer {
    weights: ScoreWeights,
}

impl TrustScorer {
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Accuracy base, hallucination penalty and rating adjustment, clamped.
    pub fn raw_score(&self, verdict: &ModelVerdict) -> u8 {
        let w = &self.weights;
        let mut score = match verdict.accuracy {
            Accuracy::FactuallyCorrect => w.factually_correct,
            Accuracy::PartiallyCorrect => w.partially_correct,
            Accuracy::FactuallyIncorrect => w.factually_incorrect,
            Accuracy::Unknown => w.unknown_accuracy,
        };

        if verdict.contains_hallucination {
            score -= w.hallucination_penalty;
        }

        score += match verdict.overall_rating {
            OverallRating::Excellent => w.excellent_bonus,
            OverallRating::Poor => -w.poor_penalty,
            OverallRating::VeryPoor => -w.very_poor_penalty,
            OverallRating::Good | OverallRating::Unknown => 0,
        };

        clamp_score(score)
    }

    /// Order matters: legal veto, high risk, medium risk, low score, allow.
    pub fn decide(&self, mode: AuditMode, verdict: &ModelVerdict, raw: u8) -> Judgement {
        if mode == AuditMode::Legal && verdict.risk_level != RiskLevel::Low {
            return Judgement {
                gen_score: 0,
                decision: Decision::Block,
                explanation_override: Some(LEGAL_BLOCK_MESSAGE),
            };
        }

        let (gen_score, decision) = match verdict.risk_level {
            RiskLevel::High => (0, Decision::Block),
            RiskLevel::Medium => (
                clamp_score(i32::from(raw) - self.weights.medium_risk_penalty),
                Decision::Review,
            ),
            RiskLevel::Low | RiskLevel::Unknown if i32::from(raw) < self.weights.block_below => {
                (raw, Decision::Block)
            }
            RiskLevel::Low | RiskLevel::Unknown => (raw, Decision::Allow),
        };

        Judgement {
            gen_score,
            decision,
            explanation_override: None,
        }
    }

    pub fn score(&self, mode: AuditMode, verdict: ModelVerdict) -> ScoredResult {
        let raw = self.raw_score(&verdict);
        let judgement = self.decide(mode, &verdict, raw);

        let mut verdict = verdict;
        if let Some(message) = judgement.explanation_override {
            verdict.short_explanation = message.to_string();
        }

        ScoredResult {
            verdict,
            gen_score: judgement.gen_score,
            decision: judgement.decision,
        }
    }
}

fn clamp_score(score: i32) -> u8 {
    // lossless: clamped into 0..=100
    score.clamp(MIN_SCORE, MAX_SCORE) as u8
}
