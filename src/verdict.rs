//! Verdict records exchanged with the model and returned to callers.
//!
//! The model answers in free text, so every field is parsed leniently into a
//! closed enum with an explicit `Unknown` variant. Scoring never looks at raw
//! strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Accuracy {
    #[serde(rename = "Factually Correct")]
    FactuallyCorrect,
    #[serde(rename = "Partially Correct")]
    PartiallyCorrect,
    #[serde(rename = "Factually Incorrect")]
    FactuallyIncorrect,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Accuracy {
    pub const ALL: [Accuracy; 4] = [
        Accuracy::FactuallyCorrect,
        Accuracy::PartiallyCorrect,
        Accuracy::FactuallyIncorrect,
        Accuracy::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Accuracy::FactuallyCorrect => "Factually Correct",
            Accuracy::PartiallyCorrect => "Partially Correct",
            Accuracy::FactuallyIncorrect => "Factually Incorrect",
            Accuracy::Unknown => "unknown",
        }
    }
}

impl Accuracy {
    fn classify(s: &str) -> Self {
        if s.contains("partially") {
            Accuracy::PartiallyCorrect
        } else if s.contains("incorrect")
            || s.contains("not correct")
            || s.contains("not factually correct")
        {
            Accuracy::FactuallyIncorrect
        } else if s.contains("factually correct") {
            Accuracy::FactuallyCorrect
        } else {
            Accuracy::Unknown
        }
    }
}

impl From<&str> for Accuracy {
    fn from(raw: &str) -> Self {
        let s = raw.trim().to_lowercase();
        match s.as_str() {
            "factually correct" => return Accuracy::FactuallyCorrect,
            "partially correct" => return Accuracy::PartiallyCorrect,
            "factually incorrect" => return Accuracy::FactuallyIncorrect,
            _ => {}
        }
        match Accuracy::classify(label_head(&s)) {
            Accuracy::Unknown => Accuracy::classify(&s),
            found => found,
        }
    }
}

impl From<String> for Accuracy {
    fn from(raw: String) -> Self {
        Accuracy::from(raw.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[serde(rename = "unknown")]
    Unknown,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Unknown => "unknown",
        }
    }
}

impl RiskLevel {
    // Most severe label wins when the model hedges ("medium-high").
    fn by_severity(s: &str) -> Self {
        if s.contains("high") {
            RiskLevel::High
        } else if s.contains("medium") {
            RiskLevel::Medium
        } else if s.contains("low") {
            RiskLevel::Low
        } else {
            RiskLevel::Unknown
        }
    }
}

impl From<&str> for RiskLevel {
    fn from(raw: &str) -> Self {
        let s = raw.trim().to_lowercase();
        match s.as_str() {
            "low" => return RiskLevel::Low,
            "medium" => return RiskLevel::Medium,
            "high" => return RiskLevel::High,
            _ => {}
        }
        match RiskLevel::by_severity(label_head(&s)) {
            RiskLevel::Unknown => RiskLevel::by_severity(&s),
            found => found,
        }
    }
}

impl From<String> for RiskLevel {
    fn from(raw: String) -> Self {
        RiskLevel::from(raw.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum OverallRating {
    Excellent,
    Good,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    #[serde(rename = "unknown")]
    Unknown,
}

impl OverallRating {
    pub const ALL: [OverallRating; 5] = [
        OverallRating::Excellent,
        OverallRating::Good,
        OverallRating::Poor,
        OverallRating::VeryPoor,
        OverallRating::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverallRating::Excellent => "Excellent",
            OverallRating::Good => "Good",
            OverallRating::Poor => "Poor",
            OverallRating::VeryPoor => "Very Poor",
            OverallRating::Unknown => "unknown",
        }
    }
}

impl OverallRating {
    fn classify(s: &str) -> Self {
        if s.contains("very poor") {
            OverallRating::VeryPoor
        } else if s.contains("poor") {
            OverallRating::Poor
        } else if s.contains("excellent") {
            OverallRating::Excellent
        } else if s.contains("good") {
            OverallRating::Good
        } else {
            OverallRating::Unknown
        }
    }
}

impl From<&str> for OverallRating {
    fn from(raw: &str) -> Self {
        let s = raw.trim().to_lowercase();
        match OverallRating::classify(label_head(&s)) {
            OverallRating::Unknown => OverallRating::classify(&s),
            found => found,
        }
    }
}

impl From<String> for OverallRating {
    fn from(raw: String) -> Self {
        OverallRating::from(raw.as_str())
    }
}

/// The label before any parenthetical or trailing qualifier: `"low (no high-risk content)"` -> `"low"`.
fn label_head(s: &str) -> &str {
    match s.find(&['(', ',', ';', ':'][..]) {
        Some(idx) => s[..idx].trim(),
        None => s,
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Accuracy, RiskLevel, OverallRating, Decision);

/// Final disposition of an evaluated response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Allow,
    Review,
    Block,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "ALLOW",
            Decision::Review => "REVIEW",
            Decision::Block => "BLOCK",
        }
    }
}

/// The model's structured judgment of a prompt/response pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVerdict {
    pub accuracy: Accuracy,
    pub risk_level: RiskLevel,
    pub contains_hallucination: bool,
    pub overall_rating: OverallRating,
    pub short_explanation: String,
    #[serde(default)]
    pub hallucination_signals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Default for ModelVerdict {
    fn default() -> Self {
        Self {
            accuracy: Accuracy::Unknown,
            risk_level: RiskLevel::Unknown,
            contains_hallucination: false,
            overall_rating: OverallRating::Unknown,
            short_explanation: String::new(),
            hallucination_signals: Vec::new(),
            confidence: None,
        }
    }
}

impl ModelVerdict {
    /// Map an already-extracted JSON object onto the closed verdict shape.
    ///
    /// Missing keys, wrong types and unrecognised labels all degrade to the
    /// `Unknown`/empty defaults instead of failing.
    pub fn from_value(value: &Value) -> Self {
        fn text<'a>(value: &'a Value, key: &str) -> &'a str {
            value.get(key).and_then(Value::as_str).unwrap_or_default()
        }

        let contains_hallucination = match value.get("contains_hallucination") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        };

        let hallucination_signals = match value.get("hallucination_signals") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .filter(|s| !s.trim().is_empty())
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
            _ => Vec::new(),
        };

        let confidence = value
            .get("confidence")
            .and_then(Value::as_f64)
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0));

        Self {
            accuracy: Accuracy::from(text(value, "accuracy")),
            risk_level: RiskLevel::from(text(value, "risk_level")),
            contains_hallucination,
            overall_rating: OverallRating::from(text(value, "overall_rating")),
            short_explanation: text(value, "short_explanation").to_string(),
            hallucination_signals,
            confidence,
        }
    }
}

/// A verdict augmented with the derived score and decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    #[serde(flatten)]
    pub verdict: ModelVerdict,
    pub gen_score: u8,
    pub decision: Decision,
}

impl ScoredResult {
    /// Fail-closed result used whenever the model output cannot be trusted.
    pub fn fail_closed(signal: &str, detail: impl Into<String>) -> Self {
        Self {
            verdict: ModelVerdict {
                accuracy: Accuracy::Unknown,
                risk_level: RiskLevel::High,
                contains_hallucination: true,
                overall_rating: OverallRating::VeryPoor,
                short_explanation: detail.into(),
                hallucination_signals: vec![signal.to_string()],
                confidence: Some(0.0),
            },
            gen_score: 0,
            decision: Decision::Block,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(Accuracy::from("FACTUALLY CORRECT"), Accuracy::FactuallyCorrect);
        assert_eq!(Accuracy::from("partially correct"), Accuracy::PartiallyCorrect);
        assert_eq!(Accuracy::from(" Factually Incorrect "), Accuracy::FactuallyIncorrect);
        assert_eq!(Accuracy::from("mostly fine"), Accuracy::Unknown);

        assert_eq!(RiskLevel::from("high"), RiskLevel::High);
        assert_eq!(RiskLevel::from("Medium-High"), RiskLevel::High);
        assert_eq!(RiskLevel::from("LOW"), RiskLevel::Low);
        assert_eq!(RiskLevel::from(""), RiskLevel::Unknown);

        assert_eq!(OverallRating::from("very poor"), OverallRating::VeryPoor);
        assert_eq!(OverallRating::from("Poor"), OverallRating::Poor);
        assert_eq!(OverallRating::from("excellent"), OverallRating::Excellent);
        assert_eq!(OverallRating::from("n/a"), OverallRating::Unknown);
    }

    #[test]
    fn qualifiers_do_not_override_the_leading_label() {
        assert_eq!(RiskLevel::from("Low (no high-risk content)"), RiskLevel::Low);
        assert_eq!(RiskLevel::from("Medium, nothing high here"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from("Risk: High"), RiskLevel::High);

        assert_eq!(Accuracy::from("not factually correct"), Accuracy::FactuallyIncorrect);
        assert_eq!(Accuracy::from("Factually Correct (not partially)"), Accuracy::FactuallyCorrect);
        assert_eq!(Accuracy::from("Partially correct; some dates incorrect"), Accuracy::PartiallyCorrect);

        assert_eq!(OverallRating::from("Good (not poor)"), OverallRating::Good);
    }

    #[test]
    fn from_value_tolerates_missing_and_mistyped_fields() {
        let v = json!({
            "accuracy": 42,
            "contains_hallucination": "TRUE",
            "hallucination_signals": ["made-up citation", "", 7],
            "confidence": 3.5
        });
        let verdict = ModelVerdict::from_value(&v);
        assert_eq!(verdict.accuracy, Accuracy::Unknown);
        assert_eq!(verdict.risk_level, RiskLevel::Unknown);
        assert!(verdict.contains_hallucination);
        assert_eq!(verdict.overall_rating, OverallRating::Unknown);
        assert_eq!(verdict.short_explanation, "");
        assert_eq!(verdict.hallucination_signals, vec!["made-up citation", "7"]);
        assert_eq!(verdict.confidence, Some(1.0));
    }

    #[test]
    fn scored_result_serializes_flat_with_display_labels() {
        let result = ScoredResult {
            verdict: ModelVerdict {
                accuracy: Accuracy::PartiallyCorrect,
                risk_level: RiskLevel::Medium,
                overall_rating: OverallRating::VeryPoor,
                ..ModelVerdict::default()
            },
            gen_score: 45,
            decision: Decision::Review,
        };
        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v["accuracy"], "Partially Correct");
        assert_eq!(v["risk_level"], "Medium");
        assert_eq!(v["overall_rating"], "Very Poor");
        assert_eq!(v["gen_score"], 45);
        assert_eq!(v["decision"], "REVIEW");
        assert!(v.get("confidence").is_none());

        let back: ScoredResult = serde_json::from_value(v).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn fail_closed_blocks() {
        let r = ScoredResult::fail_closed("Invalid JSON from model", "no braces");
        assert_eq!(r.gen_score, 0);
        assert_eq!(r.decision, Decision::Block);
        assert_eq!(r.verdict.risk_level, RiskLevel::High);
        assert!(r.verdict.contains_hallucination);
        assert_eq!(r.verdict.short_explanation, "no braces");
    }
}
