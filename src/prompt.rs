use crate::audit_mode::AuditMode;

const OUTPUT_CONTRACT: &str = r#"IMPORTANT:
- Return ONLY valid JSON
- Do NOT use markdown
- Do NOT wrap in ```json
- Do NOT add extra text
- Output must start with { and end with }

JSON format:
{
  "accuracy": "Factually Correct" | "Partially Correct" | "Factually Incorrect",
  "risk_level": "Low" | "Medium" | "High",
  "confidence": number (0-1),
  "contains_hallucination": true | false,
  "overall_rating": "Excellent" | "Good" | "Poor" | "Very Poor",
  "hallucination_signals": [],
  "short_explanation": ""
}"#;

/// Compose the audit instruction sent to the model.
///
/// Pure; the same inputs always produce the same text.
pub fn build_audit_prompt(prompt: &str, response: &str, mode: AuditMode) -> String {
    format!(
        "You are an AI auditor.\n\n\
         Evaluate the following AI response.\n\n\
         AUDIT MODE: {label}\n\n\
         USER PROMPT:\n{prompt}\n\n\
         AI RESPONSE:\n{response}\n\n\
         {focus}\n\n\
         {OUTPUT_CONTRACT}\n",
        label = mode.label(),
        focus = mode.instructions(),
    )
}

/// Fixed connectivity probe
pub const PING_PROMPT: &str = "Say exactly: Gemini is working fine for GEN-SCORE AI";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_inputs_and_contract() {
        let text = build_audit_prompt("Capital of France?", "Paris.", AuditMode::Factual);
        assert!(text.contains("USER PROMPT:\nCapital of France?"));
        assert!(text.contains("AI RESPONSE:\nParis."));
        assert!(text.contains("AUDIT FOCUS: FACTUAL ACCURACY"));
        assert!(text.contains("\"risk_level\": \"Low\" | \"Medium\" | \"High\""));
    }

    #[test]
    fn each_mode_gets_its_own_focus_block() {
        let legal = build_audit_prompt("p", "r", AuditMode::Legal);
        let halluc = build_audit_prompt("p", "r", AuditMode::Hallucination);
        assert!(legal.contains("AUDIT FOCUS: LEGAL COMPLIANCE"));
        assert!(!legal.contains("HALLUCINATION DETECTION"));
        assert!(halluc.contains("AUDIT FOCUS: HALLUCINATION DETECTION"));
        assert_eq!(halluc, build_audit_prompt("p", "r", AuditMode::Hallucination));
    }
}
