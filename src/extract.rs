//! Recover a JSON object from free-form model output.
//!
//! Models are asked for bare JSON but regularly wrap it in prose or markdown
//! fences, or emit several brace groups. Extraction runs in stages and stops
//! at the first one that yields a JSON object:
//!
//! 1. the whole trimmed text
//! 2. the widest span from the first `{` to the last `}`
//! 3. each balanced `{...}` group, longest first
//! 4. the text with ```` ```json ```` / ```` ``` ```` fences removed
//!
//! A fence around the object is already handled by stage 2, so stage 4 only
//! matters when fence markers end up inside the braces.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::errors::{GenScoreError, GenScoreResult};

const MAX_BALANCED_CANDIDATES: usize = 64;

static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)```(?:json)?").unwrap());

pub fn extract_json_object(raw: &str) -> GenScoreResult<Map<String, Value>> {
    let text = raw.trim();

    if let Some(obj) = parse_object(text) {
        return Ok(obj);
    }

    if let Some(span) = outer_brace_span(text) {
        if let Some(obj) = parse_object(span) {
            return Ok(obj);
        }
    }

    let mut groups = balanced_groups(text);
    groups.sort_by_key(|g| std::cmp::Reverse(g.len()));
    for group in groups {
        if let Some(obj) = parse_object(group) {
            return Ok(obj);
        }
    }

    let unfenced = FENCE.replace_all(text, "");
    if let Some(obj) = parse_object(unfenced.trim()) {
        return Ok(obj);
    }

    Err(GenScoreError::unparsable(raw))
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn outer_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Every brace group whose braces balance, ignoring braces inside JSON strings.
fn balanced_groups(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();

    for (start, _) in text.match_indices('{').take(MAX_BALANCED_CANDIDATES) {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, &b) in bytes[start..].iter().enumerate() {
            if in_string {
                match b {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        out.push(&text[start..=start + offset]);
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    out
}
