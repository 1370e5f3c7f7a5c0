//! Interpretation of generation-service response text.
//!
//! The service is asked for a single JSON object; real responses wrap it
//! in a ```json fence, return it bare, or fail to produce one at all.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::types::InsightOutcome;

fn fenced_json() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)```json\s*(\{.*?\})\s*```").expect("static pattern"))
}

/// Locate and parse the single JSON object embedded in `text`.
///
/// Prefers a ```json fenced block; otherwise accepts the whole trimmed
/// text when it is brace-delimited. The error string is the user-visible
/// parse failure reason.
pub fn extract_embedded_json(text: &str) -> Result<Value, String> {
    let trimmed = text.trim();
    let json_str = if let Some(captures) = fenced_json().captures(text) {
        captures.get(1).map(|m| m.as_str()).unwrap_or_default()
    } else if trimmed.starts_with('{') && trimmed.ends_with('}') {
        trimmed
    } else {
        return Err("Could not find JSON block in LLM output.".to_string());
    };

    serde_json::from_str(json_str)
        .map_err(|e| format!("LLM output could not be parsed as JSON: {e}"))
}

/// Collapse a response into the payload returned to callers: parsed
/// insights on success, a diagnostic carrying the raw text otherwise.
pub fn interpret_response(text: &str) -> InsightOutcome {
    match extract_embedded_json(text) {
        Ok(value) => InsightOutcome::Parsed(value),
        Err(reason) => {
            tracing::warn!(%reason, "generation response was not valid embedded JSON");
            InsightOutcome::Diagnostic {
                parsing_warning: reason,
                raw_llm_output: text.to_string(),
            }
        }
    }
}

const SUMMARY_LABEL: &str = "concise narrative summary of insights:";

/// Strip the echoed template label some summaries lead with, and trim.
pub fn clean_summary(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.get(..SUMMARY_LABEL.len()) {
        Some(head) if head.eq_ignore_ascii_case(SUMMARY_LABEL) => {
            trimmed[SUMMARY_LABEL.len()..].trim().to_string()
        }
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_fenced_json_block() {
        let value = extract_embedded_json("```json\n{\"a\":1}\n```").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn parses_fenced_block_with_surrounding_prose() {
        let text = "Here are the insights:\n```json\n{\"k\": [1, 2]}\n```\nLet me know!";
        let value = extract_embedded_json(text).unwrap();
        assert_eq!(value, json!({"k": [1, 2]}));
    }

    #[test]
    fn fence_label_is_case_insensitive() {
        let value = extract_embedded_json("```JSON\n{\"a\": true}\n```").unwrap();
        assert_eq!(value, json!({"a": true}));
    }

    #[test]
    fn accepts_bare_brace_delimited_text() {
        let value = extract_embedded_json("  {\"b\": \"x\"}  ").unwrap();
        assert_eq!(value, json!({"b": "x"}));
    }

    #[test]
    fn rejects_text_without_any_object() {
        let err = extract_embedded_json("There is nothing structured here.").unwrap_err();
        assert!(err.contains("Could not find JSON block"));
    }

    #[test]
    fn rejects_malformed_json_inside_fence() {
        let err = extract_embedded_json("```json\n{not valid}\n```").unwrap_err();
        assert!(err.contains("could not be parsed as JSON"));
    }

    #[test]
    fn interpret_returns_parsed_on_success() {
        let outcome = interpret_response("```json\n{\"a\":1}\n```");
        assert_eq!(outcome, InsightOutcome::Parsed(json!({"a": 1})));
    }

    #[test]
    fn interpret_returns_diagnostic_with_raw_text() {
        let outcome = interpret_response("no braces anywhere");
        match outcome {
            InsightOutcome::Diagnostic {
                parsing_warning,
                raw_llm_output,
            } => {
                assert!(parsing_warning.contains("Could not find JSON block"));
                assert_eq!(raw_llm_output, "no braces anywhere");
            }
            other => panic!("expected diagnostic, got {other:?}"),
        }
    }

    #[test]
    fn clean_summary_strips_echoed_label() {
        assert_eq!(
            clean_summary("Concise Narrative Summary of Insights: The market is small."),
            "The market is small."
        );
        assert_eq!(clean_summary("  plain text  "), "plain text");
    }

    #[test]
    fn clean_summary_handles_short_input() {
        assert_eq!(clean_summary(""), "");
        assert_eq!(clean_summary("ok"), "ok");
    }
}
