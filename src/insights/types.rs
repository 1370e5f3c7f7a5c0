//! Shared types for insight generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied scenario context. Opaque to normalization; only the
/// insight prompts read it. Missing fields take neutral defaults so a
/// partial `original_input` round-tripped by a client still renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioMetadata {
    pub indication: String,
    pub product: String,
    pub scenario_name: String,
}

impl Default for ScenarioMetadata {
    fn default() -> Self {
        Self {
            indication: "Not Provided".to_string(),
            product: "Not Provided".to_string(),
            scenario_name: "Default Scenario".to_string(),
        }
    }
}

/// What the caller receives for a generation response.
///
/// `Parsed` carries the embedded JSON object. `Diagnostic` is the
/// soft-failure shape: still a successful response, carrying the parse
/// failure reason and the raw text so the caller can inspect or re-request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InsightOutcome {
    Parsed(Value),
    Diagnostic {
        parsing_warning: String,
        raw_llm_output: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scenario_defaults_fill_missing_fields() {
        let scenario: ScenarioMetadata =
            serde_json::from_value(json!({"indication": "melanoma"})).unwrap();
        assert_eq!(scenario.indication, "melanoma");
        assert_eq!(scenario.product, "Not Provided");
        assert_eq!(scenario.scenario_name, "Default Scenario");
    }

    #[test]
    fn scenario_ignores_extra_fields() {
        let scenario: ScenarioMetadata = serde_json::from_value(json!({
            "indication": "melanoma",
            "nct_id": "NCT01234567"
        }))
        .unwrap();
        assert_eq!(scenario.indication, "melanoma");
    }

    #[test]
    fn parsed_outcome_serializes_as_the_object_itself() {
        let outcome = InsightOutcome::Parsed(json!({"a": 1}));
        assert_eq!(serde_json::to_value(&outcome).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn diagnostic_outcome_serializes_with_warning_keys() {
        let outcome = InsightOutcome::Diagnostic {
            parsing_warning: "no JSON".to_string(),
            raw_llm_output: "free text".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["parsing_warning"], "no JSON");
        assert_eq!(json["raw_llm_output"], "free text");
    }
}
