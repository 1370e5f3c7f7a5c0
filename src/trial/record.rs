//! The flat, schema-complete record produced by normalization.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const NOT_SPECIFIED: &str = "Not specified";
pub const NO_MAX_AGE: &str = "No maximum age specified";
pub const NOT_PROVIDED: &str = "Not provided";
pub const NO_DRUGS_LISTED: &str = "No specific drugs listed";
pub const NO_PHASE: &str = "Not Applicable/Not Specified";

/// A trial flattened to fixed fields with deterministic fallbacks.
///
/// Total over its schema: every field is present in the serialized form even
/// when the source document was empty or malformed (`Option` fields serialize
/// as null). Constructed once per fetch and immutable afterwards.
///
/// Deserialization is lenient the same way: missing fields take their
/// fallback value, so a caller round-tripping `processed_data` through its
/// own storage may drop fields without breaking insight generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialRecord {
    pub nct_id: Option<String>,
    pub brief_title: Option<String>,
    pub official_title: Option<String>,
    pub status: Option<String>,
    /// Comma-joined condition names.
    pub conditions: String,
    /// Semicolon-joined "{type}: {name}" pairs.
    pub interventions: String,
    /// Distinct intervention type labels; `BTreeSet` keeps the serialized
    /// order deterministic.
    pub intervention_types: BTreeSet<String>,
    /// Comma-joined names of DRUG-type interventions.
    pub drug_names: String,
    pub minimum_age: String,
    pub maximum_age: String,
    pub sex: String,
    pub inclusion_criteria: String,
    pub exclusion_criteria: String,
    /// Comma-joined phase labels in registry order.
    pub phase: String,
    pub study_type: String,
}

impl Default for TrialRecord {
    fn default() -> Self {
        Self {
            nct_id: None,
            brief_title: None,
            official_title: None,
            status: None,
            conditions: NOT_SPECIFIED.to_string(),
            interventions: NOT_SPECIFIED.to_string(),
            intervention_types: BTreeSet::new(),
            drug_names: NO_DRUGS_LISTED.to_string(),
            minimum_age: NOT_SPECIFIED.to_string(),
            maximum_age: NO_MAX_AGE.to_string(),
            sex: NOT_SPECIFIED.to_string(),
            inclusion_criteria: NOT_PROVIDED.to_string(),
            exclusion_criteria: NOT_PROVIDED.to_string(),
            phase: NO_PHASE.to_string(),
            study_type: NOT_SPECIFIED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA_FIELDS: &[&str] = &[
        "nct_id",
        "brief_title",
        "official_title",
        "status",
        "conditions",
        "interventions",
        "intervention_types",
        "drug_names",
        "minimum_age",
        "maximum_age",
        "sex",
        "inclusion_criteria",
        "exclusion_criteria",
        "phase",
        "study_type",
    ];

    #[test]
    fn default_record_carries_all_fallbacks() {
        let record = TrialRecord::default();
        assert!(record.nct_id.is_none());
        assert_eq!(record.conditions, NOT_SPECIFIED);
        assert_eq!(record.interventions, NOT_SPECIFIED);
        assert!(record.intervention_types.is_empty());
        assert_eq!(record.drug_names, NO_DRUGS_LISTED);
        assert_eq!(record.maximum_age, NO_MAX_AGE);
        assert_eq!(record.inclusion_criteria, NOT_PROVIDED);
        assert_eq!(record.exclusion_criteria, NOT_PROVIDED);
        assert_eq!(record.phase, NO_PHASE);
    }

    #[test]
    fn serialized_record_is_total_over_schema() {
        let json = serde_json::to_value(TrialRecord::default()).unwrap();
        let object = json.as_object().unwrap();
        for field in SCHEMA_FIELDS {
            assert!(object.contains_key(*field), "missing field {field}");
        }
        assert_eq!(object.len(), SCHEMA_FIELDS.len());
        assert!(json["nct_id"].is_null());
    }

    #[test]
    fn deserializes_empty_object_to_fallbacks() {
        let record: TrialRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, TrialRecord::default());
    }

    #[test]
    fn deserializes_partial_object_keeping_given_fields() {
        let record: TrialRecord =
            serde_json::from_value(serde_json::json!({"nct_id": "NCT01234567", "sex": "FEMALE"}))
                .unwrap();
        assert_eq!(record.nct_id.as_deref(), Some("NCT01234567"));
        assert_eq!(record.sex, "FEMALE");
        assert_eq!(record.conditions, NOT_SPECIFIED);
    }

    #[test]
    fn round_trips_through_json() {
        let mut record = TrialRecord::default();
        record.nct_id = Some("NCT01234567".to_string());
        record.intervention_types = ["Drug".to_string(), "Device".to_string()].into();
        let json = serde_json::to_string(&record).unwrap();
        let back: TrialRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
