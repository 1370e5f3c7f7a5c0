//! Registry document → flat `TrialRecord` extraction.
//!
//! The public boundary never fails: any input shape yields a
//! schema-complete record. Internally, extraction tracks which modules
//! were unreadable as `FieldWarning`s so tests and logs can see what
//! degraded to a fallback.

use std::fmt;

use serde_json::Value;

use super::doc::Node;
use super::record::{self, TrialRecord};

/// A part of the document the extractor could not read. The record carries
/// fallback values for the fields that part would have supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWarning {
    NotAnObject,
    MissingProtocolSection,
    MissingModule(&'static str),
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "document is not a JSON object"),
            Self::MissingProtocolSection => write!(f, "protocolSection missing or invalid"),
            Self::MissingModule(name) => write!(f, "{name} missing or invalid"),
        }
    }
}

/// Extraction result: the total record plus what fell back and why.
#[derive(Debug)]
pub struct Extraction {
    pub record: TrialRecord,
    pub warnings: Vec<FieldWarning>,
}

/// Normalize a raw registry study document.
///
/// Total over the schema: never fails, every field of the returned record
/// is populated (with its fallback where the document had nothing usable).
pub fn normalize_study(document: &Value) -> TrialRecord {
    let Extraction { record, warnings } = extract(document);
    for warning in &warnings {
        tracing::debug!(%warning, "normalization fallback");
    }
    record
}

/// Full extraction with per-module diagnostics.
pub fn extract(document: &Value) -> Extraction {
    let mut warnings = Vec::new();

    if !document.is_object() {
        warnings.push(FieldWarning::NotAnObject);
        return Extraction {
            record: TrialRecord::default(),
            warnings,
        };
    }

    // A document without a readable protocolSection degrades to the
    // all-fallback record, even if other top-level sections are present.
    let protocol = Node::root(document).get("protocolSection");
    if !protocol.is_object() {
        warnings.push(FieldWarning::MissingProtocolSection);
        return Extraction {
            record: TrialRecord::default(),
            warnings,
        };
    }

    let mut record = TrialRecord::default();

    let identification = module(protocol, "identificationModule", &mut warnings);
    record.nct_id = identification.get("nctId").str().map(str::to_string);
    record.brief_title = identification.get("briefTitle").str().map(str::to_string);
    record.official_title = identification.get("officialTitle").str().map(str::to_string);

    let status = module(protocol, "statusModule", &mut warnings);
    record.status = status.get("overallStatus").str().map(str::to_string);

    let conditions = module(protocol, "conditionsModule", &mut warnings)
        .get("conditions")
        .string_list();
    if !conditions.is_empty() {
        record.conditions = conditions.join(", ");
    }

    let interventions = module(protocol, "armsInterventionsModule", &mut warnings)
        .get("interventions")
        .objects();
    if !interventions.is_empty() {
        record.interventions = interventions
            .iter()
            .map(|entry| {
                format!(
                    "{}: {}",
                    entry.get("type").str().unwrap_or("N/A"),
                    entry.get("name").str().unwrap_or("N/A"),
                )
            })
            .collect::<Vec<_>>()
            .join("; ");

        record.intervention_types = interventions
            .iter()
            .filter_map(|entry| entry.get("type").str())
            .map(str::to_string)
            .collect();

        let drugs: Vec<&str> = interventions
            .iter()
            .filter(|entry| {
                entry
                    .get("type")
                    .str()
                    .is_some_and(|t| t.eq_ignore_ascii_case("DRUG"))
            })
            .filter_map(|entry| entry.get("name").str())
            .collect();
        if !drugs.is_empty() {
            record.drug_names = drugs.join(", ");
        }
    }

    let eligibility = module(protocol, "eligibilityModule", &mut warnings);
    record.minimum_age = eligibility.get("minimumAge").string_or(record::NOT_SPECIFIED);
    record.maximum_age = eligibility.get("maximumAge").string_or(record::NO_MAX_AGE);
    record.sex = eligibility.get("sex").string_or(record::NOT_SPECIFIED);
    let (inclusion, exclusion) = split_eligibility(eligibility.get("eligibilityCriteria").str());
    record.inclusion_criteria = inclusion;
    record.exclusion_criteria = exclusion;

    let design = module(protocol, "designModule", &mut warnings);
    let phases = design.get("phases").string_list();
    if !phases.is_empty() {
        record.phase = phases.join(", ");
    }
    record.study_type = design.get("studyType").string_or(record::NOT_SPECIFIED);

    Extraction { record, warnings }
}

fn module<'a>(
    protocol: Node<'a>,
    name: &'static str,
    warnings: &mut Vec<FieldWarning>,
) -> Node<'a> {
    let node = protocol.get(name);
    if !node.is_object() {
        warnings.push(FieldWarning::MissingModule(name));
    }
    node
}

const EXCLUSION_MARKER: &str = "Exclusion Criteria:";
const INCLUSION_LABEL: &str = "Inclusion Criteria:";

/// Split the free-text eligibility block into inclusion and exclusion text.
///
/// The block conventionally reads "Inclusion Criteria: ... Exclusion
/// Criteria: ...". Split once on the first exclusion marker; without it the
/// whole block is inclusion text. Neither side is ever left empty.
fn split_eligibility(criteria: Option<&str>) -> (String, String) {
    let Some(text) = criteria else {
        return (
            record::NOT_PROVIDED.to_string(),
            record::NOT_PROVIDED.to_string(),
        );
    };

    let (inclusion, exclusion) = match text.split_once(EXCLUSION_MARKER) {
        Some((before, after)) => (strip_inclusion_label(before), after.trim().to_string()),
        None => (
            strip_inclusion_label(text),
            record::NOT_SPECIFIED.to_string(),
        ),
    };

    (
        non_empty_or(inclusion, record::NOT_PROVIDED),
        non_empty_or(exclusion, record::NOT_PROVIDED),
    )
}

fn strip_inclusion_label(text: &str) -> String {
    text.replace(INCLUSION_LABEL, "").trim().to_string()
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
