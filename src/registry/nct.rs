//! NCT accession number validation.

use std::sync::OnceLock;

use regex::Regex;

fn pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^NCT[0-9]{8}$").expect("static pattern"))
}

/// Trimmed, upper-cased form used for registry lookups.
pub fn canonicalize(candidate: &str) -> String {
    candidate.trim().to_ascii_uppercase()
}

/// True iff the candidate is `NCT` followed by exactly eight decimal digits,
/// ignoring surrounding whitespace and letter case. Never fails.
pub fn is_valid_nct_format(candidate: &str) -> bool {
    pattern().is_match(&canonicalize(candidate))
}
