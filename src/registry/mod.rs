pub mod client;
pub mod nct;

pub use client::{RegistryClient, Suggestion};
pub use nct::{canonicalize, is_valid_nct_format};

use thiserror::Error;

/// Outcome classification for a fetch-by-id against the trial registry.
///
/// Exactly one variant per failure mode; the messages are the user-visible
/// text surfaced by the API layer.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid NCT ID format: '{0}'")]
    InvalidFormat(String),

    #[error("{0} returned empty content")]
    EmptyBody(String),

    #[error("{0} returned invalid JSON")]
    ParseFailure(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("registry returned status {code}: {detail}")]
    Status { code: u16, detail: String },

    #[error("timeout fetching {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),
}
