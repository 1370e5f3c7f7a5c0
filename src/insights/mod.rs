pub mod llm;
pub mod parser;
pub mod prompt;
pub mod types;

pub use llm::{AzureGenerationClient, GenerationClient, MockGenerationClient};
pub use parser::{clean_summary, extract_embedded_json, interpret_response};
pub use types::{InsightOutcome, ScenarioMetadata};

use thiserror::Error;

/// Failure to invoke the generation service at all. A response that arrives
/// but cannot be interpreted is not an error; see `InsightOutcome`.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("generation service unreachable at {0}")]
    Connection(String),

    #[error("generation request timed out after {0}s")]
    Timeout(u64),

    #[error("generation service returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("response decoding error: {0}")]
    ResponseDecoding(String),

    #[error("generation response contained no completion")]
    EmptyCompletion,
}
