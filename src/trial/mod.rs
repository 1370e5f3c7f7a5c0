pub mod doc;
pub mod normalize;
pub mod record;

pub use normalize::{extract, normalize_study, Extraction, FieldWarning};
pub use record::TrialRecord;
