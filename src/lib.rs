pub mod api; // HTTP surface: router, endpoints, error mapping
pub mod config; // Process configuration, built once at startup
pub mod insights; // Prompt construction, generation clients, response parsing
pub mod registry; // ClinicalTrials.gov client and identifier validation
pub mod trial; // The core: document → flat record normalization
