//! Process configuration, built once at startup from the environment and
//! shared by reference through `ApiContext`. No ambient globals.

use std::env;

use thiserror::Error;

pub const APP_NAME: &str = "Trialscope";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Azure OpenAI REST API version this service pins.
pub const AZURE_API_VERSION: &str = "2024-05-01-preview";

const DEFAULT_REGISTRY_URL: &str = "https://clinicaltrials.gov/api/v2";
const DEFAULT_DEPLOYMENT: &str = "gpt-35-turbo";
const DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("AZURE_OPENAI_ENDPOINT must be configured")]
    MissingEndpoint,

    #[error("invalid PORT value '{0}'")]
    InvalidPort(String),
}

/// Everything the service needs to run, resolved once in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub registry: RegistryConfig,
    pub generation: GenerationConfig,
    pub port: u16,
}

/// Trial registry connection settings. Timeouts are per-operation: the
/// existence probe is allowed less time than a full fetch.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub base_url: String,
    pub fetch_timeout_secs: u64,
    pub exists_timeout_secs: u64,
    pub search_timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            fetch_timeout_secs: 20,
            exists_timeout_secs: 10,
            search_timeout_secs: 15,
        }
    }
}

/// Azure OpenAI connection settings for the generation service.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: DEFAULT_DEPLOYMENT.to_string(),
            api_version: AZURE_API_VERSION.to_string(),
            timeout_secs: 60,
            max_attempts: 3,
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// The generation endpoint is required; everything else has a default.
    /// A missing API key is warned about, not fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = non_empty_var("AZURE_OPENAI_ENDPOINT").ok_or(ConfigError::MissingEndpoint)?;

        let api_key = env::var("AZURE_OPENAI_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("AZURE_OPENAI_API_KEY is not set; generation requests will fail upstream");
        }

        let deployment =
            non_empty_var("AZURE_DEPLOYMENT_NAME").unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string());

        let base_url =
            non_empty_var("TRIAL_REGISTRY_URL").unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            registry: RegistryConfig {
                base_url,
                ..RegistryConfig::default()
            },
            generation: GenerationConfig {
                endpoint,
                api_key,
                deployment,
                ..GenerationConfig::default()
            },
            port,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
