//! ClinicalTrials.gov v2 API client.
//!
//! Three operations with different failure contracts: `fetch_study`
//! classifies every outcome into a `RegistryError`, `exists` and
//! `suggest_by_condition` are best-effort and never fail the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{nct, RegistryError};
use crate::config::RegistryConfig;

/// Maximum bytes of an upstream error body carried into a `Status` error.
const ERROR_DETAIL_LIMIT: usize = 500;

/// Number of studies requested from keyword search.
const SEARCH_PAGE_SIZE: usize = 3;

/// An `{nct_id, title}` pair offered when the requested trial cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub nct_id: String,
    pub title: String,
}

pub struct RegistryClient {
    base_url: String,
    client: reqwest::Client,
    fetch_timeout: Duration,
    exists_timeout: Duration,
    search_timeout: Duration,
}

impl RegistryClient {
    pub fn new(config: &RegistryConfig) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            exists_timeout: Duration::from_secs(config.exists_timeout_secs),
            search_timeout: Duration::from_secs(config.search_timeout_secs),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn study_url(&self, id: &str) -> String {
        format!("{}/studies/{}", self.base_url, id)
    }

    /// True iff a fetch of the study returns HTTP 200.
    ///
    /// Transport failures are logged and reported as "does not exist",
    /// never propagated. The identifier is not format-checked here;
    /// callers pre-validate or accept a false result.
    pub async fn exists(&self, nct_id: &str) -> bool {
        let id = nct::canonicalize(nct_id);
        match self
            .client
            .get(self.study_url(&id))
            .timeout(self.exists_timeout)
            .send()
            .await
        {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                tracing::warn!(%id, error = %e, "existence check failed");
                false
            }
        }
    }

    /// Fetch the full study document for an identifier.
    ///
    /// Fails fast on a malformed identifier, then classifies the HTTP
    /// outcome: 200 with a parseable non-empty body is the only success.
    pub async fn fetch_study(&self, nct_id: &str) -> Result<Value, RegistryError> {
        if !nct::is_valid_nct_format(nct_id) {
            return Err(RegistryError::InvalidFormat(nct_id.trim().to_string()));
        }
        let id = nct::canonicalize(nct_id);

        let response = self
            .client
            .get(self.study_url(&id))
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| classify_transport(&id, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(id));
        }
        if status != reqwest::StatusCode::OK {
            let detail = response.text().await.unwrap_or_default();
            return Err(RegistryError::Status {
                code: status.as_u16(),
                detail: truncated(&detail, ERROR_DETAIL_LIMIT),
            });
        }

        let body = response.bytes().await.map_err(|e| classify_transport(&id, e))?;
        if body.is_empty() {
            return Err(RegistryError::EmptyBody(id));
        }
        serde_json::from_slice(&body).map_err(|_| RegistryError::ParseFailure(id))
    }

    /// Up to three `{nct_id, title}` suggestions for a free-text condition.
    ///
    /// Best-effort: any transport or decode failure is logged and yields an
    /// empty list. A blank query short-circuits without a network call.
    pub async fn suggest_by_condition(&self, condition: &str) -> Vec<Suggestion> {
        let query = condition.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let page_size = SEARCH_PAGE_SIZE.to_string();
        let response = match self
            .client
            .get(format!("{}/studies", self.base_url))
            .query(&[("query.cond", query), ("pageSize", &page_size)])
            .timeout(self.search_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%query, error = %e, "suggestion search failed");
                return Vec::new();
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            tracing::warn!(%query, status = %response.status(), "suggestion search rejected");
            return Vec::new();
        }

        match response.json::<Value>().await {
            Ok(body) => extract_suggestions(&body),
            Err(e) => {
                tracing::warn!(%query, error = %e, "suggestion response not decodable");
                Vec::new()
            }
        }
    }
}

fn classify_transport(id: &str, err: reqwest::Error) -> RegistryError {
    if err.is_timeout() {
        RegistryError::Timeout(id.to_string())
    } else {
        tracing::warn!(%id, error = %err, "registry request failed");
        RegistryError::Network(err.to_string())
    }
}

/// Pull `{nct_id, title}` pairs out of a search response body.
/// Entries without an nctId are skipped; a missing title becomes "N/A".
fn extract_suggestions(body: &Value) -> Vec<Suggestion> {
    let Some(studies) = body.get("studies").and_then(Value::as_array) else {
        return Vec::new();
    };

    studies
        .iter()
        .filter_map(|study| {
            let id_module = study.get("protocolSection")?.get("identificationModule")?;
            let nct_id = id_module.get("nctId").and_then(Value::as_str)?;
            let title = id_module
                .get("briefTitle")
                .and_then(Value::as_str)
                .unwrap_or("N/A");
            Some(Suggestion {
                nct_id: nct_id.to_string(),
                title: title.to_string(),
            })
        })
        .collect()
}

fn truncated(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut boundary = max_bytes;
    while boundary > 0 && !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    text[..boundary].to_string()
}
