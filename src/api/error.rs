//! API error types with structured JSON responses.
//!
//! Every failure path renders as `{status:"error", message, suggestions?}`.
//! Input and not-found problems are 4xx; only upstream failures reach 5xx.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::registry::Suggestion;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest {
        message: String,
        suggestions: Option<Vec<Suggestion>>,
    },

    #[error("{message}")]
    NotFound {
        message: String,
        suggestions: Option<Vec<Suggestion>>,
    },

    /// An upstream dependency (registry fetch, generation service) failed.
    #[error("{message}")]
    Upstream {
        message: String,
        suggestions: Option<Vec<Suggestion>>,
    },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            suggestions: None,
        }
    }

    pub fn bad_request_with(message: impl Into<String>, suggestions: Vec<Suggestion>) -> Self {
        Self::BadRequest {
            message: message.into(),
            suggestions: Some(suggestions),
        }
    }

    pub fn not_found(message: impl Into<String>, suggestions: Vec<Suggestion>) -> Self {
        Self::NotFound {
            message: message.into(),
            suggestions: Some(suggestions),
        }
    }

    pub fn upstream(message: impl Into<String>, suggestions: Vec<Suggestion>) -> Self {
        Self::Upstream {
            message: message.into(),
            suggestions: Some(suggestions),
        }
    }

    pub fn upstream_plain(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            suggestions: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message, suggestions) = match self {
            ApiError::BadRequest {
                message,
                suggestions,
            } => (StatusCode::BAD_REQUEST, message, suggestions),
            ApiError::NotFound {
                message,
                suggestions,
            } => (StatusCode::NOT_FOUND, message, suggestions),
            ApiError::Upstream {
                message,
                suggestions,
            } => {
                tracing::error!(%message, "upstream failure");
                (StatusCode::INTERNAL_SERVER_ERROR, message, suggestions)
            }
            ApiError::Internal(message) => {
                tracing::error!(%message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message, None)
            }
        };

        let body = ErrorBody {
            status: "error",
            message,
            suggestions,
        };
        (code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 65536).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400() {
        let response = ApiError::bad_request("Missing 'nct_id'").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Missing 'nct_id'");
        assert!(json.get("suggestions").is_none());
    }

    #[tokio::test]
    async fn not_found_carries_suggestions() {
        let suggestions = vec![Suggestion {
            nct_id: "NCT01111111".to_string(),
            title: "Alt".to_string(),
        }];
        let response =
            ApiError::not_found("NCT ID 'NCT09999999' not found.", suggestions).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["suggestions"][0]["nct_id"], "NCT01111111");
    }

    #[tokio::test]
    async fn upstream_returns_500() {
        let response = ApiError::upstream_plain("Fetch error for NCT01234567").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
    }

    #[tokio::test]
    async fn internal_returns_500() {
        let response = ApiError::Internal("broke".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
