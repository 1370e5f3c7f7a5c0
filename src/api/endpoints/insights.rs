//! Insight generation and summarization endpoints.
//!
//! Both consume client-held state from earlier calls; the server never
//! stores a processed record between requests.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::api::endpoints::elapsed_seconds;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::insights::{self, prompt, ScenarioMetadata};
use crate::trial::TrialRecord;

/// `POST /generate_insights` — detailed commercial insights from a
/// previously normalized record plus the caller's scenario metadata.
///
/// A generation response that arrives but carries no parseable JSON is
/// still a success: `insights` then holds the diagnostic shape instead of
/// the parsed object. Only failure to invoke the service at all is a 500.
pub async fn generate_insights(
    State(ctx): State<ApiContext>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();

    let Some(processed) = body.get("processed_data").filter(|v| v.is_object()) else {
        return Err(ApiError::bad_request(
            "Missing or invalid 'processed_data' in request body",
        ));
    };
    let Some(original) = body.get("original_input").filter(|v| v.is_object()) else {
        return Err(ApiError::bad_request(
            "Missing or invalid 'original_input' in request body",
        ));
    };

    let has_nct_id = processed
        .get("nct_id")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());
    let has_indication = original
        .get("indication")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());
    if !has_nct_id || !has_indication {
        return Err(ApiError::bad_request(
            "Received data is incomplete ('nct_id' or 'indication' missing)",
        ));
    }

    let record: TrialRecord = serde_json::from_value(processed.clone())
        .map_err(|e| ApiError::bad_request(format!("Invalid 'processed_data': {e}")))?;
    let scenario: ScenarioMetadata = serde_json::from_value(original.clone())
        .map_err(|e| ApiError::bad_request(format!("Invalid 'original_input': {e}")))?;

    let nct_id = record.nct_id.clone().unwrap_or_default();
    tracing::info!(%nct_id, "generating insights from client-provided data");

    let insight_prompt = prompt::build_insight_prompt(&record, &scenario);
    let response = ctx
        .generator
        .generate(&insight_prompt, prompt::INSIGHT_TEMPERATURE)
        .await
        .map_err(|err| {
            ApiError::upstream_plain(format!("Failed to generate final insights via LLM: {err}"))
        })?;

    let insights = insights::interpret_response(&response);

    Ok(Json(json!({
        "status": "success",
        "message": "Final insights generated from provided data.",
        "duration_seconds": elapsed_seconds(started),
        "insights": insights,
    })))
}

/// `POST /summarize_trial_insights` — narrative summary of the detailed
/// insights produced by `/generate_insights`.
///
/// A generation failure here is reported in-band: HTTP 200 with
/// `status:"error"` and the failure message in `trial_summary`, so a
/// client rendering the summary always has text to show.
pub async fn summarize_trial_insights(
    State(ctx): State<ApiContext>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();

    let Some(detailed) = body.get("detailed_trial_insights").filter(|v| v.is_object()) else {
        return Err(ApiError::bad_request(
            "Missing or invalid 'detailed_trial_insights' JSON in request body. This should be \
             the JSON output from the '/generate_insights' endpoint.",
        ));
    };

    let insights_json = serde_json::to_string_pretty(detailed)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let summary_prompt = prompt::build_insight_summary_prompt(&insights_json);

    let (status, message, trial_summary) = match ctx
        .generator
        .generate(&summary_prompt, prompt::INSIGHT_SUMMARY_TEMPERATURE)
        .await
    {
        Ok(text) => (
            "success",
            "Trial insights summarized successfully.",
            insights::clean_summary(&text),
        ),
        Err(err) => {
            tracing::error!(error = %err, "insight summarization failed");
            (
                "error",
                "Failed to summarize trial insights. Please check the summary content for error details.",
                "Insights summary generation failed: could not reach the summarization service or an internal error occurred.".to_string(),
            )
        }
    };

    Ok(Json(json!({
        "status": status,
        "message": message,
        "duration_seconds": elapsed_seconds(started),
        "trial_summary": trial_summary,
    })))
}
