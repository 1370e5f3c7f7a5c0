//! Trial intake endpoint: validate → fetch → normalize → summarize.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::api::endpoints::elapsed_seconds;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::insights::prompt;
use crate::registry::nct;
use crate::trial::normalize_study;

/// `POST /fetch_and_summarize` — resolve an NCT ID into a normalized
/// record plus an LLM trial summary.
///
/// The client retains `processed_data` and `original_input` from the
/// response and posts them back to `/generate_insights`; the server keeps
/// no per-request state.
pub async fn fetch_and_summarize(
    State(ctx): State<ApiContext>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();

    let Some(nct_id) = body.get("nct_id").and_then(Value::as_str) else {
        return Err(ApiError::bad_request("Missing 'nct_id'"));
    };
    let Some(indication) = body.get("indication").and_then(Value::as_str) else {
        return Err(ApiError::bad_request("Missing 'indication'"));
    };

    let nct_id = nct::canonicalize(nct_id);

    if !nct::is_valid_nct_format(&nct_id) {
        let suggestions = ctx.registry.suggest_by_condition(indication).await;
        return Err(ApiError::bad_request_with(
            format!("Invalid NCT ID format: '{nct_id}'."),
            suggestions,
        ));
    }

    if !ctx.registry.exists(&nct_id).await {
        let suggestions = ctx.registry.suggest_by_condition(indication).await;
        return Err(ApiError::not_found(
            format!("NCT ID '{nct_id}' not found."),
            suggestions,
        ));
    }

    let document = match ctx.registry.fetch_study(&nct_id).await {
        Ok(document) => document,
        Err(err) => {
            let suggestions = ctx.registry.suggest_by_condition(indication).await;
            return Err(ApiError::upstream(
                format!("Fetch error for {nct_id}: {err}"),
                suggestions,
            ));
        }
    };

    let record = normalize_study(&document);
    if record.nct_id.is_none() {
        return Err(ApiError::Internal(format!(
            "Failed to process critical data for {nct_id}."
        )));
    }

    // Summarization is best-effort: an unreachable generation service
    // degrades the summary text, not the whole response.
    let summary_prompt = prompt::build_trial_summary_prompt(&record);
    let trial_summary = match ctx
        .generator
        .generate(&summary_prompt, prompt::SUMMARY_TEMPERATURE)
        .await
    {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(%nct_id, error = %err, "trial summarization failed");
            format!("Summary generation failed: {err}")
        }
    };

    Ok(Json(json!({
        "status": "success",
        "message": "Trial data processed and summarized. Client should retain \
                    'processed_data' and 'original_input' for the next step.",
        "duration_seconds": elapsed_seconds(started),
        "trial_summary": trial_summary,
        "processed_data": record,
        "original_input": body,
    })))
}
