//! Single JSON entry point for agents.
//!
//! Whatever happens, the caller gets a pretty-printed JSON string: either
//! an [`AnalysisResult`] or an `{"error": "..."}` payload.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use agri_data_analytics_models::{AnalysisRequest, AnalysisResult, ErrorPayload, ToolInput};
use agri_data_reference::ReferenceTables;
use agri_data_source::AgriDataSource;
use futures::FutureExt as _;

use crate::{AnalyticsError, tools};

/// Runs a validated request.
///
/// # Errors
///
/// Returns whatever [`AnalyticsError`] the underlying analysis reports.
pub async fn run(
    source: &dyn AgriDataSource,
    tables: &ReferenceTables,
    request: &AnalysisRequest,
) -> Result<AnalysisResult, AnalyticsError> {
    log::info!("Running {} analysis", request.metric());

    Ok(match request {
        AnalysisRequest::CompareAll {
            state_x,
            state_y,
            years,
            crop_type,
        } => AnalysisResult::CompareAll(
            tools::compare_rainfall_and_crops(source, tables, state_x, state_y, *years, crop_type)
                .await?,
        ),
        AnalysisRequest::MaxMinCrop {
            state_x,
            state_y,
            years,
            crop_z,
        } => AnalysisResult::MaxMinCrop(
            tools::find_max_min_districts(source, state_x, state_y, crop_z, *years).await?,
        ),
        AnalysisRequest::PolicyAdvice {
            state_x,
            state_y,
            years,
        } => AnalysisResult::PolicyAdvice(
            tools::analyze_correlation_and_policy(source, tables, state_x, state_y, *years).await?,
        ),
    })
}

/// Validates tool input, runs the analysis and renders the outcome.
///
/// A panic inside the analysis is caught and reported as
/// `"Analysis failed: <message>"`.
pub async fn analyze(
    source: &dyn AgriDataSource,
    tables: &ReferenceTables,
    input: ToolInput,
) -> String {
    let request = match AnalysisRequest::try_from(input) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected tool input: {e}");
            return error_json(e);
        }
    };

    match AssertUnwindSafe(run(source, tables, &request))
        .catch_unwind()
        .await
    {
        Ok(Ok(result)) => serde_json::to_string_pretty(&result)
            .unwrap_or_else(|e| error_json(AnalyticsError::Serialization(e))),
        Ok(Err(e)) => {
            log::warn!("{} analysis failed: {e}", request.metric());
            error_json(e)
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            log::error!("{} analysis panicked: {message}", request.metric());
            error_json(format!("Analysis failed: {message}"))
        }
    }
}

/// Same as [`analyze`], taking the raw tool-call argument object.
pub async fn analyze_json(
    source: &dyn AgriDataSource,
    tables: &ReferenceTables,
    arguments: &serde_json::Value,
) -> String {
    match ToolInput::from_json(arguments) {
        Ok(input) => analyze(source, tables, input).await,
        Err(e) => error_json(e),
    }
}

fn error_json(error: impl std::fmt::Display) -> String {
    serde_json::to_string_pretty(&ErrorPayload::new(error)).unwrap_or_default()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
