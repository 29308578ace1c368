//! Upstream connectivity probe.
//!
//! Runs the demo `COMPARE_ALL` and `MAX_MIN_CROP` queries, which between
//! them exercise both the rainfall and the crop resources.

use agri_data_analytics_models::{AnalysisRequest, AnalysisResult, Metric, demo};
use agri_data_reference::ReferenceTables;
use agri_data_source::AgriDataSource;
use serde::Serialize;

use crate::facade;

/// Outcome of one probe query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    /// Query that was run.
    pub metric: Metric,
    /// Whether it produced a result.
    pub ok: bool,
    /// Headline figure on success, error message on failure.
    pub detail: String,
}

/// Result of [`check_api_status`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatusReport {
    /// One entry per probe, in run order.
    pub probes: Vec<ProbeOutcome>,
}

impl ApiStatusReport {
    /// `true` when every probe succeeded.
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.probes.iter().all(|p| p.ok)
    }
}

fn describe(result: &AnalysisResult) -> String {
    match result {
        AnalysisResult::CompareAll(r) => r.rainfall_comparison.get(demo::STATE_X).map_or_else(
            || "Rainfall API working".to_string(),
            |s| {
                format!(
                    "Rainfall API working ({} data points for {})",
                    s.data_points,
                    demo::STATE_X
                )
            },
        ),
        AnalysisResult::MaxMinCrop(r) => r.districts.get(demo::STATE_X).map_or_else(
            || "Crop API working".to_string(),
            |d| {
                format!(
                    "Crop API working (top district {}: {})",
                    d.district(),
                    d.total_production()
                )
            },
        ),
        AnalysisResult::PolicyAdvice(_) => "Policy analysis working".to_string(),
    }
}

/// Runs the demo queries against `source` and reports each outcome.
pub async fn check_api_status(
    source: &dyn AgriDataSource,
    tables: &ReferenceTables,
) -> ApiStatusReport {
    let probes = [
        AnalysisRequest::CompareAll {
            state_x: demo::STATE_X.to_string(),
            state_y: demo::STATE_Y.to_string(),
            years: demo::YEARS,
            crop_type: demo::CROP_CATEGORY.to_string(),
        },
        AnalysisRequest::MaxMinCrop {
            state_x: demo::STATE_X.to_string(),
            state_y: demo::STATE_Y.to_string(),
            years: demo::YEARS,
            crop_z: demo::CROP.to_string(),
        },
    ];

    let mut outcomes = Vec::with_capacity(probes.len());
    for request in &probes {
        let outcome = match facade::run(source, tables, request).await {
            Ok(result) => ProbeOutcome {
                metric: request.metric(),
                ok: true,
                detail: describe(&result),
            },
            Err(e) => {
                log::warn!("{} probe failed: {e}", request.metric());
                ProbeOutcome {
                    metric: request.metric(),
                    ok: false,
                    detail: e.to_string(),
                }
            }
        };
        outcomes.push(outcome);
    }

    ApiStatusReport { probes: outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{StubSource, crop_record, rain_record};

    #[tokio::test]
    async fn reports_each_probe() {
        let stub = StubSource::new()
            .with_rainfall("Vidarbha", vec![rain_record("Vidarbha", 2009, "950.5")])
            .with_rainfall(
                "Coastal Karnataka",
                vec![rain_record("Coastal Karnataka", 2009, "3400")],
            )
            .with_crops("Maharashtra", vec![crop_record("PUNE", "Gram", 2009, "10")])
            .with_crops("Karnataka", vec![crop_record("BIDAR", "Tur", 2009, "8")]);

        let report = check_api_status(&stub, ReferenceTables::builtin()).await;

        assert_eq!(report.probes.len(), 2);
        assert!(!report.all_ok());

        let compare = &report.probes[0];
        assert_eq!(compare.metric, Metric::CompareAll);
        assert!(compare.ok);
        assert_eq!(
            compare.detail,
            "Rainfall API working (1 data points for Maharashtra)"
        );

        let max_min = &report.probes[1];
        assert_eq!(max_min.metric, Metric::MaxMinCrop);
        assert!(!max_min.ok);
        assert_eq!(max_min.detail, "No production data found for Rice in Maharashtra");
    }

    #[tokio::test]
    async fn all_ok_when_both_probes_pass() {
        let stub = StubSource::new()
            .with_rainfall("Marathwada", vec![rain_record("Marathwada", 2010, 700.0)])
            .with_rainfall(
                "North Interior Karnataka",
                vec![rain_record("North Interior Karnataka", 2010, 650.0)],
            )
            .with_crops("Maharashtra", vec![crop_record("KOLHAPUR", "Rice", 2010, 40.0)])
            .with_crops("Karnataka", vec![crop_record("MANDYA", "Rice", 2010, 20.0)]);

        let report = check_api_status(&stub, ReferenceTables::builtin()).await;
        assert!(report.all_ok());
        assert_eq!(
            report.probes[1].detail,
            "Crop API working (top district KOLHAPUR: 40)"
        );
    }
}
