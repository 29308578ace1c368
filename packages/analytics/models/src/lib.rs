#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Request and result types for the agricultural analysis tool.
//!
//! A loose [`ToolInput`] (as emitted by an LLM tool call) converts into a
//! tagged [`AnalysisRequest`] that carries exactly the fields its metric
//! needs. Each analysis produces one [`AnalysisResult`] variant, all of
//! which carry a citation map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Tool name advertised to agents.
pub const TOOL_NAME: &str = "analyze_agricultural_data";

/// Defaults used by demo queries and the API status check.
pub mod demo {
    /// First demo state.
    pub const STATE_X: &str = "Maharashtra";
    /// Second demo state.
    pub const STATE_Y: &str = "Karnataka";
    /// Demo window length.
    pub const YEARS: u32 = 5;
    /// Demo crop for `MAX_MIN_CROP`.
    pub const CROP: &str = "Rice";
    /// Demo category for `COMPARE_ALL`.
    pub const CROP_CATEGORY: &str = "Pulses";
}

/// Analysis types the tool supports.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Metric {
    /// Rainfall comparison plus top crops of a category.
    CompareAll,
    /// Max-producing district in one state vs min in another.
    MaxMinCrop,
    /// Rainfall/production correlation and policy recommendations.
    PolicyAdvice,
}

/// Errors converting loose tool input into an [`AnalysisRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// A parameter the metric needs was absent or blank.
    #[error("{field} required for {metric} metric")]
    MissingParameter {
        /// Parameter name.
        field: &'static str,
        /// Metric that needs it.
        metric: Metric,
    },

    /// The metric string is not one of the supported values.
    #[error("Unknown metric: {metric}")]
    UnknownMetric {
        /// The value as received.
        metric: String,
    },

    /// The tool-call payload did not have the expected shape.
    #[error("Invalid tool input: {message}")]
    Malformed {
        /// Description.
        message: String,
    },
}

/// Tool-call arguments exactly as an agent sends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInput {
    /// First state name.
    pub state_x: String,
    /// Second state name.
    pub state_y: String,
    /// Number of trailing years to analyze.
    pub years: u32,
    /// `COMPARE_ALL`, `MAX_MIN_CROP` or `POLICY_ADVICE`.
    pub metric: String,
    /// Crop category, needed by `COMPARE_ALL`.
    #[serde(default)]
    pub crop_type: Option<String>,
    /// Crop name, needed by `MAX_MIN_CROP`.
    #[serde(default)]
    pub crop_z: Option<String>,
}

impl ToolInput {
    /// Parses a raw tool-call argument object.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Malformed`] if required fields are missing
    /// or have the wrong type.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, RequestError> {
        Self::deserialize(value).map_err(|e| RequestError::Malformed {
            message: e.to_string(),
        })
    }
}

/// A validated analysis request, one variant per metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "metric", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisRequest {
    /// Compare rainfall and rank crops of one category.
    CompareAll {
        /// First state.
        state_x: String,
        /// Second state.
        state_y: String,
        /// Window length.
        years: u32,
        /// Crop category name.
        crop_type: String,
    },
    /// Max district for `state_x` against min district for `state_y`.
    MaxMinCrop {
        /// State whose maximum district is reported.
        state_x: String,
        /// State whose minimum district is reported.
        state_y: String,
        /// Window length.
        years: u32,
        /// Crop name.
        crop_z: String,
    },
    /// Correlation analysis and recommendations.
    PolicyAdvice {
        /// First state.
        state_x: String,
        /// Second state.
        state_y: String,
        /// Window length.
        years: u32,
    },
}

impl AnalysisRequest {
    /// The metric this request runs.
    #[must_use]
    pub const fn metric(&self) -> Metric {
        match self {
            Self::CompareAll { .. } => Metric::CompareAll,
            Self::MaxMinCrop { .. } => Metric::MaxMinCrop,
            Self::PolicyAdvice { .. } => Metric::PolicyAdvice,
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<ToolInput> for AnalysisRequest {
    type Error = RequestError;

    fn try_from(input: ToolInput) -> Result<Self, Self::Error> {
        let metric: Metric =
            input
                .metric
                .parse()
                .map_err(|_| RequestError::UnknownMetric {
                    metric: input.metric.clone(),
                })?;

        let ToolInput {
            state_x,
            state_y,
            years,
            crop_type,
            crop_z,
            ..
        } = input;

        Ok(match metric {
            Metric::CompareAll => Self::CompareAll {
                state_x,
                state_y,
                years,
                crop_type: present(crop_type).ok_or(RequestError::MissingParameter {
                    field: "crop_type",
                    metric,
                })?,
            },
            Metric::MaxMinCrop => Self::MaxMinCrop {
                state_x,
                state_y,
                years,
                crop_z: present(crop_z).ok_or(RequestError::MissingParameter {
                    field: "crop_z",
                    metric,
                })?,
            },
            Metric::PolicyAdvice => Self::PolicyAdvice {
                state_x,
                state_y,
                years,
            },
        })
    }
}

/// Logical source name to cited URL.
pub type Citations = BTreeMap<String, String>;

/// Citation key for a state's rainfall source.
#[must_use]
pub fn rainfall_citation_key(state: &str) -> String {
    format!("{state}_rainfall")
}

/// Citation key for a state's crop source.
#[must_use]
pub fn crops_citation_key(state: &str) -> String {
    format!("{state}_crops")
}

/// Rainfall summary for one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallSummary {
    /// Mean of positive annual values, 2 dp.
    pub average_annual_rainfall_mm: f64,
    /// Number of positive annual values averaged.
    pub data_points: usize,
    /// Subdivisions queried.
    pub subdivisions: Vec<String>,
    /// Citation URL.
    pub source_url: String,
}

/// One ranked crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropTotal {
    /// Crop name as reported upstream.
    pub crop: String,
    /// Summed production, 2 dp.
    pub total_production: f64,
}

/// Top crops of a category for one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSummary {
    /// At most three crops, largest first.
    pub top_3_crops: Vec<CropTotal>,
    /// Citation URL.
    pub source_url: String,
}

/// `COMPARE_ALL` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// The two states queried.
    pub states: Vec<String>,
    /// Window length requested.
    pub years_analyzed: u32,
    /// Crop category requested.
    pub crop_type: String,
    /// Per-state rainfall summary.
    pub rainfall_comparison: BTreeMap<String, RainfallSummary>,
    /// Per-state top crops.
    pub crop_comparison: BTreeMap<String, CropSummary>,
    /// `<state>_rainfall` and `<state>_crops` entries.
    pub citations: Citations,
}

/// Highest-producing district of `state_x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxDistrict {
    /// District name.
    pub max_production_district: String,
    /// Summed production, 2 dp.
    pub total_production: f64,
    /// Citation URL.
    pub source_url: String,
}

/// Lowest positive-producing district of `state_y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinDistrict {
    /// District name.
    pub min_production_district: String,
    /// Summed production, 2 dp.
    pub total_production: f64,
    /// Citation URL.
    pub source_url: String,
}

/// A state's entry in an [`ExtremalResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DistrictExtreme {
    /// `state_x` side.
    Max(MaxDistrict),
    /// `state_y` side.
    Min(MinDistrict),
}

impl DistrictExtreme {
    /// District name on either side.
    #[must_use]
    pub fn district(&self) -> &str {
        match self {
            Self::Max(d) => &d.max_production_district,
            Self::Min(d) => &d.min_production_district,
        }
    }

    /// Rounded total on either side.
    #[must_use]
    pub const fn total_production(&self) -> f64 {
        match self {
            Self::Max(d) => d.total_production,
            Self::Min(d) => d.total_production,
        }
    }
}

/// Marker serialized as the string `"Infinite"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unbounded {
    /// Minimum total was zero.
    Infinite,
}

/// Max over min production.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductionRatio {
    /// Ratio rounded to 2 dp.
    Finite(f64),
    /// Division by a zero minimum.
    Unbounded(Unbounded),
}

impl ProductionRatio {
    /// `max / min` rounded to 2 dp, or `"Infinite"` when `min` is zero.
    #[must_use]
    pub fn between(max: f64, min: f64) -> Self {
        if min > 0.0 {
            Self::Finite(((max / min) * 100.0).round() / 100.0)
        } else {
            Self::Unbounded(Unbounded::Infinite)
        }
    }
}

/// The `comparison` block of an [`ExtremalResult`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductionComparison {
    /// Max over min.
    pub production_ratio: ProductionRatio,
    /// Max minus min, 2 dp.
    pub difference: f64,
}

/// `MAX_MIN_CROP` output.
///
/// State entries are flattened into the top-level object, keyed by state
/// name. When both states are the same, the `state_y` entry wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremalResult {
    /// Crop analyzed.
    pub crop: String,
    /// Window length requested.
    pub years_analyzed: u32,
    /// Per-state district extreme.
    #[serde(flatten)]
    pub districts: BTreeMap<String, DistrictExtreme>,
    /// Ratio and difference between the two totals.
    pub comparison: ProductionComparison,
    /// State name to crop source URL.
    pub citations: Citations,
}

/// Source URLs behind one state's analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSources {
    /// Rainfall citation.
    pub rainfall: String,
    /// Crop citation.
    pub crops: String,
}

/// Correlation analysis for one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateAnalysis {
    /// Mean of the per-year rainfall means, 2 dp.
    pub avg_annual_rainfall_mm: f64,
    /// Mean yearly production of high water-use crops, 2 dp.
    pub high_water_crop_production_avg: f64,
    /// Mean yearly production of low water-use crops, 2 dp.
    pub low_water_crop_production_avg: f64,
    /// Pearson r, 3 dp; `None` when a series has no variance.
    pub correlation_rainfall_vs_high_water_crops: Option<f64>,
    /// Pearson r, 3 dp; `None` when a series has no variance.
    pub correlation_rainfall_vs_low_water_crops: Option<f64>,
    /// Number of years present in all three series.
    pub years_analyzed: usize,
    /// Where the numbers came from.
    pub sources: StateSources,
}

/// One policy recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// State it applies to.
    pub state: String,
    /// The advice.
    pub recommendation: String,
    /// Why it follows from the data.
    pub rationale: String,
    /// Supporting figure or observation.
    pub supporting_data: String,
}

/// `POLICY_ADVICE` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyResult {
    /// The two states queried.
    pub states: Vec<String>,
    /// Window length requested.
    pub years_analyzed: u32,
    /// States with enough data, keyed by name.
    pub state_analysis: BTreeMap<String, StateAnalysis>,
    /// Recommendations in state order.
    pub policy_recommendations: Vec<Recommendation>,
    /// `<state>_rainfall` and `<state>_crops` for each analyzed state.
    pub citations: Citations,
}

/// Output of any analysis, tagged by `query_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "query_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisResult {
    /// `COMPARE_ALL`.
    CompareAll(ComparisonResult),
    /// `MAX_MIN_CROP`.
    MaxMinCrop(ExtremalResult),
    /// `POLICY_ADVICE`.
    PolicyAdvice(PolicyResult),
}

impl AnalysisResult {
    /// Citation map of whichever variant this is.
    #[must_use]
    pub const fn citations(&self) -> &Citations {
        match self {
            Self::CompareAll(r) => &r.citations,
            Self::MaxMinCrop(r) => &r.citations,
            Self::PolicyAdvice(r) => &r.citations,
        }
    }

    /// Metric that produced this result.
    #[must_use]
    pub const fn metric(&self) -> Metric {
        match self {
            Self::CompareAll(_) => Metric::CompareAll,
            Self::MaxMinCrop(_) => Metric::MaxMinCrop,
            Self::PolicyAdvice(_) => Metric::PolicyAdvice,
        }
    }
}

/// `{"error": "..."}` payload returned in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable message.
    pub error: String,
}

impl ErrorPayload {
    /// Wraps any displayable error.
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// JSON Schema description of the tool for an agent's tool list.
#[must_use]
pub fn tool_definition() -> serde_json::Value {
    serde_json::json!({
        "name": TOOL_NAME,
        "description": "Analyzes Indian agricultural production and climate data from data.gov.in. Compare rainfall between states and rank top crops of a category (metric='COMPARE_ALL'), find the districts with maximum and minimum production of a crop (metric='MAX_MIN_CROP'), or analyze production-rainfall correlations and get policy recommendations (metric='POLICY_ADVICE'). All data is sourced from live government APIs with full citations.",
        "parameters": {
            "type": "object",
            "properties": {
                "state_x": { "type": "string", "description": "First state name (e.g., 'Maharashtra')" },
                "state_y": { "type": "string", "description": "Second state name (e.g., 'Karnataka')" },
                "years": { "type": "integer", "minimum": 1, "description": "Number of years to analyze (e.g., 5)" },
                "metric": {
                    "type": "string",
                    "enum": ["COMPARE_ALL", "MAX_MIN_CROP", "POLICY_ADVICE"],
                    "description": "Analysis type"
                },
                "crop_type": { "type": "string", "description": "Crop category for COMPARE_ALL: 'Cereals', 'Pulses', 'Oilseeds', 'Cash Crops', 'Spices', 'Fruits', 'Vegetables'" },
                "crop_z": { "type": "string", "description": "Specific crop name for MAX_MIN_CROP (e.g., 'Rice', 'Wheat')" }
            },
            "required": ["state_x", "state_y", "years", "metric"]
        }
    })
}
