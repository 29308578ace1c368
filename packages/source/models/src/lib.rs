#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Upstream record and fetch result types for the data.gov.in resources.
//!
//! Government records arrive as loosely typed JSON objects.
//! [`RawRecord`] keeps them that way; numeric fields are only read
//! through the sanitizer in `agri_data_source::parsing`.

pub mod config;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use config::{ApiConfig, Backoff, RetryPolicy};

/// Field names of the district-wise crop production resource.
pub mod crop_fields {
    /// Administrative state name (server-side filter).
    pub const STATE: &str = "state_name";
    /// District name.
    pub const DISTRICT: &str = "district_name";
    /// Crop name (server-side filter).
    pub const CROP: &str = "crop";
    /// Agricultural reporting year.
    pub const YEAR: &str = "crop_year";
    /// Production volume.
    pub const PRODUCTION: &str = "production_";
    /// Cultivated area.
    pub const AREA: &str = "area_";
}

/// Field names of the subdivision-wise rainfall resource.
pub mod rainfall_fields {
    /// IMD subdivision name (server-side filter).
    pub const SUBDIVISION: &str = "subdivision";
    /// Calendar year.
    pub const YEAR: &str = "year";
    /// Annual rainfall in millimetres.
    pub const ANNUAL: &str = "annual";
}

/// The two upstream resources.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
    /// District-wise season-wise crop production statistics.
    CropProduction,
    /// Sub-division-wise annual rainfall.
    Rainfall,
}

/// One government record as returned by the API.
///
/// Values are whatever the upstream sent: strings, numbers, or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(serde_json::Map<String, serde_json::Value>);

impl RawRecord {
    /// Wraps an already-parsed JSON object.
    #[must_use]
    pub const fn new(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(fields)
    }

    /// Converts an arbitrary JSON value, returning `None` for non-objects.
    #[must_use]
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Raw field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.0.get(field)
    }

    /// Text form of a field: strings as-is, numbers formatted, anything
    /// else `None`.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Text form of a field, or `default` when missing.
    #[must_use]
    pub fn text_or(&self, field: &str, default: &str) -> String {
        self.text(field).unwrap_or_else(|| default.to_string())
    }

    /// Overwrites a field with a number. Non-finite values become null.
    pub fn set_number(&mut self, field: &str, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map_or(serde_json::Value::Null, serde_json::Value::Number);
        self.0.insert(field.to_string(), value);
    }

    /// Borrows the underlying JSON object.
    #[must_use]
    pub const fn fields(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for RawRecord {
    fn from(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(fields)
    }
}

/// Outcome of one fetch: either a record set with its citation URL or
/// an error message. Failures are values, never panics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult {
    /// Whether usable data came back.
    pub success: bool,
    /// The records, in upstream order.
    pub records: Vec<RawRecord>,
    /// Upstream-reported or recomputed record count.
    pub total: u64,
    /// Source URL for citation (may be empty on failure).
    pub url: String,
    /// Failure description when `success` is `false`.
    pub error: Option<String>,
}

impl FetchResult {
    /// A successful result.
    #[must_use]
    pub fn ok(records: Vec<RawRecord>, total: u64, url: impl Into<String>) -> Self {
        Self {
            success: true,
            records,
            total,
            url: url.into(),
            error: None,
        }
    }

    /// A failed result.
    #[must_use]
    pub fn failed(error: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            success: false,
            records: Vec::new(),
            total: 0,
            url: url.into(),
            error: Some(error.into()),
        }
    }

    /// The error message, or `"Unknown error"` when none was recorded.
    #[must_use]
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("Unknown error")
    }
}

/// Closed interval of years `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    /// First admitted year.
    pub start: i32,
    /// Last admitted year.
    pub end: i32,
}

impl YearWindow {
    /// The `years` most recent years ending at `end_year` inclusive.
    ///
    /// `years == 0` produces an empty window.
    #[must_use]
    pub fn trailing(end_year: i32, years: u32) -> Self {
        let span = i32::try_from(years).unwrap_or(i32::MAX);
        Self {
            start: end_year.saturating_sub(span).saturating_add(1),
            end: end_year,
        }
    }

    /// Whether `year` lies inside the window.
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}
