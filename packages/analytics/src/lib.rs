#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crop and rainfall analyses for the agricultural data tool.
//!
//! Each analysis in [`tools`] reads through an
//! [`agri_data_source::AgriDataSource`] and the shared
//! [`agri_data_reference::ReferenceTables`], and returns a typed result.
//! [`facade`] is the single JSON entry point an agent calls.

pub mod facade;
pub mod stats;
pub mod status;
pub mod tools;

#[cfg(test)]
mod stub;

use agri_data_analytics_models::RequestError;
use thiserror::Error;

/// Errors that can occur during an analysis.
///
/// The `Display` text is what the tool returns as its `error` field.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The state has no IMD subdivision mapping.
    #[error(
        "No IMD subdivision mapping found for {state}. Please update the subdivision table with correct subdivision names."
    )]
    UnmappedState {
        /// State as requested.
        state: String,
    },

    /// The crop category is not in the reference tables.
    #[error("Unknown crop type: {category}. Valid types: {valid}")]
    UnknownCropCategory {
        /// Category as requested.
        category: String,
        /// Comma-separated known categories.
        valid: String,
    },

    /// Rainfall fetch failed.
    #[error("Failed to fetch rainfall data for {state}: {message}")]
    RainfallFetch {
        /// State being analyzed.
        state: String,
        /// Fetcher error.
        message: String,
    },

    /// Unfiltered crop fetch failed.
    #[error("Failed to fetch crop data for {state}: {message}")]
    CropFetch {
        /// State being analyzed.
        state: String,
        /// Fetcher error.
        message: String,
    },

    /// Single-crop fetch failed.
    #[error("Failed to fetch {crop} data for {state}: {message}")]
    CropFetchFor {
        /// Crop requested.
        crop: String,
        /// State being analyzed.
        state: String,
        /// Fetcher error.
        message: String,
    },

    /// Rainfall records existed but none had a positive annual value.
    #[error("No valid rainfall data found for {state} in the specified period")]
    NoRainfallData {
        /// State being analyzed.
        state: String,
    },

    /// No district qualified for the extremal lookup.
    #[error("No production data found for {crop} in {state}")]
    NoProduction {
        /// Crop requested.
        crop: String,
        /// State being analyzed.
        state: String,
    },

    /// Tool input did not form a valid request.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Result could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
