#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Retry-tolerant access to the data.gov.in crop and rainfall resources.
//!
//! The [`AgriDataSource`] trait is the seam between data retrieval and
//! the analytics engine. [`DataGovSource`] implements it on top of the
//! HTTP [`gateway::Gateway`]; tests implement it in memory.

pub mod config;
pub mod crop;
pub mod gateway;
pub mod parsing;
pub mod rainfall;
pub mod retry;

use agri_data_source_models::{ApiConfig, FetchResult};
use async_trait::async_trait;

use crate::gateway::Gateway;

/// Errors that can occur while talking to the upstream API.
///
/// These stay inside the gateway; callers only ever see
/// [`FetchResult`] failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upstream answered with a non-success status and no usable body.
    #[error("HTTP status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// Every attempt failed without a recorded reason.
    #[error("Request failed after {attempts} attempts")]
    RetriesExhausted {
        /// Attempts made.
        attempts: u32,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

/// Domain-level access to crop and rainfall records.
///
/// Implementations return cleaned, year-bounded records plus a citation
/// URL, and never fail: problems surface as `success = false`.
#[async_trait]
pub trait AgriDataSource: Send + Sync {
    /// Crop production records for `state` over the trailing `years`,
    /// optionally filtered to one crop.
    async fn fetch_crop(&self, state: &str, years: u32, crop: Option<&str>) -> FetchResult;

    /// Annual rainfall records for the given IMD subdivisions over the
    /// trailing `years`.
    async fn fetch_rainfall(&self, subdivisions: &[String], years: u32) -> FetchResult;
}

/// [`AgriDataSource`] backed by the live data.gov.in API.
#[derive(Debug, Clone)]
pub struct DataGovSource {
    gateway: Gateway,
    config: ApiConfig,
}

impl DataGovSource {
    /// Creates a source for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, SourceError> {
        Ok(Self {
            gateway: Gateway::new(&config)?,
            config,
        })
    }

    /// Creates a source from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if required variables are missing.
    pub fn from_env() -> Result<Self, SourceError> {
        Self::new(config::from_env()?)
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait]
impl AgriDataSource for DataGovSource {
    async fn fetch_crop(&self, state: &str, years: u32, crop: Option<&str>) -> FetchResult {
        crop::fetch_crop(&self.gateway, &self.config, state, years, crop).await
    }

    async fn fetch_rainfall(&self, subdivisions: &[String], years: u32) -> FetchResult {
        rainfall::fetch_rainfall(&self.gateway, &self.config, subdivisions, years).await
    }
}
