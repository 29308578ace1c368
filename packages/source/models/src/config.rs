//! API endpoint, credential and retry configuration.

use std::time::Duration;

use crate::Resource;

/// Default data.gov.in resource endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.data.gov.in/resource/";

/// District-wise crop production resource id.
pub const CROP_RESOURCE_ID: &str = "35be999b-0208-4354-b557-f6ca9a5355de";

/// Sub-division-wise rainfall resource id.
pub const RAIN_RESOURCE_ID: &str = "8e0bd482-4aba-4d99-9cb9-ff124f6f1c2f";

/// Last year of every analysis window. Fixed, never the current year.
pub const DEFAULT_ANALYSIS_END_YEAR: i32 = 2010;

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Total attempts per gateway call (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Page size requested from the API. Only the first page is read.
pub const DEFAULT_RECORDS_LIMIT: u32 = 5000;

/// Delay strategy between gateway attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry immediately.
    None,
    /// Wait the same duration before every retry.
    Fixed(Duration),
    /// Wait `base * 2^(retry - 1)`: base, 2×base, 4×base, …
    Exponential {
        /// Delay before the first retry.
        base: Duration,
    },
}

impl Backoff {
    /// Delay before retry number `retry` (1-based).
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(delay) => *delay,
            Self::Exponential { base } => {
                base.saturating_mul(1u32 << retry.saturating_sub(1).min(16))
            }
        }
    }
}

/// Retry ceiling plus backoff strategy for transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least 1.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::Exponential {
                base: Duration::from_millis(500),
            },
        }
    }
}

/// Everything the gateway and fetchers need to reach the two resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Resource endpoint prefix.
    pub base_url: String,
    /// Crop production resource id.
    pub crop_resource_id: String,
    /// Rainfall resource id.
    pub rain_resource_id: String,
    /// API key for the crop resource.
    pub crop_api_key: String,
    /// API key for the rainfall resource.
    pub rain_api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Transport retry policy.
    pub retry: RetryPolicy,
    /// Page size requested per call.
    pub records_limit: u32,
    /// Last year of every analysis window.
    pub analysis_end_year: i32,
}

impl ApiConfig {
    /// Configuration with default endpoints and the given keys.
    #[must_use]
    pub fn new(crop_api_key: impl Into<String>, rain_api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            crop_resource_id: CROP_RESOURCE_ID.to_string(),
            rain_resource_id: RAIN_RESOURCE_ID.to_string(),
            crop_api_key: crop_api_key.into(),
            rain_api_key: rain_api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            records_limit: DEFAULT_RECORDS_LIMIT,
            analysis_end_year: DEFAULT_ANALYSIS_END_YEAR,
        }
    }

    /// Points both resources at a different endpoint prefix.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the analysis end year.
    #[must_use]
    pub const fn with_end_year(mut self, year: i32) -> Self {
        self.analysis_end_year = year;
        self
    }

    /// Resource id for `resource`.
    #[must_use]
    pub fn resource_id(&self, resource: Resource) -> &str {
        match resource {
            Resource::CropProduction => &self.crop_resource_id,
            Resource::Rainfall => &self.rain_resource_id,
        }
    }

    /// API key for `resource`.
    #[must_use]
    pub fn api_key(&self, resource: Resource) -> &str {
        match resource {
            Resource::CropProduction => &self.crop_api_key,
            Resource::Rainfall => &self.rain_api_key,
        }
    }
}
