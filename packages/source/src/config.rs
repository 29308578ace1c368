//! Environment-driven [`ApiConfig`] loading.
//!
//! `CROP_API_KEY` and `RAIN_API_KEY` are required. Optional overrides:
//! `DATA_GOV_BASE_URL`, `ANALYSIS_END_YEAR`, `API_TIMEOUT_SECS`,
//! `API_MAX_RETRIES` and `RECORDS_LIMIT`.

use std::str::FromStr;
use std::time::Duration;

use agri_data_source_models::ApiConfig;

use crate::SourceError;

/// Builds an [`ApiConfig`] from environment variables.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if an API key is missing or an
/// override does not parse.
pub fn from_env() -> Result<ApiConfig, SourceError> {
    from_lookup(|name| std::env::var(name).ok())
}

/// Same as [`from_env`] with an injectable variable lookup.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if an API key is missing or an
/// override does not parse.
pub fn from_lookup<F>(lookup: F) -> Result<ApiConfig, SourceError>
where
    F: Fn(&str) -> Option<String>,
{
    let crop_key = required(&lookup, "CROP_API_KEY")?;
    let rain_key = required(&lookup, "RAIN_API_KEY")?;

    let mut config = ApiConfig::new(crop_key, rain_key);

    if let Some(base_url) = lookup("DATA_GOV_BASE_URL").filter(|v| !v.trim().is_empty()) {
        config.base_url = base_url;
    }
    if let Some(year) = optional::<i32, _>(&lookup, "ANALYSIS_END_YEAR")? {
        config.analysis_end_year = year;
    }
    if let Some(secs) = optional::<u64, _>(&lookup, "API_TIMEOUT_SECS")? {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(attempts) = optional::<u32, _>(&lookup, "API_MAX_RETRIES")? {
        config.retry.max_attempts = attempts.max(1);
    }
    if let Some(limit) = optional::<u32, _>(&lookup, "RECORDS_LIMIT")? {
        config.records_limit = limit;
    }

    log::debug!(
        "API config: base={} end_year={} attempts={}",
        config.base_url,
        config.analysis_end_year,
        config.retry.max_attempts
    );

    Ok(config)
}

fn required<F>(lookup: &F, name: &str) -> Result<String, SourceError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SourceError::Config {
            message: format!("{name} environment variable not set"),
        })
}

fn optional<T, F>(lookup: &F, name: &str) -> Result<Option<T>, SourceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| SourceError::Config {
            message: format!("Invalid {name} '{raw}': {e}"),
        })
}
