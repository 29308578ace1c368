//! Filtered request gateway for data.gov.in resources.
//!
//! Every fetch goes through [`Gateway::call`], which issues one GET with
//! the resource's API key, a fixed page (`offset=0`) and one
//! `filters[<field>]` parameter per filter, retries transport failures
//! via [`crate::retry`], and classifies the JSON envelope into a
//! [`FetchResult`]. Failures are returned as values.

use std::time::Duration;

use agri_data_source_models::{ApiConfig, FetchResult, RawRecord, RetryPolicy};
use serde::Deserialize;

use crate::{SourceError, retry};

/// Browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Query parameter carrying the API key. Stripped from cited URLs.
const API_KEY_PARAM: &str = "api-key";

/// Message for responses that are neither `ok` nor `error`.
pub const NO_DATA_MESSAGE: &str = "No data found for the given filters";

/// The data.gov.in response envelope. Every field is optional because
/// malformed responses must classify as "no data", not as a parse error.
#[derive(Debug, Deserialize)]
struct Envelope {
    status: Option<String>,
    records: Option<Vec<serde_json::Value>>,
    total: Option<serde_json::Value>,
    message: Option<String>,
}

/// Stateless HTTP gateway shared by the crop and rainfall fetchers.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl Gateway {
    /// Builds a gateway from the API configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, SourceError> {
        Self::with_timeout(&config.base_url, config.retry, config.timeout)
    }

    /// Builds a gateway for an arbitrary endpoint prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn with_timeout(
        base_url: &str,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            retry,
        })
    }

    /// Fetches up to `limit` records of `resource_id` matching `filters`.
    ///
    /// Never fails: transport errors (after retries), upstream error
    /// responses and unrecognised envelopes all come back as
    /// `success = false`.
    pub async fn call(
        &self,
        resource_id: &str,
        api_key: &str,
        filters: &[(&str, &str)],
        limit: u32,
    ) -> FetchResult {
        let url = resource_url(&self.base_url, resource_id);
        let query = build_query(api_key, filters, limit);

        log::info!("Fetching {resource_id} with {} filter(s)", filters.len());

        match retry::send_json(|| self.client.get(&url).query(&query), &self.retry).await {
            Ok(response) => {
                let cited = citation_url(&response.url);
                let result = classify(response.body, cited);
                if result.success {
                    log::debug!("{resource_id}: {} records", result.records.len());
                } else {
                    log::warn!("{resource_id}: {}", result.error_message());
                }
                result
            }
            Err(e) => {
                log::warn!("{resource_id}: request failed: {e}");
                FetchResult::failed(format!("API Request Failed: {e}"), url)
            }
        }
    }
}

/// Joins the endpoint prefix and resource id with exactly one slash.
fn resource_url(base_url: &str, resource_id: &str) -> String {
    format!("{}/{resource_id}", base_url.trim_end_matches('/'))
}

fn build_query(api_key: &str, filters: &[(&str, &str)], limit: u32) -> Vec<(String, String)> {
    let mut query = vec![
        (API_KEY_PARAM.to_string(), api_key.to_string()),
        ("format".to_string(), "json".to_string()),
        ("limit".to_string(), limit.to_string()),
        ("offset".to_string(), "0".to_string()),
    ];
    query.extend(
        filters
            .iter()
            .map(|(field, value)| (format!("filters[{field}]"), (*value).to_string())),
    );
    query
}

/// The resolved request URL without the API key.
fn citation_url(url: &reqwest::Url) -> String {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| &**key != API_KEY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut cited = url.clone();
    cited.set_query(None);
    if !kept.is_empty() {
        cited.query_pairs_mut().extend_pairs(kept);
    }
    cited.to_string()
}

/// Classifies a decoded response body.
fn classify(body: serde_json::Value, url: String) -> FetchResult {
    let Ok(envelope) = serde_json::from_value::<Envelope>(body) else {
        return FetchResult::failed(NO_DATA_MESSAGE, url);
    };

    match envelope.status.as_deref() {
        Some("ok") => {
            let records: Vec<RawRecord> = envelope
                .records
                .unwrap_or_default()
                .into_iter()
                .filter_map(RawRecord::from_value)
                .collect();
            let total = envelope
                .total
                .as_ref()
                .and_then(parse_total)
                .unwrap_or(records.len() as u64);
            FetchResult::ok(records, total, url)
        }
        Some("error") => FetchResult::failed(
            format!(
                "API Error: {}",
                envelope.message.as_deref().unwrap_or("Unknown error")
            ),
            url,
        ),
        _ => FetchResult::failed(NO_DATA_MESSAGE, url),
    }
}

fn parse_total(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
