//! Subdivision-wise rainfall fetcher.
//!
//! The rainfall resource filters on the exact subdivision string, so a
//! state spanning several subdivisions needs one gateway call per
//! subdivision. Calls run sequentially and results are concatenated in
//! subdivision order.

use agri_data_source_models::{
    ApiConfig, FetchResult, RawRecord, Resource, YearWindow, rainfall_fields,
};

use crate::gateway::Gateway;
use crate::parsing::{parse_year, sanitize};

/// Message when every call succeeded but none produced records.
pub const NO_RAINFALL_MESSAGE: &str = "No rainfall records found for the given subdivisions";

/// Fetches rainfall for each subdivision and merges the cleaned records.
pub async fn fetch_rainfall(
    gateway: &Gateway,
    config: &ApiConfig,
    subdivisions: &[String],
    years: u32,
) -> FetchResult {
    let window = YearWindow::trailing(config.analysis_end_year, years);
    let mut results = Vec::with_capacity(subdivisions.len());

    for subdivision in subdivisions {
        let mut result = gateway
            .call(
                config.resource_id(Resource::Rainfall),
                config.api_key(Resource::Rainfall),
                &[(rainfall_fields::SUBDIVISION, subdivision.as_str())],
                config.records_limit,
            )
            .await;
        if result.success {
            result.records = clean_rainfall_records(std::mem::take(&mut result.records), window);
            result.total = result.records.len() as u64;
        }
        results.push((subdivision.clone(), result));
    }

    merge_subdivision_results(results)
}

/// Drops records with an unparsable or out-of-window `year` and
/// sanitizes `annual` in place.
#[must_use]
pub fn clean_rainfall_records(records: Vec<RawRecord>, window: YearWindow) -> Vec<RawRecord> {
    records
        .into_iter()
        .filter(|r| parse_year(r.get(rainfall_fields::YEAR)).is_some_and(|y| window.contains(y)))
        .map(|mut r| {
            let annual = sanitize(r.get(rainfall_fields::ANNUAL), 0.0);
            r.set_number(rainfall_fields::ANNUAL, annual);
            r
        })
        .collect()
}

/// Concatenates per-subdivision results.
///
/// Success means at least one record overall. With zero records, the
/// failure carries every per-subdivision error if any call failed, or a
/// generic message otherwise. The citation URL joins all successful
/// call URLs with `" | "`.
#[must_use]
pub fn merge_subdivision_results(results: Vec<(String, FetchResult)>) -> FetchResult {
    let mut records = Vec::new();
    let mut urls = Vec::new();
    let mut errors = Vec::new();

    for (subdivision, result) in results {
        if result.success {
            urls.push(result.url);
            records.extend(result.records);
        } else {
            errors.push(format!("{subdivision}: {}", result.error_message()));
        }
    }

    if records.is_empty() {
        if errors.is_empty() {
            return FetchResult::failed(NO_RAINFALL_MESSAGE, urls.join(" | "));
        }
        return FetchResult::failed(
            format!("Failed to fetch data: {}", errors.join("; ")),
            String::new(),
        );
    }

    if !errors.is_empty() {
        log::warn!("Partial rainfall data: {}", errors.join("; "));
    }

    let total = records.len() as u64;
    FetchResult::ok(records, total, urls.join(" | "))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> RawRecord {
        RawRecord::from_value(value).unwrap()
    }

    #[test]
    fn cleans_annual_values_and_years() {
        let records = vec![
            record(json!({"year": "2009", "annual": "N/A"})),
            record(json!({"year": "2010", "annual": "1034.2"})),
            record(json!({"year": "2003", "annual": "900"})),
        ];

        let kept = clean_rainfall_records(records, YearWindow::trailing(2010, 5));
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].get("annual"), Some(&json!(0.0)));
        assert_eq!(kept[1].get("annual"), Some(&json!(1034.2)));
    }

    #[test]
    fn merges_in_subdivision_order() {
        let merged = merge_subdivision_results(vec![
            (
                "Vidarbha".to_string(),
                FetchResult::ok(vec![record(json!({"subdivision": "Vidarbha"}))], 1, "u1"),
            ),
            (
                "Marathwada".to_string(),
                FetchResult::failed("API Error: boom", "u2"),
            ),
            (
                "Konkan and Goa".to_string(),
                FetchResult::ok(vec![record(json!({"subdivision": "Konkan and Goa"}))], 1, "u3"),
            ),
        ]);

        assert!(merged.success);
        assert_eq!(merged.total, 2);
        assert_eq!(merged.url, "u1 | u3");
        assert_eq!(
            merged.records[0].text("subdivision").as_deref(),
            Some("Vidarbha")
        );
    }

    #[test]
    fn all_failures_concatenate_errors() {
        let merged = merge_subdivision_results(vec![
            ("A".to_string(), FetchResult::failed("API Error: x", "")),
            ("B".to_string(), FetchResult::failed("API Request Failed: y", "")),
        ]);

        assert!(!merged.success);
        assert_eq!(
            merged.error_message(),
            "Failed to fetch data: A: API Error: x; B: API Request Failed: y"
        );
    }

    #[test]
    fn empty_but_well_formed_is_generic_failure() {
        let merged = merge_subdivision_results(vec![(
            "A".to_string(),
            FetchResult::ok(Vec::new(), 0, "u1"),
        )]);

        assert!(!merged.success);
        assert_eq!(merged.error_message(), NO_RAINFALL_MESSAGE);
    }

    #[test]
    fn no_subdivisions_is_generic_failure() {
        let merged = merge_subdivision_results(Vec::new());
        assert!(!merged.success);
        assert_eq!(merged.error_message(), NO_RAINFALL_MESSAGE);
    }
}
