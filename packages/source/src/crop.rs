//! District-wise crop production fetcher.

use agri_data_source_models::{ApiConfig, FetchResult, RawRecord, Resource, YearWindow, crop_fields};

use crate::gateway::Gateway;
use crate::parsing::{parse_year, sanitize};

/// Fetches a state's crop records, optionally restricted to one crop,
/// and keeps only records inside the trailing `years` window.
pub async fn fetch_crop(
    gateway: &Gateway,
    config: &ApiConfig,
    state: &str,
    years: u32,
    crop: Option<&str>,
) -> FetchResult {
    let window = YearWindow::trailing(config.analysis_end_year, years);

    let mut filters = vec![(crop_fields::STATE, state)];
    if let Some(crop) = crop.filter(|c| !c.trim().is_empty()) {
        filters.push((crop_fields::CROP, crop));
    }

    let mut result = gateway
        .call(
            config.resource_id(Resource::CropProduction),
            config.api_key(Resource::CropProduction),
            &filters,
            config.records_limit,
        )
        .await;

    if result.success {
        let fetched = result.records.len();
        result.records = clean_crop_records(std::mem::take(&mut result.records), window);
        result.total = result.records.len() as u64;
        log::info!(
            "Crop data for {state}: kept {} of {fetched} records in {}..={}",
            result.total,
            window.start,
            window.end,
        );
    }

    result
}

/// Drops records with an unparsable or out-of-window `crop_year` and
/// sanitizes `production_` and `area_` in place.
#[must_use]
pub fn clean_crop_records(records: Vec<RawRecord>, window: YearWindow) -> Vec<RawRecord> {
    records
        .into_iter()
        .filter(|r| parse_year(r.get(crop_fields::YEAR)).is_some_and(|y| window.contains(y)))
        .map(|mut r| {
            let production = sanitize(r.get(crop_fields::PRODUCTION), 0.0);
            let area = sanitize(r.get(crop_fields::AREA), 0.0);
            r.set_number(crop_fields::PRODUCTION, production);
            r.set_number(crop_fields::AREA, area);
            r
        })
        .collect()
}
