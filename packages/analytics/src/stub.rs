//! In-memory [`AgriDataSource`] for analysis tests.
//!
//! Records go through the same cleaning and subdivision merge as the
//! live source, so tests can feed raw upstream-shaped values.

use std::collections::BTreeMap;
use std::sync::Mutex;

use agri_data_source::AgriDataSource;
use agri_data_source::crop::clean_crop_records;
use agri_data_source::rainfall::{clean_rainfall_records, merge_subdivision_results};
use agri_data_source_models::config::DEFAULT_ANALYSIS_END_YEAR;
use agri_data_source_models::{FetchResult, RawRecord, YearWindow, crop_fields};
use async_trait::async_trait;
use serde_json::{Value, json};

#[derive(Debug, Default)]
pub struct StubSource {
    crops: BTreeMap<String, Vec<RawRecord>>,
    crop_failures: BTreeMap<String, String>,
    rainfall: BTreeMap<String, Vec<RawRecord>>,
    rainfall_failures: BTreeMap<String, String>,
    calls: Mutex<Vec<String>>,
}

pub fn crop_record(district: &str, crop: &str, year: i32, production: impl Into<Value>) -> Value {
    json!({
        "district_name": district,
        "crop": crop,
        "crop_year": year.to_string(),
        "production_": production.into(),
    })
}

pub fn rain_record(subdivision: &str, year: i32, annual: impl Into<Value>) -> Value {
    json!({
        "subdivision": subdivision,
        "year": year.to_string(),
        "annual": annual.into(),
    })
}

fn records(values: Vec<Value>) -> Vec<RawRecord> {
    values.into_iter().filter_map(RawRecord::from_value).collect()
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crops(mut self, state: &str, values: Vec<Value>) -> Self {
        self.crops
            .entry(state.to_string())
            .or_default()
            .extend(records(values));
        self
    }

    pub fn failing_crops(mut self, state: &str, error: &str) -> Self {
        self.crop_failures
            .insert(state.to_string(), error.to_string());
        self
    }

    pub fn with_rainfall(mut self, subdivision: &str, values: Vec<Value>) -> Self {
        self.rainfall
            .entry(subdivision.to_string())
            .or_default()
            .extend(records(values));
        self
    }

    pub fn failing_rainfall(mut self, subdivision: &str, error: &str) -> Self {
        self.rainfall_failures
            .insert(subdivision.to_string(), error.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn window(years: u32) -> YearWindow {
        YearWindow::trailing(DEFAULT_ANALYSIS_END_YEAR, years)
    }
}

#[async_trait]
impl AgriDataSource for StubSource {
    async fn fetch_crop(&self, state: &str, years: u32, crop: Option<&str>) -> FetchResult {
        self.calls.lock().unwrap().push(format!("crop:{state}"));
        let url = format!("stub://crop/{state}");

        if let Some(error) = self.crop_failures.get(state) {
            return FetchResult::failed(error.clone(), url);
        }

        let matching: Vec<RawRecord> = self
            .crops
            .get(state)
            .into_iter()
            .flatten()
            .filter(|r| {
                crop.is_none_or(|c| {
                    r.text(crop_fields::CROP)
                        .is_some_and(|name| name.eq_ignore_ascii_case(c))
                })
            })
            .cloned()
            .collect();
        let kept = clean_crop_records(matching, Self::window(years));
        let total = kept.len() as u64;
        FetchResult::ok(kept, total, url)
    }

    async fn fetch_rainfall(&self, subdivisions: &[String], years: u32) -> FetchResult {
        let results = subdivisions
            .iter()
            .map(|subdivision| {
                self.calls
                    .lock()
                    .unwrap()
                    .push(format!("rainfall:{subdivision}"));
                let url = format!("stub://rainfall/{subdivision}");
                let result = self.rainfall_failures.get(subdivision).map_or_else(
                    || {
                        let kept = clean_rainfall_records(
                            self.rainfall.get(subdivision).cloned().unwrap_or_default(),
                            Self::window(years),
                        );
                        let total = kept.len() as u64;
                        FetchResult::ok(kept, total, url.clone())
                    },
                    |error| FetchResult::failed(error.clone(), url.clone()),
                );
                (subdivision.clone(), result)
            })
            .collect();

        merge_subdivision_results(results)
    }
}
