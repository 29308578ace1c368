//! The three analyses the tool exposes.
//!
//! Every aggregate is computed from sanitized values only; fetchers have
//! already applied the year window.

use std::collections::BTreeMap;

use agri_data_analytics_models::{
    Citations, ComparisonResult, CropSummary, CropTotal, DistrictExtreme, ExtremalResult,
    MaxDistrict, MinDistrict, PolicyResult, ProductionComparison, ProductionRatio,
    RainfallSummary, Recommendation, StateAnalysis, StateSources, crops_citation_key,
    rainfall_citation_key,
};
use agri_data_reference::{ReferenceTables, Tier};
use agri_data_source::AgriDataSource;
use agri_data_source::parsing::{parse_year, sanitize};
use agri_data_source_models::{RawRecord, crop_fields, rainfall_fields};

use crate::AnalyticsError;
use crate::stats::{mean, pearson, round_to};

/// Number of crops ranked per state in a comparison.
pub const TOP_CROPS: usize = 3;

/// Minimum common years before correlations are computed.
pub const MIN_CORRELATION_YEARS: usize = 3;

/// Average annual rainfall (mm) below which a state counts as dry.
pub const LOW_RAINFALL_MM: f64 = 800.0;

/// Correlation above which high water-use crops are rainfall-responsive.
pub const STRONG_CORRELATION: f64 = 0.7;

const UNKNOWN: &str = "Unknown";

fn production(record: &RawRecord) -> f64 {
    sanitize(record.get(crop_fields::PRODUCTION), 0.0)
}

fn annual_rainfall(record: &RawRecord) -> f64 {
    sanitize(record.get(rainfall_fields::ANNUAL), 0.0)
}

/// Sums values per key, keeping keys in first-seen order.
fn totals_by(entries: impl Iterator<Item = (String, f64)>) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for (key, value) in entries {
        match totals.iter_mut().find(|(k, _)| *k == key) {
            Some((_, total)) => *total += value,
            None => totals.push((key, value)),
        }
    }
    totals
}

fn distinct<'a>(state_x: &'a str, state_y: &'a str) -> Vec<&'a str> {
    if state_x == state_y {
        vec![state_x]
    } else {
        vec![state_x, state_y]
    }
}

/// Compares average rainfall of two states and ranks each state's top
/// crops within `crop_type`.
///
/// # Errors
///
/// * [`AnalyticsError::UnknownCropCategory`] before any fetch is made
/// * [`AnalyticsError::UnmappedState`] if a state has no subdivisions
/// * [`AnalyticsError::RainfallFetch`] / [`AnalyticsError::CropFetch`] on
///   fetch failure
/// * [`AnalyticsError::NoRainfallData`] if no positive annual value remains
pub async fn compare_rainfall_and_crops(
    source: &dyn AgriDataSource,
    tables: &ReferenceTables,
    state_x: &str,
    state_y: &str,
    years: u32,
    crop_type: &str,
) -> Result<ComparisonResult, AnalyticsError> {
    let category_crops: Vec<String> = tables
        .crops_in_category(crop_type)
        .ok_or_else(|| AnalyticsError::UnknownCropCategory {
            category: crop_type.to_string(),
            valid: tables.category_names().join(", "),
        })?
        .iter()
        .map(|c| c.to_lowercase())
        .collect();

    let states = [state_x, state_y];
    let mut rainfall_comparison = BTreeMap::new();

    for state in states {
        let subdivisions = tables
            .subdivisions_for(state)
            .ok_or_else(|| AnalyticsError::UnmappedState {
                state: state.to_string(),
            })?;

        let rain = source.fetch_rainfall(subdivisions, years).await;
        if !rain.success {
            return Err(AnalyticsError::RainfallFetch {
                state: state.to_string(),
                message: rain.error_message().to_string(),
            });
        }

        let annuals: Vec<f64> = rain
            .records
            .iter()
            .map(annual_rainfall)
            .filter(|v| *v > 0.0)
            .collect();
        let average = mean(&annuals).ok_or_else(|| AnalyticsError::NoRainfallData {
            state: state.to_string(),
        })?;

        log::debug!(
            "{state}: {} positive rainfall values over {} subdivisions",
            annuals.len(),
            subdivisions.len()
        );

        rainfall_comparison.insert(
            state.to_string(),
            RainfallSummary {
                average_annual_rainfall_mm: round_to(average, 2),
                data_points: annuals.len(),
                subdivisions: subdivisions.to_vec(),
                source_url: rain.url,
            },
        );
    }

    let mut crop_comparison = BTreeMap::new();

    for state in states {
        let crops = source.fetch_crop(state, years, None).await;
        if !crops.success {
            return Err(AnalyticsError::CropFetch {
                state: state.to_string(),
                message: crops.error_message().to_string(),
            });
        }

        let in_category = crops.records.iter().filter_map(|r| {
            let name = r.text_or(crop_fields::CROP, "");
            let lower = name.to_lowercase();
            category_crops
                .iter()
                .any(|c| lower.contains(c.as_str()))
                .then(|| (name, production(r)))
        });

        let mut ranked = totals_by(in_category);
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(TOP_CROPS);

        crop_comparison.insert(
            state.to_string(),
            CropSummary {
                top_3_crops: ranked
                    .into_iter()
                    .map(|(crop, total)| CropTotal {
                        crop,
                        total_production: round_to(total, 2),
                    })
                    .collect(),
                source_url: crops.url,
            },
        );
    }

    let mut citations = Citations::new();
    for (state, summary) in &rainfall_comparison {
        citations.insert(rainfall_citation_key(state), summary.source_url.clone());
    }
    for (state, summary) in &crop_comparison {
        citations.insert(crops_citation_key(state), summary.source_url.clone());
    }

    Ok(ComparisonResult {
        states: states.iter().map(ToString::to_string).collect(),
        years_analyzed: years,
        crop_type: crop_type.to_string(),
        rainfall_comparison,
        crop_comparison,
        citations,
    })
}

/// Finds the top-producing district of `crop_z` in `state_x` and the
/// lowest positive-producing district in `state_y`.
///
/// Zero-production records count toward `state_x` totals but are
/// ignored for `state_y`, so a district that produced nothing is never
/// reported as the minimum.
///
/// # Errors
///
/// * [`AnalyticsError::CropFetchFor`] on fetch failure
/// * [`AnalyticsError::NoProduction`] if either side has no qualifying
///   district
pub async fn find_max_min_districts(
    source: &dyn AgriDataSource,
    state_x: &str,
    state_y: &str,
    crop_z: &str,
    years: u32,
) -> Result<ExtremalResult, AnalyticsError> {
    let fetch_failed = |state: &str, message: &str| AnalyticsError::CropFetchFor {
        crop: crop_z.to_string(),
        state: state.to_string(),
        message: message.to_string(),
    };
    let no_production = |state: &str| AnalyticsError::NoProduction {
        crop: crop_z.to_string(),
        state: state.to_string(),
    };

    let result_x = source.fetch_crop(state_x, years, Some(crop_z)).await;
    if !result_x.success {
        return Err(fetch_failed(state_x, result_x.error_message()));
    }

    let totals_x = totals_by(
        result_x
            .records
            .iter()
            .map(|r| (r.text_or(crop_fields::DISTRICT, UNKNOWN), production(r))),
    );
    let (max_district, max_total) = totals_x
        .into_iter()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
        .ok_or_else(|| no_production(state_x))?;

    let result_y = source.fetch_crop(state_y, years, Some(crop_z)).await;
    if !result_y.success {
        return Err(fetch_failed(state_y, result_y.error_message()));
    }

    let totals_y = totals_by(result_y.records.iter().filter_map(|r| {
        let value = production(r);
        (value > 0.0).then(|| (r.text_or(crop_fields::DISTRICT, UNKNOWN), value))
    }));
    let (min_district, min_total) = totals_y
        .into_iter()
        .reduce(|best, next| if next.1 < best.1 { next } else { best })
        .ok_or_else(|| no_production(state_y))?;

    log::info!(
        "{crop_z}: max {max_district} ({max_total}) in {state_x}, min {min_district} ({min_total}) in {state_y}"
    );

    let mut districts = BTreeMap::new();
    districts.insert(
        state_x.to_string(),
        DistrictExtreme::Max(MaxDistrict {
            max_production_district: max_district,
            total_production: round_to(max_total, 2),
            source_url: result_x.url.clone(),
        }),
    );
    districts.insert(
        state_y.to_string(),
        DistrictExtreme::Min(MinDistrict {
            min_production_district: min_district,
            total_production: round_to(min_total, 2),
            source_url: result_y.url.clone(),
        }),
    );

    let mut citations = Citations::new();
    citations.insert(state_x.to_string(), result_x.url);
    citations.insert(state_y.to_string(), result_y.url);

    Ok(ExtremalResult {
        crop: crop_z.to_string(),
        years_analyzed: years,
        districts,
        comparison: ProductionComparison {
            production_ratio: ProductionRatio::between(max_total, min_total),
            difference: round_to(max_total - min_total, 2),
        },
        citations,
    })
}

/// Per-year series for one state.
#[derive(Debug, Default)]
struct YearlySeries {
    rainfall: BTreeMap<i32, Vec<f64>>,
    high_water: BTreeMap<i32, f64>,
    low_water: BTreeMap<i32, f64>,
}

impl YearlySeries {
    fn build(tables: &ReferenceTables, rain: &[RawRecord], crops: &[RawRecord]) -> Self {
        let mut series = Self::default();

        for record in rain {
            let annual = annual_rainfall(record);
            let Some(year) = parse_year(record.get(rainfall_fields::YEAR)) else {
                continue;
            };
            if year != 0 && annual > 0.0 {
                series.rainfall.entry(year).or_default().push(annual);
            }
        }

        for record in crops {
            let Some(year) = parse_year(record.get(crop_fields::YEAR)) else {
                continue;
            };
            let bucket = match tables.water_use(&record.text_or(crop_fields::CROP, "")) {
                Some(Tier::High) => &mut series.high_water,
                Some(Tier::Low) => &mut series.low_water,
                Some(Tier::Moderate) | None => continue,
            };
            *bucket.entry(year).or_insert(0.0) += production(record);
        }

        series
    }

    fn yearly_rainfall(&self) -> BTreeMap<i32, f64> {
        self.rainfall
            .iter()
            .filter_map(|(year, values)| mean(values).map(|m| (*year, m)))
            .collect()
    }
}

fn analyze_state(
    tables: &ReferenceTables,
    rain: &[RawRecord],
    crops: &[RawRecord],
    sources: StateSources,
) -> Option<StateAnalysis> {
    let series = YearlySeries::build(tables, rain, crops);
    let rainfall = series.yearly_rainfall();

    let common: Vec<i32> = rainfall
        .keys()
        .filter(|y| series.high_water.contains_key(y) && series.low_water.contains_key(y))
        .copied()
        .collect();
    if common.len() < MIN_CORRELATION_YEARS {
        return None;
    }

    let rain_vals: Vec<f64> = common.iter().map(|y| rainfall[y]).collect();
    let high_vals: Vec<f64> = common.iter().map(|y| series.high_water[y]).collect();
    let low_vals: Vec<f64> = common.iter().map(|y| series.low_water[y]).collect();

    let avg = |values: Vec<f64>| mean(&values).map_or(0.0, |m| round_to(m, 2));

    Some(StateAnalysis {
        avg_annual_rainfall_mm: avg(rainfall.values().copied().collect()),
        high_water_crop_production_avg: avg(series.high_water.values().copied().collect()),
        low_water_crop_production_avg: avg(series.low_water.values().copied().collect()),
        correlation_rainfall_vs_high_water_crops: pearson(&rain_vals, &high_vals)
            .map(|r| round_to(r, 3)),
        correlation_rainfall_vs_low_water_crops: pearson(&rain_vals, &low_vals)
            .map(|r| round_to(r, 3)),
        years_analyzed: common.len(),
        sources,
    })
}

/// Applies the recommendation rules to one state's analysis.
#[must_use]
pub fn recommend(state: &str, analysis: &StateAnalysis) -> Vec<Recommendation> {
    let high = analysis.correlation_rainfall_vs_high_water_crops;
    let low = analysis.correlation_rainfall_vs_low_water_crops;
    let avg_rainfall = analysis.avg_annual_rainfall_mm;

    let recommendation = |text: &str, rationale: String, supporting: String| Recommendation {
        state: state.to_string(),
        recommendation: text.to_string(),
        rationale,
        supporting_data: supporting,
    };

    let mut out = Vec::new();

    if avg_rainfall < LOW_RAINFALL_MM {
        out.push(recommendation(
            "Promote drought-resistant crops (millets, pulses)",
            format!("Low average rainfall ({avg_rainfall}mm) makes high-water crops risky"),
            high.map_or_else(
                || "High-water crop correlation is undefined for this period".to_string(),
                |h| format!("High-water crops show {:.2} correlation sensitivity", h.abs()),
            ),
        ));
    }

    if let Some(h) = high.filter(|h| *h > STRONG_CORRELATION) {
        out.push(recommendation(
            "Expand irrigation infrastructure for water-intensive crops",
            format!(
                "Strong positive correlation ({h:.2}) shows high-water crops respond well to rainfall"
            ),
            "Historical production aligns with rainfall patterns".to_string(),
        ));
    }

    if let Some(l) = low.filter(|l| high.is_some_and(|h| l.abs() < h.abs())) {
        out.push(recommendation(
            "Drought-resistant crops provide production stability",
            format!("Lower correlation ({l:.2}) indicates resilience to rainfall variation"),
            "Consistent production despite climate variability".to_string(),
        ));
    }

    out
}

/// Correlates rainfall with high and low water-use crop production and
/// derives policy recommendations.
///
/// States that are unmapped, fail to fetch, or have fewer than
/// [`MIN_CORRELATION_YEARS`] common years are left out of
/// `state_analysis`; this never fails because one state lacks data.
///
/// # Errors
///
/// Does not fail today; states without usable data are skipped.
#[allow(clippy::unnecessary_wraps)]
pub async fn analyze_correlation_and_policy(
    source: &dyn AgriDataSource,
    tables: &ReferenceTables,
    state_x: &str,
    state_y: &str,
    years: u32,
) -> Result<PolicyResult, AnalyticsError> {
    let mut state_analysis = BTreeMap::new();
    let order = distinct(state_x, state_y);

    for state in &order {
        let Some(subdivisions) = tables.subdivisions_for(state) else {
            log::warn!("Skipping {state}: no subdivision mapping");
            continue;
        };

        let rain = source.fetch_rainfall(subdivisions, years).await;
        let crops = source.fetch_crop(state, years, None).await;

        if !rain.success || !crops.success {
            log::warn!(
                "Skipping {state}: rainfall={} crops={}",
                if rain.success { "ok" } else { rain.error_message() },
                if crops.success { "ok" } else { crops.error_message() },
            );
            continue;
        }

        let sources = StateSources {
            rainfall: rain.url.clone(),
            crops: crops.url.clone(),
        };
        match analyze_state(tables, &rain.records, &crops.records, sources) {
            Some(analysis) => {
                state_analysis.insert((*state).to_string(), analysis);
            }
            None => log::warn!(
                "Skipping {state}: fewer than {MIN_CORRELATION_YEARS} years with rainfall and both crop buckets"
            ),
        }
    }

    let policy_recommendations = order
        .iter()
        .flat_map(|state| {
            state_analysis
                .get(*state)
                .map(|a| recommend(state, a))
                .unwrap_or_default()
        })
        .collect();

    let mut citations = Citations::new();
    for (state, analysis) in &state_analysis {
        citations.insert(rainfall_citation_key(state), analysis.sources.rainfall.clone());
        citations.insert(crops_citation_key(state), analysis.sources.crops.clone());
    }

    Ok(PolicyResult {
        states: vec![state_x.to_string(), state_y.to_string()],
        years_analyzed: years,
        state_analysis,
        policy_recommendations,
        citations,
    })
}

#[cfg(test)]
mod tests {
    use agri_data_reference::{CropAttributes, CropType};
    use serde_json::json;

    use super::*;
    use crate::stub::{StubSource, crop_record, rain_record};

    fn tables() -> &'static ReferenceTables {
        ReferenceTables::builtin()
    }

    fn karnataka_rain(stub: StubSource, annual: f64) -> StubSource {
        stub.with_rainfall(
            "Coastal Karnataka",
            (2006..=2010).map(|y| rain_record("Coastal Karnataka", y, annual)).collect(),
        )
    }

    #[tokio::test]
    async fn comparison_ranks_top_three_per_state() {
        let stub = StubSource::new()
            .with_rainfall(
                "Vidarbha",
                vec![
                    rain_record("Vidarbha", 2008, "1000"),
                    rain_record("Vidarbha", 2009, "NA"),
                ],
            )
            .with_rainfall("Marathwada", vec![rain_record("Marathwada", 2009, 800.0)])
            .with_crops(
                "Maharashtra",
                vec![
                    crop_record("PUNE", "Arhar/Tur", 2008, "50"),
                    crop_record("PUNE", "Moong", 2008, "70"),
                    crop_record("NASIK", "Moong", 2009, "5"),
                    crop_record("NASIK", "Urad", 2009, "20"),
                    crop_record("NASIK", "Masoor", 2009, "1"),
                    crop_record("NASIK", "Rice", 2009, "900"),
                ],
            );
        let stub = karnataka_rain(stub, 3000.0).with_crops(
            "Karnataka",
            vec![crop_record("UDUPI", "Moong", 2007, "3.456")],
        );

        let result = compare_rainfall_and_crops(&stub, tables(), "Maharashtra", "Karnataka", 5, "Pulses")
            .await
            .unwrap();

        let rain = &result.rainfall_comparison["Maharashtra"];
        assert!((rain.average_annual_rainfall_mm - 900.0).abs() < f64::EPSILON);
        assert_eq!(rain.data_points, 2);
        assert_eq!(rain.subdivisions.len(), 4);

        let top = &result.crop_comparison["Maharashtra"].top_3_crops;
        let names: Vec<&str> = top.iter().map(|c| c.crop.as_str()).collect();
        assert_eq!(names, vec!["Moong", "Arhar/Tur", "Urad"]);
        assert!(top.windows(2).all(|w| w[0].total_production >= w[1].total_production));
        assert!((top[0].total_production - 75.0).abs() < f64::EPSILON);

        let karnataka = &result.crop_comparison["Karnataka"].top_3_crops;
        assert!((karnataka[0].total_production - 3.46).abs() < f64::EPSILON);

        assert_eq!(result.citations.len(), 4);
        assert!(result.citations.contains_key("Maharashtra_rainfall"));
        assert!(result.citations.contains_key("Maharashtra_crops"));
        assert!(result.citations.contains_key("Karnataka_rainfall"));
        assert!(result.citations.contains_key("Karnataka_crops"));
    }

    #[tokio::test]
    async fn comparison_rejects_unknown_category_before_fetching() {
        let stub = StubSource::new();
        let err = compare_rainfall_and_crops(&stub, tables(), "Maharashtra", "Karnataka", 5, "Gems")
            .await
            .unwrap_err();

        assert!(matches!(err, AnalyticsError::UnknownCropCategory { .. }));
        assert!(err.to_string().contains("Cereals"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn comparison_reports_unmapped_state() {
        let stub = karnataka_rain(StubSource::new(), 3000.0);
        let err = compare_rainfall_and_crops(&stub, tables(), "Karnataka", "Atlantis", 5, "Pulses")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Atlantis"));
    }

    #[tokio::test]
    async fn comparison_needs_positive_rainfall() {
        let stub = karnataka_rain(StubSource::new(), 0.0);
        let err = compare_rainfall_and_crops(&stub, tables(), "Karnataka", "Karnataka", 5, "Pulses")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "No valid rainfall data found for Karnataka in the specified period"
        );
    }

    #[tokio::test]
    async fn comparison_surfaces_rainfall_failure() {
        let stub = StubSource::new().failing_rainfall("Punjab", "API Error: quota exceeded");
        let err = compare_rainfall_and_crops(&stub, tables(), "Punjab", "Karnataka", 5, "Cereals")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch rainfall data for Punjab: Failed to fetch data: Punjab: API Error: quota exceeded"
        );
    }

    #[tokio::test]
    async fn extremal_skips_zero_districts_for_minimum() {
        let stub = StubSource::new()
            .with_crops(
                "Maharashtra",
                vec![
                    crop_record("KOLHAPUR", "Rice", 2008, "100"),
                    crop_record("KOLHAPUR", "Rice", 2009, "50"),
                    crop_record("THANE", "Rice", 2009, "120"),
                ],
            )
            .with_crops(
                "Karnataka",
                vec![
                    crop_record("BIDAR", "Rice", 2008, "0"),
                    crop_record("UDUPI", "Rice", 2008, "40"),
                    crop_record("MYSORE", "Rice", 2008, "60"),
                ],
            );

        let result = find_max_min_districts(&stub, "Maharashtra", "Karnataka", "Rice", 5)
            .await
            .unwrap();

        assert_eq!(result.districts["Maharashtra"].district(), "KOLHAPUR");
        assert!((result.districts["Maharashtra"].total_production() - 150.0).abs() < f64::EPSILON);
        assert_eq!(result.districts["Karnataka"].district(), "UDUPI");
        assert_eq!(
            result.comparison.production_ratio,
            ProductionRatio::Finite(3.75)
        );
        assert!((result.comparison.difference - 110.0).abs() < f64::EPSILON);
        assert_eq!(result.citations.len(), 2);
    }

    #[tokio::test]
    async fn extremal_all_zero_minimum_side_is_error() {
        let stub = StubSource::new()
            .with_crops("Maharashtra", vec![crop_record("PUNE", "Rice", 2008, "10")])
            .with_crops(
                "Karnataka",
                vec![
                    crop_record("BIDAR", "Rice", 2008, "0"),
                    crop_record("UDUPI", "Rice", 2009, "NA"),
                ],
            );

        let err = find_max_min_districts(&stub, "Maharashtra", "Karnataka", "Rice", 5)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No production data found for Rice in Karnataka");
    }

    #[tokio::test]
    async fn extremal_counts_zero_districts_for_maximum() {
        let stub = StubSource::new()
            .with_crops("Maharashtra", vec![crop_record("PUNE", "Rice", 2008, "0")])
            .with_crops("Karnataka", vec![crop_record("UDUPI", "Rice", 2008, "4")]);

        let result = find_max_min_districts(&stub, "Maharashtra", "Karnataka", "Rice", 5)
            .await
            .unwrap();
        assert_eq!(result.districts["Maharashtra"].district(), "PUNE");
        assert_eq!(result.comparison.production_ratio, ProductionRatio::Finite(0.0));
        assert!((result.comparison.difference + 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_is_infinite_for_zero_minimum() {
        assert_eq!(
            serde_json::to_value(ProductionRatio::between(42.0, 0.0)).unwrap(),
            json!("Infinite")
        );
    }

    #[tokio::test]
    async fn extremal_reports_fetch_failure_with_crop() {
        let stub = StubSource::new().failing_crops("Maharashtra", "API Request Failed: timeout");
        let err = find_max_min_districts(&stub, "Maharashtra", "Karnataka", "Wheat", 5)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch Wheat data for Maharashtra: API Request Failed: timeout"
        );
    }

    fn policy_stub() -> StubSource {
        let years = [2006, 2007, 2008, 2009, 2010];
        let rain = [600.0, 700.0, 500.0, 650.0, 550.0];
        let rice = [300.0, 400.0, 200.0, 350.0, 250.0];
        let bajra = [100.0, 101.0, 99.0, 100.0, 100.0];

        let mut crops = Vec::new();
        for (i, year) in years.iter().enumerate() {
            crops.push(crop_record("JAIPUR", "Rice", *year, rice[i]));
            crops.push(crop_record("JAIPUR", "Bajra", *year, bajra[i]));
            crops.push(crop_record("JAIPUR", "Wheat", *year, 999.0));
        }

        StubSource::new()
            .with_rainfall(
                "East Rajasthan",
                years.iter().zip(rain).map(|(y, r)| rain_record("East Rajasthan", *y, r)).collect(),
            )
            .with_rainfall(
                "West Rajasthan",
                years.iter().zip(rain).map(|(y, r)| rain_record("West Rajasthan", *y, r)).collect(),
            )
            .with_crops("Rajasthan", crops)
            .with_rainfall(
                "Kerala",
                vec![
                    rain_record("Kerala", 2009, 3000.0),
                    rain_record("Kerala", 2010, 2900.0),
                ],
            )
            .with_crops(
                "Kerala",
                vec![
                    crop_record("IDUKKI", "Rice", 2009, 10.0),
                    crop_record("IDUKKI", "Bajra", 2009, 1.0),
                    crop_record("IDUKKI", "Rice", 2010, 12.0),
                    crop_record("IDUKKI", "Bajra", 2010, 1.0),
                ],
            )
    }

    #[tokio::test]
    async fn policy_analyzes_states_with_enough_years() {
        let stub = policy_stub();
        let result = analyze_correlation_and_policy(&stub, tables(), "Rajasthan", "Kerala", 5)
            .await
            .unwrap();

        assert!(!result.state_analysis.contains_key("Kerala"));
        let raj = &result.state_analysis["Rajasthan"];
        assert_eq!(raj.years_analyzed, 5);
        assert!((raj.avg_annual_rainfall_mm - 600.0).abs() < f64::EPSILON);
        assert!((raj.high_water_crop_production_avg - 300.0).abs() < f64::EPSILON);
        assert_eq!(raj.correlation_rainfall_vs_high_water_crops, Some(1.0));

        let texts: Vec<&str> = result
            .policy_recommendations
            .iter()
            .map(|r| r.recommendation.as_str())
            .collect();
        assert_eq!(
            texts,
            vec![
                "Promote drought-resistant crops (millets, pulses)",
                "Expand irrigation infrastructure for water-intensive crops",
                "Drought-resistant crops provide production stability",
            ]
        );
        assert!(result.policy_recommendations.iter().all(|r| r.state == "Rajasthan"));
        assert_eq!(
            result.policy_recommendations[0].supporting_data,
            "High-water crops show 1.00 correlation sensitivity"
        );

        assert_eq!(result.citations.len(), 2);
        assert!(result.citations["Rajasthan_rainfall"].contains(" | "));
        assert_eq!(result.citations["Rajasthan_crops"], "stub://crop/Rajasthan");
    }

    #[tokio::test]
    async fn policy_with_too_few_years_yields_no_recommendations() {
        let stub = policy_stub();
        let result = analyze_correlation_and_policy(&stub, tables(), "Kerala", "Kerala", 5)
            .await
            .unwrap();
        assert!(result.state_analysis.is_empty());
        assert!(result.policy_recommendations.is_empty());
        assert!(result.citations.is_empty());
    }

    #[tokio::test]
    async fn policy_skips_unmapped_and_failed_states() {
        let stub = policy_stub().failing_crops("Kerala", "API Error: down");
        let result = analyze_correlation_and_policy(&stub, tables(), "Atlantis", "Kerala", 5)
            .await
            .unwrap();
        assert!(result.state_analysis.is_empty());
        assert_eq!(result.states, vec!["Atlantis", "Kerala"]);
    }

    #[test]
    fn flat_series_gives_undefined_correlation() {
        let tables = ReferenceTables::new(
            &[("Goa", &["Konkan and Goa"])],
            &[],
            &[
                ("Rice", CropAttributes::new(Tier::High, CropType::Cereal, Tier::High)),
                ("Ragi", CropAttributes::new(Tier::Low, CropType::Millet, Tier::Low)),
            ],
        );
        let rain: Vec<RawRecord> = (2006..=2008)
            .map(|y| RawRecord::from_value(rain_record("Konkan and Goa", y, 2000.0 + f64::from(y))).unwrap())
            .collect();
        let crops: Vec<RawRecord> = (2006..=2008)
            .flat_map(|y| {
                [
                    crop_record("NORTH GOA", "Rice", y, 10.0),
                    crop_record("NORTH GOA", "Ragi", y, f64::from(y)),
                ]
            })
            .filter_map(RawRecord::from_value)
            .collect();

        let analysis = analyze_state(
            &tables,
            &rain,
            &crops,
            StateSources {
                rainfall: "r".to_string(),
                crops: "c".to_string(),
            },
        )
        .unwrap();

        assert_eq!(analysis.correlation_rainfall_vs_high_water_crops, None);
        assert_eq!(analysis.correlation_rainfall_vs_low_water_crops, Some(1.0));

        let recs = recommend("Goa", &analysis);
        assert!(recs.is_empty());
    }
}
