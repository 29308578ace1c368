#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static reference data for the agricultural analytics tools.
//!
//! Three lookup tables are bundled: administrative state to IMD rainfall
//! subdivision, crop category to member crops, and crop to water-use
//! attributes. [`ReferenceTables`] owns an immutable copy of all three
//! and is shared by reference between the fetchers and the analytics
//! engine. [`ReferenceTables::builtin`] returns the process-wide instance.

pub mod crops;
pub mod subdivisions;

use std::collections::BTreeMap;
use std::sync::LazyLock;

pub use crops::{CropAttributes, CropType, Tier};

static BUILTIN: LazyLock<ReferenceTables> = LazyLock::new(|| {
    ReferenceTables::new(
        subdivisions::STATE_SUBDIVISIONS,
        crops::CROP_CATEGORIES,
        crops::CROP_ATTRIBUTES,
    )
});

/// Immutable state/subdivision and crop lookup tables.
///
/// There are no mutating methods; build a new instance with
/// [`ReferenceTables::new`] for custom data (tests do this).
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    subdivisions: BTreeMap<String, Vec<String>>,
    categories: Vec<(String, Vec<String>)>,
    attributes: BTreeMap<String, CropAttributes>,
}

impl ReferenceTables {
    /// Builds tables from borrowed static slices.
    #[must_use]
    pub fn new(
        subdivisions: &[(&str, &[&str])],
        categories: &[(&str, &[&str])],
        attributes: &[(&str, CropAttributes)],
    ) -> Self {
        Self {
            subdivisions: subdivisions
                .iter()
                .map(|(state, subs)| {
                    (
                        (*state).to_string(),
                        subs.iter().map(ToString::to_string).collect(),
                    )
                })
                .collect(),
            categories: categories
                .iter()
                .map(|(name, members)| {
                    (
                        (*name).to_string(),
                        members.iter().map(ToString::to_string).collect(),
                    )
                })
                .collect(),
            attributes: attributes
                .iter()
                .map(|(crop, attrs)| ((*crop).to_string(), *attrs))
                .collect(),
        }
    }

    /// Returns the bundled tables, built on first use.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Returns the IMD subdivisions for a state.
    ///
    /// Exact match first, then case-insensitive. `None` means the state
    /// has no configured mapping.
    #[must_use]
    pub fn subdivisions_for(&self, state: &str) -> Option<&[String]> {
        let state = state.trim();
        self.subdivisions
            .get(state)
            .or_else(|| {
                self.subdivisions
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(state))
                    .map(|(_, subs)| subs)
            })
            .map(Vec::as_slice)
    }

    /// Iterates over every mapped state and its subdivisions, sorted by
    /// state name.
    pub fn mapped_states(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.subdivisions
            .iter()
            .map(|(state, subs)| (state.as_str(), subs.as_slice()))
    }

    /// Returns the member crops of a category (exact category name).
    #[must_use]
    pub fn crops_in_category(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, members)| members.as_slice())
    }

    /// Category names in declaration order.
    #[must_use]
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the category a crop belongs to.
    ///
    /// A crop belongs to a category when it is listed verbatim or when
    /// its lowercase name is a substring of a listed crop (so `"tur"`
    /// resolves to Pulses).
    #[must_use]
    pub fn crop_category(&self, crop: &str) -> Option<&str> {
        let needle = crop.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.categories
            .iter()
            .find(|(_, members)| {
                members
                    .iter()
                    .any(|m| m == crop || m.to_lowercase().contains(&needle))
            })
            .map(|(name, _)| name.as_str())
    }

    /// Returns the water-use attributes of a crop. The lookup trims and
    /// ignores ASCII case.
    #[must_use]
    pub fn attributes(&self, crop: &str) -> Option<&CropAttributes> {
        let crop = crop.trim();
        self.attributes.get(crop).or_else(|| {
            self.attributes
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(crop))
                .map(|(_, attrs)| attrs)
        })
    }

    /// Water-use tier of a crop, `None` when the crop is unclassified.
    #[must_use]
    pub fn water_use(&self, crop: &str) -> Option<Tier> {
        self.attributes(crop).map(|a| a.water_use)
    }

    /// `true` for low water-use crops.
    #[must_use]
    pub fn is_drought_resistant(&self, crop: &str) -> bool {
        self.water_use(crop) == Some(Tier::Low)
    }

    /// `true` for high water-use crops.
    #[must_use]
    pub fn is_water_intensive(&self, crop: &str) -> bool {
        self.water_use(crop) == Some(Tier::High)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_resolves_multi_subdivision_state() {
        let subs = ReferenceTables::builtin()
            .subdivisions_for("Karnataka")
            .unwrap();
        assert_eq!(
            subs,
            [
                "Coastal Karnataka",
                "North Interior Karnataka",
                "South Interior Karnataka"
            ]
        );
    }

    #[test]
    fn subdivision_lookup_ignores_case() {
        let tables = ReferenceTables::builtin();
        assert_eq!(
            tables.subdivisions_for("maharashtra"),
            tables.subdivisions_for("Maharashtra")
        );
    }

    #[test]
    fn unmapped_state_is_none() {
        assert!(ReferenceTables::builtin().subdivisions_for("Atlantis").is_none());
    }

    #[test]
    fn category_members() {
        let pulses = ReferenceTables::builtin()
            .crops_in_category("Pulses")
            .unwrap();
        assert!(pulses.iter().any(|c| c == "Moong"));
        assert!(ReferenceTables::builtin().crops_in_category("Nuts").is_none());
    }

    #[test]
    fn crop_category_lookup() {
        let tables = ReferenceTables::builtin();
        assert_eq!(tables.crop_category("Rice"), Some("Cereals"));
        assert_eq!(tables.crop_category("tur"), Some("Pulses"));
        assert_eq!(tables.crop_category("Mango"), Some("Fruits"));
        assert_eq!(tables.crop_category("Saffron"), None);
        assert_eq!(tables.crop_category("  "), None);
    }

    #[test]
    fn water_use_classification() {
        let tables = ReferenceTables::builtin();
        assert!(tables.is_water_intensive("Rice"));
        assert!(tables.is_water_intensive("rice "));
        assert!(tables.is_drought_resistant("Bajra"));
        assert!(!tables.is_drought_resistant("Wheat"));
        assert_eq!(tables.water_use("Wheat"), Some(Tier::Moderate));
        assert_eq!(tables.water_use("Potato"), None);
    }

    #[test]
    fn custom_tables() {
        let tables = ReferenceTables::new(
            &[("Testland", &["North", "South"])],
            &[("Grains", &["Oats"])],
            &[],
        );
        assert_eq!(tables.subdivisions_for("Testland").unwrap().len(), 2);
        assert_eq!(tables.category_names(), vec!["Grains"]);
        assert_eq!(tables.water_use("Oats"), None);
        assert_eq!(tables.mapped_states().count(), 1);
    }
}
