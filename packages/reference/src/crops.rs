//! Crop classification and water-requirement tables.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Coarse three-level tier used for both irrigation dependency and
/// rainfall sensitivity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Tier {
    /// Drought tolerant / weakly rainfall dependent.
    Low,
    /// Intermediate.
    Moderate,
    /// Irrigation dependent / strongly rainfall dependent.
    High,
}

/// Botanical grouping of a crop.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum CropType {
    Cereal,
    Cash,
    Fruit,
    Oilseed,
    Millet,
    Pulse,
}

/// Water-use attributes of a single crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropAttributes {
    /// How much water the crop needs.
    pub water_use: Tier,
    /// Botanical grouping.
    pub crop_type: CropType,
    /// How strongly yields react to rainfall variation.
    pub sensitivity: Tier,
}

impl CropAttributes {
    /// Bundles the three attributes.
    #[must_use]
    pub const fn new(water_use: Tier, crop_type: CropType, sensitivity: Tier) -> Self {
        Self {
            water_use,
            crop_type,
            sensitivity,
        }
    }
}

/// Crop categories and the crop names that belong to each.
pub const CROP_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Cereals",
        &[
            "Rice",
            "Wheat",
            "Maize",
            "Jowar",
            "Bajra",
            "Ragi",
            "Small millets",
            "Barley",
        ],
    ),
    (
        "Pulses",
        &[
            "Gram",
            "Tur",
            "Urad",
            "Moong",
            "Masoor",
            "Lentil",
            "Other Kharif pulses",
            "Other Rabi pulses",
            "Peas & beans",
            "Arhar/Tur",
            "Moth",
            "Horse-gram",
        ],
    ),
    (
        "Oilseeds",
        &[
            "Groundnut",
            "Sesamum",
            "Rapeseed & Mustard",
            "Linseed",
            "Castor seed",
            "Safflower",
            "Sunflower",
            "Soyabean",
            "Niger seed",
            "Coconut",
        ],
    ),
    (
        "Cash Crops",
        &[
            "Sugarcane",
            "Cotton",
            "Jute",
            "Mesta",
            "Tea",
            "Coffee",
            "Rubber",
            "Tobacco",
        ],
    ),
    (
        "Spices",
        &[
            "Black pepper",
            "Dry chillies",
            "Turmeric",
            "Ginger",
            "Coriander",
            "Garlic",
        ],
    ),
    ("Fruits", &["Banana", "Mango", "Orange", "Apple", "Grapes"]),
    (
        "Vegetables",
        &["Potato", "Onion", "Tomato", "Cabbage", "Cauliflower"],
    ),
];

/// Water-use attributes for the crops the policy analysis buckets.
pub const CROP_ATTRIBUTES: &[(&str, CropAttributes)] = &[
    // High water use
    (
        "Rice",
        CropAttributes::new(Tier::High, CropType::Cereal, Tier::High),
    ),
    (
        "Sugarcane",
        CropAttributes::new(Tier::High, CropType::Cash, Tier::High),
    ),
    (
        "Banana",
        CropAttributes::new(Tier::High, CropType::Fruit, Tier::High),
    ),
    // Moderate water use
    (
        "Wheat",
        CropAttributes::new(Tier::Moderate, CropType::Cereal, Tier::Moderate),
    ),
    (
        "Maize",
        CropAttributes::new(Tier::Moderate, CropType::Cereal, Tier::Moderate),
    ),
    (
        "Cotton",
        CropAttributes::new(Tier::Moderate, CropType::Cash, Tier::Moderate),
    ),
    (
        "Groundnut",
        CropAttributes::new(Tier::Moderate, CropType::Oilseed, Tier::Moderate),
    ),
    // Low water use (drought resistant)
    (
        "Bajra",
        CropAttributes::new(Tier::Low, CropType::Millet, Tier::Low),
    ),
    (
        "Jowar",
        CropAttributes::new(Tier::Low, CropType::Millet, Tier::Low),
    ),
    (
        "Ragi",
        CropAttributes::new(Tier::Low, CropType::Millet, Tier::Low),
    ),
    (
        "Gram",
        CropAttributes::new(Tier::Low, CropType::Pulse, Tier::Low),
    ),
    (
        "Tur",
        CropAttributes::new(Tier::Low, CropType::Pulse, Tier::Low),
    ),
    (
        "Moong",
        CropAttributes::new(Tier::Low, CropType::Pulse, Tier::Low),
    ),
    (
        "Urad",
        CropAttributes::new(Tier::Low, CropType::Pulse, Tier::Low),
    ),
    (
        "Arhar/Tur",
        CropAttributes::new(Tier::Low, CropType::Pulse, Tier::Low),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!("high".parse::<Tier>().unwrap(), Tier::High);
        assert_eq!("MODERATE".parse::<Tier>().unwrap(), Tier::Moderate);
        assert!("Unknown".parse::<Tier>().is_err());
    }

    #[test]
    fn attribute_crops_are_unique() {
        let mut names: Vec<&str> = CROP_ATTRIBUTES.iter().map(|(c, _)| *c).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CROP_ATTRIBUTES.len());
    }

    #[test]
    fn category_count() {
        assert_eq!(CROP_CATEGORIES.len(), 7);
    }
}
