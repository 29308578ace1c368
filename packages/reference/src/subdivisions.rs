//! Administrative state to IMD meteorological subdivision mapping.
//!
//! The India Meteorological Department reports rainfall per subdivision,
//! not per state. Some subdivisions span several states (e.g. "Konkan and
//! Goa") and some states span several subdivisions (e.g. Karnataka).

/// States with a configured subdivision mapping, paired with their
/// subdivisions in reporting order.
pub const STATE_SUBDIVISIONS: &[(&str, &[&str])] = &[
    (
        "Andhra Pradesh",
        &["Coastal Andhra Pradesh", "Rayalaseema"],
    ),
    ("Arunachal Pradesh", &["Arunachal Pradesh"]),
    ("Assam", &["Assam & Meghalaya"]),
    ("Bihar", &["Bihar"]),
    ("Chhattisgarh", &["Chhattisgarh"]),
    ("Delhi", &["Haryana Chandigarh & Delhi"]),
    ("Goa", &["Konkan and Goa"]),
    ("Gujarat", &["Gujarat Region", "Saurashtra and Kutch"]),
    ("Haryana", &["Haryana Chandigarh & Delhi"]),
    ("Himachal Pradesh", &["Himachal Pradesh"]),
    ("Jammu and Kashmir", &["Jammu & Kashmir"]),
    ("Jharkhand", &["Jharkhand"]),
    (
        "Karnataka",
        &[
            "Coastal Karnataka",
            "North Interior Karnataka",
            "South Interior Karnataka",
        ],
    ),
    ("Kerala", &["Kerala"]),
    (
        "Madhya Pradesh",
        &["East Madhya Pradesh", "West Madhya Pradesh"],
    ),
    (
        "Maharashtra",
        &[
            "Konkan and Goa",
            "Madhya Maharashtra",
            "Marathwada",
            "Vidarbha",
        ],
    ),
    ("Manipur", &["Sub Himalayan West Bengal & Sikkim"]),
    ("Meghalaya", &["Assam & Meghalaya"]),
    ("Mizoram", &["Sub Himalayan West Bengal & Sikkim"]),
    ("Nagaland", &["Nagaland Manipur Mizoram & Tripura"]),
    ("Odisha", &["Odisha"]),
    ("Punjab", &["Punjab"]),
    ("Rajasthan", &["East Rajasthan", "West Rajasthan"]),
    ("Sikkim", &["Sub Himalayan West Bengal & Sikkim"]),
    ("Tamil Nadu", &["Tamil Nadu"]),
    ("Telangana", &["Telangana"]),
    ("Tripura", &["Nagaland Manipur Mizoram & Tripura"]),
    (
        "Uttar Pradesh",
        &["East Uttar Pradesh", "West Uttar Pradesh"],
    ),
    ("Uttarakhand", &["Uttarakhand"]),
    (
        "West Bengal",
        &["Gangetic West Bengal", "Sub Himalayan West Bengal & Sikkim"],
    ),
];
