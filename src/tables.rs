// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! Static bilingual lookup tables used by extraction and merging.
//!
//! All tables are process-wide immutable data. Category patterns and
//! availability probes are ordered; first match wins.

use crate::model::Availability;

/// A string localized into both site languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localized {
    pub is: &'static str,
    pub en: &'static str,
}

/// Food-pairing code table. Codes appear in `foodcategory<CODE>` anchor
/// targets on both listing and detail pages.
pub const FOOD_CATEGORIES: &[(&str, Localized)] = &[
    ("C", Localized { is: "Fiskur", en: "Fish" }),
    ("D", Localized { is: "Alifuglar", en: "Fowl" }),
    ("E", Localized { is: "Nautakjöt", en: "Beef" }),
    ("F", Localized { is: "Lambakjöt", en: "Lamb" }),
    ("G", Localized { is: "Svínakjöt", en: "Pork" }),
    ("H", Localized { is: "Villibráð", en: "Game" }),
    ("I", Localized { is: "Grænmetisréttir", en: "Vegetables" }),
    ("J", Localized { is: "Grillmat", en: "Barbeque food" }),
    ("M", Localized { is: "Pasta", en: "Pasta" }),
    ("R", Localized { is: "Reykt kjöt", en: "Smoked meat" }),
    ("S", Localized { is: "Pottréttir", en: "Casserole" }),
    ("2", Localized { is: "Pylsur", en: "Hot dogs" }),
    ("4", Localized { is: "Sushi", en: "Sushi" }),
    ("B", Localized { is: "Skelfisk", en: "Shellfish" }),
    ("Æ", Localized { is: "Hægt að panta", en: "Can be reserved" }),
];

pub fn food_category(code: &str) -> Option<Localized> {
    FOOD_CATEGORIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, l)| *l)
}

/// Product category slugs exposed by the lookup endpoint.
pub const PRODUCT_CATEGORIES: &[(&str, Localized)] = &[
    ("beer", Localized { is: "Bjór", en: "Beer" }),
    ("red-wine", Localized { is: "Rauðvín", en: "Red wine" }),
    ("white-wine", Localized { is: "Hvítvín", en: "White wine" }),
    ("strong", Localized { is: "Sterkt áfengi", en: "Spirits" }),
    ("cider", Localized { is: "Síder", en: "Cider" }),
    ("liqueur", Localized { is: "Líkjör", en: "Liqueur" }),
    ("rose-wine", Localized { is: "Rósavín", en: "Rose wine" }),
    ("sparkling-wine", Localized { is: "Freyðivín", en: "Sparkling wine" }),
    ("dessert-wine", Localized { is: "Eftirréttavín", en: "Dessert wine" }),
    ("packaging", Localized { is: "Umbúðir", en: "Packaging" }),
];

/// Ordered category detection table: canonical (Icelandic) name mapped to the
/// literal substrings that identify it in either language's markup.
pub const CATEGORY_PATTERNS: &[(&str, &[&str])] = &[
    ("Rauðvín", &["Rauðvín", "Red wine"]),
    ("Hvítvín", &["Hvítvín", "White wine"]),
    ("Rósavín", &["Rósavín", "Rosé wine", "Rose wine"]),
    ("Freyðivín", &["Freyðivín", "Sparkling wine"]),
    ("Bjór", &["Bjór", "Beer"]),
    ("Sterkt áfengi", &["Sterkt áfengi", "Spirits"]),
    ("Líkjör", &["Líkjör", "Liqueur"]),
    ("Síder", &["Síder", "Cider"]),
    ("Eftirréttavín", &["Eftirréttavín", "Dessert wine"]),
    ("Umbúðir", &["Umbúðir", "Packaging"]),
];

/// Returned when no category pattern matches a product block.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Keyword probes for special product attributes. Substring containment
/// against full visible text; false negatives are acceptable.
pub const SPECIAL_ATTRIBUTE_INDICATORS: &[&str] = &[
    "Lífrænt",
    "Organic",
    "Vegan",
    "Glútenlaust",
    "Gluten-free",
    "Kosher",
    "Náttúruvín",
    "Natural wine",
    "Sjálfbært",
    "Sustainable",
    "Án viðbætts súlfíts",
    "No added sulfites",
    "Bíódínamík",
    "Biodynamic",
    "Sanngjarnt",
    "Fair trade",
    "Léttgler",
    "Light glass",
];

/// Availability phrase probes in priority order. Default is `Available` when
/// no probe matches.
pub const AVAILABILITY_PROBES: &[(Availability, &[&str])] = &[
    (Availability::SpecialOrder, &["Sérpöntun", "Special order"]),
    (Availability::ComingSoon, &["Væntanlegt", "Coming soon"]),
    (Availability::Discontinued, &["Vara hættir", "Discontinued"]),
];

/// Structured detail-page fields extracted by the label/value walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabeledField {
    Producer,
    Distributor,
    Packaging,
    PackagingWeight,
    CarbonFootprint,
    Country,
    Region,
    Origin,
    Vintage,
    GrapeVariety,
    WineStyle,
    PricePerLiter,
}

/// Label strings per structured field, both languages, plus the suffix of the
/// stable element id the detail page exposes for the field (tried first).
pub const FIELD_LABELS: &[(LabeledField, &[&str], &str)] = &[
    (LabeledField::Producer, &["Framleiðandi", "Producer", "Framleitt af"], "Producer"),
    (LabeledField::Distributor, &["Heildsali", "Supplier", "Distributor"], "Supplier"),
    (LabeledField::Packaging, &["Umbúðir", "Packaging"], "Packaging"),
    (LabeledField::PackagingWeight, &["Þyngd umbúða", "Packaging weight"], "PackagingWeight"),
    (LabeledField::CarbonFootprint, &["Kolefnisspor", "Carbon footprint"], "CarbonFootprint"),
    (LabeledField::Country, &["Land", "Country", "Upprunaland"], "Country"),
    (LabeledField::Region, &["Hérað", "Region"], "Region"),
    (LabeledField::Origin, &["Uppruni", "Origin"], "Origin"),
    (LabeledField::Vintage, &["Árgangur", "Vintage", "Year"], "Vintage"),
    (LabeledField::GrapeVariety, &["Þrúga", "Þrúgur", "Grape variety", "Grapes"], "Grapes"),
    (LabeledField::WineStyle, &["Léttvínsstíll", "Wine style", "Stíll"], "WineStyle"),
    (LabeledField::PricePerLiter, &["Verð á lítra", "Price per liter", "Price per litre"], "PricePerLiter"),
];

/// True when `text` exactly matches any known field label. Used to reject a
/// "value" element that is really the next label in a misaligned sibling run.
pub fn is_reserved_label(text: &str) -> bool {
    let trimmed = text.trim();
    FIELD_LABELS
        .iter()
        .any(|(_, labels, _)| labels.iter().any(|l| l.eq_ignore_ascii_case(trimmed)))
        || OTHER_LABEL_WORDS.iter().any(|l| l.eq_ignore_ascii_case(trimmed))
}

/// Labels that appear on detail pages but are extracted through dedicated
/// paths (or not at all). Still reserved for adjacency rejection and
/// description filtering.
pub const OTHER_LABEL_WORDS: &[&str] = &[
    "Styrkleiki",
    "Alcohol",
    "Eining",
    "Unit",
    "Verð",
    "Price",
    "Magn",
    "Volume",
    "Flokkur",
    "Category",
];

/// Sensory and beverage-style vocabulary used to recognize a descriptive
/// paragraph on a detail page, both languages.
pub const TASTING_VOCABULARY: &[&str] = &[
    // Icelandic
    "keimur",
    "ilmur",
    "bragð",
    "eftirbragð",
    "ávaxta",
    "berja",
    "sítrus",
    "krydd",
    "eik",
    "tannín",
    "sýra",
    "fylling",
    "ferskur",
    "fersk",
    "þurrt",
    "sætt",
    "humlar",
    "malt",
    // English
    "aroma",
    "palate",
    "finish",
    "fruity",
    "berry",
    "citrus",
    "spice",
    "oak",
    "tannin",
    "acidity",
    "body",
    "fresh",
    "crisp",
    "dry",
    "sweet",
    "hops",
    "notes of",
];

/// "See more/less" UI phrases stripped from descriptions, both languages.
pub const BOILERPLATE_PHRASES: &[&str] = &["Sjá meira", "Sjá minna", "See more", "See less"];

/// Internal catalog category identifiers used by the downstream create flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalCategory {
    Wine,
    Beer,
    Spirits,
    Cider,
    Packaging,
    Other,
}

impl InternalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InternalCategory::Wine => "WINE",
            InternalCategory::Beer => "BEER",
            InternalCategory::Spirits => "SPIRITS",
            InternalCategory::Cider => "CIDER",
            InternalCategory::Packaging => "PACKAGING",
            InternalCategory::Other => "OTHER",
        }
    }
}

/// Map a raw extracted category string (either language) to the internal
/// catalog category. Unmatched strings land in `Other`.
pub fn internal_category(raw: &str) -> InternalCategory {
    const SYNONYMS: &[(InternalCategory, &[&str])] = &[
        (
            InternalCategory::Wine,
            &[
                "Rauðvín", "Red wine", "Hvítvín", "White wine", "Rósavín", "Rose wine",
                "Rosé wine", "Freyðivín", "Sparkling wine", "Eftirréttavín", "Dessert wine",
            ],
        ),
        (InternalCategory::Beer, &["Bjór", "Beer"]),
        (
            InternalCategory::Spirits,
            &["Sterkt áfengi", "Spirits", "Líkjör", "Liqueur"],
        ),
        (InternalCategory::Cider, &["Síder", "Cider"]),
        (InternalCategory::Packaging, &["Umbúðir", "Packaging"]),
    ];
    for (cat, names) in SYNONYMS {
        if names.iter().any(|n| raw.eq_ignore_ascii_case(n)) {
            return *cat;
        }
    }
    InternalCategory::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_category_lookup() {
        let lamb = food_category("F").unwrap();
        assert_eq!(lamb.is, "Lambakjöt");
        assert_eq!(lamb.en, "Lamb");
        assert!(food_category("Z").is_none());
    }

    #[test]
    fn test_reserved_label_detection() {
        assert!(is_reserved_label("Framleiðandi"));
        assert!(is_reserved_label("Supplier"));
        assert!(is_reserved_label("  Producer  "));
        assert!(!is_reserved_label("Acme Brewing"));
    }

    #[test]
    fn test_internal_category_mapping() {
        assert_eq!(internal_category("Rauðvín"), InternalCategory::Wine);
        assert_eq!(internal_category("Beer"), InternalCategory::Beer);
        assert_eq!(internal_category("Sterkt áfengi"), InternalCategory::Spirits);
        assert_eq!(internal_category("Something else"), InternalCategory::Other);
    }

    #[test]
    fn test_category_pattern_order_is_stable() {
        // Rosé must match before plain red/white so the broader "wine"
        // substrings do not shadow it.
        let idx_rose = CATEGORY_PATTERNS.iter().position(|(c, _)| *c == "Rósavín").unwrap();
        let idx_beer = CATEGORY_PATTERNS.iter().position(|(c, _)| *c == "Bjór").unwrap();
        assert!(idx_rose < idx_beer);
    }
}
