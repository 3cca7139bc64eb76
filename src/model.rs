//! Core data model: languages, per-language extraction records, and the
//! bilingual merged product that crosses the API boundary.
//!
//! `ProductRecord` is the partial, single-language output of the field
//! extractor; every field may independently be absent and absence is never an
//! error. `MergedProduct` is the canonical bilingual record, serialized in
//! camelCase so its wire shape matches the catalog API.

use serde::{Deserialize, Serialize};

/// The two site languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Is,
    En,
}

impl Language {
    /// `Accept-Language` header value for this language.
    pub fn accept_language(&self) -> &'static str {
        match self {
            Language::Is => "is-IS,is;q=0.9,en;q=0.8",
            Language::En => "en-US,en;q=0.9",
        }
    }

    pub fn other(&self) -> Language {
        match self {
            Language::Is => Language::En,
            Language::En => Language::Is,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "is" => Ok(Language::Is),
            "en" => Ok(Language::En),
            other => Err(format!("unknown language '{other}' (expected 'is' or 'en')")),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Is => write!(f, "is"),
            Language::En => write!(f, "en"),
        }
    }
}

/// Product availability state, derived from phrase probes against page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    Available,
    SpecialOrder,
    ComingSoon,
    Discontinued,
}

impl Availability {
    /// The Icelandic display label used on the source site.
    pub fn icelandic_label(&self) -> &'static str {
        match self {
            Availability::Available => "Til ráðstöfunar",
            Availability::SpecialOrder => "Sérpöntun",
            Availability::ComingSoon => "Væntanlegt",
            Availability::Discontinued => "Vara hættir",
        }
    }
}

/// Per-language partial extraction result for a detail page.
///
/// Food pairings are the exception to "one language per record": they resolve
/// through a bilingual code table, so both spellings are available from a
/// single page.
#[derive(Debug, Clone, Default)]
pub struct ProductRecord {
    pub atvr_product_id: Option<String>,
    pub atvr_url: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub volume: Option<String>,
    pub alcohol_content: Option<f64>,
    pub category: Option<String>,
    pub subcategories: Vec<String>,
    pub food_pairings: Vec<String>,
    pub food_pairings_is: Vec<String>,
    pub special_attributes: Vec<String>,
    pub availability: Option<Availability>,
    pub producer: Option<String>,
    pub distributor: Option<String>,
    pub packaging: Option<String>,
    pub packaging_weight: Option<String>,
    pub carbon_footprint: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub origin: Option<String>,
    pub vintage: Option<u16>,
    pub grape_variety: Option<String>,
    pub wine_style: Option<String>,
    pub price_per_liter: Option<String>,
    pub image_url: Option<String>,
}

/// The bilingual, deduplicated canonical product record.
///
/// Canonical slots hold English values; `*_is` slots hold Icelandic. After
/// merging, no language-paired field is empty on one side while populated on
/// the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergedProduct {
    pub id: Option<String>,
    pub atvr_product_id: Option<String>,
    pub atvr_url: Option<String>,
    pub atvr_image_url: Option<String>,
    pub name: Option<String>,
    pub name_is: Option<String>,
    pub description: Option<String>,
    pub description_is: Option<String>,
    pub price: Option<f64>,
    pub volume: Option<String>,
    pub volume_is: Option<String>,
    pub alcohol_content: Option<f64>,
    pub category: Option<String>,
    pub subcategories: Vec<String>,
    pub food_pairings: Vec<String>,
    pub food_pairings_is: Vec<String>,
    pub special_attributes: Vec<String>,
    pub special_attributes_is: Vec<String>,
    pub certifications: Vec<String>,
    pub certifications_is: Vec<String>,
    pub availability: Option<Availability>,
    pub availability_is: Option<String>,
    pub producer: Option<String>,
    pub producer_is: Option<String>,
    pub distributor: Option<String>,
    pub distributor_is: Option<String>,
    pub packaging: Option<String>,
    pub packaging_is: Option<String>,
    pub packaging_weight: Option<String>,
    pub packaging_weight_is: Option<String>,
    pub carbon_footprint: Option<String>,
    pub carbon_footprint_is: Option<String>,
    pub country: Option<String>,
    pub country_is: Option<String>,
    pub region: Option<String>,
    pub region_is: Option<String>,
    pub origin: Option<String>,
    pub origin_is: Option<String>,
    pub vintage: Option<u16>,
    pub grape_variety: Option<String>,
    pub grape_variety_is: Option<String>,
    pub wine_style: Option<String>,
    pub wine_style_is: Option<String>,
    pub price_per_liter: Option<String>,
    pub price_per_liter_is: Option<String>,
}

/// Copy `src` into `dst` only when `dst` is empty. First-seen wins.
fn fill<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
    if dst.is_none() {
        if let Some(v) = src {
            *dst = Some(v.clone());
        }
    }
}

/// Append entries of `src` not already present in `dst`, preserving order.
fn union_into(dst: &mut Vec<String>, src: &[String]) {
    for item in src {
        if !dst.contains(item) {
            dst.push(item.clone());
        }
    }
}

impl MergedProduct {
    /// Incremental list-level merge: scalar fields keep the first-seen value,
    /// set-valued fields take the union. Used when the same product id shows
    /// up in both languages' search results.
    pub fn fill_missing_from(&mut self, other: &MergedProduct) {
        fill(&mut self.atvr_url, &other.atvr_url);
        fill(&mut self.atvr_image_url, &other.atvr_image_url);
        fill(&mut self.name, &other.name);
        fill(&mut self.name_is, &other.name_is);
        fill(&mut self.description, &other.description);
        fill(&mut self.description_is, &other.description_is);
        fill(&mut self.price, &other.price);
        fill(&mut self.volume, &other.volume);
        fill(&mut self.volume_is, &other.volume_is);
        fill(&mut self.alcohol_content, &other.alcohol_content);
        fill(&mut self.category, &other.category);
        fill(&mut self.availability, &other.availability);
        fill(&mut self.availability_is, &other.availability_is);
        fill(&mut self.producer, &other.producer);
        fill(&mut self.producer_is, &other.producer_is);
        fill(&mut self.distributor, &other.distributor);
        fill(&mut self.distributor_is, &other.distributor_is);
        fill(&mut self.packaging, &other.packaging);
        fill(&mut self.packaging_is, &other.packaging_is);
        fill(&mut self.packaging_weight, &other.packaging_weight);
        fill(&mut self.packaging_weight_is, &other.packaging_weight_is);
        fill(&mut self.carbon_footprint, &other.carbon_footprint);
        fill(&mut self.carbon_footprint_is, &other.carbon_footprint_is);
        fill(&mut self.country, &other.country);
        fill(&mut self.country_is, &other.country_is);
        fill(&mut self.region, &other.region);
        fill(&mut self.region_is, &other.region_is);
        fill(&mut self.origin, &other.origin);
        fill(&mut self.origin_is, &other.origin_is);
        fill(&mut self.vintage, &other.vintage);
        fill(&mut self.grape_variety, &other.grape_variety);
        fill(&mut self.grape_variety_is, &other.grape_variety_is);
        fill(&mut self.wine_style, &other.wine_style);
        fill(&mut self.wine_style_is, &other.wine_style_is);
        fill(&mut self.price_per_liter, &other.price_per_liter);
        fill(&mut self.price_per_liter_is, &other.price_per_liter_is);

        union_into(&mut self.subcategories, &other.subcategories);
        union_into(&mut self.food_pairings, &other.food_pairings);
        union_into(&mut self.food_pairings_is, &other.food_pairings_is);
        union_into(&mut self.special_attributes, &other.special_attributes);
        union_into(&mut self.special_attributes_is, &other.special_attributes_is);
        union_into(&mut self.certifications, &other.certifications);
        union_into(&mut self.certifications_is, &other.certifications_is);
    }

    /// Copy name/description across the language pair wherever one side is
    /// populated and the other is not.
    pub fn cross_fill_languages(&mut self) {
        if self.name.is_none() && self.name_is.is_some() {
            self.name = self.name_is.clone();
        }
        if self.name_is.is_none() && self.name.is_some() {
            self.name_is = self.name.clone();
        }
        if self.description.is_none() && self.description_is.is_some() {
            self.description = self.description_is.clone();
        }
        if self.description_is.is_none() && self.description.is_some() {
            self.description_is = self.description.clone();
        }
    }
}
