// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bilingual record merging.
//!
//! The Icelandic record is the base; English values fill the canonical slots
//! with Icelandic fallback. The direction is a fixed convention — downstream
//! consumers depend on Icelandic-first precedence for unlabeled fields.

use crate::config::Config;
use crate::extract::text::clean_description;
use crate::model::{Availability, Language, MergedProduct, ProductRecord};

/// Merge per-language detail records into one bilingual product.
/// `None` when neither language produced a record.
pub fn merge_details(
    is_record: Option<ProductRecord>,
    en_record: Option<ProductRecord>,
    requested: Language,
    product_id: &str,
    config: &Config,
) -> Option<MergedProduct> {
    if is_record.is_none() && en_record.is_none() {
        return None;
    }
    let is_record = is_record.unwrap_or_default();
    let en_record = en_record.unwrap_or_default();

    let mut merged = MergedProduct {
        id: Some(product_id.to_string()),
        atvr_product_id: Some(product_id.to_string()),
        atvr_url: Some(config.detail_url(product_id, requested)),
        ..Default::default()
    };

    // Canonical slot: English first, Icelandic fallback. The *_is slot takes
    // the Icelandic value, falling back to English when Iceland came up empty.
    merged.name = en_record.name.clone();
    merged.name_is = is_record.name.clone();
    merged.description = en_record.description.clone();
    merged.description_is = is_record.description.clone();

    // The requested language's name/description additionally fall back to the
    // other language's value when its own extraction found nothing.
    match requested {
        Language::Is => {
            if merged.name_is.is_none() {
                merged.name_is = en_record.name.clone();
            }
            if merged.description_is.is_none() {
                merged.description_is = en_record.description.clone();
            }
        }
        Language::En => {
            if merged.name.is_none() {
                merged.name = is_record.name.clone();
            }
            if merged.description.is_none() {
                merged.description = is_record.description.clone();
            }
        }
    }

    merged.price = en_record.price.or(is_record.price);
    merged.volume = canonical(&en_record.volume, &is_record.volume);
    merged.volume_is = localized(&is_record.volume, &en_record.volume);
    merged.alcohol_content = en_record.alcohol_content.or(is_record.alcohol_content);
    merged.category = canonical(&en_record.category, &is_record.category);
    merged.vintage = en_record.vintage.or(is_record.vintage);

    merged.producer = canonical(&en_record.producer, &is_record.producer);
    merged.producer_is = localized(&is_record.producer, &en_record.producer);
    merged.distributor = canonical(&en_record.distributor, &is_record.distributor);
    merged.distributor_is = localized(&is_record.distributor, &en_record.distributor);
    merged.packaging = canonical(&en_record.packaging, &is_record.packaging);
    merged.packaging_is = localized(&is_record.packaging, &en_record.packaging);
    merged.packaging_weight = canonical(&en_record.packaging_weight, &is_record.packaging_weight);
    merged.packaging_weight_is =
        localized(&is_record.packaging_weight, &en_record.packaging_weight);
    merged.carbon_footprint = canonical(&en_record.carbon_footprint, &is_record.carbon_footprint);
    merged.carbon_footprint_is =
        localized(&is_record.carbon_footprint, &en_record.carbon_footprint);
    merged.country = canonical(&en_record.country, &is_record.country);
    merged.country_is = localized(&is_record.country, &en_record.country);
    merged.region = canonical(&en_record.region, &is_record.region);
    merged.region_is = localized(&is_record.region, &en_record.region);
    merged.origin = canonical(&en_record.origin, &is_record.origin);
    merged.origin_is = localized(&is_record.origin, &en_record.origin);
    merged.grape_variety = canonical(&en_record.grape_variety, &is_record.grape_variety);
    merged.grape_variety_is = localized(&is_record.grape_variety, &en_record.grape_variety);
    merged.wine_style = canonical(&en_record.wine_style, &is_record.wine_style);
    merged.wine_style_is = localized(&is_record.wine_style, &en_record.wine_style);
    merged.price_per_liter = canonical(&en_record.price_per_liter, &is_record.price_per_liter);
    merged.price_per_liter_is =
        localized(&is_record.price_per_liter, &en_record.price_per_liter);

    merged.subcategories = union(&is_record.subcategories, &en_record.subcategories);
    merged.food_pairings = union(&en_record.food_pairings, &is_record.food_pairings);
    merged.food_pairings_is = union(&is_record.food_pairings_is, &en_record.food_pairings_is);
    merged.special_attributes =
        union(&is_record.special_attributes, &en_record.special_attributes);
    merged.special_attributes_is = merged.special_attributes.clone();

    let availability = en_record
        .availability
        .or(is_record.availability)
        .unwrap_or(Availability::Available);
    merged.availability = Some(availability);
    merged.availability_is = Some(availability.icelandic_label().to_string());

    merged.atvr_image_url = localized(&is_record.image_url, &en_record.image_url);

    // No language-paired slot may stay empty when the other side has data.
    merged.cross_fill_languages();

    // Merge may substitute a differently sourced string; normalize again.
    merged.description = merged.description.as_deref().map(clean_description);
    merged.description_is = merged.description_is.as_deref().map(clean_description);

    Some(merged)
}

/// English value with Icelandic fallback.
fn canonical(en: &Option<String>, is: &Option<String>) -> Option<String> {
    en.clone().or_else(|| is.clone())
}

/// Icelandic value with English fallback.
fn localized(is: &Option<String>, en: &Option<String>) -> Option<String> {
    is.clone().or_else(|| en.clone())
}

fn union(first: &[String], second: &[String]) -> Vec<String> {
    let mut out: Vec<String> = first.to_vec();
    for item in second {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config::default()
    }

    #[test]
    fn test_both_records_merge_by_language() {
        let is_record = ProductRecord {
            name: Some("Rauðvín X".to_string()),
            producer: Some("Framleiðandi hf".to_string()),
            country: Some("Frakkland".to_string()),
            ..Default::default()
        };
        let en_record = ProductRecord {
            name: Some("Red Wine X".to_string()),
            producer: Some("Producer Ltd".to_string()),
            country: Some("France".to_string()),
            ..Default::default()
        };
        let merged =
            merge_details(Some(is_record), Some(en_record), Language::En, "100", &cfg()).unwrap();
        assert_eq!(merged.name.as_deref(), Some("Red Wine X"));
        assert_eq!(merged.name_is.as_deref(), Some("Rauðvín X"));
        assert_eq!(merged.producer.as_deref(), Some("Producer Ltd"));
        assert_eq!(merged.producer_is.as_deref(), Some("Framleiðandi hf"));
        assert_eq!(merged.country.as_deref(), Some("France"));
        assert_eq!(merged.country_is.as_deref(), Some("Frakkland"));
    }

    #[test]
    fn test_one_language_failure_is_graceful() {
        let is_record = ProductRecord {
            name: Some("Rauðvín X".to_string()),
            ..Default::default()
        };
        let merged = merge_details(Some(is_record), None, Language::En, "100", &cfg()).unwrap();
        assert_eq!(merged.name_is.as_deref(), Some("Rauðvín X"));
        // Canonical name falls back to the only language that produced data.
        assert_eq!(merged.name.as_deref(), Some("Rauðvín X"));
    }

    #[test]
    fn test_both_missing_is_none() {
        assert!(merge_details(None, None, Language::Is, "100", &cfg()).is_none());
    }

    #[test]
    fn test_description_renormalized_after_merge() {
        let is_record = ProductRecord {
            name: Some("Vín".to_string()),
            description: Some("Djúsí ávaxtakeimur.Ferskur blómailmur".to_string()),
            ..Default::default()
        };
        let merged = merge_details(Some(is_record), None, Language::Is, "7", &cfg()).unwrap();
        assert_eq!(
            merged.description_is.as_deref(),
            Some("Djúsí ávaxtakeimur. Ferskur blómailmur")
        );
    }

    #[test]
    fn test_set_fields_union() {
        let is_record = ProductRecord {
            name: Some("Vín".to_string()),
            food_pairings: vec!["Fish".to_string()],
            food_pairings_is: vec!["Fiskur".to_string()],
            special_attributes: vec!["Lífrænt".to_string()],
            ..Default::default()
        };
        let en_record = ProductRecord {
            name: Some("Wine".to_string()),
            food_pairings: vec!["Fish".to_string(), "Lamb".to_string()],
            food_pairings_is: vec!["Fiskur".to_string(), "Lambakjöt".to_string()],
            special_attributes: vec!["Organic".to_string()],
            ..Default::default()
        };
        let merged =
            merge_details(Some(is_record), Some(en_record), Language::Is, "9", &cfg()).unwrap();
        assert_eq!(merged.food_pairings, vec!["Fish", "Lamb"]);
        assert_eq!(merged.food_pairings_is, vec!["Fiskur", "Lambakjöt"]);
        assert_eq!(merged.special_attributes, vec!["Lífrænt", "Organic"]);
    }
}
