// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! Heuristic field extraction from fetched HTML.
//!
//! Every field is extracted by an ordered list of strategies evaluated
//! first-success-wins; a field whose strategies all miss is simply absent.
//! All functions here are synchronous: `scraper::Html` is not `Send`, so
//! callers parse documents between awaits, never across them.

pub mod detail;
pub mod listing;
pub mod text;

use regex::Regex;

use crate::model::Availability;
use crate::tables::{food_category, AVAILABILITY_PROBES, SPECIAL_ATTRIBUTE_INDICATORS};

// ── Shared field engines ─────────────────────────────────────────────────────

/// Price patterns tried in order against full visible text. The variants
/// (decimal point, decimal comma, bare integer) each cover markup the live
/// site has used; the set is the contract, even where they overlap.
const PRICE_PATTERNS: &[&str] = &[
    r"(\d+(?:\.\d+)?)\s*kr\.?",
    r"(\d+(?:,\d+)?)\s*kr\.?",
    r"(\d+)\s*kr",
];

pub(crate) fn extract_price(text: &str) -> Option<f64> {
    for pattern in PRICE_PATTERNS {
        let re = Regex::new(pattern).expect("price pattern is valid");
        if let Some(caps) = re.captures(text) {
            let numeric = caps[1].replace(',', ".");
            if let Ok(price) = numeric.parse::<f64>() {
                return Some(price);
            }
        }
    }
    None
}

/// Volume/alcohol patterns: combined volume+percent first (they co-occur and
/// disambiguate each other), then volume alone.
const VOLUME_PATTERNS: &[&str] = &[
    r"(\d+(?:\.\d+)?)\s*ml\s*(\d+(?:\.\d+)?)%",
    r"(\d+(?:\.\d+)?)\s*ml\s*(\d+(?:\.\d+)?)\s*%",
    r"(\d+(?:\.\d+)?)\s*ml",
];

pub(crate) fn extract_volume_alcohol(text: &str) -> (Option<String>, Option<f64>) {
    for pattern in VOLUME_PATTERNS {
        let re = Regex::new(pattern).expect("volume pattern is valid");
        if let Some(caps) = re.captures(text) {
            let volume = format!("{} ml", &caps[1]);
            let alcohol = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .filter(|pct| valid_percent(*pct))
                .or_else(|| anchored_alcohol(text));
            return (Some(volume), alcohol);
        }
    }

    (None, anchored_alcohol(text))
}

/// Standalone percent anchored near alcohol keywords, either language.
fn anchored_alcohol(text: &str) -> Option<f64> {
    let anchored = Regex::new(r"(?i)(?:styrkleiki|alcohol|alc)\D{0,20}?(\d+(?:\.\d+)?)\s*%")
        .expect("alcohol pattern is valid");
    anchored
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|pct| valid_percent(*pct))
}

/// Alcohol percentages outside [0, 100] are numeric noise, not data.
pub(crate) fn valid_percent(pct: f64) -> bool {
    (0.0..=100.0).contains(&pct)
}

/// Resolve food-pairing codes from anchor targets (`foodcategory<CODE>`)
/// through the closed code table. Returns (english, icelandic) name lists.
pub(crate) fn food_pairings_from_hrefs<'a>(
    hrefs: impl Iterator<Item = &'a str>,
) -> (Vec<String>, Vec<String>) {
    let re = Regex::new(r"foodcategory([A-Z0-9Æ]+)").expect("food category pattern is valid");
    let mut en = Vec::new();
    let mut is = Vec::new();
    for href in hrefs {
        if let Some(caps) = re.captures(href) {
            if let Some(names) = food_category(&caps[1]) {
                if !en.contains(&names.en.to_string()) {
                    en.push(names.en.to_string());
                    is.push(names.is.to_string());
                }
            }
        }
    }
    (en, is)
}

/// Keyword probes for special attributes against full visible text.
pub(crate) fn special_attributes_from_text(text: &str) -> Vec<String> {
    SPECIAL_ATTRIBUTE_INDICATORS
        .iter()
        .filter(|indicator| text.contains(**indicator))
        .map(|s| s.to_string())
        .collect()
}

/// Phrase probes for availability, in priority order; default `Available`.
pub(crate) fn availability_from_text(text: &str) -> Availability {
    for (availability, phrases) in AVAILABILITY_PROBES {
        if phrases.iter().any(|p| text.contains(p)) {
            return *availability;
        }
    }
    Availability::Available
}

/// Resolve a possibly relative URL against the language's site root.
pub(crate) fn resolve_url(base: &str, src: &str) -> String {
    if src.starts_with("http") {
        src.to_string()
    } else {
        format!("{base}{src}")
    }
}

/// Pull the numeric product id out of an anchor target.
pub(crate) fn product_id_from_href(href: &str) -> Option<String> {
    let re = Regex::new(r"productID=(\d+)").expect("product id pattern is valid");
    re.captures(href).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_patterns_in_order() {
        assert_eq!(extract_price("Verð 2.990 kr."), Some(2.990));
        assert_eq!(extract_price("598 kr"), Some(598.0));
        assert_eq!(extract_price("no price here"), None);
    }

    #[test]
    fn test_combined_volume_and_alcohol() {
        let (volume, alcohol) = extract_volume_alcohol("500 ml 5.6% vol");
        assert_eq!(volume.as_deref(), Some("500 ml"));
        assert_eq!(alcohol, Some(5.6));
    }

    #[test]
    fn test_volume_only() {
        let (volume, alcohol) = extract_volume_alcohol("750 ml bottle");
        assert_eq!(volume.as_deref(), Some("750 ml"));
        assert_eq!(alcohol, None);
    }

    #[test]
    fn test_out_of_range_percent_rejected() {
        let (_, alcohol) = extract_volume_alcohol("330 ml 140%");
        assert_eq!(alcohol, None);
        let (_, alcohol) = extract_volume_alcohol("330 ml 12.5%");
        assert_eq!(alcohol, Some(12.5));
    }

    #[test]
    fn test_anchored_alcohol_keyword() {
        let (volume, alcohol) = extract_volume_alcohol("Styrkleiki: 12.5%");
        assert_eq!(volume, None);
        assert_eq!(alcohol, Some(12.5));
    }

    #[test]
    fn test_food_pairing_codes_resolve_and_dedup() {
        let hrefs = [
            "/search?foodcategoryC",
            "/search?foodcategoryF",
            "/search?foodcategoryC",
            "/search?foodcategoryZZ",
        ];
        let (en, is) = food_pairings_from_hrefs(hrefs.iter().copied());
        assert_eq!(en, vec!["Fish", "Lamb"]);
        assert_eq!(is, vec!["Fiskur", "Lambakjöt"]);
    }

    #[test]
    fn test_availability_probe_order() {
        assert_eq!(
            availability_from_text("Vara hættir í sölu"),
            Availability::Discontinued
        );
        assert_eq!(
            availability_from_text("Special order only"),
            Availability::SpecialOrder
        );
        assert_eq!(availability_from_text("Í boði"), Availability::Available);
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            resolve_url("https://example.is", "/img/p.jpg"),
            "https://example.is/img/p.jpg"
        );
        assert_eq!(
            resolve_url("https://example.is", "https://cdn.example.is/p.jpg"),
            "https://cdn.example.is/p.jpg"
        );
    }

    #[test]
    fn test_product_id_from_href() {
        assert_eq!(
            product_id_from_href("/desktopdefault.aspx/tabid-54/?productID=12345").as_deref(),
            Some("12345")
        );
        assert_eq!(product_id_from_href("/heim/vorur"), None);
    }
}
