// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! Extraction of a full product record from a detail page.
//!
//! Structured fields use a two-step strategy: a stable element-id selector
//! when the page exposes one, then a generic label/value walk over the DOM.
//! Descriptions fall through three tiers, from a dedicated content block down
//! to a vocabulary-guided paragraph scan.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::config::Config;
use crate::extract::text::{clamp_at_sentence, clean_description, clean_product_name, collapse_whitespace, strip_boilerplate};
use crate::extract::{
    availability_from_text, extract_price, extract_volume_alcohol, food_pairings_from_hrefs,
    resolve_url, special_attributes_from_text,
};
use crate::fetch::RawDocument;
use crate::model::ProductRecord;
use crate::tables::{is_reserved_label, FIELD_LABELS, LabeledField, CATEGORY_PATTERNS, OTHER_LABEL_WORDS, TASTING_VOCABULARY};

const NAME_SELECTORS: &[&str] = &["h1", "h2", "h3", ".product-title", ".product-name"];

const FULL_DESCRIPTION_SELECTORS: &[&str] = &[
    ".product-description p",
    ".productinfo p",
    "#productDescription",
    ".pnlProductInfo p",
];

const TEASER_DESCRIPTION_SELECTORS: &[&str] = &[
    "[class*='description'] p",
    ".product-info p",
    ".content p",
];

const IMAGE_SELECTORS: &[&str] = &["img.product-image", r#"img[src*="product"]"#, "img"];

const MIN_DESCRIPTION_LEN: usize = 50;
const DESCRIPTION_BAND_MIN: usize = 300;
const DESCRIPTION_BAND_MAX: usize = 2000;

/// Extract a product record from a detail page. Returns `None` when the page
/// has no recognizable product name — the upstream site serves a shell page
/// for unknown ids rather than a 404.
pub fn extract_product_details(
    doc: &RawDocument,
    product_id: &str,
    config: &Config,
) -> Option<ProductRecord> {
    let document = Html::parse_document(&doc.html);
    let base = config.base_url(doc.language);
    let all_text = document.root_element().text().collect::<Vec<_>>().join(" ");

    let name = NAME_SELECTORS.iter().find_map(|sel| {
        let selector = Selector::parse(sel).unwrap();
        document.select(&selector).find_map(|el| {
            let text = el.text().collect::<String>().trim().to_string();
            (!text.is_empty()).then(|| clean_product_name(&text))
        })
    })?;

    let mut record = ProductRecord {
        atvr_product_id: Some(product_id.to_string()),
        atvr_url: Some(doc.url.clone()),
        name: Some(name),
        ..Default::default()
    };

    record.description = extract_description(&document);
    record.price = extract_price(&all_text);
    let (volume, alcohol) = extract_volume_alcohol(&all_text);
    record.volume = volume;
    record.alcohol_content = alcohol;

    record.category = extract_category(&document, &all_text);

    for (field, labels, id_suffix) in FIELD_LABELS {
        let value = field_by_id(&document, id_suffix).or_else(|| labeled_value(&document, labels));
        let Some(value) = value else { continue };
        match field {
            LabeledField::Producer => record.producer = Some(value),
            LabeledField::Distributor => record.distributor = Some(value),
            LabeledField::Packaging => record.packaging = Some(value),
            LabeledField::PackagingWeight => record.packaging_weight = Some(value),
            LabeledField::CarbonFootprint => record.carbon_footprint = Some(value),
            LabeledField::Country => record.country = Some(value),
            LabeledField::Region => record.region = Some(value),
            LabeledField::Origin => record.origin = Some(value),
            LabeledField::Vintage => record.vintage = parse_vintage(&value),
            LabeledField::GrapeVariety => record.grape_variety = Some(value),
            LabeledField::WineStyle => record.wine_style = Some(value),
            LabeledField::PricePerLiter => record.price_per_liter = Some(value),
        }
    }

    let food_link = Selector::parse(r#"a[href*="foodcategory"]"#).unwrap();
    let hrefs: Vec<&str> = document
        .select(&food_link)
        .filter_map(|a| a.value().attr("href"))
        .collect();
    let (pairings_en, pairings_is) = food_pairings_from_hrefs(hrefs.into_iter());
    record.food_pairings = pairings_en;
    record.food_pairings_is = pairings_is;

    record.special_attributes = special_attributes_from_text(&all_text);
    record.availability = Some(availability_from_text(&all_text));

    record.image_url = IMAGE_SELECTORS
        .iter()
        .find_map(|sel| {
            let selector = Selector::parse(sel).unwrap();
            document
                .select(&selector)
                .find_map(|img| img.value().attr("src"))
                .map(|src| resolve_url(base, src))
        })
        .or_else(|| Some(config.fallback_image_url(product_id, doc.language)));

    Some(record)
}

// ── Structured fields ────────────────────────────────────────────────────────

/// Cheap high-confidence shortcut: the page exposes stable element ids for
/// some fields ("...Producer", "...Country").
fn field_by_id(document: &Html, id_suffix: &str) -> Option<String> {
    let selector = Selector::parse(&format!("[id$='{id_suffix}']")).ok()?;
    document.select(&selector).find_map(|el| {
        let text = el.text().collect::<String>().trim().to_string();
        (!text.is_empty() && !is_reserved_label(&text)).then_some(text)
    })
}

/// Generic label/value walk: find an element whose trimmed text exactly
/// equals a known label, preferring matches inside product/detail/info
/// containers and skipping nav/menu chrome, then read the following sibling
/// (or the parent's following sibling when the direct one is empty). A value
/// that is itself a recognized label is a misaligned sibling run, not data.
fn labeled_value(document: &Html, labels: &[&str]) -> Option<String> {
    let any = Selector::parse("*").unwrap();

    let mut fallback: Option<String> = None;
    for el in document.select(&any) {
        let own_text = el.text().collect::<String>().trim().to_string();
        if !labels.iter().any(|l| l.eq_ignore_ascii_case(&own_text)) {
            continue;
        }
        if in_navigation(el) {
            continue;
        }
        let Some(value) = sibling_value(el) else { continue };
        if value.is_empty() || is_reserved_label(&value) {
            continue;
        }
        if in_product_container(el) {
            return Some(value);
        }
        if fallback.is_none() {
            fallback = Some(value);
        }
    }
    fallback
}

fn sibling_value(el: ElementRef<'_>) -> Option<String> {
    if let Some(value) = next_element_text(el) {
        if !value.is_empty() {
            return Some(value);
        }
    }
    let parent = el.parent().and_then(ElementRef::wrap)?;
    next_element_text(parent)
}

fn next_element_text(el: ElementRef<'_>) -> Option<String> {
    el.next_siblings()
        .find_map(ElementRef::wrap)
        .map(|sib| sib.text().collect::<String>().trim().to_string())
}

fn in_navigation(el: ElementRef<'_>) -> bool {
    ancestry_matches(el, &["nav", "menu", "header", "footer"])
}

fn in_product_container(el: ElementRef<'_>) -> bool {
    ancestry_matches(el, &["product", "detail", "info"])
}

fn ancestry_matches(el: ElementRef<'_>, needles: &[&str]) -> bool {
    let mut node = el.parent();
    while let Some(n) = node {
        if let Some(parent) = ElementRef::wrap(n) {
            let v = parent.value();
            let mut hay = v.name().to_lowercase();
            if let Some(id) = v.attr("id") {
                hay.push(' ');
                hay.push_str(&id.to_lowercase());
            }
            if let Some(class) = v.attr("class") {
                hay.push(' ');
                hay.push_str(&class.to_lowercase());
            }
            if needles.iter().any(|needle| hay.contains(needle)) {
                return true;
            }
        }
        node = n.parent();
    }
    false
}

fn parse_vintage(value: &str) -> Option<u16> {
    let re = Regex::new(r"\b(19|20)\d{2}\b").expect("vintage pattern is valid");
    re.find(value).and_then(|m| m.as_str().parse().ok())
}

// ── Category ─────────────────────────────────────────────────────────────────

fn extract_category(document: &Html, all_text: &str) -> Option<String> {
    for sel in [r#"a[href*="category="]"#, ".category", ".product-category"] {
        let selector = Selector::parse(sel).unwrap();
        if let Some(text) = document.select(&selector).find_map(|el| {
            let text = el.text().collect::<String>().trim().to_string();
            (!text.is_empty()).then_some(text)
        }) {
            return Some(text);
        }
    }
    CATEGORY_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| all_text.contains(p)))
        .map(|(canonical, _)| canonical.to_string())
}

// ── Description ──────────────────────────────────────────────────────────────

/// Three-tier description fallback: dedicated content block, teaser block,
/// then a tasting-vocabulary scan over all paragraphs.
fn extract_description(document: &Html) -> Option<String> {
    for selectors in [FULL_DESCRIPTION_SELECTORS, TEASER_DESCRIPTION_SELECTORS] {
        for sel in selectors {
            let selector = Selector::parse(sel).unwrap();
            if let Some(text) = document.select(&selector).find_map(|el| {
                let text = collapse_whitespace(&strip_boilerplate(
                    &el.text().collect::<Vec<_>>().join(" "),
                ));
                (text.chars().count() >= MIN_DESCRIPTION_LEN && !looks_like_script(&text))
                    .then_some(text)
            }) {
                return Some(finish_description(&text));
            }
        }
    }
    paragraph_scan(document).map(|text| finish_description(&text))
}

/// Last-resort scan: collect paragraphs carrying tasting vocabulary, skipping
/// contact/navigation boilerplate and label-prefixed info rows. The longest
/// candidate inside the preferred length band wins; otherwise the first
/// candidate does.
fn paragraph_scan(document: &Html) -> Option<String> {
    let p = Selector::parse("p").unwrap();
    let mut candidates: Vec<String> = Vec::new();

    for el in document.select(&p) {
        let text = collapse_whitespace(&strip_boilerplate(
            &el.text().collect::<Vec<_>>().join(" "),
        ));
        if text.chars().count() < MIN_DESCRIPTION_LEN || looks_like_script(&text) {
            continue;
        }
        let lower = text.to_lowercase();
        if lower.contains('@') || lower.contains("instagram") || lower.contains("facebook") {
            continue;
        }
        if starts_with_label(&text) {
            continue;
        }
        if !TASTING_VOCABULARY
            .iter()
            .any(|word| lower.contains(&word.to_lowercase()))
        {
            continue;
        }
        candidates.push(text);
    }

    let in_band = candidates
        .iter()
        .filter(|c| {
            let len = c.chars().count();
            (DESCRIPTION_BAND_MIN..=DESCRIPTION_BAND_MAX).contains(&len)
        })
        .max_by_key(|c| c.chars().count())
        .cloned();
    in_band.or_else(|| candidates.into_iter().next())
}

fn finish_description(text: &str) -> String {
    clamp_at_sentence(&clean_description(text), DESCRIPTION_BAND_MAX)
}

fn looks_like_script(text: &str) -> bool {
    text.contains("function") || text.contains("$(") || text.contains("accordion")
}

fn starts_with_label(text: &str) -> bool {
    FIELD_LABELS
        .iter()
        .flat_map(|(_, labels, _)| labels.iter())
        .chain(OTHER_LABEL_WORDS.iter())
        .any(|label| text.starts_with(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;

    fn doc(html: &str) -> RawDocument {
        RawDocument {
            url: "https://www.vinbudin.is/desktopdefault.aspx/tabid-54/?productID=01448"
                .to_string(),
            language: Language::Is,
            html: html.to_string(),
        }
    }

    #[test]
    fn test_detail_page_basic_fields() {
        let html = r#"<html><body>
            <div id="productInfo">
                <h1>Egils Gull (3)</h1>
                <div class="product-description"><p>
                    Ljósgylltur bjór með ferskan keim af korni og humlum.
                    Milt eftirbragð og góð fylling, hentar vel með mat.
                </p></div>
                <span>500 ml 5.0%</span>
                <span>598 kr.</span>
                <span>Framleiðandi</span><span>Egils Malt</span>
                <span>Land</span><span>Ísland</span>
            </div>
        </body></html>"#;
        let cfg = Config::default();
        let record = extract_product_details(&doc(html), "01448", &cfg).unwrap();
        assert_eq!(record.name.as_deref(), Some("Egils Gull"));
        assert_eq!(record.price, Some(598.0));
        assert_eq!(record.volume.as_deref(), Some("500 ml"));
        assert_eq!(record.alcohol_content, Some(5.0));
        assert_eq!(record.producer.as_deref(), Some("Egils Malt"));
        assert_eq!(record.country.as_deref(), Some("Ísland"));
        assert!(record.description.as_deref().unwrap().contains("ferskan keim"));
    }

    #[test]
    fn test_no_name_means_no_record() {
        let html = "<html><body><p>Engin vara fannst.</p></body></html>";
        let cfg = Config::default();
        assert!(extract_product_details(&doc(html), "99999", &cfg).is_none());
    }

    #[test]
    fn test_reserved_label_not_taken_as_value() {
        let html = r#"<html><body>
            <h1>Test Wine</h1>
            <div id="productInfo">
                <span>Framleiðandi</span><span>Heildsali</span><span>Acme Brewing</span>
            </div>
        </body></html>"#;
        let cfg = Config::default();
        let record = extract_product_details(&doc(html), "1", &cfg).unwrap();
        // "Heildsali" is the distributor label, not a producer value.
        assert_eq!(record.producer, None);
        assert_eq!(record.distributor.as_deref(), Some("Acme Brewing"));
    }

    #[test]
    fn test_id_shortcut_beats_label_walk() {
        let html = r#"<html><body>
            <h1>Test Wine</h1>
            <span id="ctl01_Label_Producer">Borg Brugghús</span>
            <span>Framleiðandi</span><span>Wrong Value</span>
        </body></html>"#;
        let cfg = Config::default();
        let record = extract_product_details(&doc(html), "1", &cfg).unwrap();
        assert_eq!(record.producer.as_deref(), Some("Borg Brugghús"));
    }

    #[test]
    fn test_nav_labels_skipped() {
        let html = r#"<html><body>
            <h1>Test Wine</h1>
            <nav><span>Land</span><span>Veldu land</span></nav>
            <div class="product-detail">
                <span>Land</span><span>Frakkland</span>
            </div>
        </body></html>"#;
        let cfg = Config::default();
        let record = extract_product_details(&doc(html), "1", &cfg).unwrap();
        assert_eq!(record.country.as_deref(), Some("Frakkland"));
    }

    #[test]
    fn test_vintage_parsed_as_year() {
        let html = r#"<html><body>
            <h1>Test Wine</h1>
            <div id="info"><span>Árgangur</span><span>2019</span></div>
        </body></html>"#;
        let cfg = Config::default();
        let record = extract_product_details(&doc(html), "1", &cfg).unwrap();
        assert_eq!(record.vintage, Some(2019));
    }

    #[test]
    fn test_description_paragraph_scan_prefers_band() {
        let filler = "Berjakeimur og mildur ilmur af eik einkenna þetta vín. ".repeat(7);
        let html = format!(
            r#"<html><body>
                <h1>Test Wine</h1>
                <p>Fylgdu okkur á instagram @vinbudin fyrir berjakeimur fréttir!</p>
                <p>Stutt lýsing með berjakeimur og eik, rétt yfir fimmtíu stafi.</p>
                <p>{filler}</p>
            </body></html>"#
        );
        let cfg = Config::default();
        let record = extract_product_details(&doc(&html), "1", &cfg).unwrap();
        let desc = record.description.unwrap();
        assert!(desc.starts_with("Berjakeimur og mildur"));
        assert!(desc.chars().count() > 300);
    }

    #[test]
    fn test_fallback_image_url_synthesized() {
        let html = "<html><body><h1>Test Wine</h1></body></html>";
        let cfg = Config::default();
        let record = extract_product_details(&doc(html), "01448", &cfg).unwrap();
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://www.vinbudin.is/images/products/01448.jpg")
        );
    }
}
