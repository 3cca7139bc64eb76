// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! Extraction of product records from a search-results page.
//!
//! The page renders one `listitem` element per product; when none are present
//! (older markup) any `div` containing a product link is treated as a block.
//! Each block is a pure function input: no state is shared across blocks.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::Config;
use crate::extract::text::is_parenthesized_count;
use crate::extract::{
    availability_from_text, extract_price, extract_volume_alcohol, food_pairings_from_hrefs,
    product_id_from_href, resolve_url, special_attributes_from_text,
};
use crate::fetch::RawDocument;
use crate::model::MergedProduct;
use crate::tables::{CATEGORY_PATTERNS, UNKNOWN_CATEGORY};

/// Extract all product records from a search-results document, deduplicated
/// by product id (first occurrence wins).
pub fn extract_search_results(doc: &RawDocument, config: &Config) -> Vec<MergedProduct> {
    let document = Html::parse_document(&doc.html);
    let base = config.base_url(doc.language);

    let listitem = Selector::parse("listitem").unwrap();
    let mut products: Vec<MergedProduct> = document
        .select(&listitem)
        .filter_map(|block| parse_product_block(block, base))
        .collect();

    // Fallback for markup without listitem wrappers: any div holding a
    // product link. Nested divs repeat products; dedup below absorbs that.
    if products.is_empty() {
        let div = Selector::parse("div").unwrap();
        let product_link = Selector::parse(r#"a[href*="productID"]"#).unwrap();
        products = document
            .select(&div)
            .filter(|block| block.select(&product_link).next().is_some())
            .filter_map(|block| parse_product_block(block, base))
            .collect();
    }

    let mut seen = Vec::new();
    products.retain(|p| match &p.id {
        Some(id) if seen.contains(id) => false,
        Some(id) => {
            seen.push(id.clone());
            true
        }
        None => false,
    });

    debug!(
        count = products.len(),
        language = %doc.language,
        "extracted products from search results"
    );
    products
}

/// Parse one product block. Returns `None` when the block has no usable
/// product link; any other missing field is simply absent.
fn parse_product_block(block: ElementRef<'_>, base: &str) -> Option<MergedProduct> {
    let product_link = Selector::parse(r#"a[href*="productID"]"#).unwrap();

    // A block carries an image-only anchor and a text anchor for the same
    // product; take the first with real text, skipping bare counts like "(3)".
    let (name, href) = block.select(&product_link).find_map(|a| {
        let text = a.text().collect::<String>().trim().to_string();
        if text.is_empty() || is_parenthesized_count(&text) {
            return None;
        }
        a.value().attr("href").map(|href| (text, href.to_string()))
    })?;

    let id = product_id_from_href(&href)?;

    let mut product = MergedProduct {
        id: Some(id.clone()),
        atvr_product_id: Some(id),
        atvr_url: Some(resolve_url(base, &href)),
        name: Some(name.clone()),
        name_is: Some(name),
        ..Default::default()
    };

    let all_text = block.text().collect::<Vec<_>>().join(" ");

    let img = Selector::parse("img").unwrap();
    if let Some(src) = block
        .select(&img)
        .next()
        .and_then(|img| img.value().attr("src"))
    {
        product.atvr_image_url = Some(resolve_url(base, src));
    }

    let category = CATEGORY_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| all_text.contains(p)))
        .map(|(canonical, _)| canonical.to_string())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
    product.category = Some(category.clone());

    let style_link = Selector::parse(r#"a[href*="style="]"#).unwrap();
    product.subcategories = block
        .select(&style_link)
        .filter_map(|a| {
            let text = a.text().collect::<String>().trim().to_string();
            (text.chars().count() > 1 && text != category).then_some(text)
        })
        .collect();

    product.price = extract_price(&all_text);
    let (volume, alcohol) = extract_volume_alcohol(&all_text);
    product.volume = volume;
    product.alcohol_content = alcohol;

    let food_link = Selector::parse(r#"a[href*="foodcategory"]"#).unwrap();
    let hrefs: Vec<&str> = block
        .select(&food_link)
        .filter_map(|a| a.value().attr("href"))
        .collect();
    let (pairings_en, pairings_is) = food_pairings_from_hrefs(hrefs.into_iter());
    product.food_pairings = pairings_en;
    product.food_pairings_is = pairings_is;

    product.special_attributes = special_attributes_from_text(&all_text);
    product.special_attributes_is = product.special_attributes.clone();

    let availability = availability_from_text(&all_text);
    product.availability = Some(availability);
    product.availability_is = Some(availability.icelandic_label().to_string());

    fill_listing_defaults(&mut product);

    Some(product)
}

/// Listing pages expose too little for some fields; fill the defaults the
/// catalog expects: country of sale and a synthesized one-line description.
fn fill_listing_defaults(product: &mut MergedProduct) {
    if product.country.is_none() && product.country_is.is_none() {
        product.country = Some("Iceland".to_string());
        product.country_is = Some("Ísland".to_string());
    }

    if product.description.is_none() && product.description_is.is_none() {
        let category = product
            .category
            .as_deref()
            .unwrap_or("beverage")
            .to_lowercase();
        let country = product.country.as_deref().unwrap_or("Iceland");
        let country_is = product.country_is.as_deref().unwrap_or("Íslandi");
        product.description = Some(format!("A quality {category} from {country}."));
        product.description_is = Some(format!("Gæðavara {category} frá {country_is}."));
    }
}
