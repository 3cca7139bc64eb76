// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! Cross-language search aggregation and single-product lookup.
//!
//! Both language pipelines run concurrently and fail independently: one
//! language erroring out degrades the result to the other language's data,
//! never to a hard failure. Only both pipelines failing surfaces an error.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{DetailError, FetchError};
use crate::extract::{detail, listing};
use crate::fetch::Fetcher;
use crate::merge::merge_details;
use crate::model::{Language, MergedProduct, ProductRecord};

pub struct SearchAggregator {
    fetcher: Arc<Fetcher>,
    config: Arc<Config>,
}

impl SearchAggregator {
    pub fn new(fetcher: Arc<Fetcher>, config: Arc<Config>) -> Self {
        Self { fetcher, config }
    }

    /// Search both language variants of the site and merge the results.
    /// Errs only when both pipelines fail outright.
    pub async fn search(&self, term: &str) -> Result<Vec<MergedProduct>, FetchError> {
        let (is_result, en_result) = tokio::join!(
            self.search_language(term, Language::Is),
            self.search_language(term, Language::En),
        );

        if is_result.is_err() && en_result.is_err() {
            let is_err = is_result.unwrap_err();
            let en_err = en_result.unwrap_err();
            warn!(term, is_error = %is_err, en_error = %en_err, "search failed in both languages");
            return Err(if is_err.is_timeout() { is_err } else { en_err });
        }

        let is_products = is_result.unwrap_or_else(|e| {
            warn!(term, error = %e, "Icelandic search pipeline failed");
            Vec::new()
        });
        let en_products = en_result.unwrap_or_else(|e| {
            warn!(term, error = %e, "English search pipeline failed");
            Vec::new()
        });

        // Icelandic results first: stable insertion order into the merge map.
        let mut merged: Vec<MergedProduct> = Vec::new();
        for product in is_products.into_iter().chain(en_products) {
            if !is_relevant(&product, term) {
                continue;
            }
            match merged
                .iter_mut()
                .find(|existing| existing.id == product.id)
            {
                Some(existing) => existing.fill_missing_from(&product),
                None => merged.push(product),
            }
        }

        for product in &mut merged {
            product.cross_fill_languages();
        }

        info!(term, count = merged.len(), "merged search results");
        Ok(merged)
    }

    async fn search_language(
        &self,
        term: &str,
        language: Language,
    ) -> Result<Vec<MergedProduct>, FetchError> {
        let doc = self.fetcher.fetch_search_page(term, language).await?;
        Ok(listing::extract_search_results(&doc, &self.config))
    }

    /// Fetch and merge both language variants of a product detail page.
    pub async fn product_details(
        &self,
        product_id: &str,
        requested: Language,
    ) -> Result<MergedProduct, DetailError> {
        let (is_doc, en_doc) = tokio::join!(
            self.fetcher.fetch_detail_page(product_id, Language::Is),
            self.fetcher.fetch_detail_page(product_id, Language::En),
        );

        if let (Err(is_err), Err(en_err)) = (&is_doc, &en_doc) {
            if is_err.is_timeout() || en_err.is_timeout() {
                return Err(DetailError::UpstreamTimeout);
            }
        }

        let is_record = self.extract_detail(is_doc, product_id, Language::Is);
        let en_record = self.extract_detail(en_doc, product_id, Language::En);

        merge_details(is_record, en_record, requested, product_id, &self.config)
            .ok_or(DetailError::NotFound)
    }

    fn extract_detail(
        &self,
        doc: Result<crate::fetch::RawDocument, FetchError>,
        product_id: &str,
        language: Language,
    ) -> Option<ProductRecord> {
        match doc {
            Ok(doc) => detail::extract_product_details(&doc, product_id, &self.config),
            Err(e) => {
                warn!(product_id, %language, error = %e, "detail fetch failed");
                None
            }
        }
    }
}

/// Case-insensitive substring match against either language's name. Listing
/// pages surface loosely related products; this keeps only real matches.
fn is_relevant(product: &MergedProduct, term: &str) -> bool {
    let needle = term.to_lowercase();
    let matches = |name: &Option<String>| {
        name.as_deref()
            .map(|n| n.to_lowercase().contains(&needle))
            .unwrap_or(false)
    };
    matches(&product.name) || matches(&product.name_is)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str, name: &str, name_is: &str) -> MergedProduct {
        MergedProduct {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            name_is: Some(name_is.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_relevance_filter_is_case_insensitive() {
        let vodka = named("1", "Reyka Vodka", "Reyka Vodka");
        let brennivin = named("2", "Brennivin", "Brennivín");
        assert!(is_relevant(&vodka, "vodka"));
        assert!(!is_relevant(&brennivin, "vodka"));
        assert!(is_relevant(&brennivin, "brenni"));
        assert!(!is_relevant(&vodka, "brenni"));
    }

    #[test]
    fn test_relevance_matches_either_language() {
        let product = named("3", "Red Wine X", "Rauðvín X");
        assert!(is_relevant(&product, "rauðvín"));
        assert!(is_relevant(&product, "red wine"));
    }
}
