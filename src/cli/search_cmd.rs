//! `atvr search <term>` — search vinbudin.is in both languages.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::output;
use crate::config::Config;
use crate::fetch::Fetcher;
use crate::search::SearchAggregator;

/// Run the search command.
pub async fn run(term: &str) -> Result<()> {
    let config = Arc::new(Config::from_env());
    let fetcher = Arc::new(Fetcher::new(Arc::clone(&config)));
    let aggregator = SearchAggregator::new(fetcher, config);

    let products = aggregator
        .search(term)
        .await
        .with_context(|| format!("search for '{term}' failed"))?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "searchTerm": term,
            "total": products.len(),
            "products": products,
        }));
        return Ok(());
    }

    if products.is_empty() {
        if !output::is_quiet() {
            eprintln!("  No products found for '{term}'.");
        }
        return Ok(());
    }

    if !output::is_quiet() {
        eprintln!("  Found {} product(s):", products.len());
        eprintln!();
        for p in &products {
            let id = p.atvr_product_id.as_deref().unwrap_or("?");
            let name = p
                .name
                .as_deref()
                .or(p.name_is.as_deref())
                .unwrap_or("(unnamed)");
            let category = p.category.as_deref().unwrap_or("-");
            let price = p
                .price
                .map(|v| format!("{v} kr."))
                .unwrap_or_else(|| "-".to_string());
            eprintln!("    [{id:>5}] {name:<40} {category:<15} {price}");
        }
    }

    Ok(())
}
