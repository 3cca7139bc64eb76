//! `atvr product <id>` — fetch merged bilingual details for one product.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::cli::output;
use crate::config::Config;
use crate::error::DetailError;
use crate::fetch::Fetcher;
use crate::model::Language;
use crate::search::SearchAggregator;

/// Run the product command.
pub async fn run(product_id: &str, language: Language) -> Result<()> {
    let config = Arc::new(Config::from_env());
    let fetcher = Arc::new(Fetcher::new(Arc::clone(&config)));
    let aggregator = SearchAggregator::new(fetcher, config);

    let product = match aggregator.product_details(product_id, language).await {
        Ok(p) => p,
        Err(DetailError::NotFound) => bail!("product '{product_id}' not found"),
        Err(DetailError::UpstreamTimeout) => {
            bail!("vinbudin.is timed out while fetching product '{product_id}'")
        }
    };

    if output::is_json() {
        output::print_json(&product);
        return Ok(());
    }

    if !output::is_quiet() {
        let name = product
            .name
            .as_deref()
            .or(product.name_is.as_deref())
            .unwrap_or("(unnamed)");
        eprintln!("  {name} [{product_id}]");
        if let Some(category) = &product.category {
            eprintln!("    Category:     {category}");
        }
        if let Some(country) = &product.country {
            eprintln!("    Country:      {country}");
        }
        if let Some(producer) = &product.producer {
            eprintln!("    Producer:     {producer}");
        }
        if let Some(price) = product.price {
            eprintln!("    Price:        {price} kr.");
        }
        if let Some(volume) = &product.volume {
            eprintln!("    Volume:       {volume}");
        }
        if let Some(alcohol) = product.alcohol_content {
            eprintln!("    Alcohol:      {alcohol}%");
        }
        if let Some(availability) = product.availability {
            eprintln!("    Availability: {availability:?}");
        }
        if !product.food_pairings.is_empty() {
            eprintln!("    Pairs with:   {}", product.food_pairings.join(", "));
        }
        if let Some(description) = match language {
            Language::Is => product.description_is.as_deref(),
            Language::En => product.description.as_deref(),
        } {
            eprintln!();
            eprintln!("    {description}");
        }
    }

    Ok(())
}
