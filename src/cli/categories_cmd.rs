//! `atvr categories` — list product and food categories.

use anyhow::Result;

use crate::cli::output;
use crate::model::Language;
use crate::tables::{FOOD_CATEGORIES, PRODUCT_CATEGORIES};

/// Run the categories command.
pub fn run(language: Language, food: bool) -> Result<()> {
    let table = if food { FOOD_CATEGORIES } else { PRODUCT_CATEGORIES };

    if output::is_json() {
        let items: Vec<serde_json::Value> = table
            .iter()
            .map(|(code, names)| {
                serde_json::json!({
                    "code": code,
                    "name": match language {
                        Language::Is => names.is,
                        Language::En => names.en,
                    },
                })
            })
            .collect();
        output::print_json(&items);
        return Ok(());
    }

    if !output::is_quiet() {
        for (code, names) in table {
            let name = match language {
                Language::Is => names.is,
                Language::En => names.en,
            };
            eprintln!("    {code:<10} {name}");
        }
    }

    Ok(())
}
