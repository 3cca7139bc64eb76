// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use atvr_scraper::cli;
use atvr_scraper::model::Language;

#[derive(Parser)]
#[command(
    name = "atvr",
    about = "ATVR scraper — bilingual product extraction for vinbudin.is",
    version,
    after_help = "Run 'atvr <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP REST API server
    Serve {
        /// Listen port (overrides ATVR_HTTP_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Search vinbudin.is for products in both languages
    Search {
        /// Search term (product name or part of it)
        term: String,
    },
    /// Fetch merged bilingual details for one product
    Product {
        /// ATVR product id (e.g. "01448")
        id: String,
        /// Preferred language for name/description fallback (is, en)
        #[arg(long, default_value = "is")]
        language: Language,
    },
    /// Download a product image into the media store
    Ingest {
        /// Image URL to download
        url: String,
        /// Product name, used for alt text and captions
        #[arg(long)]
        name: String,
        /// ATVR product id the image belongs to
        #[arg(long)]
        id: String,
    },
    /// List product or food-pairing categories
    Categories {
        /// Language for category names (is, en)
        #[arg(long, default_value = "is")]
        language: Language,
        /// List food-pairing categories instead of product categories
        #[arg(long)]
        food: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("ATVR_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("ATVR_QUIET", "1");
    }

    let result = match cli.command {
        Commands::Serve { port } => cli::serve::run(port).await,
        Commands::Search { term } => cli::search_cmd::run(&term).await,
        Commands::Product { id, language } => cli::product_cmd::run(&id, language).await,
        Commands::Ingest { url, name, id } => cli::ingest_cmd::run(&url, &name, &id).await,
        Commands::Categories { language, food } => cli::categories_cmd::run(language, food),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "atvr", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() && !cli::output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
