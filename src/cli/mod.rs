//! CLI subcommand implementations for the atvr binary.

pub mod categories_cmd;
pub mod ingest_cmd;
pub mod output;
pub mod product_cmd;
pub mod search_cmd;
pub mod serve;
