//! Shared output helpers for CLI commands.
//!
//! Global flags are propagated through environment variables so every
//! module can check them without threading a context struct around.

use serde::Serialize;

/// True when `--json` was passed.
pub fn is_json() -> bool {
    std::env::var("ATVR_JSON").is_ok()
}

/// True when `--quiet` was passed.
pub fn is_quiet() -> bool {
    std::env::var("ATVR_QUIET").is_ok()
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("  Error: failed to serialize output: {e}"),
    }
}
