//! Runtime configuration with environment-variable overrides.
//!
//! Every setting has a sensible default; `ATVR_*` environment variables
//! override individual fields. No config file is read — the scraper is a
//! subsystem, not an application platform.

use crate::model::Language;
use std::path::PathBuf;

/// Scraper configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Icelandic site root.
    pub base_url_is: String,
    /// English site root.
    pub base_url_en: String,
    /// Plain HTTP fetch timeout in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Browser navigation timeout in milliseconds.
    pub browser_timeout_ms: u64,
    /// Settle delay after navigation, for JS-heavy pages, in milliseconds.
    pub browser_settle_ms: u64,
    /// Whether the headless-browser fallback may be used at all.
    pub browser_enabled: bool,
    /// Media download timeout in milliseconds.
    pub media_timeout_ms: u64,
    /// Root of the uploads tree (`<uploads>/<collection>/originals|thumbnails|webp`).
    pub uploads_dir: PathBuf,
    /// Base URL prefixed onto generated media URLs.
    pub media_base_url: String,
    /// SQLite database path for the media store.
    pub media_db_path: PathBuf,
    /// REST listen port.
    pub http_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url_is: "https://www.vinbudin.is".to_string(),
            base_url_en: "https://www.vinbudin.is/english".to_string(),
            fetch_timeout_ms: 15_000,
            browser_timeout_ms: 20_000,
            browser_settle_ms: 3_000,
            browser_enabled: true,
            media_timeout_ms: 15_000,
            uploads_dir: PathBuf::from("uploads"),
            media_base_url: "http://localhost:5000".to_string(),
            media_db_path: PathBuf::from("media.db"),
            http_port: 5000,
        }
    }
}

impl Config {
    /// Defaults overlaid with `ATVR_*` environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("ATVR_BASE_URL_IS") {
            cfg.base_url_is = v;
        }
        if let Ok(v) = std::env::var("ATVR_BASE_URL_EN") {
            cfg.base_url_en = v;
        }
        if let Ok(v) = std::env::var("ATVR_FETCH_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                cfg.fetch_timeout_ms = ms;
            }
        }
        if let Ok(v) = std::env::var("ATVR_BROWSER_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                cfg.browser_timeout_ms = ms;
            }
        }
        if let Ok(v) = std::env::var("ATVR_BROWSER_SETTLE_MS") {
            if let Ok(ms) = v.parse() {
                cfg.browser_settle_ms = ms;
            }
        }
        if std::env::var("ATVR_NO_BROWSER").is_ok() {
            cfg.browser_enabled = false;
        }
        if let Ok(v) = std::env::var("ATVR_UPLOADS_DIR") {
            cfg.uploads_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("ATVR_MEDIA_BASE_URL") {
            cfg.media_base_url = v;
        }
        if let Ok(v) = std::env::var("ATVR_MEDIA_DB") {
            cfg.media_db_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("ATVR_HTTP_PORT") {
            if let Ok(port) = v.parse() {
                cfg.http_port = port;
            }
        }

        cfg
    }

    /// Site root for a language.
    pub fn base_url(&self, language: Language) -> &str {
        match language {
            Language::Is => &self.base_url_is,
            Language::En => &self.base_url_en,
        }
    }

    /// Search-results URL for a term in a language.
    pub fn search_url(&self, term: &str, language: Language) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(term.as_bytes()).collect();
        format!(
            "{}/heim/vorur/vorur.aspx/?text={}",
            self.base_url(language),
            encoded
        )
    }

    /// Product detail URL for an external product id in a language.
    pub fn detail_url(&self, product_id: &str, language: Language) -> String {
        format!(
            "{}/desktopdefault.aspx/tabid-54/?productID={}",
            self.base_url(language),
            product_id
        )
    }

    /// Best-effort image URL guess for products whose page exposes no image.
    pub fn fallback_image_url(&self, product_id: &str, language: Language) -> String {
        format!(
            "{}/images/products/{}.jpg",
            self.base_url(language),
            product_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_term() {
        let cfg = Config::default();
        let url = cfg.search_url("rauðvín 2020", Language::Is);
        assert!(url.starts_with("https://www.vinbudin.is/heim/vorur/vorur.aspx/?text="));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_detail_url_per_language() {
        let cfg = Config::default();
        assert_eq!(
            cfg.detail_url("01448", Language::En),
            "https://www.vinbudin.is/english/desktopdefault.aspx/tabid-54/?productID=01448"
        );
        assert!(cfg
            .detail_url("01448", Language::Is)
            .starts_with("https://www.vinbudin.is/desktopdefault"));
    }
}
