// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dual-strategy page fetching.
//!
//! A plain HTTP GET is tried first. When that fails, or succeeds with a body
//! that carries none of the expected product markers (the site returns
//! HTTP 200 block pages to non-browsers), a headless browser renders the page
//! instead. Exhausting both strategies yields a [`FetchError`]; callers treat
//! that as "no data for this language", never as a hard failure.

pub mod browser;
pub mod http;

use std::sync::Arc;

use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::model::Language;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

/// A fetched HTML document tagged with its source URL and language.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub url: String,
    pub language: Language,
    pub html: String,
}

/// True when the parsed body contains product marker elements. A 200 response
/// without any marker is treated the same as a failed request.
pub fn has_product_markers(html: &str) -> bool {
    let document = Html::parse_document(html);
    let product_link = Selector::parse(r#"a[href*="productID"]"#).unwrap();
    if document.select(&product_link).next().is_some() {
        return true;
    }
    let listitem = Selector::parse("listitem").unwrap();
    document.select(&listitem).next().is_some()
}

/// Fetcher combining the HTTP strategy with the optional browser fallback.
pub struct Fetcher {
    http: HttpFetcher,
    browser: Option<BrowserFetcher>,
    config: Arc<Config>,
}

impl Fetcher {
    /// Build from config. The browser fallback is absent when disabled or
    /// when no Chromium binary can be found; fetching then degrades to
    /// HTTP-only.
    pub fn new(config: Arc<Config>) -> Self {
        let http = HttpFetcher::new(config.fetch_timeout_ms);
        let browser = if config.browser_enabled {
            let found = BrowserFetcher::discover(config.browser_timeout_ms, config.browser_settle_ms);
            if found.is_none() {
                warn!("no Chromium binary found; browser fallback disabled");
            }
            found
        } else {
            None
        };
        Self { http, browser, config }
    }

    /// HTTP-only fetcher. Used by tests and by environments without Chromium.
    pub fn http_only(config: Arc<Config>) -> Self {
        let http = HttpFetcher::new(config.fetch_timeout_ms);
        Self {
            http,
            browser: None,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch a search-results page. The HTTP result is accepted only when it
    /// contains product markers; otherwise the browser fallback runs.
    pub async fn fetch_search_page(
        &self,
        term: &str,
        language: Language,
    ) -> Result<RawDocument, FetchError> {
        let url = self.config.search_url(term, language);
        self.fetch_with_fallback(&url, language, true).await
    }

    /// Fetch a product detail page. Any 2xx body is accepted from the HTTP
    /// strategy; detail pages render their fields server-side.
    pub async fn fetch_detail_page(
        &self,
        product_id: &str,
        language: Language,
    ) -> Result<RawDocument, FetchError> {
        let url = self.config.detail_url(product_id, language);
        self.fetch_with_fallback(&url, language, false).await
    }

    async fn fetch_with_fallback(
        &self,
        url: &str,
        language: Language,
        require_markers: bool,
    ) -> Result<RawDocument, FetchError> {
        let mut timed_out = false;

        match self.http.get_html(url, language).await {
            Ok(html) => {
                if !require_markers || has_product_markers(&html) {
                    return Ok(RawDocument {
                        url: url.to_string(),
                        language,
                        html,
                    });
                }
                debug!(url, "HTTP response carried no product markers, trying browser");
            }
            Err(e) => {
                timed_out = e.is_timeout();
                debug!(url, error = %e, "HTTP fetch failed, trying browser");
            }
        }

        if let Some(browser) = &self.browser {
            match browser.render(url).await {
                Ok(html) => {
                    return Ok(RawDocument {
                        url: url.to_string(),
                        language,
                        html,
                    });
                }
                Err(e) => {
                    if e.is_timeout() {
                        return Err(e);
                    }
                    warn!(url, error = %e, "browser fallback failed");
                }
            }
        }

        if timed_out {
            Err(FetchError::Timeout(self.config.fetch_timeout_ms))
        } else {
            Err(FetchError::Exhausted {
                url: url.to_string(),
            })
        }
    }

    /// Download raw bytes (media). No browser fallback for binary content.
    pub async fn fetch_bytes(&self, url: &str) -> Result<(Vec<u8>, Option<String>), FetchError> {
        self.http.get_bytes(url).await
    }
}
