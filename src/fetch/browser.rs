// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! Headless-browser fallback using chromiumoxide.
//!
//! Launched per fetch: the upstream site only needs rendering rarely
//! (anti-bot pages, JS-built listings), so a persistent browser would sit
//! idle. The browser is torn down on every exit path of [`BrowserFetcher::render`].

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;

use crate::error::FetchError;
use crate::fetch::http::USER_AGENT;

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. ATVR_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("ATVR_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 3. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Per-call headless Chromium renderer.
pub struct BrowserFetcher {
    chrome_path: PathBuf,
    timeout_ms: u64,
    settle_ms: u64,
}

impl BrowserFetcher {
    /// `None` when no Chromium binary can be located.
    pub fn discover(timeout_ms: u64, settle_ms: u64) -> Option<Self> {
        find_chromium().map(|chrome_path| Self {
            chrome_path,
            timeout_ms,
            settle_ms,
        })
    }

    /// Launch a browser, render `url`, and return the fully rendered HTML.
    /// The browser process is closed whether rendering succeeds or fails.
    pub async fn render(&self, url: &str) -> Result<String, FetchError> {
        let config = BrowserConfig::builder()
            .chrome_executable(&self.chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(FetchError::Browser)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Browser(format!("failed to launch Chromium: {e}")))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let result = self.render_inner(&browser, url).await;

        let _ = browser.close().await;
        let _ = browser.wait().await;
        handler_task.abort();

        result
    }

    async fn render_inner(&self, browser: &Browser, url: &str) -> Result<String, FetchError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::Browser(format!("failed to create page: {e}")))?;

        page.set_user_agent(USER_AGENT)
            .await
            .map_err(|e| FetchError::Browser(format!("failed to set user agent: {e}")))?;

        let nav = tokio::time::timeout(Duration::from_millis(self.timeout_ms), page.goto(url)).await;
        match nav {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(FetchError::Browser(format!("navigation failed: {e}"))),
            Err(_) => return Err(FetchError::Timeout(self.timeout_ms)),
        }

        // Fixed settle delay for JS-built content.
        tokio::time::sleep(Duration::from_millis(self.settle_ms)).await;

        let result = page
            .evaluate("document.documentElement.outerHTML")
            .await
            .map_err(|e| FetchError::Browser(format!("failed to read HTML: {e}")))?;

        let html: String = result
            .into_value()
            .map_err(|e| FetchError::Browser(format!("failed to convert HTML result: {e:?}")))?;

        let _ = page.close().await;
        Ok(html)
    }
}
