//! Plain HTTP fetch strategy wrapping reqwest.
//!
//! Not a browser — just GET requests with realistic desktop headers,
//! retry on 5xx, and exponential backoff.

use std::time::Duration;

use crate::error::FetchError;
use crate::model::Language;

/// Desktop user agent presented to the upstream site by both strategies.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

const MAX_RETRIES: u32 = 2;

/// HTTP client for page and media downloads.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl HttpFetcher {
    pub fn new(timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client, timeout_ms }
    }

    /// GET a page as text with the language-appropriate `Accept-Language`.
    /// Retries transient 5xx responses with exponential backoff; a persistent
    /// non-2xx status is a typed error, not a panic.
    pub async fn get_html(&self, url: &str, language: Language) -> Result<String, FetchError> {
        let mut retries = 0u32;

        loop {
            let resp = self
                .client
                .get(url)
                .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8")
                .header("Accept-Language", language.accept_language())
                .timeout(Duration::from_millis(self.timeout_ms))
                .send()
                .await;

            match resp {
                Ok(r) => {
                    let status = r.status().as_u16();
                    if status >= 500 && retries < MAX_RETRIES {
                        retries += 1;
                        let delay = Duration::from_millis(500 * 2u64.pow(retries - 1));
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    if !r.status().is_success() {
                        return Err(FetchError::Status {
                            status,
                            url: url.to_string(),
                        });
                    }
                    return Ok(r.text().await?);
                }
                Err(e) => {
                    if retries < MAX_RETRIES && !e.is_timeout() {
                        retries += 1;
                        let delay = Duration::from_millis(500 * 2u64.pow(retries - 1));
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// GET raw bytes plus the declared content type. Used for media downloads.
    pub async fn get_bytes(&self, url: &str) -> Result<(Vec<u8>, Option<String>), FetchError> {
        let r = self
            .client
            .get(url)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await?;

        let status = r.status().as_u16();
        if !r.status().is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let content_type = r
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let bytes = r.bytes().await?.to_vec();
        Ok((bytes, content_type))
    }
}
