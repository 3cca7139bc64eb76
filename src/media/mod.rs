// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! Content-addressed media ingestion.
//!
//! Image bytes are keyed by SHA-256: within a collection, identical content
//! is stored once and later ingestions return the existing record. Variant
//! derivation runs fire-and-forget after the original is durable — callers
//! must not assume renditions exist when `ingest` returns.

pub mod store;
pub mod variants;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::fetch::HttpFetcher;
pub use store::{MediaFormat, MediaSize, MediaStore, StoredMedia};

/// Collection for scraped product imagery.
pub const PRODUCT_COLLECTION: &str = "products";

pub struct MediaIngestor {
    http: HttpFetcher,
    store: Arc<MediaStore>,
    config: Arc<Config>,
}

impl MediaIngestor {
    pub fn new(store: Arc<MediaStore>, config: Arc<Config>) -> Self {
        Self {
            http: HttpFetcher::new(config.media_timeout_ms),
            store,
            config,
        }
    }

    pub fn store(&self) -> &Arc<MediaStore> {
        &self.store
    }

    /// Download and store a product image. Media is non-critical: every
    /// failure is logged and absorbed into `None`.
    pub async fn ingest(
        &self,
        image_url: &str,
        product_name: &str,
        external_id: &str,
        uploaded_by: Option<&str>,
    ) -> Option<StoredMedia> {
        match self
            .try_ingest(image_url, product_name, external_id, uploaded_by)
            .await
        {
            Ok(media) => Some(media),
            Err(e) => {
                warn!(image_url, external_id, error = %e, "media ingestion failed");
                None
            }
        }
    }

    /// Delete a stored media record together with its original file and
    /// every derived rendition. Returns false when the id is unknown.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let Some(media) = self.store.get(id)? else {
            return Ok(false);
        };
        let sizes = self.store.sizes(id)?;
        let formats = self.store.formats(id)?;
        self.store.delete(id)?;

        let uploads = &self.config.uploads_dir;
        let mut paths = vec![uploads.join(&media.path)];
        paths.extend(sizes.iter().map(|s| uploads.join(&s.path)));
        paths.extend(formats.iter().map(|f| uploads.join(&f.path)));
        for path in paths {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "failed to remove media file");
                }
            }
        }
        Ok(true)
    }

    async fn try_ingest(
        &self,
        image_url: &str,
        product_name: &str,
        external_id: &str,
        uploaded_by: Option<&str>,
    ) -> Result<StoredMedia> {
        let (bytes, content_type) = self
            .http
            .get_bytes(image_url)
            .await
            .context("image download failed")?;
        if bytes.is_empty() {
            bail!("image download returned an empty body");
        }

        let hash = hex::encode(Sha256::digest(&bytes));

        if let Some(existing) = self.store.find_by_hash(&hash, PRODUCT_COLLECTION)? {
            info!(hash, id = %existing.id, "identical content already stored");
            return Ok(existing);
        }

        let mime_type = content_type.unwrap_or_else(|| "image/jpeg".to_string());
        let filename = format!("{}.{}", Uuid::new_v4(), extension_for(&mime_type, image_url));

        let originals_dir = self
            .config
            .uploads_dir
            .join(PRODUCT_COLLECTION)
            .join("originals");
        tokio::fs::create_dir_all(&originals_dir)
            .await
            .context("failed to create originals directory")?;
        let file_path = originals_dir.join(&filename);
        tokio::fs::write(&file_path, &bytes)
            .await
            .context("failed to write original file")?;

        // An undecodable "image" is invalid input, not a partial success:
        // drop the file and fail the ingestion.
        let (width, height) = match image::image_dimensions(&file_path) {
            Ok(dims) => dims,
            Err(e) => {
                let _ = tokio::fs::remove_file(&file_path).await;
                bail!("downloaded bytes are not a decodable image: {e}");
            }
        };

        let media = StoredMedia {
            id: Uuid::new_v4().to_string(),
            filename: filename.clone(),
            hash,
            collection: PRODUCT_COLLECTION.to_string(),
            mime_type,
            size: bytes.len() as u64,
            width,
            height,
            url: format!(
                "{}/uploads/{PRODUCT_COLLECTION}/originals/{filename}",
                self.config.media_base_url
            ),
            path: format!("{PRODUCT_COLLECTION}/originals/{filename}"),
            thumbnail_url: None,
            alt: Some(product_name.to_string()),
            caption: Some(product_name.to_string()),
            description: Some(format!("{product_name} (ATVR {external_id})")),
            uploaded_by: uploaded_by.map(str::to_string),
            created_at: Utc::now().to_rfc3339(),
        };
        if let Err(e) = self.store.insert(&media) {
            // A concurrent ingestion of identical bytes can win the insert
            // between the hash lookup and here; the unique index fires for
            // the loser. Drop the loser's file and hand back the stored row.
            let _ = tokio::fs::remove_file(&file_path).await;
            if let Some(existing) = self.store.find_by_hash(&media.hash, PRODUCT_COLLECTION)? {
                info!(hash = %media.hash, id = %existing.id, "lost insert race, reusing stored record");
                return Ok(existing);
            }
            return Err(e);
        }

        // Fire-and-forget: renditions arrive later, failures only get logged.
        let store = Arc::clone(&self.store);
        let config = Arc::clone(&self.config);
        let spawned = media.clone();
        tokio::spawn(async move {
            if let Err(e) = variants::derive_variants(store, config, spawned).await {
                warn!(error = %e, "variant derivation failed");
            }
        });

        Ok(media)
    }
}

fn extension_for(mime_type: &str, url: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/jpeg" | "image/jpg" => "jpg",
        _ => {
            let path = url.split('?').next().unwrap_or(url);
            match path.rsplit('.').next() {
                Some("png") => "png",
                Some("webp") => "webp",
                Some("gif") => "gif",
                _ => "jpg",
            }
        }
    }
}
