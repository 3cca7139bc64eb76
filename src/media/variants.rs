// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! Background derivation of media size and format variants.
//!
//! Runs after the original is durably stored. The ingest path spawns this
//! without awaiting; tests call it directly and await the result.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::DynamicImage;

use crate::config::Config;
use crate::media::store::{MediaFormat, MediaSize, MediaStore, StoredMedia};

/// How a rendition fits its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fit {
    /// Crop to fill the box exactly.
    Cover,
    /// Scale to fit inside the box, never enlarging.
    Inside,
}

struct SizeSpec {
    name: &'static str,
    /// `None` keeps the original dimensions (re-encode only).
    bound: Option<u32>,
    fit: Fit,
}

const SIZE_SPECS: &[SizeSpec] = &[
    SizeSpec { name: "thumbnail", bound: Some(150), fit: Fit::Cover },
    SizeSpec { name: "medium", bound: Some(400), fit: Fit::Inside },
    SizeSpec { name: "large", bound: Some(800), fit: Fit::Inside },
    SizeSpec { name: "full", bound: None, fit: Fit::Inside },
];

/// Derive size variants (WebP renditions) and format variants (JPEG
/// re-encode) for a stored original, recording them as child rows and
/// back-filling the parent's thumbnail URL. Returns the variant count.
pub async fn derive_variants(
    store: Arc<MediaStore>,
    config: Arc<Config>,
    media: StoredMedia,
) -> Result<usize> {
    let uploads_dir = config.uploads_dir.clone();
    let base_url = config.media_base_url.clone();
    let media_for_render = media.clone();

    let (sizes, formats) = tokio::task::spawn_blocking(move || {
        render_variants(&uploads_dir, &base_url, &media_for_render)
    })
    .await
    .context("variant derivation task panicked")??;

    for size in &sizes {
        store.insert_size(size)?;
    }
    for format in &formats {
        store.insert_format(format)?;
    }
    if let Some(thumb) = sizes.iter().find(|s| s.name == "thumbnail") {
        store.set_thumbnail_url(&media.id, &thumb.url)?;
    }

    Ok(sizes.len() + formats.len())
}

fn render_variants(
    uploads_dir: &Path,
    base_url: &str,
    media: &StoredMedia,
) -> Result<(Vec<MediaSize>, Vec<MediaFormat>)> {
    let original = uploads_dir.join(&media.path);
    let img = image::open(&original)
        .with_context(|| format!("failed to open original: {}", original.display()))?;

    let sizes_dir = collection_dir(uploads_dir, &media.collection, "thumbnails")?;
    let formats_dir = collection_dir(uploads_dir, &media.collection, "webp")?;

    let mut sizes = Vec::new();
    for spec in SIZE_SPECS {
        let rendition = match (spec.bound, spec.fit) {
            (Some(bound), Fit::Cover) => img.resize_to_fill(bound, bound, FilterType::Lanczos3),
            (Some(bound), Fit::Inside) if img.width() > bound || img.height() > bound => {
                img.resize(bound, bound, FilterType::Lanczos3)
            }
            _ => img.clone(),
        };

        let filename = format!("{}_{}.webp", media.id, spec.name);
        let out_path = sizes_dir.join(&filename);
        rendition
            .save(&out_path)
            .with_context(|| format!("failed to write rendition: {}", out_path.display()))?;

        sizes.push(MediaSize {
            media_id: media.id.clone(),
            name: spec.name.to_string(),
            width: rendition.width(),
            height: rendition.height(),
            url: format!("{base_url}/uploads/{}/thumbnails/{filename}", media.collection),
            path: format!("{}/thumbnails/{filename}", media.collection),
        });
    }

    // JPEG re-encode at original size. JPEG carries no alpha channel.
    let filename = format!("{}.jpeg", media.id);
    let out_path = formats_dir.join(&filename);
    let rgb: DynamicImage = DynamicImage::ImageRgb8(img.to_rgb8());
    rgb.save(&out_path)
        .with_context(|| format!("failed to write jpeg variant: {}", out_path.display()))?;

    let formats = vec![MediaFormat {
        media_id: media.id.clone(),
        format: "jpeg".to_string(),
        url: format!("{base_url}/uploads/{}/webp/{filename}", media.collection),
        path: format!("{}/webp/{filename}", media.collection),
    }];

    Ok((sizes, formats))
}

fn collection_dir(uploads_dir: &Path, collection: &str, area: &str) -> Result<PathBuf> {
    let dir = uploads_dir.join(collection).join(area);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create media directory: {}", dir.display()))?;
    Ok(dir)
}
