//! `atvr ingest <url>` — download a product image into the media store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::cli::output;
use crate::config::Config;
use crate::media::{MediaIngestor, MediaStore};

/// Run the ingest command.
pub async fn run(image_url: &str, product_name: &str, product_id: &str) -> Result<()> {
    let config = Arc::new(Config::from_env());
    let store = Arc::new(MediaStore::open(&config.media_db_path)?);
    let ingestor = MediaIngestor::new(Arc::clone(&store), config);

    let Some(media) = ingestor
        .ingest(image_url, product_name, product_id, None)
        .await
    else {
        bail!("could not ingest '{image_url}' (download failed or not an image)");
    };

    // Variants derive on a background task; give it a bounded window to
    // finish before the process exits.
    let mut sizes = store.sizes(&media.id)?;
    for _ in 0..25 {
        if !sizes.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        sizes = store.sizes(&media.id)?;
    }
    let media = store.get(&media.id)?.unwrap_or(media);

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "media": media,
            "variants": sizes.len(),
        }));
        return Ok(());
    }

    if !output::is_quiet() {
        eprintln!("  Stored {} ({} bytes)", media.filename, media.size);
        eprintln!("    id:        {}", media.id);
        eprintln!("    hash:      {}", media.hash);
        eprintln!("    url:       {}", media.url);
        if let Some(thumb) = &media.thumbnail_url {
            eprintln!("    thumbnail: {thumb}");
        }
        eprintln!("    variants:  {}", sizes.len());
    }

    Ok(())
}
