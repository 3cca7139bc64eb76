//! Media ingestion pipeline tests against a mocked image host.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use atvr_scraper::config::Config;
use atvr_scraper::media::{MediaIngestor, MediaStore};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([120, 40, 40, 255]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn test_setup(uploads: &TempDir) -> (Arc<MediaStore>, MediaIngestor) {
    let config = Arc::new(Config {
        uploads_dir: uploads.path().to_path_buf(),
        ..Config::default()
    });
    let store = Arc::new(MediaStore::open_in_memory().unwrap());
    let ingestor = MediaIngestor::new(Arc::clone(&store), config);
    (store, ingestor)
}

/// Variants derive on a background task; poll until they land.
async fn wait_for_variants(store: &MediaStore, media_id: &str) -> usize {
    for _ in 0..50 {
        let sizes = store.sizes(media_id).unwrap();
        if !sizes.is_empty() {
            return sizes.len();
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    0
}

#[tokio::test]
async fn ingest_stores_original_and_derives_variants() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bottle.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png_bytes(320, 320))
                .insert_header("content-type", "image/png"),
        )
        .mount(&server)
        .await;

    let uploads = TempDir::new().unwrap();
    let (store, ingestor) = test_setup(&uploads);

    let media = ingestor
        .ingest(
            &format!("{}/bottle.png", server.uri()),
            "Egils Gull",
            "01448",
            None,
        )
        .await
        .expect("ingestion should succeed");

    assert_eq!(media.mime_type, "image/png");
    assert_eq!((media.width, media.height), (320, 320));
    assert_eq!(media.alt.as_deref(), Some("Egils Gull"));
    assert!(media.filename.ends_with(".png"));

    let original = uploads
        .path()
        .join("products")
        .join("originals")
        .join(&media.filename);
    assert!(original.exists());

    let variants = wait_for_variants(&store, &media.id).await;
    assert_eq!(variants, 4);

    // Thumbnail URL is backfilled once the rendition exists.
    let refreshed = store.get(&media.id).unwrap().unwrap();
    assert!(refreshed.thumbnail_url.is_some());

    let thumb = uploads
        .path()
        .join("products")
        .join("thumbnails")
        .join(format!("{}_thumbnail.webp", media.id));
    assert!(thumb.exists());
}

#[tokio::test]
async fn ingest_is_idempotent_per_content_hash() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bottle.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png_bytes(64, 64))
                .insert_header("content-type", "image/png"),
        )
        .mount(&server)
        .await;

    let uploads = TempDir::new().unwrap();
    let (_store, ingestor) = test_setup(&uploads);
    let url = format!("{}/bottle.png", server.uri());

    let first = ingestor.ingest(&url, "Egils Gull", "01448", None).await.unwrap();
    let second = ingestor.ingest(&url, "Egils Gull", "01448", None).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.hash, second.hash);

    // Only one original file on disk.
    let originals = uploads.path().join("products").join("originals");
    let count = std::fs::read_dir(&originals).unwrap().count();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn ingest_rejects_undecodable_bytes_and_cleans_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bottle.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"definitely not an image".to_vec())
                .insert_header("content-type", "image/png"),
        )
        .mount(&server)
        .await;

    let uploads = TempDir::new().unwrap();
    let (_store, ingestor) = test_setup(&uploads);

    let result = ingestor
        .ingest(&format!("{}/bottle.png", server.uri()), "X", "1", None)
        .await;
    assert!(result.is_none());

    // The rejected download must not leave a file behind.
    let originals = uploads.path().join("products").join("originals");
    let count = std::fs::read_dir(&originals).unwrap().count();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn concurrent_ingests_of_identical_bytes_converge() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bottle.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png_bytes(64, 64))
                .insert_header("content-type", "image/png"),
        )
        .mount(&server)
        .await;

    let uploads = TempDir::new().unwrap();
    let (_store, ingestor) = test_setup(&uploads);
    let url = format!("{}/bottle.png", server.uri());

    // Both fetches pass the hash lookup before either row is inserted; the
    // unique index decides the winner and the loser reuses its record.
    let (first, second) = tokio::join!(
        ingestor.ingest(&url, "Egils Gull", "01448", None),
        ingestor.ingest(&url, "Egils Gull", "01448", None),
    );

    let first = first.expect("first concurrent ingest should succeed");
    let second = second.expect("second concurrent ingest should succeed");
    assert_eq!(first.id, second.id);
    assert_eq!(first.hash, second.hash);

    // The loser's file is cleaned up: exactly one original remains.
    let originals = uploads.path().join("products").join("originals");
    assert_eq!(std::fs::read_dir(&originals).unwrap().count(), 1);
}

#[tokio::test]
async fn remove_deletes_row_and_all_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bottle.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png_bytes(200, 200))
                .insert_header("content-type", "image/png"),
        )
        .mount(&server)
        .await;

    let uploads = TempDir::new().unwrap();
    let (store, ingestor) = test_setup(&uploads);

    let media = ingestor
        .ingest(&format!("{}/bottle.png", server.uri()), "X", "1", None)
        .await
        .unwrap();
    assert!(wait_for_variants(&store, &media.id).await > 0);

    assert!(ingestor.remove(&media.id).await.unwrap());
    assert!(store.get(&media.id).unwrap().is_none());

    let originals = uploads.path().join("products").join("originals");
    assert_eq!(std::fs::read_dir(&originals).unwrap().count(), 0);
    let thumbnails = uploads.path().join("products").join("thumbnails");
    assert_eq!(std::fs::read_dir(&thumbnails).unwrap().count(), 0);

    // Removing an unknown id is a no-op.
    assert!(!ingestor.remove(&media.id).await.unwrap());
}

#[tokio::test]
async fn ingest_fails_on_missing_image() {
    let server = MockServer::start().await;
    // No mock mounted: the server answers 404.

    let uploads = TempDir::new().unwrap();
    let (_store, ingestor) = test_setup(&uploads);

    let result = ingestor
        .ingest(&format!("{}/missing.png", server.uri()), "X", "1", None)
        .await;
    assert!(result.is_none());
}
