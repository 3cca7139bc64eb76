// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! SQLite-backed media metadata store.
//!
//! The `(hash, collection)` unique index is the content-addressing contract:
//! byte-identical files within a collection share one row.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

/// A stored media record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMedia {
    pub id: String,
    pub filename: String,
    pub hash: String,
    pub collection: String,
    pub mime_type: String,
    pub size: u64,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub path: String,
    pub thumbnail_url: Option<String>,
    pub alt: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
    pub uploaded_by: Option<String>,
    pub created_at: String,
}

/// A derived size variant (resized rendition) of a media record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSize {
    pub media_id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub path: String,
}

/// A derived format variant (re-encoding at original size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFormat {
    pub media_id: String,
    pub format: String,
    pub url: String,
    pub path: String,
}

/// Media metadata store. The connection is guarded by a mutex; media traffic
/// is low-volume and the simplicity beats a pool here.
pub struct MediaStore {
    db: Mutex<Connection>,
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS media (
        id TEXT PRIMARY KEY,
        filename TEXT NOT NULL,
        hash TEXT NOT NULL,
        collection TEXT NOT NULL,
        mime_type TEXT NOT NULL,
        size INTEGER NOT NULL,
        width INTEGER NOT NULL,
        height INTEGER NOT NULL,
        url TEXT NOT NULL,
        path TEXT NOT NULL,
        thumbnail_url TEXT,
        alt TEXT,
        caption TEXT,
        description TEXT,
        uploaded_by TEXT,
        created_at TEXT NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_media_hash_collection
        ON media(hash, collection);
    CREATE TABLE IF NOT EXISTS media_size (
        media_id TEXT NOT NULL,
        name TEXT NOT NULL,
        width INTEGER NOT NULL,
        height INTEGER NOT NULL,
        url TEXT NOT NULL,
        path TEXT NOT NULL,
        PRIMARY KEY (media_id, name)
    );
    CREATE TABLE IF NOT EXISTS media_format (
        media_id TEXT NOT NULL,
        format TEXT NOT NULL,
        url TEXT NOT NULL,
        path TEXT NOT NULL,
        PRIMARY KEY (media_id, format)
    );
";

impl MediaStore {
    /// Open or create the store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Connection::open(path)
            .with_context(|| format!("failed to open media store: {}", path.display()))?;
        db.execute_batch(SCHEMA)
            .context("failed to create media tables")?;
        Ok(Self { db: Mutex::new(db) })
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("failed to open in-memory media store")?;
        db.execute_batch(SCHEMA)
            .context("failed to create media tables")?;
        Ok(Self { db: Mutex::new(db) })
    }

    pub fn insert(&self, media: &StoredMedia) -> Result<()> {
        let db = self.db.lock().expect("media store mutex poisoned");
        db.execute(
            "INSERT INTO media (id, filename, hash, collection, mime_type, size, width, height,
                                url, path, thumbnail_url, alt, caption, description, uploaded_by,
                                created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                media.id,
                media.filename,
                media.hash,
                media.collection,
                media.mime_type,
                media.size,
                media.width,
                media.height,
                media.url,
                media.path,
                media.thumbnail_url,
                media.alt,
                media.caption,
                media.description,
                media.uploaded_by,
                media.created_at,
            ],
        )
        .context("failed to insert media record")?;
        Ok(())
    }

    /// Dedup lookup: an existing record with the same content hash in the
    /// same collection.
    pub fn find_by_hash(&self, hash: &str, collection: &str) -> Result<Option<StoredMedia>> {
        let db = self.db.lock().expect("media store mutex poisoned");
        db.query_row(
            "SELECT * FROM media WHERE hash = ?1 AND collection = ?2",
            params![hash, collection],
            row_to_media,
        )
        .optional()
        .context("failed to query media by hash")
    }

    pub fn get(&self, id: &str) -> Result<Option<StoredMedia>> {
        let db = self.db.lock().expect("media store mutex poisoned");
        db.query_row("SELECT * FROM media WHERE id = ?1", params![id], row_to_media)
            .optional()
            .context("failed to query media by id")
    }

    pub fn set_thumbnail_url(&self, id: &str, url: &str) -> Result<()> {
        let db = self.db.lock().expect("media store mutex poisoned");
        db.execute(
            "UPDATE media SET thumbnail_url = ?2 WHERE id = ?1",
            params![id, url],
        )
        .context("failed to update thumbnail url")?;
        Ok(())
    }

    pub fn insert_size(&self, size: &MediaSize) -> Result<()> {
        let db = self.db.lock().expect("media store mutex poisoned");
        db.execute(
            "INSERT OR REPLACE INTO media_size (media_id, name, width, height, url, path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![size.media_id, size.name, size.width, size.height, size.url, size.path],
        )
        .context("failed to insert media size")?;
        Ok(())
    }

    pub fn insert_format(&self, format: &MediaFormat) -> Result<()> {
        let db = self.db.lock().expect("media store mutex poisoned");
        db.execute(
            "INSERT OR REPLACE INTO media_format (media_id, format, url, path)
             VALUES (?1, ?2, ?3, ?4)",
            params![format.media_id, format.format, format.url, format.path],
        )
        .context("failed to insert media format")?;
        Ok(())
    }

    pub fn sizes(&self, media_id: &str) -> Result<Vec<MediaSize>> {
        let db = self.db.lock().expect("media store mutex poisoned");
        let mut stmt = db.prepare(
            "SELECT media_id, name, width, height, url, path FROM media_size
             WHERE media_id = ?1 ORDER BY name",
        )?;
        let rows = stmt.query_map(params![media_id], |row| {
            Ok(MediaSize {
                media_id: row.get(0)?,
                name: row.get(1)?,
                width: row.get(2)?,
                height: row.get(3)?,
                url: row.get(4)?,
                path: row.get(5)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to read media sizes")
    }

    pub fn formats(&self, media_id: &str) -> Result<Vec<MediaFormat>> {
        let db = self.db.lock().expect("media store mutex poisoned");
        let mut stmt = db.prepare(
            "SELECT media_id, format, url, path FROM media_format
             WHERE media_id = ?1 ORDER BY format",
        )?;
        let rows = stmt.query_map(params![media_id], |row| {
            Ok(MediaFormat {
                media_id: row.get(0)?,
                format: row.get(1)?,
                url: row.get(2)?,
                path: row.get(3)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to read media formats")
    }

    /// Delete a record with its derived rows. Returns the deleted record so
    /// the caller can remove files from disk.
    pub fn delete(&self, id: &str) -> Result<Option<StoredMedia>> {
        let media = self.get(id)?;
        if media.is_some() {
            let db = self.db.lock().expect("media store mutex poisoned");
            db.execute("DELETE FROM media_size WHERE media_id = ?1", params![id])?;
            db.execute("DELETE FROM media_format WHERE media_id = ?1", params![id])?;
            db.execute("DELETE FROM media WHERE id = ?1", params![id])?;
        }
        Ok(media)
    }
}

fn row_to_media(row: &Row<'_>) -> rusqlite::Result<StoredMedia> {
    Ok(StoredMedia {
        id: row.get("id")?,
        filename: row.get("filename")?,
        hash: row.get("hash")?,
        collection: row.get("collection")?,
        mime_type: row.get("mime_type")?,
        size: row.get("size")?,
        width: row.get("width")?,
        height: row.get("height")?,
        url: row.get("url")?,
        path: row.get("path")?,
        thumbnail_url: row.get("thumbnail_url")?,
        alt: row.get("alt")?,
        caption: row.get("caption")?,
        description: row.get("description")?,
        uploaded_by: row.get("uploaded_by")?,
        created_at: row.get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, hash: &str) -> StoredMedia {
        StoredMedia {
            id: id.to_string(),
            filename: format!("{id}.png"),
            hash: hash.to_string(),
            collection: "products".to_string(),
            mime_type: "image/png".to_string(),
            size: 1024,
            width: 4,
            height: 4,
            url: format!("http://localhost:5000/uploads/products/originals/{id}.png"),
            path: format!("products/originals/{id}.png"),
            thumbnail_url: None,
            alt: Some("Wine A".to_string()),
            caption: None,
            description: None,
            uploaded_by: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_insert_and_find_by_hash() {
        let store = MediaStore::open_in_memory().unwrap();
        store.insert(&sample("m1", "abc123")).unwrap();

        let found = store.find_by_hash("abc123", "products").unwrap().unwrap();
        assert_eq!(found.id, "m1");
        assert!(store.find_by_hash("abc123", "banners").unwrap().is_none());
        assert!(store.find_by_hash("zzz", "products").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_hash_in_collection_rejected() {
        let store = MediaStore::open_in_memory().unwrap();
        store.insert(&sample("m1", "abc123")).unwrap();
        assert!(store.insert(&sample("m2", "abc123")).is_err());
    }

    #[test]
    fn test_thumbnail_backfill() {
        let store = MediaStore::open_in_memory().unwrap();
        store.insert(&sample("m1", "h1")).unwrap();
        store
            .set_thumbnail_url("m1", "http://localhost:5000/uploads/products/thumbnails/m1_thumbnail.webp")
            .unwrap();
        let media = store.get("m1").unwrap().unwrap();
        assert!(media.thumbnail_url.unwrap().ends_with("m1_thumbnail.webp"));
    }

    #[test]
    fn test_delete_removes_children() {
        let store = MediaStore::open_in_memory().unwrap();
        store.insert(&sample("m1", "h1")).unwrap();
        store
            .insert_size(&MediaSize {
                media_id: "m1".to_string(),
                name: "thumbnail".to_string(),
                width: 150,
                height: 150,
                url: "u".to_string(),
                path: "p".to_string(),
            })
            .unwrap();

        let deleted = store.delete("m1").unwrap().unwrap();
        assert_eq!(deleted.id, "m1");
        assert!(store.get("m1").unwrap().is_none());
        assert!(store.sizes("m1").unwrap().is_empty());
        assert!(store.delete("m1").unwrap().is_none());
    }
}
