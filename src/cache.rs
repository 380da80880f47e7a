use crate::config::GallerySettings;
use crate::db::{self, OptionalRowExt};
use crate::fetch::{self, AlbumRecord, PageFetcher};
use crate::links;
use crate::paths::AppPaths;
use crate::photos::{build_photo_urls, PhotoView, RenderSpec};
use crate::Result;
use rusqlite::{params, Connection};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// The externally visible result of a cache lookup: the cached (or just
/// fetched) record with the caller's render spec applied.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedAlbum {
    pub title: Option<String>,
    pub is_deprecated_link: bool,
    pub photos: Vec<PhotoView>,
}

/// Cache of fetched albums, keyed by a hash of the album URL so every page
/// referencing the same album shares one entry. Alongside each record the
/// cache stores the `cache_seconds` value it was written under; a mismatch
/// with the currently configured value marks the entry stale regardless of
/// remaining TTL, which lets an operator force global re-validation by
/// changing that one setting.
pub struct AlbumCache {
    paths: AppPaths,
    cache_seconds: i64,
}

impl AlbumCache {
    pub fn new(paths: AppPaths, settings: &GallerySettings) -> Self {
        Self {
            paths,
            cache_seconds: settings.cache_seconds,
        }
    }

    /// Resolve an album through the cache and apply the render spec. The
    /// spec is never cached; a fresh entry serves any combination of
    /// dimensions without refetching.
    pub fn resolve(
        &self,
        url: &str,
        spec: &RenderSpec,
        fetcher: &dyn PageFetcher,
    ) -> Result<ResolvedAlbum> {
        let record = self.get_record(url, fetcher)?;
        Ok(ResolvedAlbum {
            photos: build_photo_urls(&record.base_photo_urls, spec),
            title: record.title,
            is_deprecated_link: record.is_deprecated_link,
        })
    }

    /// Skip the freshness check entirely: refetch now, overwrite any
    /// existing entry, and apply the render spec. The rewritten entry
    /// serves later reads for its full TTL.
    pub fn resolve_fresh(
        &self,
        url: &str,
        spec: &RenderSpec,
        fetcher: &dyn PageFetcher,
    ) -> Result<ResolvedAlbum> {
        let record = self.refresh_record(url, fetcher)?;
        Ok(ResolvedAlbum {
            photos: build_photo_urls(&record.base_photo_urls, spec),
            title: record.title,
            is_deprecated_link: record.is_deprecated_link,
        })
    }

    /// Return the cached record if fresh, otherwise refetch synchronously
    /// and overwrite. A failed refresh leaves any prior entry in place and
    /// propagates the error; stale data is not served as a fallback.
    pub fn get_record(&self, url: &str, fetcher: &dyn PageFetcher) -> Result<AlbumRecord> {
        let key = cache_key(url);
        let mut conn = db::open(&self.paths)?;
        db::migrate(&conn)?;

        if let Some(record) = fresh_record(&conn, &key, self.cache_seconds)? {
            return Ok(record);
        }

        let record = fetch::fetch_album(url, fetcher)?;
        store_record(&mut conn, &key, &record, self.cache_seconds)?;
        Ok(record)
    }

    fn refresh_record(&self, url: &str, fetcher: &dyn PageFetcher) -> Result<AlbumRecord> {
        let key = cache_key(url);
        let mut conn = db::open(&self.paths)?;
        db::migrate(&conn)?;

        let record = fetch::fetch_album(url, fetcher)?;
        store_record(&mut conn, &key, &record, self.cache_seconds)?;
        Ok(record)
    }

    /// Drop the cache entry for one album URL. Returns whether an entry
    /// existed. Used when content referencing the album is edited.
    pub fn invalidate(&self, url: &str) -> Result<bool> {
        let key = cache_key(url);
        let conn = db::open(&self.paths)?;
        db::migrate(&conn)?;

        let removed = conn.execute("DELETE FROM album_cache WHERE key = ?1", [&key])?;
        conn.execute("DELETE FROM album_cache_policy WHERE key = ?1", [&key])?;
        Ok(removed > 0)
    }

    /// Scan a text body (e.g. an edited page) for share links and drop
    /// each referenced album's cache entry. Returns how many entries were
    /// removed.
    pub fn invalidate_links_in(&self, text: &str) -> Result<usize> {
        let mut removed = 0_usize;
        for url in links::find_share_links(text) {
            if self.invalidate(&url)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Stable key independent of any referencing page.
fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.trim().as_bytes());
    hex::encode(hasher.finalize())
}

fn fresh_record(conn: &Connection, key: &str, configured_seconds: i64) -> Result<Option<AlbumRecord>> {
    let row: Option<(String, i64, i64)> = conn
        .query_row(
            "SELECT record_json, stored_at_ms, ttl_seconds FROM album_cache WHERE key = ?1",
            [key],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;
    let Some((record_json, stored_at_ms, ttl_seconds)) = row else {
        return Ok(None);
    };

    let policy: Option<i64> = conn
        .query_row(
            "SELECT cache_seconds FROM album_cache_policy WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()?;
    if policy != Some(configured_seconds) {
        return Ok(None);
    }

    let expires_at_ms = stored_at_ms.saturating_add(ttl_seconds.saturating_mul(1000));
    if now_ms() >= expires_at_ms {
        return Ok(None);
    }

    let record: AlbumRecord = serde_json::from_str(&record_json)?;
    Ok(Some(record))
}

/// Replace the entry and its policy fingerprint in one transaction so a
/// concurrent reader sees either the old pair or the new pair.
fn store_record(
    conn: &mut Connection,
    key: &str,
    record: &AlbumRecord,
    cache_seconds: i64,
) -> Result<()> {
    let record_json = serde_json::to_string(record)?;
    let tx = conn.transaction()?;
    tx.execute(
        r#"
INSERT INTO album_cache (key, record_json, stored_at_ms, ttl_seconds)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(key) DO UPDATE SET
  record_json = excluded.record_json,
  stored_at_ms = excluded.stored_at_ms,
  ttl_seconds = excluded.ttl_seconds
"#,
        params![key, record_json, now_ms(), cache_seconds],
    )?;
    tx.execute(
        r#"
INSERT INTO album_cache_policy (key, cache_seconds)
VALUES (?1, ?2)
ON CONFLICT(key) DO UPDATE SET cache_seconds = excluded.cache_seconds
"#,
        params![key, cache_seconds],
    )?;
    tx.commit()?;
    Ok(())
}

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
