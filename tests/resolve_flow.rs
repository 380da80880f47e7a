use std::cell::Cell;

use shared_albums_engine::cache::AlbumCache;
use shared_albums_engine::config::GallerySettings;
use shared_albums_engine::fetch::{FetchedPage, PageFetcher};
use shared_albums_engine::paths::AppPaths;
use shared_albums_engine::photos::RenderSpec;
use shared_albums_engine::Result;

const ALBUM_URL: &str = "https://photos.google.com/share/AF1QipTripAlbum";

/// A share page as Google renders it: the title tag carries the album
/// name, and each photo appears several times at different embedded sizes
/// inside the script data, mixed with non-CDN URLs.
fn share_page() -> String {
    let mut script = String::new();
    for i in 1..=5 {
        script.push_str(&format!(
            r#""https://lh3.googleusercontent.com/photo{i}=w320-h240",320,240,"#
        ));
        script.push_str(&format!(
            r#""https://lh3.googleusercontent.com/photo{i}=w1920-h1440",1920,1440,"#
        ));
    }
    script.push_str(r#""https://www.gstatic.com/og/script.js",1,1"#);

    format!(
        r#"<html><head><title>Summer Trip - Google Photos</title></head>
        <body><script>{script}</script></body></html>"#
    )
}

struct CountingFetcher {
    calls: Cell<usize>,
    body: String,
}

impl PageFetcher for CountingFetcher {
    fn get(&self, _url: &str) -> Result<FetchedPage> {
        self.calls.set(self.calls.get() + 1);
        Ok(FetchedPage {
            status: 200,
            body: self.body.clone(),
        })
    }
}

#[test]
fn resolve_caches_base_urls_and_redimensions_without_refetch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = AppPaths::new(dir.path().to_path_buf());
    let cache = AlbumCache::new(paths, &GallerySettings::default());
    let fetcher = CountingFetcher {
        calls: Cell::new(0),
        body: share_page(),
    };

    let first = cache
        .resolve(ALBUM_URL, &RenderSpec::default(), &fetcher)
        .expect("first resolve");
    assert_eq!(first.title.as_deref(), Some("Summer Trip"));
    assert!(!first.is_deprecated_link);
    assert_eq!(first.photos.len(), 5, "repeated renditions must collapse");
    assert_eq!(
        first.photos[0].full,
        "https://lh3.googleusercontent.com/photo1=w1920-h1440"
    );
    assert_eq!(
        first.photos[0].preview.as_deref(),
        Some("https://lh3.googleusercontent.com/photo1=w800-h600")
    );
    assert_eq!(fetcher.calls.get(), 1);

    // Different dimensions and limit reuse the cached base URLs.
    let small_spec = RenderSpec {
        full_width: 1024,
        full_height: 768,
        preview_width: None,
        preview_height: None,
        max_photos: Some(3),
    };
    let second = cache
        .resolve(ALBUM_URL, &small_spec, &fetcher)
        .expect("second resolve");
    assert_eq!(second.photos.len(), 3);
    assert_eq!(
        second.photos[2].full,
        "https://lh3.googleusercontent.com/photo3=w1024-h768"
    );
    assert_eq!(second.photos[2].preview, None);
    assert_eq!(fetcher.calls.get(), 1, "cached resolve must not refetch");
}

#[test]
fn deprecated_short_link_round_trips_through_cache() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = AppPaths::new(dir.path().to_path_buf());
    let cache = AlbumCache::new(paths, &GallerySettings::default());
    let fetcher = CountingFetcher {
        calls: Cell::new(0),
        body: share_page(),
    };

    let url = "https://photos.app.goo.gl/ShortForm1";
    let first = cache
        .resolve(url, &RenderSpec::default(), &fetcher)
        .expect("resolve");
    assert!(first.is_deprecated_link);

    let again = cache
        .resolve(url, &RenderSpec::default(), &fetcher)
        .expect("cached resolve");
    assert!(again.is_deprecated_link, "flag must survive the cache");
    assert_eq!(fetcher.calls.get(), 1);
}
