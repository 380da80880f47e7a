use std::path::PathBuf;

use shared_albums_engine::cache::AlbumCache;
use shared_albums_engine::fetch::HttpFetcher;
use shared_albums_engine::links::{self, LinkKind};
use shared_albums_engine::paths::AppPaths;
use shared_albums_engine::photos::RenderSpec;
use shared_albums_engine::{config, db};

fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        return Ok(());
    }

    let mut base_dir: Option<PathBuf> = None;
    let mut album_url: Option<String> = None;
    let mut invalidate = false;
    let mut no_cache = false;
    let mut spec = RenderSpec::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--base-dir" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| "--base-dir requires a value".to_string())?;
                base_dir = Some(PathBuf::from(v));
            }
            "--image-width" => {
                i += 1;
                spec.full_width = parse_u32(args.get(i), "--image-width")?;
            }
            "--image-height" => {
                i += 1;
                spec.full_height = parse_u32(args.get(i), "--image-height")?;
            }
            "--max-photos" => {
                i += 1;
                let v = parse_u32(args.get(i), "--max-photos")?;
                spec.max_photos = Some(v as i64);
            }
            "--no-preview" => {
                spec.preview_width = None;
                spec.preview_height = None;
            }
            "--invalidate" => invalidate = true,
            "--no-cache" => no_cache = true,
            other if other.starts_with("--") => {
                return Err(format!("unknown arg: {other} (try --help)"));
            }
            other => {
                if album_url.is_some() {
                    return Err("only one album URL may be given".to_string());
                }
                album_url = Some(other.to_string());
            }
        }
        i += 1;
    }

    let album_url = album_url.ok_or_else(|| "album URL is required (try --help)".to_string())?;

    if links::classify(&album_url) == LinkKind::Invalid {
        return Err(format!(
            "not a Google Photos share URL: {album_url}\n\
             expected https://photos.google.com/share/... or https://photos.app.goo.gl/..."
        ));
    }

    let base_dir = base_dir
        .ok_or_else(|| "could not determine base dir; pass --base-dir".to_string())?;
    let paths = AppPaths::new(base_dir);
    paths.ensure_dirs().map_err(|e| e.to_string())?;
    db::ensure_schema(&paths).map_err(|e| e.to_string())?;

    let settings = config::load_settings(&paths).map_err(|e| e.to_string())?;
    let cache = AlbumCache::new(paths, &settings);

    if invalidate {
        let removed = cache.invalidate(&album_url).map_err(|e| e.to_string())?;
        println!(
            "{}",
            if removed {
                "cache entry removed"
            } else {
                "no cache entry for this album"
            }
        );
        return Ok(());
    }

    let fetcher = HttpFetcher::new();
    let resolved = if no_cache {
        cache.resolve_fresh(&album_url, &spec, &fetcher)
    } else {
        cache.resolve(&album_url, &spec, &fetcher)
    }
    .map_err(|e| e.to_string())?;

    if links::classify(&album_url).is_deprecated() {
        eprintln!("note: short photos.app.goo.gl links are deprecated; prefer the full share URL");
    }

    let json = serde_json::to_string_pretty(&resolved).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn parse_u32(value: Option<&String>, flag: &str) -> Result<u32, String> {
    let v = value.ok_or_else(|| format!("{flag} requires a value"))?;
    v.parse::<u32>()
        .map_err(|_| format!("{flag} requires a positive integer, got {v}"))
}

fn print_help() {
    println!(
        r#"album_dump - resolve a shared Google Photos album through the cache

USAGE:
  album_dump --base-dir DIR [OPTIONS] ALBUM_URL

OPTIONS:
  --base-dir DIR       app data directory (settings + cache database)
  --image-width W      full image width (default 1920)
  --image-height H     full image height (default 1440)
  --max-photos N       photo limit, capped at 300
  --no-preview         omit preview URLs
  --no-cache           refetch now, overwriting any cache entry
  --invalidate         drop the cache entry for ALBUM_URL and exit
  -h, --help           show this help
"#
    );
}
