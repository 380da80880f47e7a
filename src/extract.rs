use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Everything recovered from one share page: the cleaned album title (if
/// any) and the deduplicated base photo URLs in discovery order.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub title: Option<String>,
    pub photo_urls: Vec<String>,
}

pub fn extract_album(html: &str) -> Extraction {
    let document = Html::parse_document(html);
    Extraction {
        title: extract_album_title(&document),
        photo_urls: extract_photo_urls(html),
    }
}

/// Extract the album title, preferring the `<title>` tag over `og:title`.
///
/// The `<title>` tag usually carries "Album Name - Google Photos", while
/// `og:title` often carries a single photo's capture date or camera model
/// instead of the album name. Each candidate runs through the cleaning
/// pipeline; the first one that survives non-empty wins.
fn extract_album_title(document: &Html) -> Option<String> {
    for candidate in title_candidates(document) {
        let cleaned = clean_album_title(&candidate);
        if !cleaned.is_empty() {
            return Some(cleaned);
        }
    }
    None
}

fn title_candidates(document: &Html) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    let title_selector = Selector::parse("title").expect("title selector");
    if let Some(tag) = document.select(&title_selector).next() {
        let text = tag.text().collect::<Vec<_>>().join(" ");
        let suffix_re = Regex::new(r"(?i)\s*-\s*Google Photos\s*$").expect("title suffix regex");
        let stripped = suffix_re.replace(&text, "").trim().to_string();
        if !stripped.is_empty() {
            out.push(stripped);
        }
    }

    // The parser resolves attribute order, so both `property ... content`
    // and `content ... property` spellings match here.
    let og_selector =
        Selector::parse(r#"meta[property="og:title"][content]"#).expect("og:title selector");
    if let Some(tag) = document.select(&og_selector).next() {
        if let Some(content) = tag.value().attr("content") {
            let trimmed = content.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        }
    }

    out
}

/// Strip photo metadata Google mixes into titles: emoji icons, capture
/// dates in several formats, and camera/phone model names. Best-effort
/// heuristics; unusual album names may lose real words here.
pub fn clean_album_title(title: &str) -> String {
    let emoji_re = Regex::new(r"[\u{1F300}-\u{1F9FF}]").expect("emoji regex");
    let weekday_date_re = Regex::new(
        r"(?i)\b(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday),?\s+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{4}\b",
    )
    .expect("weekday date regex");
    let month_day_year_re = Regex::new(
        r"(?i)\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{4}\b",
    )
    .expect("month day year regex");
    let month_year_re = Regex::new(
        r"(?i)\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{4}\b",
    )
    .expect("month year regex");
    let iso_date_re = Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").expect("iso date regex");
    let slash_date_re = Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").expect("slash date regex");
    let camera_re = Regex::new(r"(?i)\b(?:Canon|Nikon|Sony|iPhone|Samsung|Pixel)\s+[A-Z0-9\s]+")
        .expect("camera model regex");
    let separator_re = Regex::new(r"\s*[-–—|•·,:]\s*").expect("separator regex");
    let whitespace_re = Regex::new(r"\s+").expect("whitespace regex");

    let mut out = emoji_re.replace_all(title, "").to_string();
    out = weekday_date_re.replace_all(&out, "").to_string();
    out = month_day_year_re.replace_all(&out, "").to_string();
    out = month_year_re.replace_all(&out, "").to_string();
    out = iso_date_re.replace_all(&out, "").to_string();
    out = slash_date_re.replace_all(&out, "").to_string();
    out = camera_re.replace_all(&out, "").to_string();
    out = separator_re.replace_all(&out, " ").to_string();
    out = whitespace_re.replace_all(&out, " ").to_string();
    out.trim().to_string()
}

type StrategyFn = fn(&str) -> Vec<String>;

/// Extraction strategies in fallback order. The first one returning any
/// URLs wins; filtering and normalization apply to whichever list that is.
const PHOTO_URL_STRATEGIES: &[(&str, StrategyFn)] = &[
    ("dimension-triplet", quoted_urls_with_dimensions),
    ("array-literal", quoted_urls_in_array_literal),
];

fn extract_photo_urls(html: &str) -> Vec<String> {
    let mut raw: Vec<String> = Vec::new();
    for (_name, strategy) in PHOTO_URL_STRATEGIES {
        raw = strategy(html);
        if !raw.is_empty() {
            break;
        }
    }

    let normalized: Vec<String> = raw
        .into_iter()
        .filter(|url| is_google_cdn_url(url))
        .map(|url| strip_size_directive(&url))
        .collect();

    dedupe_urls(normalized)
}

/// Primary strategy: the share page embeds a photo manifest in script data
/// as `"URL",width,height` triplets.
fn quoted_urls_with_dimensions(html: &str) -> Vec<String> {
    let triplet_re = Regex::new(r#"(?i)"(https?://[^"]+)"\s*,\s*\d+\s*,\s*\d+"#)
        .expect("dimension triplet regex");
    triplet_re
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Fallback strategy: URLs wrapped in single-element array literals,
/// `["URL"]`, seen in older renditions of the page.
fn quoted_urls_in_array_literal(html: &str) -> Vec<String> {
    let array_re =
        Regex::new(r#"(?i)\["(https?://[^"]+)"\]"#).expect("array literal regex");
    array_re
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Only Google's image CDN hosts photos; anything else caught by the
/// regexes (analytics beacons, script URLs) is rejected here.
fn is_google_cdn_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    host == "googleusercontent.com" || host.ends_with(".googleusercontent.com")
}

/// Drop a trailing size directive (`=w800-h600`, `=s1600`) so the stored
/// value is the canonical base URL. The same photo appears in the page at
/// several embedded sizes; without this the cache would hold one entry per
/// rendition.
fn strip_size_directive(url: &str) -> String {
    let directive_re = Regex::new(r"=[^&]*$").expect("size directive regex");
    directive_re.replace(url, "").to_string()
}

fn dedupe_urls(values: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(values.len());
    let mut seen = HashSet::new();
    for value in values {
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}
