use regex::Regex;

const FULL_LINK_PATTERN: &str = r"^https://photos\.google\.com(?:/u/\d+)?/share/";
const SHORT_LINK_PATTERN: &str = r"^https://photos\.app\.goo\.gl/";

/// Classification of an album share URL.
///
/// The short `photos.app.goo.gl` form still resolves but Google has
/// deprecated it, so callers surface a warning for `Deprecated` links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Full,
    Deprecated,
    Invalid,
}

impl LinkKind {
    pub fn is_valid(self) -> bool {
        !matches!(self, LinkKind::Invalid)
    }

    pub fn is_deprecated(self) -> bool {
        matches!(self, LinkKind::Deprecated)
    }
}

pub fn classify(url: &str) -> LinkKind {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return LinkKind::Invalid;
    }

    let validation_re = Regex::new(&format!("{FULL_LINK_PATTERN}|{SHORT_LINK_PATTERN}"))
        .expect("share link validation regex");
    if !validation_re.is_match(trimmed) {
        return LinkKind::Invalid;
    }

    let short_re = Regex::new(SHORT_LINK_PATTERN).expect("short link regex");
    if short_re.is_match(trimmed) {
        LinkKind::Deprecated
    } else {
        LinkKind::Full
    }
}

/// Find all album share URLs embedded in arbitrary text, deduplicated in
/// first-seen order. Used to invalidate cached albums when a page that
/// references them is edited.
pub fn find_share_links(text: &str) -> Vec<String> {
    let link_re = Regex::new(
        r#"https://(?:photos\.google\.com(?:/u/\d+)?/share/|photos\.app\.goo\.gl/)[^\s"'<>\]]+"#,
    )
    .expect("share link scan regex");

    let mut out: Vec<String> = Vec::new();
    for m in link_re.find_iter(text) {
        // Links in prose often end a sentence; the trailing punctuation
        // is not part of the URL.
        let url = m
            .as_str()
            .trim_end_matches(['.', ',', ';', ':', '!', '?', ')'])
            .to_string();
        if !out.iter().any(|existing| existing == &url) {
            out.push(url);
        }
    }
    out
}
