use crate::extract;
use crate::links;
use crate::{AlbumError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::time::Duration;

pub const FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36";

/// The unit stored in the cache: dimension-free base URLs plus the title.
/// Written once per fetch, replaced wholesale on refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub title: Option<String>,
    pub base_photo_urls: Vec<String>,
    pub is_deprecated_link: bool,
}

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

/// Injected HTTP capability. Production code uses [`HttpFetcher`]; tests
/// substitute canned pages.
pub trait PageFetcher {
    fn get(&self, url: &str) -> Result<FetchedPage>;
}

pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let mut config = ureq::Agent::config_builder();
        config = config
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(FETCH_TIMEOUT_SECS)))
            .user_agent(DEFAULT_USER_AGENT);
        let agent: ureq::Agent = config.build().into();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<FetchedPage> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| AlbumError::Fetch(e.to_string()))?;
        let status = response.status().as_u16();

        let mut buf = Vec::new();
        response
            .body_mut()
            .as_reader()
            .read_to_end(&mut buf)
            .map_err(|e| AlbumError::Fetch(e.to_string()))?;

        Ok(FetchedPage {
            status,
            body: String::from_utf8_lossy(&buf).into_owned(),
        })
    }
}

/// Validate, fetch and extract one album. No retries; callers that want a
/// retry policy wrap this.
pub fn fetch_album(url: &str, fetcher: &dyn PageFetcher) -> Result<AlbumRecord> {
    let kind = links::classify(url);
    if !kind.is_valid() {
        return Err(AlbumError::InvalidUrl(url.trim().to_string()));
    }

    let page = fetcher.get(url)?;
    if page.status >= 400 {
        return Err(AlbumError::Fetch(format!("HTTP status {}", page.status)));
    }
    if page.body.trim().is_empty() {
        return Err(AlbumError::EmptyResponse);
    }

    let extraction = extract::extract_album(&page.body);
    if extraction.photo_urls.is_empty() {
        return Err(AlbumError::NoPhotosFound);
    }

    Ok(AlbumRecord {
        title: extraction.title,
        base_photo_urls: extraction.photo_urls,
        is_deprecated_link: kind.is_deprecated(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedFetcher {
        status: u16,
        body: &'static str,
    }

    impl PageFetcher for CannedFetcher {
        fn get(&self, _url: &str) -> Result<FetchedPage> {
            Ok(FetchedPage {
                status: self.status,
                body: self.body.to_string(),
            })
        }
    }

    struct PanicFetcher;

    impl PageFetcher for PanicFetcher {
        fn get(&self, url: &str) -> Result<FetchedPage> {
            panic!("network call attempted for {url}");
        }
    }

    const ALBUM_PAGE: &str = r#"<html><head>
        <title>Summer Trip - Google Photos</title>
    </head><body><script>
        "https://lh3.googleusercontent.com/one=w640-h480",640,480,
        "https://lh3.googleusercontent.com/two=w640-h480",640,480
    </script></body></html>"#;

    #[test]
    fn invalid_url_fails_before_any_network_call() {
        let err = fetch_album("https://example.com/not-an-album", &PanicFetcher).unwrap_err();
        assert!(matches!(err, AlbumError::InvalidUrl(_)));
    }

    #[test]
    fn transport_status_errors_map_to_fetch() {
        let fetcher = CannedFetcher {
            status: 503,
            body: "service unavailable",
        };
        let err =
            fetch_album("https://photos.google.com/share/abc", &fetcher).unwrap_err();
        assert!(matches!(err, AlbumError::Fetch(_)));
    }

    #[test]
    fn blank_body_is_empty_response() {
        let fetcher = CannedFetcher {
            status: 200,
            body: "   \n",
        };
        let err =
            fetch_album("https://photos.google.com/share/abc", &fetcher).unwrap_err();
        assert!(matches!(err, AlbumError::EmptyResponse));
    }

    #[test]
    fn page_without_cdn_urls_is_no_photos_found() {
        let fetcher = CannedFetcher {
            status: 200,
            body: "<html><body><p>nothing here</p></body></html>",
        };
        let err =
            fetch_album("https://photos.google.com/share/abc", &fetcher).unwrap_err();
        assert!(matches!(err, AlbumError::NoPhotosFound));
    }

    #[test]
    fn successful_fetch_builds_record_with_deprecation_flag() {
        let fetcher = CannedFetcher {
            status: 200,
            body: ALBUM_PAGE,
        };

        let record = fetch_album("https://photos.google.com/share/abc", &fetcher).expect("record");
        assert_eq!(record.title.as_deref(), Some("Summer Trip"));
        assert_eq!(record.base_photo_urls.len(), 2);
        assert!(!record.is_deprecated_link);

        let record = fetch_album("https://photos.app.goo.gl/xyz", &fetcher).expect("record");
        assert!(record.is_deprecated_link);
    }
}
