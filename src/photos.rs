use serde::{Deserialize, Serialize};

/// Hard ceiling on photos per album; no caller can exceed this.
pub const MAX_PHOTOS: usize = 300;
pub const DEFAULT_MAX_PHOTOS: usize = 300;

pub const DEFAULT_FULL_WIDTH: u32 = 1920;
pub const DEFAULT_FULL_HEIGHT: u32 = 1440;
pub const DEFAULT_PREVIEW_WIDTH: u32 = 800;
pub const DEFAULT_PREVIEW_HEIGHT: u32 = 600;

/// Per-request rendering parameters. Never cached; the cache stores only
/// dimension-free base URLs and the spec is applied on the way out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSpec {
    pub full_width: u32,
    pub full_height: u32,
    pub preview_width: Option<u32>,
    pub preview_height: Option<u32>,
    pub max_photos: Option<i64>,
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            full_width: DEFAULT_FULL_WIDTH,
            full_height: DEFAULT_FULL_HEIGHT,
            preview_width: Some(DEFAULT_PREVIEW_WIDTH),
            preview_height: Some(DEFAULT_PREVIEW_HEIGHT),
            max_photos: Some(DEFAULT_MAX_PHOTOS as i64),
        }
    }
}

/// One photo ready for rendering: the full-size URL and, when preview
/// dimensions were requested, a smaller progressive-loading variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoView {
    pub full: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Apply a render spec to base URLs: truncate to the effective limit in
/// discovery order, then append size directives. Pure and deterministic.
pub fn build_photo_urls(base_urls: &[String], spec: &RenderSpec) -> Vec<PhotoView> {
    let limit = effective_photo_limit(spec.max_photos);

    base_urls
        .iter()
        .take(limit)
        .map(|base| PhotoView {
            full: format!("{base}=w{}-h{}", spec.full_width, spec.full_height),
            preview: match (spec.preview_width, spec.preview_height) {
                (Some(w), Some(h)) => Some(format!("{base}=w{w}-h{h}")),
                _ => None,
            },
        })
        .collect()
}

pub fn effective_photo_limit(requested: Option<i64>) -> usize {
    let value = match requested {
        Some(v) if v > 0 => v as usize,
        _ => DEFAULT_MAX_PHOTOS,
    };
    value.min(MAX_PHOTOS)
}
