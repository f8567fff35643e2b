use crate::color::Color;
use crate::media::MediaQueryCondition;

/// A set of alternative sources for one logical image. Media-query
/// conditions pick the active subset; the host picks the best source from
/// what remains.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Image {
    pub sources: Vec<ImageSource>,
    /// Color overlay applied after the image resolves.
    pub tint: Option<Color>,
}

impl Image {
    pub fn from_url(url: impl Into<String>) -> Self {
        Image { sources: vec![ImageSource::new(url)], tint: None }
    }

    pub fn sized(url: impl Into<String>, width_px: u32, height_px: u32) -> Self {
        Image {
            sources: vec![ImageSource {
                url: url.into(),
                width_px: Some(width_px),
                height_px: Some(height_px),
                conditions: Vec::new(),
            }],
            tint: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageSource {
    pub url: String,
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
    pub conditions: Vec<MediaQueryCondition>,
}

impl ImageSource {
    pub fn new(url: impl Into<String>) -> Self {
        ImageSource { url: url.into(), ..Default::default() }
    }
}
