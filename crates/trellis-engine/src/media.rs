use trellis_core::{
    AssetProvider, ComparisonCondition, DarkLightMode, Image, MediaQueryCondition,
};

/// Evaluates media-query conditions against the frame the engine is
/// rendering into. Captured once per render pass.
#[derive(Clone, Copy, Debug)]
pub struct MediaQueryHelper {
    frame_width_px: i32,
    dark_theme: bool,
}

impl MediaQueryHelper {
    pub fn new(frame_width_px: i32, assets: &dyn AssetProvider) -> Self {
        MediaQueryHelper { frame_width_px, dark_theme: assets.is_dark_theme() }
    }

    pub fn frame_width_px(&self) -> i32 {
        self.frame_width_px
    }

    pub fn condition_holds(&self, condition: &MediaQueryCondition) -> bool {
        match condition {
            MediaQueryCondition::FrameWidth { width_px, condition } => match condition {
                ComparisonCondition::Equals => self.frame_width_px == *width_px,
                ComparisonCondition::GreaterThan => self.frame_width_px > *width_px,
                ComparisonCondition::LessThan => self.frame_width_px < *width_px,
                ComparisonCondition::NotEquals => self.frame_width_px != *width_px,
            },
            MediaQueryCondition::DarkLight { mode } => match mode {
                DarkLightMode::Any => true,
                DarkLightMode::Dark => self.dark_theme,
                DarkLightMode::Light => !self.dark_theme,
            },
        }
    }

    pub fn all_hold(&self, conditions: &[MediaQueryCondition]) -> bool {
        conditions.iter().all(|c| self.condition_holds(c))
    }

    /// Keeps only the image sources whose conditions all hold.
    pub fn filter_image_sources(&self, image: &Image) -> Image {
        Image {
            sources: image
                .sources
                .iter()
                .filter(|s| self.all_hold(&s.conditions))
                .cloned()
                .collect(),
            tint: image.tint,
        }
    }
}
