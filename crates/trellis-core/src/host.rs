use crate::actions::Action;
use crate::element::CustomElementData;
use crate::image::Image;
use crate::text::ParameterizedText;
use crate::views::{Drawable, ViewArena, ViewKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionType {
    Click,
    LongClick,
    View,
    Hide,
}

/// Dispatches resolved actions back to the host.
pub trait ActionHandler {
    fn handle_action(
        &self,
        action: &Action,
        action_type: ActionType,
        frame_tag: &str,
        view: ViewKey,
    );
}

/// Completion callback for an asynchronous image load. `None` means the
/// load failed; the slot keeps its placeholder.
pub type ImageLoadCallback = Box<dyn FnOnce(Option<Drawable>)>;

/// Host capabilities the engine consumes: image loading, localization,
/// theme/layout-direction queries, pixel density.
pub trait AssetProvider {
    /// Starts an asynchronous load for the best source of `image`.
    /// Fire-and-forget; the callback may arrive on any later tick, or
    /// never.
    fn load_image(
        &self,
        image: &Image,
        width_px: Option<u32>,
        height_px: Option<u32>,
        callback: ImageLoadCallback,
    );

    /// Locale-aware evaluation of parameterized text.
    fn format_text(&self, text: &ParameterizedText) -> String {
        text.text.clone()
    }

    fn density(&self) -> f32 {
        1.0
    }

    /// Radius used when a style asks for the host's corner rounding.
    fn default_corner_radius_px(&self) -> i32 {
        0
    }

    fn is_dark_theme(&self) -> bool {
        false
    }

    fn is_rtl(&self) -> bool {
        false
    }
}

/// Creates and releases opaque host views for custom element content.
pub trait CustomElementProvider {
    fn create_custom_view(&self, views: &mut ViewArena, data: &CustomElementData) -> ViewKey;

    fn release_custom_view(&self, views: &mut ViewArena, view: ViewKey);
}
