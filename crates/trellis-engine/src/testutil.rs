//! Test doubles for the host boundary used by unit tests. The richer
//! versions (pending-load draining, custom view providers) live with the
//! integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::{
    Action, ActionHandler, ActionType, AssetProvider, DebugBehavior, DebugLogger, Frame, Image,
    ImageLoadCallback, SharedState, ViewKey,
};

use crate::frame::FrameContext;

#[derive(Default)]
pub(crate) struct FakeAssets {
    pub density: f32,
    pub dark: bool,
    pub rtl: bool,
    pub corner_radius: i32,
}

impl AssetProvider for FakeAssets {
    fn load_image(
        &self,
        _image: &Image,
        _width_px: Option<u32>,
        _height_px: Option<u32>,
        _callback: ImageLoadCallback,
    ) {
    }

    fn density(&self) -> f32 {
        if self.density == 0.0 { 1.0 } else { self.density }
    }

    fn default_corner_radius_px(&self) -> i32 {
        self.corner_radius
    }

    fn is_dark_theme(&self) -> bool {
        self.dark
    }

    fn is_rtl(&self) -> bool {
        self.rtl
    }
}

#[derive(Default)]
pub(crate) struct RecordingHandler {
    pub handled: RefCell<Vec<(String, ActionType)>>,
}

impl ActionHandler for RecordingHandler {
    fn handle_action(
        &self,
        action: &Action,
        action_type: ActionType,
        _frame_tag: &str,
        _view: ViewKey,
    ) {
        self.handled.borrow_mut().push((action.name.clone(), action_type));
    }
}

pub(crate) fn frame_context(
    frame: Frame,
    shared: &[SharedState],
    assets: Rc<FakeAssets>,
    handler: Rc<RecordingHandler>,
) -> FrameContext {
    FrameContext::create(
        frame,
        shared,
        1000,
        assets,
        handler,
        Rc::new(RefCell::new(DebugLogger::new(DebugBehavior::Verbose))),
    )
    .expect("frame context")
}
