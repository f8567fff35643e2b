//! Shared host doubles for engine integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::{
    Action, ActionHandler, ActionType, AssetProvider, BindingContext, BindingValue,
    CustomElementData, CustomElementProvider, DebugBehavior, DebugLogger, Drawable, Element,
    Frame, Image, ImageLoadCallback, Orientation, SharedState, Template, ViewArena, ViewBody,
    ViewKey,
};

use trellis_engine::{AdapterFactory, EngineConfig, FrameContext, Views};

pub struct PendingLoad {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub callback: ImageLoadCallback,
}

#[derive(Default)]
pub struct FakeAssets {
    pub loads: RefCell<Vec<PendingLoad>>,
}

impl FakeAssets {
    pub fn pending_count(&self) -> usize {
        self.loads.borrow().len()
    }

    /// Completes every outstanding load with a drawable of the given
    /// intrinsic size, simulating arbitrarily late callbacks.
    pub fn complete_all(&self, width_px: u32, height_px: u32) {
        let pending: Vec<PendingLoad> = self.loads.borrow_mut().drain(..).collect();
        for load in pending {
            (load.callback)(Some(Drawable {
                url: load.url,
                width_px,
                height_px,
                tint: None,
            }));
        }
    }
}

impl AssetProvider for FakeAssets {
    fn load_image(
        &self,
        image: &Image,
        width_px: Option<u32>,
        height_px: Option<u32>,
        callback: ImageLoadCallback,
    ) {
        self.loads.borrow_mut().push(PendingLoad {
            url: image.sources.first().map(|s| s.url.clone()).unwrap_or_default(),
            width: width_px,
            height: height_px,
            callback,
        });
    }
}

#[derive(Default)]
pub struct RecordingHandler {
    pub handled: RefCell<Vec<(String, ActionType)>>,
}

impl RecordingHandler {
    pub fn count(&self) -> usize {
        self.handled.borrow().len()
    }
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

pub struct FakeCustomProvider;

impl CustomElementProvider for FakeCustomProvider {
    fn create_custom_view(&self, views: &mut ViewArena, _data: &CustomElementData) -> ViewKey {
        views.create(ViewBody::Group { orientation: Orientation::Overlay })
    }

    fn release_custom_view(&self, views: &mut ViewArena, view: ViewKey) {
        views.destroy(view);
    }
}

pub struct TestEngine {
    pub views: Views,
    pub assets: Rc<FakeAssets>,
    pub handler: Rc<RecordingHandler>,
    pub factory: AdapterFactory,
    pub ctx: FrameContext,
}

impl TestEngine {
    pub fn child_count(&self, view: ViewKey) -> usize {
        self.views.borrow().child_count(view)
    }

    /// Derives a context carrying the given binding values, the way a
    /// template instantiation would.
    pub fn ctx_with_bindings(&self, values: Vec<BindingValue>) -> FrameContext {
        self.ctx
            .create_template_context(
                &Template::new("bindings-holder", Element::default()),
                &BindingContext::with_values(values),
            )
            .expect("binding context")
    }
}

pub fn engine() -> TestEngine {
    engine_with_frame(Frame::default(), &[])
}

/// A frame whose inline stylesheet carries the given styles.
pub fn frame_with_styles(styles: Vec<trellis_core::Style>) -> Frame {
    Frame {
        tag: "test-frame".into(),
        stylesheets: trellis_core::Stylesheets {
            stylesheet_ids: vec![],
            stylesheets: vec![trellis_core::Stylesheet::named("inline", styles)],
        },
        ..Default::default()
    }
}

pub fn engine_with_frame(frame: Frame, shared: &[SharedState]) -> TestEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    let views: Views = Rc::new(RefCell::new(ViewArena::new()));
    let assets = Rc::new(FakeAssets::default());
    let handler = Rc::new(RecordingHandler::default());
    let factory = AdapterFactory::new(
        views.clone(),
        assets.clone(),
        Rc::new(FakeCustomProvider),
        &EngineConfig::default(),
    );
    let ctx = FrameContext::create(
        frame,
        shared,
        1000,
        assets.clone(),
        handler.clone(),
        Rc::new(RefCell::new(DebugLogger::new(DebugBehavior::Verbose))),
    )
    .expect("frame context");
    TestEngine { views, assets, handler, factory, ctx }
}
