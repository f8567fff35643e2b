//! The adapter lifecycle: `created → bound → unbound` cycles ending in
//! `released`. The trait's provided methods drive the shared lifecycle
//! (style resolution, visibility gating, dimensions, actions, wrapper
//! views) and delegate the type-specific work to the `on_*` hooks.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_core::{
    ActionHandler, ActionType, Actions, BindResult, Element, ElementActions, ErrorCode,
    LayoutSize, Orientation, Severity, ViewArena, ViewBody, ViewKey, Visibility,
};

use crate::factory::AdapterFactory;
use crate::frame::FrameContext;
use crate::pool::RecyclerKey;
use crate::styles::{ResolvedStyle, resolve_fill};

/// The shared, single-threaded backing-view tree.
pub type Views = Rc<RefCell<ViewArena>>;

/// Phases of a touch gesture as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Cooperative cancellation for an in-flight asynchronous request. The
/// issuing adapter flips it on unbind; the completion callback checks it
/// at the single point where it would otherwise mutate shared state.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// State common to every adapter type.
pub struct AdapterBase {
    pub views: Views,
    /// The adapter's own view.
    pub view: ViewKey,
    /// Outer group created when borders or rounded corners demand one.
    pub wrapper: Option<ViewKey>,
    pub key: Option<RecyclerKey>,
    /// Whether the type-specific create hook has run.
    pub created: bool,
    /// Whether the type-specific bind hook has run.
    pub bound: bool,
    pub element: Option<Element>,
    pub resolved: Option<Rc<ResolvedStyle>>,
    pub width: LayoutSize,
    pub height: LayoutSize,
    pub actions: Actions,
    handler: Option<Rc<dyn ActionHandler>>,
    frame_tag: String,
}

impl AdapterBase {
    pub fn new(views: Views, body: ViewBody) -> Self {
        let view = views.borrow_mut().create(body);
        AdapterBase {
            views,
            view,
            wrapper: None,
            key: None,
            created: false,
            bound: false,
            element: None,
            resolved: None,
            width: LayoutSize::NotSet,
            height: LayoutSize::NotSet,
            actions: Actions::default(),
            handler: None,
            frame_tag: String::new(),
        }
    }

    /// The view a parent attaches: the wrapper when present.
    pub fn outer_view(&self) -> ViewKey {
        self.wrapper.unwrap_or(self.view)
    }

    pub fn dispatch_click(&self) {
        if let (Some(handler), Some(action)) = (&self.handler, &self.actions.on_click) {
            handler.handle_action(action, ActionType::Click, &self.frame_tag, self.view);
        }
    }

    pub fn dispatch_long_click(&self) {
        if let (Some(handler), Some(action)) = (&self.handler, &self.actions.on_long_click) {
            handler.handle_action(action, ActionType::LongClick, &self.frame_tag, self.view);
        }
    }
}

impl Drop for AdapterBase {
    fn drop(&mut self) {
        let mut views = self.views.borrow_mut();
        views.destroy(self.view);
        if let Some(wrapper) = self.wrapper {
            views.destroy(wrapper);
        }
    }
}

impl std::fmt::Debug for dyn ElementAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementAdapter")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

pub trait ElementAdapter {
    fn base(&self) -> &AdapterBase;
    fn base_mut(&mut self) -> &mut AdapterBase;
    fn kind(&self) -> crate::pool::AdapterKind;

    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn on_create_adapter(
        &mut self,
        element: &Element,
        ctx: &FrameContext,
        factory: &AdapterFactory,
    ) -> BindResult<()>;

    fn on_bind_model(
        &mut self,
        element: &Element,
        ctx: &FrameContext,
        factory: &AdapterFactory,
    ) -> BindResult<()>;

    fn on_unbind_model(&mut self, factory: &AdapterFactory);

    fn on_release_adapter(&mut self, factory: &AdapterFactory);

    /// The view a parent container attaches.
    fn view(&self) -> ViewKey {
        self.base().outer_view()
    }

    fn computed_width(&self) -> LayoutSize {
        self.base().width
    }

    fn computed_height(&self) -> LayoutSize {
        self.base().height
    }

    /// Visibility as currently observable: the bound override applies only
    /// while the adapter is bound.
    fn visibility_for_element(
        &self,
        element: &Element,
        ctx: &FrameContext,
    ) -> BindResult<Visibility> {
        resolve_visibility(element, ctx, self.base().bound)
    }

    fn create_adapter(
        &mut self,
        element: &Element,
        ctx: &FrameContext,
        factory: &AdapterFactory,
    ) -> BindResult<()> {
        let resolved = ctx.make_style_for(&element.style_references)?;
        {
            let base = self.base_mut();
            base.element = Some(element.clone());
            base.resolved = Some(resolved);
            base.width = LayoutSize::NotSet;
            base.height = LayoutSize::NotSet;
        }
        let visibility = element.visibility_state.default_visibility;
        self.set_view_visibility(visibility);
        if visibility == Visibility::Gone {
            // Creation is skipped entirely; a later bind that is no longer
            // gone performs it.
            return Ok(());
        }
        self.on_create_adapter(element, ctx, factory)?;
        self.base_mut().created = true;
        self.finish_create(ctx);
        Ok(())
    }

    fn bind_model(
        &mut self,
        element: &Element,
        ctx: &FrameContext,
        factory: &AdapterFactory,
    ) -> BindResult<()> {
        self.base_mut().element = Some(element.clone());
        let visibility = resolve_visibility(element, ctx, true)?;
        if !self.base().created && visibility != Visibility::Gone {
            // Creation was skipped for a gone element; perform it now, for
            // the element actually being bound.
            let resolved = ctx.make_style_for(&element.style_references)?;
            self.base_mut().resolved = Some(resolved);
            self.on_create_adapter(element, ctx, factory)?;
            self.base_mut().created = true;
            self.finish_create(ctx);
        }
        self.set_view_visibility(visibility);
        if visibility == Visibility::Gone {
            return Ok(());
        }
        // Styles are resolved at creation; only a style binding can change
        // them between binds.
        if element.style_references.style_binding.is_some() {
            let resolved = ctx.make_style_for(&element.style_references)?;
            self.base_mut().resolved = Some(resolved);
            self.apply_element_styles(ctx);
        }
        self.on_bind_model(element, ctx, factory)?;
        self.base_mut().bound = true;
        let actions = match &element.actions {
            ElementActions::None => Actions::default(),
            ElementActions::Inline(actions) => actions.clone(),
            ElementActions::Bound(binding) => ctx.actions_from_binding(binding)?,
        };
        self.attach_actions(actions, ctx);
        Ok(())
    }

    /// Idempotent; the unbind hook only runs if the bind hook did.
    fn unbind_model(&mut self, factory: &AdapterFactory) {
        if self.base().bound {
            self.base_mut().bound = false;
            self.on_unbind_model(factory);
        }
        self.base_mut().element = None;
        self.detach_actions();
    }

    fn release_adapter(&mut self, factory: &AdapterFactory) {
        self.unbind_model(factory);
        if self.base().created {
            self.base_mut().created = false;
            self.on_release_adapter(factory);
        }
        self.set_view_visibility(Visibility::Visible);
        let views = self.base().views.clone();
        if let Some(wrapper) = self.base_mut().wrapper.take() {
            let mut v = views.borrow_mut();
            v.remove_all_children(wrapper);
            v.destroy(wrapper);
        }
    }

    /// Applies computed dimensions (style values never override what a
    /// create hook already set), settles the wrapper view, and pushes
    /// resolved appearance onto the backing view.
    fn finish_create(&mut self, ctx: &FrameContext) {
        let Some(resolved) = self.base().resolved.clone() else {
            return;
        };
        {
            let base = self.base_mut();
            if base.width == LayoutSize::NotSet {
                base.width = resolved.width_spec();
            }
            if base.height == LayoutSize::NotSet {
                base.height = resolved.height_spec();
            }
        }
        // Wrapper structure settles at creation only: a parent attaches the
        // outer view right after create, so a later bind must not swap it.
        let views = self.base().views.clone();
        let needs_wrapper = resolved.has_borders() || resolved.has_rounded_corners();
        {
            let mut v = views.borrow_mut();
            let base_view = self.base().view;
            if needs_wrapper && self.base().wrapper.is_none() {
                let wrapper = v.create(ViewBody::Group { orientation: Orientation::Overlay });
                v.add_child(wrapper, base_view);
                self.base_mut().wrapper = Some(wrapper);
            } else if !needs_wrapper {
                if let Some(wrapper) = self.base_mut().wrapper.take() {
                    v.remove_all_children(wrapper);
                    v.destroy(wrapper);
                }
            }
        }
        self.apply_element_styles(ctx);
    }

    /// Pushes resolved appearance onto the existing view structure.
    fn apply_element_styles(&mut self, ctx: &FrameContext) {
        let Some(resolved) = self.base().resolved.clone() else {
            return;
        };
        let views = self.base().views.clone();
        {
            let mut v = views.borrow_mut();
            let base_view = self.base().view;
            let background = resolved.background().and_then(|fill| {
                let painted = resolve_fill(fill, resolved.is_rtl());
                if painted.is_none() {
                    ctx.report_message(
                        Severity::Warning,
                        ErrorCode::InvalidFill,
                        "Unsupported background fill; rendering none",
                    );
                }
                painted
            });
            let node = v.node_mut(base_view);
            node.background = background;
            node.padding = resolved.padding_px();
            node.min_height_px = resolved.min_height_px();
            node.opacity = resolved.opacity();

            let outer = self.base().outer_view();
            let outer_node = v.node_mut(outer);
            outer_node.border = resolved.border();
            outer_node.corner_radius_px = resolved.corner_radius_px();
        }
    }

    fn set_view_visibility(&mut self, visibility: Visibility) {
        let views = self.base().views.clone();
        let mut v = views.borrow_mut();
        v.set_visibility(self.base().view, visibility);
        if let Some(wrapper) = self.base().wrapper {
            v.set_visibility(wrapper, visibility);
        }
    }

    fn attach_actions(&mut self, actions: Actions, ctx: &FrameContext) {
        let views = self.base().views.clone();
        {
            let mut v = views.borrow_mut();
            let node = v.node_mut(self.base().view);
            node.clickable = actions.on_click.is_some();
            node.long_clickable = actions.on_long_click.is_some();
        }
        let base = self.base_mut();
        base.actions = actions;
        base.handler = Some(ctx.action_handler().clone());
        base.frame_tag = ctx.frame_tag().to_string();
    }

    fn detach_actions(&mut self) {
        let views = self.base().views.clone();
        {
            let mut v = views.borrow_mut();
            for key in [Some(self.base().view), self.base().wrapper].into_iter().flatten() {
                let node = v.node_mut(key);
                node.clickable = false;
                node.long_clickable = false;
            }
        }
        let base = self.base_mut();
        base.actions = Actions::default();
        base.handler = None;
    }
}

/// Visibility for an element: the bound override only applies while
/// bound, and only when the binding actually resolves.
pub fn resolve_visibility(
    element: &Element,
    ctx: &FrameContext,
    use_binding: bool,
) -> BindResult<Visibility> {
    let state = &element.visibility_state;
    if use_binding {
        if let Some(binding) = &state.overriding_bound_visibility {
            if let Some(visibility) = ctx.visibility_from_binding(binding)? {
                return Ok(visibility);
            }
        }
    }
    Ok(state.default_visibility)
}
