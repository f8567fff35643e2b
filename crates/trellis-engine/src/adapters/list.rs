use std::any::Any;

use trellis_core::{
    BindError, BindResult, Content, Element, ElementKind, ErrorCode, LayoutSize, Orientation,
    ViewBody,
};

use crate::adapter::{AdapterBase, ElementAdapter, Views};
use crate::adapters::container::{self, ContainerChildren};
use crate::factory::AdapterFactory;
use crate::frame::FrameContext;
use crate::pool::AdapterKind;

/// Vertical sequence of content slots.
pub struct ElementListAdapter {
    base: AdapterBase,
    container: ContainerChildren,
}

impl ElementListAdapter {
    pub(crate) fn new(views: Views) -> Self {
        let base = AdapterBase::new(views.clone(), ViewBody::Group {
            orientation: Orientation::Column,
        });
        {
            let mut v = views.borrow_mut();
            let node = v.node_mut(base.view);
            node.layout.width = LayoutSize::MatchParent;
            node.layout.height = LayoutSize::WrapContent;
        }
        ElementListAdapter { base, container: ContainerChildren::new() }
    }

    pub fn child_count(&self) -> usize {
        self.container.children.len()
    }

    fn contents(element: &Element) -> BindResult<Vec<Content>> {
        match &element.kind {
            Some(ElementKind::List(list)) => Ok(list.contents.clone()),
            _ => Err(BindError::new(
                ErrorCode::MissingOrUnhandledElement,
                "Missing ElementList",
            )),
        }
    }
}

/// List children size to their own computed dimensions, falling back to
/// fit-content, and carry their style's horizontal gravity and margins.
/// A fill-parent height cannot work inside a vertically unbounded list;
/// it warns and falls back to fit-content.
pub(crate) fn apply_linear_child_params(
    views: &Views,
    child: &dyn ElementAdapter,
    ctx: &FrameContext,
) {
    let mut v = views.borrow_mut();
    let node = v.node_mut(child.view());
    node.layout.width = match child.computed_width() {
        LayoutSize::NotSet => LayoutSize::WrapContent,
        width => width,
    };
    node.layout.height = match child.computed_height() {
        LayoutSize::NotSet => LayoutSize::WrapContent,
        LayoutSize::MatchParent => {
            ctx.report_message(
                trellis_core::Severity::Warning,
                ErrorCode::UnsupportedFeature,
                "Fill-parent height is not supported in a vertical list; using fit-content",
            );
            LayoutSize::WrapContent
        }
        height => height,
    };
    if let Some(resolved) = &child.base().resolved {
        node.layout.gravity_horizontal = resolved.raw().gravity_horizontal;
        node.layout.margins = resolved.margins_px();
    }
}

impl ElementAdapter for ElementListAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AdapterBase {
        &mut self.base
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::List
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn on_create_adapter(
        &mut self,
        element: &Element,
        ctx: &FrameContext,
        factory: &AdapterFactory,
    ) -> BindResult<()> {
        let contents = Self::contents(element)?;
        let views = self.base.views.clone();
        container::create_children(
            &mut self.container,
            self.base.view,
            &views,
            &contents,
            ctx,
            factory,
        )
    }

    fn on_bind_model(
        &mut self,
        element: &Element,
        ctx: &FrameContext,
        factory: &AdapterFactory,
    ) -> BindResult<()> {
        let contents = Self::contents(element)?;
        let views = self.base.views.clone();
        let params_views = views.clone();
        container::bind_children(
            &mut self.container,
            self.base.view,
            &views,
            &contents,
            ctx,
            factory,
            &mut |child, _slot| {
                apply_linear_child_params(&params_views, child, ctx);
                Ok(())
            },
        )
    }

    fn on_unbind_model(&mut self, factory: &AdapterFactory) {
        let Some(element) = self.base.element.clone() else {
            return;
        };
        let Ok(contents) = Self::contents(&element) else {
            return;
        };
        let views = self.base.views.clone();
        container::unbind_children(
            &mut self.container,
            self.base.view,
            &views,
            &contents,
            factory,
        );
    }

    fn on_release_adapter(&mut self, factory: &AdapterFactory) {
        let views = self.base.views.clone();
        container::release_children(&mut self.container, self.base.view, &views, factory);
    }
}
