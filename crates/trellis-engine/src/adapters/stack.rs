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

/// Overlapping content slots, back to front, each positioned by its own
/// gravity.
pub struct ElementStackAdapter {
    base: AdapterBase,
    container: ContainerChildren,
}

impl ElementStackAdapter {
    pub(crate) fn new(views: Views) -> Self {
        let base = AdapterBase::new(views.clone(), ViewBody::Group {
            orientation: Orientation::Overlay,
        });
        {
            let mut v = views.borrow_mut();
            let node = v.node_mut(base.view);
            node.layout.width = LayoutSize::MatchParent;
            node.layout.height = LayoutSize::WrapContent;
        }
        ElementStackAdapter { base, container: ContainerChildren::new() }
    }

    pub fn child_count(&self) -> usize {
        self.container.children.len()
    }

    fn contents(element: &Element) -> BindResult<Vec<Content>> {
        match &element.kind {
            Some(ElementKind::Stack(stack)) => Ok(stack.contents.clone()),
            _ => Err(BindError::new(
                ErrorCode::MissingOrUnhandledElement,
                "Missing ElementStack",
            )),
        }
    }
}

fn apply_stack_child_params(views: &Views, child: &dyn ElementAdapter) {
    let mut v = views.borrow_mut();
    let node = v.node_mut(child.view());
    node.layout.width = match child.computed_width() {
        LayoutSize::NotSet => LayoutSize::WrapContent,
        width => width,
    };
    node.layout.height = match child.computed_height() {
        LayoutSize::NotSet => LayoutSize::WrapContent,
        height => height,
    };
    if let Some(resolved) = &child.base().resolved {
        node.layout.gravity_horizontal = resolved.raw().gravity_horizontal;
        node.layout.gravity_vertical = resolved.raw().gravity_vertical;
        node.layout.margins = resolved.margins_px();
    }
}

impl ElementAdapter for ElementStackAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AdapterBase {
        &mut self.base
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Stack
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
                apply_stack_child_params(&params_views, child);
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
