use std::any::Any;

use trellis_core::{
    BindError, BindResult, CustomContent, CustomElement, CustomElementData, Element, ElementKind,
    ErrorCode, Orientation, ViewBody, ViewKey, Visibility,
};

use crate::adapter::{AdapterBase, ElementAdapter, Views};
use crate::factory::AdapterFactory;
use crate::frame::FrameContext;
use crate::pool::AdapterKind;

/// Hosts an opaque view produced by the custom element provider. The host
/// view is requested at bind and returned at unbind, so a recycled adapter
/// never leaks a stale host view.
pub struct CustomElementAdapter {
    base: AdapterBase,
    host_view: Option<ViewKey>,
}

impl CustomElementAdapter {
    pub(crate) fn new(views: Views) -> Self {
        CustomElementAdapter {
            base: AdapterBase::new(views, ViewBody::Group {
                orientation: Orientation::Overlay,
            }),
            host_view: None,
        }
    }

    fn custom_element(element: &Element) -> BindResult<&CustomElement> {
        match &element.kind {
            Some(ElementKind::Custom(custom)) => Ok(custom),
            _ => Err(BindError::new(
                ErrorCode::MissingOrUnhandledElement,
                "Missing CustomElement",
            )),
        }
    }
}

impl ElementAdapter for CustomElementAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AdapterBase {
        &mut self.base
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Custom
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn on_create_adapter(
        &mut self,
        _element: &Element,
        _ctx: &FrameContext,
        _factory: &AdapterFactory,
    ) -> BindResult<()> {
        Ok(())
    }

    fn on_bind_model(
        &mut self,
        element: &Element,
        ctx: &FrameContext,
        factory: &AdapterFactory,
    ) -> BindResult<()> {
        let custom = Self::custom_element(element)?;
        let data: Option<CustomElementData> = match &custom.content {
            Some(CustomContent::Inline(data)) => Some(data.clone()),
            Some(CustomContent::Bound(binding)) => ctx.custom_element_binding_value(binding)?,
            None => {
                return Err(BindError::new(
                    ErrorCode::MissingElementContents,
                    "Missing CustomElement content",
                ));
            }
        };
        let views = self.base.views.clone();
        let Some(data) = data else {
            views.borrow_mut().set_visibility(self.base.view, Visibility::Gone);
            return Ok(());
        };
        let host_view = {
            let mut v = views.borrow_mut();
            let host_view = factory.custom_provider().create_custom_view(&mut v, &data);
            v.add_child(self.base.view, host_view);
            host_view
        };
        self.host_view = Some(host_view);
        Ok(())
    }

    fn on_unbind_model(&mut self, factory: &AdapterFactory) {
        let Some(host_view) = self.host_view.take() else {
            return;
        };
        let views = self.base.views.clone();
        let mut v = views.borrow_mut();
        if let Some(position) =
            v.node(self.base.view).children.iter().position(|&c| c == host_view)
        {
            v.remove_child_at(self.base.view, position);
        }
        factory.custom_provider().release_custom_view(&mut v, host_view);
    }

    fn on_release_adapter(&mut self, _factory: &AdapterFactory) {}
}
