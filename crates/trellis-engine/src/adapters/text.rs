use std::any::Any;

use trellis_core::{
    BindError, BindResult, Element, ElementKind, ErrorCode, Span, StyledText, TextElement,
    TextKind, ViewBody, Visibility,
};

use crate::adapter::{AdapterBase, ElementAdapter, Views};
use crate::factory::AdapterFactory;
use crate::frame::FrameContext;
use crate::pool::AdapterKind;
use crate::styles::ResolvedStyle;

pub(crate) fn text_element(element: &Element) -> BindResult<&TextElement> {
    match &element.kind {
        Some(ElementKind::Text(text)) => Ok(text),
        _ => Err(BindError::new(
            ErrorCode::MissingOrUnhandledElement,
            "Missing TextElement",
        )),
    }
}

/// Pushes element-level text attributes onto a text view node.
pub(crate) fn apply_text_view_styles(
    views: &Views,
    view: trellis_core::ViewKey,
    resolved: &ResolvedStyle,
) {
    let mut v = views.borrow_mut();
    let node = v.node_mut(view);
    node.max_lines = resolved.max_lines();
    node.text_alignment = resolved.text_alignment();
    node.padding = resolved.text_padding_px();
}

/// Plain single-run text: one evaluated string, styled uniformly by the
/// element's resolved style.
pub struct ParameterizedTextAdapter {
    base: AdapterBase,
}

impl ParameterizedTextAdapter {
    pub(crate) fn new(views: Views) -> Self {
        ParameterizedTextAdapter {
            base: AdapterBase::new(views, ViewBody::Text(StyledText::new())),
        }
    }
}

impl ElementAdapter for ParameterizedTextAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AdapterBase {
        &mut self.base
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::ParameterizedText
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
        _factory: &AdapterFactory,
    ) -> BindResult<()> {
        let model = text_element(element)?;
        let text = match &model.content {
            Some(TextKind::ParameterizedText(text)) => Some(text.clone()),
            Some(TextKind::ParameterizedTextBinding(binding)) => {
                ctx.parameterized_text_binding_value(binding)?
            }
            _ => {
                return Err(BindError::new(
                    ErrorCode::UnhandledTextVariant,
                    "Unhandled TextElement type",
                ));
            }
        };
        let views = self.base.views.clone();
        let Some(text) = text else {
            views.borrow_mut().set_visibility(self.base.view, Visibility::Gone);
            return Ok(());
        };
        let evaluated = ctx.assets().format_text(&text);
        let Some(resolved) = self.base.resolved.clone() else {
            return Ok(());
        };
        {
            let mut v = views.borrow_mut();
            if let ViewBody::Text(buffer) = &mut v.node_mut(self.base.view).body {
                buffer.clear();
                let (start, end) = buffer.push_str(&evaluated);
                buffer.add_span(start, end, Span::Color(resolved.color()));
                buffer.add_span(start, end, Span::SizePx(resolved.font_size_px() as u32));
                if resolved.italic() {
                    buffer.add_span(start, end, Span::Italic);
                }
            }
        }
        apply_text_view_styles(&views, self.base.view, &resolved);
        Ok(())
    }

    fn on_unbind_model(&mut self, _factory: &AdapterFactory) {
        let views = self.base.views.clone();
        let mut v = views.borrow_mut();
        if let ViewBody::Text(buffer) = &mut v.node_mut(self.base.view).body {
            buffer.clear();
        }
    }

    fn on_release_adapter(&mut self, _factory: &AdapterFactory) {}
}
