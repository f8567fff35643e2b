use std::any::Any;

use trellis_core::{
    BindError, BindResult, Drawable, Element, ElementKind, ErrorCode, Image, ImageContent,
    ImageElement, LayoutSize, Severity, ViewBody, Visibility,
};

use crate::adapter::{AdapterBase, CancelToken, ElementAdapter, Views};
use crate::factory::AdapterFactory;
use crate::frame::FrameContext;
use crate::pool::AdapterKind;
use crate::styles::resolve_fill;

/// Aspect-ratio-preserving bounds: explicit width and height stretch; one
/// explicit dimension scales the other proportionally; neither uses the
/// fallback height (text line height for inline images) or the intrinsic
/// size.
pub(crate) fn scaled_bounds(
    explicit_w: Option<i32>,
    explicit_h: Option<i32>,
    intrinsic: (u32, u32),
    fallback_height: Option<i32>,
) -> (i32, i32) {
    let iw = intrinsic.0.max(1) as f32;
    let ih = intrinsic.1.max(1) as f32;
    match (explicit_w, explicit_h) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, (w as f32 * ih / iw).round() as i32),
        (None, Some(h)) => ((h as f32 * iw / ih).round() as i32, h),
        (None, None) => match fallback_height {
            Some(h) => ((h as f32 * iw / ih).round() as i32, h),
            None => (intrinsic.0 as i32, intrinsic.1 as i32),
        },
    }
}

/// Binds one image element to a single-layer swappable drawable slot,
/// loading the image asynchronously with per-request cancellation.
pub struct ImageElementAdapter {
    base: AdapterBase,
    tokens: Vec<CancelToken>,
}

impl ImageElementAdapter {
    pub(crate) fn new(views: Views) -> Self {
        ImageElementAdapter {
            base: AdapterBase::new(views, ViewBody::Image(Default::default())),
            tokens: Vec::new(),
        }
    }

    fn image_element(element: &Element) -> BindResult<&ImageElement> {
        match &element.kind {
            Some(ElementKind::Image(image)) => Ok(image),
            _ => Err(BindError::new(
                ErrorCode::MissingOrUnhandledElement,
                "Missing ImageElement",
            )),
        }
    }

    fn cancel_outstanding(&mut self) {
        for token in self.tokens.drain(..) {
            token.cancel();
        }
    }
}

impl ElementAdapter for ImageElementAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AdapterBase {
        &mut self.base
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Image
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
        // A rebind supersedes any load still in flight from the last bind.
        self.cancel_outstanding();
        let model = Self::image_element(element)?;
        let image: Option<Image> = match &model.content {
            Some(ImageContent::Inline(image)) => Some(image.clone()),
            Some(ImageContent::Bound(binding)) => ctx.image_binding_value(binding)?,
            None => {
                return Err(BindError::new(
                    ErrorCode::MissingElementContents,
                    "Missing Image content",
                ));
            }
        };
        let views = self.base.views.clone();
        let Some(image) = image else {
            views.borrow_mut().set_visibility(self.base.view, Visibility::Gone);
            return Ok(());
        };
        let filtered = ctx.filter_image_sources(&image);

        let explicit_w = match self.base.width {
            LayoutSize::Px(w) => Some(w),
            _ => None,
        };
        let explicit_h = match self.base.height {
            LayoutSize::Px(h) => Some(h),
            _ => None,
        };

        let placeholder = self.base.resolved.as_ref().and_then(|resolved| {
            let fill = resolved.pre_load_fill()?;
            let painted = resolve_fill(fill, resolved.is_rtl());
            if painted.is_none() {
                ctx.report_message(
                    Severity::Warning,
                    ErrorCode::InvalidFill,
                    "Unsupported pre-load fill; rendering none",
                );
            }
            painted
        });
        {
            let mut v = views.borrow_mut();
            if let ViewBody::Image(holder) = &mut v.node_mut(self.base.view).body {
                holder.layer = None;
                holder.placeholder = placeholder;
                holder.bounds_px = (explicit_w.unwrap_or(0), explicit_h.unwrap_or(0));
            }
        }

        let token = CancelToken::new();
        self.tokens.push(token.clone());
        let callback_views = views.clone();
        let view = self.base.view;
        let tint = filtered.tint;
        ctx.assets().load_image(
            &filtered,
            explicit_w.map(|w| w as u32),
            explicit_h.map(|h| h as u32),
            Box::new(move |drawable: Option<Drawable>| {
                if token.is_cancelled() {
                    return;
                }
                let Some(mut drawable) = drawable else {
                    return;
                };
                if tint.is_some() {
                    drawable.tint = tint;
                }
                let mut v = callback_views.borrow_mut();
                let Some(node) = v.get_mut(view) else {
                    return;
                };
                if let ViewBody::Image(holder) = &mut node.body {
                    holder.bounds_px = scaled_bounds(
                        explicit_w,
                        explicit_h,
                        (drawable.width_px, drawable.height_px),
                        None,
                    );
                    holder.set_layer(drawable);
                    node.dirty = true;
                }
            }),
        );
        Ok(())
    }

    fn on_unbind_model(&mut self, _factory: &AdapterFactory) {
        // Late-arriving results for this bind must not touch the view; the
        // adapter may already be serving a different model.
        self.cancel_outstanding();
        let views = self.base.views.clone();
        let mut v = views.borrow_mut();
        if let ViewBody::Image(holder) = &mut v.node_mut(self.base.view).body {
            holder.layer = None;
            holder.placeholder = None;
            holder.bounds_px = (0, 0);
        }
    }

    fn on_release_adapter(&mut self, _factory: &AdapterFactory) {}
}
