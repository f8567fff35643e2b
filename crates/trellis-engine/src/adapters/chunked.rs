//! Rich text: splices styled runs, inline images and click regions into
//! one contiguous styled-text buffer. Inline images load asynchronously
//! with per-request cancellation so a late result can never mutate a
//! recycled view.

use std::any::Any;
use std::rc::Rc;

use trellis_core::{
    ActionHandler, ActionType, Actions, BindError, BindResult, ChunkKind, ChunkedText, Color,
    Drawable, Element, ElementActions, ErrorCode, Image, ImageChunkContent, ImageHolder,
    ResolvedFill, Severity, Span, StyledText, TextChunkContent, TextKind, Vec2, ViewBody,
    Visibility,
};

use crate::adapter::{AdapterBase, CancelToken, ElementAdapter, TouchPhase, Views};
use crate::adapters::image::scaled_bounds;
use crate::adapters::text::{apply_text_view_styles, text_element};
use crate::factory::AdapterFactory;
use crate::frame::FrameContext;
use crate::pool::AdapterKind;
use crate::styles::resolve_fill;

struct PendingImageLoad {
    at: usize,
    image: Image,
    tint: Option<Color>,
    explicit_w: Option<i32>,
    explicit_h: Option<i32>,
    line_height_px: i32,
}

pub struct ChunkedTextAdapter {
    base: AdapterBase,
    tokens: Vec<CancelToken>,
    handler: Option<Rc<dyn ActionHandler>>,
    frame_tag: String,
}

impl ChunkedTextAdapter {
    pub(crate) fn new(views: Views) -> Self {
        ChunkedTextAdapter {
            base: AdapterBase::new(views, ViewBody::Text(StyledText::new())),
            tokens: Vec::new(),
            handler: None,
            frame_tag: String::new(),
        }
    }

    fn cancel_outstanding(&mut self) {
        for token in self.tokens.drain(..) {
            token.cancel();
        }
    }

    /// Routes a touch at `position` to the click span under it, if any.
    /// Hit-testing goes through the text layout; dispatch rules live in
    /// [`Self::handle_touch_at_char`].
    pub fn handle_touch(&self, phase: TouchPhase, position: Vec2) -> bool {
        let index = {
            let views = self.base.views.borrow();
            let node = views.node(self.base.view);
            let ViewBody::Text(buffer) = &node.body else {
                return false;
            };
            let font_size_px = self
                .base
                .resolved
                .as_ref()
                .map(|r| r.font_size_px())
                .unwrap_or(crate::styles::DEFAULT_FONT_SIZE_DP);
            trellis_text::char_index_at(
                buffer.text(),
                font_size_px,
                None,
                position.x,
                position.y,
            )
        };
        match index {
            Some(index) => self.handle_touch_at_char(phase, index),
            None => false,
        }
    }

    /// Dispatches a touch that hit the character at `index`. The action
    /// fires only on the `Up` phase, and when several click spans cover
    /// the character the first in document order wins. Returns whether a
    /// click span was hit at all.
    pub fn handle_touch_at_char(&self, phase: TouchPhase, index: usize) -> bool {
        let views = self.base.views.borrow();
        let node = views.node(self.base.view);
        let ViewBody::Text(buffer) = &node.body else {
            return false;
        };
        let spans = buffer.click_spans_at(index);
        let Some(actions) = spans.first() else {
            return false;
        };
        if phase == TouchPhase::Up {
            if let (Some(handler), Some(action)) = (&self.handler, &actions.on_click) {
                handler.handle_action(action, ActionType::Click, &self.frame_tag, self.base.view);
            }
        }
        true
    }
}

fn resolve_chunk_actions(actions: &ElementActions, ctx: &FrameContext) -> BindResult<Actions> {
    match actions {
        ElementActions::None => Ok(Actions::default()),
        ElementActions::Inline(actions) => Ok(actions.clone()),
        ElementActions::Bound(binding) => ctx.actions_from_binding(binding),
    }
}

impl ElementAdapter for ChunkedTextAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AdapterBase {
        &mut self.base
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::ChunkedText
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
        // A bind over a still-bound adapter must not let the old bind's
        // image loads land in the new buffer.
        self.cancel_outstanding();
        let model = text_element(element)?;
        let chunked: Option<ChunkedText> = match &model.content {
            Some(TextKind::ChunkedText(text)) => Some(text.clone()),
            Some(TextKind::ChunkedTextBinding(binding)) => {
                ctx.chunked_text_binding_value(binding)?
            }
            _ => {
                return Err(BindError::new(
                    ErrorCode::UnhandledTextVariant,
                    "Unhandled TextElement type",
                ));
            }
        };
        let views = self.base.views.clone();
        let Some(chunked) = chunked else {
            views.borrow_mut().set_visibility(self.base.view, Visibility::Gone);
            return Ok(());
        };
        self.handler = Some(ctx.action_handler().clone());
        self.frame_tag = ctx.frame_tag().to_string();

        let Some(element_style) = self.base.resolved.clone() else {
            return Ok(());
        };
        let element_line_height =
            trellis_text::line_height_px(element_style.font_size_px()).round() as i32;

        // Compose into a fresh buffer first; binding lookups must not run
        // while the arena is borrowed.
        let mut buffer = StyledText::new();
        let mut pending: Vec<PendingImageLoad> = Vec::new();
        for chunk in &chunked.chunks {
            match &chunk.kind {
                Some(ChunkKind::Text(text_chunk)) => {
                    let chunk_style = ctx.make_style_for(&text_chunk.style_references)?;
                    let text = match &text_chunk.content {
                        Some(TextChunkContent::Literal(text)) => Some(text.clone()),
                        Some(TextChunkContent::Bound(binding)) => {
                            ctx.parameterized_text_binding_value(binding)?
                        }
                        None => {
                            return Err(BindError::new(
                                ErrorCode::UnhandledTextVariant,
                                "Unhandled text chunk content",
                            ));
                        }
                    };
                    // An absent optional binding silently hides the chunk.
                    let Some(text) = text else {
                        continue;
                    };
                    if chunk_style.max_lines().is_some() {
                        ctx.report_message(
                            Severity::Warning,
                            ErrorCode::UnsupportedFeature,
                            "Max lines are not supported on individual chunks",
                        );
                    }
                    let evaluated = ctx.assets().format_text(&text);
                    let margins = chunk_style.margins_px();
                    if margins.start > 0 {
                        let at = buffer.push_placeholder();
                        buffer.add_span(at, at + 1, Span::MarginPx(margins.start));
                    }
                    let (start, end) = buffer.push_str(&evaluated);
                    if chunk_style.has_color() {
                        buffer.add_span(start, end, Span::Color(chunk_style.color()));
                    }
                    if chunk_style.italic() {
                        buffer.add_span(start, end, Span::Italic);
                    }
                    if chunk_style.raw().font.is_some_and(|f| f.size_dp.is_some()) {
                        buffer.add_span(
                            start,
                            end,
                            Span::SizePx(chunk_style.font_size_px() as u32),
                        );
                    }
                    if margins.end > 0 {
                        let at = buffer.push_placeholder();
                        buffer.add_span(at, at + 1, Span::MarginPx(margins.end));
                    }
                    let actions = resolve_chunk_actions(&chunk.actions, ctx)?;
                    if !actions.is_empty() {
                        buffer.add_span(start, end, Span::Click(actions));
                    }
                }
                Some(ChunkKind::Image(image_chunk)) => {
                    let chunk_style = ctx.make_style_for(&image_chunk.style_references)?;
                    let image = match &image_chunk.content {
                        Some(ImageChunkContent::Inline(image)) => Some(image.clone()),
                        Some(ImageChunkContent::Bound(binding)) => {
                            ctx.image_binding_value(binding)?
                        }
                        None => {
                            return Err(BindError::new(
                                ErrorCode::UnhandledTextVariant,
                                "Unhandled image chunk content",
                            ));
                        }
                    };
                    let Some(image) = image else {
                        continue;
                    };
                    let filtered = ctx.filter_image_sources(&image);
                    let placeholder: Option<ResolvedFill> =
                        chunk_style.pre_load_fill().and_then(|fill| {
                            let painted = resolve_fill(fill, chunk_style.is_rtl());
                            if painted.is_none() {
                                ctx.report_message(
                                    Severity::Warning,
                                    ErrorCode::InvalidFill,
                                    "Unsupported pre-load fill; rendering none",
                                );
                            }
                            painted
                        });
                    let explicit_w = match chunk_style.width_spec() {
                        trellis_core::LayoutSize::Px(w) => Some(w),
                        _ => None,
                    };
                    let explicit_h = match chunk_style.height_spec() {
                        trellis_core::LayoutSize::Px(h) => Some(h),
                        _ => None,
                    };
                    let at = buffer.push_placeholder();
                    buffer.add_span(at, at + 1, Span::Image(ImageHolder {
                        layer: None,
                        placeholder,
                        bounds_px: (
                            explicit_w.unwrap_or(element_line_height),
                            explicit_h.unwrap_or(element_line_height),
                        ),
                    }));
                    let actions = resolve_chunk_actions(&chunk.actions, ctx)?;
                    if !actions.is_empty() {
                        buffer.add_span(at, at + 1, Span::Click(actions));
                    }
                    pending.push(PendingImageLoad {
                        at,
                        tint: filtered.tint,
                        image: filtered,
                        explicit_w,
                        explicit_h,
                        line_height_px: element_line_height,
                    });
                }
                None => {
                    return Err(BindError::new(
                        ErrorCode::UnhandledContentKind,
                        "Unhandled Chunk type: not set",
                    ));
                }
            }
        }

        {
            let mut v = views.borrow_mut();
            v.node_mut(self.base.view).body = ViewBody::Text(buffer);
        }
        apply_text_view_styles(&views, self.base.view, &element_style);

        for load in pending {
            let PendingImageLoad { at, image, tint, explicit_w, explicit_h, line_height_px } =
                load;
            let token = CancelToken::new();
            self.tokens.push(token.clone());
            let callback_views = views.clone();
            let view = self.base.view;
            ctx.assets().load_image(
                &image,
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
                    let ViewBody::Text(buffer) = &mut node.body else {
                        return;
                    };
                    let Some(holder) = buffer.image_span_at_mut(at) else {
                        return;
                    };
                    holder.bounds_px = scaled_bounds(
                        explicit_w,
                        explicit_h,
                        (drawable.width_px, drawable.height_px),
                        Some(line_height_px),
                    );
                    holder.set_layer(drawable);
                    node.dirty = true;
                }),
            );
        }
        Ok(())
    }

    fn on_unbind_model(&mut self, _factory: &AdapterFactory) {
        self.cancel_outstanding();
        self.handler = None;
        let views = self.base.views.clone();
        let mut v = views.borrow_mut();
        if let ViewBody::Text(buffer) = &mut v.node_mut(self.base.view).body {
            buffer.clear();
        }
    }

    fn on_release_adapter(&mut self, _factory: &AdapterFactory) {}
}
