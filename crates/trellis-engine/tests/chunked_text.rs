//! Rich-text composition: styled runs, inline images and click regions in
//! one buffer, with asynchronous image loading and cancellation.

mod common;

use trellis_core::{
    Action, ActionType, Actions, Chunk, ChunkedText, Element, ElementActions, ElementKind,
    Image, SizeSpec, Span, Style, StyledImageChunk, StyledTextChunk, TextElement, ViewBody,
};
use trellis_engine::{ChunkedTextAdapter, ElementAdapter, TouchPhase};

use common::{engine_with_frame, frame_with_styles, TestEngine};

const PLACEHOLDER: char = '\u{FFFC}';

fn image_style_24() -> Style {
    let mut style = Style::named("img24");
    style.width = Some(SizeSpec::Dp(24.0));
    style.height = Some(SizeSpec::Dp(24.0));
    style
}

/// `["Hello ", <image 24x24 with onClick>, "world"]`
fn hello_world_element() -> Element {
    let mut image_chunk = StyledImageChunk::inline(Image::from_url("icon://star"));
    image_chunk.style_references = trellis_core::StyleRefs::of(&["img24"]);
    let chunks = vec![
        Chunk::text(StyledTextChunk::literal("Hello ")),
        Chunk::image(image_chunk).with_actions(ElementActions::Inline(Actions {
            on_click: Some(Action::named("star-tapped")),
            ..Default::default()
        })),
        Chunk::text(StyledTextChunk::literal("world")),
    ];
    Element::of(ElementKind::Text(TextElement::chunked(ChunkedText { chunks })))
}

fn bind_hello_world(engine: &TestEngine) -> Box<dyn ElementAdapter> {
    let element = hello_world_element();
    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    adapter.bind_model(&element, &engine.ctx, &engine.factory).unwrap();
    adapter
}

#[test]
fn buffer_is_text_plus_one_placeholder() {
    let engine = engine_with_frame(frame_with_styles(vec![image_style_24()]), &[]);
    let adapter = bind_hello_world(&engine);

    let views = engine.views.borrow();
    let ViewBody::Text(buffer) = &views.node(adapter.base().view).body else {
        panic!("expected text body");
    };
    assert_eq!(buffer.len(), "Hello ".len() + 1 + "world".len());
    assert_eq!(buffer.text().chars().nth(6), Some(PLACEHOLDER));

    // Exactly one click span, covering exactly the placeholder character.
    let click_ranges: Vec<(usize, usize)> = buffer
        .spans()
        .iter()
        .filter(|r| matches!(r.span, Span::Click(_)))
        .map(|r| (r.start, r.end))
        .collect();
    assert_eq!(click_ranges, vec![(6, 7)]);
    assert_eq!(buffer.click_spans_at(6).len(), 1);
    assert!(buffer.click_spans_at(5).is_empty());
    assert!(buffer.click_spans_at(7).is_empty());
}

#[test]
fn click_fires_once_and_only_on_up() {
    let engine = engine_with_frame(frame_with_styles(vec![image_style_24()]), &[]);
    let mut adapter = bind_hello_world(&engine);
    let chunked = adapter.as_any_mut().downcast_mut::<ChunkedTextAdapter>().unwrap();

    assert!(chunked.handle_touch_at_char(TouchPhase::Down, 6));
    assert_eq!(engine.handler.count(), 0);

    assert!(chunked.handle_touch_at_char(TouchPhase::Up, 6));
    assert_eq!(
        *engine.handler.handled.borrow(),
        vec![("star-tapped".to_string(), ActionType::Click)]
    );

    // Outside the placeholder's hit box nothing fires.
    assert!(!chunked.handle_touch_at_char(TouchPhase::Up, 2));
    assert_eq!(engine.handler.count(), 1);
}

#[test]
fn inline_image_resolves_with_explicit_bounds() {
    let engine = engine_with_frame(frame_with_styles(vec![image_style_24()]), &[]);
    let adapter = bind_hello_world(&engine);
    assert_eq!(engine.assets.pending_count(), 1);

    engine.assets.complete_all(128, 128);
    let mut views = engine.views.borrow_mut();
    let node = views.node_mut(adapter.base().view);
    assert!(node.dirty);
    let ViewBody::Text(buffer) = &mut node.body else {
        panic!("expected text body");
    };
    let holder = buffer.image_span_at_mut(6).unwrap();
    // Explicit width and height stretch regardless of intrinsic size.
    assert_eq!(holder.bounds_px, (24, 24));
    assert_eq!(holder.layer.as_ref().unwrap().url, "icon://star");
}

#[test]
fn late_image_result_after_unbind_is_dropped() {
    let engine = engine_with_frame(frame_with_styles(vec![image_style_24()]), &[]);
    let mut adapter = bind_hello_world(&engine);
    assert_eq!(engine.assets.pending_count(), 1);

    adapter.unbind_model(&engine.factory);
    // The load resolves after the adapter was unbound (and possibly
    // recycled); it must not mutate the view.
    engine.assets.complete_all(128, 128);

    let views = engine.views.borrow();
    let node = views.node(adapter.base().view);
    assert!(!node.dirty);
    let ViewBody::Text(buffer) = &node.body else {
        panic!("expected text body");
    };
    assert!(buffer.is_empty());
    assert!(buffer.spans().is_empty());
}

#[test]
fn margins_insert_spacer_placeholders() {
    let mut margin_style = Style::named("spaced");
    margin_style.margins = Some(trellis_core::EdgeInsets {
        start: 4.0,
        end: 6.0,
        top: 0.0,
        bottom: 0.0,
    });
    let engine = engine_with_frame(frame_with_styles(vec![margin_style]), &[]);

    let mut chunk = StyledTextChunk::literal("mid");
    chunk.style_references = trellis_core::StyleRefs::of(&["spaced"]);
    let element = Element::of(ElementKind::Text(TextElement::chunked(ChunkedText {
        chunks: vec![Chunk::text(chunk)],
    })));

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    adapter.bind_model(&element, &engine.ctx, &engine.factory).unwrap();

    let views = engine.views.borrow();
    let ViewBody::Text(buffer) = &views.node(adapter.base().view).body else {
        panic!("expected text body");
    };
    // spacer + "mid" + spacer
    assert_eq!(buffer.len(), 5);
    let margins: Vec<i32> = buffer
        .spans()
        .iter()
        .filter_map(|r| match r.span {
            Span::MarginPx(px) => Some(px),
            _ => None,
        })
        .collect();
    assert_eq!(margins, vec![4, 6]);
}

#[test]
fn per_chunk_max_lines_warns_and_is_ignored() {
    let mut style = Style::named("clamped");
    style.max_lines = Some(2);
    let engine = engine_with_frame(frame_with_styles(vec![style]), &[]);

    let mut chunk = StyledTextChunk::literal("text");
    chunk.style_references = trellis_core::StyleRefs::of(&["clamped"]);
    let element = Element::of(ElementKind::Text(TextElement::chunked(ChunkedText {
        chunks: vec![Chunk::text(chunk)],
    })));

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    adapter.bind_model(&element, &engine.ctx, &engine.factory).unwrap();

    let views = engine.views.borrow();
    let node = views.node(adapter.base().view);
    assert_eq!(node.max_lines, None);
    let logger = engine.ctx.debug_logger().borrow();
    assert_eq!(logger.messages(trellis_core::Severity::Warning).len(), 1);
}

#[test]
fn chunk_styles_span_exactly_their_run() {
    let mut red = Style::named("red");
    red.color = Some(trellis_core::Color::from_rgb(255, 0, 0));
    red.font = Some(trellis_core::Font {
        size_dp: Some(20.0),
        italic: Some(true),
        line_height_dp: None,
    });
    let engine = engine_with_frame(frame_with_styles(vec![red]), &[]);

    let mut styled = StyledTextChunk::literal("styled");
    styled.style_references = trellis_core::StyleRefs::of(&["red"]);
    let element = Element::of(ElementKind::Text(TextElement::chunked(ChunkedText {
        chunks: vec![Chunk::text(StyledTextChunk::literal("plain ")), Chunk::text(styled)],
    })));

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    adapter.bind_model(&element, &engine.ctx, &engine.factory).unwrap();

    let views = engine.views.borrow();
    let ViewBody::Text(buffer) = &views.node(adapter.base().view).body else {
        panic!("expected text body");
    };
    let styled_range = (6, 12);
    let color_spans: Vec<(usize, usize)> = buffer
        .spans()
        .iter()
        .filter(|r| matches!(r.span, Span::Color(_)))
        .map(|r| (r.start, r.end))
        .collect();
    assert_eq!(color_spans, vec![styled_range]);
    assert!(buffer
        .spans()
        .iter()
        .any(|r| matches!(r.span, Span::Italic) && (r.start, r.end) == styled_range));
    assert!(buffer
        .spans()
        .iter()
        .any(|r| matches!(r.span, Span::SizePx(20)) && (r.start, r.end) == styled_range));
}
