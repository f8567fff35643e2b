//! Text metrics for the trellis engine, built on cosmic-text.
//!
//! The engine needs exactly two capabilities from a text stack: the natural
//! line height for a font size (to emulate line-height via padding), and
//! point-to-character hit testing over a laid-out string (to route touches
//! to click spans). Shaping state is kept in one global engine; buffers are
//! constructed per call.

use ahash::AHashMap;
use cosmic_text::{Attrs, Buffer, FontSystem, Metrics, Shaping};
use once_cell::sync::OnceCell;
use std::sync::Mutex;
use unicode_segmentation::UnicodeSegmentation;

struct Engine {
    fs: FontSystem,
    // Memoized natural line heights, keyed by font size bits.
    line_heights: AHashMap<u32, f32>,
}

static ENGINE: OnceCell<Mutex<Engine>> = OnceCell::new();

fn engine() -> &'static Mutex<Engine> {
    ENGINE.get_or_init(|| {
        Mutex::new(Engine { fs: FontSystem::new(), line_heights: AHashMap::new() })
    })
}

/// Default line-height multiplier applied when a style does not override
/// line height.
const LINE_HEIGHT_FACTOR: f32 = 1.3;

/// Natural line height in px for a font size in px.
pub fn line_height_px(font_size_px: f32) -> f32 {
    let mut eng = engine().lock().unwrap();
    if let Some(&h) = eng.line_heights.get(&font_size_px.to_bits()) {
        return h;
    }
    let mut buf = Buffer::new(
        &mut eng.fs,
        Metrics::new(font_size_px, font_size_px * LINE_HEIGHT_FACTOR),
    );
    {
        let mut b = buf.borrow_with(&mut eng.fs);
        b.set_size(None, None);
        b.set_text("Ag", &Attrs::new(), Shaping::Advanced, None);
        b.shape_until_scroll(true);
    }
    let h = buf
        .layout_runs()
        .next()
        .map(|run| run.line_height)
        .unwrap_or(font_size_px * LINE_HEIGHT_FACTOR);
    eng.line_heights.insert(font_size_px.to_bits(), h);
    h
}

/// Measured extents of a single laid-out string.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeasuredText {
    pub width_px: f32,
    pub height_px: f32,
}

/// Shapes `text` at `font_size_px`, wrapping at `wrap_width_px` when given.
pub fn measure(text: &str, font_size_px: f32, wrap_width_px: Option<f32>) -> MeasuredText {
    let mut eng = engine().lock().unwrap();
    let mut buf = Buffer::new(
        &mut eng.fs,
        Metrics::new(font_size_px, font_size_px * LINE_HEIGHT_FACTOR),
    );
    {
        let mut b = buf.borrow_with(&mut eng.fs);
        b.set_size(wrap_width_px, None);
        b.set_text(text, &Attrs::new(), Shaping::Advanced, None);
        b.shape_until_scroll(true);
    }
    let mut width = 0.0f32;
    let mut height = 0.0f32;
    for run in buf.layout_runs() {
        for g in run.glyphs {
            width = width.max(g.x + g.w);
        }
        height = height.max(run.line_top + run.line_height);
    }
    MeasuredText { width_px: width, height_px: height }
}

/// Hit-tests a point against the laid-out `text`, returning the character
/// index under it, snapped to a grapheme boundary. `None` when the point
/// misses the text entirely.
pub fn char_index_at(
    text: &str,
    font_size_px: f32,
    wrap_width_px: Option<f32>,
    x: f32,
    y: f32,
) -> Option<usize> {
    let mut eng = engine().lock().unwrap();
    let mut buf = Buffer::new(
        &mut eng.fs,
        Metrics::new(font_size_px, font_size_px * LINE_HEIGHT_FACTOR),
    );
    {
        let mut b = buf.borrow_with(&mut eng.fs);
        b.set_size(wrap_width_px, None);
        b.set_text(text, &Attrs::new(), Shaping::Advanced, None);
        b.shape_until_scroll(true);
    }
    let cursor = buf.hit(x, y)?;

    // Cursor indexes bytes within its buffer line; fold back to a global
    // character index across the preceding lines.
    let mut chars_before = 0usize;
    for (line_i, line) in text.split('\n').enumerate() {
        if line_i == cursor.line {
            let byte = snap_to_grapheme(line, cursor.index);
            return Some(chars_before + line[..byte].chars().count());
        }
        chars_before += line.chars().count() + 1;
    }
    None
}

fn snap_to_grapheme(line: &str, byte_index: usize) -> usize {
    if byte_index >= line.len() {
        return line.len();
    }
    let mut last = 0;
    for (at, _) in line.grapheme_indices(true) {
        if at > byte_index {
            break;
        }
        last = at;
    }
    last
}
