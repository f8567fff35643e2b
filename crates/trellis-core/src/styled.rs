use crate::actions::Actions;
use crate::color::Color;
use crate::views::ImageHolder;

/// Placeholder glyph spliced in for inline images and margin spacers, so
/// every non-text chunk occupies exactly one character of the buffer.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

#[derive(Clone, Debug, PartialEq)]
pub enum Span {
    Color(Color),
    Italic,
    SizePx(u32),
    /// Zero-content spacer glyph sized to the margin width.
    MarginPx(i32),
    Click(Actions),
    Image(ImageHolder),
}

/// Half-open character range `[start, end)` a span applies to.
#[derive(Clone, Debug, PartialEq)]
pub struct SpanRange {
    pub start: usize,
    pub end: usize,
    pub span: Span,
}

/// A mutable styled-text buffer: one contiguous string plus spans over
/// character ranges, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledText {
    text: String,
    len_chars: usize,
    spans: Vec<SpanRange>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters (spacer/image placeholders count as one each).
    pub fn len(&self) -> usize {
        self.len_chars
    }

    pub fn is_empty(&self) -> bool {
        self.len_chars == 0
    }

    /// Appends text, returning the character range it now occupies.
    pub fn push_str(&mut self, s: &str) -> (usize, usize) {
        let start = self.len_chars;
        self.text.push_str(s);
        self.len_chars += s.chars().count();
        (start, self.len_chars)
    }

    /// Appends one placeholder glyph, returning its character index.
    pub fn push_placeholder(&mut self) -> usize {
        let at = self.len_chars;
        self.text.push(OBJECT_REPLACEMENT);
        self.len_chars += 1;
        at
    }

    pub fn add_span(&mut self, start: usize, end: usize, span: Span) {
        debug_assert!(start <= end && end <= self.len_chars);
        self.spans.push(SpanRange { start, end, span });
    }

    pub fn spans(&self) -> &[SpanRange] {
        &self.spans
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.len_chars = 0;
        self.spans.clear();
    }

    /// Click spans covering the character at `index`, in document order.
    pub fn click_spans_at(&self, index: usize) -> Vec<&Actions> {
        self.spans
            .iter()
            .filter(|r| r.start <= index && index < r.end)
            .filter_map(|r| match &r.span {
                Span::Click(actions) => Some(actions),
                _ => None,
            })
            .collect()
    }

    /// Mutable access to inline image holders, for async load completion.
    pub fn image_spans_mut(&mut self) -> impl Iterator<Item = (usize, &mut ImageHolder)> {
        self.spans.iter_mut().filter_map(|r| match &mut r.span {
            Span::Image(holder) => Some((r.start, holder)),
            _ => None,
        })
    }

    pub fn image_span_at_mut(&mut self, index: usize) -> Option<&mut ImageHolder> {
        self.spans.iter_mut().find_map(|r| match &mut r.span {
            Span::Image(holder) if r.start == index => Some(holder),
            _ => None,
        })
    }
}
