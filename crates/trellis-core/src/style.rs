use bitflags::bitflags;

use crate::binding::BindingRef;
use crate::color::{Color, Fill};
use crate::geometry::EdgeInsets;

/// Ordered stack of style ids, cascaded left to right, plus an optional
/// style binding layered on top at bind time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleRefs {
    pub style_ids: Vec<String>,
    pub style_binding: Option<BindingRef>,
}

impl StyleRefs {
    pub fn of(ids: &[&str]) -> Self {
        StyleRefs {
            style_ids: ids.iter().map(|s| s.to_string()).collect(),
            style_binding: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.style_ids.is_empty() && self.style_binding.is_none()
    }
}

/// Declared width/height. `None` at the style level is the distinguished
/// "not set" case, resolved to a defer-to-parent sentinel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizeSpec {
    Dp(f32),
    FillParent,
    FitContent,
}

bitflags! {
    /// Edges a border applies to. An empty mask means "not specified",
    /// which the resolver treats as all edges.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EdgeMask: u8 {
        const START = 1 << 0;
        const END = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
    }
}

bitflags! {
    /// Corners a radius applies to. Empty means all corners.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CornerMask: u8 {
        const TOP_START = 1 << 0;
        const TOP_END = 1 << 1;
        const BOTTOM_END = 1 << 2;
        const BOTTOM_START = 1 << 3;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Borders {
    pub color: Color,
    pub width_dp: f32,
    pub edges: EdgeMask,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CornerRadius {
    Dp(i32),
    /// Defer to the host's default corner radius.
    HostDefault,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoundedCorners {
    pub corners: CornerMask,
    pub radius: Option<CornerRadius>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GravityHorizontal {
    Start,
    Center,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GravityVertical {
    Top,
    Center,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlignmentHorizontal {
    Start,
    Center,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlignmentVertical {
    Top,
    Middle,
    Bottom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Font {
    pub size_dp: Option<f32>,
    pub italic: Option<bool>,
    /// Desired line height; emulated through extra vertical padding.
    pub line_height_dp: Option<f32>,
}

impl Font {
    /// Field-wise merge: later values win where set.
    pub fn merge_from(&mut self, other: &Font) {
        if other.size_dp.is_some() {
            self.size_dp = other.size_dp;
        }
        if other.italic.is_some() {
            self.italic = other.italic;
        }
        if other.line_height_dp.is_some() {
            self.line_height_dp = other.line_height_dp;
        }
    }
}

/// One named style: every attribute optional, unset attributes falling
/// back to the shared default style at resolution time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    pub style_id: String,
    pub color: Option<Color>,
    pub background: Option<Fill>,
    /// Fill painted behind an image while it loads.
    pub pre_load_fill: Option<Fill>,
    pub rounded_corners: Option<RoundedCorners>,
    pub borders: Option<Borders>,
    pub padding: Option<EdgeInsets>,
    pub margins: Option<EdgeInsets>,
    pub width: Option<SizeSpec>,
    pub height: Option<SizeSpec>,
    pub min_height_dp: Option<f32>,
    pub gravity_horizontal: Option<GravityHorizontal>,
    pub gravity_vertical: Option<GravityVertical>,
    pub text_alignment_horizontal: Option<TextAlignmentHorizontal>,
    pub text_alignment_vertical: Option<TextAlignmentVertical>,
    pub font: Option<Font>,
    pub max_lines: Option<u32>,
    pub opacity: Option<f32>,
}

impl Style {
    pub fn named(style_id: impl Into<String>) -> Self {
        Style { style_id: style_id.into(), ..Default::default() }
    }

    /// Cascade step: apply `other`'s set attributes over `self`. Whole
    /// attributes are replaced, except `font` and the fills, which merge
    /// sub-field-wise.
    pub fn merge_from(&mut self, other: &Style) {
        if let Some(c) = other.color {
            self.color = Some(c);
        }
        match (&mut self.background, &other.background) {
            (Some(mine), Some(theirs)) => mine.merge_from(theirs),
            (mine @ None, Some(theirs)) => *mine = Some(theirs.clone()),
            _ => {}
        }
        match (&mut self.pre_load_fill, &other.pre_load_fill) {
            (Some(mine), Some(theirs)) => mine.merge_from(theirs),
            (mine @ None, Some(theirs)) => *mine = Some(theirs.clone()),
            _ => {}
        }
        if other.rounded_corners.is_some() {
            self.rounded_corners = other.rounded_corners.clone();
        }
        if other.borders.is_some() {
            self.borders = other.borders.clone();
        }
        if other.padding.is_some() {
            self.padding = other.padding;
        }
        if other.margins.is_some() {
            self.margins = other.margins;
        }
        if other.width.is_some() {
            self.width = other.width;
        }
        if other.height.is_some() {
            self.height = other.height;
        }
        if other.min_height_dp.is_some() {
            self.min_height_dp = other.min_height_dp;
        }
        if other.gravity_horizontal.is_some() {
            self.gravity_horizontal = other.gravity_horizontal;
        }
        if other.gravity_vertical.is_some() {
            self.gravity_vertical = other.gravity_vertical;
        }
        if other.text_alignment_horizontal.is_some() {
            self.text_alignment_horizontal = other.text_alignment_horizontal;
        }
        if other.text_alignment_vertical.is_some() {
            self.text_alignment_vertical = other.text_alignment_vertical;
        }
        match (&mut self.font, &other.font) {
            (Some(mine), Some(theirs)) => mine.merge_from(theirs),
            (mine @ None, Some(theirs)) => *mine = Some(*theirs),
            _ => {}
        }
        if other.max_lines.is_some() {
            self.max_lines = other.max_lines;
        }
        if other.opacity.is_some() {
            self.opacity = other.opacity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorStop, FillKind, LinearGradient};

    #[test]
    fn cascade_later_style_wins() {
        let mut acc = Style::default();
        let mut s1 = Style::named("one");
        s1.color = Some(Color::from_rgb(1, 2, 3));
        s1.max_lines = Some(5);
        let mut s2 = Style::named("two");
        s2.max_lines = Some(2);
        s2.min_height_dp = Some(33.0);

        acc.merge_from(&s1);
        acc.merge_from(&s2);

        assert_eq!(acc.color, Some(Color::from_rgb(1, 2, 3)));
        assert_eq!(acc.max_lines, Some(2));
        assert_eq!(acc.min_height_dp, Some(33.0));
    }

    #[test]
    fn cascade_merges_font_fields() {
        let mut acc = Style::default();
        let mut s1 = Style::named("one");
        s1.font = Some(Font { size_dp: Some(11.0), italic: Some(true), line_height_dp: None });
        let mut s2 = Style::named("two");
        s2.font = Some(Font { size_dp: Some(13.0), italic: None, line_height_dp: None });

        acc.merge_from(&s1);
        acc.merge_from(&s2);

        assert_eq!(
            acc.font,
            Some(Font { size_dp: Some(13.0), italic: Some(true), line_height_dp: None })
        );
    }

    #[test]
    fn cascade_merges_gradient_fills() {
        let stop = ColorStop { color: Color::from_rgb(9, 9, 9), position: None };
        let mut acc = Style::default();
        let mut s1 = Style::named("one");
        s1.background = Some(Fill::linear_gradient(LinearGradient {
            stops: vec![stop],
            direction_deg: None,
            reverse_for_rtl: false,
        }));
        let mut s2 = Style::named("two");
        s2.background = Some(Fill::linear_gradient(LinearGradient {
            stops: vec![],
            direction_deg: Some(321),
            reverse_for_rtl: false,
        }));

        acc.merge_from(&s1);
        acc.merge_from(&s2);

        match acc.background.unwrap().kind.unwrap() {
            FillKind::LinearGradient(g) => {
                assert_eq!(g.stops, vec![stop]);
                assert_eq!(g.direction_deg, Some(321));
            }
            other => panic!("expected gradient, got {other:?}"),
        }
    }
}
