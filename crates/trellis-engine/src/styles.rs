//! Resolution of cascaded declarative styles into concrete geometry and
//! appearance values, against host capabilities (density, default corner
//! radius, layout direction).

use trellis_core::{
    AssetProvider, Color, CornerMask, CornerRadius, EdgeInsetsPx, EdgeMask, Fill, FillKind,
    GravityHorizontal, GravityVertical, LayoutSize, ResolvedFill, SizeSpec, Style,
    TextAlignmentHorizontal, ViewBorder, dp_to_px,
};

pub const DEFAULT_FONT_SIZE_DP: f32 = 14.0;

/// A style with every indirection resolved except fills (whose resolution
/// can produce a warning, so it stays an explicit call).
#[derive(Debug)]
pub struct ResolvedStyle {
    style: Style,
    density: f32,
    default_corner_radius_px: i32,
    rtl: bool,
}

impl ResolvedStyle {
    pub fn resolve(style: Style, assets: &dyn AssetProvider) -> Self {
        ResolvedStyle {
            style,
            density: assets.density(),
            default_corner_radius_px: assets.default_corner_radius_px(),
            rtl: assets.is_rtl(),
        }
    }

    pub fn default_for(assets: &dyn AssetProvider) -> Self {
        Self::resolve(Style::default(), assets)
    }

    /// The cascaded style this resolution was built from.
    pub fn raw(&self) -> &Style {
        &self.style
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn has_width(&self) -> bool {
        self.style.width.is_some()
    }

    pub fn has_height(&self) -> bool {
        self.style.height.is_some()
    }

    pub fn width_spec(&self) -> LayoutSize {
        self.size_spec(self.style.width)
    }

    pub fn height_spec(&self) -> LayoutSize {
        self.size_spec(self.style.height)
    }

    fn size_spec(&self, spec: Option<SizeSpec>) -> LayoutSize {
        match spec {
            Some(SizeSpec::Dp(dp)) => LayoutSize::Px(dp_to_px(dp, self.density)),
            Some(SizeSpec::FillParent) => LayoutSize::MatchParent,
            Some(SizeSpec::FitContent) => LayoutSize::WrapContent,
            None => LayoutSize::NotSet,
        }
    }

    pub fn has_color(&self) -> bool {
        self.style.color.is_some()
    }

    pub fn color(&self) -> Color {
        self.style.color.unwrap_or(Color::BLACK)
    }

    pub fn font_size_dp(&self) -> f32 {
        self.style.font.and_then(|f| f.size_dp).unwrap_or(DEFAULT_FONT_SIZE_DP)
    }

    pub fn font_size_px(&self) -> f32 {
        self.font_size_dp() * self.density
    }

    pub fn italic(&self) -> bool {
        self.style.font.and_then(|f| f.italic).unwrap_or(false)
    }

    pub fn line_height_px(&self) -> Option<f32> {
        self.style.font.and_then(|f| f.line_height_dp).map(|dp| dp * self.density)
    }

    pub fn max_lines(&self) -> Option<u32> {
        self.style.max_lines
    }

    pub fn min_height_px(&self) -> Option<i32> {
        self.style.min_height_dp.map(|dp| dp_to_px(dp, self.density))
    }

    pub fn opacity(&self) -> f32 {
        self.style.opacity.unwrap_or(1.0)
    }

    pub fn has_gravity_horizontal(&self) -> bool {
        self.style.gravity_horizontal.is_some()
    }

    pub fn has_gravity_vertical(&self) -> bool {
        self.style.gravity_vertical.is_some()
    }

    pub fn gravity_horizontal(&self, default: GravityHorizontal) -> GravityHorizontal {
        self.style.gravity_horizontal.unwrap_or(default)
    }

    pub fn gravity_vertical(&self, default: GravityVertical) -> GravityVertical {
        self.style.gravity_vertical.unwrap_or(default)
    }

    pub fn text_alignment(&self) -> Option<TextAlignmentHorizontal> {
        self.style.text_alignment_horizontal
    }

    pub fn margins_px(&self) -> EdgeInsetsPx {
        let m = self.style.margins.unwrap_or_default();
        EdgeInsetsPx {
            start: dp_to_px(m.start, self.density),
            end: dp_to_px(m.end, self.density),
            top: dp_to_px(m.top, self.density),
            bottom: dp_to_px(m.bottom, self.density),
        }
    }

    pub fn has_margins(&self) -> bool {
        self.style.margins.is_some_and(|m| !m.is_zero())
    }

    pub fn has_borders(&self) -> bool {
        self.style.borders.as_ref().is_some_and(|b| b.width_dp > 0.0)
    }

    /// Border widths per edge: the uniform width on every edge the mask
    /// includes. An empty mask means all edges.
    pub fn border(&self) -> Option<ViewBorder> {
        let b = self.style.borders.as_ref()?;
        if b.width_dp <= 0.0 {
            return None;
        }
        let edges = if b.edges.is_empty() { EdgeMask::all() } else { b.edges };
        let w = dp_to_px(b.width_dp, self.density);
        let edge = |e: EdgeMask| if edges.contains(e) { w } else { 0 };
        Some(ViewBorder {
            color: b.color,
            widths: EdgeInsetsPx {
                start: edge(EdgeMask::START),
                end: edge(EdgeMask::END),
                top: edge(EdgeMask::TOP),
                bottom: edge(EdgeMask::BOTTOM),
            },
        })
    }

    pub fn corner_radius_px(&self) -> i32 {
        match self.style.rounded_corners.as_ref().and_then(|rc| rc.radius) {
            Some(CornerRadius::Dp(dp)) => dp_to_px(dp as f32, self.density),
            Some(CornerRadius::HostDefault) => self.default_corner_radius_px,
            None => 0,
        }
    }

    /// Degenerate radii or an explicitly empty corner set do not count as
    /// rounded.
    pub fn has_rounded_corners(&self) -> bool {
        let Some(rc) = self.style.rounded_corners.as_ref() else {
            return false;
        };
        let mask = if rc.corners.is_empty() { CornerMask::all() } else { rc.corners };
        self.corner_radius_px() > 0 && !mask.is_empty()
    }

    /// Declared padding plus per-edge border widths.
    pub fn padding_px(&self) -> EdgeInsetsPx {
        let p = self.style.padding.unwrap_or_default();
        let border = self.border().map(|b| b.widths).unwrap_or_default();
        EdgeInsetsPx {
            start: dp_to_px(p.start, self.density) + border.start,
            end: dp_to_px(p.end, self.density) + border.end,
            top: dp_to_px(p.top, self.density) + border.top,
            bottom: dp_to_px(p.bottom, self.density) + border.bottom,
        }
    }

    /// Padding for text views: adds the extra top/bottom needed to emulate
    /// the requested line height over the font's natural line height.
    pub fn text_padding_px(&self) -> EdgeInsetsPx {
        let mut padding = self.padding_px();
        if let Some(line_height) = self.line_height_px() {
            let natural = trellis_text::line_height_px(self.font_size_px());
            let extra = ((line_height - natural) / 2.0).max(0.0).round() as i32;
            padding.top += extra;
            padding.bottom += extra;
        }
        padding
    }

    pub fn has_background(&self) -> bool {
        self.style.background.is_some()
    }

    pub fn background(&self) -> Option<&Fill> {
        self.style.background.as_ref()
    }

    pub fn pre_load_fill(&self) -> Option<&Fill> {
        self.style.pre_load_fill.as_ref()
    }

    pub fn is_rtl(&self) -> bool {
        self.rtl
    }
}

/// Resolves a declarative fill to a paintable one. Returns `None` for
/// unsupported fills; the caller reports the warning.
pub fn resolve_fill(fill: &Fill, rtl: bool) -> Option<ResolvedFill> {
    match fill.kind.as_ref()? {
        FillKind::Color(c) => Some(ResolvedFill::Solid(*c)),
        FillKind::LinearGradient(g) => {
            if g.stops.is_empty() {
                return None;
            }
            let mut angle = g.direction_deg.unwrap_or(0);
            if g.reverse_for_rtl && rtl {
                angle = (180 - angle).rem_euclid(360);
            }
            Some(ResolvedFill::LinearGradient {
                stops: g.stops.iter().map(|s| (s.color, s.position)).collect(),
                angle_deg: angle,
            })
        }
    }
}
