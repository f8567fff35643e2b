#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    pub const TRANSPARENT: Color = Color(0, 0, 0, 0);
    pub const BLACK: Color = Color(0, 0, 0, 255);
    pub const WHITE: Color = Color(255, 255, 255, 255);

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b, 255)
    }

    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(r, g, b, a)
    }

    pub fn from_hex(hex: &str) -> Self {
        let s = hex.trim_start_matches('#');
        let (r, g, b, a) = match s.len() {
            6 => (
                u8::from_str_radix(&s[0..2], 16).unwrap_or(0),
                u8::from_str_radix(&s[2..4], 16).unwrap_or(0),
                u8::from_str_radix(&s[4..6], 16).unwrap_or(0),
                255,
            ),
            8 => (
                u8::from_str_radix(&s[0..2], 16).unwrap_or(0),
                u8::from_str_radix(&s[2..4], 16).unwrap_or(0),
                u8::from_str_radix(&s[4..6], 16).unwrap_or(0),
                u8::from_str_radix(&s[6..8], 16).unwrap_or(255),
            ),
            _ => (0, 0, 0, 255),
        };
        Color(r, g, b, a)
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Color(self.0, self.1, self.2, a)
    }
}

/// One stop of a linear gradient; `position` is 0..=100 along the axis,
/// or unset to distribute stops evenly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorStop {
    pub color: Color,
    pub position: Option<u8>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearGradient {
    pub stops: Vec<ColorStop>,
    /// Degrees counterclockwise from 3 o'clock.
    pub direction_deg: Option<i32>,
    /// Mirror the direction when the host is laid out right-to-left.
    pub reverse_for_rtl: bool,
}

impl LinearGradient {
    /// Field-wise merge used by the style cascade: later values win where
    /// present; stop lists concatenate like repeated fields.
    pub fn merge_from(&mut self, other: &LinearGradient) {
        self.stops.extend(other.stops.iter().copied());
        if other.direction_deg.is_some() {
            self.direction_deg = other.direction_deg;
        }
        self.reverse_for_rtl |= other.reverse_for_rtl;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FillKind {
    Color(Color),
    LinearGradient(LinearGradient),
}

/// A declarative fill. `kind: None` means the fill was specified but with
/// no recognizable payload; resolution treats that as "no fill" plus a
/// warning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fill {
    pub kind: Option<FillKind>,
}

impl Fill {
    pub fn color(c: Color) -> Self {
        Fill { kind: Some(FillKind::Color(c)) }
    }

    pub fn linear_gradient(g: LinearGradient) -> Self {
        Fill { kind: Some(FillKind::LinearGradient(g)) }
    }

    pub fn merge_from(&mut self, other: &Fill) {
        match (&mut self.kind, &other.kind) {
            (
                Some(FillKind::LinearGradient(mine)),
                Some(FillKind::LinearGradient(theirs)),
            ) => mine.merge_from(theirs),
            (mine, theirs) => {
                if theirs.is_some() {
                    *mine = theirs.clone();
                }
            }
        }
    }
}
