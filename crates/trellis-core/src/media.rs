#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonCondition {
    Equals,
    GreaterThan,
    LessThan,
    NotEquals,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DarkLightMode {
    #[default]
    Any,
    Dark,
    Light,
}

/// A condition gating a stylesheet or an image source. All conditions on
/// an item must hold for it to be active.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaQueryCondition {
    FrameWidth { width_px: i32, condition: ComparisonCondition },
    DarkLight { mode: DarkLightMode },
}
