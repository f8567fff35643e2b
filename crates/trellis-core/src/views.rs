use slotmap::SlotMap;

use crate::color::Color;
use crate::element::Visibility;
use crate::geometry::EdgeInsetsPx;
use crate::style::{GravityHorizontal, GravityVertical, TextAlignmentHorizontal};
use crate::styled::StyledText;

slotmap::new_key_type! {
    pub struct ViewKey;
}

/// Resolved width/height handed to the host's layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutSize {
    Px(i32),
    MatchParent,
    WrapContent,
    /// Not specified by any style; the parent decides.
    #[default]
    NotSet,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutParams {
    pub width: LayoutSize,
    pub height: LayoutSize,
    pub weight: f32,
    pub is_collapsible: bool,
    pub margins: EdgeInsetsPx,
    pub gravity_horizontal: Option<GravityHorizontal>,
    pub gravity_vertical: Option<GravityVertical>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Row,
    Column,
    /// Children overlap back to front.
    Overlay,
}

/// A fill with every indirection resolved: concrete colors, concrete
/// gradient direction.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedFill {
    Solid(Color),
    LinearGradient { stops: Vec<(Color, Option<u8>)>, angle_deg: i32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewBorder {
    pub color: Color,
    pub widths: EdgeInsetsPx,
}

/// A host-loaded image.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    pub url: String,
    pub width_px: u32,
    pub height_px: u32,
    pub tint: Option<Color>,
}

/// Single-layer swappable drawable slot: placeholder fill until the async
/// load lands, then the drawable, always with explicit bounds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageHolder {
    pub layer: Option<Drawable>,
    pub placeholder: Option<ResolvedFill>,
    pub bounds_px: (i32, i32),
}

impl ImageHolder {
    pub fn set_layer(&mut self, drawable: Drawable) {
        self.layer = Some(drawable);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewBody {
    Group { orientation: Orientation },
    Text(StyledText),
    Image(ImageHolder),
    /// Opaque host view; the tag is whatever the custom element provider
    /// wants to remember it by.
    Custom { tag: String },
    Spacer,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
    pub body: ViewBody,
    pub children: Vec<ViewKey>,
    pub visibility: Visibility,
    pub layout: LayoutParams,
    pub padding: EdgeInsetsPx,
    pub background: Option<ResolvedFill>,
    pub border: Option<ViewBorder>,
    pub corner_radius_px: i32,
    pub min_height_px: Option<i32>,
    pub opacity: f32,
    pub max_lines: Option<u32>,
    pub text_alignment: Option<TextAlignmentHorizontal>,
    pub clickable: bool,
    pub long_clickable: bool,
    /// Set by `invalidate`; the host clears it after repainting.
    pub dirty: bool,
}

impl ViewNode {
    fn new(body: ViewBody) -> Self {
        ViewNode {
            body,
            children: Vec::new(),
            visibility: Visibility::Visible,
            layout: LayoutParams::default(),
            padding: EdgeInsetsPx::default(),
            background: None,
            border: None,
            corner_radius_px: 0,
            min_height_px: None,
            opacity: 1.0,
            max_lines: None,
            text_alignment: None,
            clickable: false,
            long_clickable: false,
            dirty: false,
        }
    }
}

/// The live tree of backing views. Host widget construction is external;
/// the arena is the engine-side stand-in the host mirrors.
#[derive(Default)]
pub struct ViewArena {
    nodes: SlotMap<ViewKey, ViewNode>,
}

impl ViewArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, body: ViewBody) -> ViewKey {
        self.nodes.insert(ViewNode::new(body))
    }

    pub fn get(&self, key: ViewKey) -> Option<&ViewNode> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: ViewKey) -> Option<&mut ViewNode> {
        self.nodes.get_mut(key)
    }

    /// Panics on a stale key; arena keys are owned by exactly one adapter.
    pub fn node(&self, key: ViewKey) -> &ViewNode {
        &self.nodes[key]
    }

    pub fn node_mut(&mut self, key: ViewKey) -> &mut ViewNode {
        &mut self.nodes[key]
    }

    pub fn destroy(&mut self, key: ViewKey) {
        self.nodes.remove(key);
    }

    pub fn add_child(&mut self, parent: ViewKey, child: ViewKey) {
        self.nodes[parent].children.push(child);
    }

    pub fn insert_child(&mut self, parent: ViewKey, index: usize, child: ViewKey) {
        self.nodes[parent].children.insert(index, child);
    }

    pub fn remove_child_at(&mut self, parent: ViewKey, index: usize) -> ViewKey {
        self.nodes[parent].children.remove(index)
    }

    pub fn remove_all_children(&mut self, parent: ViewKey) -> Vec<ViewKey> {
        std::mem::take(&mut self.nodes[parent].children)
    }

    pub fn child_count(&self, parent: ViewKey) -> usize {
        self.nodes[parent].children.len()
    }

    pub fn child_at(&self, parent: ViewKey, index: usize) -> ViewKey {
        self.nodes[parent].children[index]
    }

    pub fn set_visibility(&mut self, key: ViewKey, visibility: Visibility) {
        self.nodes[key].visibility = visibility;
    }

    pub fn invalidate(&mut self, key: ViewKey) {
        self.nodes[key].dirty = true;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
