use crate::binding::BindingRef;
use crate::actions::ElementActions;
use crate::content::Content;
use crate::image::Image;
use crate::style::StyleRefs;
use crate::text::{ChunkedText, ParameterizedText};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Visible,
    Invisible,
    Gone,
}

/// Default visibility plus an optional bound override. The override is
/// consulted only while the element is bound; creation and unbinding use
/// the default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibilityState {
    pub default_visibility: Visibility,
    pub overriding_bound_visibility: Option<BindingRef>,
}

impl VisibilityState {
    pub fn always(v: Visibility) -> Self {
        VisibilityState { default_visibility: v, overriding_bound_visibility: None }
    }
}

/// One node of the layout tree. `kind: None` is the unset-union case and
/// is routed to the fatal-content-error path by the adapter factory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub style_references: StyleRefs,
    pub visibility_state: VisibilityState,
    pub actions: ElementActions,
    pub kind: Option<ElementKind>,
}

impl Element {
    pub fn of(kind: ElementKind) -> Self {
        Element { kind: Some(kind), ..Default::default() }
    }

    pub fn styled(kind: ElementKind, style_references: StyleRefs) -> Self {
        Element { kind: Some(kind), style_references, ..Default::default() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ElementKind {
    Custom(CustomElement),
    Text(TextElement),
    Image(ImageElement),
    GridRow(GridRow),
    List(ElementList),
    Stack(ElementStack),
}

/// Opaque payload interpreted by the host's custom element provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomElementData {
    pub tag: String,
    pub payload: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomElement {
    pub content: Option<CustomContent>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CustomContent {
    Inline(CustomElementData),
    Bound(BindingRef),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextElement {
    pub content: Option<TextKind>,
}

impl TextElement {
    pub fn chunked(text: ChunkedText) -> Self {
        TextElement { content: Some(TextKind::ChunkedText(text)) }
    }

    pub fn parameterized(text: ParameterizedText) -> Self {
        TextElement { content: Some(TextKind::ParameterizedText(text)) }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TextKind {
    ChunkedText(ChunkedText),
    ChunkedTextBinding(BindingRef),
    ParameterizedText(ParameterizedText),
    ParameterizedTextBinding(BindingRef),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageElement {
    pub content: Option<ImageContent>,
}

impl ImageElement {
    pub fn inline(image: Image) -> Self {
        ImageElement { content: Some(ImageContent::Inline(image)) }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ImageContent {
    Inline(Image),
    Bound(BindingRef),
}

/// Horizontal row of cells with per-cell width semantics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridRow {
    pub cells: Vec<GridCell>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridCell {
    pub content: Option<Content>,
    pub width: Option<CellWidthSpec>,
}

impl GridCell {
    pub fn of(content: Content) -> Self {
        GridCell { content: Some(content), width: None }
    }

    pub fn with_width(content: Content, width: GridCellWidth) -> Self {
        GridCell { content: Some(content), width: Some(CellWidthSpec::Inline(width)) }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CellWidthSpec {
    Inline(GridCellWidth),
    Bound(BindingRef),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridCellWidth {
    pub spec: Option<CellWidthKind>,
    pub is_collapsible: bool,
}

impl GridCellWidth {
    pub fn dp(dp: i32) -> Self {
        GridCellWidth { spec: Some(CellWidthKind::Dp(dp)), is_collapsible: false }
    }

    pub fn weight(weight: u32) -> Self {
        GridCellWidth { spec: Some(CellWidthKind::Weight(weight)), is_collapsible: false }
    }

    pub fn content_width() -> Self {
        GridCellWidth { spec: Some(CellWidthKind::ContentWidth), is_collapsible: false }
    }

    pub fn collapsible(mut self) -> Self {
        self.is_collapsible = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CellWidthKind {
    Dp(i32),
    Weight(u32),
    ContentWidth,
}

/// Vertical sequence of content slots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementList {
    pub contents: Vec<Content>,
}

/// Overlapping content slots, back to front.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementStack {
    pub contents: Vec<Content>,
}
