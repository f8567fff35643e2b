use crate::actions::ElementActions;
use crate::binding::BindingRef;
use crate::image::Image;
use crate::style::StyleRefs;

/// Host-formattable text: the raw string may contain locale/substitution
/// markup that the asset provider expands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterizedText {
    pub text: String,
}

impl ParameterizedText {
    pub fn literal(text: impl Into<String>) -> Self {
        ParameterizedText { text: text.into() }
    }
}

/// Ordered styled chunks spliced into one text buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkedText {
    pub chunks: Vec<Chunk>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chunk {
    pub kind: Option<ChunkKind>,
    pub actions: ElementActions,
}

impl Chunk {
    pub fn text(chunk: StyledTextChunk) -> Self {
        Chunk { kind: Some(ChunkKind::Text(chunk)), actions: ElementActions::None }
    }

    pub fn image(chunk: StyledImageChunk) -> Self {
        Chunk { kind: Some(ChunkKind::Image(chunk)), actions: ElementActions::None }
    }

    pub fn with_actions(mut self, actions: ElementActions) -> Self {
        self.actions = actions;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChunkKind {
    Text(StyledTextChunk),
    Image(StyledImageChunk),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledTextChunk {
    pub style_references: StyleRefs,
    pub content: Option<TextChunkContent>,
}

impl StyledTextChunk {
    pub fn literal(text: impl Into<String>) -> Self {
        StyledTextChunk {
            style_references: StyleRefs::default(),
            content: Some(TextChunkContent::Literal(ParameterizedText::literal(text))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TextChunkContent {
    Literal(ParameterizedText),
    Bound(BindingRef),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledImageChunk {
    pub style_references: StyleRefs,
    pub content: Option<ImageChunkContent>,
}

impl StyledImageChunk {
    pub fn inline(image: Image) -> Self {
        StyledImageChunk {
            style_references: StyleRefs::default(),
            content: Some(ImageChunkContent::Inline(image)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ImageChunkContent {
    Inline(Image),
    Bound(BindingRef),
}
