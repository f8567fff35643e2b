use crate::actions::Actions;
use crate::element::{CustomElementData, Element, GridCellWidth, Visibility};
use crate::image::Image;
use crate::style::Style;
use crate::template::TemplateInvocation;
use crate::text::{ChunkedText, ParameterizedText};

/// A reference from an element to a binding id, resolved once per render
/// pass. The accessor called on the frame context fixes the expected
/// payload kind; `is_optional` selects hide-on-absence over fatal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BindingRef {
    pub binding_id: String,
    pub is_optional: bool,
}

impl BindingRef {
    pub fn new(binding_id: impl Into<String>) -> Self {
        BindingRef { binding_id: binding_id.into(), is_optional: false }
    }

    pub fn optional(binding_id: impl Into<String>) -> Self {
        BindingRef { binding_id: binding_id.into(), is_optional: true }
    }
}

/// The payload a binding id resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundValue {
    ParameterizedText(ParameterizedText),
    ChunkedText(ChunkedText),
    Image(Image),
    Element(Element),
    TemplateInvocation(TemplateInvocation),
    CustomElementData(CustomElementData),
    CellWidth(GridCellWidth),
    Actions(Actions),
    Style(Style),
}

/// One entry of a binding context. `visibility` can suppress the bound
/// content without removing the value; `transclude_from` copies a value
/// from the enclosing template's context under this id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BindingValue {
    pub binding_id: String,
    pub visibility: Option<Visibility>,
    pub transclude_from: Option<String>,
    pub value: Option<BoundValue>,
}

impl BindingValue {
    pub fn new(binding_id: impl Into<String>, value: BoundValue) -> Self {
        BindingValue {
            binding_id: binding_id.into(),
            visibility: None,
            transclude_from: None,
            value: Some(value),
        }
    }

    pub fn empty(binding_id: impl Into<String>) -> Self {
        BindingValue { binding_id: binding_id.into(), ..Default::default() }
    }

    pub fn transcluding(
        binding_id: impl Into<String>,
        parent_binding_id: impl Into<String>,
    ) -> Self {
        BindingValue {
            binding_id: binding_id.into(),
            visibility: None,
            transclude_from: Some(parent_binding_id.into()),
            value: None,
        }
    }
}

/// The binding values for one template instantiation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BindingContext {
    pub binding_values: Vec<BindingValue>,
}

impl BindingContext {
    pub fn with_values(binding_values: Vec<BindingValue>) -> Self {
        BindingContext { binding_values }
    }
}
