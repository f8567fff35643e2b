use crate::binding::BindingContext;
use crate::element::Element;
use crate::media::MediaQueryCondition;
use crate::style::{Style, StyleRefs};

/// A named bundle of styles, optionally gated by media-query conditions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stylesheet {
    pub stylesheet_id: String,
    pub styles: Vec<Style>,
    pub conditions: Vec<MediaQueryCondition>,
}

impl Stylesheet {
    pub fn named(stylesheet_id: impl Into<String>, styles: Vec<Style>) -> Self {
        Stylesheet { stylesheet_id: stylesheet_id.into(), styles, conditions: Vec::new() }
    }
}

/// References to stylesheets by id plus inline sheets, installed in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stylesheets {
    pub stylesheet_ids: Vec<String>,
    pub stylesheets: Vec<Stylesheet>,
}

/// A named, reusable element subtree with its own stylesheet scope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Template {
    pub template_id: String,
    pub element: Element,
    pub stylesheets: Stylesheets,
}

impl Template {
    pub fn new(template_id: impl Into<String>, element: Element) -> Self {
        Template { template_id: template_id.into(), element, stylesheets: Stylesheets::default() }
    }
}

/// Invokes a template once per binding context.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateInvocation {
    pub template_id: String,
    pub binding_contexts: Vec<BindingContext>,
}

impl TemplateInvocation {
    pub fn new(template_id: impl Into<String>, binding_contexts: Vec<BindingContext>) -> Self {
        TemplateInvocation { template_id: template_id.into(), binding_contexts }
    }
}

/// The top-level unit handed to the engine: local templates and
/// stylesheets plus a frame-wide style reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub tag: String,
    pub stylesheets: Stylesheets,
    pub style_references: StyleRefs,
    pub templates: Vec<Template>,
}

/// Templates and stylesheets shared across frames by the host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SharedState {
    pub templates: Vec<Template>,
    pub stylesheets: Vec<Stylesheet>,
}
