use crate::binding::BindingRef;
use crate::element::Element;
use crate::template::TemplateInvocation;

/// One entry in a container's child list. `kind: None` is the unset-union
/// case, a fatal content error wherever it is encountered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Content {
    pub kind: Option<ContentKind>,
}

impl Content {
    pub fn element(element: Element) -> Self {
        Content { kind: Some(ContentKind::Element(element)) }
    }

    pub fn template(invocation: TemplateInvocation) -> Self {
        Content { kind: Some(ContentKind::TemplateInvocation(invocation)) }
    }

    pub fn bound_element(binding: BindingRef) -> Self {
        Content { kind: Some(ContentKind::BoundElement(binding)) }
    }

    pub fn bound_template(binding: BindingRef) -> Self {
        Content { kind: Some(ContentKind::BoundTemplate(binding)) }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContentKind {
    /// Inline element; its adapter is created eagerly and survives rebinds.
    Element(Element),
    /// Inline template invocation; one adapter per binding context, created
    /// eagerly, identity preserved across rebinds.
    TemplateInvocation(TemplateInvocation),
    /// Element resolved at bind time; its adapter is recreated every bind.
    BoundElement(BindingRef),
    /// Template invocation resolved at bind time; adapters recreated every
    /// bind.
    BoundTemplate(BindingRef),
}
