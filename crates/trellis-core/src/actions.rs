use crate::binding::BindingRef;

/// An opaque action descriptor dispatched to the host's action handler.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Action {
    pub name: String,
    pub payload: Vec<u8>,
}

impl Action {
    pub fn named(name: impl Into<String>) -> Self {
        Action { name: name.into(), payload: Vec::new() }
    }
}

/// The set of actions an element can carry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Actions {
    pub on_click: Option<Action>,
    pub on_long_click: Option<Action>,
    pub on_view: Option<Action>,
    pub on_hide: Option<Action>,
}

impl Actions {
    pub fn is_empty(&self) -> bool {
        self.on_click.is_none()
            && self.on_long_click.is_none()
            && self.on_view.is_none()
            && self.on_hide.is_none()
    }
}

/// How an element specifies its actions: not at all, inline, or via a
/// binding resolved at bind time.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ElementActions {
    #[default]
    None,
    Inline(Actions),
    Bound(BindingRef),
}
