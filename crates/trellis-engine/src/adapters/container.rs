//! Shared reconciliation for composite adapters (lists, grid rows,
//! stacks): a container's content list mixes inline content (adapters
//! created eagerly, identity preserved across rebinds) with bound content
//! (adapters created at bind time and released at unbind, because the
//! bound value may change between binds).

use smallvec::SmallVec;

use trellis_core::{
    BindError, BindResult, BindingValue, BoundValue, Content, ContentKind, ErrorCode, Severity,
    ViewKey, Visibility,
};

use crate::adapter::{ElementAdapter, Views};
use crate::adapters::template::{
    TemplateAdapter, bind_template_adapter, create_and_bind_template_adapter,
    create_template_adapter,
};
use crate::factory::AdapterFactory;
use crate::frame::FrameContext;

/// Per-child hook applied after each child binds, for container-specific
/// layout params (grid cell widths, list gravity).
pub(crate) type PostBind<'a> = dyn FnMut(&dyn ElementAdapter, usize) -> BindResult<()> + 'a;

/// Live children plus the per-slot adapter-count vector. The vector always
/// has one entry per content slot once created, and the child list is
/// exactly the concatenation of each slot's adapters, in slot order.
#[derive(Default)]
pub(crate) struct ContainerChildren {
    pub children: Vec<Box<dyn ElementAdapter>>,
    pub counts: SmallVec<[usize; 8]>,
}

impl ContainerChildren {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn create_children(
    state: &mut ContainerChildren,
    base_view: ViewKey,
    views: &Views,
    contents: &[Content],
    ctx: &FrameContext,
    factory: &AdapterFactory,
) -> BindResult<()> {
    state.counts.clear();
    for content in contents {
        match &content.kind {
            Some(ContentKind::Element(element)) => {
                let adapter = factory.create_adapter_for_element(element, ctx)?;
                views.borrow_mut().add_child(base_view, adapter.view());
                state.children.push(adapter);
                state.counts.push(1);
            }
            Some(ContentKind::TemplateInvocation(invocation)) => {
                let mut produced = 0;
                match ctx.get_template(&invocation.template_id) {
                    Some(template) => {
                        for binding_context in &invocation.binding_contexts {
                            let adapter = create_template_adapter(
                                factory,
                                ctx,
                                template.clone(),
                                binding_context,
                            )?;
                            views.borrow_mut().add_child(base_view, adapter.view());
                            state.children.push(adapter);
                            produced += 1;
                        }
                    }
                    None => ctx.report_message(
                        Severity::Error,
                        ErrorCode::MissingTemplate,
                        format!("Template '{}' not found", invocation.template_id),
                    ),
                }
                state.counts.push(produced);
            }
            Some(ContentKind::BoundElement(_)) | Some(ContentKind::BoundTemplate(_)) => {
                // Deferred: the bound value is not known until bind time.
                state.counts.push(0);
            }
            None => {
                return Err(BindError::new(
                    ErrorCode::UnhandledContentKind,
                    "Unhandled Content type: not set",
                ));
            }
        }
    }
    Ok(())
}

pub(crate) fn bind_children(
    state: &mut ContainerChildren,
    base_view: ViewKey,
    views: &Views,
    contents: &[Content],
    ctx: &FrameContext,
    factory: &AdapterFactory,
    post_bind: &mut PostBind<'_>,
) -> BindResult<()> {
    assert_eq!(
        state.counts.len(),
        contents.len(),
        "Internal error in adapters per content: {} slots for {} contents",
        state.counts.len(),
        contents.len(),
    );
    let mut index = 0usize;
    for (slot, content) in contents.iter().enumerate() {
        match &content.kind {
            Some(ContentKind::Element(element)) => {
                let count = state.counts[slot];
                for offset in 0..count {
                    state.children[index + offset].bind_model(element, ctx, factory)?;
                    post_bind(state.children[index + offset].as_ref(), slot)?;
                }
                index += count;
            }
            Some(ContentKind::TemplateInvocation(invocation)) => {
                let count = state.counts[slot];
                let template = ctx.get_template(&invocation.template_id);
                for offset in 0..count {
                    let child = &mut state.children[index + offset];
                    if let (Some(template), Some(adapter)) = (
                        template.as_ref(),
                        child.as_any_mut().downcast_mut::<TemplateAdapter>(),
                    ) {
                        bind_template_adapter(
                            factory,
                            ctx,
                            adapter,
                            template.clone(),
                            &invocation.binding_contexts[offset],
                        )?;
                    }
                    post_bind(state.children[index + offset].as_ref(), slot)?;
                }
                index += count;
            }
            Some(ContentKind::BoundElement(binding)) => {
                // Rebinding without an unbind releases the previous value's
                // adapter; identity is never preserved for bound slots.
                release_slot(state, base_view, views, factory, slot, index);
                let Some(value) = ctx.element_binding_value(binding)? else {
                    continue;
                };
                let Some(element) = usable_element(&value, binding.is_optional, "Element")?
                else {
                    continue;
                };
                let mut adapter = factory.create_adapter_for_element(&element, ctx)?;
                adapter.bind_model(&element, ctx, factory)?;
                views.borrow_mut().insert_child(base_view, index, adapter.view());
                post_bind(adapter.as_ref(), slot)?;
                state.children.insert(index, adapter);
                state.counts[slot] = 1;
                index += 1;
            }
            Some(ContentKind::BoundTemplate(binding)) => {
                release_slot(state, base_view, views, factory, slot, index);
                let Some(value) = ctx.template_invocation_binding_value(binding)? else {
                    continue;
                };
                if value.visibility == Some(Visibility::Gone) {
                    continue;
                }
                let invocation = match value.value {
                    Some(BoundValue::TemplateInvocation(invocation)) => invocation,
                    _ if binding.is_optional => continue,
                    _ => {
                        return Err(BindError::new(
                            ErrorCode::MissingBindingValue,
                            format!("Template binding not found for {}", binding.binding_id),
                        ));
                    }
                };
                let Some(template) = ctx.get_template(&invocation.template_id) else {
                    ctx.report_message(
                        Severity::Error,
                        ErrorCode::MissingTemplate,
                        format!("Template '{}' not found", invocation.template_id),
                    );
                    continue;
                };
                let mut produced = 0;
                for binding_context in &invocation.binding_contexts {
                    let adapter = create_and_bind_template_adapter(
                        factory,
                        ctx,
                        template.clone(),
                        binding_context,
                    )?;
                    views
                        .borrow_mut()
                        .insert_child(base_view, index + produced, adapter.view());
                    post_bind(adapter.as_ref(), slot)?;
                    state.children.insert(index + produced, adapter);
                    produced += 1;
                }
                state.counts[slot] = produced;
                index += produced;
            }
            None => {
                return Err(BindError::new(
                    ErrorCode::UnhandledContentKind,
                    "Unhandled Content type: not set",
                ));
            }
        }
    }
    Ok(())
}

/// A bound element value is usable when it actually carries an element and
/// is not suppressed by a bound `Gone` visibility.
fn usable_element(
    value: &BindingValue,
    is_optional: bool,
    kind_name: &str,
) -> BindResult<Option<trellis_core::Element>> {
    if value.visibility == Some(Visibility::Gone) {
        return Ok(None);
    }
    match &value.value {
        Some(BoundValue::Element(element)) => Ok(Some(element.clone())),
        _ if is_optional => Ok(None),
        _ => Err(BindError::new(
            ErrorCode::MissingBindingValue,
            format!("{kind_name} binding not found for {}", value.binding_id),
        )),
    }
}

pub(crate) fn unbind_children(
    state: &mut ContainerChildren,
    base_view: ViewKey,
    views: &Views,
    contents: &[Content],
    factory: &AdapterFactory,
) {
    assert_eq!(
        state.counts.len(),
        contents.len(),
        "Internal error in adapters per content: {} slots for {} contents",
        state.counts.len(),
        contents.len(),
    );
    let mut index = 0usize;
    for (slot, content) in contents.iter().enumerate() {
        let count = state.counts[slot];
        match &content.kind {
            Some(ContentKind::Element(_)) | Some(ContentKind::TemplateInvocation(_)) => {
                // Static content: identity preserved for the next bind.
                for offset in 0..count {
                    state.children[index + offset].unbind_model(factory);
                }
                index += count;
            }
            Some(ContentKind::BoundElement(_)) | Some(ContentKind::BoundTemplate(_)) => {
                release_slot(state, base_view, views, factory, slot, index);
            }
            // Creation already rejected unhandled variants and the model is
            // immutable for the pass.
            None => unreachable!("container created with unhandled content"),
        }
    }
}

pub(crate) fn release_children(
    state: &mut ContainerChildren,
    base_view: ViewKey,
    views: &Views,
    factory: &AdapterFactory,
) {
    views.borrow_mut().remove_all_children(base_view);
    for adapter in state.children.drain(..) {
        factory.release_adapter(adapter);
    }
    state.counts.clear();
}

fn release_slot(
    state: &mut ContainerChildren,
    base_view: ViewKey,
    views: &Views,
    factory: &AdapterFactory,
    slot: usize,
    index: usize,
) {
    let count = state.counts[slot];
    for _ in 0..count {
        let adapter = state.children.remove(index);
        views.borrow_mut().remove_child_at(base_view, index);
        factory.release_adapter(adapter);
    }
    state.counts[slot] = 0;
}
