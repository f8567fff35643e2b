//! Template instantiation and binding through the shared template pool.
//!
//! Template adapters pool by template id alone, so a template invoked in
//! many places is freely interchangeable across binding contexts; pooled
//! instances keep their instantiated subtree and skip re-inflation.

use std::any::Any;
use std::rc::Rc;

use trellis_core::{
    BindResult, BindingContext, Element, Orientation, Template, ViewBody,
};

use crate::adapter::{AdapterBase, ElementAdapter, Views};
use crate::factory::AdapterFactory;
use crate::frame::FrameContext;
use crate::pool::{AdapterKind, RecyclerKey};

#[derive(Clone)]
pub struct TemplateAdapterModel {
    pub template: Rc<Template>,
    pub binding_context: BindingContext,
}

pub struct TemplateAdapter {
    base: AdapterBase,
    child: Option<Box<dyn ElementAdapter>>,
    /// The template the subtree was inflated from. Survives unbind, so a
    /// pool hit can verify it is being reused for the same structure.
    template: Option<Rc<Template>>,
    model: Option<TemplateAdapterModel>,
}

impl TemplateAdapter {
    pub(crate) fn new(views: Views) -> Self {
        TemplateAdapter {
            base: AdapterBase::new(views, ViewBody::Group { orientation: Orientation::Column }),
            child: None,
            template: None,
            model: None,
        }
    }

    pub fn model(&self) -> Option<&TemplateAdapterModel> {
        self.model.as_ref()
    }

    pub fn template_id(&self) -> Option<&str> {
        self.template.as_ref().map(|t| t.template_id.as_str())
    }
}

impl ElementAdapter for TemplateAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AdapterBase {
        &mut self.base
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Template
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    // Instantiation and binding go through the binder functions below; the
    // hooks only cover the teardown half of the lifecycle.
    fn on_create_adapter(
        &mut self,
        _element: &Element,
        _ctx: &FrameContext,
        _factory: &AdapterFactory,
    ) -> BindResult<()> {
        Ok(())
    }

    fn on_bind_model(
        &mut self,
        _element: &Element,
        _ctx: &FrameContext,
        _factory: &AdapterFactory,
    ) -> BindResult<()> {
        Ok(())
    }

    fn on_unbind_model(&mut self, factory: &AdapterFactory) {
        if let Some(child) = self.child.as_mut() {
            child.unbind_model(factory);
        }
        self.model = None;
    }

    fn on_release_adapter(&mut self, _factory: &AdapterFactory) {
        // The instantiated subtree is deliberately kept: pooled template
        // adapters skip re-inflation on their next use.
    }
}

/// Fetches a pooled adapter for the template, or creates one and
/// instantiates the template's element subtree as its content.
pub fn create_template_adapter(
    factory: &AdapterFactory,
    ctx: &FrameContext,
    template: Rc<Template>,
    binding_context: &BindingContext,
) -> BindResult<Box<TemplateAdapter>> {
    let key = RecyclerKey::template(template.template_id.clone());
    // A pooled instantiation is only reusable if it was inflated from the
    // same template structure; an id collision across frames falls back to
    // a fresh inflate.
    let mut adapter = factory
        .take_pooled_template(&key)
        .filter(|pooled| {
            pooled.template.as_ref().is_some_and(|inflated| **inflated == *template)
        })
        .unwrap_or_else(|| TemplateAdapter::new(factory.views().clone()));
    adapter.base.key = Some(key);
    if adapter.child.is_none() {
        let template_ctx = ctx.create_template_context(&template, binding_context)?;
        let child = factory.create_adapter_for_element(&template.element, &template_ctx)?;
        let views = adapter.base.views.clone();
        views.borrow_mut().add_child(adapter.base.view, child.view());
        adapter.child = Some(child);
    }
    adapter.base.created = true;
    adapter.template = Some(template.clone());
    adapter.model = Some(TemplateAdapterModel {
        template,
        binding_context: binding_context.clone(),
    });
    Ok(Box::new(adapter))
}

/// Binds a (possibly recycled) template adapter against a new binding
/// context by rebinding its already-instantiated subtree.
pub fn bind_template_adapter(
    factory: &AdapterFactory,
    ctx: &FrameContext,
    adapter: &mut TemplateAdapter,
    template: Rc<Template>,
    binding_context: &BindingContext,
) -> BindResult<()> {
    let template_ctx = ctx.create_template_context(&template, binding_context)?;
    if let Some(child) = adapter.child.as_mut() {
        child.bind_model(&template.element, &template_ctx, factory)?;
    }
    adapter.base.bound = true;
    adapter.model = Some(TemplateAdapterModel {
        template,
        binding_context: binding_context.clone(),
    });
    Ok(())
}

pub fn create_and_bind_template_adapter(
    factory: &AdapterFactory,
    ctx: &FrameContext,
    template: Rc<Template>,
    binding_context: &BindingContext,
) -> BindResult<Box<TemplateAdapter>> {
    let mut adapter = create_template_adapter(factory, ctx, template.clone(), binding_context)?;
    bind_template_adapter(factory, ctx, &mut adapter, template, binding_context)?;
    Ok(adapter)
}
