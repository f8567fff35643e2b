//! Dispatch from element variants to type-specific adapters, each type
//! backed by its own recycler pool, plus the shared template pool and the
//! release routing between them.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::{
    AssetProvider, BindError, BindResult, CustomElementProvider, Element, ElementKind, ErrorCode,
    TextKind,
};

use crate::adapter::{ElementAdapter, Views};
use crate::adapters::chunked::ChunkedTextAdapter;
use crate::adapters::custom::CustomElementAdapter;
use crate::adapters::grid::GridRowAdapter;
use crate::adapters::image::ImageElementAdapter;
use crate::adapters::list::ElementListAdapter;
use crate::adapters::stack::ElementStackAdapter;
use crate::adapters::template::TemplateAdapter;
use crate::adapters::text::ParameterizedTextAdapter;
use crate::frame::FrameContext;
use crate::pool::{AdapterKind, KeyedRecyclerPool, RecyclerKey};

#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Distinct recycler keys retained per pool before LRU eviction.
    pub max_pool_keys: usize,
    /// Instances retained per key; overflow drops the incoming instance.
    pub pool_capacity_per_key: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { max_pool_keys: 10, pool_capacity_per_key: 10 }
    }
}

pub struct AdapterFactory {
    views: Views,
    assets: Rc<dyn AssetProvider>,
    custom_provider: Rc<dyn CustomElementProvider>,
    custom_pool: RefCell<KeyedRecyclerPool<CustomElementAdapter>>,
    image_pool: RefCell<KeyedRecyclerPool<ImageElementAdapter>>,
    chunked_text_pool: RefCell<KeyedRecyclerPool<ChunkedTextAdapter>>,
    text_pool: RefCell<KeyedRecyclerPool<ParameterizedTextAdapter>>,
    list_pool: RefCell<KeyedRecyclerPool<ElementListAdapter>>,
    grid_pool: RefCell<KeyedRecyclerPool<GridRowAdapter>>,
    stack_pool: RefCell<KeyedRecyclerPool<ElementStackAdapter>>,
    template_pool: RefCell<KeyedRecyclerPool<TemplateAdapter>>,
}

impl AdapterFactory {
    pub fn new(
        views: Views,
        assets: Rc<dyn AssetProvider>,
        custom_provider: Rc<dyn CustomElementProvider>,
        config: &EngineConfig,
    ) -> Self {
        fn pool<A>(config: &EngineConfig) -> RefCell<KeyedRecyclerPool<A>> {
            RefCell::new(KeyedRecyclerPool::new(
                config.max_pool_keys,
                config.pool_capacity_per_key,
            ))
        }
        AdapterFactory {
            views,
            assets,
            custom_provider,
            custom_pool: pool(config),
            image_pool: pool(config),
            chunked_text_pool: pool(config),
            text_pool: pool(config),
            list_pool: pool(config),
            grid_pool: pool(config),
            stack_pool: pool(config),
            template_pool: pool(config),
        }
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    pub fn assets(&self) -> &Rc<dyn AssetProvider> {
        &self.assets
    }

    pub fn custom_provider(&self) -> &Rc<dyn CustomElementProvider> {
        &self.custom_provider
    }

    /// Creates (or recycles) and immediately creates-the-adapter-for the
    /// given element. Unset or unhandled variants are fatal.
    pub fn create_adapter_for_element(
        &self,
        element: &Element,
        ctx: &FrameContext,
    ) -> BindResult<Box<dyn ElementAdapter>> {
        match &element.kind {
            Some(ElementKind::Custom(_)) => self.obtain(
                &self.custom_pool,
                RecyclerKey::Singleton(AdapterKind::Custom),
                CustomElementAdapter::new,
                element,
                ctx,
            ),
            Some(ElementKind::Text(text)) => match &text.content {
                Some(TextKind::ChunkedText(_)) | Some(TextKind::ChunkedTextBinding(_)) => {
                    let key = self.text_key(AdapterKind::ChunkedText, element, ctx)?;
                    self.obtain(&self.chunked_text_pool, key, ChunkedTextAdapter::new, element, ctx)
                }
                Some(TextKind::ParameterizedText(_))
                | Some(TextKind::ParameterizedTextBinding(_)) => {
                    let key = self.text_key(AdapterKind::ParameterizedText, element, ctx)?;
                    self.obtain(&self.text_pool, key, ParameterizedTextAdapter::new, element, ctx)
                }
                None => Err(BindError::new(
                    ErrorCode::UnhandledTextVariant,
                    "Unhandled TextElement type: not set",
                )),
            },
            Some(ElementKind::Image(_)) => self.obtain(
                &self.image_pool,
                RecyclerKey::Singleton(AdapterKind::Image),
                ImageElementAdapter::new,
                element,
                ctx,
            ),
            Some(ElementKind::GridRow(_)) => self.obtain(
                &self.grid_pool,
                RecyclerKey::Singleton(AdapterKind::GridRow),
                GridRowAdapter::new,
                element,
                ctx,
            ),
            Some(ElementKind::List(_)) => self.obtain(
                &self.list_pool,
                RecyclerKey::Singleton(AdapterKind::List),
                ElementListAdapter::new,
                element,
                ctx,
            ),
            Some(ElementKind::Stack(_)) => self.obtain(
                &self.stack_pool,
                RecyclerKey::Singleton(AdapterKind::Stack),
                ElementStackAdapter::new,
                element,
                ctx,
            ),
            None => Err(BindError::new(
                ErrorCode::MissingOrUnhandledElement,
                "Unhandled Element type: not set",
            )),
        }
    }

    /// Unbinds, fully releases, then routes the adapter back to a pool:
    /// template-keyed adapters to the shared template pool, everything
    /// else to its type pool.
    pub fn release_adapter(&self, mut adapter: Box<dyn ElementAdapter>) {
        adapter.release_adapter(self);
        let Some(key) = adapter.base().key.clone() else {
            return;
        };
        if key.is_template() {
            if let Ok(template) = adapter.into_any().downcast::<TemplateAdapter>() {
                self.template_pool.borrow_mut().put(key, *template);
            }
            return;
        }
        match adapter.kind() {
            AdapterKind::Custom => Self::pool_back(&self.custom_pool, key, adapter),
            AdapterKind::Image => Self::pool_back(&self.image_pool, key, adapter),
            AdapterKind::ChunkedText => Self::pool_back(&self.chunked_text_pool, key, adapter),
            AdapterKind::ParameterizedText => Self::pool_back(&self.text_pool, key, adapter),
            AdapterKind::List => Self::pool_back(&self.list_pool, key, adapter),
            AdapterKind::GridRow => Self::pool_back(&self.grid_pool, key, adapter),
            AdapterKind::Stack => Self::pool_back(&self.stack_pool, key, adapter),
            // Template adapters always carry template keys.
            AdapterKind::Template => {}
        }
    }

    /// Clears every type pool and the template pool. Used on memory
    /// pressure or engine teardown.
    pub fn purge_recycler_pools(&self) {
        log::debug!("purging recycler pools");
        self.custom_pool.borrow_mut().clear();
        self.image_pool.borrow_mut().clear();
        self.chunked_text_pool.borrow_mut().clear();
        self.text_pool.borrow_mut().clear();
        self.list_pool.borrow_mut().clear();
        self.grid_pool.borrow_mut().clear();
        self.stack_pool.borrow_mut().clear();
        self.template_pool.borrow_mut().clear();
    }

    pub(crate) fn take_pooled_template(&self, key: &RecyclerKey) -> Option<TemplateAdapter> {
        self.template_pool.borrow_mut().get(key)
    }

    fn obtain<A: ElementAdapter + 'static>(
        &self,
        pool: &RefCell<KeyedRecyclerPool<A>>,
        key: RecyclerKey,
        make: impl FnOnce(Views) -> A,
        element: &Element,
        ctx: &FrameContext,
    ) -> BindResult<Box<dyn ElementAdapter>> {
        let pooled = pool.borrow_mut().get(&key);
        let mut adapter = pooled.unwrap_or_else(|| make(self.views.clone()));
        adapter.base_mut().key = Some(key);
        let mut boxed: Box<dyn ElementAdapter> = Box::new(adapter);
        boxed.create_adapter(element, ctx, self)?;
        Ok(boxed)
    }

    fn pool_back<A: 'static>(
        pool: &RefCell<KeyedRecyclerPool<A>>,
        key: RecyclerKey,
        adapter: Box<dyn ElementAdapter>,
    ) {
        if let Ok(concrete) = adapter.into_any().downcast::<A>() {
            pool.borrow_mut().put(key, *concrete);
        }
    }

    fn text_key(
        &self,
        kind: AdapterKind,
        element: &Element,
        ctx: &FrameContext,
    ) -> BindResult<RecyclerKey> {
        let resolved = ctx.make_style_for(&element.style_references)?;
        Ok(RecyclerKey::text(kind, resolved.font_size_dp(), resolved.italic()))
    }

    /// Number of idle template adapters pooled for a template id.
    pub fn pooled_template_count(&self, template_id: &str) -> usize {
        self.template_pool
            .borrow()
            .pooled_for(&RecyclerKey::template(template_id))
    }
}
