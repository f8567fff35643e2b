//! Per-render-pass context: resolves binding ids to values, style
//! references to resolved styles, and template ids to templates, recording
//! diagnostics along the way.
//!
//! A context is immutable once created. Entering a template produces a
//! derived context with a fresh stylesheet scope and binding table; the
//! outer frame's styles never leak into template content.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use trellis_core::{
    ActionHandler, Actions, AssetProvider, BindError, BindResult, BindingContext, BindingRef,
    BindingValue, BoundValue, ChunkedText, CustomElementData, DebugLogger, ErrorCode, Frame,
    GridCellWidth, Image, ParameterizedText, Severity, SharedState, Style, StyleRefs, Stylesheet,
    Stylesheets, Template, Visibility,
};

use crate::media::MediaQueryHelper;
use crate::styles::ResolvedStyle;

#[derive(Clone)]
pub struct FrameContext {
    frame: Rc<Frame>,
    stylesheet: Rc<HashMap<String, Style>>,
    binding_values: Option<Rc<HashMap<String, BindingValue>>>,
    templates: Rc<HashMap<String, Rc<Template>>>,
    shared_sheets: Rc<HashMap<String, Stylesheet>>,
    media: Rc<MediaQueryHelper>,
    debug: Rc<RefCell<DebugLogger>>,
    action_handler: Rc<dyn ActionHandler>,
    assets: Rc<dyn AssetProvider>,
    default_style: Rc<ResolvedStyle>,
}

impl std::fmt::Debug for FrameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameContext").finish_non_exhaustive()
    }
}

impl FrameContext {
    pub fn create(
        frame: Frame,
        shared_states: &[SharedState],
        frame_width_px: i32,
        assets: Rc<dyn AssetProvider>,
        action_handler: Rc<dyn ActionHandler>,
        debug: Rc<RefCell<DebugLogger>>,
    ) -> BindResult<FrameContext> {
        let media = MediaQueryHelper::new(frame_width_px, assets.as_ref());

        let mut templates: HashMap<String, Rc<Template>> = HashMap::new();
        for template in frame
            .templates
            .iter()
            .chain(shared_states.iter().flat_map(|s| s.templates.iter()))
        {
            if templates
                .insert(template.template_id.clone(), Rc::new(template.clone()))
                .is_some()
            {
                return Err(BindError::new(
                    ErrorCode::DuplicateTemplate,
                    format!("Template key '{}' already defined", template.template_id),
                ));
            }
        }

        let mut shared_sheets: HashMap<String, Stylesheet> = HashMap::new();
        for sheet in shared_states.iter().flat_map(|s| s.stylesheets.iter()) {
            if shared_sheets.contains_key(&sheet.stylesheet_id) {
                debug.borrow_mut().report(
                    Severity::Warning,
                    ErrorCode::DuplicateStylesheet,
                    format!("Stylesheet key '{}' already defined", sheet.stylesheet_id),
                );
                continue;
            }
            shared_sheets.insert(sheet.stylesheet_id.clone(), sheet.clone());
        }

        let stylesheet =
            build_style_scope(&frame.stylesheets, &shared_sheets, &media, &debug)?;

        let default_style = Rc::new(ResolvedStyle::default_for(assets.as_ref()));
        Ok(FrameContext {
            frame: Rc::new(frame),
            stylesheet: Rc::new(stylesheet),
            binding_values: None,
            templates: Rc::new(templates),
            shared_sheets: Rc::new(shared_sheets),
            media: Rc::new(media),
            debug,
            action_handler,
            assets,
            default_style,
        })
    }

    /// Derives the context a template instantiation binds in: the
    /// template's own stylesheet scope and a fresh binding table.
    pub fn create_template_context(
        &self,
        template: &Template,
        binding_context: &BindingContext,
    ) -> BindResult<FrameContext> {
        let stylesheet = build_style_scope(
            &template.stylesheets,
            &self.shared_sheets,
            &self.media,
            &self.debug,
        )?;

        let mut values: HashMap<String, BindingValue> = HashMap::new();
        for value in &binding_context.binding_values {
            let resolved = match &value.transclude_from {
                Some(parent_id) => {
                    // Pull the parent context's value in under the child id.
                    // A missing parent value leaves an empty entry so a later
                    // required access fails and an optional one hides.
                    let parent = self
                        .binding_values
                        .as_ref()
                        .and_then(|t| t.get(parent_id));
                    match parent {
                        Some(parent_value) => BindingValue {
                            binding_id: value.binding_id.clone(),
                            visibility: parent_value.visibility,
                            transclude_from: None,
                            value: parent_value.value.clone(),
                        },
                        None => BindingValue::empty(value.binding_id.clone()),
                    }
                }
                None => value.clone(),
            };
            if values.insert(value.binding_id.clone(), resolved).is_some() {
                return Err(BindError::new(
                    ErrorCode::DuplicateBindingValue,
                    format!("BindingValue key '{}' already defined", value.binding_id),
                ));
            }
        }

        Ok(FrameContext {
            frame: self.frame.clone(),
            stylesheet: Rc::new(stylesheet),
            binding_values: Some(Rc::new(values)),
            templates: self.templates.clone(),
            shared_sheets: self.shared_sheets.clone(),
            media: self.media.clone(),
            debug: self.debug.clone(),
            action_handler: self.action_handler.clone(),
            assets: self.assets.clone(),
            default_style: self.default_style.clone(),
        })
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frame_tag(&self) -> &str {
        &self.frame.tag
    }

    pub fn get_template(&self, template_id: &str) -> Option<Rc<Template>> {
        self.templates.get(template_id).cloned()
    }

    pub fn assets(&self) -> &Rc<dyn AssetProvider> {
        &self.assets
    }

    pub fn action_handler(&self) -> &Rc<dyn ActionHandler> {
        &self.action_handler
    }

    pub fn media(&self) -> &MediaQueryHelper {
        &self.media
    }

    pub fn debug_logger(&self) -> &Rc<RefCell<DebugLogger>> {
        &self.debug
    }

    pub fn report_message(
        &self,
        severity: Severity,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        self.debug.borrow_mut().report(severity, code, message);
    }

    pub fn default_style(&self) -> Rc<ResolvedStyle> {
        self.default_style.clone()
    }

    pub fn filter_image_sources(&self, image: &Image) -> Image {
        self.media.filter_image_sources(image)
    }

    /// Cascades a style-id stack against the current stylesheet scope.
    /// Unresolvable ids warn and are skipped; a stack resolving nothing
    /// yields the shared default style instance.
    pub fn make_style_for(&self, refs: &StyleRefs) -> BindResult<Rc<ResolvedStyle>> {
        if refs.is_empty() {
            return Ok(self.default_style.clone());
        }
        let mut acc = Style::default();
        let mut found_any = false;
        for id in &refs.style_ids {
            match self.stylesheet.get(id) {
                Some(style) => {
                    acc.merge_from(style);
                    found_any = true;
                }
                None => self.report_message(
                    Severity::Warning,
                    ErrorCode::MissingStyle,
                    format!("Style '{id}' not found in current stylesheet"),
                ),
            }
        }
        if let Some(binding) = &refs.style_binding {
            if let Some(bound) = self.style_from_binding(binding)? {
                acc.merge_from(&bound);
                found_any = true;
            }
        }
        if !found_any {
            return Ok(self.default_style.clone());
        }
        Ok(Rc::new(ResolvedStyle::resolve(acc, self.assets.as_ref())))
    }

    fn binding_table(&self) -> BindResult<&HashMap<String, BindingValue>> {
        self.binding_values.as_deref().ok_or_else(|| {
            BindError::new(
                ErrorCode::MissingBindingValue,
                "no binding values defined in this context",
            )
        })
    }

    fn typed_binding_value<T: Clone>(
        &self,
        binding: &BindingRef,
        kind_name: &str,
        extract: impl Fn(&BoundValue) -> Option<&T>,
    ) -> BindResult<Option<T>> {
        let table = self.binding_table()?;
        let found = table
            .get(&binding.binding_id)
            .and_then(|bv| bv.value.as_ref())
            .and_then(|v| extract(v));
        match found {
            Some(v) => Ok(Some(v.clone())),
            None if binding.is_optional => Ok(None),
            None => Err(BindError::new(
                ErrorCode::MissingBindingValue,
                format!("{kind_name} binding not found for {}", binding.binding_id),
            )),
        }
    }

    pub fn parameterized_text_binding_value(
        &self,
        binding: &BindingRef,
    ) -> BindResult<Option<ParameterizedText>> {
        self.typed_binding_value(binding, "Parameterized text", |v| match v {
            BoundValue::ParameterizedText(t) => Some(t),
            _ => None,
        })
    }

    pub fn chunked_text_binding_value(
        &self,
        binding: &BindingRef,
    ) -> BindResult<Option<ChunkedText>> {
        self.typed_binding_value(binding, "Chunked text", |v| match v {
            BoundValue::ChunkedText(t) => Some(t),
            _ => None,
        })
    }

    pub fn image_binding_value(&self, binding: &BindingRef) -> BindResult<Option<Image>> {
        self.typed_binding_value(binding, "Image", |v| match v {
            BoundValue::Image(i) => Some(i),
            _ => None,
        })
    }

    pub fn custom_element_binding_value(
        &self,
        binding: &BindingRef,
    ) -> BindResult<Option<CustomElementData>> {
        self.typed_binding_value(binding, "Custom element", |v| match v {
            BoundValue::CustomElementData(d) => Some(d),
            _ => None,
        })
    }

    /// Returns the whole binding value so callers can honor a bound
    /// visibility that suppresses otherwise-missing content.
    pub fn element_binding_value(
        &self,
        binding: &BindingRef,
    ) -> BindResult<Option<BindingValue>> {
        self.whole_binding_value(binding, "Element", |v| {
            matches!(v, BoundValue::Element(_))
        })
    }

    pub fn template_invocation_binding_value(
        &self,
        binding: &BindingRef,
    ) -> BindResult<Option<BindingValue>> {
        self.whole_binding_value(binding, "Template", |v| {
            matches!(v, BoundValue::TemplateInvocation(_))
        })
    }

    fn whole_binding_value(
        &self,
        binding: &BindingRef,
        kind_name: &str,
        matches_kind: impl Fn(&BoundValue) -> bool,
    ) -> BindResult<Option<BindingValue>> {
        let table = self.binding_table()?;
        let entry = table.get(&binding.binding_id);
        let usable = entry.is_some_and(|bv| {
            bv.visibility.is_some() || bv.value.as_ref().is_some_and(&matches_kind)
        });
        if usable {
            return Ok(entry.cloned());
        }
        if binding.is_optional {
            return Ok(None);
        }
        Err(BindError::new(
            ErrorCode::MissingBindingValue,
            format!("{kind_name} binding not found for {}", binding.binding_id),
        ))
    }

    pub fn visibility_from_binding(
        &self,
        binding: &BindingRef,
    ) -> BindResult<Option<Visibility>> {
        let table = self.binding_table()?;
        Ok(table.get(&binding.binding_id).and_then(|bv| bv.visibility))
    }

    pub fn cell_width_from_binding(
        &self,
        binding: &BindingRef,
    ) -> BindResult<Option<GridCellWidth>> {
        let table = self.binding_table()?;
        Ok(table
            .get(&binding.binding_id)
            .and_then(|bv| bv.value.as_ref())
            .and_then(|v| match v {
                BoundValue::CellWidth(w) => Some(w.clone()),
                _ => None,
            }))
    }

    /// Best-effort: a missing actions binding is just "no actions".
    pub fn actions_from_binding(&self, binding: &BindingRef) -> BindResult<Actions> {
        let table = self.binding_table()?;
        Ok(table
            .get(&binding.binding_id)
            .and_then(|bv| bv.value.as_ref())
            .and_then(|v| match v {
                BoundValue::Actions(a) => Some(a.clone()),
                _ => None,
            })
            .unwrap_or_default())
    }

    pub fn style_from_binding(&self, binding: &BindingRef) -> BindResult<Option<Style>> {
        let table = self.binding_table()?;
        Ok(table
            .get(&binding.binding_id)
            .and_then(|bv| bv.value.as_ref())
            .and_then(|v| match v {
                BoundValue::Style(s) => Some(s.clone()),
                _ => None,
            }))
    }
}

/// Installs stylesheets into a fresh scope: referenced sheets first, then
/// inline ones, skipping sheets whose media conditions do not hold.
/// Duplicate style ids within one scope are a fatal content error.
fn build_style_scope(
    sheets: &Stylesheets,
    shared: &HashMap<String, Stylesheet>,
    media: &MediaQueryHelper,
    debug: &Rc<RefCell<DebugLogger>>,
) -> BindResult<HashMap<String, Style>> {
    let mut scope: HashMap<String, Style> = HashMap::new();
    let referenced = sheets.stylesheet_ids.iter().filter_map(|id| {
        let sheet = shared.get(id);
        if sheet.is_none() {
            debug.borrow_mut().report(
                Severity::Warning,
                ErrorCode::MissingStylesheet,
                format!("Stylesheet '{id}' not found"),
            );
        }
        sheet
    });
    for sheet in referenced.chain(sheets.stylesheets.iter()) {
        if !media.all_hold(&sheet.conditions) {
            continue;
        }
        for style in &sheet.styles {
            if scope.insert(style.style_id.clone(), style.clone()).is_some() {
                return Err(BindError::new(
                    ErrorCode::DuplicateStyle,
                    format!("Style key '{}' already defined", style.style_id),
                ));
            }
        }
    }
    Ok(scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use trellis_core::{
        Action, Color, ComparisonCondition, Element, MediaQueryCondition, SizeSpec,
    };

    use crate::testutil::{FakeAssets, RecordingHandler, frame_context};

    fn sample_style(id: &str, color: Color) -> Style {
        let mut style = Style::named(id);
        style.color = Some(color);
        style
    }

    fn frame_with_inline_styles(styles: Vec<Style>) -> Frame {
        Frame {
            tag: "frame".into(),
            stylesheets: Stylesheets {
                stylesheet_ids: vec![],
                stylesheets: vec![Stylesheet::named("inline", styles)],
            },
            style_references: StyleRefs::default(),
            templates: vec![],
        }
    }

    fn plain_context(frame: Frame, shared: &[SharedState]) -> FrameContext {
        frame_context(
            frame,
            shared,
            Rc::new(FakeAssets::default()),
            Rc::new(RecordingHandler::default()),
        )
    }

    fn context_with_bindings(values: Vec<BindingValue>) -> FrameContext {
        let ctx = plain_context(Frame::default(), &[]);
        ctx.create_template_context(
            &Template::new("holder", Element::default()),
            &BindingContext::with_values(values),
        )
        .expect("template context")
    }

    #[test]
    fn duplicate_template_ids_are_fatal() {
        let frame = Frame {
            templates: vec![Template::new("card", Element::default())],
            ..Default::default()
        };
        let shared = vec![SharedState {
            templates: vec![Template::new("card", Element::default())],
            stylesheets: vec![],
        }];
        let err = FrameContext::create(
            frame,
            &shared,
            1000,
            Rc::new(FakeAssets::default()),
            Rc::new(RecordingHandler::default()),
            Rc::new(RefCell::new(DebugLogger::default())),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateTemplate);
        assert!(err.message.contains("Template key 'card' already defined"));
    }

    #[test]
    fn duplicate_binding_value_ids_are_fatal() {
        let ctx = plain_context(Frame::default(), &[]);
        let err = ctx
            .create_template_context(
                &Template::new("t", Element::default()),
                &BindingContext::with_values(vec![
                    BindingValue::empty("dup"),
                    BindingValue::empty("dup"),
                ]),
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateBindingValue);
        assert!(err.message.contains("BindingValue key 'dup' already defined"));
    }

    #[test]
    fn accessing_bindings_without_context_is_fatal() {
        let ctx = plain_context(Frame::default(), &[]);
        let err = ctx.actions_from_binding(&BindingRef::new("anything")).unwrap_err();
        assert!(err.message.contains("no binding values defined"));
    }

    #[test]
    fn required_binding_lookup() {
        let text = ParameterizedText::literal("tabby");
        let ctx = context_with_bindings(vec![BindingValue::new(
            "text",
            BoundValue::ParameterizedText(text.clone()),
        )]);

        assert_eq!(
            ctx.parameterized_text_binding_value(&BindingRef::new("text")).unwrap(),
            Some(text)
        );

        let err = ctx
            .parameterized_text_binding_value(&BindingRef::new("unknown"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingBindingValue);
        assert!(err.message.contains("Parameterized text binding not found for unknown"));

        // An entry with no payload is as missing as no entry at all.
        let empty = context_with_bindings(vec![BindingValue::empty("text")]);
        assert!(empty.parameterized_text_binding_value(&BindingRef::new("text")).is_err());
    }

    #[test]
    fn optional_binding_absence_is_silent() {
        let ctx = context_with_bindings(vec![BindingValue::empty("text")]);
        assert_eq!(
            ctx.parameterized_text_binding_value(&BindingRef::optional("text")).unwrap(),
            None
        );
        assert_eq!(
            ctx.parameterized_text_binding_value(&BindingRef::optional("unknown")).unwrap(),
            None
        );
    }

    #[test]
    fn element_binding_with_visibility_only_is_usable() {
        let ctx = context_with_bindings(vec![BindingValue {
            binding_id: "cell".into(),
            visibility: Some(Visibility::Gone),
            transclude_from: None,
            value: None,
        }]);
        let value = ctx.element_binding_value(&BindingRef::new("cell")).unwrap().unwrap();
        assert_eq!(value.visibility, Some(Visibility::Gone));
        assert!(value.value.is_none());
    }

    #[test]
    fn transcluding_binding_resolves_from_parent() {
        let parent_text = ParameterizedText::literal("parent_text");
        let parent = context_with_bindings(vec![BindingValue::new(
            "PARENT",
            BoundValue::ParameterizedText(parent_text.clone()),
        )]);
        let child = parent
            .create_template_context(
                &Template::new("inner", Element::default()),
                &BindingContext::with_values(vec![BindingValue::transcluding(
                    "CHILD", "PARENT",
                )]),
            )
            .unwrap();
        assert_eq!(
            child.parameterized_text_binding_value(&BindingRef::new("CHILD")).unwrap(),
            Some(parent_text)
        );
    }

    #[test]
    fn transcluding_binding_missing_parent() {
        let parent = context_with_bindings(vec![]);
        let child = parent
            .create_template_context(
                &Template::new("inner", Element::default()),
                &BindingContext::with_values(vec![BindingValue::transcluding(
                    "CHILD", "NOT_FOUND",
                )]),
            )
            .unwrap();
        assert!(
            child.parameterized_text_binding_value(&BindingRef::new("CHILD")).is_err()
        );
        assert_eq!(
            child
                .parameterized_text_binding_value(&BindingRef::optional("CHILD"))
                .unwrap(),
            None
        );
    }

    #[test]
    fn make_style_for_empty_refs_returns_shared_default() {
        let ctx = plain_context(Frame::default(), &[]);
        let resolved = ctx.make_style_for(&StyleRefs::default()).unwrap();
        assert!(Rc::ptr_eq(&resolved, &ctx.default_style()));
    }

    #[test]
    fn make_style_for_unknown_id_falls_back_to_default() {
        let ctx = plain_context(Frame::default(), &[]);
        let resolved = ctx.make_style_for(&StyleRefs::of(&["nope"])).unwrap();
        assert!(Rc::ptr_eq(&resolved, &ctx.default_style()));
        let logger = ctx.debug_logger().borrow();
        assert_eq!(logger.messages(Severity::Warning).len(), 1);
    }

    #[test]
    fn make_style_for_cascades_in_order() {
        let mut first = sample_style("first", Color::from_rgb(1, 1, 1));
        first.max_lines = Some(5);
        let mut second = Style::named("second");
        second.max_lines = Some(2);
        let ctx = plain_context(frame_with_inline_styles(vec![first, second]), &[]);

        let resolved = ctx.make_style_for(&StyleRefs::of(&["first", "second"])).unwrap();
        assert_eq!(resolved.raw().color, Some(Color::from_rgb(1, 1, 1)));
        assert_eq!(resolved.max_lines(), Some(2));
    }

    #[test]
    fn template_context_does_not_inherit_frame_styles() {
        let ctx = plain_context(
            frame_with_inline_styles(vec![sample_style("frame_style", Color::WHITE)]),
            &[],
        );
        assert!(!Rc::ptr_eq(
            &ctx.make_style_for(&StyleRefs::of(&["frame_style"])).unwrap(),
            &ctx.default_style()
        ));

        let template_ctx = ctx
            .create_template_context(
                &Template::new("t", Element::default()),
                &BindingContext::default(),
            )
            .unwrap();
        let resolved = template_ctx.make_style_for(&StyleRefs::of(&["frame_style"])).unwrap();
        assert!(Rc::ptr_eq(&resolved, &template_ctx.default_style()));
    }

    #[test]
    fn template_stylesheet_resolves_through_shared_state() {
        let mut width_style = Style::named("cotton");
        width_style.width = Some(SizeSpec::Dp(343.0));
        let shared = vec![SharedState {
            templates: vec![],
            stylesheets: vec![Stylesheet::named("linen", vec![width_style])],
        }];
        let ctx = plain_context(Frame::default(), &shared);
        let template = Template {
            template_id: "kingSize".into(),
            element: Element::default(),
            stylesheets: Stylesheets {
                stylesheet_ids: vec!["linen".into()],
                stylesheets: vec![],
            },
        };
        let template_ctx = ctx
            .create_template_context(&template, &BindingContext::default())
            .unwrap();
        let resolved = template_ctx.make_style_for(&StyleRefs::of(&["cotton"])).unwrap();
        assert_eq!(resolved.width_spec(), trellis_core::LayoutSize::Px(343));
    }

    #[test]
    fn media_gated_stylesheet_is_skipped() {
        let mut sheet = Stylesheet::named("narrow", vec![sample_style("s", Color::WHITE)]);
        sheet.conditions = vec![MediaQueryCondition::FrameWidth {
            width_px: 100,
            condition: ComparisonCondition::LessThan,
        }];
        let frame = Frame {
            stylesheets: Stylesheets { stylesheet_ids: vec![], stylesheets: vec![sheet] },
            ..Default::default()
        };
        // Frame width in tests is 1000, so the sheet must not install.
        let ctx = plain_context(frame, &[]);
        let resolved = ctx.make_style_for(&StyleRefs::of(&["s"])).unwrap();
        assert!(Rc::ptr_eq(&resolved, &ctx.default_style()));
    }

    #[test]
    fn duplicate_style_ids_in_scope_are_fatal() {
        let frame = frame_with_inline_styles(vec![
            sample_style("dup", Color::WHITE),
            sample_style("dup", Color::BLACK),
        ]);
        let err = FrameContext::create(
            frame,
            &[],
            1000,
            Rc::new(FakeAssets::default()),
            Rc::new(RecordingHandler::default()),
            Rc::new(RefCell::new(DebugLogger::default())),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateStyle);
        assert!(err.message.contains("Style key 'dup' already defined"));
    }

    #[test]
    fn best_effort_getters_never_fail_on_missing_ids() {
        let ctx = context_with_bindings(vec![BindingValue::new(
            "acts",
            BoundValue::Actions(Actions {
                on_click: Some(Action::named("go")),
                ..Default::default()
            }),
        )]);
        assert_eq!(
            ctx.actions_from_binding(&BindingRef::new("acts")).unwrap().on_click,
            Some(Action::named("go"))
        );
        assert!(ctx.actions_from_binding(&BindingRef::new("nope")).unwrap().is_empty());
        assert_eq!(ctx.visibility_from_binding(&BindingRef::new("nope")).unwrap(), None);
        assert_eq!(ctx.cell_width_from_binding(&BindingRef::new("nope")).unwrap(), None);
        assert_eq!(ctx.style_from_binding(&BindingRef::new("nope")).unwrap(), None);
    }
}
