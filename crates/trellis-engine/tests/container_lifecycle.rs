//! Reconciliation of container content lists across repeated bind cycles:
//! inline content keeps its adapters, bound content is recreated every
//! bind and fully released at every unbind.

mod common;

use trellis_core::{
    BindingRef, BindingValue, BoundValue, CellWidthKind, Content, Element, ElementKind,
    ElementList, ElementStack, GridCell, GridCellWidth, GridRow, LayoutSize, Visibility,
};
use trellis_engine::{ElementAdapter, ElementListAdapter, GridRowAdapter};

use common::engine;

fn stack_element() -> Element {
    Element::of(ElementKind::Stack(ElementStack::default()))
}

fn list_element(contents: Vec<Content>) -> Element {
    Element::of(ElementKind::List(ElementList { contents }))
}

fn grid_element(cells: Vec<GridCell>) -> Element {
    Element::of(ElementKind::GridRow(GridRow { cells }))
}

fn bound_stack(id: &str) -> Vec<BindingValue> {
    vec![BindingValue::new(id, BoundValue::Element(stack_element()))]
}

#[test]
fn static_children_survive_unbind_and_bound_children_do_not() {
    let engine = engine();
    let element = list_element(vec![
        Content::element(stack_element()),
        Content::bound_element(BindingRef::new("cell")),
    ]);
    let bind_ctx = engine.ctx_with_bindings(bound_stack("cell"));

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    let base_view = adapter.base().view;
    {
        let list = adapter.as_any_mut().downcast_mut::<ElementListAdapter>().unwrap();
        assert_eq!(list.child_count(), 1);
    }
    assert_eq!(engine.child_count(base_view), 1);

    for _ in 0..2 {
        adapter.bind_model(&element, &bind_ctx, &engine.factory).unwrap();
        {
            let list = adapter.as_any_mut().downcast_mut::<ElementListAdapter>().unwrap();
            assert_eq!(list.child_count(), 2);
        }
        assert_eq!(engine.child_count(base_view), 2);

        adapter.unbind_model(&engine.factory);
        {
            let list = adapter.as_any_mut().downcast_mut::<ElementListAdapter>().unwrap();
            assert_eq!(list.child_count(), 1);
        }
        assert_eq!(engine.child_count(base_view), 1);
    }

    // Second unbind in a row is a no-op.
    adapter.unbind_model(&engine.factory);
    assert_eq!(engine.child_count(base_view), 1);

    engine.factory.release_adapter(adapter);
}

#[test]
fn bound_slot_inserts_at_its_slot_position() {
    let engine = engine();
    let element = list_element(vec![
        Content::bound_element(BindingRef::new("first")),
        Content::element(stack_element()),
    ]);
    let bind_ctx = engine.ctx_with_bindings(bound_stack("first"));

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    let base_view = adapter.base().view;
    assert_eq!(engine.child_count(base_view), 1);

    adapter.bind_model(&element, &bind_ctx, &engine.factory).unwrap();
    assert_eq!(engine.child_count(base_view), 2);

    adapter.unbind_model(&engine.factory);
    assert_eq!(engine.child_count(base_view), 1);
    engine.factory.release_adapter(adapter);
}

#[test]
fn optional_bound_absence_leaves_slot_empty() {
    let engine = engine();
    let element = list_element(vec![
        Content::element(stack_element()),
        Content::bound_element(BindingRef::optional("missing")),
    ]);
    let bind_ctx = engine.ctx_with_bindings(vec![]);

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    adapter.bind_model(&element, &bind_ctx, &engine.factory).unwrap();
    let list = adapter.as_any_mut().downcast_mut::<ElementListAdapter>().unwrap();
    assert_eq!(list.child_count(), 1);
}

#[test]
fn bound_visibility_gone_suppresses_required_binding() {
    let engine = engine();
    let element = list_element(vec![Content::bound_element(BindingRef::new("cell"))]);
    let bind_ctx = engine.ctx_with_bindings(vec![BindingValue {
        binding_id: "cell".into(),
        visibility: Some(Visibility::Gone),
        transclude_from: None,
        value: None,
    }]);

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    adapter.bind_model(&element, &bind_ctx, &engine.factory).unwrap();
    let list = adapter.as_any_mut().downcast_mut::<ElementListAdapter>().unwrap();
    assert_eq!(list.child_count(), 0);
}

#[test]
fn required_bound_absence_is_fatal() {
    let engine = engine();
    let element = list_element(vec![Content::bound_element(BindingRef::new("cell"))]);
    let bind_ctx = engine.ctx_with_bindings(vec![]);

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    let err = adapter.bind_model(&element, &bind_ctx, &engine.factory).unwrap_err();
    assert!(err.message.contains("Element binding not found for cell"));
}

#[test]
#[should_panic(expected = "Internal error in adapters per content")]
fn cell_count_mismatch_is_a_defect() {
    let engine = engine();
    let two_cells = grid_element(vec![
        GridCell::of(Content::element(stack_element())),
        GridCell::of(Content::element(stack_element())),
    ]);
    let one_cell = grid_element(vec![GridCell::of(Content::element(stack_element()))]);

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&two_cells, &engine.ctx)
        .unwrap();
    let _ = adapter.bind_model(&one_cell, &engine.ctx, &engine.factory);
}

#[test]
fn unset_cell_content_is_fatal_at_create() {
    let engine = engine();
    let element = grid_element(vec![GridCell::default()]);
    let err = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap_err();
    assert!(err.message.contains("Unhandled Content type"));
}

#[test]
fn unset_element_kind_is_fatal() {
    let engine = engine();
    let err = engine
        .factory
        .create_adapter_for_element(&Element::default(), &engine.ctx)
        .unwrap_err();
    assert!(err.message.contains("Unhandled Element type"));
}

#[test]
fn grid_cell_widths_resolve_per_spec() {
    let engine = engine();
    let element = grid_element(vec![
        GridCell::with_width(Content::element(stack_element()), GridCellWidth::dp(123)),
        GridCell::with_width(
            Content::element(stack_element()),
            GridCellWidth::content_width().collapsible(),
        ),
        GridCell::with_width(Content::element(stack_element()), GridCellWidth::weight(4)),
        GridCell::of(Content::element(stack_element())),
        GridCell::with_width(Content::element(stack_element()), GridCellWidth::default()),
    ]);

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    adapter.bind_model(&element, &engine.ctx, &engine.factory).unwrap();
    let base_view = adapter.base().view;

    let views = engine.views.borrow();
    let cell = |i: usize| views.node(views.child_at(base_view, i)).layout;

    assert_eq!(cell(0).width, LayoutSize::Px(123));
    assert_eq!(cell(0).weight, 0.0);

    assert_eq!(cell(1).width, LayoutSize::WrapContent);
    assert!(cell(1).is_collapsible);

    assert_eq!(cell(2).width, LayoutSize::Px(0));
    assert_eq!(cell(2).weight, 4.0);
    assert!(!cell(2).is_collapsible);

    // No width defaults to an equal-weight cell.
    assert_eq!(cell(3).width, LayoutSize::Px(0));
    assert_eq!(cell(3).weight, 1.0);

    // A width with no recognizable spec warns and wraps.
    assert_eq!(cell(4).width, LayoutSize::WrapContent);
}

#[test]
fn bound_cell_width_reresolves_each_bind() {
    let engine = engine();
    let element = grid_element(vec![GridCell {
        content: Some(Content::element(stack_element())),
        width: Some(trellis_core::CellWidthSpec::Bound(BindingRef::new("w"))),
    }]);

    let wide = engine.ctx_with_bindings(vec![BindingValue::new(
        "w",
        BoundValue::CellWidth(GridCellWidth::dp(456)),
    )]);
    let collapsible = engine.ctx_with_bindings(vec![BindingValue::new(
        "w",
        BoundValue::CellWidth(GridCellWidth {
            spec: Some(CellWidthKind::ContentWidth),
            is_collapsible: true,
        }),
    )]);

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    let base_view = adapter.base().view;

    adapter.bind_model(&element, &wide, &engine.factory).unwrap();
    {
        let views = engine.views.borrow();
        let layout = views.node(views.child_at(base_view, 0)).layout;
        assert_eq!(layout.width, LayoutSize::Px(456));
        assert!(!layout.is_collapsible);
    }

    adapter.unbind_model(&engine.factory);
    adapter.bind_model(&element, &collapsible, &engine.factory).unwrap();
    {
        let views = engine.views.borrow();
        let layout = views.node(views.child_at(base_view, 0)).layout;
        assert_eq!(layout.width, LayoutSize::WrapContent);
        assert!(layout.is_collapsible);
    }
}

#[test]
fn bound_cells_rebind_to_changed_values() {
    let engine = engine();
    let element = list_element(vec![Content::bound_element(BindingRef::new("cell"))]);

    let one_child = engine.ctx_with_bindings(vec![BindingValue::new(
        "cell",
        BoundValue::Element(list_element(vec![Content::element(stack_element())])),
    )]);
    let two_children = engine.ctx_with_bindings(vec![BindingValue::new(
        "cell",
        BoundValue::Element(list_element(vec![
            Content::element(stack_element()),
            Content::element(stack_element()),
        ])),
    )]);

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    let base_view = adapter.base().view;
    assert_eq!(engine.child_count(base_view), 0);

    adapter.bind_model(&element, &two_children, &engine.factory).unwrap();
    {
        let views = engine.views.borrow();
        let inner = views.child_at(base_view, 0);
        assert_eq!(views.child_count(inner), 2);
    }

    adapter.unbind_model(&engine.factory);
    assert_eq!(engine.child_count(base_view), 0);

    adapter.bind_model(&element, &one_child, &engine.factory).unwrap();
    {
        let views = engine.views.borrow();
        let inner = views.child_at(base_view, 0);
        assert_eq!(views.child_count(inner), 1);
    }
}

#[test]
fn release_empties_the_container() {
    let engine = engine();
    let element = list_element(vec![
        Content::element(stack_element()),
        Content::bound_element(BindingRef::new("cell")),
    ]);
    let bind_ctx = engine.ctx_with_bindings(bound_stack("cell"));

    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    let base_view = adapter.base().view;
    adapter.bind_model(&element, &bind_ctx, &engine.factory).unwrap();
    adapter.unbind_model(&engine.factory);
    adapter.release_adapter(&engine.factory);

    assert_eq!(engine.child_count(base_view), 0);
    let grid_check = adapter.as_any_mut().downcast_mut::<ElementListAdapter>().unwrap();
    assert_eq!(grid_check.child_count(), 0);
}

#[test]
fn released_container_recycles_for_a_new_model() {
    let engine = engine();
    let element = list_element(vec![Content::element(stack_element())]);

    let adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    engine.factory.release_adapter(adapter);
    let nodes_after_release = engine.views.borrow().len();

    // The recycled adapter reuses its backing view.
    let mut adapter = engine
        .factory
        .create_adapter_for_element(&element, &engine.ctx)
        .unwrap();
    adapter.bind_model(&element, &engine.ctx, &engine.factory).unwrap();
    assert_eq!(engine.views.borrow().len(), nodes_after_release);

    // Keep the grid type distinct from the list type in pools.
    let grid = grid_element(vec![GridCell::of(Content::element(stack_element()))]);
    let grid_adapter = engine
        .factory
        .create_adapter_for_element(&grid, &engine.ctx)
        .unwrap();
    assert!(grid_adapter.base().key != adapter.base().key);
}

#[test]
fn grid_adapter_downcasts_by_kind() {
    let engine = engine();
    let grid = grid_element(vec![GridCell::of(Content::element(stack_element()))]);
    let mut adapter = engine
        .factory
        .create_adapter_for_element(&grid, &engine.ctx)
        .unwrap();
    assert!(adapter.as_any_mut().downcast_mut::<GridRowAdapter>().is_some());
}
