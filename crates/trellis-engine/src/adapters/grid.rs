use std::any::Any;

use trellis_core::{
    BindError, BindResult, CellWidthKind, CellWidthSpec, Content, Element, ElementKind,
    ErrorCode, GridCellWidth, GridRow, LayoutSize, Orientation, Severity, ViewBody, dp_to_px,
};

use crate::adapter::{AdapterBase, ElementAdapter, Views};
use crate::adapters::container::{self, ContainerChildren};
use crate::factory::AdapterFactory;
use crate::frame::FrameContext;
use crate::pool::AdapterKind;

/// Horizontal row of cells with per-cell width semantics: fixed dp,
/// proportional weight, or content-sized (optionally collapsible).
pub struct GridRowAdapter {
    base: AdapterBase,
    container: ContainerChildren,
}

impl GridRowAdapter {
    pub(crate) fn new(views: Views) -> Self {
        let base =
            AdapterBase::new(views.clone(), ViewBody::Group { orientation: Orientation::Row });
        {
            let mut v = views.borrow_mut();
            let node = v.node_mut(base.view);
            node.layout.width = LayoutSize::MatchParent;
            node.layout.height = LayoutSize::WrapContent;
        }
        GridRowAdapter { base, container: ContainerChildren::new() }
    }

    pub fn child_count(&self) -> usize {
        self.container.children.len()
    }

    fn grid_row(element: &Element) -> BindResult<&GridRow> {
        match &element.kind {
            Some(ElementKind::GridRow(row)) => Ok(row),
            _ => Err(BindError::new(
                ErrorCode::MissingOrUnhandledElement,
                "Missing GridRow",
            )),
        }
    }

    /// Cells with no content slot surface as unset content and fail in the
    /// shared reconciliation, like any other unhandled content.
    fn cell_contents(row: &GridRow) -> Vec<Content> {
        row.cells.iter().map(|c| c.content.clone().unwrap_or_default()).collect()
    }
}

fn apply_cell_params(
    views: &Views,
    child: &dyn ElementAdapter,
    width_spec: Option<&CellWidthSpec>,
    ctx: &FrameContext,
) -> BindResult<()> {
    // Bound widths re-resolve on every bind; inline widths are fixed.
    let width: Option<GridCellWidth> = match width_spec {
        None => None,
        Some(CellWidthSpec::Inline(width)) => Some(width.clone()),
        Some(CellWidthSpec::Bound(binding)) => ctx.cell_width_from_binding(binding)?,
    };
    let density = ctx.assets().density();
    let mut v = views.borrow_mut();
    let node = v.node_mut(child.view());
    node.layout.is_collapsible = false;
    match width {
        None => {
            // No width defaults to an equal-weight cell, unless the child
            // sized itself.
            match child.computed_width() {
                LayoutSize::NotSet => {
                    node.layout.width = LayoutSize::Px(0);
                    node.layout.weight = 1.0;
                }
                width => {
                    node.layout.width = width;
                    node.layout.weight = 0.0;
                }
            }
        }
        Some(cell_width) => {
            node.layout.is_collapsible = cell_width.is_collapsible;
            match cell_width.spec {
                Some(CellWidthKind::Dp(dp)) => {
                    node.layout.width = LayoutSize::Px(dp_to_px(dp as f32, density));
                    node.layout.weight = 0.0;
                }
                Some(CellWidthKind::Weight(weight)) => {
                    node.layout.width = LayoutSize::Px(0);
                    node.layout.weight = weight as f32;
                    node.layout.is_collapsible = false;
                }
                Some(CellWidthKind::ContentWidth) => {
                    node.layout.width = LayoutSize::WrapContent;
                    node.layout.weight = 0.0;
                }
                None => {
                    ctx.report_message(
                        Severity::Warning,
                        ErrorCode::GridCellWidthWithoutContents,
                        "Invalid content width: not set",
                    );
                    node.layout.width = LayoutSize::WrapContent;
                    node.layout.weight = 0.0;
                    node.layout.is_collapsible = false;
                }
            }
        }
    }
    node.layout.height = match child.computed_height() {
        LayoutSize::NotSet => LayoutSize::WrapContent,
        height => height,
    };
    if let Some(resolved) = &child.base().resolved {
        node.layout.gravity_vertical = resolved.raw().gravity_vertical;
        node.layout.margins = resolved.margins_px();
    }
    Ok(())
}

impl ElementAdapter for GridRowAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AdapterBase {
        &mut self.base
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::GridRow
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn on_create_adapter(
        &mut self,
        element: &Element,
        ctx: &FrameContext,
        factory: &AdapterFactory,
    ) -> BindResult<()> {
        let contents = Self::cell_contents(Self::grid_row(element)?);
        let views = self.base.views.clone();
        container::create_children(
            &mut self.container,
            self.base.view,
            &views,
            &contents,
            ctx,
            factory,
        )
    }

    fn on_bind_model(
        &mut self,
        element: &Element,
        ctx: &FrameContext,
        factory: &AdapterFactory,
    ) -> BindResult<()> {
        let row = Self::grid_row(element)?;
        let contents = Self::cell_contents(row);
        let widths: Vec<Option<CellWidthSpec>> =
            row.cells.iter().map(|c| c.width.clone()).collect();
        let views = self.base.views.clone();
        let params_views = views.clone();
        container::bind_children(
            &mut self.container,
            self.base.view,
            &views,
            &contents,
            ctx,
            factory,
            &mut |child, slot| apply_cell_params(&params_views, child, widths[slot].as_ref(), ctx),
        )
    }

    fn on_unbind_model(&mut self, factory: &AdapterFactory) {
        let Some(element) = self.base.element.clone() else {
            return;
        };
        let Ok(row) = Self::grid_row(&element) else {
            return;
        };
        let contents = Self::cell_contents(row);
        let views = self.base.views.clone();
        container::unbind_children(
            &mut self.container,
            self.base.view,
            &views,
            &contents,
            factory,
        );
    }

    fn on_release_adapter(&mut self, factory: &AdapterFactory) {
        let views = self.base.views.clone();
        container::release_children(&mut self.container, self.base.view, &views, factory);
    }
}
