//! Row layout for a tree pane.
//!
//! A pane shows the expanded rows of an [`EndpointTree`] inside a column.
//! Each row is `row_height` tall and indented per depth; its width is an
//! estimate of the icon plus label, clipped to the column. Rows scrolled out
//! of the column are not visible and get no bounds.

use crate::id::EndpointId;
use crate::model::ResolvedBounds;
use crate::tree::EndpointTree;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Width reserved for the port/group icon at the start of each row.
pub const ICON_WIDTH: f32 = 16.0;
/// Average glyph advance used to estimate label width.
pub const CHAR_WIDTH: f32 = 7.0;
const LABEL_PADDING: f32 = 4.0;

/// Geometry of one tree pane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneLayout {
    /// Visible column in canvas coordinates.
    pub column: ResolvedBounds,
    pub row_height: f32,
    /// Horizontal indent per tree depth.
    pub indent: f32,
    /// Vertical scroll offset (content pixels scrolled above the column top).
    pub scroll_y: f32,
}

impl PaneLayout {
    pub fn new(column: ResolvedBounds) -> Self {
        Self {
            column,
            row_height: 18.0,
            indent: 14.0,
            scroll_y: 0.0,
        }
    }
}

/// Resolved rows of a pane: visible endpoints in display order and their
/// bounds.
#[derive(Debug, Clone, Default)]
pub struct RowLayout {
    pub order: Vec<EndpointId>,
    pub bounds: HashMap<EndpointId, ResolvedBounds>,
}

/// Lay out the expanded rows of `tree` and keep those inside the column.
pub fn resolve_rows(tree: &EndpointTree, layout: &PaneLayout) -> RowLayout {
    let column = layout.column;
    let mut rows = RowLayout::default();

    for (row, (id, depth)) in tree.display_order().into_iter().enumerate() {
        let y = column.y + row as f32 * layout.row_height - layout.scroll_y;
        if y + layout.row_height <= column.y || y >= column.bottom() {
            continue;
        }
        let x = column.x + depth as f32 * layout.indent;
        let label_len = tree.get(id).map_or(0, |ep| ep.label.chars().count());
        let natural = ICON_WIDTH + label_len as f32 * CHAR_WIDTH + LABEL_PADDING;
        let width = natural.min(column.right() - x).max(0.0);

        rows.order.push(id);
        rows.bounds.insert(
            id,
            ResolvedBounds {
                x,
                y,
                width,
                height: layout.row_height,
            },
        );
    }

    rows
}
