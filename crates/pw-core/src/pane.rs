//! Tree view adapter.
//!
//! [`TreeView`] is what the resolver, renderer and hit tester need from a
//! tree widget: the visible endpoints in display order and their geometry.
//! [`Pane`] is the stock implementation backed by an [`EndpointTree`] and a
//! [`PaneLayout`]; hosts with their own tree widget implement the trait
//! directly.

use crate::id::EndpointId;
use crate::layout::{PaneLayout, RowLayout, resolve_rows};
use crate::model::{Endpoint, EndpointKind, InterfaceKind, ResolvedBounds, Side};
use crate::tree::EndpointTree;

/// Read-only view of one tree as currently displayed.
pub trait TreeView {
    fn side(&self) -> Side;

    /// Currently visible endpoints in the tree's natural display order.
    fn visible(&self) -> &[EndpointId];

    fn endpoint(&self, id: EndpointId) -> Option<&Endpoint>;

    /// On-screen bounds of a visible endpoint's row.
    fn bounds(&self, id: EndpointId) -> Option<ResolvedBounds>;

    /// Bounds of the visible column the tree is drawn in.
    fn column(&self) -> ResolvedBounds;

    /// Endpoints currently marked as drop targets.
    fn highlighted(&self) -> &[EndpointId] {
        &[]
    }

    /// Sensor/controller interfaces below a structural row.
    fn interface_cues(&self, _id: EndpointId) -> Vec<InterfaceKind> {
        Vec::new()
    }

    /// Visible endpoints resolved to their data, in display order.
    fn visible_endpoints(&self) -> Vec<&Endpoint> {
        self.visible()
            .iter()
            .filter_map(|id| self.endpoint(*id))
            .collect()
    }
}

/// One side of the editor: an endpoint tree and its resolved rows.
#[derive(Debug, Clone)]
pub struct Pane {
    side: Side,
    tree: EndpointTree,
    layout: PaneLayout,
    rows: RowLayout,
}

impl Pane {
    pub fn new(side: Side, tree: EndpointTree, layout: PaneLayout) -> Self {
        let rows = resolve_rows(&tree, &layout);
        Self {
            side,
            tree,
            layout,
            rows,
        }
    }

    pub fn tree(&self) -> &EndpointTree {
        &self.tree
    }

    /// Mutable access for non-structural edits (links, selection,
    /// highlighting). Call [`Pane::resolve`] after anything that changes
    /// which rows are shown.
    pub fn tree_mut(&mut self) -> &mut EndpointTree {
        &mut self.tree
    }

    /// Edit the tree and re-resolve rows afterwards.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut EndpointTree) -> R) -> R {
        let result = f(&mut self.tree);
        self.resolve();
        result
    }

    pub fn layout(&self) -> &PaneLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: PaneLayout) {
        self.layout = layout;
        self.resolve();
    }

    /// Scroll by `dy` pixels, never above the first row.
    pub fn scroll_by(&mut self, dy: f32) {
        self.layout.scroll_y = (self.layout.scroll_y + dy).max(0.0);
        self.resolve();
    }

    /// Recompute visible rows from the tree and layout.
    pub fn resolve(&mut self) {
        self.rows = resolve_rows(&self.tree, &self.layout);
    }

    pub fn rows(&self) -> &RowLayout {
        &self.rows
    }
}

impl TreeView for Pane {
    fn side(&self) -> Side {
        self.side
    }

    fn visible(&self) -> &[EndpointId] {
        &self.rows.order
    }

    fn endpoint(&self, id: EndpointId) -> Option<&Endpoint> {
        self.tree.get(id)
    }

    fn bounds(&self, id: EndpointId) -> Option<ResolvedBounds> {
        self.rows.bounds.get(&id).copied()
    }

    fn column(&self) -> ResolvedBounds {
        self.layout.column
    }

    fn highlighted(&self) -> &[EndpointId] {
        self.tree.highlighted()
    }

    fn interface_cues(&self, id: EndpointId) -> Vec<InterfaceKind> {
        match self.tree.get(id).map(|e| &e.kind) {
            Some(EndpointKind::Group { .. }) => self.tree.subtree_interfaces(id),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_refreshes_rows() {
        let mut pane = Pane::new(
            Side::Source,
            EndpointTree::new("/w"),
            PaneLayout::new(ResolvedBounds::new(0.0, 0.0, 100.0, 100.0)),
        );
        assert!(pane.visible().is_empty());
        pane.edit(|tree| tree.add_top_level(Endpoint::group("/w/a", InterfaceKind::Generic)))
            .unwrap();
        assert_eq!(pane.visible(), &[EndpointId::intern("/w/a")]);
        assert!(pane.bounds(EndpointId::intern("/w/a")).is_some());
    }

    #[test]
    fn scroll_never_goes_negative() {
        let mut pane = Pane::new(
            Side::Target,
            EndpointTree::new("/r"),
            PaneLayout::new(ResolvedBounds::new(0.0, 0.0, 100.0, 100.0)),
        );
        pane.scroll_by(-50.0);
        assert_eq!(pane.layout().scroll_y, 0.0);
    }

    #[test]
    fn cues_only_on_structural_rows() {
        let mut tree = EndpointTree::new("/r");
        tree.add_top_level(Endpoint::group("/r/arm", InterfaceKind::Controller))
            .unwrap();
        let pane = Pane::new(
            Side::Target,
            tree,
            PaneLayout::new(ResolvedBounds::new(0.0, 0.0, 100.0, 100.0)),
        );
        assert_eq!(
            pane.interface_cues(EndpointId::intern("/r/arm")),
            vec![InterfaceKind::Controller]
        );
        assert!(pane.interface_cues(EndpointId::intern("/r/none")).is_empty());
    }
}
