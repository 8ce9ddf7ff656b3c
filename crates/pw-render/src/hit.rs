//! Hit testing: point → endpoint row lookup.
//!
//! Tree rows span the full column width, so a row is hit anywhere between
//! the column edges, not just over its label.

use pw_core::id::EndpointId;
use pw_core::model::Side;
use pw_core::pane::TreeView;

/// Find the visible endpoint whose row is at (px, py).
/// Returns `None` outside the column or below the last row.
pub fn hit_test(view: &dyn TreeView, px: f32, py: f32) -> Option<EndpointId> {
    let column = view.column();
    if !column.contains(px, py) {
        return None;
    }
    view.visible().iter().copied().find(|id| {
        view.bounds(*id)
            .is_some_and(|b| py >= b.y && py < b.bottom())
    })
}

/// Which pane's column contains (px, py).
pub fn side_at(views: [&dyn TreeView; 2], px: f32, py: f32) -> Option<Side> {
    views
        .iter()
        .find(|view| view.column().contains(px, py))
        .map(|view| view.side())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pw_core::model::{Endpoint, InterfaceKind, ResolvedBounds};
    use pw_core::{EndpointTree, Pane, PaneLayout};

    fn pane(side: Side, x: f32, names: &[&str]) -> Pane {
        let mut tree = EndpointTree::new("/h");
        for name in names {
            tree.add_top_level(Endpoint::group(name, InterfaceKind::Generic))
                .unwrap();
        }
        Pane::new(
            side,
            tree,
            PaneLayout::new(ResolvedBounds::new(x, 0.0, 100.0, 200.0)),
        )
    }

    #[test]
    fn hits_row_across_full_width() {
        let p = pane(Side::Source, 0.0, &["/h/a", "/h/b"]);
        // Second row, far right of its short label.
        assert_eq!(hit_test(&p, 95.0, 20.0), Some(EndpointId::intern("/h/b")));
        assert_eq!(hit_test(&p, 5.0, 5.0), Some(EndpointId::intern("/h/a")));
    }

    #[test]
    fn misses_below_rows_and_outside_column() {
        let p = pane(Side::Source, 0.0, &["/h/a"]);
        assert_eq!(hit_test(&p, 5.0, 100.0), None);
        assert_eq!(hit_test(&p, 150.0, 5.0), None);
    }

    #[test]
    fn side_at_picks_column() {
        let left = pane(Side::Source, 0.0, &[]);
        let right = pane(Side::Target, 300.0, &[]);
        assert_eq!(side_at([&left, &right], 10.0, 10.0), Some(Side::Source));
        assert_eq!(side_at([&left, &right], 350.0, 10.0), Some(Side::Target));
        assert_eq!(side_at([&left, &right], 200.0, 10.0), None);
    }
}
