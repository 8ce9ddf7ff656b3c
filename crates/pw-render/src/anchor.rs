//! Anchor points: where a connection line attaches to a tree row.
//!
//! The anchor sits on the column edge facing the other tree, inset by the
//! depth of the port glyph, and is clamped into the row's own bounds so a
//! line never reaches into a neighbouring row or past a short label.
//! Vertically it is the row centre.

use kurbo::Point;
use pw_core::id::EndpointId;
use pw_core::model::{Direction, Endpoint, PortKind, ResolvedBounds, Side};
use pw_core::pane::TreeView;

/// Notch depth of an input glyph; output arrows reach the edge.
const INPUT_NOTCH: f32 = 4.0;
const PROXY_INSET: f32 = 2.0;
const RPC_RADIUS: f32 = 3.0;

/// Attachment point of a line on a tree row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub point: Point,
}

/// Horizontal inset of the glyph tip from the column edge.
fn glyph_inset(endpoint: &Endpoint) -> f32 {
    let Some(port) = endpoint.as_port() else {
        return 0.0;
    };
    let direction = match port.direction {
        Direction::Output => 0.0,
        Direction::Input => INPUT_NOTCH,
    };
    let kind = match port.kind {
        PortKind::Plain => 0.0,
        PortKind::Proxy => PROXY_INSET,
        PortKind::Rpc => RPC_RADIUS,
    };
    direction + kind
}

fn clamp_into(value: f32, lo: f32, hi: f32) -> f32 {
    value.min(hi.max(lo)).max(lo)
}

/// Anchor for an endpoint row given its bounds and the column it lives in.
pub fn anchor_for(
    side: Side,
    endpoint: &Endpoint,
    bounds: ResolvedBounds,
    column: ResolvedBounds,
) -> Anchor {
    let inset = glyph_inset(endpoint);
    let edge = match side {
        Side::Source => column.right() - inset,
        Side::Target => column.x + inset,
    };
    let x = clamp_into(edge, bounds.x, bounds.right());
    let (_, y) = bounds.center();
    Anchor {
        point: Point::new(x as f64, y as f64),
    }
}

/// Anchor of a visible endpoint, or `None` if it is not on screen.
pub fn anchor_point(view: &dyn TreeView, id: EndpointId) -> Option<Anchor> {
    let endpoint = view.endpoint(id)?;
    let bounds = view.bounds(id)?;
    Some(anchor_for(view.side(), endpoint, bounds, view.column()))
}
