//! Endpoint data model shared by both trees.
//!
//! Every node shown in either tree is an [`Endpoint`]. The set of endpoint
//! kinds is closed: the invisible root, structural grouping nodes, and
//! connectable ports. Persisted connections live on the *widget-owned* port
//! as a list of partner URIs; there is no separate edge object.

use crate::id::EndpointId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Sides ───────────────────────────────────────────────────────────────

/// Which of the two parallel trees an endpoint is displayed in.
///
/// The source tree is laid out on the left, the target tree on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Source, Side::Target];

    /// The opposite tree.
    pub fn other(self) -> Side {
        match self {
            Side::Source => Side::Target,
            Side::Target => Side::Source,
        }
    }

    /// Stable array index (`Source` = 0, `Target` = 1).
    pub fn index(self) -> usize {
        match self {
            Side::Source => 0,
            Side::Target => 1,
        }
    }
}

// ─── Ports ───────────────────────────────────────────────────────────────

/// Data-flow direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
}

/// Port family. Affects the anchor glyph and line colour; RPC ports only
/// connect to RPC ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    Plain,
    Proxy,
    Rpc,
}

/// Who stores the link set of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ownership {
    /// Port belongs to an editor widget; it owns mutable link storage.
    Widget,
    /// Port lives in the remote framework; links to it are recorded on the
    /// widget side.
    Remote,
}

/// A directional, typed port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub direction: Direction,
    pub kind: PortKind,
    pub ownership: Ownership,
    /// Name of the transported data type (e.g. `f64`, `Pose2D`).
    pub data_type: String,
    /// Persisted partner URIs. Only meaningful on widget-owned ports.
    pub links: SmallVec<[EndpointId; 4]>,
}

impl Port {
    pub fn new(direction: Direction, ownership: Ownership, data_type: &str) -> Self {
        Self {
            direction,
            kind: PortKind::Plain,
            ownership,
            data_type: data_type.to_string(),
            links: SmallVec::new(),
        }
    }

    pub fn with_kind(mut self, kind: PortKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_widget_owned(&self) -> bool {
        self.ownership == Ownership::Widget
    }

    pub fn is_linked_to(&self, partner: EndpointId) -> bool {
        self.links.contains(&partner)
    }
}

// ─── Endpoints ───────────────────────────────────────────────────────────

/// Interface flavour of a structural node, used for the subtree cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterfaceKind {
    #[default]
    Generic,
    Sensor,
    Controller,
}

/// What kind of tree node an endpoint is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EndpointKind {
    /// Invisible tree root.
    Root,
    /// Non-connectable grouping or interface node.
    Group { interface: InterfaceKind },
    /// Connectable port.
    Port(Port),
}

/// A node displayed in one of the trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: EndpointId,
    pub label: String,
    pub kind: EndpointKind,
}

impl Endpoint {
    pub fn new(id: EndpointId, kind: EndpointKind) -> Self {
        Self {
            id,
            label: id.leaf().to_string(),
            kind,
        }
    }

    /// Shorthand for a port endpoint labelled by its URI leaf.
    pub fn port(uri: &str, port: Port) -> Self {
        Self::new(EndpointId::intern(uri), EndpointKind::Port(port))
    }

    /// Shorthand for a structural endpoint labelled by its URI leaf.
    pub fn group(uri: &str, interface: InterfaceKind) -> Self {
        Self::new(EndpointId::intern(uri), EndpointKind::Group { interface })
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn as_port(&self) -> Option<&Port> {
        match &self.kind {
            EndpointKind::Port(port) => Some(port),
            _ => None,
        }
    }

    pub fn as_port_mut(&mut self) -> Option<&mut Port> {
        match &mut self.kind {
            EndpointKind::Port(port) => Some(port),
            _ => None,
        }
    }

    pub fn is_connectable(&self) -> bool {
        matches!(self.kind, EndpointKind::Port(_))
    }

    pub fn is_widget_owned(&self) -> bool {
        self.as_port().is_some_and(Port::is_widget_owned)
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Axis-aligned on-screen bounds of a tree row or column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ResolvedBounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_other_and_index() {
        assert_eq!(Side::Source.other(), Side::Target);
        assert_eq!(Side::Target.other(), Side::Source);
        assert_eq!(Side::Source.index(), 0);
        assert_eq!(Side::Target.index(), 1);
    }

    #[test]
    fn endpoint_label_defaults_to_leaf() {
        let ep = Endpoint::port(
            "/Main/Drive/Velocity",
            Port::new(Direction::Output, Ownership::Remote, "f64"),
        );
        assert_eq!(ep.label, "Velocity");
        assert!(ep.is_connectable());
        assert!(!ep.is_widget_owned());
    }

    #[test]
    fn group_is_not_connectable() {
        let ep = Endpoint::group("/Main/Sensors", InterfaceKind::Sensor);
        assert!(!ep.is_connectable());
        assert!(ep.as_port().is_none());
    }

    #[test]
    fn bounds_edges() {
        let b = ResolvedBounds::new(10.0, 20.0, 30.0, 5.0);
        assert_eq!(b.right(), 40.0);
        assert_eq!(b.bottom(), 25.0);
        assert!(b.contains(40.0, 25.0));
        assert!(!b.contains(40.1, 25.0));
    }
}
