pub mod id;
pub mod layout;
pub mod model;
pub mod network;
pub mod oracle;
pub mod pane;
pub mod resolve;
pub mod tree;

pub use id::EndpointId;
pub use layout::{PaneLayout, RowLayout, resolve_rows};
pub use model::*;
pub use network::{LinkTable, PortNetwork};
pub use oracle::{CompatibilityOracle, PortOracle, Rating};
pub use pane::{Pane, TreeView};
pub use resolve::{MatchResult, reachable, resolve};
pub use tree::EndpointTree;

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
