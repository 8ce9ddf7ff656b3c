//! Hierarchical endpoint tree.
//!
//! One tree per side. Nodes are [`Endpoint`]s, graph edges represent
//! parent→child containment. Besides the hierarchy, the tree carries the
//! per-side UI state the connection engine shares with the tree widget:
//! the ordered selection, the highlight set, and which nodes are collapsed.
//!
//! Structural changes (adding or removing endpoints) bump a revision counter
//! so an in-flight drag gesture can detect that its snapshot went stale.

use crate::id::EndpointId;
use crate::model::{Endpoint, EndpointKind, InterfaceKind};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::{HashMap, HashSet};

/// A tree of endpoints with selection and highlight state.
#[derive(Debug, Clone)]
pub struct EndpointTree {
    /// The underlying directed graph.
    pub graph: StableDiGraph<Endpoint, ()>,

    /// The root node index.
    pub root: NodeIndex,

    /// Index from URI → NodeIndex for fast lookup.
    id_index: HashMap<EndpointId, NodeIndex>,

    collapsed: HashSet<NodeIndex>,

    /// Ordered selection; order defines pairing order.
    selection: Vec<EndpointId>,

    highlighted: Vec<EndpointId>,

    revision: u64,
}

impl Default for EndpointTree {
    fn default() -> Self {
        Self::new("/")
    }
}

impl EndpointTree {
    /// Create a new tree with an invisible root at `root_uri`.
    #[must_use]
    pub fn new(root_uri: &str) -> Self {
        let mut graph = StableDiGraph::new();
        let root_id = EndpointId::intern(root_uri);
        let root = graph.add_node(Endpoint::new(root_id, EndpointKind::Root));

        let mut id_index = HashMap::new();
        id_index.insert(root_id, root);

        Self {
            graph,
            root,
            id_index,
            collapsed: HashSet::new(),
            selection: Vec::new(),
            highlighted: Vec::new(),
            revision: 0,
        }
    }

    pub fn root_id(&self) -> EndpointId {
        self.graph[self.root].id
    }

    /// Monotonic counter bumped on every structural change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ─── Structure ───────────────────────────────────────────────────────

    /// Add an endpoint as the last child of `parent`.
    ///
    /// # Errors
    /// - `parent` is not in this tree
    /// - an endpoint with the same URI already exists
    pub fn add_endpoint(
        &mut self,
        parent: EndpointId,
        endpoint: Endpoint,
    ) -> Result<NodeIndex, String> {
        let parent_idx = self
            .index_of(parent)
            .ok_or_else(|| format!("Unknown parent endpoint \"{parent}\""))?;
        if self.id_index.contains_key(&endpoint.id) {
            return Err(format!("Endpoint \"{}\" already exists", endpoint.id));
        }
        let id = endpoint.id;
        let idx = self.graph.add_node(endpoint);
        self.graph.add_edge(parent_idx, idx, ());
        self.id_index.insert(id, idx);
        self.revision += 1;
        Ok(idx)
    }

    /// Add an endpoint under the root.
    pub fn add_top_level(&mut self, endpoint: Endpoint) -> Result<NodeIndex, String> {
        self.add_endpoint(self.root_id(), endpoint)
    }

    /// Remove an endpoint and its whole subtree. Returns the removed
    /// endpoint itself (descendants are dropped).
    pub fn remove_endpoint(&mut self, id: EndpointId) -> Option<Endpoint> {
        let idx = self.index_of(id)?;
        if idx == self.root {
            return None;
        }
        let mut doomed = Vec::new();
        self.collect_subtree(idx, &mut doomed);

        let mut removed = None;
        // Children first so the subtree root comes out last.
        for node_idx in doomed.into_iter().rev() {
            if let Some(endpoint) = self.graph.remove_node(node_idx) {
                self.id_index.remove(&endpoint.id);
                self.collapsed.remove(&node_idx);
                self.selection.retain(|s| *s != endpoint.id);
                self.highlighted.retain(|h| *h != endpoint.id);
                removed = Some(endpoint);
            }
        }
        self.revision += 1;
        removed
    }

    /// An endpoint and all its descendants, depth-first.
    pub fn subtree(&self, id: EndpointId) -> Vec<EndpointId> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        let mut nodes = Vec::new();
        self.collect_subtree(idx, &mut nodes);
        nodes.into_iter().map(|n| self.graph[n].id).collect()
    }

    fn collect_subtree(&self, idx: NodeIndex, out: &mut Vec<NodeIndex>) {
        out.push(idx);
        for child in self.children(idx) {
            self.collect_subtree(child, out);
        }
    }

    /// Look up an endpoint by URI.
    pub fn get(&self, id: EndpointId) -> Option<&Endpoint> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Look up an endpoint mutably by URI. Link edits through this handle
    /// are not structural and do not bump the revision.
    pub fn get_mut(&mut self, id: EndpointId) -> Option<&mut Endpoint> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn contains(&self, id: EndpointId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Get the index for an EndpointId.
    pub fn index_of(&self, id: EndpointId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Get the parent index of a node.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Get children of a node in insertion order.
    ///
    /// Sorts by `NodeIndex` so the result is deterministic regardless of
    /// how `petgraph` iterates its adjacency list.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// Every endpoint except the root, in depth-first display order,
    /// regardless of collapsed state.
    pub fn endpoints(&self) -> Vec<&Endpoint> {
        let mut out = Vec::new();
        self.walk(self.root, 0, false, &mut |idx, _| out.push(&self.graph[idx]));
        out
    }

    /// Expanded endpoints in display order with their depth (top level = 0).
    pub fn display_order(&self) -> Vec<(EndpointId, usize)> {
        let mut out = Vec::new();
        self.walk(self.root, 0, true, &mut |idx, depth| {
            out.push((self.graph[idx].id, depth))
        });
        out
    }

    fn walk(
        &self,
        idx: NodeIndex,
        depth: usize,
        respect_collapsed: bool,
        visit: &mut dyn FnMut(NodeIndex, usize),
    ) {
        if respect_collapsed && idx != self.root && self.collapsed.contains(&idx) {
            return;
        }
        for child in self.children(idx) {
            visit(child, depth);
            self.walk(child, depth + 1, respect_collapsed, visit);
        }
    }

    // ─── Expansion ───────────────────────────────────────────────────────

    pub fn set_expanded(&mut self, id: EndpointId, expanded: bool) {
        if let Some(idx) = self.index_of(id) {
            if expanded {
                self.collapsed.remove(&idx);
            } else {
                self.collapsed.insert(idx);
            }
        }
    }

    pub fn is_expanded(&self, id: EndpointId) -> bool {
        self.index_of(id)
            .is_some_and(|idx| !self.collapsed.contains(&idx))
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selection(&self) -> &[EndpointId] {
        &self.selection
    }

    pub fn is_selected(&self, id: EndpointId) -> bool {
        self.selection.contains(&id)
    }

    /// Replace the selection with a single endpoint.
    pub fn select(&mut self, id: EndpointId) {
        self.selection.clear();
        if self.contains(id) {
            self.selection.push(id);
        }
    }

    /// Add or remove an endpoint from the selection (ctrl+click).
    pub fn toggle_selected(&mut self, id: EndpointId) {
        if let Some(pos) = self.selection.iter().position(|s| *s == id) {
            self.selection.remove(pos);
        } else if self.contains(id) {
            self.selection.push(id);
        }
    }

    /// Replace the selection, dropping unknown and duplicate URIs.
    pub fn set_selection(&mut self, ids: &[EndpointId]) {
        self.selection.clear();
        for id in ids {
            if self.contains(*id) && !self.selection.contains(id) {
                self.selection.push(*id);
            }
        }
    }

    /// Select every expanded endpoint in display order.
    pub fn select_all(&mut self) {
        self.selection = self.display_order().into_iter().map(|(id, _)| id).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ─── Highlighting ────────────────────────────────────────────────────

    pub fn highlighted(&self) -> &[EndpointId] {
        &self.highlighted
    }

    pub fn is_highlighted(&self, id: EndpointId) -> bool {
        self.highlighted.contains(&id)
    }

    pub fn set_highlighted(&mut self, ids: Vec<EndpointId>) {
        self.highlighted = ids;
    }

    pub fn clear_highlighted(&mut self) {
        self.highlighted.clear();
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Widget-owned ports in this tree whose link set contains `remote`.
    pub fn referencing(&self, remote: EndpointId) -> Vec<EndpointId> {
        self.endpoints()
            .into_iter()
            .filter(|ep| {
                ep.as_port()
                    .is_some_and(|p| p.is_widget_owned() && p.is_linked_to(remote))
            })
            .map(|ep| ep.id)
            .collect()
    }

    /// Interface flavours present in the subtree below a structural node
    /// (the node itself included). Drives the sensor/controller row cue.
    pub fn subtree_interfaces(&self, id: EndpointId) -> Vec<InterfaceKind> {
        let mut found = Vec::new();
        let Some(idx) = self.index_of(id) else {
            return found;
        };
        let mut nodes = Vec::new();
        self.collect_subtree(idx, &mut nodes);
        for node_idx in nodes {
            if let EndpointKind::Group { interface } = self.graph[node_idx].kind
                && interface != InterfaceKind::Generic
                && !found.contains(&interface)
            {
                found.push(interface);
            }
        }
        found
    }
}
