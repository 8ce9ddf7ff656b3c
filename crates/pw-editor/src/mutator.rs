//! Connection mutator: the only code that edits persisted connections.
//!
//! A connection is stored once, as a partner URI in the link set of the
//! widget-owned endpoint, and mirrored to the [`PortNetwork`] so the real
//! ports carry data. Every edit goes through here so both stay in step.

use pw_core::id::EndpointId;
use pw_core::model::{Direction, Endpoint};
use pw_core::network::PortNetwork;
use pw_core::tree::EndpointTree;
use serde::{Deserialize, Serialize};

/// One persisted connection, as recorded on its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// The widget-owned endpoint whose link set holds `partner`.
    pub owner: EndpointId,
    pub partner: EndpointId,
}

pub struct ConnectionMutator<'a> {
    trees: [&'a mut EndpointTree; 2],
    network: &'a mut dyn PortNetwork,
}

impl<'a> ConnectionMutator<'a> {
    pub fn new(
        source: &'a mut EndpointTree,
        target: &'a mut EndpointTree,
        network: &'a mut dyn PortNetwork,
    ) -> Self {
        Self {
            trees: [source, target],
            network,
        }
    }

    fn find(&self, id: EndpointId) -> Option<&Endpoint> {
        self.trees.iter().find_map(|tree| tree.get(id))
    }

    fn find_mut(&mut self, id: EndpointId) -> Option<&mut Endpoint> {
        self.trees.iter_mut().find_map(|tree| tree.get_mut(id))
    }

    /// Connect two endpoints.
    ///
    /// Returns the new link, or `None` if the owner already held it.
    ///
    /// # Panics
    /// Unless both endpoints are ports in opposite directions and exactly
    /// one of them is widget-owned. The resolver only pairs endpoints the
    /// oracle accepted, so a violation here is a broken oracle.
    pub fn connect(&mut self, a: EndpointId, b: EndpointId) -> Option<Link> {
        let (a_port, b_port) = match (
            self.find(a).and_then(Endpoint::as_port),
            self.find(b).and_then(Endpoint::as_port),
        ) {
            (Some(a_port), Some(b_port)) => (a_port, b_port),
            _ => panic!("cannot connect {a} and {b}: both must be ports"),
        };
        assert!(
            a_port.is_widget_owned() != b_port.is_widget_owned(),
            "cannot connect {a} and {b}: exactly one must be widget-owned"
        );
        assert!(
            a_port.direction != b_port.direction,
            "cannot connect {a} and {b}: directions must be opposite"
        );

        let link = if a_port.is_widget_owned() {
            Link {
                owner: a,
                partner: b,
            }
        } else {
            Link {
                owner: b,
                partner: a,
            }
        };
        self.restore(link).then_some(link)
    }

    /// Re-establish a link. Returns `false` if it was already present.
    pub fn restore(&mut self, link: Link) -> bool {
        let Some(port) = self.find_mut(link.owner).and_then(Endpoint::as_port_mut) else {
            log::warn!("cannot restore link: owner {} is gone", link.owner);
            return false;
        };
        let direction = port.direction;
        let added = !port.is_linked_to(link.partner);
        if added {
            port.links.push(link.partner);
        }

        match direction {
            Direction::Output => self.network.link(link.owner, link.partner),
            Direction::Input => self.network.link(link.partner, link.owner),
        }
        if added {
            log::debug!("linked {} -> {}", link.owner, link.partner);
        }
        added
    }

    /// Remove one link. Returns `false` if it did not exist.
    pub fn disconnect(&mut self, link: Link) -> bool {
        let removed = match self.find_mut(link.owner).and_then(Endpoint::as_port_mut) {
            Some(port) => {
                let before = port.links.len();
                port.links.retain(|p| *p != link.partner);
                port.links.len() != before
            }
            None => false,
        };
        if removed {
            self.network.unlink(link.owner, link.partner);
            log::debug!("unlinked {} -> {}", link.owner, link.partner);
        }
        removed
    }

    /// Remove every connection touching `id` and force-disconnect the port.
    /// Returns the recorded links that were removed; calling it again
    /// returns nothing.
    pub fn remove_connections(&mut self, id: EndpointId) -> Vec<Link> {
        let Some(port) = self.find(id).and_then(Endpoint::as_port) else {
            return Vec::new();
        };

        let removed: Vec<Link> = if port.is_widget_owned() {
            port.links
                .iter()
                .map(|&partner| Link { owner: id, partner })
                .collect()
        } else {
            self.trees
                .iter()
                .flat_map(|tree| tree.referencing(id))
                .map(|owner| Link { owner, partner: id })
                .collect()
        };

        for link in &removed {
            self.disconnect(*link);
        }
        // The network may hold links no link set records.
        self.network.disconnect_all(id);
        removed
    }

    /// Number of connections touching `id`, from either end.
    pub fn connection_count(&self, id: EndpointId) -> usize {
        connection_count([&*self.trees[0], &*self.trees[1]], id)
    }
}

/// Number of connections touching `id` across both trees.
pub fn connection_count(trees: [&EndpointTree; 2], id: EndpointId) -> usize {
    let Some(port) = trees.iter().find_map(|tree| tree.get(id)).and_then(Endpoint::as_port) else {
        return 0;
    };
    if port.is_widget_owned() {
        port.links.len()
    } else {
        trees.iter().map(|tree| tree.referencing(id).len()).sum()
    }
}
