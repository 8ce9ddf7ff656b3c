//! Port network: the external port API that actually carries data.
//!
//! The editor records connections on widget-owned endpoints; the network is
//! told about each change so the underlying ports link or unlink. Hosts
//! bridge this trait to the remote framework. [`LinkTable`] is an in-memory
//! implementation for tests and offline editing.

use crate::id::EndpointId;

pub trait PortNetwork {
    /// Establish data flow from `output` to `input`.
    fn link(&mut self, output: EndpointId, input: EndpointId);

    /// Remove the link between two ports, in either direction.
    fn unlink(&mut self, a: EndpointId, b: EndpointId);

    /// Drop every link touching `port`.
    fn disconnect_all(&mut self, port: EndpointId);
}

/// In-memory set of `(output, input)` links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable {
    links: Vec<(EndpointId, EndpointId)>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_linked(&self, a: EndpointId, b: EndpointId) -> bool {
        self.links
            .iter()
            .any(|&(o, i)| (o == a && i == b) || (o == b && i == a))
    }

    /// Ports linked to `port`, in link creation order.
    pub fn partners_of(&self, port: EndpointId) -> Vec<EndpointId> {
        self.links
            .iter()
            .filter_map(|&(o, i)| {
                if o == port {
                    Some(i)
                } else if i == port {
                    Some(o)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn links(&self) -> &[(EndpointId, EndpointId)] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl PortNetwork for LinkTable {
    fn link(&mut self, output: EndpointId, input: EndpointId) {
        if !self.is_linked(output, input) {
            self.links.push((output, input));
        }
    }

    fn unlink(&mut self, a: EndpointId, b: EndpointId) {
        self.links
            .retain(|&(o, i)| !((o == a && i == b) || (o == b && i == a)));
    }

    fn disconnect_all(&mut self, port: EndpointId) {
        self.links.retain(|&(o, i)| o != port && i != port);
    }
}
