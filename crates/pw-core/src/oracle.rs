//! Compatibility oracle: may two endpoints be connected, and how well.
//!
//! The resolver treats the oracle as a black box. Any
//! `Fn(&Endpoint, &Endpoint) -> bool` closure is an oracle, which keeps
//! resolver tests independent of port semantics; [`PortOracle`] is the
//! stock implementation driven by direction, ownership and data type.

use crate::model::{Endpoint, Port, PortKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Quality of a connection. Totally ordered, worst first, so the worst
/// rating of a match is simply the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    Impossible,
    ExplicitConversion,
    ImplicitConversion,
    NoConversion,
}

pub trait CompatibilityOracle {
    /// Whether `a` and `b` may be connected (order-insensitive).
    fn is_compatible(&self, a: &Endpoint, b: &Endpoint) -> bool;

    /// Rating of the connection. Defaults to `NoConversion` whenever the
    /// pair is compatible.
    fn rate(&self, a: &Endpoint, b: &Endpoint) -> Rating {
        if self.is_compatible(a, b) {
            Rating::NoConversion
        } else {
            Rating::Impossible
        }
    }
}

impl<F> CompatibilityOracle for F
where
    F: Fn(&Endpoint, &Endpoint) -> bool,
{
    fn is_compatible(&self, a: &Endpoint, b: &Endpoint) -> bool {
        self(a, b)
    }
}

/// Port-semantics oracle.
///
/// A pair is compatible when both are ports of opposite direction and
/// opposite ownership, they belong to the same family (RPC only pairs with
/// RPC), and their data types are equal or listed in the conversion table.
#[derive(Debug, Clone, Default)]
pub struct PortOracle {
    conversions: HashMap<(String, String), Rating>,
}

impl PortOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow data flowing from `from` to `to` with the given rating.
    pub fn with_conversion(mut self, from: &str, to: &str, rating: Rating) -> Self {
        self.conversions
            .insert((from.to_string(), to.to_string()), rating);
        self
    }

    fn rate_ports(&self, a: &Port, b: &Port) -> Rating {
        if a.direction == b.direction || a.ownership == b.ownership {
            return Rating::Impossible;
        }
        if (a.kind == PortKind::Rpc) != (b.kind == PortKind::Rpc) {
            return Rating::Impossible;
        }
        if a.data_type == b.data_type {
            return Rating::NoConversion;
        }
        let (output, input) = if a.direction == crate::model::Direction::Output {
            (a, b)
        } else {
            (b, a)
        };
        self.conversions
            .get(&(output.data_type.clone(), input.data_type.clone()))
            .copied()
            .unwrap_or(Rating::Impossible)
    }
}

impl CompatibilityOracle for PortOracle {
    fn is_compatible(&self, a: &Endpoint, b: &Endpoint) -> bool {
        self.rate(a, b) > Rating::Impossible
    }

    fn rate(&self, a: &Endpoint, b: &Endpoint) -> Rating {
        match (a.as_port(), b.as_port()) {
            (Some(pa), Some(pb)) => self.rate_ports(pa, pb),
            _ => Rating::Impossible,
        }
    }
}
