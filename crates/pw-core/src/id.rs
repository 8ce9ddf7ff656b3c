use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for endpoint URIs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned endpoint URI (e.g. `/Main/Sensors/Distance`).
/// Internally a 4-byte `Spur` index, so copies and comparisons are cheap.
///
/// Connections are stored as links between URIs, so two endpoints with the
/// same URI are the same endpoint regardless of which tree object holds them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointId(Spur);

impl EndpointId {
    /// Intern a URI as an EndpointId, or return the existing one.
    pub fn intern(uri: &str) -> Self {
        EndpointId(INTERNER.get_or_intern(uri))
    }

    /// Resolve back to the URI string.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Last path segment of the URI, used as a fallback display label.
    pub fn leaf(&self) -> &str {
        let uri = self.as_str();
        uri.rsplit('/').find(|s| !s.is_empty()).unwrap_or(uri)
    }
}

impl fmt::Debug for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.as_str())
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EndpointId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EndpointId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(EndpointId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = EndpointId::intern("/Main/Controller/Speed");
        let b = EndpointId::intern("/Main/Controller/Speed");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "/Main/Controller/Speed");
    }

    #[test]
    fn leaf_is_last_segment() {
        assert_eq!(EndpointId::intern("/Main/Controller/Speed").leaf(), "Speed");
        assert_eq!(EndpointId::intern("/Main/Sensors/").leaf(), "Sensors");
        assert_eq!(EndpointId::intern("plain").leaf(), "plain");
    }
}
