//! Wires
//!
//! A wire is a directed edge carrying one bit from a source node to a target
//! node.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Stable identifier for a wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireId(String);

impl WireId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WireId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WireId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A wire between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    id: WireId,
    source: NodeId,
    target: NodeId,

    /// Which output handle of the source the wire leaves from. Kept so the
    /// editor gets its edges back unchanged.
    source_port: Option<String>,

    /// Which input slot of the target the wire feeds (`"a"`, `"b"`, ...).
    /// Purely cosmetic: every gate we evaluate is either commutative or
    /// single-input.
    target_port: Option<String>,
}

impl Wire {
    pub fn new(
        id: impl Into<WireId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_port: None,
            target_port: None,
        }
    }

    /// Tag the input slot this wire feeds.
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.target_port = Some(port.into());
        self
    }

    pub fn with_source_port(mut self, port: impl Into<String>) -> Self {
        self.source_port = Some(port.into());
        self
    }

    pub fn id(&self) -> &WireId {
        &self.id
    }

    /// The node driving this wire.
    pub fn source(&self) -> &NodeId {
        &self.source
    }

    /// The node reading this wire.
    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn source_port(&self) -> Option<&str> {
        self.source_port.as_deref()
    }

    pub fn target_port(&self) -> Option<&str> {
        self.target_port.as_deref()
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.id, self.source, self.target)?;
        if let Some(port) = &self.target_port {
            write!(f, ".{port}")?;
        }
        Ok(())
    }
}
