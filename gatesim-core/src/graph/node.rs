//! Graph Nodes
//!
//! This module defines the node types that live in a circuit: input
//! terminals, output terminals, gates, and placeholders for unrecognised
//! detections.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gate::GateKind;

/// Stable identifier for a node in a circuit.
///
/// Ids are strings because hosts hand us their own ids verbatim; circuits
/// that allocate ids themselves use decimal counters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Get the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of node in a circuit. Fixed for the node's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A source terminal. Its value is set by the user and never computed.
    Input,

    /// A sink terminal. Adopts the value of its first incoming wire.
    Output,

    /// A logic gate.
    Gate(GateKind),

    /// A detection whose class did not map to any gate. Rendered, never
    /// evaluated, always 0. Carries the original class string.
    Unknown(String),
}

impl NodeKind {
    /// Inputs and unknown nodes are fixed during a pass; everything else is
    /// computed from its incoming wires.
    pub fn is_source(&self) -> bool {
        matches!(self, NodeKind::Input | NodeKind::Unknown(_))
    }

    /// Check if this is an input terminal.
    pub fn is_input(&self) -> bool {
        matches!(self, NodeKind::Input)
    }

    /// The gate kind, if this node is a gate.
    pub fn gate(&self) -> Option<GateKind> {
        match self {
            NodeKind::Gate(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Label shown on a freshly created node of this kind.
    pub fn default_label(&self) -> String {
        match self {
            NodeKind::Input => "Input".to_string(),
            NodeKind::Output => "Output".to_string(),
            NodeKind::Gate(kind) => kind.default_label(),
            NodeKind::Unknown(class) => class.clone(),
        }
    }
}

impl From<GateKind> for NodeKind {
    fn from(kind: GateKind) -> Self {
        NodeKind::Gate(kind)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Input => f.write_str("input"),
            NodeKind::Output => f.write_str("output"),
            NodeKind::Gate(kind) => kind.fmt(f),
            NodeKind::Unknown(class) => write!(f, "unknown({class})"),
        }
    }
}

/// Canvas position of a node. Carried through untouched by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node in a circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier for this node.
    id: NodeId,

    /// What kind of node this is.
    kind: NodeKind,

    /// Display label; irrelevant to evaluation.
    label: String,

    /// Current value. `None` until the first evaluation pass (or until an
    /// input is first set).
    value: Option<bool>,

    /// Where the node sits on the canvas.
    position: Position,
}

impl Node {
    /// Create a node with the kind's default label and no value yet.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: kind.default_label(),
            kind,
            value: None,
            position: Position::default(),
        }
    }

    /// Create an input node.
    pub fn input(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Input)
    }

    /// Create an output node.
    pub fn output(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Output)
    }

    /// Create a gate node.
    pub fn gate(id: impl Into<NodeId>, kind: GateKind) -> Self {
        Self::new(id, NodeKind::Gate(kind))
    }

    /// Replace the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Replace the value.
    pub fn with_value(mut self, value: bool) -> Self {
        self.value = Some(value);
        self
    }

    /// Place the node on the canvas.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Get the node's ID.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Get the node's kind.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the current value, if one has been assigned.
    pub fn value(&self) -> Option<bool> {
        self.value
    }

    /// Get the current value, reading an unassigned value as 0.
    pub fn level(&self) -> bool {
        self.value.unwrap_or(false)
    }

    /// Overwrite the current value.
    pub fn set_value(&mut self, value: Option<bool>) {
        self.value = value;
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
}
