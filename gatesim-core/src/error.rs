//! Error Types
//!
//! Every failure the engine can report. Errors are local to a single call:
//! nothing here implies the caller's circuit was modified.

use thiserror::Error;

use crate::gate::{Arity, GateKind};
use crate::graph::{NodeId, WireId};

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while validating, ordering, or encoding a circuit.
#[derive(Debug, Error)]
pub enum Error {
    /// A node names a kind outside the known set. This points at corrupted
    /// host data and is never silently mapped to a constant.
    #[error("node {node} has unrecognised kind {kind:?}")]
    InvalidGateKind { node: NodeId, kind: String },

    /// The graph is not acyclic. `nodes` are the ones that could not be
    /// ordered; prior values are preserved.
    #[error("combinational loop through {} node(s): {}", .nodes.len(), join(.nodes))]
    CycleDetected { nodes: Vec<NodeId> },

    /// A wire references a node that is not part of the snapshot.
    #[error("wire {wire} references missing node {node}")]
    DanglingWireReference { wire: WireId, node: NodeId },

    /// Two nodes in one snapshot share an id.
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    /// Two wires in one snapshot share an id.
    #[error("duplicate wire id {0}")]
    DuplicateWire(WireId),

    /// A gate has the wrong number of incoming wires (strict policy only).
    #[error("{kind} gate {node} expects {expected} input(s), found {found}")]
    ArityViolation {
        node: NodeId,
        kind: GateKind,
        expected: Arity,
        found: usize,
    },

    /// An output terminal is driven by more than one wire (strict policy
    /// only).
    #[error("output {node} expects {expected} input(s), found {found}")]
    InvalidOutputFanIn {
        node: NodeId,
        expected: Arity,
        found: usize,
    },

    /// An editor operation named a node that does not exist.
    #[error("no node with id {0}")]
    UnknownNode(NodeId),

    /// Only input nodes can be set or toggled.
    #[error("node {0} is not an input")]
    NotAnInput(NodeId),

    /// JSON could not be read or written.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// A snapshot could not be written as MessagePack.
    #[error("msgpack encode: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// A MessagePack payload could not be read back.
    #[error("msgpack decode: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

fn join(ids: &[NodeId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
