//! Host Wire Format
//!
//! The editor describes its graph as a list of nodes and a list of edges:
//!
//! ```json
//! {
//!   "nodes": [
//!     {"id": "1", "type": "input", "position": {"x": 0, "y": 0},
//!      "data": {"label": "Input A", "value": 1}},
//!     {"id": "3", "type": "andGate", "data": {"label": "AND Gate", "value": 0}}
//!   ],
//!   "edges": [
//!     {"id": "e1-3", "source": "1", "target": "3", "targetHandle": "a"}
//!   ]
//! }
//! ```
//!
//! This module maps that format onto [`Node`] and [`Wire`]. Node `type`
//! strings are the one place an unknown kind can enter the engine, so they
//! are checked here and rejected with [`Error::InvalidGateKind`]. The
//! explicit `"unknown"` type is accepted and becomes [`NodeKind::Unknown`].
//!
//! Fields the engine does not interpret (`draggable`, `selected`, ...) are
//! kept on each [`HostNode`] and come back unchanged in the step response,
//! so a host may replace its node list with the response wholesale.
//!
//! Snapshots can also travel as MessagePack for binary transports.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::gate::GateKind;
use crate::graph::{Circuit, Node, NodeId, NodeKind, Position, Wire};
use crate::simulator::{Simulator, StepOutcome};

/// Editor type string for every known kind.
const TYPE_NAMES: [(&str, GateKind); 7] = [
    ("andGate", GateKind::And),
    ("orGate", GateKind::Or),
    ("notGate", GateKind::Not),
    ("nandGate", GateKind::Nand),
    ("norGate", GateKind::Nor),
    ("xorGate", GateKind::Xor),
    ("xnorGate", GateKind::Xnor),
];

/// Map an editor `type` string to a node kind. `label` names the class of
/// an `"unknown"` node.
pub fn kind_from_type(node: &NodeId, type_name: &str, label: &str) -> Result<NodeKind> {
    match type_name {
        "input" => Ok(NodeKind::Input),
        "output" => Ok(NodeKind::Output),
        "unknown" => Ok(NodeKind::Unknown(label.to_string())),
        other => TYPE_NAMES
            .iter()
            .find(|(name, _)| *name == other)
            .map(|(_, gate)| NodeKind::Gate(*gate))
            .ok_or_else(|| Error::InvalidGateKind {
                node: node.clone(),
                kind: other.to_string(),
            }),
    }
}

/// The editor `type` string for a node kind.
pub fn type_of(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Input => "input",
        NodeKind::Output => "output",
        NodeKind::Unknown(_) => "unknown",
        NodeKind::Gate(gate) => TYPE_NAMES
            .iter()
            .find(|(_, g)| g == gate)
            .map(|(name, _)| *name)
            .unwrap_or("unknown"),
    }
}

/// Per-node payload the editor keeps next to the node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostNodeData {
    #[serde(default)]
    pub label: String,

    /// 0 or 1; absent before the first evaluation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
}

/// A node as the editor serialises it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: HostNodeData,

    /// Editor-only fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HostNode {
    /// Convert into an engine node, validating the kind.
    pub fn into_node(self) -> Result<Node> {
        let id = NodeId::from(self.id);
        let kind = kind_from_type(&id, &self.kind, &self.data.label)?;
        let mut node = Node::new(id, kind)
            .with_label(self.data.label)
            .at(self.position);
        node.set_value(self.data.value.map(|v| v != 0));
        Ok(node)
    }
}

impl From<&Node> for HostNode {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id().to_string(),
            kind: type_of(node.kind()).to_string(),
            position: node.position(),
            data: HostNodeData {
                label: node.label().to_string(),
                value: node.value().map(u8::from),
            },
            extra: Map::new(),
        }
    }
}

/// An edge as the editor serialises it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl From<HostEdge> for Wire {
    fn from(edge: HostEdge) -> Self {
        let mut wire = Wire::new(edge.id, edge.source, edge.target);
        if let Some(port) = edge.source_handle {
            wire = wire.with_source_port(port);
        }
        if let Some(port) = edge.target_handle {
            wire = wire.with_port(port);
        }
        wire
    }
}

impl From<&Wire> for HostEdge {
    fn from(wire: &Wire) -> Self {
        Self {
            id: wire.id().to_string(),
            source: wire.source().to_string(),
            target: wire.target().to_string(),
            source_handle: wire.source_port().map(str::to_string),
            target_handle: wire.target_port().map(str::to_string),
        }
    }
}

/// The whole graph as the editor sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshot {
    #[serde(default)]
    pub nodes: Vec<HostNode>,
    #[serde(default, alias = "wires")]
    pub edges: Vec<HostEdge>,
}

impl HostSnapshot {
    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Describe an engine snapshot in the editor's format.
    pub fn from_parts(nodes: &[Node], wires: &[Wire]) -> Self {
        Self {
            nodes: nodes.iter().map(HostNode::from).collect(),
            edges: wires.iter().map(HostEdge::from).collect(),
        }
    }

    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self {
            nodes: circuit.nodes().map(HostNode::from).collect(),
            edges: circuit.wires().map(HostEdge::from).collect(),
        }
    }

    /// Convert into engine nodes and wires, validating every node kind.
    /// Wire endpoints are checked later by the driver.
    pub fn into_parts(self) -> Result<(Vec<Node>, Vec<Wire>)> {
        let nodes = self
            .nodes
            .into_iter()
            .map(HostNode::into_node)
            .collect::<Result<Vec<_>>>()?;
        let wires = self.edges.into_iter().map(Wire::from).collect();
        Ok((nodes, wires))
    }

    /// Build an editable circuit from the snapshot.
    pub fn into_circuit(self) -> Result<Circuit> {
        let (nodes, wires) = self.into_parts()?;
        Circuit::from_parts(nodes, wires)
    }
}

/// What the host gets back from a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostStepResponse {
    pub nodes: Vec<HostNode>,
    pub changed: bool,
    #[serde(default)]
    pub changed_ids: Vec<String>,
}

impl HostStepResponse {
    /// Answer with the host's own nodes, carrying the new values.
    ///
    /// `nodes` must be the snapshot the outcome was computed from, in the
    /// same order.
    pub fn with_host_nodes(mut nodes: Vec<HostNode>, outcome: &StepOutcome) -> Self {
        for (host, node) in nodes.iter_mut().zip(&outcome.nodes) {
            host.data.value = node.value().map(u8::from);
        }
        Self {
            nodes,
            changed: outcome.changed,
            changed_ids: outcome.changed_ids.iter().map(NodeId::to_string).collect(),
        }
    }
}

/// Run one step over a JSON snapshot and answer in JSON.
pub fn step_json(simulator: &Simulator, snapshot: &str) -> Result<String> {
    let snapshot = HostSnapshot::from_json(snapshot)?;
    let host_nodes = snapshot.nodes.clone();
    let (nodes, wires) = snapshot.into_parts()?;
    debug!(nodes = nodes.len(), wires = wires.len(), "decoded host snapshot");
    let outcome = simulator.step(&nodes, &wires)?;
    let response = HostStepResponse::with_host_nodes(host_nodes, &outcome);
    Ok(serde_json::to_string(&response)?)
}

/// Encode a snapshot as MessagePack, keeping field names.
pub fn to_msgpack(snapshot: &HostSnapshot) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(snapshot)?)
}

/// Decode a MessagePack snapshot.
pub fn from_msgpack(bytes: &[u8]) -> Result<HostSnapshot> {
    Ok(rmp_serde::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AND_DEMO: &str = r#"{
        "nodes": [
            {"id": "1", "position": {"x": 0, "y": 0}, "data": {"label": "Input A", "value": 1}, "type": "input", "draggable": true},
            {"id": "2", "position": {"x": 0, "y": 100}, "data": {"label": "Input B", "value": 0}, "type": "input", "draggable": true},
            {"id": "3", "position": {"x": 200, "y": 50}, "data": {"label": "AND Gate", "value": 0}, "type": "andGate", "draggable": true},
            {"id": "4", "position": {"x": 400, "y": 50}, "data": {"label": "Output", "value": 0}, "type": "output", "draggable": true}
        ],
        "edges": [
            {"id": "e1-3", "source": "1", "target": "3", "sourceHandle": null, "targetHandle": "a"},
            {"id": "e2-3", "source": "2", "target": "3", "sourceHandle": null, "targetHandle": "b"},
            {"id": "e3-4", "source": "3", "target": "4"}
        ]
    }"#;

    #[test]
    fn decode_editor_snapshot() {
        let (nodes, wires) = HostSnapshot::from_json(AND_DEMO)
            .unwrap()
            .into_parts()
            .unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[2].kind(), &NodeKind::Gate(GateKind::And));
        assert_eq!(nodes[0].value(), Some(true));
        assert_eq!(nodes[1].position(), Position::new(0.0, 100.0));
        assert_eq!(wires[1].target_port(), Some("b"));
        assert_eq!(wires[2].target_port(), None);
    }

    #[test]
    fn step_json_answers_with_values() {
        let response = step_json(&Simulator::default(), AND_DEMO).unwrap();
        let response: HostStepResponse = serde_json::from_str(&response).unwrap();
        assert!(!response.changed);
        assert_eq!(response.nodes[3].data.value, Some(0));
    }

    #[test]
    fn step_json_keeps_editor_fields() {
        let json = r#"{
            "nodes": [
                {"id": "1", "type": "input", "data": {"label": "A", "value": 1},
                 "draggable": true, "selected": false, "style": {"width": 80}},
                {"id": "2", "type": "notGate", "data": {"label": "NOT Gate"}}
            ],
            "edges": [{"id": "e1-2", "source": "1", "target": "2", "sourceHandle": "out"}]
        }"#;
        let response = step_json(&Simulator::default(), json).unwrap();
        let response: HostStepResponse = serde_json::from_str(&response).unwrap();

        let input = &response.nodes[0];
        assert_eq!(input.extra["draggable"], Value::Bool(true));
        assert_eq!(input.extra["selected"], Value::Bool(false));
        assert_eq!(input.extra["style"]["width"], 80);
        assert!(response.nodes[1].extra.is_empty());
        assert_eq!(response.nodes[1].data.value, Some(0));
        assert_eq!(response.changed_ids, ["2"]);
    }

    #[test]
    fn edge_handles_survive_a_circuit_round_trip() {
        let circuit = HostSnapshot::from_json(AND_DEMO)
            .unwrap()
            .into_circuit()
            .unwrap();
        let json = r#"{"id": "e1-3", "source": "1", "target": "3",
                       "sourceHandle": "out", "targetHandle": "a"}"#;
        let edge: HostEdge = serde_json::from_str(json).unwrap();
        let wire = Wire::from(edge.clone());
        assert_eq!(wire.source_port(), Some("out"));
        assert_eq!(HostEdge::from(&wire), edge);

        let snapshot = HostSnapshot::from_circuit(&circuit);
        assert_eq!(snapshot.edges[0].source_handle, None);
        assert_eq!(snapshot.edges[0].target_handle.as_deref(), Some("a"));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let json = r#"{"nodes": [{"id": "7", "type": "muxGate", "data": {"label": "MUX"}}]}"#;
        match HostSnapshot::from_json(json).unwrap().into_parts() {
            Err(Error::InvalidGateKind { node, kind }) => {
                assert_eq!(node.as_str(), "7");
                assert_eq!(kind, "muxGate");
            }
            other => panic!("expected invalid kind, got {other:?}"),
        }
    }

    #[test]
    fn explicit_unknown_keeps_its_class() {
        let json = r#"{"nodes": [{"id": "7", "type": "unknown", "data": {"label": "MUX"}}]}"#;
        let (nodes, _) = HostSnapshot::from_json(json).unwrap().into_parts().unwrap();
        assert_eq!(nodes[0].kind(), &NodeKind::Unknown("MUX".into()));
        assert_eq!(nodes[0].value(), None);
    }

    #[test]
    fn type_names_cover_every_gate() {
        for gate in GateKind::ALL {
            let kind = NodeKind::Gate(gate);
            let parsed = kind_from_type(&NodeId::from("n"), type_of(&kind), "").unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn msgpack_carries_the_snapshot() {
        let snapshot = HostSnapshot::from_json(AND_DEMO).unwrap();
        let bytes = to_msgpack(&snapshot).unwrap();
        assert_eq!(from_msgpack(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            step_json(&Simulator::default(), "{\"nodes\": 3}"),
            Err(Error::Json(_))
        ));
    }
}
