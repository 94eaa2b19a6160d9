//! Built-in circuits.

use crate::error::Result;
use crate::gate::GateKind;
use crate::graph::{Circuit, NodeKind, Position};

/// The circuit the editor opens with: two inputs into an AND gate driving
/// an output, all at 0.
pub fn and_demo() -> Result<Circuit> {
    let mut circuit = Circuit::new();
    let a = circuit.add_node_at(NodeKind::Input, Some("Input A"), Position::new(0.0, 0.0));
    let b = circuit.add_node_at(NodeKind::Input, Some("Input B"), Position::new(0.0, 100.0));
    let and = circuit.add_node_at(GateKind::And.into(), None, Position::new(200.0, 50.0));
    let out = circuit.add_node_at(NodeKind::Output, None, Position::new(400.0, 50.0));

    circuit.connect(&a, &and, Some("a"))?;
    circuit.connect(&b, &and, Some("b"))?;
    circuit.connect(&and, &out, None)?;
    Ok(circuit)
}
