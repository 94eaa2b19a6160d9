//! Integration Tests for the Evaluation Engine
//!
//! These tests drive the engine the way a host does: mutate a circuit,
//! step, read values back.

use gatesim_core::codec::{self, HostSnapshot, HostStepResponse};
use gatesim_core::config::{EngineConfig, RecognitionConfig};
use gatesim_core::gate::GateKind;
use gatesim_core::graph::{Circuit, Node, NodeId, NodeKind, Wire};
use gatesim_core::recognition::{self, DetectionResponse};
use gatesim_core::samples;
use gatesim_core::simulator::Simulator;
use gatesim_core::Error;

fn value(circuit: &Circuit, id: &NodeId) -> Option<bool> {
    circuit.node(id).and_then(Node::value)
}

/// Input A=1, Input B=0 into an AND into an output; then flip B.
#[test]
fn and_gate_end_to_end() {
    let simulator = Simulator::default();
    let mut circuit = Circuit::new();
    let a = circuit.add_node(NodeKind::Input, Some("Input A"));
    let b = circuit.add_node(NodeKind::Input, Some("Input B"));
    let and = circuit.add_node(GateKind::And.into(), None);
    let out = circuit.add_node(NodeKind::Output, None);
    circuit.connect(&a, &and, Some("a")).unwrap();
    circuit.connect(&b, &and, Some("b")).unwrap();
    circuit.connect(&and, &out, None).unwrap();

    circuit.set_input(&a, true).unwrap();
    circuit.simulate(&simulator).unwrap();
    assert_eq!(value(&circuit, &out), Some(false));

    circuit.toggle_input(&b).unwrap();
    assert!(circuit.simulate(&simulator).unwrap());
    assert_eq!(value(&circuit, &out), Some(true));
}

/// Input(1) -> NOT -> NOT -> Output yields 1.
#[test]
fn double_negation_chain() {
    // Listed output-first so snapshot order disagrees with wire order.
    let nodes = vec![
        Node::output("out"),
        Node::gate("not2", GateKind::Not),
        Node::gate("not1", GateKind::Not),
        Node::input("in").with_value(true),
    ];
    let wires = vec![
        Wire::new("w3", "not2", "out"),
        Wire::new("w2", "not1", "not2"),
        Wire::new("w1", "in", "not1"),
    ];
    let outcome = Simulator::default().step(&nodes, &wires).unwrap();
    assert_eq!(outcome.nodes[0].value(), Some(true));
    assert_eq!(outcome.nodes[1].value(), Some(true));
    assert_eq!(outcome.nodes[2].value(), Some(false));
}

#[test]
fn step_is_idempotent_at_fixed_point() {
    let mut circuit = samples::and_demo().unwrap();
    let first = circuit.nodes().next().unwrap().id().clone();
    circuit.toggle_input(&first).unwrap();

    let (nodes, wires) = circuit.snapshot();
    let simulator = Simulator::default();
    let once = simulator.step(&nodes, &wires).unwrap();
    let twice = simulator.step(&once.nodes, &wires).unwrap();
    let thrice = simulator.step(&twice.nodes, &wires).unwrap();

    assert!(!twice.changed);
    assert_eq!(once.nodes, twice.nodes);
    assert_eq!(twice, thrice);
}

#[test]
fn fan_out_delivers_the_same_value() {
    let nodes = vec![
        Node::input("in").with_value(true),
        Node::gate("or", GateKind::Or),
        Node::gate("nand", GateKind::Nand),
    ];
    let wires = vec![Wire::new("e1", "in", "or"), Wire::new("e2", "in", "nand")];
    let outcome = Simulator::default().step(&nodes, &wires).unwrap();
    assert_eq!(outcome.nodes[1].value(), Some(true));
    assert_eq!(outcome.nodes[2].value(), Some(false));
}

#[test]
fn fan_in_order_does_not_matter() {
    let nodes = |kind| {
        vec![
            Node::input("a").with_value(true),
            Node::input("b").with_value(false),
            Node::input("c").with_value(true),
            Node::gate("g", kind),
        ]
    };
    let wires = ["a", "b", "c"].map(|src| Wire::new(format!("{src}-g"), src, "g"));
    let mut reversed = wires.clone();
    reversed.reverse();

    let simulator = Simulator::default();
    for kind in [GateKind::And, GateKind::Or, GateKind::Nand, GateKind::Nor] {
        let forward = simulator.step(&nodes(kind), &wires).unwrap();
        let backward = simulator.step(&nodes(kind), &reversed).unwrap();
        assert_eq!(forward.nodes[3].value(), backward.nodes[3].value(), "{kind}");
    }

    // Two-input gates with both orders of their pair.
    for kind in [GateKind::Xor, GateKind::Xnor] {
        let pair = [Wire::new("a-g", "a", "g"), Wire::new("b-g", "b", "g")];
        let swapped = [pair[1].clone(), pair[0].clone()];
        let forward = simulator.step(&nodes(kind), &pair).unwrap();
        let backward = simulator.step(&nodes(kind), &swapped).unwrap();
        assert_eq!(forward.nodes[3].value(), backward.nodes[3].value(), "{kind}");
    }
}

#[test]
fn not_loop_is_a_cycle_and_keeps_values() {
    let mut circuit = Circuit::new();
    let a = circuit.add_node(GateKind::Not.into(), None);
    let b = circuit.add_node(GateKind::Not.into(), None);
    circuit.connect(&a, &b, None).unwrap();
    circuit.connect(&b, &a, None).unwrap();
    let before: Vec<_> = circuit.nodes().cloned().collect();

    match circuit.simulate(&Simulator::default()) {
        Err(Error::CycleDetected { nodes }) => assert_eq!(nodes, vec![a, b]),
        other => panic!("expected a cycle, got {other:?}"),
    }
    let after: Vec<_> = circuit.nodes().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn dangling_wire_in_snapshot_is_rejected() {
    let nodes = vec![Node::input("1"), Node::output("2")];
    let wires = vec![Wire::new("e1-9", "1", "9")];
    assert!(matches!(
        Simulator::default().step(&nodes, &wires),
        Err(Error::DanglingWireReference { .. })
    ));
}

#[test]
fn strict_config_rejects_three_input_xor() {
    let simulator = Simulator::new(EngineConfig::strict());
    let nodes = vec![
        Node::input("a"),
        Node::input("b"),
        Node::input("c"),
        Node::gate("x", GateKind::Xor),
    ];
    let wires = ["a", "b", "c"].map(|src| Wire::new(src, src, "x"));
    assert!(matches!(
        simulator.step(&nodes, &wires),
        Err(Error::ArityViolation { .. })
    ));

    let lenient = Simulator::default().step(&nodes, &wires).unwrap();
    assert_eq!(lenient.nodes[3].value(), Some(false));
}

#[test]
fn editing_between_steps() {
    let simulator = Simulator::default();
    let mut circuit = samples::and_demo().unwrap();
    let ids: Vec<NodeId> = circuit.nodes().map(|n| n.id().clone()).collect();
    let (a, b, and, out) = (&ids[0], &ids[1], &ids[2], &ids[3]);

    // Swap the AND for an OR: remove it, add the OR, rewire.
    circuit.remove_node(and);
    assert_eq!(circuit.wire_count(), 0);
    let or = circuit.add_node(GateKind::Or.into(), None);
    assert_eq!(or.as_str(), "5");
    circuit.connect(a, &or, Some("a")).unwrap();
    circuit.connect(b, &or, Some("b")).unwrap();
    circuit.connect(&or, out, None).unwrap();

    circuit.toggle_input(a).unwrap();
    assert!(circuit.simulate(&simulator).unwrap());
    assert_eq!(value(&circuit, out), Some(true));

    // Disconnect the output: it falls back to 0.
    let wire = circuit.incoming(out).next().unwrap().id().clone();
    circuit.remove_wire(&wire);
    assert!(circuit.simulate(&simulator).unwrap());
    assert_eq!(value(&circuit, out), Some(false));
}

#[test]
fn json_host_round() {
    let circuit = samples::and_demo().unwrap();
    let mut snapshot = HostSnapshot::from_circuit(&circuit);
    for node in snapshot.nodes.iter_mut().filter(|n| n.kind == "input") {
        node.data.value = Some(1);
    }

    let response = codec::step_json(&Simulator::default(), &snapshot.to_json().unwrap()).unwrap();
    let response: HostStepResponse = serde_json::from_str(&response).unwrap();
    assert!(response.changed);
    assert_eq!(response.changed_ids, ["3", "4"]);
    assert_eq!(response.nodes[3].data.value, Some(1));
}

#[test]
fn detections_become_unwired_nodes() {
    let json = r#"{"detections": [
        {"class": "AND", "x": 120, "y": 80, "width": 60, "height": 40, "confidence": 0.93},
        {"class": "NOT", "x": 300, "y": 80, "width": 40, "height": 30, "confidence": 0.88},
        {"class": "LATCH", "x": 500, "y": 80, "width": 40, "height": 30, "confidence": 0.71}
    ]}"#;
    let response = DetectionResponse::from_json(json).unwrap();

    let mut circuit = samples::and_demo().unwrap();
    let config = RecognitionConfig::default();
    let placed = recognition::import_detections(&mut circuit, &response.detections, &config);
    assert_eq!(placed.len(), 3);
    assert_eq!(circuit.len(), 7);
    assert_eq!(circuit.wire_count(), 3);

    // The unwired NOT reads 0 and outputs 1; the unknown node is 0.
    circuit.simulate(&Simulator::default()).unwrap();
    assert_eq!(value(&circuit, &placed[0]), Some(false));
    assert_eq!(value(&circuit, &placed[1]), Some(true));
    assert_eq!(value(&circuit, &placed[2]), Some(false));
    assert_eq!(
        circuit.node(&placed[2]).unwrap().kind(),
        &NodeKind::Unknown("LATCH".into())
    );
}

#[test]
fn snapshot_rebuilds_circuit() {
    let original = samples::and_demo().unwrap();
    let rebuilt = HostSnapshot::from_circuit(&original).into_circuit().unwrap();
    assert_eq!(rebuilt.len(), original.len());
    assert_eq!(rebuilt.wire_count(), original.wire_count());
    let mut rebuilt = rebuilt;
    assert_eq!(rebuilt.add_node(NodeKind::Output, None).as_str(), "5");
}

/// Drawing a wire on a circuit rebuilt from its own snapshot must not
/// reuse an id the original circuit already handed out.
#[test]
fn rebuilt_circuit_accepts_new_wires() {
    let original = samples::and_demo().unwrap();
    let mut rebuilt = HostSnapshot::from_circuit(&original).into_circuit().unwrap();

    let (a, and) = (NodeId::from("1"), NodeId::from("3"));
    let wire = rebuilt.connect(&a, &and, Some("b")).unwrap();
    assert!(original.wire(&wire).is_none());
    assert_eq!(rebuilt.wire_count(), 4);
    assert_eq!(rebuilt.fan_in(&and), 3);
}

/// A snapshot naming the largest numeric id still loads and stays editable.
#[test]
fn snapshot_with_maximal_id_loads() {
    let json = r#"{"nodes": [
        {"id": "18446744073709551615", "type": "input", "data": {"label": "A", "value": 1}}
    ]}"#;
    let mut circuit = HostSnapshot::from_json(json).unwrap().into_circuit().unwrap();
    let out = circuit.add_node(NodeKind::Output, None);
    let max = NodeId::from("18446744073709551615");
    circuit.connect(&max, &out, None).unwrap();

    circuit.simulate(&Simulator::default()).unwrap();
    assert_eq!(value(&circuit, &out), Some(true));
}
