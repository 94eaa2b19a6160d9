//! Editable Circuit
//!
//! [`Circuit`] is the caller-side owner of a graph: the thing an editor
//! mutates when the user drops a gate, draws a wire, or flips an input. It
//! keeps nodes and wires in insertion order and allocates ids from its own
//! counter, so two circuits never interfere with each other.
//!
//! The engine never sees a `Circuit` directly. [`Circuit::simulate`] hands
//! the driver a borrowed snapshot and adopts the returned values.

use indexmap::IndexMap;
use tracing::debug;

use super::node::{Node, NodeId, NodeKind, Position};
use super::wire::{Wire, WireId};
use crate::error::{Error, Result};
use crate::simulator::{Simulator, StepOutcome};

/// Monotonic id source owned by a single circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    next_node: u64,
    next_wire: u64,
}

impl IdGenerator {
    /// Create a generator starting at id 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator whose first node id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next_node: first,
            next_wire: 1,
        }
    }

    /// Allocate the next node id.
    ///
    /// The counter wraps at `u64::MAX`; uniqueness within a circuit is
    /// enforced by [`Circuit`], which skips ids it already holds.
    pub fn node_id(&mut self) -> NodeId {
        let id = NodeId::from(self.next_node);
        self.next_node = self.next_node.wrapping_add(1);
        id
    }

    /// Allocate a wire id, named after its endpoints like the editor does
    /// (`e1-3`). The counter suffix keeps parallel wires distinct.
    pub fn wire_id(&mut self, source: &NodeId, target: &NodeId) -> WireId {
        let id = WireId::from(format!("e{source}-{target}-{}", self.next_wire));
        self.next_wire = self.next_wire.wrapping_add(1);
        id
    }

    /// Bump the node counter past a caller-chosen numeric id so later
    /// allocations do not collide with it.
    fn observe(&mut self, id: &NodeId) {
        if let Some(next) = id
            .as_str()
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_add(1))
        {
            self.next_node = self.next_node.max(next);
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A mutable circuit graph with its own id allocator.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    nodes: IndexMap<NodeId, Node>,
    wires: IndexMap<WireId, Wire>,
    ids: IdGenerator,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a circuit from an existing snapshot, checking ids and wire
    /// endpoints.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        wires: impl IntoIterator<Item = Wire>,
    ) -> Result<Self> {
        let mut circuit = Self::new();
        for node in nodes {
            circuit.insert_node(node)?;
        }
        for wire in wires {
            circuit.insert_wire(wire)?;
        }
        Ok(circuit)
    }

    /// Add a node of `kind` at the origin. It starts at 0, as every freshly
    /// placed node does in the editor.
    pub fn add_node(&mut self, kind: NodeKind, label: Option<&str>) -> NodeId {
        self.add_node_at(kind, label, Position::default())
    }

    /// Add a node of `kind` at `position`.
    pub fn add_node_at(
        &mut self,
        kind: NodeKind,
        label: Option<&str>,
        position: Position,
    ) -> NodeId {
        let id = self.fresh_node_id();
        let mut node = Node::new(id.clone(), kind).with_value(false).at(position);
        if let Some(label) = label {
            node.set_label(label);
        }
        debug!(node = %id, kind = %node.kind(), "node added");
        self.nodes.insert(id.clone(), node);
        id
    }

    /// Insert a node that already carries its id.
    pub fn insert_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(node.id()) {
            return Err(Error::DuplicateNode(node.id().clone()));
        }
        self.ids.observe(node.id());
        self.nodes.insert(node.id().clone(), node);
        Ok(())
    }

    /// Draw a wire from `source` to `target`.
    pub fn connect(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        port: Option<&str>,
    ) -> Result<WireId> {
        let id = self.fresh_wire_id(source, target);
        let mut wire = Wire::new(id.clone(), source.clone(), target.clone());
        if let Some(port) = port {
            wire = wire.with_port(port);
        }
        self.insert_wire(wire)?;
        Ok(id)
    }

    fn fresh_node_id(&mut self) -> NodeId {
        loop {
            let id = self.ids.node_id();
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    /// Wires inserted from a snapshot may already use the generator's
    /// names, so allocation skips any id the circuit holds.
    fn fresh_wire_id(&mut self, source: &NodeId, target: &NodeId) -> WireId {
        loop {
            let id = self.ids.wire_id(source, target);
            if !self.wires.contains_key(&id) {
                return id;
            }
        }
    }

    /// Insert a wire that already carries its id.
    pub fn insert_wire(&mut self, wire: Wire) -> Result<()> {
        if self.wires.contains_key(wire.id()) {
            return Err(Error::DuplicateWire(wire.id().clone()));
        }
        for end in [wire.source(), wire.target()] {
            if !self.nodes.contains_key(end) {
                return Err(Error::DanglingWireReference {
                    wire: wire.id().clone(),
                    node: end.clone(),
                });
            }
        }
        debug!(%wire, "wire added");
        self.wires.insert(wire.id().clone(), wire);
        Ok(())
    }

    /// Remove a node together with every wire touching it.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(id)?;
        self.wires
            .retain(|_, wire| wire.source() != id && wire.target() != id);
        debug!(node = %id, "node removed");
        Some(node)
    }

    pub fn remove_wire(&mut self, id: &WireId) -> Option<Wire> {
        self.wires.shift_remove(id)
    }

    /// Set the value of an input node.
    pub fn set_input(&mut self, id: &NodeId, value: bool) -> Result<()> {
        let node = self.input_mut(id)?;
        node.set_value(Some(value));
        Ok(())
    }

    /// Flip an input node, returning its new value.
    pub fn toggle_input(&mut self, id: &NodeId) -> Result<bool> {
        let node = self.input_mut(id)?;
        let value = !node.level();
        node.set_value(Some(value));
        debug!(node = %id, value, "input toggled");
        Ok(value)
    }

    fn input_mut(&mut self, id: &NodeId) -> Result<&mut Node> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| Error::UnknownNode(id.clone()))?;
        if !node.kind().is_input() {
            return Err(Error::NotAnInput(id.clone()));
        }
        Ok(node)
    }

    /// Discard every node and wire and restart id allocation.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.wires.clear();
        self.ids = IdGenerator::new();
    }

    /// Get a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn wire(&self, id: &WireId) -> Option<&Wire> {
        self.wires.get(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Wires in insertion order.
    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values()
    }

    /// Wires ending at `id`.
    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Wire> {
        self.wires.values().filter(move |wire| wire.target() == id)
    }

    /// Wires starting at `id`.
    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Wire> {
        self.wires.values().filter(move |wire| wire.source() == id)
    }

    pub fn fan_in(&self, id: &NodeId) -> usize {
        self.incoming(id).count()
    }

    pub fn fan_out(&self, id: &NodeId) -> usize {
        self.outgoing(id).count()
    }

    /// Get the total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Copy the graph out as plain vectors, the form the driver consumes.
    pub fn snapshot(&self) -> (Vec<Node>, Vec<Wire>) {
        (
            self.nodes.values().cloned().collect(),
            self.wires.values().cloned().collect(),
        )
    }

    /// Run one simulation step and adopt its values.
    ///
    /// Returns whether any value changed. On error nothing is modified.
    pub fn simulate(&mut self, simulator: &Simulator) -> Result<bool> {
        let (nodes, wires) = self.snapshot();
        let outcome = simulator.step(&nodes, &wires)?;
        Ok(self.apply(outcome))
    }

    /// Adopt the values of a step outcome. Nodes the outcome does not know
    /// about are left alone.
    pub fn apply(&mut self, outcome: StepOutcome) -> bool {
        for node in outcome.nodes {
            if let Some(existing) = self.nodes.get_mut(node.id()) {
                existing.set_value(node.value());
            }
        }
        outcome.changed
    }
}
