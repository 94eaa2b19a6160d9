//! Evaluation Scheduler
//!
//! The scheduler determines the order in which nodes are evaluated and then
//! evaluates them. It ensures every gate is computed after all the gates
//! that drive it.
//!
//! # Algorithm
//!
//! 1. Partition the snapshot into sources (inputs and unknown nodes, whose
//!    values are fixed for the pass) and computed nodes (gates, outputs).
//! 2. Count, for each computed node, the wires arriving from other computed
//!    nodes. That is its in-degree.
//! 3. Kahn's algorithm: repeatedly emit a computed node with in-degree 0 and
//!    decrement its dependents. The queue is seeded in snapshot order, so
//!    the resulting order is deterministic.
//! 4. Any computed node never emitted sits on, or downstream of, a cycle.
//!    The pass is aborted with [`Error::CycleDetected`].
//! 5. Walk the order, feeding each node the values at the far end of its
//!    incoming wires.

use std::collections::{HashMap, HashSet, VecDeque};

use smallvec::SmallVec;
use tracing::trace;

use super::node::{Node, NodeId, NodeKind};
use super::wire::Wire;
use crate::config::ArityPolicy;
use crate::error::{Error, Result};
use crate::gate::{self, Arity};

type Indices = SmallVec<[usize; 2]>;

/// Dependency view over a borrowed snapshot.
///
/// Nodes are addressed by their position in the snapshot, which keeps the
/// hot loop free of hashing.
pub struct UpdateScheduler<'a> {
    nodes: &'a [Node],

    /// Snapshot positions of the nodes driving each node, one entry per
    /// incoming wire, in wire order.
    drivers: Vec<Indices>,

    /// Snapshot positions of the nodes each node drives.
    dependents: Vec<Indices>,
}

impl<'a> UpdateScheduler<'a> {
    /// Index a snapshot.
    ///
    /// Fails if an id repeats or a wire names a node outside the snapshot.
    pub fn new(nodes: &'a [Node], wires: &[Wire]) -> Result<Self> {
        let mut index: HashMap<&NodeId, usize> = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id(), i).is_some() {
                return Err(Error::DuplicateNode(node.id().clone()));
            }
        }

        let mut seen_wires = HashSet::with_capacity(wires.len());
        let mut drivers = vec![Indices::new(); nodes.len()];
        let mut dependents = vec![Indices::new(); nodes.len()];

        for wire in wires {
            if !seen_wires.insert(wire.id()) {
                return Err(Error::DuplicateWire(wire.id().clone()));
            }
            let lookup = |id: &NodeId| {
                index.get(id).copied().ok_or_else(|| Error::DanglingWireReference {
                    wire: wire.id().clone(),
                    node: id.clone(),
                })
            };
            let source = lookup(wire.source())?;
            let target = lookup(wire.target())?;
            drivers[target].push(source);
            dependents[source].push(target);
        }

        Ok(Self {
            nodes,
            drivers,
            dependents,
        })
    }

    /// Number of wires terminating at the node at `pos`.
    pub fn fan_in(&self, pos: usize) -> usize {
        self.drivers[pos].len()
    }

    /// Number of wires originating at the node at `pos`.
    pub fn fan_out(&self, pos: usize) -> usize {
        self.dependents[pos].len()
    }

    /// Check every gate and output against its expected wire count.
    pub fn check_arity(&self, policy: ArityPolicy) -> Result<()> {
        if policy == ArityPolicy::Lenient {
            return Ok(());
        }
        for (pos, node) in self.nodes.iter().enumerate() {
            let found = self.fan_in(pos);
            let violation = match node.kind() {
                NodeKind::Gate(kind) if !kind.arity().accepts(found) => {
                    Some((*kind, kind.arity()))
                }
                _ => None,
            };
            if let Some((kind, expected)) = violation {
                return Err(Error::ArityViolation {
                    node: node.id().clone(),
                    kind,
                    expected,
                    found,
                });
            }
            // An output shows exactly one wire; a second one is ambiguous.
            if matches!(node.kind(), NodeKind::Output) && found > 1 {
                return Err(Error::InvalidOutputFanIn {
                    node: node.id().clone(),
                    expected: Arity::Exactly(1),
                    found,
                });
            }
        }
        Ok(())
    }

    /// Compute an evaluation order over the whole snapshot.
    ///
    /// Sources come first in snapshot order, followed by the computed nodes
    /// in topological order. Returns snapshot positions.
    pub fn evaluation_order(&self) -> Result<Vec<usize>> {
        let n = self.nodes.len();
        let computed = |pos: usize| !self.nodes[pos].kind().is_source();

        let mut result: Vec<usize> = (0..n).filter(|&pos| !computed(pos)).collect();
        let sources = result.len();
        let mut in_degree = vec![0usize; n];
        let mut queue = VecDeque::new();

        // Calculate in-degrees (only counting wires between computed nodes)
        for pos in (0..n).filter(|&pos| computed(pos)) {
            let degree = self.drivers[pos].iter().filter(|&&d| computed(d)).count();
            in_degree[pos] = degree;
            if degree == 0 {
                queue.push_back(pos);
            }
        }

        // Kahn's algorithm
        while let Some(pos) = queue.pop_front() {
            result.push(pos);

            for &dependent in &self.dependents[pos] {
                if !computed(dependent) {
                    continue;
                }
                let degree = &mut in_degree[dependent];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if result.len() < n {
            let mut ordered = vec![false; n];
            for &pos in &result {
                ordered[pos] = true;
            }
            let nodes = (0..n)
                .filter(|&pos| !ordered[pos])
                .map(|pos| self.nodes[pos].id().clone())
                .collect();
            return Err(Error::CycleDetected { nodes });
        }

        trace!(sources, computed = n - sources, "evaluation order ready");
        Ok(result)
    }

    /// Evaluate every node along `order` and return the new values, indexed
    /// by snapshot position.
    pub fn evaluate(&self, order: &[usize]) -> Vec<bool> {
        let mut values = vec![false; self.nodes.len()];

        for &pos in order {
            let node = &self.nodes[pos];
            let inputs: SmallVec<[bool; 2]> =
                self.drivers[pos].iter().map(|&d| values[d]).collect();

            values[pos] = match node.kind() {
                NodeKind::Input => node.level(),
                NodeKind::Unknown(_) => false,
                NodeKind::Output => inputs.first().copied().unwrap_or(false),
                NodeKind::Gate(kind) => gate::evaluate(*kind, &inputs),
            };
            trace!(node = %node.id(), kind = %node.kind(), value = values[pos], "evaluated");
        }

        values
    }

    /// Order and evaluate the snapshot, returning a fresh copy of every node
    /// with its new value.
    pub fn propagate(&self) -> Result<Vec<Node>> {
        let order = self.evaluation_order()?;
        let values = self.evaluate(&order);

        Ok(self
            .nodes
            .iter()
            .zip(values)
            .map(|(node, value)| {
                let mut node = node.clone();
                node.set_value(Some(value));
                node
            })
            .collect())
    }
}

/// Recompute every node value of a snapshot.
///
/// The snapshot is borrowed, never modified; wires are not touched.
pub fn propagate(nodes: &[Node], wires: &[Wire]) -> Result<Vec<Node>> {
    UpdateScheduler::new(nodes, wires)?.propagate()
}
