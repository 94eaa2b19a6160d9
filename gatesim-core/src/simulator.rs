//! Simulation Driver
//!
//! The host calls [`Simulator::step`] after every mutation: a node or wire
//! added or removed, an input flipped. Each call runs through the same
//! phases and keeps no state between calls:
//!
//! ```text
//! Start -> Validate -> Partition -> Order -> Evaluate -> Diff -> Done
//!             |                       |
//!             +-------> Failed <------+
//! ```
//!
//! `Validate` rejects dangling wires, repeated ids, and (under the strict
//! arity policy) miswired gates. `Order` rejects cycles. A failed step
//! returns the error and leaves the caller's snapshot exactly as it was.

use std::fmt;

use tracing::{debug, debug_span, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::graph::{Node, NodeId, UpdateScheduler, Wire};

/// Phases of a single step, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Validate,
    Partition,
    Order,
    Evaluate,
    Diff,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of a successful step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Every node of the snapshot, in snapshot order, with its new value.
    pub nodes: Vec<Node>,

    /// Whether any node's value differs from before the step.
    pub changed: bool,

    /// Ids of the nodes whose value changed, in snapshot order.
    pub changed_ids: Vec<NodeId>,
}

/// Stateless simulation driver.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: EngineConfig,
}

impl Simulator {
    /// Create a driver with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recompute every node value of the snapshot.
    pub fn step(&self, nodes: &[Node], wires: &[Wire]) -> Result<StepOutcome> {
        let span = debug_span!("step", nodes = nodes.len(), wires = wires.len());
        let _enter = span.enter();

        let mut phase = Phase::Start;
        let result = self.run(nodes, wires, &mut phase);
        match &result {
            Ok(outcome) => debug!(
                changed = outcome.changed,
                changed_nodes = outcome.changed_ids.len(),
                "step {}",
                Phase::Done
            ),
            Err(err) => warn!(failed_in = %phase, error = %err, "step {}", Phase::Failed),
        }
        result
    }

    fn run(&self, nodes: &[Node], wires: &[Wire], phase: &mut Phase) -> Result<StepOutcome> {
        *phase = Phase::Validate;
        let scheduler = UpdateScheduler::new(nodes, wires)?;
        scheduler.check_arity(self.config.arity)?;

        *phase = Phase::Partition;
        let sources = nodes.iter().filter(|n| n.kind().is_source()).count();
        debug!(sources, computed = nodes.len() - sources, "partitioned");

        *phase = Phase::Order;
        let order = scheduler.evaluation_order()?;

        *phase = Phase::Evaluate;
        let values = scheduler.evaluate(&order);

        *phase = Phase::Diff;
        let mut changed_ids = Vec::new();
        let nodes: Vec<Node> = nodes
            .iter()
            .zip(values)
            .map(|(node, value)| {
                if node.value() != Some(value) {
                    changed_ids.push(node.id().clone());
                }
                let mut node = node.clone();
                node.set_value(Some(value));
                node
            })
            .collect();

        *phase = Phase::Done;
        Ok(StepOutcome {
            nodes,
            changed: !changed_ids.is_empty(),
            changed_ids,
        })
    }

    /// Step repeatedly until nothing changes, returning the settled nodes.
    ///
    /// For an acyclic graph the second step is always quiet, so this runs at
    /// most twice; it exists for hosts that want to assert that.
    pub fn settle(&self, nodes: &[Node], wires: &[Wire]) -> Result<Vec<Node>> {
        let mut outcome = self.step(nodes, wires)?;
        while outcome.changed {
            outcome = self.step(&outcome.nodes, wires)?;
        }
        Ok(outcome.nodes)
    }
}
