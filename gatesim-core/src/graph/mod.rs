//! Circuit Graph
//!
//! This module implements the circuit graph and the scheduler that
//! evaluates it.
//!
//! # Overview
//!
//! A circuit is a directed graph where:
//!
//! - Nodes are input terminals, output terminals, or gates
//! - Wires are edges: a wire from A to B means B reads A's value
//!
//! Inputs are the roots; their values come from the user. Every other node
//! is recomputed from its incoming wires on each pass, in topological order.
//!
//! # Design Decisions
//!
//! 1. The scheduler works on a borrowed snapshot (`&[Node]`, `&[Wire]`)
//!    rather than on a live graph, so the caller keeps sole ownership and an
//!    aborted pass cannot leave half-written values behind.
//!
//! 2. Within a pass nodes are addressed by snapshot position, not id.
//!
//! 3. [`Circuit`] is the editing side: it owns ids and ordering, and is
//!    what a host mutates between passes.

mod circuit;
mod node;
mod scheduler;
mod wire;

pub use circuit::{Circuit, IdGenerator};
pub use node::{Node, NodeId, NodeKind, Position};
pub use scheduler::{propagate, UpdateScheduler};
pub use wire::{Wire, WireId};
