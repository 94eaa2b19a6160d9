//! Gatesim Core
//!
//! This crate provides the evaluation engine behind an interactive logic
//! gate editor. The user places inputs, outputs, and gates, draws wires,
//! and flips inputs; after every edit the host hands the engine the whole
//! graph and gets back a value for every node.
//!
//! It implements:
//!
//! - The gate evaluator (AND/OR/NOT/NAND/NOR/XOR/XNOR)
//! - A topological scheduler with cycle detection
//! - A stateless simulation driver with change reporting
//! - The editor's JSON snapshot format and a MessagePack encoding
//! - Import of gate detections from an image-recognition service
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `gate`: pure gate evaluation
//! - `graph`: nodes, wires, the editable `Circuit`, and the scheduler
//! - `simulator`: the per-edit driver
//! - `codec`: host wire format
//! - `recognition`: detection import
//! - `config`: engine settings
//!
//! Only combinational circuits are supported. A loop in the graph is
//! reported as an error, never iterated.
//!
//! # Example
//!
//! ```rust
//! use gatesim_core::gate::GateKind;
//! use gatesim_core::graph::{Circuit, NodeKind};
//! use gatesim_core::simulator::Simulator;
//!
//! let mut circuit = Circuit::new();
//! let a = circuit.add_node(NodeKind::Input, Some("Input A"));
//! let b = circuit.add_node(NodeKind::Input, Some("Input B"));
//! let and = circuit.add_node(GateKind::And.into(), None);
//! let out = circuit.add_node(NodeKind::Output, None);
//! circuit.connect(&a, &and, Some("a")).unwrap();
//! circuit.connect(&b, &and, Some("b")).unwrap();
//! circuit.connect(&and, &out, None).unwrap();
//!
//! let simulator = Simulator::default();
//! circuit.toggle_input(&a).unwrap();
//! circuit.toggle_input(&b).unwrap();
//! assert!(circuit.simulate(&simulator).unwrap());
//! assert_eq!(circuit.node(&out).unwrap().value(), Some(true));
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod gate;
pub mod graph;
pub mod recognition;
pub mod samples;
pub mod simulator;

#[cfg(feature = "python")]
mod python;

pub use error::{Error, Result};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition.
///
/// This function is called by Python when importing the module.
/// It registers all Python-exposed types and functions.
#[cfg(feature = "python")]
#[pymodule]
fn gatesim_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PySimulator>()?;

    // Add version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
