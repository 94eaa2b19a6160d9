//! Python Bindings
//!
//! Exposes the JSON host boundary to Python, so a Python backend can run
//! the engine in-process. Enabled with the `python` feature.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::codec::{self, HostSnapshot};
use crate::config::EngineConfig;
use crate::error::Error;
use crate::graph::Circuit;
use crate::recognition::{self, DetectionResponse};
use crate::simulator::Simulator;

fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::Json(_) | Error::Decode(_) | Error::InvalidGateKind { .. } => {
            PyValueError::new_err(err.to_string())
        }
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// Python-exposed simulation driver.
#[pyclass(name = "Simulator")]
pub struct PySimulator {
    simulator: Simulator,
}

#[pymethods]
impl PySimulator {
    /// Create a driver, optionally from a JSON configuration.
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => EngineConfig::from_json(json)
                .map_err(|e| PyValueError::new_err(format!("config parse error: {e}")))?,
            None => EngineConfig::default(),
        };
        Ok(Self {
            simulator: Simulator::new(config),
        })
    }

    /// Run one step over an editor snapshot. Returns the response JSON.
    fn step_json(&self, snapshot: &str) -> PyResult<String> {
        codec::step_json(&self.simulator, snapshot).map_err(to_py_err)
    }

    /// Turn a recognition response into an editor snapshot of unwired
    /// nodes.
    fn import_detections(&self, response_json: &str) -> PyResult<String> {
        let response = DetectionResponse::from_json(response_json).map_err(to_py_err)?;
        let mut circuit = Circuit::new();
        recognition::import_detections(
            &mut circuit,
            &response.detections,
            &self.simulator.config().recognition,
        );
        HostSnapshot::from_circuit(&circuit)
            .to_json()
            .map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!("Simulator(arity={:?})", self.simulator.config().arity)
    }
}
