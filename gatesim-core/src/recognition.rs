//! Recognition Boundary
//!
//! A recognition service turns a photo of a circuit into a list of
//! detections: a class label and a bounding box per symbol. This module
//! parses that response and places one node per detection on a
//! [`Circuit`]. No wires are inferred; the user draws them afterwards.
//!
//! Classes that name a gate (`AND`, `NOR`, ...) become gates. Anything else
//! becomes [`NodeKind::Unknown`] carrying the class, so it still shows up on
//! the canvas and evaluates to 0.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RecognitionConfig;
use crate::error::Result;
use crate::gate::GateKind;
use crate::graph::{Circuit, NodeId, NodeKind, Position};

/// One detected symbol. `x` and `y` are the centre of the bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Detection {
    /// The node kind this detection's class maps to.
    pub fn kind(&self) -> NodeKind {
        classify(&self.class)
    }

    pub fn center(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Top-left corner of the bounding box, which is where the editor
    /// anchors a node.
    pub fn anchor(&self) -> Position {
        Position::new(self.x - self.width / 2.0, self.y - self.height / 2.0)
    }
}

/// The service's response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    #[serde(default, alias = "predictions")]
    pub detections: Vec<Detection>,
}

impl DetectionResponse {
    /// Parse a response from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Map a detection class to a node kind.
pub fn classify(class: &str) -> NodeKind {
    match GateKind::from_symbol(class) {
        Some(gate) => NodeKind::Gate(gate),
        None => NodeKind::Unknown(class.to_string()),
    }
}

/// Place a node on `circuit` for every detection that clears the
/// confidence threshold. Returns the new node ids in detection order.
pub fn import_detections(
    circuit: &mut Circuit,
    detections: &[Detection],
    config: &RecognitionConfig,
) -> Vec<NodeId> {
    let mut placed = Vec::with_capacity(detections.len());

    for detection in detections {
        if let Some(confidence) = detection.confidence {
            if confidence < config.min_confidence {
                debug!(class = %detection.class, confidence, "detection below threshold");
                continue;
            }
        }

        let kind = detection.kind();
        if let NodeKind::Unknown(class) = &kind {
            warn!(%class, "unrecognised detection class");
        }
        // Gates take their palette label; unknown classes are labelled
        // with the class itself.
        let id = circuit.add_node_at(kind, None, detection.anchor());
        placed.push(id);
    }

    debug!(placed = placed.len(), total = detections.len(), "detections imported");
    placed
}
