//! Engine Configuration
//!
//! Settings are plain serde structs so a host can ship them as JSON next to
//! its circuit. Every field has a default; an empty object is a valid config.

use serde::{Deserialize, Serialize};

/// What to do with gates whose incoming wire count does not match their
/// arity (an XOR with three wires, a NOT with none).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArityPolicy {
    /// Evaluate anyway: missing inputs read as 0, surplus inputs of
    /// fixed-arity gates are ignored. Half-wired circuits stay live while
    /// the user is still drawing.
    #[default]
    Lenient,

    /// Reject the snapshot with [`crate::Error::ArityViolation`].
    Strict,
}

/// Settings for turning recognition-service detections into nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Detections reporting a lower confidence are dropped. Detections
    /// without a confidence are always kept.
    pub min_confidence: f64,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self { min_confidence: 0.0 }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub arity: ArityPolicy,
    pub recognition: RecognitionConfig,
}

impl EngineConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Defaults with the strict arity policy.
    pub fn strict() -> Self {
        Self {
            arity: ArityPolicy::Strict,
            ..Self::default()
        }
    }
}
