//! Gate Evaluator
//!
//! Pure mapping from a gate kind and its ordered input values to the gate's
//! output. The kind set is closed, so evaluation is total.
//!
//! Missing inputs read as 0. That gives an unwired NOT an output of 1 and
//! makes XOR/XNOR look only at their first two inputs, which is what the
//! editor has always done. Rejecting wrong arities instead is a validation
//! concern handled by the driver (see [`crate::config::ArityPolicy`]).

use std::fmt;

use serde::{Deserialize, Serialize};

/// The logic gates the engine knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Xnor,
}

/// How many incoming wires a gate expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    /// Check a wire count against this arity.
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

impl GateKind {
    /// All gate kinds, in palette order.
    pub const ALL: [GateKind; 7] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Not,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xor,
        GateKind::Xnor,
    ];

    /// Expected number of incoming wires.
    pub fn arity(&self) -> Arity {
        match self {
            GateKind::Not => Arity::Exactly(1),
            GateKind::Xor | GateKind::Xnor => Arity::Exactly(2),
            GateKind::And | GateKind::Or | GateKind::Nand | GateKind::Nor => Arity::AtLeast(1),
        }
    }

    /// Short upper-case name, as printed on the gate symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Not => "NOT",
            GateKind::Nand => "NAND",
            GateKind::Nor => "NOR",
            GateKind::Xor => "XOR",
            GateKind::Xnor => "XNOR",
        }
    }

    /// Parse a gate symbol such as `"NAND"`, ignoring case.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        GateKind::ALL
            .into_iter()
            .find(|kind| kind.symbol().eq_ignore_ascii_case(symbol.trim()))
    }

    /// Label given to a freshly placed gate.
    pub fn default_label(&self) -> String {
        format!("{} Gate", self.symbol())
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Evaluate a gate over its ordered input values.
pub fn evaluate(kind: GateKind, inputs: &[bool]) -> bool {
    let at = |i: usize| inputs.get(i).copied().unwrap_or(false);
    match kind {
        GateKind::And => all(inputs),
        GateKind::Or => any(inputs),
        GateKind::Not => !at(0),
        GateKind::Nand => !all(inputs),
        GateKind::Nor => !any(inputs),
        GateKind::Xor => at(0) != at(1),
        GateKind::Xnor => at(0) == at(1),
    }
}

// An AND with nothing wired in is off, not vacuously on.
fn all(inputs: &[bool]) -> bool {
    !inputs.is_empty() && inputs.iter().all(|&v| v)
}

fn any(inputs: &[bool]) -> bool {
    inputs.iter().any(|&v| v)
}
