//! Error types for circuit declaration and solving.
//!
//! Every failure the solver can report is a variant of [`CircuitError`], so
//! callers can match on the kind and still print a readable message.
//!
//! # Example
//!
//! ```
//! use spred_core::{Circuit, CircuitError};
//!
//! let mut circuit = Circuit::new();
//! let err = circuit.add_resistor("R1", 10.0, "A", "A").unwrap_err();
//! assert!(matches!(err, CircuitError::SelfLoop { .. }));
//! ```

use thiserror::Error;

/// Errors raised by the registry, the validator and the reduction pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CircuitError {
    /// An element with this name is already declared
    #[error("element '{0}' already exists")]
    DuplicateName(String),

    /// Both terminals of an element were given the same node
    #[error("element '{element}' connects node '{node}' to itself")]
    SelfLoop { element: String, node: String },

    /// Non-finite value or negative resistance
    #[error("element '{element}' has invalid {quantity}: {value}")]
    InvalidValue {
        element: String,
        quantity: &'static str,
        value: f64,
    },

    #[error("no elements in the circuit")]
    EmptyCircuit,

    #[error("circuit has no voltage source")]
    NoSource,

    #[error("circuit has no resistor")]
    NoResistor,

    /// A terminal node is connected to nothing else (open circuit)
    #[error("element '{element}' is not properly connected: node '{node}' has {degree} connection(s)")]
    UnderConnected {
        element: String,
        node: String,
        degree: usize,
    },

    /// The node/element graph splits into independent parts
    #[error("circuit is split into {components} disconnected parts")]
    Disconnected { components: usize },

    /// A zero-resistance path in parallel with another element
    #[error("short circuit across '{element}'")]
    ShortCircuit { element: String },

    /// Sources cannot be combined in parallel
    #[error("cannot combine '{left}' and '{right}' in parallel: voltage source in a parallel branch")]
    ParallelVoltageConflict { left: String, right: String },

    /// No series or parallel rule applies to the remaining elements
    #[error("circuit cannot be reduced to a single element ({remaining} elements left)")]
    Irreducible { remaining: usize },

    /// The final equivalent has no resistance, so Ohm's law has no answer
    #[error("equivalent element '{element}' has zero resistance")]
    ZeroEquivalentResistance { element: String },
}

/// Convenience type alias for Results using CircuitError.
pub type CircuitResult<T> = Result<T, CircuitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CircuitError::ShortCircuit {
            element: "W1".into(),
        };
        assert_eq!(err.to_string(), "short circuit across 'W1'");

        let err = CircuitError::UnderConnected {
            element: "R1".into(),
            node: "C".into(),
            degree: 1,
        };
        assert!(err.to_string().contains("node 'C' has 1 connection(s)"));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> CircuitResult<()> {
            Err(CircuitError::NoSource)
        }

        fn outer() -> CircuitResult<()> {
            inner()?;
            Ok(())
        }

        assert_eq!(outer(), Err(CircuitError::NoSource));
    }
}
