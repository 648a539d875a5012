//! Error types for sqec-code

use thiserror::Error;

/// Errors from surface-code construction and result decoding
///
/// Construction-time variants are programmer or configuration errors and
/// surface before any circuit is built. `Malformed*` variants are data
/// contract violations raised while decoding a measurement-shot string;
/// the decoder never silently mis-indexes a bad string.
#[derive(Debug, Error)]
pub enum CodeError {
    /// Code distance below the minimum
    #[error("Invalid code distance {0}: must be at least 1")]
    InvalidDistance(usize),

    /// Unrecognized basis label
    #[error("Invalid basis '{0}': expected 'x' or 'z'")]
    InvalidBasis(String),

    /// Unrecognized logical-state label
    #[error("Invalid logical state '{0}': expected '0' or '1'")]
    InvalidLogicalState(String),

    /// Final readout requested twice
    #[error("Final readout has already been emitted")]
    DuplicateReadout,

    /// Shot string has the wrong number of space-separated fields
    #[error("Malformed result: expected {expected} fields, found {found}")]
    MalformedFieldCount { expected: usize, found: usize },

    /// A shot-string field has the wrong bit width
    #[error("Malformed result: field {index} has width {found}, expected {expected}")]
    MalformedFieldWidth {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A shot-string field contains a character other than '0' or '1'
    #[error("Malformed result: non-binary character '{character}' in field {index}")]
    MalformedCharacter { index: usize, character: char },

    /// Error from the underlying circuit builder
    #[error(transparent)]
    Circuit(#[from] sqec_circuit::CircuitError),
}

pub type Result<T> = std::result::Result<T, CodeError>;
