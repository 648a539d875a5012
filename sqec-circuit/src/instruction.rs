//! The instruction set recorded by surface-code circuits

use crate::{ClbitId, QubitId};
use smallvec::SmallVec;
use std::fmt;

/// A single circuit operation
///
/// This is the closed set of operations the surface-code emitter needs:
/// Pauli flips for logical-state preparation, Hadamards for basis changes,
/// CX for the stabilizer entangling network, plus measurement, reset and
/// barrier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Instruction {
    /// Pauli X on one qubit
    X(QubitId),
    /// Pauli Z on one qubit
    Z(QubitId),
    /// Hadamard on one qubit
    H(QubitId),
    /// Controlled-X between two qubits
    Cx { control: QubitId, target: QubitId },
    /// Measure a qubit into a classical bit
    Measure { qubit: QubitId, clbit: ClbitId },
    /// Reset a qubit to the ground state
    Reset(QubitId),
    /// Scheduling barrier across the whole circuit
    Barrier,
}

impl Instruction {
    /// The instruction name, lowercase as conventionally printed
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::X(_) => "x",
            Instruction::Z(_) => "z",
            Instruction::H(_) => "h",
            Instruction::Cx { .. } => "cx",
            Instruction::Measure { .. } => "measure",
            Instruction::Reset(_) => "reset",
            Instruction::Barrier => "barrier",
        }
    }

    /// The qubits this instruction acts on
    pub fn qubits(&self) -> SmallVec<[QubitId; 2]> {
        match self {
            Instruction::X(q)
            | Instruction::Z(q)
            | Instruction::H(q)
            | Instruction::Reset(q) => SmallVec::from_slice(&[*q]),
            Instruction::Cx { control, target } => SmallVec::from_slice(&[*control, *target]),
            Instruction::Measure { qubit, .. } => SmallVec::from_slice(&[*qubit]),
            Instruction::Barrier => SmallVec::new(),
        }
    }

    /// Whether this instruction is a unitary gate
    ///
    /// Measurement, reset and barrier are not.
    pub fn is_unitary(&self) -> bool {
        matches!(
            self,
            Instruction::X(_) | Instruction::Z(_) | Instruction::H(_) | Instruction::Cx { .. }
        )
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::X(q) | Instruction::Z(q) | Instruction::H(q) | Instruction::Reset(q) => {
                write!(f, "{} {}", self.name(), q)
            }
            Instruction::Cx { control, target } => write!(f, "cx {}, {}", control, target),
            Instruction::Measure { qubit, clbit } => write!(f, "measure {} -> {}", qubit, clbit),
            Instruction::Barrier => write!(f, "barrier"),
        }
    }
}
