//! Graph nodes consumed by matching-based decoders

use sqec_circuit::QubitId;
use std::fmt;

/// One node of the decoding graph extracted from a measurement shot
///
/// Bulk nodes mark a detected parity flip of stabilizer `element` at round
/// `time` and carry that stabilizer's qubit support. Boundary nodes mark a
/// raw logical value that disagrees with the expected one; they represent
/// one of the two boundary logical supports (`element` 0 or 1), always at
/// `time` 0, and let a matching decoder route error chains off the lattice
/// edge.
///
/// Node identity is `(time, is_boundary, element)`; within one decoded shot
/// no two nodes share it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectionNode {
    /// Round index of the detection event (0 for boundary nodes)
    pub time: usize,
    /// Qubit support: the stabilizer's present corners, or the boundary
    /// logical support
    pub qubits: Vec<QubitId>,
    /// Whether this is a boundary node
    pub is_boundary: bool,
    /// Stabilizer index, or boundary-support position for boundary nodes
    pub element: usize,
}

impl fmt::Display for DetectionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_boundary { "boundary" } else { "bulk" };
        write!(
            f,
            "{}(t={}, element={}, {} qubits)",
            kind,
            self.time,
            self.element,
            self.qubits.len()
        )
    }
}
