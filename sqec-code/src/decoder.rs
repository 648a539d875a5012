//! Measurement-shot decoding front-end
//!
//! Turns a raw single-shot result string into the inputs a matching-based
//! decoder consumes: raw logical values, a time-resolved detection record
//! and a flat list of graph nodes. Decoding is a pure function of the
//! immutable layout plus the shot string; a batch of shots can be decoded
//! in parallel with no coordination beyond read-sharing the layout.
//!
//! The wire contract: one space-separated ASCII string per shot, fields
//! ordered `final round_{T-1}_x round_{T-1}_z ... round_0_x round_0_z`,
//! each field's bit order reversed with respect to qubit/ancilla index.
//! The bit order is inverted at parse time, once, and everything after the
//! parser works in index order.
//!
//! The detection rules depend on the reset policy. With per-round resets a
//! plain round-to-round difference suffices. Without resets an ancilla's
//! measured value is the cumulative parity since its last reset, so middle
//! rounds compare values two rounds apart, and the first, second and final
//! (virtual) rounds need their own comparison windows. That conditional
//! structure is deliberately preserved exactly; off-by-one changes here
//! silently corrupt decoder input.

use crate::{Basis, CodeError, DetectionNode, LogicalState, Result, StabilizerId, SurfaceCode};
use rayon::prelude::*;
use std::fmt;

/// Typed index of a syndrome measurement round
///
/// Round 0 is the earliest round; the virtual round inferred from final
/// readout sits at index `T`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundId(usize);

impl RoundId {
    /// Create a new round index
    #[inline]
    pub const fn new(t: usize) -> Self {
        Self(t)
    }

    /// Get the underlying index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Where the instantaneous syndrome changed, round by round
///
/// One row per round in chronological order, one bit per stabilizer of the
/// inspected basis. With resets enabled the record spans `T + 1` rounds
/// (the virtual final round included); inspecting the basis opposite the
/// preparation basis trims the first and last rounds, leaving `T - 1`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DetectionRecord {
    rounds: Vec<Vec<bool>>,
}

impl DetectionRecord {
    /// Number of rounds in the record
    #[inline]
    pub fn num_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// All rounds in chronological order
    #[inline]
    pub fn rounds(&self) -> &[Vec<bool>] {
        &self.rounds
    }

    /// One round's detection bits
    pub fn round(&self, t: RoundId) -> &[bool] {
        &self.rounds[t.index()]
    }

    /// Whether stabilizer `s` flagged a change at round `t`
    pub fn is_set(&self, t: RoundId, s: StabilizerId) -> bool {
        self.rounds[t.index()][s.index()]
    }

    /// Total number of detection events in the record
    pub fn num_events(&self) -> usize {
        self.rounds
            .iter()
            .map(|row| row.iter().filter(|&&b| b).count())
            .sum()
    }
}

/// A parsed shot: final readout plus per-round ancilla values
///
/// Bit vectors are index-ordered. Round vectors are stored most-recent
/// first, matching the field order of the wire format.
struct ShotRecord {
    final_readout: Vec<u8>,
    x_rounds: Vec<Vec<u8>>,
    z_rounds: Vec<Vec<u8>>,
}

impl ShotRecord {
    fn rounds(&self, basis: Basis) -> &[Vec<u8>] {
        match basis {
            Basis::X => &self.x_rounds,
            Basis::Z => &self.z_rounds,
        }
    }
}

/// Raw logicals and detection record of one shot, ready for node extraction
struct ProcessedShot {
    raw_logicals: [u8; 2],
    record: DetectionRecord,
}

/// Python-style sequence indexing: a negative `k` counts back from the end
fn at(sequence: &[Vec<u8>], k: isize) -> &[u8] {
    let height = sequence.len() as isize;
    let i = if k < 0 { height + k } else { k } as usize;
    &sequence[i]
}

fn parse_field(field: &str, index: usize, expected: usize) -> Result<Vec<u8>> {
    let mut bits = Vec::with_capacity(field.len());
    // bit order within a field is the reverse of the qubit/ancilla index
    for character in field.chars().rev() {
        match character {
            '0' => bits.push(0),
            '1' => bits.push(1),
            other => {
                return Err(CodeError::MalformedCharacter {
                    index,
                    character: other,
                })
            }
        }
    }
    if bits.len() != expected {
        return Err(CodeError::MalformedFieldWidth {
            index,
            expected,
            found: bits.len(),
        });
    }
    Ok(bits)
}

impl SurfaceCode {
    fn parse_shot(&self, string: &str) -> Result<ShotRecord> {
        let fields: Vec<&str> = string.split(' ').collect();
        let expected = 1 + 2 * self.num_rounds();
        if fields.len() != expected {
            return Err(CodeError::MalformedFieldCount {
                expected,
                found: fields.len(),
            });
        }

        let layout = self.layout();
        let final_readout = parse_field(fields[0], 0, layout.num_code_qubits())?;

        let nx = layout.num_plaquettes(Basis::X);
        let nz = layout.num_plaquettes(Basis::Z);
        let mut x_rounds = Vec::with_capacity(self.num_rounds());
        let mut z_rounds = Vec::with_capacity(self.num_rounds());
        for k in 0..self.num_rounds() {
            x_rounds.push(parse_field(fields[1 + 2 * k], 1 + 2 * k, nx)?);
            z_rounds.push(parse_field(fields[2 + 2 * k], 2 + 2 * k, nz)?);
        }

        Ok(ShotRecord {
            final_readout,
            x_rounds,
            z_rounds,
        })
    }

    /// Full per-round syndrome sequence, most recent first
    ///
    /// Row 0 is the virtual final round: stabilizer parities computed from
    /// the transversal readout, treated as if an ancilla had measured them.
    fn syndrome_sequence(&self, shot: &ShotRecord, inspected: Basis) -> Vec<Vec<u8>> {
        let virtual_final: Vec<u8> = self
            .layout()
            .plaquettes(inspected)
            .iter()
            .map(|plaq| {
                plaq.support()
                    .map(|q| shot.final_readout[q.index()])
                    .sum::<u8>()
                    % 2
            })
            .collect();

        let mut sequence = Vec::with_capacity(1 + self.num_rounds());
        sequence.push(virtual_final);
        sequence.extend(shot.rounds(inspected).iter().cloned());
        sequence
    }

    /// Detection bits from consecutive syndrome values
    ///
    /// `sequence` is most-recent-first; output rounds are chronological.
    /// The comparison windows differ between the reset and no-reset
    /// policies and, without resets, between middle rounds and the rounds
    /// near either end of the sequence. See the module docs.
    fn changes(&self, sequence: &[Vec<u8>], trim: bool) -> DetectionRecord {
        let height = sequence.len();
        let width = sequence.first().map_or(0, Vec::len);
        let total = self.num_rounds();

        let mut rounds = Vec::with_capacity(height);
        for t in 0..height {
            let ti = t as isize;
            let mut row = Vec::with_capacity(width);
            for j in 0..width {
                let change = if self.resets() {
                    if t == 0 {
                        at(sequence, -1)[j] != 0
                    } else {
                        at(sequence, -ti)[j] != at(sequence, -ti - 1)[j]
                    }
                } else if t <= 1 {
                    if t != total {
                        at(sequence, -ti - 1)[j] != 0
                    } else {
                        at(sequence, -ti - 1)[j] != at(sequence, -ti)[j]
                    }
                } else if t == total {
                    // no later round exists to difference against; take the
                    // parity of the last three values instead
                    let ones = (0..3)
                        .filter(|&dt| at(sequence, -ti - 1 + dt)[j] == 1)
                        .count();
                    ones % 2 == 1
                } else {
                    at(sequence, -ti - 1)[j] != at(sequence, -ti + 1)[j]
                };
                row.push(change);
            }
            rounds.push(row);
        }

        if trim {
            // first and last rounds are artifacts of the basis mismatch
            if rounds.len() > 2 {
                rounds.pop();
                rounds.remove(0);
            } else {
                rounds.clear();
            }
        }

        DetectionRecord { rounds }
    }

    fn raw_logicals(&self, shot: &ShotRecord) -> [u8; 2] {
        let d = self.distance();
        let mut values = [0u8; 2];
        for j in 0..d {
            match self.basis() {
                Basis::Z => {
                    // evaluated along the top and bottom rows
                    values[0] = (values[0] + shot.final_readout[j]) % 2;
                    values[1] = (values[1] + shot.final_readout[d * d - 1 - j]) % 2;
                }
                Basis::X => {
                    // evaluated along the left and right columns
                    values[0] = (values[0] + shot.final_readout[j * d]) % 2;
                    values[1] = (values[1] + shot.final_readout[(j + 1) * d - 1]) % 2;
                }
            }
        }
        values
    }

    fn process_shot(&self, string: &str) -> Result<ProcessedShot> {
        let shot = self.parse_shot(string)?;
        let sequence = self.syndrome_sequence(&shot, self.basis());
        Ok(ProcessedShot {
            raw_logicals: self.raw_logicals(&shot),
            record: self.changes(&sequence, false),
        })
    }

    /// Extract the two raw logical values from a shot string
    ///
    /// The same logical operator is measured along both of its boundary
    /// supports; disagreement between the two values is what boundary
    /// nodes report.
    ///
    /// # Errors
    /// Returns a `Malformed*` error for a string that violates the wire
    /// contract.
    pub fn string_to_raw_logicals(&self, string: &str) -> Result<[u8; 2]> {
        let shot = self.parse_shot(string)?;
        Ok(self.raw_logicals(&shot))
    }

    /// Compute the detection record of a shot for one stabilizer basis
    ///
    /// The public node path inspects the preparation basis. Inspecting the
    /// opposite basis trims the first and last rounds, which are artifacts
    /// of the basis mismatch.
    ///
    /// # Errors
    /// Returns a `Malformed*` error for a string that violates the wire
    /// contract.
    pub fn detection_record(&self, string: &str, inspected: Basis) -> Result<DetectionRecord> {
        let shot = self.parse_shot(string)?;
        let sequence = self.syndrome_sequence(&shot, inspected);
        Ok(self.changes(&sequence, inspected != self.basis()))
    }

    /// Convert a shot string into decoding-graph nodes
    ///
    /// Boundary nodes are emitted for each logical support whose raw value
    /// disagrees with `logical` (or unconditionally when `all_logicals` is
    /// set), then bulk nodes for every detection event in round order.
    ///
    /// # Errors
    /// Returns a `Malformed*` error for a string that violates the wire
    /// contract.
    ///
    /// # Example
    /// ```
    /// use sqec_code::{Basis, LogicalState, SurfaceCode};
    ///
    /// let code = SurfaceCode::new(3, 1, Basis::Z, true).unwrap();
    /// let quiet = "000000000 0000 0000";
    /// let nodes = code
    ///     .string_to_nodes(quiet, LogicalState::Zero, false)
    ///     .unwrap();
    /// assert!(nodes.is_empty());
    /// ```
    pub fn string_to_nodes(
        &self,
        string: &str,
        logical: LogicalState,
        all_logicals: bool,
    ) -> Result<Vec<DetectionNode>> {
        let processed = self.process_shot(string)?;
        let mut nodes = Vec::new();

        // raw values are enumerated last to first, so element 0 carries
        // the second boundary support and element 1 the first
        let supports = self.layout().logical_supports(self.basis());
        for element in 0..2 {
            let support = 1 - element;
            if all_logicals || processed.raw_logicals[support] != logical.value() {
                nodes.push(DetectionNode {
                    time: 0,
                    qubits: supports[support].clone(),
                    is_boundary: true,
                    element,
                });
            }
        }

        let plaquettes = self.layout().plaquettes(self.basis());
        for (t, row) in processed.record.rounds().iter().enumerate() {
            for (j, &flagged) in row.iter().enumerate() {
                if flagged {
                    nodes.push(DetectionNode {
                        time: t,
                        qubits: plaquettes[j].support().collect(),
                        is_boundary: false,
                        element: j,
                    });
                }
            }
        }
        Ok(nodes)
    }

    /// Decode a batch of shots in parallel
    ///
    /// Each shot decodes independently over the shared immutable layout;
    /// the first malformed shot aborts the batch with its error.
    pub fn decode_batch(
        &self,
        shots: &[&str],
        logical: LogicalState,
        all_logicals: bool,
    ) -> Result<Vec<Vec<DetectionNode>>> {
        shots
            .par_iter()
            .map(|shot| self.string_to_nodes(shot, logical, all_logicals))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_shot(code: &SurfaceCode) -> String {
        let layout = code.layout();
        let mut fields = vec!["0".repeat(layout.num_code_qubits())];
        for _ in 0..code.num_rounds() {
            fields.push("0".repeat(layout.num_plaquettes(Basis::X)));
            fields.push("0".repeat(layout.num_plaquettes(Basis::Z)));
        }
        fields.join(" ")
    }

    #[test]
    fn test_quiet_shot_decodes_to_nothing() {
        let code = SurfaceCode::new(3, 1, Basis::Z, true).unwrap();
        let shot = quiet_shot(&code);
        assert_eq!(code.string_to_raw_logicals(&shot).unwrap(), [0, 0]);
        let nodes = code.string_to_nodes(&shot, LogicalState::Zero, false).unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_raw_logicals_of_flipped_state() {
        // logical X along the left column flips qubits 0, 3 and 6; the
        // readout field is written bit-reversed
        let code = SurfaceCode::new(3, 1, Basis::Z, true).unwrap();
        let shot = "001001001 0000 0000";
        assert_eq!(code.string_to_raw_logicals(shot).unwrap(), [1, 1]);

        // Z stabilizers commute with the flip, so no bulk nodes; the
        // expected-logical argument decides the boundary nodes
        let nodes = code.string_to_nodes(shot, LogicalState::One, false).unwrap();
        assert!(nodes.is_empty());
        let nodes = code.string_to_nodes(shot, LogicalState::Zero, false).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.is_boundary && n.time == 0));
    }

    #[test]
    fn test_boundary_node_supports_are_cross_wired() {
        // element 0 carries the second support (bottom row for Z)
        let code = SurfaceCode::new(3, 1, Basis::Z, true).unwrap();
        let shot = quiet_shot(&code);
        let nodes = code.string_to_nodes(&shot, LogicalState::One, false).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].element, 0);
        assert_eq!(
            nodes[0].qubits,
            code.layout().logical_supports(Basis::Z)[1]
        );
        assert_eq!(nodes[1].element, 1);
        assert_eq!(
            nodes[1].qubits,
            code.layout().logical_supports(Basis::Z)[0]
        );
    }

    #[test]
    fn test_all_logicals_forces_boundary_nodes() {
        let code = SurfaceCode::new(3, 1, Basis::Z, true).unwrap();
        let shot = quiet_shot(&code);
        let nodes = code.string_to_nodes(&shot, LogicalState::Zero, true).unwrap();
        assert_eq!(nodes.iter().filter(|n| n.is_boundary).count(), 2);
    }

    #[test]
    fn test_single_ancilla_flip_gives_adjacent_events() {
        // ancilla 1 of the Z register, round 0: field is bit-reversed so
        // the set bit sits at position 2 of 4
        let code = SurfaceCode::new(3, 1, Basis::Z, true).unwrap();
        let shot = "000000000 0000 0010";
        let nodes = code.string_to_nodes(shot, LogicalState::Zero, false).unwrap();

        assert_eq!(nodes.len(), 2);
        for node in &nodes {
            assert!(!node.is_boundary);
            assert_eq!(node.element, 1);
            assert_eq!(
                node.qubits,
                code.layout().stabilizer_ops(Basis::Z)[1]
            );
        }
        assert_eq!(nodes[0].time, 0);
        assert_eq!(nodes[1].time, 1);
    }

    #[test]
    fn test_detection_record_with_resets() {
        // one stabilizer reads 1 at round 0 and 0 afterwards: events at
        // t = 0 (versus the ground reference) and t = 1 (value returned)
        let code = SurfaceCode::new(3, 2, Basis::Z, true).unwrap();
        let shot = "000000000 0000 0000 0000 0001";
        let record = code.detection_record(shot, Basis::Z).unwrap();

        assert_eq!(record.num_rounds(), 3);
        assert!(record.is_set(RoundId::new(0), StabilizerId::new(0)));
        assert!(record.is_set(RoundId::new(1), StabilizerId::new(0)));
        assert!(!record.is_set(RoundId::new(2), StabilizerId::new(0)));
        assert_eq!(record.num_events(), 2);
    }

    #[test]
    fn test_detection_record_without_resets() {
        // cumulative readings 1, 1, 0 across three rounds for stabilizer 0
        // exercise all four no-reset windows
        let code = SurfaceCode::new(3, 3, Basis::Z, false).unwrap();
        let shot = "000000000 0000 0000 0000 0001 0000 0001";
        let record = code.detection_record(shot, Basis::Z).unwrap();

        assert_eq!(record.num_rounds(), 4);
        for t in 0..4 {
            assert!(
                record.is_set(RoundId::new(t), StabilizerId::new(0)),
                "t = {}",
                t
            );
        }
        assert_eq!(record.num_events(), 4);
    }

    #[test]
    fn test_record_length_invariants() {
        let resets = SurfaceCode::new(3, 2, Basis::Z, true).unwrap();
        let shot = quiet_shot(&resets);
        assert_eq!(resets.detection_record(&shot, Basis::Z).unwrap().num_rounds(), 3);

        let no_resets = SurfaceCode::new(3, 2, Basis::Z, false).unwrap();
        let shot = quiet_shot(&no_resets);
        // mismatched basis trims the first and last rounds
        assert_eq!(
            no_resets.detection_record(&shot, Basis::X).unwrap().num_rounds(),
            1
        );
    }

    #[test]
    fn test_x_basis_raw_logicals() {
        // X-basis logicals read along the columns; the reversed readout
        // field sets qubits 0, 3 and 6, the left column
        let code = SurfaceCode::new(3, 1, Basis::X, true).unwrap();
        let shot = "001001001 0000 0000";
        assert_eq!(code.string_to_raw_logicals(shot).unwrap(), [1, 0]);
    }

    #[test]
    fn test_malformed_field_count() {
        let code = SurfaceCode::new(3, 1, Basis::Z, true).unwrap();
        let result = code.string_to_nodes("000000000 0000", LogicalState::Zero, false);
        assert!(matches!(
            result,
            Err(CodeError::MalformedFieldCount {
                expected: 3,
                found: 2,
            })
        ));
    }

    #[test]
    fn test_malformed_field_width() {
        let code = SurfaceCode::new(3, 1, Basis::Z, true).unwrap();
        let result = code.string_to_raw_logicals("00000000 0000 0000");
        assert!(matches!(
            result,
            Err(CodeError::MalformedFieldWidth {
                index: 0,
                expected: 9,
                found: 8,
            })
        ));
    }

    #[test]
    fn test_malformed_character() {
        let code = SurfaceCode::new(3, 1, Basis::Z, true).unwrap();
        let result = code.string_to_raw_logicals("000000000 0020 0000");
        assert!(matches!(
            result,
            Err(CodeError::MalformedCharacter {
                index: 1,
                character: '2',
            })
        ));
    }

    #[test]
    fn test_zero_rounds_decode() {
        // T = 0: a single field, one virtual round
        let code = SurfaceCode::new(3, 0, Basis::Z, true).unwrap();
        let record = code.detection_record("000000000", Basis::Z).unwrap();
        assert_eq!(record.num_rounds(), 1);
        assert_eq!(record.num_events(), 0);
    }

    #[test]
    fn test_decode_batch_matches_single_shot() {
        let code = SurfaceCode::new(3, 2, Basis::Z, true).unwrap();
        let quiet = quiet_shot(&code);
        let noisy = "000000000 0000 0001 0000 0000";
        let shots = vec![quiet.as_str(), noisy, quiet.as_str()];

        let batch = code.decode_batch(&shots, LogicalState::Zero, false).unwrap();
        assert_eq!(batch.len(), 3);
        for (shot, nodes) in shots.iter().zip(&batch) {
            let single = code.string_to_nodes(shot, LogicalState::Zero, false).unwrap();
            assert_eq!(&single, nodes);
        }
    }

    #[test]
    fn test_decode_batch_surfaces_malformed_shot() {
        let code = SurfaceCode::new(3, 1, Basis::Z, true).unwrap();
        let quiet = quiet_shot(&code);
        let shots = vec![quiet.as_str(), "bad string"];
        assert!(code.decode_batch(&shots, LogicalState::Zero, false).is_err());
    }

    #[test]
    fn test_node_identities_are_unique() {
        let code = SurfaceCode::new(3, 2, Basis::Z, true).unwrap();
        let shot = "000000000 0000 0011 0000 0001";
        let nodes = code.string_to_nodes(shot, LogicalState::Zero, true).unwrap();

        let mut identities: Vec<_> = nodes
            .iter()
            .map(|n| (n.time, n.is_boundary, n.element))
            .collect();
        identities.sort();
        identities.dedup();
        assert_eq!(identities.len(), nodes.len());
    }
}
