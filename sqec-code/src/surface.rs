//! Surface-code circuit construction
//!
//! [`SurfaceCode`] builds the two logical reference circuits (`0` and `1`)
//! side by side over one shared register set: a `d^2`-qubit code register
//! plus one ancilla register per stabilizer basis. Construction drives
//! `T - 1` plain syndrome rounds, one final round and the transversal
//! readout; each round appends a fresh classical register pair whose
//! position in the addition order is what the decoder later relies on when
//! it carves up result strings.

use crate::{Basis, CodeError, Layout, LogicalState, Result};
use sqec_circuit::{Circuit, ClassicalRegister, QuantumRegister};

/// Circuits and register bookkeeping for a distance-`d` rotated surface code
///
/// # Example
/// ```
/// use sqec_code::{Basis, LogicalState, SurfaceCode};
///
/// let code = SurfaceCode::new(3, 2, Basis::Z, true).unwrap();
/// assert_eq!(code.num_rounds(), 2);
/// let zero = code.circuit(LogicalState::Zero);
/// assert!(!zero.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct SurfaceCode {
    basis: Basis,
    resets: bool,
    rounds: usize,
    layout: Layout,
    code: QuantumRegister,
    z_ancilla: QuantumRegister,
    x_ancilla: QuantumRegister,
    z_round_bits: Vec<ClassicalRegister>,
    x_round_bits: Vec<ClassicalRegister>,
    code_bits: Option<ClassicalRegister>,
    circuits: [Circuit; 2],
}

impl SurfaceCode {
    /// Build both logical reference circuits
    ///
    /// `rounds` is the number of ancilla-assisted syndrome measurement
    /// rounds. With `rounds = 0` no measurement of any kind is emitted;
    /// otherwise the final round is followed by transversal readout of all
    /// code qubits. `resets` controls whether ancillas are reset after
    /// each mid-circuit measurement.
    ///
    /// # Errors
    /// Returns [`CodeError::InvalidDistance`] for `d = 0` before any
    /// circuit is built.
    pub fn new(d: usize, rounds: usize, basis: Basis, resets: bool) -> Result<Self> {
        let layout = Layout::new(d)?;

        let code = QuantumRegister::new("code_qubit", 0, layout.num_code_qubits());
        let z_ancilla =
            QuantumRegister::after(&code, "zplaq_qubit", layout.num_plaquettes(Basis::Z));
        let x_ancilla =
            QuantumRegister::after(&z_ancilla, "xplaq_qubit", layout.num_plaquettes(Basis::X));
        let num_qubits = code.len() + z_ancilla.len() + x_ancilla.len();

        let circuits = [
            Circuit::new("0", num_qubits),
            Circuit::new("1", num_qubits),
        ];

        let mut surface = Self {
            basis,
            resets,
            rounds: 0,
            layout,
            code,
            z_ancilla,
            x_ancilla,
            z_round_bits: Vec::new(),
            x_round_bits: Vec::new(),
            code_bits: None,
            circuits,
        };

        surface.preparation()?;
        for _ in 0..rounds.saturating_sub(1) {
            surface.syndrome_measurement(false, false)?;
        }
        if rounds != 0 {
            surface.syndrome_measurement(true, false)?;
            surface.readout()?;
        }
        Ok(surface)
    }

    /// Prepare the logical basis states
    ///
    /// The `0` variant is left in the bare stabilizer ground state of the
    /// chosen basis; the `1` variant gets the corresponding logical flip.
    fn preparation(&mut self) -> Result<()> {
        match self.basis {
            Basis::Z => self.logical_x(&[LogicalState::One], false),
            Basis::X => {
                for circuit in self.circuits.iter_mut() {
                    for q in self.code.iter() {
                        circuit.h(q)?;
                    }
                }
                self.logical_z(&[LogicalState::One], false)
            }
        }
    }

    /// Apply a logical X to the selected circuit variants
    ///
    /// Acts along the left boundary column. Optionally appends a barrier.
    pub fn logical_x(&mut self, states: &[LogicalState], barrier: bool) -> Result<()> {
        let d = self.layout.distance();
        for &state in states {
            let circuit = &mut self.circuits[state.index()];
            for j in 0..d {
                circuit.x(self.code.qubit(j * d))?;
            }
            if barrier {
                circuit.barrier();
            }
        }
        Ok(())
    }

    /// Apply a logical Z to the selected circuit variants
    ///
    /// Acts along the top boundary row. Optionally appends a barrier.
    pub fn logical_z(&mut self, states: &[LogicalState], barrier: bool) -> Result<()> {
        let d = self.layout.distance();
        for &state in states {
            let circuit = &mut self.circuits[state.index()];
            for j in 0..d {
                circuit.z(self.code.qubit(j))?;
            }
            if barrier {
                circuit.barrier();
            }
        }
        Ok(())
    }

    /// Emit one syndrome measurement round into both circuit variants
    ///
    /// Allocates the round's classical register pair, runs the entangling
    /// network in the corner order fixed by the layout (all plaquettes
    /// advance through slots in lockstep, X ancillas sandwiched between
    /// Hadamards), measures every ancilla and, unless this is the final
    /// round under the reset policy, resets them. Increments the round
    /// counter; rounds are numbered in emission order and the decoder
    /// assumes exactly that numbering.
    pub fn syndrome_measurement(&mut self, final_round: bool, barrier: bool) -> Result<()> {
        let nz = self.z_ancilla.len();
        let nx = self.x_ancilla.len();

        let offset = self.circuits[0].num_clbits();
        let z_bits =
            ClassicalRegister::new(format!("round_{}_zplaq_bit", self.rounds), offset, nz);
        let x_bits =
            ClassicalRegister::new(format!("round_{}_xplaq_bit", self.rounds), offset + nz, nx);

        for circuit in self.circuits.iter_mut() {
            circuit.add_creg(&z_bits)?;
            circuit.add_creg(&x_bits)?;

            for q in self.x_ancilla.iter() {
                circuit.h(q)?;
            }

            for slot in 0..4 {
                for (p, plaq) in self.layout.plaquettes(Basis::Z).iter().enumerate() {
                    if let Some(c) = plaq.corner(slot) {
                        circuit.cx(self.code.qubit(c.index()), self.z_ancilla.qubit(p))?;
                    }
                }
                for (p, plaq) in self.layout.plaquettes(Basis::X).iter().enumerate() {
                    if let Some(c) = plaq.corner(slot) {
                        circuit.cx(self.x_ancilla.qubit(p), self.code.qubit(c.index()))?;
                    }
                }
            }

            for q in self.x_ancilla.iter() {
                circuit.h(q)?;
            }

            for j in 0..nx.max(nz) {
                if j < nx {
                    circuit.measure(self.x_ancilla.qubit(j), x_bits.bit(j))?;
                }
                if j < nz {
                    circuit.measure(self.z_ancilla.qubit(j), z_bits.bit(j))?;
                }
                if self.resets && !final_round {
                    if j < nx {
                        circuit.reset(self.x_ancilla.qubit(j))?;
                    }
                    if j < nz {
                        circuit.reset(self.z_ancilla.qubit(j))?;
                    }
                }
            }

            if barrier {
                circuit.barrier();
            }
        }

        self.z_round_bits.push(z_bits);
        self.x_round_bits.push(x_bits);
        self.rounds += 1;
        Ok(())
    }

    /// Transversal readout of all code qubits
    ///
    /// Corresponds to a logical measurement and lets a final syndrome round
    /// be inferred from the code-qubit values.
    ///
    /// # Errors
    /// Returns [`CodeError::DuplicateReadout`] on a second call.
    pub fn readout(&mut self) -> Result<()> {
        if self.code_bits.is_some() {
            return Err(CodeError::DuplicateReadout);
        }
        let offset = self.circuits[0].num_clbits();
        let code_bits =
            ClassicalRegister::new("code_bit", offset, self.layout.num_code_qubits());

        for circuit in self.circuits.iter_mut() {
            if self.basis == Basis::X {
                for q in self.code.iter() {
                    circuit.h(q)?;
                }
            }
            circuit.add_creg(&code_bits)?;
            for j in 0..self.code.len() {
                circuit.measure(self.code.qubit(j), code_bits.bit(j))?;
            }
        }
        self.code_bits = Some(code_bits);
        Ok(())
    }

    /// The circuit encoding one logical state
    pub fn circuit(&self, state: LogicalState) -> &Circuit {
        &self.circuits[state.index()]
    }

    /// Both circuits, `0` first
    pub fn circuits(&self) -> &[Circuit; 2] {
        &self.circuits
    }

    /// The lattice layout shared by emission and decoding
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The code distance
    #[inline]
    pub fn distance(&self) -> usize {
        self.layout.distance()
    }

    /// The preparation basis
    #[inline]
    pub const fn basis(&self) -> Basis {
        self.basis
    }

    /// Whether ancillas are reset after mid-circuit measurements
    #[inline]
    pub const fn resets(&self) -> bool {
        self.resets
    }

    /// Number of syndrome measurement rounds emitted so far
    #[inline]
    pub const fn num_rounds(&self) -> usize {
        self.rounds
    }

    /// Per-round classical registers of one ancilla basis, oldest first
    pub fn round_bits(&self, basis: Basis) -> &[ClassicalRegister] {
        match basis {
            Basis::X => &self.x_round_bits,
            Basis::Z => &self.z_round_bits,
        }
    }

    /// The final readout register, present once [`readout`](Self::readout) ran
    pub fn code_bits(&self) -> Option<&ClassicalRegister> {
        self.code_bits.as_ref()
    }
}
