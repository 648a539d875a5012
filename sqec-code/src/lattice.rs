//! Rotated surface-code lattice layout
//!
//! Code qubits form a `d x d` grid indexed row-major (`index = x + d*y`).
//! Stabilizer plaquettes are seeded by iterating candidate coordinates over
//! `[-1, d-1]^2`: interior coordinates seed bulk plaquettes, while selected
//! boundary extensions seed the two-qubit truncated plaquettes that dress
//! the lattice edges. The checkerboard parity of the seed decides X versus
//! Z type, and a fixed corner permutation per type decides the order in
//! which entangling gates touch the corners. A plaquette's position in its
//! collection is its stabilizer identity; emission and decoding both index
//! the same ordered collections.

use crate::{Basis, CodeError, Result};
use smallvec::SmallVec;
use sqec_circuit::QubitId;
use std::fmt;

/// Typed index of a stabilizer within its basis collection
///
/// The index is assigned in lattice-generation order and is stable for the
/// lifetime of a [`Layout`]; round data and graph nodes refer to
/// stabilizers through it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StabilizerId(usize);

impl StabilizerId {
    /// Create a new stabilizer index
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for StabilizerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// One stabilizer generator's qubit support
///
/// Four corner slots in canonical gate-application order. Slots are `None`
/// where boundary truncation removes a corner; entangling gates skip those
/// slots but the slot positions themselves are load-bearing, since all
/// plaquettes advance through slots in lockstep during a syndrome round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Plaquette {
    corners: SmallVec<[Option<QubitId>; 4]>,
}

impl Plaquette {
    fn new(corners: [Option<QubitId>; 4]) -> Self {
        Self {
            corners: SmallVec::from_slice(&corners),
        }
    }

    /// The four corner slots in gate order
    #[inline]
    pub fn corners(&self) -> &[Option<QubitId>] {
        &self.corners
    }

    /// The qubit at gate-order slot `slot`, if present
    #[inline]
    pub fn corner(&self, slot: usize) -> Option<QubitId> {
        self.corners[slot]
    }

    /// Iterate over the present qubits in slot order
    pub fn support(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.corners.iter().filter_map(|c| *c)
    }

    /// Number of present qubits (2 on a boundary, 4 in the bulk)
    pub fn weight(&self) -> usize {
        self.corners.iter().filter(|c| c.is_some()).count()
    }
}

impl fmt::Display for Plaquette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, corner) in self.corners.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match corner {
                Some(q) => write!(f, "{}", q)?,
                None => write!(f, "-")?,
            }
        }
        write!(f, "]")
    }
}

/// Immutable lattice layout for a distance-`d` rotated surface code
///
/// Constructed once; plaquette generation is a deterministic total function
/// of `d`, and repeated construction yields identical ordered collections.
///
/// # Example
/// ```
/// use sqec_code::{Basis, Layout};
///
/// let layout = Layout::new(3).unwrap();
/// let total = layout.num_plaquettes(Basis::X) + layout.num_plaquettes(Basis::Z);
/// assert_eq!(total, 8); // d^2 - 1
/// ```
#[derive(Clone, Debug)]
pub struct Layout {
    d: usize,
    x_plaquettes: Vec<Plaquette>,
    z_plaquettes: Vec<Plaquette>,
    x_logicals: [Vec<QubitId>; 2],
    z_logicals: [Vec<QubitId>; 2],
}

impl Layout {
    /// Generate the layout for distance `d`
    ///
    /// Both odd and even `d` are accepted; odd distances give the
    /// conventional symmetric boundary dressing.
    ///
    /// # Errors
    /// Returns [`CodeError::InvalidDistance`] for `d = 0`.
    pub fn new(d: usize) -> Result<Self> {
        if d < 1 {
            return Err(CodeError::InvalidDistance(d));
        }
        let di = d as isize;
        let interior = |v: isize| (0..di - 1).contains(&v);

        let mut x_plaquettes = Vec::new();
        let mut z_plaquettes = Vec::new();

        for y in -1..di {
            for x in -1..di {
                let bulk = interior(x) && interior(y);
                let ztab = (x == -1 && y.rem_euclid(2) == 0) || (x == di - 1 && y.rem_euclid(2) == 1);
                let xtab = (y == -1 && x.rem_euclid(2) == 1) || (y == di - 1 && x.rem_euclid(2) == 0);

                // the seed must touch the lattice on at least one axis
                if !(interior(x) || interior(y)) || !(bulk || ztab || xtab) {
                    continue;
                }

                let mut block = [None; 4];
                for dy in 0..2isize {
                    for dx in 0..2isize {
                        let (cx, cy) = (x + dx, y + dy);
                        if (0..di).contains(&cx) && (0..di).contains(&cy) {
                            block[(2 * dy + dx) as usize] =
                                Some(QubitId::new((cx + di * cy) as usize));
                        }
                    }
                }

                // checkerboard parity picks the type; the corner permutation
                // fixes the entangling-gate order and with it the sign
                // conventions downstream consumers rely on
                if (x + y).rem_euclid(2) == 0 {
                    x_plaquettes.push(Plaquette::new([block[0], block[1], block[2], block[3]]));
                } else {
                    z_plaquettes.push(Plaquette::new([block[0], block[2], block[1], block[3]]));
                }
            }
        }

        // X logicals run down the left and right columns, Z logicals along
        // the top and bottom rows
        let x_logicals = [
            (0..d).map(|j| QubitId::new(j * d)).collect(),
            (0..d).map(|j| QubitId::new((j + 1) * d - 1)).collect(),
        ];
        let z_logicals = [
            (0..d).map(QubitId::new).collect(),
            (0..d).map(|j| QubitId::new(d * d - 1 - j)).collect(),
        ];

        Ok(Self {
            d,
            x_plaquettes,
            z_plaquettes,
            x_logicals,
            z_logicals,
        })
    }

    /// The code distance
    #[inline]
    pub const fn distance(&self) -> usize {
        self.d
    }

    /// Number of code qubits (`d^2`)
    #[inline]
    pub const fn num_code_qubits(&self) -> usize {
        self.d * self.d
    }

    /// The ordered plaquette collection of one basis
    pub fn plaquettes(&self, basis: Basis) -> &[Plaquette] {
        match basis {
            Basis::X => &self.x_plaquettes,
            Basis::Z => &self.z_plaquettes,
        }
    }

    /// Number of stabilizers of one basis
    pub fn num_plaquettes(&self, basis: Basis) -> usize {
        self.plaquettes(basis).len()
    }

    /// The plaquette identified by a stabilizer index
    pub fn plaquette(&self, basis: Basis, id: StabilizerId) -> &Plaquette {
        &self.plaquettes(basis)[id.index()]
    }

    /// The two boundary logical-operator supports of one basis
    ///
    /// Each support has exactly `d` qubits; the two supports of a basis are
    /// disjoint and measure the same logical operator along opposite
    /// boundaries.
    pub fn logical_supports(&self, basis: Basis) -> &[Vec<QubitId>; 2] {
        match basis {
            Basis::X => &self.x_logicals,
            Basis::Z => &self.z_logicals,
        }
    }

    /// Flattened stabilizer supports with absent corners removed
    ///
    /// The form CSS-code consumers take: one qubit list per stabilizer, in
    /// stabilizer-index order.
    pub fn stabilizer_ops(&self, basis: Basis) -> Vec<Vec<QubitId>> {
        self.plaquettes(basis)
            .iter()
            .map(|p| p.support().collect())
            .collect()
    }

    /// Both boundary supports of one basis, concatenated
    pub fn boundary(&self, basis: Basis) -> Vec<QubitId> {
        let supports = self.logical_supports(basis);
        supports[0].iter().chain(supports[1].iter()).copied().collect()
    }
}
