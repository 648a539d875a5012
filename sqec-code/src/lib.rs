//! Rotated surface-code circuits and syndrome decoding front-end
//!
//! This crate builds the logical reference circuits of a distance-`d`
//! rotated surface code and decodes raw measurement shots into the graph
//! nodes a matching-based decoder consumes:
//! - [`Layout`]: deterministic plaquette and logical-support generation
//! - [`SurfaceCode`]: side-by-side `0`/`1` circuit emission over
//!   [`sqec_circuit`] instruction sequences
//! - decoding entry points on [`SurfaceCode`]: raw logical extraction,
//!   [`DetectionRecord`] computation and [`DetectionNode`] materialization
//!
//! Decoding algorithms themselves (matching, union-find) are out of scope;
//! this crate produces their input.
//!
//! # Example
//! ```
//! use sqec_code::{Basis, LogicalState, SurfaceCode};
//!
//! let code = SurfaceCode::new(3, 1, Basis::Z, true).unwrap();
//! let nodes = code
//!     .string_to_nodes("000000000 0000 0010", LogicalState::Zero, false)
//!     .unwrap();
//! assert_eq!(nodes.len(), 2); // one flipped ancilla bit, two events
//! ```

pub mod basis;
pub mod decoder;
pub mod error;
pub mod lattice;
pub mod node;
pub mod surface;

// Re-exports for convenience
pub use basis::{Basis, LogicalState};
pub use decoder::{DetectionRecord, RoundId};
pub use error::{CodeError, Result};
pub use lattice::{Layout, Plaquette, StabilizerId};
pub use node::DetectionNode;
pub use surface::SurfaceCode;
