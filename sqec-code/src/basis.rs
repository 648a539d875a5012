//! Basis and logical-state enumerations
//!
//! These replace string-keyed dispatch on `"x"`/`"z"` and `"0"`/`"1"` with
//! two-valued enums; the wire-facing spellings survive in the `FromStr` and
//! `Display` impls.

use crate::{CodeError, Result};
use std::fmt;
use std::str::FromStr;

/// Stabilizer or preparation basis
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Basis {
    /// X basis
    X,
    /// Z basis
    Z,
}

impl Basis {
    /// The other basis
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Basis::X => Basis::Z,
            Basis::Z => Basis::X,
        }
    }

    /// Lowercase label as used in result-string conventions
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Basis::X => "x",
            Basis::Z => "z",
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Basis {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" | "X" => Ok(Basis::X),
            "z" | "Z" => Ok(Basis::Z),
            other => Err(CodeError::InvalidBasis(other.to_string())),
        }
    }
}

/// One of the two encoded logical basis states
///
/// Both variants are built side by side by the emitter; decoding takes the
/// expected state as an argument when materializing boundary nodes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicalState {
    /// Logical 0, the bare stabilizer ground state
    Zero,
    /// Logical 1, prepared by a logical flip on top of `Zero`
    One,
}

impl LogicalState {
    /// Both states in circuit-list order
    pub const ALL: [LogicalState; 2] = [LogicalState::Zero, LogicalState::One];

    /// Index into the two-element circuit list
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            LogicalState::Zero => 0,
            LogicalState::One => 1,
        }
    }

    /// The raw bit value this state should read out as
    #[inline]
    pub const fn value(self) -> u8 {
        match self {
            LogicalState::Zero => 0,
            LogicalState::One => 1,
        }
    }
}

impl fmt::Display for LogicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalState::Zero => "0",
            LogicalState::One => "1",
        })
    }
}

impl FromStr for LogicalState {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "0" => Ok(LogicalState::Zero),
            "1" => Ok(LogicalState::One),
            other => Err(CodeError::InvalidLogicalState(other.to_string())),
        }
    }
}
