//! Error types for battle resolution
//!
//! Fatal errors abort a single battle. Safety-bound hits are carried as
//! [`BattleError::LimitExceeded`] inside the engine and turned into a forced draw
//! before they reach the caller.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::limits::LimitReason;

/// Programmer errors: the engine was asked to do something its invariants forbid.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Invariant {
    /// More units than the roster has slots.
    RosterOverCapacity,
    /// Roster slot count differs from the configured capacity.
    RosterSize { expected: u32, found: u32 },
    /// A trigger names a unit that is in neither roster and did not faint.
    MissingSource { unit: u32 },
    /// A trigger was dispatched to a unit whose trigger kind differs.
    TriggerMismatch { unit: u32 },
}

/// A roster observed in a configuration the engine can never produce.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Corruption {
    /// A unit with no health is still standing after a cascade settled.
    FaintedUnitActive { unit: u32 },
    /// The same unit id appears twice.
    DuplicateUnit { unit: u32 },
    /// Board slot count changed mid-battle.
    SlotCount { expected: u32, found: u32 },
}

#[derive(
    Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize, thiserror::Error,
)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BattleError {
    #[error("invariant violated: {invariant:?}")]
    InvariantViolation { invariant: Invariant },
    #[error("state corrupted: {corruption:?}")]
    StateCorruption { corruption: Corruption },
    #[error("limit exceeded: {reason}")]
    LimitExceeded { reason: LimitReason },
}

impl From<LimitReason> for BattleError {
    fn from(reason: LimitReason) -> Self {
        BattleError::LimitExceeded { reason }
    }
}

pub type BattleResult<T> = Result<T, BattleError>;
