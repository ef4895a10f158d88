//! Fixed-capacity, front-to-back ordered team of units.

use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::error::{BattleError, BattleResult, Invariant};
use crate::unit::Unit;

/// Number of slots in the reference game.
pub const ROSTER_CAPACITY: usize = 5;

/// One side's units. Empty slots are explicit `None` placeholders; index 0 is the front.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    slots: Vec<Option<Unit>>,
}

impl Roster {
    /// Empty roster with the reference capacity.
    pub fn new() -> Self {
        Self::with_capacity(ROSTER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
        }
    }

    /// Fill slots front to back; the rest stay empty.
    pub fn from_units<I: IntoIterator<Item = Unit>>(units: I) -> BattleResult<Self> {
        let mut roster = Self::new();
        for (index, unit) in units.into_iter().enumerate() {
            if index >= roster.capacity() {
                return Err(BattleError::InvariantViolation {
                    invariant: Invariant::RosterOverCapacity,
                });
            }
            roster.slots[index] = Some(unit);
        }
        Ok(roster)
    }

    /// Take explicit slots, empty ones included.
    pub fn from_slots(slots: Vec<Option<Unit>>, capacity: usize) -> BattleResult<Self> {
        let roster = Self { slots };
        roster.validate(capacity)?;
        Ok(roster)
    }

    pub(crate) fn from_raw(slots: Vec<Option<Unit>>) -> Self {
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<Unit>] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Unit> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Unit> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Occupied slots with their indices, front to back. Fainted units included.
    pub fn units(&self) -> impl Iterator<Item = (usize, &Unit)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|unit| (index, unit)))
    }

    /// Number of non-empty, non-fainted slots.
    pub fn active_count(&self) -> usize {
        self.units().filter(|(_, unit)| !unit.is_fainted()).count()
    }

    pub fn has_active(&self) -> bool {
        self.active_count() > 0
    }

    /// First active unit and its slot.
    pub fn front(&self) -> Option<(usize, &Unit)> {
        self.units().find(|(_, unit)| !unit.is_fainted())
    }

    /// Clear until-end-of-battle buffs on every unit.
    pub fn leave_battle(&mut self) {
        for unit in self.slots.iter_mut().flatten() {
            unit.leave_battle();
        }
    }

    /// Check the slot count matches the expected capacity.
    pub fn validate(&self, capacity: usize) -> BattleResult<()> {
        if self.slots.len() != capacity {
            return Err(BattleError::InvariantViolation {
                invariant: Invariant::RosterSize {
                    expected: capacity as u32,
                    found: self.slots.len() as u32,
                },
            });
        }
        Ok(())
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}
