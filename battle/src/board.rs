//! In-battle arena: a roster's slots with stable instance ids.
//!
//! Units move when summons shift the line, so everything that refers to a unit across
//! steps (pending triggers, kill credit) holds its [`UnitId`], never a slot index.

use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::error::{BattleError, BattleResult, Corruption};
use crate::event::UnitView;
use crate::limits::BattleLimits;
use crate::roster::Roster;
use crate::types::Side;
use crate::unit::Unit;

/// Identity of a unit for the duration of one battle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl core::fmt::Display for UnitId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unit-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatUnit {
    pub id: UnitId,
    pub unit: Unit,
}

impl CombatUnit {
    pub fn is_active(&self) -> bool {
        !self.unit.is_fainted()
    }

    pub fn to_view(&self) -> UnitView {
        UnitView {
            instance_id: self.id,
            name: self.unit.name.clone(),
            attack: self.unit.effective_attack(),
            health: self.unit.effective_health(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    side: Side,
    slots: Vec<Option<CombatUnit>>,
}

impl Board {
    /// Number the roster's units and lay them out. Units that arrive fainted are left out.
    pub fn from_roster(roster: &Roster, side: Side, limits: &mut BattleLimits) -> Self {
        let slots = roster
            .slots()
            .iter()
            .map(|slot| match slot {
                Some(unit) if !unit.is_fainted() => Some(CombatUnit {
                    id: UnitId(limits.generate_instance_id()),
                    unit: unit.clone(),
                }),
                _ => None,
            })
            .collect();
        Self { side, slots }
    }

    pub fn into_roster(self) -> Roster {
        Roster::from_raw(
            self.slots
                .into_iter()
                .map(|slot| slot.map(|combat_unit| combat_unit.unit))
                .collect(),
        )
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn position(&self, id: UnitId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().map_or(false, |u| u.id == id))
    }

    pub fn get(&self, id: UnitId) -> Option<&CombatUnit> {
        self.slots.iter().flatten().find(|u| u.id == id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut CombatUnit> {
        self.slots.iter_mut().flatten().find(|u| u.id == id)
    }

    pub fn is_active(&self, id: UnitId) -> bool {
        self.get(id).map_or(false, CombatUnit::is_active)
    }

    /// Active units with their slots, front to back.
    pub fn active(&self) -> impl Iterator<Item = (usize, &CombatUnit)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|u| (index, u)))
            .filter(|(_, u)| u.is_active())
    }

    pub fn active_ids(&self) -> Vec<UnitId> {
        self.active().map(|(_, u)| u.id).collect()
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn has_active(&self) -> bool {
        self.active().next().is_some()
    }

    pub fn front(&self) -> Option<&CombatUnit> {
        self.active().next().map(|(_, u)| u)
    }

    /// Active units strictly behind `slot`, nearest first.
    pub fn active_behind(&self, slot: usize) -> impl Iterator<Item = &CombatUnit> {
        self.active()
            .filter(move |(index, _)| *index > slot)
            .map(|(_, u)| u)
    }

    /// Nearest active unit strictly in front of `slot`.
    pub fn active_ahead(&self, slot: usize) -> Option<&CombatUnit> {
        self.active()
            .filter(|(index, _)| *index < slot)
            .map(|(_, u)| u)
            .last()
    }

    /// Take every fainted unit off the board, leaving empty slots behind.
    pub fn sweep_fainted(&mut self) -> Vec<(usize, CombatUnit)> {
        let mut fainted = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.as_ref().map_or(false, |u| !u.is_active()) {
                if let Some(unit) = slot.take() {
                    fainted.push((index, unit));
                }
            }
        }
        fainted
    }

    /// Place a summoned unit at `slot`, shifting the line toward the nearest empty
    /// slot (behind first, then ahead). Hands the unit back when the board is full.
    pub fn summon(&mut self, slot: usize, unit: CombatUnit) -> Result<usize, CombatUnit> {
        if self.slots.is_empty() {
            return Err(unit);
        }
        let target = slot.min(self.slots.len() - 1);
        if self.slots[target].is_none() {
            self.slots[target] = Some(unit);
            return Ok(target);
        }
        let empty = (target + 1..self.slots.len())
            .find(|&j| self.slots[j].is_none())
            .or_else(|| (0..target).rev().find(|&j| self.slots[j].is_none()));
        match empty {
            Some(j) => {
                self.slots.remove(j);
                self.slots.insert(target, Some(unit));
                Ok(target)
            }
            None => Err(unit),
        }
    }

    /// Slot count and id uniqueness.
    pub fn validate(&self, capacity: usize) -> BattleResult<()> {
        if self.slots.len() != capacity {
            return Err(BattleError::StateCorruption {
                corruption: Corruption::SlotCount {
                    expected: capacity as u32,
                    found: self.slots.len() as u32,
                },
            });
        }
        let mut ids: Vec<UnitId> = self.slots.iter().flatten().map(|u| u.id).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(BattleError::StateCorruption {
                corruption: Corruption::DuplicateUnit { unit: pair[0].0 },
            });
        }
        Ok(())
    }

    /// After a cascade settles, nothing on the board may be fainted.
    pub fn check_settled(&self) -> BattleResult<()> {
        match self.slots.iter().flatten().find(|u| !u.is_active()) {
            Some(u) => Err(BattleError::StateCorruption {
                corruption: Corruption::FaintedUnitActive { unit: u.id.0 },
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::BattleConfig;
    use alloc::vec;

    fn board_of(names: &[Option<&str>]) -> Board {
        let slots = names
            .iter()
            .map(|name| name.map(|n| Unit::new(n, 1, 1)))
            .collect();
        let roster = Roster::from_slots(slots, names.len()).unwrap();
        let mut limits = BattleLimits::new(BattleConfig::default());
        Board::from_roster(&roster, Side::First, &mut limits)
    }

    fn names(board: &Board) -> Vec<Option<&str>> {
        board
            .slots
            .iter()
            .map(|slot| slot.as_ref().map(|u| u.unit.name.as_str()))
            .collect()
    }

    fn spawn(name: &str, id: u32) -> CombatUnit {
        CombatUnit {
            id: UnitId(id),
            unit: Unit::new(name, 1, 1),
        }
    }

    #[test]
    fn test_summon_into_empty_slot() {
        let mut board = board_of(&[Some("a"), None, Some("b")]);
        assert_eq!(board.summon(1, spawn("z", 50)), Ok(1));
        assert_eq!(
            names(&board),
            vec![Some("a"), Some("z"), Some("b")]
        );
    }

    #[test]
    fn test_summon_pushes_line_back() {
        let mut board = board_of(&[Some("a"), Some("b"), None]);
        assert_eq!(board.summon(0, spawn("z", 50)), Ok(0));
        assert_eq!(
            names(&board),
            vec![Some("z"), Some("a"), Some("b")]
        );
    }

    #[test]
    fn test_summon_uses_slot_ahead_when_back_is_full() {
        let mut board = board_of(&[None, Some("a"), Some("b")]);
        assert_eq!(board.summon(2, spawn("z", 50)), Ok(2));
        assert_eq!(
            names(&board),
            vec![Some("a"), Some("b"), Some("z")]
        );
    }

    #[test]
    fn test_summon_on_full_board_returns_unit() {
        let mut board = board_of(&[Some("a"), Some("b")]);
        let refused = board.summon(0, spawn("z", 50)).unwrap_err();
        assert_eq!(refused.unit.name, "z");
    }

    #[test]
    fn test_sweep_leaves_placeholders() {
        let mut board = board_of(&[Some("a"), Some("b"), Some("c")]);
        let b = board.active_ids()[1];
        board.get_mut(b).unwrap().unit.receive_damage(5);

        let swept = board.sweep_fainted();
        assert_eq!(swept.len(), 1);
        assert_eq!(swept[0].0, 1);
        assert_eq!(board.capacity(), 3);
        assert_eq!(board.active_count(), 2);
        assert!(board.check_settled().is_ok());
    }

    #[test]
    fn test_neighbours_skip_empty_slots() {
        let board = board_of(&[Some("a"), None, Some("b"), Some("c")]);
        assert_eq!(board.active_ahead(2).unwrap().unit.name, "a");
        let behind: Vec<_> = board.active_behind(0).map(|u| u.unit.name.as_str()).collect();
        assert_eq!(behind, ["b", "c"]);
        assert!(board.active_ahead(0).is_none());
    }
}
