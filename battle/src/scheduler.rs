//! Priority ordering of pending triggers.
//!
//! Order: attack (highest first), then health (highest first), then a tie-break key
//! drawn from the battle RNG when the trigger was queued. Priority is recomputed from
//! live stats on every pick, so a trigger that buffs or damages another pending
//! unit changes where that unit resolves.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::board::Board;
use crate::event::TriggerEvent;
use crate::rng::BattleRng;

/// Sort key for one pending trigger. Greater resolves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    pub attack: i32,
    pub health: i32,
    pub tiebreak: u32,
    // Only consulted if two tie-break draws collide.
    sequence: u32,
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.attack
            .cmp(&other.attack)
            .then(self.health.cmp(&other.health))
            .then(self.tiebreak.cmp(&other.tiebreak))
            .then(other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
struct PendingTrigger {
    event: TriggerEvent,
    tiebreak: u32,
    sequence: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<PendingTrigger>,
    next_sequence: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue a trigger, drawing its tie-break key.
    pub fn push<R: BattleRng>(&mut self, event: TriggerEvent, rng: &mut R) {
        let tiebreak = rng.next_u32();
        self.pending.push(PendingTrigger {
            event,
            tiebreak,
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
    }

    /// Remove and return the highest-priority trigger that can still resolve.
    ///
    /// Triggers whose living source fainted or left the board are dropped. Triggers
    /// from fainted units rank by the stats the unit had when it fainted.
    pub fn pop_next(&mut self, boards: &[Board; 2]) -> Option<TriggerEvent> {
        self.pending
            .retain(|pending| priority_stats(&pending.event, boards).is_some());

        let best = self
            .pending
            .iter()
            .enumerate()
            .filter_map(|(index, pending)| {
                let (attack, health) = priority_stats(&pending.event, boards)?;
                Some((
                    index,
                    Priority {
                        attack,
                        health,
                        tiebreak: pending.tiebreak,
                        sequence: pending.sequence,
                    },
                ))
            })
            .max_by(|a, b| a.1.cmp(&b.1))
            .map(|(index, _)| index)?;

        Some(self.pending.swap_remove(best).event)
    }

    /// Drain everything in resolution order against a fixed board state.
    pub fn drain_ordered(&mut self, boards: &[Board; 2]) -> Vec<TriggerEvent> {
        let mut ordered = Vec::with_capacity(self.pending.len());
        while let Some(event) = self.pop_next(boards) {
            ordered.push(event);
        }
        ordered
    }
}

/// Live (attack, health) of the trigger's source, or `None` if it can no longer resolve.
fn priority_stats(event: &TriggerEvent, boards: &[Board; 2]) -> Option<(i32, i32)> {
    if let Some((unit, _)) = event.fainted_unit() {
        return Some((unit.effective_attack(), unit.effective_health()));
    }
    let source = boards[event.side.index()].get(event.source)?;
    if !source.is_active() {
        return None;
    }
    Some((source.unit.effective_attack(), source.unit.effective_health()))
}
