#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod battle;
pub mod board;
pub mod catalogue;
pub mod error;
pub mod event;
pub mod limits;
pub mod match_runner;
pub mod resolver;
pub mod rng;
pub mod roster;
pub mod scheduler;
pub mod snapshot;
pub mod types;
pub mod unit;

#[cfg(test)]
mod tests;

pub use battle::{resolve_battle, Battle, BattleOutcome, BattleReport, SideResult};
pub use board::{Board, CombatUnit, UnitId};
pub use error::{BattleError, BattleResult, Corruption, Invariant};
pub use event::{BattlePhase, CombatEvent, Signal, TriggerEvent, TriggerPayload, UnitView};
pub use limits::{BattleConfig, BattleLimits, LimitReason};
pub use match_runner::{
    round_robin, schedule, MatchError, MatchResult, Matchup, Participant, Record, RoundRobinConfig, Standings,
};
#[cfg(feature = "parallel")]
pub use match_runner::round_robin_par;
pub use rng::{derive_seed, BattleRng, XorShiftRng};
pub use roster::{Roster, ROSTER_CAPACITY};
pub use snapshot::{restore_roster, Snapshot, SnapshotError};
pub use types::{Effect, Scaling, Side, Status, SummonSpec, Target, TriggerKind};
pub use unit::Unit;
