//! Battle configuration and safety bounds that guarantee termination.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::roster::ROSTER_CAPACITY;

pub const MAX_ROUNDS: u32 = 100;
pub const MAX_CASCADE_PASSES: u32 = 64;
pub const MAX_TRIGGERS_PER_PHASE: u32 = 200;
pub const MAX_SUMMONS_PER_BATTLE: u32 = 100;

/// Tunable battle parameters.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BattleConfig {
    /// Attack exchanges before the battle is called a draw.
    pub max_rounds: u32,
    /// Cascade passes (and chained knockout rounds) per phase.
    pub max_cascade_passes: u32,
    /// Trigger resolutions per phase.
    pub max_triggers_per_phase: u32,
    /// Summons per battle across both sides.
    pub max_summons: u32,
    /// Slots per roster.
    pub roster_capacity: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
            max_cascade_passes: MAX_CASCADE_PASSES,
            max_triggers_per_phase: MAX_TRIGGERS_PER_PHASE,
            max_summons: MAX_SUMMONS_PER_BATTLE,
            roster_capacity: ROSTER_CAPACITY as u32,
        }
    }
}

/// Which safety bound stopped the battle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum LimitReason {
    Rounds,
    CascadePasses,
    TriggersPerPhase,
    Summons,
}

impl core::fmt::Display for LimitReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LimitReason::Rounds => f.write_str("round limit reached"),
            LimitReason::CascadePasses => f.write_str("cascade did not settle"),
            LimitReason::TriggersPerPhase => f.write_str("too many triggers in one phase"),
            LimitReason::Summons => f.write_str("summon limit reached"),
        }
    }
}

/// Counters checked against a [`BattleConfig`] while a battle runs.
#[derive(Debug, Clone)]
pub struct BattleLimits {
    config: BattleConfig,
    pub rounds: u32,
    pub phase_triggers: u32,
    pub total_summons: u32,
    next_instance_id: u32,
}

impl BattleLimits {
    pub fn new(config: BattleConfig) -> Self {
        Self {
            config,
            rounds: 0,
            phase_triggers: 0,
            total_summons: 0,
            next_instance_id: 1,
        }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn generate_instance_id(&mut self) -> u32 {
        let id = self.next_instance_id;
        self.next_instance_id += 1;
        id
    }

    pub fn reset_phase_counters(&mut self) {
        self.phase_triggers = 0;
    }

    pub fn record_round(&mut self) -> Result<(), LimitReason> {
        self.rounds += 1;
        if self.rounds > self.config.max_rounds {
            return Err(LimitReason::Rounds);
        }
        Ok(())
    }

    pub fn record_trigger(&mut self) -> Result<(), LimitReason> {
        self.phase_triggers += 1;
        if self.phase_triggers > self.config.max_triggers_per_phase {
            return Err(LimitReason::TriggersPerPhase);
        }
        Ok(())
    }

    pub fn record_summon(&mut self) -> Result<(), LimitReason> {
        self.total_summons += 1;
        if self.total_summons > self.config.max_summons {
            return Err(LimitReason::Summons);
        }
        Ok(())
    }

    /// Check a pass counter against the cascade bound.
    pub fn check_cascade(&self, passes: u32) -> Result<(), LimitReason> {
        if passes > self.config.max_cascade_passes {
            return Err(LimitReason::CascadePasses);
        }
        Ok(())
    }
}
