//! Pending trigger activations and the combat log.

use alloc::string::String;
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::board::UnitId;
use crate::limits::LimitReason;
use crate::types::{Side, Status, TriggerKind};
use crate::unit::Unit;

/// Extra data carried by a trigger activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerPayload {
    None,
    /// The source already left the board; this is the unit as it fainted and its slot.
    Fainted { unit: Unit, slot: usize },
    /// Another unit the effect is about, such as the summoned friend.
    Subject { unit: UnitId },
}

/// One pending effect activation. Consumed once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    pub source: UnitId,
    pub side: Side,
    pub kind: TriggerKind,
    pub payload: TriggerPayload,
}

impl TriggerEvent {
    pub fn new(source: UnitId, side: Side, kind: TriggerKind) -> Self {
        Self {
            source,
            side,
            kind,
            payload: TriggerPayload::None,
        }
    }

    pub fn with_payload(mut self, payload: TriggerPayload) -> Self {
        self.payload = payload;
        self
    }

    /// The unit as it fainted, when the source is no longer on the board.
    pub fn fainted_unit(&self) -> Option<(&Unit, usize)> {
        match &self.payload {
            TriggerPayload::Fainted { unit, slot } => Some((unit, *slot)),
            _ => None,
        }
    }
}

/// Follow-on produced by resolving an effect or by the attack exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The unit took damage and is still standing.
    Hurt { unit: UnitId, side: Side },
    /// The unit was placed on the board mid-battle.
    Summoned { unit: UnitId, side: Side },
    /// `by` dealt the blow that took `victim` to zero health.
    Killed { by: UnitId, victim: UnitId },
}

/// Battle phases, in the order the state machine visits them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum BattlePhase {
    StartOfBattle,
    HurtFaintCascade,
    BeforeAttack,
    Attack,
    AfterAttackCascade,
    KnockoutCheck,
    Terminal,
}

/// Lightweight view of a unit for replay.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitView {
    pub instance_id: UnitId,
    pub name: String,
    pub attack: i32,
    pub health: i32,
}

/// Events generated during combat for replay consumers.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum CombatEvent {
    #[serde(rename_all = "camelCase")]
    PhaseStart { phase: BattlePhase, round: u32 },
    #[serde(rename_all = "camelCase")]
    AbilityTrigger {
        source_instance_id: UnitId,
        side: Side,
        trigger: TriggerKind,
    },
    #[serde(rename_all = "camelCase")]
    Clash {
        first_damage: i32,
        second_damage: i32,
    },
    #[serde(rename_all = "camelCase")]
    Damage {
        source_instance_id: Option<UnitId>,
        target_instance_id: UnitId,
        damage: i32,
        remaining_hp: i32,
    },
    #[serde(rename_all = "camelCase")]
    ModifyStats {
        source_instance_id: UnitId,
        target_instance_id: UnitId,
        attack_change: i32,
        health_change: i32,
        new_attack: i32,
        new_health: i32,
    },
    #[serde(rename_all = "camelCase")]
    StatusGained {
        target_instance_id: UnitId,
        status: Status,
    },
    #[serde(rename_all = "camelCase")]
    StatusConsumed {
        target_instance_id: UnitId,
        status: Status,
    },
    #[serde(rename_all = "camelCase")]
    UnitFaint {
        side: Side,
        unit: UnitView,
        slot: u32,
    },
    #[serde(rename_all = "camelCase")]
    UnitSpawn {
        side: Side,
        spawned_unit: UnitView,
        slot: u32,
    },
    #[serde(rename_all = "camelCase")]
    LimitExceeded { reason: LimitReason },
    #[serde(rename_all = "camelCase")]
    BattleEnd { winner: Option<Side> },
}

/// Ability activations recorded in a log, in order.
pub fn trigger_order(events: &[CombatEvent]) -> Vec<UnitId> {
    events
        .iter()
        .filter_map(|event| match event {
            CombatEvent::AbilityTrigger {
                source_instance_id, ..
            } => Some(*source_instance_id),
            _ => None,
        })
        .collect()
}
