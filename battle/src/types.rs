//! Core vocabulary shared by units, rosters and the battle engine.

use alloc::string::String;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// One of the two sides of a battle. `First` is the side passed first to the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    pub fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Side::First => f.write_str("FIRST"),
            Side::Second => f.write_str("SECOND"),
        }
    }
}

/// Game event that activates a unit's effect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum TriggerKind {
    #[default]
    None,
    StartOfBattle,
    Faint,
    Hurt,
    BeforeAttack,
    AfterAttack,
    Knockout,
    FriendSummoned,
    FriendAheadAttacks,
    FriendAheadFaints,
}

/// Held item or condition attached to a unit. At most one per unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    /// Absorbs 20 damage from the next hit, then is consumed.
    Melon,
    /// Negates the next hit entirely, then is consumed.
    Coconut,
    /// Every hit deals 2 less damage, to a minimum of 1.
    Garlic,
    /// Every hit deals 3 more damage.
    Weak,
    /// Attacks deal 3 more damage.
    MeatBone,
    /// The next attack deals 20 more damage, then is consumed.
    Steak,
    /// Attacks also deal 5 damage to the unit behind the target.
    Chili,
    /// Summons a 1/1 Bee where the unit fainted.
    Honey,
    /// Brings the unit back as a 1/1 after it faints.
    ExtraLife,
}

pub const MELON_ABSORB: i32 = 20;
pub const GARLIC_REDUCTION: i32 = 2;
pub const WEAK_PENALTY: i32 = 3;
pub const MEAT_BONE_BONUS: i32 = 3;
pub const STEAK_BONUS: i32 = 20;
pub const CHILI_SPLASH: i32 = 5;

/// Outcome of passing a hit through a defensive status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mitigation {
    pub damage: i32,
    pub consumed: bool,
}

impl Status {
    /// Adjust incoming damage. Non-defensive statuses pass damage through unchanged.
    pub fn mitigate(self, damage: i32) -> Mitigation {
        match self {
            Status::Melon => Mitigation {
                damage: (damage - MELON_ABSORB).max(0),
                consumed: true,
            },
            Status::Coconut => Mitigation {
                damage: 0,
                consumed: true,
            },
            Status::Garlic => Mitigation {
                damage: (damage - GARLIC_REDUCTION).max(1),
                consumed: false,
            },
            Status::Weak => Mitigation {
                damage: damage.saturating_add(WEAK_PENALTY),
                consumed: false,
            },
            _ => Mitigation {
                damage,
                consumed: false,
            },
        }
    }

    /// Extra attack damage granted by this status, and whether using it consumes it.
    pub fn attack_bonus(self) -> (i32, bool) {
        match self {
            Status::MeatBone => (MEAT_BONE_BONUS, false),
            Status::Steak => (STEAK_BONUS, true),
            _ => (0, false),
        }
    }
}

/// How an effect grows with the unit's level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Scaling {
    /// Multiply the amount by the level.
    #[default]
    Amount,
    /// Multiply the number of targets by the level.
    TargetCount,
}

/// Which units an effect selects. Computed when the effect resolves.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Target {
    SelfUnit,
    /// Distinct random allies, excluding the source.
    RandomAlly { count: u8 },
    /// Distinct random enemies.
    RandomEnemy { count: u8 },
    /// Every ally except the source.
    AllAllies,
    AllEnemies,
    /// Every active unit on both sides except the source.
    AllUnits,
    /// The nearest active ally in front of the source.
    AllyAhead,
    /// The nearest active allies behind the source, front to back.
    AlliesBehind { count: u8 },
    FrontEnemy,
    LowestHealthEnemy,
    HighestHealthEnemy,
    HighestAttackEnemy,
    /// The unit named by the triggering event, such as a freshly summoned friend.
    EventSubject,
}

/// Unit created mid-battle by a summon effect. Stats are per level.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonSpec {
    pub name: String,
    pub attack: i32,
    pub health: i32,
    #[serde(default = "default_summon_count")]
    pub count: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

fn default_summon_count() -> u8 {
    1
}

/// Closed set of effect kinds. Each kind is resolved by one function in the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Default, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Effect {
    #[default]
    None,
    /// Deal damage to the targets. Passes through defensive statuses.
    Damage {
        amount: i32,
        target: Target,
        #[serde(default)]
        scaling: Scaling,
    },
    /// Add attack and health. Temporary boosts vanish when the battle ends.
    ModifyStats {
        attack: i32,
        health: i32,
        target: Target,
        #[serde(default)]
        until_end_of_battle: bool,
        #[serde(default)]
        scaling: Scaling,
    },
    /// Remove a share of the target's health (per level, capped at 100). Not damage.
    ReduceHealthPercent { percent: u8, target: Target },
    /// Replace the target's status.
    GiveStatus { status: Status, target: Target },
    /// Summon units where the source stands or stood.
    Summon { summon: SummonSpec },
}
