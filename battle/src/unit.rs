//! Combatants.

use alloc::string::{String, ToString};
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::types::{Effect, Status, TriggerKind};

/// Experience needed to reach level 2 and level 3.
pub const LEVEL_THRESHOLDS: [u8; 2] = [2, 5];
pub const MAX_EXPERIENCE: u8 = 5;
pub const MAX_LEVEL: u8 = 3;

/// A combatant with stats, one trigger and one effect.
///
/// `attack` and `health` are the permanent stats carried between battles.
/// `temp_attack` and `temp_health` are until-end-of-battle boosts and are cleared by
/// [`Unit::leave_battle`].
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub name: String,
    pub attack: i32,
    pub health: i32,
    #[serde(default)]
    pub experience: u8,
    #[serde(default)]
    pub trigger: TriggerKind,
    #[serde(default)]
    pub effect: Effect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default)]
    pub temp_attack: i32,
    #[serde(default)]
    pub temp_health: i32,
}

/// Result of a single hit landing on a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Damage after statuses were applied.
    pub dealt: i32,
    /// Status used up by this hit, if any.
    pub consumed: Option<Status>,
}

impl Unit {
    pub fn new(name: &str, attack: i32, health: i32) -> Self {
        Self {
            name: name.to_string(),
            attack: attack.max(0),
            health,
            experience: 0,
            trigger: TriggerKind::None,
            effect: Effect::None,
            status: None,
            temp_attack: 0,
            temp_health: 0,
        }
    }

    pub fn with_ability(mut self, trigger: TriggerKind, effect: Effect) -> Self {
        self.trigger = trigger;
        self.effect = effect;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_experience(mut self, experience: u8) -> Self {
        self.experience = experience.min(MAX_EXPERIENCE);
        self
    }

    /// Level derived from experience: 1, 2 or 3.
    pub fn level(&self) -> u8 {
        level_for_experience(self.experience)
    }

    /// Attack used for combat and priority. Never negative.
    pub fn effective_attack(&self) -> i32 {
        self.attack.saturating_add(self.temp_attack).max(0)
    }

    /// Health used for combat and priority. Never negative.
    pub fn effective_health(&self) -> i32 {
        self.health.saturating_add(self.temp_health).max(0)
    }

    pub fn is_fainted(&self) -> bool {
        self.effective_health() <= 0
    }

    /// Add experience and grow +1/+1 per point, as combining units does.
    /// Returns true when the level went up.
    pub fn gain_experience(&mut self, amount: u8) -> bool {
        let before = self.level();
        let gained = amount.min(MAX_EXPERIENCE - self.experience);
        self.experience += gained;
        self.attack = self.attack.saturating_add(i32::from(gained));
        self.health = self.health.saturating_add(i32::from(gained));
        self.level() > before
    }

    /// Apply a stat change. Temporary changes go to the until-end-of-battle buffs.
    pub fn boost(&mut self, attack: i32, health: i32, until_end_of_battle: bool) {
        if until_end_of_battle {
            self.temp_attack = self.temp_attack.saturating_add(attack);
            self.temp_health = self.temp_health.saturating_add(health);
        } else {
            self.attack = self.attack.saturating_add(attack).max(0);
            self.health = self.health.saturating_add(health);
        }
        self.clamp_health();
    }

    /// Pass damage through the held status, then take it. Temporary health is lost first.
    pub fn receive_damage(&mut self, amount: i32) -> Hit {
        let mut dealt = amount.max(0);
        let mut consumed = None;
        if let Some(status) = self.status {
            let mitigation = status.mitigate(dealt);
            dealt = mitigation.damage;
            if mitigation.consumed {
                self.status = None;
                consumed = Some(status);
            }
        }
        self.lose_health(dealt);
        Hit { dealt, consumed }
    }

    /// Remove `percent` of current health, rounded down. Statuses do not apply.
    pub fn reduce_health_percent(&mut self, percent: u8) -> i32 {
        let percent = i64::from(percent.min(100));
        // At most 100% of an i32, so it fits back.
        let lost = (i64::from(self.effective_health()) * percent / 100) as i32;
        self.lose_health(lost);
        lost
    }

    /// Attack damage dealt this clash, including held bonuses. Consumes one-shot bonuses.
    pub fn attack_damage(&mut self) -> i32 {
        let mut damage = self.effective_attack();
        if let Some(status) = self.status {
            let (bonus, consumed) = status.attack_bonus();
            damage = damage.saturating_add(bonus);
            if consumed {
                self.status = None;
            }
        }
        damage
    }

    /// Drop until-end-of-battle buffs.
    pub fn leave_battle(&mut self) {
        self.temp_attack = 0;
        self.temp_health = 0;
    }

    fn lose_health(&mut self, amount: i32) {
        let from_temp = amount.min(self.temp_health.max(0));
        self.temp_health -= from_temp;
        self.health = self.health.saturating_sub(amount - from_temp);
        self.clamp_health();
    }

    // Display floor is 0; fainting is decided on the floored value.
    fn clamp_health(&mut self) {
        if self.health.saturating_add(self.temp_health) < 0 {
            self.health = self.temp_health.saturating_neg();
        }
    }
}

pub fn level_for_experience(experience: u8) -> u8 {
    if experience >= LEVEL_THRESHOLDS[1] {
        3
    } else if experience >= LEVEL_THRESHOLDS[0] {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for_experience(0), 1);
        assert_eq!(level_for_experience(1), 1);
        assert_eq!(level_for_experience(2), 2);
        assert_eq!(level_for_experience(4), 2);
        assert_eq!(level_for_experience(5), 3);
    }

    #[test]
    fn test_gain_experience_grows_stats_and_caps() {
        let mut unit = Unit::new("ant", 2, 1);
        assert!(!unit.gain_experience(1));
        assert!(unit.gain_experience(1));
        assert_eq!((unit.attack, unit.health, unit.level()), (4, 3, 2));

        assert!(unit.gain_experience(10));
        assert_eq!(unit.experience, MAX_EXPERIENCE);
        assert_eq!((unit.attack, unit.health), (7, 6));
    }

    #[test]
    fn test_damage_floors_health_at_zero() {
        let mut unit = Unit::new("ant", 2, 1);
        let hit = unit.receive_damage(5);
        assert_eq!(hit.dealt, 5);
        assert_eq!(unit.effective_health(), 0);
        assert!(unit.is_fainted());
    }

    #[test]
    fn test_temporary_health_is_lost_first() {
        let mut unit = Unit::new("camel", 2, 5);
        unit.boost(1, 3, true);
        unit.receive_damage(2);
        assert_eq!((unit.health, unit.temp_health), (5, 1));
        unit.receive_damage(4);
        assert_eq!((unit.health, unit.temp_health), (2, 0));
        unit.leave_battle();
        assert_eq!(unit.effective_attack(), 2);
    }

    #[test]
    fn test_melon_is_consumed_before_damage() {
        let mut unit = Unit::new("ox", 1, 3).with_status(Status::Melon);
        let hit = unit.receive_damage(4);
        assert_eq!(hit.dealt, 0);
        assert_eq!(hit.consumed, Some(Status::Melon));
        assert_eq!(unit.status, None);
        assert_eq!(unit.health, 3);
    }

    #[test]
    fn test_steak_is_used_once() {
        let mut unit = Unit::new("boar", 8, 6).with_status(Status::Steak);
        assert_eq!(unit.attack_damage(), 28);
        assert_eq!(unit.attack_damage(), 8);
    }

    #[test]
    fn test_stats_saturate_at_the_bounds() {
        let mut unit = Unit::new("big", i32::MAX, i32::MAX).with_status(Status::MeatBone);
        unit.boost(5, 5, false);
        assert_eq!((unit.attack, unit.health), (i32::MAX, i32::MAX));
        assert_eq!(unit.attack_damage(), i32::MAX);

        assert_eq!(unit.reduce_health_percent(100), i32::MAX);
        assert!(unit.is_fainted());
    }

    #[test]
    fn test_negative_attack_is_clamped() {
        let mut unit = Unit::new("ant", 2, 1);
        unit.boost(-5, 0, true);
        assert_eq!(unit.effective_attack(), 0);
    }
}
