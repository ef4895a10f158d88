//! Reference rules data: a small set of pets with their level-1 stats and abilities.
//!
//! The engine never reads this itself. Tests and the simulator use it to build rosters
//! by name.

use alloc::string::ToString;
use alloc::vec::Vec;

use crate::types::{Effect, Scaling, Status, SummonSpec, Target, TriggerKind};
use crate::unit::Unit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetTemplate {
    pub tier: u8,
    pub unit: Unit,
}

fn template(tier: u8, name: &str, attack: i32, health: i32, trigger: TriggerKind, effect: Effect) -> PetTemplate {
    PetTemplate {
        tier,
        unit: Unit::new(name, attack, health).with_ability(trigger, effect),
    }
}

fn stats(attack: i32, health: i32, target: Target, until_end_of_battle: bool) -> Effect {
    Effect::ModifyStats {
        attack,
        health,
        target,
        until_end_of_battle,
        scaling: Scaling::Amount,
    }
}

fn damage(amount: i32, target: Target, scaling: Scaling) -> Effect {
    Effect::Damage {
        amount,
        target,
        scaling,
    }
}

fn summon(name: &str, attack: i32, health: i32, count: u8) -> SummonSpec {
    SummonSpec {
        name: name.to_string(),
        attack,
        health,
        count,
        status: None,
    }
}

pub fn templates() -> Vec<PetTemplate> {
    use Scaling::*;
    use Target::*;
    use TriggerKind::*;

    alloc::vec![
        // Tier 1
        template(1, "ant", 2, 1, Faint, stats(2, 1, RandomAlly { count: 1 }, false)),
        template(1, "mosquito", 2, 2, StartOfBattle, damage(1, RandomEnemy { count: 1 }, TargetCount)),
        template(1, "cricket", 1, 2, Faint, Effect::Summon { summon: summon("zombie-cricket", 1, 1, 1) }),
        template(1, "horse", 2, 1, FriendSummoned, stats(1, 0, EventSubject, true)),
        // Tier 2
        template(2, "flamingo", 3, 1, Faint, stats(1, 1, AlliesBehind { count: 2 }, false)),
        template(2, "hedgehog", 3, 2, Faint, damage(2, AllUnits, Amount)),
        template(2, "peacock", 2, 5, Hurt, stats(4, 0, SelfUnit, false)),
        template(2, "kangaroo", 1, 2, FriendAheadAttacks, stats(2, 2, SelfUnit, false)),
        // Tier 3
        template(3, "elephant", 3, 5, AfterAttack, damage(1, AlliesBehind { count: 1 }, TargetCount)),
        template(3, "blowfish", 3, 5, Hurt, damage(2, RandomEnemy { count: 1 }, Amount)),
        template(3, "camel", 2, 5, Hurt, stats(1, 2, AlliesBehind { count: 1 }, false)),
        template(
            3,
            "ox",
            1,
            3,
            FriendAheadFaints,
            Effect::GiveStatus {
                status: Status::Melon,
                target: SelfUnit,
            },
        ),
        template(3, "sheep", 2, 2, Faint, Effect::Summon { summon: summon("ram", 2, 2, 2) }),
        // Tier 4
        template(4, "dolphin", 4, 6, StartOfBattle, damage(5, LowestHealthEnemy, Amount)),
        template(
            4,
            "skunk",
            3,
            6,
            StartOfBattle,
            Effect::ReduceHealthPercent {
                percent: 33,
                target: HighestHealthEnemy,
            },
        ),
        template(
            4,
            "deer",
            1,
            1,
            Faint,
            Effect::Summon {
                summon: SummonSpec {
                    status: Some(Status::Chili),
                    ..summon("bus", 5, 5, 1)
                },
            },
        ),
        template(4, "hippo", 4, 7, Knockout, stats(2, 2, SelfUnit, false)),
        // Tier 5
        template(5, "rhino", 5, 8, Knockout, damage(4, FrontEnemy, Amount)),
        // Tier 6
        template(
            6,
            "gorilla",
            6,
            9,
            Hurt,
            Effect::GiveStatus {
                status: Status::Coconut,
                target: SelfUnit,
            },
        ),
        template(6, "boar", 8, 6, BeforeAttack, stats(4, 2, SelfUnit, false)),
    ]
}

/// Fresh level-1 copy of a pet, by name.
pub fn pet(name: &str) -> Option<Unit> {
    templates()
        .into_iter()
        .find(|template| template.unit.name == name)
        .map(|template| template.unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = templates().into_iter().map(|t| t.unit.name).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_every_pet_has_an_ability() {
        for template in templates() {
            assert_ne!(template.unit.trigger, TriggerKind::None, "{}", template.unit.name);
            assert_ne!(template.unit.effect, Effect::None, "{}", template.unit.name);
            assert!((1..=6).contains(&template.tier));
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let ant = pet("ant").unwrap();
        assert_eq!((ant.attack, ant.health, ant.level()), (2, 1, 1));
        assert!(pet("dragon").is_none());
    }
}
