mod cascade;
mod match_runner;

use crate::battle::{resolve_battle, BattleReport};
use crate::board::UnitId;
use crate::event::{trigger_order, CombatEvent};
use crate::limits::BattleConfig;
use crate::roster::Roster;
use crate::types::*;
use crate::unit::Unit;
use alloc::vec::Vec;

// ==========================================
// HELPER FUNCTIONS (Boilerplate Reduction)
// ==========================================

fn create_unit(name: &str, attack: i32, health: i32) -> Unit {
    Unit::new(name, attack, health)
}

/// Start-of-battle unit whose effect is harmless: +1 temporary health to itself.
fn create_tester_unit(name: &str, attack: i32, health: i32) -> Unit {
    Unit::new(name, attack, health).with_ability(
        TriggerKind::StartOfBattle,
        Effect::ModifyStats {
            attack: 0,
            health: 1,
            target: Target::SelfUnit,
            until_end_of_battle: true,
            scaling: Scaling::Amount,
        },
    )
}

fn create_dummy_enemy() -> Unit {
    Unit::new("sandbag", 0, 50)
}

fn pet(name: &str) -> Unit {
    crate::catalogue::pet(name).unwrap()
}

fn team(units: &[Unit]) -> Roster {
    Roster::from_units(units.iter().cloned()).unwrap()
}

fn run_battle(first: &[Unit], second: &[Unit], seed: u64) -> BattleReport {
    run_battle_with(first, second, seed, BattleConfig::default())
}

fn run_battle_with(first: &[Unit], second: &[Unit], seed: u64, config: BattleConfig) -> BattleReport {
    resolve_battle(&team(first), &team(second), seed, config).unwrap()
}

fn triggers(report: &BattleReport) -> Vec<UnitId> {
    trigger_order(&report.events)
}

/// Triggers of one kind, in resolution order.
fn triggers_of(report: &BattleReport, kind: TriggerKind) -> Vec<UnitId> {
    report
        .events
        .iter()
        .filter_map(|event| match event {
            CombatEvent::AbilityTrigger {
                source_instance_id,
                trigger,
                ..
            } if *trigger == kind => Some(*source_instance_id),
            _ => None,
        })
        .collect()
}

fn spawned_names(report: &BattleReport) -> Vec<&str> {
    report
        .events
        .iter()
        .filter_map(|event| match event {
            CombatEvent::UnitSpawn { spawned_unit, .. } => Some(spawned_unit.name.as_str()),
            _ => None,
        })
        .collect()
}
