use super::*;
use crate::battle::{Battle, BattleOutcome};
use crate::event::BattlePhase;
use crate::limits::LimitReason;
use crate::rng::XorShiftRng;

#[test]
fn test_faint_effect_with_no_allies_does_nothing() {
    // SCENARIO: ant (2/1) alone against a 3/3.
    // The ant faints in round 1; its "buff a random ally" has nobody to pick.
    let report = run_battle(&[pet("ant")], &[create_unit("Wall", 3, 3)], 9);

    assert_eq!(triggers_of(&report, TriggerKind::Faint), [UnitId(1)]);
    assert!(!report
        .events
        .iter()
        .any(|event| matches!(event, CombatEvent::ModifyStats { .. })));
    assert_eq!(report.outcome, BattleOutcome::Win { side: Side::Second });
}

#[test]
fn test_friend_ahead_faints_reacts_after_the_sweep() {
    // SCENARIO:
    // First: [ant (2/1), ox (1/3)]. Second: [wall (5/10)].
    // Round 1: the ant faints. Two triggers queue up:
    //   - ant faint: +2/+1 to a random ally (only the ox is left)
    //   - ox friend-ahead-faints: gain Melon
    // Ant goes first on its 2 attack. Round 2: the Melon eats the wall's hit.
    let report = run_battle(&[pet("ant"), pet("ox")], &[create_unit("Wall", 5, 10)], 4);

    assert_eq!(triggers(&report)[..2], [UnitId(1), UnitId(2)]);
    assert!(report.events.contains(&CombatEvent::ModifyStats {
        source_instance_id: UnitId(1),
        target_instance_id: UnitId(2),
        attack_change: 2,
        health_change: 1,
        new_attack: 3,
        new_health: 4,
    }));
    assert!(report.events.contains(&CombatEvent::StatusGained {
        target_instance_id: UnitId(2),
        status: Status::Melon,
    }));
    assert!(report.events.contains(&CombatEvent::StatusConsumed {
        target_instance_id: UnitId(2),
        status: Status::Melon,
    }));
}

#[test]
fn test_after_attack_hurts_friend_behind() {
    // SCENARIO:
    // First: [elephant (3/5), peacock (2/5)]. Second: [sandbag (0/6)].
    // Each round the elephant attacks, then deals 1 to the peacock, which gains +4 attack.
    // The sandbag falls in round 2.
    let report = run_battle(&[pet("elephant"), pet("peacock")], &[create_unit("sandbag", 0, 6)], 1);

    assert_eq!(report.outcome, BattleOutcome::Win { side: Side::First });
    assert_eq!(triggers_of(&report, TriggerKind::AfterAttack), [UnitId(1), UnitId(1)]);
    assert_eq!(triggers_of(&report, TriggerKind::Hurt), [UnitId(2), UnitId(2)]);

    let peacock = report.first.get(1).unwrap();
    assert_eq!((peacock.attack, peacock.health), (10, 3));
}

#[test]
fn test_friend_ahead_attacks() {
    // Kangaroo grows +2/+2 every time the unit in front of it attacks.
    let report = run_battle(
        &[create_unit("Fish", 1, 10), pet("kangaroo")],
        &[create_unit("sandbag", 0, 3)],
        1,
    );

    assert_eq!(report.rounds, 3);
    assert_eq!(triggers_of(&report, TriggerKind::FriendAheadAttacks).len(), 3);
    let kangaroo = report.first.get(1).unwrap();
    assert_eq!((kangaroo.attack, kangaroo.health), (7, 8));
}

#[test]
fn test_cascades_settle_before_every_phase_change() {
    let first = team(&[pet("hedgehog"), pet("ant"), pet("flamingo"), pet("sheep"), pet("cricket")]);
    let second = team(&[pet("blowfish"), pet("peacock"), pet("camel"), pet("ox"), pet("deer")]);
    let mut battle = Battle::new(&first, &second, BattleConfig::default(), XorShiftRng::seed_from_u64(77)).unwrap();

    while !battle.is_finished() {
        let ran = battle.phase();
        battle.step().unwrap();
        if matches!(ran, BattlePhase::StartOfBattle | BattlePhase::Attack) {
            // These two leave fainted units for the cascade that follows.
            continue;
        }
        for board in battle.boards() {
            assert!(board.check_settled().is_ok(), "unsettled after {ran:?}");
        }
    }
}

#[test]
fn test_hurt_chains_terminate() {
    // Blowfish hurt each other back and forth; hedgehogs hit everything on faint.
    let first = [pet("hedgehog"), pet("blowfish"), pet("blowfish"), pet("hedgehog"), pet("peacock")];
    let second = [pet("blowfish"), pet("blowfish"), pet("hedgehog"), pet("peacock"), pet("gorilla")];

    for seed in 0..20 {
        let report = run_battle(&first, &second, seed);
        assert!(report.rounds <= crate::limits::MAX_ROUNDS);
        assert!(matches!(report.events.last(), Some(CombatEvent::BattleEnd { .. })));
    }
}

#[test]
fn test_trigger_bound_forces_draw() {
    let config = BattleConfig {
        max_triggers_per_phase: 2,
        ..BattleConfig::default()
    };
    let report = run_battle_with(
        &[
            create_tester_unit("A", 1, 1),
            create_tester_unit("B", 2, 2),
            create_tester_unit("C", 3, 3),
        ],
        &[create_dummy_enemy()],
        0,
        config,
    );

    assert_eq!(report.outcome, BattleOutcome::Draw);
    assert_eq!(report.recovered, Some(LimitReason::TriggersPerPhase));
    assert_eq!(triggers(&report).len(), 2);
}

#[test]
fn test_cascade_bound_forces_draw() {
    // SCENARIO: hedgehog (3/2) vs [blowfish (3/5), blowfish (3/5)], one pass allowed.
    // Round 1: hedgehog faints, front blowfish drops to 2.
    // Pass 1: blowfish hurt (no enemies left to hit), hedgehog faint hits both blowfish.
    // Pass 2 would be needed for the back blowfish's hurt.
    let config = BattleConfig {
        max_cascade_passes: 1,
        ..BattleConfig::default()
    };
    let report = run_battle_with(
        &[pet("hedgehog")],
        &[pet("blowfish"), pet("blowfish")],
        3,
        config,
    );

    assert_eq!(report.recovered, Some(LimitReason::CascadePasses));
    assert_eq!(report.outcome, BattleOutcome::Draw);
    assert_eq!(report.rounds, 1);
}
