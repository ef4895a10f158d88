use super::*;
use crate::match_runner::{round_robin, MatchResult, Participant, RoundRobinConfig};
use crate::rng::derive_seed;
use alloc::vec;

fn participant(name: &str, units: &[Unit]) -> Participant {
    Participant::new(name, team(units))
}

fn config(base_seed: u64) -> RoundRobinConfig {
    RoundRobinConfig {
        base_seed,
        ..RoundRobinConfig::default()
    }
}

#[test]
fn test_empty_roster_sits_out() {
    let players = [
        participant("A", &[pet("ant"), pet("cricket"), pet("horse")]),
        participant("B", &[]),
        participant("C", &[pet("mosquito"), pet("flamingo")]),
    ];

    let standings = round_robin(&players, &config(1)).unwrap();

    let pairs: Vec<_> = standings.matchups.iter().map(|m| (m.first, m.second)).collect();
    assert_eq!(pairs, [(0, 2)]);
    assert_eq!(standings.records[0].fought(), 1);
    assert_eq!(standings.records[1].fought(), 0);
    assert_eq!(standings.records[2].fought(), 1);
    assert_eq!(standings.win_rates()[1], 0.0);
}

#[test]
fn test_failed_battle_is_skipped_and_isolated() {
    // SCENARIO: B's roster has 3 slots instead of 5, so every battle it is in fails.
    // A vs C still runs and counts.
    let broken = Roster::from_slots(vec![Some(create_unit("Odd", 1, 1)), None, None], 3).unwrap();
    let players = [
        participant("A", &[create_unit("A", 3, 3)]),
        Participant::new("B", broken),
        participant("C", &[create_unit("C", 1, 1)]),
    ];

    let standings = round_robin(&players, &config(5)).unwrap();

    assert_eq!(standings.matchups.len(), 3);
    assert!(matches!(standings.matchups[0].result, MatchResult::Skipped { .. }));
    assert!(matches!(standings.matchups[1].result, MatchResult::Decided { .. }));
    assert!(matches!(standings.matchups[2].result, MatchResult::Skipped { .. }));

    assert_eq!((standings.records[0].wins, standings.records[0].skipped), (1, 1));
    assert_eq!((standings.records[1].fought(), standings.records[1].skipped), (0, 2));
    assert_eq!((standings.records[2].losses, standings.records[2].skipped), (1, 1));
}

#[test]
fn test_huge_stats_do_not_abort_the_league() {
    let players = [
        participant("Big", &[create_unit("Big", i32::MAX, 10).with_status(Status::MeatBone)]),
        participant("Small", &[create_unit("Small", 1, 5)]),
        participant("Tough", &[create_unit("Tough", 2, i32::MAX)]),
    ];

    let standings = round_robin(&players, &config(9)).unwrap();

    assert_eq!(standings.matchups.len(), 3);
    assert!(standings
        .matchups
        .iter()
        .all(|m| matches!(m.result, MatchResult::Decided { .. })));
    assert_eq!(standings.records[0].wins, 2);
}

#[test]
fn test_each_matchup_gets_its_own_seed() {
    let players = [
        participant("A", &[pet("mosquito")]),
        participant("B", &[pet("mosquito")]),
        participant("C", &[pet("mosquito")]),
    ];

    let standings = round_robin(&players, &config(42)).unwrap();

    for matchup in &standings.matchups {
        assert_eq!(
            matchup.seed,
            derive_seed(42, matchup.first as usize, matchup.second as usize)
        );
    }
}

#[test]
fn test_draws_count_half_a_win() {
    let players = [
        participant("A", &[create_unit("A", 10, 10)]),
        participant("B", &[create_unit("B", 10, 10)]),
    ];

    let standings = round_robin(&players, &config(0)).unwrap();

    assert_eq!(standings.records[0].draws, 1);
    assert_eq!(standings.win_rates(), [0.5, 0.5]);
}

fn league() -> Vec<Participant> {
    let names = [
        ["ant", "mosquito", "cricket", "horse", "flamingo"],
        ["hedgehog", "peacock", "kangaroo", "elephant", "blowfish"],
        ["camel", "ox", "sheep", "dolphin", "skunk"],
        ["deer", "hippo", "rhino", "gorilla", "boar"],
        ["sheep", "horse", "horse", "cricket", "ant"],
    ];
    names
        .iter()
        .enumerate()
        .map(|(index, team_names)| {
            let units: Vec<Unit> = team_names.iter().map(|name| pet(name)).collect();
            Participant::new(&alloc::format!("team-{index}"), team(&units))
        })
        .collect()
}

#[test]
fn test_standings_are_reproducible() {
    let players = league();
    let config = config(2024);

    let first = round_robin(&players, &config).unwrap();
    let second = round_robin(&players, &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.matchups.len(), 10);
}

#[test]
fn test_fight_cap() {
    let players = league();
    let config = RoundRobinConfig {
        fights_per_participant: Some(1),
        ..config(3)
    };

    let standings = round_robin(&players, &config).unwrap();

    let pairs: Vec<_> = standings.matchups.iter().map(|m| (m.first, m.second)).collect();
    assert_eq!(pairs, [(0, 1), (1, 2), (2, 3), (3, 4)]);
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential() {
    let players = league();
    let config = config(7);

    let sequential = round_robin(&players, &config).unwrap();
    let parallel = crate::match_runner::round_robin_par(&players, &config).unwrap();

    assert_eq!(sequential, parallel);
}
