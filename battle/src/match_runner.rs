//! Single round robin over many rosters.
//!
//! Matchups run in input order and are never reshuffled. Each battle gets its own seed
//! derived from the base seed and the pair, so running matchups on several threads gives
//! the same standings as running them one after another.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::battle::{resolve_battle, BattleOutcome, SideResult};
use crate::error::BattleError;
use crate::limits::BattleConfig;
use crate::rng::derive_seed;
use crate::roster::Roster;
use crate::types::Side;

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    pub roster: Roster,
}

impl Participant {
    pub fn new(name: &str, roster: Roster) -> Self {
        Self {
            name: name.to_string(),
            roster,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoundRobinConfig {
    pub base_seed: u64,
    /// Battles each participant starts against those listed after it.
    /// `None` means everyone after it. `Some(0)` is rejected.
    pub fights_per_participant: Option<usize>,
    pub battle: BattleConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("{requested} fights per participant needs more than {participants} participants")]
    TooManyRounds {
        requested: usize,
        participants: usize,
    },
    #[error("fights per participant must be at least 1")]
    NoFights,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MatchResult {
    Decided { outcome: BattleOutcome },
    /// The battle hit a fatal error. Counts for neither side.
    Skipped { error: BattleError },
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    /// Index of the participant on the first side.
    pub first: u32,
    pub second: u32,
    pub seed: u64,
    pub result: MatchResult,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub skipped: u32,
}

impl Record {
    pub fn fought(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Draws count half a win. Someone who never fought has a rate of 0.
    pub fn win_rate(&self) -> f64 {
        match self.fought() {
            0 => 0.0,
            fought => (f64::from(self.wins) + f64::from(self.draws) * 0.5) / f64::from(fought),
        }
    }

    fn add(&mut self, result: SideResult) {
        match result {
            SideResult::Win => self.wins += 1,
            SideResult::Lose => self.losses += 1,
            SideResult::Draw => self.draws += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standings {
    /// One record per participant, in input order.
    pub records: Vec<Record>,
    pub matchups: Vec<Matchup>,
}

impl Standings {
    pub fn win_rates(&self) -> Vec<f64> {
        self.records.iter().map(Record::win_rate).collect()
    }

    fn tally(participants: usize, matchups: Vec<Matchup>) -> Self {
        let mut records = alloc::vec![Record::default(); participants];
        for matchup in &matchups {
            let (first, second) = (matchup.first as usize, matchup.second as usize);
            match &matchup.result {
                MatchResult::Decided { outcome } => {
                    records[first].add(outcome.result_for(Side::First));
                    records[second].add(outcome.result_for(Side::Second));
                }
                MatchResult::Skipped { .. } => {
                    records[first].skipped += 1;
                    records[second].skipped += 1;
                }
            }
        }
        Self { records, matchups }
    }
}

/// Pairs to fight, in order. Participants without an active unit sit out entirely.
pub fn schedule(
    participants: &[Participant],
    fights_per_participant: Option<usize>,
) -> Result<Vec<(usize, usize)>, MatchError> {
    let count = participants.len();
    let cap = match fights_per_participant {
        Some(0) => return Err(MatchError::NoFights),
        Some(requested) if requested >= count => {
            return Err(MatchError::TooManyRounds {
                requested,
                participants: count,
            })
        }
        Some(requested) => requested,
        None => count.saturating_sub(1),
    };

    let ready: Vec<bool> = participants.iter().map(|p| p.roster.has_active()).collect();
    let mut pairs = Vec::new();
    for first in 0..count {
        if !ready[first] {
            continue;
        }
        let opponents = (first + 1..count).filter(|&second| ready[second]).take(cap);
        pairs.extend(opponents.map(|second| (first, second)));
    }
    Ok(pairs)
}

fn run_matchup(participants: &[Participant], first: usize, second: usize, config: &RoundRobinConfig) -> Matchup {
    let seed = derive_seed(config.base_seed, first, second);
    let result = match resolve_battle(
        &participants[first].roster,
        &participants[second].roster,
        seed,
        config.battle.clone(),
    ) {
        Ok(report) => MatchResult::Decided {
            outcome: report.outcome,
        },
        Err(error) => {
            log::error!(
                target: "match_runner",
                "{} vs {} skipped: {}",
                participants[first].name,
                participants[second].name,
                error
            );
            MatchResult::Skipped { error }
        }
    };
    Matchup {
        first: first as u32,
        second: second as u32,
        seed,
        result,
    }
}

/// Run the round robin on the calling thread.
pub fn round_robin(participants: &[Participant], config: &RoundRobinConfig) -> Result<Standings, MatchError> {
    let matchups = schedule(participants, config.fights_per_participant)?
        .into_iter()
        .map(|(first, second)| run_matchup(participants, first, second, config))
        .collect();
    Ok(Standings::tally(participants.len(), matchups))
}

/// Run the round robin with one rayon task per matchup. Same standings as [`round_robin`].
#[cfg(feature = "parallel")]
pub fn round_robin_par(
    participants: &[Participant],
    config: &RoundRobinConfig,
) -> Result<Standings, MatchError> {
    use rayon::prelude::*;

    let pairs = schedule(participants, config.fights_per_participant)?;
    let matchups = pairs
        .par_iter()
        .map(|&(first, second)| run_matchup(participants, first, second, config))
        .collect();
    Ok(Standings::tally(participants.len(), matchups))
}
