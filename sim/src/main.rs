//! Command-line runner for the battle engine.
//!
//! Every command prints JSON on stdout. Engine logs go to stderr.

mod logging;
mod teams;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sap_battle::{
    catalogue, resolve_battle, round_robin, round_robin_par, BattleConfig, Participant, RoundRobinConfig,
};
use serde::Serialize;
use tracing_subscriber::filter::LevelFilter;

use crate::teams::{load_league, load_team};

#[derive(Parser)]
#[command(name = "sap-sim", version, about = "Run SuperAlphaPet battles and round robins")]
struct Cli {
    /// Engine log level on stderr (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fight one battle between two team files and print the report
    Battle {
        #[arg(long)]
        first: PathBuf,
        #[arg(long)]
        second: PathBuf,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// JSON battle config; missing fields keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Leave the combat log out of the output
        #[arg(long)]
        summary: bool,
    },
    /// Run a round robin over a league file and print the standings
    RoundRobin {
        /// JSON array of team files
        #[arg(long)]
        teams: PathBuf,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Battles each team starts; defaults to everyone listed after it
        #[arg(long)]
        rounds: Option<usize>,
        /// Spread matchups over all cores
        #[arg(long)]
        parallel: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the pet catalogue
    Catalogue,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_with_level(cli.log_level).context("installing the stderr logger")?;

    match cli.command {
        Command::Battle {
            first,
            second,
            seed,
            config,
            summary,
        } => run_battle(&first, &second, seed, config.as_deref(), summary),
        Command::RoundRobin {
            teams,
            seed,
            rounds,
            parallel,
            config,
        } => run_round_robin(&teams, seed, rounds, parallel, config.as_deref()),
        Command::Catalogue => print_catalogue(),
    }
}

fn load_config(path: Option<&Path>) -> Result<BattleConfig> {
    let Some(path) = path else {
        return Ok(BattleConfig::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing battle config {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_battle(first: &Path, second: &Path, seed: u64, config: Option<&Path>, summary: bool) -> Result<()> {
    let config = load_config(config)?;
    let capacity = config.roster_capacity as usize;
    let first = load_team(first)?.to_roster(capacity)?;
    let second = load_team(second)?.to_roster(capacity)?;

    let mut report = resolve_battle(&first, &second, seed, config)?;
    log::info!(target: "sim", "{:?} after {} round(s)", report.outcome, report.rounds);
    if summary {
        report.events.clear();
    }
    print_json(&report)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Ranking {
    name: String,
    wins: u32,
    losses: u32,
    draws: u32,
    skipped: u32,
    win_rate: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoundRobinOutput {
    rankings: Vec<Ranking>,
    matchups: Vec<sap_battle::Matchup>,
}

fn run_round_robin(
    league: &Path,
    seed: u64,
    rounds: Option<usize>,
    parallel: bool,
    config: Option<&Path>,
) -> Result<()> {
    let battle = load_config(config)?;
    let capacity = battle.roster_capacity as usize;
    let participants = load_league(league)?
        .iter()
        .enumerate()
        .map(|(index, team)| {
            let name = team.display_name(&format!("team-{index}"));
            let roster = team.to_roster(capacity).with_context(|| format!("building {name}"))?;
            Ok(Participant::new(&name, roster))
        })
        .collect::<Result<Vec<_>>>()?;

    let config = RoundRobinConfig {
        base_seed: seed,
        fights_per_participant: rounds,
        battle,
    };
    let standings = if parallel {
        round_robin_par(&participants, &config)?
    } else {
        round_robin(&participants, &config)?
    };
    log::info!(target: "sim", "{} matchup(s) fought", standings.matchups.len());

    let mut rankings: Vec<Ranking> = participants
        .iter()
        .zip(&standings.records)
        .map(|(participant, record)| Ranking {
            name: participant.name.clone(),
            wins: record.wins,
            losses: record.losses,
            draws: record.draws,
            skipped: record.skipped,
            win_rate: record.win_rate(),
        })
        .collect();
    rankings.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));

    print_json(&RoundRobinOutput {
        rankings,
        matchups: standings.matchups,
    })
}

fn print_catalogue() -> Result<()> {
    let pets: Vec<_> = catalogue::templates()
        .into_iter()
        .map(|template| serde_json::json!({ "tier": template.tier, "unit": template.unit }))
        .collect();
    print_json(&pets)
}
