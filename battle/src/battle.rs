//! Battle state machine.
//!
//! ```text
//! StartOfBattle -> HurtFaintCascade -> BeforeAttack -> Attack -> AfterAttackCascade
//!                                          ^                              |
//!                                          |                              v
//!                                      (loop-or-end) <------------ KnockoutCheck -> Terminal
//! ```
//!
//! Every cascade is a bounded fixed-point loop: sweep fainted units, turn the sweep and
//! the previous pass's signals into triggers, resolve them in priority order, repeat.

use alloc::vec::Vec;
use core::mem;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::board::{Board, UnitId};
use crate::error::{BattleError, BattleResult};
use crate::event::{BattlePhase, CombatEvent, Signal, TriggerEvent, TriggerPayload};
use crate::limits::{BattleConfig, BattleLimits, LimitReason};
use crate::resolver::{self, apply_damage, ResolveContext, Resolution};
use crate::rng::{BattleRng, XorShiftRng};
use crate::roster::Roster;
use crate::scheduler::Scheduler;
use crate::types::{Side, Status, TriggerKind, CHILI_SPLASH};

/// Terminal result of one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BattleOutcome {
    Win { side: Side },
    Draw,
}

/// The outcome seen from one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SideResult {
    Win,
    Lose,
    Draw,
}

impl BattleOutcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            BattleOutcome::Win { side } => Some(side),
            BattleOutcome::Draw => None,
        }
    }

    pub fn loser(self) -> Option<Side> {
        self.winner().map(Side::opponent)
    }

    pub fn result_for(self, side: Side) -> SideResult {
        match self.winner() {
            Some(winner) if winner == side => SideResult::Win,
            Some(_) => SideResult::Lose,
            None => SideResult::Draw,
        }
    }
}

/// Everything a finished battle hands back.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    /// Survivors of the first side, battle-only buffs removed.
    pub first: Roster,
    pub second: Roster,
    /// Attack exchanges started.
    pub rounds: u32,
    pub events: Vec<CombatEvent>,
    /// Safety bound that forced the draw, if one did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovered: Option<LimitReason>,
}

impl BattleReport {
    pub fn roster(&self, side: Side) -> &Roster {
        match side {
            Side::First => &self.first,
            Side::Second => &self.second,
        }
    }
}

/// One battle in progress. Owns private copies of both rosters and its own RNG.
pub struct Battle<R: BattleRng> {
    boards: [Board; 2],
    rng: R,
    limits: BattleLimits,
    phase: BattlePhase,
    round: u32,
    events: Vec<CombatEvent>,
    /// Hurt and summon signals waiting for the next cascade.
    signals: Vec<Signal>,
    /// Units whose attack or knockout effect killed something and may react to it.
    knockouts: Vec<(Side, UnitId)>,
    attackers: [Option<UnitId>; 2],
    outcome: Option<BattleOutcome>,
    recovered: Option<LimitReason>,
}

impl<R: BattleRng> Battle<R> {
    pub fn new(first: &Roster, second: &Roster, config: BattleConfig, rng: R) -> BattleResult<Self> {
        let capacity = config.roster_capacity as usize;
        first.validate(capacity)?;
        second.validate(capacity)?;

        let mut limits = BattleLimits::new(config);
        let boards = [
            Board::from_roster(first, Side::First, &mut limits),
            Board::from_roster(second, Side::Second, &mut limits),
        ];
        Ok(Self {
            boards,
            rng,
            limits,
            phase: BattlePhase::StartOfBattle,
            round: 0,
            events: Vec::new(),
            signals: Vec::new(),
            knockouts: Vec::new(),
            attackers: [None, None],
            outcome: None,
            recovered: None,
        })
    }

    /// Phase the next [`Battle::step`] will run.
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn boards(&self) -> &[Board; 2] {
        &self.boards
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BattlePhase::Terminal
    }

    /// Run one phase and move to the next.
    ///
    /// A tripped safety bound ends the battle in a draw and is not an error. Fatal errors
    /// end the battle without an outcome.
    pub fn step(&mut self) -> BattleResult<BattlePhase> {
        if self.is_finished() {
            return Ok(BattlePhase::Terminal);
        }
        self.limits.reset_phase_counters();
        let next = match self.advance() {
            Ok(next) => next,
            Err(BattleError::LimitExceeded { reason }) => self.force_draw(reason),
            Err(err) => {
                self.phase = BattlePhase::Terminal;
                return Err(err);
            }
        };
        self.phase = next;
        Ok(next)
    }

    pub fn run(mut self) -> BattleResult<BattleReport> {
        while !self.is_finished() {
            self.step()?;
        }
        Ok(self.into_report())
    }

    fn into_report(self) -> BattleReport {
        let [first, second] = self.boards.map(|board| {
            let mut roster = board.into_roster();
            roster.leave_battle();
            roster
        });
        BattleReport {
            outcome: self.outcome.unwrap_or(BattleOutcome::Draw),
            first,
            second,
            rounds: self.round,
            events: self.events,
            recovered: self.recovered,
        }
    }

    fn advance(&mut self) -> BattleResult<BattlePhase> {
        match self.phase {
            BattlePhase::StartOfBattle => self.start_of_battle(),
            BattlePhase::HurtFaintCascade => {
                self.enter(BattlePhase::HurtFaintCascade);
                let signals = mem::take(&mut self.signals);
                self.cascade(signals)?;
                Ok(self.loop_or_end())
            }
            BattlePhase::BeforeAttack => self.before_attack(),
            BattlePhase::Attack => self.attack(),
            BattlePhase::AfterAttackCascade => self.after_attack(),
            BattlePhase::KnockoutCheck => self.knockout_check(),
            BattlePhase::Terminal => Ok(BattlePhase::Terminal),
        }
    }

    fn enter(&mut self, phase: BattlePhase) {
        self.events.push(CombatEvent::PhaseStart {
            phase,
            round: self.round,
        });
    }

    fn start_of_battle(&mut self) -> BattleResult<BattlePhase> {
        self.enter(BattlePhase::StartOfBattle);
        let triggers = Side::BOTH
            .into_iter()
            .flat_map(|side| {
                self.boards[side.index()]
                    .active()
                    .filter(|(_, u)| u.unit.trigger == TriggerKind::StartOfBattle)
                    .map(move |(_, u)| TriggerEvent::new(u.id, side, TriggerKind::StartOfBattle))
            })
            .collect();
        let signals = self.resolve_pass(triggers)?;
        self.signals.extend(signals);
        Ok(BattlePhase::HurtFaintCascade)
    }

    fn before_attack(&mut self) -> BattleResult<BattlePhase> {
        self.limits.record_round()?;
        self.round += 1;
        self.enter(BattlePhase::BeforeAttack);
        log::debug!(target: "battle", "round {}", self.round);

        let triggers = Side::BOTH
            .into_iter()
            .filter_map(|side| {
                self.boards[side.index()]
                    .front()
                    .filter(|u| u.unit.trigger == TriggerKind::BeforeAttack)
                    .map(|u| TriggerEvent::new(u.id, side, TriggerKind::BeforeAttack))
            })
            .collect();
        let signals = self.resolve_pass(triggers)?;
        self.cascade(signals)?;

        if self.boards.iter().all(|board| board.front().is_some()) {
            Ok(BattlePhase::Attack)
        } else {
            Ok(self.loop_or_end())
        }
    }

    fn attack(&mut self) -> BattleResult<BattlePhase> {
        self.enter(BattlePhase::Attack);
        let (Some(first), Some(second)) = (
            self.boards[0].front().map(|u| u.id),
            self.boards[1].front().map(|u| u.id),
        ) else {
            return Ok(self.loop_or_end());
        };
        let fronts = [first, second];
        self.attackers = [Some(first), Some(second)];

        // Both hits are computed before either lands.
        let mut damage = [0; 2];
        let mut splash = [false; 2];
        for side in Side::BOTH {
            let i = side.index();
            if let Some(front) = self.boards[i].get_mut(fronts[i]) {
                splash[i] = front.unit.status == Some(Status::Chili);
                damage[i] = front.unit.attack_damage();
            }
        }
        self.events.push(CombatEvent::Clash {
            first_damage: damage[0],
            second_damage: damage[1],
        });

        let mut resolution = Resolution::default();
        for side in Side::BOTH {
            let attacker = fronts[side.index()];
            let defender = fronts[side.opponent().index()];
            let board = &mut self.boards[side.opponent().index()];
            let behind = board
                .position(defender)
                .and_then(|slot| board.active_behind(slot).next())
                .map(|u| u.id);
            if damage[side.index()] > 0 {
                apply_damage(board, defender, damage[side.index()], Some(attacker), &mut resolution);
            }
            if let (true, Some(behind)) = (splash[side.index()], behind) {
                apply_damage(board, behind, CHILI_SPLASH, Some(attacker), &mut resolution);
            }
        }

        self.events.extend(resolution.mutations);
        for signal in resolution.follow_on {
            match signal {
                Signal::Killed { by, .. } => self.record_knockout(by),
                other => self.signals.push(other),
            }
        }
        Ok(BattlePhase::AfterAttackCascade)
    }

    fn after_attack(&mut self) -> BattleResult<BattlePhase> {
        self.enter(BattlePhase::AfterAttackCascade);
        let mut triggers = Vec::new();
        for side in Side::BOTH {
            let board = &self.boards[side.index()];
            let Some(attacker) = self.attackers[side.index()] else {
                continue;
            };
            if let Some(unit) = board.get(attacker) {
                if unit.is_active() && unit.unit.trigger == TriggerKind::AfterAttack {
                    triggers.push(TriggerEvent::new(attacker, side, TriggerKind::AfterAttack));
                }
            }
            let friend = board
                .position(attacker)
                .and_then(|slot| board.active_behind(slot).next());
            if let Some(friend) = friend {
                if friend.unit.trigger == TriggerKind::FriendAheadAttacks {
                    triggers.push(
                        TriggerEvent::new(friend.id, side, TriggerKind::FriendAheadAttacks)
                            .with_payload(TriggerPayload::Subject { unit: attacker }),
                    );
                }
            }
        }
        self.attackers = [None, None];

        let after = self.resolve_pass(triggers)?;
        let mut signals = mem::take(&mut self.signals);
        signals.extend(after);
        self.cascade(signals)?;
        Ok(BattlePhase::KnockoutCheck)
    }

    fn knockout_check(&mut self) -> BattleResult<BattlePhase> {
        self.enter(BattlePhase::KnockoutCheck);
        let mut passes = 0;
        while !self.knockouts.is_empty() {
            passes += 1;
            self.limits.check_cascade(passes)?;

            let triggers = mem::take(&mut self.knockouts)
                .into_iter()
                .filter(|(side, id)| {
                    self.boards[side.index()]
                        .get(*id)
                        .map_or(false, |u| u.is_active() && u.unit.trigger == TriggerKind::Knockout)
                })
                .map(|(side, id)| TriggerEvent::new(id, side, TriggerKind::Knockout))
                .collect();

            let mut rest = Vec::new();
            for signal in self.resolve_pass(triggers)? {
                match signal {
                    Signal::Killed { by, .. } => self.record_knockout(by),
                    other => rest.push(other),
                }
            }
            self.cascade(rest)?;
        }
        Ok(self.loop_or_end())
    }

    fn record_knockout(&mut self, by: UnitId) {
        let Some(side) = Side::BOTH
            .into_iter()
            .find(|side| self.boards[side.index()].get(by).is_some())
        else {
            return;
        };
        if !self.knockouts.contains(&(side, by)) {
            self.knockouts.push((side, by));
        }
    }

    fn loop_or_end(&mut self) -> BattlePhase {
        let alive = [self.boards[0].has_active(), self.boards[1].has_active()];
        match alive {
            [true, true] => BattlePhase::BeforeAttack,
            [true, false] => self.finish(BattleOutcome::Win { side: Side::First }),
            [false, true] => self.finish(BattleOutcome::Win { side: Side::Second }),
            [false, false] => self.finish(BattleOutcome::Draw),
        }
    }

    fn finish(&mut self, outcome: BattleOutcome) -> BattlePhase {
        log::debug!(target: "battle", "battle over after {} round(s): {:?}", self.round, outcome);
        self.events.push(CombatEvent::BattleEnd {
            winner: outcome.winner(),
        });
        self.outcome = Some(outcome);
        BattlePhase::Terminal
    }

    fn force_draw(&mut self, reason: LimitReason) -> BattlePhase {
        log::warn!(target: "battle", "{} in round {}, calling a draw", reason, self.round);
        self.events.push(CombatEvent::LimitExceeded { reason });
        self.recovered = Some(reason);
        self.finish(BattleOutcome::Draw)
    }

    /// Resolve until nothing new faints, gets hurt or arrives.
    fn cascade(&mut self, mut signals: Vec<Signal>) -> BattleResult<()> {
        let mut passes = 0;
        loop {
            let triggers = self.collect_cascade_triggers(&signals);
            if triggers.is_empty() {
                break;
            }
            passes += 1;
            self.limits.check_cascade(passes)?;
            signals = self.resolve_pass(triggers)?;
        }

        let capacity = self.limits.config().roster_capacity as usize;
        for board in &self.boards {
            board.validate(capacity)?;
            board.check_settled()?;
        }
        Ok(())
    }

    /// Sweep fainted units and turn the sweep plus `signals` into the next pass.
    fn collect_cascade_triggers(&mut self, signals: &[Signal]) -> Vec<TriggerEvent> {
        let mut triggers = Vec::new();

        for side in Side::BOTH {
            let board = &mut self.boards[side.index()];
            for (slot, fallen) in board.sweep_fainted() {
                self.events.push(CombatEvent::UnitFaint {
                    side,
                    unit: fallen.to_view(),
                    slot: slot as u32,
                });
                if let Some(friend) = board.active_behind(slot).next() {
                    if friend.unit.trigger == TriggerKind::FriendAheadFaints {
                        triggers.push(
                            TriggerEvent::new(friend.id, side, TriggerKind::FriendAheadFaints)
                                .with_payload(TriggerPayload::Subject { unit: fallen.id }),
                        );
                    }
                }
                let leaves_summon =
                    matches!(fallen.unit.status, Some(Status::Honey | Status::ExtraLife));
                if fallen.unit.trigger == TriggerKind::Faint || leaves_summon {
                    triggers.push(
                        TriggerEvent::new(fallen.id, side, TriggerKind::Faint).with_payload(
                            TriggerPayload::Fainted {
                                unit: fallen.unit,
                                slot,
                            },
                        ),
                    );
                }
            }
        }

        for signal in signals {
            match *signal {
                Signal::Hurt { unit, side } => {
                    let hurt = self.boards[side.index()]
                        .get(unit)
                        .map_or(false, |u| u.is_active() && u.unit.trigger == TriggerKind::Hurt);
                    if hurt {
                        triggers.push(TriggerEvent::new(unit, side, TriggerKind::Hurt));
                    }
                }
                Signal::Summoned { unit, side } => {
                    let friends = self.boards[side.index()]
                        .active()
                        .filter(|(_, u)| u.id != unit && u.unit.trigger == TriggerKind::FriendSummoned)
                        .map(|(_, u)| {
                            TriggerEvent::new(u.id, side, TriggerKind::FriendSummoned)
                                .with_payload(TriggerPayload::Subject { unit })
                        });
                    triggers.extend(friends);
                }
                Signal::Killed { .. } => {}
            }
        }
        triggers
    }

    /// Resolve one batch of triggers in priority order. Returns what the batch set off.
    fn resolve_pass(&mut self, triggers: Vec<TriggerEvent>) -> BattleResult<Vec<Signal>> {
        let mut scheduler = Scheduler::new();
        for trigger in triggers {
            scheduler.push(trigger, &mut self.rng);
        }

        let mut signals = Vec::new();
        while let Some(event) = scheduler.pop_next(&self.boards) {
            self.limits.record_trigger()?;
            log::debug!(target: "battle", "{} ({}) resolves {:?}", event.source, event.side, event.kind);
            self.events.push(CombatEvent::AbilityTrigger {
                source_instance_id: event.source,
                side: event.side,
                trigger: event.kind,
            });
            let mut ctx = ResolveContext {
                boards: &mut self.boards,
                rng: &mut self.rng,
                limits: &mut self.limits,
            };
            let resolution = resolver::resolve(&event, &mut ctx)?;
            self.events.extend(resolution.mutations);
            signals.extend(resolution.follow_on);
        }
        Ok(signals)
    }
}

/// Run a battle between two rosters to completion.
///
/// The same rosters, seed and config always produce the same report.
pub fn resolve_battle(
    first: &Roster,
    second: &Roster,
    seed: u64,
    config: BattleConfig,
) -> BattleResult<BattleReport> {
    Battle::new(first, second, config, XorShiftRng::seed_from_u64(seed))?.run()
}
