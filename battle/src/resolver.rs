//! Effect resolution.
//!
//! One function per effect kind. Targets are chosen when the trigger resolves, from the
//! boards as they are at that moment, and only active units are eligible. An effect with
//! nothing to act on does nothing.

use alloc::vec::Vec;

use crate::board::{Board, CombatUnit, UnitId};
use crate::error::{BattleError, BattleResult, Invariant};
use crate::event::{CombatEvent, Signal, TriggerEvent, TriggerPayload};
use crate::limits::BattleLimits;
use crate::rng::BattleRng;
use crate::types::{Effect, Scaling, Side, Status, SummonSpec, Target, TriggerKind};
use crate::unit::Unit;

/// Name of the unit a Honey status leaves behind.
pub const BEE: &str = "bee";

/// Mutable battle state an effect may touch.
pub struct ResolveContext<'a, R: BattleRng> {
    pub boards: &'a mut [Board; 2],
    pub rng: &'a mut R,
    pub limits: &'a mut BattleLimits,
}

/// What resolving one trigger did, and what it set in motion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub mutations: Vec<CombatEvent>,
    pub follow_on: Vec<Signal>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty() && self.follow_on.is_empty()
    }
}

/// The unit whose effect is resolving.
struct Source {
    id: UnitId,
    side: Side,
    unit: Unit,
    slot: usize,
    alive: bool,
}

impl Source {
    /// `Ok(None)` when the unit is still on the board but has fainted in the meantime.
    fn locate(event: &TriggerEvent, boards: &[Board; 2]) -> BattleResult<Option<Self>> {
        if let Some((unit, slot)) = event.fainted_unit() {
            if event.kind != TriggerKind::Faint {
                return Err(mismatch(event.source));
            }
            return Ok(Some(Self {
                id: event.source,
                side: event.side,
                unit: unit.clone(),
                slot,
                alive: false,
            }));
        }

        let board = &boards[event.side.index()];
        let (Some(slot), Some(combat_unit)) = (board.position(event.source), board.get(event.source))
        else {
            return Err(BattleError::InvariantViolation {
                invariant: Invariant::MissingSource {
                    unit: event.source.0,
                },
            });
        };
        if !combat_unit.is_active() {
            return Ok(None);
        }
        if event.kind == TriggerKind::Faint || combat_unit.unit.trigger != event.kind {
            return Err(mismatch(event.source));
        }
        Ok(Some(Self {
            id: event.source,
            side: event.side,
            unit: combat_unit.unit.clone(),
            slot,
            alive: true,
        }))
    }

    fn level(&self) -> i32 {
        i32::from(self.unit.level())
    }
}

fn mismatch(unit: UnitId) -> BattleError {
    BattleError::InvariantViolation {
        invariant: Invariant::TriggerMismatch { unit: unit.0 },
    }
}

/// Resolve one trigger against the current boards.
pub fn resolve<R: BattleRng>(
    event: &TriggerEvent,
    ctx: &mut ResolveContext<'_, R>,
) -> BattleResult<Resolution> {
    let mut resolution = Resolution::default();
    let Some(source) = Source::locate(event, ctx.boards)? else {
        log::debug!(target: "resolver", "{} fainted before its {:?} resolved", event.source, event.kind);
        return Ok(resolution);
    };

    let runs_effect = source.unit.trigger == event.kind;
    let leaves_summon = matches!(source.unit.status, Some(Status::Honey | Status::ExtraLife));
    if event.kind == TriggerKind::Faint && !runs_effect && !leaves_summon {
        return Err(mismatch(source.id));
    }

    if runs_effect {
        let subject = match event.payload {
            TriggerPayload::Subject { unit } => Some(unit),
            _ => None,
        };
        apply_effect(&source, subject, ctx, &mut resolution)?;
    }
    if event.kind == TriggerKind::Faint && leaves_summon {
        status_summon(&source, ctx, &mut resolution)?;
    }
    Ok(resolution)
}

fn apply_effect<R: BattleRng>(
    source: &Source,
    subject: Option<UnitId>,
    ctx: &mut ResolveContext<'_, R>,
    out: &mut Resolution,
) -> BattleResult<()> {
    let (target, scaling) = match &source.unit.effect {
        Effect::None => return Ok(()),
        Effect::Summon { summon } => return summon_units(source, summon, ctx, out),
        Effect::Damage {
            target, scaling, ..
        }
        | Effect::ModifyStats {
            target, scaling, ..
        } => (target, *scaling),
        Effect::ReduceHealthPercent { target, .. } | Effect::GiveStatus { target, .. } => {
            (target, Scaling::Amount)
        }
    };

    let targets = select_targets(target, scaling, source, subject, ctx.boards, ctx.rng);
    if targets.is_empty() {
        log::debug!(target: "resolver", "{} {:?}: no targets for {:?}", source.id, source.unit.trigger, target);
        return Ok(());
    }
    log::debug!(target: "resolver", "{} {:?} hits {} unit(s)", source.id, source.unit.trigger, targets.len());

    match &source.unit.effect {
        Effect::Damage {
            amount, scaling, ..
        } => {
            let amount = scaled(*amount, *scaling, source.level());
            for (side, id) in targets {
                apply_damage(&mut ctx.boards[side.index()], id, amount, Some(source.id), out);
            }
        }
        Effect::ModifyStats {
            attack,
            health,
            until_end_of_battle,
            scaling,
            ..
        } => {
            let attack = scaled(*attack, *scaling, source.level());
            let health = scaled(*health, *scaling, source.level());
            for (side, id) in targets {
                modify_stats(&mut ctx.boards[side.index()], id, attack, health, *until_end_of_battle, source.id, out);
            }
        }
        Effect::ReduceHealthPercent { percent, .. } => {
            let percent = u32::from(*percent) * source.unit.level() as u32;
            let percent = percent.min(100) as u8;
            for (side, id) in targets {
                reduce_health(&mut ctx.boards[side.index()], id, percent, source.id, out);
            }
        }
        Effect::GiveStatus { status, .. } => {
            for (side, id) in targets {
                give_status(&mut ctx.boards[side.index()], id, *status, out);
            }
        }
        Effect::None | Effect::Summon { .. } => {}
    }
    Ok(())
}

fn scaled(value: i32, scaling: Scaling, level: i32) -> i32 {
    match scaling {
        Scaling::Amount => value.saturating_mul(level),
        Scaling::TargetCount => value,
    }
}

fn target_count(count: u8, scaling: Scaling, level: i32) -> usize {
    match scaling {
        Scaling::Amount => usize::from(count),
        Scaling::TargetCount => usize::from(count) * level as usize,
    }
}

/// Deal one hit. Shared by effects and the attack exchange.
///
/// Emits `Hurt` for a survivor that lost health and `Killed` for a unit the hit finished,
/// when the hit has a source.
pub(crate) fn apply_damage(
    board: &mut Board,
    id: UnitId,
    amount: i32,
    source: Option<UnitId>,
    out: &mut Resolution,
) {
    let side = board.side();
    let Some(target) = board.get_mut(id) else {
        return;
    };
    if !target.is_active() {
        return;
    }
    let hit = target.unit.receive_damage(amount);
    out.mutations.push(CombatEvent::Damage {
        source_instance_id: source,
        target_instance_id: id,
        damage: hit.dealt,
        remaining_hp: target.unit.effective_health(),
    });
    if let Some(status) = hit.consumed {
        out.mutations.push(CombatEvent::StatusConsumed {
            target_instance_id: id,
            status,
        });
    }
    if hit.dealt <= 0 {
        return;
    }
    if target.is_active() {
        out.follow_on.push(Signal::Hurt { unit: id, side });
    } else if let Some(by) = source {
        out.follow_on.push(Signal::Killed { by, victim: id });
    }
}

fn modify_stats(
    board: &mut Board,
    id: UnitId,
    attack: i32,
    health: i32,
    until_end_of_battle: bool,
    source: UnitId,
    out: &mut Resolution,
) {
    let Some(target) = board.get_mut(id) else {
        return;
    };
    target.unit.boost(attack, health, until_end_of_battle);
    out.mutations.push(CombatEvent::ModifyStats {
        source_instance_id: source,
        target_instance_id: id,
        attack_change: attack,
        health_change: health,
        new_attack: target.unit.effective_attack(),
        new_health: target.unit.effective_health(),
    });
}

/// Percent loss skips statuses but hurts like any other damage.
fn reduce_health(board: &mut Board, id: UnitId, percent: u8, source: UnitId, out: &mut Resolution) {
    let side = board.side();
    let Some(target) = board.get_mut(id) else {
        return;
    };
    let lost = target.unit.reduce_health_percent(percent);
    out.mutations.push(CombatEvent::Damage {
        source_instance_id: Some(source),
        target_instance_id: id,
        damage: lost,
        remaining_hp: target.unit.effective_health(),
    });
    if lost > 0 && target.is_active() {
        out.follow_on.push(Signal::Hurt { unit: id, side });
    }
}

fn give_status(board: &mut Board, id: UnitId, status: Status, out: &mut Resolution) {
    let Some(target) = board.get_mut(id) else {
        return;
    };
    target.unit.status = Some(status);
    out.mutations.push(CombatEvent::StatusGained {
        target_instance_id: id,
        status,
    });
}

fn summon_units<R: BattleRng>(
    source: &Source,
    spec: &SummonSpec,
    ctx: &mut ResolveContext<'_, R>,
    out: &mut Resolution,
) -> BattleResult<()> {
    // Living summoners put the new unit at the front.
    let slot = if source.alive { 0 } else { source.slot };
    let level = source.level();
    for _ in 0..spec.count {
        let mut unit = Unit::new(
            &spec.name,
            spec.attack.saturating_mul(level),
            spec.health.saturating_mul(level),
        );
        unit.status = spec.status;
        if !place_summon(source.side, slot, unit, ctx, out)? {
            break;
        }
    }
    Ok(())
}

/// Summon granted by the status a unit held when it fainted.
fn status_summon<R: BattleRng>(
    source: &Source,
    ctx: &mut ResolveContext<'_, R>,
    out: &mut Resolution,
) -> BattleResult<()> {
    let Some(status) = source.unit.status else {
        return Ok(());
    };
    let unit = match status {
        Status::Honey => Unit::new(BEE, 1, 1),
        Status::ExtraLife => {
            let mut revived = source.unit.clone();
            revived.leave_battle();
            revived.attack = 1;
            revived.health = 1;
            revived.status = None;
            revived
        }
        _ => return Ok(()),
    };
    out.mutations.push(CombatEvent::StatusConsumed {
        target_instance_id: source.id,
        status,
    });
    place_summon(source.side, source.slot, unit, ctx, out)?;
    Ok(())
}

/// Returns false when the board had no room.
fn place_summon<R: BattleRng>(
    side: Side,
    slot: usize,
    unit: Unit,
    ctx: &mut ResolveContext<'_, R>,
    out: &mut Resolution,
) -> BattleResult<bool> {
    let combat_unit = CombatUnit {
        id: UnitId(ctx.limits.generate_instance_id()),
        unit,
    };
    let id = combat_unit.id;
    let view = combat_unit.to_view();
    match ctx.boards[side.index()].summon(slot, combat_unit) {
        Ok(placed) => {
            ctx.limits.record_summon()?;
            out.mutations.push(CombatEvent::UnitSpawn {
                side,
                spawned_unit: view,
                slot: placed as u32,
            });
            out.follow_on.push(Signal::Summoned { unit: id, side });
            Ok(true)
        }
        Err(refused) => {
            log::debug!(target: "resolver", "{} side is full, {} not summoned", side, refused.unit.name);
            Ok(false)
        }
    }
}

fn select_targets<R: BattleRng>(
    target: &Target,
    scaling: Scaling,
    source: &Source,
    subject: Option<UnitId>,
    boards: &[Board; 2],
    rng: &mut R,
) -> Vec<(Side, UnitId)> {
    let ally_side = source.side;
    let enemy_side = source.side.opponent();
    let allies = &boards[ally_side.index()];
    let enemies = &boards[enemy_side.index()];
    let level = source.level();

    let other_allies = || -> Vec<UnitId> {
        allies
            .active()
            .map(|(_, u)| u.id)
            .filter(|id| *id != source.id)
            .collect()
    };
    let tag = |side: Side| move |id: UnitId| (side, id);

    match target {
        Target::SelfUnit => {
            if source.alive && allies.is_active(source.id) {
                alloc::vec![(ally_side, source.id)]
            } else {
                Vec::new()
            }
        }
        Target::RandomAlly { count } => rng
            .sample(&other_allies(), target_count(*count, scaling, level))
            .into_iter()
            .map(tag(ally_side))
            .collect(),
        Target::RandomEnemy { count } => rng
            .sample(&enemies.active_ids(), target_count(*count, scaling, level))
            .into_iter()
            .map(tag(enemy_side))
            .collect(),
        Target::AllAllies => other_allies().into_iter().map(tag(ally_side)).collect(),
        Target::AllEnemies => enemies.active_ids().into_iter().map(tag(enemy_side)).collect(),
        Target::AllUnits => other_allies()
            .into_iter()
            .map(tag(ally_side))
            .chain(enemies.active_ids().into_iter().map(tag(enemy_side)))
            .collect(),
        Target::AllyAhead => allies
            .active_ahead(source.slot)
            .map(|u| (ally_side, u.id))
            .into_iter()
            .collect(),
        Target::AlliesBehind { count } => allies
            .active_behind(source.slot)
            .take(target_count(*count, scaling, level))
            .map(|u| (ally_side, u.id))
            .collect(),
        Target::FrontEnemy => enemies
            .front()
            .map(|u| (enemy_side, u.id))
            .into_iter()
            .collect(),
        Target::LowestHealthEnemy => {
            first_best(enemies, |a, b| a.effective_health() < b.effective_health())
                .map(tag(enemy_side))
                .into_iter()
                .collect()
        }
        Target::HighestHealthEnemy => {
            first_best(enemies, |a, b| a.effective_health() > b.effective_health())
                .map(tag(enemy_side))
                .into_iter()
                .collect()
        }
        Target::HighestAttackEnemy => {
            first_best(enemies, |a, b| a.effective_attack() > b.effective_attack())
                .map(tag(enemy_side))
                .into_iter()
                .collect()
        }
        Target::EventSubject => subject
            .and_then(|id| {
                Side::BOTH
                    .into_iter()
                    .find(|side| boards[side.index()].is_active(id))
                    .map(|side| (side, id))
            })
            .into_iter()
            .collect(),
    }
}

/// Frontmost active unit that no other unit strictly beats.
fn first_best(board: &Board, beats: impl Fn(&Unit, &Unit) -> bool) -> Option<UnitId> {
    board
        .active()
        .map(|(_, u)| u)
        .fold(None::<&CombatUnit>, |best, candidate| match best {
            Some(current) if !beats(&candidate.unit, &current.unit) => Some(current),
            _ => Some(candidate),
        })
        .map(|u| u.id)
}
