//! Discrete player commands
//!
//! Input is translated into `Command`s by the host and applied between ticks,
//! in arrival order. Every command is mode-gated here; anything that doesn't
//! apply in the current mode is ignored.

use serde::{Deserialize, Serialize};

use super::abilities::AbilityKey;
use super::deferred::DeferredAction;
use super::particles::ParticleKind;
use super::player::PlayerClass;
use super::projectile::ProjectileKind;
use super::state::{EntityRef, GameMode, WorldState};
use super::tick::{setup_game, setup_level};
use crate::consts::*;

/// Pointer button designator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Jump key pressed: start a run or make the party jump
    Jump,
    /// Jump key released: leave the death screen or the intermission
    Release,
    /// Rotate the formation (+1 moves everyone back a slot)
    Cycle(i32),
    /// Leader fires an ability slot
    Ability(AbilityKey),
    Pause,
    ToggleHighscores,
    Pointer(PointerButton),
    /// "Next level" button
    Advance,
    /// Spend experience on a slot level during the intermission
    Upgrade { class: PlayerClass, key: AbilityKey },
}

const ABILITY_VOLUME: f32 = 0.2;

/// Ticks between successive party members' jumps for formation slot `order`
pub fn jump_delay(order: usize, game_speed: f32) -> u64 {
    (order as f32 * TERRAIN_WIDTH / game_speed).round() as u64
}

/// Experience needed to raise a slot from `level`
pub fn upgrade_cost(level: u32) -> u64 {
    UPGRADE_COST_STEP * (level as u64 + 1)
}

pub fn apply_command(state: &mut WorldState, command: Command) {
    match command {
        Command::Jump => match state.mode {
            GameMode::Start => setup_game(state),
            _ if state.in_control() => schedule_party_jump(state, false),
            _ => {}
        },
        Command::Release => match state.mode {
            GameMode::Dead => state.set_mode(GameMode::Start),
            GameMode::Between => setup_level(state),
            _ => {}
        },
        Command::Cycle(dir) => cycle_party(state, dir),
        Command::Ability(key) => activate_ability(state, key),
        Command::Pause => {
            if state.in_control() {
                state.paused = !state.paused;
                log::info!("Paused: {}", state.paused);
            }
        }
        Command::ToggleHighscores => match state.mode {
            GameMode::Highscore => state.set_mode(GameMode::Start),
            GameMode::Start | GameMode::Dead => state.set_mode(GameMode::Highscore),
            _ => {}
        },
        Command::Pointer(button) => match (state.mode, button) {
            (GameMode::Start | GameMode::Dead, _) => setup_game(state),
            (GameMode::Running, PointerButton::Primary) => cycle_party(state, 1),
            (GameMode::Running, PointerButton::Secondary) => cycle_party(state, -1),
            (GameMode::Running | GameMode::Switching, PointerButton::Touch) => schedule_party_jump(state, false),
            _ => {}
        },
        Command::Advance => {
            if state.mode == GameMode::Between {
                setup_level(state);
            }
        }
        Command::Upgrade { class, key } => upgrade(state, class, key),
    }
}

/// Rotate every living player's rank and start walking to the new slots
fn cycle_party(state: &mut WorldState, dir: i32) {
    if state.mode != GameMode::Running {
        return;
    }
    let num_alive = state.num_alive();
    if num_alive == 0 {
        return;
    }
    for player in state.players.iter_mut().filter(|p| p.is_alive()) {
        player.cycle_order(dir, num_alive);
    }
    state.set_mode(GameMode::Switching);
}

/// Queue a jump for every living player, staggered by formation rank
pub fn schedule_party_jump(state: &mut WorldState, force: bool) {
    let now = state.time_ticks;
    let speed = state.game_speed;
    let jumps: Vec<_> = state
        .players
        .iter()
        .filter(|p| p.is_alive())
        .map(|p| (now + jump_delay(p.order, speed), p.id))
        .collect();

    for (due, player) in jumps {
        state.deferred.push(
            due,
            DeferredAction::Jump {
                player,
                speed: JUMP_SPEED,
                push: JUMP_PUSH,
                force,
            },
        );
    }
}

/// Fire the leader's ability in `key`, if it's off cooldown
pub fn activate_ability(state: &mut WorldState, key: AbilityKey) {
    if !state.in_control() {
        return;
    }
    let Some(index) = state.leader_index() else {
        return;
    };
    let leader = &state.players[index];
    if !leader.abilities.slot(key).is_ready() {
        return;
    }
    let class = leader.class;
    let desc = class.descriptor();

    let activated = match (class, key) {
        (PlayerClass::Paladin, AbilityKey::Q | AbilityKey::W) => true,
        (PlayerClass::Ranger, AbilityKey::Q) => {
            fire_at_first_enemy(state, index, ProjectileKind::Arrow);
            true
        }
        (PlayerClass::Magi, AbilityKey::Q) => {
            fire_at_first_enemy(state, index, ProjectileKind::MagiFireball);
            true
        }
        (PlayerClass::Ranger, AbilityKey::W) => {
            schedule_party_jump(state, true);
            true
        }
        (PlayerClass::Magi, AbilityKey::W) => cast_ice_bridge(state, index),
        (_, AbilityKey::E) => false,
    };
    if !activated {
        return;
    }

    state.players[index].abilities.slot_mut(key).trigger();
    let sound = match key {
        AbilityKey::Q => desc.q_sound,
        _ => desc.w_sound,
    };
    state.play(sound, ABILITY_VOLUME);
    log::debug!("{} used {:?}", desc.name, key);
}

/// Shoot from the player's center at the first enemy; no enemy, no shot
fn fire_at_first_enemy(state: &mut WorldState, index: usize, kind: ProjectileKind) {
    let Some(target) = state.enemies.first().map(|e| e.body.aabb()) else {
        return;
    };
    let shooter = &state.players[index];
    let origin = shooter.body.center();
    let strength = kind.strength(shooter.abilities.q.level);
    state.spawn_projectile(kind, origin, &target, false, strength);
}

/// Freeze every segment on screen. Only castable standing at or above the
/// ground line.
fn cast_ice_bridge(state: &mut WorldState, index: usize) -> bool {
    let magi = &state.players[index];
    if magi.body.bottom() > state.ground_line() {
        return false;
    }
    let magi_id = magi.id;

    let segments: Vec<_> = state.terrains.iter().map(|t| t.id).collect();
    for terrain in state.terrains.iter_mut() {
        terrain.iced = true;
    }
    for id in segments {
        state.spawn_particle_system(EntityRef::terrain(id), ParticleKind::Frost, -1, 120, 0.15);
    }
    state.spawn_particle_system(EntityRef::player(magi_id), ParticleKind::Ice, 30, -1, 1.0);
    true
}

fn upgrade(state: &mut WorldState, class: PlayerClass, key: AbilityKey) {
    if state.mode != GameMode::Between {
        return;
    }
    let experience = state.experience;
    let Some(player) = state.player_by_class_mut(class) else {
        return;
    };
    let slot = player.abilities.slot_mut(key);
    let cost = upgrade_cost(slot.level);
    if experience < cost {
        log::debug!("Upgrade {:?} {:?} needs {} experience, have {}", class, key, cost, experience);
        return;
    }
    slot.level_up();
    let level = slot.level;
    state.experience -= cost;
    log::info!("{} {:?} upgraded to level {}", class.name(), key, level);
}
