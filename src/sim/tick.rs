//! Fixed timestep simulation tick
//!
//! One call advances every registry once, in a fixed order, then polls the
//! aggregate state for mode transitions.

use rand::Rng;

use super::collision::{ProjectileHit, player_terrain_contact, resolve_projectile_hit, shield_hitbox};
use super::deferred::DeferredAction;
use super::enemy::{Enemy, EnemyKind};
use super::particles::{Particle, ParticleKind};
use super::player::{Player, PlayerClass, PlayerStatus};
use super::projectile::ProjectileKind;
use super::state::{EntityId, EntityKind, EntityRef, GameEvent, GameMode, WorldState};
use super::terrain::{Terrain, TerrainKind, scroll_steps};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::ui::{UiCommand, ABILITY_BUTTONS, NEXT_LEVEL_BUTTON, SHOP_PANEL};

/// Leader footstep cadence while grounded
const FOOTSTEP_INTERVAL: u64 = 15;
const FOOTSTEP_VOLUME: f32 = 0.175;

/// Advance the world by one tick
pub fn tick(state: &mut WorldState, dt: f32) {
    // Idle screens don't simulate
    if matches!(state.mode, GameMode::Start | GameMode::Highscore) {
        return;
    }
    if state.paused && state.in_control() {
        return;
    }

    state.time_ticks += 1;

    run_deferred(state);
    check_level_complete(state);
    update_players(state, dt);
    update_enemies(state, dt);
    update_projectiles(state, dt);
    update_terrain(state);
    update_particle_systems(state);
    update_particles(state, dt);
    check_switch_complete(state);
}

/// Start a fresh run at level 1
pub fn setup_game(state: &mut WorldState) {
    state.score = 0;
    state.experience = 0;
    state.level = 0;
    state.paused = false;
    state.deferred.clear();
    state.enemies.clear();

    state.players.clear();
    let canvas = state.canvas;
    for (slot, class) in PlayerClass::ROSTER.iter().enumerate() {
        let id = state.next_entity_id();
        state.players.push(Player::new(id, *class, slot, canvas));
    }

    log::info!("New run (seed {})", state.seed);
    setup_level(state);
}

/// Advance to the next level: fresh terrain, speed and enemy
pub fn setup_level(state: &mut WorldState) {
    state.level += 1;
    state.level_length = BASE_LEVEL_LENGTH + LEVEL_LENGTH_STEP * state.level as i32;
    state.game_speed = (BASE_GAME_SPEED + state.level as f32).min(MAX_GAME_SPEED);

    state.particles.clear();
    state.particle_systems.clear();
    state.projectiles.clear();

    state.terrains.clear();
    state.terrain_gen = Default::default();
    let canvas = state.canvas;
    let count = (canvas.x * 1.5 / TERRAIN_WIDTH).floor() as usize;
    for i in 0..count {
        let id = state.next_entity_id();
        state
            .terrains
            .push(Terrain::new(id, TerrainKind::Base, i as f32 * TERRAIN_WIDTH, canvas));
    }
    state.terrain_gen.begin_danger_run(&mut state.rng);

    state.enemies.clear();
    let id = state.next_entity_id();
    state.enemies.push(Enemy::new(id, EnemyKind::Gator, canvas));

    log::info!(
        "Level {}: speed={}, length={}",
        state.level,
        state.game_speed,
        state.level_length
    );

    state.emit(GameEvent::Ui(UiCommand::HidePanel(SHOP_PANEL)));
    state.emit(GameEvent::Ui(UiCommand::DisableButton(NEXT_LEVEL_BUTTON)));
    for button in ABILITY_BUTTONS {
        state.emit(GameEvent::Ui(UiCommand::EnableButton(button)));
    }
    state.emit(GameEvent::LevelStarted { level: state.level });
    state.set_mode(GameMode::Running);
}

fn run_deferred(state: &mut WorldState) {
    for action in state.deferred.pop_due(state.time_ticks) {
        match action {
            DeferredAction::Jump {
                player,
                speed,
                push,
                force,
            } => {
                // The player may have died or the run ended since scheduling
                if !state.in_control() {
                    continue;
                }
                if let Some(p) = state.players.iter_mut().find(|p| p.id == player && p.is_alive()) {
                    p.jump(speed, push, force);
                }
            }
        }
    }
}

/// Enter the intermission once the level's budget is spent and no danger
/// segment is left on screen
fn check_level_complete(state: &mut WorldState) {
    if !state.in_control() || state.level_length > 0 {
        return;
    }
    if state.terrains.iter().any(|t| t.kind.is_danger()) {
        return;
    }

    for player in state.players.iter_mut() {
        player.abilities.reset_all();
    }
    state.emit(GameEvent::Ui(UiCommand::ShowPanel(SHOP_PANEL)));
    state.emit(GameEvent::Ui(UiCommand::EnableButton(NEXT_LEVEL_BUTTON)));
    for button in ABILITY_BUTTONS {
        state.emit(GameEvent::Ui(UiCommand::DisableButton(button)));
    }
    log::info!("Level {} complete (score {})", state.level, state.score);
    state.set_mode(GameMode::Between);
}

fn update_players(state: &mut WorldState, dt: f32) {
    let canvas = state.canvas;
    let in_control = state.in_control();
    let footstep = state.time_ticks % FOOTSTEP_INTERVAL == 0;
    let mut events = Vec::new();

    for i in 0..state.players.len() {
        let player = &mut state.players[i];

        if !player.is_alive() {
            player.death_time += 1;
            if player.death_time >= RESPAWN_DELAY_TICKS {
                let order = state.players.iter().filter(|p| p.is_alive()).count();
                let player = &mut state.players[i];
                player.respawn(order, canvas);
                log::info!("{} respawned at slot {}", player.class.name(), order);
                events.push(GameEvent::PlayerRespawned { class: player.class });
            }
            continue;
        }

        player.abilities.tick_all();

        // Outside control only airborne players keep moving
        if !in_control && player.body.on_ground {
            continue;
        }
        if player.update(&state.terrains, canvas, dt) == PlayerStatus::Died {
            let order = player.order;
            let class = player.class;
            for other in state.players.iter_mut().filter(|p| p.is_alive() && p.order > order) {
                other.order -= 1;
            }
            log::info!("{} died", class.name());
            events.push(GameEvent::PlayerDied { class });
            continue;
        }

        player.advance_animation();
        if footstep && player.order == 0 && player.body.on_ground {
            events.push(GameEvent::Sound {
                effect: SoundEffect::Footstep,
                volume: FOOTSTEP_VOLUME,
            });
        }
    }
    state.events.extend(events);

    // Aggregate check on the post-update snapshot; invulnerable survivors
    // don't keep the run going
    let wiped = !state.players.is_empty() && state.players.iter().all(|p| !p.is_settled());
    if wiped && state.mode != GameMode::Dead {
        state.players.clear();
        state.deferred.clear();
        log::info!("Party wiped at level {} with score {}", state.level, state.score);
        state.emit(GameEvent::RunEnded {
            score: state.score,
            level: state.level,
        });
        state.set_mode(GameMode::Dead);
    }
}

fn update_enemies(state: &mut WorldState, dt: f32) {
    let canvas = state.canvas;

    if state.enemies.is_empty() {
        let kind = EnemyKind::ALL[state.rng.random_range(0..EnemyKind::ALL.len())];
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, kind, canvas));
        log::debug!("Spawned {:?}", kind);
    }

    if !state.in_control() {
        return;
    }

    let time = state.time_ticks;
    let has_leader = state.leader().is_some();
    let mut enemies = std::mem::take(&mut state.enemies);
    let mut kills = Vec::new();
    let mut shots = Vec::new();

    enemies.retain_mut(|enemy| {
        if enemy.should_despawn(canvas) {
            kills.push((enemy.kind, enemy.reward()));
            return false;
        }
        enemy.update(&state.terrains, time, canvas, dt);
        enemy.advance_animation();

        let roll: f32 = state.rng.random_range(0.0..ATTACK_ROLL_RANGE);
        if roll < ATTACK_ROLL_THRESHOLD && has_leader {
            shots.push(enemy.body.position);
        }
        true
    });
    state.enemies = enemies;

    for (kind, reward) in kills {
        state.score += reward;
        state.experience += reward;
        log::info!("{:?} killed (+{})", kind, reward);
        state.emit(GameEvent::EnemyKilled { kind, reward });
    }

    let Some(target) = state.leader().map(|p| p.body.aabb()) else {
        return;
    };
    let strength = ProjectileKind::Fireball.strength(state.level);
    for origin in shots {
        state.spawn_projectile(ProjectileKind::Fireball, origin, &target, true, strength);
    }
}

/// Impact to apply once the projectile pass is done
struct Impact {
    target: EntityRef,
    strength: f32,
    ignites: bool,
}

fn update_projectiles(state: &mut WorldState, dt: f32) {
    let canvas = state.canvas;

    // Shield stands in front of the leader while the paladin's Q runs
    let shield = state
        .player_by_class(PlayerClass::Paladin)
        .filter(|p| p.is_alive() && p.abilities.q.is_active())
        .map(|p| p.body.bounds.y)
        .zip(state.leader().map(|p| p.body.aabb()))
        .map(|(height, leader)| shield_hitbox(&leader, height));

    let mut projectiles = std::mem::take(&mut state.projectiles);
    let mut impacts = Vec::new();
    let mut dropped_systems: Vec<EntityId> = Vec::new();

    projectiles.retain_mut(|shot| {
        if shot.out_of_bounds(canvas) {
            dropped_systems.extend(shot.system);
            return false;
        }

        if shot.enemy_proj {
            if let Some(zone) = &shield {
                if shot.body.overlaps(zone) {
                    shot.deflect();
                }
            }
        }

        let hit = resolve_projectile_hit(
            &shot.body.aabb(),
            shot.enemy_proj,
            &state.terrains,
            &state.players,
            &state.enemies,
        );
        match hit {
            None => {
                shot.advance(dt);
                true
            }
            Some(hit) => {
                let target = match hit {
                    ProjectileHit::Terrain(_) => None,
                    ProjectileHit::Player(id) => Some(EntityRef::player(id)),
                    ProjectileHit::Enemy(id) => Some(EntityRef::enemy(id)),
                };
                if let Some(target) = target {
                    impacts.push(Impact {
                        target,
                        strength: shot.strength,
                        ignites: shot.kind.descriptor().ignites,
                    });
                }
                dropped_systems.extend(shot.system);
                false
            }
        }
    });
    state.projectiles = projectiles;

    if !dropped_systems.is_empty() {
        state.particle_systems.retain(|s| !dropped_systems.contains(&s.id));
    }

    for impact in impacts {
        let body = match impact.target.kind {
            EntityKind::Player => state
                .players
                .iter_mut()
                .find(|p| p.id == impact.target.id)
                .map(|p| {
                    p.damage(impact.strength);
                    &mut p.body
                }),
            EntityKind::Enemy => state
                .enemies
                .iter_mut()
                .find(|e| e.id == impact.target.id)
                .map(|e| {
                    e.body.damage(impact.strength);
                    &mut e.body
                }),
            _ => None,
        };
        let Some(body) = body else {
            continue;
        };
        if impact.ignites {
            body.fire_ticks = FIRE_TICKS;
        }
        state.spawn_particle_system(impact.target, ParticleKind::Flame, 60, 30, 5.0);
    }
}

fn update_terrain(state: &mut WorldState) {
    let canvas = state.canvas;

    // Paladin's dash speeds the scroll up
    let dash = state
        .player_by_class(PlayerClass::Paladin)
        .map_or(0, |p| p.abilities.w.duration);
    let shift = state.game_speed * scroll_steps(dash) as f32;

    for terrain in state.terrains.iter_mut() {
        terrain.position.x -= shift;

        for player in state.players.iter_mut().filter(|p| p.is_alive()) {
            let contact = player_terrain_contact(&player.body.aabb(), terrain);
            if let Some(x) = contact.push_to_x {
                player.body.position.x = x;
            }
            if contact.lava_bounce {
                player.jump(JUMP_SPEED, JUMP_PUSH, true);
                player.body.num_jumps = 0;
                player.damage(LAVA_DAMAGE);
            }
        }
    }

    let before = state.terrains.len();
    state.terrains.retain(|t| !t.is_evictable());
    let evicted = (before - state.terrains.len()) as u64;
    if evicted > 0 && state.in_control() {
        state.score += evicted;
        state.experience += evicted;
        state.level_length -= evicted as i32;
    }

    // Segments born while the ice bridge holds start frozen
    let bridge_up = state
        .player_by_class(PlayerClass::Magi)
        .is_some_and(|p| p.is_alive() && p.abilities.w.is_active());

    loop {
        let next_x = state.terrains.last().map_or(0.0, |t| t.right());
        if next_x >= canvas.x {
            break;
        }
        let kind = state
            .terrain_gen
            .next_kind(state.game_speed, state.level_length <= 0, &mut state.rng);
        let id = state.next_entity_id();
        let mut terrain = Terrain::new(id, kind, next_x, canvas);
        if bridge_up {
            terrain.iced = true;
            state.spawn_particle_system(EntityRef::terrain(id), ParticleKind::Frost, -1, 120, 0.15);
        }
        state.terrains.push(terrain);
    }
}

fn update_particle_systems(state: &mut WorldState) {
    let systems = std::mem::take(&mut state.particle_systems);
    let mut kept = Vec::with_capacity(systems.len());

    for mut system in systems {
        // Root gone: the system goes with it
        let Some(root) = state.resolve(system.root) else {
            continue;
        };
        system.position = root.center();

        for _ in 0..system.emission_count(&mut state.rng) {
            if state.particles.len() >= state.max_particles {
                break;
            }
            let particle = Particle::spawn(
                system.kind,
                &root,
                system.particle_lifetime,
                state.game_speed,
                &mut state.rng,
            );
            state.particles.push(particle);
        }

        if system.advance() {
            kept.push(system);
        }
    }
    // Systems spawned during this pass were pushed onto the emptied registry
    kept.append(&mut state.particle_systems);
    state.particle_systems = kept;
}

fn update_particles(state: &mut WorldState, dt: f32) {
    let canvas = state.canvas;
    let terrains = &state.terrains;
    state.particles.retain_mut(|p| p.update(terrains, canvas, dt));
}

/// Back to Running once every living player stands on its slot
fn check_switch_complete(state: &mut WorldState) {
    if state.mode != GameMode::Switching {
        return;
    }
    if state.players.iter().filter(|p| p.is_alive()).all(|p| p.at_slot()) {
        state.set_mode(GameMode::Running);
    }
}
