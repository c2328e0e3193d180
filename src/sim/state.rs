//! World state and core simulation types
//!
//! Every registry and counter the tick touches lives in `WorldState`, which is
//! passed by reference into each update. Entities refer to each other only
//! through `EntityId`s, which are never reused within a world.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::deferred::DeferredQueue;
use super::enemy::{Enemy, EnemyKind};
use super::particles::{Particle, ParticleKind, ParticleSystem};
use super::player::{Player, PlayerClass};
use super::projectile::{Projectile, ProjectileKind};
use super::terrain::{Terrain, TerrainGenerator};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::ui::UiCommand;

/// Stable entity handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Registry an `EntityRef` points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
    Terrain,
}

/// Weak reference to an entity in one of the registries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityRef {
    pub const fn player(id: EntityId) -> Self {
        Self { kind: EntityKind::Player, id }
    }

    pub const fn enemy(id: EntityId) -> Self {
        Self { kind: EntityKind::Enemy, id }
    }

    pub const fn projectile(id: EntityId) -> Self {
        Self { kind: EntityKind::Projectile, id }
    }

    pub const fn terrain(id: EntityId) -> Self {
        Self { kind: EntityKind::Terrain, id }
    }
}

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Instructions screen
    Start,
    /// Full simulation
    Running,
    /// Party is walking to new formation slots
    Switching,
    /// Upgrade intermission between levels
    Between,
    /// Whole party died
    Dead,
    /// Viewing the leaderboard
    Highscore,
}

/// Side effects for the host, drained after each tick or command
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound { effect: SoundEffect, volume: f32 },
    Ui(UiCommand),
    ModeChanged { from: GameMode, to: GameMode },
    /// Fired once when the party is wiped
    RunEnded { score: u64, level: u32 },
    LevelStarted { level: u32 },
    PlayerDied { class: PlayerClass },
    PlayerRespawned { class: PlayerClass },
    EnemyKilled { kind: EnemyKind, reward: u64 },
}

#[derive(Debug, Clone)]
pub struct WorldState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub mode: GameMode,
    pub paused: bool,
    pub canvas: Vec2,
    /// Ticks simulated since the world was created
    pub time_ticks: u64,
    pub score: u64,
    /// Earned like score, spent on upgrades
    pub experience: u64,
    pub level: u32,
    /// Segments still to be evicted before the level can end
    pub level_length: i32,
    /// Terrain scroll per tick
    pub game_speed: f32,
    pub terrain_gen: TerrainGenerator,
    pub players: Vec<Player>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub terrains: Vec<Terrain>,
    pub particle_systems: Vec<ParticleSystem>,
    pub particles: Vec<Particle>,
    pub deferred: DeferredQueue,
    pub events: Vec<GameEvent>,
    /// Particle cap from the quality preset
    pub max_particles: usize,
    next_id: u32,
}

impl WorldState {
    pub fn new(seed: u64, canvas: Vec2, max_particles: usize) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode: GameMode::Start,
            paused: false,
            canvas,
            time_ticks: 0,
            score: 0,
            experience: 0,
            level: 0,
            level_length: 0,
            game_speed: BASE_GAME_SPEED,
            terrain_gen: TerrainGenerator::default(),
            players: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            terrains: Vec::new(),
            particle_systems: Vec::new(),
            particles: Vec::new(),
            deferred: DeferredQueue::new(),
            events: Vec::new(),
            max_particles,
            next_id: 1,
        }
    }

    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Running or Switching: abilities, jumps and enemies are live
    pub fn in_control(&self) -> bool {
        matches!(self.mode, GameMode::Running | GameMode::Switching)
    }

    /// Top of the canvas's solid ground band
    #[inline]
    pub fn ground_line(&self) -> f32 {
        self.canvas.y - TERRAIN_HEIGHT
    }

    pub fn leader_index(&self) -> Option<usize> {
        self.players.iter().position(|p| p.is_leader())
    }

    pub fn leader(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_leader())
    }

    pub fn num_alive(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    pub fn player_by_class(&self, class: PlayerClass) -> Option<&Player> {
        self.players.iter().find(|p| p.class == class)
    }

    pub fn player_by_class_mut(&mut self, class: PlayerClass) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.class == class)
    }

    /// Bounding box of a referenced entity, or None once it's gone
    pub fn resolve(&self, target: EntityRef) -> Option<Aabb> {
        match target.kind {
            EntityKind::Player => self.players.iter().find(|p| p.id == target.id).map(|p| p.body.aabb()),
            EntityKind::Enemy => self.enemies.iter().find(|e| e.id == target.id).map(|e| e.body.aabb()),
            EntityKind::Projectile => self
                .projectiles
                .iter()
                .find(|p| p.id == target.id)
                .map(|p| p.body.aabb()),
            EntityKind::Terrain => self.terrains.iter().find(|t| t.id == target.id).map(|t| t.aabb()),
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.emit(GameEvent::Sound { effect, volume });
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        if self.mode == mode {
            return;
        }
        log::info!("Mode {:?} -> {:?}", self.mode, mode);
        let from = self.mode;
        self.mode = mode;
        self.emit(GameEvent::ModeChanged { from, to: mode });
    }

    pub fn spawn_particle_system(
        &mut self,
        root: EntityRef,
        kind: ParticleKind,
        lifetime: i32,
        particle_lifetime: i32,
        rate: f32,
    ) -> EntityId {
        let id = self.next_entity_id();
        self.particle_systems
            .push(ParticleSystem::new(id, root, kind, lifetime, particle_lifetime, rate));
        id
    }

    /// Launch a projectile, attaching a flame trail when its kind has one
    pub fn spawn_projectile(
        &mut self,
        kind: ProjectileKind,
        origin: Vec2,
        target: &Aabb,
        enemy_proj: bool,
        strength: f32,
    ) -> EntityId {
        let id = self.next_entity_id();
        let mut projectile = Projectile::launch(id, kind, origin, target, enemy_proj, strength);
        if kind.descriptor().flame_trail {
            let root = EntityRef::projectile(id);
            projectile.system = Some(self.spawn_particle_system(root, ParticleKind::Flame, -1, 10, 5.0));
        }
        self.projectiles.push(projectile);
        id
    }
}
