//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick order (deferred, players, enemies, projectiles, terrain, particles)
//! - Seeded RNG only
//! - Registries iterate in insertion order
//! - No rendering, audio or platform calls; side effects leave as `GameEvent`s

pub mod abilities;
pub mod body;
pub mod collision;
pub mod command;
pub mod deferred;
pub mod enemy;
pub mod particles;
pub mod physics;
pub mod player;
pub mod projectile;
pub mod state;
pub mod terrain;
pub mod tick;

pub use abilities::{Abilities, AbilityKey, AbilitySlot};
pub use body::PhysicsBody;
pub use collision::Aabb;
pub use command::{Command, PointerButton, apply_command};
pub use enemy::{Enemy, EnemyKind};
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use player::{Player, PlayerClass};
pub use projectile::{Projectile, ProjectileKind};
pub use state::{EntityId, EntityRef, GameEvent, GameMode, WorldState};
pub use terrain::{Terrain, TerrainKind};
pub use tick::{setup_game, setup_level, tick};
