//! Particle systems and particles
//!
//! A system is bound to a root entity through an `EntityRef`. The handle is
//! resolved every tick, and the system removes itself once the root is gone.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::collision::Aabb;
use super::physics::{Contact, apply_gravity, step_axes};
use super::state::{EntityId, EntityRef};
use super::terrain::Terrain;
use crate::consts::{PARTICLE_SIZE, PARTICLE_STILL_LIMIT, PARTICLE_STILL_SPEED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    Flame,
    Ice,
    Frost,
}

impl ParticleKind {
    pub fn has_gravity(&self) -> bool {
        matches!(self, ParticleKind::Ice)
    }

    pub fn collides_terrain(&self) -> bool {
        matches!(self, ParticleKind::Ice)
    }

    pub fn sprite(&self) -> &'static str {
        match self {
            ParticleKind::Flame => "flameParticle.png",
            ParticleKind::Ice | ParticleKind::Frost => "iceParticle.png",
        }
    }

    /// Starting velocity. Frost drifts left with the scrolling terrain.
    pub fn initial_velocity<R: Rng>(&self, rng: &mut R, game_speed: f32) -> Vec2 {
        match self {
            ParticleKind::Flame => Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)),
            ParticleKind::Ice => Vec2::new(rng.random_range(10.0..30.0), rng.random_range(-30.0..-10.0)),
            ParticleKind::Frost => Vec2::new(
                -game_speed + rng.random_range(-0.5..0.5),
                rng.random_range(-0.5..0.5),
            ),
        }
    }
}

/// Emitter bound to a root entity
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub id: EntityId,
    pub root: EntityRef,
    pub kind: ParticleKind,
    /// Ticks to live, -1 for until the root goes away
    pub lifetime: i32,
    /// Lifetime handed to each particle, -1 for unlimited
    pub particle_lifetime: i32,
    /// Particles per tick; fractional rates are a per-tick chance
    pub rate: f32,
    pub time: i32,
    /// Center of the root, refreshed each tick
    pub position: Vec2,
}

impl ParticleSystem {
    pub fn new(
        id: EntityId,
        root: EntityRef,
        kind: ParticleKind,
        lifetime: i32,
        particle_lifetime: i32,
        rate: f32,
    ) -> Self {
        Self {
            id,
            root,
            kind,
            lifetime,
            particle_lifetime,
            rate,
            time: 0,
            position: Vec2::ZERO,
        }
    }

    /// How many particles to emit this tick
    pub fn emission_count<R: Rng>(&self, rng: &mut R) -> u32 {
        if self.rate >= 1.0 {
            self.rate.ceil() as u32
        } else if rng.random::<f32>() < self.rate {
            1
        } else {
            0
        }
    }

    /// Age one tick; returns false once the lifetime has run out
    pub fn advance(&mut self) -> bool {
        self.time += 1;
        !(self.lifetime > 0 && self.time > self.lifetime)
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub body: PhysicsBody,
    pub lifetime: i32,
    pub time: i32,
    /// Consecutive ticks spent barely moving
    pub still_ticks: u32,
}

impl Particle {
    /// Spawn somewhere inside the root's box, inset by a tenth on each side
    pub fn spawn<R: Rng>(kind: ParticleKind, root: &Aabb, lifetime: i32, game_speed: f32, rng: &mut R) -> Self {
        let inset = root.min + root.size / 10.0;
        let jitter = Vec2::new(rng.random::<f32>(), rng.random::<f32>()) * root.size * 0.8;
        let mut body = PhysicsBody::new(inset + jitter, Vec2::splat(PARTICLE_SIZE));
        body.on_ground = false;
        body.velocity = kind.initial_velocity(rng, game_speed);

        Self {
            kind,
            body,
            lifetime,
            time: 0,
            still_ticks: 0,
        }
    }

    /// Move one tick; returns false once the particle should be removed
    pub fn update(&mut self, terrains: &[Terrain], canvas: Vec2, dt: f32) -> bool {
        if self.kind.has_gravity() {
            apply_gravity(&mut self.body, dt);
        }
        if self.kind.collides_terrain() {
            step_axes(&mut self.body, terrains, Contact::Bounce);
        } else {
            self.body.position += self.body.velocity;
        }

        if self.body.velocity.length() < PARTICLE_STILL_SPEED {
            self.still_ticks += 1;
        } else {
            self.still_ticks = 0;
        }
        self.time += 1;

        let expired = self.lifetime > 0 && self.time > self.lifetime;
        let pos = self.body.position;
        let off_canvas = pos.x < 0.0 || pos.x > canvas.x || pos.y < 0.0 || pos.y > canvas.y;
        !(expired || self.still_ticks > PARTICLE_STILL_LIMIT || off_canvas)
    }
}
