//! Shared physics component
//!
//! Every moving entity (players, enemies, projectiles, particles) embeds a
//! `PhysicsBody`. Behaviour common to all of them lives here as methods; the
//! stepped integrators in `physics` operate on it.

use glam::Vec2;

use super::collision::Aabb;
use crate::consts::*;
use crate::{center_of, clamp_to_canvas};

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    /// Top-left corner
    pub position: Vec2,
    /// Bounding box size
    pub bounds: Vec2,
    /// Sprite draw offset relative to `position`
    pub offset: Vec2,
    pub velocity: Vec2,
    /// Jumps taken since last landing
    pub num_jumps: u32,
    pub max_jumps: u32,
    pub on_ground: bool,
    pub health: f32,
    pub max_health: f32,
    /// Remaining burning ticks
    pub fire_ticks: u32,
}

impl PhysicsBody {
    pub fn new(position: Vec2, bounds: Vec2) -> Self {
        Self {
            position,
            bounds,
            offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
            num_jumps: 0,
            max_jumps: PLAYER_MAX_JUMPS,
            on_ground: true,
            health: 0.0,
            max_health: 0.0,
            fire_ticks: 0,
        }
    }

    pub fn with_health(mut self, health: f32) -> Self {
        self.health = health;
        self.max_health = health;
        self
    }

    pub fn with_max_jumps(mut self, max_jumps: u32) -> Self {
        self.max_jumps = max_jumps;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.bounds)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        center_of(self.position, self.bounds)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.bounds.y
    }

    /// Force the position, clamped to the canvas rectangle
    pub fn set_position(&mut self, x: f32, y: f32, canvas: Vec2) {
        self.position = clamp_to_canvas(Vec2::new(x, y), canvas);
    }

    /// Vector from this body's center to the center of `other`
    pub fn vec_to(&self, other: &Aabb) -> Vec2 {
        other.center() - self.center()
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.aabb().overlaps(other)
    }

    /// Try to jump. Unforced jumps consume one of `max_jumps`.
    pub fn jump(&mut self, speed: f32, push: f32, force: bool) -> bool {
        if self.num_jumps >= self.max_jumps && !force {
            return false;
        }
        if !force {
            self.num_jumps += 1;
        }
        self.velocity.y = -speed;
        self.position.y -= push;
        self.on_ground = false;
        true
    }

    /// Subtract health, never below zero
    pub fn damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.health <= 0.0
    }

    /// Health bar fraction in [0, 1]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Apply one tick of burning, if any
    pub fn burn(&mut self) {
        if self.fire_ticks > 0 {
            self.fire_ticks -= 1;
            self.damage(FIRE_DAMAGE_PER_TICK);
        }
    }

    /// Come to rest on a surface at height `surface_y`
    pub fn land(&mut self, surface_y: f32) {
        self.velocity.y = 0.0;
        self.position.y = surface_y - self.bounds.y;
        self.num_jumps = 0;
        self.on_ground = true;
    }
}
