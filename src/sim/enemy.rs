//! Enemies
//!
//! At most one enemy is alive at a time. Ground enemies home horizontally
//! toward a post near the right edge and hop out of pits; flying enemies home
//! on both axes and ignore terrain.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::physics::{Contact, apply_gravity, find_support, step_axes};
use super::state::EntityId;
use super::terrain::Terrain;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Gator,
    Rat,
    Bat,
}

/// Movement behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyAi {
    Running,
    /// Moves exactly like `Running`
    Standing,
    Flying,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyDescriptor {
    pub name: &'static str,
    pub max_health: f32,
    pub size: Vec2,
    pub ai: EnemyAi,
    pub sprite: &'static str,
    pub frame_size: Vec2,
}

const GATOR: EnemyDescriptor = EnemyDescriptor {
    name: "Gator",
    max_health: 75.0,
    size: Vec2::new(100.0, 60.0),
    ai: EnemyAi::Running,
    sprite: "gatorRun.png",
    frame_size: Vec2::new(150.0, 90.0),
};

const RAT: EnemyDescriptor = EnemyDescriptor {
    name: "Rat",
    max_health: 55.0,
    size: Vec2::new(100.0, 50.0),
    ai: EnemyAi::Standing,
    sprite: "ratRun.png",
    frame_size: Vec2::new(150.0, 75.0),
};

const BAT: EnemyDescriptor = EnemyDescriptor {
    name: "Bat",
    max_health: 50.0,
    size: Vec2::new(85.0, 50.0),
    ai: EnemyAi::Flying,
    sprite: "batRun.png",
    frame_size: Vec2::new(128.0, 75.0),
};

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Gator, EnemyKind::Rat, EnemyKind::Bat];

    pub fn descriptor(&self) -> &'static EnemyDescriptor {
        match self {
            EnemyKind::Gator => &GATOR,
            EnemyKind::Rat => &RAT,
            EnemyKind::Bat => &BAT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub body: PhysicsBody,
    /// Homing destination, cleared on arrival
    pub target: Option<Vec2>,
    pub anim: f32,
}

impl Enemy {
    /// Spawn just off the right edge of the canvas
    pub fn new(id: EntityId, kind: EnemyKind, canvas: Vec2) -> Self {
        let desc = kind.descriptor();
        let size = desc.size;
        let ground_line = canvas.y - TERRAIN_HEIGHT;
        let position = Vec2::new(canvas.x + size.x * 1.5, ground_line - size.y * 2.0);
        let target = match desc.ai {
            EnemyAi::Flying => Vec2::new(canvas.x - size.x * 1.5, size.y * 1.5),
            EnemyAi::Running | EnemyAi::Standing => Vec2::new(canvas.x - size.x * 1.5, ground_line - size.y),
        };

        Self {
            id,
            kind,
            body: PhysicsBody::new(position, size)
                .with_health(desc.max_health)
                .with_max_jumps(ENEMY_MAX_JUMPS)
                .with_offset(-desc.frame_size / 4.0),
            target: Some(target),
            anim: 0.0,
        }
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.kind.descriptor().ai == EnemyAi::Flying
    }

    /// Dead or fallen out of the world
    pub fn should_despawn(&self, canvas: Vec2) -> bool {
        self.body.position.y > canvas.y * 2.0 || self.body.is_depleted()
    }

    /// Score and experience awarded on removal
    pub fn reward(&self) -> u64 {
        self.kind.descriptor().max_health as u64
    }

    /// Steer toward the target, snapping once close enough
    fn home(&mut self) {
        let Some(target) = self.target else {
            return;
        };
        if self.body.position.distance_squared(target) <= HOMING_SNAP_DIST_SQ {
            self.body.position = target;
            self.body.velocity = Vec2::ZERO;
            self.target = None;
            return;
        }
        let step = (target - self.body.position) / HOMING_DIVISOR;
        if self.is_flying() {
            self.body.velocity = step;
        } else {
            self.body.velocity.x = step.x;
        }
    }

    pub fn update(&mut self, terrains: &[Terrain], time_ticks: u64, canvas: Vec2, dt: f32) {
        if self.is_flying() {
            self.body.position.y += (time_ticks as f32 / 10.0).sin();
        }
        self.body.burn();
        self.home();

        if self.is_flying() {
            self.body.position += self.body.velocity;
            return;
        }

        let support = find_support(&self.body, terrains);
        self.body.on_ground = support.is_some();

        // Sunk below the ground line: try to hop back out
        if self.body.bottom() > canvas.y - TERRAIN_HEIGHT {
            self.body.jump(JUMP_SPEED, JUMP_PUSH, false);
        }
        if !self.body.on_ground {
            apply_gravity(&mut self.body, dt);
        }

        step_axes(&mut self.body, terrains, Contact::Land);

        if self.body.on_ground {
            if let Some(surface) = support {
                self.body.land(surface);
            }
        }
    }

    pub fn advance_animation(&mut self) {
        if self.body.on_ground || self.is_flying() {
            self.anim = (self.anim + 0.75) % SPRITE_FRAMES;
        } else if self.anim != 0.0 && self.anim != 13.0 {
            self.anim = (self.anim.round() + 1.0) % SPRITE_FRAMES;
        }
    }

    pub fn frame_index(&self) -> u32 {
        self.anim.floor() as u32
    }
}
