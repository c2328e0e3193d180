//! Terrain segments and the run-length terrain generator
//!
//! The ground is a left-scrolling strip of fixed-size segments. The generator
//! hands out segment kinds in runs: a stretch of solid ground, then a short
//! stretch of danger (void or lava), then ground again, and so on.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::EntityId;
use crate::consts::{TERRAIN_HEIGHT, TERRAIN_WIDTH};

/// Segment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Solid ground
    Base,
    /// Bottomless pit (not drawn)
    Void,
    /// Damaging pit
    Lava,
}

impl TerrainKind {
    pub fn is_solid(&self) -> bool {
        matches!(self, TerrainKind::Base)
    }

    pub fn is_danger(&self) -> bool {
        !self.is_solid()
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, TerrainKind::Void)
    }
}

/// A terrain segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    pub id: EntityId,
    /// Fixed at spawn
    pub kind: TerrainKind,
    pub position: Vec2,
    pub bounds: Vec2,
    /// Frozen by the ice bridge; acts as solid
    pub iced: bool,
}

impl Terrain {
    /// Segment whose left edge is at `x`, resting on the canvas bottom
    pub fn new(id: EntityId, kind: TerrainKind, x: f32, canvas: Vec2) -> Self {
        Self {
            id,
            kind,
            position: Vec2::new(x, canvas.y - TERRAIN_HEIGHT),
            bounds: Vec2::new(TERRAIN_WIDTH, TERRAIN_HEIGHT),
            iced: false,
        }
    }

    pub fn is_solid(&self) -> bool {
        self.kind.is_solid() || self.iced
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.bounds)
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.position.x + self.bounds.x
    }

    /// Evicted once the right edge is two segment-widths past the left of the screen
    pub fn is_evictable(&self) -> bool {
        self.right() < -2.0 * TERRAIN_WIDTH
    }
}

/// Ground run length: shrinks as the game speeds up
pub fn base_run_length(speed: f32) -> i32 {
    ((15.0 - speed * 0.75).round() as i32).max(3)
}

/// Danger run length for a uniform roll in [0, 1): grows with speed, capped at 5
pub fn danger_run_length(speed: f32, roll: f32) -> i32 {
    ((roll * speed / 5.0).floor() as i32 + 2).min(5)
}

/// Number of `game_speed` shifts applied this tick (dash multiplies the scroll)
pub fn scroll_steps(dash_duration: u32) -> u32 {
    (1.0 + dash_duration as f32 / 6.0).ceil() as u32
}

/// Chooses the kind of each newly appended segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGenerator {
    pub current: TerrainKind,
    /// Segments left in the current run
    pub remaining: i32,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self {
            current: TerrainKind::Base,
            remaining: 0,
        }
    }
}

impl TerrainGenerator {
    /// Void or lava, 50/50
    pub fn random_danger<R: Rng>(rng: &mut R) -> TerrainKind {
        if rng.random::<f32>() < 0.5 {
            TerrainKind::Void
        } else {
            TerrainKind::Lava
        }
    }

    /// Queue the short danger run that follows a level's starting ground
    pub fn begin_danger_run<R: Rng>(&mut self, rng: &mut R) {
        self.current = Self::random_danger(rng);
        self.remaining = 2;
    }

    /// Kind for the next segment. Advances the run and picks the next one
    /// when it runs out.
    pub fn next_kind<R: Rng>(&mut self, speed: f32, level_exhausted: bool, rng: &mut R) -> TerrainKind {
        let kind = self.current;
        self.remaining -= 1;
        if self.remaining <= 0 {
            self.choose_next_run(speed, level_exhausted, rng);
        }
        kind
    }

    fn choose_next_run<R: Rng>(&mut self, speed: f32, level_exhausted: bool, rng: &mut R) {
        // Danger is always followed by ground, and a finished level only gets ground
        if self.current != TerrainKind::Base || level_exhausted {
            self.current = TerrainKind::Base;
            self.remaining = base_run_length(speed);
        } else {
            self.current = Self::random_danger(rng);
            self.remaining = danger_run_length(speed, rng.random::<f32>());
        }
    }
}
