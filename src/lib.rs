//! Leap of Faith - a side-scrolling party survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, terrain, game modes)
//! - `renderer`: Frame description handed to an external rasterizer
//! - `game`: Host-side frame driver (clock, input, audio, UI, scores)
//! - `persistence`: High-score storage backends
//! - `settings`: Player preferences and canvas configuration

pub mod audio;
pub mod clock;
pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use clock::Clock;
pub use game::Game;
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame rate clamp used to derive delta time
    pub const MIN_FPS: f32 = 12.0;
    pub const MAX_FPS: f32 = 60.0;

    /// Default logical canvas
    pub const CANVAS_WIDTH: f32 = 1280.0;
    pub const CANVAS_HEIGHT: f32 = 720.0;

    /// Terrain segments are fixed squares anchored to the canvas bottom
    pub const TERRAIN_WIDTH: f32 = 100.0;
    pub const TERRAIN_HEIGHT: f32 = 100.0;

    /// Gravity (this * dt is added to velocity.y each airborne tick)
    pub const GRAVITY: f32 = 60.0;

    /// Jumping
    pub const JUMP_SPEED: f32 = 15.0;
    pub const JUMP_PUSH: f32 = 1.0;
    pub const PLAYER_MAX_JUMPS: u32 = 2;
    pub const ENEMY_MAX_JUMPS: u32 = 3;

    /// Party formation: leader slot x, spacing between slots, walk speed, snap distance
    pub const PARTY_ANCHOR_X: f32 = 275.0;
    pub const PARTY_SPACING: f32 = 100.0;
    pub const PARTY_WALK_SPEED: f32 = 5.0;
    pub const PARTY_SNAP_DISTANCE: f32 = 3.0;
    /// Initial drop height above the ground line
    pub const PARTY_DROP_HEIGHT: f32 = 250.0;

    /// Player vitals
    pub const HEALTH_REGEN_PER_TICK: f32 = 0.02;
    pub const RESPAWN_DELAY_TICKS: i32 = 1200;
    pub const RESPAWN_INVULNERABLE_TICKS: i32 = 300;
    pub const LAVA_DAMAGE: f32 = 10.0;

    /// Burning (damage over time)
    pub const FIRE_TICKS: u32 = 60;
    pub const FIRE_DAMAGE_PER_TICK: f32 = 0.05;

    /// Paladin shield extends this far in front of the leader
    pub const SHIELD_WIDTH: f32 = 25.0;
    /// Shield height as a multiple of the paladin's height
    pub const SHIELD_HEIGHT_SCALE: f32 = 1.25;

    /// Enemy homing
    pub const HOMING_DIVISOR: f32 = 20.0;
    pub const HOMING_SNAP_DIST_SQ: f32 = 9.0;
    /// Ranged attack roll: uniform [0, ATTACK_ROLL_RANGE) below ATTACK_ROLL_THRESHOLD
    pub const ATTACK_ROLL_RANGE: f32 = 15.0;
    pub const ATTACK_ROLL_THRESHOLD: f32 = 0.1;

    /// Particles
    pub const PARTICLE_SIZE: f32 = 3.0;
    pub const PARTICLE_STILL_SPEED: f32 = 0.1;
    pub const PARTICLE_STILL_LIMIT: u32 = 100;
    pub const PARTICLE_BOUNCE: f32 = -0.85;

    /// Level progression
    pub const MAX_GAME_SPEED: f32 = 16.0;
    pub const BASE_GAME_SPEED: f32 = 7.0;
    pub const BASE_LEVEL_LENGTH: i32 = 75;
    pub const LEVEL_LENGTH_STEP: i32 = 25;

    /// Experience cost per upgrade level
    pub const UPGRADE_COST_STEP: u64 = 50;

    /// Sprite sheets hold this many horizontal frames
    pub const SPRITE_FRAMES: f32 = 28.0;
}

/// Clamp a point into the `[0, w] x [0, h]` canvas rectangle
#[inline]
pub fn clamp_to_canvas(point: Vec2, canvas: Vec2) -> Vec2 {
    point.clamp(Vec2::ZERO, canvas)
}

/// Center of an axis-aligned box given its top-left corner and size
#[inline]
pub fn center_of(position: Vec2, bounds: Vec2) -> Vec2 {
    position + bounds / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_canvas() {
        let canvas = Vec2::new(800.0, 600.0);
        assert_eq!(clamp_to_canvas(Vec2::new(-50.0, 10.0), canvas), Vec2::new(0.0, 10.0));
        assert_eq!(clamp_to_canvas(Vec2::new(900.0, 700.0), canvas), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_center_of() {
        let c = center_of(Vec2::new(10.0, 20.0), Vec2::new(40.0, 60.0));
        assert_eq!(c, Vec2::new(30.0, 50.0));
    }
}
