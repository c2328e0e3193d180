//! Party members
//!
//! The roster is fixed at three classes. A player's `order` is its rank in the
//! running formation (0 leads), and `death_time` doubles as the respawn
//! countdown and the post-respawn invulnerability window.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::abilities::Abilities;
use super::body::PhysicsBody;
use super::physics::{apply_gravity, find_support, step_vertical};
use super::state::EntityId;
use super::terrain::Terrain;
use crate::audio::SoundEffect;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerClass {
    Paladin,
    Ranger,
    Magi,
}

/// Static per-class data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDescriptor {
    pub name: &'static str,
    pub max_health: f32,
    pub size: Vec2,
    pub q_dur: u32,
    pub q_cool: u32,
    pub q_sound: SoundEffect,
    pub w_dur: u32,
    pub w_cool: u32,
    pub w_sound: SoundEffect,
    pub sprite: &'static str,
    /// One frame of the sprite sheet
    pub frame_size: Vec2,
}

const PALADIN: ClassDescriptor = ClassDescriptor {
    name: "Paladin",
    max_health: 125.0,
    size: Vec2::new(65.0, 150.0),
    q_dur: 300,
    q_cool: 350,
    q_sound: SoundEffect::Shield,
    w_dur: 24,
    w_cool: 350,
    w_sound: SoundEffect::Dash,
    sprite: "paladinRun.png",
    frame_size: Vec2::new(130.0, 176.0),
};

const RANGER: ClassDescriptor = ClassDescriptor {
    name: "Ranger",
    max_health: 75.0,
    size: Vec2::new(65.0, 145.0),
    q_dur: 0,
    q_cool: 5,
    q_sound: SoundEffect::Arrow,
    w_dur: 0,
    w_cool: 300,
    w_sound: SoundEffect::Leap,
    sprite: "rangerRun.png",
    frame_size: Vec2::new(130.0, 168.0),
};

const MAGI: ClassDescriptor = ClassDescriptor {
    name: "Magi",
    max_health: 100.0,
    size: Vec2::new(65.0, 130.0),
    q_dur: 0,
    q_cool: 30,
    q_sound: SoundEffect::Fireball,
    w_dur: 200,
    w_cool: 650,
    w_sound: SoundEffect::IceBridge,
    sprite: "magiRun.png",
    frame_size: Vec2::new(130.0, 152.0),
};

impl PlayerClass {
    /// Party roster in starting formation order
    pub const ROSTER: [PlayerClass; 3] = [PlayerClass::Paladin, PlayerClass::Ranger, PlayerClass::Magi];

    pub fn descriptor(&self) -> &'static ClassDescriptor {
        match self {
            PlayerClass::Paladin => &PALADIN,
            PlayerClass::Ranger => &RANGER,
            PlayerClass::Magi => &MAGI,
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }
}

/// Result of a player's physics update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Alive,
    /// Fell off the world or ran out of health this tick
    Died,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub class: PlayerClass,
    pub body: PhysicsBody,
    /// Formation rank among living players (0 = leader)
    pub order: usize,
    /// 0 alive, > 0 ticks since death, < 0 invulnerable ticks left
    pub death_time: i32,
    pub abilities: Abilities,
    /// Animation cursor into the sprite sheet
    pub anim: f32,
}

impl Player {
    /// Create a player for formation `slot`, dropped in above its slot
    pub fn new(id: EntityId, class: PlayerClass, slot: usize, canvas: Vec2) -> Self {
        let desc = class.descriptor();
        let x = PARTY_ANCHOR_X - slot as f32 * PARTY_SPACING;
        let y = canvas.y - TERRAIN_HEIGHT - desc.size.y - PARTY_DROP_HEIGHT;
        let offset = Vec2::new(-desc.frame_size.x / 3.0, -desc.frame_size.y / 8.0);

        Self {
            id,
            class,
            body: PhysicsBody::new(Vec2::new(x, y), desc.size)
                .with_health(desc.max_health)
                .with_offset(offset),
            order: slot,
            death_time: 0,
            abilities: Abilities::new(desc.q_dur, desc.q_cool, desc.w_dur, desc.w_cool),
            anim: slot as f32 * 20.0,
        }
    }

    /// Living players include those still invulnerable after a respawn
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.death_time <= 0
    }

    /// Alive and past the post-respawn invulnerable window. The run ends
    /// when no player is settled.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.death_time == 0
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.death_time < 0
    }

    #[inline]
    pub fn is_leader(&self) -> bool {
        self.is_alive() && self.order == 0
    }

    /// Target x for the current formation rank
    pub fn slot_x(&self) -> f32 {
        PARTY_ANCHOR_X - self.order as f32 * PARTY_SPACING
    }

    pub fn at_slot(&self) -> bool {
        self.body.position.x == self.slot_x()
    }

    /// Rotate the formation rank by `dir`, wrapping within the living party
    pub fn cycle_order(&mut self, dir: i32, num_alive: usize) {
        if num_alive == 0 {
            return;
        }
        self.order = (self.order as i32 + dir).rem_euclid(num_alive as i32) as usize;
    }

    pub fn damage(&mut self, amount: f32) {
        if !self.is_invulnerable() {
            self.body.damage(amount);
        }
    }

    pub fn jump(&mut self, speed: f32, push: f32, force: bool) -> bool {
        let jumped = self.body.jump(speed, push, force);
        if jumped {
            self.anim = (self.anim + 1.0) % SPRITE_FRAMES;
        }
        jumped
    }

    fn is_fatal(&self, canvas: Vec2) -> bool {
        self.body.position.y > canvas.y * 2.0 || self.body.is_depleted()
    }

    /// Begin the respawn countdown
    pub fn start_death(&mut self) {
        self.abilities.reset_all();
        self.death_time = 1;
        self.body.velocity = Vec2::ZERO;
    }

    /// Return to the party at the back of the formation
    pub fn respawn(&mut self, order: usize, canvas: Vec2) {
        self.death_time = -RESPAWN_INVULNERABLE_TICKS;
        self.body.health = self.body.max_health / 2.0;
        self.order = order;
        self.body.velocity = Vec2::ZERO;
        self.body.num_jumps = 0;
        self.body.on_ground = false;
        self.body.set_position(-PARTY_ANCHOR_X - order as f32, 0.0, canvas);
    }

    /// Walk toward the formation slot. Only possible while standing at or
    /// above the ground line.
    pub fn walk_to_slot(&mut self, ground_line: f32) {
        let target = self.slot_x();
        let x = self.body.position.x;
        if x == target || self.body.bottom() > ground_line {
            return;
        }
        if (x - target).abs() <= PARTY_SNAP_DISTANCE {
            self.body.position.x = target;
        } else {
            self.body.position.x -= (x - target).signum() * PARTY_WALK_SPEED;
        }
    }

    /// One tick of vitals, formation and falling
    pub fn update(&mut self, terrains: &[Terrain], canvas: Vec2, dt: f32) -> PlayerStatus {
        if self.death_time < 0 {
            self.death_time += 1;
        }

        if self.is_fatal(canvas) {
            self.start_death();
            return PlayerStatus::Died;
        }

        self.body.heal(HEALTH_REGEN_PER_TICK);
        self.walk_to_slot(canvas.y - TERRAIN_HEIGHT);

        match find_support(&self.body, terrains) {
            Some(surface) => self.body.land(surface),
            None => {
                self.body.on_ground = false;
                apply_gravity(&mut self.body, dt);
                step_vertical(&mut self.body, terrains);
            }
        }

        PlayerStatus::Alive
    }

    /// Grounded players run through the sheet; airborne ones hold on the
    /// jump frames (0 and 13)
    pub fn advance_animation(&mut self) {
        if self.body.on_ground {
            self.anim = (self.anim + 0.75) % SPRITE_FRAMES;
        } else if self.anim != 0.0 && self.anim != 13.0 {
            self.anim = (self.anim.round() + 1.0) % SPRITE_FRAMES;
        }
    }

    pub fn frame_index(&self) -> u32 {
        self.anim.floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::terrain::TerrainKind;

    const CANVAS: Vec2 = Vec2::new(800.0, 600.0);

    fn ground() -> Vec<Terrain> {
        (0..8)
            .map(|i| Terrain::new(EntityId(100 + i), TerrainKind::Base, i as f32 * 100.0, CANVAS))
            .collect()
    }

    #[test]
    fn test_spawn_formation() {
        let players: Vec<Player> = PlayerClass::ROSTER
            .iter()
            .enumerate()
            .map(|(slot, class)| Player::new(EntityId(slot as u32), *class, slot, CANVAS))
            .collect();

        assert_eq!(players[0].body.position.x, 275.0);
        assert_eq!(players[1].body.position.x, 175.0);
        assert_eq!(players[2].body.position.x, 75.0);
        // Dropped in 250 above the ground line
        assert_eq!(players[0].body.bottom(), 500.0 - 250.0);
        assert_eq!(players[1].body.health, 75.0);
        assert!(players.iter().all(|p| p.at_slot()));
    }

    #[test]
    fn test_cycle_order_wraps() {
        let mut p = Player::new(EntityId(1), PlayerClass::Ranger, 0, CANVAS);
        p.cycle_order(-1, 3);
        assert_eq!(p.order, 2);
        p.cycle_order(1, 3);
        assert_eq!(p.order, 0);
        p.order = 1;
        p.cycle_order(1, 2);
        assert_eq!(p.order, 0);
        // Nobody alive: unchanged
        p.cycle_order(1, 0);
        assert_eq!(p.order, 0);
    }

    #[test]
    fn test_invulnerable_takes_no_damage() {
        let mut p = Player::new(EntityId(1), PlayerClass::Magi, 0, CANVAS);
        p.death_time = -10;
        p.damage(50.0);
        assert_eq!(p.body.health, 100.0);
        assert!(p.is_alive());
        p.death_time = 0;
        p.damage(50.0);
        assert_eq!(p.body.health, 50.0);
    }

    #[test]
    fn test_walk_to_slot() {
        let mut p = Player::new(EntityId(1), PlayerClass::Paladin, 0, CANVAS);
        p.order = 1;
        p.walk_to_slot(500.0);
        assert_eq!(p.body.position.x, 270.0);

        p.body.position.x = 177.0;
        p.walk_to_slot(500.0);
        assert_eq!(p.body.position.x, 175.0);
        assert!(p.at_slot());

        // Sunk below the ground line: can't walk
        p.order = 0;
        p.body.position.y = 400.0;
        p.walk_to_slot(500.0);
        assert_eq!(p.body.position.x, 175.0);
    }

    #[test]
    fn test_lands_on_ground() {
        let terrains = ground();
        let mut p = Player::new(EntityId(1), PlayerClass::Paladin, 0, CANVAS);
        for _ in 0..200 {
            p.update(&terrains, CANVAS, 1.0 / 60.0);
        }
        assert!(p.body.on_ground);
        assert_eq!(p.body.bottom(), 500.0);
        assert_eq!(p.body.num_jumps, 0);
    }

    #[test]
    fn test_falls_to_death() {
        let mut p = Player::new(EntityId(1), PlayerClass::Ranger, 0, CANVAS);
        let mut status = PlayerStatus::Alive;
        for _ in 0..2000 {
            status = p.update(&[], CANVAS, 1.0 / 60.0);
            if status == PlayerStatus::Died {
                break;
            }
        }
        assert_eq!(status, PlayerStatus::Died);
        assert_eq!(p.death_time, 1);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_death_resets_abilities() {
        let mut p = Player::new(EntityId(1), PlayerClass::Paladin, 0, CANVAS);
        p.abilities.q.trigger();
        p.body.health = 0.0;
        assert_eq!(p.update(&ground(), CANVAS, 1.0 / 60.0), PlayerStatus::Died);
        assert_eq!(p.abilities.q.cooldown, 0);
    }

    #[test]
    fn test_respawn() {
        let mut p = Player::new(EntityId(1), PlayerClass::Paladin, 1, CANVAS);
        p.start_death();
        p.respawn(2, CANVAS);
        assert_eq!(p.death_time, -RESPAWN_INVULNERABLE_TICKS);
        assert_eq!(p.body.health, 62.5);
        assert_eq!(p.order, 2);
        assert_eq!(p.body.position, Vec2::ZERO);
        assert!(p.is_alive());
        assert!(p.is_invulnerable());
    }

    #[test]
    fn test_invulnerability_wears_off() {
        let terrains = ground();
        let mut p = Player::new(EntityId(1), PlayerClass::Magi, 0, CANVAS);
        p.death_time = -2;
        p.update(&terrains, CANVAS, 1.0 / 60.0);
        p.update(&terrains, CANVAS, 1.0 / 60.0);
        assert_eq!(p.death_time, 0);
        p.update(&terrains, CANVAS, 1.0 / 60.0);
        assert_eq!(p.death_time, 0);
    }

    #[test]
    fn test_animation() {
        let mut p = Player::new(EntityId(1), PlayerClass::Magi, 0, CANVAS);
        p.body.on_ground = true;
        p.anim = 27.5;
        p.advance_animation();
        assert_eq!(p.anim, 0.25);

        // Airborne animation parks on the jump frame
        p.body.on_ground = false;
        p.anim = 12.0;
        p.advance_animation();
        assert_eq!(p.anim, 13.0);
        p.advance_animation();
        assert_eq!(p.anim, 13.0);
    }
}
