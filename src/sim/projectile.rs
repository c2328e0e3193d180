//! Projectiles
//!
//! Launched toward a target's center with a per-kind speed divisor. A shot is
//! either enemy-owned (hits players) or party-owned (hits enemies); a paladin
//! shield can flip an enemy shot to the party's side.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::collision::Aabb;
use super::state::EntityId;
use crate::consts::GRAVITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Ranger Q
    Arrow,
    /// Enemy ranged attack
    Fireball,
    /// Magi Q
    MagiFireball,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileDescriptor {
    pub size: Vec2,
    pub gravity: bool,
    /// Launch velocity is the center-to-center vector divided by this
    pub speed_divisor: f32,
    /// Sets the victim's fire ticks on impact
    pub ignites: bool,
    /// Trails a flame particle system
    pub flame_trail: bool,
    pub sprite: &'static str,
}

const ARROW: ProjectileDescriptor = ProjectileDescriptor {
    size: Vec2::new(45.0, 13.0),
    gravity: true,
    speed_divisor: 28.0,
    ignites: false,
    flame_trail: false,
    sprite: "arrow.png",
};

const FIREBALL: ProjectileDescriptor = ProjectileDescriptor {
    size: Vec2::new(40.0, 40.0),
    gravity: false,
    speed_divisor: 60.0,
    ignites: false,
    flame_trail: true,
    sprite: "fireball.png",
};

const MAGI_FIREBALL: ProjectileDescriptor = ProjectileDescriptor {
    size: Vec2::new(40.0, 40.0),
    gravity: false,
    speed_divisor: 50.0,
    ignites: true,
    flame_trail: true,
    sprite: "fireball.png",
};

/// Upward kick given to gravity-affected shots at launch
const LOB_KICK: f32 = 15.0;

impl ProjectileKind {
    pub fn descriptor(&self) -> &'static ProjectileDescriptor {
        match self {
            ProjectileKind::Arrow => &ARROW,
            ProjectileKind::Fireball => &FIREBALL,
            ProjectileKind::MagiFireball => &MAGI_FIREBALL,
        }
    }

    /// Damage dealt on impact.
    ///
    /// `level` is the firing slot's upgrade level for party shots and the
    /// current level number for enemy fireballs.
    pub fn strength(&self, level: u32) -> f32 {
        match self {
            ProjectileKind::Arrow => 3.0 + level as f32,
            ProjectileKind::Fireball => (1.0 + level as f32).min(8.0),
            ProjectileKind::MagiFireball => 5.0 + level as f32 * 1.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub body: PhysicsBody,
    /// Targets players when set, enemies otherwise
    pub enemy_proj: bool,
    pub strength: f32,
    /// Attached trail system
    pub system: Option<EntityId>,
}

impl Projectile {
    /// Fire from top-left `origin` toward the center of `target`
    pub fn launch(
        id: EntityId,
        kind: ProjectileKind,
        origin: Vec2,
        target: &Aabb,
        enemy_proj: bool,
        strength: f32,
    ) -> Self {
        let desc = kind.descriptor();
        let mut body = PhysicsBody::new(origin, desc.size);
        body.on_ground = false;
        body.velocity = body.vec_to(target) / desc.speed_divisor;
        if desc.gravity {
            body.velocity.y -= LOB_KICK;
        }

        Self {
            id,
            kind,
            body,
            enemy_proj,
            strength,
            system: None,
        }
    }

    pub fn out_of_bounds(&self, canvas: Vec2) -> bool {
        let pos = self.body.position;
        pos.y > canvas.y * 2.0 || pos.x < 0.0 || pos.x > canvas.x
    }

    /// Bounce off the shield and switch sides
    pub fn deflect(&mut self) {
        self.body.velocity.x = -self.body.velocity.x;
        self.enemy_proj = false;
    }

    pub fn advance(&mut self, dt: f32) {
        if self.kind.descriptor().gravity {
            self.body.velocity.y += GRAVITY * dt;
        }
        self.body.position += self.body.velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_at(x: f32, y: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(40.0, 40.0))
    }

    #[test]
    fn test_strength_table() {
        assert_eq!(ProjectileKind::Arrow.strength(0), 3.0);
        assert_eq!(ProjectileKind::Arrow.strength(2), 5.0);
        assert_eq!(ProjectileKind::Fireball.strength(1), 2.0);
        assert_eq!(ProjectileKind::Fireball.strength(20), 8.0);
        assert_eq!(ProjectileKind::MagiFireball.strength(2), 8.0);
    }

    #[test]
    fn test_launch_velocity() {
        // Fireball centers are 600 apart horizontally
        let shot = Projectile::launch(
            EntityId(1),
            ProjectileKind::Fireball,
            Vec2::new(700.0, 100.0),
            &target_at(100.0, 100.0),
            true,
            2.0,
        );
        assert_eq!(shot.body.velocity, Vec2::new(-10.0, 0.0));
    }

    #[test]
    fn test_arrow_is_lobbed() {
        let mut shot = Projectile::launch(
            EntityId(1),
            ProjectileKind::Arrow,
            Vec2::new(100.0, 100.0),
            &Aabb::new(Vec2::new(660.0, 100.0), Vec2::new(45.0, 13.0)),
            false,
            3.0,
        );
        assert_eq!(shot.body.velocity, Vec2::new(20.0, -LOB_KICK));
        shot.advance(1.0 / 60.0);
        assert!((shot.body.velocity.y - (1.0 - LOB_KICK)).abs() < 1e-4);
        assert!((shot.body.position.y - (101.0 - LOB_KICK)).abs() < 1e-4);
        assert_eq!(shot.body.position.x, 120.0);
    }

    #[test]
    fn test_deflect() {
        let mut shot = Projectile::launch(
            EntityId(1),
            ProjectileKind::Fireball,
            Vec2::new(700.0, 100.0),
            &target_at(100.0, 100.0),
            true,
            2.0,
        );
        shot.deflect();
        assert!(!shot.enemy_proj);
        assert_eq!(shot.body.velocity.x, 10.0);
    }

    #[test]
    fn test_out_of_bounds() {
        let canvas = Vec2::new(800.0, 600.0);
        let mut shot = Projectile::launch(
            EntityId(1),
            ProjectileKind::Fireball,
            Vec2::new(400.0, 100.0),
            &target_at(100.0, 100.0),
            true,
            2.0,
        );
        assert!(!shot.out_of_bounds(canvas));
        shot.body.position.x = -1.0;
        assert!(shot.out_of_bounds(canvas));
        shot.body.position = Vec2::new(400.0, 1201.0);
        assert!(shot.out_of_bounds(canvas));
        // Above the canvas is still in play
        shot.body.position = Vec2::new(400.0, -50.0);
        assert!(!shot.out_of_bounds(canvas));
    }
}
