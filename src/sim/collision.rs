//! Collision detection and response for axis-aligned boxes
//!
//! Everything in the world is a box. Overlap is strict on both axes, so boxes
//! that merely touch (a player standing exactly on a segment) don't overlap.

use glam::Vec2;

use super::enemy::Enemy;
use super::player::Player;
use super::state::EntityId;
use super::terrain::{Terrain, TerrainKind};
use crate::consts::{SHIELD_HEIGHT_SCALE, SHIELD_WIDTH};

/// Axis-aligned bounding box (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Strict overlap on the horizontal axis only
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max().x && other.min.x < self.max().x
    }

    /// Strict overlap on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.min.y < other.max().y && other.min.y < self.max().y
    }
}

/// Shield zone projected in front of the party leader.
///
/// Spans the leader's width plus `SHIELD_WIDTH`, and rises from the leader's
/// feet to 1.25x the paladin's height.
pub fn shield_hitbox(leader: &Aabb, paladin_height: f32) -> Aabb {
    let height = paladin_height * SHIELD_HEIGHT_SCALE;
    let bottom = leader.max().y;
    Aabb::new(
        Vec2::new(leader.min.x, bottom - height),
        Vec2::new(leader.size.x + SHIELD_WIDTH, height),
    )
}

/// What a projectile struck this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileHit {
    Terrain(EntityId),
    Player(EntityId),
    Enemy(EntityId),
}

/// Find the first thing a projectile hits.
///
/// Tested in fixed order: solid terrain, then living players (only for shots
/// aimed at players), then enemies (only for shots aimed at enemies).
pub fn resolve_projectile_hit(
    shot: &Aabb,
    targets_players: bool,
    terrains: &[Terrain],
    players: &[Player],
    enemies: &[Enemy],
) -> Option<ProjectileHit> {
    if let Some(t) = terrains
        .iter()
        .find(|t| t.is_solid() && shot.overlaps(&t.aabb()))
    {
        return Some(ProjectileHit::Terrain(t.id));
    }

    if targets_players {
        players
            .iter()
            .filter(|p| p.is_alive())
            .find(|p| shot.overlaps(&p.body.aabb()))
            .map(|p| ProjectileHit::Player(p.id))
    } else {
        enemies
            .iter()
            .find(|e| shot.overlaps(&e.body.aabb()))
            .map(|e| ProjectileHit::Enemy(e.id))
    }
}

/// Response of a player box against one terrain segment
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TerrainContact {
    /// New x for the player, flush against the segment's left face
    pub push_to_x: Option<f32>,
    /// Player sank into lava and must bounce out
    pub lava_bounce: bool,
}

impl TerrainContact {
    pub fn is_none(&self) -> bool {
        self.push_to_x.is_none() && !self.lava_bounce
    }
}

/// Player-vs-terrain response.
///
/// Solid segments push the player back against their left face. Lava only
/// bites once the player's feet are a tenth of a segment below the surface.
pub fn player_terrain_contact(player: &Aabb, terrain: &Terrain) -> TerrainContact {
    let seg = terrain.aabb();
    if !player.overlaps(&seg) {
        return TerrainContact::default();
    }

    let push_to_x = terrain.is_solid().then(|| seg.min.x - player.size.x);
    let lava_bounce =
        terrain.kind == TerrainKind::Lava && player.max().y > seg.min.y + seg.size.y / 10.0;

    TerrainContact {
        push_to_x,
        lava_bounce,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::player::PlayerClass;

    const CANVAS: Vec2 = Vec2::new(800.0, 600.0);

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&boxed(5.0, 5.0, 10.0, 10.0)));
        // Touching edges don't overlap
        assert!(!a.overlaps(&boxed(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&boxed(0.0, 10.0, 10.0, 10.0)));
        // Horizontal overlap only
        assert!(a.overlaps_x(&boxed(5.0, 50.0, 10.0, 10.0)));
        assert!(!a.overlaps(&boxed(5.0, 50.0, 10.0, 10.0)));
    }

    #[test]
    fn test_shield_hitbox() {
        let leader = boxed(275.0, 370.0, 65.0, 130.0);
        let shield = shield_hitbox(&leader, 150.0);
        assert_eq!(shield.min.x, 275.0);
        assert_eq!(shield.max().x, 275.0 + 65.0 + SHIELD_WIDTH);
        assert_eq!(shield.max().y, 500.0);
        assert_eq!(shield.size.y, 187.5);
    }

    #[test]
    fn test_projectile_hits_terrain_first() {
        let terrain = Terrain::new(EntityId(1), TerrainKind::Base, 100.0, CANVAS);
        let mut enemy = Enemy::new(EntityId(2), EnemyKind::Gator, CANVAS);
        enemy.body.position = Vec2::new(100.0, 480.0);

        let shot = boxed(110.0, 490.0, 40.0, 40.0);
        let hit = resolve_projectile_hit(&shot, false, &[terrain], &[], &[enemy]);
        assert_eq!(hit, Some(ProjectileHit::Terrain(EntityId(1))));
    }

    #[test]
    fn test_projectile_ignores_non_solid_terrain() {
        let terrain = Terrain::new(EntityId(1), TerrainKind::Void, 100.0, CANVAS);
        let shot = boxed(110.0, 510.0, 40.0, 40.0);
        assert_eq!(resolve_projectile_hit(&shot, false, &[terrain], &[], &[]), None);
    }

    #[test]
    fn test_projectile_side_filtering() {
        let mut player = Player::new(EntityId(3), PlayerClass::Ranger, 0, CANVAS);
        player.body.position = Vec2::new(200.0, 100.0);
        let mut enemy = Enemy::new(EntityId(4), EnemyKind::Rat, CANVAS);
        enemy.body.position = Vec2::new(200.0, 100.0);
        let players = [player];
        let enemies = [enemy];

        let shot = boxed(210.0, 120.0, 40.0, 40.0);
        assert_eq!(
            resolve_projectile_hit(&shot, true, &[], &players, &enemies),
            Some(ProjectileHit::Player(EntityId(3)))
        );
        assert_eq!(
            resolve_projectile_hit(&shot, false, &[], &players, &enemies),
            Some(ProjectileHit::Enemy(EntityId(4)))
        );
    }

    #[test]
    fn test_dead_players_are_not_hit() {
        let mut player = Player::new(EntityId(3), PlayerClass::Magi, 0, CANVAS);
        player.body.position = Vec2::new(200.0, 100.0);
        player.death_time = 10;
        let shot = boxed(210.0, 120.0, 40.0, 40.0);
        assert_eq!(resolve_projectile_hit(&shot, true, &[], &[player], &[]), None);
    }

    #[test]
    fn test_solid_terrain_pushes_player_left() {
        let terrain = Terrain::new(EntityId(1), TerrainKind::Base, 300.0, CANVAS);
        let player = boxed(280.0, 480.0, 65.0, 150.0);
        let contact = player_terrain_contact(&player, &terrain);
        assert_eq!(contact.push_to_x, Some(300.0 - 65.0));
        assert!(!contact.lava_bounce);
    }

    #[test]
    fn test_lava_bounce_threshold() {
        let terrain = Terrain::new(EntityId(1), TerrainKind::Lava, 300.0, CANVAS);
        // Feet 5 units into the lava: not deep enough yet
        let shallow = boxed(300.0, 355.0, 65.0, 150.0);
        assert!(player_terrain_contact(&shallow, &terrain).is_none());
        // Feet 15 units in
        let deep = boxed(300.0, 365.0, 65.0, 150.0);
        let contact = player_terrain_contact(&deep, &terrain);
        assert!(contact.lava_bounce);
        assert_eq!(contact.push_to_x, None);
    }
}
