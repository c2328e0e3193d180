//! Stepped integration against terrain
//!
//! Movement is applied in unit-length sub-steps so fast fallers can't tunnel
//! through a segment's top edge. Each sub-step re-tests the terrain before it
//! is committed.

use super::body::PhysicsBody;
use super::terrain::Terrain;
use crate::consts::{GRAVITY, PARTICLE_BOUNCE};

/// Slack for float comparisons against segment surfaces
const SURFACE_EPS: f32 = 0.001;

/// What happens when a sub-step would enter solid terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Snap onto the surface and stop falling
    Land,
    /// Reflect vertical velocity (damped)
    Bounce,
}

#[inline]
pub fn apply_gravity(body: &mut PhysicsBody, dt: f32) {
    body.velocity.y += GRAVITY * dt;
}

/// Surface height of solid terrain the body is standing on or sunk into.
///
/// Only counts while the body isn't rising.
pub fn find_support(body: &PhysicsBody, terrains: &[Terrain]) -> Option<f32> {
    if body.velocity.y < 0.0 {
        return None;
    }
    let aabb = body.aabb();
    let bottom = body.bottom();
    terrains
        .iter()
        .filter(|t| t.is_solid())
        .find(|t| {
            let seg = t.aabb();
            aabb.overlaps_x(&seg) && bottom >= seg.min.y - SURFACE_EPS && aabb.min.y < seg.max().y
        })
        .map(|t| t.top())
}

/// Length of sub-step `i` along an axis moving `speed` units this tick
#[inline]
fn substep_len(speed: f32, i: u32) -> f32 {
    (speed - i as f32).clamp(0.0, 1.0)
}

/// Surface that would stop a move of `(dx, dy)`, if any.
///
/// A move is blocked when the body currently sits at or above a solid
/// segment's top and the move would carry its bottom edge past that top while
/// horizontally overlapping the segment. Bodies already below the surface
/// (fallen into a pit) are never snapped back up.
fn blocking_surface(body: &PhysicsBody, dx: f32, dy: f32, terrains: &[Terrain]) -> Option<f32> {
    if dy <= 0.0 {
        return None;
    }
    let left = body.position.x;
    let right = body.position.x + body.bounds.x + dx;
    let bottom = body.bottom();
    terrains
        .iter()
        .filter(|t| t.is_solid())
        .find(|t| {
            let top = t.top();
            left < t.right() && right > t.position.x && bottom <= top + SURFACE_EPS && bottom + dy > top
        })
        .map(|t| t.top())
}

/// Apply `velocity.y` in unit sub-steps, landing on the first solid surface hit
pub fn step_vertical(body: &mut PhysicsBody, terrains: &[Terrain]) {
    let speed = body.velocity.y.abs();
    let sign = body.velocity.y.signum();
    let steps = speed.ceil() as u32;

    for i in 0..steps {
        let dy = substep_len(speed, i) * sign;
        if let Some(surface) = blocking_surface(body, 0.0, dy, terrains) {
            body.land(surface);
            break;
        }
        body.position.y += dy;
    }
}

/// Apply both velocity components in unit sub-steps.
///
/// The number of sub-steps follows the velocity's length; each axis
/// contributes until its own magnitude is used up.
pub fn step_axes(body: &mut PhysicsBody, terrains: &[Terrain], contact: Contact) {
    let vel = body.velocity;
    let (speed_x, speed_y) = (vel.x.abs(), vel.y.abs());
    let steps = vel.length().ceil() as u32;

    for i in 0..steps {
        let dx = substep_len(speed_x, i) * vel.x.signum();
        let dy = substep_len(speed_y, i) * vel.y.signum();

        match blocking_surface(body, dx, dy, terrains) {
            Some(surface) => {
                match contact {
                    Contact::Land => body.land(surface),
                    Contact::Bounce => body.velocity.y *= PARTICLE_BOUNCE,
                }
                break;
            }
            None => {
                body.position.x += dx;
                body.position.y += dy;
            }
        }
    }
}
