//! Motion projection and narrow-phase queries
//!
//! Lateral and jump movement use plain Euler steps; gravity uses the
//! semi-implicit form. The two paths are kept separate on purpose.

use super::context::FrameContext;
use super::entity::{Actor, EntityId, Physics, Tag};
use super::geometry::{Rect, overlaps};
use super::grid::{Edge, ObjectRef};
use crate::SimError;
use crate::consts::GRAVITY;

/// Debug colors for the player's queries
pub const CANDIDATE_COLOR: u32 = 0x39cccc;
pub const COLLISION_COLOR: u32 = 0xff4136;

pub fn project_horizontal(body: &Rect, speed: f32, dt: f32) -> f32 {
    body.x + dt * speed
}

pub fn project_vertical(body: &Rect, speed: f32, dt: f32) -> f32 {
    body.y + dt * speed
}

/// Result of one gravity step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityStep {
    pub y: f32,
    pub vy: f32,
}

pub fn project_gravity(body: &Rect, physics: &Physics, dt: f32) -> GravityStep {
    let vy = physics.velocity.y;
    GravityStep {
        y: body.y + dt * (vy + dt * GRAVITY / 2.0),
        vy: vy + dt * GRAVITY,
    }
}

/// An object whose body overlaps a proposed body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub target: ObjectRef,
    /// Body at query time
    pub body: Rect,
}

impl Collision {
    /// The entity hit, or `None` for a bare tile
    pub fn entity(&self) -> Option<EntityId> {
        match self.target {
            ObjectRef::Entity(id) => Some(id),
            ObjectRef::Tile(_) => None,
        }
    }
}

/// Everything `proposed` would overlap, looked up at the given edges.
///
/// Candidates are merged across edges without duplicates and returned in
/// grid-bucket order, so "the first collision" is the first one filed, not
/// the nearest. Entities that do not collide get nothing back unless
/// `include_non_colliding` is set.
pub fn get_collisions(
    actor: &Actor,
    proposed: &Rect,
    edges: &[Edge],
    include_non_colliding: bool,
    cx: &mut FrameContext<'_>,
) -> Result<Vec<Collision>, SimError> {
    if !actor.physics.collides && !include_non_colliding {
        return Ok(Vec::new());
    }

    let mut candidates: Vec<ObjectRef> = Vec::new();
    for &edge in edges {
        for &object in cx.grid.query(proposed, edge)? {
            if !candidates.contains(&object) {
                candidates.push(object);
            }
        }
    }

    let debug = cx.frame.debug && actor.tag == Tag::Player;
    let mut collisions = Vec::new();
    for object in candidates {
        if object == ObjectRef::Entity(actor.id) {
            continue;
        }
        let Some(body) = cx.body_of(object) else {
            continue;
        };
        if debug {
            cx.out.debug_rect(body, CANDIDATE_COLOR);
        }
        if overlaps(&body, proposed) {
            collisions.push(Collision {
                target: object,
                body,
            });
        }
    }

    if debug {
        for collision in &collisions {
            cx.out.debug_rect(collision.body, COLLISION_COLOR);
        }
    }
    Ok(collisions)
}
