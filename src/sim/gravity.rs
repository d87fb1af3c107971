//! Gravity resolution
//!
//! Runs for every gravity-enabled entity before any entity updates. Only the
//! first collision decides where the body comes to rest; every entity hit is
//! told about it.

use super::context::FrameContext;
use super::entity::{Direction, Entity};
use super::grid::Edge;
use super::motion::{get_collisions, project_gravity};
use crate::SimError;

pub fn apply_gravity(entity: &mut Entity, cx: &mut FrameContext<'_>) -> Result<(), SimError> {
    let actor = &mut entity.actor;
    if !actor.physics.gravity {
        return Ok(());
    }

    let step = project_gravity(&actor.body, &actor.physics, cx.dt());
    actor.physics.on_ground = false;
    actor.physics.last_attempted_velocity.y = step.vy;

    let proposed = actor.body.with_y(step.y);
    let collisions = get_collisions(actor, &proposed, &[Edge::Left, Edge::Right], false, cx)?;
    let Some(first) = collisions.first() else {
        actor.body.y = step.y;
        actor.physics.velocity.y = step.vy;
        return Ok(());
    };

    let falling = step.vy > 0.0;
    if falling {
        actor.body.y = first.body.top() - actor.body.h;
        actor.physics.velocity.y = 0.0;
        actor.physics.on_ground = true;
        actor.physics.jumping = false;
    } else if step.vy < 0.0 {
        actor.body.y = first.body.bottom();
        actor.physics.velocity.y = 0.0;
    }

    // A falling body lands on the top of what it hit; a rising one bumps its underside
    let (theirs, mine) = if falling {
        (Direction::Down, Direction::Up)
    } else {
        (Direction::Up, Direction::Down)
    };
    for collision in &collisions {
        let Some(target) = collision.entity() else {
            continue;
        };
        let me = entity.peer();
        cx.strike(target, &me, theirs);
        if let Some(other) = cx.peer(target) {
            entity.handle_collision(&other, mine, &cx.frame, cx.out);
        }
    }
    Ok(())
}
