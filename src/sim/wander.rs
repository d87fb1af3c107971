//! Wandering patrol shared by ground enemies and roaming pickups
//!
//! The heading is never stored: it is the sign of
//! `last_attempted_velocity.x`, and turning around negates it.

use super::context::FrameContext;
use super::entity::{Actor, Behavior, Direction, peer_of};
use super::grid::Edge;
use super::motion::{get_collisions, project_horizontal};
use crate::SimError;

/// Step one frame along the current heading at `speed`
pub fn act<B: Behavior + ?Sized>(
    behavior: &mut B,
    actor: &mut Actor,
    cx: &mut FrameContext<'_>,
    speed: f32,
) -> Result<(), SimError> {
    let heading = if actor.physics.last_attempted_velocity.x < 0.0 {
        -speed
    } else {
        speed
    };
    actor.physics.last_attempted_velocity.x = heading;

    let projected = project_horizontal(&actor.body, heading, cx.dt());
    if actor.keep_in_bounds(cx.frame.world.x, projected) {
        actor.turn_around();
        return Ok(());
    }

    let proposed = actor.body.with_x(projected);
    let collisions = get_collisions(actor, &proposed, &[Edge::Left, Edge::Right], false, cx)?;
    if collisions.is_empty() {
        actor.body.x = projected;
        actor.physics.velocity.x = heading;
        return Ok(());
    }

    let theirs = if heading > 0.0 { Direction::Right } else { Direction::Left };
    let mine = if heading < 0.0 { Direction::Right } else { Direction::Left };
    for collision in &collisions {
        let Some(target) = collision.entity() else {
            continue;
        };
        let me = peer_of(behavior, actor);
        cx.strike(target, &me, theirs);
        if let Some(other) = cx.peer(target) {
            behavior.handle_collision(actor, &other, mine, &cx.frame, cx.out);
        }
    }
    actor.turn_around();
    Ok(())
}

/// Lazy activation: flips `active` the first frame the body is on screen
pub fn wake(active: &mut bool, actor: &Actor, cx: &FrameContext<'_>) {
    if !*active && cx.on_screen(&actor.body) {
        *active = true;
        log::debug!("{} {:?} activated", actor.tag.name(), actor.id);
    }
}

#[cfg(test)]
mod tests {
    use crate::Settings;
    use crate::sim::entity::Entity;
    use crate::sim::geometry::Rect;
    use crate::sim::state::Level;
    use glam::Vec2;

    fn level() -> Level {
        let settings = Settings {
            wait_for_input: false,
            ..Settings::default()
        };
        Level::new(settings, Vec2::new(320.0, 240.0)).unwrap()
    }

    #[test]
    fn test_walks_along_heading() {
        let mut level = level();
        let id = level.add_entity(Entity::goomba(Vec2::new(100.0, 192.0)));
        level
            .probe(id, |entity, cx| {
                let actor = &mut entity.actor;
                let mut walker = crate::sim::goomba::Goomba::default();
                super::act(&mut walker, actor, cx, 50.0)
            })
            .unwrap();
        let goomba = level.entity(id).unwrap();
        assert_eq!(goomba.body().x, 100.0 - 50.0 * level.settings.fixed_step);
        assert_eq!(goomba.actor.physics.velocity.x, -50.0);
    }

    #[test]
    fn test_world_edge_turns_around() {
        let mut level = level();
        let id = level.add_entity(Entity::goomba(Vec2::new(0.2, 192.0)));
        level
            .probe(id, |entity, cx| {
                let mut walker = crate::sim::goomba::Goomba::default();
                super::act(&mut walker, &mut entity.actor, cx, 50.0)
            })
            .unwrap();
        let goomba = level.entity(id).unwrap();
        assert_eq!(goomba.body().x, 0.0);
        assert_eq!(goomba.actor.physics.last_attempted_velocity.x, 50.0);
    }

    #[test]
    fn test_tile_blocks_and_turns_around() {
        let mut level = level();
        level.add_tile(Rect::new(84.0, 192.0, 16.0, 16.0));
        let id = level.add_entity(Entity::goomba(Vec2::new(100.5, 192.0)));
        level
            .probe(id, |entity, cx| {
                let mut walker = crate::sim::goomba::Goomba::default();
                super::act(&mut walker, &mut entity.actor, cx, 50.0)
            })
            .unwrap();
        let goomba = level.entity(id).unwrap();
        // Blocked moves are not committed
        assert_eq!(goomba.body().x, 100.5);
        assert_eq!(goomba.actor.physics.last_attempted_velocity.x, 50.0);
    }
}
