//! Rewards and debris: the power-up mushroom, the coin and brick shards

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::{Frame, FrameContext, Outbox};
use super::entity::{Actor, Behavior, Direction, Entity, Facing, Kind, Peer, Role, Tag, peer_of};
use super::geometry::Rect;
use super::grid::Edge;
use super::motion::get_collisions;
use super::wander;
use crate::SimError;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MushroomState {
    /// Rising out of its box, intangible
    Emerging,
    Roaming,
    Consumed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mushroom {
    pub state: MushroomState,
    pub speed: f32,
    pub active: bool,
}

impl Entity {
    pub fn mushroom(at: Vec2) -> Self {
        let mut actor = Actor::new(Tag::Mushroom, Rect::new(at.x, at.y, 16.0, 16.0));
        actor.physics.collides = false;
        actor.physics.gravity = false;
        actor.look.flips = false;
        let state = Mushroom {
            state: MushroomState::Emerging,
            speed: MUSHROOM_SPEED,
            active: false,
        };
        Entity::new(actor, Kind::Mushroom(state))
    }

    pub fn coin(at: Vec2) -> Self {
        let mut actor = Actor::new(Tag::Coin, Rect::new(at.x, at.y, 16.0, 16.0));
        actor.physics.collides = false;
        actor.physics.velocity.y = LAUNCH_SPEED;
        Entity::new(actor, Kind::Coin(Coin))
    }

    pub fn brick(at: Vec2, rotation_step: f32, speed: f32) -> Self {
        let mut actor = Actor::new(Tag::Brick, Rect::new(at.x, at.y, 16.0, 16.0));
        actor.physics.collides = false;
        actor.physics.velocity.y = LAUNCH_SPEED;
        actor.look.flips = false;
        actor.look.normal = Facing::new(0.5, 0.5);
        Entity::new(
            actor,
            Kind::Brick(Brick {
                rotation_step,
                speed,
            }),
        )
    }
}

impl Mushroom {
    /// Rise until clear of whatever it spawned inside
    fn emerge(&mut self, actor: &mut Actor, cx: &mut FrameContext<'_>) -> Result<(), SimError> {
        actor.body.y -= MUSHROOM_RISE_SPEED * cx.dt();
        let collisions = get_collisions(actor, &actor.body, &[Edge::Left, Edge::Right], true, cx)?;
        for collision in &collisions {
            let Some(target) = collision.entity() else {
                continue;
            };
            if let Some(other) = cx.peer(target) {
                self.handle_collision(actor, &other, Direction::Up, &cx.frame, cx.out);
            }
            let me = peer_of(self, actor);
            cx.strike(target, &me, Direction::Down);
        }
        if collisions.is_empty() && self.state == MushroomState::Emerging {
            self.state = MushroomState::Roaming;
            actor.physics.gravity = true;
            actor.physics.collides = true;
        }
        Ok(())
    }
}

impl Behavior for Mushroom {
    fn role(&self) -> Role {
        Role::Mushroom
    }

    fn update(&mut self, actor: &mut Actor, cx: &mut FrameContext<'_>) -> Result<(), SimError> {
        if cx.frame.paused {
            return Ok(());
        }
        match self.state {
            MushroomState::Emerging => self.emerge(actor, cx),
            MushroomState::Roaming => {
                wander::wake(&mut self.active, actor, cx);
                if !self.active {
                    return Ok(());
                }
                let speed = self.speed;
                wander::act(self, actor, cx, speed)
            }
            MushroomState::Consumed => Ok(()),
        }
    }

    fn handle_collision(
        &mut self,
        actor: &mut Actor,
        other: &Peer,
        _dir: Direction,
        _frame: &Frame,
        _out: &mut Outbox,
    ) {
        if matches!(other.role, Role::Player { .. }) {
            self.state = MushroomState::Consumed;
            actor.visible = false;
            actor.physics.gravity = false;
            actor.physics.collides = false;
        }
    }

    fn animation_key(&self, _actor: &Actor) -> Option<&'static str> {
        Some("idle")
    }
}

/// Coin popped out of a mystery box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin;

impl Behavior for Coin {
    fn role(&self) -> Role {
        Role::Coin
    }

    fn update(&mut self, actor: &mut Actor, _cx: &mut FrameContext<'_>) -> Result<(), SimError> {
        if actor.physics.velocity.y > COIN_FADE_SPEED {
            actor.visible = false;
            actor.physics.gravity = false;
        }
        Ok(())
    }

    fn animation_key(&self, _actor: &Actor) -> Option<&'static str> {
        Some("idle")
    }
}

/// Shard of a shattered brick box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rotation_step: f32,
    pub speed: f32,
}

impl Behavior for Brick {
    fn role(&self) -> Role {
        Role::Brick
    }

    fn update(&mut self, actor: &mut Actor, cx: &mut FrameContext<'_>) -> Result<(), SimError> {
        let dt = cx.dt();
        actor.look.rotation += dt * self.rotation_step;
        actor.body.x += dt * self.speed;
        Ok(())
    }

    fn animation_key(&self, _actor: &Actor) -> Option<&'static str> {
        Some("moving")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::state::Level;

    fn level() -> Level {
        let settings = Settings {
            wait_for_input: false,
            ..Settings::default()
        };
        Level::new(settings, Vec2::new(320.0, 240.0)).unwrap()
    }

    #[test]
    fn test_mushroom_emerges_then_roams() {
        let mut level = level();
        let block = level.add_entity(Entity::brick_box(Vec2::new(160.0, 160.0)));
        let id = level.add_entity(Entity::mushroom(Vec2::new(160.0, 160.0)));

        level.probe(id, |entity, cx| entity.update(cx)).unwrap();
        let mushroom = level.entity(id).unwrap();
        assert!(!mushroom.actor.physics.collides);
        assert!(mushroom.body().y < 160.0);
        // Rising through the box never bumps it
        assert!(level.entity(block).unwrap().actor.actions.is_empty());

        level.entity_mut(id).unwrap().actor.body.y = 144.0;
        level.probe(id, |entity, cx| entity.update(cx)).unwrap();
        let mushroom = level.entity(id).unwrap();
        assert!(matches!(
            mushroom.kind,
            Kind::Mushroom(Mushroom {
                state: MushroomState::Roaming,
                ..
            })
        ));
        assert!(mushroom.actor.physics.collides);
        assert!(mushroom.actor.physics.gravity);
    }

    #[test]
    fn test_player_consumes_mushroom() {
        let mut level = level();
        let player = level.add_entity(Entity::player(Vec2::new(160.0, 150.0)));
        let id = level.add_entity(Entity::mushroom(Vec2::new(160.0, 160.0)));
        level.probe(id, |entity, cx| entity.update(cx)).unwrap();

        let mushroom = level.entity(id).unwrap();
        assert!(!mushroom.actor.visible);
        assert!(!mushroom.actor.physics.collides);
        // The player started growing
        let player = level.entity(player).unwrap();
        assert!(matches!(player.kind, Kind::Player(ref p) if p.changing_size));
    }

    #[test]
    fn test_coin_fades_once_falling_fast() {
        let mut level = level();
        let id = level.add_entity(Entity::coin(Vec2::new(100.0, 100.0)));
        level.probe(id, |entity, cx| entity.update(cx)).unwrap();
        assert!(level.entity(id).unwrap().actor.visible);

        level.entity_mut(id).unwrap().actor.physics.velocity.y = 301.0;
        level.probe(id, |entity, cx| entity.update(cx)).unwrap();
        let coin = level.entity(id).unwrap();
        assert!(!coin.actor.visible);
        assert!(!coin.actor.physics.gravity);
    }

    #[test]
    fn test_brick_drifts_and_spins() {
        let mut level = level();
        let id = level.add_entity(Entity::brick(Vec2::new(100.0, 100.0), -25.0, -50.0));
        level.probe(id, |entity, cx| entity.update(cx)).unwrap();
        let brick = level.entity(id).unwrap();
        let dt = level.settings.fixed_step;
        assert_eq!(brick.body().x, 100.0 + dt * -50.0);
        assert_eq!(brick.actor.look.rotation, dt * -25.0);
        assert_eq!(brick.current_animation_key(), Ok("moving"));
    }
}
