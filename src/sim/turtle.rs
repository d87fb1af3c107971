//! Turtle: walks, then cycles between a still and a sliding shell on stomps

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::{Frame, FrameContext, Outbox, Sound};
use super::entity::{
    Actor, Behavior, Direction, Entity, Facing, Kind, Peer, Role, Tag, run_due_actions,
};
use super::geometry::Rect;
use super::grid::Edge;
use super::motion::get_collisions;
use super::wander;
use crate::SimError;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurtleState {
    Wander,
    ShellStill,
    ShellMoving,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turtle {
    pub state: TurtleState,
    pub speed: f32,
    /// Set by a stomp, cleared once the player is no longer overlapping
    pub touching_player: bool,
    pub active: bool,
}

impl Default for Turtle {
    fn default() -> Self {
        Self {
            state: TurtleState::Wander,
            speed: TURTLE_SPEED,
            touching_player: false,
            active: false,
        }
    }
}

impl Entity {
    pub fn turtle(at: Vec2) -> Self {
        let mut actor = Actor::new(Tag::Turtle, Rect::new(at.x, at.y, 16.0, 24.0));
        actor.physics.last_attempted_velocity.x = -TURTLE_SPEED;
        // Sprite sheet faces the other way
        actor.look.normal = Facing::new(-1.0, 1.0);
        actor.look.flipped = Facing::new(1.0, 0.0);
        Entity::new(actor, Kind::Turtle(Turtle::default()))
    }
}

impl Turtle {
    fn advance(&mut self, actor: &mut Actor) {
        self.state = match self.state {
            TurtleState::Wander => {
                self.speed = 0.0;
                actor.body.w = 16.0;
                actor.body.h = 16.0;
                actor.physics.last_attempted_velocity.x = 0.0;
                TurtleState::ShellStill
            }
            TurtleState::ShellStill => {
                self.speed = SHELL_SPEED;
                TurtleState::ShellMoving
            }
            TurtleState::ShellMoving => TurtleState::ShellStill,
        };
        log::debug!("turtle {:?} -> {:?}", actor.id, self.state);
    }

    /// Drop the stomp latch once the player has moved off
    fn recheck_contact(&mut self, actor: &Actor, cx: &mut FrameContext<'_>) -> Result<(), SimError> {
        self.touching_player = false;
        let collisions = get_collisions(actor, &actor.body, &[Edge::Left, Edge::Right], false, cx)?;
        self.touching_player = collisions.iter().any(|collision| {
            collision
                .entity()
                .and_then(|id| cx.peer(id))
                .is_some_and(|peer| matches!(peer.role, Role::Player { .. }))
        });
        Ok(())
    }
}

impl Behavior for Turtle {
    fn role(&self) -> Role {
        Role::Turtle {
            shell_moving: self.state == TurtleState::ShellMoving,
        }
    }

    fn update(&mut self, actor: &mut Actor, cx: &mut FrameContext<'_>) -> Result<(), SimError> {
        if cx.frame.paused {
            return Ok(());
        }
        run_due_actions(self, actor, &cx.frame, cx.out);
        wander::wake(&mut self.active, actor, cx);
        if !self.active {
            return Ok(());
        }

        if self.touching_player {
            self.recheck_contact(actor, cx)?;
        }
        if self.state != TurtleState::ShellStill {
            let speed = self.speed;
            wander::act(self, actor, cx, speed)?;
        }
        Ok(())
    }

    fn handle_collision(
        &mut self,
        actor: &mut Actor,
        other: &Peer,
        dir: Direction,
        _frame: &Frame,
        out: &mut Outbox,
    ) {
        if matches!(other.role, Role::Player { .. }) && dir == Direction::Down && !self.touching_player {
            out.play(Sound::Stomp);
            self.touching_player = true;
            self.advance(actor);
        }
    }

    fn animation_key(&self, _actor: &Actor) -> Option<&'static str> {
        Some(match self.state {
            TurtleState::Wander => "moving",
            TurtleState::ShellStill | TurtleState::ShellMoving => "shell",
        })
    }
}
