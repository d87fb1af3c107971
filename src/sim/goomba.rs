//! Goomba: the basic walking enemy

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::{Frame, FrameContext, Outbox, Sound};
use super::entity::{
    Action, Actor, Behavior, Direction, Entity, Kind, Peer, Role, Tag, run_due_actions,
};
use super::geometry::Rect;
use super::wander;
use crate::SimError;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fate {
    Alive,
    /// Flattened from above; vanishes shortly after
    Stomped,
    /// Knocked out of the level, spinning as it falls
    Bounced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goomba {
    pub fate: Fate,
    pub speed: f32,
    pub active: bool,
    pub launched_left: bool,
    pub rotation_step: f32,
}

impl Default for Goomba {
    fn default() -> Self {
        Self {
            fate: Fate::Alive,
            speed: GOOMBA_SPEED,
            active: false,
            launched_left: true,
            rotation_step: GOOMBA_SPIN,
        }
    }
}

impl Entity {
    pub fn goomba(at: Vec2) -> Self {
        let mut actor = Actor::new(Tag::Goomba, Rect::new(at.x, at.y, 16.0, 16.0));
        actor.physics.last_attempted_velocity.x = -GOOMBA_SPEED;
        Entity::new(actor, Kind::Goomba(Goomba::default()))
    }
}

impl Goomba {
    fn stomp(&mut self, actor: &mut Actor) {
        log::debug!("goomba {:?} stomped", actor.id);
        self.fate = Fate::Stomped;
        actor.dead = true;
        actor.physics.collides = false;
        actor.physics.gravity = false;
        actor.actions.schedule(Action::Vanish, GOOMBA_VANISH_DELAY);
    }

    fn bounce(&mut self, actor: &mut Actor, launched_left: bool) {
        log::debug!(
            "goomba {:?} knocked out to the {}",
            actor.id,
            if launched_left { "left" } else { "right" }
        );
        actor.dead = true;
        self.fate = Fate::Bounced;
        self.launched_left = launched_left;
        self.speed = GOOMBA_BOUNCE_SPEED;
        if launched_left {
            self.rotation_step = -self.rotation_step;
            actor.look.swap_facings();
        }
        actor.physics.velocity.y = LAUNCH_SPEED;
        actor.physics.collides = false;
    }
}

impl Behavior for Goomba {
    fn role(&self) -> Role {
        Role::Goomba
    }

    fn update(&mut self, actor: &mut Actor, cx: &mut FrameContext<'_>) -> Result<(), SimError> {
        run_due_actions(self, actor, &cx.frame, cx.out);
        if self.fate == Fate::Bounced {
            actor.look.rotation += self.rotation_step * cx.dt();
        }
        if cx.frame.paused {
            return Ok(());
        }
        wander::wake(&mut self.active, actor, cx);
        if self.fate == Fate::Stomped || !self.active {
            return Ok(());
        }
        if self.fate == Fate::Bounced {
            actor.physics.last_attempted_velocity.x = if self.launched_left {
                -self.speed
            } else {
                self.speed
            };
        }
        let speed = self.speed;
        wander::act(self, actor, cx, speed)
    }

    fn handle_collision(
        &mut self,
        actor: &mut Actor,
        other: &Peer,
        dir: Direction,
        _frame: &Frame,
        out: &mut Outbox,
    ) {
        if actor.dead {
            return;
        }
        match (other.role, dir) {
            (Role::Player { .. }, Direction::Down) => {
                out.play(Sound::Stomp);
                self.stomp(actor);
            }
            (Role::Turtle { shell_moving: true }, _) => {
                out.play(Sound::Bump);
                self.bounce(actor, dir == Direction::Left);
            }
            (Role::BrickBox { broken: true }, Direction::Up)
            | (Role::MysteryBox { kills_goomba: true }, Direction::Up) => {
                out.play(Sound::Stomp);
                let launched_left = out.coin_flip();
                self.bounce(actor, launched_left);
            }
            _ => {}
        }
    }

    fn run_action(&mut self, actor: &mut Actor, action: Action, _frame: &Frame, _out: &mut Outbox) {
        if action == Action::Vanish {
            actor.visible = false;
        }
    }

    fn animation_key(&self, _actor: &Actor) -> Option<&'static str> {
        Some(if self.fate == Fate::Stomped { "dead" } else { "moving" })
    }
}
