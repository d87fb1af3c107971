//! Player state machine
//!
//! Small or big, grounded or jumping, alive or dead, vulnerable or
//! invincible, stable or changing size. Size changes are a flicker of
//! scheduled toggles while the level is paused.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::{Frame, FrameContext, Music, Outbox, Sound};
use super::entity::{
    Action, Actor, Behavior, Direction, Entity, Kind, Peer, Role, Tag, peer_of, run_due_actions,
};
use super::geometry::Rect;
use super::grid::Edge;
use super::input::Input;
use super::motion::{get_collisions, project_horizontal, project_vertical};
use crate::SimError;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub small: bool,
    pub invincible: bool,
    pub changing_size: bool,
    /// Frames of upward push left in the current jump
    pub jump_frames: u8,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            small: true,
            invincible: false,
            changing_size: false,
            jump_frames: 0,
        }
    }
}

impl Entity {
    pub fn player(at: Vec2) -> Self {
        let body = Rect::new(at.x, at.y, 16.0, PLAYER_SMALL_HEIGHT);
        Entity::new(Actor::new(Tag::Player, body), Kind::Player(Player::default()))
    }
}

impl Player {
    pub(crate) fn go_big(&mut self, actor: &mut Actor) {
        if self.small {
            self.small = false;
            actor.body.h = PLAYER_BIG_HEIGHT;
            actor.body.y -= PLAYER_BIG_HEIGHT - PLAYER_SMALL_HEIGHT;
        }
    }

    pub(crate) fn go_small(&mut self, actor: &mut Actor) {
        if !self.small {
            self.small = true;
            actor.body.h = PLAYER_SMALL_HEIGHT;
            actor.body.y += PLAYER_BIG_HEIGHT - PLAYER_SMALL_HEIGHT;
        }
    }

    /// Alternate small/big every `step` seconds, starting small
    fn schedule_flicker(actor: &mut Actor, step: f32) {
        for k in 0..FLICKER_STEPS {
            let action = if k % 2 == 0 {
                Action::ShowSmall
            } else {
                Action::ShowBig
            };
            actor.actions.schedule(action, step * k as f32);
        }
    }

    fn shrink(&mut self, actor: &mut Actor, frame: &Frame, out: &mut Outbox) {
        log::debug!("player shrinking");
        self.changing_size = true;
        out.play(Sound::Powerdown);
        out.pause();
        self.invincible = true;
        actor.look.animating = false;

        let step = frame.dt * SIZE_CHANGE_CONST;
        Self::schedule_flicker(actor, step);
        actor
            .actions
            .schedule(Action::SettleSmall, step * FLICKER_STEPS as f32);
        actor
            .actions
            .schedule(Action::EndInvincibility, step * (FLICKER_STEPS + 2) as f32);
    }

    fn grow(&mut self, actor: &mut Actor, frame: &Frame, out: &mut Outbox) {
        log::debug!("player growing");
        out.play(Sound::Powerup);
        out.pause();
        actor.physics.gravity = false;
        actor.look.animating = false;
        self.changing_size = true;

        let step = frame.dt * SIZE_CHANGE_CONST;
        Self::schedule_flicker(actor, step);
        actor
            .actions
            .schedule(Action::SettleBig, step * FLICKER_STEPS as f32);
    }

    fn die(&mut self, actor: &mut Actor, frame: &Frame, out: &mut Outbox) {
        log::debug!("player died at ({}, {})", actor.body.x, actor.body.y);
        actor.dead = true;
        out.stop_music(Music::Theme);
        out.play(Sound::PlayerDeath);
        actor
            .actions
            .schedule(Action::DeathHop, frame.dt * PLAYER_DEATH_HOP_FRAMES);
    }

    fn move_laterally(
        &mut self,
        actor: &mut Actor,
        cx: &mut FrameContext<'_>,
        speed: f32,
    ) -> Result<(), SimError> {
        actor.physics.last_attempted_velocity.x = speed;
        let projected = project_horizontal(&actor.body, speed, cx.dt());
        if actor.keep_in_bounds(cx.frame.world.x, projected) {
            return Ok(());
        }

        let proposed = actor.body.with_x(projected);
        let left = get_collisions(actor, &proposed, &[Edge::Left], false, cx)?;
        let right = get_collisions(actor, &proposed, &[Edge::Right], false, cx)?;
        let (blocking, mine) = if speed > 0.0 && !right.is_empty() {
            (right, Direction::Right)
        } else if speed < 0.0 && !left.is_empty() {
            (left, Direction::Left)
        } else {
            actor.body.x = projected;
            actor.physics.velocity.x = speed;
            return Ok(());
        };

        if let Some(first) = blocking.first() {
            actor.body.x = match mine {
                Direction::Right => first.body.left() - actor.body.w,
                _ => first.body.right(),
            };
        }
        actor.physics.velocity.x = 0.0;

        for collision in &blocking {
            let Some(target) = collision.entity() else {
                continue;
            };
            if let Some(other) = cx.peer(target) {
                self.handle_collision(actor, &other, mine, &cx.frame, cx.out);
            }
            let me = peer_of(self, actor);
            cx.strike(target, &me, mine.opposite());
        }
        Ok(())
    }

    /// One frame of jump push. Only the struck objects hear about a bump.
    fn rise(&mut self, actor: &mut Actor, cx: &mut FrameContext<'_>) -> Result<(), SimError> {
        if self.jump_frames == 0 {
            return Ok(());
        }
        actor.physics.jumping = true;

        let projected = project_vertical(&actor.body, PLAYER_JUMP_SPEED, cx.dt());
        let proposed = actor.body.with_y(projected);
        let collisions = get_collisions(actor, &proposed, &[Edge::Left, Edge::Right], false, cx)?;
        let me = peer_of(self, actor);
        for collision in &collisions {
            if let Some(target) = collision.entity() {
                cx.strike(target, &me, Direction::Up);
            }
        }
        if collisions.is_empty() {
            actor.body.y = projected;
            actor.physics.velocity.y = PLAYER_JUMP_SPEED;
        }
        self.jump_frames -= 1;
        Ok(())
    }
}

impl Behavior for Player {
    fn role(&self) -> Role {
        Role::Player { small: self.small }
    }

    fn update(&mut self, actor: &mut Actor, cx: &mut FrameContext<'_>) -> Result<(), SimError> {
        run_due_actions(self, actor, &cx.frame, cx.out);

        if actor.dead {
            cx.out.pause();
            return Ok(());
        }
        if cx.frame.paused {
            return Ok(());
        }

        let mut speed = 0.0;
        if cx.pressed(Input::Right) {
            speed += PLAYER_RUN_SPEED;
        }
        if cx.pressed(Input::Left) {
            speed -= PLAYER_RUN_SPEED;
        }
        if speed != 0.0 {
            self.move_laterally(actor, cx, speed)?;
        } else {
            actor.physics.velocity.x = 0.0;
        }

        if cx.just_pressed(Input::Up) {
            self.jump_frames = if actor.physics.jumping {
                0
            } else {
                PLAYER_JUMP_FRAMES
            };
            if self.jump_frames > 0 {
                cx.out.play(Sound::Jump);
            }
        }
        self.rise(actor, cx)
    }

    fn handle_collision(
        &mut self,
        actor: &mut Actor,
        other: &Peer,
        dir: Direction,
        frame: &Frame,
        out: &mut Outbox,
    ) {
        if actor.dead {
            return;
        }
        match other.role {
            Role::Goomba | Role::Turtle { .. } => {
                if dir == Direction::Up {
                    actor.physics.velocity.y = PLAYER_STOMP_REBOUND;
                } else if !self.small && !self.changing_size {
                    self.shrink(actor, frame, out);
                } else if !self.invincible {
                    self.die(actor, frame, out);
                }
            }
            Role::Mushroom if self.small && !self.changing_size => {
                self.grow(actor, frame, out);
            }
            _ => {}
        }
    }

    fn run_action(&mut self, actor: &mut Actor, action: Action, _frame: &Frame, out: &mut Outbox) {
        match action {
            Action::ShowSmall => self.go_small(actor),
            Action::ShowBig => self.go_big(actor),
            Action::SettleSmall => {
                self.go_small(actor);
                out.unpause();
            }
            Action::SettleBig => {
                self.go_big(actor);
                actor.physics.gravity = true;
                actor.look.animating = true;
                self.changing_size = false;
                out.unpause();
            }
            Action::EndInvincibility => {
                self.invincible = false;
                actor.look.animating = true;
                self.changing_size = false;
            }
            Action::DeathHop => {
                actor.physics.velocity.y = PLAYER_DEATH_HOP;
                actor.physics.collides = false;
            }
            Action::Vanish | Action::BounceDown => {}
        }
    }

    fn animation_key(&self, actor: &Actor) -> Option<&'static str> {
        let key = if actor.dead {
            "dead"
        } else if actor.physics.jumping {
            if self.small { "jumping" } else { "big-jumping" }
        } else if actor.physics.velocity.x != 0.0 {
            if self.small { "running" } else { "big-running" }
        } else if self.small {
            "idle"
        } else {
            "big-idle"
        };
        Some(key)
    }
}
