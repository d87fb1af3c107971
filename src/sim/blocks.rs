//! Reactive blocks
//!
//! Both boxes share a bounce: a hit from below pushes the box up, a delayed
//! action turns it around, and it falls back until it passes its resting y.

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::{Frame, FrameContext, Outbox, Sound, SpawnKind};
use super::entity::{
    Action, Actor, Behavior, Direction, Entity, Kind, Peer, Role, Tag, run_due_actions,
};
use super::geometry::Rect;
use super::schedule::ActionQueue;
use crate::SimError;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BouncePhase {
    Idle,
    Rising,
    Falling,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounce {
    pub phase: BouncePhase,
    pub rest_y: f32,
}

impl Bounce {
    pub fn new(rest_y: f32) -> Self {
        Self {
            phase: BouncePhase::Idle,
            rest_y,
        }
    }

    pub fn kick(&mut self, actions: &mut ActionQueue<Action>) {
        self.phase = BouncePhase::Rising;
        actions.schedule(Action::BounceDown, BOUNCE_RISE_TIME);
    }

    pub fn turn_down(&mut self) {
        self.phase = BouncePhase::Falling;
    }

    /// Move one frame. Returns true on the frame the box settles back.
    pub fn advance(&mut self, body: &mut Rect, dt: f32) -> bool {
        match self.phase {
            BouncePhase::Idle => false,
            BouncePhase::Rising => {
                body.y -= BOUNCE_RISE_SPEED * dt;
                false
            }
            BouncePhase::Falling => {
                body.y += BOUNCE_FALL_SPEED * dt;
                if body.y > self.rest_y {
                    body.y = self.rest_y;
                    self.phase = BouncePhase::Idle;
                    true
                } else {
                    false
                }
            }
        }
    }
}

fn struck_from_below_by_player(other: &Peer, dir: Direction) -> Option<bool> {
    match other.role {
        Role::Player { small } if dir == Direction::Up => Some(small),
        _ => None,
    }
}

/// Breakable brick block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickBox {
    pub bounce: Bounce,
    pub broken: bool,
}

impl Entity {
    pub fn brick_box(at: Vec2) -> Self {
        let mut actor = Actor::new(Tag::BrickBox, Rect::new(at.x, at.y, 16.0, 16.0));
        actor.physics.gravity = false;
        let state = BrickBox {
            bounce: Bounce::new(at.y),
            broken: false,
        };
        Entity::new(actor, Kind::BrickBox(state))
    }

    pub fn mystery_box(at: Vec2, reward: Reward) -> Self {
        let mut actor = Actor::new(Tag::MysteryBox, Rect::new(at.x, at.y, 16.0, 16.0));
        actor.physics.gravity = false;
        let state = MysteryBox {
            bounce: Bounce::new(at.y),
            full: true,
            pending_reward: false,
            reward,
            kills_goomba: false,
        };
        Entity::new(actor, Kind::MysteryBox(state))
    }
}

impl BrickBox {
    /// One-shot break into four spinning shards
    fn shatter(&mut self, actor: &mut Actor, out: &mut Outbox) {
        log::debug!("brick box {:?} shattered", actor.id);
        self.broken = true;
        actor.visible = false;

        let b = actor.body;
        let shard = |sign: f32| SpawnKind::Brick {
            rotation_step: sign * SHARD_SPIN,
            speed: sign * SHARD_SPEED,
        };
        out.spawn(shard(1.0), Vec2::new(b.right(), b.y));
        out.spawn(shard(-1.0), Vec2::new(b.x, b.y));
        out.spawn(shard(-1.0), Vec2::new(b.x, b.y - b.h));
        out.spawn(shard(1.0), Vec2::new(b.right(), b.y - b.h));
        out.play(Sound::BreakBlock);
    }
}

impl Behavior for BrickBox {
    fn role(&self) -> Role {
        Role::BrickBox {
            broken: self.broken,
        }
    }

    fn update(&mut self, actor: &mut Actor, cx: &mut FrameContext<'_>) -> Result<(), SimError> {
        run_due_actions(self, actor, &cx.frame, cx.out);
        if self.bounce.advance(&mut actor.body, cx.dt()) && self.broken {
            actor.physics.collides = false;
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
        let Some(small) = struck_from_below_by_player(other, dir) else {
            return;
        };
        self.bounce.kick(&mut actor.actions);
        if !small && !self.broken {
            self.shatter(actor, out);
        }
    }

    fn run_action(&mut self, _actor: &mut Actor, action: Action, _frame: &Frame, _out: &mut Outbox) {
        if action == Action::BounceDown {
            self.bounce.turn_down();
        }
    }

    fn animation_key(&self, _actor: &Actor) -> Option<&'static str> {
        Some("idle")
    }
}

/// What a mystery box holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reward {
    Coin,
    Mushroom,
}

impl FromStr for Reward {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coin" => Ok(Reward::Coin),
            "mushroom" => Ok(Reward::Mushroom),
            other => Err(SimError::InvalidSpawnKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MysteryBox {
    pub bounce: Bounce,
    pub full: bool,
    /// Emptied this bounce; the reward comes out when it settles
    pub pending_reward: bool,
    pub reward: Reward,
    /// Bounced by a big player; kills a goomba standing on it
    pub kills_goomba: bool,
}

impl MysteryBox {
    fn release(&mut self, actor: &Actor, out: &mut Outbox) {
        let b = actor.body;
        // Coin boxes always pay out their coin
        if self.reward == Reward::Mushroom && out.roll_ambush() {
            log::info!("mystery box {:?} released an ambush", actor.id);
            for _ in 0..AMBUSH_SIZE {
                out.spawn(SpawnKind::Goomba, Vec2::new(b.x, 0.0));
            }
            return;
        }
        log::debug!("mystery box {:?} released {:?}", actor.id, self.reward);
        match self.reward {
            Reward::Mushroom => out.spawn(SpawnKind::Mushroom, Vec2::new(b.x, b.y)),
            Reward::Coin => out.spawn(SpawnKind::Coin, Vec2::new(b.x, b.y - COIN_OFFSET)),
        }
    }
}

impl Behavior for MysteryBox {
    fn role(&self) -> Role {
        Role::MysteryBox {
            kills_goomba: self.kills_goomba,
        }
    }

    fn update(&mut self, actor: &mut Actor, cx: &mut FrameContext<'_>) -> Result<(), SimError> {
        run_due_actions(self, actor, &cx.frame, cx.out);
        if self.bounce.advance(&mut actor.body, cx.dt()) {
            self.kills_goomba = false;
            if self.pending_reward {
                self.pending_reward = false;
                self.release(actor, cx.out);
            }
        }
        Ok(())
    }

    fn handle_collision(
        &mut self,
        actor: &mut Actor,
        other: &Peer,
        dir: Direction,
        _frame: &Frame,
        _out: &mut Outbox,
    ) {
        let Some(small) = struck_from_below_by_player(other, dir) else {
            return;
        };
        if self.full {
            self.pending_reward = true;
        }
        if !small {
            self.kills_goomba = true;
        }
        self.full = false;
        self.bounce.kick(&mut actor.actions);
    }

    fn run_action(&mut self, _actor: &mut Actor, action: Action, _frame: &Frame, _out: &mut Outbox) {
        if action == Action::BounceDown {
            self.bounce.turn_down();
        }
    }

    fn animation_key(&self, _actor: &Actor) -> Option<&'static str> {
        Some(if self.full { "idle" } else { "empty" })
    }
}
