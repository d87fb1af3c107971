//! Entity core
//!
//! Every moving thing in the level is an `Entity`: a shared `Actor` (body,
//! physics, flags, delayed actions) plus a `Kind` payload holding the state
//! machine for that kind. Kinds plug in through the `Behavior` trait.
//!
//! Entities are never removed. "Gone" means `visible = false` and
//! `collides = false`, so an `EntityId` is also the entity's index in the
//! level's entity list for the whole run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::blocks::{BrickBox, MysteryBox};
use super::context::{Frame, FrameContext, Outbox};
use super::geometry::Rect;
use super::goomba::Goomba;
use super::pickups::{Brick, Coin, Mushroom};
use super::player::Player;
use super::schedule::ActionQueue;
use super::turtle::Turtle;
use crate::SimError;

/// Stable handle to an entity (its index in the level's entity list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub usize);

/// Side of an entity that was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Entity kind name, used for logging and animation lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Player,
    Goomba,
    Turtle,
    BrickBox,
    MysteryBox,
    Mushroom,
    Coin,
    Brick,
    /// Placeholder left in a slot while its entity is taken out for update
    Vacant,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Player => "player",
            Tag::Goomba => "goomba",
            Tag::Turtle => "turtle",
            Tag::BrickBox => "brickbox",
            Tag::MysteryBox => "mysterybox",
            Tag::Mushroom => "mushroom",
            Tag::Coin => "coin",
            Tag::Brick => "brick",
            Tag::Vacant => "vacant",
        }
    }

    /// Animation keys the renderer holds for this kind
    pub fn animations(self) -> &'static [&'static str] {
        match self {
            Tag::Player => &[
                "idle",
                "running",
                "jumping",
                "dead",
                "big-idle",
                "big-running",
                "big-jumping",
            ],
            Tag::Goomba => &["moving", "dead"],
            Tag::Turtle => &["moving", "shell"],
            Tag::BrickBox => &["idle"],
            Tag::MysteryBox => &["idle", "empty"],
            Tag::Mushroom => &["idle"],
            Tag::Coin => &["idle"],
            Tag::Brick => &["moving"],
            Tag::Vacant => &[],
        }
    }
}

/// What another entity can see of this one during a collision callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player { small: bool },
    Goomba,
    Turtle { shell_moving: bool },
    BrickBox { broken: bool },
    MysteryBox { kills_goomba: bool },
    Mushroom,
    Coin,
    Brick,
    Vacant,
}

/// Copy of the other party in a collision, taken at dispatch time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peer {
    pub id: EntityId,
    pub body: Rect,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    pub velocity: Vec2,
    /// Direction the entity last tried to move in, kept even when blocked
    pub last_attempted_velocity: Vec2,
    pub on_ground: bool,
    pub jumping: bool,
    /// Takes part in the broad-phase and collision queries
    pub collides: bool,
    /// Integrated by the gravity pass
    pub gravity: bool,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            last_attempted_velocity: Vec2::ZERO,
            on_ground: true,
            jumping: false,
            collides: true,
            gravity: true,
        }
    }
}

/// Horizontal scale and anchor handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facing {
    pub scale: f32,
    pub anchor: f32,
}

impl Facing {
    pub const fn new(scale: f32, anchor: f32) -> Self {
        Self { scale, anchor }
    }
}

/// Presentation state owned by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub rotation: f32,
    /// Animation plays (false freezes the current frame)
    pub animating: bool,
    /// Mirror the sprite when heading left
    pub flips: bool,
    pub normal: Facing,
    pub flipped: Facing,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            animating: true,
            flips: true,
            normal: Facing::new(1.0, 0.0),
            flipped: Facing::new(-1.0, 1.0),
        }
    }
}

impl Appearance {
    pub fn swap_facings(&mut self) {
        std::mem::swap(&mut self.normal, &mut self.flipped);
    }
}

/// Deferred work an entity can schedule on itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Size-change flicker frames
    ShowSmall,
    ShowBig,
    /// End of a shrink: stay small and resume the level
    SettleSmall,
    /// End of a grow: stay big, restore gravity and resume the level
    SettleBig,
    EndInvincibility,
    DeathHop,
    Vanish,
    BounceDown,
}

/// State every entity kind shares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: EntityId,
    pub tag: Tag,
    pub body: Rect,
    pub physics: Physics,
    pub visible: bool,
    pub dead: bool,
    pub look: Appearance,
    pub actions: ActionQueue<Action>,
}

impl Actor {
    pub fn new(tag: Tag, body: Rect) -> Self {
        Self {
            id: EntityId(0),
            tag,
            body,
            physics: Physics::default(),
            visible: true,
            dead: false,
            look: Appearance::default(),
            actions: ActionQueue::new(),
        }
    }

    /// Clamp a horizontal move to `[0, world_width - w]`.
    ///
    /// Returns true when the move was clamped; the caller then skips collision
    /// resolution on this axis for the frame.
    pub fn keep_in_bounds(&mut self, world_width: f32, projected_x: f32) -> bool {
        if projected_x < 0.0 {
            self.body.x = 0.0;
            self.physics.velocity.x = 0.0;
            return true;
        }
        let max_x = world_width - self.body.w;
        if projected_x > max_x {
            self.body.x = max_x;
            self.physics.velocity.x = 0.0;
            return true;
        }
        false
    }

    /// Reverse the patrol heading
    pub fn turn_around(&mut self) {
        self.physics.last_attempted_velocity.x = -self.physics.last_attempted_velocity.x;
    }
}

/// Per-kind state machine
pub trait Behavior {
    fn role(&self) -> Role;

    /// Per-frame behavior. Runs after the gravity pass.
    fn update(&mut self, actor: &mut Actor, cx: &mut FrameContext<'_>) -> Result<(), SimError>;

    /// `dir` is the side of this entity that was struck.
    fn handle_collision(
        &mut self,
        _actor: &mut Actor,
        _other: &Peer,
        _dir: Direction,
        _frame: &Frame,
        _out: &mut Outbox,
    ) {
    }

    /// Apply a delayed action that came due
    fn run_action(&mut self, _actor: &mut Actor, _action: Action, _frame: &Frame, _out: &mut Outbox) {}

    /// Key of the animation the renderer should show
    fn animation_key(&self, actor: &Actor) -> Option<&'static str>;
}

/// Advance the actor's queue and apply whatever came due
pub fn run_due_actions<B: Behavior + ?Sized>(
    behavior: &mut B,
    actor: &mut Actor,
    frame: &Frame,
    out: &mut Outbox,
) {
    for action in actor.actions.poll(frame.dt) {
        behavior.run_action(actor, action, frame, out);
    }
}

/// Snapshot of `actor` as other entities see it
pub fn peer_of<B: Behavior + ?Sized>(behavior: &B, actor: &Actor) -> Peer {
    Peer {
        id: actor.id,
        body: actor.body,
        role: behavior.role(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Kind {
    Player(Player),
    Goomba(Goomba),
    Turtle(Turtle),
    BrickBox(BrickBox),
    MysteryBox(MysteryBox),
    Mushroom(Mushroom),
    Coin(Coin),
    Brick(Brick),
    Vacant,
}

impl Kind {
    pub fn behavior(&self) -> Option<&dyn Behavior> {
        match self {
            Kind::Player(b) => Some(b),
            Kind::Goomba(b) => Some(b),
            Kind::Turtle(b) => Some(b),
            Kind::BrickBox(b) => Some(b),
            Kind::MysteryBox(b) => Some(b),
            Kind::Mushroom(b) => Some(b),
            Kind::Coin(b) => Some(b),
            Kind::Brick(b) => Some(b),
            Kind::Vacant => None,
        }
    }

    pub fn behavior_mut(&mut self) -> Option<&mut dyn Behavior> {
        match self {
            Kind::Player(b) => Some(b),
            Kind::Goomba(b) => Some(b),
            Kind::Turtle(b) => Some(b),
            Kind::BrickBox(b) => Some(b),
            Kind::MysteryBox(b) => Some(b),
            Kind::Mushroom(b) => Some(b),
            Kind::Coin(b) => Some(b),
            Kind::Brick(b) => Some(b),
            Kind::Vacant => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub actor: Actor,
    pub kind: Kind,
}

impl Entity {
    pub fn new(actor: Actor, kind: Kind) -> Self {
        Self { actor, kind }
    }

    /// Inert stand-in for a slot whose entity is being updated
    pub fn vacant(id: EntityId) -> Self {
        let mut actor = Actor::new(Tag::Vacant, Rect::default());
        actor.id = id;
        actor.visible = false;
        actor.physics.collides = false;
        actor.physics.gravity = false;
        Self {
            actor,
            kind: Kind::Vacant,
        }
    }

    pub fn id(&self) -> EntityId {
        self.actor.id
    }

    pub fn tag(&self) -> Tag {
        self.actor.tag
    }

    pub fn body(&self) -> Rect {
        self.actor.body
    }

    pub fn role(&self) -> Role {
        self.kind.behavior().map_or(Role::Vacant, |b| b.role())
    }

    pub fn peer(&self) -> Peer {
        Peer {
            id: self.actor.id,
            body: self.actor.body,
            role: self.role(),
        }
    }

    pub fn update(&mut self, cx: &mut FrameContext<'_>) -> Result<(), SimError> {
        match self.kind.behavior_mut() {
            Some(behavior) => behavior.update(&mut self.actor, cx),
            None => Ok(()),
        }
    }

    pub fn handle_collision(&mut self, other: &Peer, dir: Direction, frame: &Frame, out: &mut Outbox) {
        if let Some(behavior) = self.kind.behavior_mut() {
            behavior.handle_collision(&mut self.actor, other, dir, frame, out);
        }
    }

    /// Animation key, checked against the kind's animation table
    pub fn current_animation_key(&self) -> Result<&'static str, SimError> {
        let key = self
            .kind
            .behavior()
            .and_then(|behavior| behavior.animation_key(&self.actor));
        match key {
            Some(key) if self.actor.tag.animations().contains(&key) => Ok(key),
            _ => Err(SimError::AnimationKeyMissing {
                kind: self.actor.tag.name(),
                key,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::blocks::Reward;

    #[test]
    fn test_keep_in_bounds() {
        let mut actor = Actor::new(Tag::Goomba, Rect::new(10.0, 0.0, 16.0, 16.0));
        actor.physics.velocity.x = -50.0;

        assert!(actor.keep_in_bounds(320.0, -2.0));
        assert_eq!(actor.body.x, 0.0);
        assert_eq!(actor.physics.velocity.x, 0.0);

        assert!(actor.keep_in_bounds(320.0, 310.0));
        assert_eq!(actor.body.x, 304.0);

        actor.body.x = 100.0;
        assert!(!actor.keep_in_bounds(320.0, 101.0));
        // Unclamped moves are left for the caller to commit
        assert_eq!(actor.body.x, 100.0);
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn test_every_kind_reports_a_known_animation() {
        let at = Vec2::new(32.0, 32.0);
        let entities = [
            Entity::player(at),
            Entity::goomba(at),
            Entity::turtle(at),
            Entity::brick_box(at),
            Entity::mystery_box(at, Reward::Mushroom),
            Entity::mushroom(at),
            Entity::coin(at),
            Entity::brick(at, 25.0, 50.0),
        ];
        for entity in &entities {
            let key = entity.current_animation_key().unwrap();
            assert!(entity.tag().animations().contains(&key), "{key}");
        }
    }

    #[test]
    fn test_vacant_has_no_animation() {
        let entity = Entity::vacant(EntityId(4));
        assert_eq!(
            entity.current_animation_key(),
            Err(SimError::AnimationKeyMissing {
                kind: "vacant",
                key: None
            })
        );
        assert_eq!(entity.role(), Role::Vacant);
        assert!(!entity.actor.physics.collides);
    }

    #[test]
    fn test_peer_reflects_kind_state() {
        let mut entity = Entity::player(Vec2::new(0.0, 0.0));
        entity.actor.id = EntityId(2);
        let peer = entity.peer();
        assert_eq!(peer.id, EntityId(2));
        assert_eq!(peer.role, Role::Player { small: true });
        assert_eq!(peer.body, entity.body());
    }
}
