//! Scroll Sim - simulation kernel of a side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Fixed-timestep world model (gravity, broad-phase collisions, entity state machines)
//! - `settings`: Data-driven level tunables
//! - `error`: Fatal simulation faults
//!
//! Rendering, audio playback, asset decoding, map parsing and keyboard capture
//! live outside this crate. They talk to the kernel through `sim::Effect`,
//! `sim::InputState`, `sim::Camera` and `sim::SpriteFrame`.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Downward acceleration in world units/s² (positive y points down)
    pub const GRAVITY: f32 = 1204.8;

    /// Player horizontal speed while a direction is held
    pub const PLAYER_RUN_SPEED: f32 = 200.0;
    /// Vertical speed applied on each jump frame
    pub const PLAYER_JUMP_SPEED: f32 = -320.0;
    /// Number of frames a single jump press pushes the player upward
    pub const PLAYER_JUMP_FRAMES: u8 = 3;
    /// Rebound after stomping an enemy
    pub const PLAYER_STOMP_REBOUND: f32 = -200.0;
    /// Upward kick applied once the death pause has elapsed
    pub const PLAYER_DEATH_HOP: f32 = -400.0;
    /// Death hop delay, in frames of the current dt
    pub const PLAYER_DEATH_HOP_FRAMES: f32 = 25.0;
    /// Size-change flicker step, in frames of the current dt
    pub const SIZE_CHANGE_CONST: f32 = 4.0;
    /// Toggles in a size-change flicker
    pub const FLICKER_STEPS: u32 = 10;
    pub const PLAYER_SMALL_HEIGHT: f32 = 16.0;
    pub const PLAYER_BIG_HEIGHT: f32 = 32.0;

    pub const GOOMBA_SPEED: f32 = 50.0;
    /// Horizontal speed after a bounce death
    pub const GOOMBA_BOUNCE_SPEED: f32 = 100.0;
    /// Spin rate of a bounce-killed goomba (radians/s)
    pub const GOOMBA_SPIN: f32 = 5.0;
    /// Seconds a stomped goomba stays visible
    pub const GOOMBA_VANISH_DELAY: f32 = 0.5;

    pub const TURTLE_SPEED: f32 = 50.0;
    pub const SHELL_SPEED: f32 = 200.0;

    /// Upward launch shared by bounce deaths, coins and brick shards
    pub const LAUNCH_SPEED: f32 = -250.0;

    /// Block bounce: rise speed, fall speed, rise duration
    pub const BOUNCE_RISE_SPEED: f32 = 75.0;
    pub const BOUNCE_FALL_SPEED: f32 = 80.0;
    pub const BOUNCE_RISE_TIME: f32 = 0.125;

    /// Brick shards thrown by a shattered brick box
    pub const SHARD_SPEED: f32 = 50.0;
    pub const SHARD_SPIN: f32 = 25.0;
    /// Coin reward spawns this far above the box
    pub const COIN_OFFSET: f32 = 32.0;
    /// Coins vanish once falling faster than this
    pub const COIN_FADE_SPEED: f32 = 300.0;
    /// Goombas released by a mystery box ambush
    pub const AMBUSH_SIZE: usize = 10;

    pub const MUSHROOM_SPEED: f32 = 100.0;
    /// Emerging mushroom rise speed
    pub const MUSHROOM_RISE_SPEED: f32 = 15.0;
}
