//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entity load order)
//! - No rendering, audio or platform dependencies; those are `Effect`s

pub mod blocks;
pub mod context;
pub mod entity;
pub mod geometry;
pub mod goomba;
pub mod gravity;
pub mod grid;
pub mod input;
pub mod motion;
pub mod pickups;
pub mod player;
pub mod present;
pub mod schedule;
pub mod state;
pub mod tick;
pub mod turtle;
pub mod wander;

pub use blocks::Reward;
pub use context::{Camera, Effect, Music, Sound, SpawnKind};
pub use entity::{Direction, Entity, EntityId, Kind, Tag};
pub use geometry::{Rect, overlaps};
pub use grid::{Edge, ObjectRef, SpatialGrid};
pub use input::{Input, InputState};
pub use present::SpriteFrame;
pub use schedule::ActionQueue;
pub use state::{Level, Tile};
pub use tick::tick;
