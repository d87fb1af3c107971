//! Per-frame context
//!
//! Entities see the world through `FrameContext`: a read-mostly snapshot
//! (dt, world size, pause flag, camera view, grid, tiles, input) plus mutable
//! access to the *other* entities for collision callbacks, and an `Outbox`
//! that queues side effects. The orchestrator applies the queued effects
//! after the update pass and hands them to the host.

use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Direction, Entity, EntityId, Peer};
use super::geometry::{Rect, overlaps};
use super::grid::{ObjectRef, SpatialGrid};
use super::input::{Input, InputState};
use super::state::Tile;
use crate::SimError;

/// Host camera. Only its rectangle matters to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    /// Viewport size in screen pixels
    pub w: f32,
    pub h: f32,
    /// Screen pixels per world unit
    pub scale: f32,
}

impl Camera {
    pub fn new(w: f32, h: f32, scale: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w,
            h,
            scale,
        }
    }

    /// Visible part of the world
    pub fn view(&self) -> Rect {
        Rect::new(self.x, self.y, self.w / self.scale, self.h / self.scale)
    }

    /// Center horizontally on `target` without showing past the world edges,
    /// and center the world vertically.
    pub fn follow(&mut self, target: &Rect, world: Vec2) {
        let view_w = self.w / self.scale;
        let view_h = self.h / self.scale;
        let max_x = world.x - view_w;
        self.x = (target.x - (view_w / 2.0).trunc()).min(max_x).max(0.0);
        self.y = -(view_h / 2.0).trunc() + (world.y / 2.0).trunc();
    }
}

/// Immutable per-frame facts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub dt: f32,
    pub world: Vec2,
    /// Pause flag as it stood when the frame began
    pub paused: bool,
    /// Camera view in world units
    pub view: Rect,
    /// Debug overlay on
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    Jump,
    BreakBlock,
    Bump,
    Coin,
    PlayerDeath,
    Powerdown,
    PowerupSpawn,
    Powerup,
    Stomp,
}

impl Sound {
    /// Asset key the audio collaborator loads the clip under
    pub fn key(self) -> &'static str {
        match self {
            Sound::Jump => "jump",
            Sound::BreakBlock => "break_block",
            Sound::Bump => "bump",
            Sound::Coin => "coin",
            Sound::PlayerDeath => "player_death",
            Sound::Powerdown => "powerdown",
            Sound::PowerupSpawn => "powerup_spawn",
            Sound::Powerup => "powerup",
            Sound::Stomp => "stomp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Music {
    Theme,
}

impl Music {
    pub fn key(self) -> &'static str {
        match self {
            Music::Theme => "theme",
        }
    }
}

/// Entity kinds that can be created mid-level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnKind {
    Goomba,
    Turtle,
    Mushroom,
    Coin,
    Brick { rotation_step: f32, speed: f32 },
}

impl FromStr for SpawnKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goomba" => Ok(SpawnKind::Goomba),
            "turtle" => Ok(SpawnKind::Turtle),
            "mushroom" => Ok(SpawnKind::Mushroom),
            "coin" => Ok(SpawnKind::Coin),
            "brick" => Ok(SpawnKind::Brick {
                rotation_step: 10.0,
                speed: 100.0,
            }),
            other => Err(SimError::InvalidSpawnKind(other.to_string())),
        }
    }
}

/// Side effect requested during a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    Spawn { kind: SpawnKind, at: Vec2 },
    PlaySound(Sound),
    PlayMusic(Music),
    StopMusic(Music),
    PauseLevel,
    UnpauseLevel,
    /// Visualization only
    DebugRect { rect: Rect, color: u32 },
}

/// Outbound side-effect queue plus the frame's randomness
#[derive(Debug, Clone)]
pub struct Outbox {
    effects: Vec<Effect>,
    rng: Pcg32,
    ambush_chance: f32,
}

impl Outbox {
    pub fn new(rng: Pcg32, ambush_chance: f32) -> Self {
        Self {
            effects: Vec::new(),
            rng,
            ambush_chance,
        }
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn play(&mut self, sound: Sound) {
        self.push(Effect::PlaySound(sound));
    }

    pub fn play_music(&mut self, music: Music) {
        self.push(Effect::PlayMusic(music));
    }

    pub fn stop_music(&mut self, music: Music) {
        self.push(Effect::StopMusic(music));
    }

    /// Queue a spawn. Rewards announce themselves with a sound.
    pub fn spawn(&mut self, kind: SpawnKind, at: Vec2) {
        match kind {
            SpawnKind::Mushroom => self.play(Sound::PowerupSpawn),
            SpawnKind::Coin => self.play(Sound::Coin),
            _ => {}
        }
        self.push(Effect::Spawn { kind, at });
    }

    pub fn pause(&mut self) {
        self.push(Effect::PauseLevel);
    }

    pub fn unpause(&mut self) {
        self.push(Effect::UnpauseLevel);
    }

    pub fn debug_rect(&mut self, rect: Rect, color: u32) {
        self.push(Effect::DebugRect { rect, color });
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Whether an emptied mystery box releases an ambush
    pub fn roll_ambush(&mut self) -> bool {
        self.rng.random::<f32>() < self.ambush_chance
    }

    pub fn coin_flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    /// Queued effects and the advanced RNG
    pub fn finish(self) -> (Vec<Effect>, Pcg32) {
        (self.effects, self.rng)
    }
}

/// What an entity sees while it runs
pub struct FrameContext<'a> {
    pub frame: Frame,
    pub input: &'a InputState,
    pub grid: &'a SpatialGrid,
    pub tiles: &'a [Tile],
    /// Every entity; the one currently running is a vacant placeholder
    pub entities: &'a mut [Entity],
    pub out: &'a mut Outbox,
}

impl FrameContext<'_> {
    pub fn dt(&self) -> f32 {
        self.frame.dt
    }

    pub fn pressed(&self, input: Input) -> bool {
        self.input.pressed(input)
    }

    pub fn just_pressed(&self, input: Input) -> bool {
        self.input.just_pressed(input)
    }

    pub fn on_screen(&self, body: &Rect) -> bool {
        overlaps(body, &self.frame.view)
    }

    pub fn body_of(&self, object: ObjectRef) -> Option<Rect> {
        match object {
            ObjectRef::Tile(index) => self.tiles.get(index).map(|tile| tile.body),
            ObjectRef::Entity(id) => self.entities.get(id.0).map(|entity| entity.actor.body),
        }
    }

    pub fn peer(&self, id: EntityId) -> Option<Peer> {
        self.entities.get(id.0).map(Entity::peer)
    }

    /// Tell `target` that `from` struck its `dir` side
    pub fn strike(&mut self, target: EntityId, from: &Peer, dir: Direction) {
        if let Some(entity) = self.entities.get_mut(target.0) {
            entity.handle_collision(from, dir, &self.frame, self.out);
        }
    }
}

/// The shared, read-only half of a frame context
#[derive(Clone, Copy)]
pub struct Stage<'a> {
    pub frame: Frame,
    pub input: &'a InputState,
    pub grid: &'a SpatialGrid,
    pub tiles: &'a [Tile],
}

/// Run `f` on entity `index` with the rest of the level reachable through the
/// context. The slot holds a vacant placeholder while `f` runs.
pub fn with_entity<F>(
    stage: Stage<'_>,
    entities: &mut [Entity],
    out: &mut Outbox,
    index: usize,
    f: F,
) -> Result<(), SimError>
where
    F: FnOnce(&mut Entity, &mut FrameContext<'_>) -> Result<(), SimError>,
{
    let Some(slot) = entities.get_mut(index) else {
        return Ok(());
    };
    let id = slot.id();
    let mut entity = std::mem::replace(slot, Entity::vacant(id));
    let result = {
        let mut cx = FrameContext {
            frame: stage.frame,
            input: stage.input,
            grid: stage.grid,
            tiles: stage.tiles,
            entities: &mut *entities,
            out: &mut *out,
        };
        f(&mut entity, &mut cx)
    };
    entities[index] = entity;
    result
}
