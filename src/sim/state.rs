//! Level state
//!
//! Everything the kernel carries from one frame to the next: static tiles,
//! the entity list in load order, and the level-wide flags.

use std::str::FromStr;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::context::{Camera, Effect, SpawnKind};
use super::entity::{Entity, EntityId, Tag};
use super::geometry::Rect;
use super::grid::{ObjectRef, SpatialGrid};
use super::present::{SpriteFrame, sprite_frame};
use crate::{Settings, SimError};

/// Static level geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub body: Rect,
}

#[derive(Debug, Clone)]
pub struct Level {
    pub settings: Settings,
    /// World size in world units
    pub world: Vec2,
    pub tiles: Vec<Tile>,
    /// Load order is update order
    pub entities: Vec<Entity>,
    pub paused: bool,
    /// First directional input seen
    pub started: bool,
    /// Debug overlay on
    pub debug: bool,
    /// Frames simulated since the level started
    pub time_ticks: u64,
    pub rng: Pcg32,
}

impl Level {
    pub fn new(settings: Settings, world: Vec2) -> Result<Self, SimError> {
        settings.validate()?;
        let rng = Pcg32::seed_from_u64(settings.seed);
        Ok(Self {
            started: !settings.wait_for_input,
            debug: settings.debug_overlay,
            settings,
            world,
            tiles: Vec::new(),
            entities: Vec::new(),
            paused: false,
            time_ticks: 0,
            rng,
        })
    }

    pub fn add_tile(&mut self, body: Rect) -> usize {
        self.tiles.push(Tile { body });
        self.tiles.len() - 1
    }

    /// Append an entity and give it its id
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len());
        entity.actor.id = id;
        log::debug!("added {} {:?} at ({}, {})", entity.tag().name(), id, entity.body().x, entity.body().y);
        self.entities.push(entity);
        id
    }

    pub fn spawn(&mut self, kind: SpawnKind, at: Vec2) -> EntityId {
        let entity = match kind {
            SpawnKind::Goomba => Entity::goomba(at),
            SpawnKind::Turtle => Entity::turtle(at),
            SpawnKind::Mushroom => Entity::mushroom(at),
            SpawnKind::Coin => Entity::coin(at),
            SpawnKind::Brick {
                rotation_step,
                speed,
            } => Entity::brick(at, rotation_step, speed),
        };
        self.add_entity(entity)
    }

    /// Spawn by loader name (`"goomba"`, `"coin"`, ...)
    pub fn spawn_named(&mut self, name: &str, at: Vec2) -> Result<EntityId, SimError> {
        let kind = SpawnKind::from_str(name)?;
        Ok(self.spawn(kind, at))
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag() == Tag::Player)
    }

    /// Fresh broad-phase for this frame: tiles, then colliding entities
    pub fn build_grid(&self) -> Result<SpatialGrid, SimError> {
        let mut grid = SpatialGrid::new(self.world, self.settings.tile_width, self.settings.chunk_length);
        for (index, tile) in self.tiles.iter().enumerate() {
            grid.insert(ObjectRef::Tile(index), &tile.body)?;
        }
        for entity in &self.entities {
            if entity.actor.physics.collides {
                grid.insert(ObjectRef::Entity(entity.id()), &entity.actor.body)?;
            }
        }
        Ok(grid)
    }

    /// Apply the level-side effects of a frame. Sounds, music and debug rects
    /// are for the host.
    pub fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::Spawn { kind, at } => {
                    self.spawn(*kind, *at);
                }
                Effect::PauseLevel => {
                    if !self.paused {
                        log::info!("level paused");
                    }
                    self.paused = true;
                }
                Effect::UnpauseLevel => {
                    if self.paused {
                        log::info!("level resumed");
                    }
                    self.paused = false;
                }
                Effect::PlaySound(_)
                | Effect::PlayMusic(_)
                | Effect::StopMusic(_)
                | Effect::DebugRect { .. } => {}
            }
        }
    }

    /// What the renderer should draw for every entity this frame
    pub fn sprite_frames(&self, camera: &Camera) -> Result<Vec<SpriteFrame>, SimError> {
        self.entities
            .iter()
            .map(|entity| sprite_frame(entity, camera))
            .collect()
    }

    /// Run `f` on one entity inside a real frame context, then apply the
    /// effects it queued.
    #[cfg(test)]
    pub fn probe<F>(&mut self, id: EntityId, f: F) -> Result<Vec<Effect>, SimError>
    where
        F: FnOnce(&mut Entity, &mut super::context::FrameContext<'_>) -> Result<(), SimError>,
    {
        use super::context::{Frame, Outbox, Stage, with_entity};
        use super::input::InputState;

        let grid = self.build_grid()?;
        let input = InputState::default();
        let frame = Frame {
            dt: self.settings.fixed_step,
            world: self.world,
            paused: self.paused,
            view: Rect::new(0.0, 0.0, self.world.x, self.world.y),
            debug: self.debug,
        };
        let mut out = Outbox::new(self.rng.clone(), self.settings.ambush_chance);
        let stage = Stage {
            frame,
            input: &input,
            grid: &grid,
            tiles: &self.tiles,
        };
        with_entity(stage, &mut self.entities, &mut out, id.0, f)?;

        let (effects, rng) = out.finish();
        self.rng = rng;
        self.apply(&effects);
        Ok(effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> Level {
        Level::new(Settings::default(), Vec2::new(320.0, 240.0)).unwrap()
    }

    #[test]
    fn test_new_level_flags_follow_settings() {
        let level = level();
        assert!(!level.started);
        assert!(!level.debug);
        assert!(!level.paused);

        let settings = Settings {
            wait_for_input: false,
            debug_overlay: true,
            ..Settings::default()
        };
        let level = Level::new(settings, Vec2::new(320.0, 240.0)).unwrap();
        assert!(level.started);
        assert!(level.debug);

        let bad = Settings {
            chunk_length: 0,
            ..Settings::default()
        };
        assert!(Level::new(bad, Vec2::new(320.0, 240.0)).is_err());
    }

    #[test]
    fn test_ids_follow_load_order() {
        let mut level = level();
        let a = level.add_entity(Entity::player(Vec2::new(10.0, 10.0)));
        let b = level.spawn(SpawnKind::Goomba, Vec2::new(50.0, 10.0));
        assert_eq!((a, b), (EntityId(0), EntityId(1)));
        assert_eq!(level.entity(b).unwrap().tag(), Tag::Goomba);
        assert_eq!(level.player().unwrap().id(), a);
    }

    #[test]
    fn test_spawn_named() {
        let mut level = level();
        let id = level.spawn_named("turtle", Vec2::new(10.0, 10.0)).unwrap();
        assert_eq!(level.entity(id).unwrap().tag(), Tag::Turtle);
        assert_eq!(
            level.spawn_named("plumber", Vec2::ZERO),
            Err(SimError::InvalidSpawnKind("plumber".into()))
        );
        assert_eq!(level.entities.len(), 1);
    }

    #[test]
    fn test_grid_skips_non_colliding_entities() {
        let mut level = level();
        level.add_tile(Rect::new(0.0, 208.0, 16.0, 16.0));
        let goomba = level.add_entity(Entity::goomba(Vec2::new(20.0, 192.0)));
        let coin = level.add_entity(Entity::coin(Vec2::new(20.0, 100.0)));

        let grid = level.build_grid().unwrap();
        let objects = &grid.chunks()[0].objects;
        assert_eq!(objects, &vec![ObjectRef::Tile(0), ObjectRef::Entity(goomba)]);
        assert!(!objects.contains(&ObjectRef::Entity(coin)));
    }

    #[test]
    fn test_entity_outside_world_is_fatal() {
        let mut level = level();
        level.add_entity(Entity::goomba(Vec2::new(500.0, 0.0)));
        assert!(matches!(level.build_grid(), Err(SimError::OutOfWorldBounds { .. })));
    }

    #[test]
    fn test_apply_effects() {
        let mut level = level();
        level.apply(&[
            Effect::PauseLevel,
            Effect::Spawn {
                kind: SpawnKind::Coin,
                at: Vec2::new(4.0, 8.0),
            },
        ]);
        assert!(level.paused);
        assert_eq!(level.entities.len(), 1);
        assert_eq!(level.entities[0].body().position(), Vec2::new(4.0, 8.0));

        level.apply(&[Effect::UnpauseLevel]);
        assert!(!level.paused);
    }
}
