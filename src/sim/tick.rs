//! Fixed timestep simulation tick
//!
//! One call advances the level by one frame: rebuild the broad-phase, run
//! gravity for every entity, then run every entity's update, both in load
//! order. Side effects are applied once the update pass is done.

use super::context::{Camera, Effect, Frame, Music, Outbox, Stage, with_entity};
use super::gravity::apply_gravity;
use super::input::{Input, InputState};
use super::state::Level;
use crate::SimError;

/// Debug overlay chunk colors
pub const CHUNK_PALETTE: [u32; 17] = [
    0x001f3f, 0x0074d9, 0x7fdbff, 0x39cccc, 0x3d9970, 0x2ecc40, 0x01ff70, 0xffdc00, 0xff851b,
    0xff4136, 0x85144b, 0xf012be, 0xb10dc9, 0x111111, 0xaaaaaa, 0xdddddd, 0xffffff,
];

/// Advance the level by one frame of `dt` seconds.
///
/// Returns every effect requested during the frame. Spawns and pause changes
/// are already applied to `level`; the rest is for the host's audio and
/// render collaborators. The host calls `input.end_frame()` afterwards.
pub fn tick(
    level: &mut Level,
    input: &InputState,
    camera: &Camera,
    dt: f32,
) -> Result<Vec<Effect>, SimError> {
    if input.just_pressed(Input::Debug) {
        level.debug = !level.debug;
        log::info!("debug overlay {}", if level.debug { "on" } else { "off" });
    }

    let grid = level.build_grid()?;
    let mut out = Outbox::new(level.rng.clone(), level.settings.ambush_chance);

    // Hold everything until the player first moves
    if !level.started {
        if !input.any_direction() {
            return Ok(Vec::new());
        }
        log::info!("first input received, level started");
        level.started = true;
        out.play_music(Music::Theme);
    }

    level.time_ticks += 1;
    let frame = Frame {
        dt,
        world: level.world,
        paused: level.paused,
        view: camera.view(),
        debug: level.debug,
    };
    log::trace!("tick {} (paused: {})", level.time_ticks, frame.paused);

    if frame.debug {
        for (i, chunk) in grid.chunks().iter().enumerate() {
            out.debug_rect(chunk.bounds, CHUNK_PALETTE[(i + 1) % CHUNK_PALETTE.len()]);
        }
    }

    let stage = Stage {
        frame,
        input,
        grid: &grid,
        tiles: &level.tiles,
    };
    let count = level.entities.len();
    for index in 0..count {
        with_entity(stage, &mut level.entities, &mut out, index, apply_gravity)?;
    }
    for index in 0..count {
        with_entity(stage, &mut level.entities, &mut out, index, |entity, cx| {
            entity.update(cx)
        })?;
    }

    let (effects, rng) = out.finish();
    level.rng = rng;
    level.apply(&effects);
    Ok(effects)
}
