//! Scroll Sim demo driver
//!
//! Builds a small level, feeds it a scripted key sequence at the fixed
//! timestep and logs what the kernel asks the host to do.
//!
//! Usage: `scroll-sim [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use scroll_sim::sim::{Camera, Effect, Entity, Input, InputState, Level, Rect, Reward, tick};
#[cfg(not(target_arch = "wasm32"))]
use scroll_sim::{Settings, SimError};

#[cfg(not(target_arch = "wasm32"))]
const DEMO_FRAMES: u32 = 600;

/// (first frame, last frame, key) held over an inclusive frame range
#[cfg(not(target_arch = "wasm32"))]
const SCRIPT: &[(u32, u32, &str)] = &[
    (0, 240, "d"),
    (60, 62, "w"),
    (150, 152, "ArrowUp"),
    (200, 200, "p"),
    (300, 420, "a"),
    (320, 322, "w"),
];

#[cfg(not(target_arch = "wasm32"))]
fn load_settings() -> Result<Settings, SimError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading settings from {path}");
            let json = std::fs::read_to_string(&path)
                .map_err(|e| SimError::Settings(format!("{path}: {e}")))?;
            Settings::from_json(&json)
        }
        None => Ok(Settings::default()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_level(settings: Settings) -> Result<Level, SimError> {
    let tile = settings.tile_width;
    let world = glam::Vec2::new(tile * 64.0, tile * 15.0);
    let mut level = Level::new(settings, world)?;

    let floor_y = world.y - tile * 2.0;
    for i in 0..64 {
        // Leave a pit near the far end
        if (48..51).contains(&i) {
            continue;
        }
        level.add_tile(Rect::new(i as f32 * tile, floor_y, tile, tile));
    }

    let ground = floor_y - tile;
    level.add_entity(Entity::player(glam::Vec2::new(tile * 3.0, ground)));
    level.spawn_named("goomba", glam::Vec2::new(tile * 22.0, ground))?;
    level.spawn_named("turtle", glam::Vec2::new(tile * 30.0, floor_y - tile * 1.5))?;
    level.add_entity(Entity::brick_box(glam::Vec2::new(tile * 8.0, ground - tile * 4.0)));
    let reward: Reward = "mushroom".parse()?;
    level.add_entity(Entity::mystery_box(glam::Vec2::new(tile * 12.0, ground - tile * 4.0), reward));
    level.add_entity(Entity::mystery_box(glam::Vec2::new(tile * 13.0, ground - tile * 4.0), Reward::Coin));
    Ok(level)
}

#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(input: &mut InputState, frame: u32) {
    for &(start, end, key) in SCRIPT {
        let Some(key) = Input::from_key(key) else {
            continue;
        };
        if frame == start {
            input.press(key);
        } else if frame == end + 1 {
            input.release(key);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), SimError> {
    let settings = load_settings()?;
    let dt = settings.fixed_step;
    let mut level = build_level(settings)?;
    let mut camera = Camera::new(256.0, 240.0, 1.0);
    let mut input = InputState::default();
    let mut lost = false;

    for frame in 0..DEMO_FRAMES {
        scripted_input(&mut input, frame);
        let effects = tick(&mut level, &input, &camera, dt)?;
        input.end_frame();

        for effect in &effects {
            match effect {
                Effect::PlaySound(sound) => log::info!("frame {frame}: sound {}", sound.key()),
                Effect::PlayMusic(music) => log::info!("frame {frame}: music {}", music.key()),
                Effect::StopMusic(music) => log::info!("frame {frame}: stop {}", music.key()),
                Effect::DebugRect { .. } => {}
                other => log::debug!("frame {frame}: {other:?}"),
            }
        }

        if let Some(player) = level.player() {
            camera.follow(&player.body(), level.world);
            if player.actor.dead && !lost {
                lost = true;
                log::info!("frame {frame}: player lost");
            }
        }
        // Validates every animation key the renderer would ask for
        level.sprite_frames(&camera)?;
    }

    let snapshot = serde_json::to_string_pretty(&level.entities)
        .map_err(|e| SimError::Settings(e.to_string()))?;
    println!("{snapshot}");
    log::info!(
        "simulated {} frames, {} entities",
        level.time_ticks,
        level.entities.len()
    );
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Scroll Sim (native) starting...");

    if let Err(e) = run() {
        log::error!("simulation failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The kernel is driven by the host page on wasm
}
