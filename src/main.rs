//! Leap of Faith - headless native runner
//!
//! Drives the game with a simple autopilot so a run can be simulated and
//! scored without a window. Settings are read from `settings.json` in the
//! working directory (or the path given as the first argument).

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use leap_of_faith::Game;
use leap_of_faith::audio::LogSink;
use leap_of_faith::input::{InputEvent, Key};
use leap_of_faith::persistence::JsonFileStore;
use leap_of_faith::renderer::NullRenderer;
use leap_of_faith::settings::Settings;
use leap_of_faith::sim::{GameMode, TerrainKind, WorldState};

const FRAME_MS: f64 = 1000.0 / 60.0;
const MAX_FRAMES: u64 = 60 * 60 * 10;
/// Look this far past the leader's front edge for danger
const LOOKAHEAD: f32 = 120.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let settings = Settings::load(&settings_path);

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    log::info!("Leap of Faith (headless) starting, seed {}", seed);

    let store = JsonFileStore::new(settings.scores_path.clone());
    let mut game = Game::new(&settings, seed, store, LogSink, NullRenderer::default());

    tap(&mut game, Key::Space);
    let mut frame = 0u64;
    while frame < MAX_FRAMES {
        let now = frame as f64 * FRAME_MS;
        if let Some(key) = autopilot(game.world()) {
            tap(&mut game, key);
        }
        if game.world().mode == GameMode::Between {
            game.click_button(leap_of_faith::ui::NEXT_LEVEL_BUTTON);
        }
        game.frame(now);
        if game.world().mode == GameMode::Dead {
            break;
        }
        frame += 1;
    }

    let world = game.world();
    log::info!(
        "Run finished after {} frames: level {}, score {}, rank {:?}",
        frame,
        world.level,
        world.score,
        game.last_rank()
    );
    println!("level {} score {}", world.level, world.score);
}

#[cfg(target_arch = "wasm32")]
fn main() {}

fn tap(game: &mut Game<JsonFileStore, LogSink, NullRenderer>, key: Key) {
    game.handle_event(InputEvent::KeyDown(key));
    game.handle_event(InputEvent::KeyUp(key));
}

/// Pick one key for this frame
fn autopilot(world: &WorldState) -> Option<Key> {
    if world.mode != GameMode::Running {
        return None;
    }
    let leader = world.leader()?;
    let front = leader.body.position.x + leader.body.bounds.x;

    let danger_ahead = world.terrains.iter().any(|t| {
        t.kind != TerrainKind::Base && t.position.x < front + LOOKAHEAD && t.position.x + t.bounds.x > front
    });
    if danger_ahead && leader.body.on_ground {
        return Some(Key::Space);
    }

    // Fire or shield whenever the leader's primary is ready and something is on screen
    if !world.enemies.is_empty() && leader.abilities.q.is_ready() {
        return Some(Key::Q);
    }
    None
}
