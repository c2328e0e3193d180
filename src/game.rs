//! Host-side frame driver
//!
//! Owns the world and every collaborator around it. Each host frame runs one
//! simulation tick with a clamped delta, routes the events the tick produced
//! (sounds, HUD toggles, score submission), then hands a fresh draw list to
//! the renderer.

use crate::audio::{AudioManager, AudioSink};
use crate::clock::Clock;
use crate::highscores::ScoreBoard;
use crate::input::{InputEvent, InputState};
use crate::persistence::ScoreStore;
use crate::renderer::{self, Renderer};
use crate::settings::Settings;
use crate::sim::{Command, GameEvent, GameMode, WorldState, apply_command, tick};
use crate::ui::UiState;

pub struct Game<S: ScoreStore, A: AudioSink, R: Renderer> {
    world: WorldState,
    clock: Clock,
    input: InputState,
    audio: AudioManager<A>,
    ui: UiState,
    store: S,
    board: ScoreBoard,
    renderer: R,
    show_fps: bool,
    /// Host timestamp of the latest frame, used to stamp score entries
    now_ms: f64,
    /// Rank achieved by the last finished run, if it made the board
    last_rank: Option<usize>,
}

impl<S: ScoreStore, A: AudioSink, R: Renderer> Game<S, A, R> {
    pub fn new(settings: &Settings, seed: u64, store: S, sink: A, renderer: R) -> Self {
        let mut audio = AudioManager::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        log::info!(
            "Game created: seed={}, canvas={}x{}, quality={}",
            seed,
            settings.canvas_width,
            settings.canvas_height,
            settings.quality.as_str()
        );

        Self {
            world: WorldState::new(seed, settings.canvas(), settings.max_particles()),
            clock: Clock::new(),
            input: InputState::new(),
            audio,
            ui: UiState::new(),
            store,
            board: ScoreBoard::Hidden,
            renderer,
            show_fps: settings.show_fps,
            now_ms: 0.0,
            last_rank: None,
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    pub fn board(&self) -> &ScoreBoard {
        &self.board
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Feed one raw input event
    pub fn handle_event(&mut self, event: InputEvent) {
        if let Some(command) = self.input.handle(event) {
            self.command(command);
        }
    }

    /// A HUD button was clicked
    pub fn click_button(&mut self, button: &str) {
        if let Some(command) = self.ui.click(button) {
            self.command(command);
        }
    }

    /// Apply a command between ticks
    pub fn command(&mut self, command: Command) {
        let was_paused = self.world.paused;
        apply_command(&mut self.world, command);
        if was_paused && !self.world.paused {
            // Don't count the paused stretch as one long frame
            self.clock.reset();
        }
        self.dispatch_events();
    }

    /// Run one host frame at timestamp `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        let dt = self.clock.delta(now_ms);

        if !(self.world.paused && self.world.in_control()) {
            tick(&mut self.world, dt);
        }
        self.dispatch_events();

        let fps = self.show_fps.then(|| self.clock.smoothed_fps());
        let list = renderer::build(&self.world, &self.board, fps);
        self.renderer.render(&list);
    }

    fn dispatch_events(&mut self) {
        for event in self.world.drain_events() {
            match event {
                GameEvent::Sound { effect, volume } => self.audio.play(effect, volume),
                GameEvent::Ui(command) => self.ui.apply(command),
                GameEvent::ModeChanged { to: GameMode::Highscore, .. } => self.load_board(),
                GameEvent::RunEnded { score, level } => self.submit_score(score, level),
                other => log::debug!("{:?}", other),
            }
        }
    }

    fn load_board(&mut self) {
        self.board = match self.store.load() {
            Ok(scores) => ScoreBoard::Loaded(scores),
            Err(e) => {
                log::warn!("High scores unavailable: {}", e);
                ScoreBoard::Unsupported(e.to_string())
            }
        };
    }

    fn submit_score(&mut self, score: u64, level: u32) {
        match self.store.submit(score, level, self.now_ms) {
            Ok(rank) => {
                match rank {
                    Some(rank) => log::info!("Run scored {} (rank {})", score, rank),
                    None => log::info!("Run scored {} (not ranked)", score),
                }
                self.last_rank = rank;
            }
            Err(e) => {
                log::warn!("Failed to record score {}: {}", score, e);
                self.last_rank = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{LogSink, SoundEffect};
    use crate::input::Key;
    use crate::persistence::{MemoryStore, UnsupportedStore};
    use crate::renderer::NullRenderer;
    use crate::ui::{NEXT_LEVEL_BUTTON, SHOP_PANEL};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn game() -> Game<MemoryStore, LogSink, NullRenderer> {
        Game::new(&Settings::default(), 9, MemoryStore::new(), LogSink, NullRenderer::default())
    }

    fn press(game: &mut Game<impl ScoreStore, impl AudioSink, impl Renderer>, key: Key) {
        game.handle_event(InputEvent::KeyDown(key));
        game.handle_event(InputEvent::KeyUp(key));
    }

    fn run_frames(game: &mut Game<impl ScoreStore, impl AudioSink, impl Renderer>, start: usize, n: usize) {
        for i in start..start + n {
            game.frame(i as f64 * FRAME_MS);
        }
    }

    #[test]
    fn test_start_and_render() {
        let mut g = game();
        run_frames(&mut g, 0, 2);
        assert_eq!(g.world().mode, GameMode::Start);
        assert_eq!(g.renderer().frames, 2);

        press(&mut g, Key::Space);
        assert_eq!(g.world().mode, GameMode::Running);
        run_frames(&mut g, 2, 10);
        assert_eq!(g.world().time_ticks, 10);
    }

    #[test]
    fn test_run_end_submits_once() {
        let mut g = game();
        press(&mut g, Key::Space);
        run_frames(&mut g, 0, 5);

        g.world_mut().score = 42;
        for p in g.world_mut().players.iter_mut() {
            p.body.health = 0.0;
        }
        run_frames(&mut g, 5, 20);
        assert_eq!(g.world().mode, GameMode::Dead);
        assert_eq!(g.last_rank(), Some(1));
        let stored = g.store().load().unwrap();
        assert_eq!(stored.entries.len(), 1);
        assert_eq!(stored.entries[0].score, 42);
        assert_eq!(stored.entries[0].level, 1);

        press(&mut g, Key::H);
        assert_eq!(g.world().mode, GameMode::Highscore);
        assert!(matches!(g.board(), ScoreBoard::Loaded(s) if s.top_score() == Some(42)));
    }

    #[test]
    fn test_unsupported_storage() {
        let mut g = Game::new(&Settings::default(), 1, UnsupportedStore, LogSink, NullRenderer::default());
        press(&mut g, Key::H);
        assert!(matches!(g.board(), ScoreBoard::Unsupported(_)));
        press(&mut g, Key::H);
        assert_eq!(g.world().mode, GameMode::Start);
    }

    #[test]
    fn test_pause_stops_ticks() {
        let mut g = game();
        press(&mut g, Key::Space);
        run_frames(&mut g, 0, 3);
        press(&mut g, Key::P);
        run_frames(&mut g, 3, 30);
        assert_eq!(g.world().time_ticks, 3);

        press(&mut g, Key::P);
        // Long gap while paused is clamped away
        g.frame(10_000_000.0);
        assert_eq!(g.world().time_ticks, 4);
    }

    #[test]
    fn test_shop_buttons_follow_level_end() {
        let mut g = game();
        press(&mut g, Key::Space);
        g.world_mut().level_length = 0;
        g.frame(0.0);
        assert_eq!(g.world().mode, GameMode::Between);
        assert!(g.ui().is_visible(SHOP_PANEL));
        assert!(g.ui().is_enabled(NEXT_LEVEL_BUTTON));
        assert!(!g.ui().is_enabled("ability1"));

        g.click_button(NEXT_LEVEL_BUTTON);
        assert_eq!(g.world().mode, GameMode::Running);
        assert_eq!(g.world().level, 2);
        assert!(!g.ui().is_visible(SHOP_PANEL));
    }

    #[test]
    fn test_ability_sound_reaches_sink() {
        #[derive(Default)]
        struct Recorder(Vec<SoundEffect>);
        impl AudioSink for Recorder {
            fn play(&mut self, effect: SoundEffect, _volume: f32) {
                self.0.push(effect);
            }
        }

        let settings = Settings::default();
        let mut g = Game::new(&settings, 2, MemoryStore::new(), Recorder::default(), NullRenderer::default());
        press(&mut g, Key::Space);
        press(&mut g, Key::Q);
        assert_eq!(g.audio.sink().0, vec![SoundEffect::Shield]);
    }
}
