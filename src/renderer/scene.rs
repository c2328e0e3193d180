//! Scene building: which screen, and what goes on it

use glam::Vec2;

use super::{DrawList, Font, colors};
use crate::consts::{SHIELD_HEIGHT_SCALE, SHIELD_WIDTH};
use crate::highscores::{MAX_HIGH_SCORES, ScoreBoard};
use crate::sim::player::PlayerClass;
use crate::sim::state::{GameMode, WorldState};
use crate::sim::terrain::TerrainKind;

const BACKGROUND: &str = "Wall720.png";
const BACKGROUND_TILE: f32 = 500.0;
const BACKGROUND_SCROLL: u64 = 3;

/// Health bar inset from each side of the body, and its height
const BAR_INSET: f32 = 10.0;
const BAR_HEIGHT: f32 = 5.0;

const START_LINES: [(&str, f32, f32); 9] = [
    ("Left and right click or arrows to cycle party members left or right", -50.0, 20.0),
    ("Press space to jump. You can double jump.", -20.0, 20.0),
    ("Press Q or W to activate the party leader's primary/secondary abilities", 10.0, 20.0),
    ("Party members respawn after a delay, and they regen health slowly", 40.0, 20.0),
    ("Get points from surviving and killing enemies", 70.0, 20.0),
    ("(The enemies are the boxes with pro jumping and flying skills)", 95.0, 12.0),
    ("Press H to view high scores", 140.0, 20.0),
    ("Press space to start", 170.0, 20.0),
    ("Have fun.", 200.0, 20.0),
];

fn terrain_image(kind: TerrainKind) -> Option<&'static str> {
    match kind {
        TerrainKind::Base => Some("TileSandstone100.png"),
        TerrainKind::Lava => Some("lava.png"),
        TerrainKind::Void => None,
    }
}

/// Build the frame for the current mode. `fps` is drawn when given.
pub fn build(state: &WorldState, board: &ScoreBoard, fps: Option<f32>) -> DrawList {
    let mut list = DrawList::new();
    match state.mode {
        GameMode::Start => start_screen(&mut list, state.canvas),
        GameMode::Highscore => highscore_screen(&mut list, state.canvas, board),
        _ => {
            world(&mut list, state);
            hud(&mut list, state, fps);
        }
    }
    list
}

fn start_screen(list: &mut DrawList, canvas: Vec2) {
    let center = canvas / 2.0;
    list.clear(colors::SCREEN);
    list.text("Welcome to Leap of Faith", center - Vec2::Y * 100.0, 30.0, Font::Title);
    for (line, dy, size) in START_LINES {
        list.text(line, center + Vec2::Y * dy, size, Font::Body);
    }
}

fn highscore_screen(list: &mut DrawList, canvas: Vec2, board: &ScoreBoard) {
    let x = canvas.x / 2.0;
    list.clear(colors::SCREEN);
    list.text("High Scores", Vec2::new(x, 100.0), 30.0, Font::Title);
    list.text("Press H to return to the main menu", Vec2::new(x, 135.0), 18.0, Font::Body);

    let rows = match board {
        ScoreBoard::Loaded(scores) => scores.rows(),
        ScoreBoard::Hidden => [0; MAX_HIGH_SCORES],
        ScoreBoard::Unsupported(_) => {
            list.text(
                "Your system does not support high score storage",
                canvas / 2.0,
                18.0,
                Font::Body,
            );
            return;
        }
    };
    for (i, score) in rows.iter().enumerate() {
        list.text(
            format!("{}. {}", i + 1, score),
            Vec2::new(x, 200.0 + i as f32 * 40.0),
            20.0,
            Font::Body,
        );
    }
}

fn health_bar(list: &mut DrawList, position: Vec2, width: f32, fraction: f32, lift: f32) {
    let origin = position + Vec2::new(BAR_INSET, -lift);
    let full = (width - 2.0 * BAR_INSET).max(0.0);
    list.rect(origin, Vec2::new(full, BAR_HEIGHT), colors::HEALTH_BACK);
    list.rect(origin, Vec2::new(full * fraction, BAR_HEIGHT), colors::HEALTH);
}

fn world(list: &mut DrawList, state: &WorldState) {
    let canvas = state.canvas;

    // Parallax wall
    let mut x = -((state.time_ticks * BACKGROUND_SCROLL) as f32 % BACKGROUND_TILE);
    while x < canvas.x {
        list.image(BACKGROUND, Vec2::new(x, 0.0));
        x += BACKGROUND_TILE;
    }

    for terrain in &state.terrains {
        if let Some(image) = terrain_image(terrain.kind) {
            list.image(image, terrain.position);
        }
        if terrain.iced {
            list.rect(terrain.position, terrain.bounds, colors::ICE);
        }
    }

    for player in state.players.iter().filter(|p| p.is_alive()) {
        let desc = player.class.descriptor();
        let body = &player.body;
        list.sprite(desc.sprite, body.position + body.offset, player.frame_index(), desc.frame_size);

        // Shield strip in front of the leader
        if player.class == PlayerClass::Paladin && player.abilities.q.is_active() {
            if let Some(leader) = state.leader() {
                let height = body.bounds.y * SHIELD_HEIGHT_SCALE;
                let lb = &leader.body;
                list.rect(
                    Vec2::new(lb.position.x + lb.bounds.x, lb.bottom() - height),
                    Vec2::new(SHIELD_WIDTH, height),
                    colors::shield(player.abilities.q.duration),
                );
            }
        }

        health_bar(list, body.position, body.bounds.x, body.health_fraction(), 14.0);
        let bar = body.bounds.x - 2.0 * BAR_INSET;
        let q = player.abilities.q.cooldown_fraction();
        let w = player.abilities.w.cooldown_fraction();
        list.rect(
            body.position + Vec2::new(BAR_INSET, -9.0),
            Vec2::new(bar * q, 3.0),
            colors::COOLDOWN_Q,
        );
        list.rect(
            body.position + Vec2::new(BAR_INSET, -6.0),
            Vec2::new(bar * w, 3.0),
            colors::COOLDOWN_W,
        );
    }

    for enemy in &state.enemies {
        let desc = enemy.kind.descriptor();
        let body = &enemy.body;
        list.sprite(desc.sprite, body.position + body.offset, enemy.frame_index(), desc.frame_size);
        health_bar(list, body.position, body.bounds.x, body.health_fraction(), 10.0);
    }

    for shot in &state.projectiles {
        list.image(shot.kind.descriptor().sprite, shot.body.position);
    }

    for particle in &state.particles {
        list.image(particle.kind.sprite(), particle.body.position);
    }
}

fn hud(list: &mut DrawList, state: &WorldState, fps: Option<f32>) {
    let canvas = state.canvas;
    let center = canvas / 2.0;

    if state.mode == GameMode::Dead {
        list.rect(Vec2::ZERO, canvas, colors::DEAD_OVERLAY);
        list.text("You died.", center - Vec2::Y * 40.0, 30.0, Font::Title);
        list.text(format!("Score: {}", state.score), center, 24.0, Font::Body);
        list.text("Press H to view high scores", center + Vec2::Y * 40.0, 24.0, Font::Body);
        list.text("Press space to restart", center + Vec2::Y * 80.0, 24.0, Font::Body);
        return;
    }

    list.text(
        format!("Score: {}", state.score),
        Vec2::new(canvas.x - 75.0, 25.0),
        20.0,
        Font::Body,
    );
    if state.mode == GameMode::Between {
        list.text(
            format!("Level {} complete  -  Experience: {}", state.level, state.experience),
            Vec2::new(center.x, canvas.y / 8.0 + 30.0),
            20.0,
            Font::Title,
        );
    }
    if let Some(fps) = fps {
        list.text(format!("{:.0} fps", fps), Vec2::new(40.0, canvas.y - 20.0), 10.0, Font::Body);
    }

    if state.paused && state.in_control() {
        list.rect(Vec2::ZERO, canvas, colors::PAUSE_OVERLAY);
        list.text("Paused", center, 30.0, Font::Body);
        list.text("Press P to unpause", center + Vec2::Y * 40.0, 24.0, Font::Body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::renderer::DrawCommand;
    use crate::sim::command::{Command, apply_command};

    const CANVAS: Vec2 = Vec2::new(1280.0, 720.0);

    fn running() -> WorldState {
        let mut state = WorldState::new(3, CANVAS, 500);
        apply_command(&mut state, Command::Jump);
        state
    }

    #[test]
    fn test_start_screen() {
        let state = WorldState::new(1, CANVAS, 500);
        let list = build(&state, &ScoreBoard::Hidden, None);
        assert_eq!(list.commands[0], DrawCommand::Clear(colors::SCREEN));
        assert!(list.texts().any(|t| t == "Press space to start"));
    }

    #[test]
    fn test_highscore_rows() {
        let mut state = WorldState::new(1, CANVAS, 500);
        state.set_mode(GameMode::Highscore);
        let mut scores = HighScores::new();
        scores.add_score(420, 3, 0.0);

        let list = build(&state, &ScoreBoard::Loaded(scores), None);
        let texts: Vec<_> = list.texts().collect();
        assert!(texts.contains(&"1. 420"));
        assert!(texts.contains(&"10. 0"));
    }

    #[test]
    fn test_highscore_unsupported() {
        let mut state = WorldState::new(1, CANVAS, 500);
        state.set_mode(GameMode::Highscore);
        let list = build(&state, &ScoreBoard::Unsupported("none".into()), None);
        assert!(list.texts().any(|t| t == "Your system does not support high score storage"));
        assert!(!list.texts().any(|t| t.starts_with("1. ")));
    }

    #[test]
    fn test_running_scene() {
        let state = running();
        let list = build(&state, &ScoreBoard::Hidden, Some(60.0));
        assert_eq!(list.sprites_of("paladinRun.png").count(), 1);
        assert_eq!(list.sprites_of("gatorRun.png").count(), 1);
        assert_eq!(list.sprites_of("TileSandstone100.png").count(), state.terrains.len());
        assert!(list.texts().any(|t| t == "Score: 0"));
        assert!(list.texts().any(|t| t == "60 fps"));
    }

    #[test]
    fn test_void_is_not_drawn() {
        let mut state = running();
        state.terrains[3].kind = TerrainKind::Void;
        let list = build(&state, &ScoreBoard::Hidden, None);
        assert_eq!(list.sprites_of("TileSandstone100.png").count(), state.terrains.len() - 1);
    }

    #[test]
    fn test_shield_drawn_while_active() {
        let mut state = running();
        let before = build(&state, &ScoreBoard::Hidden, None);
        state.players[0].abilities.q.trigger();
        let after = build(&state, &ScoreBoard::Hidden, None);
        let shield = |list: &DrawList| {
            list.commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Rect { size, .. } if size.y == 150.0 * 1.25))
                .count()
        };
        assert_eq!(shield(&before), 0);
        assert_eq!(shield(&after), 1);
    }

    #[test]
    fn test_overlays() {
        let mut state = running();
        apply_command(&mut state, Command::Pause);
        let list = build(&state, &ScoreBoard::Hidden, None);
        assert!(list.texts().any(|t| t == "Press P to unpause"));

        state.paused = false;
        state.score = 77;
        state.set_mode(GameMode::Dead);
        let list = build(&state, &ScoreBoard::Hidden, None);
        assert!(list.texts().any(|t| t == "Score: 77"));
        assert!(list.texts().any(|t| t == "You died."));
    }
}
