//! Scene drawing for Flappy Bird.
//!
//! Everything here reads the engine and writes draw commands; nothing
//! mutates simulation state. Animation (clouds, wing, idle bob) is keyed
//! off the frame timestamp only.

use super::surface::{Ellipse, LinearGradient, LogicalRect, Paint, Rgba, Surface, TextStyle};
use crate::core::constants::*;
use crate::game::{GameEngine, GameState, Pipe};
use crate::utils::persistence::ScoreStore;

// ── Palette ─────────────────────────────────────────────────────────
const SKY_TOP: Rgba = Rgba::hex(0x87CEEB);
const SKY_MID: Rgba = Rgba::hex(0xB0E0E6);
const SKY_BOTTOM: Rgba = Rgba::hex(0x90EE90);
const DIRT: Rgba = Rgba::hex(0x8B6914);
const GRASS: Rgba = Rgba::hex(0x7CCD7C);

const PIPE_EDGE: Rgba = Rgba::hex(0x2E8B57);
const PIPE_SHINE: Rgba = Rgba::hex(0x3CB371);
const PIPE_CAP: Rgba = Rgba::hex(0x228B22);
const PIPE_CAP_BORDER: Rgba = Rgba::hex(0x1B5E20);

const BIRD_BODY: Rgba = Rgba::hex(0xFFD700);
const BIRD_OUTLINE: Rgba = Rgba::hex(0xDAA520);
const BIRD_WING: Rgba = Rgba::hex(0xFFA500);
const BIRD_BEAK: Rgba = Rgba::hex(0xFF6347);

const TITLE_GOLD: Rgba = Rgba::hex(0xFFD700);
const TITLE_GOLD_EDGE: Rgba = Rgba::hex(0x8B6914);
const GAME_OVER_RED: Rgba = Rgba::hex(0xFF4444);
const GAME_OVER_EDGE: Rgba = Rgba::hex(0x8B0000);

// ── Animation ───────────────────────────────────────────────────────
/// Clouds drift one unit every this many milliseconds.
const CLOUD_MS_PER_UNIT: f64 = 50.0;
/// Clouds wrap over the play width plus this much off-screen travel.
const CLOUD_WRAP_EXTRA: f64 = 200.0;
/// `(base x, y)` of each cloud cluster.
const CLOUDS: [(f64, f64); 3] = [(100.0, 80.0), (300.0, 140.0), (500.0, 60.0)];
const WING_PERIOD_MS: f64 = 80.0;
const WING_AMPLITUDE: f64 = 4.0;
const IDLE_BOB_PERIOD_MS: f64 = 300.0;
const IDLE_BOB_AMPLITUDE: f64 = 15.0;

const IDLE_DIM: f64 = 0.3;
const GAME_OVER_DIM: f64 = 0.5;

/// Draw one complete frame for the engine's current state.
pub fn render_scene<S: ScoreStore>(surface: &mut impl Surface, engine: &GameEngine<S>, now_ms: f64) {
    match engine.state {
        GameState::Idle => {
            draw_background(surface, now_ms);
            draw_bird(surface, idle_bird_y(now_ms), now_ms);
            draw_idle_overlay(surface, engine.high_score);
        }
        GameState::Playing | GameState::GameOver => {
            draw_background(surface, now_ms);
            for pipe in &engine.pipes {
                draw_pipe(surface, pipe);
            }
            draw_bird(surface, engine.bird.y, now_ms);
            draw_score(surface, engine.score);
            if engine.state == GameState::GameOver {
                draw_game_over_overlay(surface, engine.score, engine.high_score);
            }
        }
    }
}

/// Bird height on the title screen: a slow bob around mid-height.
pub fn idle_bird_y(now_ms: f64) -> f64 {
    GAME_HEIGHT / 2.0 + (now_ms / IDLE_BOB_PERIOD_MS).sin() * IDLE_BOB_AMPLITUDE
}

/// Left x of each cloud cluster at `now_ms`. Clouds scroll left and wrap.
pub fn cloud_positions(now_ms: f64) -> [(f64, f64); 3] {
    let wrap = GAME_WIDTH + CLOUD_WRAP_EXTRA;
    let offset = (now_ms / CLOUD_MS_PER_UNIT) % wrap;
    CLOUDS.map(|(base_x, y)| ((base_x - offset + wrap) % wrap - 100.0, y))
}

fn full_screen() -> LogicalRect {
    LogicalRect::new(0.0, 0.0, GAME_WIDTH, GAME_HEIGHT)
}

/// Sky gradient, drifting clouds, ground strip.
pub fn draw_background(surface: &mut impl Surface, now_ms: f64) {
    let sky = LinearGradient::new(
        (0.0, 0.0),
        (0.0, GAME_HEIGHT),
        &[(0.0, SKY_TOP), (0.7, SKY_MID), (1.0, SKY_BOTTOM)],
    );
    surface.fill_rect(full_screen(), &Paint::Linear(sky));

    let cloud = Rgba::WHITE.with_alpha(0.8);
    for (x, y) in cloud_positions(now_ms) {
        draw_cloud(surface, x, y, cloud);
    }

    surface.fill_rect(
        LogicalRect::new(0.0, GAME_HEIGHT - 20.0, GAME_WIDTH, 20.0),
        &DIRT.into(),
    );
    surface.fill_rect(
        LogicalRect::new(0.0, GROUND_LINE, GAME_WIDTH, 8.0),
        &GRASS.into(),
    );
}

fn draw_cloud(surface: &mut impl Surface, x: f64, y: f64, color: Rgba) {
    surface.fill_ellipse(Ellipse::circle(x, y, 20.0), color);
    surface.fill_ellipse(Ellipse::circle(x + 25.0, y - 10.0, 25.0), color);
    surface.fill_ellipse(Ellipse::circle(x + 50.0, y, 20.0), color);
    surface.fill_ellipse(Ellipse::circle(x + 25.0, y + 5.0, 18.0), color);
}

/// Top and bottom pipe with shaded bodies and capped ends at the gap.
pub fn draw_pipe(surface: &mut impl Surface, pipe: &Pipe) {
    let body = Paint::Linear(LinearGradient::new(
        (pipe.x, 0.0),
        (pipe.right(), 0.0),
        &[(0.0, PIPE_EDGE), (0.5, PIPE_SHINE), (1.0, PIPE_EDGE)],
    ));
    let cap_x = pipe.x - PIPE_CAP_OVERHANG;
    let cap_width = PIPE_WIDTH + PIPE_CAP_OVERHANG * 2.0;

    // Top pipe, cap hanging just above the gap
    surface.fill_rect(LogicalRect::new(pipe.x, 0.0, PIPE_WIDTH, pipe.gap_top), &body);
    let top_cap = LogicalRect::new(cap_x, pipe.gap_top - PIPE_CAP_HEIGHT, cap_width, PIPE_CAP_HEIGHT);
    surface.fill_rect(top_cap, &PIPE_CAP.into());
    surface.stroke_rect(top_cap, PIPE_CAP_BORDER, 2.0);

    // Bottom pipe, cap sitting just below the gap
    let bottom_y = pipe.gap_bottom();
    surface.fill_rect(
        LogicalRect::new(pipe.x, bottom_y, PIPE_WIDTH, GAME_HEIGHT - bottom_y),
        &body,
    );
    let bottom_cap = LogicalRect::new(cap_x, bottom_y, cap_width, PIPE_CAP_HEIGHT);
    surface.fill_rect(bottom_cap, &PIPE_CAP.into());
    surface.stroke_rect(bottom_cap, PIPE_CAP_BORDER, 2.0);
}

/// Bird centered at `(BIRD_X, y)`: body, flapping wing, eye, beak.
pub fn draw_bird(surface: &mut impl Surface, y: f64, now_ms: f64) {
    let x = BIRD_X;

    let body = Ellipse::new(x, y, BIRD_SIZE / 2.0, BIRD_SIZE / 2.5, 0.0);
    surface.fill_ellipse(body, BIRD_BODY);
    surface.stroke_ellipse(body, BIRD_OUTLINE, 2.0);

    let wing_flap = (now_ms / WING_PERIOD_MS).sin() * WING_AMPLITUDE;
    surface.fill_ellipse(Ellipse::new(x - 5.0, y + wing_flap, 10.0, 6.0, -0.3), BIRD_WING);

    surface.fill_ellipse(Ellipse::circle(x + 8.0, y - 5.0, 6.0), Rgba::WHITE);
    surface.fill_ellipse(Ellipse::circle(x + 10.0, y - 5.0, 3.0), Rgba::BLACK);

    surface.fill_polygon(
        &[(x + 14.0, y), (x + 24.0, y + 3.0), (x + 14.0, y + 6.0)],
        BIRD_BEAK,
    );
}

/// Large running score at the top center.
pub fn draw_score(surface: &mut impl Surface, score: u32) {
    let style = TextStyle::new(Rgba::WHITE, 48.0).outlined(Rgba::BLACK);
    surface.text(&score.to_string(), GAME_WIDTH / 2.0, 60.0, style);
}

/// Title screen: dimmed scene, title, prompt and the best score if any.
pub fn draw_idle_overlay(surface: &mut impl Surface, high_score: u32) {
    surface.fill_rect(full_screen(), &Rgba::BLACK.with_alpha(IDLE_DIM).into());

    let center = GAME_WIDTH / 2.0;
    surface.text(
        "Flappy Bird",
        center,
        GAME_HEIGHT / 3.0,
        TextStyle::new(TITLE_GOLD, 52.0).outlined(TITLE_GOLD_EDGE),
    );
    surface.text(
        "Click or Press Space",
        center,
        GAME_HEIGHT / 2.0 + 20.0,
        TextStyle::new(Rgba::WHITE, 22.0).outlined(Rgba::BLACK),
    );
    if high_score > 0 {
        surface.text(
            &format!("Best: {}", high_score),
            center,
            GAME_HEIGHT / 2.0 + 60.0,
            TextStyle::new(TITLE_GOLD, 18.0).outlined(Rgba::BLACK),
        );
    }
}

/// Results screen drawn over the frozen final frame.
pub fn draw_game_over_overlay(surface: &mut impl Surface, score: u32, high_score: u32) {
    surface.fill_rect(full_screen(), &Rgba::BLACK.with_alpha(GAME_OVER_DIM).into());

    let center = GAME_WIDTH / 2.0;
    surface.text(
        "Game Over",
        center,
        GAME_HEIGHT / 3.0,
        TextStyle::new(GAME_OVER_RED, 48.0).outlined(GAME_OVER_EDGE),
    );
    surface.text(
        &format!("Score: {}", score),
        center,
        GAME_HEIGHT / 2.0,
        TextStyle::new(Rgba::WHITE, 32.0).outlined(Rgba::BLACK),
    );
    surface.text(
        &format!("Best: {}", high_score),
        center,
        GAME_HEIGHT / 2.0 + 40.0,
        TextStyle::new(TITLE_GOLD, 18.0).outlined(Rgba::BLACK),
    );
    surface.text(
        "Click to Restart",
        center,
        GAME_HEIGHT / 2.0 + 90.0,
        TextStyle::new(Rgba::WHITE, 20.0).outlined(Rgba::BLACK),
    );
}
