//! Flappy Bird data structures.

use crate::core::constants::*;
use crate::utils::persistence::ScoreStore;
use rand::Rng;

/// Top-level game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    /// Title screen; the bird bobs in place and nothing scrolls.
    #[default]
    Idle,
    Playing,
    /// Frozen final frame with the results overlay.
    GameOver,
}

impl GameState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::GameOver => "game over",
        }
    }
}

/// The player's bird. Horizontal position is fixed at `BIRD_X`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    /// Center of the bird in logical units (0 = ceiling).
    pub y: f64,
    /// Vertical velocity in units per reference frame (positive = downward).
    pub velocity: f64,
}

impl Bird {
    /// Bird at mid-height, not moving.
    pub fn resting() -> Self {
        Self {
            y: GAME_HEIGHT / 2.0,
            velocity: 0.0,
        }
    }

    /// Bird at mid-height with the opening jump already applied.
    pub fn launched() -> Self {
        Self {
            velocity: JUMP_FORCE,
            ..Self::resting()
        }
    }

    pub fn top(&self) -> f64 {
        self.y - BIRD_SIZE / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + BIRD_SIZE / 2.0
    }

    pub fn left(&self) -> f64 {
        BIRD_X - BIRD_SIZE / 2.0
    }

    pub fn right(&self) -> f64 {
        BIRD_X + BIRD_SIZE / 2.0
    }
}

impl Default for Bird {
    fn default() -> Self {
        Self::resting()
    }
}

/// A single pipe obstacle (top + bottom pair with a gap).
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge (float for smooth scrolling).
    pub x: f64,
    /// Height of the top pipe, i.e. where the gap begins.
    pub gap_top: f64,
    /// Whether the bird has passed this pipe.
    pub scored: bool,
}

impl Pipe {
    pub fn new(x: f64, gap_top: f64) -> Self {
        Self {
            x,
            gap_top,
            scored: false,
        }
    }

    /// New pipe at the right edge with a gap placed uniformly at random
    /// inside `[MIN_GAP_TOP, MAX_GAP_TOP)`.
    pub fn spawn<R: Rng>(rng: &mut R) -> Self {
        let gap_top = rng.gen_range(MIN_GAP_TOP..MAX_GAP_TOP);
        Self::new(GAME_WIDTH, gap_top)
    }

    /// Trailing (right) edge.
    pub fn right(&self) -> f64 {
        self.x + PIPE_WIDTH
    }

    pub fn gap_bottom(&self) -> f64 {
        self.gap_top + PIPE_GAP
    }

    /// True once the pipe has scrolled fully past the left boundary.
    pub fn is_offscreen(&self) -> bool {
        self.right() <= 0.0
    }
}

/// What happened during one `update` call. Used by the loop driver for
/// logging; carries no state of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// A pipe was spawned this frame.
    pub spawned: bool,
    /// Pipes that crossed the bird this frame.
    pub scored: u32,
    /// The bird hit something and the game ended this frame.
    pub collided: bool,
    /// Set when the game-over transition wrote a new best score.
    pub new_high_score: Option<u32>,
}

/// The whole simulation: state machine, bird, pipes, score and the
/// best-score store. Owned by the loop driver; only ever mutated from it.
#[derive(Debug)]
pub struct GameEngine<S: ScoreStore> {
    pub state: GameState,
    pub bird: Bird,
    /// Active pipes in spawn order (leftmost first).
    pub pipes: Vec<Pipe>,
    pub score: u32,
    /// Best score as last read from or written to the store.
    pub high_score: u32,

    // Timing (milliseconds of loop time)
    /// Time of the last spawn since entering Playing; `None` spawns immediately.
    pub last_spawn_ms: Option<f64>,
    /// Timestamp of the previous frame, for delta scaling.
    pub last_frame_ms: Option<f64>,

    store: S,
}

impl<S: ScoreStore> GameEngine<S> {
    /// Create an idle engine, reading the stored best score.
    pub fn new(store: S) -> Self {
        let high_score = store.get(HIGH_SCORE_KEY);
        Self {
            state: GameState::Idle,
            bird: Bird::resting(),
            pipes: Vec::new(),
            score: 0,
            high_score,
            last_spawn_ms: None,
            last_frame_ms: None,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
