// Logical play area
pub const GAME_WIDTH: f64 = 400.0;
pub const GAME_HEIGHT: f64 = 600.0;

// Bird
pub const BIRD_SIZE: f64 = 30.0;
pub const BIRD_X: f64 = 80.0;
pub const GRAVITY: f64 = 0.5;
pub const JUMP_FORCE: f64 = -8.0; // negative = upward

// Pipes
pub const PIPE_WIDTH: f64 = 60.0;
pub const PIPE_GAP: f64 = 160.0;
pub const PIPE_SPEED: f64 = 3.0;
pub const PIPE_SPAWN_INTERVAL_MS: f64 = 1800.0;
pub const PIPE_CAP_HEIGHT: f64 = 25.0;
pub const PIPE_CAP_OVERHANG: f64 = 5.0;
/// Gap margin from ceiling and floor.
pub const GAP_MARGIN: f64 = 60.0;
pub const MIN_GAP_TOP: f64 = GAP_MARGIN;
pub const MAX_GAP_TOP: f64 = GAME_HEIGHT - PIPE_GAP - GAP_MARGIN;

// Ground strip (collision line is its top edge)
pub const GROUND_HEIGHT: f64 = 25.0;
pub const GROUND_LINE: f64 = GAME_HEIGHT - GROUND_HEIGHT;

// Timing
/// Motion constants are tuned against this frame duration (60 Hz).
pub const REFERENCE_FRAME_MS: f64 = 16.67;
/// Upper bound on a single frame's elapsed time fed to the physics.
pub const MAX_FRAME_MS: f64 = 100.0;
/// Frame pacer target (~60 FPS).
pub const REALTIME_FRAME_MS: u64 = 16;
/// Input thread poll timeout; bounds how long teardown waits for it.
pub const INPUT_POLL_MS: u64 = 50;

// Persistence
pub const HIGH_SCORE_KEY: &str = "flappyHighScore";
pub const SCORES_FILENAME: &str = "scores.json";
pub const LOG_FILENAME: &str = "flappy.log";
