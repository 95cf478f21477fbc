//! Game logic for Flappy Bird: state transitions, physics, pipes and scoring.

use super::collision::check_collision;
use super::types::{Bird, FrameReport, GameEngine, GameState, Pipe};
use crate::core::constants::*;
use crate::utils::persistence::ScoreStore;
use rand::Rng;

/// Scale factor for this frame relative to the 60 Hz reference frame.
///
/// The first frame has no predecessor and counts as exactly one reference
/// frame. Elapsed time is clamped to `MAX_FRAME_MS` so a stalled terminal
/// cannot teleport the bird through a pipe.
pub fn frame_delta(last_frame_ms: Option<f64>, now_ms: f64) -> f64 {
    match last_frame_ms {
        Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS) / REFERENCE_FRAME_MS,
        None => 1.0,
    }
}

/// Apply gravity, then move the bird by its new velocity.
pub fn advance_bird(bird: &mut Bird, delta: f64) {
    bird.velocity += GRAVITY * delta;
    bird.y += bird.velocity * delta;
}

/// Whether the spawn interval has elapsed (or nothing has spawned yet).
pub fn spawn_due(last_spawn_ms: Option<f64>, now_ms: f64) -> bool {
    match last_spawn_ms {
        None => true,
        Some(last) => now_ms - last > PIPE_SPAWN_INTERVAL_MS,
    }
}

/// Move every pipe left by the scroll speed.
pub fn scroll_pipes(pipes: &mut [Pipe], delta: f64) {
    for pipe in pipes.iter_mut() {
        pipe.x -= PIPE_SPEED * delta;
    }
}

/// Mark pipes whose trailing edge has passed the bird. Returns how many
/// were newly scored; a pipe is never counted twice.
pub fn score_pipes(pipes: &mut [Pipe]) -> u32 {
    let mut newly_scored = 0;
    for pipe in pipes.iter_mut() {
        if !pipe.scored && pipe.right() < BIRD_X {
            pipe.scored = true;
            newly_scored += 1;
        }
    }
    newly_scored
}

/// Drop pipes that are fully off the left edge, keeping spawn order.
pub fn cull_pipes(pipes: &mut Vec<Pipe>) {
    pipes.retain(|pipe| !pipe.is_offscreen());
}

impl<S: ScoreStore> GameEngine<S> {
    /// The single player action. Meaning depends on the current state:
    /// start a run, flap, or leave the results screen.
    pub fn jump(&mut self) {
        match self.state {
            GameState::Idle => self.start_run(),
            GameState::Playing => {
                self.bird.velocity = JUMP_FORCE;
            }
            GameState::GameOver => self.return_to_idle(),
        }
    }

    /// Advance the simulation to `now_ms` (milliseconds of loop time).
    ///
    /// Only the Playing state simulates; Idle and GameOver just keep the
    /// frame clock current so the first Playing frame gets a sane delta.
    pub fn update<R: Rng>(&mut self, now_ms: f64, rng: &mut R) -> FrameReport {
        let delta = frame_delta(self.last_frame_ms, now_ms);
        self.last_frame_ms = Some(now_ms);

        let mut report = FrameReport::default();
        if self.state != GameState::Playing {
            return report;
        }

        advance_bird(&mut self.bird, delta);

        if spawn_due(self.last_spawn_ms, now_ms) {
            self.pipes.push(Pipe::spawn(rng));
            self.last_spawn_ms = Some(now_ms);
            report.spawned = true;
        }

        scroll_pipes(&mut self.pipes, delta);
        report.scored = score_pipes(&mut self.pipes);
        self.score += report.scored;
        cull_pipes(&mut self.pipes);

        if check_collision(&self.bird, &self.pipes) {
            report.collided = true;
            report.new_high_score = self.end_run();
        }

        report
    }

    fn start_run(&mut self) {
        self.state = GameState::Playing;
        self.bird = Bird::launched();
        self.pipes.clear();
        self.score = 0;
        self.last_spawn_ms = None;
        log::debug!("state -> {}", self.state.name());
    }

    fn return_to_idle(&mut self) {
        self.state = GameState::Idle;
        self.bird = Bird::resting();
        self.pipes.clear();
        self.score = 0;
        log::debug!("state -> {}", self.state.name());
    }

    /// Transition into GameOver. Persists and returns the score if it beats
    /// the stored best.
    fn end_run(&mut self) -> Option<u32> {
        self.state = GameState::GameOver;
        log::debug!("state -> {}", self.state.name());

        if self.score <= self.high_score {
            return None;
        }
        self.high_score = self.score;
        let score = self.score;
        self.store_mut().set(HIGH_SCORE_KEY, score);
        Some(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::persistence::MemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn playing_engine(store: MemoryStore) -> GameEngine<MemoryStore> {
        let mut engine = GameEngine::new(store);
        engine.jump();
        assert_eq!(engine.state, GameState::Playing);
        engine
    }

    /// A pipe whose gap comfortably contains the bird at mid-height.
    fn safe_pipe(x: f64) -> Pipe {
        Pipe::new(x, GAME_HEIGHT / 2.0 - PIPE_GAP / 2.0)
    }

    // ── Delta ──

    #[test]
    fn test_first_frame_delta_is_one() {
        assert_eq!(frame_delta(None, 12345.0), 1.0);
    }

    #[test]
    fn test_delta_scales_with_elapsed_time() {
        let delta = frame_delta(Some(1000.0), 1000.0 + REFERENCE_FRAME_MS * 2.0);
        assert!((delta - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_delta_clamped() {
        let delta = frame_delta(Some(0.0), 5000.0);
        assert!((delta - MAX_FRAME_MS / REFERENCE_FRAME_MS).abs() < 1e-9);
        assert_eq!(frame_delta(Some(100.0), 50.0), 0.0);
    }

    // ── State machine ──

    #[test]
    fn test_jump_from_idle_starts_run() {
        let mut engine = GameEngine::new(MemoryStore::default());
        engine.score = 9;
        engine.pipes.push(safe_pipe(200.0));
        engine.last_spawn_ms = Some(500.0);

        engine.jump();

        assert_eq!(engine.state, GameState::Playing);
        assert_eq!(engine.score, 0);
        assert!(engine.pipes.is_empty());
        assert!(engine.last_spawn_ms.is_none());
        assert_eq!(engine.bird.y, GAME_HEIGHT / 2.0);
        assert_eq!(engine.bird.velocity, JUMP_FORCE);
    }

    #[test]
    fn test_jump_while_playing_overrides_velocity() {
        let mut engine = playing_engine(MemoryStore::default());
        engine.bird.velocity = 6.5;
        engine.jump();
        assert_eq!(engine.bird.velocity, JUMP_FORCE);
        // No stacking
        engine.jump();
        assert_eq!(engine.bird.velocity, JUMP_FORCE);
        assert_eq!(engine.state, GameState::Playing);
    }

    #[test]
    fn test_jump_from_game_over_returns_to_idle() {
        let mut engine = playing_engine(MemoryStore::default());
        engine.state = GameState::GameOver;
        engine.score = 4;
        engine.pipes.push(safe_pipe(10.0));
        engine.bird.y = 560.0;

        engine.jump();

        assert_eq!(engine.state, GameState::Idle);
        assert_eq!(engine.score, 0);
        assert!(engine.pipes.is_empty());
        assert_eq!(engine.bird, Bird::resting());
    }

    #[test]
    fn test_idle_and_game_over_do_not_simulate() {
        let mut rng = rng();
        let mut engine = GameEngine::new(MemoryStore::default());
        engine.update(0.0, &mut rng);
        engine.update(16.67, &mut rng);
        assert_eq!(engine.bird, Bird::resting());
        assert!(engine.pipes.is_empty());

        engine.state = GameState::GameOver;
        engine.bird.y = 200.0;
        let report = engine.update(33.0, &mut rng);
        assert_eq!(engine.bird.y, 200.0);
        assert!(engine.pipes.is_empty());
        assert_eq!(report, FrameReport::default());
    }

    // ── Physics ──

    #[test]
    fn test_gravity_integration() {
        let mut rng = rng();
        let mut engine = playing_engine(MemoryStore::default());
        engine.update(1000.0, &mut rng);

        for step in 1..=10 {
            let before = engine.bird;
            let now = 1000.0 + step as f64 * 20.0;
            let delta = frame_delta(engine.last_frame_ms, now);
            engine.update(now, &mut rng);
            if engine.state != GameState::Playing {
                break;
            }
            let expected_velocity = before.velocity + GRAVITY * delta;
            assert!((engine.bird.velocity - expected_velocity).abs() < 1e-9);
            let expected_y = before.y + expected_velocity * delta;
            assert!((engine.bird.y - expected_y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bird_falls_without_input() {
        let mut rng = rng();
        let mut engine = playing_engine(MemoryStore::default());
        let start_y = engine.bird.y;
        let mut now = 0.0;
        for _ in 0..60 {
            now += REFERENCE_FRAME_MS;
            engine.update(now, &mut rng);
        }
        assert!(engine.bird.y > start_y || engine.state == GameState::GameOver);
    }

    // ── Spawning ──

    #[test]
    fn test_spawn_on_first_playing_frame() {
        let mut rng = rng();
        let mut engine = playing_engine(MemoryStore::default());
        let report = engine.update(5000.0, &mut rng);
        assert!(report.spawned);
        assert_eq!(engine.pipes.len(), 1);
        assert_eq!(engine.last_spawn_ms, Some(5000.0));
        // Spawned at the right edge and scrolled once in the same frame
        assert!((engine.pipes[0].x - (GAME_WIDTH - PIPE_SPEED)).abs() < 1e-9);
    }

    #[test]
    fn test_spawn_interval_is_wall_clock() {
        assert!(spawn_due(None, 0.0));
        assert!(!spawn_due(Some(1000.0), 1000.0 + PIPE_SPAWN_INTERVAL_MS));
        assert!(spawn_due(Some(1000.0), 1000.0 + PIPE_SPAWN_INTERVAL_MS + 1.0));
    }

    #[test]
    fn test_spawns_follow_interval() {
        let mut rng = rng();
        let mut engine = playing_engine(MemoryStore::default());
        let mut now = 0.0;
        let mut spawns = 0;
        // Keep the bird alive by flapping whenever it sinks below center
        while now < 4000.0 {
            now += REFERENCE_FRAME_MS;
            if engine.bird.y > GAME_HEIGHT / 2.0 {
                engine.jump();
            }
            engine.pipes.clear();
            if engine.update(now, &mut rng).spawned {
                spawns += 1;
            }
        }
        // t≈16.67, then every >1800ms: ~1817, ~3634
        assert_eq!(spawns, 3);
    }

    // ── Scrolling, scoring, culling ──

    #[test]
    fn test_pipes_scroll_left() {
        let mut pipes = vec![Pipe::new(300.0, 200.0), Pipe::new(100.0, 200.0)];
        scroll_pipes(&mut pipes, 2.0);
        assert!((pipes[0].x - (300.0 - PIPE_SPEED * 2.0)).abs() < 1e-9);
        assert!((pipes[1].x - (100.0 - PIPE_SPEED * 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_score_pipes_once() {
        let mut pipes = vec![Pipe::new(BIRD_X - PIPE_WIDTH - 1.0, 200.0)];
        assert_eq!(score_pipes(&mut pipes), 1);
        assert!(pipes[0].scored);
        assert_eq!(score_pipes(&mut pipes), 0);
    }

    #[test]
    fn test_score_requires_trailing_edge_past_bird() {
        // Trailing edge exactly at the bird: not yet
        let mut pipes = vec![Pipe::new(BIRD_X - PIPE_WIDTH, 200.0)];
        assert_eq!(score_pipes(&mut pipes), 0);
        assert!(!pipes[0].scored);
    }

    #[test]
    fn test_scoring_through_update() {
        let mut rng = rng();
        let mut engine = playing_engine(MemoryStore::default());
        engine.update(0.0, &mut rng);
        engine.pipes.clear();
        engine.last_spawn_ms = Some(0.0);
        engine.bird = Bird::resting();
        // Trailing edge 1 unit ahead of the bird; one frame at delta 1 passes it
        engine.pipes.push(safe_pipe(BIRD_X - PIPE_WIDTH + 1.0));

        let report = engine.update(REFERENCE_FRAME_MS, &mut rng);
        engine.bird = Bird::resting();
        let again = engine.update(REFERENCE_FRAME_MS * 2.0, &mut rng);

        assert_eq!(report.scored, 1);
        assert_eq!(again.scored, 0);
        assert_eq!(engine.score, 1);
        assert!(engine.pipes[0].scored);
    }

    #[test]
    fn test_score_never_decrements() {
        let mut rng = rng();
        let mut engine = playing_engine(MemoryStore::default());
        let mut now = 0.0;
        let mut last_score = 0;
        for frame in 0..2000 {
            now += REFERENCE_FRAME_MS;
            // Ride each pipe's gap so the run lasts
            let target = engine
                .pipes
                .iter()
                .find(|p| p.right() >= BIRD_X - BIRD_SIZE)
                .map(|p| p.gap_top + PIPE_GAP / 2.0)
                .unwrap_or(GAME_HEIGHT / 2.0);
            if engine.bird.y > target + 10.0 && engine.bird.velocity > 0.0 {
                engine.jump();
            }
            engine.update(now, &mut rng);
            assert!(engine.score >= last_score, "frame {frame}");
            last_score = engine.score;
            if engine.state != GameState::Playing {
                break;
            }
        }
    }

    #[test]
    fn test_cull_offscreen_pipes() {
        let mut pipes = vec![
            Pipe::new(-61.0, 200.0),
            Pipe::new(-59.0, 200.0),
            Pipe::new(150.0, 200.0),
        ];
        cull_pipes(&mut pipes);
        assert_eq!(pipes.len(), 2);
        assert_eq!(pipes[0].x, -59.0);
        assert_eq!(pipes[1].x, 150.0);
    }

    #[test]
    fn test_pipes_stay_in_spawn_order() {
        let mut rng = rng();
        let mut engine = playing_engine(MemoryStore::default());
        let mut now = 0.0;
        for _ in 0..600 {
            now += REFERENCE_FRAME_MS;
            engine.bird = Bird::resting();
            engine.pipes.iter_mut().for_each(|p| p.gap_top = 220.0);
            engine.update(now, &mut rng);
            for pair in engine.pipes.windows(2) {
                assert!(pair[0].x < pair[1].x);
            }
        }
        assert_eq!(engine.state, GameState::Playing);
    }

    // ── Game over & high score ──

    #[test]
    fn test_collision_ends_run() {
        let mut rng = rng();
        let mut engine = playing_engine(MemoryStore::default());
        engine.last_spawn_ms = Some(0.0);
        engine.bird.y = GROUND_LINE;
        let report = engine.update(1.0, &mut rng);
        assert!(report.collided);
        assert_eq!(engine.state, GameState::GameOver);
    }

    #[test]
    fn test_high_score_not_written_on_tie() {
        let mut rng = rng();
        let mut engine = playing_engine(MemoryStore::with_score(HIGH_SCORE_KEY, 5));
        engine.last_spawn_ms = Some(0.0);
        engine.score = 5;
        engine.bird.y = GAME_HEIGHT;

        let report = engine.update(1.0, &mut rng);

        assert!(report.collided);
        assert_eq!(report.new_high_score, None);
        assert_eq!(engine.store().writes, 0);
        assert_eq!(engine.high_score, 5);
    }

    #[test]
    fn test_high_score_written_when_beaten() {
        let mut rng = rng();
        let mut engine = playing_engine(MemoryStore::with_score(HIGH_SCORE_KEY, 5));
        engine.last_spawn_ms = Some(0.0);
        engine.score = 6;
        engine.bird.y = GAME_HEIGHT;

        let report = engine.update(1.0, &mut rng);

        assert_eq!(report.new_high_score, Some(6));
        assert_eq!(engine.store().writes, 1);
        assert_eq!(engine.store().get(HIGH_SCORE_KEY), 6);
        assert_eq!(engine.high_score, 6);
    }

    #[test]
    fn test_jump_in_game_over_never_scores_or_spawns() {
        let mut rng = rng();
        let mut engine = playing_engine(MemoryStore::default());
        engine.state = GameState::GameOver;
        engine.score = 3;
        engine.jump();
        let report = engine.update(100.0, &mut rng);
        assert!(!report.spawned);
        assert_eq!(report.scored, 0);
        assert_eq!(engine.score, 0);
        assert!(engine.pipes.is_empty());
    }
}
