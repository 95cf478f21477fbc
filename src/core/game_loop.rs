//! The loop driver: paces frames, applies player intents, advances the
//! engine and renders each frame to a ratatui terminal.
//!
//! All engine mutation happens on the thread that calls [`LoopDriver::run`].
//! Input arrives as [`Intent`]s over a channel, and an `Arc<AtomicBool>`
//! lets any thread ask the loop to stop.

use crate::core::constants::REALTIME_FRAME_MS;
use crate::game::{FrameReport, GameEngine};
use crate::input::Intent;
use crate::render::{render_scene, PixelCanvas};
use crate::utils::persistence::ScoreStore;
use rand::Rng;
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Fixed-rate frame clock. Sleeps until the next frame boundary and reports
/// loop time in milliseconds since the pacer was created.
#[derive(Debug)]
pub struct FramePacer {
    start: Instant,
    frame: Duration,
    next_frame: Instant,
}

impl FramePacer {
    pub fn new(frame: Duration) -> Self {
        let start = Instant::now();
        Self {
            start,
            frame,
            next_frame: start,
        }
    }

    /// Pacer running at the realtime display rate.
    pub fn realtime() -> Self {
        Self::new(Duration::from_millis(REALTIME_FRAME_MS))
    }

    /// Block until the next frame is due, then return the current loop time.
    ///
    /// A frame that overran does not cause a burst of catch-up frames; the
    /// next frame is due one full frame after now.
    pub fn wait_for_next_frame(&mut self) -> f64 {
        let now = Instant::now();
        if now < self.next_frame {
            thread::sleep(self.next_frame - now);
        }
        let now = Instant::now();
        let scheduled = self.next_frame + self.frame;
        self.next_frame = if scheduled < now {
            now + self.frame
        } else {
            scheduled
        };
        self.elapsed_ms()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Owns the engine and everything needed to show it.
pub struct LoopDriver<S: ScoreStore, R: Rng> {
    engine: GameEngine<S>,
    intents: Receiver<Intent>,
    running: Arc<AtomicBool>,
    rng: R,
    canvas: PixelCanvas,
    pacer: FramePacer,
}

impl<S: ScoreStore, R: Rng> LoopDriver<S, R> {
    pub fn new(
        engine: GameEngine<S>,
        intents: Receiver<Intent>,
        running: Arc<AtomicBool>,
        rng: R,
    ) -> Self {
        Self {
            engine,
            intents,
            running,
            rng,
            canvas: PixelCanvas::new(0, 0),
            pacer: FramePacer::realtime(),
        }
    }

    /// Replace the frame clock, e.g. with a faster one in tests.
    pub fn with_pacer(mut self, pacer: FramePacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn engine(&self) -> &GameEngine<S> {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Consume the driver, handing back the engine.
    pub fn into_engine(self) -> GameEngine<S> {
        self.engine
    }

    /// Run frames until the stop flag clears. Returns on the first
    /// terminal I/O error.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        log::info!("loop started");
        while self.is_running() {
            let now_ms = self.pacer.wait_for_next_frame();
            self.frame(terminal, now_ms)?;
        }
        log::info!(
            "loop stopped (state: {}, best: {})",
            self.engine.state.name(),
            self.engine.high_score
        );
        Ok(())
    }

    /// One frame at loop time `now_ms`: intents, update, render.
    /// Does nothing past the intents if a Quit arrived, and reports an
    /// empty frame.
    pub fn frame<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        now_ms: f64,
    ) -> io::Result<FrameReport> {
        self.drain_intents();
        if !self.is_running() {
            return Ok(FrameReport::default());
        }

        let report = self.engine.update(now_ms, &mut self.rng);
        self.log_report(&report);

        terminal.draw(|frame| {
            let area = frame.size();
            self.canvas.reset(area.width, area.height);
            render_scene(&mut self.canvas, &self.engine, now_ms);
            frame.render_widget(&self.canvas, area);
        })?;
        Ok(report)
    }

    /// Apply every queued intent in arrival order.
    fn drain_intents(&mut self) {
        loop {
            match self.intents.try_recv() {
                Ok(Intent::Jump) => self.engine.jump(),
                Ok(Intent::Quit) => {
                    log::info!("quit requested");
                    self.running.store(false, Ordering::SeqCst);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // No input source left, so nothing could ever quit us
                    log::warn!("input channel closed, stopping");
                    self.running.store(false, Ordering::SeqCst);
                    break;
                }
            }
        }
    }

    fn log_report(&self, report: &FrameReport) {
        if report.spawned {
            log::debug!("pipe spawned ({} on screen)", self.engine.pipes.len());
        }
        if report.scored > 0 {
            log::debug!("score {}", self.engine.score);
        }
        if report.collided {
            log::info!("game over with score {}", self.engine.score);
        }
        if let Some(best) = report.new_high_score {
            log::info!("new best score {}", best);
        }
    }
}
