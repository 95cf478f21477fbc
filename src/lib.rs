//! Flappy - Flappy Bird in the terminal
//!
//! This module exposes the game engine, input mapping, renderer and loop
//! driver for testing and external use.

pub mod build_info;
pub mod core;
pub mod game;
pub mod input;
pub mod render;
pub mod utils;

pub use crate::core::game_loop::{FramePacer, LoopDriver};
pub use game::{FrameReport, GameEngine, GameState};
pub use input::Intent;
