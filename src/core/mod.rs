//! Core modules: fixed tuning constants and the frame loop driver.

pub mod constants;
pub mod game_loop;

pub use constants::*;
