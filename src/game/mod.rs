//! Flappy Bird simulation core.
//!
//! A real-time action game where the player keeps a bird aloft through
//! scrolling pipe pairs by jumping. Gravity pulls the bird down every frame,
//! and touching a pipe, the ceiling or the ground ends the run.

pub mod collision;
pub mod logic;
pub mod types;

pub use collision::*;
pub use logic::*;
pub use types::*;
