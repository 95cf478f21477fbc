//! Utility modules: file logging and best-score persistence.

pub mod logging;
pub mod persistence;

pub use persistence::{JsonFileStore, MemoryStore, ScoreStore};
