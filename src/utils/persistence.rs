//! Best-score persistence in ~/.flappy/.
//!
//! Storage is a flat key-value map. Reads never fail: a missing file, an
//! unreadable file or a malformed value all read as 0. Writes are
//! best-effort and only logged on failure.

use crate::core::constants::SCORES_FILENAME;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Opaque integer key-value store for scores.
pub trait ScoreStore {
    /// Stored value for `key`, or 0 if absent or unreadable.
    fn get(&self, key: &str) -> u32;

    /// Overwrite `key`. Failures are swallowed.
    fn set(&mut self, key: &str, value: u32);
}

/// Get the ~/.flappy/ directory path, creating it if needed.
pub fn flappy_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(".flappy");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the full path for a file in ~/.flappy/.
pub fn save_path(filename: &str) -> io::Result<PathBuf> {
    Ok(flappy_dir()?.join(filename))
}

/// Lenient score parse: JSON numbers and numeric strings are accepted,
/// anything else (negative, fractional, garbage) reads as 0.
pub fn parse_score(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.unwrap_or(0)
}

/// Scores kept as a pretty-printed JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// `None` when no home directory could be resolved; the store is then
    /// read-as-zero and writes are dropped.
    path: Option<PathBuf>,
}

impl JsonFileStore {
    /// Store at the default location, ~/.flappy/scores.json.
    pub fn open_default() -> Self {
        match save_path(SCORES_FILENAME) {
            Ok(path) => Self { path: Some(path) },
            Err(e) => {
                log::warn!("score storage unavailable: {}", e);
                Self { path: None }
            }
        }
    }

    /// Store backed by an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn load(&self) -> BTreeMap<String, Value> {
        let Some(path) = &self.path else {
            return BTreeMap::new();
        };
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => BTreeMap::new(),
        }
    }

    fn save(&self, values: &BTreeMap<String, Value>) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}

impl ScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> u32 {
        parse_score(self.load().get(key))
    }

    fn set(&mut self, key: &str, value: u32) {
        let mut values = self.load();
        values.insert(key.to_string(), Value::from(value));
        if let Err(e) = self.save(&values) {
            log::warn!("failed to save {}: {}", key, e);
        }
    }
}

/// In-memory store. Counts writes so callers can check persistence rules.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u32>,
    /// Number of `set` calls since creation.
    pub writes: u32,
}

impl MemoryStore {
    /// Store pre-seeded with one value; the seed does not count as a write.
    pub fn with_score(key: &str, value: u32) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value);
        Self { values, writes: 0 }
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> u32 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
        self.writes += 1;
    }
}
