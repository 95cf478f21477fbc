//! File logging. The terminal belongs to the game while it runs, so log
//! output goes to ~/.flappy/flappy.log instead of stderr.

use crate::core::constants::LOG_FILENAME;
use crate::utils::persistence::save_path;
use env_logger::{Builder, Env, Target};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

fn open_log(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Build a logger appending to `path`. The filter comes from `RUST_LOG`.
pub fn file_logger(path: &Path) -> io::Result<Builder> {
    let file = open_log(path)?;
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    builder
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis();
    Ok(builder)
}

/// Install the global logger writing to ~/.flappy/flappy.log.
/// Returns the log path.
pub fn init() -> io::Result<PathBuf> {
    let path = save_path(LOG_FILENAME)?;
    file_logger(&path)?
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;
    use std::fs;
    use std::io::Write;

    #[test]
    fn test_file_logger_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flappy.log");
        let _builder = file_logger(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_logger_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flappy.log");
        fs::write(&path, "earlier run\n").unwrap();

        let mut file = open_log(&path).unwrap();
        writeln!(file, "later run").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "earlier run\nlater run\n");
    }

    #[test]
    fn test_logger_writes_records_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flappy.log");
        let logger = file_logger(&path)
            .unwrap()
            .filter_level(LevelFilter::Info)
            .build();

        log::Log::log(
            &logger,
            &log::Record::builder()
                .args(format_args!("game over with score 3"))
                .level(log::Level::Info)
                .target("flappy")
                .build(),
        );
        log::Log::flush(&logger);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("game over with score 3"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("flappy.log");
        assert!(file_logger(&path).is_err());
    }
}
