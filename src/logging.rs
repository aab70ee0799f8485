//! Diagnostic logging setup.
//!
//! The terminal belongs to the TUI, so events go to a log file or nowhere.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. With no log file, events are discarded.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    file_subscriber(file, filter)
        .try_init()
        .context("Failed to install log subscriber")?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}

fn file_subscriber(file: File, filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_events_land_in_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snake.log");
        let file = File::create(&path).unwrap();

        let subscriber = file_subscriber(file, EnvFilter::new("info"));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(score = 30, "game over");
            tracing::debug!("filtered out");
        });

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("game over"));
        assert!(contents.contains("score=30"));
        assert!(!contents.contains("filtered out"));
    }

    #[test]
    fn test_no_log_file_is_a_no_op() {
        assert!(init_logging(None).is_ok());
    }
}
