//! Runner configuration from environment variables.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `TETRIS_SEED` | RNG seed | derived from the system clock |
//! | `TETRIS_FRAME_MS` | frame period | 16 |
//! | `TETRIS_LOG_PATH` | log file (logging is off without it) | unset |
//! | `TETRIS_KEY_RELEASE_TIMEOUT_MS` | synthesized key release delay | 150 |
//! | `TETRIS_DOWN_RELEASE_TIMEOUT_MS` | synthesized release delay for Down | 500 |
//!
//! Malformed values fall back to the default.

use std::fs::File;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use crate::input::handler::{DEFAULT_DOWN_RELEASE_TIMEOUT_MS, DEFAULT_KEY_RELEASE_TIMEOUT_MS};
use crate::types::DEFAULT_FRAME_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub seed: u32,
    pub frame_ms: u64,
    pub log_path: Option<PathBuf>,
    pub key_release_timeout_ms: u64,
    pub down_release_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: clock_seed(),
            frame_ms: DEFAULT_FRAME_MS,
            log_path: None,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
            down_release_timeout_ms: DEFAULT_DOWN_RELEASE_TIMEOUT_MS,
        }
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seed = lookup("TETRIS_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);
        let frame_ms = lookup("TETRIS_FRAME_MS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(defaults.frame_ms);
        let log_path = lookup("TETRIS_LOG_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let key_release_timeout_ms = lookup("TETRIS_KEY_RELEASE_TIMEOUT_MS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.key_release_timeout_ms);
        let down_release_timeout_ms = lookup("TETRIS_DOWN_RELEASE_TIMEOUT_MS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.down_release_timeout_ms);

        Self {
            seed,
            frame_ms,
            log_path,
            key_release_timeout_ms,
            down_release_timeout_ms,
        }
    }
}

/// Route `log` output to the configured file. The terminal belongs to the
/// renderer, so without a path nothing is logged.
pub fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already initialised")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup_from(&[
            ("TETRIS_SEED", "42"),
            ("TETRIS_FRAME_MS", "33"),
            ("TETRIS_LOG_PATH", "/tmp/tetris.log"),
            ("TETRIS_KEY_RELEASE_TIMEOUT_MS", "200"),
            ("TETRIS_DOWN_RELEASE_TIMEOUT_MS", "450"),
        ]));

        assert_eq!(config.seed, 42);
        assert_eq!(config.frame_ms, 33);
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/tetris.log")));
        assert_eq!(config.key_release_timeout_ms, 200);
        assert_eq!(config.down_release_timeout_ms, 450);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("TETRIS_SEED", "7"),
            ("TETRIS_FRAME_MS", "fast"),
            ("TETRIS_LOG_PATH", "  "),
            ("TETRIS_KEY_RELEASE_TIMEOUT_MS", "-3"),
        ]));

        assert_eq!(config.seed, 7);
        assert_eq!(config.frame_ms, DEFAULT_FRAME_MS);
        assert_eq!(config.log_path, None);
        assert_eq!(config.key_release_timeout_ms, DEFAULT_KEY_RELEASE_TIMEOUT_MS);
        assert_eq!(config.down_release_timeout_ms, DEFAULT_DOWN_RELEASE_TIMEOUT_MS);
    }

    #[test]
    fn zero_frame_period_is_rejected() {
        let config = Config::from_lookup(lookup_from(&[("TETRIS_FRAME_MS", "0")]));
        assert_eq!(config.frame_ms, DEFAULT_FRAME_MS);
    }

    #[test]
    fn logging_without_path_is_a_no_op() {
        let config = Config::from_lookup(lookup_from(&[("TETRIS_SEED", "1")]));
        assert!(init_logging(&config).is_ok());
    }
}
