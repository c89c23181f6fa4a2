//! Runtime configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::types::{Difficulty, DEFAULT_SNAP_THRESHOLD};

pub const ENV_SEED: &str = "SHAPE_SNAP_SEED";
pub const ENV_THRESHOLD: &str = "SHAPE_SNAP_THRESHOLD";
pub const ENV_DIFFICULTY: &str = "SHAPE_SNAP_DIFFICULTY";
pub const ENV_LOG_PATH: &str = "SHAPE_SNAP_LOG_PATH";

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Seed for the random source; `None` seeds from OS entropy
    pub seed: Option<u32>,
    /// Snap threshold in px
    pub snap_threshold: f32,
    /// Initial difficulty
    pub difficulty: Difficulty,
    /// Log file; the terminal game logs nowhere without it
    pub log_path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            difficulty: Difficulty::default(),
            log_path: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let seed = get(ENV_SEED).and_then(|s| s.parse().ok());

        let snap_threshold = get(ENV_THRESHOLD)
            .and_then(|s| s.parse::<f32>().ok())
            .filter(|t| t.is_finite() && *t >= 0.0)
            .unwrap_or(defaults.snap_threshold);

        let difficulty = get(ENV_DIFFICULTY)
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.difficulty);

        let log_path = get(ENV_LOG_PATH).map(PathBuf::from);

        Self {
            seed,
            snap_threshold,
            difficulty,
            log_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(config(&[]), RuntimeConfig::default());
        assert_eq!(RuntimeConfig::default().snap_threshold, 50.0);
    }

    #[test]
    fn test_reads_every_variable() {
        let cfg = config(&[
            (ENV_SEED, "42"),
            (ENV_THRESHOLD, "35.5"),
            (ENV_DIFFICULTY, "hard"),
            (ENV_LOG_PATH, " /tmp/shape-snap.log "),
        ]);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.snap_threshold, 35.5);
        assert_eq!(cfg.difficulty, Difficulty::Hard);
        assert_eq!(cfg.log_path, Some(PathBuf::from("/tmp/shape-snap.log")));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = config(&[
            (ENV_SEED, "-1"),
            (ENV_THRESHOLD, "NaN"),
            (ENV_DIFFICULTY, "impossible"),
            (ENV_LOG_PATH, "   "),
        ]);
        assert_eq!(cfg, RuntimeConfig::default());

        let cfg = config(&[(ENV_THRESHOLD, "-5")]);
        assert_eq!(cfg.snap_threshold, DEFAULT_SNAP_THRESHOLD);
    }
}
