//! Runtime configuration for core callers.
//!
//! # Responsibility
//! - Resolve database path and logging settings from the environment.
//! - Apply defaults for anything left unset or blank.
//!
//! # Invariants
//! - `log_level` is always a normalized level name.
//! - File logging is only started when `log_dir` is set.

use crate::logging::{default_log_level, init_logging, normalize_level, LoggingError};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "BOOKMARK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "BOOKMARK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "BOOKMARK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "bookmarks.sqlite3";

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Resolves settings from process environment variables.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through an arbitrary key lookup.
    ///
    /// # Errors
    /// - `UnsupportedLevel` when the level variable is set to an unknown value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = non_blank(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(LOG_LEVEL_ENV) {
            config.log_level = normalize_level(&level)?;
        }
        config.log_dir = non_blank(LOG_DIR_ENV).map(PathBuf::from);
        Ok(config)
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging was left off.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        let Some(dir) = self.log_dir.as_ref() else {
            return Ok(false);
        };
        let dir = dir
            .to_str()
            .ok_or_else(|| LoggingError::InvalidLogDir("path is not valid UTF-8".to_string()))?;
        init_logging(self.log_level, dir)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::LoggingError;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.db_path.ends_with("bookmarks.sqlite3"));
        assert_eq!(config.init_logging(), Ok(false));
    }

    #[test]
    fn blank_values_are_ignored_and_levels_normalized() {
        let config = CoreConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, "  /var/lib/bookmarks.db "),
            (LOG_LEVEL_ENV, "WARNING"),
            (LOG_DIR_ENV, "   "),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/bookmarks.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[(LOG_LEVEL_ENV, "loud")])).unwrap_err();
        assert!(matches!(err, LoggingError::UnsupportedLevel(_)));
    }
}
