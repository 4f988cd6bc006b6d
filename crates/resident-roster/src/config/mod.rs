use std::env;
use std::fmt;
use std::fs::File;
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the roster tooling.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub scoring: ScoringSource,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let config_path = env::var("ROSTER_SCORING_CONFIG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            scoring: ScoringSource { config_path },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where rule weights and calendars come from.
#[derive(Debug, Clone, Default)]
pub struct ScoringSource {
    pub config_path: Option<PathBuf>,
}

impl ScoringSource {
    /// Reads the JSON scoring config, or the built-in defaults when no path is set.
    pub fn load(&self) -> Result<ScoringConfig, ConfigError> {
        let Some(path) = &self.config_path else {
            return Ok(ScoringConfig::default());
        };
        let file = File::open(path).map_err(|source| ConfigError::Unreadable {
            path: path.clone(),
            source,
        })?;
        ScoringConfig::from_reader(file).map_err(|source| ConfigError::InvalidScoring {
            path: path.clone(),
            source,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidScoring {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unreadable { path, .. } => {
                write!(f, "unable to read scoring config {}", path.display())
            }
            ConfigError::InvalidScoring { path, .. } => {
                write!(f, "scoring config {} is not valid JSON", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Unreadable { source, .. } => Some(source),
            ConfigError::InvalidScoring { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RuleId;
    use std::env;
    use std::io::Write;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("ROSTER_SCORING_CONFIG");
    }

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("roster-config-{}-{name}", std::process::id()))
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert!(config.scoring.config_path.is_none());
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(
            config.scoring.load().expect("defaults load"),
            ScoringConfig::default()
        );
    }

    #[test]
    fn reads_environment_and_scoring_path() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let path = temp_path("scoring.json");
        let mut file = File::create(&path).expect("temp file");
        file.write_all(br#"{"extra_rules": ["minimum_rest_between_shifts"], "named_peds_resident": null}"#)
            .expect("write config");

        env::set_var("APP_ENV", "ci");
        env::set_var("APP_LOG_LEVEL", "debug");
        env::set_var("ROSTER_SCORING_CONFIG", &path);
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.telemetry.log_level, "debug");
        let scoring = config.scoring.load().expect("scoring config parses");
        assert!(scoring.is_enabled(RuleId::MinimumRestBetweenShifts));
        assert!(scoring.named_peds_resident.is_none());
        assert_eq!(scoring.evening_start, ScoringConfig::default().evening_start);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn invalid_scoring_file_is_reported() {
        let path = temp_path("broken.json");
        std::fs::write(&path, "{ not json").expect("write config");
        let source = ScoringSource {
            config_path: Some(path.clone()),
        };
        assert!(matches!(
            source.load(),
            Err(ConfigError::InvalidScoring { .. })
        ));
        std::fs::remove_file(path).ok();

        let missing = ScoringSource {
            config_path: Some(temp_path("missing.json")),
        };
        assert!(matches!(missing.load(), Err(ConfigError::Unreadable { .. })));
    }
}
