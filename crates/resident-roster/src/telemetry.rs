use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Targets the configured level applies to: this library and the `roster` binary.
const ROSTER_TARGETS: [&str; 2] = ["resident_roster", "roster"];

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid roster log filter '{value}'")
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    /// `RUST_LOG`, taken verbatim.
    Environment,
    /// `APP_LOG_LEVEL`, scoped to the roster targets.
    Config,
}

/// The filter the subscriber was installed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub directives: String,
    pub source: FilterSource,
}

/// Expands a bare level such as `debug` into per-target directives, keeping
/// dependencies at `warn`. Values that already carry directives pass through.
pub fn roster_directives(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let mut directives = vec!["warn".to_string()];
    directives.extend(ROSTER_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// Picks `RUST_LOG` when it parses, otherwise the configured level.
fn build_filter(
    env_value: Option<&str>,
    config: &TelemetryConfig,
) -> Result<(EnvFilter, LogFilter), TelemetryError> {
    if let Some(value) = env_value.filter(|value| !value.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(value) {
            let chosen = LogFilter {
                directives: value.to_string(),
                source: FilterSource::Environment,
            };
            return Ok((filter, chosen));
        }
    }

    let directives = roster_directives(&config.log_level);
    let filter = EnvFilter::try_new(&directives).map_err(|source| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    })?;
    Ok((
        filter,
        LogFilter {
            directives,
            source: FilterSource::Config,
        },
    ))
}

/// Installs the global subscriber on stderr so scores on stdout stay
/// machine-readable, and reports which filter won.
pub fn init(config: &TelemetryConfig) -> Result<LogFilter, TelemetryError> {
    let env_value = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (env_filter, chosen) = build_filter(env_value.as_deref(), config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)?;
    Ok(chosen)
}
