//! Tracing subscriber initialisation for binaries and tools embedding the
//! wagon.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError};

/// Environment variable consulted before the configured log level.
pub const LOG_FILTER_ENV: &str = "ARTIFACT_WAGON_LOG";

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter used when the environment does not provide one
    pub log_level: String,
    /// Whether to output JSON format
    pub json_output: bool,
    /// Whether to print event targets (module paths)
    pub with_target: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: "warn,artifact_wagon=info,wagon_common=info".to_string(),
            json_output: false,
            with_target: false,
        }
    }
}

impl TracingConfig {
    /// Create config with custom log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Print event targets.
    #[must_use]
    pub const fn with_target(mut self) -> Self {
        self.with_target = true;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TryInitError> {
    let filter = config.filter();

    if config.json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(config.with_target))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(config.with_target))
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert!(config.log_level.contains("artifact_wagon=info"));
        assert!(!config.json_output);
    }

    #[test]
    fn test_config_builder() {
        let config = TracingConfig::default()
            .with_log_level("debug")
            .with_json_output()
            .with_target();

        assert_eq!(config.log_level, "debug");
        assert!(config.json_output);
        assert!(config.with_target);
    }

    #[test]
    fn test_second_init_is_rejected() {
        let config = TracingConfig::default();
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
