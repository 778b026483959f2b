//! Configuration loading via `ortho-config`.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Default settle sleep after a mutating call.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);
/// Default interval between state polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Default upper bound on a state poll.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(600);
/// Default interval between password data polls.
pub const DEFAULT_PASSWORD_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Longest state poll the configuration accepts, in seconds.
pub const MAX_WAIT_TIMEOUT_SECS: u64 = 86_400;
/// Default number of concurrent instance teardowns during VPC cleanup.
pub const DEFAULT_TEARDOWN_CONCURRENCY: usize = 16;

/// Control-plane settings derived from environment variables,
/// configuration files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "OCTO",
    discovery(
        app_name = "octo-infra",
        env_var = "OCTO_CONFIG_PATH",
        config_file_name = "octo-infra.toml",
        dotfile_name = ".octo-infra.toml",
        project_file_name = "octo-infra.toml"
    )
)]
pub struct AwsConfig {
    /// Region override; the SDK default chain decides when absent.
    pub region: Option<String>,
    /// Named profile from the shared credentials file.
    pub profile: Option<String>,
    /// Settle sleep after mutating calls, in milliseconds.
    #[ortho_config(default = 2_000)]
    pub settle_delay_ms: u64,
    /// Interval between state polls, in milliseconds.
    #[ortho_config(default = 5_000)]
    pub poll_interval_ms: u64,
    /// Upper bound on a state poll, in seconds.
    #[ortho_config(default = 600)]
    pub wait_timeout_secs: u64,
    /// Interval between password data polls, in milliseconds.
    #[ortho_config(default = 1_000)]
    pub password_poll_interval_ms: u64,
    /// Concurrent instance teardowns during VPC cleanup.
    #[ortho_config(default = 16)]
    pub teardown_concurrency: usize,
    /// Default log filter when `RUST_LOG` is unset.
    #[ortho_config(default = "info".to_owned())]
    pub log_level: String,
}

impl AwsConfig {
    /// Loads configuration using the `ortho-config` derive. Values merge
    /// defaults, configuration files, environment variables, and CLI flags in
    /// that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the loader fails to merge sources.
    pub fn load_from_sources() -> Result<Self, ConfigError> {
        Self::load().map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("octo-infra")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation. Error messages name the environment
    /// variable and file key that supply each value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(String::from(
                "poll interval must be positive: set OCTO_POLL_INTERVAL_MS or poll_interval_ms in octo-infra.toml",
            )));
        }
        if self.password_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(String::from(
                "password poll interval must be positive: set OCTO_PASSWORD_POLL_INTERVAL_MS or password_poll_interval_ms in octo-infra.toml",
            )));
        }
        if self.wait_timeout_secs > MAX_WAIT_TIMEOUT_SECS {
            return Err(ConfigError::Invalid(format!(
                "wait timeout must not exceed {MAX_WAIT_TIMEOUT_SECS} seconds: set OCTO_WAIT_TIMEOUT_SECS or wait_timeout_secs in octo-infra.toml"
            )));
        }
        if self.teardown_concurrency == 0 {
            return Err(ConfigError::Invalid(String::from(
                "teardown concurrency must be positive: set OCTO_TEARDOWN_CONCURRENCY or teardown_concurrency in octo-infra.toml",
            )));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid(String::from(
                "log level must not be empty: set OCTO_LOG_LEVEL or log_level in octo-infra.toml",
            )));
        }
        Ok(())
    }

    /// Timing settings shared by every resource client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when validation fails.
    pub fn timings(&self) -> Result<Timings, ConfigError> {
        self.validate()?;
        Ok(Timings {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            wait_timeout: Duration::from_secs(self.wait_timeout_secs),
            password_poll_interval: Duration::from_millis(self.password_poll_interval_ms),
            teardown_concurrency: self.teardown_concurrency,
        })
    }
}

/// Sleeps and poll bounds used by resource clients.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timings {
    /// Sleep after a mutating call before the resource is described again.
    pub settle_delay: Duration,
    /// Interval between state polls.
    pub poll_interval: Duration,
    /// Upper bound on a state poll.
    pub wait_timeout: Duration,
    /// Interval between password data polls.
    pub password_poll_interval: Duration,
    /// Concurrent instance teardowns during VPC cleanup.
    pub teardown_concurrency: usize,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            password_poll_interval: DEFAULT_PASSWORD_POLL_INTERVAL,
            teardown_concurrency: DEFAULT_TEARDOWN_CONCURRENCY,
        }
    }
}

impl Timings {
    /// Overrides the settle sleep.
    #[must_use]
    pub const fn with_settle_delay(mut self, value: Duration) -> Self {
        self.settle_delay = value;
        self
    }

    /// Overrides the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, value: Duration) -> Self {
        self.poll_interval = value;
        self
    }

    /// Overrides the poll bound.
    #[must_use]
    pub const fn with_wait_timeout(mut self, value: Duration) -> Self {
        self.wait_timeout = value;
        self
    }

    /// Overrides the password poll interval.
    #[must_use]
    pub const fn with_password_poll_interval(mut self, value: Duration) -> Self {
        self.password_poll_interval = value;
        self
    }

    /// Overrides the teardown concurrency; zero is raised to one.
    #[must_use]
    pub const fn with_teardown_concurrency(mut self, value: usize) -> Self {
        self.teardown_concurrency = if value == 0 { 1 } else { value };
        self
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
