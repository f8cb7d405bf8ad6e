//! Configuration for the dispatch service.
//!
//! Loaded from a TOML file and validated before the service starts. Every
//! field has a default, so an empty file is a valid configuration.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dispatch_core::{EscalationPolicy, QueueError};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
	/// Queue view settings.
	#[serde(default)]
	pub board: BoardConfig,
	/// Escalation thresholds and sweep cadence.
	#[serde(default)]
	pub escalation: EscalationConfig,
	/// Sample working set settings.
	#[serde(default)]
	pub seed: SeedConfig,
}

/// Queue view settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardConfig {
	/// Page size the board opens at.
	#[serde(default = "default_page_size")]
	pub page_size: usize,
}

/// Returns the default page size the board opens at.
fn default_page_size() -> usize {
	10
}

impl Default for BoardConfig {
	fn default() -> Self {
		Self {
			page_size: default_page_size(),
		}
	}
}

/// Escalation thresholds and sweep cadence.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EscalationConfig {
	/// Minutes past the expected service time before an order turns urgent.
	#[serde(default = "default_urgent_after_minutes")]
	pub urgent_after_minutes: i64,
	/// Minutes past the expected service time before an order times out.
	#[serde(default = "default_timeout_after_minutes")]
	pub timeout_after_minutes: i64,
	/// Seconds between escalation sweeps.
	#[serde(default = "default_sweep_interval_seconds")]
	pub sweep_interval_seconds: u64,
}

/// Returns the default urgent threshold in minutes.
fn default_urgent_after_minutes() -> i64 {
	30
}

/// Returns the default timeout threshold in minutes.
fn default_timeout_after_minutes() -> i64 {
	120
}

/// Returns the default sweep cadence in seconds.
fn default_sweep_interval_seconds() -> u64 {
	30
}

impl Default for EscalationConfig {
	fn default() -> Self {
		Self {
			urgent_after_minutes: default_urgent_after_minutes(),
			timeout_after_minutes: default_timeout_after_minutes(),
			sweep_interval_seconds: default_sweep_interval_seconds(),
		}
	}
}

/// Sample working set settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedConfig {
	/// How many sample orders to seed the board with.
	#[serde(default = "default_seed_orders")]
	pub orders: usize,
}

/// Returns the default sample order count.
fn default_seed_orders() -> usize {
	128
}

impl Default for SeedConfig {
	fn default() -> Self {
		Self {
			orders: default_seed_orders(),
		}
	}
}

impl Config {
	/// Loads configuration from a TOML file.
	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let contents = std::fs::read_to_string(path)?;
		contents.parse()
	}

	/// The escalation policy this configuration describes.
	pub fn escalation_policy(&self) -> Result<EscalationPolicy, ConfigError> {
		EscalationPolicy::from_minutes(
			self.escalation.urgent_after_minutes,
			self.escalation.timeout_after_minutes,
		)
		.map_err(|err: QueueError| ConfigError::Validation(err.to_string()))
	}

	/// Validates the configuration to ensure every field is usable.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.board.page_size == 0 {
			return Err(ConfigError::Validation(
				"board.page_size must be at least 1".into(),
			));
		}
		if self.board.page_size > 500 {
			return Err(ConfigError::Validation(
				"board.page_size cannot exceed 500".into(),
			));
		}
		if self.escalation.timeout_after_minutes > 10_080 {
			return Err(ConfigError::Validation(
				"escalation.timeout_after_minutes cannot exceed one week".into(),
			));
		}
		// Threshold ordering is checked by the policy constructor.
		self.escalation_policy()?;
		if self.escalation.sweep_interval_seconds == 0 {
			return Err(ConfigError::Validation(
				"escalation.sweep_interval_seconds must be greater than 0".into(),
			));
		}
		if self.escalation.sweep_interval_seconds > 3600 {
			return Err(ConfigError::Validation(
				"escalation.sweep_interval_seconds cannot exceed 3600 (1 hour)".into(),
			));
		}
		if self.seed.orders == 0 {
			return Err(ConfigError::Validation(
				"seed.orders must be at least 1".into(),
			));
		}
		if self.seed.orders > 100_000 {
			return Err(ConfigError::Validation(
				"seed.orders cannot exceed 100000".into(),
			));
		}
		Ok(())
	}
}

/// Parses a configuration from a TOML string and validates it.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let config: Config = toml::from_str(s)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_empty_config_uses_defaults() {
		let config: Config = "".parse().unwrap();
		assert_eq!(config.board.page_size, 10);
		assert_eq!(config.escalation.urgent_after_minutes, 30);
		assert_eq!(config.escalation.timeout_after_minutes, 120);
		assert_eq!(config.escalation.sweep_interval_seconds, 30);
		assert_eq!(config.seed.orders, 128);
	}

	#[test]
	fn test_full_config() {
		let config_str = r#"
[board]
page_size = 20

[escalation]
urgent_after_minutes = 15
timeout_after_minutes = 60
sweep_interval_seconds = 10

[seed]
orders = 47
"#;

		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.board.page_size, 20);
		assert_eq!(config.escalation.urgent_after_minutes, 15);
		assert_eq!(config.seed.orders, 47);
		assert!(config.escalation_policy().is_ok());
	}

	#[test]
	fn test_invalid_thresholds_rejected() {
		let config_str = r#"
[escalation]
urgent_after_minutes = 120
timeout_after_minutes = 30
"#;

		let result: Result<Config, _> = config_str.parse();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_zero_page_size_rejected() {
		let result: Result<Config, _> = "[board]\npage_size = 0\n".parse();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_zero_sweep_interval_rejected() {
		let result: Result<Config, _> =
			"[escalation]\nsweep_interval_seconds = 0\n".parse();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_parse_error_is_reported() {
		let result: Result<Config, _> = "board = \"not a table\"".parse();
		assert!(matches!(result, Err(ConfigError::Parse(_))));
	}

	#[test]
	fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "[board]\npage_size = 50\n").unwrap();

		let config = Config::from_file(file.path()).unwrap();
		assert_eq!(config.board.page_size, 50);
	}

	#[test]
	fn test_from_missing_file() {
		let result = Config::from_file(Path::new("does-not-exist.toml"));
		assert!(matches!(result, Err(ConfigError::Io(_))));
	}
}
