// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client configuration for the bridge.
//!
//! Settings are layered with increasing precedence:
//!
//! 1. Built-in defaults
//! 2. TOML file (`$XDG_CONFIG_HOME/crashbridge/config.toml` unless overridden)
//! 3. `CRASHBRIDGE_*` environment variables
//!
//! These are the defaults a reporter starts from; the API key and an
//! explicit release stage still arrive through `configure`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Maximum number of breadcrumbs kept by default.
pub const DEFAULT_MAX_BREADCRUMBS: usize = 100;
/// Default capacity of the asynchronous delivery queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

const ENV_RELEASE_STAGE: &str = "CRASHBRIDGE_RELEASE_STAGE";
const ENV_APP_VERSION: &str = "CRASHBRIDGE_APP_VERSION";
const ENV_MAX_BREADCRUMBS: &str = "CRASHBRIDGE_MAX_BREADCRUMBS";
const ENV_QUEUE_CAPACITY: &str = "CRASHBRIDGE_QUEUE_CAPACITY";

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// I/O error reading config file
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// TOML parsing error
	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// Invalid value
	#[error("Invalid value for {field}: {message}")]
	InvalidValue { field: String, message: String },

	/// Config directory not found
	#[error("Could not determine config directory")]
	ConfigDirNotFound,
}

impl ConfigError {
	pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			field: field.into(),
			message: message.into(),
		}
	}
}

/// Defaults and limits applied by the bridge and its clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Release stage used when `configure` does not pass one.
	pub release_stage: Option<String>,
	/// Application version attached to the client configuration.
	pub app_version: Option<String>,
	/// Breadcrumbs kept in the log; the oldest are evicted first.
	pub max_breadcrumbs: usize,
	/// Reports that may wait for delivery before new ones are dropped.
	pub queue_capacity: usize,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			release_stage: None,
			app_version: None,
			max_breadcrumbs: DEFAULT_MAX_BREADCRUMBS,
			queue_capacity: DEFAULT_QUEUE_CAPACITY,
		}
	}
}

impl ClientConfig {
	/// Platform-appropriate default path for the configuration file.
	pub fn default_path() -> Result<PathBuf, ConfigError> {
		let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
		Ok(config_dir.join("crashbridge").join("config.toml"))
	}

	/// Parse a TOML file. Missing keys keep their defaults.
	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Overlay values from a variable lookup (normally the process environment).
	pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(stage) = lookup(ENV_RELEASE_STAGE) {
			self.release_stage = Some(stage);
		}
		if let Some(version) = lookup(ENV_APP_VERSION) {
			self.app_version = Some(version);
		}
		if let Some(raw) = lookup(ENV_MAX_BREADCRUMBS) {
			self.max_breadcrumbs = parse_count(ENV_MAX_BREADCRUMBS, &raw)?;
		}
		if let Some(raw) = lookup(ENV_QUEUE_CAPACITY) {
			self.queue_capacity = parse_count(ENV_QUEUE_CAPACITY, &raw)?;
		}
		Ok(self)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_breadcrumbs == 0 {
			return Err(ConfigError::invalid_value(
				"max_breadcrumbs",
				"must be greater than 0",
			));
		}
		if self.queue_capacity == 0 {
			return Err(ConfigError::invalid_value(
				"queue_capacity",
				"must be greater than 0",
			));
		}
		Ok(())
	}
}

fn parse_count(field: &str, raw: &str) -> Result<usize, ConfigError> {
	raw.trim()
		.parse()
		.map_err(|e| ConfigError::invalid_value(field, format!("{e}: {raw:?}")))
}

/// Load configuration from defaults, the given (or default) file, and the
/// environment, then validate it.
///
/// A missing file is not an error.
pub fn load_client_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
	let path = match path {
		Some(p) => p.to_path_buf(),
		None => ClientConfig::default_path()?,
	};

	let config = if path.exists() {
		tracing::debug!(path = %path.display(), "loading client config");
		ClientConfig::from_file(&path)?
	} else {
		tracing::debug!(path = %path.display(), "no client config file, using defaults");
		ClientConfig::default()
	};

	let config = config.apply_env(|key| std::env::var(key).ok())?;
	config.validate()?;
	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| map.get(key).cloned()
	}

	#[test]
	fn defaults_are_valid() {
		let config = ClientConfig::default();
		assert_eq!(config.max_breadcrumbs, DEFAULT_MAX_BREADCRUMBS);
		assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
		assert!(config.release_stage.is_none());
		assert!(config.validate().is_ok());
	}

	#[test]
	fn from_file_keeps_defaults_for_missing_keys() {
		let mut tmp = tempfile::NamedTempFile::new().unwrap();
		writeln!(tmp, "release_stage = \"staging\"\nmax_breadcrumbs = 25").unwrap();

		let config = ClientConfig::from_file(tmp.path()).unwrap();
		assert_eq!(config.release_stage.as_deref(), Some("staging"));
		assert_eq!(config.max_breadcrumbs, 25);
		assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
	}

	#[test]
	fn from_file_reports_parse_errors_with_path() {
		let mut tmp = tempfile::NamedTempFile::new().unwrap();
		writeln!(tmp, "max_breadcrumbs = \"lots\"").unwrap();

		let err = ClientConfig::from_file(tmp.path()).unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn env_overrides_file_values() {
		let config = ClientConfig {
			release_stage: Some("staging".to_string()),
			..Default::default()
		}
		.apply_env(lookup(&[
			(ENV_RELEASE_STAGE, "production"),
			(ENV_APP_VERSION, "2.4.1"),
			(ENV_QUEUE_CAPACITY, "8"),
		]))
		.unwrap();

		assert_eq!(config.release_stage.as_deref(), Some("production"));
		assert_eq!(config.app_version.as_deref(), Some("2.4.1"));
		assert_eq!(config.queue_capacity, 8);
		assert_eq!(config.max_breadcrumbs, DEFAULT_MAX_BREADCRUMBS);
	}

	#[test]
	fn env_rejects_non_numeric_counts() {
		let err = ClientConfig::default()
			.apply_env(lookup(&[(ENV_MAX_BREADCRUMBS, "many")]))
			.unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { .. }));
	}

	#[test]
	fn validate_rejects_zero_limits() {
		let config = ClientConfig {
			max_breadcrumbs: 0,
			..Default::default()
		};
		assert!(config.validate().is_err());

		let config = ClientConfig {
			queue_capacity: 0,
			..Default::default()
		};
		assert!(config.validate().is_err());
	}

	#[test]
	fn load_with_missing_file_uses_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let config = load_client_config(Some(&dir.path().join("absent.toml"))).unwrap();
		assert!(config.max_breadcrumbs > 0);
	}
}
