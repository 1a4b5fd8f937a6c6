// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration section.

use serde::{Deserialize, Serialize};

fn default_level() -> String {
	"info,tower_http::trace=debug".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfigLayer {
	pub level: Option<String>,
	pub json: Option<bool>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.json.is_some() {
			self.json = other.json;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(default_level),
			json: self.json.unwrap_or(false),
		}
	}
}

/// Logging configuration (runtime, fully resolved).
///
/// `level` is an `EnvFilter` directive string; `json` switches the
/// subscriber to newline-delimited JSON output for log shippers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
	pub level: String,
	pub json: bool,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: default_level(),
			json: false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = LoggingConfig::default();
		assert_eq!(config.level, "info,tower_http::trace=debug");
		assert!(!config.json);
	}

	#[test]
	fn test_layer_finalize_defaults() {
		let layer = LoggingConfigLayer::default();
		let config = layer.finalize();
		assert_eq!(config.level, "info,tower_http::trace=debug");
		assert!(!config.json);
	}

	#[test]
	fn test_layer_finalize_with_values() {
		let layer = LoggingConfigLayer {
			level: Some("debug".to_string()),
			json: Some(true),
		};
		let config = layer.finalize();
		assert_eq!(config.level, "debug");
		assert!(config.json);
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = LoggingConfigLayer {
			level: Some("info".to_string()),
			json: Some(false),
		};
		let overlay = LoggingConfigLayer {
			level: Some("warn".to_string()),
			json: None,
		};
		base.merge(overlay);
		assert_eq!(base.level, Some("warn".to_string()));
		assert_eq!(base.json, Some(false));
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let toml_str = r#"
level = "warn"
"#;
		let layer: LoggingConfigLayer = toml::from_str(toml_str).unwrap();
		assert_eq!(layer.level, Some("warn".to_string()));
		assert!(layer.json.is_none());
	}
}
