// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit logging configuration section.

use serde::{Deserialize, Serialize};

const DEFAULT_QUEUE_CAPACITY: usize = 10000;
const DEFAULT_RETENTION_DAYS: i64 = 90;

fn default_queue_capacity() -> usize {
	DEFAULT_QUEUE_CAPACITY
}

fn default_retention_days() -> i64 {
	DEFAULT_RETENTION_DAYS
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuditConfigLayer {
	pub enabled: Option<bool>,
	pub retention_days: Option<i64>,
	pub queue_capacity: Option<usize>,
	pub min_severity: Option<String>,
}

impl AuditConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.retention_days.is_some() {
			self.retention_days = other.retention_days;
		}
		if other.queue_capacity.is_some() {
			self.queue_capacity = other.queue_capacity;
		}
		if other.min_severity.is_some() {
			self.min_severity = other.min_severity;
		}
	}

	pub fn finalize(self) -> AuditConfig {
		AuditConfig {
			enabled: self.enabled.unwrap_or(true),
			retention_days: self.retention_days.unwrap_or(default_retention_days()),
			queue_capacity: self.queue_capacity.unwrap_or_else(default_queue_capacity),
			min_severity: self.min_severity.unwrap_or_else(|| "info".to_string()),
		}
	}
}

/// Audit pipeline configuration (runtime, fully resolved).
///
/// `retention_days` drives the startup prune of stored entries;
/// `queue_capacity` bounds the in-process queue between emitters and
/// sinks (entries beyond capacity are dropped, never blocking a
/// request); `min_severity` filters entries below the named severity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditConfig {
	pub enabled: bool,
	pub retention_days: i64,
	pub queue_capacity: usize,
	pub min_severity: String,
}

impl Default for AuditConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			retention_days: default_retention_days(),
			queue_capacity: default_queue_capacity(),
			min_severity: "info".to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = AuditConfig::default();
		assert!(config.enabled);
		assert_eq!(config.retention_days, 90);
		assert_eq!(config.queue_capacity, 10000);
		assert_eq!(config.min_severity, "info");
	}

	#[test]
	fn test_layer_finalize_defaults() {
		let config = AuditConfigLayer::default().finalize();
		assert!(config.enabled);
		assert_eq!(config.retention_days, 90);
		assert_eq!(config.queue_capacity, 10000);
	}

	#[test]
	fn test_layer_finalize_with_values() {
		let layer = AuditConfigLayer {
			enabled: Some(false),
			retention_days: Some(30),
			queue_capacity: Some(500),
			min_severity: Some("warning".to_string()),
		};
		let config = layer.finalize();
		assert!(!config.enabled);
		assert_eq!(config.retention_days, 30);
		assert_eq!(config.queue_capacity, 500);
		assert_eq!(config.min_severity, "warning");
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = AuditConfigLayer {
			enabled: Some(true),
			retention_days: Some(90),
			queue_capacity: None,
			min_severity: None,
		};
		let overlay = AuditConfigLayer {
			enabled: None,
			retention_days: Some(180),
			queue_capacity: Some(2000),
			min_severity: None,
		};
		base.merge(overlay);
		assert_eq!(base.enabled, Some(true));
		assert_eq!(base.retention_days, Some(180));
		assert_eq!(base.queue_capacity, Some(2000));
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let toml_str = r#"
retention_days = 365
"#;
		let layer: AuditConfigLayer = toml::from_str(toml_str).unwrap();
		assert_eq!(layer.retention_days, Some(365));
		assert!(layer.enabled.is_none());
	}
}
