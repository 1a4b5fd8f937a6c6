// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use crate::event::{AuditEventType, AuditLogEntry, AuditSeverity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditFilterConfig {
	pub min_severity: AuditSeverity,
	pub include_events: Option<Vec<AuditEventType>>,
	pub exclude_events: Option<Vec<AuditEventType>>,
}

impl Default for AuditFilterConfig {
	fn default() -> Self {
		Self {
			min_severity: AuditSeverity::Info,
			include_events: None,
			exclude_events: None,
		}
	}
}

impl AuditFilterConfig {
	pub fn allows(&self, entry: &AuditLogEntry) -> bool {
		if entry.severity < self.min_severity {
			return false;
		}

		if let Some(ref exclude) = self.exclude_events {
			if exclude.contains(&entry.event_type) {
				return false;
			}
		}

		if let Some(ref include) = self.include_events {
			if !include.contains(&entry.event_type) {
				return false;
			}
		}

		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn make_entry(event_type: AuditEventType, severity: AuditSeverity) -> AuditLogEntry {
		AuditLogEntry::builder(event_type).severity(severity).build()
	}

	#[test]
	fn test_default_config_allows_info_and_above() {
		let config = AuditFilterConfig::default();

		let info_entry = make_entry(AuditEventType::Login, AuditSeverity::Info);
		assert!(config.allows(&info_entry));

		let warning_entry = make_entry(AuditEventType::LoginFailed, AuditSeverity::Warning);
		assert!(config.allows(&warning_entry));

		let debug_entry = make_entry(AuditEventType::Login, AuditSeverity::Debug);
		assert!(!config.allows(&debug_entry));
	}

	#[test]
	fn test_min_severity_filter() {
		let config = AuditFilterConfig {
			min_severity: AuditSeverity::Warning,
			include_events: None,
			exclude_events: None,
		};

		let info_entry = make_entry(AuditEventType::Login, AuditSeverity::Info);
		assert!(!config.allows(&info_entry));

		let warning_entry = make_entry(AuditEventType::LoginFailed, AuditSeverity::Warning);
		assert!(config.allows(&warning_entry));

		let error_entry = make_entry(AuditEventType::AccessDenied, AuditSeverity::Error);
		assert!(config.allows(&error_entry));
	}

	#[test]
	fn test_include_events_whitelist() {
		let config = AuditFilterConfig {
			min_severity: AuditSeverity::Info,
			include_events: Some(vec![AuditEventType::Login, AuditEventType::Logout]),
			exclude_events: None,
		};

		let login_entry = make_entry(AuditEventType::Login, AuditSeverity::Info);
		assert!(config.allows(&login_entry));

		let logout_entry = make_entry(AuditEventType::Logout, AuditSeverity::Info);
		assert!(config.allows(&logout_entry));

		let customer_entry = make_entry(AuditEventType::CustomerCreated, AuditSeverity::Info);
		assert!(!config.allows(&customer_entry));
	}

	#[test]
	fn test_exclude_events_blacklist() {
		let config = AuditFilterConfig {
			min_severity: AuditSeverity::Info,
			include_events: None,
			exclude_events: Some(vec![AuditEventType::Login]),
		};

		let settings_entry = make_entry(AuditEventType::SettingsUpdated, AuditSeverity::Info);
		assert!(config.allows(&settings_entry));

		let login_entry = make_entry(AuditEventType::Login, AuditSeverity::Info);
		assert!(!config.allows(&login_entry));
	}

	#[test]
	fn test_exclude_takes_precedence_over_include() {
		let config = AuditFilterConfig {
			min_severity: AuditSeverity::Info,
			include_events: Some(vec![AuditEventType::Login, AuditEventType::Logout]),
			exclude_events: Some(vec![AuditEventType::Login]),
		};

		let login_entry = make_entry(AuditEventType::Login, AuditSeverity::Info);
		assert!(!config.allows(&login_entry));

		let logout_entry = make_entry(AuditEventType::Logout, AuditSeverity::Info);
		assert!(config.allows(&logout_entry));
	}

	#[test]
	fn test_severity_checked_before_event_type() {
		let config = AuditFilterConfig {
			min_severity: AuditSeverity::Warning,
			include_events: Some(vec![AuditEventType::Login]),
			exclude_events: None,
		};

		let info_login = make_entry(AuditEventType::Login, AuditSeverity::Info);
		assert!(!config.allows(&info_login));

		let warning_login = make_entry(AuditEventType::Login, AuditSeverity::Warning);
		assert!(config.allows(&warning_login));
	}
}
