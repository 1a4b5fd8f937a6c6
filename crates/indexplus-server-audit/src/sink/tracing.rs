// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use async_trait::async_trait;
use tracing::Level;

use super::{AuditSink, AuditSinkError};
use crate::event::{AuditLogEntry, AuditSeverity};
use crate::filter::AuditFilterConfig;

pub struct TracingAuditSink {
	filter: AuditFilterConfig,
}

impl TracingAuditSink {
	pub fn new(filter: AuditFilterConfig) -> Self {
		Self { filter }
	}
}

pub fn severity_to_level(severity: AuditSeverity) -> Level {
	match severity {
		AuditSeverity::Debug => Level::DEBUG,
		AuditSeverity::Info | AuditSeverity::Notice => Level::INFO,
		AuditSeverity::Warning => Level::WARN,
		AuditSeverity::Error | AuditSeverity::Critical => Level::ERROR,
	}
}

#[async_trait]
impl AuditSink for TracingAuditSink {
	fn name(&self) -> &str {
		"tracing"
	}

	fn filter(&self) -> &AuditFilterConfig {
		&self.filter
	}

	async fn publish(&self, entry: Arc<AuditLogEntry>) -> Result<(), AuditSinkError> {
		let level = severity_to_level(entry.severity);

		let event_type = entry.event_type.to_string();
		let severity = entry.severity.to_string();
		let id = entry.id.to_string();
		let timestamp = entry.timestamp.to_rfc3339();
		let action = &entry.action;

		let company_id = entry.company_id.map(|c| c.to_string());
		let actor_user_id = entry.actor_user_id.map(|u| u.to_string());
		let entity_type = entry.entity_type.as_deref();
		let entity_id = entry.entity_id.as_deref();

		let details = if entry.details.is_null() {
			None
		} else {
			Some(entry.details.to_string())
		};

		// tracing levels must be static, so each level gets its own arm.
		match level {
			Level::DEBUG | Level::TRACE => {
				tracing::debug!(
					target: "indexplus_audit",
					event_type,
					severity,
					id,
					timestamp,
					action,
					company_id,
					actor_user_id,
					entity_type,
					entity_id,
					details,
					"audit event"
				);
			}
			Level::INFO => {
				tracing::info!(
					target: "indexplus_audit",
					event_type,
					severity,
					id,
					timestamp,
					action,
					company_id,
					actor_user_id,
					entity_type,
					entity_id,
					details,
					"audit event"
				);
			}
			Level::WARN => {
				tracing::warn!(
					target: "indexplus_audit",
					event_type,
					severity,
					id,
					timestamp,
					action,
					company_id,
					actor_user_id,
					entity_type,
					entity_id,
					details,
					"audit event"
				);
			}
			Level::ERROR => {
				tracing::error!(
					target: "indexplus_audit",
					event_type,
					severity,
					id,
					timestamp,
					action,
					company_id,
					actor_user_id,
					entity_type,
					entity_id,
					details,
					"audit event"
				);
			}
		}

		Ok(())
	}

	async fn health_check(&self) -> Result<(), AuditSinkError> {
		Ok(())
	}
}
