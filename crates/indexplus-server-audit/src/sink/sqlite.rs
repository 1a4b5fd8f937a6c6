// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::AuditSinkError;
use crate::event::AuditLogEntry;
use crate::filter::AuditFilterConfig;
use crate::sink::AuditSink;

pub struct SqliteAuditSink {
	pool: SqlitePool,
	filter: AuditFilterConfig,
	name: String,
}

impl SqliteAuditSink {
	pub fn new(pool: SqlitePool, filter: AuditFilterConfig) -> Self {
		Self {
			pool,
			filter,
			name: "sqlite".to_string(),
		}
	}
}

#[async_trait]
impl AuditSink for SqliteAuditSink {
	fn name(&self) -> &str {
		&self.name
	}

	fn filter(&self) -> &AuditFilterConfig {
		&self.filter
	}

	async fn publish(&self, entry: Arc<AuditLogEntry>) -> Result<(), AuditSinkError> {
		let details_json = serde_json::to_string(&entry.details)
			.map_err(|e| AuditSinkError::Permanent(format!("failed to serialize details: {e}")))?;

		let before_json = entry
			.before
			.as_ref()
			.map(serde_json::to_string)
			.transpose()
			.map_err(|e| {
				AuditSinkError::Permanent(format!("failed to serialize before snapshot: {e}"))
			})?;

		let after_json = entry
			.after
			.as_ref()
			.map(serde_json::to_string)
			.transpose()
			.map_err(|e| {
				AuditSinkError::Permanent(format!("failed to serialize after snapshot: {e}"))
			})?;

		let now = chrono::Utc::now();

		sqlx::query(
			r#"
			INSERT INTO audit_logs (
				id, timestamp, event_type, severity, company_id, actor_user_id,
				entity_type, entity_id, action, before_snapshot, after_snapshot,
				details, created_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(entry.id.to_string())
		.bind(entry.timestamp.to_rfc3339())
		.bind(entry.event_type.to_string())
		.bind(entry.severity.to_string())
		.bind(entry.company_id.as_ref().map(|c| c.to_string()))
		.bind(entry.actor_user_id.as_ref().map(|u| u.to_string()))
		.bind(&entry.entity_type)
		.bind(&entry.entity_id)
		.bind(&entry.action)
		.bind(&before_json)
		.bind(&after_json)
		.bind(&details_json)
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| {
			if is_transient_error(&e) {
				AuditSinkError::Transient(format!("database error: {e}"))
			} else {
				AuditSinkError::Permanent(format!("database error: {e}"))
			}
		})?;

		Ok(())
	}

	async fn health_check(&self) -> Result<(), AuditSinkError> {
		sqlx::query("SELECT 1")
			.execute(&self.pool)
			.await
			.map_err(|e| AuditSinkError::Transient(format!("health check failed: {e}")))?;
		Ok(())
	}
}

fn is_transient_error(e: &sqlx::Error) -> bool {
	match e {
		sqlx::Error::Io(_) => true,
		sqlx::Error::PoolTimedOut => true,
		sqlx::Error::PoolClosed => true,
		sqlx::Error::Database(db_err) => {
			let msg = db_err.message().to_lowercase();
			msg.contains("busy") || msg.contains("locked") || msg.contains("timeout")
		}
		_ => false,
	}
}
