// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read-side queries over the audit trail.
//!
//! Writes go through the audit pipeline's SQLite sink; this repository only
//! queries and prunes. Rows that no longer parse (an event type retired from
//! the enum, a corrupted timestamp) are skipped rather than failing the whole
//! page, since the audit trail must stay readable even across schema drift.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexplus_server_audit::{AuditEventType, AuditLogEntry, AuditSeverity};
use indexplus_server_auth::{CompanyId, UserId};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::Result;

#[async_trait]
pub trait AuditStore: Send + Sync {
	#[allow(clippy::too_many_arguments)]
	async fn query_logs(
		&self,
		company_id: &CompanyId,
		event_type: Option<&str>,
		actor_id: Option<&str>,
		entity_type: Option<&str>,
		entity_id: Option<&str>,
		from: Option<DateTime<Utc>>,
		to: Option<DateTime<Utc>>,
		limit: Option<i64>,
		offset: Option<i64>,
	) -> Result<(Vec<AuditLogEntry>, i64)>;

	async fn prune_logs_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}

pub struct AuditRepository {
	pool: SqlitePool,
}

impl AuditRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Query a company's audit trail, newest first.
	///
	/// All filters are optional; the company scope is not. `limit` defaults
	/// to 50 and is capped at 1000.
	#[allow(clippy::too_many_arguments)]
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn query_logs(
		&self,
		company_id: &CompanyId,
		event_type: Option<&str>,
		actor_id: Option<&str>,
		entity_type: Option<&str>,
		entity_id: Option<&str>,
		from: Option<DateTime<Utc>>,
		to: Option<DateTime<Utc>>,
		limit: Option<i64>,
		offset: Option<i64>,
	) -> Result<(Vec<AuditLogEntry>, i64)> {
		let limit = limit.unwrap_or(50).min(1000);
		let offset = offset.unwrap_or(0);
		let company = company_id.to_string();

		let mut conditions = vec!["company_id = ?".to_string()];
		if event_type.is_some() {
			conditions.push("event_type = ?".to_string());
		}
		if actor_id.is_some() {
			conditions.push("actor_user_id = ?".to_string());
		}
		if entity_type.is_some() {
			conditions.push("entity_type = ?".to_string());
		}
		if entity_id.is_some() {
			conditions.push("entity_id = ?".to_string());
		}
		if from.is_some() {
			conditions.push("timestamp >= ?".to_string());
		}
		if to.is_some() {
			conditions.push("timestamp <= ?".to_string());
		}

		let where_clause = conditions.join(" AND ");

		let count_sql = format!(
			"SELECT COUNT(*) as cnt FROM audit_logs WHERE {}",
			where_clause
		);
		let mut count_query = sqlx::query(&count_sql).bind(&company);
		if let Some(v) = event_type {
			count_query = count_query.bind(v);
		}
		if let Some(v) = actor_id {
			count_query = count_query.bind(v);
		}
		if let Some(v) = entity_type {
			count_query = count_query.bind(v);
		}
		if let Some(v) = entity_id {
			count_query = count_query.bind(v);
		}
		if let Some(v) = from {
			count_query = count_query.bind(v.to_rfc3339());
		}
		if let Some(v) = to {
			count_query = count_query.bind(v.to_rfc3339());
		}

		let count_row = count_query.fetch_one(&self.pool).await?;
		let total: i64 = count_row.get("cnt");

		let data_sql = format!(
			"SELECT id, timestamp, event_type, severity, company_id, actor_user_id, \
			 entity_type, entity_id, action, before_snapshot, after_snapshot, details \
			 FROM audit_logs WHERE {} ORDER BY timestamp DESC LIMIT ? OFFSET ?",
			where_clause
		);
		let mut data_query = sqlx::query(&data_sql).bind(&company);
		if let Some(v) = event_type {
			data_query = data_query.bind(v);
		}
		if let Some(v) = actor_id {
			data_query = data_query.bind(v);
		}
		if let Some(v) = entity_type {
			data_query = data_query.bind(v);
		}
		if let Some(v) = entity_id {
			data_query = data_query.bind(v);
		}
		if let Some(v) = from {
			data_query = data_query.bind(v.to_rfc3339());
		}
		if let Some(v) = to {
			data_query = data_query.bind(v.to_rfc3339());
		}
		data_query = data_query.bind(limit).bind(offset);

		let rows = data_query.fetch_all(&self.pool).await?;
		let logs: Vec<AuditLogEntry> = rows
			.into_iter()
			.filter_map(|row| {
				let id_str: String = row.get("id");
				let id = Uuid::parse_str(&id_str).ok()?;

				let ts_str: String = row.get("timestamp");
				let timestamp = DateTime::parse_from_rfc3339(&ts_str)
					.map(|dt| dt.with_timezone(&Utc))
					.unwrap_or_else(|_| Utc::now());

				let event_type_str: String = row.get("event_type");
				let event_type = parse_event_type(&event_type_str)?;

				let severity_str: String = row.get("severity");
				let severity =
					parse_severity(&severity_str).unwrap_or_else(|| event_type.default_severity());

				let company_id: Option<String> = row.get("company_id");
				let actor_user_id: Option<String> = row.get("actor_user_id");
				let before_str: Option<String> = row.get("before_snapshot");
				let after_str: Option<String> = row.get("after_snapshot");
				let details_str: Option<String> = row.get("details");

				Some(AuditLogEntry {
					id,
					timestamp,
					event_type,
					severity,
					company_id: company_id
						.and_then(|s| Uuid::parse_str(&s).ok())
						.map(CompanyId::new),
					actor_user_id: actor_user_id
						.and_then(|s| Uuid::parse_str(&s).ok())
						.map(UserId::new),
					entity_type: row.get("entity_type"),
					entity_id: row.get("entity_id"),
					action: row.get("action"),
					before: before_str.and_then(|s| serde_json::from_str(&s).ok()),
					after: after_str.and_then(|s| serde_json::from_str(&s).ok()),
					details: details_str
						.and_then(|s| serde_json::from_str(&s).ok())
						.unwrap_or(serde_json::Value::Null),
				})
			})
			.collect();

		Ok((logs, total))
	}

	/// Delete audit rows older than the cutoff across all companies.
	///
	/// # Returns
	/// The number of rows removed.
	#[tracing::instrument(skip(self))]
	pub async fn prune_logs_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
		let result = sqlx::query("DELETE FROM audit_logs WHERE timestamp < ?")
			.bind(cutoff.to_rfc3339())
			.execute(&self.pool)
			.await?;

		let pruned = result.rows_affected();
		if pruned > 0 {
			tracing::debug!(pruned, "audit logs pruned");
		}
		Ok(pruned)
	}
}

#[async_trait]
impl AuditStore for AuditRepository {
	async fn query_logs(
		&self,
		company_id: &CompanyId,
		event_type: Option<&str>,
		actor_id: Option<&str>,
		entity_type: Option<&str>,
		entity_id: Option<&str>,
		from: Option<DateTime<Utc>>,
		to: Option<DateTime<Utc>>,
		limit: Option<i64>,
		offset: Option<i64>,
	) -> Result<(Vec<AuditLogEntry>, i64)> {
		self
			.query_logs(
				company_id,
				event_type,
				actor_id,
				entity_type,
				entity_id,
				from,
				to,
				limit,
				offset,
			)
			.await
	}

	async fn prune_logs_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
		self.prune_logs_older_than(cutoff).await
	}
}

fn parse_event_type(s: &str) -> Option<AuditEventType> {
	match s {
		"signup" => Some(AuditEventType::Signup),
		"login" => Some(AuditEventType::Login),
		"login_failed" => Some(AuditEventType::LoginFailed),
		"logout" => Some(AuditEventType::Logout),
		"access_denied" => Some(AuditEventType::AccessDenied),
		"member_created" => Some(AuditEventType::MemberCreated),
		"member_updated" => Some(AuditEventType::MemberUpdated),
		"member_deleted" => Some(AuditEventType::MemberDeleted),
		"member_password_reset" => Some(AuditEventType::MemberPasswordReset),
		"customer_created" => Some(AuditEventType::CustomerCreated),
		"customer_updated" => Some(AuditEventType::CustomerUpdated),
		"customer_deleted" => Some(AuditEventType::CustomerDeleted),
		"sale_created" => Some(AuditEventType::SaleCreated),
		"sale_updated" => Some(AuditEventType::SaleUpdated),
		"sale_deleted" => Some(AuditEventType::SaleDeleted),
		"conversation_converted" => Some(AuditEventType::ConversationConverted),
		"template_created" => Some(AuditEventType::TemplateCreated),
		"template_updated" => Some(AuditEventType::TemplateUpdated),
		"template_deleted" => Some(AuditEventType::TemplateDeleted),
		"channel_connected" => Some(AuditEventType::ChannelConnected),
		"channel_removed" => Some(AuditEventType::ChannelRemoved),
		"settings_updated" => Some(AuditEventType::SettingsUpdated),
		"payment_submitted" => Some(AuditEventType::PaymentSubmitted),
		_ => None,
	}
}

fn parse_severity(s: &str) -> Option<AuditSeverity> {
	match s {
		"debug" => Some(AuditSeverity::Debug),
		"info" => Some(AuditSeverity::Info),
		"notice" => Some(AuditSeverity::Notice),
		"warning" => Some(AuditSeverity::Warning),
		"error" => Some(AuditSeverity::Error),
		"critical" => Some(AuditSeverity::Critical),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{create_audit_logs_table, create_test_pool};
	use chrono::Duration;
	use proptest::prelude::*;

	const ALL_EVENT_TYPES: [AuditEventType; 23] = [
		AuditEventType::Signup,
		AuditEventType::Login,
		AuditEventType::LoginFailed,
		AuditEventType::Logout,
		AuditEventType::AccessDenied,
		AuditEventType::MemberCreated,
		AuditEventType::MemberUpdated,
		AuditEventType::MemberDeleted,
		AuditEventType::MemberPasswordReset,
		AuditEventType::CustomerCreated,
		AuditEventType::CustomerUpdated,
		AuditEventType::CustomerDeleted,
		AuditEventType::SaleCreated,
		AuditEventType::SaleUpdated,
		AuditEventType::SaleDeleted,
		AuditEventType::ConversationConverted,
		AuditEventType::TemplateCreated,
		AuditEventType::TemplateUpdated,
		AuditEventType::TemplateDeleted,
		AuditEventType::ChannelConnected,
		AuditEventType::ChannelRemoved,
		AuditEventType::SettingsUpdated,
		AuditEventType::PaymentSubmitted,
	];

	#[test]
	fn test_every_event_type_parses_back_from_display() {
		for event_type in ALL_EVENT_TYPES {
			assert_eq!(
				parse_event_type(&event_type.to_string()),
				Some(event_type),
				"no parse arm for {event_type}"
			);
		}
	}

	#[test]
	fn test_every_severity_parses_back_from_display() {
		for severity in AuditSeverity::all() {
			assert_eq!(parse_severity(&severity.to_string()), Some(*severity));
		}
	}

	proptest! {
		// parse_event_type is a hand-maintained inverse of Display; if it
		// accepts a string, displaying the result must give the string back.
		#[test]
		fn prop_parsed_event_type_displays_back_to_input(s in "[a-z_]{1,32}") {
			if let Some(event_type) = parse_event_type(&s) {
				prop_assert_eq!(event_type.to_string(), s);
			}
		}

		#[test]
		fn prop_parsed_severity_displays_back_to_input(s in "[a-z]{1,16}") {
			if let Some(severity) = parse_severity(&s) {
				prop_assert_eq!(severity.to_string(), s);
			}
		}
	}

	async fn create_audit_test_pool() -> SqlitePool {
		let pool = create_test_pool().await;
		create_audit_logs_table(&pool).await;
		pool
	}

	#[allow(clippy::too_many_arguments)]
	async fn insert_audit_log(
		pool: &SqlitePool,
		id: &str,
		timestamp: DateTime<Utc>,
		event_type: &str,
		company_id: &CompanyId,
		actor_user_id: Option<&str>,
		entity_type: Option<&str>,
		entity_id: Option<&str>,
	) {
		let now = Utc::now().to_rfc3339();
		sqlx::query(
			r#"
			INSERT INTO audit_logs (id, timestamp, event_type, severity, company_id, actor_user_id, entity_type, entity_id, action, details, created_at)
			VALUES (?, ?, ?, 'info', ?, ?, ?, ?, 'test_action', '{}', ?)
			"#,
		)
		.bind(id)
		.bind(timestamp.to_rfc3339())
		.bind(event_type)
		.bind(company_id.to_string())
		.bind(actor_user_id)
		.bind(entity_type)
		.bind(entity_id)
		.bind(now)
		.execute(pool)
		.await
		.unwrap();
	}

	#[tokio::test]
	async fn test_query_logs_empty() {
		let pool = create_audit_test_pool().await;
		let repo = AuditRepository::new(pool);

		let (logs, count) = repo
			.query_logs(
				&CompanyId::generate(),
				None,
				None,
				None,
				None,
				None,
				None,
				None,
				None,
			)
			.await
			.unwrap();

		assert!(logs.is_empty());
		assert_eq!(count, 0);
	}

	#[tokio::test]
	async fn test_query_logs_with_data() {
		let pool = create_audit_test_pool().await;
		let repo = AuditRepository::new(pool.clone());

		let company_id = CompanyId::generate();
		let user_id = Uuid::new_v4().to_string();
		let now = Utc::now();

		insert_audit_log(
			&pool,
			&Uuid::new_v4().to_string(),
			now,
			"login",
			&company_id,
			Some(&user_id),
			Some("session"),
			Some("session-123"),
		)
		.await;

		insert_audit_log(
			&pool,
			&Uuid::new_v4().to_string(),
			now - Duration::minutes(5),
			"logout",
			&company_id,
			Some(&user_id),
			Some("session"),
			Some("session-456"),
		)
		.await;

		let (logs, count) = repo
			.query_logs(&company_id, None, None, None, None, None, None, None, None)
			.await
			.unwrap();

		assert_eq!(logs.len(), 2);
		assert_eq!(count, 2);
		assert_eq!(logs[0].event_type, AuditEventType::Login);
		assert_eq!(logs[1].event_type, AuditEventType::Logout);
	}

	#[tokio::test]
	async fn test_query_logs_scoped_to_company() {
		let pool = create_audit_test_pool().await;
		let repo = AuditRepository::new(pool.clone());

		let company_id = CompanyId::generate();
		let other_company = CompanyId::generate();
		let now = Utc::now();

		insert_audit_log(
			&pool,
			&Uuid::new_v4().to_string(),
			now,
			"login",
			&company_id,
			None,
			None,
			None,
		)
		.await;
		insert_audit_log(
			&pool,
			&Uuid::new_v4().to_string(),
			now,
			"login",
			&other_company,
			None,
			None,
			None,
		)
		.await;

		let (logs, count) = repo
			.query_logs(&company_id, None, None, None, None, None, None, None, None)
			.await
			.unwrap();

		assert_eq!(logs.len(), 1);
		assert_eq!(count, 1);
		assert_eq!(logs[0].company_id, Some(company_id));
	}

	#[tokio::test]
	async fn test_query_logs_with_filters() {
		let pool = create_audit_test_pool().await;
		let repo = AuditRepository::new(pool.clone());

		let company_id = CompanyId::generate();
		let user1 = Uuid::new_v4().to_string();
		let user2 = Uuid::new_v4().to_string();
		let now = Utc::now();

		insert_audit_log(
			&pool,
			&Uuid::new_v4().to_string(),
			now,
			"login",
			&company_id,
			Some(&user1),
			Some("session"),
			Some("s1"),
		)
		.await;

		insert_audit_log(
			&pool,
			&Uuid::new_v4().to_string(),
			now - Duration::hours(1),
			"logout",
			&company_id,
			Some(&user1),
			Some("session"),
			Some("s2"),
		)
		.await;

		insert_audit_log(
			&pool,
			&Uuid::new_v4().to_string(),
			now - Duration::hours(2),
			"customer_created",
			&company_id,
			Some(&user2),
			Some("customer"),
			Some("c1"),
		)
		.await;

		let (logs, count) = repo
			.query_logs(
				&company_id,
				Some("login"),
				None,
				None,
				None,
				None,
				None,
				None,
				None,
			)
			.await
			.unwrap();
		assert_eq!(logs.len(), 1);
		assert_eq!(count, 1);
		assert_eq!(logs[0].event_type, AuditEventType::Login);

		let (logs, count) = repo
			.query_logs(
				&company_id,
				None,
				Some(&user1),
				None,
				None,
				None,
				None,
				None,
				None,
			)
			.await
			.unwrap();
		assert_eq!(logs.len(), 2);
		assert_eq!(count, 2);

		let from = now - Duration::minutes(30);
		let (logs, count) = repo
			.query_logs(
				&company_id,
				None,
				None,
				None,
				None,
				Some(from),
				None,
				None,
				None,
			)
			.await
			.unwrap();
		assert_eq!(logs.len(), 1);
		assert_eq!(count, 1);
		assert_eq!(logs[0].event_type, AuditEventType::Login);

		let (logs, count) = repo
			.query_logs(
				&company_id,
				None,
				None,
				Some("customer"),
				None,
				None,
				None,
				None,
				None,
			)
			.await
			.unwrap();
		assert_eq!(logs.len(), 1);
		assert_eq!(count, 1);
		assert_eq!(logs[0].event_type, AuditEventType::CustomerCreated);
	}

	#[tokio::test]
	async fn test_query_logs_pagination() {
		let pool = create_audit_test_pool().await;
		let repo = AuditRepository::new(pool.clone());

		let company_id = CompanyId::generate();
		let user_id = Uuid::new_v4().to_string();
		let now = Utc::now();

		for i in 0..5 {
			insert_audit_log(
				&pool,
				&Uuid::new_v4().to_string(),
				now - Duration::minutes(i),
				"login",
				&company_id,
				Some(&user_id),
				None,
				None,
			)
			.await;
		}

		let (logs, count) = repo
			.query_logs(
				&company_id,
				None,
				None,
				None,
				None,
				None,
				None,
				Some(2),
				None,
			)
			.await
			.unwrap();
		assert_eq!(logs.len(), 2);
		assert_eq!(count, 5);

		let (logs, _) = repo
			.query_logs(
				&company_id,
				None,
				None,
				None,
				None,
				None,
				None,
				Some(2),
				Some(4),
			)
			.await
			.unwrap();
		assert_eq!(logs.len(), 1);
	}

	#[tokio::test]
	async fn test_unknown_event_type_rows_are_skipped() {
		let pool = create_audit_test_pool().await;
		let repo = AuditRepository::new(pool.clone());

		let company_id = CompanyId::generate();
		insert_audit_log(
			&pool,
			&Uuid::new_v4().to_string(),
			Utc::now(),
			"retired_event",
			&company_id,
			None,
			None,
			None,
		)
		.await;
		insert_audit_log(
			&pool,
			&Uuid::new_v4().to_string(),
			Utc::now(),
			"login",
			&company_id,
			None,
			None,
			None,
		)
		.await;

		let (logs, count) = repo
			.query_logs(&company_id, None, None, None, None, None, None, None, None)
			.await
			.unwrap();

		// The count reflects storage; the page drops the unparseable row.
		assert_eq!(count, 2);
		assert_eq!(logs.len(), 1);
		assert_eq!(logs[0].event_type, AuditEventType::Login);
	}

	#[tokio::test]
	async fn test_prune_logs_older_than() {
		let pool = create_audit_test_pool().await;
		let repo = AuditRepository::new(pool.clone());

		let company_id = CompanyId::generate();
		let now = Utc::now();

		insert_audit_log(
			&pool,
			&Uuid::new_v4().to_string(),
			now - Duration::days(120),
			"login",
			&company_id,
			None,
			None,
			None,
		)
		.await;
		insert_audit_log(
			&pool,
			&Uuid::new_v4().to_string(),
			now,
			"login",
			&company_id,
			None,
			None,
			None,
		)
		.await;

		let cutoff = now - Duration::days(90);
		let pruned = repo.prune_logs_older_than(cutoff).await.unwrap();
		assert_eq!(pruned, 1);

		let (logs, count) = repo
			.query_logs(&company_id, None, None, None, None, None, None, None, None)
			.await
			.unwrap();
		assert_eq!(count, 1);
		assert_eq!(logs.len(), 1);

		assert_eq!(repo.prune_logs_older_than(cutoff).await.unwrap(), 0);
	}
}
