// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database setup for the server.
//!
//! Re-exports the shared pool constructor and runs the SQL migrations
//! embedded from `migrations/`.

use sqlx::sqlite::SqlitePool;

pub use indexplus_server_db::create_pool;

/// Run all database migrations (001-011).
///
/// # Errors
/// Returns the underlying `sqlx::Error` if a migration fails.
///
/// # Note
/// Migrations are idempotent - safe to run multiple times.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
	let m1 = include_str!("../migrations/001_companies.sql");
	execute_statements(pool, m1).await?;

	let m2 = include_str!("../migrations/002_identity.sql");
	execute_statements(pool, m2).await?;

	let m3 = include_str!("../migrations/003_members.sql");
	execute_statements(pool, m3).await?;

	// The provisioning trigger body contains semicolons, so it cannot go
	// through the statement splitter.
	let m4 = include_str!("../migrations/004_member_provisioning.sql");
	execute_triggers(pool, m4).await?;

	let m5 = include_str!("../migrations/005_customers.sql");
	execute_statements(pool, m5).await?;

	let m6 = include_str!("../migrations/006_conversations.sql");
	execute_statements(pool, m6).await?;

	let m7 = include_str!("../migrations/007_sales.sql");
	execute_statements(pool, m7).await?;

	let m8 = include_str!("../migrations/008_flow_templates.sql");
	execute_statements(pool, m8).await?;

	let m9 = include_str!("../migrations/009_channels.sql");
	execute_statements(pool, m9).await?;

	let m10 = include_str!("../migrations/010_payment_submissions.sql");
	execute_statements(pool, m10).await?;

	let m11 = include_str!("../migrations/011_audit_logs.sql");
	execute_statements(pool, m11).await?;

	tracing::debug!("database migrations complete");
	Ok(())
}

async fn execute_statements(pool: &SqlitePool, sql: &str) -> Result<(), sqlx::Error> {
	for stmt in sql.split(';').filter(|s| !s.trim().is_empty()) {
		if let Err(e) = sqlx::query(stmt).execute(pool).await {
			let msg = e.to_string();
			if !msg.contains("already exists") && !msg.contains("duplicate column") {
				return Err(e);
			}
		}
	}
	Ok(())
}

async fn execute_triggers(pool: &SqlitePool, sql: &str) -> Result<(), sqlx::Error> {
	for block in sql.split("END;") {
		let trigger = block.trim();
		if trigger.is_empty() || !trigger.contains("CREATE TRIGGER") {
			continue;
		}
		let full_trigger = format!("{trigger} END;");
		if let Err(e) = sqlx::query(&full_trigger).execute(pool).await {
			let msg = e.to_string();
			if !msg.contains("already exists") {
				return Err(e);
			}
		}
	}
	Ok(())
}
