// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::SqlitePool;

pub async fn create_test_pool() -> SqlitePool {
	SqlitePool::connect(":memory:").await.unwrap()
}

pub async fn create_companies_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS companies (
			id TEXT PRIMARY KEY,
			name TEXT NOT NULL,
			slug TEXT NOT NULL,
			timezone TEXT NOT NULL,
			default_locale TEXT NOT NULL,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_members_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS members (
			user_id TEXT PRIMARY KEY,
			company_id TEXT NOT NULL,
			email TEXT NOT NULL UNIQUE COLLATE NOCASE,
			full_name TEXT NOT NULL,
			role TEXT NOT NULL,
			status TEXT NOT NULL DEFAULT 'active',
			overrides TEXT NOT NULL DEFAULT '{}',
			locale TEXT,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_members_company_id ON members(company_id)")
		.execute(pool)
		.await
		.unwrap();
}

pub async fn create_customers_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS customers (
			id TEXT PRIMARY KEY,
			company_id TEXT NOT NULL,
			name TEXT NOT NULL,
			phone TEXT,
			email TEXT,
			notes TEXT,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_customers_company_id ON customers(company_id)")
		.execute(pool)
		.await
		.unwrap();
}

pub async fn create_conversations_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS conversations (
			id TEXT PRIMARY KEY,
			company_id TEXT NOT NULL,
			customer_id TEXT,
			channel_id TEXT,
			status TEXT NOT NULL DEFAULT 'open',
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();

	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_conversations_company_id ON conversations(company_id)",
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_messages_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS messages (
			id TEXT PRIMARY KEY,
			conversation_id TEXT NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
			direction TEXT NOT NULL,
			body TEXT NOT NULL,
			sent_by TEXT,
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();

	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_messages_conversation_id ON messages(conversation_id)",
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_sales_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS sales (
			id TEXT PRIMARY KEY,
			company_id TEXT NOT NULL,
			customer_id TEXT,
			conversation_id TEXT,
			description TEXT NOT NULL,
			amount_cents INTEGER NOT NULL,
			created_by TEXT,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_sales_company_id ON sales(company_id)")
		.execute(pool)
		.await
		.unwrap();
}

pub async fn create_channels_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS channels (
			id TEXT PRIMARY KEY,
			company_id TEXT NOT NULL,
			kind TEXT NOT NULL,
			display_name TEXT NOT NULL,
			external_id TEXT,
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_flow_templates_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS flow_templates (
			id TEXT PRIMARY KEY,
			company_id TEXT NOT NULL,
			name TEXT NOT NULL,
			definition TEXT NOT NULL,
			enabled INTEGER NOT NULL DEFAULT 1,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_payment_submissions_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS payment_submissions (
			id TEXT PRIMARY KEY,
			company_id TEXT NOT NULL,
			submitted_by TEXT,
			amount_cents INTEGER NOT NULL,
			reference TEXT NOT NULL,
			note TEXT,
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_audit_logs_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS audit_logs (
			id TEXT PRIMARY KEY,
			timestamp TEXT NOT NULL,
			event_type TEXT NOT NULL,
			severity TEXT NOT NULL,
			company_id TEXT,
			actor_user_id TEXT,
			entity_type TEXT,
			entity_id TEXT,
			action TEXT NOT NULL,
			before_snapshot TEXT,
			after_snapshot TEXT,
			details TEXT,
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_logs_company_id ON audit_logs(company_id)")
		.execute(pool)
		.await
		.unwrap();
}
