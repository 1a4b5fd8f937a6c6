// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Analytics repository for dashboard aggregates.
//!
//! Every figure is computed at read time from the live tables. Nothing is
//! cached or materialized, so the summary is always consistent with the
//! rows the other repositories just wrote.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use indexplus_server_auth::CompanyId;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;

/// Aggregate figures for a company's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
	/// Total CRM customers.
	pub customers: i64,
	/// Conversations currently in the open state.
	pub open_conversations: i64,
	/// Total recorded sales.
	pub sales_count: i64,
	/// Sum of all sale amounts, in cents.
	pub revenue_cents: i64,
	/// Messages in either direction over the trailing week.
	pub messages_last_7_days: i64,
}

#[async_trait]
pub trait AnalyticsStore: Send + Sync {
	async fn summary(&self, company_id: &CompanyId) -> Result<AnalyticsSummary, DbError>;
}

/// Repository for analytics aggregation queries.
#[derive(Clone)]
pub struct AnalyticsRepository {
	pool: SqlitePool,
}

impl AnalyticsRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Compute the dashboard summary for a company.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn summary(&self, company_id: &CompanyId) -> Result<AnalyticsSummary, DbError> {
		let company = company_id.to_string();

		let customers: i64 =
			sqlx::query("SELECT COUNT(*) as count FROM customers WHERE company_id = ?")
				.bind(&company)
				.fetch_one(&self.pool)
				.await?
				.get("count");

		let open_conversations: i64 = sqlx::query(
			"SELECT COUNT(*) as count FROM conversations WHERE company_id = ? AND status = 'open'",
		)
		.bind(&company)
		.fetch_one(&self.pool)
		.await?
		.get("count");

		let sales_row = sqlx::query(
			"SELECT COUNT(*) as count, COALESCE(SUM(amount_cents), 0) as total FROM sales WHERE company_id = ?",
		)
		.bind(&company)
		.fetch_one(&self.pool)
		.await?;
		let sales_count: i64 = sales_row.get("count");
		let revenue_cents: i64 = sales_row.get("total");

		let week_ago = (Utc::now() - Duration::days(7)).to_rfc3339();
		let messages_last_7_days: i64 = sqlx::query(
			r#"
			SELECT COUNT(*) as count
			FROM messages m
			JOIN conversations c ON c.id = m.conversation_id
			WHERE c.company_id = ? AND m.created_at >= ?
			"#,
		)
		.bind(&company)
		.bind(week_ago)
		.fetch_one(&self.pool)
		.await?
		.get("count");

		Ok(AnalyticsSummary {
			customers,
			open_conversations,
			sales_count,
			revenue_cents,
			messages_last_7_days,
		})
	}
}

#[async_trait]
impl AnalyticsStore for AnalyticsRepository {
	async fn summary(&self, company_id: &CompanyId) -> Result<AnalyticsSummary, DbError> {
		self.summary(company_id).await
	}
}
