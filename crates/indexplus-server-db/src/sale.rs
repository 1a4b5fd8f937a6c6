// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sale repository for database operations.
//!
//! Amounts are stored as integer cents. Revenue aggregation sums the raw
//! column, so no floating point enters the books.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexplus_server_auth::{CompanyId, ConversationId, CustomerId, SaleId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;

/// A recorded sale, optionally linked to the customer and conversation it
/// came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
	pub id: SaleId,
	pub company_id: CompanyId,
	pub customer_id: Option<CustomerId>,
	/// Set when the sale was converted out of a conversation.
	pub conversation_id: Option<ConversationId>,
	pub description: String,
	/// Amount in the company's currency, in cents.
	pub amount_cents: i64,
	pub created_by: Option<UserId>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Sale {
	/// Creates a sale with a freshly generated ID and no linked records.
	pub fn new(company_id: CompanyId, description: impl Into<String>, amount_cents: i64) -> Self {
		let now = Utc::now();
		Self {
			id: SaleId::generate(),
			company_id,
			customer_id: None,
			conversation_id: None,
			description: description.into(),
			amount_cents,
			created_by: None,
			created_at: now,
			updated_at: now,
		}
	}
}

#[async_trait]
pub trait SaleStore: Send + Sync {
	async fn create_sale(&self, sale: &Sale) -> Result<(), DbError>;
	async fn get_sale(&self, id: &SaleId, company_id: &CompanyId)
		-> Result<Option<Sale>, DbError>;
	async fn list_sales(&self, company_id: &CompanyId) -> Result<Vec<Sale>, DbError>;
	async fn update_sale(&self, sale: &Sale) -> Result<(), DbError>;
	async fn delete_sale(&self, id: &SaleId, company_id: &CompanyId) -> Result<bool, DbError>;
	async fn count_sales(&self, company_id: &CompanyId) -> Result<i64, DbError>;
	async fn sum_revenue_cents(&self, company_id: &CompanyId) -> Result<i64, DbError>;
}

/// Repository for sale database operations.
#[derive(Clone)]
pub struct SaleRepository {
	pool: SqlitePool,
}

impl SaleRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a new sale record.
	#[tracing::instrument(skip(self, sale), fields(sale_id = %sale.id, company_id = %sale.company_id))]
	pub async fn create_sale(&self, sale: &Sale) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO sales (id, company_id, customer_id, conversation_id, description, amount_cents, created_by, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(sale.id.to_string())
		.bind(sale.company_id.to_string())
		.bind(sale.customer_id.map(|id| id.to_string()))
		.bind(sale.conversation_id.map(|id| id.to_string()))
		.bind(&sale.description)
		.bind(sale.amount_cents)
		.bind(sale.created_by.map(|id| id.to_string()))
		.bind(sale.created_at.to_rfc3339())
		.bind(sale.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(sale_id = %sale.id, "sale created");
		Ok(())
	}

	/// Get a sale by ID within a company.
	///
	/// # Returns
	/// `None` if the sale does not exist or belongs to another company.
	#[tracing::instrument(skip(self), fields(sale_id = %id, company_id = %company_id))]
	pub async fn get_sale(
		&self,
		id: &SaleId,
		company_id: &CompanyId,
	) -> Result<Option<Sale>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, company_id, customer_id, conversation_id, description, amount_cents, created_by, created_at, updated_at
			FROM sales
			WHERE id = ? AND company_id = ?
			"#,
		)
		.bind(id.to_string())
		.bind(company_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_sale(&r)).transpose()
	}

	/// List all sales of a company, newest first.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn list_sales(&self, company_id: &CompanyId) -> Result<Vec<Sale>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, company_id, customer_id, conversation_id, description, amount_cents, created_by, created_at, updated_at
			FROM sales
			WHERE company_id = ?
			ORDER BY created_at DESC, id ASC
			"#,
		)
		.bind(company_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_sale(r)).collect()
	}

	/// Update a sale's description, amount, and customer link.
	///
	/// The conversation link and creator are fixed at creation time.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if no sale matches the ID and company.
	#[tracing::instrument(skip(self, sale), fields(sale_id = %sale.id, company_id = %sale.company_id))]
	pub async fn update_sale(&self, sale: &Sale) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			UPDATE sales
			SET customer_id = ?, description = ?, amount_cents = ?, updated_at = ?
			WHERE id = ? AND company_id = ?
			"#,
		)
		.bind(sale.customer_id.map(|id| id.to_string()))
		.bind(&sale.description)
		.bind(sale.amount_cents)
		.bind(Utc::now().to_rfc3339())
		.bind(sale.id.to_string())
		.bind(sale.company_id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("Sale not found: {}", sale.id)));
		}

		tracing::debug!(sale_id = %sale.id, "sale updated");
		Ok(())
	}

	/// Delete a sale record.
	///
	/// # Returns
	/// `true` if a row was deleted, `false` if no sale matched.
	#[tracing::instrument(skip(self), fields(sale_id = %id, company_id = %company_id))]
	pub async fn delete_sale(&self, id: &SaleId, company_id: &CompanyId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM sales WHERE id = ? AND company_id = ?")
			.bind(id.to_string())
			.bind(company_id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Count the sales of a company.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn count_sales(&self, company_id: &CompanyId) -> Result<i64, DbError> {
		let row = sqlx::query("SELECT COUNT(*) as count FROM sales WHERE company_id = ?")
			.bind(company_id.to_string())
			.fetch_one(&self.pool)
			.await?;

		Ok(row.get("count"))
	}

	/// Sum a company's revenue in cents across all sales.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn sum_revenue_cents(&self, company_id: &CompanyId) -> Result<i64, DbError> {
		let row = sqlx::query(
			"SELECT COALESCE(SUM(amount_cents), 0) as total FROM sales WHERE company_id = ?",
		)
		.bind(company_id.to_string())
		.fetch_one(&self.pool)
		.await?;

		Ok(row.get("total"))
	}

	fn row_to_sale(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Sale, DbError> {
		let id_str: String = row.get("id");
		let id = Uuid::parse_str(&id_str)
			.map_err(|e| DbError::Internal(format!("Invalid sale ID: {e}")))?;

		let company_id_str: String = row.get("company_id");
		let company_id = Uuid::parse_str(&company_id_str)
			.map_err(|e| DbError::Internal(format!("Invalid sale company_id: {e}")))?;

		let customer_id: Option<String> = row.get("customer_id");
		let customer_id = customer_id
			.map(|s| {
				Uuid::parse_str(&s)
					.map(CustomerId::new)
					.map_err(|e| DbError::Internal(format!("Invalid sale customer_id: {e}")))
			})
			.transpose()?;

		let conversation_id: Option<String> = row.get("conversation_id");
		let conversation_id = conversation_id
			.map(|s| {
				Uuid::parse_str(&s)
					.map(ConversationId::new)
					.map_err(|e| DbError::Internal(format!("Invalid sale conversation_id: {e}")))
			})
			.transpose()?;

		let created_by: Option<String> = row.get("created_by");
		let created_by = created_by
			.map(|s| {
				Uuid::parse_str(&s)
					.map(UserId::new)
					.map_err(|e| DbError::Internal(format!("Invalid sale created_by: {e}")))
			})
			.transpose()?;

		let created_at_str: String = row.get("created_at");
		let created_at = DateTime::parse_from_rfc3339(&created_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid created_at: {e}")))?
			.with_timezone(&Utc);

		let updated_at_str: String = row.get("updated_at");
		let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid updated_at: {e}")))?
			.with_timezone(&Utc);

		Ok(Sale {
			id: SaleId::new(id),
			company_id: CompanyId::new(company_id),
			customer_id,
			conversation_id,
			description: row.get("description"),
			amount_cents: row.get("amount_cents"),
			created_by,
			created_at,
			updated_at,
		})
	}
}

#[async_trait]
impl SaleStore for SaleRepository {
	async fn create_sale(&self, sale: &Sale) -> Result<(), DbError> {
		self.create_sale(sale).await
	}

	async fn get_sale(
		&self,
		id: &SaleId,
		company_id: &CompanyId,
	) -> Result<Option<Sale>, DbError> {
		self.get_sale(id, company_id).await
	}

	async fn list_sales(&self, company_id: &CompanyId) -> Result<Vec<Sale>, DbError> {
		self.list_sales(company_id).await
	}

	async fn update_sale(&self, sale: &Sale) -> Result<(), DbError> {
		self.update_sale(sale).await
	}

	async fn delete_sale(&self, id: &SaleId, company_id: &CompanyId) -> Result<bool, DbError> {
		self.delete_sale(id, company_id).await
	}

	async fn count_sales(&self, company_id: &CompanyId) -> Result<i64, DbError> {
		self.count_sales(company_id).await
	}

	async fn sum_revenue_cents(&self, company_id: &CompanyId) -> Result<i64, DbError> {
		self.sum_revenue_cents(company_id).await
	}
}
