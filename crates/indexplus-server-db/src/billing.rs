// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Payment submission repository for database operations.
//!
//! Submissions are append-only. A company reports an out-of-band payment
//! (bank transfer reference) and the history stays immutable for
//! reconciliation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexplus_server_auth::{CompanyId, PaymentId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;

/// A reported subscription payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSubmission {
	pub id: PaymentId,
	pub company_id: CompanyId,
	pub submitted_by: Option<UserId>,
	/// Amount reported, in cents.
	pub amount_cents: i64,
	/// Bank or processor reference for reconciliation.
	pub reference: String,
	pub note: Option<String>,
	pub created_at: DateTime<Utc>,
}

impl PaymentSubmission {
	/// Creates a submission with a freshly generated ID.
	pub fn new(company_id: CompanyId, amount_cents: i64, reference: impl Into<String>) -> Self {
		Self {
			id: PaymentId::generate(),
			company_id,
			submitted_by: None,
			amount_cents,
			reference: reference.into(),
			note: None,
			created_at: Utc::now(),
		}
	}
}

#[async_trait]
pub trait BillingStore: Send + Sync {
	async fn create_payment(&self, payment: &PaymentSubmission) -> Result<(), DbError>;
	async fn list_payments(&self, company_id: &CompanyId)
		-> Result<Vec<PaymentSubmission>, DbError>;
}

/// Repository for payment submission database operations.
#[derive(Clone)]
pub struct BillingRepository {
	pool: SqlitePool,
}

impl BillingRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Record a payment submission.
	#[tracing::instrument(skip(self, payment), fields(payment_id = %payment.id, company_id = %payment.company_id))]
	pub async fn create_payment(&self, payment: &PaymentSubmission) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO payment_submissions (id, company_id, submitted_by, amount_cents, reference, note, created_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(payment.id.to_string())
		.bind(payment.company_id.to_string())
		.bind(payment.submitted_by.map(|id| id.to_string()))
		.bind(payment.amount_cents)
		.bind(&payment.reference)
		.bind(&payment.note)
		.bind(payment.created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(payment_id = %payment.id, "payment submission recorded");
		Ok(())
	}

	/// List a company's payment submissions, newest first.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn list_payments(
		&self,
		company_id: &CompanyId,
	) -> Result<Vec<PaymentSubmission>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, company_id, submitted_by, amount_cents, reference, note, created_at
			FROM payment_submissions
			WHERE company_id = ?
			ORDER BY created_at DESC, id ASC
			"#,
		)
		.bind(company_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_payment(r)).collect()
	}

	fn row_to_payment(&self, row: &sqlx::sqlite::SqliteRow) -> Result<PaymentSubmission, DbError> {
		let id_str: String = row.get("id");
		let id = Uuid::parse_str(&id_str)
			.map_err(|e| DbError::Internal(format!("Invalid payment ID: {e}")))?;

		let company_id_str: String = row.get("company_id");
		let company_id = Uuid::parse_str(&company_id_str)
			.map_err(|e| DbError::Internal(format!("Invalid payment company_id: {e}")))?;

		let submitted_by: Option<String> = row.get("submitted_by");
		let submitted_by = submitted_by
			.map(|s| {
				Uuid::parse_str(&s)
					.map(UserId::new)
					.map_err(|e| DbError::Internal(format!("Invalid payment submitted_by: {e}")))
			})
			.transpose()?;

		let created_at_str: String = row.get("created_at");
		let created_at = DateTime::parse_from_rfc3339(&created_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid created_at: {e}")))?
			.with_timezone(&Utc);

		Ok(PaymentSubmission {
			id: PaymentId::new(id),
			company_id: CompanyId::new(company_id),
			submitted_by,
			amount_cents: row.get("amount_cents"),
			reference: row.get("reference"),
			note: row.get("note"),
			created_at,
		})
	}
}

#[async_trait]
impl BillingStore for BillingRepository {
	async fn create_payment(&self, payment: &PaymentSubmission) -> Result<(), DbError> {
		self.create_payment(payment).await
	}

	async fn list_payments(
		&self,
		company_id: &CompanyId,
	) -> Result<Vec<PaymentSubmission>, DbError> {
		self.list_payments(company_id).await
	}
}
