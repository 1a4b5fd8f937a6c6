// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Company workspace repository for database operations.
//!
//! Companies are the tenancy boundary. A row is created once at signup and
//! afterwards only its settings (name, timezone, default locale) change.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexplus_server_auth::{Company, CompanyId};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;

#[async_trait]
pub trait CompanyStore: Send + Sync {
	async fn create_company(&self, company: &Company) -> Result<(), DbError>;
	async fn get_company(&self, id: &CompanyId) -> Result<Option<Company>, DbError>;
	async fn update_company(&self, company: &Company) -> Result<(), DbError>;
}

/// Repository for company database operations.
#[derive(Clone)]
pub struct CompanyRepository {
	pool: SqlitePool,
}

impl CompanyRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a new company workspace.
	#[tracing::instrument(skip(self, company), fields(company_id = %company.id, slug = %company.slug))]
	pub async fn create_company(&self, company: &Company) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO companies (id, name, slug, timezone, default_locale, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(company.id.to_string())
		.bind(&company.name)
		.bind(&company.slug)
		.bind(&company.timezone)
		.bind(&company.default_locale)
		.bind(company.created_at.to_rfc3339())
		.bind(company.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(company_id = %company.id, "company created");
		Ok(())
	}

	/// Get a company by ID.
	#[tracing::instrument(skip(self), fields(company_id = %id))]
	pub async fn get_company(&self, id: &CompanyId) -> Result<Option<Company>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, slug, timezone, default_locale, created_at, updated_at
			FROM companies
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_company(&r)).transpose()
	}

	/// Update a company's settings (name, slug, timezone, default locale).
	///
	/// # Errors
	/// Returns `DbError::NotFound` if the company does not exist.
	#[tracing::instrument(skip(self, company), fields(company_id = %company.id))]
	pub async fn update_company(&self, company: &Company) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();

		let result = sqlx::query(
			r#"
			UPDATE companies
			SET name = ?, slug = ?, timezone = ?, default_locale = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&company.name)
		.bind(&company.slug)
		.bind(&company.timezone)
		.bind(&company.default_locale)
		.bind(now)
		.bind(company.id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("Company not found: {}", company.id)));
		}

		tracing::debug!(company_id = %company.id, "company updated");
		Ok(())
	}

	fn row_to_company(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Company, DbError> {
		let id_str: String = row.get("id");
		let id = Uuid::parse_str(&id_str)
			.map_err(|e| DbError::Internal(format!("Invalid company ID: {e}")))?;

		let created_at_str: String = row.get("created_at");
		let created_at = DateTime::parse_from_rfc3339(&created_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid created_at: {e}")))?
			.with_timezone(&Utc);

		let updated_at_str: String = row.get("updated_at");
		let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid updated_at: {e}")))?
			.with_timezone(&Utc);

		Ok(Company {
			id: CompanyId::new(id),
			name: row.get("name"),
			slug: row.get("slug"),
			timezone: row.get("timezone"),
			default_locale: row.get("default_locale"),
			created_at,
			updated_at,
		})
	}
}

#[async_trait]
impl CompanyStore for CompanyRepository {
	async fn create_company(&self, company: &Company) -> Result<(), DbError> {
		self.create_company(company).await
	}

	async fn get_company(&self, id: &CompanyId) -> Result<Option<Company>, DbError> {
		self.get_company(id).await
	}

	async fn update_company(&self, company: &Company) -> Result<(), DbError> {
		self.update_company(company).await
	}
}
