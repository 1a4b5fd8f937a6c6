// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Customer (CRM) repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexplus_server_auth::{CompanyId, CustomerId};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;

/// A customer record in a company's CRM list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
	pub id: CustomerId,
	pub company_id: CompanyId,
	/// Display name, the only required field.
	pub name: String,
	pub phone: Option<String>,
	pub email: Option<String>,
	/// Free-form notes kept by agents.
	pub notes: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Customer {
	/// Creates a customer with a freshly generated ID and empty contact fields.
	pub fn new(company_id: CompanyId, name: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: CustomerId::generate(),
			company_id,
			name: name.into(),
			phone: None,
			email: None,
			notes: None,
			created_at: now,
			updated_at: now,
		}
	}
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
	async fn create_customer(&self, customer: &Customer) -> Result<(), DbError>;
	async fn get_customer(
		&self,
		id: &CustomerId,
		company_id: &CompanyId,
	) -> Result<Option<Customer>, DbError>;
	async fn list_customers(&self, company_id: &CompanyId) -> Result<Vec<Customer>, DbError>;
	async fn update_customer(&self, customer: &Customer) -> Result<(), DbError>;
	async fn delete_customer(&self, id: &CustomerId, company_id: &CompanyId)
		-> Result<bool, DbError>;
	async fn count_customers(&self, company_id: &CompanyId) -> Result<i64, DbError>;
}

/// Repository for customer database operations.
#[derive(Clone)]
pub struct CustomerRepository {
	pool: SqlitePool,
}

impl CustomerRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a new customer record.
	#[tracing::instrument(skip(self, customer), fields(customer_id = %customer.id, company_id = %customer.company_id))]
	pub async fn create_customer(&self, customer: &Customer) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO customers (id, company_id, name, phone, email, notes, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(customer.id.to_string())
		.bind(customer.company_id.to_string())
		.bind(&customer.name)
		.bind(&customer.phone)
		.bind(&customer.email)
		.bind(&customer.notes)
		.bind(customer.created_at.to_rfc3339())
		.bind(customer.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(customer_id = %customer.id, "customer created");
		Ok(())
	}

	/// Get a customer by ID within a company.
	///
	/// # Returns
	/// `None` if the customer does not exist or belongs to another company.
	#[tracing::instrument(skip(self), fields(customer_id = %id, company_id = %company_id))]
	pub async fn get_customer(
		&self,
		id: &CustomerId,
		company_id: &CompanyId,
	) -> Result<Option<Customer>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, company_id, name, phone, email, notes, created_at, updated_at
			FROM customers
			WHERE id = ? AND company_id = ?
			"#,
		)
		.bind(id.to_string())
		.bind(company_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_customer(&r)).transpose()
	}

	/// List all customers of a company, newest first.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn list_customers(&self, company_id: &CompanyId) -> Result<Vec<Customer>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, company_id, name, phone, email, notes, created_at, updated_at
			FROM customers
			WHERE company_id = ?
			ORDER BY created_at DESC, id ASC
			"#,
		)
		.bind(company_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_customer(r)).collect()
	}

	/// Update a customer's contact fields.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if no customer matches the ID and company.
	#[tracing::instrument(skip(self, customer), fields(customer_id = %customer.id, company_id = %customer.company_id))]
	pub async fn update_customer(&self, customer: &Customer) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();

		let result = sqlx::query(
			r#"
			UPDATE customers
			SET name = ?, phone = ?, email = ?, notes = ?, updated_at = ?
			WHERE id = ? AND company_id = ?
			"#,
		)
		.bind(&customer.name)
		.bind(&customer.phone)
		.bind(&customer.email)
		.bind(&customer.notes)
		.bind(now)
		.bind(customer.id.to_string())
		.bind(customer.company_id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("Customer not found: {}", customer.id)));
		}

		tracing::debug!(customer_id = %customer.id, "customer updated");
		Ok(())
	}

	/// Delete a customer record.
	///
	/// # Returns
	/// `true` if a row was deleted, `false` if no customer matched.
	#[tracing::instrument(skip(self), fields(customer_id = %id, company_id = %company_id))]
	pub async fn delete_customer(
		&self,
		id: &CustomerId,
		company_id: &CompanyId,
	) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM customers WHERE id = ? AND company_id = ?")
			.bind(id.to_string())
			.bind(company_id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Count the customers of a company.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn count_customers(&self, company_id: &CompanyId) -> Result<i64, DbError> {
		let row = sqlx::query("SELECT COUNT(*) as count FROM customers WHERE company_id = ?")
			.bind(company_id.to_string())
			.fetch_one(&self.pool)
			.await?;

		Ok(row.get("count"))
	}

	fn row_to_customer(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Customer, DbError> {
		let id_str: String = row.get("id");
		let id = Uuid::parse_str(&id_str)
			.map_err(|e| DbError::Internal(format!("Invalid customer ID: {e}")))?;

		let company_id_str: String = row.get("company_id");
		let company_id = Uuid::parse_str(&company_id_str)
			.map_err(|e| DbError::Internal(format!("Invalid customer company_id: {e}")))?;

		let created_at_str: String = row.get("created_at");
		let created_at = DateTime::parse_from_rfc3339(&created_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid created_at: {e}")))?
			.with_timezone(&Utc);

		let updated_at_str: String = row.get("updated_at");
		let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid updated_at: {e}")))?
			.with_timezone(&Utc);

		Ok(Customer {
			id: CustomerId::new(id),
			company_id: CompanyId::new(company_id),
			name: row.get("name"),
			phone: row.get("phone"),
			email: row.get("email"),
			notes: row.get("notes"),
			created_at,
			updated_at,
		})
	}
}

#[async_trait]
impl CustomerStore for CustomerRepository {
	async fn create_customer(&self, customer: &Customer) -> Result<(), DbError> {
		self.create_customer(customer).await
	}

	async fn get_customer(
		&self,
		id: &CustomerId,
		company_id: &CompanyId,
	) -> Result<Option<Customer>, DbError> {
		self.get_customer(id, company_id).await
	}

	async fn list_customers(&self, company_id: &CompanyId) -> Result<Vec<Customer>, DbError> {
		self.list_customers(company_id).await
	}

	async fn update_customer(&self, customer: &Customer) -> Result<(), DbError> {
		self.update_customer(customer).await
	}

	async fn delete_customer(
		&self,
		id: &CustomerId,
		company_id: &CompanyId,
	) -> Result<bool, DbError> {
		self.delete_customer(id, company_id).await
	}

	async fn count_customers(&self, company_id: &CompanyId) -> Result<i64, DbError> {
		self.count_customers(company_id).await
	}
}
