// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Member profile repository for database operations.
//!
//! The member row is the company-scoped profile of a user account: role,
//! status, permission overrides, and display fields. The identity directory
//! owns credentials; this table is what authorization decisions read.
//! Lookups used by handlers are company-scoped so a member id from another
//! company behaves as not-found.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexplus_server_auth::{CompanyId, Member, PermissionOverrides, Role, UserId};
use sqlx::{sqlite::SqlitePool, Row};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DbError;

#[async_trait]
pub trait MemberStore: Send + Sync {
	async fn create_member(&self, member: &Member) -> Result<(), DbError>;
	async fn get_member(&self, user_id: &UserId) -> Result<Option<Member>, DbError>;
	async fn get_member_in_company(
		&self,
		user_id: &UserId,
		company_id: &CompanyId,
	) -> Result<Option<Member>, DbError>;
	async fn get_member_by_email(&self, email: &str) -> Result<Option<Member>, DbError>;
	async fn list_members(&self, company_id: &CompanyId) -> Result<Vec<Member>, DbError>;
	async fn update_member(&self, member: &Member) -> Result<(), DbError>;
	async fn delete_member(&self, user_id: &UserId, company_id: &CompanyId)
		-> Result<bool, DbError>;
	async fn count_members(&self, company_id: &CompanyId) -> Result<i64, DbError>;
}

/// Repository for member profile database operations.
///
/// All IDs are UUIDs stored as strings in SQLite. Permission overrides are
/// stored as a JSON object keyed by capability.
#[derive(Clone)]
pub struct MemberRepository {
	pool: SqlitePool,
}

impl MemberRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	// =========================================================================
	// Member CRUD
	// =========================================================================

	/// Create a new member profile row.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the email is already taken by another
	/// member (case-insensitive).
	#[tracing::instrument(skip(self, member), fields(user_id = %member.user_id, company_id = %member.company_id))]
	pub async fn create_member(&self, member: &Member) -> Result<(), DbError> {
		let existing = sqlx::query("SELECT user_id FROM members WHERE LOWER(email) = LOWER(?)")
			.bind(&member.email)
			.fetch_optional(&self.pool)
			.await?;

		if existing.is_some() {
			return Err(DbError::Conflict(format!(
				"Member with email {} already exists",
				member.email
			)));
		}

		let overrides_json = serde_json::to_string(&member.overrides)?;

		sqlx::query(
			r#"
			INSERT INTO members (
				user_id, company_id, email, full_name, role, status,
				overrides, locale, created_at, updated_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(member.user_id.to_string())
		.bind(member.company_id.to_string())
		.bind(&member.email)
		.bind(&member.full_name)
		.bind(member.role.to_string())
		.bind(member.status.to_string())
		.bind(&overrides_json)
		.bind(&member.locale)
		.bind(member.created_at.to_rfc3339())
		.bind(member.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(user_id = %member.user_id, "member created");
		Ok(())
	}

	/// Get a member by user ID, regardless of company.
	///
	/// This is the principal-resolution lookup used by the auth middleware;
	/// every other caller should prefer [`Self::get_member_in_company`].
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn get_member(&self, user_id: &UserId) -> Result<Option<Member>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT user_id, company_id, email, full_name, role, status,
			       overrides, locale, created_at, updated_at
			FROM members
			WHERE user_id = ?
			"#,
		)
		.bind(user_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_member(&r)).transpose()
	}

	/// Get a member by user ID within a specific company.
	///
	/// # Returns
	/// `None` if the member does not exist or belongs to another company.
	#[tracing::instrument(skip(self), fields(user_id = %user_id, company_id = %company_id))]
	pub async fn get_member_in_company(
		&self,
		user_id: &UserId,
		company_id: &CompanyId,
	) -> Result<Option<Member>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT user_id, company_id, email, full_name, role, status,
			       overrides, locale, created_at, updated_at
			FROM members
			WHERE user_id = ? AND company_id = ?
			"#,
		)
		.bind(user_id.to_string())
		.bind(company_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_member(&r)).transpose()
	}

	/// Get a member by email (case-insensitive).
	#[tracing::instrument(skip(self, email))]
	pub async fn get_member_by_email(&self, email: &str) -> Result<Option<Member>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT user_id, company_id, email, full_name, role, status,
			       overrides, locale, created_at, updated_at
			FROM members
			WHERE LOWER(email) = LOWER(?)
			"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_member(&r)).transpose()
	}

	/// List all members of a company, oldest first.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn list_members(&self, company_id: &CompanyId) -> Result<Vec<Member>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT user_id, company_id, email, full_name, role, status,
			       overrides, locale, created_at, updated_at
			FROM members
			WHERE company_id = ?
			ORDER BY created_at ASC, user_id ASC
			"#,
		)
		.bind(company_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_member(r)).collect()
	}

	/// Update a member's profile fields (full name, role, status, overrides,
	/// locale). Email and company are immutable here.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if no member matches the user and company.
	#[tracing::instrument(skip(self, member), fields(user_id = %member.user_id, company_id = %member.company_id))]
	pub async fn update_member(&self, member: &Member) -> Result<(), DbError> {
		let overrides_json = serde_json::to_string(&member.overrides)?;
		let now = Utc::now().to_rfc3339();

		let result = sqlx::query(
			r#"
			UPDATE members
			SET full_name = ?, role = ?, status = ?, overrides = ?, locale = ?, updated_at = ?
			WHERE user_id = ? AND company_id = ?
			"#,
		)
		.bind(&member.full_name)
		.bind(member.role.to_string())
		.bind(member.status.to_string())
		.bind(&overrides_json)
		.bind(&member.locale)
		.bind(now)
		.bind(member.user_id.to_string())
		.bind(member.company_id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!(
				"Member not found: {}",
				member.user_id
			)));
		}

		tracing::debug!(user_id = %member.user_id, "member updated");
		Ok(())
	}

	/// Delete a member's profile row.
	///
	/// # Returns
	/// `true` if a row was deleted, `false` if no member matched the user
	/// and company.
	#[tracing::instrument(skip(self), fields(user_id = %user_id, company_id = %company_id))]
	pub async fn delete_member(
		&self,
		user_id: &UserId,
		company_id: &CompanyId,
	) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM members WHERE user_id = ? AND company_id = ?")
			.bind(user_id.to_string())
			.bind(company_id.to_string())
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::debug!(user_id = %user_id, "member deleted");
		}
		Ok(deleted)
	}

	/// Count the members of a company.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn count_members(&self, company_id: &CompanyId) -> Result<i64, DbError> {
		let row = sqlx::query("SELECT COUNT(*) as count FROM members WHERE company_id = ?")
			.bind(company_id.to_string())
			.fetch_one(&self.pool)
			.await?;

		Ok(row.get("count"))
	}

	// =========================================================================
	// Row mapping
	// =========================================================================

	fn row_to_member(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Member, DbError> {
		let user_id_str: String = row.get("user_id");
		let user_id = Uuid::parse_str(&user_id_str)
			.map_err(|e| DbError::Internal(format!("Invalid member user_id: {e}")))?;

		let company_id_str: String = row.get("company_id");
		let company_id = Uuid::parse_str(&company_id_str)
			.map_err(|e| DbError::Internal(format!("Invalid member company_id: {e}")))?;

		let role_str: String = row.get("role");
		let role =
			Role::from_str(&role_str).map_err(|e| DbError::Internal(format!("Invalid role: {e}")))?;

		let status_str: String = row.get("status");
		let status = status_str
			.parse()
			.map_err(|e| DbError::Internal(format!("Invalid status: {e}")))?;

		let overrides_str: String = row.get("overrides");
		let overrides: PermissionOverrides = serde_json::from_str(&overrides_str)
			.map_err(|e| DbError::Internal(format!("Invalid overrides: {e}")))?;

		let created_at_str: String = row.get("created_at");
		let created_at = DateTime::parse_from_rfc3339(&created_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid created_at: {e}")))?
			.with_timezone(&Utc);

		let updated_at_str: String = row.get("updated_at");
		let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid updated_at: {e}")))?
			.with_timezone(&Utc);

		Ok(Member {
			user_id: UserId::new(user_id),
			company_id: CompanyId::new(company_id),
			email: row.get("email"),
			full_name: row.get("full_name"),
			role,
			status,
			overrides,
			locale: row.get("locale"),
			created_at,
			updated_at,
		})
	}
}

#[async_trait]
impl MemberStore for MemberRepository {
	async fn create_member(&self, member: &Member) -> Result<(), DbError> {
		self.create_member(member).await
	}

	async fn get_member(&self, user_id: &UserId) -> Result<Option<Member>, DbError> {
		self.get_member(user_id).await
	}

	async fn get_member_in_company(
		&self,
		user_id: &UserId,
		company_id: &CompanyId,
	) -> Result<Option<Member>, DbError> {
		self.get_member_in_company(user_id, company_id).await
	}

	async fn get_member_by_email(&self, email: &str) -> Result<Option<Member>, DbError> {
		self.get_member_by_email(email).await
	}

	async fn list_members(&self, company_id: &CompanyId) -> Result<Vec<Member>, DbError> {
		self.list_members(company_id).await
	}

	async fn update_member(&self, member: &Member) -> Result<(), DbError> {
		self.update_member(member).await
	}

	async fn delete_member(
		&self,
		user_id: &UserId,
		company_id: &CompanyId,
	) -> Result<bool, DbError> {
		self.delete_member(user_id, company_id).await
	}

	async fn count_members(&self, company_id: &CompanyId) -> Result<i64, DbError> {
		self.count_members(company_id).await
	}
}
