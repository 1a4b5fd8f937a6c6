// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Flow template repository for database operations.
//!
//! Template definitions are opaque JSON documents (trigger keywords, reply
//! steps). The repository stores them as serialized TEXT and hands them back
//! as `serde_json::Value` without interpreting the contents.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexplus_server_auth::{CompanyId, TemplateId};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;

/// An automation flow template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowTemplate {
	pub id: TemplateId,
	pub company_id: CompanyId,
	pub name: String,
	/// The flow document: triggers, steps, and reply bodies.
	pub definition: serde_json::Value,
	/// Disabled templates are kept but never fire.
	pub enabled: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl FlowTemplate {
	/// Creates an enabled template with a freshly generated ID.
	pub fn new(
		company_id: CompanyId,
		name: impl Into<String>,
		definition: serde_json::Value,
	) -> Self {
		let now = Utc::now();
		Self {
			id: TemplateId::generate(),
			company_id,
			name: name.into(),
			definition,
			enabled: true,
			created_at: now,
			updated_at: now,
		}
	}
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
	async fn create_template(&self, template: &FlowTemplate) -> Result<(), DbError>;
	async fn get_template(
		&self,
		id: &TemplateId,
		company_id: &CompanyId,
	) -> Result<Option<FlowTemplate>, DbError>;
	async fn list_templates(&self, company_id: &CompanyId) -> Result<Vec<FlowTemplate>, DbError>;
	async fn update_template(&self, template: &FlowTemplate) -> Result<(), DbError>;
	async fn delete_template(&self, id: &TemplateId, company_id: &CompanyId)
		-> Result<bool, DbError>;
}

/// Repository for flow template database operations.
#[derive(Clone)]
pub struct TemplateRepository {
	pool: SqlitePool,
}

impl TemplateRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a new flow template.
	#[tracing::instrument(skip(self, template), fields(template_id = %template.id, company_id = %template.company_id))]
	pub async fn create_template(&self, template: &FlowTemplate) -> Result<(), DbError> {
		let definition = serde_json::to_string(&template.definition)?;

		sqlx::query(
			r#"
			INSERT INTO flow_templates (id, company_id, name, definition, enabled, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(template.id.to_string())
		.bind(template.company_id.to_string())
		.bind(&template.name)
		.bind(definition)
		.bind(template.enabled)
		.bind(template.created_at.to_rfc3339())
		.bind(template.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(template_id = %template.id, "flow template created");
		Ok(())
	}

	/// Get a flow template by ID within a company.
	///
	/// # Returns
	/// `None` if the template does not exist or belongs to another company.
	#[tracing::instrument(skip(self), fields(template_id = %id, company_id = %company_id))]
	pub async fn get_template(
		&self,
		id: &TemplateId,
		company_id: &CompanyId,
	) -> Result<Option<FlowTemplate>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, company_id, name, definition, enabled, created_at, updated_at
			FROM flow_templates
			WHERE id = ? AND company_id = ?
			"#,
		)
		.bind(id.to_string())
		.bind(company_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_template(&r)).transpose()
	}

	/// List all flow templates of a company, alphabetically.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn list_templates(&self, company_id: &CompanyId) -> Result<Vec<FlowTemplate>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, company_id, name, definition, enabled, created_at, updated_at
			FROM flow_templates
			WHERE company_id = ?
			ORDER BY name ASC, id ASC
			"#,
		)
		.bind(company_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_template(r)).collect()
	}

	/// Update a template's name, definition, and enabled flag.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if no template matches the ID and company.
	#[tracing::instrument(skip(self, template), fields(template_id = %template.id, company_id = %template.company_id))]
	pub async fn update_template(&self, template: &FlowTemplate) -> Result<(), DbError> {
		let definition = serde_json::to_string(&template.definition)?;

		let result = sqlx::query(
			r#"
			UPDATE flow_templates
			SET name = ?, definition = ?, enabled = ?, updated_at = ?
			WHERE id = ? AND company_id = ?
			"#,
		)
		.bind(&template.name)
		.bind(definition)
		.bind(template.enabled)
		.bind(Utc::now().to_rfc3339())
		.bind(template.id.to_string())
		.bind(template.company_id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!(
				"Flow template not found: {}",
				template.id
			)));
		}

		tracing::debug!(template_id = %template.id, "flow template updated");
		Ok(())
	}

	/// Delete a flow template.
	///
	/// # Returns
	/// `true` if a row was deleted, `false` if no template matched.
	#[tracing::instrument(skip(self), fields(template_id = %id, company_id = %company_id))]
	pub async fn delete_template(
		&self,
		id: &TemplateId,
		company_id: &CompanyId,
	) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM flow_templates WHERE id = ? AND company_id = ?")
			.bind(id.to_string())
			.bind(company_id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	fn row_to_template(&self, row: &sqlx::sqlite::SqliteRow) -> Result<FlowTemplate, DbError> {
		let id_str: String = row.get("id");
		let id = Uuid::parse_str(&id_str)
			.map_err(|e| DbError::Internal(format!("Invalid template ID: {e}")))?;

		let company_id_str: String = row.get("company_id");
		let company_id = Uuid::parse_str(&company_id_str)
			.map_err(|e| DbError::Internal(format!("Invalid template company_id: {e}")))?;

		let definition_str: String = row.get("definition");
		let definition: serde_json::Value = serde_json::from_str(&definition_str)?;

		let created_at_str: String = row.get("created_at");
		let created_at = DateTime::parse_from_rfc3339(&created_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid created_at: {e}")))?
			.with_timezone(&Utc);

		let updated_at_str: String = row.get("updated_at");
		let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid updated_at: {e}")))?
			.with_timezone(&Utc);

		Ok(FlowTemplate {
			id: TemplateId::new(id),
			company_id: CompanyId::new(company_id),
			name: row.get("name"),
			definition,
			enabled: row.get("enabled"),
			created_at,
			updated_at,
		})
	}
}

#[async_trait]
impl TemplateStore for TemplateRepository {
	async fn create_template(&self, template: &FlowTemplate) -> Result<(), DbError> {
		self.create_template(template).await
	}

	async fn get_template(
		&self,
		id: &TemplateId,
		company_id: &CompanyId,
	) -> Result<Option<FlowTemplate>, DbError> {
		self.get_template(id, company_id).await
	}

	async fn list_templates(&self, company_id: &CompanyId) -> Result<Vec<FlowTemplate>, DbError> {
		self.list_templates(company_id).await
	}

	async fn update_template(&self, template: &FlowTemplate) -> Result<(), DbError> {
		self.update_template(template).await
	}

	async fn delete_template(
		&self,
		id: &TemplateId,
		company_id: &CompanyId,
	) -> Result<bool, DbError> {
		self.delete_template(id, company_id).await
	}
}
