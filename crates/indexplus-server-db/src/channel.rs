// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Messaging channel repository for database operations.
//!
//! Channels follow a connect/remove lifecycle and carry no mutable state,
//! so there is no update operation.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexplus_server_auth::{ChannelId, CompanyId};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;

/// The messaging platform a channel connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
	Whatsapp,
	Messenger,
	Instagram,
	Webchat,
}

impl ChannelKind {
	/// All channel kinds, for iteration and validation.
	pub fn all() -> &'static [ChannelKind] {
		&[
			ChannelKind::Whatsapp,
			ChannelKind::Messenger,
			ChannelKind::Instagram,
			ChannelKind::Webchat,
		]
	}
}

impl fmt::Display for ChannelKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			ChannelKind::Whatsapp => "whatsapp",
			ChannelKind::Messenger => "messenger",
			ChannelKind::Instagram => "instagram",
			ChannelKind::Webchat => "webchat",
		};
		write!(f, "{s}")
	}
}

impl FromStr for ChannelKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"whatsapp" => Ok(ChannelKind::Whatsapp),
			"messenger" => Ok(ChannelKind::Messenger),
			"instagram" => Ok(ChannelKind::Instagram),
			"webchat" => Ok(ChannelKind::Webchat),
			other => Err(format!("unknown channel kind: {other}")),
		}
	}
}

/// A connected messaging channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
	pub id: ChannelId,
	pub company_id: CompanyId,
	pub kind: ChannelKind,
	/// Human-readable label shown in the inbox, e.g. "Support WhatsApp".
	pub display_name: String,
	/// Identifier on the external platform (phone number, page ID).
	pub external_id: Option<String>,
	pub created_at: DateTime<Utc>,
}

impl Channel {
	/// Creates a channel with a freshly generated ID.
	pub fn new(company_id: CompanyId, kind: ChannelKind, display_name: impl Into<String>) -> Self {
		Self {
			id: ChannelId::generate(),
			company_id,
			kind,
			display_name: display_name.into(),
			external_id: None,
			created_at: Utc::now(),
		}
	}
}

#[async_trait]
pub trait ChannelStore: Send + Sync {
	async fn create_channel(&self, channel: &Channel) -> Result<(), DbError>;
	async fn get_channel(
		&self,
		id: &ChannelId,
		company_id: &CompanyId,
	) -> Result<Option<Channel>, DbError>;
	async fn list_channels(&self, company_id: &CompanyId) -> Result<Vec<Channel>, DbError>;
	async fn delete_channel(&self, id: &ChannelId, company_id: &CompanyId)
		-> Result<bool, DbError>;
}

/// Repository for channel database operations.
#[derive(Clone)]
pub struct ChannelRepository {
	pool: SqlitePool,
}

impl ChannelRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Connect a new channel to a company.
	#[tracing::instrument(skip(self, channel), fields(channel_id = %channel.id, company_id = %channel.company_id))]
	pub async fn create_channel(&self, channel: &Channel) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO channels (id, company_id, kind, display_name, external_id, created_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(channel.id.to_string())
		.bind(channel.company_id.to_string())
		.bind(channel.kind.to_string())
		.bind(&channel.display_name)
		.bind(&channel.external_id)
		.bind(channel.created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(channel_id = %channel.id, kind = %channel.kind, "channel created");
		Ok(())
	}

	/// Get a channel by ID within a company.
	///
	/// # Returns
	/// `None` if the channel does not exist or belongs to another company.
	#[tracing::instrument(skip(self), fields(channel_id = %id, company_id = %company_id))]
	pub async fn get_channel(
		&self,
		id: &ChannelId,
		company_id: &CompanyId,
	) -> Result<Option<Channel>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, company_id, kind, display_name, external_id, created_at
			FROM channels
			WHERE id = ? AND company_id = ?
			"#,
		)
		.bind(id.to_string())
		.bind(company_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_channel(&r)).transpose()
	}

	/// List all channels of a company in connection order.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn list_channels(&self, company_id: &CompanyId) -> Result<Vec<Channel>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, company_id, kind, display_name, external_id, created_at
			FROM channels
			WHERE company_id = ?
			ORDER BY created_at ASC, id ASC
			"#,
		)
		.bind(company_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_channel(r)).collect()
	}

	/// Remove a channel.
	///
	/// # Returns
	/// `true` if a row was deleted, `false` if no channel matched.
	#[tracing::instrument(skip(self), fields(channel_id = %id, company_id = %company_id))]
	pub async fn delete_channel(
		&self,
		id: &ChannelId,
		company_id: &CompanyId,
	) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM channels WHERE id = ? AND company_id = ?")
			.bind(id.to_string())
			.bind(company_id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	fn row_to_channel(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Channel, DbError> {
		let id_str: String = row.get("id");
		let id = Uuid::parse_str(&id_str)
			.map_err(|e| DbError::Internal(format!("Invalid channel ID: {e}")))?;

		let company_id_str: String = row.get("company_id");
		let company_id = Uuid::parse_str(&company_id_str)
			.map_err(|e| DbError::Internal(format!("Invalid channel company_id: {e}")))?;

		let kind_str: String = row.get("kind");
		let kind = kind_str.parse::<ChannelKind>().map_err(DbError::Internal)?;

		let created_at_str: String = row.get("created_at");
		let created_at = DateTime::parse_from_rfc3339(&created_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid created_at: {e}")))?
			.with_timezone(&Utc);

		Ok(Channel {
			id: ChannelId::new(id),
			company_id: CompanyId::new(company_id),
			kind,
			display_name: row.get("display_name"),
			external_id: row.get("external_id"),
			created_at,
		})
	}
}

#[async_trait]
impl ChannelStore for ChannelRepository {
	async fn create_channel(&self, channel: &Channel) -> Result<(), DbError> {
		self.create_channel(channel).await
	}

	async fn get_channel(
		&self,
		id: &ChannelId,
		company_id: &CompanyId,
	) -> Result<Option<Channel>, DbError> {
		self.get_channel(id, company_id).await
	}

	async fn list_channels(&self, company_id: &CompanyId) -> Result<Vec<Channel>, DbError> {
		self.list_channels(company_id).await
	}

	async fn delete_channel(
		&self,
		id: &ChannelId,
		company_id: &CompanyId,
	) -> Result<bool, DbError> {
		self.delete_channel(id, company_id).await
	}
}
