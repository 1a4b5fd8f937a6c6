// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Conversation and message repository for database operations.
//!
//! A conversation is the company-scoped container; messages hang off a
//! conversation and inherit its company through a join. Message lookups
//! always join back to `conversations` so a caller can never read another
//! company's traffic by guessing a conversation ID.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexplus_server_auth::{ChannelId, CompanyId, ConversationId, CustomerId, MessageId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;

// ============================================================================
// Entities
// ============================================================================

/// Lifecycle state of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
	/// Awaiting or undergoing agent handling.
	Open,
	/// Closed without a sale.
	Closed,
	/// Closed by converting into a sale.
	Converted,
}

impl fmt::Display for ConversationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			ConversationStatus::Open => "open",
			ConversationStatus::Closed => "closed",
			ConversationStatus::Converted => "converted",
		};
		write!(f, "{s}")
	}
}

impl FromStr for ConversationStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"open" => Ok(ConversationStatus::Open),
			"closed" => Ok(ConversationStatus::Closed),
			"converted" => Ok(ConversationStatus::Converted),
			other => Err(format!("unknown conversation status: {other}")),
		}
	}
}

/// Direction of a message relative to the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
	/// Sent by the customer toward the company.
	Inbound,
	/// Sent by a member (or automation) toward the customer.
	Outbound,
}

impl fmt::Display for MessageDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			MessageDirection::Inbound => "inbound",
			MessageDirection::Outbound => "outbound",
		};
		write!(f, "{s}")
	}
}

impl FromStr for MessageDirection {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"inbound" => Ok(MessageDirection::Inbound),
			"outbound" => Ok(MessageDirection::Outbound),
			other => Err(format!("unknown message direction: {other}")),
		}
	}
}

/// A customer conversation in the shared inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
	pub id: ConversationId,
	pub company_id: CompanyId,
	/// Linked CRM customer, if the contact has been identified.
	pub customer_id: Option<CustomerId>,
	/// Messaging channel the conversation arrived through.
	pub channel_id: Option<ChannelId>,
	pub status: ConversationStatus,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Conversation {
	/// Creates an open conversation with no linked customer or channel.
	pub fn new(company_id: CompanyId) -> Self {
		let now = Utc::now();
		Self {
			id: ConversationId::generate(),
			company_id,
			customer_id: None,
			channel_id: None,
			status: ConversationStatus::Open,
			created_at: now,
			updated_at: now,
		}
	}
}

/// A single message inside a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
	pub id: MessageId,
	pub conversation_id: ConversationId,
	pub direction: MessageDirection,
	pub body: String,
	/// The member who sent an outbound message. `None` for inbound
	/// messages and automation-sent replies.
	pub sent_by: Option<UserId>,
	pub created_at: DateTime<Utc>,
}

impl Message {
	/// Creates a message with a freshly generated ID.
	pub fn new(
		conversation_id: ConversationId,
		direction: MessageDirection,
		body: impl Into<String>,
	) -> Self {
		Self {
			id: MessageId::generate(),
			conversation_id,
			direction,
			body: body.into(),
			sent_by: None,
			created_at: Utc::now(),
		}
	}
}

// ============================================================================
// Store trait
// ============================================================================

#[async_trait]
pub trait ConversationStore: Send + Sync {
	async fn create_conversation(&self, conversation: &Conversation) -> Result<(), DbError>;
	async fn get_conversation(
		&self,
		id: &ConversationId,
		company_id: &CompanyId,
	) -> Result<Option<Conversation>, DbError>;
	async fn list_conversations(
		&self,
		company_id: &CompanyId,
		status: Option<ConversationStatus>,
	) -> Result<Vec<Conversation>, DbError>;
	async fn update_conversation_status(
		&self,
		id: &ConversationId,
		company_id: &CompanyId,
		status: ConversationStatus,
	) -> Result<(), DbError>;
	async fn link_customer(
		&self,
		id: &ConversationId,
		company_id: &CompanyId,
		customer_id: &CustomerId,
	) -> Result<(), DbError>;
	async fn create_message(&self, message: &Message, company_id: &CompanyId)
		-> Result<(), DbError>;
	async fn list_messages(
		&self,
		conversation_id: &ConversationId,
		company_id: &CompanyId,
	) -> Result<Vec<Message>, DbError>;
	async fn count_open_conversations(&self, company_id: &CompanyId) -> Result<i64, DbError>;
	async fn count_messages_since(
		&self,
		company_id: &CompanyId,
		since: DateTime<Utc>,
	) -> Result<i64, DbError>;
}

/// Repository for conversation and message database operations.
#[derive(Clone)]
pub struct ConversationRepository {
	pool: SqlitePool,
}

impl ConversationRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	// ========================================================================
	// Conversation CRUD
	// ========================================================================

	/// Create a new conversation.
	#[tracing::instrument(skip(self, conversation), fields(conversation_id = %conversation.id, company_id = %conversation.company_id))]
	pub async fn create_conversation(&self, conversation: &Conversation) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO conversations (id, company_id, customer_id, channel_id, status, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(conversation.id.to_string())
		.bind(conversation.company_id.to_string())
		.bind(conversation.customer_id.map(|id| id.to_string()))
		.bind(conversation.channel_id.map(|id| id.to_string()))
		.bind(conversation.status.to_string())
		.bind(conversation.created_at.to_rfc3339())
		.bind(conversation.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(conversation_id = %conversation.id, "conversation created");
		Ok(())
	}

	/// Get a conversation by ID within a company.
	///
	/// # Returns
	/// `None` if the conversation does not exist or belongs to another company.
	#[tracing::instrument(skip(self), fields(conversation_id = %id, company_id = %company_id))]
	pub async fn get_conversation(
		&self,
		id: &ConversationId,
		company_id: &CompanyId,
	) -> Result<Option<Conversation>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, company_id, customer_id, channel_id, status, created_at, updated_at
			FROM conversations
			WHERE id = ? AND company_id = ?
			"#,
		)
		.bind(id.to_string())
		.bind(company_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_conversation(&r)).transpose()
	}

	/// List a company's conversations, most recently active first.
	///
	/// # Arguments
	/// * `status` - When set, only conversations in that state are returned.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn list_conversations(
		&self,
		company_id: &CompanyId,
		status: Option<ConversationStatus>,
	) -> Result<Vec<Conversation>, DbError> {
		let rows = match status {
			Some(status) => {
				sqlx::query(
					r#"
					SELECT id, company_id, customer_id, channel_id, status, created_at, updated_at
					FROM conversations
					WHERE company_id = ? AND status = ?
					ORDER BY updated_at DESC, id ASC
					"#,
				)
				.bind(company_id.to_string())
				.bind(status.to_string())
				.fetch_all(&self.pool)
				.await?
			}
			None => {
				sqlx::query(
					r#"
					SELECT id, company_id, customer_id, channel_id, status, created_at, updated_at
					FROM conversations
					WHERE company_id = ?
					ORDER BY updated_at DESC, id ASC
					"#,
				)
				.bind(company_id.to_string())
				.fetch_all(&self.pool)
				.await?
			}
		};

		rows.iter().map(|r| self.row_to_conversation(r)).collect()
	}

	/// Move a conversation to a new lifecycle state.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if no conversation matches the ID and company.
	#[tracing::instrument(skip(self), fields(conversation_id = %id, company_id = %company_id, status = %status))]
	pub async fn update_conversation_status(
		&self,
		id: &ConversationId,
		company_id: &CompanyId,
		status: ConversationStatus,
	) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			UPDATE conversations
			SET status = ?, updated_at = ?
			WHERE id = ? AND company_id = ?
			"#,
		)
		.bind(status.to_string())
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.bind(company_id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("Conversation not found: {id}")));
		}

		tracing::debug!(conversation_id = %id, status = %status, "conversation status updated");
		Ok(())
	}

	/// Attach a CRM customer to a conversation.
	///
	/// The caller is responsible for checking that the customer belongs to
	/// the same company before linking.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if no conversation matches the ID and company.
	#[tracing::instrument(skip(self), fields(conversation_id = %id, company_id = %company_id, customer_id = %customer_id))]
	pub async fn link_customer(
		&self,
		id: &ConversationId,
		company_id: &CompanyId,
		customer_id: &CustomerId,
	) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			UPDATE conversations
			SET customer_id = ?, updated_at = ?
			WHERE id = ? AND company_id = ?
			"#,
		)
		.bind(customer_id.to_string())
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.bind(company_id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("Conversation not found: {id}")));
		}

		tracing::debug!(conversation_id = %id, customer_id = %customer_id, "customer linked");
		Ok(())
	}

	// ========================================================================
	// Messages
	// ========================================================================

	/// Append a message to a conversation and touch its activity timestamp.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if the conversation does not exist in the
	/// given company.
	#[tracing::instrument(skip(self, message), fields(message_id = %message.id, conversation_id = %message.conversation_id))]
	pub async fn create_message(
		&self,
		message: &Message,
		company_id: &CompanyId,
	) -> Result<(), DbError> {
		let touched = sqlx::query(
			r#"
			UPDATE conversations
			SET updated_at = ?
			WHERE id = ? AND company_id = ?
			"#,
		)
		.bind(message.created_at.to_rfc3339())
		.bind(message.conversation_id.to_string())
		.bind(company_id.to_string())
		.execute(&self.pool)
		.await?;

		if touched.rows_affected() == 0 {
			return Err(DbError::NotFound(format!(
				"Conversation not found: {}",
				message.conversation_id
			)));
		}

		sqlx::query(
			r#"
			INSERT INTO messages (id, conversation_id, direction, body, sent_by, created_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(message.id.to_string())
		.bind(message.conversation_id.to_string())
		.bind(message.direction.to_string())
		.bind(&message.body)
		.bind(message.sent_by.map(|id| id.to_string()))
		.bind(message.created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(message_id = %message.id, "message created");
		Ok(())
	}

	/// List a conversation's messages in chronological order.
	///
	/// Joins through `conversations` so an ID from another company yields an
	/// empty list rather than leaking rows.
	#[tracing::instrument(skip(self), fields(conversation_id = %conversation_id, company_id = %company_id))]
	pub async fn list_messages(
		&self,
		conversation_id: &ConversationId,
		company_id: &CompanyId,
	) -> Result<Vec<Message>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT m.id, m.conversation_id, m.direction, m.body, m.sent_by, m.created_at
			FROM messages m
			JOIN conversations c ON c.id = m.conversation_id
			WHERE m.conversation_id = ? AND c.company_id = ?
			ORDER BY m.created_at ASC, m.id ASC
			"#,
		)
		.bind(conversation_id.to_string())
		.bind(company_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_message(r)).collect()
	}

	// ========================================================================
	// Aggregates
	// ========================================================================

	/// Count a company's open conversations.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn count_open_conversations(&self, company_id: &CompanyId) -> Result<i64, DbError> {
		let row = sqlx::query(
			"SELECT COUNT(*) as count FROM conversations WHERE company_id = ? AND status = 'open'",
		)
		.bind(company_id.to_string())
		.fetch_one(&self.pool)
		.await?;

		Ok(row.get("count"))
	}

	/// Count messages across all of a company's conversations since a cutoff.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn count_messages_since(
		&self,
		company_id: &CompanyId,
		since: DateTime<Utc>,
	) -> Result<i64, DbError> {
		let row = sqlx::query(
			r#"
			SELECT COUNT(*) as count
			FROM messages m
			JOIN conversations c ON c.id = m.conversation_id
			WHERE c.company_id = ? AND m.created_at >= ?
			"#,
		)
		.bind(company_id.to_string())
		.bind(since.to_rfc3339())
		.fetch_one(&self.pool)
		.await?;

		Ok(row.get("count"))
	}

	// ========================================================================
	// Row mapping
	// ========================================================================

	fn row_to_conversation(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Conversation, DbError> {
		let id_str: String = row.get("id");
		let id = Uuid::parse_str(&id_str)
			.map_err(|e| DbError::Internal(format!("Invalid conversation ID: {e}")))?;

		let company_id_str: String = row.get("company_id");
		let company_id = Uuid::parse_str(&company_id_str)
			.map_err(|e| DbError::Internal(format!("Invalid conversation company_id: {e}")))?;

		let customer_id: Option<String> = row.get("customer_id");
		let customer_id = customer_id
			.map(|s| {
				Uuid::parse_str(&s)
					.map(CustomerId::new)
					.map_err(|e| DbError::Internal(format!("Invalid conversation customer_id: {e}")))
			})
			.transpose()?;

		let channel_id: Option<String> = row.get("channel_id");
		let channel_id = channel_id
			.map(|s| {
				Uuid::parse_str(&s)
					.map(ChannelId::new)
					.map_err(|e| DbError::Internal(format!("Invalid conversation channel_id: {e}")))
			})
			.transpose()?;

		let status_str: String = row.get("status");
		let status = status_str
			.parse::<ConversationStatus>()
			.map_err(DbError::Internal)?;

		let created_at_str: String = row.get("created_at");
		let created_at = DateTime::parse_from_rfc3339(&created_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid created_at: {e}")))?
			.with_timezone(&Utc);

		let updated_at_str: String = row.get("updated_at");
		let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid updated_at: {e}")))?
			.with_timezone(&Utc);

		Ok(Conversation {
			id: ConversationId::new(id),
			company_id: CompanyId::new(company_id),
			customer_id,
			channel_id,
			status,
			created_at,
			updated_at,
		})
	}

	fn row_to_message(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Message, DbError> {
		let id_str: String = row.get("id");
		let id = Uuid::parse_str(&id_str)
			.map_err(|e| DbError::Internal(format!("Invalid message ID: {e}")))?;

		let conversation_id_str: String = row.get("conversation_id");
		let conversation_id = Uuid::parse_str(&conversation_id_str)
			.map_err(|e| DbError::Internal(format!("Invalid message conversation_id: {e}")))?;

		let direction_str: String = row.get("direction");
		let direction = direction_str
			.parse::<MessageDirection>()
			.map_err(DbError::Internal)?;

		let sent_by: Option<String> = row.get("sent_by");
		let sent_by = sent_by
			.map(|s| {
				Uuid::parse_str(&s)
					.map(UserId::new)
					.map_err(|e| DbError::Internal(format!("Invalid message sent_by: {e}")))
			})
			.transpose()?;

		let created_at_str: String = row.get("created_at");
		let created_at = DateTime::parse_from_rfc3339(&created_at_str)
			.map_err(|e| DbError::Internal(format!("Invalid created_at: {e}")))?
			.with_timezone(&Utc);

		Ok(Message {
			id: MessageId::new(id),
			conversation_id: ConversationId::new(conversation_id),
			direction,
			body: row.get("body"),
			sent_by,
			created_at,
		})
	}
}

#[async_trait]
impl ConversationStore for ConversationRepository {
	async fn create_conversation(&self, conversation: &Conversation) -> Result<(), DbError> {
		self.create_conversation(conversation).await
	}

	async fn get_conversation(
		&self,
		id: &ConversationId,
		company_id: &CompanyId,
	) -> Result<Option<Conversation>, DbError> {
		self.get_conversation(id, company_id).await
	}

	async fn list_conversations(
		&self,
		company_id: &CompanyId,
		status: Option<ConversationStatus>,
	) -> Result<Vec<Conversation>, DbError> {
		self.list_conversations(company_id, status).await
	}

	async fn update_conversation_status(
		&self,
		id: &ConversationId,
		company_id: &CompanyId,
		status: ConversationStatus,
	) -> Result<(), DbError> {
		self.update_conversation_status(id, company_id, status).await
	}

	async fn link_customer(
		&self,
		id: &ConversationId,
		company_id: &CompanyId,
		customer_id: &CustomerId,
	) -> Result<(), DbError> {
		self.link_customer(id, company_id, customer_id).await
	}

	async fn create_message(
		&self,
		message: &Message,
		company_id: &CompanyId,
	) -> Result<(), DbError> {
		self.create_message(message, company_id).await
	}

	async fn list_messages(
		&self,
		conversation_id: &ConversationId,
		company_id: &CompanyId,
	) -> Result<Vec<Message>, DbError> {
		self.list_messages(conversation_id, company_id).await
	}

	async fn count_open_conversations(&self, company_id: &CompanyId) -> Result<i64, DbError> {
		self.count_open_conversations(company_id).await
	}

	async fn count_messages_since(
		&self,
		company_id: &CompanyId,
		since: DateTime<Utc>,
	) -> Result<i64, DbError> {
		self.count_messages_since(company_id, since).await
	}
}
