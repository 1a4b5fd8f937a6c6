// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use indexplus_server_db::{Conversation, ConversationStatus, Message, MessageDirection};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::sales::SaleResponse;

/// Conversation lifecycle state for API payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatusApi {
	Open,
	Closed,
	Converted,
}

/// Message direction for API payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum MessageDirectionApi {
	Inbound,
	Outbound,
}

/// A conversation in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ConversationResponse {
	pub id: String,
	pub customer_id: Option<String>,
	pub channel_id: Option<String>,
	pub status: ConversationStatusApi,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// A message in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MessageResponse {
	pub id: String,
	pub conversation_id: String,
	pub direction: MessageDirectionApi,
	pub body: String,
	pub sent_by: Option<String>,
	pub created_at: DateTime<Utc>,
}

/// Response for listing conversations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListConversationsResponse {
	pub success: bool,
	pub conversations: Vec<ConversationResponse>,
}

/// Response for listing the messages of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListMessagesResponse {
	pub success: bool,
	pub messages: Vec<MessageResponse>,
}

/// Request to open a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateConversationRequest {
	pub customer_id: Option<String>,
	pub channel_id: Option<String>,
}

/// Request to update a conversation. The status string is parsed by the
/// handler so unknown values fail with a localized message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateConversationRequest {
	pub status: Option<String>,
	pub customer_id: Option<String>,
}

/// Request to send an outbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SendMessageRequest {
	pub body: String,
}

/// Request to convert a conversation into a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ConvertConversationRequest {
	pub description: Option<String>,
	pub amount_cents: i64,
}

/// Response carrying a single conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ConversationEnvelopeResponse {
	pub success: bool,
	pub conversation: ConversationResponse,
}

/// Response carrying a sent message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MessageEnvelopeResponse {
	pub success: bool,
	pub message: MessageResponse,
}

/// Response for converting a conversation: the closed conversation and
/// the sale created from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ConvertConversationResponse {
	pub success: bool,
	pub conversation: ConversationResponse,
	pub sale: SaleResponse,
}

impl ConversationResponse {
	pub fn from_conversation(conversation: Conversation) -> Self {
		Self {
			id: conversation.id.to_string(),
			customer_id: conversation.customer_id.map(|id| id.to_string()),
			channel_id: conversation.channel_id.map(|id| id.to_string()),
			status: conversation.status.into(),
			created_at: conversation.created_at,
			updated_at: conversation.updated_at,
		}
	}
}

impl MessageResponse {
	pub fn from_message(message: Message) -> Self {
		Self {
			id: message.id.to_string(),
			conversation_id: message.conversation_id.to_string(),
			direction: message.direction.into(),
			body: message.body,
			sent_by: message.sent_by.map(|id| id.to_string()),
			created_at: message.created_at,
		}
	}
}

impl ConversationEnvelopeResponse {
	pub fn new(conversation: Conversation) -> Self {
		Self {
			success: true,
			conversation: ConversationResponse::from_conversation(conversation),
		}
	}
}

impl MessageEnvelopeResponse {
	pub fn new(message: Message) -> Self {
		Self {
			success: true,
			message: MessageResponse::from_message(message),
		}
	}
}

impl From<ConversationStatus> for ConversationStatusApi {
	fn from(status: ConversationStatus) -> Self {
		match status {
			ConversationStatus::Open => ConversationStatusApi::Open,
			ConversationStatus::Closed => ConversationStatusApi::Closed,
			ConversationStatus::Converted => ConversationStatusApi::Converted,
		}
	}
}

impl From<ConversationStatusApi> for ConversationStatus {
	fn from(status: ConversationStatusApi) -> Self {
		match status {
			ConversationStatusApi::Open => ConversationStatus::Open,
			ConversationStatusApi::Closed => ConversationStatus::Closed,
			ConversationStatusApi::Converted => ConversationStatus::Converted,
		}
	}
}

impl From<MessageDirection> for MessageDirectionApi {
	fn from(direction: MessageDirection) -> Self {
		match direction {
			MessageDirection::Inbound => MessageDirectionApi::Inbound,
			MessageDirection::Outbound => MessageDirectionApi::Outbound,
		}
	}
}

impl From<MessageDirectionApi> for MessageDirection {
	fn from(direction: MessageDirectionApi) -> Self {
		match direction {
			MessageDirectionApi::Inbound => MessageDirection::Inbound,
			MessageDirectionApi::Outbound => MessageDirection::Outbound,
		}
	}
}
