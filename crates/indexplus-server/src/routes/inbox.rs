// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared inbox HTTP handlers: conversations, messages, and the
//! conversation-to-sale conversion.
//!
//! Conversations and messages are ordinary working data, open to every
//! authenticated member of the company. Converting a conversation creates
//! a sale, so that one action requires `manage_sales`. Messages can only
//! be appended while the conversation is open.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use chrono::Utc;
use indexplus_server_audit::{AuditEventType, AuditLogBuilder};
use indexplus_server_auth::{can, Capability, ChannelId, ConversationId, CustomerId};
use indexplus_server_db::{
	Conversation, ConversationStatus, Message, MessageDirection, Sale,
};
use serde::Deserialize;

pub use indexplus_server_api::inbox::*;
use indexplus_server_api::sales::SaleResponse;

use crate::{
	api::AppState,
	api_response::{parse_uuid, ApiError},
	auth_middleware::{member_locale, RequireAuth},
};

/// Query parameters for the conversation list.
#[derive(Debug, Deserialize)]
pub struct ListConversationsQuery {
	/// Filter by lifecycle state: `open`, `closed`, or `converted`.
	pub status: Option<String>,
}

/// Fetches a conversation scoped to the caller's company.
async fn load_conversation(
	state: &AppState,
	id: &ConversationId,
	company_id: &indexplus_server_auth::CompanyId,
	locale: &str,
) -> Result<Conversation, ApiError> {
	match state.conversation_repo.get_conversation(id, company_id).await {
		Ok(Some(conversation)) => Ok(conversation),
		Ok(None) => Err(ApiError::not_found(
			locale,
			"server.api.conversation_not_found",
		)),
		Err(err) => Err(ApiError::storage(err, locale)),
	}
}

#[utoipa::path(
    get,
    path = "/api/conversations",
    params(
        ("status" = Option<String>, Query, description = "Filter by lifecycle state")
    ),
    responses(
        (status = 200, description = "Company conversations", body = ListConversationsResponse),
        (status = 400, description = "Unknown status filter", body = crate::api_response::FailureResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "inbox"
)]
/// GET /api/conversations - List conversations, optionally filtered by status.
#[tracing::instrument(skip(current, state))]
pub async fn list_conversations(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Query(query): Query<ListConversationsQuery>,
) -> Result<Json<ListConversationsResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let status = match query.status.as_deref() {
		None => None,
		Some(value) => Some(
			value
				.parse::<ConversationStatus>()
				.map_err(|_| ApiError::invalid_input(locale, "server.api.invalid_status"))?,
		),
	};

	let conversations = state
		.conversation_repo
		.list_conversations(&current.member.company_id, status)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(ListConversationsResponse {
		success: true,
		conversations: conversations
			.into_iter()
			.map(ConversationResponse::from_conversation)
			.collect(),
	}))
}

#[utoipa::path(
    post,
    path = "/api/conversations",
    request_body = CreateConversationRequest,
    responses(
        (status = 201, description = "Conversation opened", body = ConversationEnvelopeResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse),
        (status = 404, description = "Linked customer or channel not found", body = crate::api_response::FailureResponse)
    ),
    tag = "inbox"
)]
/// POST /api/conversations - Open a conversation.
#[tracing::instrument(skip(current, state, payload))]
pub async fn create_conversation(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateConversationRequest>,
) -> Result<impl IntoResponse, ApiError> {
	let locale = member_locale(&current, &state);

	let mut conversation = Conversation::new(current.member.company_id);

	if let Some(raw) = &payload.customer_id {
		let customer_id = CustomerId::new(parse_uuid(raw, locale)?);
		match state
			.customer_repo
			.get_customer(&customer_id, &current.member.company_id)
			.await
		{
			Ok(Some(_)) => conversation.customer_id = Some(customer_id),
			Ok(None) => {
				return Err(ApiError::not_found(locale, "server.api.customer_not_found"))
			}
			Err(err) => return Err(ApiError::storage(err, locale)),
		}
	}
	if let Some(raw) = &payload.channel_id {
		let channel_id = ChannelId::new(parse_uuid(raw, locale)?);
		match state
			.channel_repo
			.get_channel(&channel_id, &current.member.company_id)
			.await
		{
			Ok(Some(_)) => conversation.channel_id = Some(channel_id),
			Ok(None) => {
				return Err(ApiError::not_found(locale, "server.api.channel_not_found"))
			}
			Err(err) => return Err(ApiError::storage(err, locale)),
		}
	}

	state
		.conversation_repo
		.create_conversation(&conversation)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	tracing::info!(
		conversation_id = %conversation.id,
		company_id = %current.member.company_id,
		"conversation opened"
	);

	Ok((
		StatusCode::CREATED,
		Json(ConversationEnvelopeResponse::new(conversation)),
	))
}

#[utoipa::path(
    patch,
    path = "/api/conversations/{id}",
    params(
        ("id" = String, Path, description = "Conversation ID")
    ),
    request_body = UpdateConversationRequest,
    responses(
        (status = 200, description = "Conversation updated", body = ConversationEnvelopeResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such conversation in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "inbox"
)]
/// PATCH /api/conversations/{id} - Change a conversation's status or linked customer.
#[tracing::instrument(skip(current, state, payload), fields(%id))]
pub async fn update_conversation(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateConversationRequest>,
) -> Result<Json<ConversationEnvelopeResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let conversation_id = ConversationId::new(parse_uuid(&id, locale)?);
	let mut conversation =
		load_conversation(&state, &conversation_id, &current.member.company_id, locale).await?;

	if payload.status.is_none() && payload.customer_id.is_none() {
		return Err(ApiError::invalid_input(locale, "server.api.empty_update"));
	}

	if let Some(raw) = &payload.status {
		let status = raw
			.parse::<ConversationStatus>()
			.map_err(|_| ApiError::invalid_input(locale, "server.api.invalid_status"))?;
		state
			.conversation_repo
			.update_conversation_status(&conversation_id, &current.member.company_id, status)
			.await
			.map_err(|err| {
				ApiError::from_db(err, locale, "server.api.conversation_not_found")
			})?;
		conversation.status = status;
	}
	if let Some(raw) = &payload.customer_id {
		let customer_id = CustomerId::new(parse_uuid(raw, locale)?);
		match state
			.customer_repo
			.get_customer(&customer_id, &current.member.company_id)
			.await
		{
			Ok(Some(_)) => {}
			Ok(None) => {
				return Err(ApiError::not_found(locale, "server.api.customer_not_found"))
			}
			Err(err) => return Err(ApiError::storage(err, locale)),
		}
		state
			.conversation_repo
			.link_customer(&conversation_id, &current.member.company_id, &customer_id)
			.await
			.map_err(|err| {
				ApiError::from_db(err, locale, "server.api.conversation_not_found")
			})?;
		conversation.customer_id = Some(customer_id);
	}
	conversation.updated_at = Utc::now();

	tracing::info!(
		conversation_id = %conversation.id,
		company_id = %current.member.company_id,
		"conversation updated"
	);

	Ok(Json(ConversationEnvelopeResponse::new(conversation)))
}

#[utoipa::path(
    get,
    path = "/api/conversations/{id}/messages",
    params(
        ("id" = String, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Messages in chronological order", body = ListMessagesResponse),
        (status = 404, description = "No such conversation in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "inbox"
)]
/// GET /api/conversations/{id}/messages - List a conversation's messages.
#[tracing::instrument(skip(current, state), fields(%id))]
pub async fn list_messages(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<ListMessagesResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let conversation_id = ConversationId::new(parse_uuid(&id, locale)?);
	load_conversation(&state, &conversation_id, &current.member.company_id, locale).await?;

	let messages = state
		.conversation_repo
		.list_messages(&conversation_id, &current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(ListMessagesResponse {
		success: true,
		messages: messages
			.into_iter()
			.map(MessageResponse::from_message)
			.collect(),
	}))
}

#[utoipa::path(
    post,
    path = "/api/conversations/{id}/messages",
    params(
        ("id" = String, Path, description = "Conversation ID")
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageEnvelopeResponse),
        (status = 400, description = "Empty body or closed conversation", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such conversation in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "inbox"
)]
/// POST /api/conversations/{id}/messages - Send an outbound message.
#[tracing::instrument(skip(current, state, payload), fields(%id))]
pub async fn send_message(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
	let locale = member_locale(&current, &state);

	let conversation_id = ConversationId::new(parse_uuid(&id, locale)?);
	let conversation =
		load_conversation(&state, &conversation_id, &current.member.company_id, locale).await?;

	if conversation.status != ConversationStatus::Open {
		return Err(ApiError::invalid_input(
			locale,
			"server.api.conversation_closed",
		));
	}

	let body = payload.body.trim();
	if body.is_empty() {
		return Err(ApiError::invalid_input(locale, "server.api.message_empty"));
	}

	let mut message = Message::new(conversation_id, MessageDirection::Outbound, body);
	message.sent_by = Some(current.member.user_id);

	state
		.conversation_repo
		.create_message(&message, &current.member.company_id)
		.await
		.map_err(|err| ApiError::from_db(err, locale, "server.api.conversation_not_found"))?;

	tracing::info!(
		message_id = %message.id,
		conversation_id = %conversation_id,
		"message sent"
	);

	Ok((
		StatusCode::CREATED,
		Json(MessageEnvelopeResponse::new(message)),
	))
}

#[utoipa::path(
    post,
    path = "/api/conversations/{id}/convert",
    params(
        ("id" = String, Path, description = "Conversation ID")
    ),
    request_body = ConvertConversationRequest,
    responses(
        (status = 200, description = "Conversation converted into a sale", body = ConvertConversationResponse),
        (status = 400, description = "Invalid amount or conversation already closed", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_sales", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such conversation in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "inbox"
)]
/// POST /api/conversations/{id}/convert - Turn an open conversation into a sale.
///
/// The sale inherits the conversation's linked customer and records the
/// source conversation. The conversation moves to `converted`, which is
/// terminal for messaging.
#[tracing::instrument(skip(current, state, payload), fields(%id))]
pub async fn convert_conversation(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<ConvertConversationRequest>,
) -> Result<Json<ConvertConversationResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageSales) {
		return Err(ApiError::denied(locale));
	}

	let conversation_id = ConversationId::new(parse_uuid(&id, locale)?);
	let mut conversation =
		load_conversation(&state, &conversation_id, &current.member.company_id, locale).await?;

	if conversation.status != ConversationStatus::Open {
		return Err(ApiError::invalid_input(
			locale,
			"server.api.conversation_closed",
		));
	}
	if payload.amount_cents <= 0 {
		return Err(ApiError::invalid_input(locale, "server.api.invalid_amount"));
	}

	let description = payload
		.description
		.as_deref()
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.unwrap_or("Converted conversation");

	let mut sale = Sale::new(
		current.member.company_id,
		description,
		payload.amount_cents,
	);
	sale.customer_id = conversation.customer_id;
	sale.conversation_id = Some(conversation.id);
	sale.created_by = Some(current.member.user_id);

	state
		.sale_repo
		.create_sale(&sale)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	state
		.conversation_repo
		.update_conversation_status(
			&conversation_id,
			&current.member.company_id,
			ConversationStatus::Converted,
		)
		.await
		.map_err(|err| ApiError::from_db(err, locale, "server.api.conversation_not_found"))?;
	conversation.status = ConversationStatus::Converted;
	conversation.updated_at = Utc::now();

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::ConversationConverted)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("conversation", conversation.id.to_string())
			.details(serde_json::json!({
				"sale_id": sale.id.to_string(),
				"amount_cents": sale.amount_cents,
			}))
			.build(),
	);

	tracing::info!(
		conversation_id = %conversation.id,
		sale_id = %sale.id,
		company_id = %current.member.company_id,
		"conversation converted"
	);

	Ok(Json(ConvertConversationResponse {
		success: true,
		conversation: ConversationResponse::from_conversation(conversation),
		sale: SaleResponse::from_sale(sale),
	}))
}
