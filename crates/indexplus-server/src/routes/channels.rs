// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Messaging channel HTTP handlers.
//!
//! Channels are workspace configuration, so connecting and removing them
//! requires the `manage_settings` capability. Listing is open to any
//! authenticated member. Channels have no update surface; a misconfigured
//! channel is removed and connected again.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use indexplus_common_i18n::t;
use indexplus_server_audit::{AuditEventType, AuditLogBuilder};
use indexplus_server_auth::{can, Capability, ChannelId};
use indexplus_server_db::{Channel, ChannelKind};

pub use indexplus_server_api::channels::*;

use crate::{
	api::AppState,
	api_response::{parse_uuid, ApiError},
	auth_middleware::{member_locale, RequireAuth},
};

#[utoipa::path(
    get,
    path = "/api/channels",
    responses(
        (status = 200, description = "Connected channels", body = ListChannelsResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "channels"
)]
/// GET /api/channels - List the caller's company channels.
#[tracing::instrument(skip(current, state))]
pub async fn list_channels(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<ListChannelsResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let channels = state
		.channel_repo
		.list_channels(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(ListChannelsResponse {
		success: true,
		channels: channels
			.into_iter()
			.map(ChannelResponse::from_channel)
			.collect(),
	}))
}

#[utoipa::path(
    post,
    path = "/api/channels",
    request_body = CreateChannelRequest,
    responses(
        (status = 201, description = "Channel connected", body = ChannelEnvelopeResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_settings", body = crate::api_response::FailureResponse)
    ),
    tag = "channels"
)]
/// POST /api/channels - Connect a messaging channel.
#[tracing::instrument(skip(current, state, payload))]
pub async fn create_channel(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateChannelRequest>,
) -> Result<impl IntoResponse, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageSettings) {
		return Err(ApiError::denied(locale));
	}

	let kind = payload
		.kind
		.parse::<ChannelKind>()
		.map_err(|_| ApiError::invalid_input(locale, "server.api.invalid_channel_kind"))?;

	let display_name = payload.display_name.trim();
	if display_name.is_empty() {
		return Err(ApiError::invalid_input(locale, "server.api.invalid_name"));
	}

	let mut channel = Channel::new(current.member.company_id, kind, display_name);
	channel.external_id = payload.external_id;

	state
		.channel_repo
		.create_channel(&channel)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::ChannelConnected)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("channel", channel.id.to_string())
			.after(serde_json::json!({
				"kind": channel.kind.to_string(),
				"display_name": channel.display_name,
			}))
			.build(),
	);

	tracing::info!(
		channel_id = %channel.id,
		company_id = %current.member.company_id,
		kind = %channel.kind,
		"channel connected"
	);

	Ok((
		StatusCode::CREATED,
		Json(ChannelEnvelopeResponse::new(channel)),
	))
}

#[utoipa::path(
    delete,
    path = "/api/channels/{id}",
    params(
        ("id" = String, Path, description = "Channel ID")
    ),
    responses(
        (status = 200, description = "Channel removed", body = ChannelSuccessResponse),
        (status = 403, description = "Missing manage_settings", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such channel in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "channels"
)]
/// DELETE /api/channels/{id} - Remove a messaging channel.
#[tracing::instrument(skip(current, state), fields(%id))]
pub async fn delete_channel(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<ChannelSuccessResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageSettings) {
		return Err(ApiError::denied(locale));
	}

	let channel_id = ChannelId::new(parse_uuid(&id, locale)?);

	let deleted = state
		.channel_repo
		.delete_channel(&channel_id, &current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;
	if !deleted {
		return Err(ApiError::not_found(locale, "server.api.channel_not_found"));
	}

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::ChannelRemoved)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("channel", channel_id.to_string())
			.build(),
	);

	tracing::info!(
		channel_id = %channel_id,
		company_id = %current.member.company_id,
		"channel removed"
	);

	Ok(Json(ChannelSuccessResponse {
		success: true,
		message: t(locale, "server.api.channel_removed"),
	}))
}
