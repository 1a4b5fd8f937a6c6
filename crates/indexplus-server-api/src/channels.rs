// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use indexplus_server_db::{Channel, ChannelKind};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Messaging platform for API payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ChannelKindApi {
	Whatsapp,
	Messenger,
	Instagram,
	Webchat,
}

/// A connected messaging channel in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ChannelResponse {
	pub id: String,
	pub kind: ChannelKindApi,
	pub display_name: String,
	pub external_id: Option<String>,
	pub created_at: DateTime<Utc>,
}

/// Response for listing channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListChannelsResponse {
	pub success: bool,
	pub channels: Vec<ChannelResponse>,
}

/// Request to connect a channel. The kind string is parsed by the
/// handler so unknown platforms fail with a localized message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateChannelRequest {
	pub kind: String,
	pub display_name: String,
	pub external_id: Option<String>,
}

/// Response carrying a single channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ChannelEnvelopeResponse {
	pub success: bool,
	pub channel: ChannelResponse,
}

/// Success response for channel operations without a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ChannelSuccessResponse {
	pub success: bool,
	pub message: String,
}

impl ChannelResponse {
	pub fn from_channel(channel: Channel) -> Self {
		Self {
			id: channel.id.to_string(),
			kind: channel.kind.into(),
			display_name: channel.display_name,
			external_id: channel.external_id,
			created_at: channel.created_at,
		}
	}
}

impl ChannelEnvelopeResponse {
	pub fn new(channel: Channel) -> Self {
		Self {
			success: true,
			channel: ChannelResponse::from_channel(channel),
		}
	}
}

impl From<ChannelKind> for ChannelKindApi {
	fn from(kind: ChannelKind) -> Self {
		match kind {
			ChannelKind::Whatsapp => ChannelKindApi::Whatsapp,
			ChannelKind::Messenger => ChannelKindApi::Messenger,
			ChannelKind::Instagram => ChannelKindApi::Instagram,
			ChannelKind::Webchat => ChannelKindApi::Webchat,
		}
	}
}

impl From<ChannelKindApi> for ChannelKind {
	fn from(kind: ChannelKindApi) -> Self {
		match kind {
			ChannelKindApi::Whatsapp => ChannelKind::Whatsapp,
			ChannelKindApi::Messenger => ChannelKind::Messenger,
			ChannelKindApi::Instagram => ChannelKind::Instagram,
			ChannelKindApi::Webchat => ChannelKind::Webchat,
		}
	}
}
