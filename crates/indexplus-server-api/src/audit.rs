// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use indexplus_server_audit::AuditLogEntry;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

/// An audit log entry in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuditLogEntryResponse {
	pub id: String,
	pub timestamp: DateTime<Utc>,
	pub event_type: String,
	pub severity: String,
	pub actor_user_id: Option<String>,
	pub entity_type: Option<String>,
	pub entity_id: Option<String>,
	pub action: String,
	pub before: Option<serde_json::Value>,
	pub after: Option<serde_json::Value>,
	pub details: serde_json::Value,
}

/// Paginated list of audit log entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListAuditLogsResponse {
	pub success: bool,
	pub logs: Vec<AuditLogEntryResponse>,
	pub total: i64,
	pub limit: i64,
	pub offset: i64,
}

/// Query parameters for listing audit logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct ListAuditLogsParams {
	pub event_type: Option<String>,
	pub actor_id: Option<String>,
	pub entity_type: Option<String>,
	pub entity_id: Option<String>,
	pub from: Option<DateTime<Utc>>,
	pub to: Option<DateTime<Utc>>,
	#[serde(default = "default_limit")]
	pub limit: i64,
	#[serde(default)]
	pub offset: i64,
}

fn default_limit() -> i64 {
	50
}

impl AuditLogEntryResponse {
	pub fn from_entry(entry: AuditLogEntry) -> Self {
		Self {
			id: entry.id.to_string(),
			timestamp: entry.timestamp,
			event_type: entry.event_type.to_string(),
			severity: entry.severity.to_string(),
			actor_user_id: entry.actor_user_id.map(|id| id.to_string()),
			entity_type: entry.entity_type,
			entity_id: entry.entity_id,
			action: entry.action,
			before: entry.before,
			after: entry.after,
			details: entry.details,
		}
	}
}
