// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit trail HTTP handlers.

use axum::{
	extract::{Query, State},
	Json,
};
use indexplus_server_auth::{can, Capability};

pub use indexplus_server_api::audit::*;

use crate::{
	api::AppState,
	api_response::ApiError,
	auth_middleware::{member_locale, RequireAuth},
};

#[utoipa::path(
    get,
    path = "/api/audit/logs",
    params(ListAuditLogsParams),
    responses(
        (status = 200, description = "Audit log entries, newest first", body = ListAuditLogsResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing view_audit_logs", body = crate::api_response::FailureResponse)
    ),
    tag = "audit"
)]
/// GET /api/audit/logs - Query the caller's company audit trail.
#[tracing::instrument(skip(current, state, params))]
pub async fn list_audit_logs(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Query(params): Query<ListAuditLogsParams>,
) -> Result<Json<ListAuditLogsResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ViewAuditLogs) {
		return Err(ApiError::denied(locale));
	}

	let limit = params.limit.clamp(1, 1000);
	let offset = params.offset.max(0);

	let (entries, total) = state
		.audit_repo
		.query_logs(
			&current.member.company_id,
			params.event_type.as_deref(),
			params.actor_id.as_deref(),
			params.entity_type.as_deref(),
			params.entity_id.as_deref(),
			params.from,
			params.to,
			Some(limit),
			Some(offset),
		)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(ListAuditLogsResponse {
		success: true,
		logs: entries
			.into_iter()
			.map(AuditLogEntryResponse::from_entry)
			.collect(),
		total,
		limit,
		offset,
	}))
}
