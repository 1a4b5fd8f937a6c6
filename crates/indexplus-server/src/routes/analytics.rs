// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Analytics HTTP handlers.

use axum::{extract::State, Json};
use indexplus_server_auth::{can, Capability};

pub use indexplus_server_api::analytics::*;

use crate::{
	api::AppState,
	api_response::ApiError,
	auth_middleware::{member_locale, RequireAuth},
};

#[utoipa::path(
    get,
    path = "/api/analytics/summary",
    responses(
        (status = 200, description = "Company analytics counts", body = AnalyticsSummaryResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing view_analytics", body = crate::api_response::FailureResponse)
    ),
    tag = "analytics"
)]
/// GET /api/analytics/summary - Aggregated counts for the caller's company.
#[tracing::instrument(skip(current, state))]
pub async fn analytics_summary(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<AnalyticsSummaryResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ViewAnalytics) {
		return Err(ApiError::denied(locale));
	}

	let summary = state
		.analytics_repo
		.summary(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(AnalyticsSummaryResponse::new(summary)))
}
