// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Company settings HTTP handlers.
//!
//! Reading the workspace settings is open to any authenticated member;
//! changing them requires `manage_settings`. Renaming the company
//! re-derives the URL slug from the new name.

use axum::{
	extract::State,
	Json,
};
use indexplus_common_i18n::is_supported;
use indexplus_server_audit::{AuditEventType, AuditLogBuilder};
use indexplus_server_auth::{can, slugify, validate_company_name, Capability, Company};

pub use indexplus_server_api::settings::*;

use crate::{
	api::AppState,
	api_response::ApiError,
	auth_middleware::{member_locale, RequireAuth},
};

/// Fetches the caller's company row.
async fn load_company(
	state: &AppState,
	current: &indexplus_server_auth::middleware::CurrentMember,
	locale: &str,
) -> Result<Company, ApiError> {
	match state
		.company_repo
		.get_company(&current.member.company_id)
		.await
	{
		Ok(Some(company)) => Ok(company),
		Ok(None) => Err(ApiError::not_found(locale, "server.api.company_not_found")),
		Err(err) => Err(ApiError::storage(err, locale)),
	}
}

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Workspace settings", body = SettingsEnvelopeResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "settings"
)]
/// GET /api/settings - Read the caller's workspace settings.
#[tracing::instrument(skip(current, state))]
pub async fn get_settings(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<SettingsEnvelopeResponse>, ApiError> {
	let locale = member_locale(&current, &state);
	let company = load_company(&state, &current, locale).await?;
	Ok(Json(SettingsEnvelopeResponse::new(company)))
}

#[utoipa::path(
    patch,
    path = "/api/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = SettingsEnvelopeResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_settings", body = crate::api_response::FailureResponse)
    ),
    tag = "settings"
)]
/// PATCH /api/settings - Update the workspace name, timezone, or default locale.
#[tracing::instrument(skip(current, state, payload))]
pub async fn update_settings(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsEnvelopeResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageSettings) {
		return Err(ApiError::denied(locale));
	}

	let mut company = load_company(&state, &current, locale).await?;

	if payload.name.is_none() && payload.timezone.is_none() && payload.default_locale.is_none() {
		return Err(ApiError::invalid_input(locale, "server.api.empty_update"));
	}

	let before = serde_json::json!({
		"name": company.name,
		"timezone": company.timezone,
		"default_locale": company.default_locale,
	});

	if let Some(name) = &payload.name {
		if validate_company_name(name).is_err() {
			return Err(ApiError::invalid_input(
				locale,
				"server.api.invalid_company_name",
			));
		}
		company.name = name.trim().to_string();
		company.slug = slugify(&company.name);
	}
	if let Some(timezone) = &payload.timezone {
		let timezone = timezone.trim();
		if timezone.is_empty() {
			return Err(ApiError::invalid_input(
				locale,
				"server.api.invalid_timezone",
			));
		}
		company.timezone = timezone.to_string();
	}
	if let Some(default_locale) = &payload.default_locale {
		if !is_supported(default_locale) {
			return Err(ApiError::invalid_input(locale, "server.api.invalid_locale"));
		}
		company.default_locale = default_locale.clone();
	}
	company.updated_at = chrono::Utc::now();

	state
		.company_repo
		.update_company(&company)
		.await
		.map_err(|err| ApiError::from_db(err, locale, "server.api.company_not_found"))?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::SettingsUpdated)
			.company(company.id)
			.actor(current.member.user_id)
			.entity("company", company.id.to_string())
			.before(before)
			.after(serde_json::json!({
				"name": company.name,
				"timezone": company.timezone,
				"default_locale": company.default_locale,
			}))
			.build(),
	);

	tracing::info!(
		company_id = %company.id,
		"workspace settings updated"
	);

	Ok(Json(SettingsEnvelopeResponse::new(company)))
}
