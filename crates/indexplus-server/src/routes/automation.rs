// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Automation flow template HTTP handlers.
//!
//! Reads are open to any authenticated member; writes require the
//! `manage_automation` capability. The flow definition is an opaque JSON
//! document; the server stores and returns it without interpreting steps.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use chrono::Utc;
use indexplus_common_i18n::t;
use indexplus_server_audit::{AuditEventType, AuditLogBuilder};
use indexplus_server_auth::{can, Capability, TemplateId};
use indexplus_server_db::FlowTemplate;

pub use indexplus_server_api::automation::*;

use crate::{
	api::AppState,
	api_response::{parse_uuid, ApiError},
	auth_middleware::{member_locale, RequireAuth},
};

#[utoipa::path(
    get,
    path = "/api/automation/templates",
    responses(
        (status = 200, description = "Company flow templates", body = ListTemplatesResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "automation"
)]
/// GET /api/automation/templates - List the caller's company flow templates.
#[tracing::instrument(skip(current, state))]
pub async fn list_templates(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<ListTemplatesResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let templates = state
		.template_repo
		.list_templates(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(ListTemplatesResponse {
		success: true,
		templates: templates
			.into_iter()
			.map(TemplateResponse::from_template)
			.collect(),
	}))
}

#[utoipa::path(
    post,
    path = "/api/automation/templates",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = TemplateEnvelopeResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_automation", body = crate::api_response::FailureResponse)
    ),
    tag = "automation"
)]
/// POST /api/automation/templates - Create a flow template.
#[tracing::instrument(skip(current, state, payload))]
pub async fn create_template(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateTemplateRequest>,
) -> Result<impl IntoResponse, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageAutomation) {
		return Err(ApiError::denied(locale));
	}

	let name = payload.name.trim();
	if name.is_empty() {
		return Err(ApiError::invalid_input(locale, "server.api.invalid_name"));
	}

	let mut template = FlowTemplate::new(current.member.company_id, name, payload.definition);
	template.enabled = payload.enabled;

	state
		.template_repo
		.create_template(&template)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::TemplateCreated)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("template", template.id.to_string())
			.after(serde_json::json!({
				"name": template.name,
				"enabled": template.enabled,
			}))
			.build(),
	);

	tracing::info!(
		template_id = %template.id,
		company_id = %current.member.company_id,
		"flow template created"
	);

	Ok((
		StatusCode::CREATED,
		Json(TemplateEnvelopeResponse::new(template)),
	))
}

#[utoipa::path(
    patch,
    path = "/api/automation/templates/{id}",
    params(
        ("id" = String, Path, description = "Template ID")
    ),
    request_body = UpdateTemplateRequest,
    responses(
        (status = 200, description = "Template updated", body = TemplateEnvelopeResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_automation", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such template in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "automation"
)]
/// PATCH /api/automation/templates/{id} - Update a flow template.
#[tracing::instrument(skip(current, state, payload), fields(%id))]
pub async fn update_template(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateTemplateRequest>,
) -> Result<Json<TemplateEnvelopeResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageAutomation) {
		return Err(ApiError::denied(locale));
	}

	let template_id = TemplateId::new(parse_uuid(&id, locale)?);

	let mut template = match state
		.template_repo
		.get_template(&template_id, &current.member.company_id)
		.await
	{
		Ok(Some(template)) => template,
		Ok(None) => return Err(ApiError::not_found(locale, "server.api.template_not_found")),
		Err(err) => return Err(ApiError::storage(err, locale)),
	};

	if payload.name.is_none() && payload.definition.is_none() && payload.enabled.is_none() {
		return Err(ApiError::invalid_input(locale, "server.api.empty_update"));
	}

	let before = serde_json::json!({
		"name": template.name,
		"enabled": template.enabled,
	});

	if let Some(name) = &payload.name {
		let name = name.trim();
		if name.is_empty() {
			return Err(ApiError::invalid_input(locale, "server.api.invalid_name"));
		}
		template.name = name.to_string();
	}
	if let Some(definition) = payload.definition {
		template.definition = definition;
	}
	if let Some(enabled) = payload.enabled {
		template.enabled = enabled;
	}
	template.updated_at = Utc::now();

	state
		.template_repo
		.update_template(&template)
		.await
		.map_err(|err| ApiError::from_db(err, locale, "server.api.template_not_found"))?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::TemplateUpdated)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("template", template.id.to_string())
			.before(before)
			.after(serde_json::json!({
				"name": template.name,
				"enabled": template.enabled,
			}))
			.build(),
	);

	tracing::info!(
		template_id = %template.id,
		company_id = %current.member.company_id,
		"flow template updated"
	);

	Ok(Json(TemplateEnvelopeResponse::new(template)))
}

#[utoipa::path(
    delete,
    path = "/api/automation/templates/{id}",
    params(
        ("id" = String, Path, description = "Template ID")
    ),
    responses(
        (status = 200, description = "Template deleted", body = TemplateSuccessResponse),
        (status = 403, description = "Missing manage_automation", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such template in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "automation"
)]
/// DELETE /api/automation/templates/{id} - Delete a flow template.
#[tracing::instrument(skip(current, state), fields(%id))]
pub async fn delete_template(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<TemplateSuccessResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageAutomation) {
		return Err(ApiError::denied(locale));
	}

	let template_id = TemplateId::new(parse_uuid(&id, locale)?);

	let deleted = state
		.template_repo
		.delete_template(&template_id, &current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;
	if !deleted {
		return Err(ApiError::not_found(locale, "server.api.template_not_found"));
	}

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::TemplateDeleted)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("template", template_id.to_string())
			.build(),
	);

	tracing::info!(
		template_id = %template_id,
		company_id = %current.member.company_id,
		"flow template deleted"
	);

	Ok(Json(TemplateSuccessResponse {
		success: true,
		message: t(locale, "server.api.template_deleted"),
	}))
}
