// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Team member lifecycle HTTP handlers.
//!
//! The four mutation handlers re-fetch the caller's member profile row and
//! route the decision through `can(caller, manage_team)`; role and status
//! claims from the request body or the session token are never trusted.
//! Role and status changes are written to both the identity directory's
//! admin metadata partition and the member profile row so the two stay
//! consistent; a failure between the writes surfaces as an error.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use chrono::Utc;
use indexplus_common_i18n::{t, t_fmt};
use indexplus_server_audit::{AuditEventType, AuditLogBuilder};
use indexplus_server_auth::{
	can, validate_email, validate_full_name, validate_password, Capability, Member, MemberStatus,
	Role, UserId,
};
use indexplus_server_identity::{AppMetadata, UserMetadata};

pub use indexplus_server_api::team::*;

use crate::{
	api::AppState,
	api_response::{parse_uuid, ApiError},
	auth_middleware::{member_locale, CurrentMember, RequireAuth},
	routes::auth::await_provisioned_member,
};

/// Re-fetches the caller's profile row and requires `manage_team`.
///
/// Denials are themselves audited.
async fn require_manage_team(
	state: &AppState,
	current: &CurrentMember,
	locale: &str,
	action: &str,
) -> Result<Member, ApiError> {
	let caller = match state
		.member_repo
		.get_member_in_company(&current.member.user_id, &current.member.company_id)
		.await
	{
		Ok(Some(member)) => member,
		Ok(None) => return Err(ApiError::authentication_failed(locale)),
		Err(err) => return Err(ApiError::storage(err, locale)),
	};

	if !can(Some(&caller.principal()), Capability::ManageTeam) {
		state.audit_service.log(
			AuditLogBuilder::new(AuditEventType::AccessDenied)
				.company(caller.company_id)
				.actor(caller.user_id)
				.action(action)
				.details(serde_json::json!({
					"capability": Capability::ManageTeam.to_string(),
				}))
				.build(),
		);
		return Err(ApiError::denied(locale));
	}

	Ok(caller)
}

fn member_snapshot(member: &Member) -> serde_json::Value {
	serde_json::json!({
		"full_name": member.full_name,
		"role": member.role.to_string(),
		"status": member.status.to_string(),
	})
}

#[utoipa::path(
    get,
    path = "/api/team/members",
    responses(
        (status = 200, description = "Company members", body = ListMembersResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "team"
)]
/// GET /api/team/members - List the caller's company members.
#[tracing::instrument(skip(current, state))]
pub async fn list_members(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<ListMembersResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let members = state
		.member_repo
		.list_members(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(ListMembersResponse {
		success: true,
		members: members.into_iter().map(MemberResponse::from_member).collect(),
	}))
}

#[utoipa::path(
    post,
    path = "/api/team/members",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member created", body = MemberEnvelopeResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_team", body = crate::api_response::FailureResponse),
        (status = 502, description = "Identity directory rejected the account", body = crate::api_response::FailureResponse)
    ),
    tag = "team"
)]
/// POST /api/team/members - Create a member account in the caller's company.
///
/// The profile row is provisioned by the data store from the identity
/// insert; the handler polls for it with a bounded deadline.
#[tracing::instrument(skip(current, state, payload))]
pub async fn create_member(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
	let locale = member_locale(&current, &state);

	let Some(identity) = state.identity.clone() else {
		return Err(ApiError::Downstream(t(
			locale,
			"server.api.identity_unavailable",
		)));
	};

	let caller = require_manage_team(&state, &current, locale, "member_create").await?;

	if validate_email(&payload.email).is_err() {
		return Err(ApiError::invalid_input(locale, "server.api.invalid_email"));
	}
	if validate_password(&payload.password).is_err() {
		return Err(ApiError::InvalidInput(t_fmt(
			locale,
			"server.api.invalid_password",
			&[("min", "8")],
		)));
	}
	if validate_full_name(&payload.full_name).is_err() {
		return Err(ApiError::invalid_input(
			locale,
			"server.api.invalid_full_name",
		));
	}

	let role = match payload.role.as_deref() {
		None => Role::Agent,
		Some(value) => value
			.parse::<Role>()
			.map_err(|_| ApiError::invalid_input(locale, "server.api.invalid_role"))?,
	};

	let user = identity
		.create_user(
			&payload.email,
			&payload.password,
			&UserMetadata::new(payload.full_name.trim()),
			&AppMetadata::new(caller.company_id, role),
		)
		.await
		.map_err(|err| ApiError::from_identity(err, locale))?;

	let member = await_provisioned_member(&state, &user.id, locale).await?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::MemberCreated)
			.company(caller.company_id)
			.actor(caller.user_id)
			.entity("member", member.user_id.to_string())
			.after(member_snapshot(&member))
			.build(),
	);

	tracing::info!(
		user_id = %member.user_id,
		company_id = %caller.company_id,
		role = %member.role,
		"team member created"
	);

	Ok((StatusCode::CREATED, Json(MemberEnvelopeResponse::new(member))))
}

#[utoipa::path(
    patch,
    path = "/api/team/members/{id}",
    params(
        ("id" = String, Path, description = "Member user ID")
    ),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member updated", body = MemberEnvelopeResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_team", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such member in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "team"
)]
/// PATCH /api/team/members/{id} - Update a member's profile, role, or status.
#[tracing::instrument(skip(current, state, payload), fields(%id))]
pub async fn update_member(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateMemberRequest>,
) -> Result<Json<MemberEnvelopeResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let Some(identity) = state.identity.clone() else {
		return Err(ApiError::Downstream(t(
			locale,
			"server.api.identity_unavailable",
		)));
	};

	let caller = require_manage_team(&state, &current, locale, "member_update").await?;

	let target_id = UserId::new(parse_uuid(&id, locale)?);

	let target = match state
		.member_repo
		.get_member_in_company(&target_id, &caller.company_id)
		.await
	{
		Ok(Some(member)) => member,
		Ok(None) => return Err(ApiError::not_found(locale, "server.api.member_not_found")),
		Err(err) => return Err(ApiError::storage(err, locale)),
	};

	if payload.full_name.is_none() && payload.role.is_none() && payload.status.is_none() {
		return Err(ApiError::invalid_input(locale, "server.api.empty_update"));
	}

	let before = member_snapshot(&target);
	let mut updated = target.clone();

	if let Some(full_name) = &payload.full_name {
		if validate_full_name(full_name).is_err() {
			return Err(ApiError::invalid_input(
				locale,
				"server.api.invalid_full_name",
			));
		}
		updated.full_name = full_name.trim().to_string();
	}
	if let Some(role) = &payload.role {
		updated.role = role
			.parse::<Role>()
			.map_err(|_| ApiError::invalid_input(locale, "server.api.invalid_role"))?;
	}
	if let Some(status) = &payload.status {
		updated.status = status
			.parse::<MemberStatus>()
			.map_err(|_| ApiError::invalid_input(locale, "server.api.invalid_status"))?;
	}
	updated.updated_at = Utc::now();

	// Identity directory first, then the profile row authorization reads.
	if payload.role.is_some() || payload.status.is_some() {
		identity
			.update_app_metadata(
				&target.user_id,
				&AppMetadata::new(target.company_id, updated.role).with_status(updated.status),
			)
			.await
			.map_err(|err| ApiError::from_identity(err, locale))?;
	}
	if payload.full_name.is_some() {
		identity
			.update_user_metadata(
				&target.user_id,
				&UserMetadata {
					full_name: updated.full_name.clone(),
					locale: updated.locale.clone(),
				},
			)
			.await
			.map_err(|err| ApiError::from_identity(err, locale))?;
	}

	state
		.member_repo
		.update_member(&updated)
		.await
		.map_err(|err| ApiError::from_db(err, locale, "server.api.member_not_found"))?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::MemberUpdated)
			.company(caller.company_id)
			.actor(caller.user_id)
			.entity("member", updated.user_id.to_string())
			.before(before)
			.after(member_snapshot(&updated))
			.build(),
	);

	tracing::info!(
		user_id = %updated.user_id,
		company_id = %caller.company_id,
		"team member updated"
	);

	Ok(Json(MemberEnvelopeResponse::new(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/team/members/{id}",
    params(
        ("id" = String, Path, description = "Member user ID")
    ),
    responses(
        (status = 200, description = "Member removed", body = TeamSuccessResponse),
        (status = 400, description = "Attempted self-deletion", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_team", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such member in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "team"
)]
/// DELETE /api/team/members/{id} - Remove a member account and its sessions.
#[tracing::instrument(skip(current, state), fields(%id))]
pub async fn delete_member(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<TeamSuccessResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let Some(identity) = state.identity.clone() else {
		return Err(ApiError::Downstream(t(
			locale,
			"server.api.identity_unavailable",
		)));
	};

	let caller = require_manage_team(&state, &current, locale, "member_delete").await?;

	let target_id = UserId::new(parse_uuid(&id, locale)?);

	if target_id == caller.user_id {
		return Err(ApiError::invalid_input(
			locale,
			"server.api.cannot_delete_self",
		));
	}

	let target = match state
		.member_repo
		.get_member_in_company(&target_id, &caller.company_id)
		.await
	{
		Ok(Some(member)) => member,
		Ok(None) => return Err(ApiError::not_found(locale, "server.api.member_not_found")),
		Err(err) => return Err(ApiError::storage(err, locale)),
	};

	identity
		.delete_user(&target.user_id)
		.await
		.map_err(|err| ApiError::from_identity(err, locale))?;

	let deleted = state
		.member_repo
		.delete_member(&target.user_id, &caller.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;
	if !deleted {
		tracing::warn!(user_id = %target.user_id, "member row already gone during delete");
	}

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::MemberDeleted)
			.company(caller.company_id)
			.actor(caller.user_id)
			.entity("member", target.user_id.to_string())
			.before(member_snapshot(&target))
			.build(),
	);

	tracing::info!(
		user_id = %target.user_id,
		company_id = %caller.company_id,
		"team member deleted"
	);

	Ok(Json(TeamSuccessResponse {
		success: true,
		message: t(locale, "server.api.member_deleted"),
	}))
}

#[utoipa::path(
    post,
    path = "/api/team/members/{id}/password",
    params(
        ("id" = String, Path, description = "Member user ID")
    ),
    request_body = UpdateMemberPasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = TeamSuccessResponse),
        (status = 400, description = "Password too short", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_team", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such member in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "team"
)]
/// POST /api/team/members/{id}/password - Reset a member's password.
#[tracing::instrument(skip(current, state, payload), fields(%id))]
pub async fn update_member_password(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateMemberPasswordRequest>,
) -> Result<Json<TeamSuccessResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let Some(identity) = state.identity.clone() else {
		return Err(ApiError::Downstream(t(
			locale,
			"server.api.identity_unavailable",
		)));
	};

	let caller = require_manage_team(&state, &current, locale, "member_password_reset").await?;

	let target_id = UserId::new(parse_uuid(&id, locale)?);

	let target = match state
		.member_repo
		.get_member_in_company(&target_id, &caller.company_id)
		.await
	{
		Ok(Some(member)) => member,
		Ok(None) => return Err(ApiError::not_found(locale, "server.api.member_not_found")),
		Err(err) => return Err(ApiError::storage(err, locale)),
	};

	if validate_password(&payload.new_password).is_err() {
		return Err(ApiError::InvalidInput(t_fmt(
			locale,
			"server.api.invalid_password",
			&[("min", "8")],
		)));
	}

	identity
		.set_password(&target.user_id, &payload.new_password)
		.await
		.map_err(|err| ApiError::from_identity(err, locale))?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::MemberPasswordReset)
			.company(caller.company_id)
			.actor(caller.user_id)
			.entity("member", target.user_id.to_string())
			.build(),
	);

	tracing::info!(
		user_id = %target.user_id,
		company_id = %caller.company_id,
		"member password reset"
	);

	Ok(Json(TeamSuccessResponse {
		success: true,
		message: t(locale, "server.api.password_updated"),
	}))
}
