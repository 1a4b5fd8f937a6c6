// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication HTTP handlers.
//!
//! Signup creates the company, the identity account, and the session in
//! sequence; the member profile row itself is provisioned by the data
//! store as a side effect of the identity insert, so the handler polls
//! for it rather than writing it. Partial failures surface as errors,
//! they are not rolled back.

use std::time::Duration;

use axum::{
	extract::{Query, State},
	http::{header::SET_COOKIE, HeaderMap},
	response::{Html, IntoResponse, Response},
	Json,
};
use indexplus_common_i18n::{resolve_locale, t, t_fmt};
use indexplus_server_audit::{AuditEventType, AuditLogBuilder};
use indexplus_server_auth::{
	extract_bearer_token, extract_session_cookie_with_name, validate_company_name, validate_email,
	validate_full_name, validate_password, Company, Member, Role, UserId,
};
use indexplus_server_identity::{AppMetadata, IdentityError, UserMetadata};
use serde::Deserialize;

pub use indexplus_server_api::auth::*;
use indexplus_server_api::team::MemberResponse;

use crate::{
	api::AppState,
	api_response::ApiError,
	auth_middleware::{fallback_locale, member_locale, OptionalAuth, RequireAuth},
};

/// How often the signup and create-member handlers re-check for the
/// provisioned member row.
pub(crate) const PROVISION_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long the handlers wait for the row before giving up.
pub(crate) const PROVISION_TIMEOUT: Duration = Duration::from_secs(3);

/// Polls the member store until the profile row provisioned from an
/// identity insert becomes visible, or the deadline passes.
pub(crate) async fn await_provisioned_member(
	state: &AppState,
	user_id: &UserId,
	locale: &str,
) -> Result<Member, ApiError> {
	let deadline = tokio::time::Instant::now() + PROVISION_TIMEOUT;

	loop {
		match state.member_repo.get_member(user_id).await {
			Ok(Some(member)) => return Ok(member),
			Ok(None) => {}
			Err(err) => return Err(ApiError::storage(err, locale)),
		}

		if tokio::time::Instant::now() >= deadline {
			tracing::error!(%user_id, "member row not provisioned before deadline");
			return Err(ApiError::Downstream(t(
				locale,
				"server.api.provisioning_timeout",
			)));
		}

		tokio::time::sleep(PROVISION_POLL_INTERVAL).await;
	}
}

fn session_cookie(name: &str, token: &str, ttl_days: i64) -> String {
	let max_age = ttl_days * 86_400;
	format!("{name}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}")
}

fn clear_session_cookie(name: &str) -> String {
	format!("{name}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

#[utoipa::path(
    get,
    path = "/auth/login",
    responses(
        (status = 200, description = "Login page descriptor", body = AuthPageResponse)
    ),
    tag = "auth"
)]
/// GET /auth/login - Login page descriptor.
pub async fn login_page() -> Json<AuthPageResponse> {
	Json(AuthPageResponse::new("login"))
}

#[utoipa::path(
    get,
    path = "/auth/signup",
    responses(
        (status = 200, description = "Signup page descriptor", body = AuthPageResponse)
    ),
    tag = "auth"
)]
/// GET /auth/signup - Signup page descriptor.
pub async fn signup_page() -> Json<AuthPageResponse> {
	Json(AuthPageResponse::new("signup"))
}

/// Query parameters relayed by the external identity provider.
#[derive(Debug, Deserialize)]
pub struct ExternalCallbackParams {
	pub code: Option<String>,
	pub error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/auth/external-callback",
    params(
        ("code" = Option<String>, Query, description = "Authorization code on success"),
        ("error" = Option<String>, Query, description = "Provider error code on failure")
    ),
    responses(
        (status = 200, description = "Relay page that posts the outcome to the opening window", content_type = "text/html")
    ),
    tag = "auth"
)]
/// GET /auth/external-callback - OAuth relay page.
///
/// Lands in the popup opened for an external identity flow and posts
/// `{status, code|error}` back to the window that opened it.
#[tracing::instrument(skip(current, state, params))]
pub async fn external_callback(
	OptionalAuth(current): OptionalAuth,
	State(state): State<AppState>,
	Query(params): Query<ExternalCallbackParams>,
) -> Html<String> {
	let locale = match current.as_ref() {
		Some(current) => member_locale(current, &state),
		None => fallback_locale(&state),
	};

	let message = if let Some(error) = params.error {
		serde_json::json!({ "status": "error", "error": error })
	} else if let Some(code) = params.code {
		serde_json::json!({ "status": "success", "code": code })
	} else {
		serde_json::json!({ "status": "error", "error": "missing_code" })
	};

	// The payload lands inside a <script> block, so `<` must not appear
	// in the serialized form.
	let payload = serde_json::to_string(&message)
		.unwrap_or_else(|_| r#"{"status":"error","error":"serialization"}"#.to_string())
		.replace('<', "\\u003c");

	let title = t(locale, "server.relay.title");
	let close_hint = t(locale, "server.relay.close_hint");

	Html(format!(
		"<!DOCTYPE html>\n\
		<html>\n\
		<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
		<body>\n\
		<p>{close_hint}</p>\n\
		<script>\n\
		if (window.opener) {{\n\
		\twindow.opener.postMessage({payload}, \"*\");\n\
		}}\n\
		</script>\n\
		</body>\n\
		</html>\n"
	))
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Company and owner account created", body = AuthSessionResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 502, description = "Identity directory unavailable or rejected the account", body = crate::api_response::FailureResponse)
    ),
    tag = "auth"
)]
/// POST /auth/signup - Create a company workspace and its owner account.
#[tracing::instrument(skip(state, payload))]
pub async fn signup(
	State(state): State<AppState>,
	Json(payload): Json<SignupRequest>,
) -> Result<Response, ApiError> {
	let locale = fallback_locale(&state);

	let Some(identity) = state.identity.clone() else {
		return Err(ApiError::Downstream(t(
			locale,
			"server.api.identity_unavailable",
		)));
	};

	if validate_company_name(&payload.company_name).is_err() {
		return Err(ApiError::invalid_input(
			locale,
			"server.api.invalid_company_name",
		));
	}
	if validate_full_name(&payload.full_name).is_err() {
		return Err(ApiError::invalid_input(
			locale,
			"server.api.invalid_full_name",
		));
	}
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

	let company = Company::new(payload.company_name.trim());
	state
		.company_repo
		.create_company(&company)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	let user = identity
		.create_user(
			&payload.email,
			&payload.password,
			&UserMetadata::new(payload.full_name.trim()),
			&AppMetadata::new(company.id, Role::Owner),
		)
		.await
		.map_err(|err| ApiError::from_identity(err, locale))?;

	let member = await_provisioned_member(&state, &user.id, locale).await?;

	let issued = identity
		.create_session(&user.id, state.session_ttl_days)
		.await
		.map_err(|err| ApiError::from_identity(err, locale))?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::Signup)
			.company(company.id)
			.actor(user.id)
			.entity("company", company.id.to_string())
			.details(serde_json::json!({
				"company_name": company.name,
				"slug": company.slug,
			}))
			.build(),
	);

	tracing::info!(user_id = %user.id, company_id = %company.id, "company created via signup");

	let cookie = session_cookie(
		&state.session_cookie_name,
		&issued.token,
		state.session_ttl_days,
	);
	let body = Json(AuthSessionResponse {
		success: true,
		member: MemberResponse::from_member(member),
	});

	Ok(([(SET_COOKIE, cookie)], body).into_response())
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthSessionResponse),
        (status = 401, description = "Incorrect email or password", body = crate::api_response::FailureResponse)
    ),
    tag = "auth"
)]
/// POST /auth/login - Sign in with email and password.
///
/// Suspended members sign in successfully; the session gate confines
/// them to the billing page afterwards.
#[tracing::instrument(skip(state, payload))]
pub async fn login(
	State(state): State<AppState>,
	Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
	let locale = fallback_locale(&state);

	let Some(identity) = state.identity.clone() else {
		return Err(ApiError::Downstream(t(
			locale,
			"server.api.identity_unavailable",
		)));
	};

	let user = match identity
		.verify_credentials(&payload.email, &payload.password)
		.await
	{
		Ok(user) => user,
		Err(err) => {
			if matches!(err, IdentityError::InvalidCredentials) {
				state.audit_service.log(
					AuditLogBuilder::new(AuditEventType::LoginFailed)
						.details(serde_json::json!({ "email": payload.email }))
						.build(),
				);
			}
			return Err(ApiError::from_identity(err, locale));
		}
	};

	let member = match state.member_repo.get_member(&user.id).await {
		Ok(Some(member)) => member,
		Ok(None) => {
			tracing::warn!(user_id = %user.id, "identity account has no member profile row");
			return Err(ApiError::not_found(locale, "server.api.member_not_found"));
		}
		Err(err) => return Err(ApiError::storage(err, locale)),
	};

	let issued = identity
		.create_session(&user.id, state.session_ttl_days)
		.await
		.map_err(|err| {
			ApiError::from_identity(
				err,
				resolve_locale(member.locale.as_deref(), &state.default_locale),
			)
		})?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::Login)
			.company(member.company_id)
			.actor(member.user_id)
			.build(),
	);

	tracing::info!(user_id = %user.id, company_id = %member.company_id, "member signed in");

	let cookie = session_cookie(
		&state.session_cookie_name,
		&issued.token,
		state.session_ttl_days,
	);
	let body = Json(AuthSessionResponse {
		success: true,
		member: MemberResponse::from_member(member),
	});

	Ok(([(SET_COOKIE, cookie)], body).into_response())
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session revoked", body = AuthSuccessResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "auth"
)]
/// POST /api/auth/logout - Revoke the current session and clear the cookie.
#[tracing::instrument(skip(current, state, headers))]
pub async fn logout(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Response, ApiError> {
	let locale = member_locale(&current, &state);

	let Some(identity) = state.identity.clone() else {
		return Err(ApiError::Downstream(t(
			locale,
			"server.api.identity_unavailable",
		)));
	};

	let token = extract_session_cookie_with_name(&headers, &state.session_cookie_name)
		.or_else(|| extract_bearer_token(&headers));

	// The caller's cookie is cleared regardless; a failed revocation only
	// means the server-side row lingers until expiry.
	if let Some(token) = token {
		if let Err(err) = identity.revoke_session(&token).await {
			tracing::error!(error = %err, "failed to revoke session");
		}
	}

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::Logout)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.build(),
	);

	tracing::info!(user_id = %current.member.user_id, "member signed out");

	let cookie = clear_session_cookie(&state.session_cookie_name);
	let body = Json(AuthSuccessResponse {
		success: true,
		message: t(locale, "server.api.logged_out"),
	});

	Ok(([(SET_COOKIE, cookie)], body).into_response())
}
