// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware for Axum.
//!
//! [`auth_layer`] resolves the caller once per request: it reads the session
//! cookie (or a bearer token), validates it against the identity directory,
//! re-fetches the caller's member profile row, and stores an [`AuthContext`]
//! as a request extension. Authorization decisions downstream read the
//! profile row's role and status, never a token claim.
//!
//! Handlers that require a signed-in caller take the [`RequireAuth`]
//! extractor, which rejects with the localized 401 envelope.
//!
//! # Security Properties
//!
//! - Raw tokens are hashed before any lookup and never logged.
//! - Session expiry is checked on every request, with sliding extension
//!   handled inside the directory.
//! - A valid identity record without a member profile row does not
//!   authenticate; the row is the authoritative principal source.

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request},
	middleware::Next,
	response::{IntoResponse, Response},
};
use indexplus_server_auth::middleware::{
	extract_bearer_token, extract_session_cookie_with_name, AuthContext,
};
pub use indexplus_server_auth::middleware::CurrentMember;
use tracing::instrument;

use crate::api::AppState;
use crate::api_response::ApiError;

/// Marker extension recording that a token was presented but did not
/// resolve to a member. Distinguishes authentication-failed from
/// authentication-missing at the extractor boundary.
#[derive(Debug, Clone, Copy)]
pub struct RejectedToken;

/// Resolves authentication for every request and stores the outcome as a
/// request extension. Requests without (or with invalid) credentials
/// proceed with an unauthenticated context; rejection is the job of
/// [`RequireAuth`] and the session gate.
#[instrument(
	name = "auth_layer",
	skip(state, request, next),
	fields(
		auth_method = tracing::field::Empty,
		user_id = tracing::field::Empty,
	)
)]
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let headers = request.headers();
	let span = tracing::Span::current();

	if let Some(token) = extract_session_cookie_with_name(headers, &state.session_cookie_name) {
		match authenticate_token(&token, &state).await {
			Some(current) => {
				span.record("auth_method", "session_cookie");
				span.record("user_id", tracing::field::display(&current.member.user_id));
				request
					.extensions_mut()
					.insert(AuthContext::authenticated(current));
				return next.run(request).await;
			}
			None => {
				request.extensions_mut().insert(RejectedToken);
			}
		}
	} else if let Some(token) = extract_bearer_token(headers) {
		match authenticate_token(&token, &state).await {
			Some(current) => {
				span.record("auth_method", "bearer");
				span.record("user_id", tracing::field::display(&current.member.user_id));
				request
					.extensions_mut()
					.insert(AuthContext::authenticated(current));
				return next.run(request).await;
			}
			None => {
				request.extensions_mut().insert(RejectedToken);
			}
		}
	}

	span.record("auth_method", "none");
	request
		.extensions_mut()
		.insert(AuthContext::unauthenticated());
	next.run(request).await
}

/// Validates a raw session token and loads the member profile row behind it.
#[instrument(skip(token, state), fields(session_id = tracing::field::Empty))]
async fn authenticate_token(token: &str, state: &AppState) -> Option<CurrentMember> {
	let identity = state.identity.as_ref()?;

	let validated = match identity
		.validate_session(token, state.session_ttl_days)
		.await
	{
		Ok(Some(validated)) => validated,
		Ok(None) => {
			tracing::debug!("session token did not resolve");
			return None;
		}
		Err(e) => {
			tracing::error!(error = %e, "session validation failed");
			return None;
		}
	};

	tracing::Span::current().record(
		"session_id",
		tracing::field::display(&validated.session.id),
	);

	let member = match state.member_repo.get_member(&validated.user.id).await {
		Ok(Some(member)) => member,
		Ok(None) => {
			tracing::warn!(user_id = %validated.user.id, "identity record has no member profile row");
			return None;
		}
		Err(e) => {
			tracing::error!(error = %e, "member profile lookup failed");
			return None;
		}
	};

	Some(CurrentMember::from_session(member, validated.session.id))
}

/// Extractor that requires an authenticated member.
///
/// Rejects with 401: authentication-failed when a token was presented but
/// did not resolve, authentication-missing otherwise.
pub struct RequireAuth(pub CurrentMember);

impl FromRequestParts<AppState> for RequireAuth {
	type Rejection = Response;

	#[instrument(name = "RequireAuth::from_request_parts", skip_all)]
	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let auth_ctx = parts
			.extensions
			.get::<AuthContext>()
			.cloned()
			.unwrap_or_else(AuthContext::unauthenticated);

		match auth_ctx.current_member {
			Some(current) => Ok(RequireAuth(current)),
			None => {
				let locale = fallback_locale(state);
				let err = if parts.extensions.get::<RejectedToken>().is_some() {
					ApiError::authentication_failed(locale)
				} else {
					ApiError::authentication_missing(locale)
				};
				Err(err.into_response())
			}
		}
	}
}

/// Extractor for handlers that behave differently for signed-in callers
/// but never reject.
pub struct OptionalAuth(pub Option<CurrentMember>);

impl FromRequestParts<AppState> for OptionalAuth {
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(
		parts: &mut Parts,
		_state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let auth_ctx = parts
			.extensions
			.get::<AuthContext>()
			.cloned()
			.unwrap_or_else(AuthContext::unauthenticated);

		Ok(OptionalAuth(auth_ctx.current_member))
	}
}

/// Effective display language for a signed-in caller.
pub fn member_locale(current: &CurrentMember, state: &AppState) -> &'static str {
	indexplus_common_i18n::resolve_locale(current.member.locale.as_deref(), &state.default_locale)
}

/// Effective display language before authentication is known.
pub fn fallback_locale(state: &AppState) -> &'static str {
	indexplus_common_i18n::resolve_locale(None, &state.default_locale)
}
