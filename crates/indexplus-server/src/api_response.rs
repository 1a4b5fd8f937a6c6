// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API failure envelope.
//!
//! Every failed request returns the same wire shape,
//! `{"success": false, "error": <message>}`, with the HTTP status code
//! carrying the error kind. Handlers build an [`ApiError`] with an already
//! localized message and early-return it with `?`; the [`IntoResponse`]
//! impl turns it into the envelope. Nothing past the handler boundary ever
//! panics on a bad request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use indexplus_common_i18n::t;
use indexplus_server_db::DbError;
use indexplus_server_identity::IdentityError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wire body for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FailureResponse {
	/// Always `false`.
	pub success: bool,
	/// Human-readable message in the caller's display language.
	pub error: String,
}

/// A request failure, classified by kind. The message inside each variant
/// is already localized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
	/// No session token was supplied (401).
	#[error("{0}")]
	AuthenticationMissing(String),

	/// A token was supplied but does not resolve to a member (401).
	#[error("{0}")]
	AuthenticationFailed(String),

	/// The resolved caller lacks the required capability (403).
	#[error("{0}")]
	Denied(String),

	/// The referenced row is missing or belongs to another company (404).
	#[error("{0}")]
	NotFound(String),

	/// The payload failed validation (400).
	#[error("{0}")]
	InvalidInput(String),

	/// The identity directory or data store rejected the operation (502).
	#[error("{0}")]
	Downstream(String),
}

impl ApiError {
	pub fn authentication_missing(locale: &str) -> Self {
		Self::AuthenticationMissing(t(locale, "server.api.authentication_required"))
	}

	pub fn authentication_failed(locale: &str) -> Self {
		Self::AuthenticationFailed(t(locale, "server.api.authentication_failed"))
	}

	pub fn denied(locale: &str) -> Self {
		Self::Denied(t(locale, "server.api.forbidden"))
	}

	pub fn not_found(locale: &str, key: &str) -> Self {
		Self::NotFound(t(locale, key))
	}

	pub fn invalid_input(locale: &str, key: &str) -> Self {
		Self::InvalidInput(t(locale, key))
	}

	/// Storage failure where a missing row is not an expected outcome.
	pub fn storage(err: DbError, locale: &str) -> Self {
		tracing::error!(error = %err, "data store failure");
		Self::Downstream(t(locale, "server.api.storage_error"))
	}

	/// Maps a repository error, translating `NotFound` with the given key
	/// and everything else into the generic storage failure.
	pub fn from_db(err: DbError, locale: &str, not_found_key: &str) -> Self {
		match err {
			DbError::NotFound(_) => Self::NotFound(t(locale, not_found_key)),
			other => Self::storage(other, locale),
		}
	}

	/// Maps an identity directory error onto the taxonomy.
	pub fn from_identity(err: IdentityError, locale: &str) -> Self {
		match err {
			IdentityError::InvalidCredentials => {
				Self::AuthenticationFailed(t(locale, "server.api.login_failed"))
			}
			IdentityError::DuplicateEmail => Self::Downstream(t(locale, "server.api.email_taken")),
			IdentityError::UserNotFound(_) => {
				Self::NotFound(t(locale, "server.api.member_not_found"))
			}
			other => {
				tracing::error!(error = %other, "identity directory failure");
				Self::Downstream(t(locale, "server.api.internal_error"))
			}
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Self::AuthenticationMissing(_) | Self::AuthenticationFailed(_) => {
				StatusCode::UNAUTHORIZED
			}
			Self::Denied(_) => StatusCode::FORBIDDEN,
			Self::NotFound(_) => StatusCode::NOT_FOUND,
			Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
			Self::Downstream(_) => StatusCode::BAD_GATEWAY,
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		let body = FailureResponse {
			success: false,
			error: self.to_string(),
		};
		(status, Json(body)).into_response()
	}
}

/// Parses a path or payload id, rejecting malformed values with a
/// localized 400.
pub fn parse_uuid(value: &str, locale: &str) -> Result<uuid::Uuid, ApiError> {
	value
		.parse()
		.map_err(|_| ApiError::invalid_input(locale, "server.api.invalid_id"))
}
