// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication context and request credential extraction.
//!
//! This module provides:
//! - [`CurrentMember`] - authenticated member context extracted from requests
//! - [`AuthContext`] - auth state for request processing
//! - Helper functions for extracting session cookies and bearer tokens
//!
//! # Authentication Flow
//!
//! ```text
//! Request → Extract Cookie/Bearer → Session lookup → Member lookup → AuthContext
//! ```
//!
//! The same session token is accepted from the dashboard cookie and from an
//! `Authorization: Bearer` header for API clients.
//!
//! # Security Notes
//!
//! - Session tokens are extracted from cookies (HttpOnly, Secure recommended)
//! - Token values are never logged

use crate::member::Member;
use crate::policy::Principal;
use crate::types::SessionId;
use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Default name for the session cookie.
pub const SESSION_COOKIE_NAME: &str = "indexplus_session";

/// The currently authenticated member, extracted from request context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentMember {
	/// The authenticated member, freshly loaded from storage.
	pub member: Member,
	/// The session the request authenticated with.
	pub session_id: SessionId,
}

impl CurrentMember {
	/// Create a new CurrentMember from a validated session.
	pub fn from_session(member: Member, session_id: SessionId) -> Self {
		Self { member, session_id }
	}

	/// Derives the principal capability decisions are made for.
	pub fn principal(&self) -> Principal {
		self.member.principal()
	}
}

/// Authentication context for request processing.
///
/// This struct is used to pass authentication state through the request pipeline.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	/// Whether the request is authenticated.
	pub is_authenticated: bool,
	/// The current member, if authenticated.
	pub current_member: Option<CurrentMember>,
}

impl AuthContext {
	/// Create a new unauthenticated context.
	pub fn unauthenticated() -> Self {
		Self {
			is_authenticated: false,
			current_member: None,
		}
	}

	/// Create a new authenticated context.
	pub fn authenticated(current_member: CurrentMember) -> Self {
		Self {
			is_authenticated: true,
			current_member: Some(current_member),
		}
	}

	/// Get the current member, if authenticated.
	pub fn member(&self) -> Option<&CurrentMember> {
		self.current_member.as_ref()
	}

	/// Require authentication, returning the current member or an error.
	pub fn require_member(&self) -> Result<&CurrentMember, AuthRequired> {
		self.current_member.as_ref().ok_or(AuthRequired)
	}
}

/// Error returned when authentication is required but not present.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequired;

impl std::fmt::Display for AuthRequired {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "authentication required")
	}
}

impl std::error::Error for AuthRequired {}

/// Extract the session token from the Cookie header.
///
/// Parses the Cookie header to find the session cookie (default:
/// `indexplus_session`).
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
	extract_session_cookie_with_name(headers, SESSION_COOKIE_NAME)
}

/// Extract the session token from the Cookie header with a custom cookie name.
///
/// Returns the session token value if found, or `None` if the cookie is not
/// present.
pub fn extract_session_cookie_with_name(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get(COOKIE)?
		.to_str()
		.ok()?
		.split(';')
		.find_map(|cookie| {
			let cookie = cookie.trim();
			let (name, value) = cookie.split_once('=')?;

			if name == cookie_name {
				Some(value.to_string())
			} else {
				None
			}
		})
}

/// Extract a bearer token from the Authorization header.
///
/// Expects the format: `Authorization: Bearer <token>`. Returns the token
/// value if found, or `None` if not present or malformed.
#[instrument(level = "trace", skip_all, fields(has_auth_header))]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(|token| token.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::policy::PermissionOverrides;
	use crate::types::{CompanyId, MemberStatus, Role, UserId};
	use chrono::Utc;
	use http::header::HeaderValue;

	fn make_test_member() -> Member {
		Member {
			user_id: UserId::generate(),
			company_id: CompanyId::generate(),
			email: "agent@example.com".to_string(),
			full_name: "Test Agent".to_string(),
			role: Role::Agent,
			status: MemberStatus::Active,
			overrides: PermissionOverrides::new(),
			locale: None,
			created_at: Utc::now(),
			updated_at: Utc::now(),
		}
	}

	mod current_member {
		use super::*;

		#[test]
		fn from_session_records_the_session() {
			let member = make_test_member();
			let session_id = SessionId::generate();
			let current = CurrentMember::from_session(member.clone(), session_id);

			assert_eq!(current.session_id, session_id);
			assert_eq!(current.member.user_id, member.user_id);
		}

		#[test]
		fn principal_matches_the_member() {
			let member = make_test_member();
			let current = CurrentMember::from_session(member.clone(), SessionId::generate());

			assert_eq!(current.principal(), member.principal());
		}
	}

	mod auth_context {
		use super::*;

		#[test]
		fn unauthenticated_has_no_member() {
			let ctx = AuthContext::unauthenticated();
			assert!(!ctx.is_authenticated);
			assert!(ctx.current_member.is_none());
			assert!(ctx.member().is_none());
		}

		#[test]
		fn authenticated_has_member() {
			let current = CurrentMember::from_session(make_test_member(), SessionId::generate());
			let ctx = AuthContext::authenticated(current);

			assert!(ctx.is_authenticated);
			assert!(ctx.member().is_some());
		}

		#[test]
		fn require_member_returns_error_when_unauthenticated() {
			let ctx = AuthContext::unauthenticated();
			assert!(ctx.require_member().is_err());
		}

		#[test]
		fn require_member_returns_member_when_authenticated() {
			let current = CurrentMember::from_session(make_test_member(), SessionId::generate());
			let ctx = AuthContext::authenticated(current);

			assert!(ctx.require_member().is_ok());
		}
	}

	mod extract_session_cookie {
		use super::*;

		#[test]
		fn extracts_session_from_single_cookie() {
			let mut headers = HeaderMap::new();
			headers.insert(COOKIE, HeaderValue::from_static("indexplus_session=abc123"));

			assert_eq!(extract_session_cookie(&headers), Some("abc123".to_string()));
		}

		#[test]
		fn extracts_session_from_multiple_cookies() {
			let mut headers = HeaderMap::new();
			headers.insert(
				COOKIE,
				HeaderValue::from_static("other=value; indexplus_session=xyz789; another=test"),
			);

			assert_eq!(extract_session_cookie(&headers), Some("xyz789".to_string()));
		}

		#[test]
		fn returns_none_when_no_cookie_header() {
			let headers = HeaderMap::new();
			assert_eq!(extract_session_cookie(&headers), None);
		}

		#[test]
		fn returns_none_when_session_cookie_missing() {
			let mut headers = HeaderMap::new();
			headers.insert(
				COOKIE,
				HeaderValue::from_static("other=value; another=test"),
			);

			assert_eq!(extract_session_cookie(&headers), None);
		}

		#[test]
		fn handles_whitespace_around_cookies() {
			let mut headers = HeaderMap::new();
			headers.insert(
				COOKIE,
				HeaderValue::from_static("  indexplus_session=token123  ; other=val  "),
			);

			assert_eq!(
				extract_session_cookie(&headers),
				Some("token123".to_string())
			);
		}

		#[test]
		fn extracts_with_custom_cookie_name() {
			let mut headers = HeaderMap::new();
			headers.insert(
				COOKIE,
				HeaderValue::from_static("custom_session=mytoken; indexplus_session=other"),
			);

			assert_eq!(
				extract_session_cookie_with_name(&headers, "custom_session"),
				Some("mytoken".to_string())
			);
		}
	}

	mod extract_bearer_token {
		use super::*;

		#[test]
		fn extracts_bearer_token() {
			let mut headers = HeaderMap::new();
			headers.insert(
				AUTHORIZATION,
				HeaderValue::from_static("Bearer 0123456789abcdef"),
			);

			assert_eq!(
				extract_bearer_token(&headers),
				Some("0123456789abcdef".to_string())
			);
		}

		#[test]
		fn returns_none_when_no_auth_header() {
			let headers = HeaderMap::new();
			assert_eq!(extract_bearer_token(&headers), None);
		}

		#[test]
		fn returns_none_for_basic_auth() {
			let mut headers = HeaderMap::new();
			headers.insert(
				AUTHORIZATION,
				HeaderValue::from_static("Basic dXNlcjpwYXNz"),
			);

			assert_eq!(extract_bearer_token(&headers), None);
		}

		#[test]
		fn returns_none_for_missing_space() {
			let mut headers = HeaderMap::new();
			headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));

			assert_eq!(extract_bearer_token(&headers), None);
		}

		#[test]
		fn is_case_sensitive_for_bearer_prefix() {
			let mut headers = HeaderMap::new();
			headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer token123"));

			assert_eq!(extract_bearer_token(&headers), None);
		}
	}
}
