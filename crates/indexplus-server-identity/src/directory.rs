// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The identity directory service seam.
//!
//! Handlers and middleware depend on [`IdentityDirectory`] rather than a
//! concrete backend, so tests can substitute an in-memory directory and the
//! server can run with no directory at all when credentials are missing.

use async_trait::async_trait;
use indexplus_server_auth::{Session, UserId};

use crate::error::Result;
use crate::metadata::{AppMetadata, IdentityUser, UserMetadata};

/// A freshly created session together with its plaintext token.
///
/// The token is returned exactly once; only its hash is persisted.
#[derive(Debug, Clone)]
pub struct IssuedSession {
	pub session: Session,
	pub token: String,
}

/// A session that passed validation, with the account it belongs to.
#[derive(Debug, Clone)]
pub struct ValidatedSession {
	pub session: Session,
	pub user: IdentityUser,
}

/// Account, credential, and session operations backing authentication.
///
/// All mutation handlers resolve role and status through this trait on every
/// call; nothing authorization-relevant is cached across requests.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
	/// Create an account with credentials and both metadata partitions.
	///
	/// Fails with [`IdentityError::DuplicateEmail`] when the email is already
	/// registered (case-insensitive).
	///
	/// [`IdentityError::DuplicateEmail`]: crate::IdentityError::DuplicateEmail
	async fn create_user(
		&self,
		email: &str,
		password: &str,
		user_metadata: &UserMetadata,
		app_metadata: &AppMetadata,
	) -> Result<IdentityUser>;

	/// Fetch an account by ID. Returns `None` when absent.
	async fn get_user(&self, user_id: &UserId) -> Result<Option<IdentityUser>>;

	/// Fetch an account by email, case-insensitively. Returns `None` when absent.
	async fn get_user_by_email(&self, email: &str) -> Result<Option<IdentityUser>>;

	/// Replace the server-controlled metadata partition.
	async fn update_app_metadata(
		&self,
		user_id: &UserId,
		app_metadata: &AppMetadata,
	) -> Result<()>;

	/// Replace the user-editable metadata partition.
	async fn update_user_metadata(
		&self,
		user_id: &UserId,
		user_metadata: &UserMetadata,
	) -> Result<()>;

	/// Replace the account password.
	async fn set_password(&self, user_id: &UserId, new_password: &str) -> Result<()>;

	/// Delete an account and revoke all of its sessions.
	async fn delete_user(&self, user_id: &UserId) -> Result<()>;

	/// Verify email and password, returning the account on success.
	///
	/// Suspended accounts verify successfully; the session gate confines
	/// them after login. Unknown emails and wrong passwords both fail with
	/// [`IdentityError::InvalidCredentials`] so the response does not reveal
	/// which one it was.
	///
	/// [`IdentityError::InvalidCredentials`]: crate::IdentityError::InvalidCredentials
	async fn verify_credentials(&self, email: &str, password: &str) -> Result<IdentityUser>;

	/// Issue a session for an account.
	async fn create_session(&self, user_id: &UserId, ttl_days: i64) -> Result<IssuedSession>;

	/// Validate a session token, extending the sliding expiry when due.
	///
	/// Returns `None` for unknown, expired, or orphaned tokens. Expired
	/// sessions are deleted as a side effect.
	async fn validate_session(&self, token: &str, ttl_days: i64)
		-> Result<Option<ValidatedSession>>;

	/// Revoke a single session by its token. Returns true if one existed.
	async fn revoke_session(&self, token: &str) -> Result<bool>;

	/// Revoke every session an account holds. Returns the number revoked.
	async fn revoke_sessions_for_user(&self, user_id: &UserId) -> Result<u64>;
}
