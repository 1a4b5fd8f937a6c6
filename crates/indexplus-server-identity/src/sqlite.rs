// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite-backed identity directory.
//!
//! Accounts and sessions live in the `identity_users` and `identity_sessions`
//! tables. Metadata partitions are stored as JSON text columns; timestamps are
//! RFC 3339 text; IDs are UUIDs stored as strings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexplus_server_auth::{
	generate_session_token, hash_password, hash_token, verify_password, Session, SessionId,
	UserId,
};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::directory::{IdentityDirectory, IssuedSession, ValidatedSession};
use crate::error::{IdentityError, Result};
use crate::metadata::{AppMetadata, IdentityUser, UserMetadata};

/// Identity directory backed by a SQLite pool.
///
/// All account IDs are UUIDs stored as strings. Email lookups are
/// case-insensitive. Only password and token hashes touch the database; the
/// plaintext forms never do.
#[derive(Clone)]
pub struct SqliteIdentityDirectory {
	pool: SqlitePool,
}

impl SqliteIdentityDirectory {
	/// Create a new directory backed by the given connection pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a new account.
	///
	/// # Arguments
	/// * `email` - Login email, unique across the directory (case-insensitive)
	/// * `password` - Plaintext password, hashed before storage
	/// * `user_metadata` - User-editable profile partition
	/// * `app_metadata` - Server-controlled authorization partition
	///
	/// # Errors
	/// Returns `IdentityError::DuplicateEmail` when the email is already
	/// registered under any casing.
	#[tracing::instrument(skip(self, email, password, user_metadata, app_metadata))]
	pub async fn create_user(
		&self,
		email: &str,
		password: &str,
		user_metadata: &UserMetadata,
		app_metadata: &AppMetadata,
	) -> Result<IdentityUser> {
		let existing = sqlx::query("SELECT id FROM identity_users WHERE LOWER(email) = LOWER(?)")
			.bind(email)
			.fetch_optional(&self.pool)
			.await?;
		if existing.is_some() {
			return Err(IdentityError::DuplicateEmail);
		}

		let now = Utc::now();
		let user = IdentityUser {
			id: UserId::generate(),
			email: email.to_string(),
			user_metadata: user_metadata.clone(),
			app_metadata: *app_metadata,
			created_at: now,
			updated_at: now,
		};
		let password_hash = hash_password(password);

		sqlx::query(
			r#"
			INSERT INTO identity_users (
				id, email, password_hash, user_metadata, app_metadata,
				created_at, updated_at
			) VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.email)
		.bind(&password_hash)
		.bind(serde_json::to_string(&user.user_metadata)?)
		.bind(serde_json::to_string(&user.app_metadata)?)
		.bind(user.created_at.to_rfc3339())
		.bind(user.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(
			user_id = %user.id,
			company_id = %user.app_metadata.company_id,
			role = %user.app_metadata.role,
			"identity user created"
		);
		Ok(user)
	}

	/// Get an account by its unique ID.
	///
	/// # Returns
	/// `None` if no account exists with this ID.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn get_user(&self, user_id: &UserId) -> Result<Option<IdentityUser>> {
		let row = sqlx::query(
			r#"
			SELECT id, email, user_metadata, app_metadata, created_at, updated_at
			FROM identity_users
			WHERE id = ?
			"#,
		)
		.bind(user_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_user(&r)).transpose()
	}

	/// Get an account by email, matching any casing.
	///
	/// # Returns
	/// `None` if no account exists with this email.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_user_by_email(&self, email: &str) -> Result<Option<IdentityUser>> {
		let row = sqlx::query(
			r#"
			SELECT id, email, user_metadata, app_metadata, created_at, updated_at
			FROM identity_users
			WHERE LOWER(email) = LOWER(?)
			"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		let result = row.map(|r| self.row_to_user(&r)).transpose()?;
		if let Some(ref user) = result {
			tracing::debug!(user_id = %user.id, "identity user found by email");
		}
		Ok(result)
	}

	/// Replace the server-controlled metadata partition.
	///
	/// # Errors
	/// Returns `IdentityError::UserNotFound` when no account has this ID.
	#[tracing::instrument(skip(self, app_metadata), fields(user_id = %user_id))]
	pub async fn update_app_metadata(
		&self,
		user_id: &UserId,
		app_metadata: &AppMetadata,
	) -> Result<()> {
		let result = sqlx::query("UPDATE identity_users SET app_metadata = ?, updated_at = ? WHERE id = ?")
			.bind(serde_json::to_string(app_metadata)?)
			.bind(Utc::now().to_rfc3339())
			.bind(user_id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(IdentityError::UserNotFound(user_id.to_string()));
		}

		tracing::debug!(
			user_id = %user_id,
			role = %app_metadata.role,
			status = %app_metadata.status,
			"app metadata updated"
		);
		Ok(())
	}

	/// Replace the user-editable metadata partition.
	///
	/// # Errors
	/// Returns `IdentityError::UserNotFound` when no account has this ID.
	#[tracing::instrument(skip(self, user_metadata), fields(user_id = %user_id))]
	pub async fn update_user_metadata(
		&self,
		user_id: &UserId,
		user_metadata: &UserMetadata,
	) -> Result<()> {
		let result = sqlx::query("UPDATE identity_users SET user_metadata = ?, updated_at = ? WHERE id = ?")
			.bind(serde_json::to_string(user_metadata)?)
			.bind(Utc::now().to_rfc3339())
			.bind(user_id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(IdentityError::UserNotFound(user_id.to_string()));
		}

		tracing::debug!(user_id = %user_id, "user metadata updated");
		Ok(())
	}

	/// Replace an account's password.
	///
	/// Existing sessions stay valid; callers that want them gone revoke them
	/// separately.
	///
	/// # Errors
	/// Returns `IdentityError::UserNotFound` when no account has this ID.
	#[tracing::instrument(skip(self, new_password), fields(user_id = %user_id))]
	pub async fn set_password(&self, user_id: &UserId, new_password: &str) -> Result<()> {
		let password_hash = hash_password(new_password);
		let result = sqlx::query("UPDATE identity_users SET password_hash = ?, updated_at = ? WHERE id = ?")
			.bind(&password_hash)
			.bind(Utc::now().to_rfc3339())
			.bind(user_id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(IdentityError::UserNotFound(user_id.to_string()));
		}

		tracing::debug!(user_id = %user_id, "password updated");
		Ok(())
	}

	/// Delete an account and every session it holds, atomically.
	///
	/// # Errors
	/// Returns `IdentityError::UserNotFound` when no account has this ID.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn delete_user(&self, user_id: &UserId) -> Result<()> {
		let mut tx = self.pool.begin().await?;

		sqlx::query("DELETE FROM identity_sessions WHERE user_id = ?")
			.bind(user_id.to_string())
			.execute(&mut *tx)
			.await?;

		let result = sqlx::query("DELETE FROM identity_users WHERE id = ?")
			.bind(user_id.to_string())
			.execute(&mut *tx)
			.await?;

		if result.rows_affected() == 0 {
			return Err(IdentityError::UserNotFound(user_id.to_string()));
		}

		tx.commit().await?;

		tracing::debug!(user_id = %user_id, "identity user deleted");
		Ok(())
	}

	/// Verify email and password.
	///
	/// # Returns
	/// The account on success. Suspended accounts verify like any other; the
	/// session gate confines them after login.
	///
	/// # Errors
	/// Returns `IdentityError::InvalidCredentials` for an unknown email and
	/// for a wrong password alike, so callers cannot tell the two apart.
	#[tracing::instrument(skip_all)]
	pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<IdentityUser> {
		let row = sqlx::query(
			r#"
			SELECT id, email, password_hash, user_metadata, app_metadata,
			       created_at, updated_at
			FROM identity_users
			WHERE LOWER(email) = LOWER(?)
			"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Err(IdentityError::InvalidCredentials);
		};

		let password_hash: String = row.get("password_hash");
		if !verify_password(password, &password_hash) {
			return Err(IdentityError::InvalidCredentials);
		}

		let user = self.row_to_user(&row)?;
		tracing::debug!(user_id = %user.id, "credentials verified");
		Ok(user)
	}

	/// Issue a new session for an account.
	///
	/// # Returns
	/// The session and its plaintext token. Only the token hash is stored,
	/// so this is the one chance to hand the token to the client.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn create_session(&self, user_id: &UserId, ttl_days: i64) -> Result<IssuedSession> {
		let token = generate_session_token();
		let token_hash = hash_token(&token);
		let session = Session::new(*user_id, ttl_days);

		sqlx::query(
			r#"
			INSERT INTO identity_sessions (
				id, user_id, token_hash, created_at, last_used_at, expires_at
			) VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(session.id.to_string())
		.bind(session.user_id.to_string())
		.bind(&token_hash)
		.bind(session.created_at.to_rfc3339())
		.bind(session.last_used_at.to_rfc3339())
		.bind(session.expires_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(session_id = %session.id, user_id = %user_id, "session created");
		Ok(IssuedSession { session, token })
	}

	/// Validate a session token.
	///
	/// Looks the token up by hash, deletes it when expired, and slides the
	/// expiry forward once less than half of the TTL remains.
	///
	/// # Returns
	/// `None` for unknown, expired, or orphaned tokens.
	#[tracing::instrument(skip_all)]
	pub async fn validate_session(
		&self,
		token: &str,
		ttl_days: i64,
	) -> Result<Option<ValidatedSession>> {
		let token_hash = hash_token(token);
		let row = sqlx::query(
			r#"
			SELECT id, user_id, created_at, last_used_at, expires_at
			FROM identity_sessions
			WHERE token_hash = ?
			"#,
		)
		.bind(&token_hash)
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Ok(None);
		};
		let mut session = self.row_to_session(&row)?;

		if session.is_expired() {
			self.delete_session(&session.id).await?;
			tracing::debug!(session_id = %session.id, "expired session deleted");
			return Ok(None);
		}

		let Some(user) = self.get_user(&session.user_id).await? else {
			self.delete_session(&session.id).await?;
			tracing::debug!(session_id = %session.id, "orphaned session deleted");
			return Ok(None);
		};

		if session.needs_extension(ttl_days) {
			session.extend(ttl_days);
			sqlx::query("UPDATE identity_sessions SET last_used_at = ?, expires_at = ? WHERE id = ?")
				.bind(session.last_used_at.to_rfc3339())
				.bind(session.expires_at.to_rfc3339())
				.bind(session.id.to_string())
				.execute(&self.pool)
				.await?;
			tracing::debug!(session_id = %session.id, "session expiry extended");
		}

		Ok(Some(ValidatedSession { session, user }))
	}

	/// Revoke a session by its plaintext token.
	///
	/// # Returns
	/// `true` if a session was revoked, `false` if none matched.
	#[tracing::instrument(skip_all)]
	pub async fn revoke_session(&self, token: &str) -> Result<bool> {
		let token_hash = hash_token(token);
		let result = sqlx::query("DELETE FROM identity_sessions WHERE token_hash = ?")
			.bind(&token_hash)
			.execute(&self.pool)
			.await?;

		let revoked = result.rows_affected() > 0;
		if revoked {
			tracing::debug!("session revoked");
		}
		Ok(revoked)
	}

	/// Revoke every session an account holds.
	///
	/// # Returns
	/// The number of sessions revoked.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn revoke_sessions_for_user(&self, user_id: &UserId) -> Result<u64> {
		let result = sqlx::query("DELETE FROM identity_sessions WHERE user_id = ?")
			.bind(user_id.to_string())
			.execute(&self.pool)
			.await?;

		let revoked = result.rows_affected();
		tracing::debug!(user_id = %user_id, count = revoked, "sessions revoked for user");
		Ok(revoked)
	}

	async fn delete_session(&self, session_id: &SessionId) -> Result<()> {
		sqlx::query("DELETE FROM identity_sessions WHERE id = ?")
			.bind(session_id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	fn row_to_user(&self, row: &sqlx::sqlite::SqliteRow) -> Result<IdentityUser> {
		let id_str: String = row.get("id");
		let id = Uuid::parse_str(&id_str)
			.map_err(|e| IdentityError::Internal(format!("invalid user id: {e}")))?;

		let user_metadata_str: String = row.get("user_metadata");
		let user_metadata: UserMetadata = serde_json::from_str(&user_metadata_str)
			.map_err(|e| IdentityError::Internal(format!("invalid user_metadata: {e}")))?;

		let app_metadata_str: String = row.get("app_metadata");
		let app_metadata: AppMetadata = serde_json::from_str(&app_metadata_str)
			.map_err(|e| IdentityError::Internal(format!("invalid app_metadata: {e}")))?;

		Ok(IdentityUser {
			id: UserId::new(id),
			email: row.get("email"),
			user_metadata,
			app_metadata,
			created_at: parse_timestamp(&row.get::<String, _>("created_at"), "created_at")?,
			updated_at: parse_timestamp(&row.get::<String, _>("updated_at"), "updated_at")?,
		})
	}

	fn row_to_session(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Session> {
		let id_str: String = row.get("id");
		let id = Uuid::parse_str(&id_str)
			.map_err(|e| IdentityError::Internal(format!("invalid session id: {e}")))?;

		let user_id_str: String = row.get("user_id");
		let user_id = Uuid::parse_str(&user_id_str)
			.map_err(|e| IdentityError::Internal(format!("invalid user id: {e}")))?;

		Ok(Session {
			id: SessionId::new(id),
			user_id: UserId::new(user_id),
			created_at: parse_timestamp(&row.get::<String, _>("created_at"), "created_at")?,
			last_used_at: parse_timestamp(&row.get::<String, _>("last_used_at"), "last_used_at")?,
			expires_at: parse_timestamp(&row.get::<String, _>("expires_at"), "expires_at")?,
		})
	}
}

fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| IdentityError::Internal(format!("invalid {column}: {e}")))
}

#[async_trait]
impl IdentityDirectory for SqliteIdentityDirectory {
	async fn create_user(
		&self,
		email: &str,
		password: &str,
		user_metadata: &UserMetadata,
		app_metadata: &AppMetadata,
	) -> Result<IdentityUser> {
		self
			.create_user(email, password, user_metadata, app_metadata)
			.await
	}

	async fn get_user(&self, user_id: &UserId) -> Result<Option<IdentityUser>> {
		self.get_user(user_id).await
	}

	async fn get_user_by_email(&self, email: &str) -> Result<Option<IdentityUser>> {
		self.get_user_by_email(email).await
	}

	async fn update_app_metadata(
		&self,
		user_id: &UserId,
		app_metadata: &AppMetadata,
	) -> Result<()> {
		self.update_app_metadata(user_id, app_metadata).await
	}

	async fn update_user_metadata(
		&self,
		user_id: &UserId,
		user_metadata: &UserMetadata,
	) -> Result<()> {
		self.update_user_metadata(user_id, user_metadata).await
	}

	async fn set_password(&self, user_id: &UserId, new_password: &str) -> Result<()> {
		self.set_password(user_id, new_password).await
	}

	async fn delete_user(&self, user_id: &UserId) -> Result<()> {
		self.delete_user(user_id).await
	}

	async fn verify_credentials(&self, email: &str, password: &str) -> Result<IdentityUser> {
		self.verify_credentials(email, password).await
	}

	async fn create_session(&self, user_id: &UserId, ttl_days: i64) -> Result<IssuedSession> {
		self.create_session(user_id, ttl_days).await
	}

	async fn validate_session(
		&self,
		token: &str,
		ttl_days: i64,
	) -> Result<Option<ValidatedSession>> {
		self.validate_session(token, ttl_days).await
	}

	async fn revoke_session(&self, token: &str) -> Result<bool> {
		self.revoke_session(token).await
	}

	async fn revoke_sessions_for_user(&self, user_id: &UserId) -> Result<u64> {
		self.revoke_sessions_for_user(user_id).await
	}
}
