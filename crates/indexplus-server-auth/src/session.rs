// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session lifecycle for the dashboard cookie.
//!
//! This module provides session lifecycle management including:
//!
//! - **Session creation**: New sessions with a sliding expiry window
//! - **Session validation**: Expiry checking and refresh decisions
//! - **Token generation**: Cryptographically secure random tokens
//!
//! # Security Model
//!
//! - Session tokens are generated from 32 bytes of cryptographic randomness
//! - Only the SHA-256 hash of a token is ever persisted; the plaintext exists
//!   solely in the client cookie
//! - Sessions use sliding expiry: use inside the refresh window extends the
//!   session by the full TTL

use crate::{SessionId, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::instrument;

/// Default sliding expiry window in days. Configurable per deployment.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

/// A dashboard session backing the browser cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
	pub id: SessionId,
	pub user_id: UserId,
	pub created_at: DateTime<Utc>,
	pub last_used_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

impl Session {
	/// Create a new session expiring `ttl_days` from now.
	#[instrument(level = "debug", skip(user_id), fields(user_id = %user_id, ttl_days))]
	pub fn new(user_id: UserId, ttl_days: i64) -> Self {
		let now = Utc::now();

		Self {
			id: SessionId::generate(),
			user_id,
			created_at: now,
			last_used_at: now,
			expires_at: now + Duration::days(ttl_days),
		}
	}

	/// Check if the session is expired.
	pub fn is_expired(&self) -> bool {
		Utc::now() > self.expires_at
	}

	/// Returns true once less than half of the TTL remains.
	///
	/// Extending only inside this window keeps the expiry sliding without a
	/// session-table write on every request.
	pub fn needs_extension(&self, ttl_days: i64) -> bool {
		self.expires_at - Utc::now() < Duration::days(ttl_days) / 2
	}

	/// Extend the session (sliding expiry).
	pub fn extend(&mut self, ttl_days: i64) {
		let now = Utc::now();
		self.last_used_at = now;
		self.expires_at = now + Duration::days(ttl_days);
	}
}

/// Generates a cryptographically secure random session token.
pub fn generate_session_token() -> String {
	use rand::Rng;
	let mut rng = rand::thread_rng();
	let bytes: [u8; 32] = rng.gen();
	hex::encode(bytes)
}

/// Hashes a session token for storage and lookup.
pub fn hash_token(token: &str) -> String {
	hex::encode(Sha256::digest(token.as_bytes()))
}
