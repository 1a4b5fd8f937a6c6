// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed metadata partitions for identity records.
//!
//! Every identity record carries two JSON documents with deliberately
//! different trust levels:
//!
//! - [`UserMetadata`]: user-editable profile fields, captured at signup.
//!   Nothing in it may ever gate access.
//! - [`AppMetadata`]: server-controlled authorization fields (company, role,
//!   status). Only mutation handlers write it, and it is parsed strictly so
//!   a tampered or drifted document surfaces as an error instead of a
//!   quietly mis-assigned role.
//!
//! Role and status values are closed enums; unknown strings fail parsing.

use chrono::{DateTime, Utc};
use indexplus_server_auth::{CompanyId, MemberStatus, Role, UserId};
use serde::{Deserialize, Serialize};

/// User-editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
	/// Display name captured at signup or member creation.
	pub full_name: String,

	/// Preferred locale, if the user has chosen one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub locale: Option<String>,
}

impl UserMetadata {
	/// Creates metadata with just a display name.
	pub fn new(full_name: impl Into<String>) -> Self {
		Self {
			full_name: full_name.into(),
			locale: None,
		}
	}

	/// Sets the preferred locale.
	pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
		self.locale = Some(locale.into());
		self
	}
}

/// Server-controlled authorization fields.
///
/// Unknown keys are rejected: this document is only ever written by the
/// server, so anything unexpected in it means tampering or drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppMetadata {
	/// The company workspace the account belongs to.
	pub company_id: CompanyId,

	/// Role within the company.
	pub role: Role,

	/// Account lifecycle state.
	pub status: MemberStatus,
}

impl AppMetadata {
	/// Creates active metadata for a role within a company.
	pub fn new(company_id: CompanyId, role: Role) -> Self {
		Self {
			company_id,
			role,
			status: MemberStatus::Active,
		}
	}

	/// Sets the account status.
	pub fn with_status(mut self, status: MemberStatus) -> Self {
		self.status = status;
		self
	}
}

/// An account in the identity directory.
///
/// # PII Handling
///
/// `email` and `user_metadata.full_name` are user-provided PII and should be
/// redacted in logs. The password hash is never part of this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityUser {
	/// Unique identifier for this account.
	pub id: UserId,

	/// Email address, unique across the directory (case-insensitive).
	pub email: String,

	/// User-editable profile fields.
	pub user_metadata: UserMetadata,

	/// Server-controlled authorization fields.
	pub app_metadata: AppMetadata,

	/// When the account was created.
	pub created_at: DateTime<Utc>,

	/// When the account was last updated.
	pub updated_at: DateTime<Utc>,
}
