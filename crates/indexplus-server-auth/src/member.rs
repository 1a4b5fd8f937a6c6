// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Team member types and field validation.
//!
//! This module provides:
//! - [`Member`] - a user account's membership row within a company
//! - Field validators shared by signup and the team mutation handlers
//!
//! A member is the company-scoped profile of a user account. The identity
//! directory owns credentials; this row owns the workspace-facing attributes
//! (role, status, overrides, display fields). The two are kept in sync by the
//! team mutation handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::{PermissionOverrides, Principal};
use crate::types::{CompanyId, MemberStatus, Role, UserId};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum accepted password length, in characters.
pub const MAX_PASSWORD_LEN: usize = 128;

/// Maximum accepted full name length, in characters.
pub const MAX_FULL_NAME_LEN: usize = 120;

/// Maximum accepted email length, per RFC 5321.
pub const MAX_EMAIL_LEN: usize = 254;

/// A member of a company workspace.
///
/// # PII Handling
///
/// This struct contains personally identifiable information (PII) that
/// requires careful handling:
/// - `email` and `full_name` are user-provided PII
/// - These fields should be redacted in logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
	/// The user account this membership belongs to.
	pub user_id: UserId,

	/// The company workspace this membership is scoped to.
	pub company_id: CompanyId,

	/// Email address, unique across all user accounts.
	pub email: String,

	/// Display name shown in the dashboard.
	pub full_name: String,

	/// Role within the company.
	pub role: Role,

	/// Account lifecycle state.
	pub status: MemberStatus,

	/// Per-member capability overrides, empty for most members.
	pub overrides: PermissionOverrides,

	/// Preferred locale for dashboard messages.
	/// ISO 639-1 language code (e.g., "en", "es").
	/// None means use server default.
	pub locale: Option<String>,

	/// When the membership was created.
	pub created_at: DateTime<Utc>,

	/// When the membership was last updated.
	pub updated_at: DateTime<Utc>,
}

impl Member {
	/// Returns true if this member is suspended.
	pub fn is_suspended(&self) -> bool {
		self.status == MemberStatus::Suspended
	}

	/// Derives the principal capability decisions are made for.
	pub fn principal(&self) -> Principal {
		Principal {
			user_id: self.user_id,
			company_id: self.company_id,
			role: self.role,
			status: self.status,
			overrides: self.overrides.clone(),
		}
	}
}

/// Validates an email address.
/// Rules:
/// - At most 254 characters, no whitespace
/// - Exactly one `@` with a non-empty local part
/// - Domain contains at least one `.` with non-empty labels around it
pub fn validate_email(email: &str) -> Result<(), &'static str> {
	if email.is_empty() {
		return Err("Email must not be empty");
	}
	if email.len() > MAX_EMAIL_LEN {
		return Err("Email is too long");
	}
	if email.chars().any(|c| c.is_whitespace()) {
		return Err("Email must not contain whitespace");
	}
	let Some((local, domain)) = email.split_once('@') else {
		return Err("Email must contain @");
	};
	if local.is_empty() {
		return Err("Email local part must not be empty");
	}
	if domain.contains('@') {
		return Err("Email must contain exactly one @");
	}
	let Some((host, tld)) = domain.rsplit_once('.') else {
		return Err("Email domain must contain a dot");
	};
	if host.is_empty() || tld.is_empty() {
		return Err("Email domain is malformed");
	}
	Ok(())
}

/// Validates a password.
/// Rules:
/// - 8-128 characters
pub fn validate_password(password: &str) -> Result<(), &'static str> {
	let len = password.chars().count();
	if len < MIN_PASSWORD_LEN {
		return Err("Password must be at least 8 characters");
	}
	if len > MAX_PASSWORD_LEN {
		return Err("Password must be at most 128 characters");
	}
	Ok(())
}

/// Validates a member's full name.
/// Rules:
/// - Non-empty after trimming
/// - At most 120 characters
pub fn validate_full_name(full_name: &str) -> Result<(), &'static str> {
	if full_name.trim().is_empty() {
		return Err("Full name must not be empty");
	}
	if full_name.chars().count() > MAX_FULL_NAME_LEN {
		return Err("Full name must be at most 120 characters");
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Capability;

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

	mod member {
		use super::*;

		#[test]
		fn principal_carries_membership_attributes() {
			let mut member = make_test_member();
			member.role = Role::Supervisor;
			member.overrides.set(Capability::ManageTeam, true);

			let principal = member.principal();
			assert_eq!(principal.user_id, member.user_id);
			assert_eq!(principal.company_id, member.company_id);
			assert_eq!(principal.role, Role::Supervisor);
			assert_eq!(principal.overrides.get(Capability::ManageTeam), Some(true));
		}

		#[test]
		fn is_suspended_tracks_status() {
			let mut member = make_test_member();
			assert!(!member.is_suspended());

			member.status = MemberStatus::Suspended;
			assert!(member.is_suspended());
		}

		#[test]
		fn serializes_with_snake_case_role_and_status() {
			let member = make_test_member();
			let json = serde_json::to_string(&member).unwrap();
			assert!(json.contains("\"role\":\"agent\""));
			assert!(json.contains("\"status\":\"active\""));
		}

		#[test]
		fn round_trips_through_json() {
			let member = make_test_member();
			let json = serde_json::to_string(&member).unwrap();
			let back: Member = serde_json::from_str(&json).unwrap();
			assert_eq!(back.user_id, member.user_id);
			assert_eq!(back.email, member.email);
			assert_eq!(back.role, member.role);
		}
	}

	mod validate_email {
		use super::*;

		#[test]
		fn accepts_common_addresses() {
			assert!(validate_email("alice@example.com").is_ok());
			assert!(validate_email("bob.smith+tag@mail.example.co").is_ok());
			assert!(validate_email("x@y.io").is_ok());
		}

		#[test]
		fn rejects_missing_at() {
			assert!(validate_email("alice.example.com").is_err());
			assert!(validate_email("").is_err());
		}

		#[test]
		fn rejects_empty_local_part() {
			assert!(validate_email("@example.com").is_err());
		}

		#[test]
		fn rejects_domain_without_dot() {
			assert!(validate_email("alice@localhost").is_err());
			assert!(validate_email("alice@example.").is_err());
			assert!(validate_email("alice@.com").is_err());
		}

		#[test]
		fn rejects_multiple_ats() {
			assert!(validate_email("alice@bob@example.com").is_err());
		}

		#[test]
		fn rejects_whitespace() {
			assert!(validate_email("alice smith@example.com").is_err());
			assert!(validate_email(" alice@example.com").is_err());
		}

		#[test]
		fn rejects_overlong_addresses() {
			let long = format!("{}@example.com", "a".repeat(250));
			assert!(validate_email(&long).is_err());
		}
	}

	mod validate_password {
		use super::*;

		#[test]
		fn accepts_passwords_within_bounds() {
			assert!(validate_password("12345678").is_ok());
			assert!(validate_password("correct horse battery staple").is_ok());
		}

		#[test]
		fn rejects_short_passwords() {
			assert!(validate_password("1234567").is_err());
			assert!(validate_password("").is_err());
		}

		#[test]
		fn rejects_overlong_passwords() {
			assert!(validate_password(&"a".repeat(129)).is_err());
		}

		#[test]
		fn counts_characters_not_bytes() {
			// 8 multibyte characters is a valid password.
			assert!(validate_password("ññññññññ").is_ok());
		}
	}

	mod validate_full_name {
		use super::*;

		#[test]
		fn accepts_ordinary_names() {
			assert!(validate_full_name("Alice Smith").is_ok());
			assert!(validate_full_name("N").is_ok());
		}

		#[test]
		fn rejects_blank_names() {
			assert!(validate_full_name("").is_err());
			assert!(validate_full_name("   ").is_err());
		}

		#[test]
		fn rejects_overlong_names() {
			assert!(validate_full_name(&"a".repeat(121)).is_err());
		}
	}

	mod validation_proptests {
		use super::*;
		use proptest::prelude::*;

		proptest! {
				#[test]
				fn prop_simple_addresses_validate(
						local in "[a-z][a-z0-9.+_]{0,20}",
						host in "[a-z][a-z0-9]{0,10}",
						tld in "[a-z]{2,6}",
				) {
						let email = format!("{local}@{host}.{tld}");
						prop_assert!(validate_email(&email).is_ok());
				}

				#[test]
				fn prop_password_length_bounds(len in 0usize..200) {
						let password = "p".repeat(len);
						let valid = (MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len);
						prop_assert_eq!(validate_password(&password).is_ok(), valid);
				}
		}
	}
}
