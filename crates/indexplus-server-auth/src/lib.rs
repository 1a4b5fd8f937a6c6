// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and capability authorization for Index Plus.
//!
//! This crate provides:
//! - Member, company, and session domain types
//! - The capability policy engine ([`policy::can`])
//! - The session gate for dashboard navigation ([`gate::evaluate`])
//! - Session token generation and hashing
//! - Argon2 password hashing
//!
//! # Authorization Design Rationale
//!
//! Authorization is expressed as a closed set of [`Capability`] keys decided
//! per principal:
//!
//! - **Role defaults**: each role carries a fixed allow-list
//! - **Overrides**: a per-member map replaces the default per capability,
//!   granting or revoking in either direction
//! - **Owners**: hold every capability unconditionally
//!
//! Keeping the decision in one pure function ([`policy::can`]) means the
//! session gate, the API handlers, and the page grant payloads can never
//! disagree about what a member may do.
//!
//! # Security Considerations
//!
//! - Session tokens are stored as SHA-256 hashes, passwords as Argon2 hashes,
//!   never plaintext
//! - Roles and overrides are re-read from persisted state on every decision;
//!   request-supplied claims are never trusted
//! - Missing or unresolvable principals fail closed in [`policy::can`]

pub mod company;
pub mod gate;
pub mod member;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod session;
pub mod types;

pub use company::{slugify, validate_company_name, Company, MAX_COMPANY_NAME_LEN, MAX_SLUG_LEN};
pub use gate::{
	evaluate, path_is_under, GateDecision, AUTH_PREFIX, BILLING_PATH, CHANNEL_SETTINGS_PREFIX,
	EXTERNAL_CALLBACK_PATH, HOME_PATH, INBOX_PATH, LOGIN_PATH, PROTECTED_PREFIX,
	TEAM_SETTINGS_PREFIX,
};
pub use member::{
	validate_email, validate_full_name, validate_password, Member, MAX_EMAIL_LEN,
	MAX_FULL_NAME_LEN, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN,
};
pub use middleware::{
	extract_bearer_token, extract_session_cookie, extract_session_cookie_with_name, AuthContext,
	AuthRequired, CurrentMember, SESSION_COOKIE_NAME,
};
pub use password::{hash_password, verify_password};
pub use policy::{can, capability_grants, PermissionOverrides, Principal};
pub use session::{
	generate_session_token, hash_token, Session, DEFAULT_SESSION_TTL_DAYS,
};
pub use types::*;
