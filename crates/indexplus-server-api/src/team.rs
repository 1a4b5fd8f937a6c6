// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexplus_server_auth::{Member, MemberStatus, Role};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Member role for API payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum RoleApi {
	Owner,
	Admin,
	Supervisor,
	Agent,
}

/// Member account status for API payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum MemberStatusApi {
	Active,
	Suspended,
}

/// A company member in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MemberResponse {
	pub user_id: String,
	pub company_id: String,
	pub email: String,
	pub full_name: String,
	pub role: RoleApi,
	pub status: MemberStatusApi,
	/// Per-member capability overrides, keyed by capability name.
	pub overrides: BTreeMap<String, bool>,
	pub locale: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Response for listing company members.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListMembersResponse {
	pub success: bool,
	pub members: Vec<MemberResponse>,
}

/// Request to create a team member. The role string is parsed by the
/// handler so unknown values fail with a localized message; it defaults
/// to `agent` when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateMemberRequest {
	pub email: String,
	pub password: String,
	pub full_name: String,
	#[serde(default)]
	pub role: Option<String>,
}

/// Request to update a team member's profile row. Role and status come
/// in as strings and are parsed by the handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateMemberRequest {
	pub full_name: Option<String>,
	pub role: Option<String>,
	pub status: Option<String>,
}

/// Request to reset a team member's password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateMemberPasswordRequest {
	pub new_password: String,
}

/// Response carrying a single member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MemberEnvelopeResponse {
	pub success: bool,
	pub member: MemberResponse,
}

/// Success response for team operations without a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TeamSuccessResponse {
	pub success: bool,
	pub message: String,
}

impl MemberResponse {
	pub fn from_member(member: Member) -> Self {
		Self {
			user_id: member.user_id.to_string(),
			company_id: member.company_id.to_string(),
			email: member.email,
			full_name: member.full_name,
			role: member.role.into(),
			status: member.status.into(),
			overrides: member
				.overrides
				.iter()
				.map(|(cap, allowed)| (cap.to_string(), allowed))
				.collect(),
			locale: member.locale,
			created_at: member.created_at,
			updated_at: member.updated_at,
		}
	}
}

impl MemberEnvelopeResponse {
	pub fn new(member: Member) -> Self {
		Self {
			success: true,
			member: MemberResponse::from_member(member),
		}
	}
}

impl From<Role> for RoleApi {
	fn from(role: Role) -> Self {
		match role {
			Role::Owner => RoleApi::Owner,
			Role::Admin => RoleApi::Admin,
			Role::Supervisor => RoleApi::Supervisor,
			Role::Agent => RoleApi::Agent,
		}
	}
}

impl From<RoleApi> for Role {
	fn from(role: RoleApi) -> Self {
		match role {
			RoleApi::Owner => Role::Owner,
			RoleApi::Admin => Role::Admin,
			RoleApi::Supervisor => Role::Supervisor,
			RoleApi::Agent => Role::Agent,
		}
	}
}

impl From<MemberStatus> for MemberStatusApi {
	fn from(status: MemberStatus) -> Self {
		match status {
			MemberStatus::Active => MemberStatusApi::Active,
			MemberStatus::Suspended => MemberStatusApi::Suspended,
		}
	}
}

impl From<MemberStatusApi> for MemberStatus {
	fn from(status: MemberStatusApi) -> Self {
		match status {
			MemberStatusApi::Active => MemberStatus::Active,
			MemberStatusApi::Suspended => MemberStatus::Suspended,
		}
	}
}
