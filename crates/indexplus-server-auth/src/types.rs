// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for authentication and authorization.
//!
//! This module defines the foundational types used throughout the auth system:
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs for different entity types
//!   ([`UserId`], [`CompanyId`], [`SessionId`], etc.) preventing accidental mixing
//! - **[`Role`]**: The closed set of workspace roles a member can hold
//! - **[`MemberStatus`]**: Account lifecycle state (active or suspended)
//! - **[`Capability`]**: The closed set of permission keys that gate features
//!
//! Roles, statuses, and capabilities are deliberately closed enums: values
//! arriving from requests or storage are parsed with [`std::str::FromStr`] and
//! unknown strings are rejected rather than silently mapped to a fallback.
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user account.");
define_id_type!(SessionId, "Unique identifier for a session.");
define_id_type!(CompanyId, "Unique identifier for a company workspace.");
define_id_type!(CustomerId, "Unique identifier for a customer record.");
define_id_type!(ConversationId, "Unique identifier for a conversation.");
define_id_type!(MessageId, "Unique identifier for a conversation message.");
define_id_type!(SaleId, "Unique identifier for a sale record.");
define_id_type!(ChannelId, "Unique identifier for a connected messaging channel.");
define_id_type!(TemplateId, "Unique identifier for an auto-reply template.");
define_id_type!(PaymentId, "Unique identifier for a payment submission.");

// =============================================================================
// Roles
// =============================================================================

/// Roles a member can hold within a company workspace.
///
/// Privilege strictly decreases from owner to agent, but authorization
/// decisions are made against the explicit capability grants in
/// [`crate::policy`], not against this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	/// Created the company; holds every capability unconditionally.
	Owner,
	/// Manages the team and settings, sees everything except billing.
	Admin,
	/// Oversees customers and sales, can read audit logs.
	Supervisor,
	/// Day-to-day customer and sales work only.
	Agent,
}

impl Role {
	/// Returns all available roles.
	pub fn all() -> &'static [Role] {
		&[Role::Owner, Role::Admin, Role::Supervisor, Role::Agent]
	}

	/// Returns true if this role has at least the privilege of the given role.
	pub fn has_permission_of(&self, other: &Role) -> bool {
		matches!(
			(self, other),
			(Role::Owner, _)
				| (Role::Admin, Role::Admin | Role::Supervisor | Role::Agent)
				| (Role::Supervisor, Role::Supervisor | Role::Agent)
				| (Role::Agent, Role::Agent)
		)
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Role::Owner => write!(f, "owner"),
			Role::Admin => write!(f, "admin"),
			Role::Supervisor => write!(f, "supervisor"),
			Role::Agent => write!(f, "agent"),
		}
	}
}

/// Error returned when a string does not name a known [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0:?}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
	type Err = RoleParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"owner" => Ok(Role::Owner),
			"admin" => Ok(Role::Admin),
			"supervisor" => Ok(Role::Supervisor),
			"agent" => Ok(Role::Agent),
			other => Err(RoleParseError(other.to_string())),
		}
	}
}

// =============================================================================
// Member Status
// =============================================================================

/// Lifecycle state of a member account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
	/// Account in good standing.
	#[default]
	Active,
	/// Account locked out of the dashboard pending billing resolution.
	Suspended,
}

impl MemberStatus {
	/// Returns all available member statuses.
	pub fn all() -> &'static [MemberStatus] {
		&[MemberStatus::Active, MemberStatus::Suspended]
	}
}

impl fmt::Display for MemberStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MemberStatus::Active => write!(f, "active"),
			MemberStatus::Suspended => write!(f, "suspended"),
		}
	}
}

/// Error returned when a string does not name a known [`MemberStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown member status: {0:?}")]
pub struct StatusParseError(pub String);

impl FromStr for MemberStatus {
	type Err = StatusParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"active" => Ok(MemberStatus::Active),
			"suspended" => Ok(MemberStatus::Suspended),
			other => Err(StatusParseError(other.to_string())),
		}
	}
}

// =============================================================================
// Capabilities
// =============================================================================

/// Permission keys gating dashboard features and API operations.
///
/// Capabilities are the unit of authorization: every gated operation names
/// exactly one capability, and [`crate::policy::can`] decides whether a
/// principal holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
	/// Create, update, and remove team members.
	ManageTeam,
	/// Edit workspace settings and connected channels.
	ManageSettings,
	/// View the analytics dashboard.
	ViewAnalytics,
	/// Create and edit customer records.
	ManageCustomers,
	/// Record and edit sales.
	ManageSales,
	/// Manage auto-reply templates.
	ManageAutomation,
	/// Read the audit log.
	ViewAuditLogs,
	/// Submit and review billing payments.
	ManageBilling,
}

impl Capability {
	/// Returns all capability keys.
	pub fn all() -> &'static [Capability] {
		&[
			Capability::ManageTeam,
			Capability::ManageSettings,
			Capability::ViewAnalytics,
			Capability::ManageCustomers,
			Capability::ManageSales,
			Capability::ManageAutomation,
			Capability::ViewAuditLogs,
			Capability::ManageBilling,
		]
	}
}

impl fmt::Display for Capability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Capability::ManageTeam => write!(f, "manage_team"),
			Capability::ManageSettings => write!(f, "manage_settings"),
			Capability::ViewAnalytics => write!(f, "view_analytics"),
			Capability::ManageCustomers => write!(f, "manage_customers"),
			Capability::ManageSales => write!(f, "manage_sales"),
			Capability::ManageAutomation => write!(f, "manage_automation"),
			Capability::ViewAuditLogs => write!(f, "view_audit_logs"),
			Capability::ManageBilling => write!(f, "manage_billing"),
		}
	}
}

/// Error returned when a string does not name a known [`Capability`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown capability: {0:?}")]
pub struct CapabilityParseError(pub String);

impl FromStr for Capability {
	type Err = CapabilityParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"manage_team" => Ok(Capability::ManageTeam),
			"manage_settings" => Ok(Capability::ManageSettings),
			"view_analytics" => Ok(Capability::ViewAnalytics),
			"manage_customers" => Ok(Capability::ManageCustomers),
			"manage_sales" => Ok(Capability::ManageSales),
			"manage_automation" => Ok(Capability::ManageAutomation),
			"view_audit_logs" => Ok(Capability::ViewAuditLogs),
			"manage_billing" => Ok(Capability::ManageBilling),
			other => Err(CapabilityParseError(other.to_string())),
		}
	}
}
