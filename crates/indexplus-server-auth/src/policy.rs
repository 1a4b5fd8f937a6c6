// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Capability policy evaluation.
//!
//! This module contains the core [`can`] function that decides whether a
//! principal holds a capability. Evaluation follows a strict precedence:
//!
//! 1. **No principal**: denied (fail closed)
//! 2. **Owner**: granted, overrides are never consulted
//! 3. **Per-member override**: an entry in [`PermissionOverrides`] is taken
//!    verbatim, in either direction
//! 4. **Role default**: the fixed allow-list for the member's role
//!
//! Member status is deliberately not an input: suspension is enforced by the
//! session gate, not by capability checks. All policy decisions are pure
//! functions with no side effects, making them easy to test and reason about.

use crate::types::{Capability, CompanyId, MemberStatus, Role, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

// =============================================================================
// Principal
// =============================================================================

/// The authenticated identity a capability decision is made for.
///
/// A principal is derived from a member row at request time. The role and
/// overrides carried here must come from persisted state, never from
/// request-supplied claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	/// The member's user account ID.
	pub user_id: UserId,
	/// The company workspace the member belongs to.
	pub company_id: CompanyId,
	/// The member's role within the company.
	pub role: Role,
	/// Account lifecycle state.
	pub status: MemberStatus,
	/// Per-member capability overrides, possibly empty.
	pub overrides: PermissionOverrides,
}

impl Principal {
	/// Creates an active principal with no overrides.
	pub fn new(user_id: UserId, company_id: CompanyId, role: Role) -> Self {
		Self {
			user_id,
			company_id,
			role,
			status: MemberStatus::Active,
			overrides: PermissionOverrides::new(),
		}
	}

	/// Sets the member status.
	pub fn with_status(mut self, status: MemberStatus) -> Self {
		self.status = status;
		self
	}

	/// Adds a capability override.
	pub fn with_override(mut self, capability: Capability, allowed: bool) -> Self {
		self.overrides.set(capability, allowed);
		self
	}
}

// =============================================================================
// Permission Overrides
// =============================================================================

/// Per-member capability overrides.
///
/// An entry replaces the role default for that capability in both directions:
/// `true` grants a capability the role lacks, `false` revokes one it has.
/// Capabilities without an entry fall through to the role default. Serialized
/// as a flat JSON object keyed by capability name; unknown keys are rejected
/// at deserialization because [`Capability`] is a closed enum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionOverrides(BTreeMap<Capability, bool>);

impl PermissionOverrides {
	/// Creates an empty override map.
	pub fn new() -> Self {
		Self(BTreeMap::new())
	}

	/// Returns true if no overrides are set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Looks up the override for a capability, if any.
	pub fn get(&self, capability: Capability) -> Option<bool> {
		self.0.get(&capability).copied()
	}

	/// Sets or replaces the override for a capability.
	pub fn set(&mut self, capability: Capability, allowed: bool) {
		self.0.insert(capability, allowed);
	}

	/// Removes the override for a capability, restoring the role default.
	pub fn clear(&mut self, capability: Capability) {
		self.0.remove(&capability);
	}

	/// Iterates over the override entries in capability order.
	pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
		self.0.iter().map(|(cap, allowed)| (*cap, *allowed))
	}
}

impl FromIterator<(Capability, bool)> for PermissionOverrides {
	fn from_iter<I: IntoIterator<Item = (Capability, bool)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluates whether a principal holds a capability.
///
/// This is the single authorization decision point: the session gate, the API
/// handlers, and the per-page grant payloads all call it. Passing `None`
/// models an unauthenticated or unresolvable caller and always denies.
///
/// # Tracing
///
/// Instrumented at debug level; the decision and the capability are recorded
/// for correlation with audit entries.
#[instrument(level = "debug", skip(principal), fields(capability = %capability))]
pub fn can(principal: Option<&Principal>, capability: Capability) -> bool {
	let Some(principal) = principal else {
		return false;
	};

	if principal.role == Role::Owner {
		return true;
	}

	if let Some(allowed) = principal.overrides.get(capability) {
		return allowed;
	}

	default_allows(principal.role, capability)
}

/// Builds the full capability grant map for a principal.
///
/// Dashboard page payloads embed this so the client renders exactly what the
/// server would authorize.
pub fn capability_grants(principal: &Principal) -> BTreeMap<Capability, bool> {
	Capability::all()
		.iter()
		.map(|cap| (*cap, can(Some(principal), *cap)))
		.collect()
}

/// The fixed per-role allow-lists consulted when no override applies.
fn default_allows(role: Role, capability: Capability) -> bool {
	match role {
		Role::Owner => true,
		Role::Admin => matches!(
			capability,
			Capability::ManageTeam
				| Capability::ManageSettings
				| Capability::ViewAnalytics
				| Capability::ManageCustomers
				| Capability::ManageSales
				| Capability::ManageAutomation
				| Capability::ViewAuditLogs
		),
		Role::Supervisor => matches!(
			capability,
			Capability::ViewAnalytics
				| Capability::ManageCustomers
				| Capability::ManageSales
				| Capability::ViewAuditLogs
		),
		Role::Agent => matches!(
			capability,
			Capability::ViewAnalytics | Capability::ManageCustomers | Capability::ManageSales
		),
	}
}
