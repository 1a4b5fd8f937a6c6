// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session gate evaluation for dashboard and auth pages.
//!
//! Every page navigation passes through [`evaluate`], which applies three
//! checks in a fixed order:
//!
//! 1. **Authentication**: anonymous visitors are sent to the login page,
//!    authenticated members are bounced off the auth pages (except the
//!    external OAuth callback, which both states may visit)
//! 2. **Suspension**: suspended members are sent to the billing page from
//!    anywhere else in the dashboard; the billing page itself is terminal
//!    so a suspended member can always reach it
//! 3. **Role restriction**: agents are sent to the inbox from the billing
//!    and team/channel settings pages
//!
//! When the identity directory is not configured there are no principals to
//! gate on, and the gate deliberately fails open so the dashboard remains
//! reachable for local development. API handlers still deny in that state.
//!
//! All decisions are pure functions of the principal and the path, with no
//! side effects.

use crate::policy::Principal;
use crate::types::{MemberStatus, Role};
use tracing::instrument;

/// Prefix for pages requiring authentication.
pub const PROTECTED_PREFIX: &str = "/dashboard";

/// Prefix for the auth pages (login, signup, callback).
pub const AUTH_PREFIX: &str = "/auth";

/// OAuth-style callback landing page, exempt from the authenticated-user
/// bounce so an in-flight external login can complete.
pub const EXTERNAL_CALLBACK_PATH: &str = "/auth/external-callback";

/// Login page anonymous visitors are redirected to.
pub const LOGIN_PATH: &str = "/auth/login";

/// Dashboard home authenticated members are redirected to.
pub const HOME_PATH: &str = "/dashboard";

/// Billing page suspended members are confined to.
pub const BILLING_PATH: &str = "/dashboard/billing";

/// Inbox page agents are redirected to from restricted pages.
pub const INBOX_PATH: &str = "/dashboard/inbox";

/// Team management pages, restricted from agents.
pub const TEAM_SETTINGS_PREFIX: &str = "/dashboard/settings/team";

/// Channel configuration pages, restricted from agents.
pub const CHANNEL_SETTINGS_PREFIX: &str = "/dashboard/settings/channels";

/// The outcome of gating a page navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
	/// Serve the requested page.
	Proceed,
	/// Redirect the browser to the given path.
	Redirect(&'static str),
}

/// Evaluates the session gate for a page navigation.
///
/// `identity_configured` is false when the server started without usable
/// identity credentials; the gate then fails open. `principal` is the
/// resolved member, or `None` for anonymous visitors.
#[instrument(level = "debug", skip(principal), fields(path))]
pub fn evaluate(
	identity_configured: bool,
	principal: Option<&Principal>,
	path: &str,
) -> GateDecision {
	if !identity_configured {
		return GateDecision::Proceed;
	}

	// Check 1: authentication.
	match principal {
		None => {
			if path_is_under(path, PROTECTED_PREFIX) {
				return GateDecision::Redirect(LOGIN_PATH);
			}
			return GateDecision::Proceed;
		}
		Some(_) => {
			if path_is_under(path, AUTH_PREFIX) && path != EXTERNAL_CALLBACK_PATH {
				return GateDecision::Redirect(HOME_PATH);
			}
		}
	}

	let Some(principal) = principal else {
		return GateDecision::Proceed;
	};

	// Check 2: suspension. Terminal on the billing page so the member can
	// resolve the suspension without bouncing between redirects.
	if principal.status == MemberStatus::Suspended && path_is_under(path, PROTECTED_PREFIX) {
		if path_is_under(path, BILLING_PATH) {
			return GateDecision::Proceed;
		}
		return GateDecision::Redirect(BILLING_PATH);
	}

	// Check 3: agent page restrictions.
	if principal.role == Role::Agent
		&& (path_is_under(path, BILLING_PATH)
			|| path_is_under(path, TEAM_SETTINGS_PREFIX)
			|| path_is_under(path, CHANNEL_SETTINGS_PREFIX))
	{
		return GateDecision::Redirect(INBOX_PATH);
	}

	GateDecision::Proceed
}

/// Path prefix test respecting segment boundaries.
///
/// `/dashboard/inbox` is under `/dashboard`, but `/dashboardx` is not.
pub fn path_is_under(path: &str, prefix: &str) -> bool {
	match path.strip_prefix(prefix) {
		Some(rest) => rest.is_empty() || rest.starts_with('/'),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::policy::Principal;
	use crate::types::{CompanyId, UserId};
	use uuid::Uuid;

	fn principal(role: Role) -> Principal {
		Principal::new(
			UserId::new(Uuid::new_v4()),
			CompanyId::new(Uuid::new_v4()),
			role,
		)
	}

	fn suspended(role: Role) -> Principal {
		principal(role).with_status(MemberStatus::Suspended)
	}

	mod unauthenticated_access {
		use super::*;

		#[test]
		fn protected_pages_redirect_to_login() {
			for path in ["/dashboard", "/dashboard/inbox", "/dashboard/settings/team"] {
				assert_eq!(
					evaluate(true, None, path),
					GateDecision::Redirect(LOGIN_PATH),
					"path {path}"
				);
			}
		}

		#[test]
		fn auth_pages_are_reachable() {
			for path in ["/auth/login", "/auth/signup", "/auth/external-callback"] {
				assert_eq!(evaluate(true, None, path), GateDecision::Proceed, "path {path}");
			}
		}

		#[test]
		fn public_paths_are_reachable() {
			assert_eq!(evaluate(true, None, "/"), GateDecision::Proceed);
			assert_eq!(evaluate(true, None, "/health"), GateDecision::Proceed);
		}
	}

	mod authenticated_on_auth_pages {
		use super::*;

		#[test]
		fn login_and_signup_bounce_to_dashboard() {
			let member = principal(Role::Agent);
			for path in ["/auth/login", "/auth/signup", "/auth"] {
				assert_eq!(
					evaluate(true, Some(&member), path),
					GateDecision::Redirect(HOME_PATH),
					"path {path}"
				);
			}
		}

		#[test]
		fn external_callback_is_exempt_from_the_bounce() {
			let member = principal(Role::Owner);
			assert_eq!(
				evaluate(true, Some(&member), EXTERNAL_CALLBACK_PATH),
				GateDecision::Proceed
			);
		}

		#[test]
		fn dashboard_pages_are_served() {
			let member = principal(Role::Owner);
			assert_eq!(
				evaluate(true, Some(&member), "/dashboard/customers"),
				GateDecision::Proceed
			);
		}
	}

	mod suspension {
		use super::*;

		#[test]
		fn suspended_members_are_confined_to_billing() {
			let member = suspended(Role::Admin);
			for path in ["/dashboard", "/dashboard/inbox", "/dashboard/settings/team"] {
				assert_eq!(
					evaluate(true, Some(&member), path),
					GateDecision::Redirect(BILLING_PATH),
					"path {path}"
				);
			}
		}

		#[test]
		fn billing_page_is_terminal_for_suspended_members() {
			let member = suspended(Role::Owner);
			assert_eq!(
				evaluate(true, Some(&member), BILLING_PATH),
				GateDecision::Proceed
			);
			assert_eq!(
				evaluate(true, Some(&member), "/dashboard/billing/history"),
				GateDecision::Proceed
			);
		}

		#[test]
		fn suspended_agent_still_reaches_billing() {
			// Suspension outranks the agent page restriction, otherwise the
			// two redirects would loop.
			let member = suspended(Role::Agent);
			assert_eq!(
				evaluate(true, Some(&member), BILLING_PATH),
				GateDecision::Proceed
			);
			assert_eq!(
				evaluate(true, Some(&member), INBOX_PATH),
				GateDecision::Redirect(BILLING_PATH)
			);
		}

		#[test]
		fn suspension_does_not_leak_outside_the_dashboard() {
			let member = suspended(Role::Admin);
			assert_eq!(
				evaluate(true, Some(&member), EXTERNAL_CALLBACK_PATH),
				GateDecision::Proceed
			);
		}
	}

	mod agent_restrictions {
		use super::*;

		#[test]
		fn agents_bounce_off_restricted_pages() {
			let agent = principal(Role::Agent);
			for path in [
				"/dashboard/billing",
				"/dashboard/billing/history",
				"/dashboard/settings/team",
				"/dashboard/settings/team/invite",
				"/dashboard/settings/channels",
			] {
				assert_eq!(
					evaluate(true, Some(&agent), path),
					GateDecision::Redirect(INBOX_PATH),
					"path {path}"
				);
			}
		}

		#[test]
		fn agents_keep_access_to_everything_else() {
			let agent = principal(Role::Agent);
			for path in [
				"/dashboard",
				"/dashboard/inbox",
				"/dashboard/customers",
				"/dashboard/settings",
			] {
				assert_eq!(
					evaluate(true, Some(&agent), path),
					GateDecision::Proceed,
					"path {path}"
				);
			}
		}

		#[test]
		fn other_roles_are_not_restricted() {
			for role in [Role::Owner, Role::Admin, Role::Supervisor] {
				let member = principal(role);
				assert_eq!(
					evaluate(true, Some(&member), "/dashboard/settings/team"),
					GateDecision::Proceed,
					"role {role}"
				);
			}
		}
	}

	mod identity_unconfigured {
		use super::*;

		#[test]
		fn gate_fails_open_without_identity_credentials() {
			assert_eq!(evaluate(false, None, "/dashboard"), GateDecision::Proceed);
			assert_eq!(
				evaluate(false, None, "/dashboard/settings/team"),
				GateDecision::Proceed
			);
			assert_eq!(evaluate(false, None, "/auth/login"), GateDecision::Proceed);
		}
	}

	mod path_boundaries {
		use super::*;

		#[test]
		fn prefix_matches_respect_segments() {
			assert!(path_is_under("/dashboard", "/dashboard"));
			assert!(path_is_under("/dashboard/inbox", "/dashboard"));
			assert!(!path_is_under("/dashboardx", "/dashboard"));
			assert!(!path_is_under("/dash", "/dashboard"));
		}

		#[test]
		fn lookalike_pages_are_not_restricted() {
			let agent = principal(Role::Agent);
			assert_eq!(
				evaluate(true, Some(&agent), "/dashboard/billing-faq"),
				GateDecision::Proceed
			);
			assert_eq!(
				evaluate(true, None, "/dashboard-docs"),
				GateDecision::Proceed
			);
		}
	}

	mod property_tests {
		use super::*;
		use proptest::prelude::*;

		fn arb_role() -> impl Strategy<Value = Role> {
			prop_oneof![
				Just(Role::Owner),
				Just(Role::Admin),
				Just(Role::Supervisor),
				Just(Role::Agent),
			]
		}

		fn arb_dashboard_path() -> impl Strategy<Value = String> {
			"[a-z/]{0,24}".prop_map(|suffix| format!("/dashboard/{suffix}"))
		}

		proptest! {
				#[test]
				fn anonymous_never_reaches_the_dashboard(path in arb_dashboard_path()) {
						prop_assert_eq!(
								evaluate(true, None, &path),
								GateDecision::Redirect(LOGIN_PATH)
						);
				}

				#[test]
				fn suspended_members_only_ever_see_billing(
						role in arb_role(),
						path in arb_dashboard_path(),
				) {
						let member = suspended(role);
						match evaluate(true, Some(&member), &path) {
								GateDecision::Proceed => {
										prop_assert!(path_is_under(&path, BILLING_PATH));
								}
								GateDecision::Redirect(target) => {
										prop_assert_eq!(target, BILLING_PATH);
								}
						}
				}

				#[test]
				fn redirect_targets_are_themselves_stable(
						role in arb_role(),
						path in arb_dashboard_path(),
				) {
						// Following one redirect must land on a page the gate serves.
						let member = principal(role);
						if let GateDecision::Redirect(target) = evaluate(true, Some(&member), &path) {
								prop_assert_eq!(
										evaluate(true, Some(&member), target),
										GateDecision::Proceed
								);
						}
				}
		}
	}
}
