// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for team management routes.
//!
//! Tests verify access control for member administration:
//! - Reads are open to every authenticated member of the company
//! - Mutations require the manage_team capability and denials are audited
//! - Owners ignore revoking overrides; other roles take them verbatim
//! - Member IDs from another company behave as not-found
//! - Role and profile changes propagate to both the identity directory and
//!   the member profile row

use axum::http::{Method, StatusCode};
use indexplus_server_auth::{Capability, Role};
use serde_json::json;

use super::support::{
	response_json, run_authz_cases, wait_for_audit_entries, AuthzCase, TestApp, TEST_PASSWORD,
};

// ============================================================================
// GET /api/team/members - List members
// ============================================================================

#[tokio::test]
async fn every_role_can_list_members() {
	let app = TestApp::new().await;
	let fixture = &app.fixtures.company_a;
	let cases = [
		AuthzCase {
			name: "owner_lists_members",
			method: Method::GET,
			path: "/api/team/members".to_string(),
			user: Some(fixture.owner.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "supervisor_lists_members",
			method: Method::GET,
			path: "/api/team/members".to_string(),
			user: Some(fixture.supervisor.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "agent_lists_members",
			method: Method::GET,
			path: "/api/team/members".to_string(),
			user: Some(fixture.agent.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "unauthenticated_cannot_list_members",
			method: Method::GET,
			path: "/api/team/members".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn member_listing_is_scoped_to_the_company() {
	let app = TestApp::new().await;

	let response = app
		.get("/api/team/members", Some(&app.fixtures.company_a.owner))
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let json = response_json(response).await;
	let members = json["members"].as_array().expect("members should be array");
	assert_eq!(members.len(), 5);

	let other_owner_id = app.fixtures.company_b.owner.member.user_id.to_string();
	assert!(
		!members
			.iter()
			.any(|m| m["user_id"].as_str() == Some(&other_owner_id)),
		"company A listing must not contain company B members"
	);
}

// ============================================================================
// POST /api/team/members - Create member
// ============================================================================

#[tokio::test]
async fn member_creation_requires_the_manage_team_capability() {
	let app = TestApp::new().await;
	let fixture = &app.fixtures.company_a;
	let body = |email: &str| {
		json!({
			"email": email,
			"password": "a long enough password",
			"full_name": "New Member",
			"role": "agent",
		})
	};
	let cases = [
		AuthzCase {
			name: "agent_cannot_create_members",
			method: Method::POST,
			path: "/api/team/members".to_string(),
			user: Some(fixture.agent.clone()),
			body: Some(body("denied-by-agent@acme.test")),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "supervisor_cannot_create_members",
			method: Method::POST,
			path: "/api/team/members".to_string(),
			user: Some(fixture.supervisor.clone()),
			body: Some(body("denied-by-supervisor@acme.test")),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_creates_members",
			method: Method::POST,
			path: "/api/team/members".to_string(),
			user: Some(fixture.admin.clone()),
			body: Some(body("created-by-admin@acme.test")),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "owner_creates_members",
			method: Method::POST,
			path: "/api/team/members".to_string(),
			user: Some(fixture.owner.clone()),
			body: Some(body("created-by-owner@acme.test")),
			expected_status: StatusCode::CREATED,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn denied_team_mutations_are_audited() {
	let app = TestApp::new().await;
	let fixture = &app.fixtures.company_a;

	let response = app
		.post(
			"/api/team/members",
			Some(&fixture.agent),
			json!({
				"email": "blocked@acme.test",
				"password": "a long enough password",
				"full_name": "Blocked Member",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	wait_for_audit_entries(&app.state, &fixture.company.id, "access_denied", 1).await;
}

#[tokio::test]
async fn owners_ignore_revoking_overrides() {
	let app = TestApp::new().await;
	let owner = &app.fixtures.company_a.owner;

	let mut member = owner.member.clone();
	member.overrides.set(Capability::ManageTeam, false);
	app.state.member_repo.update_member(&member).await.unwrap();

	let response = app
		.post(
			"/api/team/members",
			Some(owner),
			json!({
				"email": "despite-override@acme.test",
				"password": "a long enough password",
				"full_name": "Despite Override",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn admins_honor_revoking_overrides() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.company_a.admin;

	let mut member = admin.member.clone();
	member.overrides.set(Capability::ManageTeam, false);
	app.state.member_repo.update_member(&member).await.unwrap();

	let response = app
		.post(
			"/api/team/members",
			Some(admin),
			json!({
				"email": "revoked-admin@acme.test",
				"password": "a long enough password",
				"full_name": "Revoked Admin",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn created_member_gets_the_requested_role_and_can_sign_in() {
	let app = TestApp::new().await;

	let response = app
		.post(
			"/api/team/members",
			Some(&app.fixtures.company_a.owner),
			json!({
				"email": "fresh-supervisor@acme.test",
				"password": "a long enough password",
				"full_name": "Fresh Supervisor",
				"role": "supervisor",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let json = response_json(response).await;
	assert_eq!(json["member"]["role"], "supervisor");

	let response = app
		.post(
			"/auth/login",
			None,
			json!({
				"email": "fresh-supervisor@acme.test",
				"password": "a long enough password",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn member_creation_validates_the_payload() {
	let app = TestApp::new().await;
	let owner = app.fixtures.company_a.owner.clone();
	let agent_email = app.fixtures.company_a.agent.member.email.clone();
	let cases = [
		AuthzCase {
			name: "rejects_malformed_email",
			method: Method::POST,
			path: "/api/team/members".to_string(),
			user: Some(owner.clone()),
			body: Some(json!({
				"email": "not-an-email",
				"password": "a long enough password",
				"full_name": "No Email",
			})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "rejects_short_password",
			method: Method::POST,
			path: "/api/team/members".to_string(),
			user: Some(owner.clone()),
			body: Some(json!({
				"email": "short-pw@acme.test",
				"password": "short",
				"full_name": "Short Password",
			})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "rejects_blank_full_name",
			method: Method::POST,
			path: "/api/team/members".to_string(),
			user: Some(owner.clone()),
			body: Some(json!({
				"email": "no-name@acme.test",
				"password": "a long enough password",
				"full_name": "   ",
			})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "duplicate_email_is_a_downstream_failure",
			method: Method::POST,
			path: "/api/team/members".to_string(),
			user: Some(owner),
			body: Some(json!({
				"email": agent_email,
				"password": "a long enough password",
				"full_name": "Duplicate Email",
			})),
			expected_status: StatusCode::BAD_GATEWAY,
		},
	];
	run_authz_cases(&app, &cases).await;
}

// ============================================================================
// PATCH /api/team/members/{id} - Update member
// ============================================================================

#[tokio::test]
async fn role_updates_propagate_to_both_stores() {
	let app = TestApp::new().await;
	let fixture = &app.fixtures.company_a;
	let agent_id = fixture.agent.member.user_id;

	let response = app
		.patch(
			&format!("/api/team/members/{agent_id}"),
			Some(&fixture.owner),
			json!({ "role": "supervisor" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let row = app
		.state
		.member_repo
		.get_member(&agent_id)
		.await
		.unwrap()
		.unwrap();
	assert_eq!(row.role, Role::Supervisor);

	let identity = app.state.identity.clone().unwrap();
	let account = identity.get_user(&agent_id).await.unwrap().unwrap();
	assert_eq!(account.app_metadata.role, Role::Supervisor);
}

#[tokio::test]
async fn member_updates_are_scoped_to_the_company() {
	let app = TestApp::new().await;
	let foreign_id = app.fixtures.company_b.agent.member.user_id;
	let cases = [
		AuthzCase {
			name: "cross_company_update_is_not_found",
			method: Method::PATCH,
			path: format!("/api/team/members/{foreign_id}"),
			user: Some(app.fixtures.company_a.owner.clone()),
			body: Some(json!({ "full_name": "Hijacked" })),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "cross_company_delete_is_not_found",
			method: Method::DELETE,
			path: format!("/api/team/members/{foreign_id}"),
			user: Some(app.fixtures.company_a.owner.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn empty_member_updates_are_rejected() {
	let app = TestApp::new().await;
	let agent_id = app.fixtures.company_a.agent.member.user_id;

	let response = app
		.patch(
			&format!("/api/team/members/{agent_id}"),
			Some(&app.fixtures.company_a.owner),
			json!({}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn suspending_a_member_confines_their_next_page_visit() {
	let app = TestApp::new().await;
	let fixture = &app.fixtures.company_a;
	let agent_id = fixture.agent.member.user_id;

	let response = app.get("/dashboard/inbox", Some(&fixture.agent)).await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.patch(
			&format!("/api/team/members/{agent_id}"),
			Some(&fixture.owner),
			json!({ "status": "suspended" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	// The middleware re-reads the member row per request, so the existing
	// session is confined immediately.
	let response = app.get("/dashboard/inbox", Some(&fixture.agent)).await;
	assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
	assert_eq!(
		response.headers().get("location").unwrap(),
		"/dashboard/billing"
	);
}

// ============================================================================
// DELETE /api/team/members/{id} - Delete member
// ============================================================================

#[tokio::test]
async fn owners_cannot_delete_themselves() {
	let app = TestApp::new().await;
	let owner = &app.fixtures.company_a.owner;
	let owner_id = owner.member.user_id;

	let response = app
		.delete(&format!("/api/team/members/{owner_id}"), Some(owner))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_member_revokes_their_sessions() {
	let app = TestApp::new().await;
	let fixture = &app.fixtures.company_a;
	let agent_id = fixture.agent.member.user_id;

	let response = app.get("/api/customers", Some(&fixture.agent)).await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.delete(
			&format!("/api/team/members/{agent_id}"),
			Some(&fixture.owner),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app.get("/api/customers", Some(&fixture.agent)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// POST /api/team/members/{id}/password - Reset password
// ============================================================================

#[tokio::test]
async fn password_resets_require_the_manage_team_capability() {
	let app = TestApp::new().await;
	let supervisor_id = app.fixtures.company_a.supervisor.member.user_id;

	let response = app
		.post(
			&format!("/api/team/members/{supervisor_id}/password"),
			Some(&app.fixtures.company_a.agent),
			json!({ "new_password": "attempted takeover" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn password_reset_replaces_the_credential() {
	let app = TestApp::new().await;
	let fixture = &app.fixtures.company_a;
	let agent = &fixture.agent;
	let agent_id = agent.member.user_id;

	let response = app
		.post(
			&format!("/api/team/members/{agent_id}/password"),
			Some(&fixture.owner),
			json!({ "new_password": "a brand new passphrase" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.post(
			"/auth/login",
			None,
			json!({ "email": agent.member.email, "password": TEST_PASSWORD }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let response = app
		.post(
			"/auth/login",
			None,
			json!({ "email": agent.member.email, "password": "a brand new passphrase" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
}
