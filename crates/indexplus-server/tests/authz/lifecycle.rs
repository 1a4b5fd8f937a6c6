// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end account lifecycle tests.
//!
//! Tests drive the HTTP surface the way a browser would:
//! - Signup provisions a company, an owner account, and a session cookie
//! - Login and logout issue and revoke sessions
//! - An owner can staff the team and remove members again, and removal
//!   cuts off the removed member's live sessions

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{
	response_json, run_authz_cases, session_token_from, wait_for_audit_entries, AuthzCase,
	TestApp, TestUser, TEST_PASSWORD,
};

// ============================================================================
// POST /auth/signup - Company signup
// ============================================================================

#[tokio::test]
async fn signup_provisions_a_company_owner_and_session() {
	let app = TestApp::new().await;

	let response = app
		.post(
			"/auth/signup",
			None,
			json!({
				"company_name": "Fresh Start Labs",
				"full_name": "Founder Person",
				"email": "founder@fresh.test",
				"password": "a long enough password",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let token = session_token_from(&response).expect("signup should set a session cookie");
	let json = response_json(response).await;
	assert_eq!(json["success"], true);
	assert_eq!(json["member"]["role"], "owner");
	assert_eq!(json["member"]["full_name"], "Founder Person");

	// The cookie is live: the dashboard serves instead of redirecting.
	let response = app.get_with_session("/dashboard", &token).await;
	assert_eq!(response.status(), StatusCode::OK);

	let member = app
		.state
		.member_repo
		.get_member_by_email("founder@fresh.test")
		.await
		.unwrap()
		.unwrap();
	wait_for_audit_entries(&app.state, &member.company_id, "signup", 1).await;
}

#[tokio::test]
async fn signup_validates_its_payload() {
	let app = TestApp::new().await;
	let cases = [
		AuthzCase {
			name: "rejects_blank_company_name",
			method: Method::POST,
			path: "/auth/signup".to_string(),
			user: None,
			body: Some(json!({
				"company_name": "   ",
				"full_name": "Founder Person",
				"email": "founder@blank.test",
				"password": "a long enough password",
			})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "rejects_malformed_email",
			method: Method::POST,
			path: "/auth/signup".to_string(),
			user: None,
			body: Some(json!({
				"company_name": "Bad Email Ltd",
				"full_name": "Founder Person",
				"email": "not-an-email",
				"password": "a long enough password",
			})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "rejects_short_password",
			method: Method::POST,
			path: "/auth/signup".to_string(),
			user: None,
			body: Some(json!({
				"company_name": "Short Password Ltd",
				"full_name": "Founder Person",
				"email": "founder@shortpw.test",
				"password": "short",
			})),
			expected_status: StatusCode::BAD_REQUEST,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn duplicate_signup_email_is_a_downstream_failure() {
	let app = TestApp::new().await;
	let body = json!({
		"company_name": "First Mover GmbH",
		"full_name": "Founder Person",
		"email": "founder@firstmover.test",
		"password": "a long enough password",
	});

	let response = app.post("/auth/signup", None, body.clone()).await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app.post("/auth/signup", None, body).await;
	assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// ============================================================================
// POST /auth/login - Sign in
// ============================================================================

#[tokio::test]
async fn login_rejects_wrong_credentials() {
	let app = TestApp::new().await;
	let email = app.fixtures.company_a.agent.member.email.clone();

	let response = app
		.post(
			"/auth/login",
			None,
			json!({ "email": email, "password": "not the password" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let response = app
		.post(
			"/auth/login",
			None,
			json!({ "email": "nobody@acme.test", "password": TEST_PASSWORD }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn suspended_members_sign_in_and_land_on_billing() {
	let app = TestApp::new().await;
	let suspended = &app.fixtures.company_a.suspended;

	let response = app
		.post(
			"/auth/login",
			None,
			json!({ "email": suspended.member.email, "password": TEST_PASSWORD }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let token = session_token_from(&response).expect("login should set a session cookie");

	let response = app.get_with_session("/dashboard", &token).await;
	assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
	assert_eq!(
		response.headers().get("location").unwrap(),
		"/dashboard/billing"
	);
}

// ============================================================================
// POST /api/auth/logout - Sign out
// ============================================================================

#[tokio::test]
async fn logout_revokes_the_session_and_clears_the_cookie() {
	let app = TestApp::new().await;
	let agent = &app.fixtures.company_a.agent;

	let response = app
		.post(
			"/auth/login",
			None,
			json!({ "email": agent.member.email, "password": TEST_PASSWORD }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let fresh = TestUser {
		member: agent.member.clone(),
		session_token: session_token_from(&response).unwrap(),
	};

	let response = app.get("/api/customers", Some(&fresh)).await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app.post("/api/auth/logout", Some(&fresh), json!({})).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert!(
		session_token_from(&response).is_none(),
		"logout should clear the cookie"
	);

	let response = app.get("/api/customers", Some(&fresh)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Full staffing lifecycle
// ============================================================================

#[tokio::test]
async fn an_owner_can_staff_and_unstaff_a_company() {
	let app = TestApp::new().await;

	// A founder signs up, creating the company workspace.
	let response = app
		.post(
			"/auth/signup",
			None,
			json!({
				"company_name": "Lifecycle Inc",
				"full_name": "Lia Founder",
				"email": "lia@lifecycle.test",
				"password": "a long enough password",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let owner = TestUser {
		member: app
			.state
			.member_repo
			.get_member_by_email("lia@lifecycle.test")
			.await
			.unwrap()
			.unwrap(),
		session_token: session_token_from(&response).unwrap(),
	};

	// The owner hires an agent.
	let response = app
		.post(
			"/api/team/members",
			Some(&owner),
			json!({
				"email": "avery@lifecycle.test",
				"password": "another long password",
				"full_name": "Avery Agent",
				"role": "agent",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let json = response_json(response).await;
	let agent_id = json["member"]["user_id"].as_str().unwrap().to_string();

	// The agent signs in and can work, but cannot touch the team.
	let response = app
		.post(
			"/auth/login",
			None,
			json!({ "email": "avery@lifecycle.test", "password": "another long password" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let agent = TestUser {
		member: app
			.state
			.member_repo
			.get_member_by_email("avery@lifecycle.test")
			.await
			.unwrap()
			.unwrap(),
		session_token: session_token_from(&response).unwrap(),
	};

	let response = app.get("/api/conversations", Some(&agent)).await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.post(
			"/api/team/members",
			Some(&agent),
			json!({
				"email": "crony@lifecycle.test",
				"password": "a long enough password",
				"full_name": "Crony Hire",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	// The owner lets the agent go; the agent's session dies with the account.
	let response = app
		.delete(&format!("/api/team/members/{agent_id}"), Some(&owner))
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app.get("/api/conversations", Some(&agent)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let response = app.get("/api/team/members", Some(&owner)).await;
	assert_eq!(response.status(), StatusCode::OK);
	let json = response_json(response).await;
	assert_eq!(json["members"].as_array().unwrap().len(), 1);
}
