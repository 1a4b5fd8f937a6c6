// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization and flow tests for the shared inbox routes.
//!
//! Tests verify conversation handling:
//! - Conversations and messages are ordinary working data, open to every
//!   authenticated member of the company
//! - Converting a conversation into a sale requires manage_sales
//! - Messages can only be appended while a conversation is open
//! - Conversation IDs from another company behave as not-found

use axum::http::{Method, StatusCode};
use indexplus_server_auth::Capability;
use serde_json::json;
use uuid::Uuid;

use super::support::{
	response_json, run_authz_cases, wait_for_audit_entries, AuthzCase, TestApp,
};

// ============================================================================
// Conversations and messages - open to every member
// ============================================================================

#[tokio::test]
async fn every_role_works_the_inbox() {
	let app = TestApp::new().await;
	let fixture = &app.fixtures.company_a;
	let conversation_id = fixture.conversation.id;
	let cases = [
		AuthzCase {
			name: "agent_creates_a_conversation",
			method: Method::POST,
			path: "/api/conversations".to_string(),
			user: Some(fixture.agent.clone()),
			body: Some(json!({})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "supervisor_sends_a_message",
			method: Method::POST,
			path: format!("/api/conversations/{conversation_id}/messages"),
			user: Some(fixture.supervisor.clone()),
			body: Some(json!({ "body": "Thanks for reaching out!" })),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "admin_lists_conversations",
			method: Method::GET,
			path: "/api/conversations".to_string(),
			user: Some(fixture.admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "suspended_member_reads_messages",
			method: Method::GET,
			path: format!("/api/conversations/{conversation_id}/messages"),
			user: Some(fixture.suspended.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "unauthenticated_cannot_list_conversations",
			method: Method::GET,
			path: "/api/conversations".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn status_filter_accepts_only_known_values() {
	let app = TestApp::new().await;
	let agent = &app.fixtures.company_a.agent;

	let response = app.get("/api/conversations?status=open", Some(agent)).await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.get("/api/conversations?status=archived", Some(agent))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Message lifecycle
// ============================================================================

#[tokio::test]
async fn messages_only_append_while_the_conversation_is_open() {
	let app = TestApp::new().await;
	let fixture = &app.fixtures.company_a;
	let conversation_id = fixture.conversation.id;

	let response = app
		.post(
			&format!("/api/conversations/{conversation_id}/messages"),
			Some(&fixture.agent),
			json!({ "body": "Hello there" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let response = app
		.patch(
			&format!("/api/conversations/{conversation_id}"),
			Some(&fixture.agent),
			json!({ "status": "closed" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.post(
			&format!("/api/conversations/{conversation_id}/messages"),
			Some(&fixture.agent),
			json!({ "body": "Too late" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_messages_are_rejected() {
	let app = TestApp::new().await;
	let conversation_id = app.fixtures.company_a.conversation.id;

	let response = app
		.post(
			&format!("/api/conversations/{conversation_id}/messages"),
			Some(&app.fixtures.company_a.agent),
			json!({ "body": "   " }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// POST /api/conversations/{id}/convert - Convert to sale
// ============================================================================

#[tokio::test]
async fn converting_requires_the_manage_sales_capability() {
	let app = TestApp::new().await;
	let fixture = &app.fixtures.company_a;
	let conversation_id = fixture.conversation.id;

	let mut member = fixture.agent.member.clone();
	member.overrides.set(Capability::ManageSales, false);
	app.state.member_repo.update_member(&member).await.unwrap();

	let response = app
		.post(
			&format!("/api/conversations/{conversation_id}/convert"),
			Some(&fixture.agent),
			json!({ "amount_cents": 5000 }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn converting_creates_a_sale_and_marks_the_conversation() {
	let app = TestApp::new().await;
	let fixture = &app.fixtures.company_a;
	let conversation_id = fixture.conversation.id;

	let response = app
		.post(
			&format!("/api/conversations/{conversation_id}/convert"),
			Some(&fixture.agent),
			json!({ "amount_cents": 12900, "description": "Premium plan, annual" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let json = response_json(response).await;
	assert_eq!(json["success"], true);
	assert_eq!(json["conversation"]["status"], "converted");
	assert_eq!(json["sale"]["amount_cents"], 12900);
	assert_eq!(json["sale"]["description"], "Premium plan, annual");
	assert_eq!(
		json["sale"]["conversation_id"].as_str(),
		Some(conversation_id.to_string().as_str())
	);
	assert_eq!(
		json["sale"]["customer_id"].as_str(),
		Some(fixture.customer.id.to_string().as_str())
	);

	// The conversation is no longer open, so both follow-up messages and a
	// second conversion are rejected.
	let response = app
		.post(
			&format!("/api/conversations/{conversation_id}/messages"),
			Some(&fixture.agent),
			json!({ "body": "One more thing" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let response = app
		.post(
			&format!("/api/conversations/{conversation_id}/convert"),
			Some(&fixture.agent),
			json!({ "amount_cents": 100 }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	wait_for_audit_entries(&app.state, &fixture.company.id, "conversation_converted", 1).await;
}

#[tokio::test]
async fn converting_without_a_description_uses_the_default() {
	let app = TestApp::new().await;
	let agent = &app.fixtures.company_a.agent;

	let response = app.post("/api/conversations", Some(agent), json!({})).await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let json = response_json(response).await;
	let conversation_id = json["conversation"]["id"].as_str().unwrap().to_string();

	let response = app
		.post(
			&format!("/api/conversations/{conversation_id}/convert"),
			Some(agent),
			json!({ "amount_cents": 4200 }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let json = response_json(response).await;
	assert_eq!(json["sale"]["description"], "Converted conversation");
	assert_eq!(json["sale"]["customer_id"], serde_json::Value::Null);
}

#[tokio::test]
async fn converting_rejects_non_positive_amounts() {
	let app = TestApp::new().await;
	let conversation_id = app.fixtures.company_a.conversation.id;
	let agent = app.fixtures.company_a.agent.clone();
	let cases = [
		AuthzCase {
			name: "zero_amount_is_rejected",
			method: Method::POST,
			path: format!("/api/conversations/{conversation_id}/convert"),
			user: Some(agent.clone()),
			body: Some(json!({ "amount_cents": 0 })),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "negative_amount_is_rejected",
			method: Method::POST,
			path: format!("/api/conversations/{conversation_id}/convert"),
			user: Some(agent),
			body: Some(json!({ "amount_cents": -500 })),
			expected_status: StatusCode::BAD_REQUEST,
		},
	];
	run_authz_cases(&app, &cases).await;
}

// ============================================================================
// Cross-company isolation
// ============================================================================

#[tokio::test]
async fn conversations_are_scoped_to_the_company() {
	let app = TestApp::new().await;
	let foreign_conversation = app.fixtures.company_a.conversation.id;
	let outsider = app.fixtures.company_b.owner.clone();
	let cases = [
		AuthzCase {
			name: "cross_company_message_listing_is_not_found",
			method: Method::GET,
			path: format!("/api/conversations/{foreign_conversation}/messages"),
			user: Some(outsider.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "cross_company_message_send_is_not_found",
			method: Method::POST,
			path: format!("/api/conversations/{foreign_conversation}/messages"),
			user: Some(outsider.clone()),
			body: Some(json!({ "body": "Sneaky" })),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "cross_company_status_update_is_not_found",
			method: Method::PATCH,
			path: format!("/api/conversations/{foreign_conversation}"),
			user: Some(outsider.clone()),
			body: Some(json!({ "status": "closed" })),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "cross_company_convert_is_not_found",
			method: Method::POST,
			path: format!("/api/conversations/{foreign_conversation}/convert"),
			user: Some(outsider),
			body: Some(json!({ "amount_cents": 100 })),
			expected_status: StatusCode::NOT_FOUND,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn linking_an_unknown_customer_fails() {
	let app = TestApp::new().await;
	let conversation_id = app.fixtures.company_a.conversation.id;

	let response = app
		.patch(
			&format!("/api/conversations/{conversation_id}"),
			Some(&app.fixtures.company_a.agent),
			json!({ "customer_id": Uuid::new_v4().to_string() }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
