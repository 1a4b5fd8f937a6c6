// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	body::Body,
	http::{header::HeaderName, header::HeaderValue, Method, Request, StatusCode},
	response::Response,
	Router,
};
use indexplus_common_secret::SecretString;
use indexplus_server_auth::{Company, CompanyId, Member, MemberStatus, Role};
use indexplus_server_db::{Conversation, Customer};
use indexplus_server_identity::{AppMetadata, UserMetadata};
use serde::Serialize;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use indexplus_server::{
	api::{create_app_state, create_router, AppState},
	ServerConfig,
};

const TEST_SERVICE_KEY: &str =
	"isk_fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210";

/// Password shared by every fixture account.
pub const TEST_PASSWORD: &str = "correct horse battery";

#[derive(Clone)]
pub struct TestUser {
	pub member: Member,
	pub session_token: String,
}

impl TestUser {
	pub fn auth_header(&self) -> (HeaderName, HeaderValue) {
		(
			HeaderName::from_static("cookie"),
			HeaderValue::from_str(&format!("indexplus_session={}", self.session_token)).unwrap(),
		)
	}
}

#[derive(Clone)]
pub struct CompanyFixture {
	pub company: Company,
	pub owner: TestUser,
	pub admin: TestUser,
	pub supervisor: TestUser,
	pub agent: TestUser,
	pub suspended: TestUser,
	pub customer: Customer,
	pub conversation: Conversation,
}

#[derive(Clone)]
pub struct Fixtures {
	pub company_a: CompanyFixture,
	pub company_b: CompanyFixture,
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	pub state: AppState,
	_temp_dir: TempDir,
}

impl TestApp {
	pub async fn new() -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let db_path = temp_dir.path().join("test_authz.db");
		let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
		let pool = indexplus_server::db::create_pool(&db_url).await.unwrap();
		indexplus_server::db::run_migrations(&pool).await.unwrap();

		let mut config = ServerConfig::default();
		config.auth.identity_service_key = Some(SecretString::new(TEST_SERVICE_KEY.to_string()));
		let state = create_app_state(pool, &config);

		let fixtures = create_fixtures(&state).await;

		let router = create_router(state.clone());

		Self {
			router,
			fixtures,
			state,
			_temp_dir: temp_dir,
		}
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::GET, path, user, Option::<()>::None)
			.await
	}

	pub async fn post(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	pub async fn patch(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::PATCH, path, user, Some(body)).await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::DELETE, path, user, Option::<()>::None)
			.await
	}

	/// GET with a raw cookie value rather than a fixture user, for requests
	/// carrying a session issued through the HTTP surface itself.
	pub async fn get_with_session(&self, path: &str, session_token: &str) -> Response<Body> {
		let request = Request::builder()
			.method(Method::GET)
			.uri(path)
			.header("cookie", format!("indexplus_session={session_token}"))
			.body(Body::empty())
			.unwrap();

		self.router.clone().oneshot(request).await.unwrap()
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		if let Some(test_user) = user {
			let (name, value) = test_user.auth_header();
			builder = builder.header(name, value);
		}

		let request_body = match body {
			Some(b) => {
				builder = builder.header("content-type", "application/json");
				Body::from(serde_json::to_string(&b).unwrap())
			}
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();

		self.router.clone().oneshot(request).await.unwrap()
	}
}

pub struct AuthzCase {
	pub name: &'static str,
	pub method: Method,
	pub path: String,
	pub user: Option<TestUser>,
	pub body: Option<serde_json::Value>,
	pub expected_status: StatusCode,
}

pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	for case in cases {
		let response = match (&case.method, &case.body) {
			(m, Some(body)) if *m == Method::POST => {
				app.post(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, None) if *m == Method::POST => {
				app
					.post(&case.path, case.user.as_ref(), serde_json::json!({}))
					.await
			}
			(m, Some(body)) if *m == Method::PATCH => {
				app
					.patch(&case.path, case.user.as_ref(), body.clone())
					.await
			}
			(m, _) if *m == Method::DELETE => app.delete(&case.path, case.user.as_ref()).await,
			_ => app.get(&case.path, case.user.as_ref()).await,
		};

		if response.status() != case.expected_status {
			// Read the response body for debugging
			let (parts, body) = response.into_parts();
			let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
			let body_str = String::from_utf8_lossy(&body_bytes);
			panic!(
				"Case '{}': {} {} - expected {}, got {}\nResponse body: {}",
				case.name, case.method, case.path, case.expected_status, parts.status, body_str
			);
		}
	}
}

/// Reads a response body as JSON.
pub async fn response_json(response: Response<Body>) -> serde_json::Value {
	let body = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&body).unwrap()
}

/// Pulls the session token out of a login or signup response cookie.
pub fn session_token_from(response: &Response<Body>) -> Option<String> {
	let cookie = response.headers().get("set-cookie")?.to_str().ok()?;
	let value = cookie.strip_prefix("indexplus_session=")?;
	let token = value.split(';').next()?;
	(!token.is_empty()).then(|| token.to_string())
}

/// Polls the audit log until at least `min_count` entries of an event type
/// exist for the company. The audit pipeline writes from a background task,
/// so assertions poll rather than read immediately after the request.
pub async fn wait_for_audit_entries(
	state: &AppState,
	company_id: &CompanyId,
	event_type: &str,
	min_count: i64,
) -> i64 {
	let deadline = tokio::time::Instant::now() + Duration::from_secs(2);

	loop {
		let (_, total) = state
			.audit_repo
			.query_logs(
				company_id,
				Some(event_type),
				None,
				None,
				None,
				None,
				None,
				Some(1),
				Some(0),
			)
			.await
			.unwrap();

		if total >= min_count {
			return total;
		}

		if tokio::time::Instant::now() >= deadline {
			panic!("expected at least {min_count} '{event_type}' audit entries, found {total}");
		}

		tokio::time::sleep(Duration::from_millis(25)).await;
	}
}

async fn create_fixtures(state: &AppState) -> Fixtures {
	Fixtures {
		company_a: create_company_fixture(state, "Acme Support", "acme").await,
		company_b: create_company_fixture(state, "Globex Desk", "globex").await,
	}
}

async fn create_company_fixture(state: &AppState, name: &str, domain: &str) -> CompanyFixture {
	let company = Company::new(name);
	state.company_repo.create_company(&company).await.unwrap();

	let owner = create_test_member(
		state,
		&company,
		&format!("owner@{domain}.test"),
		"Owner User",
		Role::Owner,
		MemberStatus::Active,
	)
	.await;
	let admin = create_test_member(
		state,
		&company,
		&format!("admin@{domain}.test"),
		"Admin User",
		Role::Admin,
		MemberStatus::Active,
	)
	.await;
	let supervisor = create_test_member(
		state,
		&company,
		&format!("supervisor@{domain}.test"),
		"Supervisor User",
		Role::Supervisor,
		MemberStatus::Active,
	)
	.await;
	let agent = create_test_member(
		state,
		&company,
		&format!("agent@{domain}.test"),
		"Agent User",
		Role::Agent,
		MemberStatus::Active,
	)
	.await;
	let suspended = create_test_member(
		state,
		&company,
		&format!("suspended@{domain}.test"),
		"Suspended User",
		Role::Agent,
		MemberStatus::Suspended,
	)
	.await;

	let customer = Customer::new(company.id, format!("{name} Customer"));
	state.customer_repo.create_customer(&customer).await.unwrap();

	let mut conversation = Conversation::new(company.id);
	conversation.customer_id = Some(customer.id);
	state
		.conversation_repo
		.create_conversation(&conversation)
		.await
		.unwrap();

	CompanyFixture {
		company,
		owner,
		admin,
		supervisor,
		agent,
		suspended,
		customer,
		conversation,
	}
}

async fn create_test_member(
	state: &AppState,
	company: &Company,
	email: &str,
	full_name: &str,
	role: Role,
	status: MemberStatus,
) -> TestUser {
	let identity = state.identity.clone().unwrap();

	let user = identity
		.create_user(
			email,
			TEST_PASSWORD,
			&UserMetadata::new(full_name),
			&AppMetadata::new(company.id, role).with_status(status),
		)
		.await
		.unwrap();

	// The data store provisions the member profile row from the identity
	// insert, so it is visible as soon as create_user returns.
	let member = state
		.member_repo
		.get_member(&user.id)
		.await
		.unwrap()
		.unwrap();

	let issued = identity
		.create_session(&user.id, state.session_ttl_days)
		.await
		.unwrap();

	TestUser {
		member,
		session_token: issued.token,
	}
}
