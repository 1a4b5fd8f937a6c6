// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and HTTP router assembly.

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use sqlx::SqlitePool;

use indexplus_server_audit::{
	AuditFilterConfig, AuditService, AuditSeverity, AuditSink, SqliteAuditSink, TracingAuditSink,
};
use indexplus_server_config::ServerConfig;
use indexplus_server_db::{
	AnalyticsRepository, AuditRepository, BillingRepository, ChannelRepository, CompanyRepository,
	ConversationRepository, CustomerRepository, MemberRepository, SaleRepository,
	TemplateRepository,
};
use indexplus_server_identity::{IdentityDirectory, SqliteIdentityDirectory};

use crate::auth_middleware::auth_layer;
use crate::gate_middleware::session_gate_layer;
use crate::routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub company_repo: Arc<CompanyRepository>,
	pub member_repo: Arc<MemberRepository>,
	pub customer_repo: Arc<CustomerRepository>,
	pub sale_repo: Arc<SaleRepository>,
	pub conversation_repo: Arc<ConversationRepository>,
	pub template_repo: Arc<TemplateRepository>,
	pub channel_repo: Arc<ChannelRepository>,
	pub billing_repo: Arc<BillingRepository>,
	pub analytics_repo: Arc<AnalyticsRepository>,
	pub audit_repo: Arc<AuditRepository>,
	/// Handle to the identity directory. `None` when no identity service
	/// key is configured; the session gate then fails open and sign-in
	/// is disabled.
	pub identity: Option<Arc<dyn IdentityDirectory>>,
	pub audit_service: Arc<AuditService>,
	pub session_cookie_name: String,
	pub session_ttl_days: i64,
	pub default_locale: String,
}

/// Creates the application state from a connected pool and resolved config.
///
/// Must be called from within a Tokio runtime: the audit pipeline spawns
/// its background writer task here.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let identity: Option<Arc<dyn IdentityDirectory>> = match config.auth.identity_service_key {
		Some(_) => Some(Arc::new(SqliteIdentityDirectory::new(pool.clone()))),
		None => {
			tracing::warn!(
				"identity service key not configured; session gate fails open and sign-in is disabled"
			);
			None
		}
	};

	let min_severity = config
		.audit
		.min_severity
		.parse::<AuditSeverity>()
		.unwrap_or_else(|_| {
			tracing::warn!(
				min_severity = %config.audit.min_severity,
				"unrecognized audit.min_severity, falling back to info"
			);
			AuditSeverity::Info
		});
	let filter = AuditFilterConfig {
		min_severity,
		..AuditFilterConfig::default()
	};
	let sinks: Vec<Arc<dyn AuditSink>> = if config.audit.enabled {
		vec![
			Arc::new(SqliteAuditSink::new(pool.clone(), filter.clone())),
			Arc::new(TracingAuditSink::new(filter.clone())),
		]
	} else {
		Vec::new()
	};
	let audit_service = Arc::new(AuditService::new(
		filter,
		config.audit.queue_capacity,
		sinks,
	));

	AppState {
		company_repo: Arc::new(CompanyRepository::new(pool.clone())),
		member_repo: Arc::new(MemberRepository::new(pool.clone())),
		customer_repo: Arc::new(CustomerRepository::new(pool.clone())),
		sale_repo: Arc::new(SaleRepository::new(pool.clone())),
		conversation_repo: Arc::new(ConversationRepository::new(pool.clone())),
		template_repo: Arc::new(TemplateRepository::new(pool.clone())),
		channel_repo: Arc::new(ChannelRepository::new(pool.clone())),
		billing_repo: Arc::new(BillingRepository::new(pool.clone())),
		analytics_repo: Arc::new(AnalyticsRepository::new(pool.clone())),
		audit_repo: Arc::new(AuditRepository::new(pool.clone())),
		identity,
		audit_service,
		session_cookie_name: config.auth.session_cookie_name.clone(),
		session_ttl_days: config.auth.session_ttl_days,
		default_locale: config.i18n.default_locale.clone(),
		pool,
	}
}

/// Builds the full application router.
///
/// Page routes pass through the session gate, which needs the auth
/// context resolved first, so the auth layer wraps both route groups
/// while the gate wraps only the pages. The health check, the root
/// redirect and the OpenAPI document bypass both.
pub fn create_router(state: AppState) -> Router {
	// Browser-facing pages. The session gate redirects rather than
	// rejecting, so anonymous visitors land on the login page.
	let pages = Router::new()
		// Auth pages. POST targets live on the same paths as the forms.
		.route(
			"/auth/login",
			get(routes::auth::login_page).post(routes::auth::login),
		)
		.route(
			"/auth/signup",
			get(routes::auth::signup_page).post(routes::auth::signup),
		)
		.route(
			"/auth/external-callback",
			get(routes::auth::external_callback),
		)
		// Dashboard pages
		.route("/dashboard", get(routes::dashboard::overview_page))
		.route("/dashboard/inbox", get(routes::dashboard::inbox_page))
		.route("/dashboard/crm", get(routes::dashboard::crm_page))
		.route("/dashboard/sales", get(routes::dashboard::sales_page))
		.route(
			"/dashboard/analytics",
			get(routes::dashboard::analytics_page),
		)
		.route(
			"/dashboard/automation",
			get(routes::dashboard::automation_page),
		)
		.route("/dashboard/billing", get(routes::dashboard::billing_page))
		.route("/dashboard/settings", get(routes::dashboard::settings_page))
		.route(
			"/dashboard/settings/team",
			get(routes::dashboard::team_page),
		)
		.route(
			"/dashboard/settings/channels",
			get(routes::dashboard::channels_page),
		)
		.route(
			"/dashboard/settings/audit",
			get(routes::dashboard::audit_page),
		)
		.layer(from_fn_with_state(state.clone(), session_gate_layer));

	// JSON API. Handlers enforce authentication themselves via
	// `RequireAuth` so failures come back as envelopes, not redirects.
	let api = Router::new()
		.route("/api/auth/logout", post(routes::auth::logout))
		// Team management
		.route(
			"/api/team/members",
			get(routes::team::list_members).post(routes::team::create_member),
		)
		.route(
			"/api/team/members/{id}",
			patch(routes::team::update_member).delete(routes::team::delete_member),
		)
		.route(
			"/api/team/members/{id}/password",
			post(routes::team::update_member_password),
		)
		// Customers
		.route(
			"/api/customers",
			get(routes::customers::list_customers).post(routes::customers::create_customer),
		)
		.route(
			"/api/customers/{id}",
			patch(routes::customers::update_customer)
				.delete(routes::customers::delete_customer),
		)
		// Sales
		.route(
			"/api/sales",
			get(routes::sales::list_sales).post(routes::sales::create_sale),
		)
		.route(
			"/api/sales/{id}",
			patch(routes::sales::update_sale).delete(routes::sales::delete_sale),
		)
		// Conversations and messages
		.route(
			"/api/conversations",
			get(routes::inbox::list_conversations).post(routes::inbox::create_conversation),
		)
		.route(
			"/api/conversations/{id}",
			patch(routes::inbox::update_conversation),
		)
		.route(
			"/api/conversations/{id}/messages",
			get(routes::inbox::list_messages).post(routes::inbox::send_message),
		)
		.route(
			"/api/conversations/{id}/convert",
			post(routes::inbox::convert_conversation),
		)
		// Automation templates
		.route(
			"/api/automation/templates",
			get(routes::automation::list_templates).post(routes::automation::create_template),
		)
		.route(
			"/api/automation/templates/{id}",
			patch(routes::automation::update_template)
				.delete(routes::automation::delete_template),
		)
		// Channels
		.route(
			"/api/channels",
			get(routes::channels::list_channels).post(routes::channels::create_channel),
		)
		.route(
			"/api/channels/{id}",
			delete(routes::channels::delete_channel),
		)
		// Workspace settings
		.route(
			"/api/settings",
			get(routes::settings::get_settings).patch(routes::settings::update_settings),
		)
		// Billing
		.route("/api/billing", get(routes::billing::billing_overview))
		.route(
			"/api/billing/payments",
			post(routes::billing::submit_payment),
		)
		// Analytics
		.route(
			"/api/analytics/summary",
			get(routes::analytics::analytics_summary),
		)
		// Audit log
		.route("/api/audit/logs", get(routes::audit::list_audit_logs));

	Router::new()
		.merge(pages)
		.merge(api)
		.layer(from_fn_with_state(state.clone(), auth_layer))
		// Routes below skip session resolution entirely
		.route("/", get(routes::dashboard::root_redirect))
		.route("/health", get(routes::health::health_check))
		.route(
			"/api/docs/openapi.json",
			get(routes::docs::openapi_document),
		)
		.with_state(state)
}
