// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dashboard page HTTP handlers.
//!
//! Pages are JSON descriptors: the data the page renders plus the
//! caller's capability grants, so the UI can hide actions without owning
//! authorization policy. Navigation-level confinement (anonymous
//! visitors, suspended accounts, agent-restricted pages) is the session
//! gate's job; the analytics and audit pages additionally re-check their
//! capability because their data is more sensitive than their navigation.

use axum::{
	extract::State,
	response::Redirect,
	Json,
};
use indexplus_server_auth::{can, Capability};

pub use indexplus_server_api::dashboard::*;

use indexplus_server_api::{
	analytics::AnalyticsSummaryData,
	audit::AuditLogEntryResponse,
	automation::TemplateResponse,
	billing::PaymentResponse,
	channels::ChannelResponse,
	customers::CustomerResponse,
	inbox::ConversationResponse,
	sales::SaleResponse,
	settings::CompanyResponse,
	team::MemberResponse,
};

use crate::{
	api::AppState,
	api_response::ApiError,
	auth_middleware::{member_locale, RequireAuth},
};

/// GET / - Send visitors to the dashboard; the gate takes it from there.
pub async fn root_redirect() -> Redirect {
	Redirect::temporary("/dashboard")
}

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Overview page descriptor", body = OverviewPageResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "dashboard"
)]
/// GET /dashboard - Workspace overview.
#[tracing::instrument(skip(current, state))]
pub async fn overview_page(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<OverviewPageResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let company = match state
		.company_repo
		.get_company(&current.member.company_id)
		.await
	{
		Ok(Some(company)) => company,
		Ok(None) => return Err(ApiError::not_found(locale, "server.api.company_not_found")),
		Err(err) => return Err(ApiError::storage(err, locale)),
	};

	let grants = grants_for(&current.principal());

	Ok(Json(OverviewPageResponse {
		success: true,
		member: MemberResponse::from_member(current.member),
		company: CompanyResponse::from_company(company),
		grants,
	}))
}

#[utoipa::path(
    get,
    path = "/dashboard/inbox",
    responses(
        (status = 200, description = "Inbox page descriptor", body = InboxPageResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "dashboard"
)]
/// GET /dashboard/inbox - Shared inbox.
#[tracing::instrument(skip(current, state))]
pub async fn inbox_page(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<InboxPageResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let conversations = state
		.conversation_repo
		.list_conversations(&current.member.company_id, None)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(InboxPageResponse {
		success: true,
		conversations: conversations
			.into_iter()
			.map(ConversationResponse::from_conversation)
			.collect(),
		grants: grants_for(&current.principal()),
	}))
}

#[utoipa::path(
    get,
    path = "/dashboard/crm",
    responses(
        (status = 200, description = "CRM page descriptor", body = CrmPageResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "dashboard"
)]
/// GET /dashboard/crm - Customer directory.
#[tracing::instrument(skip(current, state))]
pub async fn crm_page(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<CrmPageResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let customers = state
		.customer_repo
		.list_customers(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(CrmPageResponse {
		success: true,
		customers: customers
			.into_iter()
			.map(CustomerResponse::from_customer)
			.collect(),
		grants: grants_for(&current.principal()),
	}))
}

#[utoipa::path(
    get,
    path = "/dashboard/sales",
    responses(
        (status = 200, description = "Sales page descriptor", body = SalesPageResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "dashboard"
)]
/// GET /dashboard/sales - Sales ledger.
#[tracing::instrument(skip(current, state))]
pub async fn sales_page(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<SalesPageResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let sales = state
		.sale_repo
		.list_sales(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(SalesPageResponse {
		success: true,
		sales: sales.into_iter().map(SaleResponse::from_sale).collect(),
		grants: grants_for(&current.principal()),
	}))
}

#[utoipa::path(
    get,
    path = "/dashboard/analytics",
    responses(
        (status = 200, description = "Analytics page descriptor", body = AnalyticsPageResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing view_analytics", body = crate::api_response::FailureResponse)
    ),
    tag = "dashboard"
)]
/// GET /dashboard/analytics - Analytics summary.
#[tracing::instrument(skip(current, state))]
pub async fn analytics_page(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<AnalyticsPageResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ViewAnalytics) {
		return Err(ApiError::denied(locale));
	}

	let summary = state
		.analytics_repo
		.summary(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(AnalyticsPageResponse {
		success: true,
		summary: AnalyticsSummaryData::from_summary(summary),
		grants: grants_for(&current.principal()),
	}))
}

#[utoipa::path(
    get,
    path = "/dashboard/automation",
    responses(
        (status = 200, description = "Automation page descriptor", body = AutomationPageResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "dashboard"
)]
/// GET /dashboard/automation - Flow templates.
#[tracing::instrument(skip(current, state))]
pub async fn automation_page(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<AutomationPageResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let templates = state
		.template_repo
		.list_templates(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(AutomationPageResponse {
		success: true,
		templates: templates
			.into_iter()
			.map(TemplateResponse::from_template)
			.collect(),
		grants: grants_for(&current.principal()),
	}))
}

#[utoipa::path(
    get,
    path = "/dashboard/billing",
    responses(
        (status = 200, description = "Billing page descriptor", body = BillingPageResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "dashboard"
)]
/// GET /dashboard/billing - Payments and subscription status.
///
/// Suspended accounts land here; the page keeps working for them.
#[tracing::instrument(skip(current, state))]
pub async fn billing_page(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<BillingPageResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let payments = state
		.billing_repo
		.list_payments(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(BillingPageResponse {
		success: true,
		payments: payments
			.into_iter()
			.map(PaymentResponse::from_payment)
			.collect(),
		status: current.member.status.into(),
		grants: grants_for(&current.principal()),
	}))
}

#[utoipa::path(
    get,
    path = "/dashboard/settings",
    responses(
        (status = 200, description = "Settings page descriptor", body = SettingsPageResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "dashboard"
)]
/// GET /dashboard/settings - Workspace settings.
#[tracing::instrument(skip(current, state))]
pub async fn settings_page(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<SettingsPageResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let company = match state
		.company_repo
		.get_company(&current.member.company_id)
		.await
	{
		Ok(Some(company)) => company,
		Ok(None) => return Err(ApiError::not_found(locale, "server.api.company_not_found")),
		Err(err) => return Err(ApiError::storage(err, locale)),
	};

	Ok(Json(SettingsPageResponse {
		success: true,
		company: CompanyResponse::from_company(company),
		grants: grants_for(&current.principal()),
	}))
}

#[utoipa::path(
    get,
    path = "/dashboard/settings/team",
    responses(
        (status = 200, description = "Team page descriptor", body = TeamPageResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "dashboard"
)]
/// GET /dashboard/settings/team - Team roster.
#[tracing::instrument(skip(current, state))]
pub async fn team_page(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<TeamPageResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let members = state
		.member_repo
		.list_members(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(TeamPageResponse {
		success: true,
		members: members.into_iter().map(MemberResponse::from_member).collect(),
		grants: grants_for(&current.principal()),
	}))
}

#[utoipa::path(
    get,
    path = "/dashboard/settings/channels",
    responses(
        (status = 200, description = "Channels page descriptor", body = ChannelsPageResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "dashboard"
)]
/// GET /dashboard/settings/channels - Connected channels.
#[tracing::instrument(skip(current, state))]
pub async fn channels_page(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<ChannelsPageResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let channels = state
		.channel_repo
		.list_channels(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(ChannelsPageResponse {
		success: true,
		channels: channels
			.into_iter()
			.map(ChannelResponse::from_channel)
			.collect(),
		grants: grants_for(&current.principal()),
	}))
}

#[utoipa::path(
    get,
    path = "/dashboard/settings/audit",
    responses(
        (status = 200, description = "Audit page descriptor", body = AuditPageResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing view_audit_logs", body = crate::api_response::FailureResponse)
    ),
    tag = "dashboard"
)]
/// GET /dashboard/settings/audit - Recent audit trail.
#[tracing::instrument(skip(current, state))]
pub async fn audit_page(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<AuditPageResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ViewAuditLogs) {
		return Err(ApiError::denied(locale));
	}

	let (entries, total) = state
		.audit_repo
		.query_logs(
			&current.member.company_id,
			None,
			None,
			None,
			None,
			None,
			None,
			Some(50),
			Some(0),
		)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(AuditPageResponse {
		success: true,
		logs: entries
			.into_iter()
			.map(AuditLogEntryResponse::from_entry)
			.collect(),
		total,
		grants: grants_for(&current.principal()),
	}))
}
