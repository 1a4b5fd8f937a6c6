// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Billing HTTP handlers.
//!
//! The overview stays readable for every authenticated member, including
//! suspended accounts, so a confined workspace can still see what it owes.
//! Reporting a payment requires `manage_billing`, which only owners hold
//! by default.

use axum::{
	extract::State,
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use indexplus_server_audit::{AuditEventType, AuditLogBuilder};
use indexplus_server_auth::{can, Capability};
use indexplus_server_db::PaymentSubmission;

pub use indexplus_server_api::billing::*;

use crate::{
	api::AppState,
	api_response::ApiError,
	auth_middleware::{member_locale, RequireAuth},
};

#[utoipa::path(
    get,
    path = "/api/billing",
    responses(
        (status = 200, description = "Submitted payments and the caller's account status", body = BillingOverviewResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "billing"
)]
/// GET /api/billing - Billing overview for the caller's company.
#[tracing::instrument(skip(current, state))]
pub async fn billing_overview(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<BillingOverviewResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let payments = state
		.billing_repo
		.list_payments(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(BillingOverviewResponse {
		success: true,
		payments: payments
			.into_iter()
			.map(PaymentResponse::from_payment)
			.collect(),
		status: current.member.status.into(),
	}))
}

#[utoipa::path(
    post,
    path = "/api/billing/payments",
    request_body = SubmitPaymentRequest,
    responses(
        (status = 201, description = "Payment reported", body = PaymentEnvelopeResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_billing", body = crate::api_response::FailureResponse)
    ),
    tag = "billing"
)]
/// POST /api/billing/payments - Report a subscription payment.
#[tracing::instrument(skip(current, state, payload))]
pub async fn submit_payment(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<SubmitPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageBilling) {
		return Err(ApiError::denied(locale));
	}

	if payload.amount_cents <= 0 {
		return Err(ApiError::invalid_input(locale, "server.api.invalid_amount"));
	}
	let reference = payload.reference.trim();
	if reference.is_empty() {
		return Err(ApiError::invalid_input(
			locale,
			"server.api.invalid_reference",
		));
	}

	let mut payment =
		PaymentSubmission::new(current.member.company_id, payload.amount_cents, reference);
	payment.submitted_by = Some(current.member.user_id);
	payment.note = payload.note;

	state
		.billing_repo
		.create_payment(&payment)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::PaymentSubmitted)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("payment", payment.id.to_string())
			.details(serde_json::json!({
				"amount_cents": payment.amount_cents,
				"reference": payment.reference,
			}))
			.build(),
	);

	tracing::info!(
		payment_id = %payment.id,
		company_id = %current.member.company_id,
		amount_cents = payment.amount_cents,
		"payment reported"
	);

	Ok((
		StatusCode::CREATED,
		Json(PaymentEnvelopeResponse::new(payment)),
	))
}
