// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sales ledger HTTP handlers.
//!
//! Reads are open to any authenticated member; writes require the
//! `manage_sales` capability. Amounts are integer cents and must be
//! positive.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use chrono::Utc;
use indexplus_common_i18n::t;
use indexplus_server_audit::{AuditEventType, AuditLogBuilder};
use indexplus_server_auth::{can, Capability, CustomerId, SaleId};
use indexplus_server_db::Sale;

pub use indexplus_server_api::sales::*;

use crate::{
	api::AppState,
	api_response::{parse_uuid, ApiError},
	auth_middleware::{member_locale, RequireAuth},
};

/// Parses an optional customer reference and checks it belongs to the
/// caller's company.
async fn resolve_customer_ref(
	state: &AppState,
	company_id: &indexplus_server_auth::CompanyId,
	raw: &str,
	locale: &str,
) -> Result<CustomerId, ApiError> {
	let customer_id = CustomerId::new(parse_uuid(raw, locale)?);
	match state.customer_repo.get_customer(&customer_id, company_id).await {
		Ok(Some(_)) => Ok(customer_id),
		Ok(None) => Err(ApiError::not_found(locale, "server.api.customer_not_found")),
		Err(err) => Err(ApiError::storage(err, locale)),
	}
}

#[utoipa::path(
    get,
    path = "/api/sales",
    responses(
        (status = 200, description = "Company sales", body = ListSalesResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "sales"
)]
/// GET /api/sales - List the caller's company sales.
#[tracing::instrument(skip(current, state))]
pub async fn list_sales(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<ListSalesResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let sales = state
		.sale_repo
		.list_sales(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(ListSalesResponse {
		success: true,
		sales: sales.into_iter().map(SaleResponse::from_sale).collect(),
	}))
}

#[utoipa::path(
    post,
    path = "/api/sales",
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale recorded", body = SaleEnvelopeResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_sales", body = crate::api_response::FailureResponse)
    ),
    tag = "sales"
)]
/// POST /api/sales - Record a sale.
#[tracing::instrument(skip(current, state, payload))]
pub async fn create_sale(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateSaleRequest>,
) -> Result<impl IntoResponse, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageSales) {
		return Err(ApiError::denied(locale));
	}

	let description = payload.description.trim();
	if description.is_empty() {
		return Err(ApiError::invalid_input(
			locale,
			"server.api.invalid_description",
		));
	}
	if payload.amount_cents <= 0 {
		return Err(ApiError::invalid_input(locale, "server.api.invalid_amount"));
	}

	let customer_id = match &payload.customer_id {
		Some(raw) => Some(
			resolve_customer_ref(&state, &current.member.company_id, raw, locale).await?,
		),
		None => None,
	};

	let mut sale = Sale::new(current.member.company_id, description, payload.amount_cents);
	sale.customer_id = customer_id;
	sale.created_by = Some(current.member.user_id);

	state
		.sale_repo
		.create_sale(&sale)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::SaleCreated)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("sale", sale.id.to_string())
			.after(serde_json::json!({
				"description": sale.description,
				"amount_cents": sale.amount_cents,
			}))
			.build(),
	);

	tracing::info!(
		sale_id = %sale.id,
		company_id = %current.member.company_id,
		amount_cents = sale.amount_cents,
		"sale recorded"
	);

	Ok((StatusCode::CREATED, Json(SaleEnvelopeResponse::new(sale))))
}

#[utoipa::path(
    patch,
    path = "/api/sales/{id}",
    params(
        ("id" = String, Path, description = "Sale ID")
    ),
    request_body = UpdateSaleRequest,
    responses(
        (status = 200, description = "Sale updated", body = SaleEnvelopeResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_sales", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such sale in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "sales"
)]
/// PATCH /api/sales/{id} - Update a sale.
#[tracing::instrument(skip(current, state, payload), fields(%id))]
pub async fn update_sale(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateSaleRequest>,
) -> Result<Json<SaleEnvelopeResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageSales) {
		return Err(ApiError::denied(locale));
	}

	let sale_id = SaleId::new(parse_uuid(&id, locale)?);

	let mut sale = match state
		.sale_repo
		.get_sale(&sale_id, &current.member.company_id)
		.await
	{
		Ok(Some(sale)) => sale,
		Ok(None) => return Err(ApiError::not_found(locale, "server.api.sale_not_found")),
		Err(err) => return Err(ApiError::storage(err, locale)),
	};

	if payload.description.is_none()
		&& payload.amount_cents.is_none()
		&& payload.customer_id.is_none()
	{
		return Err(ApiError::invalid_input(locale, "server.api.empty_update"));
	}

	let before = serde_json::json!({
		"description": sale.description,
		"amount_cents": sale.amount_cents,
	});

	if let Some(description) = &payload.description {
		let description = description.trim();
		if description.is_empty() {
			return Err(ApiError::invalid_input(
				locale,
				"server.api.invalid_description",
			));
		}
		sale.description = description.to_string();
	}
	if let Some(amount_cents) = payload.amount_cents {
		if amount_cents <= 0 {
			return Err(ApiError::invalid_input(locale, "server.api.invalid_amount"));
		}
		sale.amount_cents = amount_cents;
	}
	if let Some(raw) = &payload.customer_id {
		sale.customer_id = Some(
			resolve_customer_ref(&state, &current.member.company_id, raw, locale).await?,
		);
	}
	sale.updated_at = Utc::now();

	state
		.sale_repo
		.update_sale(&sale)
		.await
		.map_err(|err| ApiError::from_db(err, locale, "server.api.sale_not_found"))?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::SaleUpdated)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("sale", sale.id.to_string())
			.before(before)
			.after(serde_json::json!({
				"description": sale.description,
				"amount_cents": sale.amount_cents,
			}))
			.build(),
	);

	tracing::info!(
		sale_id = %sale.id,
		company_id = %current.member.company_id,
		"sale updated"
	);

	Ok(Json(SaleEnvelopeResponse::new(sale)))
}

#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    params(
        ("id" = String, Path, description = "Sale ID")
    ),
    responses(
        (status = 200, description = "Sale deleted", body = SaleSuccessResponse),
        (status = 403, description = "Missing manage_sales", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such sale in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "sales"
)]
/// DELETE /api/sales/{id} - Delete a sale.
#[tracing::instrument(skip(current, state), fields(%id))]
pub async fn delete_sale(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<SaleSuccessResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageSales) {
		return Err(ApiError::denied(locale));
	}

	let sale_id = SaleId::new(parse_uuid(&id, locale)?);

	let deleted = state
		.sale_repo
		.delete_sale(&sale_id, &current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;
	if !deleted {
		return Err(ApiError::not_found(locale, "server.api.sale_not_found"));
	}

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::SaleDeleted)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("sale", sale_id.to_string())
			.build(),
	);

	tracing::info!(
		sale_id = %sale_id,
		company_id = %current.member.company_id,
		"sale deleted"
	);

	Ok(Json(SaleSuccessResponse {
		success: true,
		message: t(locale, "server.api.sale_deleted"),
	}))
}
