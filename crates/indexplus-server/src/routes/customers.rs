// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Customer directory HTTP handlers.
//!
//! Reads are open to any authenticated member of the company; writes
//! require the `manage_customers` capability. Every row is scoped to the
//! caller's company, so a well-formed ID belonging to another company
//! reads as not-found.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use chrono::Utc;
use indexplus_common_i18n::t;
use indexplus_server_audit::{AuditEventType, AuditLogBuilder};
use indexplus_server_auth::{can, Capability, CustomerId};
use indexplus_server_db::Customer;

pub use indexplus_server_api::customers::*;

use crate::{
	api::AppState,
	api_response::{parse_uuid, ApiError},
	auth_middleware::{member_locale, RequireAuth},
};

#[utoipa::path(
    get,
    path = "/api/customers",
    responses(
        (status = 200, description = "Company customers", body = ListCustomersResponse),
        (status = 401, description = "Not authenticated", body = crate::api_response::FailureResponse)
    ),
    tag = "customers"
)]
/// GET /api/customers - List the caller's company customers.
#[tracing::instrument(skip(current, state))]
pub async fn list_customers(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<ListCustomersResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	let customers = state
		.customer_repo
		.list_customers(&current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	Ok(Json(ListCustomersResponse {
		success: true,
		customers: customers
			.into_iter()
			.map(CustomerResponse::from_customer)
			.collect(),
	}))
}

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerEnvelopeResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_customers", body = crate::api_response::FailureResponse)
    ),
    tag = "customers"
)]
/// POST /api/customers - Create a customer record.
#[tracing::instrument(skip(current, state, payload))]
pub async fn create_customer(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageCustomers) {
		return Err(ApiError::denied(locale));
	}

	let name = payload.name.trim();
	if name.is_empty() {
		return Err(ApiError::invalid_input(locale, "server.api.invalid_name"));
	}

	let mut customer = Customer::new(current.member.company_id, name);
	customer.phone = payload.phone;
	customer.email = payload.email;
	customer.notes = payload.notes;

	state
		.customer_repo
		.create_customer(&customer)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::CustomerCreated)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("customer", customer.id.to_string())
			.after(serde_json::json!({ "name": customer.name }))
			.build(),
	);

	tracing::info!(
		customer_id = %customer.id,
		company_id = %current.member.company_id,
		"customer created"
	);

	Ok((
		StatusCode::CREATED,
		Json(CustomerEnvelopeResponse::new(customer)),
	))
}

#[utoipa::path(
    patch,
    path = "/api/customers/{id}",
    params(
        ("id" = String, Path, description = "Customer ID")
    ),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerEnvelopeResponse),
        (status = 400, description = "Invalid payload", body = crate::api_response::FailureResponse),
        (status = 403, description = "Missing manage_customers", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such customer in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "customers"
)]
/// PATCH /api/customers/{id} - Update a customer record.
#[tracing::instrument(skip(current, state, payload), fields(%id))]
pub async fn update_customer(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerEnvelopeResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageCustomers) {
		return Err(ApiError::denied(locale));
	}

	let customer_id = CustomerId::new(parse_uuid(&id, locale)?);

	let mut customer = match state
		.customer_repo
		.get_customer(&customer_id, &current.member.company_id)
		.await
	{
		Ok(Some(customer)) => customer,
		Ok(None) => return Err(ApiError::not_found(locale, "server.api.customer_not_found")),
		Err(err) => return Err(ApiError::storage(err, locale)),
	};

	if payload.name.is_none()
		&& payload.phone.is_none()
		&& payload.email.is_none()
		&& payload.notes.is_none()
	{
		return Err(ApiError::invalid_input(locale, "server.api.empty_update"));
	}

	if let Some(name) = &payload.name {
		let name = name.trim();
		if name.is_empty() {
			return Err(ApiError::invalid_input(locale, "server.api.invalid_name"));
		}
		customer.name = name.to_string();
	}
	if let Some(phone) = payload.phone {
		customer.phone = Some(phone);
	}
	if let Some(email) = payload.email {
		customer.email = Some(email);
	}
	if let Some(notes) = payload.notes {
		customer.notes = Some(notes);
	}
	customer.updated_at = Utc::now();

	state
		.customer_repo
		.update_customer(&customer)
		.await
		.map_err(|err| ApiError::from_db(err, locale, "server.api.customer_not_found"))?;

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::CustomerUpdated)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("customer", customer.id.to_string())
			.after(serde_json::json!({ "name": customer.name }))
			.build(),
	);

	tracing::info!(
		customer_id = %customer.id,
		company_id = %current.member.company_id,
		"customer updated"
	);

	Ok(Json(CustomerEnvelopeResponse::new(customer)))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(
        ("id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer deleted", body = CustomerSuccessResponse),
        (status = 403, description = "Missing manage_customers", body = crate::api_response::FailureResponse),
        (status = 404, description = "No such customer in the caller's company", body = crate::api_response::FailureResponse)
    ),
    tag = "customers"
)]
/// DELETE /api/customers/{id} - Delete a customer record.
#[tracing::instrument(skip(current, state), fields(%id))]
pub async fn delete_customer(
	RequireAuth(current): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<CustomerSuccessResponse>, ApiError> {
	let locale = member_locale(&current, &state);

	if !can(Some(&current.principal()), Capability::ManageCustomers) {
		return Err(ApiError::denied(locale));
	}

	let customer_id = CustomerId::new(parse_uuid(&id, locale)?);

	let deleted = state
		.customer_repo
		.delete_customer(&customer_id, &current.member.company_id)
		.await
		.map_err(|err| ApiError::storage(err, locale))?;
	if !deleted {
		return Err(ApiError::not_found(locale, "server.api.customer_not_found"));
	}

	state.audit_service.log(
		AuditLogBuilder::new(AuditEventType::CustomerDeleted)
			.company(current.member.company_id)
			.actor(current.member.user_id)
			.entity("customer", customer_id.to_string())
			.build(),
	);

	tracing::info!(
		customer_id = %customer_id,
		company_id = %current.member.company_id,
		"customer deleted"
	);

	Ok(Json(CustomerSuccessResponse {
		success: true,
		message: t(locale, "server.api.customer_deleted"),
	}))
}
