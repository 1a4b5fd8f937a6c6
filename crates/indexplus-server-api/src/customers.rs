// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use indexplus_server_db::Customer;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A CRM customer in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CustomerResponse {
	pub id: String,
	pub name: String,
	pub phone: Option<String>,
	pub email: Option<String>,
	pub notes: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Response for listing customers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListCustomersResponse {
	pub success: bool,
	pub customers: Vec<CustomerResponse>,
}

/// Request to create a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateCustomerRequest {
	pub name: String,
	pub phone: Option<String>,
	pub email: Option<String>,
	pub notes: Option<String>,
}

/// Request to update a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateCustomerRequest {
	pub name: Option<String>,
	pub phone: Option<String>,
	pub email: Option<String>,
	pub notes: Option<String>,
}

/// Response carrying a single customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CustomerEnvelopeResponse {
	pub success: bool,
	pub customer: CustomerResponse,
}

/// Success response for customer operations without a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CustomerSuccessResponse {
	pub success: bool,
	pub message: String,
}

impl CustomerResponse {
	pub fn from_customer(customer: Customer) -> Self {
		Self {
			id: customer.id.to_string(),
			name: customer.name,
			phone: customer.phone,
			email: customer.email,
			notes: customer.notes,
			created_at: customer.created_at,
			updated_at: customer.updated_at,
		}
	}
}

impl CustomerEnvelopeResponse {
	pub fn new(customer: Customer) -> Self {
		Self {
			success: true,
			customer: CustomerResponse::from_customer(customer),
		}
	}
}
