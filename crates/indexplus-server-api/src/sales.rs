// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use indexplus_server_db::Sale;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A recorded sale in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SaleResponse {
	pub id: String,
	pub customer_id: Option<String>,
	pub conversation_id: Option<String>,
	pub description: String,
	pub amount_cents: i64,
	pub created_by: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Response for listing sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListSalesResponse {
	pub success: bool,
	pub sales: Vec<SaleResponse>,
}

/// Request to record a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateSaleRequest {
	pub description: String,
	pub amount_cents: i64,
	pub customer_id: Option<String>,
}

/// Request to update a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateSaleRequest {
	pub description: Option<String>,
	pub amount_cents: Option<i64>,
	pub customer_id: Option<String>,
}

/// Response carrying a single sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SaleEnvelopeResponse {
	pub success: bool,
	pub sale: SaleResponse,
}

/// Success response for sale operations without a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SaleSuccessResponse {
	pub success: bool,
	pub message: String,
}

impl SaleResponse {
	pub fn from_sale(sale: Sale) -> Self {
		Self {
			id: sale.id.to_string(),
			customer_id: sale.customer_id.map(|id| id.to_string()),
			conversation_id: sale.conversation_id.map(|id| id.to_string()),
			description: sale.description,
			amount_cents: sale.amount_cents,
			created_by: sale.created_by.map(|id| id.to_string()),
			created_at: sale.created_at,
			updated_at: sale.updated_at,
		}
	}
}

impl SaleEnvelopeResponse {
	pub fn new(sale: Sale) -> Self {
		Self {
			success: true,
			sale: SaleResponse::from_sale(sale),
		}
	}
}
