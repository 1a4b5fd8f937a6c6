// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use indexplus_server_db::PaymentSubmission;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::team::MemberStatusApi;

/// A reported payment in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PaymentResponse {
	pub id: String,
	pub submitted_by: Option<String>,
	pub amount_cents: i64,
	pub reference: String,
	pub note: Option<String>,
	pub created_at: DateTime<Utc>,
}

/// Response for the billing overview: submitted payments plus the
/// caller's account status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BillingOverviewResponse {
	pub success: bool,
	pub payments: Vec<PaymentResponse>,
	pub status: MemberStatusApi,
}

/// Request to report a subscription payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SubmitPaymentRequest {
	pub amount_cents: i64,
	pub reference: String,
	pub note: Option<String>,
}

/// Response carrying a single payment submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PaymentEnvelopeResponse {
	pub success: bool,
	pub payment: PaymentResponse,
}

impl PaymentResponse {
	pub fn from_payment(payment: PaymentSubmission) -> Self {
		Self {
			id: payment.id.to_string(),
			submitted_by: payment.submitted_by.map(|id| id.to_string()),
			amount_cents: payment.amount_cents,
			reference: payment.reference,
			note: payment.note,
			created_at: payment.created_at,
		}
	}
}

impl PaymentEnvelopeResponse {
	pub fn new(payment: PaymentSubmission) -> Self {
		Self {
			success: true,
			payment: PaymentResponse::from_payment(payment),
		}
	}
}
