// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use indexplus_server_db::AnalyticsSummary;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Company-scoped analytics counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AnalyticsSummaryData {
	pub customers: i64,
	pub open_conversations: i64,
	pub sales_count: i64,
	pub revenue_cents: i64,
	pub messages_last_7_days: i64,
}

/// Response for the analytics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AnalyticsSummaryResponse {
	pub success: bool,
	pub summary: AnalyticsSummaryData,
}

impl AnalyticsSummaryData {
	pub fn from_summary(summary: AnalyticsSummary) -> Self {
		Self {
			customers: summary.customers,
			open_conversations: summary.open_conversations,
			sales_count: summary.sales_count,
			revenue_cents: summary.revenue_cents,
			messages_last_7_days: summary.messages_last_7_days,
		}
	}
}

impl AnalyticsSummaryResponse {
	pub fn new(summary: AnalyticsSummary) -> Self {
		Self {
			success: true,
			summary: AnalyticsSummaryData::from_summary(summary),
		}
	}
}
