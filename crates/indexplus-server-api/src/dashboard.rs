// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Page payloads for the protected dashboard surfaces.
//!
//! Every `/dashboard/**` page returns the data it renders plus a
//! `grants` map (capability name to allow/deny) so the UI can hide
//! actions without owning authorization policy.

use std::collections::BTreeMap;

use indexplus_server_auth::{capability_grants, Principal};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::analytics::AnalyticsSummaryData;
use crate::audit::AuditLogEntryResponse;
use crate::automation::TemplateResponse;
use crate::billing::PaymentResponse;
use crate::channels::ChannelResponse;
use crate::customers::CustomerResponse;
use crate::inbox::ConversationResponse;
use crate::sales::SaleResponse;
use crate::settings::CompanyResponse;
use crate::team::{MemberResponse, MemberStatusApi};

/// Capability grants map for page payloads, keyed by capability name.
pub type GrantsMap = BTreeMap<String, bool>;

/// Resolves the caller's capability grants into the wire shape.
pub fn grants_for(principal: &Principal) -> GrantsMap {
	capability_grants(principal)
		.into_iter()
		.map(|(cap, allowed)| (cap.to_string(), allowed))
		.collect()
}

/// Payload for the dashboard overview page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct OverviewPageResponse {
	pub success: bool,
	pub member: MemberResponse,
	pub company: CompanyResponse,
	pub grants: GrantsMap,
}

/// Payload for the shared inbox page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct InboxPageResponse {
	pub success: bool,
	pub conversations: Vec<ConversationResponse>,
	pub grants: GrantsMap,
}

/// Payload for the CRM page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CrmPageResponse {
	pub success: bool,
	pub customers: Vec<CustomerResponse>,
	pub grants: GrantsMap,
}

/// Payload for the sales page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SalesPageResponse {
	pub success: bool,
	pub sales: Vec<SaleResponse>,
	pub grants: GrantsMap,
}

/// Payload for the analytics page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AnalyticsPageResponse {
	pub success: bool,
	pub summary: AnalyticsSummaryData,
	pub grants: GrantsMap,
}

/// Payload for the automation page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AutomationPageResponse {
	pub success: bool,
	pub templates: Vec<TemplateResponse>,
	pub grants: GrantsMap,
}

/// Payload for the billing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BillingPageResponse {
	pub success: bool,
	pub payments: Vec<PaymentResponse>,
	pub status: MemberStatusApi,
	pub grants: GrantsMap,
}

/// Payload for the company settings page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SettingsPageResponse {
	pub success: bool,
	pub company: CompanyResponse,
	pub grants: GrantsMap,
}

/// Payload for the team settings page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TeamPageResponse {
	pub success: bool,
	pub members: Vec<MemberResponse>,
	pub grants: GrantsMap,
}

/// Payload for the channel settings page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ChannelsPageResponse {
	pub success: bool,
	pub channels: Vec<ChannelResponse>,
	pub grants: GrantsMap,
}

/// Payload for the audit log page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuditPageResponse {
	pub success: bool,
	pub logs: Vec<AuditLogEntryResponse>,
	pub total: i64,
	pub grants: GrantsMap,
}
