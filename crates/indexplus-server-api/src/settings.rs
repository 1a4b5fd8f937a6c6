// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use indexplus_server_auth::Company;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A company workspace in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CompanyResponse {
	pub id: String,
	pub name: String,
	pub slug: String,
	pub timezone: String,
	pub default_locale: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Request to update company settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateSettingsRequest {
	pub name: Option<String>,
	pub timezone: Option<String>,
	pub default_locale: Option<String>,
}

/// Response carrying the company settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SettingsEnvelopeResponse {
	pub success: bool,
	pub company: CompanyResponse,
}

impl CompanyResponse {
	pub fn from_company(company: Company) -> Self {
		Self {
			id: company.id.to_string(),
			name: company.name,
			slug: company.slug,
			timezone: company.timezone,
			default_locale: company.default_locale,
			created_at: company.created_at,
			updated_at: company.updated_at,
		}
	}
}

impl SettingsEnvelopeResponse {
	pub fn new(company: Company) -> Self {
		Self {
			success: true,
			company: CompanyResponse::from_company(company),
		}
	}
}
