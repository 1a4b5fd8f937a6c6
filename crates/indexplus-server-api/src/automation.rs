// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use indexplus_server_db::FlowTemplate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// An automation flow template in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TemplateResponse {
	pub id: String,
	pub name: String,
	/// The flow document: triggers, steps, and reply bodies.
	pub definition: serde_json::Value,
	pub enabled: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Response for listing flow templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListTemplatesResponse {
	pub success: bool,
	pub templates: Vec<TemplateResponse>,
}

/// Request to create a flow template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateTemplateRequest {
	pub name: String,
	pub definition: serde_json::Value,
	#[serde(default = "default_enabled")]
	pub enabled: bool,
}

fn default_enabled() -> bool {
	true
}

/// Request to update a flow template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateTemplateRequest {
	pub name: Option<String>,
	pub definition: Option<serde_json::Value>,
	pub enabled: Option<bool>,
}

/// Response carrying a single flow template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TemplateEnvelopeResponse {
	pub success: bool,
	pub template: TemplateResponse,
}

/// Success response for template operations without a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TemplateSuccessResponse {
	pub success: bool,
	pub message: String,
}

impl TemplateResponse {
	pub fn from_template(template: FlowTemplate) -> Self {
		Self {
			id: template.id.to_string(),
			name: template.name,
			definition: template.definition,
			enabled: template.enabled,
			created_at: template.created_at,
			updated_at: template.updated_at,
		}
	}
}

impl TemplateEnvelopeResponse {
	pub fn new(template: FlowTemplate) -> Self {
		Self {
			success: true,
			template: TemplateResponse::from_template(template),
		}
	}
}
