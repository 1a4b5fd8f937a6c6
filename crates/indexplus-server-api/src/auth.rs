// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::team::MemberResponse;

/// Request to create a company and its owner account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SignupRequest {
	pub company_name: String,
	pub full_name: String,
	pub email: String,
	pub password: String,
}

/// Request to sign in with email and password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginRequest {
	pub email: String,
	pub password: String,
}

/// Response describing the signed-in member after signup or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthSessionResponse {
	pub success: bool,
	pub member: MemberResponse,
}

/// Success response for auth operations without a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthSuccessResponse {
	pub success: bool,
	pub message: String,
}

/// Descriptor for an authentication page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthPageResponse {
	pub success: bool,
	pub page: String,
}

impl AuthPageResponse {
	pub fn new(page: impl Into<String>) -> Self {
		Self {
			success: true,
			page: page.into(),
		}
	}
}
