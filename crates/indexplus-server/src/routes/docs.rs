// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI document endpoint.

use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

#[utoipa::path(
    get,
    path = "/api/docs/openapi.json",
    responses(
        (status = 200, description = "OpenAPI 3 document for the full API surface")
    ),
    tag = "docs"
)]
/// GET /api/docs/openapi.json - Machine-readable API description.
pub async fn openapi_document() -> impl IntoResponse {
	Json(crate::api_docs::ApiDoc::openapi())
}
