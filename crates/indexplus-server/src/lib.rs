// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Index Plus dashboard server.
//!
//! This crate provides the HTTP server for the Index Plus customer
//! messaging and sales dashboard: session-gated dashboard pages, the
//! JSON API, and the role-and-capability authorization model behind
//! both.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod db;
pub mod gate_middleware;
pub mod health;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use api_response::{ApiError, FailureResponse};
pub use indexplus_server_config::ServerConfig;
