// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session gate middleware for the page routers.
//!
//! A thin adapter over [`indexplus_server_auth::gate::evaluate`]: the pure
//! decision function owns all routing rules, this layer only feeds it the
//! resolved principal and turns `Redirect` decisions into 307 responses.
//! It must run after [`crate::auth_middleware::auth_layer`] so the auth
//! context extension is populated.

use axum::{
	body::Body,
	extract::State,
	http::Request,
	middleware::Next,
	response::{IntoResponse, Redirect, Response},
};
use indexplus_server_auth::gate::{evaluate, GateDecision};
use indexplus_server_auth::middleware::AuthContext;
use tracing::instrument;

use crate::api::AppState;

/// Applies the session gate to a page request.
#[instrument(name = "session_gate", skip(state, request, next), fields(path = %request.uri().path()))]
pub async fn session_gate_layer(
	State(state): State<AppState>,
	request: Request<Body>,
	next: Next,
) -> Response {
	let auth_ctx = request
		.extensions()
		.get::<AuthContext>()
		.cloned()
		.unwrap_or_else(AuthContext::unauthenticated);
	let principal = auth_ctx.member().map(|current| current.principal());

	let path = request.uri().path().to_string();
	match evaluate(state.identity.is_some(), principal.as_ref(), &path) {
		GateDecision::Proceed => next.run(request).await,
		GateDecision::Redirect(target) => {
			tracing::debug!(target = %target, "session gate redirect");
			Redirect::temporary(target).into_response()
		}
	}
}
