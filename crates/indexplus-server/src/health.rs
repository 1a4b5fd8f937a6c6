// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health check types and component checking logic.

use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use utoipa::ToSchema;

/// Health status for components and overall system.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Degraded,
	Unhealthy,
}

/// Database component health.
#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseHealth {
	pub status: HealthStatus,
	pub latency_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// Identity directory component health. Unconfigured is degraded, not
/// unhealthy: the server runs but the session gate fails open.
#[derive(Debug, Serialize, ToSchema)]
pub struct IdentityHealth {
	pub status: HealthStatus,
	pub configured: bool,
}

/// Per-component health breakdown.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthComponents {
	pub database: DatabaseHealth,
	pub identity: IdentityHealth,
}

/// Complete health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub timestamp: String,
	pub duration_ms: u64,
	pub version: String,
	pub components: HealthComponents,
}

const DB_CHECK_TIMEOUT: Duration = Duration::from_millis(500);

/// Check database health with a bounded probe query.
pub async fn check_database(pool: &SqlitePool) -> DatabaseHealth {
	let start = Instant::now();

	let result = timeout(
		DB_CHECK_TIMEOUT,
		sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool),
	)
	.await;
	let latency_ms = start.elapsed().as_millis() as u64;

	match result {
		Ok(Ok(_)) => DatabaseHealth {
			status: HealthStatus::Healthy,
			latency_ms,
			error: None,
		},
		Ok(Err(e)) => DatabaseHealth {
			status: HealthStatus::Unhealthy,
			latency_ms,
			error: Some(e.to_string()),
		},
		Err(_) => DatabaseHealth {
			status: HealthStatus::Unhealthy,
			latency_ms,
			error: Some("database health check timed out".to_string()),
		},
	}
}

/// Check identity directory configuration.
pub fn check_identity(configured: bool) -> IdentityHealth {
	IdentityHealth {
		status: if configured {
			HealthStatus::Healthy
		} else {
			HealthStatus::Degraded
		},
		configured,
	}
}

/// Worst-of aggregation across components.
pub fn aggregate_status(components: &HealthComponents) -> HealthStatus {
	let statuses = [components.database.status, components.identity.status];

	if statuses.contains(&HealthStatus::Unhealthy) {
		HealthStatus::Unhealthy
	} else if statuses.contains(&HealthStatus::Degraded) {
		HealthStatus::Degraded
	} else {
		HealthStatus::Healthy
	}
}
