// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Index Plus dashboard server binary.

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use indexplus_server::{create_app_state, create_router};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// Index Plus server - HTTP server for the customer messaging dashboard.
#[derive(Parser, Debug)]
#[command(
	name = "indexplus-server",
	about = "Index Plus customer messaging dashboard server",
	version
)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/indexplus/server.toml)
	#[arg(long, value_name = "PATH")]
	config: Option<std::path::PathBuf>,

	/// Subcommands for indexplus-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Parse CLI arguments
	let args = Args::parse();

	// Handle subcommands that should not start the server
	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	// Load configuration
	let config = match args.config {
		Some(path) => indexplus_server_config::load_config_with_file(path)?,
		None => indexplus_server_config::load_config()?,
	};

	// Setup tracing
	let registry = tracing_subscriber::registry().with(
		tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| config.logging.level.clone().into()),
	);
	if config.logging.json {
		registry.with(tracing_subscriber::fmt::layer().json()).init();
	} else {
		registry.with(tracing_subscriber::fmt::layer()).init();
	}

	tracing::info!(
			host = %config.http.host,
			port = config.http.port,
			database = %config.database.url,
			"starting indexplus-server"
	);

	// Create database pool and run migrations
	let pool = indexplus_server::db::create_pool(&config.database.url).await?;
	indexplus_server::db::run_migrations(&pool).await?;

	let state = create_app_state(pool, &config);

	// Prune audit entries past the retention window
	if config.audit.enabled {
		let cutoff = Utc::now() - Duration::days(config.audit.retention_days);
		match state.audit_repo.prune_logs_older_than(cutoff).await {
			Ok(pruned) if pruned > 0 => {
				tracing::info!(pruned, retention_days = config.audit.retention_days, "pruned expired audit entries");
			}
			Ok(_) => {}
			Err(e) => {
				tracing::error!(error = %e, "audit retention prune failed");
			}
		}
	}

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	// Start server
	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	// Run server with graceful shutdown
	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
