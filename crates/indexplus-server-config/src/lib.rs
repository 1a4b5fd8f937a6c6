// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the Index Plus server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`INDEXPLUS_SERVER_*`)
//! - Secret loading with the `VAR` / `VAR_FILE` convention
//!
//! # Usage
//!
//! ```ignore
//! use indexplus_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod env;
pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use env::{load_secret_env, SecretEnvError};
pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info, warn};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub i18n: I18nConfig,
	pub logging: LoggingConfig,
	pub audit: AuditConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`INDEXPLUS_SERVER_*`)
/// 2. Config file (`/etc/indexplus/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	let mut sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	];

	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	let mut sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	];

	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let mut auth = layer.auth.unwrap_or_default().finalize();
	let i18n = layer.i18n.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let audit = layer.audit.unwrap_or_default().finalize();

	// A malformed key is treated like a missing one: the server still
	// starts, the identity handle stays absent, the session gate fails
	// open. Startup must not hard-fail on this field.
	if let Some(key) = &auth.identity_service_key {
		if !is_valid_service_key(key.expose()) {
			warn!(
				"identity service key does not match the expected isk_ format; \
				 identity directory disabled, session gate will fail open"
			);
			auth.identity_service_key = None;
		}
	}

	validate_config(&auth, &audit)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		identity_configured = auth.identity_service_key.is_some(),
		default_locale = %i18n.default_locale,
		audit_enabled = audit.enabled,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		auth,
		i18n,
		logging,
		audit,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(auth: &AuthConfig, audit: &AuditConfig) -> Result<(), ConfigError> {
	if auth.session_ttl_days <= 0 {
		return Err(ConfigError::Validation(format!(
			"auth.session_ttl_days must be positive, got {}",
			auth.session_ttl_days
		)));
	}

	// The audit pipeline allocates a bounded channel with this capacity.
	if audit.queue_capacity == 0 {
		return Err(ConfigError::Validation(
			"audit.queue_capacity must be at least 1".to_string(),
		));
	}

	Ok(())
}
