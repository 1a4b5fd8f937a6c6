// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for indexplus-server.

pub mod audit;
pub mod auth;
pub mod database;
pub mod http;
pub mod i18n;
pub mod logging;

pub use audit::{AuditConfig, AuditConfigLayer};
pub use auth::{is_valid_service_key, AuthConfig, AuthConfigLayer};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use i18n::{I18nConfig, I18nConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
