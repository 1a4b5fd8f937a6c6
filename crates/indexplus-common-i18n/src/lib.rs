// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Internationalization (i18n) support for Index Plus.
//!
//! This crate provides translation support for server-side strings.
//!
//! # String Naming Convention
//!
//! All translatable strings use a hierarchical dot-notation key format with a
//! `server.` prefix for backend strings (API responses, relay pages).
//!
//! Example: `server.api.forbidden`
//!
//! # Example
//!
//! ```
//! use indexplus_common_i18n::{t, t_fmt, resolve_locale};
//!
//! // Simple translation
//! let message = t("es", "server.api.forbidden");
//!
//! // Translation with variables
//! let message = t_fmt("es", "server.api.invalid_password", &[("min", "8")]);
//!
//! // Resolve a member's effective locale
//! let locale = resolve_locale(Some("es"), "en");
//! ```

mod catalog;
mod locale;
mod resolve;

pub use catalog::{t, t_fmt};
pub use locale::{available_locales, is_supported, DEFAULT_LOCALE, SUPPORTED_LOCALES};
pub use resolve::resolve_locale;
