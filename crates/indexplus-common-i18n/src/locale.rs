// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Supported locale registry.

/// Locale used when neither the member preference nor the server default is valid.
pub const DEFAULT_LOCALE: &str = "en";

/// Locales with a complete message catalog.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "es"];

/// Returns true if the given locale code has a message catalog.
pub fn is_supported(locale: &str) -> bool {
	SUPPORTED_LOCALES.contains(&locale)
}

/// All locale codes a company may choose as its display language.
pub fn available_locales() -> &'static [&'static str] {
	SUPPORTED_LOCALES
}
