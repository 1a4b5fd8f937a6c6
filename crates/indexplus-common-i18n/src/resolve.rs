// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale resolution logic.

use crate::locale::{is_supported, DEFAULT_LOCALE};

/// Resolve the effective locale from member preference and server default.
///
/// Resolution order (highest to lowest priority):
/// 1. Member's stored locale preference (if valid)
/// 2. Server default locale (if valid)
/// 3. Fallback to English ("en")
///
/// # Arguments
///
/// * `member_locale` - Member's preferred locale from the profile row (may be None or invalid)
/// * `server_default` - Server's default locale from configuration
///
/// # Returns
///
/// A valid locale code that is guaranteed to be supported.
///
/// # Example
///
/// ```
/// use indexplus_common_i18n::resolve_locale;
///
/// // Member preference takes priority
/// assert_eq!(resolve_locale(Some("es"), "en"), "es");
///
/// // Falls back to server default if the member has no preference
/// assert_eq!(resolve_locale(None, "es"), "es");
///
/// // Falls back to English if both are invalid
/// assert_eq!(resolve_locale(Some("invalid"), "also_invalid"), "en");
/// ```
pub fn resolve_locale(member_locale: Option<&str>, server_default: &str) -> &'static str {
	if let Some(locale) = member_locale {
		if is_supported(locale) {
			return locale_to_static(locale);
		}
	}

	if is_supported(server_default) {
		return locale_to_static(server_default);
	}

	DEFAULT_LOCALE
}

fn locale_to_static(locale: &str) -> &'static str {
	match locale {
		"en" => "en",
		"es" => "es",
		_ => DEFAULT_LOCALE,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_member_preference_takes_priority() {
		assert_eq!(resolve_locale(Some("es"), "en"), "es");
		assert_eq!(resolve_locale(Some("en"), "es"), "en");
	}

	#[test]
	fn test_server_default_when_no_member_preference() {
		assert_eq!(resolve_locale(None, "es"), "es");
		assert_eq!(resolve_locale(None, "en"), "en");
	}

	#[test]
	fn test_fallback_to_english_when_member_invalid() {
		assert_eq!(resolve_locale(Some("invalid"), "en"), "en");
		assert_eq!(resolve_locale(Some("fr"), "es"), "es");
	}

	#[test]
	fn test_fallback_to_english_when_both_invalid() {
		assert_eq!(resolve_locale(Some("invalid"), "also_invalid"), "en");
		assert_eq!(resolve_locale(None, "invalid"), "en");
	}

	#[test]
	fn test_empty_string_is_invalid() {
		assert_eq!(resolve_locale(Some(""), "en"), "en");
		assert_eq!(resolve_locale(None, ""), "en");
	}
}
