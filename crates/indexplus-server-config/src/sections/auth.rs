// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication configuration.

use indexplus_common_secret::SecretString;
use serde::Deserialize;

/// Authentication configuration (runtime, fully resolved).
///
/// `identity_service_key` authenticates the server to the identity
/// directory. When it is absent the server runs without an identity
/// handle and the session gate fails open.
#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub identity_service_key: Option<SecretString>,
	pub session_cookie_name: String,
	pub session_ttl_days: i64,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			identity_service_key: None,
			session_cookie_name: "indexplus_session".to_string(),
			session_ttl_days: 30,
		}
	}
}

/// Authentication configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub identity_service_key: Option<SecretString>,
	#[serde(default)]
	pub session_cookie_name: Option<String>,
	#[serde(default)]
	pub session_ttl_days: Option<i64>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.identity_service_key.is_some() {
			self.identity_service_key = other.identity_service_key;
		}
		if other.session_cookie_name.is_some() {
			self.session_cookie_name = other.session_cookie_name;
		}
		if other.session_ttl_days.is_some() {
			self.session_ttl_days = other.session_ttl_days;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			identity_service_key: self.identity_service_key,
			session_cookie_name: self
				.session_cookie_name
				.unwrap_or_else(|| "indexplus_session".to_string()),
			session_ttl_days: self.session_ttl_days.unwrap_or(30),
		}
	}
}

/// Check whether a string has the identity service key shape:
/// `isk_` followed by exactly 64 hex characters (either case).
pub fn is_valid_service_key(key: &str) -> bool {
	match key.strip_prefix("isk_") {
		Some(rest) => rest.len() == 64 && rest.bytes().all(|b| b.is_ascii_hexdigit()),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_defaults() {
		let config = AuthConfigLayer::default().finalize();
		assert!(config.identity_service_key.is_none());
		assert_eq!(config.session_cookie_name, "indexplus_session");
		assert_eq!(config.session_ttl_days, 30);
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = AuthConfigLayer {
			session_cookie_name: Some("custom_session".to_string()),
			session_ttl_days: Some(7),
			..Default::default()
		};
		let overlay = AuthConfigLayer {
			session_ttl_days: Some(14),
			..Default::default()
		};
		base.merge(overlay);
		assert_eq!(base.session_cookie_name, Some("custom_session".to_string()));
		assert_eq!(base.session_ttl_days, Some(14));
	}

	#[test]
	fn test_valid_service_key() {
		let key = format!("isk_{}", "a1b2c3d4".repeat(8));
		assert!(is_valid_service_key(&key));
	}

	#[test]
	fn test_service_key_wrong_prefix() {
		let key = format!("sk_{}", "a1b2c3d4".repeat(8));
		assert!(!is_valid_service_key(&key));
	}

	#[test]
	fn test_service_key_wrong_length() {
		assert!(!is_valid_service_key("isk_abc123"));
	}

	#[test]
	fn test_service_key_non_hex() {
		let key = format!("isk_{}", "z1b2c3d4".repeat(8));
		assert!(!is_valid_service_key(&key));
	}

	proptest! {
		/// Any `isk_` prefix followed by 64 hex characters must validate.
		#[test]
		fn prop_well_formed_keys_validate(key in "isk_[0-9a-fA-F]{64}") {
			prop_assert!(is_valid_service_key(&key));
		}

		/// Strings without the `isk_` prefix must never validate,
		/// regardless of what follows.
		#[test]
		fn prop_unprefixed_keys_never_validate(key in "[0-9a-f]{0,80}") {
			prop_assert!(!is_valid_service_key(&key));
		}
	}
}
