// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Internationalization configuration section.
//!
//! Only the server-wide default locale lives here. Per-member locale
//! preferences are stored on the member profile and take precedence at
//! request time; an unknown value falls back to `en` at resolution time
//! rather than failing configuration.

use serde::{Deserialize, Serialize};

fn default_locale() -> String {
	"en".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct I18nConfigLayer {
	pub default_locale: Option<String>,
}

impl I18nConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.default_locale.is_some() {
			self.default_locale = other.default_locale;
		}
	}

	pub fn finalize(self) -> I18nConfig {
		I18nConfig {
			default_locale: self.default_locale.unwrap_or_else(default_locale),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct I18nConfig {
	pub default_locale: String,
}

impl Default for I18nConfig {
	fn default() -> Self {
		Self {
			default_locale: default_locale(),
		}
	}
}
