// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Company workspace types and slug handling.
//!
//! A company is the tenancy boundary: every member, customer, conversation,
//! sale, and audit entry is scoped to exactly one company. Companies are
//! created during signup and the signing-up user becomes their owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CompanyId;

/// Maximum accepted company name length, in characters.
pub const MAX_COMPANY_NAME_LEN: usize = 120;

/// Maximum generated slug length, in characters.
pub const MAX_SLUG_LEN: usize = 60;

/// A company workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
	/// Unique identifier for this company.
	pub id: CompanyId,

	/// Display name shown in the dashboard.
	pub name: String,

	/// URL-safe identifier derived from the name.
	pub slug: String,

	/// IANA timezone used for analytics bucketing.
	pub timezone: String,

	/// Default locale for members without a preference.
	pub default_locale: String,

	/// When the company was created.
	pub created_at: DateTime<Utc>,

	/// When the company was last updated.
	pub updated_at: DateTime<Utc>,
}

impl Company {
	/// Creates a company with a freshly generated ID and a slug derived
	/// from the name. Timezone and locale start at server defaults.
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		let now = Utc::now();

		Self {
			id: CompanyId::generate(),
			slug: slugify(&name),
			name,
			timezone: "UTC".to_string(),
			default_locale: "en".to_string(),
			created_at: now,
			updated_at: now,
		}
	}
}

/// Validates a company name.
/// Rules:
/// - Non-empty after trimming
/// - At most 120 characters
pub fn validate_company_name(name: &str) -> Result<(), &'static str> {
	if name.trim().is_empty() {
		return Err("Company name must not be empty");
	}
	if name.chars().count() > MAX_COMPANY_NAME_LEN {
		return Err("Company name must be at most 120 characters");
	}
	Ok(())
}

/// Generates a URL-safe slug from a company name.
/// Sanitizes to lowercase alphanumeric, collapses everything else to
/// single hyphens, and truncates to [`MAX_SLUG_LEN`].
pub fn slugify(name: &str) -> String {
	let sanitized: String = name
		.chars()
		.map(|c| {
			if c.is_ascii_alphanumeric() {
				c.to_ascii_lowercase()
			} else {
				'-'
			}
		})
		.collect();

	let collapsed: String = sanitized
		.split('-')
		.filter(|s| !s.is_empty())
		.collect::<Vec<_>>()
		.join("-");

	let truncated = if collapsed.len() > MAX_SLUG_LEN {
		collapsed[..MAX_SLUG_LEN].trim_end_matches('-').to_string()
	} else {
		collapsed
	};

	if truncated.is_empty() {
		"company".to_string()
	} else {
		truncated
	}
}
