// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for identity directory operations.

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
	#[error("email already registered")]
	DuplicateEmail,

	#[error("user not found: {0}")]
	UserNotFound(String),

	#[error("invalid credentials")]
	InvalidCredentials,

	#[error("metadata serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("invalid data in identity store: {0}")]
	Internal(String),

	#[error("identity database error: {0}")]
	Sqlx(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, IdentityError>;
