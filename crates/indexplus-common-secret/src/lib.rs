// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret wrapper type that prevents accidental logging of sensitive values.
//!
//! The [`Secret<T>`] type wraps sensitive values like service keys, passwords,
//! and session tokens, ensuring they:
//!
//! - Never appear in logs (redacted Debug/Display)
//! - Never serialize to plain text (redacted Serialize)
//! - Are zeroized from memory on drop
//! - Require an explicit `.expose()` call to access the inner value
//!
//! # Example
//!
//! ```
//! use indexplus_common_secret::Secret;
//!
//! let service_key = Secret::new("isk_abc123".to_string());
//!
//! // Debug and Display are redacted
//! assert_eq!(format!("{:?}", service_key), "Secret(\"[REDACTED]\")");
//! assert_eq!(format!("{}", service_key), "[REDACTED]");
//!
//! // Must explicitly expose to use the value
//! assert_eq!(service_key.expose(), "isk_abc123");
//! ```

use std::fmt;
use zeroize::Zeroize;

/// The redaction placeholder used in all output.
pub const REDACTED: &str = "[REDACTED]";

/// A wrapper for sensitive values that prevents accidental exposure.
///
/// # Features
///
/// - **Redacted Debug/Display**: Always prints `[REDACTED]` instead of the actual value
/// - **Redacted Serialize**: Serializes as `"[REDACTED]"` to prevent leaking in config dumps
/// - **Zeroize on drop**: Memory is securely zeroed when the value is dropped
/// - **Explicit access**: No `Deref` impl; must call `.expose()` to get the inner value
///
/// With structured logging, `info!(key = %secret, ...)` uses Display and
/// `info!(?secret, ...)` uses Debug. Both print the redaction placeholder,
/// so a `Secret` can never leak through a tracing field.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// Convenience alias for the common case of secret strings.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	/// Create a new secret wrapper around the given value.
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Explicitly access the inner value.
	///
	/// Call sites must opt-in to seeing the secret by calling this method.
	/// This makes secret access visible in code review.
	pub fn expose(&self) -> &T {
		&self.inner
	}

	/// Mutable access to the inner value.
	///
	/// Use with caution; prefer immutable access when possible.
	pub fn expose_mut(&mut self) -> &mut T {
		&mut self.inner
	}

	/// Consume the wrapper and return the inner value.
	///
	/// Use when passing into an API that needs ownership of the secret.
	/// Note: This clones the value rather than moving it to maintain zeroization
	/// guarantees on the original secret memory.
	pub fn into_inner(self) -> T
	where
		T: Clone,
	{
		self.inner.clone()
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

// =============================================================================
// Serde Integration
// =============================================================================
//
// Serialize is intentionally asymmetric: values deserialize from real config
// input but always serialize back out as "[REDACTED]".

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Serialize + Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			let inner = T::deserialize(deserializer)?;
			Ok(Secret::new(inner))
		}
	}
}
