// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment variable helpers for loading secrets.
//!
//! Supports the `*_FILE` convention used by Docker secrets and Kubernetes,
//! where the variable points at a file containing the secret instead of
//! holding the value itself.

use std::path::PathBuf;
use std::{env, fs};

use indexplus_common_secret::Secret;
use thiserror::Error;

/// Errors that can occur when loading secrets from environment variables.
#[derive(Debug, Error)]
pub enum SecretEnvError {
	/// Failed to read the secret file.
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The secret file path was empty.
	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret from the environment using the `VAR` / `VAR_FILE` convention.
///
/// # Precedence
///
/// 1. If `{var}_FILE` is set, read the secret from that file path
/// 2. Otherwise, if `{var}` is set, use its value directly
/// 3. Otherwise, return `Ok(None)`
///
/// When reading from a file, a single trailing newline is stripped (most
/// editors and secret mounts add one); all other content is preserved as-is.
pub fn load_secret_env(var: &str) -> Result<Option<Secret<String>>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(Secret::new(secret)));
	}

	if let Ok(value) = env::var(var) {
		return Ok(Some(Secret::new(value)));
	}

	Ok(None)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	/// Verifies that load_secret_env returns None when neither VAR nor VAR_FILE
	/// is set. This is important for optional configuration values.
	#[test]
	fn returns_none_when_not_set() {
		let unique_var = "INDEXPLUS_TEST_NONEXISTENT_VAR_90210";
		env::remove_var(unique_var);
		env::remove_var(format!("{unique_var}_FILE"));

		let result = load_secret_env(unique_var).unwrap();
		assert!(result.is_none());
	}

	/// Verifies that load_secret_env reads from VAR when set directly.
	#[test]
	fn reads_from_direct_env_var() {
		let unique_var = "INDEXPLUS_TEST_DIRECT_VAR_90210";
		env::set_var(unique_var, "direct-secret-value");
		env::remove_var(format!("{unique_var}_FILE"));

		let result = load_secret_env(unique_var).unwrap();
		assert!(result.is_some());
		assert_eq!(result.unwrap().expose(), "direct-secret-value");

		env::remove_var(unique_var);
	}

	/// Verifies that load_secret_env reads from a file when VAR_FILE is set.
	/// This supports Docker/Kubernetes secrets.
	#[test]
	fn reads_from_file_when_file_var_set() {
		let unique_var = "INDEXPLUS_TEST_FILE_VAR_90210";
		let mut temp_file = NamedTempFile::new().unwrap();
		writeln!(temp_file, "file-secret-value").unwrap();

		env::set_var(
			format!("{unique_var}_FILE"),
			temp_file.path().to_str().unwrap(),
		);
		env::remove_var(unique_var);

		let result = load_secret_env(unique_var).unwrap();
		assert!(result.is_some());
		assert_eq!(result.unwrap().expose(), "file-secret-value");

		env::remove_var(format!("{unique_var}_FILE"));
	}

	/// Verifies that VAR_FILE takes precedence over VAR.
	#[test]
	fn file_var_takes_precedence() {
		let unique_var = "INDEXPLUS_TEST_PRECEDENCE_VAR_90210";
		let mut temp_file = NamedTempFile::new().unwrap();
		writeln!(temp_file, "file-secret").unwrap();

		env::set_var(unique_var, "direct-secret");
		env::set_var(
			format!("{unique_var}_FILE"),
			temp_file.path().to_str().unwrap(),
		);

		let result = load_secret_env(unique_var).unwrap();
		assert!(result.is_some());
		assert_eq!(result.unwrap().expose(), "file-secret");

		env::remove_var(unique_var);
		env::remove_var(format!("{unique_var}_FILE"));
	}

	/// Verifies that trailing newlines are stripped from file content.
	/// Most text editors and secret mounts add a trailing newline.
	#[test]
	fn strips_single_trailing_newline() {
		let unique_var = "INDEXPLUS_TEST_NEWLINE_VAR_90210";
		let mut temp_file = NamedTempFile::new().unwrap();
		writeln!(temp_file, "secret-with-newline").unwrap();

		env::set_var(
			format!("{unique_var}_FILE"),
			temp_file.path().to_str().unwrap(),
		);

		let result = load_secret_env(unique_var).unwrap();
		assert_eq!(result.unwrap().expose(), "secret-with-newline");

		env::remove_var(format!("{unique_var}_FILE"));
	}

	/// Verifies that content without trailing newline is preserved.
	#[test]
	fn preserves_content_without_trailing_newline() {
		let unique_var = "INDEXPLUS_TEST_NO_NEWLINE_VAR_90210";
		let mut temp_file = NamedTempFile::new().unwrap();
		write!(temp_file, "secret-no-newline").unwrap();

		env::set_var(
			format!("{unique_var}_FILE"),
			temp_file.path().to_str().unwrap(),
		);

		let result = load_secret_env(unique_var).unwrap();
		assert_eq!(result.unwrap().expose(), "secret-no-newline");

		env::remove_var(format!("{unique_var}_FILE"));
	}

	/// Verifies that an error is returned when the secret file doesn't exist.
	#[test]
	fn returns_error_for_missing_file() {
		let unique_var = "INDEXPLUS_TEST_MISSING_FILE_VAR_90210";
		env::set_var(format!("{unique_var}_FILE"), "/nonexistent/path/to/secret");

		let result = load_secret_env(unique_var);
		assert!(result.is_err());
		assert!(matches!(result.unwrap_err(), SecretEnvError::Io { .. }));

		env::remove_var(format!("{unique_var}_FILE"));
	}

	/// Verifies that an error is returned when VAR_FILE is set to empty string.
	/// This catches configuration mistakes.
	#[test]
	fn returns_error_for_empty_file_path() {
		let unique_var = "INDEXPLUS_TEST_EMPTY_PATH_VAR_90210";
		env::set_var(format!("{unique_var}_FILE"), "");

		let result = load_secret_env(unique_var);
		assert!(result.is_err());
		assert!(matches!(
			result.unwrap_err(),
			SecretEnvError::EmptyPath { .. }
		));

		env::remove_var(format!("{unique_var}_FILE"));
	}
}
