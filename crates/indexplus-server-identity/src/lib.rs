// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity directory for Index Plus accounts and sessions.
//!
//! Accounts carry two metadata partitions with different trust levels:
//! [`UserMetadata`] holds user-editable profile data and never gates access,
//! while [`AppMetadata`] is written only by the server and carries the
//! authorization facts (company, role, status). Handlers re-read the
//! server-controlled partition through this crate on every request rather
//! than trusting anything cached on the client.
//!
//! [`IdentityDirectory`] is the seam the HTTP layer depends on, so tests can
//! swap the backend and the server can boot without one when identity
//! credentials are not configured. [`SqliteIdentityDirectory`] is the
//! production backend.

pub mod directory;
pub mod error;
pub mod metadata;
pub mod sqlite;

pub use directory::{IdentityDirectory, IssuedSession, ValidatedSession};
pub use error::{IdentityError, Result};
pub use metadata::{AppMetadata, IdentityUser, UserMetadata};
pub use sqlite::SqliteIdentityDirectory;
