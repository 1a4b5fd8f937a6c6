// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod error;
pub mod event;
pub mod filter;
pub mod pipeline;
pub mod sink;

pub use error::{AuditError, AuditResult, AuditSinkError};
pub use event::{
	AuditEventType, AuditLogBuilder, AuditLogEntry, AuditSeverity, SeverityParseError,
	DEFAULT_AUDIT_RETENTION_DAYS,
};
pub use filter::AuditFilterConfig;
pub use pipeline::AuditService;
pub use sink::AuditSink;

#[cfg(feature = "sink-sqlite")]
pub use sink::sqlite::SqliteAuditSink;

#[cfg(feature = "sink-tracing")]
pub use sink::tracing::TracingAuditSink;
