// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core event types for audit logging.
//!
//! This module provides the foundational types for the audit system:
//!
//! - [`AuditEventType`]: Enumeration of all auditable events
//! - [`AuditSeverity`]: RFC 5424-compatible severity levels
//! - [`AuditLogEntry`]: Complete audit record with entity snapshots
//! - [`AuditLogBuilder`]: Fluent API for constructing entries

use chrono::{DateTime, Utc};
use indexplus_server_auth::{CompanyId, UserId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Default retention period for audit logs in days.
pub const DEFAULT_AUDIT_RETENTION_DAYS: i64 = 90;

/// Types of events that can be recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
	// Authentication events
	Signup,
	Login,
	LoginFailed,
	Logout,

	// Access control events
	AccessDenied,

	// Team management events
	MemberCreated,
	MemberUpdated,
	MemberDeleted,
	MemberPasswordReset,

	// CRM events
	CustomerCreated,
	CustomerUpdated,
	CustomerDeleted,

	// Sales events
	SaleCreated,
	SaleUpdated,
	SaleDeleted,
	ConversationConverted,

	// Automation events
	TemplateCreated,
	TemplateUpdated,
	TemplateDeleted,

	// Channel events
	ChannelConnected,
	ChannelRemoved,

	// Company settings and billing events
	SettingsUpdated,
	PaymentSubmitted,
}

impl fmt::Display for AuditEventType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			AuditEventType::Signup => "signup",
			AuditEventType::Login => "login",
			AuditEventType::LoginFailed => "login_failed",
			AuditEventType::Logout => "logout",
			AuditEventType::AccessDenied => "access_denied",
			AuditEventType::MemberCreated => "member_created",
			AuditEventType::MemberUpdated => "member_updated",
			AuditEventType::MemberDeleted => "member_deleted",
			AuditEventType::MemberPasswordReset => "member_password_reset",
			AuditEventType::CustomerCreated => "customer_created",
			AuditEventType::CustomerUpdated => "customer_updated",
			AuditEventType::CustomerDeleted => "customer_deleted",
			AuditEventType::SaleCreated => "sale_created",
			AuditEventType::SaleUpdated => "sale_updated",
			AuditEventType::SaleDeleted => "sale_deleted",
			AuditEventType::ConversationConverted => "conversation_converted",
			AuditEventType::TemplateCreated => "template_created",
			AuditEventType::TemplateUpdated => "template_updated",
			AuditEventType::TemplateDeleted => "template_deleted",
			AuditEventType::ChannelConnected => "channel_connected",
			AuditEventType::ChannelRemoved => "channel_removed",
			AuditEventType::SettingsUpdated => "settings_updated",
			AuditEventType::PaymentSubmitted => "payment_submitted",
		};
		write!(f, "{s}")
	}
}

impl AuditEventType {
	/// Returns the default severity for this event type.
	pub fn default_severity(&self) -> AuditSeverity {
		match self {
			// Info: Normal operations
			AuditEventType::Signup
			| AuditEventType::Login
			| AuditEventType::Logout
			| AuditEventType::MemberCreated
			| AuditEventType::MemberUpdated
			| AuditEventType::CustomerCreated
			| AuditEventType::CustomerUpdated
			| AuditEventType::SaleCreated
			| AuditEventType::SaleUpdated
			| AuditEventType::ConversationConverted
			| AuditEventType::TemplateCreated
			| AuditEventType::TemplateUpdated
			| AuditEventType::ChannelConnected
			| AuditEventType::SettingsUpdated
			| AuditEventType::PaymentSubmitted => AuditSeverity::Info,

			// Warning: Security-relevant failures
			AuditEventType::LoginFailed | AuditEventType::AccessDenied => AuditSeverity::Warning,

			// Notice: Administrative/destructive actions
			AuditEventType::MemberDeleted
			| AuditEventType::MemberPasswordReset
			| AuditEventType::CustomerDeleted
			| AuditEventType::SaleDeleted
			| AuditEventType::TemplateDeleted
			| AuditEventType::ChannelRemoved => AuditSeverity::Notice,
		}
	}
}

/// Severity levels for audit events, compatible with RFC 5424 syslog.
///
/// The numeric values correspond to syslog severity codes, allowing
/// direct mapping when forwarding to syslog-based SIEM systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
	Debug = 7,
	#[default]
	Info = 6,
	Notice = 5,
	Warning = 4,
	Error = 3,
	Critical = 2,
}

impl AuditSeverity {
	/// Returns the RFC 5424 numeric severity code.
	pub fn as_syslog_code(&self) -> u8 {
		*self as u8
	}

	/// Returns all severity levels from most to least severe.
	pub fn all() -> &'static [AuditSeverity] {
		&[
			AuditSeverity::Critical,
			AuditSeverity::Error,
			AuditSeverity::Warning,
			AuditSeverity::Notice,
			AuditSeverity::Info,
			AuditSeverity::Debug,
		]
	}
}

impl PartialOrd for AuditSeverity {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for AuditSeverity {
	fn cmp(&self, other: &Self) -> Ordering {
		// Lower numeric value = higher severity (Critical=2 > Debug=7)
		(*other as u8).cmp(&(*self as u8))
	}
}

impl fmt::Display for AuditSeverity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			AuditSeverity::Debug => "debug",
			AuditSeverity::Info => "info",
			AuditSeverity::Notice => "notice",
			AuditSeverity::Warning => "warning",
			AuditSeverity::Error => "error",
			AuditSeverity::Critical => "critical",
		};
		write!(f, "{s}")
	}
}

/// Error returned when a string does not name a known [`AuditSeverity`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown audit severity: {0:?}")]
pub struct SeverityParseError(pub String);

impl std::str::FromStr for AuditSeverity {
	type Err = SeverityParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"debug" => Ok(AuditSeverity::Debug),
			"info" => Ok(AuditSeverity::Info),
			"notice" => Ok(AuditSeverity::Notice),
			"warning" => Ok(AuditSeverity::Warning),
			"error" => Ok(AuditSeverity::Error),
			"critical" => Ok(AuditSeverity::Critical),
			other => Err(SeverityParseError(other.to_string())),
		}
	}
}

/// An entry in the audit log recording who did what to which entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
	/// Unique identifier for this audit entry.
	pub id: Uuid,
	/// When the event occurred.
	pub timestamp: DateTime<Utc>,
	/// The type of event.
	pub event_type: AuditEventType,
	/// The severity level of this event.
	pub severity: AuditSeverity,

	/// The company this event is scoped to (absent for pre-auth events
	/// such as a failed login against an unknown email).
	pub company_id: Option<CompanyId>,
	/// The member who performed the action (if known).
	pub actor_user_id: Option<UserId>,

	/// The type of entity affected (e.g., "member", "customer", "sale").
	pub entity_type: Option<String>,
	/// The ID of the entity affected.
	pub entity_id: Option<String>,

	/// Human-readable description of the action.
	pub action: String,
	/// Snapshot of the entity before the mutation.
	pub before: Option<serde_json::Value>,
	/// Snapshot of the entity after the mutation.
	pub after: Option<serde_json::Value>,
	/// Additional event-specific details.
	pub details: serde_json::Value,
}

impl AuditLogEntry {
	/// Create a new audit log builder for the given event type.
	pub fn builder(event_type: AuditEventType) -> AuditLogBuilder {
		AuditLogBuilder::new(event_type)
	}
}

/// Builder for constructing audit log entries with a fluent API.
#[derive(Debug, Clone)]
pub struct AuditLogBuilder {
	event_type: AuditEventType,
	severity: Option<AuditSeverity>,
	company_id: Option<CompanyId>,
	actor_user_id: Option<UserId>,
	entity_type: Option<String>,
	entity_id: Option<String>,
	action: Option<String>,
	before: Option<serde_json::Value>,
	after: Option<serde_json::Value>,
	details: serde_json::Value,
}

impl AuditLogBuilder {
	/// Create a new builder for the given event type.
	pub fn new(event_type: AuditEventType) -> Self {
		Self {
			event_type,
			severity: None,
			company_id: None,
			actor_user_id: None,
			entity_type: None,
			entity_id: None,
			action: None,
			before: None,
			after: None,
			details: serde_json::Value::Null,
		}
	}

	/// Set the severity level. Defaults to the event type's default severity.
	pub fn severity(mut self, severity: AuditSeverity) -> Self {
		self.severity = Some(severity);
		self
	}

	/// Set the company scope for this event.
	pub fn company(mut self, company_id: CompanyId) -> Self {
		self.company_id = Some(company_id);
		self
	}

	/// Set the member who performed the action.
	pub fn actor(mut self, user_id: UserId) -> Self {
		self.actor_user_id = Some(user_id);
		self
	}

	/// Set the entity type and ID affected by this event.
	pub fn entity(mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
		self.entity_type = Some(entity_type.into());
		self.entity_id = Some(entity_id.into());
		self
	}

	/// Set the human-readable action description.
	pub fn action(mut self, action: impl Into<String>) -> Self {
		self.action = Some(action.into());
		self
	}

	/// Set the snapshot of the entity before the mutation.
	pub fn before(mut self, snapshot: serde_json::Value) -> Self {
		self.before = Some(snapshot);
		self
	}

	/// Set the snapshot of the entity after the mutation.
	pub fn after(mut self, snapshot: serde_json::Value) -> Self {
		self.after = Some(snapshot);
		self
	}

	/// Set additional event-specific details.
	pub fn details(mut self, details: serde_json::Value) -> Self {
		self.details = details;
		self
	}

	/// Build the audit log entry.
	pub fn build(self) -> AuditLogEntry {
		AuditLogEntry {
			id: Uuid::new_v4(),
			timestamp: Utc::now(),
			event_type: self.event_type,
			severity: self
				.severity
				.unwrap_or_else(|| self.event_type.default_severity()),
			company_id: self.company_id,
			actor_user_id: self.actor_user_id,
			entity_type: self.entity_type,
			entity_id: self.entity_id,
			action: self.action.unwrap_or_else(|| self.event_type.to_string()),
			before: self.before,
			after: self.after,
			details: self.details,
		}
	}
}
