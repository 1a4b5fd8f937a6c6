// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # indexplus-server-db
//!
//! Centralized persistence layer for the Index Plus server using SQLite via sqlx.
//!
//! ## Repository Pattern
//!
//! Each domain has two components:
//! - **`*Store` trait**: Defines the interface (e.g., `MemberStore`, `CustomerStore`)
//! - **`*Repository` struct**: Concrete implementation holding a `SqlitePool`
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait FooStore: Send + Sync {
//!     async fn get_foo(&self, id: &FooId) -> Result<Option<Foo>, DbError>;
//!     async fn create_foo(&self, foo: &Foo) -> Result<(), DbError>;
//! }
//!
//! pub struct FooRepository {
//!     pool: SqlitePool,
//! }
//!
//! impl FooRepository {
//!     pub fn new(pool: SqlitePool) -> Self { Self { pool } }
//! }
//!
//! #[async_trait]
//! impl FooStore for FooRepository { /* delegate to inherent methods */ }
//! ```
//!
//! ## Tenancy
//!
//! Every read and write except principal resolution takes the caller's
//! `CompanyId` and scopes the SQL to it. A valid ID from another company
//! behaves exactly like a missing row (`None`, `NotFound`, or `false`),
//! so handlers cannot tell the difference and neither can callers.
//!
//! ## Error Handling
//!
//! Use [`DbError`] variants appropriately:
//!
//! | Variant | When to use |
//! |---------|-------------|
//! | `NotFound` | Resource must exist but doesn't (update/delete by ID, foreign key lookup) |
//! | `Conflict` | Unique constraint violation, concurrent modification, business rule conflict |
//! | `Sqlx` | Let sqlx errors propagate via `?` for unexpected database errors |
//! | `Internal` | Data corruption, invalid stored data (e.g., unparseable UUID) |
//!
//! **`Option<T>` vs `NotFound`:**
//! - Return `Result<Option<T>>` for lookups where absence is normal (get by ID, get by email)
//! - Return `DbError::NotFound` only when the caller provided an ID that should exist
//!
//! ## Return Type Conventions
//!
//! | Operation | Return type |
//! |-----------|-------------|
//! | Get by ID/unique key | `Result<Option<T>>` |
//! | List/search | `Result<Vec<T>>` or `Result<(Vec<T>, i64)>` for paginated |
//! | Create | `Result<()>` or `Result<Id>` if ID is generated |
//! | Update | `Result<()>` |
//! | Delete | `Result<bool>` (true if deleted) or `Result<()>` |
//! | Exists/count | `Result<bool>` or `Result<i64>` |
//!
//! ## Method Naming
//!
//! - `get_*_by_*` - Single item lookup (returns `Option<T>`)
//! - `list_*` - Multiple items, possibly filtered
//! - `create_*` - Insert new record
//! - `update_*` - Modify existing record
//! - `delete_*` - Remove
//! - `count_*` / `sum_*` - Aggregates
//!
//! ## Testing
//!
//! Tests use in-memory SQLite with schemas created by the helpers in
//! [`testing`]:
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_example() {
//!     let pool = create_test_pool().await;
//!     create_members_table(&pool).await;
//!     let repo = MemberRepository::new(pool);
//!     // test operations...
//! }
//! ```
//!
//! ## Adding a New Repository
//!
//! 1. Create `src/foo.rs` with module doc explaining the domain
//! 2. Define `FooStore` trait with all async methods
//! 3. Define `FooRepository` struct with `pool: SqlitePool`
//! 4. Implement inherent methods on `FooRepository` with `#[tracing::instrument]`
//! 5. Implement `FooStore for FooRepository` by delegating to inherent methods
//! 6. Add `pub mod foo;` and re-exports to this file
//! 7. Add migration to `indexplus-server/migrations/NNN_foo.sql`
//! 8. Add a `create_foo_table` helper to `src/testing.rs`
//!
//! ## Instrumentation
//!
//! Use `#[tracing::instrument]` on all public methods:
//!
//! ```rust,ignore
//! #[tracing::instrument(skip(self, member), fields(user_id = %member.user_id))]
//! pub async fn create_member(&self, member: &Member) -> Result<(), DbError> { ... }
//! ```
//!
//! Skip `self` and large/sensitive arguments; include identifying fields.

pub mod analytics;
pub mod audit;
pub mod automation;
pub mod billing;
pub mod channel;
pub mod company;
pub mod conversation;
pub mod customer;
mod error;
pub mod member;
pub mod pool;
pub mod sale;

#[cfg(test)]
pub mod testing;

pub use analytics::{AnalyticsRepository, AnalyticsStore, AnalyticsSummary};
pub use audit::{AuditRepository, AuditStore};
pub use automation::{FlowTemplate, TemplateRepository, TemplateStore};
pub use billing::{BillingRepository, BillingStore, PaymentSubmission};
pub use channel::{Channel, ChannelKind, ChannelRepository, ChannelStore};
pub use company::{CompanyRepository, CompanyStore};
pub use conversation::{
	Conversation, ConversationRepository, ConversationStatus, ConversationStore, Message,
	MessageDirection,
};
pub use customer::{Customer, CustomerRepository, CustomerStore};
pub use error::{DbError, Result};
pub use member::{MemberRepository, MemberStore};
pub use pool::create_pool;
pub use sale::{Sale, SaleRepository, SaleStore};
