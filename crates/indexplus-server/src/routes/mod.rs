// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP route handlers.

pub mod analytics;
pub mod audit;
pub mod auth;
pub mod automation;
pub mod billing;
pub mod channels;
pub mod customers;
pub mod dashboard;
pub mod docs;
pub mod health;
pub mod inbox;
pub mod sales;
pub mod settings;
pub mod team;
