// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

pub mod support;

mod gate;
mod inbox;
mod lifecycle;
mod team;
