// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Code generation modules for process compilation.
//!
//! This module contains AST-based code generation logic for translating
//! process models into builder-call Rust code using quote.

pub mod ast;
