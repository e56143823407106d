// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Action node emitter.
//!
//! The script body is embedded as a string literal; it is executed by the
//! runtime's script engine for the given dialect, never by the generated code.

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use flowcanon_model::ActionNode;

/// Emit `var.action(dialect, script)`.
pub fn emit(node: &ActionNode, var: &Ident) -> TokenStream {
    let dialect = &node.dialect;
    let script = &node.script;
    quote! { #var.action(#dialect, #script); }
}
