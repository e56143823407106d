// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Free-form metadata attached to processes and nodes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata mapping. Ordered by key so that emission is reproducible.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A metadata value as produced by the front-end parser.
///
/// Only the first four variants are translated into builder calls. Everything
/// else lands in [`MetadataValue::Other`] and is dropped during emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Boolean flag
    Boolean(bool),
    /// Integer that fits in 32 bits
    Integer(i32),
    /// Integer that needs 64 bits
    Long(i64),
    /// Text
    String(String),
    /// Floats, arrays, objects, null
    Other(serde_json::Value),
}

impl MetadataValue {
    /// Whether this value kind is translated by the emitter.
    pub fn is_supported(&self) -> bool {
        !matches!(self, MetadataValue::Other(_))
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Boolean(value)
    }
}

impl From<i32> for MetadataValue {
    fn from(value: i32) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Long(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::String(value)
    }
}
