// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Build environment descriptor.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Well-known capability names.
pub mod capability {
    /// REST endpoint support
    pub const REST: &str = "rest";
    /// JSON (de)serialization for REST endpoints
    pub const REST_JSON: &str = "rest-json";
    /// Prefix shared by all planning-engine capabilities
    pub const PLANNER_PREFIX: &str = "planner";
    /// Cloud-event messaging support
    pub const MESSAGING: &str = "messaging";
}

/// Capabilities and switches of the environment the generated code targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDescriptor {
    /// Capability names present in the environment
    #[serde(default)]
    pub capabilities: BTreeSet<String>,

    /// Optional addon switches
    #[serde(default)]
    pub addons: AddonsConfig,

    /// Explicit REST generation switch: unset, forced on, or forced off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_rest: Option<bool>,

    /// Whether this build is a live reload of a running application
    #[serde(default)]
    pub live_reload: bool,
}

impl EnvironmentDescriptor {
    /// Add a capability.
    pub fn with_capability(mut self, name: impl Into<String>) -> Self {
        self.capabilities.insert(name.into());
        self
    }

    /// Whether a capability with exactly this name is present.
    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.contains(name)
    }

    /// Whether any capability starts with the given prefix.
    pub fn has_capability_with_prefix(&self, prefix: &str) -> bool {
        self.capabilities.iter().any(|c| c.starts_with(prefix))
    }

    /// Both REST capabilities are present.
    pub fn has_rest_capabilities(&self) -> bool {
        self.has_capability(capability::REST) && self.has_capability(capability::REST_JSON)
    }
}

/// Optional addon switches gating extra reflection groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddonsConfig {
    /// Metrics addon
    #[serde(default)]
    pub monitoring: bool,

    /// Decision tracing addon
    #[serde(default)]
    pub tracing: bool,

    /// Explainability addon
    #[serde(default)]
    pub explainability: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_capabilities_require_both() {
        let env = EnvironmentDescriptor::default().with_capability(capability::REST);
        assert!(!env.has_rest_capabilities());

        let env = env.with_capability(capability::REST_JSON);
        assert!(env.has_rest_capabilities());
    }

    #[test]
    fn test_capability_prefix() {
        let env = EnvironmentDescriptor::default().with_capability("planner-solver");
        assert!(env.has_capability_with_prefix(capability::PLANNER_PREFIX));
        assert!(!env.has_capability(capability::PLANNER_PREFIX));
    }
}
