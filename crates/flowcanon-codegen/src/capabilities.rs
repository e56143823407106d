// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Capability validation of the build environment.
//!
//! Runs before generator discovery and decides whether REST resources are
//! generated. Rules, in order:
//!
//! 1. A planner capability without REST capabilities and without an explicit
//!    `flowcanon.generate.rest` setting turns REST generation off (with a warning).
//! 2. If REST generation is still expected (explicitly on, or unset) and the
//!    REST capabilities are missing, the build aborts.

use thiserror::Error;
use tracing::warn;

use flowcanon_model::{EnvironmentDescriptor, capability};

/// Property switching REST resource generation on or off.
pub const GENERATE_REST_PROPERTY: &str = "flowcanon.generate.rest";

/// Result of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityOutcome {
    /// The environment supports the configured build.
    ProceedAsConfigured {
        /// Whether REST resources are generated
        generate_rest: bool,
    },
    /// REST generation was switched off automatically.
    ProceedWithOverride {
        /// Always `false`
        generate_rest: bool,
        /// Warning recorded for the operator
        warning: String,
    },
}

impl CapabilityOutcome {
    /// Effective REST generation switch.
    pub fn generate_rest(&self) -> bool {
        match self {
            CapabilityOutcome::ProceedAsConfigured { generate_rest }
            | CapabilityOutcome::ProceedWithOverride { generate_rest, .. } => *generate_rest,
        }
    }

    /// The recorded warning, if the outcome is an override.
    pub fn warning(&self) -> Option<&str> {
        match self {
            CapabilityOutcome::ProceedAsConfigured { .. } => None,
            CapabilityOutcome::ProceedWithOverride { warning, .. } => Some(warning),
        }
    }
}

/// The environment lacks a capability the build requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "No '{capability}' capability detected!\n\
     Add the `{rest}` and `{rest_json}` capabilities to generate REST endpoints automatically.\n\
     You may also disable automated REST generation by setting `{property} = false`.\n\
     You may also force REST generation by setting `{property} = true`.",
    rest = capability::REST,
    rest_json = capability::REST_JSON,
    property = GENERATE_REST_PROPERTY
)]
pub struct MissingCapability {
    /// The first missing capability
    pub capability: String,
}

/// Check the environment against the capability rules.
pub fn validate(env: &EnvironmentDescriptor) -> Result<CapabilityOutcome, MissingCapability> {
    let has_planner = env.has_capability_with_prefix(capability::PLANNER_PREFIX);
    let has_rest = env.has_rest_capabilities();
    let mut generate_rest = env.generate_rest;
    let mut warning = None;

    if has_planner && !has_rest && generate_rest.is_none() {
        let message = format!(
            "Disabling REST generation because a planner capability is available, \
             specify `{} = true` to re-enable it",
            GENERATE_REST_PROPERTY
        );
        warn!(property = GENERATE_REST_PROPERTY, "{}", message);
        generate_rest = Some(false);
        warning = Some(message);
    }

    let expected = generate_rest.unwrap_or(true);
    if !has_rest && expected {
        let missing = [capability::REST, capability::REST_JSON]
            .into_iter()
            .find(|name| !env.has_capability(name))
            .unwrap_or(capability::REST);
        return Err(MissingCapability {
            capability: missing.to_string(),
        });
    }

    Ok(match warning {
        Some(warning) => CapabilityOutcome::ProceedWithOverride {
            generate_rest: false,
            warning,
        },
        None => CapabilityOutcome::ProceedAsConfigured {
            generate_rest: expected,
        },
    })
}
