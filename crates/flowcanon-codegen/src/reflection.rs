// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Reflection allow-list derivation.
//!
//! The allow-list names every type the ahead-of-time packaging stage must keep
//! introspectable and instantiable. It is the union of:
//!
//! - the core event envelope types (always),
//! - the declared type list of each enabled optional group,
//! - every concrete type reachable below a closure root in the type index.
//!
//! Which types belong to which source is data, held in a [`ReflectionTable`]
//! that can be loaded from JSON instead of the built-in defaults.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::debug;

use crate::error::Result;
use flowcanon_model::{AddonsConfig, TypeIndex};

/// Relative path of the serialized allow-list.
pub const REFLECTION_CONFIG_PATH: &str = "reflection-config.json";

/// Optional type groups, each switched on by an addon flag.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OptionalGroup {
    /// Metrics histograms
    Monitoring,
    /// Decision tracing events
    Tracing,
    /// Prediction models
    Explainability,
}

impl OptionalGroup {
    /// Whether the addon flags enable this group.
    pub fn is_enabled(self, addons: &AddonsConfig) -> bool {
        match self {
            OptionalGroup::Monitoring => addons.monitoring,
            OptionalGroup::Tracing => addons.tracing,
            OptionalGroup::Explainability => addons.explainability,
        }
    }
}

/// Type lists driving allow-list derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionTable {
    /// Types always preserved
    #[serde(default)]
    pub core: Vec<String>,
    /// Types whose concrete subtypes are looked up in the index
    #[serde(default)]
    pub closure_roots: Vec<String>,
    /// Declared types per optional group
    #[serde(default)]
    pub groups: BTreeMap<OptionalGroup, Vec<String>>,
}

impl ReflectionTable {
    /// Built-in table for event types provided by `runtime_crate`.
    pub fn for_runtime(runtime_crate: &str) -> Self {
        let event = |name: &str| format!("{}::event::{}", runtime_crate, name);
        let runtime = |path: &str| format!("{}::{}", runtime_crate, path);

        let core = [
            "DataEvent",
            "ProcessDataEvent",
            "ProcessInstanceDataEvent",
            "VariableInstanceDataEvent",
            "ProcessInstanceEventBody",
            "NodeInstanceEventBody",
            "ProcessErrorEventBody",
            "VariableInstanceEventBody",
            "UserTaskInstanceDataEvent",
            "UserTaskInstanceEventBody",
            "UserTaskDeadlineDataEvent",
            "UserTaskDeadlineEventBody",
        ]
        .into_iter()
        .map(event)
        .collect();

        let closure_roots = vec![event("DataEvent"), event("ProcessDataEvent")];

        let monitoring = vec![
            "hdrhistogram::Histogram".to_string(),
            "hdrhistogram::sync::SyncHistogram".to_string(),
        ];

        let tracing = [
            "tracing::decision::trace::TraceEvent",
            "tracing::decision::trace::TraceHeader",
            "tracing::decision::trace::TraceEventType",
            "tracing::decision::trace::TraceResourceId",
            "tracing::decision::message::Message",
            "tracing::decision::message::MessageLevel",
            "tracing::decision::message::MessageCategory",
            "tracing::decision::message::MessageFeelEvent",
            "tracing::decision::message::MessageFeelEventSeverity",
            "tracing::decision::message::MessageExceptionField",
            "tracing::decision::trace::TraceInputValue",
            "tracing::decision::trace::TraceOutputValue",
            "tracing::typed_value::BaseTypedValue",
            "tracing::typed_value::TypedValue",
            "tracing::typed_value::UnitValue",
            "tracing::typed_value::CollectionValue",
            "tracing::typed_value::StructureValue",
            "tracing::decision::trace::TraceExecutionStep",
            "tracing::decision::trace::TraceExecutionStepType",
            "tracing::decision::model::ModelEvent",
            "Gav",
            "decision::DecisionModelType",
            "decision::DecisionModelMetadata",
            "decision::DecisionModelMetadataKind",
        ]
        .into_iter()
        .map(runtime)
        .collect();

        let explainability = [
            "explainability::PredictOutput",
            "explainability::PredictInput",
            "explainability::ModelIdentifier",
        ]
        .into_iter()
        .map(runtime)
        .collect();

        Self {
            core,
            closure_roots,
            groups: BTreeMap::from([
                (OptionalGroup::Monitoring, monitoring),
                (OptionalGroup::Tracing, tracing),
                (OptionalGroup::Explainability, explainability),
            ]),
        }
    }

    /// Parse a table from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a table from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Groups enabled by the addon flags, in group order.
    pub fn enabled_groups(&self, addons: &AddonsConfig) -> Vec<OptionalGroup> {
        OptionalGroup::iter()
            .filter(|group| group.is_enabled(addons) && self.groups.contains_key(group))
            .collect()
    }
}

/// A type preserved for the ahead-of-time packaging stage.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowListEntry {
    /// Fully-qualified type path
    pub name: String,
    /// Keep the type introspectable
    pub introspection: bool,
    /// Keep the type instantiable
    pub instantiation: bool,
}

impl AllowListEntry {
    /// Entry with both preservation flags set.
    pub fn preserved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            introspection: true,
            instantiation: true,
        }
    }
}

/// Derive the allow-list from the merged index.
///
/// Deterministic and idempotent: the same index, table and addon flags always
/// yield the same set, and a type named by several sources appears once.
pub fn derive_allow_list(
    index: &TypeIndex,
    table: &ReflectionTable,
    addons: &AddonsConfig,
) -> BTreeSet<AllowListEntry> {
    let mut names: BTreeSet<&str> = table.core.iter().map(String::as_str).collect();

    for group in table.enabled_groups(addons) {
        let declared = table.groups.get(&group).into_iter().flatten();
        names.extend(declared.map(String::as_str));
        debug!(group = %group, "Optional reflection group enabled");
    }

    let discovered: BTreeSet<String> = table
        .closure_roots
        .iter()
        .flat_map(|root| index.concrete_subtypes(root))
        .collect();
    debug!(
        roots = table.closure_roots.len(),
        discovered = discovered.len(),
        "Reflection closure computed"
    );

    names
        .into_iter()
        .map(str::to_string)
        .chain(discovered)
        .map(AllowListEntry::preserved)
        .collect()
}

/// Serialize the allow-list to the reflection config format.
pub fn to_reflection_config(entries: &BTreeSet<AllowListEntry>) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}
