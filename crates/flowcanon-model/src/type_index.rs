// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Type index: supertype/interface graph over known types.
//!
//! The index is keyed by fully-qualified type path (`crate::module::Type`).
//! Edges point upwards (from a type to its supertype and implemented traits);
//! subtype queries walk them in reverse.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::PathBuf;

/// Declaration kind of an indexed type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Struct declaration
    Struct,
    /// Enum declaration
    Enum,
    /// Trait declaration
    Trait,
}

impl TypeKind {
    /// Structs and enums can be instantiated, traits cannot.
    pub fn is_concrete(self) -> bool {
        !matches!(self, TypeKind::Trait)
    }
}

/// Edges and kind of one indexed type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    /// Declaration kind, unknown when only an `impl` block was seen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TypeKind>,

    /// Direct supertype
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supertype: Option<String>,

    /// Implemented interfaces (traits, or supertraits for a trait)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub interfaces: BTreeSet<String>,
}

impl TypeInfo {
    /// A declaration with no edges.
    pub fn declared(kind: TypeKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Whether the type is known to be instantiable.
    pub fn is_concrete(&self) -> bool {
        self.kind.is_some_and(TypeKind::is_concrete)
    }

    /// Fold another view of the same type into this one.
    ///
    /// Commutative: conflicting kinds or supertypes resolve to the smaller value.
    fn absorb(&mut self, other: TypeInfo) {
        self.kind = match (self.kind, other.kind) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.supertype = match (self.supertype.take(), other.supertype) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.interfaces.extend(other.interfaces);
    }
}

/// Mapping from fully-qualified type path to its edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct TypeIndex {
    types: BTreeMap<String, TypeInfo>,
}

impl TypeIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or merge) the information for one type.
    pub fn insert(&mut self, name: impl Into<String>, info: TypeInfo) {
        self.types.entry(name.into()).or_default().absorb(info);
    }

    /// Merge every entry of `other` into this index.
    pub fn merge(&mut self, other: TypeIndex) {
        for (name, info) in other.types {
            self.insert(name, info);
        }
    }

    /// Look up one type.
    pub fn get(&self, name: &str) -> Option<&TypeInfo> {
        self.types.get(name)
    }

    /// Whether the type is indexed.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of indexed types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeInfo)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every type reachable from `root` by following supertype or interface
    /// edges backwards, zero or more times. `root` itself is not included.
    pub fn all_known_subtypes(&self, root: &str) -> BTreeSet<String> {
        let mut children: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (name, info) in &self.types {
            let parents = info
                .supertype
                .iter()
                .chain(info.interfaces.iter())
                .map(String::as_str);
            for parent in parents {
                children.entry(parent).or_default().push(name.as_str());
            }
        }

        let mut found = BTreeSet::new();
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            for &child in children.get(current).into_iter().flatten() {
                if child != root && found.insert(child.to_string()) {
                    queue.push_back(child);
                }
            }
        }
        found
    }

    /// Concrete subset of [`TypeIndex::all_known_subtypes`].
    pub fn concrete_subtypes(&self, root: &str) -> BTreeSet<String> {
        self.all_known_subtypes(root)
            .into_iter()
            .filter(|name| self.types.get(name).is_some_and(TypeInfo::is_concrete))
            .collect()
    }
}

/// Resolved external dependencies the generated code is compiled against.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependencyClosure {
    /// Type index over all dependency types
    #[serde(default)]
    pub index: TypeIndex,

    /// Library search directories (`-L dependency=...`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub library_dirs: Vec<PathBuf>,

    /// Crate name to compiled library path (`--extern name=path`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub externs: BTreeMap<String, PathBuf>,
}
