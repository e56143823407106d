// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Type indexing of compiled sources.
//!
//! Declarations are read from the syntax tree of each generated file:
//! structs, enums and traits become index entries, `impl Trait for Type`
//! adds an interface edge and `impl Deref for Type { type Target = Base; }`
//! a supertype edge. Names are resolved through `use` declarations and the
//! module path of the file.

use std::collections::{BTreeMap, BTreeSet};

use crate::compile::CompiledUnit;
use flowcanon_model::{TypeIndex, TypeInfo, TypeKind};

/// Merge the declarations of `units` into `prior`.
///
/// Merging is additive and order-independent: batches defining disjoint
/// types yield the same index whichever is indexed first.
pub fn index(units: &[CompiledUnit], prior: &TypeIndex) -> TypeIndex {
    let mut merged = prior.clone();
    for unit in units {
        merged.merge(unit.declarations.clone());
    }
    merged
}

/// Collect the type declarations and edges of one source file.
///
/// `module_path` is the file's module inside `crate_name` (equal to
/// `crate_name` for the crate root).
pub fn scan_declarations(file: &syn::File, crate_name: &str, module_path: &str) -> TypeIndex {
    let mut index = TypeIndex::new();
    scan_items(&file.items, crate_name, module_path, &mut index);
    index
}

fn scan_items(items: &[syn::Item], crate_name: &str, module_path: &str, index: &mut TypeIndex) {
    let scope = Scope::new(items, crate_name, module_path);

    for item in items {
        match item {
            syn::Item::Struct(s) => {
                index.insert(scope.local(&s.ident), TypeInfo::declared(TypeKind::Struct));
            }
            syn::Item::Enum(e) => {
                index.insert(scope.local(&e.ident), TypeInfo::declared(TypeKind::Enum));
            }
            syn::Item::Trait(t) => {
                let interfaces = t
                    .supertraits
                    .iter()
                    .filter_map(|bound| match bound {
                        syn::TypeParamBound::Trait(bound) => Some(scope.resolve(&bound.path)),
                        _ => None,
                    })
                    .collect();
                index.insert(
                    scope.local(&t.ident),
                    TypeInfo {
                        kind: Some(TypeKind::Trait),
                        supertype: None,
                        interfaces,
                    },
                );
            }
            syn::Item::Impl(imp) => {
                if let Some((name, info)) = scan_impl(imp, &scope) {
                    index.insert(name, info);
                }
            }
            syn::Item::Mod(m) => {
                if let Some((_, nested)) = &m.content {
                    let nested_path = format!("{}::{}", module_path, m.ident);
                    scan_items(nested, crate_name, &nested_path, index);
                }
            }
            _ => {}
        }
    }
}

/// Edge contributed by a trait impl, keyed by the implementing type.
fn scan_impl(imp: &syn::ItemImpl, scope: &Scope<'_>) -> Option<(String, TypeInfo)> {
    let (negative, trait_path, _) = imp.trait_.as_ref()?;
    if negative.is_some() {
        return None;
    }
    let syn::Type::Path(self_ty) = &*imp.self_ty else {
        return None;
    };
    let name = scope.resolve(&self_ty.path);
    let trait_name = scope.resolve(trait_path);

    let mut info = TypeInfo::default();
    if is_deref(&trait_name) {
        info.supertype = imp.items.iter().find_map(|item| match item {
            syn::ImplItem::Type(target) if target.ident == "Target" => match &target.ty {
                syn::Type::Path(base) => Some(scope.resolve(&base.path)),
                _ => None,
            },
            _ => None,
        });
        info.supertype.as_ref()?;
    } else {
        info.interfaces.insert(trait_name);
    }
    Some((name, info))
}

fn is_deref(trait_name: &str) -> bool {
    matches!(trait_name, "std::ops::Deref" | "core::ops::Deref")
}

/// Name resolution scope of one module.
struct Scope<'a> {
    crate_name: &'a str,
    module_path: &'a str,
    /// Types declared in this module
    locals: BTreeSet<String>,
    /// Imported name to full path
    imports: BTreeMap<String, String>,
    /// Glob-imported module paths in declaration order
    globs: Vec<String>,
}

impl<'a> Scope<'a> {
    fn new(items: &[syn::Item], crate_name: &'a str, module_path: &'a str) -> Self {
        let mut scope = Self {
            crate_name,
            module_path,
            locals: BTreeSet::new(),
            imports: BTreeMap::new(),
            globs: Vec::new(),
        };
        for item in items {
            match item {
                syn::Item::Struct(s) => {
                    scope.locals.insert(s.ident.to_string());
                }
                syn::Item::Enum(e) => {
                    scope.locals.insert(e.ident.to_string());
                }
                syn::Item::Trait(t) => {
                    scope.locals.insert(t.ident.to_string());
                }
                syn::Item::Use(u) => {
                    let prefix = if u.leading_colon.is_some() {
                        vec![String::new()]
                    } else {
                        Vec::new()
                    };
                    scope.collect_use(&u.tree, prefix);
                }
                _ => {}
            }
        }
        scope
    }

    fn collect_use(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.collect_use(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                let ident = name.ident.to_string();
                if ident == "self" {
                    if let Some(last) = prefix.last().cloned() {
                        self.imports.insert(last, self.absolute(&prefix));
                    }
                } else {
                    prefix.push(ident.clone());
                    self.imports.insert(ident, self.absolute(&prefix));
                }
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.imports.insert(rename.rename.to_string(), self.absolute(&prefix));
            }
            syn::UseTree::Glob(_) => {
                let glob = self.absolute(&prefix);
                self.globs.push(glob);
            }
            syn::UseTree::Group(group) => {
                for tree in &group.items {
                    self.collect_use(tree, prefix.clone());
                }
            }
        }
    }

    /// Full path of a type declared in this module.
    fn local(&self, ident: &syn::Ident) -> String {
        format!("{}::{}", self.module_path, ident)
    }

    /// Turn use-path segments into an absolute path.
    fn absolute(&self, segments: &[String]) -> String {
        let mut out: Vec<String> = Vec::with_capacity(segments.len());
        let mut rest = segments;
        if let Some((first, tail)) = segments.split_first() {
            match first.as_str() {
                "" => rest = tail,
                "crate" => {
                    out.push(self.crate_name.to_string());
                    rest = tail;
                }
                "self" => {
                    out.push(self.module_path.to_string());
                    rest = tail;
                }
                "super" => {
                    out.push(self.parent().to_string());
                    rest = tail;
                }
                _ => {}
            }
        }
        out.extend(rest.iter().cloned());
        out.join("::")
    }

    fn parent(&self) -> &str {
        self.module_path
            .rsplit_once("::")
            .map_or(self.crate_name, |(parent, _)| parent)
    }

    /// Resolve a path as written in this module to a full type path.
    fn resolve(&self, path: &syn::Path) -> String {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        let Some((first, tail)) = segments.split_first() else {
            return String::new();
        };
        if path.leading_colon.is_some() {
            return segments.join("::");
        }

        let head = match first.as_str() {
            "crate" | "self" | "super" => self.absolute(std::slice::from_ref(first)),
            _ if tail.is_empty() && self.locals.contains(first) => {
                format!("{}::{}", self.module_path, first)
            }
            _ => match self.imports.get(first) {
                Some(import) => import.clone(),
                None if tail.is_empty() => match self.globs.first() {
                    Some(glob) => format!("{}::{}", glob, first),
                    None => format!("{}::{}", self.module_path, first),
                },
                None => first.clone(),
            },
        };

        std::iter::once(head)
            .chain(tail.iter().cloned())
            .collect::<Vec<_>>()
            .join("::")
    }
}
