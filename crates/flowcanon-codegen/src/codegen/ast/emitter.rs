// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Metadata and variable declaration emitters.
//!
//! Pure translation into builder calls; nothing here fails. Metadata values of
//! an unsupported kind and re-declared variable names are dropped silently.

use proc_macro2::{Ident, Literal, TokenStream};
use quote::quote;
use std::collections::HashSet;

use flowcanon_model::{Metadata, MetadataValue, VARIABLE_TAGS, VariableScope};

/// Builder method attaching one metadata entry.
pub const METHOD_METADATA: &str = "metadata";

/// Builder method declaring one variable.
pub const METHOD_VARIABLE: &str = "variable";

/// Literal expression for a supported metadata value, `None` otherwise.
///
/// Integer literals carry an explicit `i32`/`i64` suffix so the value kind
/// survives in the generated source.
pub fn value_literal(value: &MetadataValue) -> Option<TokenStream> {
    match value {
        MetadataValue::Boolean(b) => Some(quote! { #b }),
        MetadataValue::Integer(i) => {
            let lit = Literal::i32_suffixed(*i);
            Some(quote! { #lit })
        }
        MetadataValue::Long(l) => {
            let lit = Literal::i64_suffixed(*l);
            Some(quote! { #lit })
        }
        MetadataValue::String(s) => {
            let lit = Literal::string(s);
            Some(quote! { #lit })
        }
        MetadataValue::Other(_) => None,
    }
}

/// Emit one `target.metadata(key, value)` call per supported entry.
pub fn emit_metadata(metadata: &Metadata, target: &Ident) -> Vec<TokenStream> {
    emit_entries(metadata, target, METHOD_METADATA)
}

/// Emit `target.<method>(key, value)` for every supported entry of `entries`.
pub fn emit_entries(entries: &Metadata, target: &Ident, method: &str) -> Vec<TokenStream> {
    let method = Ident::new(method, proc_macro2::Span::call_site());
    entries
        .iter()
        .filter_map(|(key, value)| {
            let value = value_literal(value)?;
            let key = Literal::string(key);
            Some(quote! { #target.#method(#key, #value); })
        })
        .collect()
}

/// Emit one `target.variable(...)` call per variable not yet in `visited`.
///
/// Every name is inserted into `visited` before the duplicate check, so the
/// first declaration wins and later ones are skipped. A missing scope is a no-op.
pub fn emit_variables(
    scope: Option<&VariableScope>,
    target: &Ident,
    visited: &mut HashSet<String>,
    scope_class: &TokenStream,
) -> Vec<TokenStream> {
    let Some(scope) = scope else {
        return Vec::new();
    };

    let mut calls = Vec::with_capacity(scope.variables.len());
    for variable in &scope.variables {
        if !visited.insert(variable.name.clone()) {
            continue;
        }

        let name = Literal::string(&variable.name);
        let type_name = Literal::string(&variable.type_name);
        let tags = match &variable.tags {
            Some(tags) => {
                let tags = Literal::string(tags);
                quote! { Some(#tags) }
            }
            None => quote! { None },
        };

        calls.push(quote! {
            #target.variable(
                #name,
                ObjectDataType::new(#type_name, #scope_class::class_loader()),
                #VARIABLE_TAGS,
                #tags
            );
        });
    }
    calls
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcanon_model::Variable;
    use proc_macro2::Span;

    fn factory() -> Ident {
        Ident::new("factory", Span::call_site())
    }

    fn render(calls: &[TokenStream]) -> String {
        quote! { #(#calls)* }.to_string()
    }

    /// Re-parse emitted `target.metadata(k, v);` statements into (key, value) pairs.
    fn parse_metadata_calls(calls: &[TokenStream]) -> Vec<(String, MetadataValue)> {
        calls
            .iter()
            .map(|call| {
                let stmt: syn::Stmt = syn::parse2(call.clone()).unwrap();
                let syn::Stmt::Expr(syn::Expr::MethodCall(mc), _) = stmt else {
                    panic!("not a method call: {}", call);
                };
                assert_eq!(mc.method, METHOD_METADATA);
                let args: Vec<_> = mc.args.iter().collect();
                let syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(key), .. }) = args[0] else {
                    panic!("key is not a string literal");
                };
                let value = match args[1] {
                    syn::Expr::Lit(syn::ExprLit { lit, .. }) => match lit {
                        syn::Lit::Bool(b) => MetadataValue::Boolean(b.value),
                        syn::Lit::Str(s) => MetadataValue::String(s.value()),
                        syn::Lit::Int(i) if i.suffix() == "i32" => {
                            MetadataValue::Integer(i.base10_parse().unwrap())
                        }
                        syn::Lit::Int(i) if i.suffix() == "i64" => {
                            MetadataValue::Long(i.base10_parse().unwrap())
                        }
                        other => panic!("unexpected literal: {:?}", other.span()),
                    },
                    // Negative literals parse as unary negation
                    syn::Expr::Unary(u) => {
                        let syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Int(i), .. }) = &*u.expr
                        else {
                            panic!("unexpected unary operand");
                        };
                        match i.suffix() {
                            "i32" => MetadataValue::Integer(-i.base10_parse::<i32>().unwrap()),
                            _ => MetadataValue::Long(-i.base10_parse::<i64>().unwrap()),
                        }
                    }
                    _ => panic!("unexpected value expression"),
                };
                (key.value(), value)
            })
            .collect()
    }

    #[test]
    fn test_metadata_round_trip_supported_kinds() {
        let mut metadata = Metadata::new();
        metadata.insert("flag".into(), true.into());
        metadata.insert("count".into(), 42i32.into());
        metadata.insert("negative".into(), (-7i32).into());
        metadata.insert("big".into(), 9_000_000_000i64.into());
        metadata.insert("text".into(), "say \"hi\"\n\\path".into());

        let calls = emit_metadata(&metadata, &factory());
        assert_eq!(calls.len(), 5);

        let mut recovered = parse_metadata_calls(&calls);
        recovered.sort_by(|a, b| a.0.cmp(&b.0));
        let mut expected: Vec<_> = metadata.into_iter().collect();
        expected.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(recovered, expected);
    }

    #[test]
    fn test_metadata_unsupported_kinds_dropped() {
        let mut metadata = Metadata::new();
        metadata.insert("kept".into(), "yes".into());
        metadata.insert("ratio".into(), MetadataValue::Other(serde_json::json!(0.5)));
        metadata.insert("list".into(), MetadataValue::Other(serde_json::json!([1, 2])));

        let calls = emit_metadata(&metadata, &factory());
        let code = render(&calls);
        assert_eq!(calls.len(), 1);
        assert!(code.contains("kept"));
        assert!(!code.contains("ratio"));
        assert!(!code.contains("list"));
    }

    #[test]
    fn test_metadata_targets_given_builder() {
        let mut metadata = Metadata::new();
        metadata.insert("k".into(), 1i32.into());
        let target = Ident::new("start_node_1", Span::call_site());
        let code = render(&emit_metadata(&metadata, &target));
        assert!(code.starts_with("start_node_1 . metadata"));
    }

    #[test]
    fn test_variables_first_occurrence_wins() {
        let scope = VariableScope::new(vec![
            Variable::new("order", "org.acme.Order"),
            Variable::new("order", "String"),
        ]);
        let mut visited = HashSet::new();
        let calls = emit_variables(Some(&scope), &factory(), &mut visited, &quote! { OrdersProcess });

        assert_eq!(calls.len(), 1);
        assert_eq!(visited.len(), 1);
        assert!(visited.contains("order"));
        let code = render(&calls);
        assert!(code.contains("org.acme.Order"));
        assert!(!code.contains("\"String\""));
    }

    #[test]
    fn test_variables_skip_names_visited_earlier() {
        let mut visited = HashSet::from(["approved".to_string()]);
        let scope = VariableScope::new(vec![
            Variable::new("approved", "Boolean"),
            Variable::new("comment", "String"),
        ]);
        let calls = emit_variables(Some(&scope), &factory(), &mut visited, &quote! { P });
        assert_eq!(calls.len(), 1);
        assert!(render(&calls).contains("comment"));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_variable_call_shape() {
        let scope = VariableScope::new(vec![
            Variable::new("order", "org.acme.Order").with_tags("input,required"),
            Variable::new("note", "String"),
        ]);
        let mut visited = HashSet::new();
        let calls = emit_variables(Some(&scope), &factory(), &mut visited, &quote! { app::OrdersProcess });

        let tagged = calls[0].to_string();
        assert!(tagged.contains("factory . variable"));
        assert!(tagged.contains("ObjectDataType :: new (\"org.acme.Order\""));
        assert!(tagged.contains("app :: OrdersProcess :: class_loader ()"));
        assert!(tagged.contains("\"customTags\""));
        assert!(tagged.contains("Some (\"input,required\")"));

        let untagged = calls[1].to_string();
        assert!(untagged.contains("None"));

        // Each call is a well-formed statement
        for call in &calls {
            let _: syn::Stmt = syn::parse2(call.clone()).unwrap();
        }
    }

    #[test]
    fn test_variables_missing_scope_is_noop() {
        let mut visited = HashSet::new();
        let calls = emit_variables(None, &factory(), &mut visited, &quote! { P });
        assert!(calls.is_empty());
        assert!(visited.is_empty());
    }
}
