// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Hot reload support source.
//!
//! Generated on regular builds only. Its id is a digest of every process
//! model, so the generated crate is recompiled whenever a model changes.

use quote::quote;
use sha2::{Digest, Sha256};

use super::{GeneratedArtifact, GenerationContext, Generator};
use crate::error::Result;

/// Relative path of the generated source.
pub const ARTIFACT_PATH: &str = "hot_reload_support.rs";

/// Generates the hot reload marker type.
#[derive(Debug, Clone, Copy)]
pub struct HotReloadSupportGenerator;

impl Generator for HotReloadSupportGenerator {
    fn name(&self) -> String {
        "hot-reload".to_string()
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<GeneratedArtifact>> {
        let mut models: Vec<_> = ctx.models.iter().collect();
        models.sort_by(|a, b| a.id.cmp(&b.id));

        let mut hasher = Sha256::new();
        for model in models {
            hasher.update(serde_json::to_vec(model)?);
        }
        let id = format!("{:x}", hasher.finalize());

        let tokens = quote! {
            /// Marker whose id changes with the process models.
            pub struct HotReloadSupport;

            impl HotReloadSupport {
                /// Digest of the process models this crate was generated from.
                pub const ID: &'static str = #id;
            }
        };
        Ok(vec![GeneratedArtifact::source(ARTIFACT_PATH, tokens.to_string())])
    }
}
