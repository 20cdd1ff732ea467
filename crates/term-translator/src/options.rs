// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Translator options. Configured via a toml source; every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorOptions {
    /// Base name for let-bound shared subterms.
    pub shared_name_base: String,
    /// Fail on a constructor without eliminator instead of emitting an error placeholder.
    pub strict_eliminators: bool,
    /// Names never used for binders, in addition to the target's reserved words.
    pub extra_reserved: Vec<String>,
    /// Constructor used for recognised bit-vector literals, applied to width and value.
    pub bv_literal_ctor: String,
    /// Constructor used for other vector literals, applied to a list.
    pub vector_ctor: String,
    /// Optional toml file with additional special treatments.
    pub treatments_file: Option<PathBuf>,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            shared_name_base: "x".to_string(),
            strict_eliminators: false,
            extra_reserved: vec![],
            bv_literal_ctor: "BitVec.ofNat".to_string(),
            vector_ctor: "Vector.ofList".to_string(),
            treatments_file: None,
        }
    }
}

impl TranslatorOptions {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid translator options")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read translator options `{}`", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in `{}`", path.display()))
    }
}
