// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Special treatment of identifiers
//!
//! Each identifier may carry a treatment for its *use sites* (how references are
//! translated) and, independently, for its *definition site* (whether and how a
//! declaration is emitted). Lookup is keyed by (module, name) and has no side
//! effects.
//!
//! Treatments that only need names can also be loaded from toml:
//!
//! ```toml
//! [modules.Prelude]
//! bvAdd = { use = "rename", module = "BitVec", name = "add", def = "skip" }
//! bvSub = { def = "skip" }
//! ```

use crate::target::ast::Term;
use anyhow::{bail, Context};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shared_term::{Ident, ModuleName};
use std::collections::BTreeSet;
use std::fmt::{self, Debug, Formatter};
use std::path::Path;
use std::sync::Arc;

/// Builds a target head from the first `arity` translated arguments
pub type MacroBuilder = Arc<dyn Fn(Vec<Term>) -> Term + Send + Sync>;

/// How references to an identifier are translated
#[derive(Clone)]
pub enum UseSiteTreatment {
    /// Keep the identifier, qualified unless it belongs to the current module
    Preserve,

    /// Substitute another target identifier
    Rename {
        module: Option<String>,
        name: String,
        /// Suppress implicit-argument elision (`@name`)
        explicit: bool,
    },

    /// Build the head from the first `arity` arguments
    Macro { arity: usize, build: MacroBuilder },
}

impl Debug for UseSiteTreatment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            UseSiteTreatment::Preserve => write!(f, "Preserve"),
            UseSiteTreatment::Rename { module, name, explicit } => f
                .debug_struct("Rename")
                .field("module", module)
                .field("name", name)
                .field("explicit", explicit)
                .finish(),
            UseSiteTreatment::Macro { arity, .. } => write!(f, "Macro({})", arity),
        }
    }
}

/// Whether a definition site emits a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefSiteTreatment {
    /// Emit the translated definition under its own name
    Preserve,
    /// Emit the translated definition under another name
    Rename(String),
    /// Emit the given target text instead of the translation
    Replace(String),
    /// Already present on the target side
    Skip,
}

#[derive(Debug, Clone)]
pub struct IdentSpecialTreatment {
    /// `None` means unspecified; reaching a definition site is then an error
    pub at_def_site: Option<DefSiteTreatment>,
    pub at_use_site: UseSiteTreatment,
}

impl IdentSpecialTreatment {
    /// Translate and emit normally
    pub fn preserve() -> Self {
        Self {
            at_def_site: Some(DefSiteTreatment::Preserve),
            at_use_site: UseSiteTreatment::Preserve,
        }
    }

    /// Defined on the target side under the same qualified name
    pub fn skip() -> Self {
        Self {
            at_def_site: Some(DefSiteTreatment::Skip),
            at_use_site: UseSiteTreatment::Preserve,
        }
    }

    /// Defined on the target side as `module.name`
    pub fn maps_to(module: &str, name: &str) -> Self {
        Self {
            at_def_site: Some(DefSiteTreatment::Skip),
            at_use_site: UseSiteTreatment::Rename {
                module: Some(module.to_string()),
                name: name.to_string(),
                explicit: false,
            },
        }
    }

    /// Defined on the target side as an unqualified `name`
    pub fn maps_to_unqualified(name: &str) -> Self {
        Self {
            at_def_site: Some(DefSiteTreatment::Skip),
            at_use_site: UseSiteTreatment::Rename {
                module: None,
                name: name.to_string(),
                explicit: false,
            },
        }
    }

    /// Emitted and referenced under a new name
    pub fn rename(name: &str) -> Self {
        Self {
            at_def_site: Some(DefSiteTreatment::Rename(name.to_string())),
            at_use_site: UseSiteTreatment::Rename {
                module: None,
                name: name.to_string(),
                explicit: false,
            },
        }
    }

    /// Definition replaced by verbatim target text, references kept
    pub fn replace(snippet: &str) -> Self {
        Self {
            at_def_site: Some(DefSiteTreatment::Replace(snippet.to_string())),
            at_use_site: UseSiteTreatment::Preserve,
        }
    }

    /// References built by `build`, nothing emitted at the definition site
    pub fn replace_with_macro<F>(arity: usize, build: F) -> Self
    where
        F: Fn(Vec<Term>) -> Term + Send + Sync + 'static,
    {
        Self {
            at_def_site: Some(DefSiteTreatment::Skip),
            at_use_site: UseSiteTreatment::Macro {
                arity,
                build: Arc::new(build),
            },
        }
    }

    /// References built by `build`; the definition site is left unspecified
    pub fn macro_use<F>(arity: usize, build: F) -> Self
    where
        F: Fn(Vec<Term>) -> Term + Send + Sync + 'static,
    {
        Self {
            at_def_site: None,
            at_use_site: UseSiteTreatment::Macro {
                arity,
                build: Arc::new(build),
            },
        }
    }

    /// Suppress implicit-argument elision for a renamed identifier
    pub fn explicit(mut self) -> Self {
        if let UseSiteTreatment::Rename { explicit, .. } = &mut self.at_use_site {
            *explicit = true;
        }
        self
    }
}

// ============================================================================
// Table
// ============================================================================

/// Stands for the arguments when a macro is expanded without a use site
const MACRO_HOLE: &str = "_";

/// Immutable-by-convention mapping module -> name -> treatment
#[derive(Debug, Clone, Default)]
pub struct SpecialTreatmentTable {
    modules: IndexMap<ModuleName, IndexMap<String, IdentSpecialTreatment>>,
}

impl SpecialTreatmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ident: Ident, treatment: IdentSpecialTreatment) {
        self.modules
            .entry(ident.module)
            .or_default()
            .insert(ident.name, treatment);
    }

    /// Builder-style insert
    pub fn with(mut self, ident: Ident, treatment: IdentSpecialTreatment) -> Self {
        self.insert(ident, treatment);
        self
    }

    /// Insert treatments for several names of one module
    pub fn with_module<I>(mut self, module: &ModuleName, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, IdentSpecialTreatment)>,
    {
        for (name, treatment) in entries {
            self.insert(Ident::new(module.clone(), name), treatment);
        }
        self
    }

    pub fn lookup(&self, ident: &Ident) -> Option<&IdentSpecialTreatment> {
        self.modules.get(&ident.module)?.get(&ident.name)
    }

    /// Unqualified target names that references translated through this table
    /// may start with: the module root of every preserved or renamed identifier,
    /// and the names a macro puts around its arguments.
    pub fn target_roots(&self) -> BTreeSet<String> {
        let mut roots = BTreeSet::new();
        for (module, entries) in &self.modules {
            for treatment in entries.values() {
                match &treatment.at_use_site {
                    UseSiteTreatment::Preserve => roots.extend(module.components().first().cloned()),
                    UseSiteTreatment::Rename { module, name, .. } => {
                        let qualified = module.as_deref().unwrap_or(name);
                        roots.extend(qualified.split('.').next().map(str::to_string));
                    }
                    UseSiteTreatment::Macro { arity, build } => {
                        let head = build(vec![Term::var(MACRO_HOLE); *arity]);
                        roots.extend(head.name_roots().into_iter().filter(|root| root != MACRO_HOLE));
                    }
                }
            }
        }
        roots
    }

    pub fn len(&self) -> usize {
        self.modules.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add (or override) treatments from a parsed configuration
    pub fn extend_from_config(&mut self, config: &SpecialTreatmentConfig) -> anyhow::Result<()> {
        for (module, entries) in &config.modules {
            let module: ModuleName = module
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            for (name, entry) in entries {
                let ident = Ident::new(module.clone(), name.as_str());
                let treatment = entry
                    .to_treatment()
                    .with_context(|| format!("invalid treatment for `{}`", ident))?;
                log::debug!("special treatment for {}: {:?}", ident, treatment);
                self.insert(ident, treatment);
            }
        }
        Ok(())
    }

    /// Add (or override) treatments from a toml file
    pub fn load_overrides(&mut self, path: &Path) -> anyhow::Result<()> {
        let config = SpecialTreatmentConfig::load(path)?;
        self.extend_from_config(&config)
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UseSiteKind {
    #[default]
    Preserve,
    Rename,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefSiteKind {
    #[default]
    Preserve,
    Rename,
    Replace,
    Skip,
}

/// One configured treatment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreatmentEntry {
    #[serde(rename = "use", default)]
    pub use_site: UseSiteKind,
    #[serde(default)]
    pub def: DefSiteKind,
    /// Target name for `rename`
    pub name: Option<String>,
    /// Target module for a renamed use site
    pub module: Option<String>,
    #[serde(default)]
    pub explicit: bool,
    /// Target text for `def = "replace"`
    pub snippet: Option<String>,
}

impl TreatmentEntry {
    pub fn to_treatment(&self) -> anyhow::Result<IdentSpecialTreatment> {
        let at_use_site = match self.use_site {
            UseSiteKind::Preserve => UseSiteTreatment::Preserve,
            UseSiteKind::Rename => {
                let Some(name) = &self.name else {
                    bail!("`use = \"rename\"` requires `name`");
                };
                UseSiteTreatment::Rename {
                    module: self.module.clone(),
                    name: name.clone(),
                    explicit: self.explicit,
                }
            }
        };
        let at_def_site = match self.def {
            DefSiteKind::Preserve => DefSiteTreatment::Preserve,
            DefSiteKind::Rename => match &self.name {
                Some(name) => DefSiteTreatment::Rename(name.clone()),
                None => bail!("`def = \"rename\"` requires `name`"),
            },
            DefSiteKind::Replace => match &self.snippet {
                Some(snippet) => DefSiteTreatment::Replace(snippet.clone()),
                None => bail!("`def = \"replace\"` requires `snippet`"),
            },
            DefSiteKind::Skip => DefSiteTreatment::Skip,
        };
        Ok(IdentSpecialTreatment {
            at_def_site: Some(at_def_site),
            at_use_site,
        })
    }
}

/// Treatments keyed by module name then identifier name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecialTreatmentConfig {
    pub modules: IndexMap<String, IndexMap<String, TreatmentEntry>>,
}

impl SpecialTreatmentConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid special treatment configuration")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read special treatments `{}`", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in `{}`", path.display()))
    }
}
