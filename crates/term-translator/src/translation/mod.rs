// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translation of shared terms into the target calculus
//!
//! A `Translator` is one session over a `TermStore`. It threads the scope-local
//! state explicitly and writes module-wide results into a borrowed
//! `GlobalState`. Scope-local changes are undone by `with_local_scope` and
//! `with_fresh_unit`; on error the caller discards the session.

mod binders;
mod ident;
pub mod module;
mod sharing;
pub mod state;
mod term;

use crate::error::TranslationResult;
use crate::options::TranslatorOptions;
use crate::prelude::default_treatments;
use crate::special::SpecialTreatmentTable;
use crate::target::ast::{Decl, Term};
use shared_term::naming::{fresh_variant, sanitize};
use shared_term::{ModuleName, TermId, TermStore};
use state::{GlobalState, Scope};

pub use module::ModuleTranslator;

/// Static inputs of a translation
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    /// Globals of this module are referenced unqualified
    pub current_module: ModuleName,
    pub table: SpecialTreatmentTable,
    pub options: TranslatorOptions,
}

impl TranslationConfig {
    pub fn new(current_module: ModuleName, table: SpecialTreatmentTable) -> Self {
        Self {
            current_module,
            table,
            options: TranslatorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TranslatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Default Prelude treatments extended by the options' treatments file
    pub fn from_options(current_module: ModuleName, options: TranslatorOptions) -> anyhow::Result<Self> {
        let mut table = default_treatments();
        if let Some(path) = &options.treatments_file {
            table.load_overrides(path)?;
        }
        log::info!("translating module {} with {} special treatments", current_module, table.len());
        Ok(Self {
            current_module,
            table,
            options,
        })
    }
}

/// Result of translating one top-level term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedTerm {
    /// Declarations emitted while translating the term, in dependency order
    pub declarations: Vec<Decl>,
    pub term: Term,
}

/// Translate a closed term with a fresh module state
pub fn translate_term(config: &TranslationConfig, store: &TermStore, root: TermId) -> TranslationResult<TranslatedTerm> {
    ModuleTranslator::new(config).translate_term(store, root)
}

/// Translate a named definition with a fresh module state.
/// The returned declarations end with the definition itself.
pub fn translate_definition(
    config: &TranslationConfig,
    store: &TermStore,
    name: &str,
    ty: TermId,
    body: TermId,
) -> TranslationResult<Vec<Decl>> {
    let mut translator = ModuleTranslator::new(config);
    translator.translate_definition(store, name, ty, body)?;
    Ok(translator.finish())
}

// ============================================================================
// Session
// ============================================================================

pub(crate) struct Translator<'a> {
    pub(crate) config: &'a TranslationConfig,
    pub(crate) store: &'a TermStore,
    pub(crate) scope: Scope,
    pub(crate) globals: &'a mut GlobalState,
}

impl<'a> Translator<'a> {
    pub(crate) fn new(config: &'a TranslationConfig, store: &'a TermStore, globals: &'a mut GlobalState) -> Self {
        Self {
            config,
            store,
            scope: Scope::default(),
            globals,
        }
    }

    /// Translate a top-level term in a fresh unit
    pub(crate) fn translate_root(&mut self, root: TermId) -> TranslationResult<Term> {
        self.with_fresh_unit(&[root], |t| t.translate_lifted(root))
    }

    /// Run `f` and restore the scope-local state afterwards
    pub(crate) fn with_local_scope<T, F>(&mut self, f: F) -> TranslationResult<T>
    where
        F: FnOnce(&mut Self) -> TranslationResult<T>,
    {
        let saved = self.scope.clone();
        let result = f(self);
        self.scope = saved;
        result
    }

    /// Run `f` in a new top-level unit over `roots`: no bound variables, no
    /// shared names, and the names used by `roots` unavailable.
    pub(crate) fn with_fresh_unit<T, F>(&mut self, roots: &[TermId], f: F) -> TranslationResult<T>
    where
        F: FnOnce(&mut Self) -> TranslationResult<T>,
    {
        let unit = Scope::for_unit(self.config, self.globals, self.store, roots);
        let saved = std::mem::replace(&mut self.scope, unit);
        let result = f(self);
        self.scope = saved;
        result
    }

    /// Pick a name based on `base` that is not unavailable, and reserve it
    pub(crate) fn fresh_name(&mut self, base: &str) -> String {
        let unavailable = &self.scope.unavailable;
        let name = fresh_variant(&sanitize(base), |candidate| unavailable.contains(candidate));
        self.scope.unavailable.insert(name.clone());
        name
    }

    /// Bind de Bruijn index 0 to `name`
    pub(crate) fn push_local(&mut self, name: String) {
        self.scope.local_env.push_front(name);
    }

    pub(crate) fn lookup_local(&self, index: usize) -> Option<&str> {
        self.scope.local_env.get(index).map(String::as_str)
    }

    /// Name given to a let-lifted node in this scope
    pub(crate) fn shared_name(&self, id: TermId) -> Option<&str> {
        self.scope.shared_names.get(&id).map(String::as_str)
    }
}
