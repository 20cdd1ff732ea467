// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Batch translation of the terms of one module
//!
//! The `ModuleTranslator` owns the module-wide state, so a global reached from
//! several terms is declared once. A failing term leaves the state as it was
//! before that term; later terms can still be translated.

use super::state::GlobalState;
use super::{TranslatedTerm, TranslationConfig, Translator};
use crate::error::TranslationResult;
use crate::target::ast::Decl;
use crate::target::keywords::escape_identifier;
use shared_term::{Ident, TermId, TermStore};

pub struct ModuleTranslator<'a> {
    config: &'a TranslationConfig,
    globals: GlobalState,
}

impl<'a> ModuleTranslator<'a> {
    pub fn new(config: &'a TranslationConfig) -> Self {
        Self {
            config,
            globals: GlobalState::new(),
        }
    }

    /// Treat `idents` as already emitted by an earlier pass
    pub fn with_emitted<I>(mut self, idents: I) -> Self
    where
        I: IntoIterator<Item = Ident>,
    {
        self.globals = self.globals.with_emitted(idents);
        self
    }

    pub fn globals(&self) -> &GlobalState {
        &self.globals
    }

    /// Translate a closed term into the declarations it needs plus an expression
    pub fn translate_term(&mut self, store: &TermStore, root: TermId) -> TranslationResult<TranslatedTerm> {
        let checkpoint = self.globals.checkpoint();
        let result = Translator::new(self.config, store, &mut self.globals).translate_root(root);
        match result {
            Ok(term) => Ok(TranslatedTerm {
                declarations: self.globals.declarations_since(&checkpoint).to_vec(),
                term,
            }),
            Err(err) => {
                log::warn!("failed to translate term {}: {}", root, err);
                self.globals.rollback(checkpoint);
                Err(err)
            }
        }
    }

    /// Translate the definition `name : ty := body` and record it in the module
    pub fn translate_definition(
        &mut self,
        store: &TermStore,
        name: &str,
        ty: TermId,
        body: TermId,
    ) -> TranslationResult<Decl> {
        let checkpoint = self.globals.checkpoint();
        let name = escape_identifier(name);
        let result = {
            let mut translator = Translator::new(self.config, store, &mut self.globals);
            translator.with_fresh_unit(&[ty, body], |t| t.definition_decl(name, ty, body))
        };
        match result {
            Ok(decl) => {
                self.globals.push_declaration(decl.clone());
                Ok(decl)
            }
            Err(err) => {
                log::warn!("failed to translate definition: {}", err);
                self.globals.rollback(checkpoint);
                Err(err)
            }
        }
    }

    /// All declarations of the pass, in emission order
    pub fn finish(self) -> Vec<Decl> {
        log::info!(
            "translated module {} into {} declarations",
            self.config.current_module,
            self.globals.declarations().len()
        );
        self.globals.into_declarations()
    }
}
