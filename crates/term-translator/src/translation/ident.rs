// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Identifier translation
//!
//! Use sites resolve through the special-treatment table; a missing entry
//! behaves as `Preserve`. Definition sites of constants emit at most one
//! declaration per module pass.

use super::Translator;
use crate::error::{TranslationError, TranslationResult};
use crate::special::{DefSiteTreatment, UseSiteTreatment};
use crate::target::ast::{Decl, Term};
use crate::target::keywords::escape_identifier;
use shared_term::{Ident, TermId};

impl<'a> Translator<'a> {
    /// Target spelling of a preserved identifier
    pub(crate) fn qualified_name(&self, ident: &Ident) -> String {
        if ident.module == self.config.current_module {
            escape_identifier(&ident.name)
        } else {
            ident.to_string()
        }
    }

    /// Target identifier of a datatype or function with a direct counterpart
    pub(crate) fn counterpart_name(&self, ident: &Ident) -> Option<String> {
        match self.config.table.lookup(ident).map(|treatment| &treatment.at_use_site) {
            None | Some(UseSiteTreatment::Preserve) => Some(self.qualified_name(ident)),
            Some(UseSiteTreatment::Rename { module, name, .. }) => Some(renamed(module.as_deref(), name)),
            Some(UseSiteTreatment::Macro { .. }) => None,
        }
    }

    /// Translate `ident` applied to `args`
    pub(crate) fn translate_ident_app(&mut self, ident: &Ident, args: &[TermId]) -> TranslationResult<Term> {
        let config = self.config;
        let treatment = config.table.lookup(ident).map(|treatment| &treatment.at_use_site);
        let (head, rest) = match treatment {
            None | Some(UseSiteTreatment::Preserve) => (Term::var(self.qualified_name(ident)), args),
            Some(UseSiteTreatment::Rename { module, name, explicit }) => {
                let name = renamed(module.as_deref(), name);
                let head = if *explicit { Term::ExplicitVar(name) } else { Term::Var(name) };
                (head, args)
            }
            Some(UseSiteTreatment::Macro { arity, build }) => {
                if args.len() < *arity {
                    return Err(TranslationError::MacroArity {
                        ident: ident.clone(),
                        expected: *arity,
                        actual: args.len(),
                    });
                }
                let (macro_args, rest) = args.split_at(*arity);
                let macro_args = self.translate_all(macro_args)?;
                (build(macro_args), rest)
            }
        };
        let rest = self.translate_all(rest)?;
        Ok(Term::app(head, rest))
    }

    pub(crate) fn translate_all(&mut self, ids: &[TermId]) -> TranslationResult<Vec<Term>> {
        ids.iter().map(|&id| self.translate(id)).collect()
    }

    /// Handle the definition site of a constant, at most once per module pass
    pub(crate) fn declare_constant(&mut self, ident: &Ident, ty: TermId, body: Option<TermId>) -> TranslationResult<()> {
        if self.globals.is_emitted(ident) {
            return Ok(());
        }
        let config = self.config;
        let def_site = match config.table.lookup(ident) {
            None => DefSiteTreatment::Preserve,
            Some(treatment) => treatment
                .at_def_site
                .clone()
                .ok_or_else(|| TranslationError::UnspecifiedTreatment(ident.clone()))?,
        };

        // Undone by the caller together with the declarations on failure
        self.globals.mark_emitted(ident);
        let name = match def_site {
            DefSiteTreatment::Skip => return Ok(()),
            DefSiteTreatment::Replace(snippet) => {
                self.globals.push_declaration(Decl::Snippet(snippet));
                return Ok(());
            }
            DefSiteTreatment::Preserve => self.qualified_name(ident),
            DefSiteTreatment::Rename(name) => name,
        };

        log::debug!("translating definition of {} as {}", ident, name);
        let roots: Vec<TermId> = std::iter::once(ty).chain(body).collect();
        let decl = self.with_fresh_unit(&roots, |t| match body {
            Some(body) => t.definition_decl(name, ty, body),
            None => Ok(Decl::Axiom {
                name,
                ty: t.translate(ty)?,
            }),
        })?;
        self.globals.push_declaration(decl);
        Ok(())
    }
}

fn renamed(module: Option<&str>, name: &str) -> String {
    match module {
        Some(module) => format!("{}.{}", module, name),
        None => name.to_string(),
    }
}
