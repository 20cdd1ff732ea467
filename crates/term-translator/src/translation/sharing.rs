// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Let-lifting of shared subterms
//!
//! Every closed, non-trivial node referenced from more than one position under
//! the root gets one flat `let` binding at the root. Bindings are ordered by
//! ascending `TermId`, which is a dependency order.

use super::Translator;
use crate::error::TranslationResult;
use crate::special::UseSiteTreatment;
use crate::target::ast::{LetBinding, Term};
use crate::translation::TranslationConfig;
use shared_term::{is_memoizable, shared_terms_by, TermF, TermId, TermStore};

impl<'a> Translator<'a> {
    /// Translate `root`, binding its shared subterms to names first
    pub(crate) fn translate_lifted(&mut self, root: TermId) -> TranslationResult<Term> {
        let config = self.config;
        let store = self.store;
        let shared = shared_terms_by(
            store,
            root,
            |node| translated_children(store, node),
            |store, id| should_memoize(config, store, id),
        );
        if shared.is_empty() {
            return self.translate(root);
        }

        self.with_local_scope(|t| {
            // Names first, so that sibling bindings never collide
            let base = t.config.options.shared_name_base.clone();
            let names: Vec<String> = shared.iter().map(|_| t.fresh_name(&base)).collect();
            for (&id, name) in shared.iter().zip(&names) {
                t.scope.shared_names.insert(id, name.clone());
            }

            let mut bindings = Vec::with_capacity(shared.len());
            for (&id, name) in shared.iter().zip(names) {
                // The node itself is translated structurally; only its
                // children resolve to shared names
                let value = t.translate_node(id)?;
                bindings.push(LetBinding { name, ty: None, value });
            }
            let body = t.translate(root)?;
            Ok(Term::let_in(bindings, body))
        })
    }
}

/// Child positions that the translation renders
pub(crate) fn translated_children(store: &TermStore, node: &TermF) -> Vec<TermId> {
    match node {
        // `ite T c t e rest..` renders as `if`: neither the type nor the
        // partial spine prefixes appear in the output
        TermF::App(fun, arg) => {
            let (head, mut args) = store.app_spine(*fun);
            args.push(*arg);
            if is_ite(store, head) && args.len() >= 4 {
                args.split_off(1)
            } else {
                vec![*fun, *arg]
            }
        }
        // Referenced by name only
        TermF::Constant { .. } | TermF::Variable { .. } => vec![],
        TermF::ArrayValue { elems, .. } => elems.clone(),
        TermF::Recursor {
            params,
            motive,
            ctor_order,
            eliminators,
            ..
        } => params
            .iter()
            .copied()
            .chain(std::iter::once(*motive))
            .chain(
                eliminators
                    .iter()
                    .filter(|(ctor, _)| ctor_order.contains(ctor))
                    .map(|(_, elim)| *elim),
            )
            .collect(),
        other => other.children().collect(),
    }
}

/// Closed non-trivial nodes, except partial applications of a macro, whose
/// head can only be built with all of its arguments at hand
fn should_memoize(config: &TranslationConfig, store: &TermStore, id: TermId) -> bool {
    if !is_memoizable(store, id) {
        return false;
    }
    let (head, args) = store.app_spine(id);
    if args.is_empty() {
        return true;
    }
    // Only a saturated conditional has a structural rendering
    if is_ite(store, head) && args.len() < 4 {
        return false;
    }
    let ident = match store.get(head) {
        TermF::Global(ident) | TermF::Constant { ident, .. } => ident,
        _ => return true,
    };
    match config.table.lookup(ident).map(|treatment| &treatment.at_use_site) {
        Some(UseSiteTreatment::Macro { arity, .. }) => args.len() >= *arity,
        _ => true,
    }
}

fn is_ite(store: &TermStore, head: TermId) -> bool {
    matches!(store.get(head), TermF::Global(ident) if ident.is_prelude("ite"))
}
