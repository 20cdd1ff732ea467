// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translation session state
//!
//! A `Scope` holds everything that is local to a lexical region: the names of
//! bound de Bruijn variables, the names that may not be chosen for new binders
//! and the names given to shared subterms. Scopes are persistent (`im`), so a
//! snapshot is a cheap clone.
//!
//! `GlobalState` holds what persists across a whole module pass: emitted
//! declarations and the registry of already-translated globals.

use crate::target::ast::Decl;
use crate::target::keywords::{escape_identifier, EMITTED_HEADS, RESERVED_WORDS};
use crate::translation::TranslationConfig;
use im::{OrdMap, OrdSet, Vector};
use shared_term::naming::sanitize;
use shared_term::{Ident, TermF, TermId, TermStore};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Names of bound variables, innermost first
    pub(crate) local_env: Vector<String>,

    /// Names that new binders must avoid
    pub(crate) unavailable: OrdSet<String>,

    /// Names of let-lifted shared subterms
    pub(crate) shared_names: OrdMap<TermId, String>,
}

impl Scope {
    /// Initial scope of a top-level unit translating `roots`
    pub(crate) fn for_unit(
        config: &TranslationConfig,
        globals: &GlobalState,
        store: &TermStore,
        roots: &[TermId],
    ) -> Self {
        let mut unavailable: OrdSet<String> = RESERVED_WORDS
            .iter()
            .chain(EMITTED_HEADS)
            .map(|word| word.to_string())
            .collect();
        unavailable.extend(config.options.extra_reserved.iter().cloned());
        unavailable.extend(config.table.target_roots());
        unavailable.extend(
            [&config.options.bv_literal_ctor, &config.options.vector_ctor]
                .into_iter()
                .filter_map(|ctor| ctor.split('.').next().map(str::to_string)),
        );
        unavailable.extend(globals.declared_names.iter().cloned());
        unavailable.extend(names_in_use(store, roots, config));
        Self {
            local_env: Vector::new(),
            unavailable,
            shared_names: OrdMap::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.local_env.len()
    }
}

/// Names the translation of `roots` refers to without binding them: free
/// variables, unqualified globals of the current module and the module roots
/// of qualified globals.
fn names_in_use(store: &TermStore, roots: &[TermId], config: &TranslationConfig) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut seen = BTreeSet::new();
    let mut stack = roots.to_vec();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let node = store.get(id);
        match node {
            TermF::Variable { name, .. } => {
                names.insert(sanitize(name));
            }
            TermF::Global(ident)
            | TermF::Constant { ident, .. }
            | TermF::DataTypeApp { ident, .. }
            | TermF::CtorApp { ident, .. }
            | TermF::Recursor { data_type: ident, .. }
                if ident.module == config.current_module =>
            {
                names.insert(escape_identifier(&ident.name));
            }
            TermF::Global(ident)
            | TermF::Constant { ident, .. }
            | TermF::DataTypeApp { ident, .. }
            | TermF::CtorApp { ident, .. }
            | TermF::Recursor { data_type: ident, .. } => {
                names.extend(ident.module.components().first().cloned());
            }
            _ => {}
        }
        stack.extend(node.children());
    }
    names
}

// ============================================================================
// Module-wide state
// ============================================================================

/// Accumulators that persist across all terms of one module pass
#[derive(Debug, Clone, Default)]
pub struct GlobalState {
    declarations: Vec<Decl>,
    /// Globals whose definition site has been handled
    emitted: OrdSet<Ident>,
    /// Target names of emitted declarations
    declared_names: OrdSet<String>,
}

/// Restore point for `GlobalState`
#[derive(Debug, Clone)]
pub struct Checkpoint {
    declarations: usize,
    emitted: OrdSet<Ident>,
    declared_names: OrdSet<String>,
}

impl GlobalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Globals already emitted by an earlier pass
    pub fn with_emitted<I>(mut self, idents: I) -> Self
    where
        I: IntoIterator<Item = Ident>,
    {
        self.emitted.extend(idents);
        self
    }

    pub fn declarations(&self) -> &[Decl] {
        &self.declarations
    }

    pub fn is_emitted(&self, ident: &Ident) -> bool {
        self.emitted.contains(ident)
    }

    /// Record that the definition site of `ident` has been handled.
    /// Returns false if it already was.
    pub(crate) fn mark_emitted(&mut self, ident: &Ident) -> bool {
        self.emitted.insert(ident.clone()).is_none()
    }

    pub(crate) fn push_declaration(&mut self, decl: Decl) {
        if let Some(name) = decl.name() {
            self.declared_names.insert(name.to_string());
        }
        log::debug!("emitting declaration {}", decl.name().unwrap_or("<snippet>"));
        self.declarations.push(decl);
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            declarations: self.declarations.len(),
            emitted: self.emitted.clone(),
            declared_names: self.declared_names.clone(),
        }
    }

    /// Drop everything recorded since `checkpoint`
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.declarations.truncate(checkpoint.declarations);
        self.emitted = checkpoint.emitted;
        self.declared_names = checkpoint.declared_names;
    }

    /// Declarations recorded since `checkpoint`
    pub fn declarations_since(&self, checkpoint: &Checkpoint) -> &[Decl] {
        &self.declarations[checkpoint.declarations..]
    }

    pub fn into_declarations(self) -> Vec<Decl> {
        self.declarations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::ast::Term;

    #[test]
    fn test_rollback_discards_later_declarations() {
        let mut globals = GlobalState::new();
        globals.push_declaration(Decl::Axiom {
            name: "a".to_string(),
            ty: Term::var("Nat"),
        });
        let checkpoint = globals.checkpoint();
        assert!(globals.mark_emitted(&Ident::prelude("b")));
        globals.push_declaration(Decl::Axiom {
            name: "b".to_string(),
            ty: Term::var("Nat"),
        });
        assert_eq!(globals.declarations_since(&checkpoint).len(), 1);

        globals.rollback(checkpoint);
        assert_eq!(globals.declarations().len(), 1);
        assert!(!globals.is_emitted(&Ident::prelude("b")));
        assert!(!globals.declared_names.contains("b"));
    }

    #[test]
    fn test_mark_emitted_reports_duplicates() {
        let mut globals = GlobalState::new().with_emitted([Ident::prelude("seeded")]);
        assert!(!globals.mark_emitted(&Ident::prelude("seeded")));
        assert!(globals.mark_emitted(&Ident::prelude("fresh")));
        assert!(!globals.mark_emitted(&Ident::prelude("fresh")));
    }
}
