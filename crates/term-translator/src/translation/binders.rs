// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Binder translation
//!
//! Each bound name is freshened before it is pushed onto the local
//! environment. A parameter whose type is (after its own Pi chain) a sort with
//! flags also gets one implicit hypothesis per flag, e.g. `{Inh_a : Inhabited a}`
//! or, for a type family, `{Inh_f : (x : A) → Inhabited (f x)}`. Hypotheses
//! have no source counterpart, so they are reserved but never pushed.

use super::Translator;
use crate::error::TranslationResult;
use crate::target::ast::{Binder, Decl, LetBinding, PiBinder, Term};
use shared_term::{SortFlags, TermF, TermId};

/// Constraint classes synthesized for sort flags, with their binder prefix
fn constraint_classes(flags: SortFlags) -> impl Iterator<Item = (&'static str, &'static str)> {
    [
        (flags.inhabited, "Inh", "Inhabited"),
        (flags.quantifiable, "QT", "QuantType"),
    ]
    .into_iter()
    .filter(|(enabled, _, _)| *enabled)
    .map(|(_, prefix, class)| (prefix, class))
}

impl<'a> Translator<'a> {
    pub(crate) fn translate_lambda(&mut self, id: TermId) -> TranslationResult<Term> {
        let store = self.store;
        self.with_local_scope(|t| {
            let mut binders = Vec::new();
            let mut current = id;
            while let TermF::Lambda { name, ty, body } = store.get(current) {
                if current != id && t.shared_name(current).is_some() {
                    break;
                }
                let ty_term = t.translate(*ty)?;
                let (name, hyps) = t.bind_named(name, *ty)?;
                binders.push(Binder {
                    name,
                    ty: ty_term,
                    implicit: false,
                });
                binders.extend(hyps);
                current = *body;
            }
            let body = t.translate(current)?;
            Ok(Term::Lambda(binders, Box::new(body)))
        })
    }

    /// Pi binders are named only if the codomain refers to them or a
    /// hypothesis mentions them; the rest render as arrows.
    pub(crate) fn translate_pi(&mut self, id: TermId) -> TranslationResult<Term> {
        let store = self.store;
        self.with_local_scope(|t| {
            let mut binders = Vec::new();
            let mut current = id;
            while let TermF::Pi { name, ty, body } = store.get(current) {
                if current != id && t.shared_name(current).is_some() {
                    break;
                }
                let ty_term = t.translate(*ty)?;
                if store.has_loose_var(*body, 0) || t.has_constraints(*ty) {
                    let (name, hyps) = t.bind_named(name, *ty)?;
                    binders.push(PiBinder {
                        name: Some(name),
                        ty: ty_term,
                        implicit: false,
                    });
                    binders.extend(hyps.into_iter().map(|hyp| PiBinder {
                        name: Some(hyp.name),
                        ty: hyp.ty,
                        implicit: true,
                    }));
                } else {
                    // Never referenced, so never reserved
                    t.push_local("_".to_string());
                    binders.push(PiBinder {
                        name: None,
                        ty: ty_term,
                        implicit: false,
                    });
                }
                current = *body;
            }
            let body = t.translate(current)?;
            Ok(Term::Pi(binders, Box::new(body)))
        })
    }

    pub(crate) fn translate_let(&mut self, name: &str, ty: TermId, value: TermId, body: TermId) -> TranslationResult<Term> {
        let ty = self.translate(ty)?;
        let value = self.translate(value)?;
        self.with_local_scope(|t| {
            let name = t.fresh_name(name);
            t.push_local(name.clone());
            let binding = LetBinding {
                name,
                ty: Some(ty),
                value,
            };
            Ok(match t.translate(body)? {
                Term::Let(mut bindings, inner) => {
                    bindings.insert(0, binding);
                    Term::Let(bindings, inner)
                }
                other => Term::Let(vec![binding], Box::new(other)),
            })
        })
    }

    /// Definition of `name` with the given type and body.
    ///
    /// The body's lambda names become formal parameters only when the type's Pi
    /// chain has exactly as many binders as the body's lambda chain; otherwise
    /// the definition has no parameters and the whole type is its type.
    pub(crate) fn definition_decl(&mut self, name: String, ty: TermId, body: TermId) -> TranslationResult<Decl> {
        let store = self.store;
        let (pis, codomain) = store.pi_chain(ty);
        let (lambdas, inner) = store.lambda_chain(body);
        if pis.is_empty() || pis.len() != lambdas.len() {
            let ty = self.translate(ty)?;
            let body = self.translate_lifted(body)?;
            return Ok(Decl::Definition {
                name,
                params: vec![],
                ty: Some(ty),
                body,
            });
        }

        self.with_local_scope(|t| {
            let mut params = Vec::new();
            for ((_, param_ty), (param_name, _)) in pis.iter().zip(&lambdas) {
                let ty_term = t.translate(*param_ty)?;
                let (param_name, hyps) = t.bind_named(param_name, *param_ty)?;
                params.push(Binder {
                    name: param_name,
                    ty: ty_term,
                    implicit: false,
                });
                params.extend(hyps);
            }
            let ty = t.translate(codomain)?;
            let body = t.translate_lifted(inner)?;
            Ok(Decl::Definition {
                name,
                params,
                ty: Some(ty),
                body,
            })
        })
    }

    /// Freshen `name`, synthesize its hypotheses and bind it as index 0
    fn bind_named(&mut self, name: &str, ty: TermId) -> TranslationResult<(String, Vec<Binder>)> {
        let name = self.fresh_name(name);
        let hyps = self.implicit_hyps(&name, ty)?;
        self.push_local(name.clone());
        Ok((name, hyps))
    }

    fn has_constraints(&self, ty: TermId) -> bool {
        let (_, codomain) = self.store.pi_chain(ty);
        matches!(self.store.get(codomain), TermF::Sort { flags, .. } if !flags.is_empty())
    }

    /// Implicit hypotheses for a parameter `param : ty`, where `param` is
    /// reserved but not yet bound
    fn implicit_hyps(&mut self, param: &str, ty: TermId) -> TranslationResult<Vec<Binder>> {
        let store = self.store;
        let (domains, codomain) = store.pi_chain(ty);
        let flags = match store.get(codomain) {
            TermF::Sort { flags, .. } if !flags.is_empty() => *flags,
            _ => return Ok(vec![]),
        };

        let mut hyps = Vec::new();
        for (prefix, class) in constraint_classes(flags) {
            let hyp_ty = self.with_local_scope(|t| {
                let mut binders = Vec::with_capacity(domains.len());
                let mut args = Vec::with_capacity(domains.len());
                for &(name, domain) in &domains {
                    let domain = t.translate(domain)?;
                    let name = t.fresh_name(name);
                    t.push_local(name.clone());
                    binders.push(PiBinder {
                        name: Some(name.clone()),
                        ty: domain,
                        implicit: false,
                    });
                    args.push(Term::var(name));
                }
                let constraint = Term::app(Term::var(class), vec![Term::app(Term::var(param), args)]);
                Ok(if binders.is_empty() {
                    constraint
                } else {
                    Term::Pi(binders, Box::new(constraint))
                })
            })?;
            hyps.push(Binder {
                name: self.fresh_name(&format!("{}_{}", prefix, param)),
                ty: hyp_ty,
                implicit: true,
            });
        }
        Ok(hyps)
    }
}
