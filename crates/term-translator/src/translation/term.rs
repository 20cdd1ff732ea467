// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Structural translation of term nodes

use super::Translator;
use crate::error::{TranslationError, TranslationResult};
use crate::target::ast::Term;
use itertools::Itertools;
use num::BigUint;
use shared_term::naming::sanitize;
use shared_term::{Ident, TermF, TermId};

impl<'a> Translator<'a> {
    /// Translate a node, referring to it by name if it was let-lifted
    pub(crate) fn translate(&mut self, id: TermId) -> TranslationResult<Term> {
        if let Some(name) = self.shared_name(id) {
            return Ok(Term::var(name));
        }
        self.translate_node(id)
    }

    /// Translate a node structurally; only its children resolve to shared names
    pub(crate) fn translate_node(&mut self, id: TermId) -> TranslationResult<Term> {
        let store = self.store;
        match store.get(id) {
            TermF::Global(ident) => self.translate_ident_app(ident, &[]),
            TermF::Constant { ident, ty, body } => {
                self.declare_constant(ident, *ty, *body)?;
                self.translate_ident_app(ident, &[])
            }
            TermF::Variable { name, .. } => Ok(Term::var(sanitize(name))),
            TermF::LocalVar(index) => match self.lookup_local(*index) {
                Some(name) => Ok(Term::var(name)),
                None => Err(TranslationError::UnboundVariable {
                    index: *index,
                    depth: self.scope.depth(),
                }),
            },
            TermF::Sort { level, .. } => Ok(Term::Sort(*level)),
            TermF::NatLit(value) => Ok(Term::NatLit(value.clone())),
            TermF::StringLit(value) => Ok(Term::string(value.clone())),
            TermF::BoolLit(value) => Ok(Term::var(if *value { "true" } else { "false" })),
            TermF::UnitValue => Ok(Term::var("Unit.unit")),
            TermF::UnitType => Ok(Term::var("Unit")),

            TermF::App(..) => self.translate_app(id),
            TermF::PairValue(a, b) => self.apply_named("Prod.mk", &[*a, *b]),
            TermF::PairType(a, b) => self.apply_named("Prod", &[*a, *b]),
            TermF::PairLeft(a) => self.apply_named("Prod.fst", &[*a]),
            TermF::PairRight(a) => self.apply_named("Prod.snd", &[*a]),
            TermF::RecordType(fields) => self.translate_record(fields, "RecordTypeCons", "RecordTypeNil"),
            TermF::RecordValue(fields) => self.translate_record(fields, "RecordCons", "RecordNil"),
            TermF::RecordProj(record, field) => {
                let record = self.translate(*record)?;
                Ok(Term::app(Term::var("RecordProj"), vec![record, Term::string(field.clone())]))
            }
            TermF::ArrayValue { elem_ty, elems } => self.translate_array(*elem_ty, elems),
            TermF::DataTypeApp { ident, params, indices } => {
                let args = params.iter().chain(indices).copied().collect_vec();
                self.translate_ident_app(ident, &args)
            }
            TermF::CtorApp { ident, params, args } => {
                let args = params.iter().chain(args).copied().collect_vec();
                self.translate_ident_app(ident, &args)
            }
            TermF::Recursor {
                data_type,
                params,
                motive,
                ctor_order,
                eliminators,
            } => self.translate_recursor(data_type, params, *motive, ctor_order, eliminators),

            TermF::Lambda { .. } => self.translate_lambda(id),
            TermF::Pi { .. } => self.translate_pi(id),
            TermF::Let { name, ty, value, body } => self.translate_let(name, *ty, *value, *body),
            TermF::Fix { name, .. } => Err(TranslationError::GeneralRecursion { name: name.clone() }),
        }
    }

    fn apply_named(&mut self, head: &str, args: &[TermId]) -> TranslationResult<Term> {
        let args = self.translate_all(args)?;
        Ok(Term::app(Term::var(head), args))
    }

    /// Application spine, stopping at let-lifted partial applications
    fn spine(&self, id: TermId) -> (TermId, Vec<TermId>) {
        let mut args = Vec::new();
        let mut head = id;
        while let TermF::App(fun, arg) = self.store.get(head) {
            if head != id && self.shared_name(head).is_some() {
                break;
            }
            args.push(*arg);
            head = *fun;
        }
        args.reverse();
        (head, args)
    }

    fn translate_app(&mut self, id: TermId) -> TranslationResult<Term> {
        let store = self.store;
        let (head, args) = self.spine(id);
        match store.get(head) {
            // `ite T c t e rest..`
            TermF::Global(ident) if ident.is_prelude("ite") && args.len() >= 4 => {
                let cond = self.translate(args[1])?;
                let then_branch = self.translate(args[2])?;
                let else_branch = self.translate(args[3])?;
                let rest = self.translate_all(&args[4..])?;
                Ok(Term::app(Term::if_then_else(cond, then_branch, else_branch), rest))
            }
            TermF::Global(ident) => self.translate_ident_app(ident, &args),
            TermF::Constant { ident, ty, body } => {
                self.declare_constant(ident, *ty, *body)?;
                self.translate_ident_app(ident, &args)
            }
            _ => {
                let head = self.translate(head)?;
                let args = self.translate_all(&args)?;
                Ok(Term::app(head, args))
            }
        }
    }

    /// Right-nested cons list over the fields sorted by name
    fn translate_record(&mut self, fields: &[(String, TermId)], cons: &str, nil: &str) -> TranslationResult<Term> {
        let sorted = fields.iter().sorted_by(|(a, _), (b, _)| a.cmp(b)).collect_vec();
        let mut translated = Vec::with_capacity(sorted.len());
        for (name, value) in sorted {
            translated.push((name, self.translate(*value)?));
        }
        Ok(translated.into_iter().rev().fold(Term::var(nil), |tail, (name, value)| {
            Term::app(Term::var(cons), vec![Term::string(name.clone()), value, tail])
        }))
    }

    fn translate_array(&mut self, elem_ty: TermId, elems: &[TermId]) -> TranslationResult<Term> {
        let store = self.store;
        let bits: Option<Vec<bool>> = elems.iter().map(|&elem| store.as_bool_lit(elem)).collect();
        let is_bool_vector = !elems.is_empty() || store.as_global(elem_ty).map_or(false, |ty| ty.is_prelude("Bool"));
        if let (Some(bits), true) = (bits, is_bool_vector) {
            // Most significant bit first
            let value = bits
                .iter()
                .fold(BigUint::from(0u32), |acc, &bit| (acc << 1u32) + BigUint::from(bit as u32));
            let options = &self.config.options;
            return Ok(Term::app(
                Term::var(options.bv_literal_ctor.as_str()),
                vec![Term::nat(bits.len()), Term::NatLit(value)],
            ));
        }
        let elems = self.translate_all(elems)?;
        Ok(Term::app(
            Term::var(self.config.options.vector_ctor.as_str()),
            vec![Term::List(elems)],
        ))
    }

    /// `T.rec params motive elim_1 .. elim_k` over the constructors in order
    fn translate_recursor(
        &mut self,
        data_type: &Ident,
        params: &[TermId],
        motive: TermId,
        ctor_order: &[Ident],
        eliminators: &[(Ident, TermId)],
    ) -> TranslationResult<Term> {
        let Some(target) = self.counterpart_name(data_type) else {
            return Err(TranslationError::RecursorWithoutCounterpart(data_type.clone()));
        };
        let mut args = self.translate_all(params)?;
        args.push(self.translate(motive)?);
        for ctor in ctor_order {
            match eliminators.iter().find(|(name, _)| name == ctor) {
                Some((_, elim)) => args.push(self.translate(*elim)?),
                None if self.config.options.strict_eliminators => {
                    return Err(TranslationError::MissingEliminator(ctor.clone()));
                }
                None => {
                    log::warn!("recursor over {} has no eliminator for {}", data_type, ctor);
                    args.push(Term::error(format!("missing eliminator for {}", ctor)));
                }
            }
        }
        Ok(Term::app(Term::var(format!("{}.rec", target)), args))
    }
}
