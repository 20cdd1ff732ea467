// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Bit-blasting
//!
//! Turns a first-order term into formulas over fresh input variables: every
//! argument of the term's type and every free variable of the term becomes a
//! value built from domain inputs, and the term is evaluated against them.

use crate::anf::AnfDomain;
use crate::domain::Domain;
use crate::error::{EvalError, EvalResult};
use crate::eval::Evaluator;
use crate::value::Value;
use num::ToPrimitive;
use shared_term::{Ident, TermF, TermId, TermStore};
use std::collections::BTreeMap;

/// First-order types that can be filled with input bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Bool,
    Word(usize),
    Vector(usize, Box<Shape>),
    Pair(Box<Shape>, Box<Shape>),
    /// Fields in name order
    Record(Vec<(String, Shape)>),
    Unit,
}

impl Shape {
    /// Number of input bits a value of this shape needs
    pub fn width(&self) -> usize {
        match self {
            Shape::Bool => 1,
            Shape::Word(n) => *n,
            Shape::Vector(n, elem) => n * elem.width(),
            Shape::Pair(a, b) => a.width() + b.width(),
            Shape::Record(fields) => fields.iter().map(|(_, field)| field.width()).sum(),
            Shape::Unit => 0,
        }
    }
}

pub fn shape_of(store: &TermStore, ty: TermId) -> EvalResult<Shape> {
    let unsupported = || EvalError::Unsupported(format!("argument type {}", ty));
    match store.get(ty) {
        TermF::UnitType => Ok(Shape::Unit),
        TermF::PairType(a, b) => Ok(Shape::Pair(Box::new(shape_of(store, *a)?), Box::new(shape_of(store, *b)?))),
        TermF::RecordType(fields) => {
            let sorted: BTreeMap<&String, TermId> = fields.iter().map(|(name, ty)| (name, *ty)).collect();
            Ok(Shape::Record(
                sorted
                    .into_iter()
                    .map(|(name, ty)| Ok((name.clone(), shape_of(store, ty)?)))
                    .collect::<EvalResult<_>>()?,
            ))
        }
        TermF::Global(ident) if *ident == Ident::prelude("Bool") => Ok(Shape::Bool),
        TermF::App(..) => {
            let (head, args) = store.app_spine(ty);
            match (store.as_global(head), args.as_slice()) {
                (Some(ident), [len, elem]) if *ident == Ident::prelude("Vec") => {
                    let len = store
                        .as_nat_lit(*len)
                        .and_then(|n| n.to_usize())
                        .ok_or_else(unsupported)?;
                    match shape_of(store, *elem)? {
                        Shape::Bool => Ok(Shape::Word(len)),
                        elem => Ok(Shape::Vector(len, Box::new(elem))),
                    }
                }
                _ => Err(unsupported()),
            }
        }
        _ => Err(unsupported()),
    }
}

/// Allocates domain inputs in order
struct Inputs<'d, D: Domain> {
    domain: &'d D,
    next: u32,
}

impl<D: Domain> Inputs<'_, D> {
    fn fresh(&mut self, shape: &Shape) -> EvalResult<Value<D>> {
        Ok(match shape {
            Shape::Bool => Value::Bool(self.bit()?),
            Shape::Word(n) => Value::Word((0..*n).map(|_| self.bit()).collect::<EvalResult<_>>()?),
            Shape::Vector(n, elem) => Value::Vector((0..*n).map(|_| self.fresh(elem)).collect::<EvalResult<_>>()?),
            Shape::Pair(a, b) => Value::Pair(Box::new(self.fresh(a)?), Box::new(self.fresh(b)?)),
            Shape::Record(fields) => Value::Record(
                fields
                    .iter()
                    .map(|(name, field)| Ok((name.clone(), self.fresh(field)?)))
                    .collect::<EvalResult<_>>()?,
            ),
            Shape::Unit => Value::Unit,
        })
    }

    fn bit(&mut self) -> EvalResult<D::Bool> {
        let bit = self.domain.var(self.next)?;
        self.next += 1;
        Ok(bit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BitBlastResult<D: Domain> {
    /// Arguments then free variables, with the values standing for them
    pub inputs: Vec<(String, Value<D>)>,
    pub output: Value<D>,
}

impl<D: Domain> BitBlastResult<D> {
    /// The output as a flat list of formulas
    pub fn output_bits(&self) -> EvalResult<Vec<D::Bool>> {
        let mut bits = Vec::new();
        flatten(&self.output, &mut bits)?;
        Ok(bits)
    }
}

fn flatten<D: Domain>(value: &Value<D>, bits: &mut Vec<D::Bool>) -> EvalResult<()> {
    match value {
        Value::Bool(b) => bits.push(b.clone()),
        Value::Word(word) | Value::ToNat(word) => bits.extend(word.iter().cloned()),
        Value::Vector(elems) => {
            for elem in elems {
                flatten(elem, bits)?;
            }
        }
        Value::Pair(a, b) => {
            flatten(a, bits)?;
            flatten(b, bits)?;
        }
        Value::Record(fields) => {
            for field in fields.values() {
                flatten(field, bits)?;
            }
        }
        Value::Unit => {}
        other => {
            return Err(EvalError::Unsupported(format!(
                "bit-blasting an output of kind {}",
                other.kind()
            )))
        }
    }
    Ok(())
}

/// Evaluate `term : ty` on fresh symbolic inputs
pub fn bitblast<D: Domain>(ev: &mut Evaluator<'_, D>, term: TermId, ty: TermId) -> EvalResult<BitBlastResult<D>> {
    let store = ev.store();
    let domain = ev.domain().clone();
    let mut fresh = Inputs {
        domain: &domain,
        next: 0,
    };
    let mut inputs = Vec::new();

    let (params, _) = store.pi_chain(ty);
    let mut args = Vec::new();
    for (i, (name, arg_ty)) in params.into_iter().enumerate() {
        if !store.is_closed(arg_ty) {
            return Err(EvalError::Unsupported(format!("dependent argument type {}", arg_ty)));
        }
        let value = fresh.fresh(&shape_of(store, arg_ty)?)?;
        let name = if name == "_" {
            format!("arg{}", i)
        } else {
            name.to_string()
        };
        inputs.push((name, value.clone()));
        args.push(value);
    }

    for var in store.free_variables(term) {
        if let TermF::Variable { name, ty } = store.get(var) {
            let value = fresh.fresh(&shape_of(store, *ty)?)?;
            ev.bind_variable(var, value.clone());
            inputs.push((name.clone(), value));
        }
    }
    log::debug!("bit-blasting {} with {} input bits", term, fresh.next);

    let fun = ev.evaluate(term)?;
    let output = ev.apply_all(fun, args)?;
    Ok(BitBlastResult { inputs, output })
}

/// `bitblast` into algebraic normal form, with `overrides` replacing globals
pub fn bitblast_anf(
    store: &TermStore,
    term: TermId,
    ty: TermId,
    overrides: impl IntoIterator<Item = (Ident, Value<AnfDomain>)>,
) -> EvalResult<BitBlastResult<AnfDomain>> {
    let mut ev = Evaluator::new(store, AnfDomain).with_overrides(overrides);
    bitblast(&mut ev, term, ty)
}
