// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Symbolic values
//!
//! Values are plain data: functions are defunctionalized into closures over a
//! term and an environment, partial applications of primitives, or a muxed pair
//! of functions. Types are erased to `Value::Type`.

use crate::domain::Domain;
use crate::error::{EvalError, EvalResult};
use crate::stream::Stream;
use num::{BigInt, BigUint};
use shared_term::{Ident, TermId};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Values of bound variables, innermost first
pub type Env<D> = im::Vector<Value<D>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value<D: Domain> {
    Bool(D::Bool),
    /// Vector of booleans, most significant bit first
    Word(Vec<D::Bool>),
    Int(BigInt),
    Nat(BigUint),
    /// Natural number given by a symbolic word
    ToNat(Vec<D::Bool>),
    Vector(Vec<Value<D>>),
    Unit,
    Pair(Box<Value<D>>, Box<Value<D>>),
    Record(BTreeMap<String, Value<D>>),
    Ctor { ident: Ident, args: Vec<Value<D>> },
    Fun(FunValue<D>),
    /// Erased type
    Type,
    String(String),
    Extra(Extra<D>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunValue<D: Domain> {
    /// A `Lambda` node together with the values of its free de Bruijn variables
    Closure { lambda: TermId, env: Env<D> },
    /// Primitive applied to fewer arguments than its arity
    Partial { prim: Ident, args: Vec<Value<D>> },
    /// Applies both functions and muxes the results
    Mux {
        cond: D::Bool,
        then_fun: Box<Value<D>>,
        else_fun: Box<Value<D>>,
    },
}

/// Domain-specific values outside the core shapes
#[derive(Debug, Clone)]
pub enum Extra<D: Domain> {
    Stream(Rc<Stream<D>>),
}

impl<D: Domain> PartialEq for Extra<D> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Extra::Stream(a), Extra::Stream(b)) => Rc::ptr_eq(a, b),
        }
    }
}

impl<D: Domain> Value<D> {
    /// Short name of the value's shape, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Word(_) => "word",
            Value::Int(_) => "integer",
            Value::Nat(_) => "natural",
            Value::ToNat(_) => "symbolic natural",
            Value::Vector(_) => "vector",
            Value::Unit => "unit",
            Value::Pair(..) => "pair",
            Value::Record(_) => "record",
            Value::Ctor { .. } => "constructor",
            Value::Fun(_) => "function",
            Value::Type => "type",
            Value::String(_) => "string",
            Value::Extra(Extra::Stream(_)) => "stream",
        }
    }

    /// Vector of evaluated elements; vectors of booleans become words
    pub fn from_elems(elems: Vec<Value<D>>) -> Value<D> {
        if !elems.is_empty() && elems.iter().all(|elem| matches!(elem, Value::Bool(_))) {
            Value::Word(
                elems
                    .into_iter()
                    .filter_map(|elem| match elem {
                        Value::Bool(b) => Some(b),
                        _ => None,
                    })
                    .collect(),
            )
        } else {
            Value::Vector(elems)
        }
    }

    /// Elements of a word or vector
    pub fn into_elems(self) -> Option<Vec<Value<D>>> {
        match self {
            Value::Word(bits) => Some(bits.into_iter().map(Value::Bool).collect()),
            Value::Vector(elems) => Some(elems),
            _ => None,
        }
    }

    /// A value of the same shape as `self` with all leaves zero or false
    pub fn default_like(&self, domain: &D) -> EvalResult<Value<D>> {
        Ok(match self {
            Value::Bool(_) => Value::Bool(domain.lit(false)),
            Value::Word(bits) => Value::Word(vec![domain.lit(false); bits.len()]),
            Value::Int(_) => Value::Int(BigInt::from(0)),
            Value::Nat(_) => Value::Nat(BigUint::from(0u32)),
            Value::ToNat(bits) => Value::ToNat(vec![domain.lit(false); bits.len()]),
            Value::Vector(elems) => Value::Vector(
                elems
                    .iter()
                    .map(|elem| elem.default_like(domain))
                    .collect::<EvalResult<_>>()?,
            ),
            Value::Unit => Value::Unit,
            Value::Type => Value::Type,
            Value::Pair(a, b) => Value::Pair(Box::new(a.default_like(domain)?), Box::new(b.default_like(domain)?)),
            Value::Record(fields) => Value::Record(
                fields
                    .iter()
                    .map(|(name, field)| Ok((name.clone(), field.default_like(domain)?)))
                    .collect::<EvalResult<_>>()?,
            ),
            other => return Err(EvalError::NoDefaultValue(other.kind())),
        })
    }
}

// ============================================================================
// Mux
// ============================================================================

/// The value that is `t` when `cond` holds and `e` otherwise.
///
/// Both branches must have the same shape. Literal conditions and equal
/// branches short-circuit before any structural work.
pub fn mux<D: Domain>(domain: &D, cond: &D::Bool, t: Value<D>, e: Value<D>) -> EvalResult<Value<D>> {
    match domain.as_lit(cond) {
        Some(true) => return Ok(t),
        Some(false) => return Ok(e),
        None => {}
    }
    if t == e {
        return Ok(t);
    }

    let mux_bits = |a: Vec<D::Bool>, b: Vec<D::Bool>| -> Vec<D::Bool> {
        a.iter().zip(&b).map(|(x, y)| domain.mux(cond, x, y)).collect()
    };

    match (t, e) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(domain.mux(cond, &a, &b))),
        (Value::Word(a), Value::Word(b)) if a.len() == b.len() => Ok(Value::Word(mux_bits(a, b))),
        (Value::ToNat(a), Value::ToNat(b)) => {
            let width = a.len().max(b.len());
            Ok(Value::ToNat(mux_bits(
                zero_extend(domain, a, width),
                zero_extend(domain, b, width),
            )))
        }
        (Value::ToNat(bits), Value::Nat(n)) => {
            let width = bits.len().max(n.bits() as usize);
            let n = nat_bits(domain, &n, width);
            Ok(Value::ToNat(mux_bits(zero_extend(domain, bits, width), n)))
        }
        (Value::Nat(n), Value::ToNat(bits)) => {
            let width = bits.len().max(n.bits() as usize);
            let n = nat_bits(domain, &n, width);
            Ok(Value::ToNat(mux_bits(n, zero_extend(domain, bits, width))))
        }
        (Value::Int(a), Value::Int(b)) => Err(EvalError::MuxMismatch(format!("distinct integers {} and {}", a, b))),
        (Value::Nat(a), Value::Nat(b)) => Err(EvalError::MuxMismatch(format!("distinct naturals {} and {}", a, b))),
        (Value::String(a), Value::String(b)) => Err(EvalError::MuxMismatch(format!("distinct strings {:?} and {:?}", a, b))),
        (Value::Vector(a), Value::Vector(b)) if a.len() == b.len() => Ok(Value::Vector(
            a.into_iter()
                .zip(b)
                .map(|(x, y)| mux(domain, cond, x, y))
                .collect::<EvalResult<_>>()?,
        )),
        (Value::Pair(a1, a2), Value::Pair(b1, b2)) => Ok(Value::Pair(
            Box::new(mux(domain, cond, *a1, *b1)?),
            Box::new(mux(domain, cond, *a2, *b2)?),
        )),
        (Value::Record(a), Value::Record(b)) if a.keys().eq(b.keys()) => Ok(Value::Record(
            a.into_iter()
                .zip(b.into_values())
                .map(|((name, x), y)| Ok((name, mux(domain, cond, x, y)?)))
                .collect::<EvalResult<_>>()?,
        )),
        (Value::Ctor { ident: a, args: a_args }, Value::Ctor { ident: b, args: b_args }) => {
            if a != b || a_args.len() != b_args.len() {
                return Err(EvalError::MuxMismatch(format!("constructors {} and {}", a, b)));
            }
            Ok(Value::Ctor {
                ident: a,
                args: a_args
                    .into_iter()
                    .zip(b_args)
                    .map(|(x, y)| mux(domain, cond, x, y))
                    .collect::<EvalResult<_>>()?,
            })
        }
        (t @ Value::Fun(_), e @ Value::Fun(_)) => Ok(Value::Fun(FunValue::Mux {
            cond: cond.clone(),
            then_fun: Box::new(t),
            else_fun: Box::new(e),
        })),
        (Value::Extra(Extra::Stream(a)), Value::Extra(Extra::Stream(b))) => {
            Ok(Value::Extra(Extra::Stream(Rc::new(Stream::muxed(cond.clone(), a, b)))))
        }
        (a, b) => Err(EvalError::MuxMismatch(format!(
            "{} of shape {} with {} of shape {}",
            a.kind(),
            shape_hint(&a),
            b.kind(),
            shape_hint(&b)
        ))),
    }
}

fn shape_hint<D: Domain>(value: &Value<D>) -> String {
    match value {
        Value::Word(bits) => format!("[{}]", bits.len()),
        Value::Vector(elems) => format!("[{}]", elems.len()),
        Value::Record(fields) => format!("{{{}}}", fields.keys().cloned().collect::<Vec<_>>().join(", ")),
        _ => "-".to_string(),
    }
}

/// Pad a word with leading zeros up to `width` bits
pub fn zero_extend<D: Domain>(domain: &D, bits: Vec<D::Bool>, width: usize) -> Vec<D::Bool> {
    if bits.len() >= width {
        return bits;
    }
    let mut extended = vec![domain.lit(false); width - bits.len()];
    extended.extend(bits);
    extended
}

/// The low `width` bits of `n`, most significant first
pub fn nat_bits<D: Domain>(domain: &D, n: &BigUint, width: usize) -> Vec<D::Bool> {
    (0..width).rev().map(|bit| domain.lit(n.bit(bit as u64))).collect()
}

/// The natural number a word denotes, if all of its bits are known
pub fn bits_to_nat<D: Domain>(domain: &D, bits: &[D::Bool]) -> Option<BigUint> {
    bits.iter().try_fold(BigUint::from(0u32), |acc, bit| {
        domain.as_lit(bit).map(|bit| (acc << 1u32) + BigUint::from(bit as u32))
    })
}
