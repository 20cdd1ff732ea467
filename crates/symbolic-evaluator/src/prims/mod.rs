// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Primitive table
//!
//! Every primitive has a fixed arity. The evaluator accumulates arguments in a
//! partial application and calls the implementation once all have arrived;
//! type arguments are passed along as `Value::Type`.

pub mod word;

use crate::domain::Domain;
use crate::error::{EvalError, EvalResult};
use crate::eval::Evaluator;
use crate::stream::Stream;
use crate::value::{bits_to_nat, mux, nat_bits, zero_extend, Extra, Value};
use num::{BigInt, BigUint, Signed, ToPrimitive, Zero};
use shared_term::Ident;
use std::collections::BTreeMap;
use std::rc::Rc;

pub type PrimFn<D> = fn(&mut Evaluator<'_, D>, Vec<Value<D>>) -> EvalResult<Value<D>>;

pub struct Primitive<D: Domain> {
    pub arity: usize,
    pub imp: PrimFn<D>,
}

impl<D: Domain> Clone for Primitive<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Domain> Copy for Primitive<D> {}

pub type PrimTable<D> = BTreeMap<Ident, Primitive<D>>;

pub(crate) fn register<D: Domain>(table: &mut PrimTable<D>, name: &str, arity: usize, imp: PrimFn<D>) {
    table.insert(Ident::prelude(name), Primitive { arity, imp });
}

/// Implementations of the Prelude primitives
pub fn default_primitives<D: Domain>() -> PrimTable<D> {
    let mut table = BTreeMap::new();

    // Types are erased
    for name in ["Bool", "Nat", "Integer", "String"] {
        register(&mut table, name, 0, erased_type);
    }
    register(&mut table, "Vec", 2, erased_type);
    register(&mut table, "Stream", 1, erased_type);

    register(&mut table, "not", 1, bool_not);
    register(&mut table, "and", 2, bool_and);
    register(&mut table, "or", 2, bool_or);
    register(&mut table, "xor", 2, bool_xor);
    register(&mut table, "boolEq", 2, bool_eq);
    register(&mut table, "implies", 2, bool_implies);
    register(&mut table, "ite", 4, ite);
    register(&mut table, "error", 2, error);

    register(&mut table, "succ", 1, nat_succ);
    register(&mut table, "addNat", 2, nat_add);
    register(&mut table, "subNat", 2, nat_sub);
    register(&mut table, "mulNat", 2, nat_mul);
    register(&mut table, "divNat", 2, nat_div);
    register(&mut table, "modNat", 2, nat_mod);
    register(&mut table, "equalNat", 2, nat_eq);
    register(&mut table, "ltNat", 2, nat_lt);

    register(&mut table, "intAdd", 2, int_add);
    register(&mut table, "intSub", 2, int_sub);
    register(&mut table, "intMul", 2, int_mul);
    register(&mut table, "intNeg", 1, int_neg);
    register(&mut table, "intEq", 2, int_eq);
    register(&mut table, "intLe", 2, int_le);
    register(&mut table, "intLt", 2, int_lt);
    register(&mut table, "natToInt", 1, nat_to_int);
    register(&mut table, "intToNat", 1, int_to_nat);

    register(&mut table, "gen", 3, vec_gen);
    register(&mut table, "at", 4, vec_at);
    register(&mut table, "append", 5, vec_append);

    register(&mut table, "MkStream", 2, stream_make);
    register(&mut table, "streamGet", 3, stream_get);

    word::register_word_ops(&mut table);
    table
}

// ============================================================================
// Argument helpers
// ============================================================================

pub(crate) fn take<D: Domain, const N: usize>(op: &str, args: Vec<Value<D>>) -> EvalResult<[Value<D>; N]> {
    let len = args.len();
    args.try_into()
        .map_err(|_| EvalError::Unsupported(format!("`{}` applied to {} arguments", op, len)))
}

fn mismatch<D: Domain>(op: &str, expected: &'static str, found: &Value<D>) -> EvalError {
    EvalError::TypeMismatch {
        op: op.to_string(),
        expected,
        found: found.kind(),
    }
}

pub(crate) fn expect_bool<D: Domain>(op: &str, value: Value<D>) -> EvalResult<D::Bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(mismatch(op, "bool", &other)),
    }
}

pub(crate) fn expect_word<D: Domain>(op: &str, value: Value<D>) -> EvalResult<Vec<D::Bool>> {
    match value {
        Value::Word(bits) => Ok(bits),
        Value::Vector(elems) if elems.is_empty() => Ok(Vec::new()),
        other => Err(mismatch(op, "word", &other)),
    }
}

pub(crate) fn expect_int<D: Domain>(op: &str, value: Value<D>) -> EvalResult<BigInt> {
    match value {
        Value::Int(i) => Ok(i),
        other => Err(mismatch(op, "integer", &other)),
    }
}

pub(crate) fn expect_string<D: Domain>(op: &str, value: Value<D>) -> EvalResult<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(mismatch(op, "string", &other)),
    }
}

/// A natural number that may only be known as a word
pub(crate) enum NatValue<B> {
    Concrete(BigUint),
    Symbolic(Vec<B>),
}

pub(crate) fn nat_value<D: Domain>(domain: &D, op: &str, value: Value<D>) -> EvalResult<NatValue<D::Bool>> {
    match value {
        Value::Nat(n) => Ok(NatValue::Concrete(n)),
        Value::ToNat(bits) => Ok(match bits_to_nat(domain, &bits) {
            Some(n) => NatValue::Concrete(n),
            None => NatValue::Symbolic(bits),
        }),
        other => Err(mismatch(op, "natural", &other)),
    }
}

fn expect_concrete_nat<D: Domain>(domain: &D, op: &str, value: Value<D>) -> EvalResult<BigUint> {
    match nat_value(domain, op, value)? {
        NatValue::Concrete(n) => Ok(n),
        NatValue::Symbolic(_) => Err(EvalError::Unsupported(format!("`{}` on a symbolic natural", op))),
    }
}

/// Both operands as words of a common width, with `extra` bits of headroom
fn common_words<D: Domain>(domain: &D, a: NatValue<D::Bool>, b: NatValue<D::Bool>, extra: usize) -> (Vec<D::Bool>, Vec<D::Bool>) {
    let width_of = |n: &NatValue<D::Bool>| match n {
        NatValue::Concrete(n) => n.bits() as usize,
        NatValue::Symbolic(bits) => bits.len(),
    };
    let width = width_of(&a).max(width_of(&b)) + extra;
    let to_word = |n: NatValue<D::Bool>| match n {
        NatValue::Concrete(n) => nat_bits(domain, &n, width),
        NatValue::Symbolic(bits) => zero_extend(domain, bits, width),
    };
    (to_word(a), to_word(b))
}

// ============================================================================
// Types, booleans and control
// ============================================================================

fn erased_type<D: Domain>(_: &mut Evaluator<'_, D>, _: Vec<Value<D>>) -> EvalResult<Value<D>> {
    Ok(Value::Type)
}

fn bool_not<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [a] = take("not", args)?;
    let a = expect_bool("not", a)?;
    Ok(Value::Bool(ev.domain().not(&a)))
}

macro_rules! bool_binop {
    ($name:ident, $op:literal, |$d:ident, $a:ident, $b:ident| $body:expr) => {
        fn $name<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
            let [a, b] = take($op, args)?;
            let ($a, $b) = (expect_bool($op, a)?, expect_bool($op, b)?);
            let $d = ev.domain();
            Ok(Value::Bool($body))
        }
    };
}

bool_binop!(bool_and, "and", |d, a, b| d.and(&a, &b));
bool_binop!(bool_or, "or", |d, a, b| d.or(&a, &b));
bool_binop!(bool_xor, "xor", |d, a, b| d.xor(&a, &b));
bool_binop!(bool_eq, "boolEq", |d, a, b| d.iff(&a, &b));
bool_binop!(bool_implies, "implies", |d, a, b| d.or(&d.not(&a), &b));

/// `ite : (a : sort 0) -> Bool -> a -> a -> a`
fn ite<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [_, cond, t, e] = take("ite", args)?;
    let cond = expect_bool("ite", cond)?;
    mux(ev.domain(), &cond, t, e)
}

fn error<D: Domain>(_: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [_, message] = take("error", args)?;
    Err(EvalError::UserError(expect_string("error", message)?))
}

// ============================================================================
// Naturals
// ============================================================================

fn nat_succ<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [a] = take("succ", args)?;
    let d = ev.domain();
    Ok(match nat_value(d, "succ", a)? {
        NatValue::Concrete(n) => Value::Nat(n + 1u32),
        symbolic => {
            let one = NatValue::Concrete(BigUint::from(1u32));
            let (a, b) = common_words(d, symbolic, one, 1);
            Value::ToNat(word::add(d, &a, &b))
        }
    })
}

/// Naturals with both operands known use `concrete`; otherwise the operands
/// become words and go through `symbolic`
fn nat_binop<D: Domain>(
    ev: &mut Evaluator<'_, D>,
    op: &str,
    args: Vec<Value<D>>,
    concrete: fn(&D, BigUint, BigUint) -> EvalResult<Value<D>>,
    symbolic: fn(&D, &[D::Bool], &[D::Bool]) -> EvalResult<Value<D>>,
    headroom: fn(usize) -> usize,
) -> EvalResult<Value<D>> {
    let [a, b] = take(op, args)?;
    let d = ev.domain();
    match (nat_value(d, op, a)?, nat_value(d, op, b)?) {
        (NatValue::Concrete(a), NatValue::Concrete(b)) => concrete(d, a, b),
        (a, b) => {
            let width = |n: &NatValue<D::Bool>| match n {
                NatValue::Concrete(n) => n.bits() as usize,
                NatValue::Symbolic(bits) => bits.len(),
            };
            let extra = headroom(width(&a).max(width(&b)));
            let (a, b) = common_words(d, a, b, extra);
            symbolic(d, &a, &b)
        }
    }
}

fn no_headroom(_: usize) -> usize {
    0
}

fn nat_add<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    nat_binop(
        ev,
        "addNat",
        args,
        |_, a, b| Ok(Value::Nat(a + b)),
        |d, a, b| Ok(Value::ToNat(word::add(d, a, b))),
        |_| 1,
    )
}

/// Truncated subtraction
fn nat_sub<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    nat_binop(
        ev,
        "subNat",
        args,
        |_, a, b| Ok(Value::Nat(if a > b { a - b } else { BigUint::zero() })),
        |d, a, b| {
            let underflow = word::ult(d, a, b);
            let zero = d.lit(false);
            let diff = word::sub(d, a, b).iter().map(|bit| d.mux(&underflow, &zero, bit)).collect();
            Ok(Value::ToNat(diff))
        },
        no_headroom,
    )
}

fn nat_mul<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    nat_binop(
        ev,
        "mulNat",
        args,
        |_, a, b| Ok(Value::Nat(a * b)),
        |d, a, b| Ok(Value::ToNat(word::mul(d, a, b))),
        |width| width,
    )
}

fn nat_div<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    nat_binop(
        ev,
        "divNat",
        args,
        |_, a, b| {
            if b.is_zero() {
                Err(EvalError::UserError("division by zero".to_string()))
            } else {
                Ok(Value::Nat(a / b))
            }
        },
        |_, _, _| Err(EvalError::Unsupported("`divNat` on a symbolic natural".to_string())),
        no_headroom,
    )
}

fn nat_mod<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    nat_binop(
        ev,
        "modNat",
        args,
        |_, a, b| {
            if b.is_zero() {
                Err(EvalError::UserError("division by zero".to_string()))
            } else {
                Ok(Value::Nat(a % b))
            }
        },
        |_, _, _| Err(EvalError::Unsupported("`modNat` on a symbolic natural".to_string())),
        no_headroom,
    )
}

fn nat_eq<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    nat_binop(
        ev,
        "equalNat",
        args,
        |d, a, b| Ok(Value::Bool(d.lit(a == b))),
        |d, a, b| Ok(Value::Bool(word::eq(d, a, b))),
        no_headroom,
    )
}

fn nat_lt<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    nat_binop(
        ev,
        "ltNat",
        args,
        |d, a, b| Ok(Value::Bool(d.lit(a < b))),
        |d, a, b| Ok(Value::Bool(word::ult(d, a, b))),
        no_headroom,
    )
}

// ============================================================================
// Integers
// ============================================================================

macro_rules! int_binop {
    ($name:ident, $op:literal, |$d:ident, $a:ident, $b:ident| $body:expr) => {
        fn $name<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
            let [a, b] = take($op, args)?;
            let ($a, $b) = (expect_int($op, a)?, expect_int($op, b)?);
            #[allow(unused_variables)]
            let $d = ev.domain();
            Ok($body)
        }
    };
}

int_binop!(int_add, "intAdd", |d, a, b| Value::Int(a + b));
int_binop!(int_sub, "intSub", |d, a, b| Value::Int(a - b));
int_binop!(int_mul, "intMul", |d, a, b| Value::Int(a * b));
int_binop!(int_eq, "intEq", |d, a, b| Value::Bool(d.lit(a == b)));
int_binop!(int_le, "intLe", |d, a, b| Value::Bool(d.lit(a <= b)));
int_binop!(int_lt, "intLt", |d, a, b| Value::Bool(d.lit(a < b)));

fn int_neg<D: Domain>(_: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [a] = take("intNeg", args)?;
    Ok(Value::Int(-expect_int("intNeg", a)?))
}

fn nat_to_int<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [a] = take("natToInt", args)?;
    let n = expect_concrete_nat(ev.domain(), "natToInt", a)?;
    Ok(Value::Int(BigInt::from(n)))
}

/// Negative integers map to zero
fn int_to_nat<D: Domain>(_: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [a] = take("intToNat", args)?;
    let i = expect_int("intToNat", a)?;
    Ok(Value::Nat(if i.is_negative() {
        BigUint::zero()
    } else {
        i.magnitude().clone()
    }))
}

// ============================================================================
// Vectors
// ============================================================================

fn concrete_len<D: Domain>(domain: &D, op: &str, value: Value<D>) -> EvalResult<usize> {
    let n = expect_concrete_nat(domain, op, value)?;
    n.to_usize()
        .ok_or_else(|| EvalError::Unsupported(format!("`{}` with length {}", op, n)))
}

/// `gen : (n : Nat) -> (a : sort 0) -> (Nat -> a) -> Vec n a`
fn vec_gen<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [n, _, f] = take("gen", args)?;
    let n = concrete_len(ev.domain(), "gen", n)?;
    let elems = (0..n)
        .map(|i| ev.apply(f.clone(), Value::Nat(BigUint::from(i))))
        .collect::<EvalResult<Vec<_>>>()?;
    Ok(Value::from_elems(elems))
}

/// `at : (n : Nat) -> (a : sort 0) -> Vec n a -> Nat -> a`
///
/// A symbolic index selects through a chain of muxes. Indices past the end
/// yield a default value, so one is built only when the index can reach them.
fn vec_at<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [_, _, v, i] = take("at", args)?;
    let found = v.kind();
    let elems = v.into_elems().ok_or_else(|| EvalError::TypeMismatch {
        op: "at".to_string(),
        expected: "vector",
        found,
    })?;
    let d = ev.domain();
    match nat_value(d, "at", i)? {
        NatValue::Concrete(i) => {
            let len = elems.len();
            i.to_usize()
                .and_then(|index| elems.into_iter().nth(index))
                .ok_or_else(|| EvalError::IndexOutOfBounds {
                    index: i.to_string(),
                    len,
                })
        }
        NatValue::Symbolic(bits) => select(d, elems, &bits),
    }
}

/// `elems[index]` for a symbolic index
fn select<D: Domain>(d: &D, mut elems: Vec<Value<D>>, index: &[D::Bool]) -> EvalResult<Value<D>> {
    let reachable = u32::try_from(index.len())
        .ok()
        .and_then(|width| 1usize.checked_shl(width));
    if let Some(count) = reachable {
        elems.truncate(count);
    }
    let covered = reachable.is_some_and(|count| count == elems.len());
    let tail = if covered { elems.pop() } else { None };
    let mut result = match (tail, elems.first()) {
        (Some(last), _) => last,
        (None, Some(first)) => first.default_like(d)?,
        (None, None) => {
            return Err(EvalError::IndexOutOfBounds {
                index: "symbolic index".to_string(),
                len: 0,
            })
        }
    };
    for (i, elem) in elems.into_iter().enumerate().rev() {
        let hit = word::eq(d, index, &nat_bits(d, &BigUint::from(i), index.len()));
        result = mux(d, &hit, elem, result)?;
    }
    Ok(result)
}

/// `append : (m n : Nat) -> (a : sort 0) -> Vec m a -> Vec n a -> Vec (addNat m n) a`
fn vec_append<D: Domain>(_: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [_, _, _, xs, ys] = take("append", args)?;
    match (xs, ys) {
        (Value::Word(mut a), Value::Word(b)) => {
            a.extend(b);
            Ok(Value::Word(a))
        }
        (xs, ys) => {
            let (xs_kind, ys_kind) = (xs.kind(), ys.kind());
            match (xs.into_elems(), ys.into_elems()) {
                (Some(mut a), Some(b)) => {
                    a.extend(b);
                    Ok(Value::from_elems(a))
                }
                (None, _) => Err(EvalError::TypeMismatch {
                    op: "append".to_string(),
                    expected: "vector",
                    found: xs_kind,
                }),
                (_, None) => Err(EvalError::TypeMismatch {
                    op: "append".to_string(),
                    expected: "vector",
                    found: ys_kind,
                }),
            }
        }
    }
}

// ============================================================================
// Streams
// ============================================================================

/// Widest symbolic stream index that is expanded into a mux chain
const MAX_SYMBOLIC_STREAM_INDEX_WIDTH: usize = 16;

/// `MkStream : (a : sort 0) -> (Nat -> a) -> Stream a`
fn stream_make<D: Domain>(_: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [_, generator] = take("MkStream", args)?;
    Ok(Value::Extra(Extra::Stream(Rc::new(Stream::from_generator(generator)))))
}

/// `streamGet : (a : sort 0) -> Stream a -> Nat -> a`
fn stream_get<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [_, stream, index] = take("streamGet", args)?;
    let stream = match stream {
        Value::Extra(Extra::Stream(stream)) => stream,
        other => return Err(mismatch("streamGet", "stream", &other)),
    };
    let index = nat_value(ev.domain(), "streamGet", index)?;
    match index {
        NatValue::Concrete(i) => stream.get(ev, &i),
        NatValue::Symbolic(bits) => {
            if bits.len() > MAX_SYMBOLIC_STREAM_INDEX_WIDTH {
                return Err(EvalError::Unsupported(format!(
                    "stream index of width {}",
                    bits.len()
                )));
            }
            let count = 1usize << bits.len();
            let elems = (0..count)
                .map(|i| stream.get(ev, &BigUint::from(i)))
                .collect::<EvalResult<Vec<_>>>()?;
            select(ev.domain(), elems, &bits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anf::{Anf, AnfDomain};
    use crate::domain::ConcreteDomain;
    use shared_term::TermStore;

    fn call<D: Domain>(ev: &mut Evaluator<'_, D>, name: &str, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
        let prim = default_primitives::<D>()[&Ident::prelude(name)];
        assert_eq!(prim.arity, args.len());
        (prim.imp)(ev, args)
    }

    fn nat<D: Domain>(n: u32) -> Value<D> {
        Value::Nat(BigUint::from(n))
    }

    #[test]
    fn test_concrete_naturals() {
        let store = TermStore::new();
        let mut ev = Evaluator::new(&store, ConcreteDomain);
        assert_eq!(call(&mut ev, "subNat", vec![nat(3), nat(5)]).unwrap(), nat(0));
        assert_eq!(call(&mut ev, "mulNat", vec![nat(3), nat(5)]).unwrap(), nat(15));
        assert_eq!(call(&mut ev, "ltNat", vec![nat(3), nat(5)]).unwrap(), Value::Bool(true));
        assert_eq!(call(&mut ev, "equalNat", vec![nat(3), nat(5)]).unwrap(), Value::Bool(false));
        assert_eq!(
            call(&mut ev, "divNat", vec![nat(3), nat(0)]),
            Err(EvalError::UserError("division by zero".to_string()))
        );
    }

    #[test]
    fn test_symbolic_natural_comparison() {
        let store = TermStore::new();
        let mut ev = Evaluator::new(&store, AnfDomain);
        // x1 x0 as a two-bit natural
        let x: Value<AnfDomain> = Value::ToNat(vec![Anf::var(1), Anf::var(0)]);
        let lt = call(&mut ev, "ltNat", vec![x.clone(), nat(2)]).unwrap();
        // x < 2 exactly when the high bit is clear
        assert_eq!(lt, Value::Bool(Anf::var(1).not()));
        let eq = call(&mut ev, "equalNat", vec![x, nat(3)]).unwrap();
        assert_eq!(eq, Value::Bool(Anf::var(0).and(&Anf::var(1))));
    }

    #[test]
    fn test_symbolic_index_selects_through_muxes() {
        let store = TermStore::new();
        let mut ev = Evaluator::new(&store, AnfDomain);
        let elems: Vec<Value<AnfDomain>> = (0..3).map(|i| Value::Int(BigInt::from(i))).collect();
        let v = Value::Vector(elems);
        let picked = call(&mut ev, "at", vec![nat(3), Value::Type, v.clone(), Value::ToNat(vec![Anf::zero()])]).unwrap();
        assert_eq!(picked, Value::Int(BigInt::from(0)));
        let bools = Value::Word(vec![Anf::var(1), Anf::var(2)]);
        let picked = call(&mut ev, "at", vec![nat(2), Value::Type, bools, Value::ToNat(vec![Anf::var(0)])]).unwrap();
        assert_eq!(picked, Value::Bool(AnfDomain.mux(&Anf::var(0), &Anf::var(2), &Anf::var(1))));
        // Distinct integers cannot be merged under a symbolic index
        assert!(matches!(
            call(&mut ev, "at", vec![nat(3), Value::Type, v, Value::ToNat(vec![Anf::var(0)])]),
            Err(EvalError::MuxMismatch(_))
        ));
    }

    #[test]
    fn test_index_out_of_bounds() {
        let store = TermStore::new();
        let mut ev = Evaluator::new(&store, ConcreteDomain);
        let v = Value::Word(vec![true, false]);
        assert_eq!(
            call(&mut ev, "at", vec![nat(2), Value::Type, v, nat(2)]),
            Err(EvalError::IndexOutOfBounds {
                index: "2".to_string(),
                len: 2
            })
        );
    }

    #[test]
    fn test_error_reports_message() {
        let store = TermStore::new();
        let mut ev = Evaluator::new(&store, ConcreteDomain);
        assert_eq!(
            call(&mut ev, "error", vec![Value::Type, Value::String("boom".to_string())]),
            Err(EvalError::UserError("boom".to_string()))
        );
    }
}
