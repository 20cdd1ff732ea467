// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Bit-vector primitives
//!
//! Words are slices of domain booleans, most significant bit first. The
//! circuits are the textbook ones: ripple-carry addition, shift-and-add
//! multiplication, and comparisons read off the carry of a subtraction.

use super::{expect_word, nat_value, register, take, NatValue, PrimTable};
use crate::domain::Domain;
use crate::error::{EvalError, EvalResult};
use crate::eval::Evaluator;
use crate::value::{bits_to_nat, nat_bits, zero_extend, Value};
use num::{BigUint, ToPrimitive, Zero};

// ============================================================================
// Circuits
// ============================================================================

/// `a + b + carry_in`, returning the sum and the carry out of the top bit
pub fn add_with_carry<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool], carry_in: D::Bool) -> (Vec<D::Bool>, D::Bool) {
    let mut carry = carry_in;
    let mut sum = vec![d.lit(false); a.len()];
    for i in (0..a.len()).rev() {
        let half = d.xor(&a[i], &b[i]);
        sum[i] = d.xor(&half, &carry);
        // The two carry terms are never both set
        carry = d.xor(&d.and(&a[i], &b[i]), &d.and(&carry, &half));
    }
    (sum, carry)
}

pub fn add<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> Vec<D::Bool> {
    add_with_carry(d, a, b, d.lit(false)).0
}

pub fn not<D: Domain>(d: &D, a: &[D::Bool]) -> Vec<D::Bool> {
    a.iter().map(|bit| d.not(bit)).collect()
}

pub fn sub<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> Vec<D::Bool> {
    add_with_carry(d, a, &not(d, b), d.lit(true)).0
}

pub fn neg<D: Domain>(d: &D, a: &[D::Bool]) -> Vec<D::Bool> {
    sub(d, &vec![d.lit(false); a.len()], a)
}

pub fn mul<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> Vec<D::Bool> {
    let width = a.len();
    let mut product = vec![d.lit(false); width];
    for weight in 0..width {
        let bit = &b[width - 1 - weight];
        if d.as_lit(bit) == Some(false) {
            continue;
        }
        let partial: Vec<D::Bool> = shift_concrete(d, ShiftKind::Shl, a, weight)
            .iter()
            .map(|x| d.and(x, bit))
            .collect();
        product = add(d, &product, &partial);
    }
    product
}

pub fn and<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> Vec<D::Bool> {
    a.iter().zip(b).map(|(x, y)| d.and(x, y)).collect()
}

pub fn or<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> Vec<D::Bool> {
    a.iter().zip(b).map(|(x, y)| d.or(x, y)).collect()
}

pub fn xor<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> Vec<D::Bool> {
    a.iter().zip(b).map(|(x, y)| d.xor(x, y)).collect()
}

pub fn eq<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> D::Bool {
    a.iter()
        .zip(b)
        .fold(d.lit(true), |acc, (x, y)| d.and(&acc, &d.iff(x, y)))
}

pub fn ult<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> D::Bool {
    // a - b borrows exactly when a < b
    let (_, carry) = add_with_carry(d, a, &not(d, b), d.lit(true));
    d.not(&carry)
}

pub fn ule<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> D::Bool {
    d.not(&ult(d, b, a))
}

pub fn ugt<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> D::Bool {
    ult(d, b, a)
}

pub fn uge<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> D::Bool {
    d.not(&ult(d, a, b))
}

fn flip_sign<D: Domain>(d: &D, a: &[D::Bool]) -> Vec<D::Bool> {
    let mut flipped = a.to_vec();
    if let Some(msb) = flipped.first_mut() {
        *msb = d.not(msb);
    }
    flipped
}

pub fn slt<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> D::Bool {
    ult(d, &flip_sign(d, a), &flip_sign(d, b))
}

pub fn sle<D: Domain>(d: &D, a: &[D::Bool], b: &[D::Bool]) -> D::Bool {
    d.not(&slt(d, b, a))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    Shl,
    Shr,
    SShr,
    RotL,
    RotR,
}

/// Shift or rotate by a known amount
pub fn shift_concrete<D: Domain>(d: &D, kind: ShiftKind, bits: &[D::Bool], amount: usize) -> Vec<D::Bool> {
    let width = bits.len();
    if width == 0 {
        return Vec::new();
    }
    let k = amount.min(width);
    let zero = d.lit(false);
    match kind {
        ShiftKind::Shl => bits[k..].iter().cloned().chain(std::iter::repeat(zero).take(k)).collect(),
        ShiftKind::Shr => std::iter::repeat(zero).take(k).chain(bits[..width - k].iter().cloned()).collect(),
        ShiftKind::SShr => std::iter::repeat(bits[0].clone())
            .take(k)
            .chain(bits[..width - k].iter().cloned())
            .collect(),
        ShiftKind::RotL => {
            let k = amount % width;
            bits[k..].iter().chain(&bits[..k]).cloned().collect()
        }
        ShiftKind::RotR => {
            let k = amount % width;
            bits[width - k..].iter().chain(&bits[..width - k]).cloned().collect()
        }
    }
}

/// Amount as a machine integer; amounts past any width saturate
fn shift_amount(kind: ShiftKind, amount: &BigUint, width: usize) -> usize {
    match kind {
        ShiftKind::RotL | ShiftKind::RotR if width > 0 => (amount % width).to_usize().unwrap_or(0),
        _ => amount.to_usize().unwrap_or(usize::MAX),
    }
}

/// Shift or rotate by a symbolic amount (most significant bit first).
///
/// Each amount bit conditionally applies the shift by its weight, so the
/// circuit is linear in the width of the amount.
pub fn shift_by_symbolic<D: Domain>(d: &D, kind: ShiftKind, bits: &[D::Bool], amount: &[D::Bool]) -> Vec<D::Bool> {
    let width = bits.len();
    amount.iter().enumerate().fold(bits.to_vec(), |acc, (i, bit)| {
        let weight = BigUint::from(1u32) << (amount.len() - 1 - i);
        let shifted = shift_concrete(d, kind, &acc, shift_amount(kind, &weight, width));
        acc.iter().zip(&shifted).map(|(kept, moved)| d.mux(bit, moved, kept)).collect()
    })
}

// ============================================================================
// Primitives
// ============================================================================

fn check_widths<B>(op: &str, a: &[B], b: &[B]) -> EvalResult<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(EvalError::TypeMismatch {
            op: op.to_string(),
            expected: "words of equal width",
            found: "words of different widths",
        })
    }
}

/// `op : (n : Nat) -> Vec n Bool -> Vec n Bool -> Vec n Bool`
macro_rules! word_binop {
    ($name:ident, $op:literal, $circuit:path) => {
        fn $name<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
            let [_, a, b] = take($op, args)?;
            let (a, b) = (expect_word($op, a)?, expect_word($op, b)?);
            check_widths($op, &a, &b)?;
            Ok(Value::Word($circuit(ev.domain(), &a, &b)))
        }
    };
}

/// `op : (n : Nat) -> Vec n Bool -> Vec n Bool -> Bool`
macro_rules! word_cmp {
    ($name:ident, $op:literal, $circuit:path) => {
        fn $name<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
            let [_, a, b] = take($op, args)?;
            let (a, b) = (expect_word($op, a)?, expect_word($op, b)?);
            check_widths($op, &a, &b)?;
            Ok(Value::Bool($circuit(ev.domain(), &a, &b)))
        }
    };
}

/// `op : (n : Nat) -> Vec n Bool -> Nat -> Vec n Bool`
macro_rules! word_shift {
    ($name:ident, $op:literal, $kind:expr) => {
        fn $name<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
            let [_, x, amount] = take($op, args)?;
            let x = expect_word($op, x)?;
            let d = ev.domain();
            Ok(Value::Word(match nat_value(d, $op, amount)? {
                NatValue::Concrete(n) => shift_concrete(d, $kind, &x, shift_amount($kind, &n, x.len())),
                NatValue::Symbolic(bits) => shift_by_symbolic(d, $kind, &x, &bits),
            }))
        }
    };
}

word_binop!(bv_add, "bvAdd", add);
word_binop!(bv_sub, "bvSub", sub);
word_binop!(bv_mul, "bvMul", mul);
word_binop!(bv_and, "bvAnd", and);
word_binop!(bv_or, "bvOr", or);
word_binop!(bv_xor, "bvXor", xor);

word_cmp!(bv_eq, "bvEq", eq);
word_cmp!(bv_ult, "bvult", ult);
word_cmp!(bv_ule, "bvule", ule);
word_cmp!(bv_ugt, "bvugt", ugt);
word_cmp!(bv_uge, "bvuge", uge);
word_cmp!(bv_slt, "bvslt", slt);
word_cmp!(bv_sle, "bvsle", sle);

word_shift!(bv_shl, "bvShl", ShiftKind::Shl);
word_shift!(bv_shr, "bvShr", ShiftKind::Shr);
word_shift!(bv_sshr, "bvSShr", ShiftKind::SShr);
word_shift!(bv_rotate_l, "bvRotateL", ShiftKind::RotL);
word_shift!(bv_rotate_r, "bvRotateR", ShiftKind::RotR);

fn bv_neg<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [_, a] = take("bvNeg", args)?;
    let a = expect_word("bvNeg", a)?;
    Ok(Value::Word(neg(ev.domain(), &a)))
}

fn bv_not<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [_, a] = take("bvNot", args)?;
    let a = expect_word("bvNot", a)?;
    Ok(Value::Word(not(ev.domain(), &a)))
}

/// Division needs both operands known; dividing by zero follows SMT-LIB
fn concrete_division<D: Domain>(
    ev: &mut Evaluator<'_, D>,
    op: &str,
    args: Vec<Value<D>>,
    f: fn(&BigUint, &BigUint, usize) -> BigUint,
) -> EvalResult<Value<D>> {
    let [_, a, b] = take(op, args)?;
    let (a, b) = (expect_word(op, a)?, expect_word(op, b)?);
    check_widths(op, &a, &b)?;
    let d = ev.domain();
    match (bits_to_nat(d, &a), bits_to_nat(d, &b)) {
        (Some(x), Some(y)) => Ok(Value::Word(nat_bits(d, &f(&x, &y, a.len()), a.len()))),
        _ => Err(EvalError::Unsupported(format!("`{}` on symbolic operands", op))),
    }
}

fn bv_udiv<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    concrete_division(ev, "bvUDiv", args, |a, b, width| {
        if b.is_zero() {
            (BigUint::from(1u32) << width) - 1u32
        } else {
            a / b
        }
    })
}

fn bv_urem<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    concrete_division(ev, "bvURem", args, |a, b, _| if b.is_zero() { a.clone() } else { a % b })
}

/// `bvNat : (n : Nat) -> Nat -> Vec n Bool`, keeping the low `n` bits
fn bv_nat<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [width, x] = take("bvNat", args)?;
    let d = ev.domain();
    let width = match nat_value(d, "bvNat", width)? {
        NatValue::Concrete(n) => n
            .to_usize()
            .ok_or_else(|| EvalError::Unsupported(format!("word width {}", n)))?,
        NatValue::Symbolic(_) => return Err(EvalError::Unsupported("symbolic word width".to_string())),
    };
    Ok(Value::Word(match nat_value(d, "bvNat", x)? {
        NatValue::Concrete(n) => nat_bits(d, &n, width),
        NatValue::Symbolic(bits) => {
            let bits = zero_extend(d, bits, width);
            bits[bits.len() - width..].to_vec()
        }
    }))
}

fn bv_to_nat<D: Domain>(ev: &mut Evaluator<'_, D>, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
    let [_, x] = take("bvToNat", args)?;
    let bits = expect_word("bvToNat", x)?;
    Ok(match bits_to_nat(ev.domain(), &bits) {
        Some(n) => Value::Nat(n),
        None => Value::ToNat(bits),
    })
}

pub(super) fn register_word_ops<D: Domain>(table: &mut PrimTable<D>) {
    register(table, "bvNat", 2, bv_nat);
    register(table, "bvToNat", 2, bv_to_nat);

    register(table, "bvAdd", 3, bv_add);
    register(table, "bvSub", 3, bv_sub);
    register(table, "bvMul", 3, bv_mul);
    register(table, "bvUDiv", 3, bv_udiv);
    register(table, "bvURem", 3, bv_urem);
    register(table, "bvNeg", 2, bv_neg);

    register(table, "bvAnd", 3, bv_and);
    register(table, "bvOr", 3, bv_or);
    register(table, "bvXor", 3, bv_xor);
    register(table, "bvNot", 2, bv_not);

    register(table, "bvEq", 3, bv_eq);
    register(table, "bvult", 3, bv_ult);
    register(table, "bvule", 3, bv_ule);
    register(table, "bvugt", 3, bv_ugt);
    register(table, "bvuge", 3, bv_uge);
    register(table, "bvslt", 3, bv_slt);
    register(table, "bvsle", 3, bv_sle);

    register(table, "bvShl", 3, bv_shl);
    register(table, "bvShr", 3, bv_shr);
    register(table, "bvSShr", 3, bv_sshr);
    register(table, "bvRotateL", 3, bv_rotate_l);
    register(table, "bvRotateR", 3, bv_rotate_r);
}
