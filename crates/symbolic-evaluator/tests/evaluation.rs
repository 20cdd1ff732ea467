// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use num::{BigInt, BigUint};
use shared_term::{Ident, TermStore};
use std::cell::Cell;
use symbolic_evaluator::{
    bitblast_anf, Anf, AnfDomain, ConcreteDomain, Domain, EvalError, EvalResult, Evaluator, Value,
};

fn nat<D: Domain>(n: u32) -> Value<D> {
    Value::Nat(BigUint::from(n))
}

fn bits_of(value: u32, width: usize) -> Vec<bool> {
    (0..width).rev().map(|bit| (value >> bit) & 1 == 1).collect()
}

// ============================================================================
// Mux
// ============================================================================

#[test]
fn test_ite_over_words_muxes_pointwise() {
    let mut store = TermStore::new();
    let bool_ty = store.bool_type();
    let word = store.word_type(3);
    let c = store.variable("c", bool_ty);
    let x = store.variable("x", word);
    let y = store.variable("y", word);
    let term = store.apply_prelude("ite", [word, c, x, y]);

    let result = bitblast_anf(&store, term, word, []).unwrap();
    let names: Vec<_> = result.inputs.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["c", "x", "y"]);

    let cond = Anf::var(0);
    let expected: Vec<Anf> = (0..3)
        .map(|i| AnfDomain.mux(&cond, &Anf::var(1 + i), &Anf::var(4 + i)))
        .collect();
    assert_eq!(result.output_bits().unwrap(), expected);
}

#[test]
fn test_ite_over_literal_words_yields_condition() {
    let mut store = TermStore::new();
    let bool_ty = store.bool_type();
    let word = store.word_type(3);
    let c = store.variable("c", bool_ty);
    let ones = store.bv_lit(3, 0b111);
    let zeros = store.bv_lit(3, 0);
    let term = store.apply_prelude("ite", [word, c, ones, zeros]);

    let result = bitblast_anf(&store, term, word, []).unwrap();
    assert_eq!(result.output_bits().unwrap(), vec![Anf::var(0); 3]);
}

#[test]
fn test_ite_with_equal_branches_needs_no_merge() {
    let mut store = TermStore::new();
    let bool_ty = store.bool_type();
    let int_ty = store.prelude("Integer");
    let c = store.variable("c", bool_ty);
    let three = store.nat(3u32);
    let four = store.nat(4u32);
    let int3 = store.apply_prelude("natToInt", [three]);
    let int4 = store.apply_prelude("natToInt", [four]);
    let same = store.apply_prelude("ite", [int_ty, c, int3, int3]);
    let different = store.apply_prelude("ite", [int_ty, c, int3, int4]);

    let mut ev = Evaluator::new(&store, AnfDomain);
    ev.bind_variable(c, Value::Bool(Anf::var(0)));
    assert_eq!(ev.evaluate(same).unwrap(), Value::Int(BigInt::from(3)));
    assert!(matches!(ev.evaluate(different), Err(EvalError::MuxMismatch(_))));
}

#[test]
fn test_muxed_functions_apply_both_sides() {
    let mut store = TermStore::new();
    let bool_ty = store.bool_type();
    let word = store.word_type(2);
    let width = store.nat(2u32);
    let c = store.variable("c", bool_ty);
    let w = store.local(0);
    let negated = store.apply_prelude("bvNot", [width, w]);
    let f = store.lambda("w", word, negated);
    let g = store.lambda("w", word, w);
    let fun_ty = store.arrow(word, word);
    let chosen = store.apply_prelude("ite", [fun_ty, c, f, g]);
    let two = store.bv_lit(2, 2);
    let term = store.app(chosen, two);

    let result = bitblast_anf(&store, term, word, []).unwrap();
    assert_eq!(result.output_bits().unwrap(), vec![Anf::var(0).not(), Anf::var(0)]);
}

// ============================================================================
// Words
// ============================================================================

#[test]
fn test_bitblasted_adder_agrees_with_addition() {
    let mut store = TermStore::new();
    let word = store.word_type(4);
    let width = store.nat(4u32);
    let x = store.local(1);
    let y = store.local(0);
    let sum = store.apply_prelude("bvAdd", [width, x, y]);
    let inner = store.lambda("y", word, sum);
    let term = store.lambda("x", word, inner);
    let word_to_word = store.arrow(word, word);
    let ty = store.arrow(word, word_to_word);

    let result = bitblast_anf(&store, term, ty, []).unwrap();
    let names: Vec<_> = result.inputs.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["arg0", "arg1"]);
    let circuit = result.output_bits().unwrap();
    for a in 0..16u32 {
        for b in 0..16u32 {
            let inputs = [bits_of(a, 4), bits_of(b, 4)].concat();
            let actual: Vec<bool> = circuit.iter().map(|f| f.eval(|var| inputs[var as usize])).collect();
            assert_eq!(actual, bits_of((a + b) % 16, 4));
        }
    }
}

#[test]
fn test_shift_by_symbolic_amount_through_terms() {
    let mut store = TermStore::new();
    let word = store.word_type(4);
    let amount_word = store.word_type(2);
    let width = store.nat(4u32);
    let amount_width = store.nat(2u32);
    let x = store.variable("x", word);
    let k = store.variable("k", amount_word);
    let amount = store.apply_prelude("bvToNat", [amount_width, k]);
    let term = store.apply_prelude("bvShl", [width, x, amount]);

    let result = bitblast_anf(&store, term, word, []).unwrap();
    let circuit = result.output_bits().unwrap();
    for value in 0..16u32 {
        for shift in 0..4u32 {
            let inputs = [bits_of(value, 4), bits_of(shift, 2)].concat();
            let actual: Vec<bool> = circuit.iter().map(|f| f.eval(|var| inputs[var as usize])).collect();
            assert_eq!(actual, bits_of((value << shift) % 16, 4), "{} << {}", value, shift);
        }
    }
}

// ============================================================================
// Vectors and streams
// ============================================================================

#[test]
fn test_generated_vector_lookup() {
    let mut store = TermStore::new();
    let nat_ty = store.nat_type();
    let three = store.nat(3u32);
    let i = store.local(0);
    let square = store.apply_prelude("mulNat", [i, i]);
    let f = store.lambda("i", nat_ty, square);
    let v = store.apply_prelude("gen", [three, nat_ty, f]);
    let two = store.nat(2u32);
    let term = store.apply_prelude("at", [three, nat_ty, v, two]);

    let result = Evaluator::new(&store, ConcreteDomain).evaluate(term).unwrap();
    assert_eq!(result, nat(4));
}

thread_local! {
    static GENERATOR_CALLS: Cell<usize> = const { Cell::new(0) };
}

fn counting_square(_: &mut Evaluator<'_, ConcreteDomain>, args: Vec<Value<ConcreteDomain>>) -> EvalResult<Value<ConcreteDomain>> {
    GENERATOR_CALLS.with(|calls| calls.set(calls.get() + 1));
    match args.as_slice() {
        [Value::Nat(n)] => Ok(Value::Nat(n * n)),
        _ => Err(EvalError::Unsupported("countingSquare".to_string())),
    }
}

#[test]
fn test_stream_elements_are_computed_once() {
    let mut store = TermStore::new();
    let nat_ty = store.nat_type();
    let generator = store.prelude("countingSquare");
    let stream = store.apply_prelude("MkStream", [nat_ty, generator]);
    let three = store.nat(3u32);
    let one = store.nat(1u32);
    let two = store.nat(2u32);
    let also_three = store.apply_prelude("addNat", [one, two]);
    let first = store.apply_prelude("streamGet", [nat_ty, stream, three]);
    let second = store.apply_prelude("streamGet", [nat_ty, stream, also_three]);
    let term = store.apply_prelude("addNat", [first, second]);

    GENERATOR_CALLS.with(|calls| calls.set(0));
    let mut ev = Evaluator::new(&store, ConcreteDomain);
    ev.register_primitive(Ident::prelude("countingSquare"), 1, counting_square);
    assert_eq!(ev.evaluate(term).unwrap(), nat(18));
    assert_eq!(GENERATOR_CALLS.with(Cell::get), 1);
}

#[test]
fn test_stream_lookup_at_symbolic_index() {
    let mut store = TermStore::new();
    let bool_ty = store.bool_type();
    let nat_ty = store.nat_type();
    let index_word = store.word_type(2);
    let n = store.local(0);
    let two = store.nat(2u32);
    let is_two = store.apply_prelude("equalNat", [n, two]);
    let generator = store.lambda("n", nat_ty, is_two);
    let stream = store.apply_prelude("MkStream", [bool_ty, generator]);
    let k = store.variable("k", index_word);
    let index = store.apply_prelude("bvToNat", [two, k]);
    let term = store.apply_prelude("streamGet", [bool_ty, stream, index]);

    let result = bitblast_anf(&store, term, bool_ty, []).unwrap();
    // k == 0b10
    assert_eq!(result.output_bits().unwrap(), vec![Anf::var(0).and(&Anf::var(1).not())]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unbound_free_variable() {
    let mut store = TermStore::new();
    let nat_ty = store.nat_type();
    let x = store.variable("x", nat_ty);
    let one = store.nat(1u32);
    let term = store.apply_prelude("addNat", [x, one]);
    let err = Evaluator::new(&store, ConcreteDomain).evaluate(term).unwrap_err();
    assert_eq!(err, EvalError::UnboundVariable("x".to_string()));
}

#[test]
fn test_symbolic_inputs_need_a_symbolic_domain() {
    let mut store = TermStore::new();
    let bool_ty = store.bool_type();
    let c = store.variable("c", bool_ty);
    let mut ev = Evaluator::new(&store, ConcreteDomain);
    let err = symbolic_evaluator::bitblast(&mut ev, c, bool_ty).unwrap_err();
    assert!(matches!(err, EvalError::Unsupported(_)));
}
