// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Default special treatments for the `Prelude` module
//!
//! Booleans, naturals and integers map onto the target's own library. Word
//! operations are provided by the support library under their qualified
//! `Prelude` names, so their definition sites are skipped and uses are kept.

use crate::special::{IdentSpecialTreatment, SpecialTreatmentTable};
use crate::target::ast::Term;
use shared_term::ModuleName;

/// Word primitives defined by the support library
const SUPPORT_WORD_OPS: &[&str] = &[
    "bvAdd", "bvSub", "bvMul", "bvUDiv", "bvURem", "bvNeg", "bvAnd", "bvOr", "bvXor", "bvNot", "bvEq",
    "bvult", "bvule", "bvugt", "bvuge", "bvShl", "bvShr", "bvSShr", "bvRotateL", "bvRotateR", "bvToNat",
];

pub fn default_treatments() -> SpecialTreatmentTable {
    use IdentSpecialTreatment as T;

    let prelude = ModuleName::prelude();
    let table = SpecialTreatmentTable::new().with_module(
        &prelude,
        [
            // Types
            ("Bool", T::maps_to_unqualified("Bool")),
            ("Nat", T::maps_to_unqualified("Nat")),
            ("Integer", T::maps_to_unqualified("Int")),
            ("String", T::maps_to_unqualified("String")),
            // `Vec n a` has its arguments the other way around on the target side
            ("Vec", T::replace_with_macro(2, vector_type)),
            // Booleans
            ("and", T::maps_to("Bool", "and")),
            ("or", T::maps_to("Bool", "or")),
            ("xor", T::maps_to("Bool", "xor")),
            ("not", T::maps_to("Bool", "not")),
            ("boolEq", T::maps_to("Bool", "beq")),
            ("ite", T::maps_to_unqualified("ite").explicit()),
            // Naturals
            ("addNat", T::maps_to("Nat", "add")),
            ("subNat", T::maps_to("Nat", "sub")),
            ("mulNat", T::maps_to("Nat", "mul")),
            ("divNat", T::maps_to("Nat", "div")),
            ("modNat", T::maps_to("Nat", "mod")),
            ("equalNat", T::maps_to("Nat", "beq")),
            ("ltNat", T::maps_to("Nat", "blt")),
            // Integers
            ("intAdd", T::maps_to("Int", "add")),
            ("intSub", T::maps_to("Int", "sub")),
            ("intMul", T::maps_to("Int", "mul")),
            ("intNeg", T::maps_to("Int", "neg")),
            ("natToInt", T::maps_to("Int", "ofNat")),
            // Words
            ("bvNat", T::replace_with_macro(2, |args| Term::app(Term::var("BitVec.ofNat"), args))),
        ],
    );

    SUPPORT_WORD_OPS.iter().fold(table, |table, name| {
        table.with(shared_term::Ident::prelude(*name), T::skip())
    })
}

/// `Vec n a` as `Vector a n`
fn vector_type(mut args: Vec<Term>) -> Term {
    args.reverse();
    Term::app(Term::var("Vector"), args)
}
