// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Symbolic Evaluator
//!
//! Evaluates shared terms to values whose booleans live in a pluggable
//! `Domain`. With `AnfDomain` every boolean is a canonical formula over input
//! variables, which turns evaluation into bit-blasting; with `ConcreteDomain`
//! the same machinery is an ordinary interpreter.

pub mod anf;
pub mod bitblast;
pub mod domain;
pub mod error;
pub mod eval;
pub mod prims;
pub mod stream;
pub mod value;

pub use anf::{Anf, AnfDomain};
pub use bitblast::{bitblast, bitblast_anf, shape_of, BitBlastResult, Shape};
pub use domain::{ConcreteDomain, Domain};
pub use error::{EvalError, EvalResult};
pub use eval::Evaluator;
pub use prims::{default_primitives, PrimFn, PrimTable, Primitive};
pub use stream::{IndexTrie, Stream};
pub use value::{mux, Env, Extra, FunValue, Value};
