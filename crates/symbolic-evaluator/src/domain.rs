// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Boolean value domains
//!
//! The evaluator is generic over the representation of booleans. Everything
//! above single bits (words, arithmetic, mux over compound values) is built
//! from the operations of this trait.

use crate::error::{EvalError, EvalResult};
use std::fmt::Debug;

pub trait Domain: Clone + Debug + PartialEq {
    type Bool: Clone + Debug + PartialEq;

    fn lit(&self, value: bool) -> Self::Bool;

    /// The constant a boolean is known to be, if any
    fn as_lit(&self, value: &Self::Bool) -> Option<bool>;

    fn not(&self, a: &Self::Bool) -> Self::Bool;
    fn and(&self, a: &Self::Bool, b: &Self::Bool) -> Self::Bool;
    fn xor(&self, a: &Self::Bool, b: &Self::Bool) -> Self::Bool;

    /// Input variable number `index`
    fn var(&self, index: u32) -> EvalResult<Self::Bool>;

    fn or(&self, a: &Self::Bool, b: &Self::Bool) -> Self::Bool {
        let both = self.and(a, b);
        let either = self.xor(a, b);
        self.xor(&either, &both)
    }

    fn iff(&self, a: &Self::Bool, b: &Self::Bool) -> Self::Bool {
        self.not(&self.xor(a, b))
    }

    /// `if cond then t else e`
    fn mux(&self, cond: &Self::Bool, t: &Self::Bool, e: &Self::Bool) -> Self::Bool {
        match self.as_lit(cond) {
            Some(true) => t.clone(),
            Some(false) => e.clone(),
            // e ^ (c & (t ^ e))
            None => self.xor(e, &self.and(cond, &self.xor(t, e))),
        }
    }
}

/// Plain booleans; there are no symbolic inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConcreteDomain;

impl Domain for ConcreteDomain {
    type Bool = bool;

    fn lit(&self, value: bool) -> bool {
        value
    }

    fn as_lit(&self, value: &bool) -> Option<bool> {
        Some(*value)
    }

    fn not(&self, a: &bool) -> bool {
        !a
    }

    fn and(&self, a: &bool, b: &bool) -> bool {
        *a && *b
    }

    fn xor(&self, a: &bool, b: &bool) -> bool {
        a != b
    }

    fn or(&self, a: &bool, b: &bool) -> bool {
        *a || *b
    }

    fn var(&self, index: u32) -> EvalResult<bool> {
        Err(EvalError::Unsupported(format!(
            "symbolic input {} in the concrete domain",
            index
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_operations_match_truth_tables() {
        let d = ConcreteDomain;
        for a in [false, true] {
            for b in [false, true] {
                assert_eq!(d.iff(&a, &b), a == b);
                for c in [false, true] {
                    assert_eq!(d.mux(&c, &a, &b), if c { a } else { b });
                }
            }
        }
    }

    #[test]
    fn test_concrete_domain_has_no_inputs() {
        assert!(ConcreteDomain.var(0).is_err());
    }
}
