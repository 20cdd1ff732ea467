// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Algebraic normal form
//!
//! A formula is an XOR of monomials, each monomial an AND of distinct input
//! variables (the empty monomial is the constant 1). The representation is
//! canonical: two formulas are equivalent exactly when they are equal, so
//! equality and literal detection are structural.

use crate::domain::Domain;
use crate::error::EvalResult;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// Sorted, duplicate-free variable indices
type Monomial = Vec<u32>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Anf(Rc<BTreeSet<Monomial>>);

impl Anf {
    pub fn zero() -> Self {
        Anf(Rc::new(BTreeSet::new()))
    }

    pub fn one() -> Self {
        Anf(Rc::new(BTreeSet::from([Monomial::new()])))
    }

    pub fn constant(value: bool) -> Self {
        if value {
            Self::one()
        } else {
            Self::zero()
        }
    }

    pub fn var(index: u32) -> Self {
        Anf(Rc::new(BTreeSet::from([vec![index]])))
    }

    pub fn as_constant(&self) -> Option<bool> {
        match self.0.len() {
            0 => Some(false),
            1 if self.0.contains(&Monomial::new()) => Some(true),
            _ => None,
        }
    }

    pub fn monomials(&self) -> impl Iterator<Item = &[u32]> {
        self.0.iter().map(Vec::as_slice)
    }

    /// Variables the formula depends on, ascending
    pub fn support(&self) -> BTreeSet<u32> {
        self.0.iter().flatten().copied().collect()
    }

    pub fn xor(&self, other: &Anf) -> Anf {
        if other.0.is_empty() {
            return self.clone();
        }
        if self.0.is_empty() {
            return other.clone();
        }
        Anf(Rc::new(self.0.symmetric_difference(&other.0).cloned().collect()))
    }

    pub fn and(&self, other: &Anf) -> Anf {
        match (self.as_constant(), other.as_constant()) {
            (Some(false), _) | (_, Some(false)) => return Anf::zero(),
            (Some(true), _) => return other.clone(),
            (_, Some(true)) => return self.clone(),
            _ => {}
        }
        // Distribute; equal products cancel pairwise
        let mut product = BTreeSet::new();
        for (a, b) in self.0.iter().cartesian_product(other.0.iter()) {
            let monomial: Monomial = a.iter().merge(b.iter()).dedup().copied().collect();
            if !product.insert(monomial.clone()) {
                product.remove(&monomial);
            }
        }
        Anf(Rc::new(product))
    }

    pub fn not(&self) -> Anf {
        self.xor(&Anf::one())
    }

    /// Value of the formula under an assignment of its variables
    pub fn eval<F>(&self, assignment: F) -> bool
    where
        F: Fn(u32) -> bool,
    {
        self.0
            .iter()
            .filter(|monomial| monomial.iter().all(|&var| assignment(var)))
            .count()
            % 2
            == 1
    }
}

impl Display for Anf {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "0");
        }
        let terms = self.0.iter().map(|monomial| {
            if monomial.is_empty() {
                "1".to_string()
            } else {
                monomial.iter().map(|var| format!("x{}", var)).join("*")
            }
        });
        write!(f, "{}", terms.format(" ^ "))
    }
}

/// Boolean formulas in algebraic normal form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnfDomain;

impl Domain for AnfDomain {
    type Bool = Anf;

    fn lit(&self, value: bool) -> Anf {
        Anf::constant(value)
    }

    fn as_lit(&self, value: &Anf) -> Option<bool> {
        value.as_constant()
    }

    fn not(&self, a: &Anf) -> Anf {
        a.not()
    }

    fn and(&self, a: &Anf, b: &Anf) -> Anf {
        a.and(b)
    }

    fn xor(&self, a: &Anf, b: &Anf) -> Anf {
        a.xor(b)
    }

    fn var(&self, index: u32) -> EvalResult<Anf> {
        Ok(Anf::var(index))
    }
}
