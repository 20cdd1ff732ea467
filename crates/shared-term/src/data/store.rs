// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Hash-consing term store
//!
//! Every node is interned: building a node that is structurally identical to an
//! existing one returns the existing ID. The store only ever grows; nodes are
//! never mutated once created.

use super::term::{SortFlags, TermF, TermId};
use super::Ident;
use indexmap::IndexSet;
use num::BigUint;
use std::collections::BTreeSet;

/// Owner of a shared term DAG
#[derive(Debug, Clone, Default)]
pub struct TermStore {
    /// Interned nodes; the position in the set is the node's ID
    nodes: IndexSet<TermF>,

    /// Loose de Bruijn indices of each node, sorted ascending
    loose_vars: Vec<Vec<usize>>,
}

impl TermStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Intern a node, returning the ID of the unique node with this structure.
    ///
    /// Panics if the node refers to an ID not allocated by this store.
    pub fn intern(&mut self, node: TermF) -> TermId {
        if let Some(index) = self.nodes.get_index_of(&node) {
            return TermId(index as u32);
        }

        let loose = self.compute_loose_vars(&node);
        let (index, _) = self.nodes.insert_full(node);
        self.loose_vars.push(loose);
        TermId(index as u32)
    }

    /// Get the node for an ID.
    /// Panics if the ID was not allocated by this store.
    pub fn get(&self, id: TermId) -> &TermF {
        self.nodes
            .get_index(id.index())
            .expect("BUG: TermId not allocated by this TermStore")
    }

    /// Loose de Bruijn indices of a term, ascending
    pub fn loose_vars(&self, id: TermId) -> &[usize] {
        &self.loose_vars[id.index()]
    }

    /// A term is closed when it has no loose bound variables
    pub fn is_closed(&self, id: TermId) -> bool {
        self.loose_vars(id).is_empty()
    }

    /// Whether de Bruijn index `index` occurs loose in the term
    pub fn has_loose_var(&self, id: TermId, index: usize) -> bool {
        self.loose_vars(id).binary_search(&index).is_ok()
    }

    fn compute_loose_vars(&self, node: &TermF) -> Vec<usize> {
        if let TermF::LocalVar(index) = node {
            return vec![*index];
        }
        let mut loose = BTreeSet::new();
        for (child, depth) in node.children_with_depth() {
            assert!(
                child.index() < self.nodes.len(),
                "BUG: node refers to {} which is not in this TermStore",
                child
            );
            loose.extend(
                self.loose_vars[child.index()]
                    .iter()
                    .filter(|&&var| var >= depth)
                    .map(|var| var - depth),
            );
        }
        loose.into_iter().collect()
    }

    // ========================================================================
    // Builders
    // ========================================================================

    pub fn global(&mut self, ident: Ident) -> TermId {
        self.intern(TermF::Global(ident))
    }

    pub fn prelude(&mut self, name: &str) -> TermId {
        self.global(Ident::prelude(name))
    }

    pub fn constant(&mut self, ident: Ident, ty: TermId, body: Option<TermId>) -> TermId {
        self.intern(TermF::Constant { ident, ty, body })
    }

    pub fn variable(&mut self, name: impl Into<String>, ty: TermId) -> TermId {
        self.intern(TermF::Variable {
            name: name.into(),
            ty,
        })
    }

    pub fn local(&mut self, index: usize) -> TermId {
        self.intern(TermF::LocalVar(index))
    }

    pub fn sort(&mut self, level: u32, flags: SortFlags) -> TermId {
        self.intern(TermF::Sort { level, flags })
    }

    pub fn nat(&mut self, value: impl Into<BigUint>) -> TermId {
        self.intern(TermF::NatLit(value.into()))
    }

    pub fn string(&mut self, value: impl Into<String>) -> TermId {
        self.intern(TermF::StringLit(value.into()))
    }

    pub fn bool_lit(&mut self, value: bool) -> TermId {
        self.intern(TermF::BoolLit(value))
    }

    pub fn app(&mut self, fun: TermId, arg: TermId) -> TermId {
        self.intern(TermF::App(fun, arg))
    }

    /// Apply `fun` to each argument in turn
    pub fn apply_all(&mut self, fun: TermId, args: impl IntoIterator<Item = TermId>) -> TermId {
        args.into_iter().fold(fun, |acc, arg| self.app(acc, arg))
    }

    /// Apply a Prelude global to arguments
    pub fn apply_prelude(&mut self, name: &str, args: impl IntoIterator<Item = TermId>) -> TermId {
        let head = self.prelude(name);
        self.apply_all(head, args)
    }

    pub fn lambda(&mut self, name: impl Into<String>, ty: TermId, body: TermId) -> TermId {
        self.intern(TermF::Lambda {
            name: name.into(),
            ty,
            body,
        })
    }

    pub fn pi(&mut self, name: impl Into<String>, ty: TermId, body: TermId) -> TermId {
        self.intern(TermF::Pi {
            name: name.into(),
            ty,
            body,
        })
    }

    /// Non-dependent function type
    pub fn arrow(&mut self, from: TermId, to: TermId) -> TermId {
        // `to` is lifted past the new binder
        let to = self.lift(to, 1);
        self.pi("_", from, to)
    }

    pub fn let_in(&mut self, name: impl Into<String>, ty: TermId, value: TermId, body: TermId) -> TermId {
        self.intern(TermF::Let {
            name: name.into(),
            ty,
            value,
            body,
        })
    }

    pub fn bool_type(&mut self) -> TermId {
        self.prelude("Bool")
    }

    pub fn nat_type(&mut self) -> TermId {
        self.prelude("Nat")
    }

    /// `Vec n elem`
    pub fn vec_type(&mut self, len: usize, elem: TermId) -> TermId {
        let len = self.nat(len);
        self.apply_prelude("Vec", [len, elem])
    }

    /// `Vec width Bool`
    pub fn word_type(&mut self, width: usize) -> TermId {
        let bool_ty = self.bool_type();
        self.vec_type(width, bool_ty)
    }

    /// Bit-vector literal as a vector of booleans, most significant bit first
    pub fn bv_lit(&mut self, width: usize, value: u64) -> TermId {
        let elem_ty = self.bool_type();
        let elems = (0..width)
            .rev()
            .map(|bit| self.bool_lit(bit < 64 && (value >> bit) & 1 == 1))
            .collect();
        self.intern(TermF::ArrayValue { elem_ty, elems })
    }

    pub fn record_type(&mut self, fields: Vec<(String, TermId)>) -> TermId {
        self.intern(TermF::RecordType(fields))
    }

    pub fn record_value(&mut self, fields: Vec<(String, TermId)>) -> TermId {
        self.intern(TermF::RecordValue(fields))
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Split an application spine into its head and ordered arguments
    pub fn app_spine(&self, id: TermId) -> (TermId, Vec<TermId>) {
        let mut args = Vec::new();
        let mut head = id;
        while let TermF::App(fun, arg) = self.get(head) {
            args.push(*arg);
            head = *fun;
        }
        args.reverse();
        (head, args)
    }

    pub fn as_global(&self, id: TermId) -> Option<&Ident> {
        match self.get(id) {
            TermF::Global(ident) => Some(ident),
            _ => None,
        }
    }

    pub fn as_bool_lit(&self, id: TermId) -> Option<bool> {
        match self.get(id) {
            TermF::BoolLit(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_nat_lit(&self, id: TermId) -> Option<&BigUint> {
        match self.get(id) {
            TermF::NatLit(n) => Some(n),
            _ => None,
        }
    }

    /// Peel a chain of Pi binders, returning `(name, type)` pairs and the codomain
    pub fn pi_chain(&self, id: TermId) -> (Vec<(&str, TermId)>, TermId) {
        let mut params = Vec::new();
        let mut current = id;
        while let TermF::Pi { name, ty, body } = self.get(current) {
            params.push((name.as_str(), *ty));
            current = *body;
        }
        (params, current)
    }

    /// Peel a chain of lambdas, returning `(name, type)` pairs and the body
    pub fn lambda_chain(&self, id: TermId) -> (Vec<(&str, TermId)>, TermId) {
        let mut params = Vec::new();
        let mut current = id;
        while let TermF::Lambda { name, ty, body } = self.get(current) {
            params.push((name.as_str(), *ty));
            current = *body;
        }
        (params, current)
    }

    /// Free variables reachable from a term, in first-visit order
    pub fn free_variables(&self, root: TermId) -> Vec<TermId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![root];
        let mut result = Vec::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let node = self.get(id);
            if matches!(node, TermF::Variable { .. }) {
                result.push(id);
            }
            let children: Vec<_> = node.children().collect();
            stack.extend(children.into_iter().rev());
        }
        result
    }

    /// Shift loose variables of a term by `amount`
    pub fn lift(&mut self, id: TermId, amount: usize) -> TermId {
        self.lift_above(id, amount, 0)
    }

    fn lift_above(&mut self, id: TermId, amount: usize, cutoff: usize) -> TermId {
        if amount == 0 || self.loose_vars(id).iter().all(|&var| var < cutoff) {
            return id;
        }
        let node = self.get(id).clone();
        let lifted = match node {
            TermF::LocalVar(index) => TermF::LocalVar(index + amount),
            other => self.map_children(other, &mut |store, child, depth| {
                store.lift_above(child, amount, cutoff + depth)
            }),
        };
        self.intern(lifted)
    }

    /// Rebuild a node with each child replaced by `f(child, binder_depth)`
    fn map_children<F>(&mut self, node: TermF, f: &mut F) -> TermF
    where
        F: FnMut(&mut Self, TermId, usize) -> TermId,
    {
        match node {
            TermF::Constant { ident, ty, body } => TermF::Constant {
                ident,
                ty: f(self, ty, 0),
                body: body.map(|b| f(self, b, 0)),
            },
            TermF::Variable { name, ty } => TermF::Variable { name, ty: f(self, ty, 0) },
            TermF::App(a, b) => TermF::App(f(self, a, 0), f(self, b, 0)),
            TermF::PairValue(a, b) => TermF::PairValue(f(self, a, 0), f(self, b, 0)),
            TermF::PairType(a, b) => TermF::PairType(f(self, a, 0), f(self, b, 0)),
            TermF::PairLeft(a) => TermF::PairLeft(f(self, a, 0)),
            TermF::PairRight(a) => TermF::PairRight(f(self, a, 0)),
            TermF::RecordType(fields) => {
                TermF::RecordType(fields.into_iter().map(|(n, t)| (n, f(self, t, 0))).collect())
            }
            TermF::RecordValue(fields) => {
                TermF::RecordValue(fields.into_iter().map(|(n, t)| (n, f(self, t, 0))).collect())
            }
            TermF::RecordProj(a, field) => TermF::RecordProj(f(self, a, 0), field),
            TermF::ArrayValue { elem_ty, elems } => TermF::ArrayValue {
                elem_ty: f(self, elem_ty, 0),
                elems: elems.into_iter().map(|e| f(self, e, 0)).collect(),
            },
            TermF::DataTypeApp { ident, params, indices } => TermF::DataTypeApp {
                ident,
                params: params.into_iter().map(|p| f(self, p, 0)).collect(),
                indices: indices.into_iter().map(|i| f(self, i, 0)).collect(),
            },
            TermF::CtorApp { ident, params, args } => TermF::CtorApp {
                ident,
                params: params.into_iter().map(|p| f(self, p, 0)).collect(),
                args: args.into_iter().map(|a| f(self, a, 0)).collect(),
            },
            TermF::Recursor {
                data_type,
                params,
                motive,
                ctor_order,
                eliminators,
            } => TermF::Recursor {
                data_type,
                params: params.into_iter().map(|p| f(self, p, 0)).collect(),
                motive: f(self, motive, 0),
                ctor_order,
                eliminators: eliminators.into_iter().map(|(c, e)| (c, f(self, e, 0))).collect(),
            },
            TermF::Lambda { name, ty, body } => TermF::Lambda {
                name,
                ty: f(self, ty, 0),
                body: f(self, body, 1),
            },
            TermF::Pi { name, ty, body } => TermF::Pi {
                name,
                ty: f(self, ty, 0),
                body: f(self, body, 1),
            },
            TermF::Fix { name, ty, body } => TermF::Fix {
                name,
                ty: f(self, ty, 0),
                body: f(self, body, 1),
            },
            TermF::Let { name, ty, value, body } => TermF::Let {
                name,
                ty: f(self, ty, 0),
                value: f(self, value, 0),
                body: f(self, body, 1),
            },
            leaf => leaf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_structure_is_shared() {
        let mut store = TermStore::new();
        let a = store.bv_lit(8, 2);
        let b = store.bv_lit(8, 2);
        assert_eq!(a, b);

        let before = store.len();
        let f = store.prelude("bvMul");
        let x = store.app(f, a);
        let y = store.app(f, b);
        assert_eq!(x, y);
        assert_eq!(store.len(), before + 2);
    }

    #[test]
    fn test_children_precede_parents() {
        let mut store = TermStore::new();
        let nat = store.nat_type();
        let body = store.local(0);
        let lam = store.lambda("x", nat, body);
        for child in store.get(lam).children() {
            assert!(child < lam);
        }
    }

    #[test]
    fn test_loose_vars_are_shifted_by_binders() {
        let mut store = TermStore::new();
        let nat = store.nat_type();
        let v0 = store.local(0);
        let v2 = store.local(2);
        let pair = store.intern(TermF::PairValue(v0, v2));
        assert_eq!(store.loose_vars(pair), &[0, 2]);

        let lam = store.lambda("x", nat, pair);
        assert_eq!(store.loose_vars(lam), &[1]);
        assert!(!store.is_closed(lam));

        let outer = store.lambda("y", nat, lam);
        let outer = store.lambda("z", nat, outer);
        assert!(store.is_closed(outer));
    }

    #[test]
    fn test_app_spine() {
        let mut store = TermStore::new();
        let a = store.nat(1u32);
        let b = store.nat(2u32);
        let t = store.apply_prelude("addNat", [a, b]);
        let (head, args) = store.app_spine(t);
        assert!(store.as_global(head).unwrap().is_prelude("addNat"));
        assert_eq!(args, vec![a, b]);
    }

    #[test]
    fn test_arrow_lifts_codomain() {
        let mut store = TermStore::new();
        let nat = store.nat_type();
        let v0 = store.local(0);
        let arrow = store.arrow(nat, v0);
        match store.get(arrow) {
            TermF::Pi { body, .. } => assert_eq!(store.get(*body), &TermF::LocalVar(1)),
            other => panic!("expected Pi, got {:?}", other),
        }
        assert!(!store.has_loose_var(arrow, 1));
        assert!(store.has_loose_var(arrow, 0));
    }

    #[test]
    fn test_bv_lit_is_msb_first() {
        let mut store = TermStore::new();
        let lit = store.bv_lit(4, 0b0011);
        match store.get(lit) {
            TermF::ArrayValue { elems, .. } => {
                let bits: Vec<_> = elems.iter().map(|e| store.as_bool_lit(*e).unwrap()).collect();
                assert_eq!(bits, vec![false, false, true, true]);
            }
            other => panic!("expected ArrayValue, got {:?}", other),
        }
    }

    #[test]
    fn test_free_variables() {
        let mut store = TermStore::new();
        let bool_ty = store.bool_type();
        let x = store.variable("x", bool_ty);
        let y = store.variable("y", bool_ty);
        let t = store.apply_prelude("and", [x, y]);
        let t = store.apply_prelude("or", [t, x]);
        assert_eq!(store.free_variables(t), vec![x, y]);
    }
}
