// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Term nodes
//!
//! A term is one node of the shared DAG. Children are referenced by `TermId`,
//! never by value, so a node is cheap to hash and compare: structural equality
//! of two nodes reduces to equality of their immediate contents.
//!
//! ## Binding
//!
//! Bound variables use de Bruijn indices (innermost binder = 0). `Lambda`, `Pi`,
//! `Fix` and the body of `Let` bind one variable; every other position binds none.

use super::Ident;
use num::BigUint;
use std::fmt::{self, Display, Formatter};

/// Identity of a node in a `TermStore`.
///
/// IDs are dense and assigned in creation order, so a node only ever refers to
/// nodes with smaller IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(pub(crate) u32);

impl TermId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Annotations carried by a sort
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortFlags {
    /// Types of this sort are known to be inhabited
    pub inhabited: bool,
    /// Types of this sort support quantification
    pub quantifiable: bool,
}

impl SortFlags {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn inhabited() -> Self {
        Self {
            inhabited: true,
            quantifiable: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.inhabited && !self.quantifiable
    }
}

/// One node of the shared term DAG
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermF {
    // === Leaves ===
    /// Primitive constant with no definition on the source side
    Global(Ident),

    /// Named definition; `body` is `None` for opaque constants
    Constant {
        ident: Ident,
        ty: TermId,
        body: Option<TermId>,
    },

    /// Free variable
    Variable { name: String, ty: TermId },

    /// Bound variable by de Bruijn index
    LocalVar(usize),

    /// Sort of the given universe level
    Sort { level: u32, flags: SortFlags },

    NatLit(BigUint),
    StringLit(String),
    BoolLit(bool),
    UnitValue,
    UnitType,

    // === Applications ===
    /// Curried application `fun arg`
    App(TermId, TermId),

    PairValue(TermId, TermId),
    PairType(TermId, TermId),
    PairLeft(TermId),
    PairRight(TermId),

    /// Record type; field order is insignificant
    RecordType(Vec<(String, TermId)>),

    /// Record value; field order is insignificant
    RecordValue(Vec<(String, TermId)>),

    /// Projection of a record field
    RecordProj(TermId, String),

    /// Vector literal
    ArrayValue { elem_ty: TermId, elems: Vec<TermId> },

    /// Fully applied datatype
    DataTypeApp {
        ident: Ident,
        params: Vec<TermId>,
        indices: Vec<TermId>,
    },

    /// Fully applied constructor
    CtorApp {
        ident: Ident,
        params: Vec<TermId>,
        args: Vec<TermId>,
    },

    /// Eliminator of an inductive datatype
    Recursor {
        data_type: Ident,
        params: Vec<TermId>,
        motive: TermId,
        /// Constructors in declaration order
        ctor_order: Vec<Ident>,
        /// Supplied case for each constructor (may be partial)
        eliminators: Vec<(Ident, TermId)>,
    },

    // === Binders ===
    Lambda { name: String, ty: TermId, body: TermId },
    Pi { name: String, ty: TermId, body: TermId },
    Let {
        name: String,
        ty: TermId,
        value: TermId,
        body: TermId,
    },

    /// General fixed point; representable but neither translatable nor evaluable
    Fix { name: String, ty: TermId, body: TermId },
}

/// Visit the children of a node together with the number of binders entered
/// to reach them.
macro_rules! traverse_children {
    ($node:expr, |$child:ident, $depth:ident| $action:expr) => {
        match $node {
            TermF::Global(_)
            | TermF::LocalVar(_)
            | TermF::Sort { .. }
            | TermF::NatLit(_)
            | TermF::StringLit(_)
            | TermF::BoolLit(_)
            | TermF::UnitValue
            | TermF::UnitType => {}
            TermF::Constant { ty, body, .. } => {
                let ($child, $depth) = (*ty, 0);
                $action;
                if let Some(body) = body {
                    let ($child, $depth) = (*body, 0);
                    $action;
                }
            }
            TermF::Variable { ty, .. } => {
                let ($child, $depth) = (*ty, 0);
                $action;
            }
            TermF::App(a, b) | TermF::PairValue(a, b) | TermF::PairType(a, b) => {
                let ($child, $depth) = (*a, 0);
                $action;
                let ($child, $depth) = (*b, 0);
                $action;
            }
            TermF::PairLeft(a) | TermF::PairRight(a) | TermF::RecordProj(a, _) => {
                let ($child, $depth) = (*a, 0);
                $action;
            }
            TermF::RecordType(fields) | TermF::RecordValue(fields) => {
                for (_, field) in fields {
                    let ($child, $depth) = (*field, 0);
                    $action;
                }
            }
            TermF::ArrayValue { elem_ty, elems } => {
                let ($child, $depth) = (*elem_ty, 0);
                $action;
                for elem in elems {
                    let ($child, $depth) = (*elem, 0);
                    $action;
                }
            }
            TermF::DataTypeApp { params, indices: rest, .. }
            | TermF::CtorApp { params, args: rest, .. } => {
                for arg in params.iter().chain(rest.iter()) {
                    let ($child, $depth) = (*arg, 0);
                    $action;
                }
            }
            TermF::Recursor {
                params,
                motive,
                eliminators,
                ..
            } => {
                for param in params {
                    let ($child, $depth) = (*param, 0);
                    $action;
                }
                let ($child, $depth) = (*motive, 0);
                $action;
                for (_, elim) in eliminators {
                    let ($child, $depth) = (*elim, 0);
                    $action;
                }
            }
            TermF::Lambda { ty, body, .. } | TermF::Pi { ty, body, .. } | TermF::Fix { ty, body, .. } => {
                let ($child, $depth) = (*ty, 0);
                $action;
                let ($child, $depth) = (*body, 1);
                $action;
            }
            TermF::Let { ty, value, body, .. } => {
                let ($child, $depth) = (*ty, 0);
                $action;
                let ($child, $depth) = (*value, 0);
                $action;
                let ($child, $depth) = (*body, 1);
                $action;
            }
        }
    };
}

impl TermF {
    /// Direct children in argument order
    pub fn children(&self) -> impl Iterator<Item = TermId> {
        let mut result = Vec::new();
        traverse_children!(self, |child, _depth| result.push(child));
        result.into_iter()
    }

    /// Direct children paired with the number of binders between this node and the child
    pub fn children_with_depth(&self) -> impl Iterator<Item = (TermId, usize)> {
        let mut result = Vec::new();
        traverse_children!(self, |child, depth| result.push((child, depth)));
        result.into_iter()
    }

    /// Leaves that are cheaper to duplicate than to name
    pub fn is_trivial(&self) -> bool {
        matches!(
            self,
            TermF::Global(_)
                | TermF::Constant { .. }
                | TermF::Variable { .. }
                | TermF::LocalVar(_)
                | TermF::Sort { .. }
                | TermF::NatLit(_)
                | TermF::StringLit(_)
                | TermF::BoolLit(_)
                | TermF::UnitValue
                | TermF::UnitType
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binder_children_report_depth() {
        let node = TermF::Let {
            name: "x".to_string(),
            ty: TermId(0),
            value: TermId(1),
            body: TermId(2),
        };
        let children: Vec<_> = node.children_with_depth().collect();
        assert_eq!(children, vec![(TermId(0), 0), (TermId(1), 0), (TermId(2), 1)]);
    }

    #[test]
    fn test_constructor_children_keep_argument_order() {
        let node = TermF::CtorApp {
            ident: Ident::prelude("Cons"),
            params: vec![TermId(3)],
            args: vec![TermId(1), TermId(2)],
        };
        assert_eq!(node.children().collect::<Vec<_>>(), vec![TermId(3), TermId(1), TermId(2)]);
    }
}
