// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Abstract syntax of the target calculus
//!
//! The translator only builds these trees. Rendering to concrete syntax lives in
//! `target::render` and is used for logging, tests and determinism checks.

use num::BigUint;
use std::collections::BTreeSet;

/// Target expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Possibly qualified identifier (e.g., `x`, `Prelude.bvAdd`)
    Var(String),

    /// Identifier with implicit-argument elision suppressed (rendered `@name`)
    ExplicitVar(String),

    /// Application of a head to at least one argument
    App(Box<Term>, Vec<Term>),

    Lambda(Vec<Binder>, Box<Term>),
    Pi(Vec<PiBinder>, Box<Term>),

    /// Sequence of non-recursive bindings, outermost first
    Let(Vec<LetBinding>, Box<Term>),

    If(Box<Term>, Box<Term>, Box<Term>),

    /// `Type n`
    Sort(u32),

    NatLit(BigUint),
    StringLit(String),
    List(Vec<Term>),

    /// Type ascription `(term : ty)`
    Ascription(Box<Term>, Box<Term>),
}

/// Named binder of a lambda or definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binder {
    pub name: String,
    pub ty: Term,
    pub implicit: bool,
}

/// Binder of a dependent function type; anonymous binders render as arrows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiBinder {
    pub name: Option<String>,
    pub ty: Term,
    pub implicit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetBinding {
    pub name: String,
    pub ty: Option<Term>,
    pub value: Term,
}

/// Top-level target declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Definition {
        name: String,
        params: Vec<Binder>,
        ty: Option<Term>,
        body: Term,
    },
    Axiom {
        name: String,
        ty: Term,
    },
    /// Verbatim target text supplied by configuration
    Snippet(String),
    Comment(String),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Term {
        Term::Var(name.into())
    }

    pub fn nat(value: impl Into<BigUint>) -> Term {
        Term::NatLit(value.into())
    }

    pub fn string(value: impl Into<String>) -> Term {
        Term::StringLit(value.into())
    }

    /// Apply `head` to `args`, merging with an existing application head.
    /// With no arguments the head is returned unchanged.
    pub fn app(head: Term, args: Vec<Term>) -> Term {
        if args.is_empty() {
            return head;
        }
        match head {
            Term::App(inner, mut prefix) => {
                prefix.extend(args);
                Term::App(inner, prefix)
            }
            other => Term::App(Box::new(other), args),
        }
    }

    pub fn if_then_else(cond: Term, then_branch: Term, else_branch: Term) -> Term {
        Term::If(Box::new(cond), Box::new(then_branch), Box::new(else_branch))
    }

    /// Wrap a body in let-bindings; no bindings leaves the body unchanged
    pub fn let_in(bindings: Vec<LetBinding>, body: Term) -> Term {
        if bindings.is_empty() {
            body
        } else {
            Term::Let(bindings, Box::new(body))
        }
    }

    /// Error placeholder carrying a message
    pub fn error(message: impl Into<String>) -> Term {
        Term::app(Term::var("error"), vec![Term::string(message)])
    }

    /// Does not need parentheses in argument position
    pub fn is_atomic(&self) -> bool {
        match self {
            Term::Var(_) | Term::ExplicitVar(_) | Term::NatLit(_) | Term::StringLit(_) | Term::List(_) => true,
            Term::Ascription(..) => true,
            Term::Sort(level) => *level == 0,
            _ => false,
        }
    }

    /// First dotted segment of every identifier the term refers to
    /// (`Nat.add x` gives `Nat` and `x`). Binder names are not included.
    pub fn name_roots(&self) -> BTreeSet<String> {
        let mut roots = BTreeSet::new();
        self.collect_name_roots(&mut roots);
        roots
    }

    fn collect_name_roots(&self, roots: &mut BTreeSet<String>) {
        match self {
            Term::Var(name) | Term::ExplicitVar(name) => {
                let root = name.split('.').next().unwrap_or(name);
                roots.insert(root.to_string());
            }
            Term::App(head, args) => {
                head.collect_name_roots(roots);
                args.iter().for_each(|arg| arg.collect_name_roots(roots));
            }
            Term::Lambda(binders, body) => {
                binders.iter().for_each(|binder| binder.ty.collect_name_roots(roots));
                body.collect_name_roots(roots);
            }
            Term::Pi(binders, body) => {
                binders.iter().for_each(|binder| binder.ty.collect_name_roots(roots));
                body.collect_name_roots(roots);
            }
            Term::Let(bindings, body) => {
                for binding in bindings {
                    if let Some(ty) = &binding.ty {
                        ty.collect_name_roots(roots);
                    }
                    binding.value.collect_name_roots(roots);
                }
                body.collect_name_roots(roots);
            }
            Term::If(cond, then_branch, else_branch) => {
                cond.collect_name_roots(roots);
                then_branch.collect_name_roots(roots);
                else_branch.collect_name_roots(roots);
            }
            Term::List(elems) => elems.iter().for_each(|elem| elem.collect_name_roots(roots)),
            Term::Ascription(term, ty) => {
                term.collect_name_roots(roots);
                ty.collect_name_roots(roots);
            }
            Term::Sort(_) | Term::NatLit(_) | Term::StringLit(_) => {}
        }
    }

    /// Arguments of an application (empty otherwise)
    pub fn args(&self) -> &[Term] {
        match self {
            Term::App(_, args) => args,
            _ => &[],
        }
    }
}

impl Decl {
    pub fn name(&self) -> Option<&str> {
        match self {
            Decl::Definition { name, .. } | Decl::Axiom { name, .. } => Some(name),
            Decl::Snippet(_) | Decl::Comment(_) => None,
        }
    }
}
