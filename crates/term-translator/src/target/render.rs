// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Rendering of target terms and declarations to concrete syntax

use super::ast::{Binder, Decl, LetBinding, PiBinder, Term};
use super::writer::{render_to_string, TargetWriter};

/// Render a term on a single line
pub fn term_to_string(term: &Term) -> String {
    render_to_string(|w| render_term(term, w))
}

/// Render declarations separated by blank lines, followed by an optional body
pub fn decls_to_string(decls: &[Decl]) -> String {
    render_to_string(|w| {
        w.sep_with("\n", decls, |w, decl| {
            render_decl(decl, w);
            w.newline();
        })
    })
}

pub fn render_decl(decl: &Decl, w: &mut TargetWriter) {
    match decl {
        Decl::Definition { name, params, ty, body } => {
            w.write("def ");
            w.write(name);
            for param in params {
                w.write(" ");
                render_binder(param, w);
            }
            if let Some(ty) = ty {
                w.write(" : ");
                render_term(ty, w);
            }
            w.write(" :=");
            w.indent(true);
            render_term(body, w);
            w.dedent(false);
        }
        Decl::Axiom { name, ty } => {
            w.write("axiom ");
            w.write(name);
            w.write(" : ");
            render_term(ty, w);
        }
        Decl::Snippet(text) => w.write(text.trim_end()),
        Decl::Comment(text) => {
            w.sep_with("\n", text.lines(), |w, line| {
                w.write("-- ");
                w.write(line);
            });
        }
    }
}

pub fn render_term(term: &Term, w: &mut TargetWriter) {
    match term {
        Term::Var(name) => w.write(name),
        Term::ExplicitVar(name) => {
            w.write("@");
            w.write(name);
        }
        Term::App(head, args) => {
            render_arg(head, w);
            for arg in args {
                w.write(" ");
                render_arg(arg, w);
            }
        }
        Term::Lambda(binders, body) => {
            w.write("fun ");
            w.sep_with(" ", binders, |w, binder| render_binder(binder, w));
            w.write(" => ");
            render_term(body, w);
        }
        Term::Pi(binders, body) => {
            for binder in binders {
                render_pi_binder(binder, w);
                w.write(" → ");
            }
            render_term(body, w);
        }
        Term::Let(bindings, body) => {
            for binding in bindings {
                render_let_binding(binding, w);
                w.write("; ");
            }
            render_term(body, w);
        }
        Term::If(cond, then_branch, else_branch) => {
            w.write("if ");
            render_term(cond, w);
            w.write(" then ");
            render_term(then_branch, w);
            w.write(" else ");
            render_term(else_branch, w);
        }
        Term::Sort(0) => w.write("Type"),
        Term::Sort(level) => w.write(&format!("Type {}", level)),
        Term::NatLit(value) => w.write(&value.to_string()),
        Term::StringLit(value) => w.write(&escape_string(value)),
        Term::List(elems) => {
            w.write("[");
            w.sep_with(", ", elems, |w, elem| render_term(elem, w));
            w.write("]");
        }
        Term::Ascription(term, ty) => {
            w.write("(");
            render_term(term, w);
            w.write(" : ");
            render_term(ty, w);
            w.write(")");
        }
    }
}

/// Render in argument position, parenthesizing compound terms
fn render_arg(term: &Term, w: &mut TargetWriter) {
    if term.is_atomic() {
        render_term(term, w);
    } else {
        w.write("(");
        render_term(term, w);
        w.write(")");
    }
}

fn render_binder(binder: &Binder, w: &mut TargetWriter) {
    let (open, close) = if binder.implicit { ("{", "}") } else { ("(", ")") };
    w.write(open);
    w.write(&binder.name);
    w.write(" : ");
    render_term(&binder.ty, w);
    w.write(close);
}

fn render_pi_binder(binder: &PiBinder, w: &mut TargetWriter) {
    match &binder.name {
        Some(name) => render_binder(
            &Binder {
                name: name.clone(),
                ty: binder.ty.clone(),
                implicit: binder.implicit,
            },
            w,
        ),
        // Arrows are right-associative, so a compound domain needs parentheses
        None if matches!(binder.ty, Term::Pi(..) | Term::Lambda(..) | Term::Let(..) | Term::If(..)) => {
            w.write("(");
            render_term(&binder.ty, w);
            w.write(")");
        }
        None => render_term(&binder.ty, w),
    }
}

fn render_let_binding(binding: &LetBinding, w: &mut TargetWriter) {
    w.write("let ");
    w.write(&binding.name);
    if let Some(ty) = &binding.ty {
        w.write(" : ");
        render_term(ty, w);
    }
    w.write(" := ");
    render_term(&binding.value, w);
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_parenthesizes_compound_args() {
        let inner = Term::app(Term::var("BitVec.ofNat"), vec![Term::nat(8u32), Term::nat(2u32)]);
        let term = Term::app(Term::var("bvMul"), vec![Term::nat(8u32), inner]);
        insta::assert_snapshot!(term_to_string(&term), @"bvMul 8 (BitVec.ofNat 8 2)");
    }

    #[test]
    fn test_pi_renders_anonymous_binders_as_arrows() {
        let arrow = Term::Pi(
            vec![PiBinder { name: None, ty: Term::var("Nat"), implicit: false }],
            Box::new(Term::var("Nat")),
        );
        let term = Term::Pi(
            vec![
                PiBinder { name: Some("a".into()), ty: Term::Sort(0), implicit: false },
                PiBinder { name: None, ty: arrow, implicit: false },
            ],
            Box::new(Term::var("a")),
        );
        insta::assert_snapshot!(term_to_string(&term), @"(a : Type) → (Nat → Nat) → a");
    }

    #[test]
    fn test_definition_layout() {
        let decl = Decl::Definition {
            name: "double".into(),
            params: vec![Binder { name: "n".into(), ty: Term::var("Nat"), implicit: false }],
            ty: Some(Term::var("Nat")),
            body: Term::app(Term::var("Nat.add"), vec![Term::var("n"), Term::var("n")]),
        };
        assert_eq!(decls_to_string(&[decl]), "def double (n : Nat) : Nat :=\n  Nat.add n n\n");
    }

    #[test]
    fn test_string_literals_are_escaped() {
        assert_eq!(term_to_string(&Term::string("say \"hi\"")), "\"say \\\"hi\\\"\"");
    }
}
