// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Reserved words of the target calculus
//!
//! Bound names are freshened against this set; unqualified global names that
//! clash with it are escaped with a trailing underscore.

use once_cell::sync::Lazy;
use std::collections::HashSet;

pub const RESERVED_WORDS: &[&str] = &[
    // Basic control flow
    "if", "then", "else", "let", "in", "do", "for", "while", "match", "with", "fun", "λ", "return",
    // Declaration keywords
    "axiom", "theorem", "lemma", "example", "opaque", "def", "abbrev", "instance", "class",
    // Proof keywords
    "by", "done", "from", "using", "have", "show", "suffices", "calc", "mutual", "at",
    // Module/namespace keywords
    "section", "namespace", "end", "variable", "universe", "import", "export", "open", "hiding",
    "renaming",
    // Visibility/modifiers
    "private", "protected", "noncomputable", "partial", "unsafe",
    // Type definition keywords
    "inductive", "coinductive", "structure", "deriving", "extends", "where",
    // Notation and metaprogramming
    "notation", "infix", "infixl", "infixr", "prefix", "postfix", "macro", "elab", "syntax",
    // Sorts and binders
    "Type", "Prop", "Sort", "forall", "exists",
    // Names the translator itself emits
    "error", "true", "false",
];

/// Unqualified heads (or their module roots) that the translation of term
/// formers emits regardless of configuration
pub const EMITTED_HEADS: &[&str] = &[
    "Unit", "Prod", "RecordCons", "RecordNil", "RecordTypeCons", "RecordTypeNil", "RecordProj", "Inhabited",
    "QuantType",
];

static RESERVED: Lazy<HashSet<&'static str>> = Lazy::new(|| RESERVED_WORDS.iter().copied().collect());

pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(name)
}

/// Escape an unqualified identifier that conflicts with a reserved word
pub fn escape_identifier(name: &str) -> String {
    if is_reserved(name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}
