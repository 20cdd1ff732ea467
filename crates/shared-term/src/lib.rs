// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Shared Term DAG
//!
//! This crate provides the term representation consumed by the translator and
//! the symbolic evaluator: a hash-consed, maximally shared DAG of immutable
//! nodes. It does NOT translate or evaluate terms - that responsibility belongs
//! to the `term-translator` and `symbolic-evaluator` crates.

mod data;
pub mod analysis;
pub mod naming;

// Identifiers (from data/mod.rs)
pub use data::{Ident, ModuleName, PRELUDE};

// Term nodes (from data/term.rs)
pub use data::term::{SortFlags, TermF, TermId};

// Hash-consing store (from data/store.rs)
pub use data::store::TermStore;

// Sharing analysis
pub use analysis::occurrences::{
    count_occurrences, count_occurrences_by, is_memoizable, shared_terms, shared_terms_by,
};
