// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translation errors
//!
//! Every error aborts the translation of the current top-level term. Errors are
//! deterministic in the input term and the configuration.

use shared_term::Ident;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("general recursion is not supported (fixed point `{name}`)")]
    GeneralRecursion { name: String },

    #[error("bound variable #{index} is out of range under {depth} binders")]
    UnboundVariable { index: usize, depth: usize },

    #[error("datatype `{0}` has no direct target counterpart and cannot host a recursor")]
    RecursorWithoutCounterpart(Ident),

    #[error("`{ident}` needs at least {expected} arguments but was applied to {actual}")]
    MacroArity {
        ident: Ident,
        expected: usize,
        actual: usize,
    },

    #[error("no eliminator supplied for constructor `{0}`")]
    MissingEliminator(Ident),

    #[error("`{0}` reached a definition site but has no definition-site treatment")]
    UnspecifiedTreatment(Ident),
}

pub type TranslationResult<T> = Result<T, TranslationError>;
