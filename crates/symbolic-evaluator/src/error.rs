// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Evaluation errors

use shared_term::Ident;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Two branch values that cannot be merged; indicates ill-typed input
    #[error("cannot merge branch values: {0}")]
    MuxMismatch(String),

    #[error("unbound variable `{0}`")]
    UnboundVariable(String),

    #[error("no implementation for primitive `{0}`")]
    UnknownPrimitive(Ident),

    #[error("cannot apply a value of kind {0}")]
    NotAFunction(&'static str),

    #[error("`{op}` expected {expected} but got {found}")]
    TypeMismatch {
        op: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: String, len: usize },

    #[error("error: {0}")]
    UserError(String),

    #[error("no default value of kind {0}")]
    NoDefaultValue(&'static str),
}

pub type EvalResult<T> = Result<T, EvalError>;
