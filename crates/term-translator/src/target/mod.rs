// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Target calculus: abstract syntax, keyword set and rendering

pub mod ast;
pub mod keywords;
pub mod render;
pub mod writer;
