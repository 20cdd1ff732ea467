// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Structural analyses over the shared term DAG

pub mod occurrences;
