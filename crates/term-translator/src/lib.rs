// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Term Translator
//!
//! Translates shared terms into the abstract syntax of a Lean-style target
//! calculus. Shared subterms are let-lifted, bound names are freshened, and
//! globals are resolved through a table of special treatments. Rendering to
//! text is provided for logging and tests; producing files is left to the
//! caller.

pub mod error;
pub mod options;
pub mod prelude;
pub mod special;
pub mod target;
pub mod translation;

pub use error::{TranslationError, TranslationResult};
pub use options::TranslatorOptions;
pub use special::{DefSiteTreatment, IdentSpecialTreatment, SpecialTreatmentConfig, SpecialTreatmentTable, UseSiteTreatment};
pub use translation::state::GlobalState;
pub use translation::{translate_definition, translate_term, ModuleTranslator, TranslatedTerm, TranslationConfig};
