// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

pub mod store;
pub mod term;

/// Name of the module holding the built-in primitives
pub const PRELUDE: &str = "Prelude";

// ============================================================================
// Identifiers
// ============================================================================

/// Dotted module path (e.g., "Cryptol" or "Data.Bits")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(Vec<String>);

impl ModuleName {
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(components.into_iter().map(Into::into).collect())
    }

    pub fn prelude() -> Self {
        Self(vec![PRELUDE.to_string()])
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }
}

impl Display for ModuleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("."))
    }
}

impl FromStr for ModuleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.split('.').any(str::is_empty) {
            return Err(format!("invalid module name `{}`", s));
        }
        Ok(Self(s.split('.').map(str::to_string).collect()))
    }
}

impl TryFrom<String> for ModuleName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModuleName> for String {
    fn from(value: ModuleName) -> Self {
        value.to_string()
    }
}

/// A global identifier qualified by its defining module
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ident {
    pub module: ModuleName,
    pub name: String,
}

impl Ident {
    pub fn new(module: ModuleName, name: impl Into<String>) -> Self {
        Self {
            module,
            name: name.into(),
        }
    }

    /// Identifier in the Prelude module
    pub fn prelude(name: impl Into<String>) -> Self {
        Self::new(ModuleName::prelude(), name)
    }

    pub fn is_prelude(&self, name: &str) -> bool {
        self.name == name && self.module.0.len() == 1 && self.module.0[0] == PRELUDE
    }
}

impl Display for Ident {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

impl FromStr for Ident {
    type Err = String;

    /// Parses `Module.Path.name`; the last component is the name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('.') {
            Some((module, name)) if !name.is_empty() => Ok(Self::new(module.parse()?, name)),
            _ => Err(format!("identifier `{}` is not module-qualified", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_round_trips_through_text() {
        let ident: Ident = "Data.Bits.shiftL".parse().unwrap();
        assert_eq!(ident.module.components(), &["Data".to_string(), "Bits".to_string()]);
        assert_eq!(ident.name, "shiftL");
        assert_eq!(ident.to_string(), "Data.Bits.shiftL");
    }

    #[test]
    fn test_unqualified_ident_is_rejected() {
        assert!("bvAdd".parse::<Ident>().is_err());
        assert!("Prelude.".parse::<Ident>().is_err());
        assert!("".parse::<ModuleName>().is_err());
    }

    #[test]
    fn test_is_prelude() {
        assert!(Ident::prelude("ite").is_prelude("ite"));
        assert!(!Ident::new(ModuleName::new(["Cryptol"]), "ite").is_prelude("ite"));
    }
}
