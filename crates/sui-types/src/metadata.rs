//! Normalized package metadata as served by a fullnode.
//!
//! These mirror the JSON-RPC `sui_getNormalizedMoveModulesByPackage` result,
//! keeping only what step construction needs: exposed functions with their
//! visibility, type parameter constraints, parameters and return types.
//! Unknown fields in the response (structs, enums, friends) are ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::type_descriptor::TypeDescriptor;

/// Module name -> module, for one package.
pub type NormalizedModules = BTreeMap<String, NormalizedModule>;

/// A Move ability tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    Copy,
    Drop,
    Store,
    Key,
}

impl Ability {
    pub fn as_str(self) -> &'static str {
        match self {
            Ability::Copy => "copy",
            Ability::Drop => "drop",
            Ability::Store => "store",
            Ability::Key => "key",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraint set declared on a type parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilitySet {
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

impl AbilitySet {
    pub fn new(abilities: Vec<Ability>) -> Self {
        Self { abilities }
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn contains(&self, ability: Ability) -> bool {
        self.abilities.contains(&ability)
    }
}

impl fmt::Display for AbilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.abilities.iter().map(|a| a.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Private,
    Public,
    Friend,
}

/// Signature of one exposed function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFunction {
    pub visibility: Visibility,
    #[serde(default)]
    pub is_entry: bool,
    #[serde(default)]
    pub type_parameters: Vec<AbilitySet>,
    #[serde(default)]
    pub parameters: Vec<TypeDescriptor>,
    #[serde(rename = "return", default)]
    pub return_types: Vec<TypeDescriptor>,
}

impl NormalizedFunction {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// `(T0: copy, T1)(Reference(...), U64) -> (U64)` style signature line.
    pub fn signature(&self, name: &str) -> String {
        let type_params: Vec<String> = self
            .type_parameters
            .iter()
            .enumerate()
            .map(|(i, set)| {
                if set.is_empty() {
                    format!("T{}", i)
                } else {
                    format!("T{}: {}", i, set)
                }
            })
            .collect();
        let params: Vec<String> = self.parameters.iter().map(|p| p.canonical_name()).collect();
        let returns: Vec<String> = self
            .return_types
            .iter()
            .map(|r| r.canonical_name())
            .collect();

        let mut line = name.to_string();
        if !type_params.is_empty() {
            line.push_str(&format!("<{}>", type_params.join(", ")));
        }
        line.push_str(&format!("({})", params.join(", ")));
        if !returns.is_empty() {
            line.push_str(&format!(" -> ({})", returns.join(", ")));
        }
        line
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedModule {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exposed_functions: BTreeMap<String, NormalizedFunction>,
}

impl NormalizedModule {
    /// Functions eligible for a contract-call step, sorted by name.
    pub fn public_functions(&self) -> impl Iterator<Item = (&String, &NormalizedFunction)> {
        self.exposed_functions
            .iter()
            .filter(|(_, f)| f.is_public())
    }
}
