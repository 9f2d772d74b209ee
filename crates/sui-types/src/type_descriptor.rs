//! Move type descriptors as reported by a fullnode's normalized-module API.
//!
//! A [`TypeDescriptor`] is the recursive type grammar used in function
//! signatures: scalars, structs with type arguments, vectors, references and
//! generic type parameters. Two derivations live here:
//!
//! - [`TypeDescriptor::canonical_name`] renders the human-readable name used
//!   for display and for recognising the implicit `TxContext` parameter.
//! - [`TypeDescriptor::argument_kind`] decides whether a parameter is supplied
//!   as a pure value or as an object reference.
//!
//! ## Wire format
//!
//! Serialization follows the JSON-RPC `SuiMoveNormalizedType` shape:
//!
//! ```json
//! "U64"
//! {"Vector": "U8"}
//! {"Struct": {"address": "0x2", "module": "coin", "name": "Coin", "typeArguments": ["0x2::sui::SUI"]}}
//! {"MutableReference": {"Struct": {...}}}
//! {"TypeParameter": 0}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::argument::ArgumentKind;

/// Canonical name of the transaction context every entry function receives.
pub const TX_CONTEXT_TYPE: &str = "0x2::tx_context::TxContext";

/// A struct type reference inside a [`TypeDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructDescriptor {
    pub address: String,
    pub module: String,
    pub name: String,
    #[serde(default)]
    pub type_arguments: Vec<TypeDescriptor>,
}

/// Recursive description of a Move value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TypeDescriptorWire", into = "TypeDescriptorWire")]
pub enum TypeDescriptor {
    /// Primitive such as `U64`, `Bool` or `Address`, kept verbatim.
    Scalar(String),
    Struct(StructDescriptor),
    Vector(Box<TypeDescriptor>),
    Reference(Box<TypeDescriptor>),
    MutableReference(Box<TypeDescriptor>),
    /// Index into the enclosing function's type parameter list.
    TypeParameter(u16),
}

impl TypeDescriptor {
    pub fn scalar(name: impl Into<String>) -> Self {
        TypeDescriptor::Scalar(name.into())
    }

    pub fn structure(
        address: impl Into<String>,
        module: impl Into<String>,
        name: impl Into<String>,
        type_arguments: Vec<TypeDescriptor>,
    ) -> Self {
        TypeDescriptor::Struct(StructDescriptor {
            address: address.into(),
            module: module.into(),
            name: name.into(),
            type_arguments,
        })
    }

    pub fn vector(element: TypeDescriptor) -> Self {
        TypeDescriptor::Vector(Box::new(element))
    }

    pub fn reference(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Reference(Box::new(inner))
    }

    pub fn mutable_reference(inner: TypeDescriptor) -> Self {
        TypeDescriptor::MutableReference(Box::new(inner))
    }

    /// Human-readable name, e.g. `MutableReference(0x2::coin::Coin<0x2::sui::SUI>)`.
    pub fn canonical_name(&self) -> String {
        match self {
            TypeDescriptor::Scalar(name) => name.clone(),
            TypeDescriptor::Struct(s) => {
                let base = format!("{}::{}::{}", s.address, s.module, s.name);
                if s.type_arguments.is_empty() {
                    base
                } else {
                    let args: Vec<String> =
                        s.type_arguments.iter().map(|t| t.canonical_name()).collect();
                    format!("{}<{}>", base, args.join(", "))
                }
            }
            TypeDescriptor::Vector(inner) => format!("Vector({})", inner.canonical_name()),
            TypeDescriptor::Reference(inner) => format!("Reference({})", inner.canonical_name()),
            TypeDescriptor::MutableReference(inner) => {
                format!("MutableReference({})", inner.canonical_name())
            }
            TypeDescriptor::TypeParameter(idx) => format!("TypeParameter(Type{})", idx),
        }
    }

    /// Default argument kind for a parameter of this type.
    ///
    /// Scalars are `Pure`, vectors take the kind of their element, and
    /// everything else (structs, references, type parameters) is `Object`.
    pub fn argument_kind(&self) -> ArgumentKind {
        match self {
            TypeDescriptor::Scalar(_) => ArgumentKind::Pure,
            TypeDescriptor::Vector(inner) => inner.argument_kind(),
            _ => ArgumentKind::Object,
        }
    }

    /// True for `&TxContext` and `&mut TxContext`, which the runtime supplies.
    pub fn is_tx_context(&self) -> bool {
        let name = self.canonical_name();
        name == format!("MutableReference({})", TX_CONTEXT_TYPE)
            || name == format!("Reference({})", TX_CONTEXT_TYPE)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

// Primitives arrive as bare strings, everything else as a single-key object.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TypeDescriptorWire {
    Scalar(String),
    Tagged(TaggedType),
}

#[derive(Serialize, Deserialize)]
enum TaggedType {
    Struct(StructDescriptor),
    Vector(Box<TypeDescriptor>),
    Reference(Box<TypeDescriptor>),
    MutableReference(Box<TypeDescriptor>),
    TypeParameter(u16),
}

impl From<TypeDescriptorWire> for TypeDescriptor {
    fn from(wire: TypeDescriptorWire) -> Self {
        match wire {
            TypeDescriptorWire::Scalar(name) => TypeDescriptor::Scalar(name),
            TypeDescriptorWire::Tagged(TaggedType::Struct(s)) => TypeDescriptor::Struct(s),
            TypeDescriptorWire::Tagged(TaggedType::Vector(t)) => TypeDescriptor::Vector(t),
            TypeDescriptorWire::Tagged(TaggedType::Reference(t)) => TypeDescriptor::Reference(t),
            TypeDescriptorWire::Tagged(TaggedType::MutableReference(t)) => {
                TypeDescriptor::MutableReference(t)
            }
            TypeDescriptorWire::Tagged(TaggedType::TypeParameter(i)) => {
                TypeDescriptor::TypeParameter(i)
            }
        }
    }
}

impl From<TypeDescriptor> for TypeDescriptorWire {
    fn from(ty: TypeDescriptor) -> Self {
        match ty {
            TypeDescriptor::Scalar(name) => TypeDescriptorWire::Scalar(name),
            TypeDescriptor::Struct(s) => TypeDescriptorWire::Tagged(TaggedType::Struct(s)),
            TypeDescriptor::Vector(t) => TypeDescriptorWire::Tagged(TaggedType::Vector(t)),
            TypeDescriptor::Reference(t) => TypeDescriptorWire::Tagged(TaggedType::Reference(t)),
            TypeDescriptor::MutableReference(t) => {
                TypeDescriptorWire::Tagged(TaggedType::MutableReference(t))
            }
            TypeDescriptor::TypeParameter(i) => {
                TypeDescriptorWire::Tagged(TaggedType::TypeParameter(i))
            }
        }
    }
}
