//! Lowering a ready batch into a PTB JSON spec.
//!
//! The output is the `{inputs, commands}` input of the MCP `execute_ptb`
//! tool (`inputs` are parsed by its `parse_input_spec`, `commands` by its
//! `parse_command`):
//!
//! ```json
//! {
//!   "inputs": [{"kind": "pure", "value": "100", "type": "u64"}, {"object_id": "0x..."}],
//!   "commands": [
//!     {"kind": "SplitCoins", "coin": {"gas_coin": true}, "amounts": [{"input": 0}]},
//!     {"kind": "TransferObjects", "objects": [{"nested_result": [0, 0]}], "address": {"input": 1}}
//!   ]
//! }
//! ```
//!
//! Literal `Pure` values become one input each, in order of appearance.
//! `Object` inputs are shared by every argument naming the same object.
//!
//! Pure inputs are only typed with names the tool can encode: `u8` to
//! `u128`, `bool`, `address`, `vector<u8>` (UTF-8 text) and
//! `vector_u8_hex`. Values of any other type cannot be lowered and are
//! reported by the readiness check.

use anyhow::{anyhow, Result};
use move_core_types::account_address::AccountAddress;
use move_core_types::language_storage::TypeTag;
use serde::Serialize;
use std::collections::HashMap;

use sui_ptb_types::address::normalize_address;
use sui_ptb_types::type_input::parse_type_input;
use sui_ptb_types::{Argument, ArgumentKind, Batch, Step, TypeDescriptor};

use crate::readiness::check_readiness;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PtbSpec {
    pub inputs: Vec<InputSpec>,
    pub commands: Vec<CommandSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InputSpec {
    Pure(PureInput),
    Object(ObjectInput),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PureInput {
    kind: &'static str,
    pub value: String,
    /// Encoding name when the value's type is known.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
}

impl PureInput {
    pub fn new(value: impl Into<String>, type_hint: Option<String>) -> Self {
        Self {
            kind: "pure",
            value: value.into(),
            type_hint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectInput {
    pub object_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgSpec {
    Input { input: u16 },
    Result { result: u16 },
    NestedResult { nested_result: [u16; 2] },
    GasCoin { gas_coin: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum CommandSpec {
    MoveCall {
        package: String,
        module: String,
        function: String,
        type_args: Vec<String>,
        args: Vec<ArgSpec>,
    },
    SplitCoins {
        coin: ArgSpec,
        amounts: Vec<ArgSpec>,
    },
    MergeCoins {
        destination: ArgSpec,
        sources: Vec<ArgSpec>,
    },
    TransferObjects {
        objects: Vec<ArgSpec>,
        address: ArgSpec,
    },
    MakeMoveVec {
        #[serde(skip_serializing_if = "Option::is_none")]
        type_arg: Option<String>,
        elements: Vec<ArgSpec>,
    },
}

/// How one value of a known type is passed to `execute_ptb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Encoding {
    /// Pure input carrying this `type` name.
    Pure(&'static str),
    /// Pure input typed by the tool from the value itself.
    Untyped,
    Object,
    Unsupported,
}

fn scalar_encoding(name: &str) -> Encoding {
    match name.to_ascii_lowercase().as_str() {
        "u8" => Encoding::Pure("u8"),
        "u16" => Encoding::Pure("u16"),
        "u32" => Encoding::Pure("u32"),
        "u64" => Encoding::Pure("u64"),
        "u128" => Encoding::Pure("u128"),
        "bool" => Encoding::Pure("bool"),
        "address" => Encoding::Pure("address"),
        _ => Encoding::Unsupported,
    }
}

fn bytes_encoding(value: &str) -> Encoding {
    if value.trim().starts_with("0x") {
        Encoding::Pure("vector_u8_hex")
    } else {
        Encoding::Pure("vector<u8>")
    }
}

/// Encoding of `value` for a parameter declared as `ty`.
pub(crate) fn declared_encoding(ty: &TypeDescriptor, value: &str) -> Encoding {
    match ty {
        TypeDescriptor::Scalar(name) => scalar_encoding(name),
        TypeDescriptor::Vector(inner) => match inner.as_ref() {
            TypeDescriptor::Scalar(name) if name.eq_ignore_ascii_case("u8") => {
                bytes_encoding(value)
            }
            _ => Encoding::Unsupported,
        },
        // std types such as String are values, not objects
        TypeDescriptor::Struct(s) if normalize_address(&s.address) == normalize_address("0x1") => {
            Encoding::Unsupported
        }
        TypeDescriptor::TypeParameter(_) => Encoding::Untyped,
        _ => Encoding::Object,
    }
}

/// Encoding of `value` for a user-typed element type.
pub(crate) fn tag_encoding(tag: &TypeTag, value: &str) -> Encoding {
    match tag {
        TypeTag::Bool => Encoding::Pure("bool"),
        TypeTag::U8 => Encoding::Pure("u8"),
        TypeTag::U16 => Encoding::Pure("u16"),
        TypeTag::U32 => Encoding::Pure("u32"),
        TypeTag::U64 => Encoding::Pure("u64"),
        TypeTag::U128 => Encoding::Pure("u128"),
        TypeTag::Address => Encoding::Pure("address"),
        TypeTag::Vector(inner) if **inner == TypeTag::U8 => bytes_encoding(value),
        TypeTag::Struct(s) if s.address != AccountAddress::ONE => Encoding::Object,
        _ => Encoding::Unsupported,
    }
}

#[derive(Default)]
struct InputTable {
    inputs: Vec<InputSpec>,
    objects: HashMap<String, u16>,
}

impl InputTable {
    fn push(&mut self, input: InputSpec) -> Result<ArgSpec> {
        let index = u16::try_from(self.inputs.len())
            .map_err(|_| anyhow!("Too many inputs for one transaction"))?;
        self.inputs.push(input);
        Ok(ArgSpec::Input { input: index })
    }

    fn pure(&mut self, value: &str, type_hint: Option<&str>) -> Result<ArgSpec> {
        self.push(InputSpec::Pure(PureInput::new(
            value.trim(),
            type_hint.map(str::to_string),
        )))
    }

    fn object(&mut self, id: &str) -> Result<ArgSpec> {
        let key = normalize_address(id);
        if let Some(&input) = self.objects.get(&key) {
            return Ok(ArgSpec::Input { input });
        }
        let arg = self.push(InputSpec::Object(ObjectInput {
            object_id: id.trim().to_string(),
        }))?;
        if let ArgSpec::Input { input } = arg {
            self.objects.insert(key, input);
        }
        Ok(arg)
    }

    /// Lower a value whose encoding is already decided.
    fn encoded(&mut self, value: &str, encoding: Encoding, type_name: &str) -> Result<ArgSpec> {
        match encoding {
            Encoding::Pure(hint) => self.pure(value, Some(hint)),
            Encoding::Untyped => self.pure(value, None),
            Encoding::Object => self.object(value),
            Encoding::Unsupported => Err(anyhow!(
                "Values of type {} cannot be passed as pure inputs",
                type_name
            )),
        }
    }

    /// Lower one argument; `default_hint` types pure values with no declared type.
    fn argument(&mut self, arg: &Argument, default_hint: Option<&'static str>) -> Result<ArgSpec> {
        match arg.kind {
            ArgumentKind::Gas => Ok(ArgSpec::GasCoin { gas_coin: true }),
            ArgumentKind::Object => self.object(arg.slot(0)),
            ArgumentKind::Pure => {
                let value = arg.slot(0);
                match &arg.declared_type {
                    Some(ty) => {
                        let encoding = match declared_encoding(ty, value) {
                            Encoding::Object => Encoding::Unsupported,
                            other => other,
                        };
                        self.encoded(value, encoding, &ty.canonical_name())
                    }
                    None => self.pure(value, default_hint),
                }
            }
            ArgumentKind::Result => {
                let result = arg
                    .result_index()
                    .ok_or_else(|| anyhow!("Unresolved result reference '{}'", arg.slot(0)))?;
                Ok(ArgSpec::Result { result })
            }
            ArgumentKind::NestedResult => {
                let (Some(step), Some(output)) = (arg.result_index(), arg.nested_index()) else {
                    return Err(anyhow!(
                        "Unresolved nested result reference [{}, {}]",
                        arg.slot(0),
                        arg.slot(1)
                    ));
                };
                Ok(ArgSpec::NestedResult {
                    nested_result: [step, output],
                })
            }
        }
    }

    fn arguments(
        &mut self,
        args: &[Argument],
        default_hint: Option<&'static str>,
    ) -> Result<Vec<ArgSpec>> {
        args.iter()
            .map(|a| self.argument(a, default_hint))
            .collect()
    }
}

fn lower_step(table: &mut InputTable, step: &Step) -> Result<CommandSpec> {
    Ok(match step {
        Step::MoveCall(call) => CommandSpec::MoveCall {
            package: call.package_id.trim().to_string(),
            module: call.module.trim().to_string(),
            function: call.function.trim().to_string(),
            type_args: call
                .type_arguments
                .iter()
                .map(|b| b.bound_name.trim().to_string())
                .collect(),
            args: table.arguments(&call.arguments, None)?,
        },
        Step::SplitCoins(split) => CommandSpec::SplitCoins {
            coin: table.argument(&split.coin, None)?,
            amounts: table.arguments(&split.amounts, Some("u64"))?,
        },
        Step::MergeCoins(merge) => CommandSpec::MergeCoins {
            destination: table.argument(&merge.destination, None)?,
            sources: table.arguments(&merge.sources, None)?,
        },
        Step::TransferObjects(transfer) => CommandSpec::TransferObjects {
            objects: table.arguments(&transfer.objects, None)?,
            address: table.argument(&transfer.recipient, Some("address"))?,
        },
        Step::MakeMoveVec(vec) => {
            let type_arg = vec
                .element_type
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            let tag = type_arg
                .as_deref()
                .map(|t| {
                    parse_type_input(t).map_err(|e| anyhow!("Invalid element type '{}': {}", t, e))
                })
                .transpose()?;
            let elements = vec
                .elements
                .iter()
                .map(|e| match (&tag, &type_arg) {
                    (Some(tag), Some(name)) => table.encoded(e, tag_encoding(tag, e), name),
                    _ => table.pure(e, None),
                })
                .collect::<Result<Vec<_>>>()?;
            CommandSpec::MakeMoveVec { type_arg, elements }
        }
    })
}

/// Lower `batch` into a PTB spec.
///
/// Fails when the batch is not ready; the error lists the first issues found.
pub fn lower_batch(batch: &Batch) -> Result<PtbSpec> {
    let report = check_readiness(batch);
    if !report.is_ready() {
        let shown: Vec<String> = report
            .issues
            .iter()
            .take(5)
            .map(|i| format!("step {} {}: {}", i.step, i.field, i.message))
            .collect();
        return Err(anyhow!(
            "Batch is not ready ({} issues): {}",
            report.issues.len(),
            shown.join("; ")
        ));
    }

    let mut table = InputTable::default();
    let commands = batch
        .steps()
        .iter()
        .map(|step| lower_step(&mut table, step))
        .collect::<Result<Vec<_>>>()?;

    Ok(PtbSpec {
        inputs: table.inputs,
        commands,
    })
}
