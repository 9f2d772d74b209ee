//! A single input to a transaction step.
//!
//! An [`Argument`] pairs a source classification ([`ArgumentKind`]) with the
//! raw strings the user typed. Raw values are kept across kind changes so a
//! literal survives switching from `Pure` to `Object` and back; `Gas` simply
//! ignores whatever is stored.
//!
//! Slot layout by kind:
//!
//! | kind           | slot 0             | slot 1        |
//! |----------------|--------------------|---------------|
//! | `Object`       | object ID          | -             |
//! | `Pure`         | literal value      | -             |
//! | `Gas`          | -                  | -             |
//! | `Result`       | step index         | -             |
//! | `NestedResult` | step index         | output index  |
//!
//! Every edit produces a new `Argument`; nothing is mutated in place.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::type_descriptor::TypeDescriptor;

/// Maximum number of raw value slots an argument carries.
pub const MAX_SLOTS: usize = 2;

/// Where an argument's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgumentKind {
    Object,
    Pure,
    Gas,
    Result,
    NestedResult,
}

impl ArgumentKind {
    pub const ALL: [ArgumentKind; 5] = [
        ArgumentKind::Object,
        ArgumentKind::Pure,
        ArgumentKind::Gas,
        ArgumentKind::Result,
        ArgumentKind::NestedResult,
    ];

    /// Number of raw value slots this kind reads.
    pub fn slot_count(self) -> usize {
        match self {
            ArgumentKind::Gas => 0,
            ArgumentKind::Object | ArgumentKind::Pure | ArgumentKind::Result => 1,
            ArgumentKind::NestedResult => 2,
        }
    }

    /// True for kinds that point at an earlier step's output.
    pub fn is_reference(self) -> bool {
        matches!(self, ArgumentKind::Result | ArgumentKind::NestedResult)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArgumentKind::Object => "Object",
            ArgumentKind::Pure => "Pure",
            ArgumentKind::Gas => "Gas",
            ArgumentKind::Result => "Result",
            ArgumentKind::NestedResult => "NestedResult",
        }
    }
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ArgumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArgumentKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown argument kind: {}", s))
    }
}

/// One input value of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub kind: ArgumentKind,
    /// At most [`MAX_SLOTS`] raw strings; `None` when the user cleared the value.
    #[serde(default, deserialize_with = "deserialize_raw_values")]
    pub raw_values: Option<Vec<String>>,
    /// Declared parameter type, present for arguments projected from a signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<TypeDescriptor>,
}

fn deserialize_raw_values<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<String>>::deserialize(deserializer)?;
    let len = values.as_ref().map_or(0, Vec::len);
    if len > MAX_SLOTS {
        return Err(de::Error::invalid_length(len, &"at most 2 raw values"));
    }
    Ok(values)
}

impl Argument {
    /// An argument of `kind` with a single empty slot, as added by "add another".
    pub fn blank(kind: ArgumentKind) -> Self {
        Self {
            kind,
            raw_values: Some(vec![String::new()]),
            declared_type: None,
        }
    }

    /// An argument of `kind` with no slots filled yet.
    pub fn empty(kind: ArgumentKind) -> Self {
        Self {
            kind,
            raw_values: Some(Vec::new()),
            declared_type: None,
        }
    }

    pub fn object(id: impl Into<String>) -> Self {
        Self::literal(ArgumentKind::Object, id)
    }

    pub fn pure(value: impl Into<String>) -> Self {
        Self::literal(ArgumentKind::Pure, value)
    }

    pub fn gas() -> Self {
        Self::empty(ArgumentKind::Gas)
    }

    pub fn result(step: u16) -> Self {
        Self::literal(ArgumentKind::Result, step.to_string())
    }

    pub fn nested_result(step: u16, output: u16) -> Self {
        Self {
            kind: ArgumentKind::NestedResult,
            raw_values: Some(vec![step.to_string(), output.to_string()]),
            declared_type: None,
        }
    }

    fn literal(kind: ArgumentKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            raw_values: Some(vec![value.into()]),
            declared_type: None,
        }
    }

    /// Placeholder for a projected parameter: kind from the type, no values yet.
    pub fn for_parameter(declared_type: TypeDescriptor) -> Self {
        Self {
            kind: declared_type.argument_kind(),
            raw_values: Some(Vec::new()),
            declared_type: Some(declared_type),
        }
    }

    /// Same argument with a different kind. Raw values are kept.
    pub fn with_kind(&self, kind: ArgumentKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    /// Same argument with its raw values replaced wholesale.
    ///
    /// Values beyond [`MAX_SLOTS`] are dropped.
    pub fn with_raw_values(&self, raw_values: Option<Vec<String>>) -> Self {
        Self {
            raw_values,
            ..self.clone()
        }
        .capped()
    }

    /// Same argument with any raw values past [`MAX_SLOTS`] dropped.
    pub fn capped(mut self) -> Self {
        if let Some(values) = self.raw_values.as_mut() {
            values.truncate(MAX_SLOTS);
        }
        self
    }

    /// Same argument with one slot edited and the other slot preserved.
    ///
    /// Editing slot 0 of a fresh argument yields `[value, ""]`, so a
    /// `NestedResult` always has a second slot to fill afterwards.
    pub fn with_slot(&self, slot: usize, value: impl Into<String>) -> Self {
        let value = value.into();
        let values = match slot {
            0 => vec![value, self.slot(1).to_string()],
            _ => vec![self.slot(0).to_string(), value],
        };
        self.with_raw_values(Some(values))
    }

    /// Raw value in `slot`, or `""` when the slot is absent.
    pub fn slot(&self, slot: usize) -> &str {
        self.raw_values
            .as_ref()
            .and_then(|v| v.get(slot))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Referenced step index for `Result`/`NestedResult`, if it parses.
    pub fn result_index(&self) -> Option<u16> {
        if !self.kind.is_reference() {
            return None;
        }
        self.slot(0).trim().parse().ok()
    }

    /// Referenced output index for `NestedResult`, if it parses.
    pub fn nested_index(&self) -> Option<u16> {
        if self.kind != ArgumentKind::NestedResult {
            return None;
        }
        self.slot(1).trim().parse().ok()
    }

    /// True when every slot this kind reads holds a non-blank value.
    ///
    /// This is a shape check only; whether a referenced step exists is
    /// decided by the batch-level readiness pass.
    pub fn is_filled(&self) -> bool {
        (0..self.kind.slot_count()).all(|i| !self.slot(i).trim().is_empty())
    }
}
