//! Transaction steps: the closed set of commands a batch is built from.
//!
//! Each [`Step`] variant owns its arguments. Steps are edited by producing a
//! new value, never in place:
//!
//! - [`Step::update`] shallow-merges a [`StepPatch`]: fields set in the patch
//!   win, unset fields keep their previous value, and the step kind never
//!   changes.
//! - [`Step::append_default`], [`Step::replace_argument`] and
//!   [`Step::replace_element`] edit one collection by index and go through
//!   `update`, so sibling fields are untouched.
//!
//! ```
//! use sui_ptb_types::{Argument, Collection, Step, StepKind};
//!
//! let step = Step::new(StepKind::SplitCoins)
//!     .append_default(Collection::Amounts)
//!     .unwrap()
//!     .replace_argument(Collection::Amounts, 1, Argument::pure("100"))
//!     .unwrap();
//! assert_eq!(step.arguments_in(Collection::Amounts).unwrap().len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::argument::{Argument, ArgumentKind};
use crate::error::ModelError;
use crate::metadata::AbilitySet;

/// The closed set of step kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    MoveCall,
    SplitCoins,
    MergeCoins,
    MakeMoveVec,
    TransferObjects,
}

impl StepKind {
    /// All kinds in the order they are offered for selection.
    pub const ALL: [StepKind; 5] = [
        StepKind::MoveCall,
        StepKind::SplitCoins,
        StepKind::MergeCoins,
        StepKind::MakeMoveVec,
        StepKind::TransferObjects,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::MoveCall => "MoveCall",
            StepKind::SplitCoins => "SplitCoins",
            StepKind::MergeCoins => "MergeCoins",
            StepKind::MakeMoveVec => "MakeMoveVec",
            StepKind::TransferObjects => "TransferObjects",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StepKind::MoveCall => "Move Call",
            StepKind::SplitCoins => "Split Coins",
            StepKind::MergeCoins => "Merge Coins",
            StepKind::MakeMoveVec => "Make Move Vec",
            StepKind::TransferObjects => "Transfer Objects",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StepKind::MoveCall => "Call an onchain move function",
            StepKind::SplitCoins => "Split a coin into multiple smaller ones",
            StepKind::MergeCoins => "Merge multiple small coins into a bigger one",
            StepKind::MakeMoveVec => "Build a vector of Move elements",
            StepKind::TransferObjects => "Transfer objects to an address",
        }
    }

    /// The growable collection this kind owns.
    pub fn collection(self) -> Collection {
        match self {
            StepKind::MoveCall => Collection::Arguments,
            StepKind::SplitCoins => Collection::Amounts,
            StepKind::MergeCoins => Collection::Sources,
            StepKind::MakeMoveVec => Collection::Elements,
            StepKind::TransferObjects => Collection::Objects,
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ModelError::UnknownStepKind(s.to_string()))
    }
}

/// A growable, index-addressed collection inside a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Arguments,
    Amounts,
    Sources,
    Objects,
    Elements,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Arguments => "arguments",
            Collection::Amounts => "amounts",
            Collection::Sources => "sources",
            Collection::Objects => "objects",
            Collection::Elements => "elements",
        }
    }

    /// Kind of a freshly appended argument, `None` for raw element lists.
    pub fn default_kind(self) -> Option<ArgumentKind> {
        match self {
            Collection::Sources | Collection::Objects => Some(ArgumentKind::Object),
            Collection::Arguments | Collection::Amounts => Some(ArgumentKind::Pure),
            Collection::Elements => None,
        }
    }
}

/// A generic type parameter of the selected function and the type bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParameterBinding {
    /// User-entered Move type, e.g. `0x2::sui::SUI`. Empty until filled.
    pub bound_name: String,
    /// Constraint copied from the declaration; never edited.
    pub abilities: AbilitySet,
}

impl TypeParameterBinding {
    pub fn unbound(abilities: AbilitySet) -> Self {
        Self {
            bound_name: String::new(),
            abilities,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    pub package_id: String,
    pub module: String,
    pub function: String,
    #[serde(default)]
    pub type_arguments: Vec<TypeParameterBinding>,
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCoins {
    pub coin: Argument,
    #[serde(default)]
    pub amounts: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeCoins {
    pub destination: Argument,
    #[serde(default)]
    pub sources: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferObjects {
    #[serde(alias = "address")]
    pub recipient: Argument,
    #[serde(default)]
    pub objects: Vec<Argument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeMoveVec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(default)]
    pub elements: Vec<String>,
}

/// One operation in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Step {
    MoveCall(MoveCall),
    SplitCoins(SplitCoins),
    MergeCoins(MergeCoins),
    MakeMoveVec(MakeMoveVec),
    TransferObjects(TransferObjects),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveCallPatch {
    pub package_id: Option<String>,
    pub module: Option<String>,
    pub function: Option<String>,
    pub type_arguments: Option<Vec<TypeParameterBinding>>,
    pub arguments: Option<Vec<Argument>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitCoinsPatch {
    pub coin: Option<Argument>,
    pub amounts: Option<Vec<Argument>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeCoinsPatch {
    pub destination: Option<Argument>,
    pub sources: Option<Vec<Argument>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferObjectsPatch {
    pub recipient: Option<Argument>,
    pub objects: Option<Vec<Argument>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MakeMoveVecPatch {
    /// `Some(None)` clears the element type.
    pub element_type: Option<Option<String>>,
    pub elements: Option<Vec<String>>,
}

/// Partial update for a step. Only the variant matching the step applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPatch {
    MoveCall(MoveCallPatch),
    SplitCoins(SplitCoinsPatch),
    MergeCoins(MergeCoinsPatch),
    MakeMoveVec(MakeMoveVecPatch),
    TransferObjects(TransferObjectsPatch),
}

impl StepPatch {
    pub fn kind(&self) -> StepKind {
        match self {
            StepPatch::MoveCall(_) => StepKind::MoveCall,
            StepPatch::SplitCoins(_) => StepKind::SplitCoins,
            StepPatch::MergeCoins(_) => StepKind::MergeCoins,
            StepPatch::MakeMoveVec(_) => StepKind::MakeMoveVec,
            StepPatch::TransferObjects(_) => StepKind::TransferObjects,
        }
    }
}

fn merge<T: Clone>(current: &T, patch: Option<T>) -> T {
    patch.unwrap_or_else(|| current.clone())
}

fn capped_all(arguments: Option<Vec<Argument>>) -> Option<Vec<Argument>> {
    arguments.map(|list| list.into_iter().map(Argument::capped).collect())
}

impl Step {
    /// A step of `kind` with its default fields.
    pub fn new(kind: StepKind) -> Self {
        match kind {
            StepKind::MoveCall => Step::MoveCall(MoveCall::default()),
            StepKind::SplitCoins => Step::SplitCoins(SplitCoins {
                coin: Argument::blank(ArgumentKind::Object),
                amounts: vec![Argument::blank(ArgumentKind::Pure)],
            }),
            StepKind::MergeCoins => Step::MergeCoins(MergeCoins {
                destination: Argument::blank(ArgumentKind::Object),
                sources: vec![Argument::blank(ArgumentKind::Object)],
            }),
            StepKind::MakeMoveVec => Step::MakeMoveVec(MakeMoveVec::default()),
            StepKind::TransferObjects => Step::TransferObjects(TransferObjects {
                recipient: Argument::blank(ArgumentKind::Pure),
                objects: Vec::new(),
            }),
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            Step::MoveCall(_) => StepKind::MoveCall,
            Step::SplitCoins(_) => StepKind::SplitCoins,
            Step::MergeCoins(_) => StepKind::MergeCoins,
            Step::MakeMoveVec(_) => StepKind::MakeMoveVec,
            Step::TransferObjects(_) => StepKind::TransferObjects,
        }
    }

    /// Shallow merge of `patch` over this step.
    ///
    /// A patch for a different kind is ignored and the step is returned
    /// unchanged.
    pub fn update(&self, patch: StepPatch) -> Step {
        match (self, patch) {
            (Step::MoveCall(s), StepPatch::MoveCall(p)) => Step::MoveCall(MoveCall {
                package_id: merge(&s.package_id, p.package_id),
                module: merge(&s.module, p.module),
                function: merge(&s.function, p.function),
                type_arguments: merge(&s.type_arguments, p.type_arguments),
                arguments: merge(&s.arguments, capped_all(p.arguments)),
            }),
            (Step::SplitCoins(s), StepPatch::SplitCoins(p)) => Step::SplitCoins(SplitCoins {
                coin: merge(&s.coin, p.coin.map(Argument::capped)),
                amounts: merge(&s.amounts, capped_all(p.amounts)),
            }),
            (Step::MergeCoins(s), StepPatch::MergeCoins(p)) => Step::MergeCoins(MergeCoins {
                destination: merge(&s.destination, p.destination.map(Argument::capped)),
                sources: merge(&s.sources, capped_all(p.sources)),
            }),
            (Step::MakeMoveVec(s), StepPatch::MakeMoveVec(p)) => Step::MakeMoveVec(MakeMoveVec {
                element_type: merge(&s.element_type, p.element_type),
                elements: merge(&s.elements, p.elements),
            }),
            (Step::TransferObjects(s), StepPatch::TransferObjects(p)) => {
                Step::TransferObjects(TransferObjects {
                    recipient: merge(&s.recipient, p.recipient.map(Argument::capped)),
                    objects: merge(&s.objects, capped_all(p.objects)),
                })
            }
            (step, patch) => {
                warn!(
                    step = %step.kind(),
                    patch = %patch.kind(),
                    "ignoring patch for a different step kind"
                );
                step.clone()
            }
        }
    }

    /// Arguments of `collection`, if this step owns it.
    pub fn arguments_in(&self, collection: Collection) -> Result<&[Argument], ModelError> {
        match (self, collection) {
            (Step::MoveCall(s), Collection::Arguments) => Ok(&s.arguments),
            (Step::SplitCoins(s), Collection::Amounts) => Ok(&s.amounts),
            (Step::MergeCoins(s), Collection::Sources) => Ok(&s.sources),
            (Step::TransferObjects(s), Collection::Objects) => Ok(&s.objects),
            _ => Err(self.mismatch(collection)),
        }
    }

    /// Raw elements of a `MakeMoveVec` step.
    pub fn elements(&self) -> Result<&[String], ModelError> {
        match self {
            Step::MakeMoveVec(s) => Ok(&s.elements),
            _ => Err(self.mismatch(Collection::Elements)),
        }
    }

    /// Push one default element onto `collection`.
    pub fn append_default(&self, collection: Collection) -> Result<Step, ModelError> {
        match collection.default_kind() {
            Some(kind) => {
                let mut list = self.arguments_in(collection)?.to_vec();
                list.push(Argument::blank(kind));
                Ok(self.with_arguments(collection, list))
            }
            None => {
                let mut elements = self.elements()?.to_vec();
                elements.push(String::new());
                Ok(self.update(StepPatch::MakeMoveVec(MakeMoveVecPatch {
                    elements: Some(elements),
                    ..Default::default()
                })))
            }
        }
    }

    /// Replace the argument at `index` in `collection`.
    pub fn replace_argument(
        &self,
        collection: Collection,
        index: usize,
        argument: Argument,
    ) -> Result<Step, ModelError> {
        let list = self.arguments_in(collection)?;
        check_index(collection, index, list.len())?;
        let list = list
            .iter()
            .enumerate()
            .map(|(i, a)| if i == index { argument.clone() } else { a.clone() })
            .collect();
        Ok(self.with_arguments(collection, list))
    }

    /// Replace the raw element at `index` of a `MakeMoveVec` step.
    pub fn replace_element(
        &self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<Step, ModelError> {
        let mut elements = self.elements()?.to_vec();
        check_index(Collection::Elements, index, elements.len())?;
        elements[index] = value.into();
        Ok(self.update(StepPatch::MakeMoveVec(MakeMoveVecPatch {
            elements: Some(elements),
            ..Default::default()
        })))
    }

    /// Bind the type parameter at `index` of a `MoveCall` step.
    pub fn set_type_argument(
        &self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<Step, ModelError> {
        let Step::MoveCall(call) = self else {
            return Err(ModelError::KindMismatch {
                expected: StepKind::MoveCall.as_str(),
                found: self.kind().as_str(),
            });
        };
        check_index_named("type_arguments", index, call.type_arguments.len())?;
        let mut bindings = call.type_arguments.clone();
        bindings[index] = TypeParameterBinding {
            bound_name: name.into(),
            ..bindings[index].clone()
        };
        Ok(self.update(StepPatch::MoveCall(MoveCallPatch {
            type_arguments: Some(bindings),
            ..Default::default()
        })))
    }

    /// Every argument of this step with a field label, in declaration order.
    ///
    /// Labels look like `coin`, `amounts[1]` or `arguments[0]`.
    pub fn labeled_arguments(&self) -> Vec<(String, &Argument)> {
        fn indexed<'a>(name: &str, list: &'a [Argument]) -> Vec<(String, &'a Argument)> {
            list.iter()
                .enumerate()
                .map(|(i, a)| (format!("{}[{}]", name, i), a))
                .collect()
        }

        match self {
            Step::MoveCall(s) => indexed("arguments", &s.arguments),
            Step::SplitCoins(s) => {
                let mut out = vec![("coin".to_string(), &s.coin)];
                out.extend(indexed("amounts", &s.amounts));
                out
            }
            Step::MergeCoins(s) => {
                let mut out = vec![("destination".to_string(), &s.destination)];
                out.extend(indexed("sources", &s.sources));
                out
            }
            Step::TransferObjects(s) => {
                let mut out = indexed("objects", &s.objects);
                out.push(("recipient".to_string(), &s.recipient));
                out
            }
            Step::MakeMoveVec(_) => Vec::new(),
        }
    }

    fn with_arguments(&self, collection: Collection, list: Vec<Argument>) -> Step {
        let patch = match collection {
            Collection::Arguments => StepPatch::MoveCall(MoveCallPatch {
                arguments: Some(list),
                ..Default::default()
            }),
            Collection::Amounts => StepPatch::SplitCoins(SplitCoinsPatch {
                amounts: Some(list),
                ..Default::default()
            }),
            Collection::Sources => StepPatch::MergeCoins(MergeCoinsPatch {
                sources: Some(list),
                ..Default::default()
            }),
            Collection::Objects => StepPatch::TransferObjects(TransferObjectsPatch {
                objects: Some(list),
                ..Default::default()
            }),
            Collection::Elements => return self.clone(),
        };
        self.update(patch)
    }

    fn mismatch(&self, collection: Collection) -> ModelError {
        ModelError::CollectionMismatch {
            kind: self.kind().as_str(),
            collection: collection.as_str(),
        }
    }
}

fn check_index(collection: Collection, index: usize, len: usize) -> Result<(), ModelError> {
    check_index_named(collection.as_str(), index, len)
}

fn check_index_named(collection: &'static str, index: usize, len: usize) -> Result<(), ModelError> {
    if index < len {
        Ok(())
    } else {
        Err(ModelError::IndexOutOfRange {
            collection,
            index,
            len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Ability;

    #[test]
    fn test_defaults() {
        let Step::SplitCoins(split) = Step::new(StepKind::SplitCoins) else {
            panic!("expected SplitCoins");
        };
        assert_eq!(split.coin, Argument::blank(ArgumentKind::Object));
        assert_eq!(split.amounts, vec![Argument::blank(ArgumentKind::Pure)]);

        let Step::MergeCoins(merge) = Step::new(StepKind::MergeCoins) else {
            panic!("expected MergeCoins");
        };
        assert_eq!(merge.sources.len(), 1);

        let Step::TransferObjects(transfer) = Step::new(StepKind::TransferObjects) else {
            panic!("expected TransferObjects");
        };
        assert_eq!(transfer.recipient.kind, ArgumentKind::Pure);
        assert!(transfer.objects.is_empty());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("MergeCoins".parse::<StepKind>(), Ok(StepKind::MergeCoins));
        assert_eq!(
            "Publish".parse::<StepKind>(),
            Err(ModelError::UnknownStepKind("Publish".to_string()))
        );
    }

    #[test]
    fn test_update_is_shallow_merge() {
        let step = Step::new(StepKind::MoveCall).update(StepPatch::MoveCall(MoveCallPatch {
            package_id: Some("0x2".to_string()),
            module: Some("coin".to_string()),
            ..Default::default()
        }));
        let step = step.update(StepPatch::MoveCall(MoveCallPatch {
            function: Some("value".to_string()),
            ..Default::default()
        }));
        let Step::MoveCall(call) = step else {
            panic!("expected MoveCall");
        };
        assert_eq!(call.package_id, "0x2");
        assert_eq!(call.module, "coin");
        assert_eq!(call.function, "value");
    }

    #[test]
    fn test_update_caps_patched_raw_values() {
        let mut oversized = Argument::nested_result(0, 1);
        oversized.raw_values = Some(vec!["0".into(), "1".into(), "2".into(), "3".into()]);

        let step = Step::new(StepKind::MergeCoins).update(StepPatch::MergeCoins(MergeCoinsPatch {
            destination: Some(oversized.clone()),
            sources: Some(vec![oversized]),
        }));
        let Step::MergeCoins(merge) = step else {
            panic!("expected MergeCoins");
        };
        assert_eq!(merge.destination, Argument::nested_result(0, 1));
        assert_eq!(merge.sources, vec![Argument::nested_result(0, 1)]);
    }

    #[test]
    fn test_update_never_changes_kind() {
        let step = Step::new(StepKind::SplitCoins);
        let updated = step.update(StepPatch::TransferObjects(TransferObjectsPatch {
            recipient: Some(Argument::pure("0x1")),
            ..Default::default()
        }));
        assert_eq!(updated, step);
    }

    #[test]
    fn test_append_default_adds_pure_amount() {
        let step = Step::new(StepKind::SplitCoins);
        let before = step.arguments_in(Collection::Amounts).unwrap().to_vec();
        let grown = step.append_default(Collection::Amounts).unwrap();
        let after = grown.arguments_in(Collection::Amounts).unwrap();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[..before.len()], before[..]);
        assert_eq!(after[before.len()], Argument::blank(ArgumentKind::Pure));
        // the original step is untouched
        assert_eq!(step.arguments_in(Collection::Amounts).unwrap(), &before[..]);
    }

    #[test]
    fn test_append_default_object_collections() {
        let step = Step::new(StepKind::MergeCoins)
            .append_default(Collection::Sources)
            .unwrap();
        let sources = step.arguments_in(Collection::Sources).unwrap();
        assert!(sources.iter().all(|a| a.kind == ArgumentKind::Object));
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn test_append_and_replace_elements() {
        let step = Step::new(StepKind::MakeMoveVec)
            .append_default(Collection::Elements)
            .unwrap()
            .append_default(Collection::Elements)
            .unwrap()
            .replace_element(1, "7")
            .unwrap();
        assert_eq!(step.elements().unwrap(), &["".to_string(), "7".to_string()]);
    }

    #[test]
    fn test_replace_out_of_range_fails() {
        let step = Step::new(StepKind::SplitCoins);
        let err = step
            .replace_argument(Collection::Amounts, 3, Argument::pure("1"))
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::IndexOutOfRange {
                collection: "amounts",
                index: 3,
                len: 1
            }
        );
        assert!(step.replace_element(0, "x").is_err());
    }

    #[test]
    fn test_wrong_collection_fails() {
        let step = Step::new(StepKind::MergeCoins);
        assert_eq!(
            step.append_default(Collection::Amounts).unwrap_err(),
            ModelError::CollectionMismatch {
                kind: "MergeCoins",
                collection: "amounts"
            }
        );
    }

    #[test]
    fn test_set_type_argument_keeps_abilities() {
        let step = Step::new(StepKind::MoveCall).update(StepPatch::MoveCall(MoveCallPatch {
            type_arguments: Some(vec![TypeParameterBinding::unbound(AbilitySet::new(vec![
                Ability::Key,
            ]))]),
            ..Default::default()
        }));
        let step = step.set_type_argument(0, "0x2::sui::SUI").unwrap();
        let Step::MoveCall(call) = &step else {
            panic!("expected MoveCall");
        };
        assert_eq!(call.type_arguments[0].bound_name, "0x2::sui::SUI");
        assert!(call.type_arguments[0].abilities.contains(Ability::Key));

        assert!(Step::new(StepKind::SplitCoins)
            .set_type_argument(0, "u64")
            .is_err());
    }

    #[test]
    fn test_labeled_arguments() {
        let step = Step::new(StepKind::SplitCoins);
        let labels: Vec<String> = step
            .labeled_arguments()
            .into_iter()
            .map(|(l, _)| l)
            .collect();
        assert_eq!(labels, vec!["coin", "amounts[0]"]);
    }

    #[test]
    fn test_serde_tagged_by_kind() {
        let value = serde_json::to_value(Step::new(StepKind::MakeMoveVec)).unwrap();
        assert_eq!(value["kind"], "MakeMoveVec");

        let step: Step = serde_json::from_value(serde_json::json!({
            "kind": "TransferObjects",
            "address": {"kind": "Pure", "raw_values": ["0xabc"]},
            "objects": [{"kind": "Object", "raw_values": ["0x123"]}]
        }))
        .unwrap();
        assert_eq!(step.kind(), StepKind::TransferObjects);
    }
}
