//! Execution-readiness check for a batch.
//!
//! Edits never validate: a half-typed batch is a normal state. Before a
//! batch is handed to simulation it goes through [`check_readiness`], which
//! reports every incomplete or inconsistent argument as data:
//!
//! - blank or unparseable literals and indexes
//! - `Result`/`NestedResult` references to the step itself or to later steps
//! - references to steps that produce no value
//! - call targets with a missing or malformed package, module or function
//! - unbound or malformed type arguments
//! - required collections left empty
//! - pure values of a type the lowered spec cannot encode
//! - arguments carrying more raw values than their kind can hold
//!
//! Step results that nothing references are reported as warnings.

use move_core_types::identifier::Identifier;
use serde::Serialize;
use std::fmt;

use sui_ptb_types::address::parse_address;
use sui_ptb_types::argument::MAX_SLOTS;
use sui_ptb_types::type_input::parse_type_input;
use sui_ptb_types::{Argument, ArgumentKind, Batch, Step};

use crate::lower::{declared_encoding, tag_encoding, Encoding};

/// Why a step is not ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueKind {
    /// A required slot is blank.
    MissingValue,
    /// A step or output index does not parse, or points at nothing.
    InvalidIndex,
    /// `NestedResult` without its second slot.
    MissingNestedIndex,
    /// Reference to a step that comes later in the batch.
    ForwardReference,
    /// Reference to the step's own result.
    SelfReference,
    /// Call target (package, module or function) not chosen.
    MissingTarget,
    InvalidPackageId,
    /// Object ID or recipient that is not an address.
    InvalidAddress,
    InvalidIdentifier,
    UnboundTypeParameter,
    InvalidTypeArgument,
    /// A collection the command needs at least one entry in is empty.
    EmptyCollection,
    /// Pure value whose type has no pure encoding.
    UnsupportedPureType,
    /// More raw values than any argument kind reads.
    TooManyValues,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One problem found in one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessIssue {
    pub step: usize,
    /// Field label, e.g. `amounts[1]` or `type_arguments[0]`.
    pub field: String,
    pub kind: IssueKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadinessReport {
    pub issues: Vec<ReadinessIssue>,
    /// Non-fatal findings.
    pub warnings: Vec<String>,
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues_for(&self, step: usize) -> impl Iterator<Item = &ReadinessIssue> {
        self.issues.iter().filter(move |i| i.step == step)
    }
}

struct Checker<'a> {
    batch: &'a Batch,
    step: usize,
    issues: Vec<ReadinessIssue>,
}

impl<'a> Checker<'a> {
    fn push(&mut self, field: &str, kind: IssueKind, message: String) {
        self.issues.push(ReadinessIssue {
            step: self.step,
            field: field.to_string(),
            kind,
            message,
        });
    }

    fn argument(&mut self, field: &str, arg: &Argument) {
        let len = arg.raw_values.as_ref().map_or(0, Vec::len);
        if len > MAX_SLOTS {
            self.push(
                field,
                IssueKind::TooManyValues,
                format!("{} raw values, at most {} allowed", len, MAX_SLOTS),
            );
        }
        match arg.kind {
            ArgumentKind::Gas => {}
            ArgumentKind::Pure => {
                if !arg.is_filled() {
                    self.push(field, IssueKind::MissingValue, "value is blank".to_string());
                } else if let Some(ty) = &arg.declared_type {
                    if matches!(
                        declared_encoding(ty, arg.slot(0)),
                        Encoding::Object | Encoding::Unsupported
                    ) {
                        self.push(
                            field,
                            IssueKind::UnsupportedPureType,
                            format!("{} values cannot be passed as pure inputs", ty),
                        );
                    }
                }
            }
            ArgumentKind::Object => {
                let id = arg.slot(0);
                if !arg.is_filled() {
                    self.push(field, IssueKind::MissingValue, "object ID is blank".to_string());
                } else if parse_address(id).is_none() {
                    self.push(
                        field,
                        IssueKind::InvalidAddress,
                        format!("'{}' is not an object ID", id),
                    );
                }
            }
            ArgumentKind::Result | ArgumentKind::NestedResult => self.reference(field, arg),
        }
    }

    fn reference(&mut self, field: &str, arg: &Argument) {
        let raw = arg.slot(0);
        if raw.trim().is_empty() {
            self.push(field, IssueKind::MissingValue, "step index is blank".to_string());
            return;
        }
        let Some(target) = arg.result_index() else {
            self.push(
                field,
                IssueKind::InvalidIndex,
                format!("'{}' is not a step index", raw),
            );
            return;
        };
        let target = target as usize;
        if target == self.step {
            self.push(
                field,
                IssueKind::SelfReference,
                format!("Step {} references its own result", self.step),
            );
            return;
        }
        if target > self.step {
            self.push(
                field,
                IssueKind::ForwardReference,
                format!(
                    "Step {} references Result({}) which hasn't been produced yet",
                    self.step, target
                ),
            );
            return;
        }

        let outputs = match self.batch.get(target) {
            Some(step) => output_count(step),
            None => Some(0),
        };
        if outputs == Some(0) {
            self.push(
                field,
                IssueKind::InvalidIndex,
                format!("Step {} produces no result", target),
            );
            return;
        }

        if arg.kind != ArgumentKind::NestedResult {
            return;
        }
        let nested_raw = arg.slot(1);
        if nested_raw.trim().is_empty() {
            self.push(
                field,
                IssueKind::MissingNestedIndex,
                "nested result index is blank".to_string(),
            );
            return;
        }
        match arg.nested_index() {
            None => self.push(
                field,
                IssueKind::InvalidIndex,
                format!("'{}' is not a result index", nested_raw),
            ),
            Some(nested) => {
                if let Some(count) = outputs {
                    if nested as usize >= count {
                        self.push(
                            field,
                            IssueKind::InvalidIndex,
                            format!(
                                "NestedResult({}, {}) but step {} produces {} results",
                                target, nested, target, count
                            ),
                        );
                    }
                }
            }
        }
    }

    fn identifier(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, IssueKind::MissingTarget, format!("{} is not selected", field));
        } else if Identifier::new(value).is_err() {
            self.push(
                field,
                IssueKind::InvalidIdentifier,
                format!("'{}' is not a Move identifier", value),
            );
        }
    }

    fn type_argument(&mut self, field: &str, value: &str) {
        if let Err(reason) = parse_type_input(value) {
            self.push(
                field,
                IssueKind::InvalidTypeArgument,
                format!("'{}' is not a Move type: {}", value, reason),
            );
        }
    }

    fn non_empty(&mut self, field: &str, len: usize) {
        if len == 0 {
            self.push(field, IssueKind::EmptyCollection, format!("{} is empty", field));
        }
    }

    fn step(&mut self, step: &Step) {
        match step {
            Step::MoveCall(call) => {
                if call.package_id.trim().is_empty() {
                    self.push(
                        "package_id",
                        IssueKind::MissingTarget,
                        "package is not selected".to_string(),
                    );
                } else if parse_address(&call.package_id).is_none() {
                    self.push(
                        "package_id",
                        IssueKind::InvalidPackageId,
                        format!("'{}' is not a package ID", call.package_id),
                    );
                }
                self.identifier("module", &call.module);
                self.identifier("function", &call.function);
                for (i, binding) in call.type_arguments.iter().enumerate() {
                    let field = format!("type_arguments[{}]", i);
                    if binding.bound_name.trim().is_empty() {
                        self.push(
                            &field,
                            IssueKind::UnboundTypeParameter,
                            format!("type parameter T{} is unbound", i),
                        );
                    } else {
                        self.type_argument(&field, &binding.bound_name);
                    }
                }
            }
            Step::SplitCoins(split) => self.non_empty("amounts", split.amounts.len()),
            Step::MergeCoins(merge) => self.non_empty("sources", merge.sources.len()),
            Step::TransferObjects(transfer) => {
                self.non_empty("objects", transfer.objects.len());
                let recipient = &transfer.recipient;
                if recipient.kind == ArgumentKind::Pure
                    && !recipient.slot(0).trim().is_empty()
                    && parse_address(recipient.slot(0)).is_none()
                {
                    self.push(
                        "recipient",
                        IssueKind::InvalidAddress,
                        format!("'{}' is not an address", recipient.slot(0)),
                    );
                }
            }
            Step::MakeMoveVec(vec) => {
                let element_type = vec
                    .element_type
                    .as_deref()
                    .filter(|t| !t.trim().is_empty());
                let tag = match element_type {
                    Some(ty) => match parse_type_input(ty) {
                        Ok(tag) => Some(tag),
                        Err(_) => {
                            self.type_argument("element_type", ty);
                            None
                        }
                    },
                    None if vec.elements.is_empty() => {
                        self.push(
                            "elements",
                            IssueKind::EmptyCollection,
                            "an empty vector needs an element type".to_string(),
                        );
                        None
                    }
                    None => None,
                };
                for (i, element) in vec.elements.iter().enumerate() {
                    let field = format!("elements[{}]", i);
                    if element.trim().is_empty() {
                        self.push(&field, IssueKind::MissingValue, "value is blank".to_string());
                        continue;
                    }
                    match tag.as_ref().map(|t| tag_encoding(t, element)) {
                        Some(Encoding::Object) if parse_address(element).is_none() => self.push(
                            &field,
                            IssueKind::InvalidAddress,
                            format!("'{}' is not an object ID", element),
                        ),
                        Some(Encoding::Unsupported) => self.push(
                            &field,
                            IssueKind::UnsupportedPureType,
                            format!(
                                "{} values cannot be passed as pure inputs",
                                element_type.unwrap_or_default()
                            ),
                        ),
                        _ => {}
                    }
                }
            }
        }

        for (field, arg) in step.labeled_arguments() {
            self.argument(&field, arg);
        }
    }
}

/// Number of values a step yields, `None` when only known after execution.
fn output_count(step: &Step) -> Option<usize> {
    match step {
        Step::SplitCoins(split) => Some(split.amounts.len()),
        Step::MakeMoveVec(_) => Some(1),
        Step::MergeCoins(_) | Step::TransferObjects(_) => Some(0),
        Step::MoveCall(_) => None,
    }
}

/// Check every step of `batch` and collect what keeps it from executing.
pub fn check_readiness(batch: &Batch) -> ReadinessReport {
    let mut checker = Checker {
        batch,
        step: 0,
        issues: Vec::new(),
    };
    for (index, step) in batch.steps().iter().enumerate() {
        checker.step = index;
        checker.step(step);
    }

    ReadinessReport {
        issues: checker.issues,
        warnings: unused_results(batch),
    }
}

fn unused_results(batch: &Batch) -> Vec<String> {
    let steps = batch.steps();
    let mut used = vec![false; steps.len()];
    for step in steps {
        for (_, arg) in step.labeled_arguments() {
            if let Some(target) = arg.result_index() {
                if let Some(flag) = used.get_mut(target as usize) {
                    *flag = true;
                }
            }
        }
    }

    // the last step's result is the transaction's own output
    if let Some(last) = used.last_mut() {
        *last = true;
    }

    used.iter()
        .enumerate()
        .filter(|(i, used)| !**used && output_count(&steps[*i]) != Some(0))
        .map(|(i, _)| format!("Step {} result is never used", i))
        .collect()
}
