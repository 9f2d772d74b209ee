//! An ordered batch of steps.
//!
//! Batch order is execution order: a `Result`/`NestedResult` argument in step
//! `i` is expected to point at some step `j < i`. The batch itself does not
//! enforce that; forward and dangling references are reported by the
//! readiness pass before execution.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ModelError;
use crate::step::{Step, StepKind, StepPatch};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch {
    steps: Vec<Step>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Append `step` at the end and return its index.
    pub fn append(&mut self, step: Step) -> usize {
        self.steps.push(step);
        let index = self.steps.len() - 1;
        debug!(index, kind = %self.steps[index].kind(), "appended step");
        index
    }

    /// Append a default-initialized step of `kind`.
    pub fn append_kind(&mut self, kind: StepKind) -> usize {
        self.append(Step::new(kind))
    }

    /// Shallow-merge `patch` onto the step at `index`.
    ///
    /// Fields absent from the patch keep their current value, and every other
    /// step is left as is.
    pub fn replace_at(&mut self, index: usize, patch: StepPatch) -> Result<&Step, ModelError> {
        let current = self.step_at(index)?;
        let updated = current.update(patch);
        self.steps[index] = updated;
        Ok(&self.steps[index])
    }

    /// Swap in an already edited step at `index`.
    ///
    /// The replacement must have the same kind; a step of another kind is
    /// rejected so the tag at a position never changes.
    pub fn set_at(&mut self, index: usize, step: Step) -> Result<&Step, ModelError> {
        let current = self.step_at(index)?;
        if current.kind() != step.kind() {
            return Err(ModelError::KindMismatch {
                expected: current.kind().as_str(),
                found: step.kind().as_str(),
            });
        }
        self.steps[index] = step;
        Ok(&self.steps[index])
    }

    /// Apply `edit` to the step at `index` and store the result.
    pub fn edit_at<F>(&mut self, index: usize, edit: F) -> Result<&Step, ModelError>
    where
        F: FnOnce(&Step) -> Result<Step, ModelError>,
    {
        let updated = edit(self.step_at(index)?)?;
        self.set_at(index, updated)
    }

    fn step_at(&self, index: usize) -> Result<&Step, ModelError> {
        self.steps.get(index).ok_or(ModelError::StepIndexOutOfRange {
            index,
            len: self.steps.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Argument;
    use crate::step::{Collection, MergeCoinsPatch, SplitCoinsPatch};

    #[test]
    fn test_append_returns_index() {
        let mut batch = Batch::new();
        assert_eq!(batch.append_kind(StepKind::SplitCoins), 0);
        assert_eq!(batch.append_kind(StepKind::MergeCoins), 1);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.steps()[1].kind(), StepKind::MergeCoins);
    }

    #[test]
    fn test_replace_at_merges_and_leaves_others() {
        let mut batch = Batch::new();
        batch.append_kind(StepKind::SplitCoins);
        batch.append_kind(StepKind::MergeCoins);
        let untouched = batch.steps()[1].clone();

        batch
            .replace_at(
                0,
                StepPatch::SplitCoins(SplitCoinsPatch {
                    coin: Some(Argument::gas()),
                    ..Default::default()
                }),
            )
            .unwrap();

        let Step::SplitCoins(split) = &batch.steps()[0] else {
            panic!("expected SplitCoins");
        };
        assert_eq!(split.coin, Argument::gas());
        assert_eq!(split.amounts.len(), 1);
        assert_eq!(batch.steps()[1], untouched);
    }

    #[test]
    fn test_replace_at_ignores_foreign_patch() {
        let mut batch = Batch::new();
        batch.append_kind(StepKind::SplitCoins);
        let before = batch.clone();
        batch
            .replace_at(
                0,
                StepPatch::MergeCoins(MergeCoinsPatch {
                    destination: Some(Argument::gas()),
                    ..Default::default()
                }),
            )
            .unwrap();
        assert_eq!(batch, before);
    }

    #[test]
    fn test_out_of_range() {
        let mut batch = Batch::new();
        let err = batch
            .replace_at(2, StepPatch::SplitCoins(SplitCoinsPatch::default()))
            .unwrap_err();
        assert_eq!(err, ModelError::StepIndexOutOfRange { index: 2, len: 0 });
    }

    #[test]
    fn test_set_at_rejects_kind_change() {
        let mut batch = Batch::new();
        batch.append_kind(StepKind::SplitCoins);
        assert!(batch.set_at(0, Step::new(StepKind::MergeCoins)).is_err());
        assert_eq!(batch.steps()[0].kind(), StepKind::SplitCoins);
    }

    #[test]
    fn test_edit_at() {
        let mut batch = Batch::new();
        batch.append_kind(StepKind::SplitCoins);
        batch
            .edit_at(0, |s| s.append_default(Collection::Amounts))
            .unwrap();
        assert_eq!(
            batch.steps()[0]
                .arguments_in(Collection::Amounts)
                .unwrap()
                .len(),
            2
        );
    }
}
