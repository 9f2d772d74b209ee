//! Hard failures raised by the step and batch model.
//!
//! Only programming errors live here. Incomplete user input is never an
//! error; see the readiness pass in the builder crate.

use std::fmt;

/// Programming errors in model mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A step kind name outside the closed set.
    UnknownStepKind(String),

    /// Element index past the end of a step collection.
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    /// Step index past the end of the batch.
    StepIndexOutOfRange { index: usize, len: usize },

    /// The step does not own the named collection.
    CollectionMismatch {
        kind: &'static str,
        collection: &'static str,
    },

    /// An operation that only applies to one step kind was used on another.
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownStepKind(kind) => {
                write!(f, "Unsupported or unknown step kind: {}", kind)
            }
            ModelError::IndexOutOfRange {
                collection,
                index,
                len,
            } => write!(
                f,
                "Index {} out of range for {} (length {})",
                index, collection, len
            ),
            ModelError::StepIndexOutOfRange { index, len } => write!(
                f,
                "Step index {} out of range (batch has {} steps)",
                index, len
            ),
            ModelError::CollectionMismatch { kind, collection } => {
                write!(f, "{} step has no '{}' collection", kind, collection)
            }
            ModelError::KindMismatch { expected, found } => {
                write!(f, "Expected a {} step, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for ModelError {}
