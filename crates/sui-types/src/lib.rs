//! Shared model types for the sui-ptb-builder workspace.
//!
//! This crate holds the in-memory description of a programmable transaction
//! block under construction, independent of any network client:
//!
//! - [`TypeDescriptor`](type_descriptor::TypeDescriptor) - Move types from function signatures
//! - [`Argument`](argument::Argument) - one step input and where its value comes from
//! - [`Step`](step::Step) - one command (call, split, merge, transfer, make-vector)
//! - [`Batch`](batch::Batch) - the ordered list of steps
//! - [`NormalizedModule`](metadata::NormalizedModule) - package metadata used to pick a function

pub mod address;
pub mod argument;
pub mod batch;
pub mod env_utils;
pub mod error;
pub mod metadata;
pub mod step;
pub mod type_descriptor;
pub mod type_input;

pub use argument::{Argument, ArgumentKind};
pub use batch::Batch;
pub use error::ModelError;
pub use metadata::{
    Ability, AbilitySet, NormalizedFunction, NormalizedModule, NormalizedModules, Visibility,
};
pub use step::{
    Collection, MakeMoveVec, MakeMoveVecPatch, MergeCoins, MergeCoinsPatch, MoveCall,
    MoveCallPatch, SplitCoins, SplitCoinsPatch, Step, StepKind, StepPatch, TransferObjects,
    TransferObjectsPatch, TypeParameterBinding,
};
pub use type_descriptor::{StructDescriptor, TypeDescriptor, TX_CONTEXT_TYPE};
