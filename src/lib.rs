//! Sui PTB Builder
//!
//! Tools for composing a programmable transaction block one step at a time:
//!
//! - **Projection**: turn a selected function signature into argument placeholders
//! - **Sessions**: edit a batch, track card state and fetch package metadata
//! - **Readiness**: report what keeps a half-built batch from executing
//! - **Lowering**: convert a ready batch into a PTB JSON spec
//!
//! The step and batch model lives in [`sui_ptb_types`]; metadata fetching
//! lives in [`sui_transport`].
//!
//! # Example
//!
//! ```ignore
//! use sui_ptb_builder::session::BuilderSession;
//! use sui_ptb_types::StepKind;
//! use sui_transport::JsonRpcClient;
//!
//! let client = JsonRpcClient::testnet();
//! let mut session = BuilderSession::new();
//! let call = session.add_step(StepKind::MoveCall);
//! session.load_package(&client, call, "0x2").await?;
//! session.select_module(call, "coin")?;
//! session.select_function(call, "value")?;
//! println!("{:?}", session.readiness().issues);
//! ```

pub mod config;
pub mod lower;
pub mod projector;
pub mod readiness;
pub mod session;

pub use config::BuilderConfig;
pub use lower::{lower_batch, PtbSpec};
pub use projector::{project, Projection};
pub use readiness::{check_readiness, IssueKind, ReadinessIssue, ReadinessReport};
pub use session::{BuilderSession, CardState, FetchTicket};
