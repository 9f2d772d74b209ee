//! Builder Session
//!
//! `BuilderSession` owns one batch under construction together with the
//! per-step state that is not part of the batch itself:
//!
//! - whether each step card is collapsed or expanded
//! - the module map fetched for a contract call's package
//! - the return types of the selected function
//!
//! ## Metadata fetches
//!
//! Fetching a package's modules is the only asynchronous operation. It is
//! split in three so no borrow of the session is held across an await:
//!
//! ```ignore
//! let ticket = session.begin_package_change(step, "0x2")?;
//! let result = service.get_normalized_modules(&ticket.package_id).await;
//! session.apply_modules(ticket, result);
//! ```
//!
//! Every package change bumps the step's generation. A ticket from an older
//! generation is discarded when it resolves, so a slow response for an
//! abandoned package never overwrites the lists of a newer one.
//! [`BuilderSession::load_package`] runs all three steps for callers that do
//! not interleave edits with the fetch.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sui_ptb_types::{
    Argument, Batch, Collection, ModelError, MoveCallPatch, NormalizedFunction, NormalizedModule,
    NormalizedModules, Step, StepKind, StepPatch, TypeDescriptor,
};
use sui_transport::MetadataService;

use crate::lower::{lower_batch, PtbSpec};
use crate::projector::project;
use crate::readiness::{check_readiness, ReadinessReport};

/// Presentation state of one step card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CardState {
    Collapsed,
    #[default]
    Expanded,
}

impl CardState {
    pub fn toggled(self) -> Self {
        match self {
            CardState::Collapsed => CardState::Expanded,
            CardState::Expanded => CardState::Collapsed,
        }
    }
}

/// Identifies one in-flight module fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub step: usize,
    pub generation: u64,
    pub package_id: String,
}

#[derive(Debug, Clone, Default)]
struct CallDraft {
    generation: u64,
    modules: NormalizedModules,
    returns: Vec<TypeDescriptor>,
}

#[derive(Debug, Clone, Default)]
struct StepCard {
    state: CardState,
    call: CallDraft,
}

/// One editing session over a batch.
#[derive(Debug, Clone, Default)]
pub struct BuilderSession {
    batch: Batch,
    cards: Vec<StepCard>,
}

impl BuilderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume editing an existing batch. Every card starts expanded.
    pub fn from_batch(batch: Batch) -> Self {
        let cards = vec![StepCard::default(); batch.len()];
        Self { batch, cards }
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.batch.get(index)
    }

    // ---- Steps ------------------------------------------------------------

    /// Append a default step of `kind`; returns its index.
    pub fn add_step(&mut self, kind: StepKind) -> usize {
        self.cards.push(StepCard::default());
        self.batch.append_kind(kind)
    }

    /// Append a step by kind name, e.g. `"SplitCoins"`.
    pub fn add_step_named(&mut self, kind: &str) -> Result<usize, ModelError> {
        let kind: StepKind = kind.parse()?;
        Ok(self.add_step(kind))
    }

    /// Shallow-merge `patch` onto step `index`.
    pub fn update_step(&mut self, index: usize, patch: StepPatch) -> Result<&Step, ModelError> {
        self.batch.replace_at(index, patch)
    }

    pub fn append_default(
        &mut self,
        index: usize,
        collection: Collection,
    ) -> Result<&Step, ModelError> {
        self.batch
            .edit_at(index, |step| step.append_default(collection))
    }

    pub fn replace_argument(
        &mut self,
        index: usize,
        collection: Collection,
        position: usize,
        argument: Argument,
    ) -> Result<&Step, ModelError> {
        self.batch.edit_at(index, |step| {
            step.replace_argument(collection, position, argument)
        })
    }

    pub fn replace_element(
        &mut self,
        index: usize,
        position: usize,
        value: &str,
    ) -> Result<&Step, ModelError> {
        self.batch
            .edit_at(index, |step| step.replace_element(position, value))
    }

    pub fn set_type_argument(
        &mut self,
        index: usize,
        position: usize,
        name: &str,
    ) -> Result<&Step, ModelError> {
        self.batch
            .edit_at(index, |step| step.set_type_argument(position, name))
    }

    // ---- Cards ------------------------------------------------------------

    pub fn card_state(&self, index: usize) -> Result<CardState, ModelError> {
        Ok(self.card(index)?.state)
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        matches!(self.card_state(index), Ok(CardState::Expanded))
    }

    /// Flip step `index` between collapsed and expanded; returns the new state.
    pub fn toggle_expanded(&mut self, index: usize) -> Result<CardState, ModelError> {
        let card = self.card_mut(index)?;
        card.state = card.state.toggled();
        Ok(card.state)
    }

    // ---- Contract-call selection -----------------------------------------

    /// Record a new package ID on call step `index` and start a module fetch.
    ///
    /// The previously fetched lists are cleared right away. Module and
    /// function names already on the step are kept until the user picks
    /// new ones.
    pub fn begin_package_change(
        &mut self,
        index: usize,
        package_id: &str,
    ) -> Result<FetchTicket, ModelError> {
        self.expect_call(index)?;
        self.batch.replace_at(
            index,
            StepPatch::MoveCall(MoveCallPatch {
                package_id: Some(package_id.to_string()),
                ..Default::default()
            }),
        )?;

        let card = self.card_mut(index)?;
        card.call.generation += 1;
        card.call.modules.clear();
        card.call.returns.clear();

        let ticket = FetchTicket {
            step: index,
            generation: card.call.generation,
            package_id: package_id.to_string(),
        };
        debug!(
            step = index,
            generation = ticket.generation,
            package = %package_id,
            "module fetch started"
        );
        Ok(ticket)
    }

    /// Store the outcome of the fetch identified by `ticket`.
    ///
    /// Returns false when the ticket is stale and nothing was written. A
    /// current failed fetch leaves the lists empty.
    pub fn apply_modules(
        &mut self,
        ticket: FetchTicket,
        result: Result<NormalizedModules>,
    ) -> bool {
        let Some(card) = self.cards.get_mut(ticket.step) else {
            debug!(step = ticket.step, "module fetch for unknown step discarded");
            return false;
        };
        if card.call.generation != ticket.generation {
            debug!(
                step = ticket.step,
                generation = ticket.generation,
                latest = card.call.generation,
                package = %ticket.package_id,
                "stale module fetch discarded"
            );
            return false;
        }

        match result {
            Ok(modules) => {
                debug!(step = ticket.step, modules = modules.len(), "modules loaded");
                card.call.modules = modules;
            }
            Err(e) => {
                warn!(
                    step = ticket.step,
                    package = %ticket.package_id,
                    error = %e,
                    "module fetch failed"
                );
                card.call.modules.clear();
            }
        }
        card.call.returns.clear();
        true
    }

    /// Change the package of call step `index` and wait for its modules.
    pub async fn load_package<S>(
        &mut self,
        service: &S,
        index: usize,
        package_id: &str,
    ) -> Result<bool, ModelError>
    where
        S: MetadataService + ?Sized,
    {
        let ticket = self.begin_package_change(index, package_id)?;
        let result = service.get_normalized_modules(&ticket.package_id).await;
        Ok(self.apply_modules(ticket, result))
    }

    /// Module names fetched for call step `index`, sorted.
    pub fn modules(&self, index: usize) -> Vec<&str> {
        self.cards
            .get(index)
            .map(|c| c.call.modules.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Public functions of the selected module of call step `index`, sorted.
    pub fn functions(&self, index: usize) -> Vec<&str> {
        self.selected_module(index)
            .map(|m| m.public_functions().map(|(name, _)| name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Return types of the selected function of call step `index`.
    pub fn returns(&self, index: usize) -> &[TypeDescriptor] {
        self.cards
            .get(index)
            .map(|c| c.call.returns.as_slice())
            .unwrap_or_default()
    }

    /// Select `module` on call step `index`.
    ///
    /// Returns false, changing nothing, when the module is not among the
    /// fetched ones.
    pub fn select_module(&mut self, index: usize, module: &str) -> Result<bool, ModelError> {
        self.expect_call(index)?;
        if !self.card(index)?.call.modules.contains_key(module) {
            debug!(step = index, module, "unknown module ignored");
            return Ok(false);
        }
        self.batch.replace_at(
            index,
            StepPatch::MoveCall(MoveCallPatch {
                module: Some(module.to_string()),
                ..Default::default()
            }),
        )?;
        Ok(true)
    }

    /// Select `function` of the current module on call step `index`.
    ///
    /// The step's type parameters and arguments are replaced by a fresh
    /// projection of the signature. Returns false, changing nothing, when the
    /// function is unknown or not public.
    pub fn select_function(&mut self, index: usize, function: &str) -> Result<bool, ModelError> {
        self.expect_call(index)?;
        let Some(signature) = self.public_function(index, function).cloned() else {
            debug!(step = index, function, "unknown function ignored");
            return Ok(false);
        };

        let projection = project(&signature);
        self.batch.replace_at(
            index,
            StepPatch::MoveCall(projection.to_patch(function)),
        )?;
        self.card_mut(index)?.call.returns = projection.returns;
        Ok(true)
    }

    // ---- Batch-level ------------------------------------------------------

    pub fn readiness(&self) -> ReadinessReport {
        check_readiness(&self.batch)
    }

    pub fn lower(&self) -> Result<PtbSpec> {
        lower_batch(&self.batch)
    }

    // ---- Internals --------------------------------------------------------

    fn card(&self, index: usize) -> Result<&StepCard, ModelError> {
        let len = self.cards.len();
        self.cards
            .get(index)
            .ok_or(ModelError::StepIndexOutOfRange { index, len })
    }

    fn card_mut(&mut self, index: usize) -> Result<&mut StepCard, ModelError> {
        let len = self.cards.len();
        self.cards
            .get_mut(index)
            .ok_or(ModelError::StepIndexOutOfRange { index, len })
    }

    fn expect_call(&self, index: usize) -> Result<(), ModelError> {
        let step = self.batch.get(index).ok_or(ModelError::StepIndexOutOfRange {
            index,
            len: self.batch.len(),
        })?;
        match step.kind() {
            StepKind::MoveCall => Ok(()),
            found => Err(ModelError::KindMismatch {
                expected: StepKind::MoveCall.as_str(),
                found: found.as_str(),
            }),
        }
    }

    fn selected_module(&self, index: usize) -> Option<&NormalizedModule> {
        let Some(Step::MoveCall(call)) = self.batch.get(index) else {
            return None;
        };
        self.cards.get(index)?.call.modules.get(&call.module)
    }

    fn public_function(&self, index: usize, function: &str) -> Option<&NormalizedFunction> {
        self.selected_module(index)?
            .exposed_functions
            .get(function)
            .filter(|f| f.is_public())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use sui_ptb_types::{ArgumentKind, Visibility};

    fn counter_modules() -> NormalizedModules {
        let tx_context = TypeDescriptor::mutable_reference(TypeDescriptor::structure(
            "0x2",
            "tx_context",
            "TxContext",
            vec![],
        ));
        let mut module = NormalizedModule {
            address: "0xc0".to_string(),
            name: "counter".to_string(),
            ..Default::default()
        };
        module.exposed_functions.insert(
            "bump".to_string(),
            NormalizedFunction {
                visibility: Visibility::Public,
                is_entry: true,
                type_parameters: vec![],
                parameters: vec![tx_context, TypeDescriptor::scalar("U64")],
                return_types: vec![TypeDescriptor::scalar("U64")],
            },
        );
        module.exposed_functions.insert(
            "reset".to_string(),
            NormalizedFunction {
                visibility: Visibility::Friend,
                is_entry: false,
                type_parameters: vec![],
                parameters: vec![],
                return_types: vec![],
            },
        );
        let mut modules = NormalizedModules::new();
        modules.insert("counter".to_string(), module);
        modules
    }

    #[test]
    fn test_new_steps_start_expanded() {
        let mut session = BuilderSession::new();
        let index = session.add_step(StepKind::SplitCoins);
        assert!(session.is_expanded(index));
        assert_eq!(session.toggle_expanded(index), Ok(CardState::Collapsed));
        assert!(!session.is_expanded(index));
        assert_eq!(session.toggle_expanded(index), Ok(CardState::Expanded));
        assert!(session.toggle_expanded(4).is_err());
    }

    #[test]
    fn test_add_step_named() {
        let mut session = BuilderSession::new();
        assert_eq!(session.add_step_named("MakeMoveVec"), Ok(0));
        assert_eq!(
            session.add_step_named("Upgrade"),
            Err(ModelError::UnknownStepKind("Upgrade".to_string()))
        );
        assert_eq!(session.batch().len(), 1);
    }

    #[test]
    fn test_selection_flow() {
        let mut session = BuilderSession::new();
        let index = session.add_step(StepKind::MoveCall);
        let ticket = session.begin_package_change(index, "0xc0").unwrap();
        assert!(session.apply_modules(ticket, Ok(counter_modules())));

        assert_eq!(session.modules(index), vec!["counter"]);
        assert!(session.functions(index).is_empty());
        assert_eq!(session.select_module(index, "missing"), Ok(false));
        assert_eq!(session.select_module(index, "counter"), Ok(true));
        assert_eq!(session.functions(index), vec!["bump"]);

        assert_eq!(session.select_function(index, "reset"), Ok(false));
        assert_eq!(session.select_function(index, "bump"), Ok(true));
        let Some(Step::MoveCall(call)) = session.step(index) else {
            panic!("expected MoveCall");
        };
        assert_eq!(call.package_id, "0xc0");
        assert_eq!(call.function, "bump");
        assert_eq!(call.arguments.len(), 1);
        assert_eq!(call.arguments[0].kind, ArgumentKind::Pure);
        assert_eq!(session.returns(index), &[TypeDescriptor::scalar("U64")]);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut session = BuilderSession::new();
        let index = session.add_step(StepKind::MoveCall);
        let first = session.begin_package_change(index, "0x1").unwrap();
        let second = session.begin_package_change(index, "0xc0").unwrap();

        assert!(session.apply_modules(second, Ok(counter_modules())));
        assert!(!session.apply_modules(first, Ok(NormalizedModules::new())));
        assert_eq!(session.modules(index), vec!["counter"]);
    }

    #[test]
    fn test_failed_fetch_clears_lists() {
        let mut session = BuilderSession::new();
        let index = session.add_step(StepKind::MoveCall);
        let ticket = session.begin_package_change(index, "0xc0").unwrap();
        session.apply_modules(ticket, Ok(counter_modules()));
        session.select_module(index, "counter").unwrap();

        let ticket = session.begin_package_change(index, "0xdead").unwrap();
        assert!(session.apply_modules(ticket, Err(anyhow!("connection refused"))));
        assert!(session.modules(index).is_empty());
        assert!(session.functions(index).is_empty());
        let Some(Step::MoveCall(call)) = session.step(index) else {
            panic!("expected MoveCall");
        };
        assert_eq!(call.package_id, "0xdead");
        assert_eq!(call.module, "counter");
    }

    #[test]
    fn test_call_operations_reject_other_kinds() {
        let mut session = BuilderSession::new();
        let index = session.add_step(StepKind::SplitCoins);
        assert_eq!(
            session.begin_package_change(index, "0x2").unwrap_err(),
            ModelError::KindMismatch {
                expected: "MoveCall",
                found: "SplitCoins"
            }
        );
        assert!(session.select_module(7, "coin").is_err());
    }

    #[test]
    fn test_from_batch_has_cards() {
        let mut batch = Batch::new();
        batch.append_kind(StepKind::MergeCoins);
        batch.append_kind(StepKind::TransferObjects);
        let mut session = BuilderSession::from_batch(batch);
        assert!(session.is_expanded(1));
        session
            .append_default(1, Collection::Objects)
            .unwrap();
        assert_eq!(session.add_step(StepKind::MoveCall), 2);
        assert!(session.is_expanded(2));
    }
}
