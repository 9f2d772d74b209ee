//! End-to-end editing scenarios over the batch and step model.

mod common;

use sui_ptb_builder::{check_readiness, lower_batch, project, BuilderSession, IssueKind};
use sui_ptb_types::{
    Argument, ArgumentKind, Batch, Collection, MergeCoinsPatch, NormalizedFunction, SplitCoinsPatch,
    Step, StepKind, StepPatch, TransferObjects, TransferObjectsPatch, TypeDescriptor, Visibility,
};

fn tx_context() -> TypeDescriptor {
    TypeDescriptor::mutable_reference(TypeDescriptor::structure(
        "0x2",
        "tx_context",
        "TxContext",
        vec![],
    ))
}

#[test]
fn test_replace_at_touches_only_target_step() {
    let mut batch = Batch::new();
    batch.append_kind(StepKind::SplitCoins);
    batch.append_kind(StepKind::MergeCoins);
    batch.append_kind(StepKind::TransferObjects);
    let before = batch.clone();

    batch
        .replace_at(
            1,
            StepPatch::MergeCoins(MergeCoinsPatch {
                destination: Some(Argument::object("0x5")),
                ..Default::default()
            }),
        )
        .unwrap();

    assert_eq!(batch.get(0), before.get(0));
    assert_eq!(batch.get(2), before.get(2));
    let Some(Step::MergeCoins(merge)) = batch.get(1) else {
        panic!("expected MergeCoins");
    };
    assert_eq!(merge.destination, Argument::object("0x5"));
    let Some(Step::MergeCoins(old)) = before.get(1) else {
        panic!("expected MergeCoins");
    };
    assert_eq!(merge.sources, old.sources);
}

#[test]
fn test_append_default_amount() {
    let step = Step::new(StepKind::SplitCoins).update(StepPatch::SplitCoins(SplitCoinsPatch {
        amounts: Some(vec![Argument::pure("1"), Argument::pure("2")]),
        ..Default::default()
    }));
    let before = step.clone();

    let grown = step.append_default(Collection::Amounts).unwrap();

    let amounts = grown.arguments_in(Collection::Amounts).unwrap();
    assert_eq!(amounts.len(), 3);
    assert_eq!(amounts[2], Argument::blank(ArgumentKind::Pure));
    assert_eq!(amounts[2].raw_values, Some(vec![String::new()]));
    assert_eq!(&amounts[..2], before.arguments_in(Collection::Amounts).unwrap());
    assert_eq!(step, before);
}

#[test]
fn test_transfer_objects_scenario() {
    let mut session = BuilderSession::new();
    let index = session.add_step(StepKind::TransferObjects);

    session
        .update_step(
            index,
            StepPatch::TransferObjects(TransferObjectsPatch {
                recipient: Some(Argument::pure("0xABC")),
                ..Default::default()
            }),
        )
        .unwrap();
    session.append_default(index, Collection::Objects).unwrap();
    session
        .replace_argument(index, Collection::Objects, 0, Argument::object("0x123"))
        .unwrap();

    assert_eq!(
        session.step(index),
        Some(&Step::TransferObjects(TransferObjects {
            recipient: Argument::pure("0xABC"),
            objects: vec![Argument::object("0x123")],
        }))
    );
    assert!(session.readiness().is_ready());
}

#[test]
fn test_projection_drops_leading_tx_context() {
    let function = NormalizedFunction {
        visibility: Visibility::Public,
        is_entry: true,
        type_parameters: vec![],
        parameters: vec![tx_context(), TypeDescriptor::scalar("U64")],
        return_types: vec![],
    };

    let projection = project(&function);

    assert_eq!(projection.arguments.len(), 1);
    assert_eq!(projection.arguments[0].kind, ArgumentKind::Pure);
    assert_eq!(
        projection.arguments[0].declared_type,
        Some(TypeDescriptor::scalar("U64"))
    );
}

#[test]
fn test_merge_source_kind_switch_keeps_destination() {
    let mut session = BuilderSession::new();
    let index = session.add_step(StepKind::MergeCoins);
    session
        .update_step(
            index,
            StepPatch::MergeCoins(MergeCoinsPatch {
                destination: Some(Argument::object("0xd")),
                ..Default::default()
            }),
        )
        .unwrap();
    let destination_before = match session.step(index) {
        Some(Step::MergeCoins(merge)) => merge.destination.clone(),
        other => panic!("expected MergeCoins, got {:?}", other),
    };

    let source = session.step(index).unwrap().arguments_in(Collection::Sources).unwrap()[0]
        .with_kind(ArgumentKind::NestedResult);
    session
        .replace_argument(index, Collection::Sources, 0, source)
        .unwrap();
    let source = session.step(index).unwrap().arguments_in(Collection::Sources).unwrap()[0]
        .with_raw_values(Some(vec!["2".to_string(), "0".to_string()]));
    session
        .replace_argument(index, Collection::Sources, 0, source)
        .unwrap();

    let Some(Step::MergeCoins(merge)) = session.step(index) else {
        panic!("expected MergeCoins");
    };
    assert_eq!(merge.destination, destination_before);
    assert_eq!(merge.sources[0].kind, ArgumentKind::NestedResult);
    assert_eq!(merge.sources[0].result_index(), Some(2));
    assert_eq!(merge.sources[0].nested_index(), Some(0));

    // step 2 does not exist yet
    let report = session.readiness();
    assert!(report
        .issues_for(index)
        .any(|i| i.kind == IssueKind::ForwardReference));
}

#[test]
fn test_ready_fixture_lowers() {
    let batch = common::load_batch("ready_batch.json");
    assert_eq!(batch.len(), 3);

    let report = check_readiness(&batch);
    assert!(report.is_ready(), "unexpected issues: {:?}", report.issues);
    assert_eq!(report.warnings, vec!["Step 1 result is never used".to_string()]);

    let spec = serde_json::to_value(lower_batch(&batch).unwrap()).unwrap();
    let commands = spec["commands"].as_array().unwrap();
    assert_eq!(commands.len(), 3);
    assert_eq!(commands[0]["kind"], "SplitCoins");
    assert_eq!(commands[1]["package"], "0xc0ffee");
    assert_eq!(commands[1]["type_args"], serde_json::json!(["0x2::sui::SUI"]));
    assert_eq!(
        commands[1]["args"][3],
        serde_json::json!({"nested_result": [0, 1]})
    );
    assert_eq!(
        commands[2]["objects"],
        serde_json::json!([{"nested_result": [0, 0]}])
    );
    assert_eq!(
        spec["inputs"][3],
        serde_json::json!({"kind": "pure", "value": "7", "type": "u64"})
    );
    assert_eq!(
        spec["inputs"][4],
        serde_json::json!({"kind": "pure", "value": "0x0102", "type": "vector_u8_hex"})
    );
}

#[test]
fn test_incomplete_fixture_reports_each_step() {
    let batch = common::load_batch("incomplete_batch.json");
    let report = check_readiness(&batch);

    let kinds: Vec<(usize, IssueKind)> = report.issues.iter().map(|i| (i.step, i.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (0, IssueKind::MissingValue),
            (1, IssueKind::ForwardReference),
            (2, IssueKind::MissingValue),
        ]
    );
    assert!(lower_batch(&batch).is_err());
}

#[test]
fn test_batch_json_survives_session_edits() {
    let batch = common::load_batch("ready_batch.json");
    let mut session = BuilderSession::from_batch(batch.clone());
    session.toggle_expanded(1).unwrap();
    assert!(!session.is_expanded(1));

    // card state is not part of the batch
    assert_eq!(session.batch(), &batch);
    let json = serde_json::to_string(session.batch()).unwrap();
    let restored: Batch = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, batch);
}
