//! Integration tests for the contract interaction and lock-funds flows
//!
//! Drive the fetch/select/simulate state machine and the lock pipeline
//! against mock collaborators.

use cardano_workbench::mocks::{
    MockBuilder, MockDatumDecoder, MockEvaluator, MockIndexer, MockWallet,
};
use cardano_workbench::{
    Asset, ContractFlow, ContractFlowState, DatumSource, DatumView, EvaluationResponse,
    LockDraft, LockFlow, SessionAdapter, SimulationOutcome, Utxo, WorkbenchError,
};
use serde_json::json;

const SCRIPT_ADDRESS: &str = "addr_test1script";

fn locked_utxo_with_inline_datum() -> Utxo {
    let mut utxo = Utxo::new("8f2e", 0, vec![Asset::lovelace(2_000_000)]);
    utxo.inline_datum = Some("d87980".to_string());
    utxo
}

fn locked_utxo_with_data_hash() -> Utxo {
    let mut utxo = Utxo::new("8f2e", 1, vec![Asset::lovelace(3_000_000)]);
    utxo.data_hash = Some("9a3b".to_string());
    utxo
}

fn flow_with(
    indexer: MockIndexer,
    evaluator: MockEvaluator,
) -> (
    ContractFlow<MockBuilder, MockIndexer, MockEvaluator, MockDatumDecoder>,
    MockBuilder,
) {
    let builder = MockBuilder::new();
    let flow = ContractFlow::new(
        builder.clone(),
        indexer,
        evaluator,
        MockDatumDecoder::new(),
    );
    (flow, builder)
}

async fn connected_adapter(wallet: &MockWallet) -> SessionAdapter<MockWallet> {
    let mut adapter = SessionAdapter::new();
    adapter.connect(wallet, "mock").await.unwrap();
    adapter
}

#[tokio::test]
async fn fetch_lists_locked_utxos() {
    let indexer = MockIndexer::new();
    indexer.add_address(
        SCRIPT_ADDRESS,
        vec![locked_utxo_with_inline_datum(), locked_utxo_with_data_hash()],
    );
    let (mut flow, _builder) = flow_with(indexer, MockEvaluator::new());

    flow.fetch_locked_utxos(SCRIPT_ADDRESS).await.unwrap();
    assert_eq!(flow.state(), ContractFlowState::Listed);
    assert_eq!(flow.utxos().len(), 2);
    assert!(flow.selected().is_none());
}

#[tokio::test]
async fn failed_fetch_is_error_state_with_empty_list() {
    let indexer = MockIndexer::new();
    indexer.add_address(SCRIPT_ADDRESS, vec![locked_utxo_with_inline_datum()]);
    let (mut flow, _builder) = flow_with(indexer.clone(), MockEvaluator::new());

    flow.fetch_locked_utxos(SCRIPT_ADDRESS).await.unwrap();
    assert_eq!(flow.utxos().len(), 1);

    indexer.fail_next("HTTP 404");
    let err = flow.fetch_locked_utxos(SCRIPT_ADDRESS).await.unwrap_err();
    assert!(matches!(err, WorkbenchError::FetchError(_)));
    assert!(err.to_string().contains("HTTP 404"));
    // Never partial: the previous list is gone too
    assert_eq!(flow.state(), ContractFlowState::Error);
    assert!(flow.utxos().is_empty());
}

#[tokio::test]
async fn empty_script_address_is_rejected() {
    let (mut flow, _builder) = flow_with(MockIndexer::new(), MockEvaluator::new());
    let err = flow.fetch_locked_utxos("  ").await.unwrap_err();
    assert!(matches!(err, WorkbenchError::FetchError(_)));
    assert_eq!(flow.state(), ContractFlowState::Idle);
}

#[tokio::test]
async fn selecting_decodes_the_inline_datum() {
    let indexer = MockIndexer::new();
    let utxo = locked_utxo_with_inline_datum();
    indexer.add_address(SCRIPT_ADDRESS, vec![utxo.clone()]);
    let decoder = MockDatumDecoder::new();
    decoder.add_datum("d87980", json!({"constructor": 0, "fields": []}));

    let mut flow = ContractFlow::new(
        MockBuilder::new(),
        indexer,
        MockEvaluator::new(),
        decoder,
    );
    flow.fetch_locked_utxos(SCRIPT_ADDRESS).await.unwrap();
    flow.select_utxo(&utxo.id());

    assert_eq!(flow.state(), ContractFlowState::Selected);
    assert_eq!(flow.selected(), Some(&utxo));
    assert_eq!(
        flow.datum_view(),
        Some(&DatumView::Decoded(json!({"constructor": 0, "fields": []})))
    );
}

#[tokio::test]
async fn missing_and_undecodable_datums_are_distinct() {
    let indexer = MockIndexer::new();
    let with_datum = locked_utxo_with_inline_datum();
    let without_datum = locked_utxo_with_data_hash();
    indexer.add_address(
        SCRIPT_ADDRESS,
        vec![with_datum.clone(), without_datum.clone()],
    );
    let decoder = MockDatumDecoder::new();
    decoder.fail_all();

    let mut flow = ContractFlow::new(
        MockBuilder::new(),
        indexer,
        MockEvaluator::new(),
        decoder,
    );
    flow.fetch_locked_utxos(SCRIPT_ADDRESS).await.unwrap();

    flow.select_utxo(&without_datum.id());
    assert_eq!(flow.datum_view(), Some(&DatumView::Missing));

    flow.select_utxo(&with_datum.id());
    assert_eq!(flow.datum_view(), Some(&DatumView::DecodeFailed));
}

#[test]
fn non_hex_inline_datum_is_a_decode_failure() {
    let decoder = MockDatumDecoder::new();
    let mut utxo = Utxo::new("8f2e", 2, vec![]);
    utxo.inline_datum = Some("zz-not-hex".to_string());
    assert_eq!(
        cardano_workbench::datum_view_for(&decoder, &utxo),
        DatumView::DecodeFailed
    );
}

#[tokio::test]
async fn selection_outside_the_fetched_set_is_ignored() {
    let indexer = MockIndexer::new();
    indexer.add_address(SCRIPT_ADDRESS, vec![locked_utxo_with_inline_datum()]);
    let (mut flow, _builder) = flow_with(indexer, MockEvaluator::new());
    flow.fetch_locked_utxos(SCRIPT_ADDRESS).await.unwrap();

    flow.select_utxo(&Utxo::new("unknown", 9, vec![]).id());
    assert_eq!(flow.state(), ContractFlowState::Listed);
    assert!(flow.selected().is_none());
}

#[tokio::test]
async fn invalid_redeemer_fails_before_any_network_call() {
    let wallet = MockWallet::new();
    let adapter = connected_adapter(&wallet).await;
    let indexer = MockIndexer::new();
    let utxo = locked_utxo_with_inline_datum();
    indexer.add_address(SCRIPT_ADDRESS, vec![utxo.clone()]);
    let evaluator = MockEvaluator::new();
    let (mut flow, builder) = flow_with(indexer, evaluator.clone());

    flow.fetch_locked_utxos(SCRIPT_ADDRESS).await.unwrap();
    flow.select_utxo(&utxo.id());

    let err = flow
        .simulate("{not json", "4e4d01", adapter.session())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkbenchError::InvalidRedeemer(_)));
    assert_eq!(builder.request_count(), 0);
    assert!(evaluator.evaluated().is_empty());
    assert_eq!(flow.state(), ContractFlowState::Selected);
}

#[tokio::test]
async fn successful_simulation_reports_execution_units() {
    let wallet = MockWallet::new();
    let adapter = connected_adapter(&wallet).await;
    let indexer = MockIndexer::new();
    let utxo = locked_utxo_with_inline_datum();
    indexer.add_address(SCRIPT_ADDRESS, vec![utxo.clone()]);
    let evaluator = MockEvaluator::new();
    let (mut flow, builder) = flow_with(indexer, evaluator.clone());

    flow.fetch_locked_utxos(SCRIPT_ADDRESS).await.unwrap();
    flow.select_utxo(&utxo.id());
    assert!(!flow.may_submit());

    flow.simulate(
        r#"{"constructor": 0, "fields": []}"#,
        "4e4d01",
        adapter.session(),
    )
    .await
    .unwrap();

    assert_eq!(flow.state(), ContractFlowState::Simulated);
    assert_eq!(
        flow.outcome(),
        Some(&SimulationOutcome::Success {
            memory: 1700,
            steps: 476_468
        })
    );
    assert!(flow.may_submit());
    assert_eq!(evaluator.evaluated(), vec!["84a300_mock_cbor".to_string()]);

    let redemption = builder.requests()[0].redemption.clone().unwrap();
    assert_eq!(redemption.utxo, utxo);
    assert_eq!(redemption.script_version, "V2");
    assert_eq!(redemption.datum_source, DatumSource::Inline);
}

#[tokio::test]
async fn datum_hash_reference_is_used_when_no_inline_datum() {
    let wallet = MockWallet::new();
    let adapter = connected_adapter(&wallet).await;
    let indexer = MockIndexer::new();
    let utxo = locked_utxo_with_data_hash();
    indexer.add_address(SCRIPT_ADDRESS, vec![utxo.clone()]);
    let (mut flow, builder) = flow_with(indexer, MockEvaluator::new());

    flow.fetch_locked_utxos(SCRIPT_ADDRESS).await.unwrap();
    flow.select_utxo(&utxo.id());
    flow.simulate(r#"{"constructor": 0, "fields": []}"#, "4e4d01", adapter.session())
        .await
        .unwrap();

    let redemption = builder.requests()[0].redemption.clone().unwrap();
    assert_eq!(redemption.datum_source, DatumSource::Hash("9a3b".to_string()));
}

#[tokio::test]
async fn failed_evaluation_surfaces_the_reported_reason() {
    let wallet = MockWallet::new();
    let adapter = connected_adapter(&wallet).await;
    let indexer = MockIndexer::new();
    let utxo = locked_utxo_with_inline_datum();
    indexer.add_address(SCRIPT_ADDRESS, vec![utxo.clone()]);
    let evaluator = MockEvaluator::new();
    evaluator.set_response(EvaluationResponse {
        ok: false,
        payload: json!({"message": "script execution failed"}),
    });
    let (mut flow, _builder) = flow_with(indexer, evaluator);

    flow.fetch_locked_utxos(SCRIPT_ADDRESS).await.unwrap();
    flow.select_utxo(&utxo.id());
    flow.simulate(r#"{"constructor": 0, "fields": []}"#, "4e4d01", adapter.session())
        .await
        .unwrap();

    assert_eq!(
        flow.outcome(),
        Some(&SimulationOutcome::Failure {
            reason: "script execution failed".to_string()
        })
    );
    assert!(!flow.may_submit());
}

#[tokio::test]
async fn failed_build_records_a_failure_outcome() {
    let wallet = MockWallet::new();
    let adapter = connected_adapter(&wallet).await;
    let indexer = MockIndexer::new();
    let utxo = locked_utxo_with_inline_datum();
    indexer.add_address(SCRIPT_ADDRESS, vec![utxo.clone()]);
    let (mut flow, builder) = flow_with(indexer, MockEvaluator::new());

    flow.fetch_locked_utxos(SCRIPT_ADDRESS).await.unwrap();
    flow.select_utxo(&utxo.id());
    builder.fail_next("insufficient funds or invalid inputs");

    let err = flow
        .simulate(r#"{"constructor": 0, "fields": []}"#, "4e4d01", adapter.session())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkbenchError::SimulationError(_)));
    assert_eq!(
        flow.outcome(),
        Some(&SimulationOutcome::Failure {
            reason: "insufficient funds or invalid inputs".to_string()
        })
    );
    assert!(!flow.may_submit());
}

#[tokio::test]
async fn reselecting_discards_the_previous_outcome() {
    let wallet = MockWallet::new();
    let adapter = connected_adapter(&wallet).await;
    let indexer = MockIndexer::new();
    let first = locked_utxo_with_inline_datum();
    let second = locked_utxo_with_data_hash();
    indexer.add_address(SCRIPT_ADDRESS, vec![first.clone(), second.clone()]);
    let (mut flow, _builder) = flow_with(indexer, MockEvaluator::new());

    flow.fetch_locked_utxos(SCRIPT_ADDRESS).await.unwrap();
    flow.select_utxo(&first.id());
    flow.simulate(r#"{"constructor": 0, "fields": []}"#, "4e4d01", adapter.session())
        .await
        .unwrap();
    assert!(flow.may_submit());

    flow.select_utxo(&second.id());
    assert_eq!(flow.state(), ContractFlowState::Selected);
    assert!(flow.outcome().is_none());
    assert!(!flow.may_submit());
}

#[tokio::test]
async fn simulate_without_selection_is_a_no_op() {
    let wallet = MockWallet::new();
    let adapter = connected_adapter(&wallet).await;
    let evaluator = MockEvaluator::new();
    let (mut flow, builder) = flow_with(MockIndexer::new(), evaluator.clone());

    flow.simulate(r#"{"constructor": 0, "fields": []}"#, "4e4d01", adapter.session())
        .await
        .unwrap();
    assert_eq!(builder.request_count(), 0);
    assert!(evaluator.evaluated().is_empty());
}

#[tokio::test]
async fn lock_attaches_the_datum_inline_and_submits() {
    let wallet = MockWallet::new();
    let mut adapter = connected_adapter(&wallet).await;
    let builder = MockBuilder::new();
    let mut flow = LockFlow::new(builder.clone());

    let draft = LockDraft {
        script_address: SCRIPT_ADDRESS.to_string(),
        amount_ada: "2".to_string(),
        datum_json: r#"{"constructor": 0, "fields": []}"#.to_string(),
    };
    let tx_id = flow.lock_and_submit(&draft, &mut adapter).await.unwrap();
    assert_eq!(tx_id.as_deref(), Some("txid_mock"));

    let requests = builder.requests();
    assert_eq!(requests[0].outputs[0].address, SCRIPT_ADDRESS);
    assert_eq!(requests[0].outputs[0].amount, vec![Asset::lovelace(2_000_000)]);
    assert_eq!(
        requests[0].outputs[0].inline_datum,
        Some(json!({"constructor": 0, "fields": []}))
    );
    assert_eq!(requests[0].inputs, None);
    assert_eq!(wallet.submitted().len(), 1);

    assert_eq!(flow.history().len(), 1);
    assert_eq!(flow.history()[0].tx_id.as_deref(), Some("txid_mock"));
}

#[tokio::test]
async fn lock_rejects_invalid_datum_before_building() {
    let wallet = MockWallet::new();
    let mut adapter = connected_adapter(&wallet).await;
    let builder = MockBuilder::new();
    let mut flow = LockFlow::new(builder.clone());

    let draft = LockDraft {
        script_address: SCRIPT_ADDRESS.to_string(),
        amount_ada: "2".to_string(),
        datum_json: "{not json".to_string(),
    };
    let err = flow.lock_and_submit(&draft, &mut adapter).await.unwrap_err();
    assert!(matches!(err, WorkbenchError::BuildError(_)));
    assert_eq!(builder.request_count(), 0);
    assert!(wallet.submitted().is_empty());
    assert!(flow.history().is_empty());
}
