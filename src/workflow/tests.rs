use super::*;
use crate::directory::{Worker, WorkerRole};
use crate::ledger::InMemoryLedgerStore;
use crate::tip::PaymentType;

fn team() -> WorkerDirectory {
    WorkerDirectory::new(vec![
        Worker::new("mesero1", "Juan Pérez", WorkerRole::Service, 8.0),
        Worker::new("mesero2", "María García", WorkerRole::Service, 8.0),
        Worker::new("cocina1", "Carlos López", WorkerRole::Kitchen, 8.0),
    ])
    .unwrap()
}

fn setup() -> (DistributionPolicy, Arc<InMemoryLedgerStore>) {
    (
        DistributionPolicy::default(),
        Arc::new(InMemoryLedgerStore::new()),
    )
}

fn draft(amount: i64) -> DraftTip {
    DraftTip::new(amount, PaymentType::Digital, 5).unwrap()
}

#[tokio::test]
async fn test_begin_snapshots_default() {
    let (policy, ledger) = setup();
    let workflow =
        ConfirmationWorkflow::begin(draft(5000), "mesero1", &team(), &policy, ledger)
            .unwrap();

    assert_eq!(workflow.state(), WorkflowState::PendingReview);
    assert_eq!(
        workflow.working(),
        &WorkingSplit::Default(DistributionSplit::default())
    );
    assert!(!workflow.correlation_id().is_empty());
}

#[tokio::test]
async fn test_confirm_with_default_appends_once() {
    let (policy, ledger) = setup();
    let mut workflow =
        ConfirmationWorkflow::begin(draft(5000), "mesero1", &team(), &policy, ledger.clone())
            .unwrap();

    let tip = workflow.confirm().await.unwrap();

    assert_eq!(workflow.state(), WorkflowState::Confirmed);
    assert_eq!(tip.id(), 1);
    assert_eq!(tip.amount(), 5000);
    assert_eq!(tip.table(), 5);
    assert_eq!(tip.worker_id(), "mesero1");
    assert_eq!(tip.applied_split(), DistributionSplit::default());
    assert_eq!(workflow.confirmed(), Some(&tip));
    assert_eq!(ledger.len().await.unwrap(), 1);

    let by_correlation = ledger
        .get_by_correlation(workflow.correlation_id())
        .await
        .unwrap();
    assert_eq!(by_correlation, Some(tip));
}

#[tokio::test]
async fn test_confirm_with_custom_split_binds_it() {
    let (policy, ledger) = setup();
    let mut workflow =
        ConfirmationWorkflow::begin(draft(15000), "mesero1", &team(), &policy, ledger)
            .unwrap();

    let selected = workflow
        .select_custom(SplitCandidate::new(50, 40, 10))
        .unwrap();
    let tip = workflow.confirm().await.unwrap();

    assert_eq!(tip.applied_split(), selected);
    assert_eq!(tip.applied_split().kitchen(), 40);
}

#[tokio::test]
async fn test_invalid_custom_keeps_review_and_blocks_confirm() {
    let (policy, ledger) = setup();
    let mut workflow =
        ConfirmationWorkflow::begin(draft(5000), "mesero1", &team(), &policy, ledger.clone())
            .unwrap();

    let err = workflow
        .select_custom(SplitCandidate::new(60, 30, 20))
        .unwrap_err();
    assert!(matches!(
        err,
        TipError::Validation(ValidationError::NotNormalized { total: 110 })
    ));
    assert_eq!(workflow.state(), WorkflowState::PendingReview);

    let err = workflow.confirm().await.unwrap_err();
    assert!(matches!(
        err,
        TipError::InvalidSplit(ValidationError::NotNormalized { total: 110 })
    ));
    assert_eq!(workflow.state(), WorkflowState::PendingReview);
    assert!(ledger.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_out_of_range_custom_is_reported_not_clamped() {
    let (policy, ledger) = setup();
    let mut workflow =
        ConfirmationWorkflow::begin(draft(5000), "mesero1", &team(), &policy, ledger)
            .unwrap();

    let err = workflow
        .select_custom(SplitCandidate::new(110, -5, -5))
        .unwrap_err();
    assert!(matches!(
        err,
        TipError::Validation(ValidationError::OutOfRange { value: 110, .. })
    ));
    assert!(workflow.working().resolve().is_err());
}

#[tokio::test]
async fn test_correcting_custom_split_unblocks_confirm() {
    let (policy, ledger) = setup();
    let mut workflow =
        ConfirmationWorkflow::begin(draft(5000), "mesero1", &team(), &policy, ledger)
            .unwrap();

    assert!(workflow.select_custom(SplitCandidate::new(60, 30, 20)).is_err());
    workflow.select_custom(SplitCandidate::new(60, 30, 10)).unwrap();

    let tip = workflow.confirm().await.unwrap();
    assert_eq!(tip.applied_split().bar(), 10);
}

#[tokio::test]
async fn test_select_default_recovers_from_invalid_custom() {
    let (policy, ledger) = setup();
    let mut workflow =
        ConfirmationWorkflow::begin(draft(5000), "mesero1", &team(), &policy, ledger)
            .unwrap();

    assert!(workflow.select_custom(SplitCandidate::new(0, 0, 0)).is_err());
    let split = workflow.select_default().unwrap();

    assert_eq!(split, DistributionSplit::default());
    assert!(workflow.confirm().await.is_ok());
}

#[tokio::test]
async fn test_default_change_mid_review_is_not_seen() {
    let (policy, ledger) = setup();
    let mut workflow =
        ConfirmationWorkflow::begin(draft(5000), "mesero1", &team(), &policy, ledger)
            .unwrap();

    policy
        .update_default(&SplitCandidate::new(40, 40, 20))
        .unwrap();

    assert_eq!(
        workflow.select_default().unwrap(),
        DistributionSplit::default()
    );
    let tip = workflow.confirm().await.unwrap();
    assert_eq!(tip.applied_split(), DistributionSplit::default());
}

#[tokio::test]
async fn test_default_change_after_confirm_leaves_history_alone() {
    let (policy, ledger) = setup();
    let mut workflow =
        ConfirmationWorkflow::begin(draft(5000), "mesero1", &team(), &policy, ledger.clone())
            .unwrap();
    workflow.confirm().await.unwrap();

    policy
        .update_default(&SplitCandidate::new(34, 33, 33))
        .unwrap();

    let entries = ledger.entries().await.unwrap();
    assert_eq!(entries[0].applied_split(), DistributionSplit::default());
}

#[tokio::test]
async fn test_confirm_twice_is_invalid_state() {
    let (policy, ledger) = setup();
    let mut workflow =
        ConfirmationWorkflow::begin(draft(5000), "mesero1", &team(), &policy, ledger.clone())
            .unwrap();
    workflow.confirm().await.unwrap();

    let err = workflow.confirm().await.unwrap_err();
    assert!(matches!(
        err,
        TipError::InvalidState {
            state: WorkflowState::Confirmed,
            ..
        }
    ));
    assert_eq!(ledger.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_cancel_after_confirm_is_invalid_state() {
    let (policy, ledger) = setup();
    let mut workflow =
        ConfirmationWorkflow::begin(draft(5000), "mesero1", &team(), &policy, ledger)
            .unwrap();
    workflow.confirm().await.unwrap();

    let err = workflow.cancel().unwrap_err();
    assert!(matches!(err, TipError::InvalidState { operation: "cancel", .. }));
}

#[tokio::test]
async fn test_cancel_discards_draft() {
    let (policy, ledger) = setup();
    let mut workflow =
        ConfirmationWorkflow::begin(draft(5000), "mesero1", &team(), &policy, ledger.clone())
            .unwrap();

    workflow.cancel().unwrap();

    assert_eq!(workflow.state(), WorkflowState::Cancelled);
    assert!(workflow.confirmed().is_none());
    assert!(ledger.is_empty().await.unwrap());

    assert!(matches!(
        workflow.confirm().await,
        Err(TipError::InvalidState {
            state: WorkflowState::Cancelled,
            ..
        })
    ));
    assert!(workflow.select_default().is_err());
    assert!(workflow.select_custom(SplitCandidate::new(60, 30, 10)).is_err());
    assert!(workflow.cancel().is_err());
}

#[tokio::test]
async fn test_sequential_workflows_get_increasing_ids() {
    let (policy, ledger) = setup();

    let mut ids = Vec::new();
    for amount in [5000, 8000, 12000] {
        let mut workflow =
            ConfirmationWorkflow::begin(draft(amount), "mesero2", &team(), &policy, ledger.clone())
                .unwrap();
        ids.push(workflow.confirm().await.unwrap().id());
    }

    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_begin_rejects_unknown_worker() {
    let (policy, ledger) = setup();
    let err = ConfirmationWorkflow::begin(draft(5000), "ghost", &team(), &policy, ledger.clone())
        .unwrap_err();

    assert!(matches!(err, TipError::NotFound(ref id) if id == "ghost"));
    assert!(ledger.is_empty().await.unwrap());
}

#[test]
fn test_invalid_state_message() {
    let err = TipError::InvalidState {
        operation: "confirm",
        state: WorkflowState::Cancelled,
    };
    assert_eq!(err.to_string(), "Cannot confirm a workflow that is cancelled");
}
