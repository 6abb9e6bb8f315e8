use async_trait::async_trait;
use linkshare_core::{
    ListingService, NewRecord, RawSubmission, Record, RecordId, RecordStore, SqliteRecordStore,
    StorageError, StorageResult, SubmissionField, SubmissionOutcome, SubmissionService,
    CONFIRMATION_PATH,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Store that can be switched into a failing state between calls.
struct FlakyStore {
    inner: SqliteRecordStore,
    unreachable: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: SqliteRecordStore::in_memory().unwrap(),
            unreachable: AtomicBool::new(false),
        }
    }

    fn set_unreachable(&self, value: bool) {
        self.unreachable.store(value, Ordering::SeqCst);
    }

    fn check(&self) -> StorageResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(StorageError::Unavailable(
                "connection refused by database host".into(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    fn backend(&self) -> &'static str {
        "flaky"
    }

    async fn insert(&self, record: &NewRecord) -> StorageResult<RecordId> {
        self.check()?;
        self.inner.insert(record).await
    }

    async fn list_all(&self) -> StorageResult<Vec<Record>> {
        self.inner.list_all().await
    }
}

fn services() -> (Arc<FlakyStore>, SubmissionService, ListingService) {
    let store = Arc::new(FlakyStore::new());
    let submissions = SubmissionService::new(store.clone());
    let listing = ListingService::new(store.clone());
    (store, submissions, listing)
}

#[tokio::test]
async fn valid_submission_is_persisted_and_listed() {
    let (_store, submissions, listing) = services();

    let outcome = submissions
        .submit(RawSubmission::new(
            Some("1"),
            Some("Python SQLite"),
            Some("https://example.com/"),
        ))
        .await;

    let record_id = match outcome {
        SubmissionOutcome::Accepted {
            record_id,
            redirect_to,
        } => {
            assert_eq!(redirect_to, CONFIRMATION_PATH);
            record_id
        }
        other => panic!("unexpected outcome: {other:?}"),
    };

    let rows = listing.entries().await.unwrap().collect::<Vec<_>>();
    assert_eq!(
        rows,
        vec![Record {
            record_id,
            owner_id: 1,
            topic: "Python SQLite".to_string(),
            url: "https://example.com/".to_string(),
        }]
    );
}

#[tokio::test]
async fn missing_owner_id_is_rejected_without_insert() {
    let (_store, submissions, listing) = services();
    let raw = RawSubmission::new(None, Some("X"), Some("https://example.com/"));

    match submissions.submit(raw.clone()).await {
        SubmissionOutcome::Rejected { input, errors } => {
            assert_eq!(input, raw);
            assert!(errors.has(SubmissionField::OwnerId));
            assert!(!errors.has(SubmissionField::Url));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(listing.entries().await.unwrap().len(), 0);
}

#[tokio::test]
async fn malformed_url_is_rejected_without_insert() {
    let (_store, submissions, listing) = services();
    let raw = RawSubmission::new(Some("2"), Some("Y"), Some("not-a-url"));

    match submissions.submit(raw).await {
        SubmissionOutcome::Rejected { errors, .. } => {
            assert_eq!(errors.errors().len(), 1);
            assert!(errors.has(SubmissionField::Url));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(listing.entries().await.unwrap().len(), 0);
}

#[tokio::test]
async fn storage_failure_is_reported_and_service_recovers() {
    let (store, submissions, listing) = services();
    let raw = RawSubmission::new(Some("4"), Some("Z"), Some("https://example.com/"));

    store.set_unreachable(true);
    match submissions.submit(raw.clone()).await {
        SubmissionOutcome::StorageFailed { message } => {
            assert!(message.contains("connection refused by database host"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(listing.entries().await.unwrap().len(), 0);

    store.set_unreachable(false);
    assert!(matches!(
        submissions.submit(raw).await,
        SubmissionOutcome::Accepted { .. }
    ));
    assert_eq!(listing.entries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn listing_reflects_store_state_on_every_call() {
    let (_store, submissions, listing) = services();

    let first = listing.entries().await.unwrap();
    assert_eq!(first.len(), 0);

    for topic in ["one", "two"] {
        submissions
            .submit(RawSubmission::new(
                Some("1"),
                Some(topic),
                Some("https://example.com/"),
            ))
            .await;
    }

    let topics = listing
        .entries()
        .await
        .unwrap()
        .map(|record| record.topic)
        .collect::<Vec<_>>();
    assert_eq!(topics, vec!["one", "two"]);
}
