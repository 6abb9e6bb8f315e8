use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use linkshare_core::{
    NewRecord, Record, RecordId, RecordStore, SqliteRecordStore, StorageError, StorageResult,
};
use linkshare_server::{build_router, AppState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const UNREACHABLE_MESSAGE: &str = "connection refused by database host";

/// Store that can be switched into a failing state between requests.
struct ConfigurableStore {
    inner: SqliteRecordStore,
    unreachable: AtomicBool,
}

impl ConfigurableStore {
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
            Err(StorageError::Unavailable(UNREACHABLE_MESSAGE.into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for ConfigurableStore {
    fn backend(&self) -> &'static str {
        "configurable"
    }

    async fn insert(&self, record: &NewRecord) -> StorageResult<RecordId> {
        self.check()?;
        self.inner.insert(record).await
    }

    async fn list_all(&self) -> StorageResult<Vec<Record>> {
        self.check()?;
        self.inner.list_all().await
    }
}

fn app() -> (Arc<ConfigurableStore>, Router) {
    let store = Arc::new(ConfigurableStore::new());
    let router = build_router(AppState::new(store.clone()));
    (store, router)
}

async fn get(router: &Router, path: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn post_share(router: &Router, form: &str) -> axum::response::Response {
    router
        .clone()
        .oneshot(
            Request::post("/share")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn should_serve_static_pages() {
    // given
    let (_store, router) = app();

    // when / then
    for path in ["/", "/index_upload", "/share"] {
        let (status, body) = get(&router, path).await;
        assert_eq!(status, StatusCode::OK, "path {path}");
        assert!(body.starts_with("<!doctype html>"), "path {path}");
    }

    let (_, form) = get(&router, "/share").await;
    assert!(form.contains("name=\"owner_id\""));
    assert!(form.contains("name=\"topic\""));
    assert!(form.contains("name=\"url\""));
}

#[tokio::test]
async fn should_redirect_and_list_valid_submission() {
    // given
    let (_store, router) = app();

    // when
    let response = post_share(
        &router,
        "owner_id=1&topic=Python+SQLite&url=https%3A%2F%2Fexample.com%2F",
    )
    .await;

    // then
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/index_upload"
    );

    let (status, listing) = get(&router, "/learn").await;
    assert_eq!(status, StatusCode::OK);
    assert!(listing.contains("<td>1</td><td>1</td><td>Python SQLite</td>"));
    assert!(listing.contains("href=\"https://example.com/\""));
}

#[tokio::test]
async fn should_re_render_form_when_required_fields_missing() {
    // given
    let (_store, router) = app();

    // when
    let response = post_share(&router, "owner_id=&topic=&url=https%3A%2F%2Fx.org").await;

    // then
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("data-field=\"owner_id\">This field is required.</span>"));
    assert!(body.contains("data-field=\"topic\">This field is required.</span>"));
    assert!(!body.contains("data-field=\"url\""));
    assert!(body.contains("value=\"https://x.org\""));

    let (_, listing) = get(&router, "/learn").await;
    assert!(listing.contains("No links shared yet."));
}

#[tokio::test]
async fn should_reject_submission_without_owner_id() {
    // given
    let (_store, router) = app();

    // when
    let response = post_share(&router, "topic=X&url=https%3A%2F%2Fexample.com%2F").await;

    // then
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("data-field=\"owner_id\">This field is required.</span>"));
    assert!(body.contains("value=\"X\""));

    let (_, listing) = get(&router, "/learn").await;
    assert!(listing.contains("No links shared yet."));
}

#[tokio::test]
async fn should_re_render_form_when_url_is_invalid() {
    // given
    let (_store, router) = app();

    // when
    let response = post_share(&router, "owner_id=2&topic=Y&url=not-a-url").await;

    // then
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("data-field=\"url\">Invalid URL.</span>"));
    assert!(body.contains("value=\"not-a-url\""));

    let (_, listing) = get(&router, "/learn").await;
    assert!(listing.contains("No links shared yet."));
}

#[tokio::test]
async fn should_treat_absent_fields_as_missing() {
    // given
    let (_store, router) = app();

    // when
    let response = post_share(&router, "").await;

    // then
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("data-field=\"owner_id\">This field is required.</span>"));
    assert!(body.contains("data-field=\"topic\">This field is required.</span>"));
    assert!(body.contains("data-field=\"url\">Invalid URL.</span>"));
}

#[tokio::test]
async fn should_keep_first_value_of_repeated_field() {
    // given
    let (_store, router) = app();

    // when
    let response = post_share(
        &router,
        "owner_id=7&owner_id=8&topic=Twice&url=https%3A%2F%2Fexample.com%2F",
    )
    .await;

    // then
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let (_, listing) = get(&router, "/learn").await;
    assert!(listing.contains("<td>1</td><td>7</td><td>Twice</td>"));
}

#[tokio::test]
async fn should_re_render_form_when_body_is_not_a_form() {
    // given
    let (_store, router) = app();
    let request = Request::post("/share")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"owner_id":1}"#))
        .unwrap();

    // when
    let response = router.clone().oneshot(request).await.unwrap();

    // then
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("data-field=\"owner_id\">This field is required.</span>"));

    let (_, listing) = get(&router, "/learn").await;
    assert!(listing.contains("No links shared yet."));
}

#[tokio::test]
async fn should_not_link_script_urls_in_listing() {
    // given
    let (_store, router) = app();
    let response = post_share(
        &router,
        "owner_id=1&topic=click&url=javascript%3A%2F%2Fexample.com%2F%250aalert(document.cookie)",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // when
    let (status, listing) = get(&router, "/learn").await;

    // then
    assert_eq!(status, StatusCode::OK);
    assert!(!listing.contains("href=\"javascript:"));
    assert!(listing.contains("<td>javascript://example.com/%0aalert(document.cookie)</td>"));
}

#[tokio::test]
async fn should_render_error_page_when_store_unreachable_then_recover() {
    // given
    let (store, router) = app();
    store.set_unreachable(true);

    // when
    let response = post_share(
        &router,
        "owner_id=3&topic=Z&url=https%3A%2F%2Fz.example",
    )
    .await;

    // then
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(body.contains(&format!("Error: storage unavailable: {UNREACHABLE_MESSAGE}")));

    let (status, body) = get(&router, "/learn").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains(UNREACHABLE_MESSAGE));

    // when the store comes back
    store.set_unreachable(false);

    // then nothing was persisted and later requests succeed
    let (status, listing) = get(&router, "/learn").await;
    assert_eq!(status, StatusCode::OK);
    assert!(listing.contains("No links shared yet."));

    let response = post_share(
        &router,
        "owner_id=3&topic=Z&url=https%3A%2F%2Fz.example",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn should_list_records_in_insertion_order() {
    // given
    let (_store, router) = app();
    for (owner, topic) in [("1", "First"), ("2", "Second"), ("1", "Third")] {
        let form = format!("owner_id={owner}&topic={topic}&url=https%3A%2F%2Fexample.com%2F");
        let response = post_share(&router, &form).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    // when
    let (_, listing) = get(&router, "/learn").await;

    // then
    let first = listing.find("First").unwrap();
    let second = listing.find("Second").unwrap();
    let third = listing.find("Third").unwrap();
    assert!(first < second && second < third);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_path() {
    // given
    let (_store, router) = app();

    // when
    let (status, _) = get(&router, "/nope").await;

    // then
    assert_eq!(status, StatusCode::NOT_FOUND);
}
