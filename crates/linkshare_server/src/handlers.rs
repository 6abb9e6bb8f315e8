//! HTTP route handlers for the page server.
//!
//! Handlers only translate between HTTP and the core services; they hold no
//! state of their own beyond what `AppState` passes in.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use linkshare_core::{
    ListingService, RawSubmission, RecordStore, SubmissionOutcome, SubmissionService,
};
use log::warn;

use crate::error::PageError;
use crate::pages;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub submissions: SubmissionService,
    pub listing: ListingService,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            submissions: SubmissionService::new(Arc::clone(&store)),
            listing: ListingService::new(store),
        }
    }
}

/// Handle GET /
pub async fn handle_index() -> Html<String> {
    Html(pages::landing_page())
}

/// Handle GET /index_upload
pub async fn handle_index_upload() -> Html<String> {
    Html(pages::confirmation_page())
}

/// Handle GET /share
pub async fn handle_share_form() -> Html<String> {
    Html(pages::share_page(&RawSubmission::default(), None))
}

/// Handle POST /share
///
/// Redirects to the confirmation page on success, re-renders the form with
/// 200 on validation errors, and renders the error page with 500 when the
/// store fails. A body that cannot be decoded is validated as an empty form.
pub async fn handle_share_submit(
    State(state): State<AppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, PageError> {
    let raw = match form {
        Ok(Form(pairs)) => RawSubmission::from_pairs(pairs),
        Err(rejection) => {
            warn!(
                "event=form_decode module=server status=error http_status={}",
                rejection.status().as_u16()
            );
            RawSubmission::default()
        }
    };

    match state.submissions.submit(raw).await {
        SubmissionOutcome::Accepted { redirect_to, .. } => {
            Ok(Redirect::to(redirect_to).into_response())
        }
        SubmissionOutcome::Rejected { input, errors } => {
            Ok(Html(pages::share_page(&input, Some(&errors))).into_response())
        }
        SubmissionOutcome::StorageFailed { message } => Err(PageError::Storage(message)),
    }
}

/// Handle GET /learn
pub async fn handle_learn(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let rows = state.listing.entries().await?;
    Ok(Html(pages::learn_page(rows)))
}
