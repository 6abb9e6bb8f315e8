//! HTTP error types for the page server.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use linkshare_core::StorageError;

use crate::pages;

/// Failure rendered as an HTML error page.
///
/// The page carries the underlying message so the submitter can see why
/// nothing was saved.
#[derive(Debug)]
pub enum PageError {
    Storage(String),
}

impl PageError {
    pub fn message(&self) -> &str {
        match self {
            Self::Storage(message) => message,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Html(pages::error_page(self.message()))).into_response()
    }
}

impl From<StorageError> for PageError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}
