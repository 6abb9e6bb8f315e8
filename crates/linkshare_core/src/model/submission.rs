//! Raw form submission and its validation.
//!
//! # Responsibility
//! - Carry the untrusted `(owner_id, topic, url)` strings from the request
//!   boundary.
//! - Turn them into a [`NewRecord`] or a per-field failure report.
//!
//! # Invariants
//! - Validation is pure: no I/O, no logging, no clock.
//! - Every field is checked; failures are reported in form order.
//! - A validated record keeps `topic` and `url` exactly as submitted.

use crate::model::record::{NewRecord, OwnerId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

/// Raw submission payload as decoded from the form body.
///
/// Every field is optional so that absent and empty inputs reach the
/// validator instead of failing extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl RawSubmission {
    /// Builds a payload from borrowed values, mostly for callers outside HTTP.
    pub fn new(owner_id: Option<&str>, topic: Option<&str>, url: Option<&str>) -> Self {
        Self {
            owner_id: owner_id.map(str::to_owned),
            topic: topic.map(str::to_owned),
            url: url.map(str::to_owned),
        }
    }

    /// Builds a payload from decoded form pairs.
    ///
    /// The first value of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "owner_id" => &mut raw.owner_id,
                "topic" => &mut raw.topic,
                "url" => &mut raw.url,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        raw
    }
}

/// Form field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionField {
    OwnerId,
    Topic,
    Url,
}

impl SubmissionField {
    /// Returns the form field name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OwnerId => "owner_id",
            Self::Topic => "topic",
            Self::Url => "url",
        }
    }
}

/// Failure category for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Required input absent, blank, or not an integer where one is needed.
    MissingField,
    /// Input present but not in the expected shape.
    InvalidFormat,
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: SubmissionField,
    pub kind: FieldErrorKind,
    /// Human-readable message rendered next to the form field.
    pub message: &'static str,
}

impl FieldError {
    fn required(field: SubmissionField) -> Self {
        Self {
            field,
            kind: FieldErrorKind::MissingField,
            message: "This field is required.",
        }
    }

    fn not_an_integer(field: SubmissionField) -> Self {
        Self {
            field,
            kind: FieldErrorKind::MissingField,
            message: "Not a valid integer value.",
        }
    }

    fn invalid_url(field: SubmissionField) -> Self {
        Self {
            field,
            kind: FieldErrorKind::InvalidFormat,
            message: "Invalid URL.",
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field.as_str(), self.message)
    }
}

/// Non-empty set of field errors for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionErrors {
    errors: Vec<FieldError>,
}

impl SubmissionErrors {
    /// All errors in form order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns the first error reported for `field`, if any.
    pub fn for_field(&self, field: SubmissionField) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    /// Returns whether `field` failed validation.
    pub fn has(&self, field: SubmissionField) -> bool {
        self.for_field(field).is_some()
    }
}

impl Display for SubmissionErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "invalid submission: {joined}")
    }
}

impl Error for SubmissionErrors {}

/// Validates one raw submission.
///
/// # Contract
/// - `owner_id`: `MissingField` when absent, blank, or not a signed 64-bit
///   integer (surrounding whitespace is ignored).
/// - `topic`: `MissingField` when absent or blank after trimming.
/// - `url`: `InvalidFormat` when it does not parse as an absolute URL with
///   both scheme and host.
///
/// # Errors
/// - Returns every failing field at once, in form order.
pub fn validate_submission(raw: &RawSubmission) -> Result<NewRecord, SubmissionErrors> {
    let mut errors = Vec::new();

    let owner_id = match check_owner_id(raw.owner_id.as_deref()) {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    };

    let topic = match raw.topic.as_deref() {
        Some(value) if !value.trim().is_empty() => Some(value.to_owned()),
        _ => {
            errors.push(FieldError::required(SubmissionField::Topic));
            None
        }
    };

    let url = match raw.url.as_deref() {
        Some(value) if is_absolute_url(value) => Some(value.to_owned()),
        _ => {
            errors.push(FieldError::invalid_url(SubmissionField::Url));
            None
        }
    };

    match (owner_id, topic, url) {
        (Some(owner_id), Some(topic), Some(url)) => Ok(NewRecord {
            owner_id,
            topic,
            url,
        }),
        _ => Err(SubmissionErrors { errors }),
    }
}

fn check_owner_id(value: Option<&str>) -> Result<OwnerId, FieldError> {
    let trimmed = match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => return Err(FieldError::required(SubmissionField::OwnerId)),
    };

    trimmed
        .parse::<OwnerId>()
        .map_err(|_| FieldError::not_an_integer(SubmissionField::OwnerId))
}

fn is_absolute_url(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }

    match Url::parse(trimmed) {
        Ok(parsed) => parsed.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) => false,
    }
}
