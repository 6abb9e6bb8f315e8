//! HTML page rendering.
//!
//! Pages are plain strings; every user-controlled value goes through
//! [`escape_html`] before it is embedded.

use linkshare_core::{core_version, RawSubmission, Record, SubmissionErrors, SubmissionField};
use std::fmt::Write;
use url::Url;

const OWNER_ID_PLACEHOLDER: &str = "Spencer[1] or Miracle[2] (Required)";
const TOPIC_PLACEHOLDER: &str = "Enter a topic (e.g. 'Python SQLite')";
const URL_PLACEHOLDER: &str = "https://www.example.com/";

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn landing_page() -> String {
    layout(
        "LinkShare",
        "<h1>LinkShare</h1>\
<p>Share links you found useful, and learn from the ones others shared.</p>\
<ul><li><a href=\"/share\">Share a link</a></li><li><a href=\"/learn\">Browse shared links</a></li></ul>",
    )
}

pub fn confirmation_page() -> String {
    layout(
        "Link shared",
        "<h1>Thanks for sharing!</h1>\
<p>Your link was saved.</p>\
<ul><li><a href=\"/share\">Share another link</a></li><li><a href=\"/learn\">See all shared links</a></li></ul>",
    )
}

/// Renders the share form, re-presenting `input` and inline `errors`.
pub fn share_page(input: &RawSubmission, errors: Option<&SubmissionErrors>) -> String {
    let mut body = String::from("<h1>Share a link</h1><form method=\"post\" action=\"/share\">");
    push_field(
        &mut body,
        SubmissionField::OwnerId,
        "Person ID",
        "number",
        OWNER_ID_PLACEHOLDER,
        input.owner_id.as_deref(),
        errors,
    );
    push_field(
        &mut body,
        SubmissionField::Topic,
        "Topic",
        "text",
        TOPIC_PLACEHOLDER,
        input.topic.as_deref(),
        errors,
    );
    push_field(
        &mut body,
        SubmissionField::Url,
        "URL",
        "url",
        URL_PLACEHOLDER,
        input.url.as_deref(),
        errors,
    );
    body.push_str("<button type=\"submit\">Submit</button></form>");
    layout("Share a link", &body)
}

/// Renders every record, consuming the rows once.
pub fn learn_page(rows: impl Iterator<Item = Record>) -> String {
    let mut items = String::new();
    for record in rows {
        let _ = write!(
            items,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            record.record_id,
            record.owner_id,
            escape_html(&record.topic),
            link_cell(&record.url),
        );
    }

    let body = if items.is_empty() {
        "<h1>Shared links</h1><p>No links shared yet. <a href=\"/share\">Be the first.</a></p>"
            .to_string()
    } else {
        format!(
            "<h1>Shared links</h1><table><thead><tr><th>Record</th><th>Person ID</th>\
<th>Topic</th><th>URL</th></tr></thead><tbody>{items}</tbody></table>"
        )
    };
    layout("Shared links", &body)
}

/// Renders a failure page carrying the underlying error message.
pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        &format!(
            "<h1>Something went wrong</h1><p class=\"error\">Error: {}</p><p><a href=\"/\">Back home</a></p>",
            escape_html(message)
        ),
    )
}

/// Only web URLs become clickable; anything else is shown as text.
fn link_cell(raw: &str) -> String {
    let url = escape_html(raw);
    match Url::parse(raw.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
            format!("<a href=\"{url}\" rel=\"noopener noreferrer\">{url}</a>")
        }
        _ => url,
    }
}

fn push_field(
    body: &mut String,
    field: SubmissionField,
    label: &str,
    input_type: &str,
    placeholder: &str,
    value: Option<&str>,
    errors: Option<&SubmissionErrors>,
) {
    let name = field.as_str();
    let _ = write!(
        body,
        "<p><label for=\"{name}\">{label}</label> \
<input id=\"{name}\" name=\"{name}\" type=\"{input_type}\" placeholder=\"{}\" value=\"{}\">",
        escape_html(placeholder),
        escape_html(value.unwrap_or_default()),
    );
    if let Some(error) = errors.and_then(|errors| errors.for_field(field)) {
        let _ = write!(
            body,
            " <span class=\"error\" data-field=\"{name}\">{}</span>",
            escape_html(error.message)
        );
    }
    body.push_str("</p>");
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body>\
<nav><a href=\"/\">Home</a> | <a href=\"/share\">Share</a> | <a href=\"/learn\">Learn</a></nav>\
<main>{body}</main><footer><small>linkshare {}</small></footer></body></html>",
        escape_html(title),
        core_version()
    )
}
