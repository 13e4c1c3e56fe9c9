//! Unified API error type and human-readable message extraction.
//!
//! Every store action catches [`ApiError`] at its boundary and turns it into a
//! display string with [`error_message`]. The backend reports failures as
//! `{"detail": ...}` where `detail` is either a plain string or a list of
//! field errors shaped like `{"loc": [...], "msg": "...", "type": "..."}`.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the bearer token. The persisted session has
    /// already been wiped by the time this is returned.
    #[error("Unauthorized: {}", describe(.detail.as_ref()))]
    Unauthorized {
        /// Error detail from the response body, if any.
        detail: Option<ErrorDetail>,
    },

    /// Non-success status with an optional server-provided detail.
    #[error("API error ({status}): {}", describe(.detail.as_ref()))]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Error detail from the response body, if any.
        detail: Option<ErrorDetail>,
    },

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request path could not be joined onto the base URL.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Server-provided detail, when the error carries one.
    #[must_use]
    pub const fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Unauthorized { detail } | Self::Status { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if the request reached the server.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// The `detail` field of an error response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Plain message.
    Message(String),
    /// Validation errors, one object per offending field.
    List(Vec<Value>),
    /// Anything else the server might send.
    Other(Value),
}

impl ErrorDetail {
    /// The message this detail contributes, if it has a usable one.
    ///
    /// A string detail wins; otherwise the `msg` of the first list item.
    /// Blank messages are treated as absent.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        let raw = match self {
            Self::Message(message) => Some(message.as_str()),
            Self::List(items) => items
                .first()
                .and_then(|first| first.get("msg"))
                .and_then(Value::as_str),
            Self::Other(_) => None,
        };
        raw.map(str::trim).filter(|m| !m.is_empty())
    }
}

/// Error response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<ErrorDetail>,
}

/// Parse the `detail` field out of an error response body, if present.
pub(crate) fn parse_detail(body: &str) -> Option<ErrorDetail> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
}

/// Extract a display message from an error, falling back to `fallback`.
///
/// Order: trimmed string detail, then the first list item's trimmed `msg`,
/// then the fallback.
#[must_use]
pub fn error_message(error: &ApiError, fallback: &str) -> String {
    error
        .detail()
        .and_then(ErrorDetail::message)
        .map_or_else(|| fallback.to_string(), ToString::to_string)
}

fn describe(detail: Option<&ErrorDetail>) -> String {
    detail
        .and_then(ErrorDetail::message)
        .unwrap_or("(no error details provided)")
        .to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn status_error(detail: Option<ErrorDetail>) -> ApiError {
        ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            detail,
        }
    }

    #[test]
    fn test_string_detail_is_trimmed() {
        let err = status_error(parse_detail(r#"{"detail": "  Product not found  "}"#));
        assert_eq!(error_message(&err, "fallback"), "Product not found");
    }

    #[test]
    fn test_list_detail_uses_first_msg() {
        let body = json!({
            "detail": [
                {"loc": ["body", "email"], "msg": "field required", "type": "missing"},
                {"loc": ["body", "password"], "msg": "too short", "type": "value_error"}
            ]
        });
        let err = status_error(parse_detail(&body.to_string()));
        assert_eq!(error_message(&err, "fallback"), "field required");
    }

    #[test]
    fn test_blank_detail_falls_back() {
        let err = status_error(parse_detail(r#"{"detail": "   "}"#));
        assert_eq!(error_message(&err, "fallback"), "fallback");
    }

    #[test]
    fn test_list_without_msg_falls_back() {
        let err = status_error(parse_detail(r#"{"detail": [{"loc": ["body"]}]}"#));
        assert_eq!(error_message(&err, "fallback"), "fallback");
        let err = status_error(parse_detail(r#"{"detail": []}"#));
        assert_eq!(error_message(&err, "fallback"), "fallback");
    }

    #[test]
    fn test_non_json_body_has_no_detail() {
        assert!(parse_detail("<html>Bad Gateway</html>").is_none());
        let err = status_error(None);
        assert_eq!(error_message(&err, "Something went wrong"), "Something went wrong");
    }

    #[test]
    fn test_object_detail_is_other() {
        let detail = parse_detail(r#"{"detail": {"code": 7}}"#);
        assert!(matches!(detail, Some(ErrorDetail::Other(_))));
        assert!(detail.unwrap_or(ErrorDetail::Other(Value::Null)).message().is_none());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Unauthorized {
            detail: Some(ErrorDetail::Message("Could not validate credentials".to_string())),
        };
        assert_eq!(err.to_string(), "Unauthorized: Could not validate credentials");
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));

        let err = status_error(None);
        assert_eq!(
            err.to_string(),
            "API error (400 Bad Request): (no error details provided)"
        );
    }
}
