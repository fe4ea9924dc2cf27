use std::collections::BTreeSet;

use reqwest::{StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

/// Shown when neither the response body nor the error carry anything useful.
pub const GENERIC_ERROR_MESSAGE: &str = "Unexpected error.";

/// Shown when the server could not be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Unable to reach the server. Check your connection.";

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Failure taxonomy the error stage and the UI reason about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced an HTTP response.
    Network,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 400 or 409
    Validation,
    /// 5xx and any other non-success status.
    Server,
    /// Client-side failure unrelated to a status code.
    Client,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status} from {url}: {}", .body.user_message())]
    Http {
        status: StatusCode,
        url: Url,
        body: ErrorBody,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Client(String),
}

impl ApiError {
    /// Build the error for a non-success response.
    pub fn from_status(status: StatusCode, url: Url, body: &str) -> Self {
        ApiError::Http {
            status,
            url,
            body: ErrorBody::parse(body),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Http { status, .. } => match status.as_u16() {
                401 => ErrorKind::Unauthorized,
                403 => ErrorKind::Forbidden,
                400 | 409 => ErrorKind::Validation,
                _ => ErrorKind::Server,
            },
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::MissingRefreshToken | ApiError::InvalidResponse(_) | ApiError::Client(_) => {
                ErrorKind::Client
            }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// URL of the failed call, for HTTP failures.
    pub fn url(&self) -> Option<&Url> {
        match self {
            ApiError::Http { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Server-supplied message, if the failure carried one.
    pub fn api_message(&self) -> Option<String> {
        self.body().and_then(ErrorBody::api_message)
    }

    /// The one message to show a user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { body, .. } => body.user_message(),
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::MissingRefreshToken => "Session expired. Please log in again.".to_string(),
            ApiError::InvalidResponse(_) => GENERIC_ERROR_MESSAGE.to_string(),
            ApiError::Client(msg) => msg.clone(),
        }
    }
}

/// Error payload returned by the API.
///
/// Field-level validation errors appear either under `details.fieldErrors`
/// or at the top level as `fieldErrors`.
#[derive(Debug, Clone, Default)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
    /// `details.fieldErrors` followed by top-level `fieldErrors`.
    pub field_errors: Vec<FieldError>,
    /// Raw body text, truncated.
    pub raw: String,
}

#[derive(Debug, Clone, Default)]
pub struct FieldError {
    pub field: Option<String>,
    pub message: Option<String>,
}

impl FieldError {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            field: string_field(obj.get("field")),
            message: string_field(obj.get("message")),
        })
    }
}

impl ErrorBody {
    /// Parse a response body.
    ///
    /// Each field is read on its own, so one field with an unexpected shape
    /// does not hide the others. Anything that is not a JSON object yields an
    /// empty body that only keeps the raw text.
    pub fn parse(text: &str) -> Self {
        let raw = truncate_body(text);
        let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(text) else {
            return Self {
                raw,
                ..Self::default()
            };
        };

        let nested = obj.get("details").and_then(|d| d.get("fieldErrors"));
        let field_errors = [nested, obj.get("fieldErrors")]
            .into_iter()
            .flatten()
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(FieldError::from_value)
            .collect();

        Self {
            message: string_field(obj.get("message")),
            error: string_field(obj.get("error")),
            field_errors,
            raw,
        }
    }

    /// Deduplicated field messages in first-seen order, joined with a space.
    pub fn field_message(&self) -> Option<String> {
        let mut seen = BTreeSet::new();
        let messages: Vec<&str> = self
            .field_errors
            .iter()
            .filter_map(|e| e.message.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .filter(|m| seen.insert(*m))
            .collect();

        if messages.is_empty() {
            None
        } else {
            Some(messages.join(" "))
        }
    }

    /// Field messages, then `message`, then `error`.
    pub fn api_message(&self) -> Option<String> {
        self.field_message()
            .or_else(|| non_blank(self.message.as_deref()))
            .or_else(|| non_blank(self.error.as_deref()))
    }

    /// [`api_message`](Self::api_message) with the generic fallback.
    pub fn user_message(&self) -> String {
        self.api_message()
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
    }
}

/// A JSON string value, ignoring every other shape.
fn string_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}
