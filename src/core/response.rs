//! Result of a notification attempt.

use super::Data;
use crate::error::{NotifierError, NotifierResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a send attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Success,
    Failure,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStatus::Success => write!(f, "Success"),
            ResponseStatus::Failure => write!(f, "Failure"),
        }
    }
}

/// Transport-level result as returned by the remote service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponse {
    /// HTTP status code or provider-specific status
    pub status_code: Option<u16>,
    /// Response body
    pub body: Option<String>,
    /// Time taken for the request in milliseconds
    pub duration_ms: u64,
}

impl RawResponse {
    /// Parses the body as JSON, if there is one and it is valid JSON
    pub fn json(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

/// Immutable result of a notification attempt.
///
/// The status is derived from the errors: a response is a failure exactly
/// when it carries at least one error. Deserialization recomputes it, so a
/// serialized status never disagrees with the errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ResponseRecord")]
pub struct Response {
    status: ResponseStatus,
    provider: String,
    data: Data,
    raw_response: Option<RawResponse>,
    errors: Option<Vec<String>>,
}

/// Wire form of [`Response`]; the serialized status is ignored
#[derive(Deserialize)]
struct ResponseRecord {
    provider: String,
    #[serde(default)]
    data: Data,
    #[serde(default)]
    raw_response: Option<RawResponse>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

impl From<ResponseRecord> for Response {
    fn from(record: ResponseRecord) -> Self {
        Response::new(
            record.provider,
            record.data,
            record.raw_response,
            record.errors.unwrap_or_default(),
        )
    }
}

impl Response {
    /// Builds a response, deriving its status from `errors`
    pub fn new(
        provider: impl Into<String>,
        data: Data,
        raw_response: Option<RawResponse>,
        errors: Vec<String>,
    ) -> Self {
        let (status, errors) = if errors.is_empty() {
            (ResponseStatus::Success, None)
        } else {
            (ResponseStatus::Failure, Some(errors))
        };

        Self {
            status,
            provider: provider.into(),
            data,
            raw_response,
            errors,
        }
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// The processed data used for the attempt
    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn raw_response(&self) -> Option<&RawResponse> {
        self.raw_response.as_ref()
    }

    pub fn errors(&self) -> Option<&[String]> {
        self.errors.as_deref()
    }

    /// Turns captured errors into a [`NotifierError::Notification`]
    ///
    /// # Errors
    /// Fails when the response holds at least one error.
    pub fn raise_on_errors(&self) -> NotifierResult<()> {
        match &self.errors {
            Some(errors) => Err(NotifierError::Notification {
                provider: self.provider.clone(),
                data: self.data.clone(),
                errors: errors.clone(),
                raw_response: self.raw_response.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.provider.chars();
        let provider = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        write!(f, "<Response,provider={provider},status={}>", self.status)
    }
}
