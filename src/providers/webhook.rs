//! Webhook notification provider implementation.
//!
//! Sends the notification as a JSON document to any HTTP endpoint using the
//! shared HTTP client.

use crate::core::{Data, Provider, Response, SchemaResource};
use crate::error::{NotifierError, NotifierResult};
use crate::external::client::{http_client, send};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};
use std::time::Duration;

/// Webhook notification provider
///
/// Posts `{"title", "body", "metadata"}` to the configured URL. The universal
/// `message` argument is sent as `body`.
///
/// # Example
/// ```ignore
/// let notifier = notifiers::get_notifier("webhook").unwrap();
/// let response = notifier
///     .notify(data(json!({"url": "https://example.com/hook", "message": "deployed"})))
///     .await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct WebhookProvider;

impl WebhookProvider {
    pub fn new() -> Self {
        Self
    }

    /// Builds the JSON request body from processed data
    fn build_request_body(data: &Data) -> Value {
        let mut body = json!({
            "body": data.get("body").cloned().unwrap_or(Value::Null),
        });

        if let Some(title) = data.get("title") {
            body["title"] = title.clone();
        }

        if let Some(metadata) = data.get("metadata") {
            body["metadata"] = metadata.clone();
        }

        body
    }

    /// Parses the HTTP method, falling back to POST
    fn parse_method(data: &Data) -> Method {
        data.get("method")
            .and_then(Value::as_str)
            .and_then(|method| method.parse().ok())
            .unwrap_or(Method::POST)
    }
}

impl SchemaResource for WebhookProvider {
    fn name(&self) -> &str {
        "webhook"
    }

    fn required(&self) -> &[&str] {
        &["url", "message"]
    }

    fn schema_fragment(&self) -> Value {
        json!({
            "properties": {
                "url": {
                    "type": "string",
                    "format": "uri",
                    "title": "endpoint receiving the notification"
                },
                "message": {
                    "type": "string",
                    "title": "notification body"
                },
                "title": {
                    "type": "string",
                    "title": "notification title"
                },
                "method": {
                    "type": "string",
                    "enum": ["POST", "PUT", "PATCH"],
                    "title": "HTTP method"
                },
                "headers": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "string",
                        "error_type": "header values must be strings"
                    },
                    "title": "extra request headers"
                },
                "metadata": {
                    "type": "object",
                    "title": "free-form data forwarded with the notification"
                },
                "timeout": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 300,
                    "title": "request timeout in seconds"
                },
                "username": {
                    "type": "string",
                    "title": "basic auth username"
                },
                "password": {
                    "type": "string",
                    "title": "basic auth password"
                }
            },
            "additionalProperties": false
        })
    }

    fn defaults(&self) -> Data {
        let mut defaults = Data::new();
        defaults.insert("method".to_string(), json!("POST"));
        defaults.insert("timeout".to_string(), json!(30));
        defaults
    }

    fn prepare_data(&self, mut data: Data) -> Data {
        if let Some(message) = data.remove("message") {
            data.insert("body".to_string(), message);
        }
        data
    }

    fn validate_data_dependencies(&self, data: Data) -> NotifierResult<Data> {
        if data.contains_key("username") != data.contains_key("password") {
            return Err(NotifierError::dependency(
                self.name(),
                "username and password must be set together",
            ));
        }
        Ok(data)
    }
}

#[async_trait]
impl Provider for WebhookProvider {
    fn base_url(&self) -> &str {
        ""
    }

    fn site_url(&self) -> &str {
        "https://en.wikipedia.org/wiki/Webhook"
    }

    /// Sends a notification via webhook
    ///
    /// Request or remote failures end up in the response errors.
    async fn send_notification(&self, data: Data) -> Response {
        let Some(url) = data.get("url").and_then(Value::as_str) else {
            return self.create_response(data, None, vec!["missing webhook url".to_string()]);
        };

        let timeout = data.get("timeout").and_then(Value::as_u64).unwrap_or(30);
        let mut request = http_client()
            .request(Self::parse_method(&data), url)
            .timeout(Duration::from_secs(timeout))
            .json(&Self::build_request_body(&data));

        if let Some(headers) = data.get("headers").and_then(Value::as_object) {
            for (key, value) in headers {
                if let Some(value) = value.as_str() {
                    request = request.header(key.as_str(), value);
                }
            }
        }

        if let (Some(username), Some(password)) = (
            data.get("username").and_then(Value::as_str),
            data.get("password").and_then(Value::as_str),
        ) {
            request = request.basic_auth(username, Some(password));
        }

        let outcome = send(request).await;
        self.create_response(data, outcome.raw_response, outcome.errors)
    }
}
