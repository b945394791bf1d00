//! Test providers shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use notifiers::core::{Data, Provider, Response, SchemaResource};
use serde_json::{Value, json};

/// Minimal provider: one required string, no defaults
pub struct Dummy;

impl SchemaResource for Dummy {
    fn name(&self) -> &str {
        "dummy"
    }

    fn required(&self) -> &[&str] {
        &["message"]
    }

    fn schema_fragment(&self) -> Value {
        json!({
            "properties": {
                "message": {"type": "string", "title": "the message"}
            },
            "additionalProperties": false
        })
    }
}

#[async_trait]
impl Provider for Dummy {
    fn base_url(&self) -> &str {
        "https://api.dummy.test"
    }

    fn site_url(&self) -> &str {
        "https://dummy.test"
    }

    async fn send_notification(&self, data: Data) -> Response {
        self.create_response(data, None, vec![])
    }
}

/// Provider with defaults and an optional integer, for precedence checks
pub struct Layered;

impl SchemaResource for Layered {
    fn name(&self) -> &str {
        "layered"
    }

    fn required(&self) -> &[&str] {
        &[]
    }

    fn schema_fragment(&self) -> Value {
        json!({
            "properties": {
                "channel": {"type": "string"},
                "retries": {"type": "integer", "minimum": 0}
            }
        })
    }

    fn defaults(&self) -> Data {
        data(json!({"channel": "default-channel", "retries": 1}))
    }
}

#[async_trait]
impl Provider for Layered {
    fn base_url(&self) -> &str {
        ""
    }

    fn site_url(&self) -> &str {
        ""
    }

    async fn send_notification(&self, data: Data) -> Response {
        let errors = if data["channel"] == "broken" {
            vec!["channel is broken".to_string()]
        } else {
            vec![]
        };
        self.create_response(data, None, errors)
    }
}

pub fn data(value: Value) -> Data {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}
