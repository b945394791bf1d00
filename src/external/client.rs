use std::sync::OnceLock;
use std::time::{Duration, Instant};

use reqwest::RequestBuilder;

use crate::config::settings::HttpSettings;
use crate::core::RawResponse;

static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Shared HTTP client used by every provider
///
/// The client is initialized lazily on first access and reused across the
/// process, so providers share one connection pool. Call [`configure`] before
/// the first request to apply settings; otherwise defaults are used.
///
/// # Example
/// ```ignore
/// use notifiers::external::client::{http_client, send};
///
/// let outcome = send(http_client().post("https://example.com/hook").json(&body)).await;
/// let response = provider.create_response(data, outcome.raw_response, outcome.errors);
/// ```
pub fn http_client() -> &'static reqwest::Client {
    HTTP_CLIENT.get_or_init(|| build_client(&HttpSettings::default()))
}

/// Initializes the shared client from settings
///
/// Returns `false` when the client was already initialized, in which case the
/// settings are ignored.
pub fn configure(settings: &HttpSettings) -> bool {
    let configured = HTTP_CLIENT.set(build_client(settings)).is_ok();
    if !configured {
        tracing::warn!("HTTP client already initialized, settings ignored");
    }
    configured
}

fn build_client(settings: &HttpSettings) -> reqwest::Client {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_seconds))
        // Connection pooling
        .pool_max_idle_per_host(settings.pool_max_idle_per_host)
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        .user_agent(settings.user_agent.clone())
        .build()
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to build configured HTTP client, using defaults");
            reqwest::Client::new()
        })
}

/// What a send attempt produced, ready to be turned into a response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpOutcome {
    pub raw_response: Option<RawResponse>,
    pub errors: Vec<String>,
}

/// Sends a prepared request and captures every failure as an error string
///
/// Non-success statuses keep the raw response and report the status with the
/// body. Transport failures (connect, timeout, ...) carry no raw response.
pub async fn send(request: RequestBuilder) -> HttpOutcome {
    let start = Instant::now();
    let response = request.send().await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match response {
        Ok(resp) => {
            let status = resp.status();
            let body = resp.text().await.ok();

            let mut errors = Vec::new();
            if !status.is_success() {
                let detail = body
                    .as_deref()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
                errors.push(format!("HTTP {}: {}", status.as_u16(), detail));
            }

            HttpOutcome {
                raw_response: Some(RawResponse {
                    status_code: Some(status.as_u16()),
                    body,
                    duration_ms,
                }),
                errors,
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "request failed");
            HttpOutcome {
                raw_response: None,
                errors: vec![e.to_string()],
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_initialization() {
        // Access the client to ensure it initializes without panicking
        let _ = http_client();
    }

    #[tokio::test]
    async fn test_send_success() {
        let (url, server) = stub::serve_once("200 OK", "{\"ok\":true}").await;
        let outcome = send(http_client().post(&url).json(&serde_json::json!({"a": 1}))).await;

        assert!(outcome.errors.is_empty());
        let raw = outcome.raw_response.unwrap();
        assert_eq!(raw.status_code, Some(200));
        assert_eq!(raw.body.as_deref(), Some("{\"ok\":true}"));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST / HTTP/1.1"));
        assert!(request.contains("{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_send_error_status_is_captured() {
        let (url, _server) = stub::serve_once("400 Bad Request", "{\"error\":\"bad token\"}").await;
        let outcome = send(http_client().post(&url)).await;

        assert_eq!(outcome.errors, vec!["HTTP 400: {\"error\":\"bad token\"}"]);
        assert_eq!(outcome.raw_response.unwrap().status_code, Some(400));
    }

    #[tokio::test]
    async fn test_send_transport_error_is_captured() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let outcome = send(http_client().get(&url)).await;
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.raw_response.is_none());
    }
}
