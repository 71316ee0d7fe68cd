//! Sluice Admin Client
//!
//! Typed HTTP client for the Sluice dispatcher's admin API, used by the CLI
//! and operator tooling to manage job templates, look up execution status,
//! and trigger manual retries.
//!
//! # Example
//!
//! ```no_run
//! use sluice_client::DispatcherClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sluice_client::ClientError> {
//!     let client = DispatcherClient::new("http://localhost:8080");
//!
//!     for template in client.list_templates().await? {
//!         println!("{} -> {}", template.pattern, template.image);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod templates;

pub use error::{ClientError, Result};

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Client for the dispatcher admin API
///
/// Covers template management, execution status lookups, and manual
/// retries. Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct DispatcherClient {
    base_url: String,
    client: Client,
}

/// Error payload the admin API attaches to non-success responses
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl DispatcherClient {
    /// Creates a client for the admin API at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Creates a client using a preconfigured [`reqwest::Client`]
    ///
    /// Use this to set timeouts, proxies, or TLS options.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    /// Base URL this client talks to, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Gates a response on its status code
    ///
    /// Non-success responses become [`ClientError::Api`]. The admin API
    /// reports errors as `{"error": "..."}`; when the body is not that
    /// shape, the raw text becomes the message.
    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(payload) => payload.error,
            Err(_) => body,
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Gates a response on its status code and decodes its JSON body
    async fn read_json<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        self.check(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::BadPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        assert_eq!(
            DispatcherClient::new("http://sluice:8080").base_url(),
            "http://sluice:8080"
        );
        assert_eq!(
            DispatcherClient::new("http://sluice:8080/").base_url(),
            "http://sluice:8080"
        );
        assert_eq!(
            DispatcherClient::new("http://sluice:8080///").base_url(),
            "http://sluice:8080"
        );
    }

    #[test]
    fn test_with_client_normalizes_too() {
        let http = Client::new();
        let client = DispatcherClient::with_client("http://sluice:8080/", http);
        assert_eq!(client.base_url(), "http://sluice:8080");
    }
}
