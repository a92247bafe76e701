//! jobhub HTTP Client
//!
//! A small, type-safe client for the job endpoints a registry exposes over
//! HTTP, plus [`await_job`] for blocking until a remote job completes.
//!
//! # Example
//!
//! ```no_run
//! use jobhub_client::{AwaitOptions, JobsClient, await_job};
//! use tokio_util::sync::CancellationToken;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), jobhub_client::ClientError> {
//!     let client = JobsClient::new("http://localhost:8080");
//!     let id: Uuid = "6f1c2a8e-0d4b-4e0a-9d4f-3c1e9a7b2d10".parse().unwrap();
//!
//!     let options = AwaitOptions::default();
//!     let job = await_job(&client, id, &options, &CancellationToken::new()).await?;
//!     println!("Job finished: {:?}", job.result);
//!     Ok(())
//! }
//! ```

mod await_job;
pub mod error;
mod jobs;

// Re-export commonly used types
pub use await_job::{AwaitOptions, await_job};
pub use error::{ClientError, Result};
pub use jobs::JobApi;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for a remote job registry
#[derive(Debug, Clone)]
pub struct JobsClient {
    /// Base URL of the registry API (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl JobsClient {
    /// Create a new client
    ///
    /// # Example
    /// ```
    /// use jobhub_client::JobsClient;
    ///
    /// let client = JobsClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client over a preconfigured reqwest client
    ///
    /// Trailing slashes of `base_url` are dropped.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check the status code and deserialize a JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Check the status code of a response without a body
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ClientError::api_error(
            status.as_u16(),
            error_message(&error_text),
        ))
    }
}

/// Extracts the message from an `{"error": "..."}` body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = JobsClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = JobsClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_with_custom_client() {
        let client = JobsClient::with_client("http://localhost:8080", Client::new());
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_error_message_from_json_body() {
        assert_eq!(
            error_message(r#"{"error":"Job 42 not found"}"#),
            "Job 42 not found"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_text() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(r#"{"detail":"x"}"#), r#"{"detail":"x"}"#);
    }
}
