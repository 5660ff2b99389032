//! HTTP client for the Spendlog cloud API.
//!
//! This module provides a shared HTTP client for communicating with the
//! Spendlog cloud document store. The store implementation in this crate
//! builds on it; it carries no domain knowledge of its own.

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use spendlog_core::errors::{DatabaseError, Error, Result};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base URL for the Spendlog cloud service.
pub const DEFAULT_API_URL: &str = "https://api.spendlog.app";

#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the Spendlog cloud API.
///
/// # Example
///
/// ```ignore
/// let client = ConnectApiClient::new(DEFAULT_API_URL, Some("your-token"))?;
/// let store = RemoteExpenseStore::new(client);
/// ```
#[derive(Debug, Clone)]
pub struct ConnectApiClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: Option<HeaderValue>,
}

impl ConnectApiClient {
    /// Create a new API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the cloud API (e.g., "https://api.spendlog.app")
    /// * `access_token` - An optional bearer token
    ///
    /// # Errors
    ///
    /// Returns an error if the access token format is invalid or the HTTP
    /// client cannot be initialized.
    pub fn new(base_url: &str, access_token: Option<&str>) -> Result<Self> {
        let auth_header = access_token
            .map(|token| {
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| Error::Unexpected(format!("Invalid access token format: {}", e)))
            })
            .transpose()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    /// Create default headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(auth) = &self.auth_header {
            headers.insert(AUTHORIZATION, auth.clone());
        }
        headers
    }

    /// Make a GET request and parse the response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[ConnectApi] GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(transport_error)?;

        self.parse_response(response).await
    }

    /// Make a POST request with a JSON body and parse the response.
    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[ConnectApi] POST {}", url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        self.parse_response(response).await
    }

    /// Make a PUT request with a JSON body, discarding any response body.
    pub(crate) async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[ConnectApi] PUT {}", url);

        let response = self
            .client
            .put(&url)
            .headers(self.headers())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        self.check_status(response).await
    }

    /// Make a DELETE request, discarding any response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[ConnectApi] DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(transport_error)?;

        self.check_status(response).await
    }

    /// Parse an HTTP response, handling errors appropriately.
    async fn parse_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to read response: {}",
                e
            ))))?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::Database(DatabaseError::Internal(format!(
                "Failed to parse response: {} - {}",
                e, body
            )))
        })
    }

    /// Check a mutation response's status, ignoring its body.
    async fn check_status(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_connect() || err.is_timeout() {
        Error::Database(DatabaseError::ConnectionFailed(err.to_string()))
    } else {
        Error::Database(DatabaseError::QueryFailed(err.to_string()))
    }
}

/// Maps an unsuccessful status to the core taxonomy. A 404 is surfaced as the
/// distinct not-found case so callers can explain a vanished document instead
/// of reporting a generic failure.
fn status_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|err| err.message.or(err.error))
        .unwrap_or_else(|| body.chars().take(200).collect::<String>());

    if status == StatusCode::NOT_FOUND {
        return Error::Database(DatabaseError::NotFound(if message.is_empty() {
            format!("HTTP {}", status)
        } else {
            message
        }));
    }

    Error::Database(DatabaseError::QueryFailed(format!(
        "API error {}: {}",
        status, message
    )))
}
