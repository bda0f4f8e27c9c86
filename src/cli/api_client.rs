use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::env;

use crate::api::AUTH_TOKEN_HEADER;
use crate::cli::error::{CliError, CliResult};

/// API client for communicating with the prompt catalogue REST API
pub struct ApiClient {
    base_url: String,
    auth_token: Option<String>,
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// Priority for base URL:
    /// 1. Explicit `api_url` parameter
    /// 2. PCAT_API_URL environment variable
    /// 3. Default: http://localhost:5312
    pub fn new(api_url: Option<String>, auth_token: Option<String>) -> Self {
        // reqwest is built without a default rustls provider
        let _ = rustls::crypto::ring::default_provider().install_default();

        let base_url = api_url
            .or_else(|| env::var("PCAT_API_URL").ok())
            .unwrap_or_else(|| "http://localhost:5312".to_string());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            client: Client::new(),
        }
    }

    /// Get the base URL being used
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, &url);
        match &self.auth_token {
            Some(token) => builder.header(AUTH_TOKEN_HEADER, token),
            None => builder,
        }
    }

    /// Create a GET request builder
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    /// Create a POST request builder
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    /// Handle API response with standardized error handling
    ///
    /// Returns the deserialized response body on success,
    /// or a CliError::ApiError on non-success status codes.
    pub async fn handle_response<T: DeserializeOwned>(response: Response) -> CliResult<T> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| CliError::InvalidResponse {
                    message: e.to_string(),
                })
        } else {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            // Prefer the server's {"error": ...} message when present
            let message = serde_json::from_str::<serde_json::Value>(&error_text)
                .ok()
                .and_then(|v| v["error"].as_str().map(str::to_string))
                .unwrap_or(error_text);
            Err(CliError::ApiError { status, message })
        }
    }
}
