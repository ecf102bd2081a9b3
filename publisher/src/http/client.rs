//! HTTP client implementation

use std::time::Duration;

use connect_api::models::ErrorResponse;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::authn::credentials::Credentials;
use crate::errors::ApiError;
use crate::utils::CooldownOptions;

/// Task polling options
#[derive(Debug, Clone)]
pub struct TaskPollOptions {
    /// How long the server may hold a task poll open waiting for output
    pub wait: Duration,

    /// Delay between polls that returned nothing new
    pub cooldown: CooldownOptions,
}

impl Default for TaskPollOptions {
    fn default() -> Self {
        Self {
            wait: Duration::from_secs(1),
            cooldown: CooldownOptions::default(),
        }
    }
}

/// HTTP client for the Connect server API
pub struct HttpClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    pub(crate) task_poll: TaskPollOptions,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(credentials: &Credentials) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("connect-publish/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: credentials.api_root(),
            credentials: credentials.clone(),
            task_poll: TaskPollOptions::default(),
        })
    }

    /// Replace the task polling options
    pub fn with_task_poll(mut self, task_poll: TaskPollOptions) -> Self {
        self.task_poll = task_poll;
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let request = self.client.request(method, &url);
        match self.credentials.authorization() {
            Some(authorization) => request.header(header::AUTHORIZATION, authorization),
            None => request,
        }
    }

    /// Send a request, failing on non-success statuses
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            let body = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) if !err.error.is_empty() => err.error,
                _ => body,
            };
            error!("HTTP request to {} failed: {} - {}", url, status, body);
            return Err(ApiError::StatusError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Ok(response.json().await?)
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .send(self.request(Method::GET, path).query(query))
            .await?;
        Ok(response.json().await?)
    }

    /// Make a GET request for a raw body
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        Ok(response.json().await?)
    }

    /// Make a POST request with a raw body
    pub async fn post_bytes<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> Result<T, ApiError> {
        let request = self
            .request(Method::POST, path)
            .header(header::CONTENT_TYPE, "application/gzip")
            .body(body);
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// Make a PUT request
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.request(Method::PUT, path).json(body))
            .await?;
        Ok(response.json().await?)
    }

    /// Make a PATCH request
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.request(Method::PATCH, path).json(body))
            .await?;
        Ok(response.json().await?)
    }
}
