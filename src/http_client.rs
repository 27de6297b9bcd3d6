use anyhow::{anyhow, Context};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Request, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{
    self, LogSessionListener, RefreshCoordinator, Rejection, SessionListener, Ticket, TokenStore,
};
use crate::config::Config;
use crate::error::ApiError;
use crate::storage::ClientStorage;

/// HTTP client for the storefront API with bearer attach and refresh-on-401
pub struct ApiClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// API root, without trailing slash
    base_url: String,

    /// Token refresh endpoint
    refresh_url: Url,

    /// Login surface handed to the session listener
    login_path: String,

    /// Persisted credential pair
    tokens: TokenStore,

    /// Refresh-in-progress flag and pending request queue
    refresh: Arc<RefreshCoordinator>,

    /// Notified once per unrecoverable authentication failure
    session: Arc<dyn SessionListener>,
}

impl ApiClient {
    /// Create a new client with its own refresh state
    pub fn new(config: &Config, storage: Arc<dyn ClientStorage>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.http_connect_timeout))
            .timeout(Duration::from_secs(config.http_request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let refresh_url = Url::parse(&format!("{}{}", base_url, config.refresh_path))
            .with_context(|| format!("Invalid refresh endpoint: {}", config.refresh_path))?;

        Ok(Self {
            client,
            base_url,
            refresh_url,
            login_path: config.login_path.clone(),
            tokens: TokenStore::new(storage),
            refresh: Arc::new(RefreshCoordinator::new()),
            session: Arc::new(LogSessionListener),
        })
    }

    /// Replace the session-expired listener
    pub fn with_session_listener(mut self, session: Arc<dyn SessionListener>) -> Self {
        self.session = session;
        self
    }

    /// Share refresh state with another client, or inject a prepared one
    pub fn with_refresh_coordinator(mut self, refresh: Arc<RefreshCoordinator>) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn refresh_coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.refresh
    }

    pub fn refresh_url(&self) -> &Url {
        &self.refresh_url
    }

    /// Absolute URL for an API path such as `/products/`
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .with_context(|| format!("Invalid API path: {}", path))
            .map_err(ApiError::Internal)
    }

    /// Start building a request against an API path
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.request(method, self.url(path)?))
    }

    /// Build and run a request through the pipeline
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder
            .build()
            .map_err(|e| ApiError::Internal(anyhow!("Failed to build request: {}", e)))?;
        self.execute(request).await
    }

    /// Run a request through the pipeline and decode the JSON body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        decode_json(response).await
    }

    /// Send a request without credentials and without 401 recovery
    /// Used for login, registration and password reset, where a 401 means
    /// bad input rather than an expired session.
    pub async fn send_public<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let request = builder
            .build()
            .map_err(|e| ApiError::Internal(anyhow!("Failed to build request: {}", e)))?;
        let url = request.url().clone();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| transport_error(&e, &url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_response(response, &url).await);
        }
        decode_json(response).await
    }

    /// Execute a request with bearer attach and single refresh-and-retry
    ///
    /// - 2xx: returned unchanged
    /// - first 401: token renewed (or joined an in-flight renewal), request replayed once
    /// - second 401: `Unauthorized`
    /// - anything else: mapped to the matching `ApiError`
    pub async fn execute(&self, request: Request) -> Result<Response, ApiError> {
        let method = request.method().clone();
        let url = request.url().clone();

        let mut bearer = self.tokens.access_token().map_err(storage_error)?;
        let mut retried = false;

        loop {
            // Clone the request for this attempt
            let mut attempt = request.try_clone().ok_or_else(|| {
                ApiError::Internal(anyhow!("Request body is not cloneable"))
            })?;

            if let Some(ref token) = bearer {
                attach_bearer(&mut attempt, token)?;
            }

            tracing::debug!(
                method = %method,
                url = %url,
                retried = retried,
                authenticated = bearer.is_some(),
                "Sending HTTP request"
            );

            let response = self
                .client
                .execute(attempt)
                .await
                .map_err(|e| transport_error(&e, &url))?;

            let status = response.status();
            tracing::debug!(status = %status, "Received HTTP response");

            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                tracing::warn!(method = %method, url = %url, "Received 401, renewing access token");

                let token = self.refresh_access_token().await?;
                bearer = Some(token);
                continue;
            }

            return Err(error_response(response, &url).await);
        }
    }

    /// Obtain a fresh access token, coalescing with any refresh already running
    ///
    /// On failure the stored credentials are cleared and the session listener
    /// is notified, once per cycle.
    pub async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let cycle = match self.refresh.begin() {
            Ticket::Wait(waiter) => {
                return waiter.wait().await.map_err(rejection_error);
            }
            Ticket::Lead(cycle) => cycle,
        };

        let refresh_token = match self.tokens.refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                let reason = "No refresh token available";
                tracing::warn!("{}", reason);
                cycle.reject(Rejection::Expired(reason.to_string()));
                self.expire_session();
                return Err(ApiError::AuthenticationExpired(reason.to_string()));
            }
            Err(e) => {
                let message = format!("{:#}", e);
                cycle.reject(Rejection::Storage(message.clone()));
                return Err(ApiError::Storage(message));
            }
        };

        match auth::request_access_token(&self.client, &self.refresh_url, &refresh_token).await {
            Ok(data) => {
                if let Err(e) = self.tokens.store_refreshed(&data) {
                    let message = format!("{:#}", e);
                    cycle.reject(Rejection::Storage(message.clone()));
                    return Err(ApiError::Storage(message));
                }

                tracing::debug!(
                    "Access token renewed (token: {}...)",
                    data.access.chars().take(8).collect::<String>()
                );
                cycle.resolve(&data.access);
                Ok(data.access)
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                cycle.reject(Rejection::Expired(reason.clone()));
                self.expire_session();
                Err(ApiError::AuthenticationExpired(reason))
            }
        }
    }

    /// Drop stored credentials and notify the listener
    fn expire_session(&self) {
        if let Err(e) = self.tokens.clear() {
            tracing::error!("Failed to clear stored credentials: {:#}", e);
        }
        self.session.session_expired(&self.login_path);
    }
}

/// Set `Authorization: Bearer <token>`, replacing any existing value
fn attach_bearer(request: &mut Request, token: &str) -> Result<(), ApiError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| ApiError::Internal(anyhow!("Access token is not a valid header value")))?;
    value.set_sensitive(true);
    request.headers_mut().insert(AUTHORIZATION, value);
    Ok(())
}

/// Decode a JSON body; an empty body decodes as `null`
async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let url = response.url().clone();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(&e, &url))?;

    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &bytes
    };

    serde_json::from_slice(body)
        .with_context(|| format!("Failed to parse response from {}", url))
        .map_err(ApiError::Internal)
}

/// Turn a non-success response into an error, consuming the body
async fn error_response(response: Response, url: &Url) -> ApiError {
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();

    tracing::warn!(
        status = status.as_u16(),
        url = %url,
        response_body = %error_text,
        "HTTP request failed with error response"
    );

    ApiError::from_status(status.as_u16(), error_text)
}

fn transport_error(err: &reqwest::Error, url: &Url) -> ApiError {
    let error = ApiError::from_transport(err);
    tracing::warn!(error = %err, url = %url, "HTTP request error");
    error
}

fn storage_error(err: anyhow::Error) -> ApiError {
    ApiError::Storage(format!("{:#}", err))
}

/// Error a queued request reports for the cycle it waited on
fn rejection_error(rejection: Rejection) -> ApiError {
    match rejection {
        Rejection::Expired(reason) => ApiError::AuthenticationExpired(reason),
        Rejection::Storage(message) => ApiError::Storage(message),
        Rejection::Abandoned => ApiError::Internal(anyhow!("Refresh cycle ended without a result")),
    }
}
