//! # API Client
//!
//! Shared HTTP client for every REST call the app makes.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    ApiClient::send(request)                             │
//! │                                                                         │
//! │  1. Read access token from the secure namespace                        │
//! │     present? ──► Authorization: Bearer <token>                          │
//! │                                                                         │
//! │  2. transport.send()                                                    │
//! │     Timeout / Connect / Other ──► ClientError (no retry)                │
//! │                                                                         │
//! │  3. status 401 and request is refreshable?                              │
//! │     │                                                                   │
//! │     ├── POST /auth/refresh { refreshToken }                             │
//! │     │     ok   ──► store new tokens ──► replay request ONCE             │
//! │     │                                   (a second 401 propagates)       │
//! │     │     fail ──► clear both tokens ──► propagate                      │
//! │     │                                                                   │
//! │  4. 2xx ──► Ok(response)                                                │
//! │     else ──► ClientError::Server { status, message }                    │
//! │              message = body.message | body.error | generic              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent requests that hit a 401 each run their own refresh; there is no
//! shared refresh queue.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use farmstand_store::{KeyValueStore, SessionRepository};

use crate::error::{ClientError, ClientResult};
use crate::transport::{FilePart, HttpRequest, HttpResponse, HttpTransport, Method, RequestBody};

pub const REFRESH_PATH: &str = "/auth/refresh";

// =============================================================================
// ApiRequest
// =============================================================================

/// A request before token resolution. Cloneable so it can be replayed.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Attach the stored access token.
    pub authenticated: bool,
    /// Allow the refresh-and-replay path on 401.
    pub refreshable: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            authenticated: true,
            refreshable: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Adds the pair only when `value` is present.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::Unexpected(format!("Failed to encode request: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, file: FilePart) -> Self {
        self.body = RequestBody::Multipart(file);
        self
    }

    /// Credential endpoints: no bearer, and a 401 means bad credentials
    /// rather than an expired session.
    pub fn public(mut self) -> Self {
        self.authenticated = false;
        self.refreshable = false;
        self
    }
}

// =============================================================================
// Wire shapes
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Percent-encodes an id for use as a single path segment.
///
/// ```rust
/// use farmstand_client::api::client::path_segment;
///
/// assert_eq!(path_segment("ord-1"), "ord-1");
/// assert_eq!(path_segment("a/b?c d"), "a%2Fb%3Fc%20d");
/// ```
pub fn path_segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Extracts the server's own message from an error body.
///
/// Accepts `{"message": "..."}`, `{"message": ["a", "b"]}` (validation
/// errors), and `{"error": "..."}`.
pub fn server_message(status: u16, body: &[u8]) -> String {
    let fallback = || format!("Request failed with status {status}");

    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return fallback();
    };

    let from_field = |field: &str| -> Option<String> {
        match value.get(field)? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            _ => None,
        }
    };

    from_field("message")
        .or_else(|| from_field("error"))
        .unwrap_or_else(fallback)
}

// =============================================================================
// ApiClient
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: SessionRepository,
}

impl ApiClient {
    /// `secure` is the namespace holding the tokens.
    pub fn new(transport: Arc<dyn HttpTransport>, secure: Arc<dyn KeyValueStore>) -> Self {
        ApiClient {
            transport,
            session: SessionRepository::new(secure),
        }
    }

    pub fn session_repository(&self) -> &SessionRepository {
        &self.session
    }

    // -------------------------------------------------------------------------
    // Typed helpers
    // -------------------------------------------------------------------------

    /// Sends and decodes a JSON response body.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let path = request.path.clone();
        let response = self.send(request).await?;
        decode(&path, &response)
    }

    /// Sends and ignores the response body.
    pub async fn execute(&self, request: ApiRequest) -> ClientResult<()> {
        self.send(request).await.map(|_| ())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.fetch(ApiRequest::get(path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(ApiRequest::post(path).json(body)?).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(ApiRequest::delete(path)).await
    }

    // -------------------------------------------------------------------------
    // Core send path
    // -------------------------------------------------------------------------

    /// Sends with bearer injection, error classification and refresh-once.
    pub async fn send(&self, request: ApiRequest) -> ClientResult<HttpResponse> {
        let response = self.dispatch(&request).await?;

        if response.status == 401 && request.refreshable && request.path != REFRESH_PATH {
            let original = error_for(&response);
            debug!(path = %request.path, "Received 401, attempting token refresh");

            self.refresh_tokens(original).await?;

            let replay = self.dispatch(&request).await?;
            if replay.status == 401 {
                warn!(path = %request.path, "Replayed request still unauthorized");
            }
            return check(replay);
        }

        check(response)
    }

    /// One transport round trip. No status interpretation.
    async fn dispatch(&self, request: &ApiRequest) -> ClientResult<HttpResponse> {
        let bearer = if request.authenticated {
            self.session.access_token().await?
        } else {
            None
        };

        debug!(
            method = %request.method,
            path = %request.path,
            authenticated = bearer.is_some(),
            "Sending request"
        );

        let http = HttpRequest {
            method: request.method,
            path: request.path.clone(),
            query: request.query.clone(),
            body: request.body.clone(),
            bearer,
        };

        let response = self.transport.send(http).await.map_err(|e| {
            warn!(path = %request.path, error = %e, "Transport failure");
            ClientError::from(e)
        })?;

        debug!(path = %request.path, status = response.status, "Response received");
        Ok(response)
    }

    /// Exchanges the stored refresh token for a new token pair.
    ///
    /// `original` is returned when there is no refresh token to try,
    /// including when the stored one cannot be read.
    /// On any failure both tokens are cleared.
    async fn refresh_tokens(&self, original: ClientError) -> ClientResult<()> {
        let refresh_token = match self.session.refresh_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No refresh token stored, propagating 401");
                self.clear_tokens_logged().await;
                return Err(original);
            }
            Err(e) => {
                warn!(error = %e, "Could not read refresh token, propagating 401");
                self.clear_tokens_logged().await;
                return Err(original);
            }
        };

        let request = ApiRequest::post(REFRESH_PATH)
            .json(&RefreshRequest {
                refresh_token: refresh_token.expose_secret(),
            })?
            .public();

        let outcome = match self.dispatch(&request).await {
            Ok(response) => check(response).and_then(|r| decode::<RefreshResponse>(REFRESH_PATH, &r)),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(tokens) => {
                let access = SecretString::from(tokens.access_token);
                let rotated = tokens.refresh_token.map(SecretString::from);
                self.session.save_tokens(&access, rotated.as_ref()).await?;
                info!("Access token refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing session tokens");
                self.clear_tokens_logged().await;
                Err(e)
            }
        }
    }

    async fn clear_tokens_logged(&self) {
        if let Err(e) = self.session.clear_tokens().await {
            warn!(error = %e, "Failed to clear stored tokens");
        }
    }
}

fn error_for(response: &HttpResponse) -> ClientError {
    ClientError::Server {
        status: response.status,
        message: server_message(response.status, &response.body),
    }
}

fn check(response: HttpResponse) -> ClientResult<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(error_for(&response))
    }
}

fn decode<T: DeserializeOwned>(path: &str, response: &HttpResponse) -> ClientResult<T> {
    serde_json::from_slice(&response.body).map_err(|e| {
        warn!(path = %path, error = %e, "Response body did not match expected shape");
        ClientError::Decode(e.to_string())
    })
}

// =============================================================================
// Tests
// =============================================================================
