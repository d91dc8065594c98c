//! Test doubles shared by the unit tests in this crate.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use farmstand_store::{KeyValueStore, MemoryKvStore, StoreError, StoreResult};

use crate::api::ApiClient;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method, RequestBody, TransportError};

/// What the fake transport saw, with the bearer token exposed for asserts.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub bearer: Option<String>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        match &self.body {
            RequestBody::Json(value) => value.clone(),
            _ => serde_json::Value::Null,
        }
    }
}

/// Replays canned responses in order and records every request.
///
/// Running out of script is a transport error, so an unexpected extra
/// request shows up as a failed call rather than a hang.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    recorded: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(ScriptedTransport::default())
    }

    pub fn respond(&self, status: u16, body: serde_json::Value) -> &Self {
        self.push(Ok(HttpResponse {
            status,
            body: serde_json::to_vec(&body).unwrap(),
        }))
    }

    pub fn respond_raw(&self, status: u16, body: &str) -> &Self {
        self.push(Ok(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }))
    }

    pub fn fail(&self, err: TransportError) -> &Self {
        self.push(Err(err))
    }

    fn push(&self, item: Result<HttpResponse, TransportError>) -> &Self {
        self.script.lock().unwrap().push_back(item);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.recorded.lock().unwrap().push(RecordedRequest {
            method: request.method,
            path: request.path,
            query: request.query,
            body: request.body,
            bearer: request.bearer.as_ref().map(|t| t.expose_secret().to_string()),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("script exhausted".into())))
    }
}

/// A store whose writes always fail; reads see nothing.
#[derive(Default)]
pub struct FailingKvStore;

#[async_trait]
impl KeyValueStore for FailingKvStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::QueryFailed("disk full".into()))
    }

    async fn remove(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::QueryFailed("disk full".into()))
    }

    async fn remove_many(&self, _keys: &[&str]) -> StoreResult<()> {
        Err(StoreError::QueryFailed("disk full".into()))
    }
}

/// In-memory store where reading one key fails.
pub struct UnreadableKeyStore {
    pub inner: MemoryKvStore,
    key: &'static str,
}

impl UnreadableKeyStore {
    pub fn new(key: &'static str) -> Self {
        UnreadableKeyStore {
            inner: MemoryKvStore::new(),
            key,
        }
    }
}

#[async_trait]
impl KeyValueStore for UnreadableKeyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if key == self.key {
            return Err(StoreError::QueryFailed("keystore locked".into()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key).await
    }

    async fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        self.inner.remove_many(keys).await
    }
}

/// An `ApiClient` over a fresh scripted transport and in-memory secure store.
pub fn api_client() -> (ApiClient, Arc<ScriptedTransport>, Arc<MemoryKvStore>) {
    let transport = ScriptedTransport::new();
    let secure = Arc::new(MemoryKvStore::new());
    let client = ApiClient::new(transport.clone(), secure.clone());
    (client, transport, secure)
}

pub fn user_json(id: &str, role: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "role": role,
        "name": "Test User",
        "phone": "+254700000001",
        "isVerified": true
    })
}

pub fn product_json(id: &str, price: f64, farmer_id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Product {id}"),
        "price": price,
        "unit": "kg",
        "stock": 10,
        "images": [],
        "farmerId": farmer_id,
        "isAvailable": true
    })
}

/// A context over a scripted transport and in-memory stores.
///
/// Tracking is off unless asked for, so flows don't consume scripted
/// responses with analytics calls.
pub fn test_context(
    tracking: bool,
) -> (crate::context::AppContext, Arc<ScriptedTransport>, Arc<MemoryKvStore>) {
    let mut config = crate::config::ClientConfig::default();
    config.tracking.enabled = tracking;

    let transport = ScriptedTransport::new();
    let general = Arc::new(MemoryKvStore::new());
    let ctx = crate::context::AppContext::with_parts(
        config,
        transport.clone(),
        Arc::new(MemoryKvStore::new()),
        general.clone(),
    );
    (ctx, transport, general)
}

pub fn order_json(id: &str, status: &str, total: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "status": status,
        "items": [{"productId": "p1", "quantity": 2, "price": total / 2.0}],
        "totalAmount": total,
        "createdAt": "2026-03-01T10:00:00Z"
    })
}
