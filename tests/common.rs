//! Shared test harness driving the pulse router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use tower::ServiceExt;

use pulse::badge::BadgeRenderer;
use pulse::clock::{Clock, FixedClock};
use pulse::heartbeat::HeartbeatIngestor;
use pulse::http::{AppState, router};
use pulse::store::PresenceStore;

/// Fixed "now" used unless a test picks another.
pub const NOW: i64 = 1_700_000_000_000;

/// A valid token and the public id it derives to.
pub const TOKEN: &str = "sk_live_550e8400-e29b-41d4-a716-446655440000";
pub const PUBLIC_ID: &str = "srv_pub_a3a9e1ed9732";

pub struct TestHostBuilder {
    store: Option<PresenceStore>,
    now: i64,
}

impl TestHostBuilder {
    pub fn with_store(mut self, store: PresenceStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn at(mut self, now: i64) -> Self {
        self.now = now;
        self
    }

    pub async fn start(self) -> Result<TestHost> {
        let store = self.store.unwrap_or_else(PresenceStore::memory);
        let clock = Arc::new(FixedClock::new(self.now));
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        let state = AppState {
            ingestor: HeartbeatIngestor::new(store.clone(), Arc::clone(&dyn_clock)),
            renderer: BadgeRenderer::new(store.clone(), Arc::clone(&dyn_clock)),
            clock: dyn_clock,
            metrics: None,
        };

        Ok(TestHost {
            router: router(state),
            clock,
            store,
        })
    }
}

pub struct TestHost {
    router: Router,
    clock: Arc<FixedClock>,
    store: PresenceStore,
}

impl TestHost {
    pub fn builder() -> TestHostBuilder {
        TestHostBuilder {
            store: None,
            now: NOW,
        }
    }

    pub fn clock(&self) -> &FixedClock {
        &self.clock
    }

    pub fn store(&self) -> &PresenceStore {
        &self.store
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        self.send(Request::get(uri).body(Body::empty())?).await
    }

    pub async fn post_json(&self, uri: &str, body: impl Into<String>) -> Result<TestResponse> {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.into()))?;
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("Failed to read response body")?;
        Ok(TestResponse {
            status,
            headers,
            body,
        })
    }

    /// Sends a heartbeat for [`TOKEN`] with the given `data` JSON.
    pub async fn heartbeat(&self, data: &str) -> Result<TestResponse> {
        self.post_json(
            "/api/heartbeat",
            format!(r#"{{"token":"{TOKEN}","data":{data}}}"#),
        )
        .await
    }
}

pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.body).context("Response body is not JSON")
    }
}
