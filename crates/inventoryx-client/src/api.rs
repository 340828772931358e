//! Request interceptor
//!
//! `ApiClient` is the only way application stores reach the inventoryx API.
//! Every outbound request passes through two hooks:
//!
//! - Pre-send: if the store holds an access token, attach it as a bearer
//!   credential; otherwise send unauthenticated.
//! - Post-receive: a 401 on the first attempt delegates to the
//!   `RefreshCoordinator` with a replay closure that re-issues the request at
//!   attempt 1. Any other status — including a 401 on the replay — passes
//!   through unchanged for the calling store to handle.
//!
//! The attempt counter is threaded through the call rather than bolted onto
//! shared request state: the first send is attempt 0, the replay closure is
//! attempt 1, and the replay never re-enters recovery. That marker is
//! per-request; collapsing *concurrent* recoveries is the coordinator's job.

use std::sync::Arc;

use inventoryx_auth::store::CredentialStore;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::coordinator::{Replay, RefreshCoordinator};
use crate::error::{Error, Result};

pub use reqwest::Method;
pub use reqwest::StatusCode;

/// An API response as seen by calling stores: status plus raw body. Non-auth
/// error statuses are data, not Rust errors, at this layer.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| Error::Decode(format!("decoding response body: {e}")))
    }
}

/// Token-attaching, 401-recovering API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<CredentialStore>,
    coordinator: Arc<RefreshCoordinator>,
}

impl ApiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        store: Arc<CredentialStore>,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            http,
            base_url,
            store,
            coordinator,
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: serde_json::Value) -> Result<ApiResponse> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: serde_json::Value) -> Result<ApiResponse> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::DELETE, path, None).await
    }

    /// Issue a request with transparent 401 recovery.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse> {
        let request_id = format!("req_{}", uuid::Uuid::new_v4().simple());

        // Attempt 0: current token, whatever its state
        let token = self.store.get().await.access_token;
        debug!(
            request_id,
            %method,
            path,
            authenticated = token.is_some(),
            "dispatching request"
        );
        let response = dispatch(
            &self.http,
            &self.base_url,
            &method,
            path,
            body.as_ref(),
            token.as_deref(),
        )
        .await?;

        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(request_id, %method, path, "401 observed, entering refresh recovery");

        // Attempt 1: replayed by the coordinator with the refreshed token.
        // The replay returns its response as-is, so a second 401 passes
        // through instead of looping.
        let http = self.http.clone();
        let base_url = self.base_url.clone();
        let path = path.to_owned();
        let replay: Replay = Box::new(move |fresh_token: String| {
            Box::pin(async move {
                dispatch(
                    &http,
                    &base_url,
                    &method,
                    &path,
                    body.as_ref(),
                    Some(&fresh_token),
                )
                .await
            })
        });

        self.coordinator.recover(replay).await
    }
}

/// Send one HTTP request and collect the response. No retry logic here;
/// recovery decisions belong to the caller.
async fn dispatch(
    http: &reqwest::Client,
    base_url: &str,
    method: &Method,
    path: &str,
    body: Option<&serde_json::Value>,
    bearer: Option<&str>,
) -> Result<ApiResponse> {
    let url = format!("{}{path}", base_url.trim_end_matches('/'));

    let mut request = http.request(method.clone(), &url);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }
    if let Some(body) = body {
        request = request.json(body);
    }

    let response = request
        .send()
        .await
        .map_err(|e| Error::Http(format!("request failed: {e}")))?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::Http(format!("reading response body: {e}")))?
        .to_vec();

    Ok(ApiResponse { status, body })
}
