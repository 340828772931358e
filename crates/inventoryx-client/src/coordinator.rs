//! Single-flight refresh coordination
//!
//! Collapses any number of concurrent 401s into exactly one refresh call.
//! The in-flight refresh is explicit coordinator state — `Flight::Idle` or
//! `Flight::Pending` plus a FIFO queue of waiters behind one mutex — rather
//! than a captured promise, so the single-flight guarantee is testable on
//! its own.
//!
//! The caller that flips Idle to Pending is the leader, but the refresh
//! itself runs in a task owned by the coordinator, not inside the leader's
//! future: a caller that abandons its request (navigates away, times out)
//! only drops its own receiver, never the flight. That task performs the one
//! `gateway::refresh` call, commits or clears the store exactly once, then
//! replays every queued request (the leader's included) in enqueue order and
//! resolves each waiter through its oneshot channel. Callers only enqueue
//! and await; no other code path touches the store.
//!
//! Session states observable through the store and this coordinator:
//! Anonymous → (login) → Authenticated → (401) → Refreshing →
//! (success) → Authenticated, or (failure) → Expired → Anonymous.
//! Additional 401s while Refreshing enqueue instead of re-triggering.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use inventoryx_auth::store::CredentialStore;
use inventoryx_auth::{self as auth, gateway};
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info, warn};

use crate::api::ApiResponse;
use crate::error::{Error, Result};

/// Future returned by a replay closure.
pub type ReplayFuture = Pin<Box<dyn Future<Output = Result<ApiResponse>> + Send>>;

/// A queued request awaiting a fresh token: called once with the new access
/// token, after the refresh settles. Never persisted.
pub type Replay = Box<dyn FnOnce(String) -> ReplayFuture + Send>;

struct Waiter {
    replay: Replay,
    done: oneshot::Sender<Result<ApiResponse>>,
}

/// Explicit in-flight refresh marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flight {
    Idle,
    Pending,
}

struct FlightState {
    flight: Flight,
    queue: Vec<Waiter>,
}

/// Ensures at most one in-flight refresh at a time and replays queued
/// requests once a new token is available.
pub struct RefreshCoordinator {
    state: Mutex<FlightState>,
    http: reqwest::Client,
    base_url: String,
    store: Arc<CredentialStore>,
}

impl RefreshCoordinator {
    pub fn new(http: reqwest::Client, base_url: String, store: Arc<CredentialStore>) -> Self {
        Self {
            state: Mutex::new(FlightState {
                flight: Flight::Idle,
                queue: Vec::new(),
            }),
            http,
            base_url,
            store,
        }
    }

    /// Recover a request that failed with 401.
    ///
    /// Enqueues the replay and, if no refresh is in flight, starts one in a
    /// detached task. Resolves with the replayed response once the refresh
    /// settles, or with `SessionExpired` if the refresh fails. The replayed
    /// response is returned as-is — a second 401 passes through to the
    /// caller.
    ///
    /// An abandoned caller (dropped future) discards only its own receiver:
    /// the refresh task still settles the flight and completes every replay,
    /// so queued waiters resolve and a later 401 can start a new refresh.
    pub async fn recover(self: &Arc<Self>, replay: Replay) -> Result<ApiResponse> {
        let (done, result) = oneshot::channel();

        let is_leader = {
            let mut state = self.state.lock().await;
            state.queue.push(Waiter { replay, done });
            match state.flight {
                Flight::Idle => {
                    state.flight = Flight::Pending;
                    true
                }
                Flight::Pending => {
                    debug!("refresh already in flight, queued for replay");
                    false
                }
            }
        };

        if is_leader {
            let coordinator = Arc::clone(self);
            tokio::spawn(async move {
                coordinator.run_refresh().await;
            });
        }

        // The sender is dropped only if the refresh task panics; treat that
        // like an expired session.
        result.await.unwrap_or(Err(Error::SessionExpired))
    }

    /// Flight task: perform the single refresh, then settle every waiter.
    /// Runs detached from any caller so cancellation cannot strand the
    /// flight in `Pending`.
    async fn run_refresh(&self) {
        // No refresh token means no network call at all — straight to the
        // failure path.
        let refreshed = match self.store.get().await.refresh_token {
            Some(token) => gateway::refresh(&self.http, &self.base_url, &token).await,
            None => Err(auth::Error::RefreshRejected(
                "no refresh token available".into(),
            )),
        };

        match refreshed {
            Ok(auth_data) => {
                let access_token = auth_data.access_token.clone();
                if let Err(e) = self.store.set_session(&auth_data).await {
                    warn!(error = %e, "failed to persist refreshed session");
                }
                let waiters = self.settle_flight().await;
                info!(queued = waiters.len(), "refresh succeeded, replaying queued requests");
                for waiter in waiters {
                    let response = (waiter.replay)(access_token.clone()).await;
                    let _ = waiter.done.send(response);
                }
            }
            Err(e) => {
                warn!(error = %e, "refresh failed, tearing down session");
                // Clear exactly once, not once per queued request
                if let Err(e) = self.store.clear().await {
                    warn!(error = %e, "failed to clear session storage");
                }
                let waiters = self.settle_flight().await;
                for waiter in waiters {
                    let _ = waiter.done.send(Err(Error::SessionExpired));
                }
            }
        }
    }

    /// Take the waiter queue and reset the in-flight marker so a future 401
    /// can trigger a new refresh.
    async fn settle_flight(&self) -> Vec<Waiter> {
        let mut state = self.state.lock().await;
        state.flight = Flight::Idle;
        std::mem::take(&mut state.queue)
    }
}
