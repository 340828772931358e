//! Identity endpoint gateway
//!
//! The two network operations of the session lifecycle:
//! 1. `login` — exchange username/password for a session payload
//! 2. `refresh` — exchange a refresh token for a new session payload
//!
//! Both POST JSON to the identity endpoint and return the payload without
//! persisting it; committing the session is the caller's job. Keeping the
//! gateway free of storage side effects (and of any interceptor dependency)
//! is what breaks the interceptor → coordinator → gateway cycle.

use tracing::debug;

use crate::constants::{LOGIN_PATH, REFRESH_PATH};
use crate::error::{Error, Result};
use crate::session::{AuthResponse, LoginCommand};

/// Authenticate with username and password.
///
/// A 401/403 maps to `InvalidCredentials` carrying the server's `message`
/// field so the login form can render it; transport failures map to `Http`.
pub async fn login(
    client: &reqwest::Client,
    base_url: &str,
    command: &LoginCommand,
) -> Result<AuthResponse> {
    let body = serde_json::json!({
        "username": command.username,
        "password": command.password.expose(),
    });

    let response = client
        .post(endpoint(base_url, LOGIN_PATH))
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Http(format!("login request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(Error::InvalidCredentials(server_message(
                &body,
                "Login failed",
            )));
        }
        return Err(Error::Endpoint(format!("login returned {status}: {body}")));
    }

    debug!(username = %command.username, "login accepted");
    response
        .json::<AuthResponse>()
        .await
        .map_err(|e| Error::Endpoint(format!("invalid login response: {e}")))
}

/// Exchange a refresh token for a new session payload.
///
/// Single responsibility: this function never reads or writes the credential
/// store. A 401/403 means the refresh token is revoked or expired and maps
/// to `RefreshRejected`, which the coordinator treats as session teardown.
pub async fn refresh(
    client: &reqwest::Client,
    base_url: &str,
    refresh_token: &str,
) -> Result<AuthResponse> {
    let body = serde_json::json!({ "refreshToken": refresh_token });

    let response = client
        .post(endpoint(base_url, REFRESH_PATH))
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Http(format!("refresh request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(Error::RefreshRejected(server_message(
                &body,
                "Refresh token rejected",
            )));
        }
        return Err(Error::Endpoint(format!(
            "refresh returned {status}: {body}"
        )));
    }

    debug!("refresh accepted");
    response
        .json::<AuthResponse>()
        .await
        .map_err(|e| Error::Endpoint(format!("invalid refresh response: {e}")))
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Extract the server's `message` field from an error body, falling back to
/// a generic message when the body isn't the expected JSON shape.
fn server_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| fallback.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Stub {
        refresh_calls: AtomicUsize,
    }

    fn auth_body(access: &str, refresh: &str) -> serde_json::Value {
        serde_json::json!({
            "accessToken": access,
            "refreshToken": refresh,
            "username": "alice",
            "firstName": "Alice",
            "lastName": "Doe",
            "roles": ["USER"],
            "permissions": []
        })
    }

    async fn login_handler(Json(body): Json<serde_json::Value>) -> Response {
        if body["username"] == "alice" && body["password"] == "secret" {
            Json(auth_body("t1", "r1")).into_response()
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"message": "Bad credentials"})),
            )
                .into_response()
        }
    }

    async fn refresh_handler(
        State(stub): State<Arc<Stub>>,
        Json(body): Json<serde_json::Value>,
    ) -> Response {
        stub.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if body["refreshToken"] == "r1" {
            Json(auth_body("t2", "r2")).into_response()
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"message": "Refresh token expired"})),
            )
                .into_response()
        }
    }

    async fn spawn_identity_stub(stub: Arc<Stub>) -> SocketAddr {
        let app = axum::Router::new()
            .route(LOGIN_PATH, post(login_handler))
            .route(REFRESH_PATH, post(refresh_handler))
            .with_state(stub);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn login_success_returns_session_payload() {
        let addr = spawn_identity_stub(Arc::new(Stub::default())).await;
        let client = reqwest::Client::new();

        let auth = login(
            &client,
            &format!("http://{addr}"),
            &LoginCommand::new("alice", "secret"),
        )
        .await
        .unwrap();

        assert_eq!(auth.access_token, "t1");
        assert_eq!(auth.refresh_token, "r1");
        assert_eq!(auth.roles, vec!["USER"]);
    }

    #[tokio::test]
    async fn login_rejection_surfaces_server_message() {
        let addr = spawn_identity_stub(Arc::new(Stub::default())).await;
        let client = reqwest::Client::new();

        let err = login(
            &client,
            &format!("http://{addr}"),
            &LoginCommand::new("alice", "wrong"),
        )
        .await
        .unwrap_err();

        match err {
            Error::InvalidCredentials(msg) => assert_eq!(msg, "Bad credentials"),
            other => panic!("expected InvalidCredentials, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refresh_rotates_both_tokens() {
        let addr = spawn_identity_stub(Arc::new(Stub::default())).await;
        let client = reqwest::Client::new();

        let auth = refresh(&client, &format!("http://{addr}"), "r1")
            .await
            .unwrap();
        assert_eq!(auth.access_token, "t2");
        assert_eq!(auth.refresh_token, "r2");
    }

    #[tokio::test]
    async fn rejected_refresh_token_maps_to_refresh_rejected() {
        let addr = spawn_identity_stub(Arc::new(Stub::default())).await;
        let client = reqwest::Client::new();

        let err = refresh(&client, &format!("http://{addr}"), "r_stale")
            .await
            .unwrap_err();
        match err {
            Error::RefreshRejected(msg) => assert_eq!(msg, "Refresh token expired"),
            other => panic!("expected RefreshRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_maps_to_http() {
        // Bind then drop a listener so the port refuses connections
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = reqwest::Client::new();
        let err = refresh(&client, &format!("http://{addr}"), "r1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)), "got {err:?}");
    }

    #[test]
    fn server_message_falls_back_on_non_json_body() {
        assert_eq!(server_message("<html>502</html>", "Login failed"), "Login failed");
        assert_eq!(
            server_message(r#"{"message":"Bad credentials"}"#, "Login failed"),
            "Bad credentials"
        );
        assert_eq!(server_message(r#"{"code":401}"#, "Login failed"), "Login failed");
    }

    #[test]
    fn endpoint_joins_base_url_without_double_slash() {
        assert_eq!(
            endpoint("http://api.local/", LOGIN_PATH),
            "http://api.local/auth/login"
        );
        assert_eq!(
            endpoint("http://api.local", REFRESH_PATH),
            "http://api.local/auth/refresh"
        );
    }
}
