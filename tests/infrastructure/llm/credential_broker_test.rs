use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use myna::application::ports::{AuthError, TokenProvider};
use myna::infrastructure::llm::{CredentialBroker, GigaChatConfig};

async fn serve(app: Router) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (format!("http://{}/api/v2/oauth", addr), shutdown_tx)
}

/// Mock OAuth endpoint issuing tokens that expire `expires_offset_secs`
/// from now. Each hit mints a distinct token so refreshes are observable.
async fn start_token_server(
    expires_offset_secs: i64,
    delay_ms: u64,
) -> (String, Arc<AtomicUsize>, oneshot::Sender<()>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler_hits = Arc::clone(&hits);

    let app = Router::new().route(
        "/api/v2/oauth",
        post(move || {
            let hits = Arc::clone(&handler_hits);
            async move {
                let hit = hits.fetch_add(1, Ordering::SeqCst) + 1;
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                let expires_at = chrono::Utc::now().timestamp() + expires_offset_secs;
                Json(serde_json::json!({
                    "access_token": format!("token-{}", hit),
                    "expires_at": expires_at,
                }))
            }
        }),
    );

    let (auth_url, shutdown_tx) = serve(app).await;
    (auth_url, hits, shutdown_tx)
}

async fn start_static_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let app = Router::new().route(
        "/api/v2/oauth",
        post(move || async move {
            let status = axum::http::StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    serve(app).await
}

fn broker_config(auth_url: String) -> GigaChatConfig {
    GigaChatConfig {
        auth_url,
        api_key: "test-api-key".to_string(),
        ..GigaChatConfig::default()
    }
}

#[tokio::test]
async fn given_fresh_token_when_requested_twice_then_single_exchange_happens() {
    let (auth_url, hits, shutdown_tx) = start_token_server(3600, 0).await;
    let broker = CredentialBroker::new(&broker_config(auth_url)).unwrap();

    let first = broker.access_token().await.unwrap();
    let second = broker.access_token().await.unwrap();

    assert_eq!(first, "token-1");
    assert_eq!(second, "token-1");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_token_inside_expiry_margin_when_requested_again_then_token_is_refreshed() {
    let (auth_url, hits, shutdown_tx) = start_token_server(30, 0).await;
    let broker = CredentialBroker::new(&broker_config(auth_url)).unwrap();

    let first = broker.access_token().await.unwrap();
    let second = broker.access_token().await.unwrap();

    assert_eq!(first, "token-1");
    assert_eq!(second, "token-2");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_concurrent_requests_when_slot_is_empty_then_single_exchange_happens() {
    let (auth_url, hits, shutdown_tx) = start_token_server(3600, 100).await;
    let broker = CredentialBroker::new(&broker_config(auth_url)).unwrap();

    let (first, second) = tokio::join!(broker.access_token(), broker.access_token());

    assert_eq!(first.unwrap(), "token-1");
    assert_eq!(second.unwrap(), "token-1");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_rejected_exchange_then_status_and_body_surface() {
    let (auth_url, shutdown_tx) =
        start_static_server(401, r#"{"message": "Invalid api key"}"#).await;
    let broker = CredentialBroker::new(&broker_config(auth_url)).unwrap();

    let result = broker.access_token().await;

    assert!(matches!(
        result,
        Err(AuthError::Rejected(401, ref body)) if body.contains("Invalid api key")
    ));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_malformed_token_response_then_parse_error_surfaces() {
    let (auth_url, shutdown_tx) = start_static_server(200, "definitely not json").await;
    let broker = CredentialBroker::new(&broker_config(auth_url)).unwrap();

    let result = broker.access_token().await;

    assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unreachable_endpoint_then_transport_error_surfaces() {
    let broker =
        CredentialBroker::new(&broker_config("http://127.0.0.1:1/api/v2/oauth".to_string()))
            .unwrap();

    let result = broker.access_token().await;

    assert!(matches!(result, Err(AuthError::RequestFailed(_))));
}

#[tokio::test]
async fn given_failed_exchange_when_requested_again_then_exchange_is_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let handler_attempts = Arc::clone(&attempts);

    let app = Router::new().route(
        "/api/v2/oauth",
        post(move || {
            let attempts = Arc::clone(&handler_attempts);
            async move {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    return (
                        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                        "oauth backend down",
                    )
                        .into_response();
                }
                let expires_at = chrono::Utc::now().timestamp() + 3600;
                Json(serde_json::json!({
                    "access_token": "token-after-retry",
                    "expires_at": expires_at,
                }))
                .into_response()
            }
        }),
    );
    let (auth_url, shutdown_tx) = serve(app).await;
    let broker = CredentialBroker::new(&broker_config(auth_url)).unwrap();

    let first = broker.access_token().await;
    let second = broker.access_token().await;

    assert!(matches!(first, Err(AuthError::Rejected(500, _))));
    assert_eq!(second.unwrap(), "token-after-retry");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_token_exchange_then_request_carries_credentials_and_scope() {
    let captured: Arc<StdMutex<Option<(HeaderMap, String)>>> = Arc::new(StdMutex::new(None));
    let handler_captured = Arc::clone(&captured);

    let app = Router::new().route(
        "/api/v2/oauth",
        post(move |headers: HeaderMap, body: String| {
            let captured = Arc::clone(&handler_captured);
            async move {
                *captured.lock().unwrap() = Some((headers, body));
                let expires_at = chrono::Utc::now().timestamp() + 3600;
                Json(serde_json::json!({
                    "access_token": "token-1",
                    "expires_at": expires_at,
                }))
            }
        }),
    );
    let (auth_url, shutdown_tx) = serve(app).await;
    let broker = CredentialBroker::new(&broker_config(auth_url)).unwrap();

    broker.access_token().await.unwrap();

    let guard = captured.lock().unwrap();
    let (headers, body) = guard.as_ref().unwrap();
    assert_eq!(headers.get("authorization").unwrap(), "Bearer test-api-key");
    assert_eq!(headers.get("accept").unwrap(), "application/json");
    let rquid = headers.get("rquid").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(rquid).is_ok());
    assert_eq!(body, "scope=GIGACHAT_API_PERS");
    shutdown_tx.send(()).ok();
}
