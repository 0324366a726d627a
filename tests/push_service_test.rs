use axum::{http::StatusCode, routing::post, Json, Router};
use repairhub_backend::services::push_service::{PushConfig, PushMessage, PushService};
use serde_json::{json, Value};

async fn spawn_fake_transport(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake transport");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}/send", addr)
}

fn service_for(url: String) -> PushService {
    PushService::new(PushConfig {
        api_url: Some(url),
        server_key: Some("test-key".to_string()),
    })
}

fn message() -> PushMessage {
    PushMessage {
        title: "Application approved".to_string(),
        body: "Your technician application was approved.".to_string(),
        data: json!({ "application_id": 7 }),
    }
}

#[tokio::test]
async fn multicast_sends_registration_ids_and_reports_counts() {
    // Echoes one success per registration id it receives.
    let app = Router::new().route(
        "/send",
        post(|Json(payload): Json<Value>| async move {
            let count = payload["registration_ids"]
                .as_array()
                .map(|ids| ids.len())
                .unwrap_or(0);
            Json(json!({ "success": count, "failure": 0 }))
        }),
    );
    let url = spawn_fake_transport(app).await;

    let tokens = vec![
        "token-a".to_string(),
        "token-b".to_string(),
        "token-c".to_string(),
    ];
    let outcome = service_for(url)
        .send_to_tokens(&tokens, &message())
        .await
        .expect("multicast");
    assert_eq!(outcome.success, 3);
    assert_eq!(outcome.failure, 0);
}

#[tokio::test]
async fn partial_failure_is_reported_not_raised() {
    let app = Router::new().route(
        "/send",
        post(|| async {
            Json(json!({
                "results": [
                    { "message_id": "1" },
                    { "error": "NotRegistered" },
                ]
            }))
        }),
    );
    let url = spawn_fake_transport(app).await;

    let tokens = vec!["token-a".to_string(), "token-b".to_string()];
    let outcome = service_for(url)
        .send_to_tokens(&tokens, &message())
        .await
        .expect("multicast with partial failure");
    assert_eq!(outcome.success, 1);
    assert_eq!(outcome.failure, 1);
}

#[tokio::test]
async fn single_token_send_targets_one_device() {
    let app = Router::new().route(
        "/send",
        post(|Json(payload): Json<Value>| async move {
            assert_eq!(payload["to"], json!("token-solo"));
            Json(json!({ "success": 1, "failure": 0 }))
        }),
    );
    let url = spawn_fake_transport(app).await;

    let outcome = service_for(url)
        .send_to_token("token-solo", &message())
        .await
        .expect("single send");
    assert_eq!(outcome.success, 1);
}

#[tokio::test]
async fn transport_error_surfaces_as_err() {
    let app = Router::new().route(
        "/send",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let url = spawn_fake_transport(app).await;

    let tokens = vec!["token-a".to_string()];
    let result = service_for(url).send_to_tokens(&tokens, &message()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn disabled_transport_never_calls_out() {
    let service = PushService::new(PushConfig::disabled());
    let tokens = vec!["token-a".to_string()];
    let outcome = service
        .send_to_tokens(&tokens, &message())
        .await
        .expect("disabled send");
    assert_eq!(outcome.success, 0);
    assert_eq!(outcome.failure, 0);
}
