use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use contact_core::{
    create_app, AppState, ContactNotifier, InMemoryRateLimitStore, SanitizedMessage,
};
use contact_core::notify::NotifyError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Captures every record the gateway forwards.
#[derive(Default)]
struct CapturingNotifier {
    records: Mutex<Vec<SanitizedMessage>>,
}

impl CapturingNotifier {
    fn records(&self) -> Vec<SanitizedMessage> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl ContactNotifier for CapturingNotifier {
    async fn deliver(&self, record: &SanitizedMessage) -> Result<(), NotifyError> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

struct FailingNotifier;

#[async_trait]
impl ContactNotifier for FailingNotifier {
    async fn deliver(&self, _record: &SanitizedMessage) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("smtp unreachable".to_string()))
    }
}

fn test_app() -> (Router, Arc<CapturingNotifier>) {
    let notifier = Arc::new(CapturingNotifier::default());
    let state = AppState::default().with_notifier(notifier.clone());
    (create_app(state), notifier)
}

fn contact_request(body: &str, identity: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header("content-type", "application/json")
        .header("x-forwarded-for", identity)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

const VALID_BODY: &str =
    r#"{"name":"Al","email":"a@b.com","subject":"Hi!","message":"1234567890"}"#;

#[tokio::test]
async fn valid_submission_is_accepted() {
    let (app, notifier) = test_app();

    let response = app
        .oneshot(contact_request(VALID_BODY, "203.0.113.1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({"message": "Message sent successfully"}));

    let records = notifier.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Al");
    assert_eq!(records[0].email, "a@b.com");
}

#[tokio::test]
async fn submission_is_sanitized_before_hand_off() {
    let (app, notifier) = test_app();
    let body = format!(
        r#"{{"name":"  Al  ","email":"a@b.com","subject":"  Hi!  ","message":"  {} "}}"#,
        "m".repeat(2500)
    );

    let response = app
        .oneshot(contact_request(&body, "203.0.113.1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let records = notifier.records();
    assert_eq!(records[0].name, "Al");
    assert_eq!(records[0].subject, "Hi!");
    assert_eq!(records[0].message.chars().count(), 2000);
}

#[tokio::test]
async fn empty_required_field_is_rejected() {
    let (app, notifier) = test_app();
    let body = r#"{"name":"","email":"a@b.com","subject":"Hi!","message":"1234567890"}"#;

    let response = app
        .oneshot(contact_request(body, "203.0.113.1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({"error": "All fields are required"}));
    assert!(notifier.records().is_empty());
}

#[tokio::test]
async fn absent_field_is_rejected_like_an_empty_one() {
    let (app, _notifier) = test_app();
    let body = r#"{"email":"a@b.com","subject":"Hi!","message":"1234567890"}"#;

    let response = app
        .oneshot(contact_request(body, "203.0.113.1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({"error": "All fields are required"}));
}

#[tokio::test]
async fn unparseable_body_is_rejected() {
    let (app, _notifier) = test_app();

    let response = app
        .oneshot(contact_request("not json", "203.0.113.1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({"error": "Invalid request body"}));
}

#[tokio::test]
async fn malformed_email_is_rejected_server_side() {
    let (app, notifier) = test_app();
    let body = r#"{"name":"Al","email":"not-an-email","subject":"Hi!","message":"1234567890"}"#;

    let response = app
        .oneshot(contact_request(body, "203.0.113.1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({"error": "Invalid email address"}));
    assert!(notifier.records().is_empty());
}

#[tokio::test]
async fn honeypot_gets_a_success_shaped_response_but_nothing_is_forwarded() {
    let (app, notifier) = test_app();
    let body = r#"{"name":"Al","email":"a@b.com","subject":"Hi!","message":"1234567890","honeypot":"spammer"}"#;

    let response = app
        .oneshot(contact_request(body, "203.0.113.1"))
        .await
        .unwrap();

    // Identical to a real success, so bots cannot tell they were caught.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({"message": "Message sent successfully"}));
    assert!(notifier.records().is_empty());
}

#[tokio::test]
async fn sixth_request_in_window_is_rate_limited() {
    let (app, _notifier) = test_app();

    for i in 0..5 {
        let response = app
            .clone()
            .oneshot(contact_request(VALID_BODY, "203.0.113.9"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "request {} should pass", i + 1);
    }

    let response = app
        .oneshot(contact_request(VALID_BODY, "203.0.113.9"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
    let body = body_json(response).await;
    assert_eq!(
        body,
        serde_json::json!({"error": "Too many requests. Please try again later."})
    );
}

#[tokio::test]
async fn rate_limit_is_scoped_to_the_caller_identity() {
    let (app, _notifier) = test_app();

    for _ in 0..5 {
        app.clone()
            .oneshot(contact_request(VALID_BODY, "203.0.113.9"))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(contact_request(VALID_BODY, "203.0.113.10"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_bodies_still_consume_window_slots() {
    let (app, _notifier) = test_app();

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(contact_request("not json", "203.0.113.9"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // The slot budget is spent even though no body ever parsed.
    let response = app
        .oneshot(contact_request(VALID_BODY, "203.0.113.9"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn window_expiry_admits_a_fresh_request() {
    let rate_limiter = Arc::new(InMemoryRateLimitStore::new(1, Duration::from_millis(50)));
    let state = AppState::default().with_rate_limiter(rate_limiter);
    let app = create_app(state);

    let first = app
        .clone()
        .oneshot(contact_request(VALID_BODY, "203.0.113.9"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .clone()
        .oneshot(contact_request(VALID_BODY, "203.0.113.9"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    tokio::time::sleep(Duration::from_millis(70)).await;

    let third = app
        .oneshot(contact_request(VALID_BODY, "203.0.113.9"))
        .await
        .unwrap();
    assert_eq!(third.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_identity_headers_fall_back_to_unknown() {
    let (app, _notifier) = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header("content-type", "application/json")
        .body(Body::from(VALID_BODY))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn notifier_failure_does_not_surface_to_the_caller() {
    let state = AppState::default().with_notifier(Arc::new(FailingNotifier));
    let app = create_app(state);

    let response = app
        .oneshot(contact_request(VALID_BODY, "203.0.113.1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({"message": "Message sent successfully"}));
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let (app, _notifier) = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}
