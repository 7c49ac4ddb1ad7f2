//! HTTP surface tests.
//!
//! The full router runs against the in-memory unit of work, so every request
//! goes through extractors, auth and rate limit middleware, the real services
//! and the error mapping.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use barberbook::api::create_router;
use barberbook::domain::{Service, UserRole};

use common::{MemoryUnitOfWork, StateBuilder};

// =============================================================================
// Helpers
// =============================================================================

struct TestApp {
    router: Router,
    uow: Arc<MemoryUnitOfWork>,
}

impl TestApp {
    fn new() -> Self {
        Self::with(StateBuilder::default())
    }

    fn with(builder: StateBuilder) -> Self {
        let uow = Arc::new(MemoryUnitOfWork::new());
        let router = create_router(builder.build(uow.clone()));
        Self { router, uow }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "name": "Ali",
                    "surname": "Demir",
                    "phoneNumber": "05551112233",
                    "email": email,
                    "password": "123456"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn barber_token(&self) -> String {
        self.uow.add_user(UserRole::Barber, "barber@demo.com", "123456");
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": "barber@demo.com", "password": "123456" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Open Monday 09:00-12:00 with a 30 minute haircut.
    fn open_shop(&self) -> Service {
        self.uow.open(1, 540, 720);
        self.uow.add_service("Haircut", 30, Some(250), true)
    }
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

// =============================================================================
// Health and routing
// =============================================================================

#[tokio::test]
async fn test_health_reports_both_dependencies() {
    let app = TestApp::new();
    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
    assert_eq!(body["services"]["redis"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_is_unavailable_when_redis_is_down() {
    let app = TestApp::with(StateBuilder {
        redis_up: false,
        ..StateBuilder::default()
    });
    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["redis"]["status"], "unhealthy");
    assert!(body["services"]["redis"]["error"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let app = TestApp::new();
    let (status, body) = app.get("/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn test_rate_limiter_outage_denies_requests() {
    let app = TestApp::with(StateBuilder {
        rate_limiter_reachable: false,
        ..StateBuilder::default()
    });

    let (status, body) = app.get("/services", None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(error_code(&body), "RATE_LIMITED");

    // health stays outside the limiter
    let (status, _) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_register_then_me() {
    let app = TestApp::new();
    let token = app.register("ali@example.com").await;

    let (status, body) = app.get("/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ali@example.com");
    assert_eq!(body["user"]["role"], "USER");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = TestApp::new();
    app.register("ali@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Ali",
                "surname": "Demir",
                "phoneNumber": "05551112233",
                "email": "ali@example.com",
                "password": "123456"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "CONFLICT");
}

#[tokio::test]
async fn test_invalid_registration_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "A",
                "surname": "Demir",
                "phoneNumber": "123",
                "email": "not-an-email",
                "password": "1"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.register("ali@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "ali@example.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_protected_routes_need_a_valid_token() {
    let app = TestApp::new();

    let (missing, _) = app.get("/auth/me", None).await;
    let (garbage, _) = app.get("/appointments/my", Some("not-a-jwt")).await;

    assert_eq!(missing, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Catalog and schedule
// =============================================================================

#[tokio::test]
async fn test_customer_cannot_manage_catalog() {
    let app = TestApp::new();
    let token = app.register("ali@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/services",
            Some(&token),
            Some(json!({ "name": "Fade", "durationMin": 30, "price": 300 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "FORBIDDEN");
}

#[tokio::test]
async fn test_barber_creates_and_retires_service() {
    let app = TestApp::new();
    let token = app.barber_token().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/services",
            Some(&token),
            Some(json!({ "name": "Fade", "durationMin": 30, "price": 300 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["service"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/services/{id}"),
            Some(&token),
            Some(json!({ "isActive": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/services", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_invalid_week_is_rejected_with_message() {
    let app = TestApp::new();
    let token = app.barber_token().await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/working-hours",
            Some(&token),
            Some(json!({ "hours": [{ "dayOfWeek": 1, "startMin": 600, "endMin": 540 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Invalid range for dayOfWeek=1. startMin must be < endMin."
    );
}

// =============================================================================
// Booking
// =============================================================================

#[tokio::test]
async fn test_availability_then_booking() {
    let app = TestApp::new();
    let haircut = app.open_shop();
    let token = app.register("ali@example.com").await;

    let (status, body) = app
        .get(
            &format!("/availability?date=2024-06-03&serviceId={}", haircut.id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slots"][0], "09:00");
    assert_eq!(body["workingHours"]["startMin"], 540);

    let booking = json!({
        "serviceId": haircut.id,
        "date": "2024-06-03",
        "startTime": "09:00"
    });
    let (status, body) = app
        .send(Method::POST, "/appointments", Some(&token), Some(booking.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["appointment"]["status"], "PENDING");

    let (status, body) = app
        .send(Method::POST, "/appointments", Some(&token), Some(booking))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "SLOT_UNAVAILABLE");
}

#[tokio::test]
async fn test_booking_rejections_map_to_status_codes() {
    let app = TestApp::new();
    let haircut = app.open_shop();
    let token = app.register("ali@example.com").await;

    let sunday = json!({ "serviceId": haircut.id, "date": "2024-06-02", "startTime": "10:00" });
    let late = json!({ "serviceId": haircut.id, "date": "2024-06-03", "startTime": "11:45" });
    let unknown = json!({
        "serviceId": uuid::Uuid::new_v4(),
        "date": "2024-06-03",
        "startTime": "10:00"
    });
    let malformed = json!({ "serviceId": haircut.id, "date": "2024-06-03", "startTime": "9:00" });

    let (status, _) = app.send(Method::POST, "/appointments", Some(&token), Some(sunday)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.send(Method::POST, "/appointments", Some(&token), Some(late)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.send(Method::POST, "/appointments", Some(&token), Some(unknown)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .send(Method::POST, "/appointments", Some(&token), Some(malformed))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_barber_moves_appointment_through_lifecycle() {
    let app = TestApp::new();
    let haircut = app.open_shop();
    let customer = app.register("ali@example.com").await;
    let barber = app.barber_token().await;

    let (_, body) = app
        .send(
            Method::POST,
            "/appointments",
            Some(&customer),
            Some(json!({ "serviceId": haircut.id, "date": "2024-06-03", "startTime": "10:00" })),
        )
        .await;
    let id = body["appointment"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/appointments/{id}/status"),
            Some(&customer),
            Some(json!({ "status": "CONFIRMED" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/appointments/{id}/status"),
            Some(&barber),
            Some(json!({ "status": "DONE" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["status"], "DONE");

    let (status, body) = app
        .send(Method::DELETE, &format!("/appointments/{id}"), Some(&customer), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Cannot cancel a completed appointment");

    let (status, body) = app.get("/appointments", Some(&barber)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointments"][0]["user"]["email"], "ali@example.com");
}

#[tokio::test]
async fn test_analytics_rejects_unknown_range() {
    let app = TestApp::new();
    let barber = app.barber_token().await;

    let (status, body) = app.get("/analytics/summary?range=90d", Some(&barber)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid range. Use today|7d|30d");

    let (status, body) = app.get("/analytics/summary", Some(&barber)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"], "30d");
}
