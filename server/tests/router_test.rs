use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use records::ApplicationRuntimeBuilder;
use records_server::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let runtime = ApplicationRuntimeBuilder::new()
        .use_in_memory_db()
        .build()
        .expect("runtime");
    router(AppState::from(&runtime))
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": email, "password": "secret1", "name": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_then_fetch_profile() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    let (status, body) = call(&app, Method::GET, "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["role"], "user");
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let app = app();
    register(&app, "ada@example.com").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "ada@example.com", "password": "secret1", "name": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("already registered"));
}

#[tokio::test]
async fn bad_input_is_rejected_with_message() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "not-an-email", "password": "secret1", "name": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "A valid email is required");

    let token = register(&app, "ada@example.com").await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/records",
        Some(&token),
        Some(json!({"title": "x", "status": "BOGUS"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = app();
    register(&app, "ada@example.com").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "nope!!"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn records_require_a_token() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/records", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access token required");

    let (status, _) = call(&app, Method::GET, "/api/records", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    let (status, body) = call(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = call(&app, Method::GET, "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn listing_pages_filters_and_counts() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    for (title, status) in [("Alpha", "ACTIVE"), ("Beta", "PENDING"), ("Gamma", "PENDING")] {
        let (code, _) = call(
            &app,
            Method::POST,
            "/api/records",
            Some(&token),
            Some(json!({"title": title, "status": status})),
        )
        .await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/records?page=1&limit=2&status=PENDING",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"][0]["title"], "Gamma");
    assert_eq!(
        body["pagination"],
        json!({"page": 1, "limit": 2, "total": 2, "totalPages": 1})
    );

    let (_, body) = call(&app, Method::GET, "/api/records?search=alp", Some(&token), None).await;
    assert_eq!(body["records"].as_array().unwrap().len(), 1);

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/records?page=-1&limit=500",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["pagination"],
        json!({"page": 1, "limit": 100, "total": 3, "totalPages": 1})
    );

    let (status, body) = call(&app, Method::GET, "/api/records?page=two", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (_, body) = call(&app, Method::GET, "/api/records/stats", Some(&token), None).await;
    assert_eq!(body, json!({"total": 3, "active": 1, "inactive": 0, "pending": 2}));
}

#[tokio::test]
async fn other_users_records_are_not_found() {
    let app = app();
    let ada = register(&app, "ada@example.com").await;
    let bob = register(&app, "bob@example.com").await;

    let (_, created) = call(
        &app,
        Method::POST,
        "/api/records",
        Some(&ada),
        Some(json!({"title": "Private"})),
    )
    .await;
    let uri = format!("/api/records/{}", created["id"].as_str().unwrap());

    let (status, body) = call(&app, Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Record not found");

    let (status, _) = call(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::GET, &uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"]["email"], "ada@example.com");
    assert_eq!(body["status"], "ACTIVE");
    assert_eq!(body["priority"], "MEDIUM");
}
