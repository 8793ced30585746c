#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::test;
use async_trait::async_trait;
use serde_json::json;

use rentdesk::auth::{AuthResponse, AuthSettings};
use rentdesk::models::Item;
use rentdesk::queue::{EmailJob, JobQueue, QueueError};
use rentdesk::{db, AppState};

/// Builds the full application around `$state`, as `main` does minus CORS.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .wrap(rentdesk::auth::AuthMiddleware)
                .wrap(actix_web::middleware::Logger::default())
                .configure(rentdesk::routes::config),
        )
        .await
    };
}
pub(crate) use test_app;

/// Queue fake that keeps every accepted job, or refuses all of them.
#[derive(Default)]
pub struct RecordingQueue {
    jobs: Mutex<Vec<EmailJob>>,
    broken: bool,
}

impl RecordingQueue {
    pub fn broken() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            broken: true,
        }
    }

    pub fn jobs(&self) -> Vec<EmailJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobQueue for RecordingQueue {
    async fn enqueue(&self, job: &EmailJob) -> Result<(), QueueError> {
        if self.broken {
            return Err(QueueError::Broker("connection refused".into()));
        }
        self.jobs.lock().unwrap().push(job.clone());
        Ok(())
    }
}

pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: "integration-test-secret".into(),
        token_ttl: chrono::Duration::hours(1),
        // bcrypt's minimum cost keeps the suite fast.
        bcrypt_cost: 4,
    }
}

pub async fn test_state(queue: Arc<dyn JobQueue>) -> AppState {
    let pool = db::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    db::init_schema(&pool).await.expect("Failed to create schema");
    AppState::new(pool, queue, auth_settings())
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub struct TestUser {
    pub id: i64,
    pub token: String,
}

pub async fn register<S, B>(app: &S, username: &str, password: &str) -> StatusCode
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    test::call_service(app, req).await.status()
}

pub async fn login<S, B>(app: &S, username: &str, password: &str) -> Result<TestUser, StatusCode>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    if resp.status() != StatusCode::OK {
        return Err(resp.status());
    }
    let auth: AuthResponse = test::read_body_json(resp).await;
    Ok(TestUser {
        id: auth.user_id,
        token: auth.token,
    })
}

pub async fn register_and_login<S, B>(app: &S, username: &str, password: &str) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    assert_eq!(
        register(app, username, password).await,
        StatusCode::CREATED,
        "Setup: failed to register {}",
        username
    );
    login(app, username, password)
        .await
        .unwrap_or_else(|status| panic!("Setup: failed to log in {}: {}", username, status))
}

pub async fn add_item<S, B>(app: &S, user: &TestUser, name: &str) -> Item
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/add_item")
        .append_header(bearer(&user.token))
        .set_json(json!({ "name": name }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "Setup: failed to add {}", name);
    test::read_body_json(resp).await
}

pub async fn list_items<S, B>(app: &S) -> Vec<Item>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    test::read_body_json(resp).await
}

/// Status the client would see for `req`. Errors raised by middleware are
/// rendered the way the server renders them.
pub async fn call_status<S, B>(app: &S, req: Request) -> StatusCode
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => resp.status(),
        Err(e) => e.as_response_error().status_code(),
    }
}
