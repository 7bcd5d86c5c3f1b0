#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use http_body_util::BodyExt;
use reqwest::Client;
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use eventdesk::auth::AdminPrincipal;
use eventdesk::auth::session::{SESSION_COOKIE, issue_token};
use eventdesk::config::Config;
use eventdesk::db::{EventStore, MemoryEventStore};
use eventdesk::models::{Event, EventChanges, EventFilter, NewEvent, Visibility};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse";

/// Config for tests: known admin credentials, plain-HTTP cookies, plus any overrides.
pub fn test_config(database_url: &str, overrides: &[(&str, &str)]) -> Config {
    Config::from_lookup(|key| {
        if let Some((_, value)) = overrides.iter().find(|(k, _)| *k == key) {
            return Some(value.to_string());
        }
        match key {
            "DATABASE_URL" => Some(database_url.to_string()),
            "EVENTDESK_SESSION_SECRET" => Some("test-session-secret".to_string()),
            "ADMIN_USERNAME" => Some(ADMIN_USERNAME.to_string()),
            "ADMIN_PASSWORD" => Some(ADMIN_PASSWORD.to_string()),
            "EVENTDESK_SECURE_COOKIES" => Some("false".to_string()),
            "EVENTDESK_LOG_LEVEL" => Some("warn".to_string()),
            _ => None,
        }
    })
    .expect("test config")
}

/// Router over an in-memory store. The store handle is returned for seeding and inspection.
pub fn memory_app() -> (Router, MemoryEventStore) {
    memory_app_with(&[])
}

pub fn memory_app_with(overrides: &[(&str, &str)]) -> (Router, MemoryEventStore) {
    let store = MemoryEventStore::new();
    let config = test_config("postgres://unused/eventdesk", overrides);
    let app = eventdesk::build_app(Arc::new(store.clone()), config);
    (app, store)
}

pub fn app_with_store(store: Arc<dyn EventStore>) -> Router {
    eventdesk::build_app(store, test_config("postgres://unused/eventdesk", &[]))
}

/// `Cookie` header value carrying a valid admin session.
pub fn session_cookie_header() -> String {
    let config = test_config("postgres://unused/eventdesk", &[]);
    let token = issue_token(&AdminPrincipal::admin(), &config).expect("issue token");
    format!("{SESSION_COOKIE}={token}")
}

pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 1, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn new_event(title: &str, day: u32, published: bool) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        description: format!("All about {title}"),
        campus: "Main".to_string(),
        category: "Community".to_string(),
        start_date_time: at(day, 18),
        end_date_time: at(day, 20),
        cost: 0,
        is_published: published,
    }
}

pub async fn seed(store: &MemoryEventStore, title: &str, day: u32, published: bool) -> Event {
    store
        .insert(&new_event(title, day, published))
        .await
        .unwrap()
        .unwrap()
}

/// A complete, valid create payload.
pub fn event_payload(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Songs and snacks",
        "campus": "North",
        "category": "Worship",
        "startDateTime": "2030-02-01T18:00:00",
        "endDateTime": "2030-02-01T20:00:00",
        "cost": 10,
        "isPublished": true
    })
}

// ── oneshot helpers ─────────────────────────────────────────────

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn raw_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_session(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, session_cookie_header())
        .body(Body::empty())
        .unwrap()
}

pub fn form_request(uri: &str, fields: &[(&str, &str)], with_session: bool) -> Request<Body> {
    let body = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if with_session {
        builder = builder.header(header::COOKIE, session_cookie_header());
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn call(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Send a request and decode the JSON answer.
pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = call(app, request).await;
    let status = response.status();
    let text = body_text(response).await;
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, body)
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub fn set_cookie(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ")
}

// ── Stores that misbehave ───────────────────────────────────────

/// Every call fails as if the database were unreachable.
pub struct FailingStore;

#[async_trait]
impl EventStore for FailingStore {
    async fn list(&self, _: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
    async fn count(&self, _: Visibility) -> Result<i64, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
    async fn list_window(&self, _: Visibility, _: i64, _: i64) -> Result<Vec<Event>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
    async fn find(&self, _: Uuid) -> Result<Option<Event>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
    async fn insert(&self, _: &NewEvent) -> Result<Option<Event>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
    async fn update(&self, _: Uuid, _: &EventChanges) -> Result<Option<Event>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
    async fn delete(&self, _: Uuid) -> Result<bool, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
}

/// Writes succeed but report no row.
pub struct NoRowStore;

#[async_trait]
impl EventStore for NoRowStore {
    async fn list(&self, _: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        Ok(Vec::new())
    }
    async fn count(&self, _: Visibility) -> Result<i64, sqlx::Error> {
        Ok(0)
    }
    async fn list_window(&self, _: Visibility, _: i64, _: i64) -> Result<Vec<Event>, sqlx::Error> {
        Ok(Vec::new())
    }
    async fn find(&self, _: Uuid) -> Result<Option<Event>, sqlx::Error> {
        Ok(None)
    }
    async fn insert(&self, _: &NewEvent) -> Result<Option<Event>, sqlx::Error> {
        Ok(None)
    }
    async fn update(&self, _: Uuid, _: &EventChanges) -> Result<Option<Event>, sqlx::Error> {
        Ok(None)
    }
    async fn delete(&self, _: Uuid) -> Result<bool, sqlx::Error> {
        Ok(false)
    }
}

/// Panics on listing, to exercise the panic boundary.
pub struct PanickingStore;

#[async_trait]
impl EventStore for PanickingStore {
    async fn list(&self, _: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        panic!("store exploded")
    }
    async fn count(&self, _: Visibility) -> Result<i64, sqlx::Error> {
        Ok(0)
    }
    async fn list_window(&self, _: Visibility, _: i64, _: i64) -> Result<Vec<Event>, sqlx::Error> {
        Ok(Vec::new())
    }
    async fn find(&self, _: Uuid) -> Result<Option<Event>, sqlx::Error> {
        Ok(None)
    }
    async fn insert(&self, _: &NewEvent) -> Result<Option<Event>, sqlx::Error> {
        Ok(None)
    }
    async fn update(&self, _: Uuid, _: &EventChanges) -> Result<Option<Event>, sqlx::Error> {
        Ok(None)
    }
    async fn delete(&self, _: Uuid) -> Result<bool, sqlx::Error> {
        Ok(false)
    }
}

// ── PostgreSQL end-to-end ───────────────────────────────────────

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: std::net::SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn create_event(&self, payload: &Value) -> Value {
        let resp = self
            .client
            .post(self.url("/api/events"))
            .json(payload)
            .send()
            .await
            .expect("create event failed");
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED, "create event non-201");
        resp.json().await.unwrap()
    }

    pub async fn get_json(&self, path: &str) -> (Value, reqwest::StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> (Value, reqwest::StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete(&self, path: &str) -> (Value, reqwest::StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

fn sibling_database_url(base_url: &str, name: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{name}"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Spawn the app against a fresh temporary database. `None` when
/// `DATABASE_URL` is not set, so these tests skip on machines without Postgres.
pub async fn spawn_app() -> Option<TestApp> {
    let _ = dotenvy::dotenv();

    let Ok(base_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL test");
        return None;
    };

    let db_name = format!("eventdesk_test_{}", Uuid::new_v4().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&sibling_database_url(&base_url, "postgres"))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = sibling_database_url(&base_url, &db_name);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = test_config(&test_url, &[]);
    let store = eventdesk::db::PgEventStore::new(pool.clone());
    let app = eventdesk::build_app(Arc::new(store), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    Some(TestApp {
        addr,
        pool,
        client,
        db_name,
    })
}

/// Drop the test database.
pub async fn cleanup(app: TestApp) {
    app.pool.close().await;

    let Ok(base_url) = std::env::var("DATABASE_URL") else {
        return;
    };
    if let Ok(admin_pool) = PgPoolOptions::new()
        .max_connections(2)
        .connect(&sibling_database_url(&base_url, "postgres"))
        .await
    {
        let _ = sqlx::query(&format!(
            "DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)",
            app.db_name
        ))
        .execute(&admin_pool)
        .await;
        admin_pool.close().await;
    }
}
