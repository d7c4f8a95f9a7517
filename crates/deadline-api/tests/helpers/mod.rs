//! Shared fixture for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use deadline_api::jwt::{Claims, JwtDecoder};
use deadline_api::{AppState, build_app};
use deadline_core::config::{AuthConfig, ServerConfig};
use deadline_core::traits::{Clock, SystemClock};
use deadline_database::memory::MemoryStore;
use deadline_entity::friendship::FriendshipStatus;
use deadline_service::notifier::{InAppNotifier, StoredInAppNotifier};
use deadline_service::{AccessService, CollaborationService, DeadlineService, NotificationService};

pub const SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub in_app: Arc<dyn InAppNotifier>,
    router: Router,
}

/// A registered user and a bearer token for them.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let in_app: Arc<dyn InAppNotifier> = Arc::new(StoredInAppNotifier::new(store.clone()));
        let access = Arc::new(AccessService::new(store.clone(), store.clone()));

        let state = AppState {
            server: Arc::new(ServerConfig::default()),
            db_pool: None,
            jwt_decoder: Arc::new(JwtDecoder::new(&AuthConfig {
                jwt_secret: SECRET.to_string(),
                leeway_seconds: 0,
            })),
            deadline_service: Arc::new(DeadlineService::new(
                store.clone(),
                access.clone(),
                clock.clone(),
            )),
            collaboration_service: Arc::new(CollaborationService::new(
                access,
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                in_app.clone(),
                clock.clone(),
            )),
            notification_service: Arc::new(NotificationService::new(
                store.clone(),
                store.clone(),
                clock,
            )),
        };

        Self {
            store,
            in_app,
            router: build_app(state),
        }
    }

    pub fn user(&self, name: &str) -> TestUser {
        let id = self
            .store
            .add_user(name, Some(&format!("{name}@example.com")));
        TestUser {
            id,
            token: token_for(id, SECRET),
        }
    }

    pub fn befriend(&self, a: &TestUser, b: &TestUser) {
        self.store
            .set_friendship(a.id, b.id, FriendshipStatus::Accepted);
    }

    /// Send a request and return the status with the parsed JSON body.
    pub async fn send(
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
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(&user.token), None).await
    }

    pub async fn post(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(&user.token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: &TestUser, body: Option<Value>) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(&user.token), body).await
    }

    pub async fn delete(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(&user.token), None).await
    }

    /// Create a deadline due in three days and return its id.
    pub async fn create_deadline(&self, owner: &TestUser, title: &str) -> Uuid {
        let due = chrono::Utc::now() + chrono::Duration::days(3);
        let (status, body) = self
            .post(
                "/api/deadlines",
                owner,
                serde_json::json!({
                    "title": title,
                    "description": format!("{title} notes"),
                    "due_at": due,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().parse().unwrap()
    }
}

pub fn token_for(user_id: Uuid, secret: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + 3600,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
