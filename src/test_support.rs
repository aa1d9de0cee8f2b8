//! Router-level harness: the real `Router` over an in-memory store and a
//! pinned clock, with a signed-in user.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
    Router,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::jwt::create_access_token;
use crate::config::Config;
use crate::models::reference::{AvatarAge, AvatarGender};
use crate::models::user::User;
use crate::services::calendar::{Clock, FixedClock};
use crate::store::memory::MemoryStore;
use crate::store::ReferenceStore;
use crate::{build_router, AppState};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub config: Arc<Config>,
    pub user: User,
    pub token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let happy = store.seed_mood_type("Happy").await;
        let sad = store.seed_mood_type("Sad").await;
        store.seed_mood_type("Calm").await;
        store.seed_reason("Work").await;
        store.seed_reason("Family").await;

        store.create_task("Go for a walk", happy.id).await.unwrap();
        store.create_task("Write down three good things", happy.id).await.unwrap();
        store.create_task("Call a friend", sad.id).await.unwrap();
        store.seed_quote("Joy is contagious.", happy.id).await;
        store.seed_avatar(AvatarGender::Female, AvatarAge::Young, Some(happy.id)).await;
        store.seed_avatar(AvatarGender::Male, AvatarAge::Old, Some(happy.id)).await;
        store.seed_avatar(AvatarGender::Male, AvatarAge::Old, Some(sad.id)).await;

        let user = store.seed_user("tester@moodlog.dev").await;
        let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()));
        let config = Arc::new(Config::for_tests());
        let token = create_access_token(user.id, &user.email, &config).unwrap();

        let state = AppState {
            store: store.clone(),
            clock: clock.clone(),
            config: config.clone(),
        };

        Self {
            router: build_router(state),
            store,
            clock,
            config,
            user,
            token,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, Some(&self.token)).await
    }

    pub async fn get_without_auth(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn get_as(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, Some(token)).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), Some(&self.token)).await
    }

    pub async fn post_without_auth(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(body), Some(&self.token)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None, Some(&self.token)).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}
