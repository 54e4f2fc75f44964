#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use eco_api_lib::{
    adapters::InMemoryDbAdapter,
    config::Config,
    web::{self, state::AppState},
};
use eco_tracker_core::ports::{
    CoachService, PortError, PortResult, RecommendationRequest, RecommendationService,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub struct StubRecommender {
    pub fail: bool,
}

#[async_trait]
impl RecommendationService for StubRecommender {
    async fn recommend(&self, request: &RecommendationRequest) -> PortResult<Vec<String>> {
        if self.fail {
            return Err(PortError::Unavailable("no response within 25s".into()));
        }
        Ok(vec![format!(
            "You have {} points; try a meat-free day.",
            request.points
        )])
    }
}

pub struct StubCoach;

#[async_trait]
impl CoachService for StubCoach {
    async fn answer_query(&self, query: &str) -> PortResult<String> {
        Ok(format!("Coach says: {query}"))
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "OPENAI_API_KEY" => Some("test-key".to_string()),
        _ => None,
    })
    .expect("test config")
}

pub fn test_app_with(recommender_fails: bool) -> Router {
    let state = AppState::new(
        Arc::new(InMemoryDbAdapter::new()),
        Arc::new(test_config()),
        Arc::new(StubRecommender {
            fail: recommender_fails,
        }),
        Arc::new(StubCoach),
    );
    web::router(Arc::new(state)).expect("router")
}

pub fn test_app() -> Router {
    test_app_with(false)
}

/// Sends one request through the router and returns the status and JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user_id: Option<Uuid>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
