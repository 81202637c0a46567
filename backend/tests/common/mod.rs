#![allow(dead_code)]

use std::sync::Arc;

use admit_adapters::{LinearModel, Scaler, Versioned};
use admit_backend::auth::{StaticCredentials, TokenConfig, TokenService};
use admit_backend::services::prediction::{PredictionPipeline, FEATURE_NAMES};
use admit_backend::AppState;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const SECRET: &str = "integration-secret";

pub fn names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|n| n.to_string()).collect()
}

pub fn scaler() -> Scaler {
    Scaler {
        feature_names: names(),
        mean: vec![316.5, 107.2, 3.1, 3.37, 3.48, 8.58, 0.56],
        scale: vec![11.3, 6.1, 1.14, 0.99, 0.93, 0.60, 0.50],
    }
}

pub fn model() -> LinearModel {
    LinearModel {
        feature_names: names(),
        intercept: 0.724,
        coefficients: vec![0.026, 0.018, 0.003, 0.002, 0.015, 0.067, 0.012],
    }
}

pub fn pipeline() -> PredictionPipeline {
    PredictionPipeline::new(
        Versioned {
            name: "admission_scaler".into(),
            version: "v1".into(),
            value: scaler(),
        },
        Versioned {
            name: "admission_model".into(),
            version: "v1".into(),
            value: model(),
        },
    )
    .unwrap()
}

pub fn tokens() -> TokenService {
    TokenService::new(&TokenConfig::new(SECRET))
}

pub fn app() -> Router {
    let state = AppState::new(
        tokens(),
        Arc::new(StaticCredentials::new("admin", "password")),
        pipeline(),
    );
    admit_backend::app(state)
}

pub fn applicant() -> Value {
    json!({
        "gre_score": 320,
        "toefl_score": 110,
        "university_rating": 4,
        "sop": 4.5,
        "lor": 4.0,
        "cgpa": 9.0,
        "research": 1
    })
}

pub fn post_json(uri: &str, body: &Value, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Sends one request through a fresh router; empty bodies come back as `Null`.
pub async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn login_token() -> String {
    let (status, body) = send(post_json(
        "/login",
        &json!({ "username": "admin", "password": "password" }),
        None,
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}
