mod common;

use admit_backend::auth::{AuthError, TokenConfig, TokenService};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use common::{applicant, login_token, post_json, send, tokens, SECRET};

#[tokio::test]
async fn login_then_predict_returns_a_positive_chance() {
    let token = login_token().await;
    let (status, body) = send(post_json(
        "/predict",
        &applicant(),
        Some(&format!("Bearer {token}")),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    let chance = body["chance_of_admit"].as_f64().unwrap();
    assert!(chance > 0.0, "got {chance}");
}

#[tokio::test]
async fn same_input_gives_same_output() {
    let header = format!("Bearer {}", login_token().await);
    let (_, first) = send(post_json("/predict", &applicant(), Some(&header))).await;
    let (_, second) = send(post_json("/predict", &applicant(), Some(&header))).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_authorization_header_is_unauthorized() {
    let (status, body) = send(post_json("/predict", &applicant(), None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Missing or invalid token" }));
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let token = login_token().await;
    let (status, body) = send(post_json(
        "/predict",
        &applicant(),
        Some(&format!("Token {token}")),
    ))
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing or invalid token");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let (status, body) = send(post_json(
        "/predict",
        &applicant(),
        Some("Bearer invalid_token"),
    ))
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn token_from_another_secret_is_unauthorized() {
    let forged = TokenService::new(&TokenConfig::new("not-the-secret"))
        .issue("admin")
        .unwrap();
    let (status, body) = send(post_json(
        "/predict",
        &applicant(),
        Some(&format!("Bearer {forged}")),
    ))
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let exp = (Utc::now() - Duration::minutes(30)).timestamp();
    let expired = encode(
        &Header::default(),
        &json!({ "sub": "admin", "exp": exp }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    let header = format!("Bearer {expired}");

    assert_eq!(tokens().validate(Some(&header)), Err(AuthError::ExpiredToken));

    let (status, body) = send(post_json("/predict", &applicant(), Some(&header))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Expired token");
}

#[tokio::test]
async fn out_of_range_values_are_not_validated() {
    let header = format!("Bearer {}", login_token().await);
    let mut input = applicant();
    input["gre_score"] = json!(400);

    let (status, body) = send(post_json("/predict", &input, Some(&header))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["chance_of_admit"].as_f64().unwrap().is_finite());
}

#[tokio::test]
async fn non_numeric_field_is_rejected_before_prediction() {
    let header = format!("Bearer {}", login_token().await);
    let mut input = applicant();
    input["cgpa"] = json!("nine");

    let (status, body) = send(post_json("/predict", &input, Some(&header))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("cgpa"));
}

#[tokio::test]
async fn fractional_integer_field_is_rejected() {
    let header = format!("Bearer {}", login_token().await);
    let mut input = applicant();
    input["research"] = json!(0.5);

    let (status, _) = send(post_json("/predict", &input, Some(&header))).await;
    assert!(status.is_client_error(), "got {status}");
}

#[tokio::test]
async fn missing_field_is_rejected() {
    let header = format!("Bearer {}", login_token().await);
    let mut input = applicant();
    input.as_object_mut().unwrap().remove("research");

    let (status, _) = send(post_json("/predict", &input, Some(&header))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn broken_json_is_a_bad_request() {
    let header = format!("Bearer {}", login_token().await);
    let request = Request::post("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, header)
        .body(Body::from("{\"gre_score\": 320,"))
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn body_without_json_content_type_is_rejected() {
    let header = format!("Bearer {}", login_token().await);
    let request = Request::post("/predict")
        .header(header::AUTHORIZATION, header)
        .body(Body::from(applicant().to_string()))
        .unwrap();

    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn auth_is_checked_before_the_body() {
    let (status, body) = send(post_json("/predict", &json!({ "gre_score": "x" }), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing or invalid token");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, _) = send(post_json("/train", &json!({}), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
