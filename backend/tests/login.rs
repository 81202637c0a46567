mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{post_json, send, tokens};

#[tokio::test]
async fn valid_credentials_get_a_bearer_token_for_that_user() {
    let (status, body) = send(post_json(
        "/login",
        &json!({ "username": "admin", "password": "password" }),
        None,
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap();
    let claims = tokens().verify(token).unwrap();
    assert_eq!(claims.sub, "admin");
    assert_eq!(claims.exp - claims.iat.unwrap(), 30 * 60);
}

#[tokio::test]
async fn wrong_credentials_are_unauthorized() {
    let (status, body) = send(post_json(
        "/login",
        &json!({ "username": "wrong", "password": "wrong" }),
        None,
    ))
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Incorrect credentials" }));
}

#[tokio::test]
async fn right_user_wrong_password_is_unauthorized() {
    let (status, body) = send(post_json(
        "/login",
        &json!({ "username": "admin", "password": "Password" }),
        None,
    ))
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("access_token").is_none());
}

#[tokio::test]
async fn login_body_missing_fields_is_rejected() {
    let (status, body) = send(post_json("/login", &json!({ "username": "admin" }), None)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].is_string());
}
