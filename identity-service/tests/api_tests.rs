mod common;

use chrono::Duration;
use chrono::Utc;
use common::TestApp;
use reqwest::header::WWW_AUTHENTICATE;
use reqwest::StatusCode;
use serde_json::json;

async fn access_token(response: reqwest::Response) -> String {
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    body["data"]["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/health")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app.register("nicola@example.com", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["token_type"], "bearer");

    let token = body["data"]["access_token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);

    let claims = app.token_codec.verify(token).expect("Token should verify");
    assert_eq!(claims.subject(), "nicola@example.com");
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_register_duplicate_email_differing_case_and_whitespace() {
    let app = TestApp::spawn().await;

    let first = app.register("User@Example.com", "Passw0rd!").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let response = app.register("  user@example.COM ", "another_password").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "Email already registered");
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = TestApp::spawn().await;

    let response = app.register("invalidemail", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid email"));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_register_short_password() {
    let app = TestApp::spawn().await;

    let response = app.register("nicola@example.com", "short").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("at least 8"));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_concurrent_registrations_store_one_identity() {
    let app = TestApp::spawn().await;

    let (first, second) = tokio::join!(
        app.register("race@example.com", "pass_word_one"),
        app.register("RACE@example.com", "pass_word_two"),
    );

    let statuses = [first.status(), second.status()];

    assert!(statuses.contains(&StatusCode::CREATED));
    assert!(statuses.contains(&StatusCode::BAD_REQUEST));
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    app.register("nicola@example.com", "pass_word!").await;

    let response = app.login("Nicola@Example.com", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["token_type"], "bearer");

    let token = body["data"]["access_token"].as_str().unwrap();
    let claims = app.token_codec.verify(token).expect("Token should verify");
    assert_eq!(claims.subject(), "nicola@example.com");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("nicola@example.com", "pass_word!").await;

    let wrong_password = app.login("nicola@example.com", "wrong").await;
    let unknown_email = app.login("nobody@example.com", "pass_word!").await;
    let invalid_email = app.login("not-an-email", "pass_word!").await;

    for response in [wrong_password, unknown_email, invalid_email] {
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(WWW_AUTHENTICATE).unwrap(), "Bearer");

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        assert_eq!(
            body,
            json!({
                "status_code": 401,
                "data": { "message": "Incorrect email or password" }
            })
        );
    }
}

#[tokio::test]
async fn test_me_with_valid_token() {
    let app = TestApp::spawn().await;
    let token = access_token(app.register("nicola@example.com", "pass_word!").await).await;

    let response = app
        .get_authenticated("/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["email"], "nicola@example.com");
    assert!(body["data"]["issued_at"].is_string());
    assert!(body["data"]["expires_at"].is_string());
}

#[tokio::test]
async fn test_me_without_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get(WWW_AUTHENTICATE).unwrap(), "Bearer");
}

#[tokio::test]
async fn test_me_rejects_bad_tokens_uniformly() {
    let app = TestApp::spawn().await;
    let token = access_token(app.register("nicola@example.com", "pass_word!").await).await;

    let expired = app
        .token_codec
        .issue_at(
            "nicola@example.com",
            Duration::minutes(30),
            Utc::now() - Duration::hours(2),
        )
        .unwrap();

    // Flip a full-width character inside the signature segment.
    let mut tampered = token.clone().into_bytes();
    let index = tampered.len() - 5;
    tampered[index] = if tampered[index] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let forged = auth::TokenCodec::new(b"another-secret-key-that-is-32-bytes-long")
        .issue("nicola@example.com", Duration::minutes(30))
        .unwrap();

    for bad_token in [expired, tampered, forged, "not.a.token".to_string()] {
        let response = app
            .get_authenticated("/me", &bad_token)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["data"]["message"], "unauthenticated");
    }
}

#[tokio::test]
async fn test_register_and_login_scenario() {
    let app = TestApp::spawn().await;

    let registered = app.register("User@Example.com", "Passw0rd!").await;
    assert_eq!(registered.status(), StatusCode::CREATED);

    let duplicate = app.register("user@example.com", "Other_pass1").await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    let logged_in = app.login("user@example.com", "Passw0rd!").await;
    assert_eq!(logged_in.status(), StatusCode::OK);

    let token = access_token(logged_in).await;
    let me = app
        .get_authenticated("/me", &token)
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = me.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["email"], "user@example.com");

    let rejected = app.login("user@example.com", "wrong").await;
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
}
