use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::common::setup_test_app;

fn classify_request(body: &serde_json::Value) -> Request<Body> {
    Request::post("/v1/classify")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app();

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn classify_without_inputs_returns_400() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "option": "Title",
        "word_list": ["Sports", "Politics"]
    });

    let response = app.oneshot(classify_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn title_mode_without_urls_returns_400() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "text_input": ["some loose text"],
        "option": "Title",
        "word_list": ["Sports", "Politics"]
    });

    let response = app.oneshot(classify_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn duplicate_labels_return_400() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "url_input": ["https://example.com"],
        "option": "Title",
        "word_list": ["Sports", "Sports"]
    });

    let response = app.oneshot(classify_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_word_list_is_unprocessable() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "url_input": ["https://example.com"],
        "option": "Title"
    });

    let response = app.oneshot(classify_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::post("/v1/classify")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["paths"]["/v1/classify"]["post"].is_object());
}
