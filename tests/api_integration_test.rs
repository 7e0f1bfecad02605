use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt; // for collect
use proteus::domain::Contract;
use proteus::{create_app, MockServerOptions};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot

fn pets_contract() -> Contract {
    serde_json::from_value(json!({
        "endpoints": [
            {
                "path": "/pets",
                "method": "get",
                "responses": {
                    "200": { "schema": { "type": "array", "items": { "$ref": "Pet" } } }
                }
            },
            {
                "path": "/pets/{id}",
                "method": "get",
                "responses": { "200": { "schema": { "$ref": "Pet" } } }
            },
            {
                "path": "/pets",
                "method": "post",
                "requestBody": {
                    "required": true,
                    "schema": {
                        "type": "object",
                        "properties": { "name": { "type": "string" } },
                        "required": ["name"]
                    }
                },
                "responses": {
                    "201": {
                        "content": {
                            "application/json": { "schema": { "$ref": "Pet" } }
                        }
                    }
                }
            },
            {
                "path": "/pets/{id}",
                "method": "delete",
                "responses": { "204": { "description": "deleted" } }
            }
        ],
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "name": { "type": "string" }
                    }
                }
            }
        }
    }))
    .unwrap()
}

fn demo_app() -> axum::Router {
    create_app(
        &pets_contract(),
        MockServerOptions {
            seed: Some(42),
            ..Default::default()
        },
    )
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let request = match body {
        Some(value) => Request::builder()
            .uri(uri)
            .method(method)
            .header("Content-Type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .uri(uri)
            .method(method)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_pet_lifecycle() {
    let app = demo_app();

    // Fetch an id that was never created: lazily materialized, correlated.
    let (status, body) = send(&app, "GET", "/pets/7", None).await;
    assert_eq!(status, StatusCode::OK);
    let pet: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(pet["id"], json!(7));
    assert!(pet["name"].is_string());

    // The same request replays byte-identical JSON.
    let (status, replay) = send(&app, "GET", "/pets/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replay, body);

    // Delete, then the id is gone forever.
    let (status, body) = send(&app, "DELETE", "/pets/7", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = send(&app, "GET", "/pets/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Create a pet; request data wins over generated fields.
    let (status, body) = send(&app, "POST", "/pets", Some(json!({ "name": "Rex" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(created["name"], json!("Rex"));
    assert!(created["id"].is_i64());

    // And it is fetchable under its new id.
    let id = created["id"].to_string();
    let (status, body) = send(&app, "GET", &format!("/pets/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_list_then_fetch_by_id() {
    let app = demo_app();

    let (status, body) = send(&app, "GET", "/pets", None).await;
    assert_eq!(status, StatusCode::OK);
    let pets: Value = serde_json::from_slice(&body).unwrap();
    let pets = pets.as_array().unwrap();
    assert_eq!(pets.len(), 3); // demo scenario

    let id = pets[1]["id"].to_string();
    let (status, body) = send(&app, "GET", &format!("/pets/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched, pets[1]);
}

#[tokio::test]
async fn test_validation_error_shape() {
    let app = demo_app();

    let (status, body) = send(&app, "POST", "/pets", Some(json!({ "age": 3 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], json!("VALIDATION_ERROR"));
    let field_errors = error["details"]["errors"].as_array().unwrap();
    assert_eq!(field_errors[0]["field"], json!("name"));
    assert_eq!(field_errors[0]["code"], json!("MISSING_REQUIRED_FIELD"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = demo_app();

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], json!("healthy"));
    assert_eq!(health["scenario"], json!("demo"));
    assert_eq!(health["endpoints"], json!(4));

    let (status, _) = send(&app, "GET", "/health/live", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unroutable_path_is_404() {
    let app = demo_app();
    let (status, _) = send(&app, "GET", "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
