use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_models::account::AccountType;
use shared_utils::test_utils::{MockStoreResponses, TestConfig, TestUser};

use patient_cell::router::patient_routes;

fn extras_config(dir: &tempfile::TempDir) -> TestConfig {
    TestConfig {
        profile_extras_path: dir
            .path()
            .join("extras.json")
            .to_string_lossy()
            .into_owned(),
        ..TestConfig::default()
    }
}

#[tokio::test]
async fn profile_extras_round_trip_through_the_api() {
    let dir = tempfile::tempdir().unwrap();
    let config = extras_config(&dir);
    let user = TestUser::new("extras@example.com", AccountType::Patient);
    let token = user.token(&config.jwt_secret);

    let put = patient_routes(config.to_arc())
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(&format!("/profile-extras/{}", user.id))
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::from(
                    json!({
                        "address": "12 Main St",
                        "medicalHistory": "Asthma",
                        "currentMedications": ["Salbutamol"],
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(put.status(), StatusCode::OK);

    let get = patient_routes(config.to_arc())
        .oneshot(
            Request::builder()
                .uri(&format!("/profile-extras/{}", user.id))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(get.status(), StatusCode::OK);

    let body = axum::body::to_bytes(get.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["profileExtras"]["address"], "12 Main St");
    assert_eq!(json["profileExtras"]["currentMedications"][0], "Salbutamol");
}

#[tokio::test]
async fn reading_anothers_extras_is_forbidden() {
    let dir = tempfile::tempdir().unwrap();
    let config = extras_config(&dir);
    let user = TestUser::new("a@example.com", AccountType::Patient);
    let other = TestUser::new("b@example.com", AccountType::Patient);
    let token = other.token(&config.jwt_secret);

    let response = patient_routes(config.to_arc())
        .oneshot(
            Request::builder()
                .uri(&format!("/profile-extras/{}", user.id))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleting_a_patient_removes_profile_and_user() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = TestConfig {
        data_api_url: server.uri(),
        ..extras_config(&dir)
    };
    let user = TestUser::new("gone@example.com", AccountType::Patient);
    let token = user.token(&config.jwt_secret);

    Mock::given(method("POST"))
        .and(path("/action/deleteOne"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockStoreResponses::deleted(1)))
        .mount(&server)
        .await;

    let response = patient_routes(config.to_arc())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/delete-patient/{}", user.id))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleting_an_unknown_patient_is_not_found() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = TestConfig {
        data_api_url: server.uri(),
        ..extras_config(&dir)
    };
    let admin = TestUser::new("admin@example.com", AccountType::Admin);
    let token = admin.token(&config.jwt_secret);

    Mock::given(method("POST"))
        .and(path("/action/deleteOne"))
        .and(body_partial_json(json!({ "collection": "patients" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockStoreResponses::deleted(0)))
        .mount(&server)
        .await;

    let response = patient_routes(config.to_arc())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/delete-patient/{}", Uuid::new_v4()))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
