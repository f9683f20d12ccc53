//! Handler tests for the Tasks domain
//!
//! These drive the task router end to end against the in-memory repository:
//! - Request deserialization and validation (400 envelopes)
//! - Response serialization and status codes
//! - Not-found handling for unknown and malformed ids

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_tasks::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    TasksModule::new(InMemoryTaskRepository::new()).router()
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create(app: &Router, body: Value) -> TaskResponse {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_task_handler_returns_201_with_defaults() {
    let app = app();

    let response = app
        .oneshot(json_request("POST", "/", json!({ "title": "Buy milk" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["title"], "Buy milk");
    assert_eq!(body["status"], "PENDING");
    assert!(body["description"].is_null());
    assert!(body["priority"].is_null());
    assert!(body["due_date"].is_null());
    assert!(body["id"].as_str().is_some());
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[tokio::test]
async fn test_create_task_handler_accepts_every_field() {
    let app = app();

    let task = create(
        &app,
        json!({
            "title": "File taxes",
            "description": "Before the deadline",
            "status": "IN_PROGRESS",
            "priority": "HIGH",
            "due_date": "2030-04-15T12:00:00Z"
        }),
    )
    .await;

    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.priority, Some(TaskPriority::High));
    assert_eq!(task.description.as_deref(), Some("Before the deadline"));
    assert_eq!(
        task.due_date.map(|d| d.to_rfc3339()),
        Some("2030-04-15T12:00:00+00:00".to_string())
    );
}

#[tokio::test]
async fn test_create_task_handler_title_boundaries() {
    let app = app();

    let at_limit = "a".repeat(255);
    let task = create(&app, json!({ "title": at_limit })).await;
    assert_eq!(task.title.len(), 255);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/", json!({ "title": "a".repeat(256) })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["title"].is_array());

    let response = app
        .oneshot(json_request("POST", "/", json!({ "title": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_task_handler_requires_title() {
    let response = app()
        .oneshot(json_request("POST", "/", json!({ "description": "no title" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["title"][0]["code"], "required");
    assert_eq!(body["details"]["title"][0]["message"], "title is required");
}

#[tokio::test]
async fn test_create_task_handler_rejects_unknown_fields_and_bad_values() {
    let app = app();

    let unknown = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "title": "Buy milk", "owner": "me" }),
        ))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(unknown.into_body()).await;
    assert_eq!(body["error"], "INVALID_JSON");

    let bad_status = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "title": "Buy milk", "status": "DONE" }),
        ))
        .await
        .unwrap();
    assert_eq!(bad_status.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(bad_status.into_body()).await;
    assert_eq!(body["error"], "INVALID_JSON");
    assert_eq!(body["details"]["status"][0]["code"], "invalid");
    let reason = body["details"]["status"][0]["message"].as_str().unwrap();
    assert!(reason.contains("DONE"), "reason: {}", reason);

    let bad_date = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "title": "Buy milk", "due_date": "tomorrow" }),
        ))
        .await
        .unwrap();
    assert_eq!(bad_date.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(bad_date.into_body()).await;
    assert_eq!(body["details"]["due_date"][0]["code"], "invalid");
}

#[tokio::test]
async fn test_get_task_handler_returns_task() {
    let app = app();
    let created = create(&app, json!({ "title": "Walk the dog" })).await;

    let response = app
        .oneshot(empty_request("GET", &format!("/{}", created.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fetched: TaskResponse = json_body(response.into_body()).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_task_handler_unknown_id_returns_404() {
    let response = app()
        .oneshot(empty_request("GET", "/unknown-id"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], "Task with ID unknown-id not found");
}

#[tokio::test]
async fn test_get_task_handler_missing_uuid_returns_404() {
    let builder = TestDataBuilder::from_test_name("handler_missing_uuid");
    let id = builder.missing_id();

    let response = app()
        .oneshot(empty_request("GET", &format!("/{}", id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], format!("Task with ID {} not found", id));
}

#[tokio::test]
async fn test_update_task_handler_requires_status() {
    let app = app();
    let created = create(&app, json!({ "title": "Buy milk" })).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/{}", created.id),
            json!({ "title": "x" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["status"][0]["code"], "required");
    assert_eq!(body["details"]["status"][0]["message"], "status is required");
}

#[tokio::test]
async fn test_update_task_handler_updates_status_and_timestamp() {
    let app = app();
    let created = create(
        &app,
        json!({ "title": "Buy milk", "description": "2 litres", "priority": "LOW" }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/{}", created.id),
            json!({ "title": "Buy milk", "status": "COMPLETED" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: TaskResponse = json_body(response.into_body()).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= updated.created_at);
    // Absent optional fields keep their stored values
    assert_eq!(updated.description.as_deref(), Some("2 litres"));
    assert_eq!(updated.priority, Some(TaskPriority::Low));

    let response = app
        .oneshot(empty_request("GET", &format!("/{}", created.id)))
        .await
        .unwrap();
    let fetched: TaskResponse = json_body(response.into_body()).await;
    assert_eq!(fetched.status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_update_task_handler_explicit_null_clears_field() {
    let app = app();
    let created = create(
        &app,
        json!({ "title": "Buy milk", "description": "2 litres", "priority": "HIGH" }),
    )
    .await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/{}", created.id),
            json!({
                "title": "Buy milk",
                "status": "PENDING",
                "description": null,
                "priority": null
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: TaskResponse = json_body(response.into_body()).await;
    assert_eq!(updated.description, None);
    assert_eq!(updated.priority, None);
}

#[tokio::test]
async fn test_update_task_handler_unknown_id_returns_404() {
    let response = app()
        .oneshot(json_request(
            "PUT",
            "/unknown-id",
            json!({ "title": "Buy milk", "status": "COMPLETED" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Task with ID unknown-id not found");
}

#[tokio::test]
async fn test_delete_task_handler_then_get_returns_404() {
    let app = app();
    let created = create(&app, json!({ "title": "Throw away" })).await;
    let uri = format!("/{}", created.id);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Task deleted successfully");
    assert_eq!(body["id"], created.id.to_string());

    let response = app
        .clone()
        .oneshot(empty_request("GET", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A second delete finds nothing
    let response = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_tasks_handler_filters_and_paginates() {
    let app = app();
    for i in 0..12 {
        create(&app, json!({ "title": format!("pending {}", i) })).await;
    }
    for i in 0..3 {
        create(
            &app,
            json!({ "title": format!("done {}", i), "status": "COMPLETED" }),
        )
        .await;
    }

    let response = app
        .oneshot(empty_request("GET", "/?status=PENDING&page=2&limit=10"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: GetTasksResponse = json_body(response.into_body()).await;
    assert_eq!(body.data.len(), 2);
    assert!(body.data.iter().all(|t| t.status == TaskStatus::Pending));
    assert_eq!(body.meta.page, 2);
    assert_eq!(body.meta.limit, 10);
    assert_eq!(body.meta.total, 12);
    assert_eq!(body.meta.total_pages, 2);
}

#[tokio::test]
async fn test_list_tasks_handler_defaults_and_search() {
    let app = app();
    create(&app, json!({ "title": "Buy MILK" })).await;
    create(&app, json!({ "title": "Call mom", "description": "about milk" })).await;
    create(&app, json!({ "title": "Write report" })).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/?search=milk"))
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["limit"], 10);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["meta"]["totalPages"], 1);

    let response = app
        .oneshot(empty_request("GET", "/?search=nothing-matches"))
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["meta"]["total"], 0);
    assert_eq!(body["meta"]["totalPages"], 0);
}

#[tokio::test]
async fn test_list_tasks_handler_rejects_bad_query() {
    let app = app();

    for uri in [
        "/?limit=0",
        "/?limit=101",
        "/?page=abc",
        "/?status=DONE",
        "/?sort=title",
    ] {
        let response = app.clone().oneshot(empty_request("GET", uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_list_tasks_handler_rejects_huge_page() {
    let app = app();

    for uri in [
        "/?page=9223372036854775807&limit=100",
        "/?page=18446744073709551615",
    ] {
        let response = app.clone().oneshot(empty_request("GET", uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);

        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["details"]["page"].is_array(), "uri: {}", uri);
    }
}
