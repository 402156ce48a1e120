mod common;

use actix_web::{http::StatusCode, test};
use bson::oid::ObjectId;
use common::{app, driver_error_message, FailingDatabase, FakeMedia, REQUESTER_HEADER};
use serde_json::{json, Value};
use std::sync::Arc;

/// Sends `req` and checks for a 500 whose body is exactly `{message}` and
/// carries nothing of the underlying database error.
async fn assert_internal_error(req: test::TestRequest, message: &str) {
    let media = Arc::new(FakeMedia::new());
    let app = test::init_service(app(Arc::new(FailingDatabase), media.clone())).await;

    let res = test::call_service(&app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(res).await;
    let text = String::from_utf8_lossy(&body);
    assert!(!text.contains(&driver_error_message()), "{}", text);
    assert!(!text.contains("DatabaseError"), "{}", text);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "message": message }));
    assert!(media.calls().is_empty());
}

#[actix_web::test]
async fn search_failure_is_internal_error() {
    assert_internal_error(
        test::TestRequest::get().uri("/courses/search?query=rust"),
        "Failed to search courses.",
    )
    .await;
}

#[actix_web::test]
async fn published_listing_failure_is_internal_error() {
    assert_internal_error(
        test::TestRequest::get().uri("/courses/published"),
        "Failed to get published courses.",
    )
    .await;
}

#[actix_web::test]
async fn create_failure_is_internal_error() {
    assert_internal_error(
        test::TestRequest::post()
            .uri("/courses")
            .insert_header((REQUESTER_HEADER, ObjectId::new().to_hex()))
            .set_json(json!({ "courseTitle": "Rust", "category": "Programming" })),
        "Failed to create course.",
    )
    .await;
}

#[actix_web::test]
async fn edit_failure_is_internal_error() {
    assert_internal_error(
        test::TestRequest::put()
            .uri(&format!("/courses/{}", ObjectId::new().to_hex()))
            .set_json(json!({ "courseTitle": "Renamed" })),
        "Failed to update course.",
    )
    .await;
}

#[actix_web::test]
async fn publish_failure_is_internal_error() {
    assert_internal_error(
        test::TestRequest::patch().uri(&format!(
            "/courses/{}/publish?publish=true",
            ObjectId::new().to_hex()
        )),
        "Failed to toggle publish status.",
    )
    .await;
}

#[actix_web::test]
async fn get_course_failure_is_internal_error() {
    assert_internal_error(
        test::TestRequest::get().uri(&format!("/courses/{}", ObjectId::new().to_hex())),
        "Failed to get course.",
    )
    .await;
}

#[actix_web::test]
async fn lecture_failure_is_internal_error() {
    assert_internal_error(
        test::TestRequest::post()
            .uri(&format!("/courses/{}/lectures", ObjectId::new().to_hex()))
            .set_json(json!({ "lectureTitle": "Ownership" })),
        "Failed to process lecture.",
    )
    .await;
}
