//! Tests for bookmark HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockCourseListCommand, MockCourseListQuery};
use crate::domain::{CourseList, CourseRef, ErrorCode, FieldMask, ListField, ObjectId, Page};
use crate::inbound::http::error::configure_extractors;
use crate::inbound::http::test_utils::{ports, state_with_bookmarks};

const LIST_ID: &str = "5f1b7c3e9d1a2b3c4d5e6f71";
const COURSE_ID: &str = "5f1b7c3e9d1a2b3c4d5e6f70";

fn hydrated_list() -> CourseList {
    let created = Utc
        .with_ymd_and_hms(2024, 11, 4, 12, 0, 0)
        .single()
        .expect("valid time");
    let mut list = CourseList::new(
        LIST_ID.parse().expect("list id"),
        "42",
        [COURSE_ID.parse::<ObjectId>().expect("course id")],
        created,
    );
    list.courses = vec![CourseRef::new(
        COURSE_ID.parse().expect("course id"),
        "Rust 101",
    )];
    list
}

async fn call(
    query: MockCourseListQuery,
    command: MockCourseListCommand,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state_with_bookmarks(ports(query, command))))
            .configure(configure_extractors)
            .configure(configure),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

#[actix_web::test]
async fn list_translates_page_and_exclusions() {
    let mut query = MockCourseListQuery::new();
    query
        .expect_fetch()
        .with(
            eq([ListField::Courses, ListField::CreatedAt]
                .into_iter()
                .collect::<FieldMask>()),
            eq(Page::new(25, 50)),
        )
        .times(1)
        .returning(|_, _| Ok(vec![hydrated_list()]));

    let (status, body) = call(
        query,
        MockCourseListCommand::new(),
        actix_test::TestRequest::get().uri("/bookmark?page=3&exclude=courses,created_at"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 3);
    assert_eq!(body["per_page"], 25);
    assert_eq!(body["data"][0]["id"], LIST_ID);
}

#[actix_web::test]
async fn list_rejects_unknown_exclusions_before_reading() {
    let (status, body) = call(
        MockCourseListQuery::new(),
        MockCourseListCommand::new(),
        actix_test::TestRequest::get().uri("/bookmark?exclude=password"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "exclude");
}

#[actix_web::test]
async fn list_rejects_non_numeric_pages() {
    let (status, body) = call(
        MockCourseListQuery::new(),
        MockCourseListCommand::new(),
        actix_test::TestRequest::get().uri("/bookmark?page=first"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_query");
}

#[actix_web::test]
async fn fetch_by_id_renders_course_names() {
    let mut query = MockCourseListQuery::new();
    query
        .expect_fetch_by_id()
        .withf(|id, mask| id == LIST_ID && mask.is_empty())
        .times(1)
        .returning(|_, _| Ok(hydrated_list()));

    let (status, body) = call(
        query,
        MockCourseListCommand::new(),
        actix_test::TestRequest::get().uri(&format!("/bookmark/{LIST_ID}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "42");
    assert_eq!(
        body["courses"],
        json!([{ "id": COURSE_ID, "name": "Rust 101" }])
    );
    assert_eq!(body["created_at"], "2024-11-04T12:00:00+00:00");
}

#[actix_web::test]
async fn fetch_by_id_maps_identifier_errors_to_bad_request() {
    let mut query = MockCourseListQuery::new();
    query
        .expect_fetch_by_id()
        .returning(|_, _| Err(Error::invalid_identifier("invalid id `terekjkdfjdfhd`")));

    let (status, body) = call(
        query,
        MockCourseListCommand::new(),
        actix_test::TestRequest::get().uri("/bookmark/terekjkdfjdfhd"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_identifier");
}

#[actix_web::test]
async fn fetch_by_user_maps_missing_lists_to_not_found() {
    let mut query = MockCourseListQuery::new();
    query
        .expect_fetch_by_user_id()
        .withf(|user_id, _| user_id == "404")
        .returning(|_, _| Err(Error::not_found("bookmark list not found")));

    let (status, _) = call(
        query,
        MockCourseListCommand::new(),
        actix_test::TestRequest::get().uri("/bookmark/u/404"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_returns_the_stored_list() {
    let mut command = MockCourseListCommand::new();
    command
        .expect_create()
        .withf(|request| request.user_id == "42" && request.course_ids == [COURSE_ID])
        .times(1)
        .returning(|_| Ok(hydrated_list()));

    let (status, body) = call(
        MockCourseListQuery::new(),
        command,
        actix_test::TestRequest::post()
            .uri("/bookmark")
            .set_json(json!({ "user_id": "42", "courses": [{ "id": COURSE_ID }] })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], LIST_ID);
}

#[actix_web::test]
async fn create_requires_user_id() {
    let (status, body) = call(
        MockCourseListQuery::new(),
        MockCourseListCommand::new(),
        actix_test::TestRequest::post()
            .uri("/bookmark")
            .set_json(json!({ "courses": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "user_id");
}

#[actix_web::test]
async fn malformed_bodies_use_the_error_envelope() {
    let (status, body) = call(
        MockCourseListQuery::new(),
        MockCourseListCommand::new(),
        actix_test::TestRequest::patch()
            .uri("/bookmark/course/add/42")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_body");
}

#[actix_web::test]
async fn repeated_adds_surface_as_conflict() {
    let mut command = MockCourseListCommand::new();
    command
        .expect_add_courses()
        .withf(|user_id, selection| user_id == "42" && selection.course_ids == [COURSE_ID])
        .returning(|_, _| Err(Error::not_modified("bookmark list unchanged")));

    let (status, body) = call(
        MockCourseListQuery::new(),
        command,
        actix_test::TestRequest::patch()
            .uri("/bookmark/course/add/42")
            .set_json(json!({ "user_id": "42", "courses": [{ "id": COURSE_ID }] })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "not_modified");
}

#[actix_web::test]
async fn add_uses_the_path_owner_not_the_body() {
    let mut command = MockCourseListCommand::new();
    command
        .expect_add_courses()
        .withf(|user_id, _| user_id == "42")
        .times(1)
        .returning(|_, _| Ok(true));

    let (status, body) = call(
        MockCourseListQuery::new(),
        command,
        actix_test::TestRequest::patch()
            .uri("/bookmark/course/add/42")
            .set_json(json!({ "user_id": "someone-else", "courses": [{ "id": COURSE_ID }] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");
}

#[actix_web::test]
async fn revoke_acknowledges_success() {
    let mut command = MockCourseListCommand::new();
    command
        .expect_revoke_courses()
        .times(1)
        .returning(|_, _| Ok(true));

    let (status, body) = call(
        MockCourseListQuery::new(),
        command,
        actix_test::TestRequest::delete()
            .uri("/bookmark/course/delete/42")
            .set_json(json!({ "user_id": "42", "courses": [{ "id": COURSE_ID }] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "success" }));
}

#[actix_web::test]
async fn delete_passes_the_raw_identifier() {
    let mut command = MockCourseListCommand::new();
    command
        .expect_delete()
        .withf(|id| id == LIST_ID)
        .times(1)
        .returning(|_| Ok(true));

    let (status, _) = call(
        MockCourseListQuery::new(),
        command,
        actix_test::TestRequest::delete().uri(&format!("/bookmark/{LIST_ID}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn internal_failures_are_redacted() {
    let mut query = MockCourseListQuery::new();
    query
        .expect_fetch_by_user_id()
        .returning(|_, _| Err(Error::internal("relation \"bookmarks\" does not exist")));

    let (status, body) = call(
        query,
        MockCourseListCommand::new(),
        actix_test::TestRequest::get().uri("/bookmark/u/42"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], serde_json::to_value(ErrorCode::InternalError).expect("code"));
    assert_eq!(body["message"], "Internal server error");
}
