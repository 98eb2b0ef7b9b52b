//! Bookmark list HTTP handlers.
//!
//! ```text
//! GET    /bookmark?page=N&exclude=a,b
//! POST   /bookmark
//! GET    /bookmark/{id}
//! GET    /bookmark/u/{user_id}
//! PATCH  /bookmark/course/add/{user_id}
//! DELETE /bookmark/course/delete/{user_id}
//! DELETE /bookmark/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::course_lists::{
    self, CourseListPage, CourseListRequest, CourseListResponse, ListQuery, MessageResponse,
};
use crate::inbound::http::state::HttpState;

/// List live bookmark lists, 25 per page.
#[utoipa::path(
    get,
    path = "/bookmark",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of bookmark lists", body = CourseListPage),
        (status = 400, description = "Unknown excluded field", body = Error),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["bookmarks"],
    operation_id = "listBookmarks"
)]
#[get("/bookmark")]
pub async fn list_bookmarks(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    course_lists::list(&state.bookmarks, query.into_inner()).await
}

/// Create a bookmark list.
#[utoipa::path(
    post,
    path = "/bookmark",
    request_body = CourseListRequest,
    responses(
        (status = 201, description = "Created bookmark list", body = CourseListResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "User already has a bookmark list", body = Error)
    ),
    tags = ["bookmarks"],
    operation_id = "createBookmark"
)]
#[post("/bookmark")]
pub async fn create_bookmark(
    state: web::Data<HttpState>,
    payload: web::Json<CourseListRequest>,
) -> ApiResult<HttpResponse> {
    course_lists::create(&state.bookmarks, payload).await
}

/// Fetch a bookmark list by identifier with course names filled in.
#[utoipa::path(
    get,
    path = "/bookmark/{id}",
    params(("id" = String, Path, description = "24-character hex identifier")),
    responses(
        (status = 200, description = "Bookmark list", body = CourseListResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "No such bookmark list", body = Error),
        (status = 503, description = "Course catalogue unavailable", body = Error)
    ),
    tags = ["bookmarks"],
    operation_id = "getBookmark"
)]
#[get("/bookmark/{id}")]
pub async fn get_bookmark(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    course_lists::fetch_by_id(&state.bookmarks, &id).await
}

/// Fetch the bookmark list owned by a user.
#[utoipa::path(
    get,
    path = "/bookmark/u/{user_id}",
    params(("user_id" = String, Path, description = "Owner of the list")),
    responses(
        (status = 200, description = "Bookmark list", body = CourseListResponse),
        (status = 404, description = "User has no bookmark list", body = Error),
        (status = 503, description = "Course catalogue unavailable", body = Error)
    ),
    tags = ["bookmarks"],
    operation_id = "getUserBookmark"
)]
#[get("/bookmark/u/{user_id}")]
pub async fn get_user_bookmark(
    state: web::Data<HttpState>,
    user_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    course_lists::fetch_by_user_id(&state.bookmarks, &user_id).await
}

/// Bookmark courses for a user, creating the list on first use.
///
/// The owner comes from the path; the body `user_id` must be present but
/// is ignored.
#[utoipa::path(
    patch,
    path = "/bookmark/course/add/{user_id}",
    params(("user_id" = String, Path, description = "Owner of the list")),
    request_body = CourseListRequest,
    responses(
        (status = 200, description = "Courses added", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Every course was already bookmarked", body = Error)
    ),
    tags = ["bookmarks"],
    operation_id = "addBookmarkCourses"
)]
#[patch("/bookmark/course/add/{user_id}")]
pub async fn add_bookmark_courses(
    state: web::Data<HttpState>,
    user_id: web::Path<String>,
    payload: web::Json<CourseListRequest>,
) -> ApiResult<HttpResponse> {
    course_lists::add_courses(&state.bookmarks, &user_id, payload).await
}

/// Remove courses from a user's bookmark list.
///
/// The owner comes from the path; the body `user_id` must be present but
/// is ignored.
#[utoipa::path(
    delete,
    path = "/bookmark/course/delete/{user_id}",
    params(("user_id" = String, Path, description = "Owner of the list")),
    request_body = CourseListRequest,
    responses(
        (status = 200, description = "Courses removed", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "User has no bookmark list", body = Error)
    ),
    tags = ["bookmarks"],
    operation_id = "revokeBookmarkCourses"
)]
#[delete("/bookmark/course/delete/{user_id}")]
pub async fn revoke_bookmark_courses(
    state: web::Data<HttpState>,
    user_id: web::Path<String>,
    payload: web::Json<CourseListRequest>,
) -> ApiResult<HttpResponse> {
    course_lists::revoke_courses(&state.bookmarks, &user_id, payload).await
}

/// Delete a bookmark list.
#[utoipa::path(
    delete,
    path = "/bookmark/{id}",
    params(("id" = String, Path, description = "24-character hex identifier")),
    responses(
        (status = 200, description = "Bookmark list deleted", body = MessageResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "No such bookmark list", body = Error)
    ),
    tags = ["bookmarks"],
    operation_id = "deleteBookmark"
)]
#[delete("/bookmark/{id}")]
pub async fn delete_bookmark(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    course_lists::delete(&state.bookmarks, &id).await
}

/// Register every bookmark route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_bookmarks)
        .service(create_bookmark)
        .service(get_user_bookmark)
        .service(add_bookmark_courses)
        .service(revoke_bookmark_courses)
        .service(get_bookmark)
        .service(delete_bookmark);
}

#[cfg(test)]
#[path = "bookmarks_tests.rs"]
mod tests;
