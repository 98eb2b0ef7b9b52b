//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects the bookmark, cart and health endpoints together with
//! the request, response and error payload schemas. Swagger UI serves it in
//! debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::course_lists::{
    CourseDto, CourseIdDto, CourseListPage, CourseListRequest, CourseListResponse,
    MessageResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Course lists API",
        description = "Per-user bookmark lists and carts enriched with course catalogue data."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::bookmarks::list_bookmarks,
        crate::inbound::http::bookmarks::create_bookmark,
        crate::inbound::http::bookmarks::get_bookmark,
        crate::inbound::http::bookmarks::get_user_bookmark,
        crate::inbound::http::bookmarks::add_bookmark_courses,
        crate::inbound::http::bookmarks::revoke_bookmark_courses,
        crate::inbound::http::bookmarks::delete_bookmark,
        crate::inbound::http::carts::get_cart,
        crate::inbound::http::carts::get_user_cart,
        crate::inbound::http::carts::add_cart_courses,
        crate::inbound::http::carts::revoke_cart_courses,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CourseIdDto,
        CourseListRequest,
        CourseDto,
        CourseListResponse,
        CourseListPage,
        MessageResponse
    )),
    tags(
        (name = "bookmarks", description = "Bookmark lists"),
        (name = "carts", description = "Shopping carts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
