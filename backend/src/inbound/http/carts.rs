//! Cart HTTP handlers.
//!
//! Carts have no listing, create or delete routes; a cart comes into being on
//! the first add.

use actix_web::{HttpResponse, delete, get, patch, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::course_lists::{
    self, CourseListRequest, CourseListResponse, MessageResponse,
};
use crate::inbound::http::state::HttpState;

/// Fetch a cart by identifier with course names filled in.
#[utoipa::path(
    get,
    path = "/cart/{id}",
    params(("id" = String, Path, description = "24-character hex identifier")),
    responses(
        (status = 200, description = "Cart", body = CourseListResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "No such cart", body = Error),
        (status = 503, description = "Course catalogue unavailable", body = Error)
    ),
    tags = ["carts"],
    operation_id = "getCart"
)]
#[get("/cart/{id}")]
pub async fn get_cart(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    course_lists::fetch_by_id(&state.carts, &id).await
}

/// Fetch the cart owned by a user.
#[utoipa::path(
    get,
    path = "/cart/u/{user_id}",
    params(("user_id" = String, Path, description = "Owner of the cart")),
    responses(
        (status = 200, description = "Cart", body = CourseListResponse),
        (status = 404, description = "User has no cart", body = Error),
        (status = 503, description = "Course catalogue unavailable", body = Error)
    ),
    tags = ["carts"],
    operation_id = "getUserCart"
)]
#[get("/cart/u/{user_id}")]
pub async fn get_user_cart(
    state: web::Data<HttpState>,
    user_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    course_lists::fetch_by_user_id(&state.carts, &user_id).await
}

/// Put courses in a user's cart, creating the cart on first use.
///
/// The owner comes from the path; the body `user_id` must be present but
/// is ignored.
#[utoipa::path(
    patch,
    path = "/cart/course/add/{user_id}",
    params(("user_id" = String, Path, description = "Owner of the cart")),
    request_body = CourseListRequest,
    responses(
        (status = 200, description = "Courses added", body = MessageResponse),
        (status = 400, description = "Invalid request or empty selection", body = Error)
    ),
    tags = ["carts"],
    operation_id = "addCartCourses"
)]
#[patch("/cart/course/add/{user_id}")]
pub async fn add_cart_courses(
    state: web::Data<HttpState>,
    user_id: web::Path<String>,
    payload: web::Json<CourseListRequest>,
) -> ApiResult<HttpResponse> {
    course_lists::add_courses(&state.carts, &user_id, payload).await
}

/// Take courses out of a user's cart.
///
/// The owner comes from the path; the body `user_id` must be present but
/// is ignored.
#[utoipa::path(
    delete,
    path = "/cart/course/revoke/{user_id}",
    params(("user_id" = String, Path, description = "Owner of the cart")),
    request_body = CourseListRequest,
    responses(
        (status = 200, description = "Courses removed", body = MessageResponse),
        (status = 400, description = "Invalid request or empty selection", body = Error),
        (status = 404, description = "User has no cart", body = Error)
    ),
    tags = ["carts"],
    operation_id = "revokeCartCourses"
)]
#[delete("/cart/course/revoke/{user_id}")]
pub async fn revoke_cart_courses(
    state: web::Data<HttpState>,
    user_id: web::Path<String>,
    payload: web::Json<CourseListRequest>,
) -> ApiResult<HttpResponse> {
    course_lists::revoke_courses(&state.carts, &user_id, payload).await
}

/// Register every cart route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_user_cart)
        .service(add_cart_courses)
        .service(revoke_cart_courses)
        .service(get_cart);
}
