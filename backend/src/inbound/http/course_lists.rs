//! Request and response shapes shared by the bookmark and cart handlers.
//!
//! Both flavours expose the same wire format; the handler modules only differ
//! in routes and in which [`CourseListPorts`] they drive.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CourseSelection, CreateCourseListRequest};
use crate::domain::{CourseList, CourseRef, DEFAULT_PAGE_SIZE, Error, FieldMask, Page};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::CourseListPorts;

/// Course identifier as sent by clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CourseIdDto {
    #[schema(example = "5f1b7c3e9d1a2b3c4d5e6f70")]
    pub id: String,
}

/// Body of create, add and revoke requests.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CourseListRequest {
    #[schema(example = "42")]
    pub user_id: Option<String>,
    pub courses: Option<Vec<CourseIdDto>>,
}

fn missing_field_error(field: &str) -> Error {
    Error::invalid_request(format!("missing field `{field}`")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

impl CourseListRequest {
    fn into_parts(self) -> Result<(String, Vec<String>), Error> {
        let user_id = self
            .user_id
            .ok_or_else(|| missing_field_error("user_id"))?;
        let courses = self
            .courses
            .ok_or_else(|| missing_field_error("courses"))?;
        Ok((user_id, courses.into_iter().map(|course| course.id).collect()))
    }

    /// Validate the body and keep only the course identifiers.
    ///
    /// `user_id` must be present even though add and revoke take the owner
    /// from the path.
    pub fn into_selection(self) -> Result<CourseSelection, Error> {
        let (_user_id, course_ids) = self.into_parts()?;
        Ok(CourseSelection::new(course_ids))
    }

    pub fn into_create_request(self) -> Result<CreateCourseListRequest, Error> {
        let (user_id, course_ids) = self.into_parts()?;
        Ok(CreateCourseListRequest {
            user_id,
            course_ids,
        })
    }
}

/// Course entry in a response.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CourseDto {
    #[schema(example = "5f1b7c3e9d1a2b3c4d5e6f70")]
    pub id: String,
    #[schema(example = "Rust 101")]
    pub name: String,
}

impl From<CourseRef> for CourseDto {
    fn from(value: CourseRef) -> Self {
        Self {
            id: value.id.to_hex(),
            name: value.name,
        }
    }
}

/// A bookmark list or cart as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CourseListResponse {
    #[schema(example = "5f1b7c3e9d1a2b3c4d5e6f71")]
    pub id: String,
    pub user_id: String,
    pub courses: Vec<CourseDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

impl From<CourseList> for CourseListResponse {
    fn from(value: CourseList) -> Self {
        Self {
            id: value.id.to_hex(),
            user_id: value.user_id,
            courses: value.courses.into_iter().map(CourseDto::from).collect(),
            created_at: value.created_at.map(|at| at.to_rfc3339()),
            updated_at: value.updated_at.map(|at| at.to_rfc3339()),
            deleted_at: value.deleted_at.map(|at| at.to_rfc3339()),
        }
    }
}

/// One page of lists.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CourseListPage {
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 25)]
    pub per_page: u64,
    pub data: Vec<CourseListResponse>,
}

/// Acknowledgement body for writes.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "success")]
    pub message: String,
}

impl MessageResponse {
    pub fn success() -> Self {
        Self {
            message: "success".to_owned(),
        }
    }
}

/// Query string accepted by listing endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// One-based page number; `0` and absence both mean the first page.
    pub page: Option<u64>,
    /// Comma-separated field names to leave out of each list.
    pub exclude: Option<String>,
}

impl ListQuery {
    fn page_number(&self) -> u64 {
        self.page.filter(|page| *page > 0).unwrap_or(1)
    }

    fn field_mask(&self) -> Result<FieldMask, Error> {
        match self.exclude.as_deref() {
            None => Ok(FieldMask::none()),
            Some(raw) => FieldMask::parse_csv(raw).map_err(|err| {
                Error::invalid_request(err.to_string()).with_details(json!({
                    "field": "exclude",
                    "value": err.0,
                    "code": "unknown_field",
                }))
            }),
        }
    }
}

pub(crate) async fn list(ports: &CourseListPorts, query: ListQuery) -> ApiResult<HttpResponse> {
    let mask = query.field_mask()?;
    let page = query.page_number();
    let lists = ports
        .query
        .fetch(mask, Page::numbered(page, DEFAULT_PAGE_SIZE))
        .await?;
    Ok(HttpResponse::Ok().json(CourseListPage {
        page,
        per_page: DEFAULT_PAGE_SIZE,
        data: lists.into_iter().map(CourseListResponse::from).collect(),
    }))
}

pub(crate) async fn fetch_by_id(ports: &CourseListPorts, id: &str) -> ApiResult<HttpResponse> {
    let list = ports.query.fetch_by_id(id, FieldMask::none()).await?;
    Ok(HttpResponse::Ok().json(CourseListResponse::from(list)))
}

pub(crate) async fn fetch_by_user_id(
    ports: &CourseListPorts,
    user_id: &str,
) -> ApiResult<HttpResponse> {
    let list = ports
        .query
        .fetch_by_user_id(user_id, FieldMask::none())
        .await?;
    Ok(HttpResponse::Ok().json(CourseListResponse::from(list)))
}

pub(crate) async fn create(
    ports: &CourseListPorts,
    payload: web::Json<CourseListRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner().into_create_request()?;
    let list = ports.command.create(request).await?;
    Ok(HttpResponse::Created().json(CourseListResponse::from(list)))
}

pub(crate) async fn add_courses(
    ports: &CourseListPorts,
    user_id: &str,
    payload: web::Json<CourseListRequest>,
) -> ApiResult<HttpResponse> {
    let selection = payload.into_inner().into_selection()?;
    ports.command.add_courses(user_id, selection).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::success()))
}

pub(crate) async fn revoke_courses(
    ports: &CourseListPorts,
    user_id: &str,
    payload: web::Json<CourseListRequest>,
) -> ApiResult<HttpResponse> {
    let selection = payload.into_inner().into_selection()?;
    ports.command.revoke_courses(user_id, selection).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::success()))
}

pub(crate) async fn delete(ports: &CourseListPorts, id: &str) -> ApiResult<HttpResponse> {
    ports.command.delete(id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::success()))
}
