//! Reqwest-backed course catalogue adapter.
//!
//! Owns transport concerns only: request encoding, the per-call timeout,
//! status mapping and response decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tokio::net::TcpStream;
use tracing::debug;

use super::dto::{ListCoursesRequestDto, ListCoursesResponseDto};
use crate::domain::ports::{CourseCatalogue, CourseCatalogueError};
use crate::domain::{CourseRef, ObjectId};

const LIST_PATH: &str = "courses/list";

/// Catalogue client bound to one `http://host:port` endpoint.
#[derive(Debug, Clone)]
pub struct HttpCourseCatalogue {
    client: Client,
    base_url: Url,
    list_url: Url,
    timeout: Duration,
}

impl HttpCourseCatalogue {
    /// Build a client for `http://{host}:{port}/`.
    ///
    /// # Errors
    ///
    /// [`CourseCatalogueError::Transport`] when the address does not form a
    /// valid URL or the HTTP client cannot be built.
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self, CourseCatalogueError> {
        let base_url = Url::parse(&format!("http://{host}:{port}/"))
            .map_err(|err| CourseCatalogueError::transport(format!("invalid address: {err}")))?;
        Self::with_base_url(base_url, timeout)
    }

    /// Build a client for an explicit base URL.
    pub fn with_base_url(base_url: Url, timeout: Duration) -> Result<Self, CourseCatalogueError> {
        let list_url = base_url
            .join(LIST_PATH)
            .map_err(|err| CourseCatalogueError::transport(format!("invalid address: {err}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CourseCatalogueError::transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            list_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check that the catalogue accepts TCP connections.
    ///
    /// Used once at startup; the service refuses to run without a reachable
    /// catalogue.
    pub async fn probe(&self) -> Result<(), CourseCatalogueError> {
        let host = self
            .base_url
            .host_str()
            .ok_or_else(|| CourseCatalogueError::transport("catalogue address has no host"))?;
        let port = self.base_url.port_or_known_default().unwrap_or(80);
        match tokio::time::timeout(self.timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(err)) => Err(CourseCatalogueError::transport(format!(
                "connect {host}:{port}: {err}"
            ))),
            Err(_) => Err(CourseCatalogueError::timeout(format!(
                "connect {host}:{port} exceeded {:?}",
                self.timeout
            ))),
        }
    }
}

#[async_trait]
impl CourseCatalogue for HttpCourseCatalogue {
    async fn list(&self, course_ids: &[ObjectId]) -> Result<Vec<CourseRef>, CourseCatalogueError> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(self.list_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&ListCoursesRequestDto::new(course_ids))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let courses = parse_courses(body.as_ref())?;
        debug!(
            requested = course_ids.len(),
            known = courses.len(),
            "course catalogue lookup"
        );
        Ok(courses)
    }
}

fn parse_courses(body: &[u8]) -> Result<Vec<CourseRef>, CourseCatalogueError> {
    let decoded: ListCoursesResponseDto = serde_json::from_slice(body).map_err(|err| {
        CourseCatalogueError::decode(format!("invalid catalogue JSON payload: {err}"))
    })?;
    Ok(decoded.into_domain())
}

fn map_transport_error(error: reqwest::Error) -> CourseCatalogueError {
    if error.is_timeout() {
        CourseCatalogueError::timeout(error.to_string())
    } else {
        CourseCatalogueError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CourseCatalogueError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CourseCatalogueError::timeout(format!("status {}", status.as_u16()))
        }
        _ => CourseCatalogueError::status(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("{preview}...")
    } else {
        compact
    }
}
