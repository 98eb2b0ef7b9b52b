//! Driving port for reading course lists.

use async_trait::async_trait;

use crate::domain::{CourseList, Error, FieldMask, Page};

/// Read side of a course list flavour, consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseListQuery: Send + Sync {
    /// Page through live lists. Course names are not resolved.
    async fn fetch(&self, mask: FieldMask, page: Page) -> Result<Vec<CourseList>, Error>;

    /// Fetch one list by its textual identifier with course names resolved.
    ///
    /// # Errors
    ///
    /// `InvalidIdentifier` for malformed `id`, `NotFound` when absent and
    /// `ServiceUnavailable` when the catalogue cannot be reached.
    async fn fetch_by_id(&self, id: &str, mask: FieldMask) -> Result<CourseList, Error>;

    /// Fetch the list owned by `user_id` with course names resolved.
    async fn fetch_by_user_id(&self, user_id: &str, mask: FieldMask)
    -> Result<CourseList, Error>;
}
