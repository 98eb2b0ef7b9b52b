//! Driving port for changing course lists.
//!
//! Requests carry raw caller-supplied identifiers; parsing happens inside the
//! service according to the flavour's
//! [`CourseListPolicy`](crate::domain::CourseListPolicy).

use async_trait::async_trait;

use crate::domain::{CourseList, Error};

/// Request to create a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCourseListRequest {
    pub user_id: String,
    pub course_ids: Vec<String>,
}

/// Course identifiers to add to or revoke from a user's list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseSelection {
    pub course_ids: Vec<String>,
}

impl CourseSelection {
    pub fn new<I, S>(course_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            course_ids: course_ids.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.course_ids.is_empty()
    }
}

/// Write side of a course list flavour, consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseListCommand: Send + Sync {
    /// Create a list for `request.user_id`.
    ///
    /// # Errors
    ///
    /// `DuplicateKey` when the user already owns a list of this flavour.
    async fn create(&self, request: CreateCourseListRequest) -> Result<CourseList, Error>;

    /// Add courses to the list owned by `user_id`, creating it when the
    /// flavour allows.
    async fn add_courses(&self, user_id: &str, selection: CourseSelection) -> Result<bool, Error>;

    /// Remove courses from the list owned by `user_id`.
    async fn revoke_courses(
        &self,
        user_id: &str,
        selection: CourseSelection,
    ) -> Result<bool, Error>;

    /// Delete the list with the textual identifier `id`.
    async fn delete(&self, id: &str) -> Result<bool, Error>;
}
