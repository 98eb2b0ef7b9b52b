//! Port abstraction for course list persistence.
//!
//! One repository instance serves one [`CourseListKind`](crate::domain::CourseListKind);
//! bookmarks and carts never share rows. Mutations are atomic per list: an add
//! is a set union, a revoke a set difference, and neither needs a lock held by
//! the caller.

use async_trait::async_trait;

use crate::domain::{CourseList, FieldMask, ObjectId, Page};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading or writing course lists.
    pub enum CourseListRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "course list repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "course list repository query failed: {message}",
        /// No live list matched the key.
        NotFound { message: String } => "course list not found: {message}",
        /// The user already owns a list of this kind.
        DuplicateKey { message: String } => "course list already exists: {message}",
        /// The list matched but the mutation changed nothing.
        NotModified { message: String } => "course list not modified: {message}",
    }
}

/// Result of a mutation that is allowed to be a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Modified,
    Unchanged,
}

/// Storage for one flavour of course list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseListRepository: Send + Sync {
    /// Live lists in insertion order, projected through `mask`.
    async fn fetch(
        &self,
        mask: &FieldMask,
        page: Page,
    ) -> Result<Vec<CourseList>, CourseListRepositoryError>;

    /// The live list with `id`.
    ///
    /// # Errors
    ///
    /// [`CourseListRepositoryError::NotFound`] when no live list matches.
    async fn fetch_by_id(
        &self,
        id: &ObjectId,
        mask: &FieldMask,
    ) -> Result<CourseList, CourseListRepositoryError>;

    /// The live list owned by `user_id`.
    async fn fetch_by_user_id(
        &self,
        user_id: &str,
        mask: &FieldMask,
    ) -> Result<CourseList, CourseListRepositoryError>;

    /// Insert `list` in its own transaction and return its identifier.
    ///
    /// # Errors
    ///
    /// [`CourseListRepositoryError::DuplicateKey`] when `user_id` already owns
    /// a list; nothing is written in that case.
    async fn create(&self, list: &CourseList) -> Result<ObjectId, CourseListRepositoryError>;

    /// Union `course_ids` into the list owned by `user_id`.
    ///
    /// # Errors
    ///
    /// [`CourseListRepositoryError::NotFound`] when the user has no live list;
    /// [`CourseListRepositoryError::NotModified`] when every identifier was
    /// already present.
    async fn add_courses(
        &self,
        user_id: &str,
        course_ids: &[ObjectId],
    ) -> Result<(), CourseListRepositoryError>;

    /// Remove `course_ids` from the list owned by `user_id`.
    ///
    /// A revoke that removes nothing is reported as
    /// [`UpdateOutcome::Unchanged`], not as an error.
    async fn revoke_courses(
        &self,
        user_id: &str,
        course_ids: &[ObjectId],
    ) -> Result<UpdateOutcome, CourseListRepositoryError>;

    /// Hard-delete the list with `id`.
    async fn delete(&self, id: &ObjectId) -> Result<(), CourseListRepositoryError>;
}
