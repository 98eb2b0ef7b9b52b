//! Port for the external course catalogue.
//!
//! The catalogue owns course metadata. Course lists only store identifiers and
//! ask the catalogue for display data when a single list is read.

use async_trait::async_trait;

use crate::domain::{CourseRef, ObjectId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue adapters.
    pub enum CourseCatalogueError {
        /// The catalogue could not be reached.
        Transport { message: String } => "course catalogue transport failed: {message}",
        /// The catalogue did not answer in time.
        Timeout { message: String } => "course catalogue timed out: {message}",
        /// The catalogue answered with a failure status.
        Status { status: u16, message: String } => "course catalogue returned status {status}: {message}",
        /// The catalogue answer could not be decoded.
        Decode { message: String } => "course catalogue response invalid: {message}",
    }
}

/// Read access to catalogue course metadata.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseCatalogue: Send + Sync {
    /// Courses known to the catalogue among `course_ids`.
    ///
    /// Unknown identifiers are simply absent from the answer. Implementations
    /// return an empty list for empty input without contacting the catalogue.
    async fn list(&self, course_ids: &[ObjectId]) -> Result<Vec<CourseRef>, CourseCatalogueError>;
}
