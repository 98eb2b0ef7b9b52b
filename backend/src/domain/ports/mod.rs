//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`CourseListRepository`, `CourseCatalogue`) are implemented by
//! outbound adapters. Driving ports (`CourseListQuery`, `CourseListCommand`)
//! are implemented by the domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod course_catalogue;
mod course_list_command;
mod course_list_query;
mod course_list_repository;

#[cfg(test)]
pub use course_catalogue::MockCourseCatalogue;
pub use course_catalogue::{CourseCatalogue, CourseCatalogueError};
#[cfg(test)]
pub use course_list_command::MockCourseListCommand;
pub use course_list_command::{CourseListCommand, CourseSelection, CreateCourseListRequest};
#[cfg(test)]
pub use course_list_query::MockCourseListQuery;
pub use course_list_query::CourseListQuery;
#[cfg(test)]
pub use course_list_repository::MockCourseListRepository;
pub use course_list_repository::{CourseListRepository, CourseListRepositoryError, UpdateOutcome};
