//! Wire types for the course catalogue's list endpoint.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{CourseRef, ObjectId};

#[derive(Debug, Serialize)]
pub(super) struct ListCoursesRequestDto {
    pub(super) courses_id: Vec<String>,
}

impl ListCoursesRequestDto {
    pub(super) fn new(course_ids: &[ObjectId]) -> Self {
        Self {
            courses_id: course_ids.iter().map(ObjectId::to_hex).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ListCoursesResponseDto {
    #[serde(default)]
    pub(super) list: Vec<CourseDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CourseDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) name: String,
}

impl ListCoursesResponseDto {
    /// Known courses with parseable identifiers; other entries are dropped.
    pub(super) fn into_domain(self) -> Vec<CourseRef> {
        self.list
            .into_iter()
            .filter_map(|course| match course.id.parse::<ObjectId>() {
                Ok(id) => Some(CourseRef::new(id, course.name)),
                Err(err) => {
                    warn!(id = %course.id, error = %err, "skipping catalogue course with invalid id");
                    None
                }
            })
            .collect()
    }
}
