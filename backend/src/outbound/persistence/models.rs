//! Internal Diesel row types.
//!
//! Bookmarks and carts share one column layout, so a single row struct serves
//! both tables. Rows never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{CourseList, CourseRef, ObjectId, ObjectIdError};

/// A `bookmarks` or `carts` row in column order.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct CourseListRow {
    pub id: Vec<u8>,
    pub user_id: String,
    pub course_ids: Vec<Vec<u8>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CourseListRow {
    pub(crate) fn into_domain(self) -> Result<CourseList, ObjectIdError> {
        Ok(CourseList {
            id: ObjectId::from_slice(&self.id)?,
            user_id: self.user_id,
            courses: decode_course_ids(self.course_ids)?
                .into_iter()
                .map(CourseRef::unnamed)
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

pub(crate) fn decode_course_ids(raw: Vec<Vec<u8>>) -> Result<Vec<ObjectId>, ObjectIdError> {
    raw.iter().map(|bytes| ObjectId::from_slice(bytes)).collect()
}

pub(crate) fn encode_course_ids(ids: &[ObjectId]) -> Vec<Vec<u8>> {
    ids.iter().map(|id| id.bytes().to_vec()).collect()
}
