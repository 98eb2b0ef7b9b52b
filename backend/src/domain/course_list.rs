//! Course list aggregate shared by bookmarks and carts.
//!
//! Both flavours store the same shape: one list per user holding an ordered,
//! duplicate-free sequence of course references. Only the identifiers are
//! authoritative; display names are filled in from the course catalogue when a
//! single list is read.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::ObjectId;

/// Number of lists returned per page by the listing endpoint.
pub const DEFAULT_PAGE_SIZE: u64 = 25;

/// Which of the two independent collections a list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourseListKind {
    Bookmark,
    Cart,
}

impl CourseListKind {
    /// Storage collection (table) name.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Bookmark => "bookmarks",
            Self::Cart => "carts",
        }
    }

    /// Singular label used in messages and log fields.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bookmark => "bookmark",
            Self::Cart => "cart",
        }
    }
}

impl fmt::Display for CourseListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference to a course owned by the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRef {
    pub id: ObjectId,
    pub name: String,
}

impl CourseRef {
    pub fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// A reference as persisted: identifier only.
    #[must_use]
    pub fn unnamed(id: ObjectId) -> Self {
        Self {
            id,
            name: String::new(),
        }
    }
}

/// A user's bookmark list or cart.
///
/// ## Invariants
/// - `courses` never holds two entries with the same `id`.
/// - A list with `deleted_at` set is invisible to reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseList {
    pub id: ObjectId,
    pub user_id: String,
    pub courses: Vec<CourseRef>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CourseList {
    /// A fresh list stamped with `now`.
    ///
    /// Duplicate identifiers in `course_ids` keep their first position.
    pub fn new(
        id: ObjectId,
        user_id: impl Into<String>,
        course_ids: impl IntoIterator<Item = ObjectId>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut ids = Vec::new();
        merge_course_ids(&mut ids, course_ids);
        Self {
            id,
            user_id: user_id.into(),
            courses: ids.into_iter().map(CourseRef::unnamed).collect(),
            created_at: Some(now),
            updated_at: Some(now),
            deleted_at: None,
        }
    }

    /// Identifiers in stored order.
    #[must_use]
    pub fn course_ids(&self) -> Vec<ObjectId> {
        self.courses.iter().map(|course| course.id).collect()
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Clear every field excluded by `mask`.
    ///
    /// The identifier is always kept so projected lists stay addressable.
    #[must_use]
    pub fn project(mut self, mask: &FieldMask) -> Self {
        if mask.excludes(ListField::UserId) {
            self.user_id.clear();
        }
        if mask.excludes(ListField::Courses) {
            self.courses.clear();
        }
        if mask.excludes(ListField::CreatedAt) {
            self.created_at = None;
        }
        if mask.excludes(ListField::UpdatedAt) {
            self.updated_at = None;
        }
        if mask.excludes(ListField::DeletedAt) {
            self.deleted_at = None;
        }
        self
    }
}

/// Append each identifier not already present, preserving order.
///
/// Returns `true` when at least one identifier was added.
pub fn merge_course_ids(
    existing: &mut Vec<ObjectId>,
    incoming: impl IntoIterator<Item = ObjectId>,
) -> bool {
    let before = existing.len();
    for id in incoming {
        if !existing.contains(&id) {
            existing.push(id);
        }
    }
    existing.len() != before
}

/// Remove every occurrence of the given identifiers.
///
/// Returns `true` when at least one identifier was removed.
pub fn remove_course_ids(existing: &mut Vec<ObjectId>, revoked: &[ObjectId]) -> bool {
    let before = existing.len();
    existing.retain(|id| !revoked.contains(id));
    existing.len() != before
}

/// Fields a caller may exclude from listing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListField {
    UserId,
    Courses,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

impl ListField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserId => "user_id",
            Self::Courses => "courses",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::DeletedAt => "deleted_at",
        }
    }
}

/// Unknown field name in an exclusion list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field `{0}`")]
pub struct UnknownFieldError(pub String);

impl FromStr for ListField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user_id" => Ok(Self::UserId),
            "courses" => Ok(Self::Courses),
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "deleted_at" => Ok(Self::DeletedAt),
            other => Err(UnknownFieldError(other.to_owned())),
        }
    }
}

/// Set of fields to clear from returned lists.
///
/// # Examples
/// ```
/// use course_lists::domain::{FieldMask, ListField};
///
/// let mask = FieldMask::parse_csv("courses, created_at").expect("known fields");
/// assert!(mask.excludes(ListField::Courses));
/// assert!(!mask.excludes(ListField::UserId));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMask(BTreeSet<ListField>);

impl FieldMask {
    /// Mask that excludes nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse a comma separated list of field names; blanks are ignored.
    pub fn parse_csv(raw: &str) -> Result<Self, UnknownFieldError> {
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse)
            .collect()
    }

    #[must_use]
    pub fn excludes(&self, field: ListField) -> bool {
        self.0.contains(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = ListField> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ListField> for FieldMask {
    fn from_iter<T: IntoIterator<Item = ListField>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Offset pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: u64,
    skip: u64,
}

impl Page {
    #[must_use]
    pub const fn new(limit: u64, skip: u64) -> Self {
        Self { limit, skip }
    }

    /// One-based page number; `0` is treated as the first page.
    ///
    /// # Examples
    /// ```
    /// use course_lists::domain::Page;
    ///
    /// let page = Page::numbered(3, 25);
    /// assert_eq!((page.limit(), page.skip()), (25, 50));
    /// assert_eq!(Page::numbered(0, 25), Page::numbered(1, 25));
    /// ```
    #[must_use]
    pub fn numbered(page: u64, per_page: u64) -> Self {
        let index = page.max(1) - 1;
        Self::new(per_page, index.saturating_mul(per_page))
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.skip
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::numbered(1, DEFAULT_PAGE_SIZE)
    }
}
