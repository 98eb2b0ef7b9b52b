//! Behavioural switches that distinguish the bookmark and cart flavours.

use crate::domain::ObjectId;

/// What to do with caller-supplied identifiers that fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedIdPolicy {
    /// Drop the identifier.
    Skip,
    /// Replace it with [`ObjectId::NIL`].
    Nil,
}

impl MalformedIdPolicy {
    /// Parse `raw` identifiers according to the policy.
    ///
    /// # Examples
    /// ```
    /// use course_lists::domain::{MalformedIdPolicy, ObjectId};
    ///
    /// let raw = ["5f1b7c3e9d1a2b3c4d5e6f70", "oops"];
    /// assert_eq!(MalformedIdPolicy::Skip.resolve(raw).len(), 1);
    /// assert_eq!(MalformedIdPolicy::Nil.resolve(raw)[1], ObjectId::NIL);
    /// ```
    pub fn resolve<'a>(self, raw: impl IntoIterator<Item = &'a str>) -> Vec<ObjectId> {
        match self {
            Self::Skip => raw.into_iter().filter_map(|id| id.parse().ok()).collect(),
            Self::Nil => raw.into_iter().map(ObjectId::parse_or_nil).collect(),
        }
    }
}

/// Per-flavour orchestration rules applied by
/// [`CourseListService`](crate::domain::CourseListService).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseListPolicy {
    /// Adding courses for a user without a list creates the list.
    pub auto_vivify_on_missing: bool,
    /// An add that changes nothing still succeeds.
    pub tolerate_zero_effect_add: bool,
    /// A revoke that changes nothing still succeeds.
    pub tolerate_zero_effect_revoke: bool,
    /// Add and revoke reject requests without course identifiers.
    pub require_non_empty_courses: bool,
    /// Identifier handling on add and revoke.
    pub malformed_ids: MalformedIdPolicy,
    /// Identifier handling on create.
    pub malformed_ids_on_create: MalformedIdPolicy,
    /// Whole lists may be deleted.
    pub supports_delete: bool,
}

impl CourseListPolicy {
    /// Bookmarks surface zero-effect adds and accept empty selections.
    #[must_use]
    pub const fn bookmark() -> Self {
        Self {
            auto_vivify_on_missing: true,
            tolerate_zero_effect_add: false,
            tolerate_zero_effect_revoke: true,
            require_non_empty_courses: false,
            malformed_ids: MalformedIdPolicy::Skip,
            malformed_ids_on_create: MalformedIdPolicy::Nil,
            supports_delete: true,
        }
    }

    /// Carts swallow zero-effect adds, demand a selection and cannot be
    /// deleted.
    #[must_use]
    pub const fn cart() -> Self {
        Self {
            auto_vivify_on_missing: true,
            tolerate_zero_effect_add: true,
            tolerate_zero_effect_revoke: true,
            require_non_empty_courses: true,
            malformed_ids: MalformedIdPolicy::Skip,
            malformed_ids_on_create: MalformedIdPolicy::Nil,
            supports_delete: false,
        }
    }
}
