//! In-memory `CourseListRepository`.
//!
//! Mirrors the Diesel adapter's semantics (live-row filtering, unique users,
//! set-union adds that report no-ops, hard deletes) behind a single mutex.
//! Integration tests use it to drive the service end to end without a
//! database.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{CourseListRepository, CourseListRepositoryError, UpdateOutcome};
use crate::domain::{CourseList, CourseRef, FieldMask, ObjectId, Page, merge_course_ids, remove_course_ids};

/// Insertion-ordered list store.
#[derive(Clone)]
pub struct InMemoryCourseListRepository {
    lists: Arc<Mutex<Vec<CourseList>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCourseListRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            lists: Arc::new(Mutex::new(Vec::new())),
            clock,
        }
    }

    /// Number of stored lists, deleted or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Store `list` as-is, bypassing uniqueness checks.
    pub fn seed(&self, list: CourseList) {
        self.lock().push(list);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CourseList>> {
        self.lists
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn update_live<F>(
        &self,
        user_id: &str,
        apply: F,
    ) -> Result<bool, CourseListRepositoryError>
    where
        F: FnOnce(&mut Vec<ObjectId>) -> bool,
    {
        let mut lists = self.lock();
        let list = lists
            .iter_mut()
            .find(|list| list.is_live() && list.user_id == user_id)
            .ok_or_else(|| CourseListRepositoryError::not_found(format!("user {user_id}")))?;
        let mut ids = list.course_ids();
        if !apply(&mut ids) {
            return Ok(false);
        }
        list.courses = ids.into_iter().map(CourseRef::unnamed).collect();
        list.updated_at = Some(self.clock.utc());
        Ok(true)
    }
}

#[async_trait]
impl CourseListRepository for InMemoryCourseListRepository {
    async fn fetch(
        &self,
        mask: &FieldMask,
        page: Page,
    ) -> Result<Vec<CourseList>, CourseListRepositoryError> {
        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(self
            .lock()
            .iter()
            .filter(|list| list.is_live())
            .skip(skip)
            .take(limit)
            .map(|list| list.clone().project(mask))
            .collect())
    }

    async fn fetch_by_id(
        &self,
        id: &ObjectId,
        mask: &FieldMask,
    ) -> Result<CourseList, CourseListRepositoryError> {
        self.lock()
            .iter()
            .find(|list| list.is_live() && list.id == *id)
            .map(|list| list.clone().project(mask))
            .ok_or_else(|| CourseListRepositoryError::not_found(format!("id {id}")))
    }

    async fn fetch_by_user_id(
        &self,
        user_id: &str,
        mask: &FieldMask,
    ) -> Result<CourseList, CourseListRepositoryError> {
        self.lock()
            .iter()
            .find(|list| list.is_live() && list.user_id == user_id)
            .map(|list| list.clone().project(mask))
            .ok_or_else(|| CourseListRepositoryError::not_found(format!("user {user_id}")))
    }

    async fn create(&self, list: &CourseList) -> Result<ObjectId, CourseListRepositoryError> {
        let mut lists = self.lock();
        if lists
            .iter()
            .any(|stored| stored.user_id == list.user_id || stored.id == list.id)
        {
            return Err(CourseListRepositoryError::duplicate_key(format!(
                "user {}",
                list.user_id
            )));
        }
        let mut stored = list.clone();
        stored.courses = list.course_ids().into_iter().map(CourseRef::unnamed).collect();
        lists.push(stored);
        Ok(list.id)
    }

    async fn add_courses(
        &self,
        user_id: &str,
        course_ids: &[ObjectId],
    ) -> Result<(), CourseListRepositoryError> {
        if self.update_live(user_id, |ids| merge_course_ids(ids, course_ids.iter().copied()))? {
            Ok(())
        } else {
            Err(CourseListRepositoryError::not_modified(format!("user {user_id}")))
        }
    }

    async fn revoke_courses(
        &self,
        user_id: &str,
        course_ids: &[ObjectId],
    ) -> Result<UpdateOutcome, CourseListRepositoryError> {
        let changed = self.update_live(user_id, |ids| remove_course_ids(ids, course_ids))?;
        Ok(if changed {
            UpdateOutcome::Modified
        } else {
            UpdateOutcome::Unchanged
        })
    }

    async fn delete(&self, id: &ObjectId) -> Result<(), CourseListRepositoryError> {
        let mut lists = self.lock();
        let before = lists.len();
        lists.retain(|list| list.id != *id);
        if lists.len() == before {
            return Err(CourseListRepositoryError::not_found(format!("id {id}")));
        }
        Ok(())
    }
}
