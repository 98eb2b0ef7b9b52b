//! Course list orchestration.
//!
//! Reads go through the repository and single-list reads are hydrated with
//! catalogue names. Writes touch the repository only. The flavour-specific
//! quirks (auto-creating lists, swallowing no-op adds, refusing deletes) are
//! all driven by the [`CourseListPolicy`] the service was built with.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CourseCatalogue, CourseCatalogueError, CourseListCommand, CourseListQuery,
    CourseListRepository, CourseListRepositoryError, CourseSelection, CreateCourseListRequest,
    UpdateOutcome,
};
use crate::domain::{
    CourseList, CourseListKind, CourseListPolicy, Error, FieldMask, ObjectId, Page,
};

/// Service implementing [`CourseListQuery`] and [`CourseListCommand`] for one
/// flavour.
#[derive(Clone)]
pub struct CourseListService<R, C> {
    kind: CourseListKind,
    policy: CourseListPolicy,
    repository: Arc<R>,
    catalogue: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<R, C> CourseListService<R, C> {
    pub fn new(
        kind: CourseListKind,
        policy: CourseListPolicy,
        repository: Arc<R>,
        catalogue: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            kind,
            policy,
            repository,
            catalogue,
            clock,
        }
    }

    /// Bookmark flavour with [`CourseListPolicy::bookmark`].
    pub fn bookmarks(repository: Arc<R>, catalogue: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            CourseListKind::Bookmark,
            CourseListPolicy::bookmark(),
            repository,
            catalogue,
            clock,
        )
    }

    /// Cart flavour with [`CourseListPolicy::cart`].
    pub fn carts(repository: Arc<R>, catalogue: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            CourseListKind::Cart,
            CourseListPolicy::cart(),
            repository,
            catalogue,
            clock,
        )
    }

    pub fn kind(&self) -> CourseListKind {
        self.kind
    }

    pub fn policy(&self) -> &CourseListPolicy {
        &self.policy
    }
}

impl<R, C> CourseListService<R, C>
where
    R: CourseListRepository,
    C: CourseCatalogue,
{
    fn map_repository_error(&self, error: CourseListRepositoryError) -> Error {
        let kind = self.kind;
        match error {
            CourseListRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("{kind} repository unavailable: {message}"))
            }
            CourseListRepositoryError::Query { message } => {
                Error::internal(format!("{kind} repository error: {message}"))
            }
            CourseListRepositoryError::NotFound { message } => {
                Error::not_found(format!("{kind} not found: {message}"))
            }
            CourseListRepositoryError::DuplicateKey { message } => {
                Error::duplicate_key(format!("{kind} already exists: {message}"))
            }
            CourseListRepositoryError::NotModified { message } => {
                Error::not_modified(format!("{kind} not modified: {message}"))
            }
        }
    }

    fn map_catalogue_error(error: CourseCatalogueError) -> Error {
        Error::service_unavailable(format!("course catalogue unavailable: {error}"))
    }

    fn parse_id(raw: &str) -> Result<ObjectId, Error> {
        raw.parse()
            .map_err(|err| Error::invalid_identifier(format!("invalid identifier `{raw}`: {err}")))
    }

    fn ensure_selection(&self, selection: &CourseSelection) -> Result<(), Error> {
        if self.policy.require_non_empty_courses && selection.is_empty() {
            return Err(Error::invalid_request(format!(
                "{} requests must name at least one course",
                self.kind
            )));
        }
        Ok(())
    }

    /// Replace stored references with the catalogue's view of them.
    async fn hydrate(&self, mut list: CourseList) -> Result<CourseList, Error> {
        if list.courses.is_empty() {
            return Ok(list);
        }
        list.courses = self
            .catalogue
            .list(&list.course_ids())
            .await
            .map_err(Self::map_catalogue_error)?;
        Ok(list)
    }

    async fn insert(&self, user_id: &str, course_ids: Vec<ObjectId>) -> Result<CourseList, Error> {
        let list = CourseList::new(ObjectId::generate(), user_id, course_ids, self.clock.utc());
        self.repository
            .create(&list)
            .await
            .map_err(|err| self.map_repository_error(err))?;
        Ok(list)
    }
}

#[async_trait]
impl<R, C> CourseListQuery for CourseListService<R, C>
where
    R: CourseListRepository,
    C: CourseCatalogue,
{
    async fn fetch(&self, mask: FieldMask, page: Page) -> Result<Vec<CourseList>, Error> {
        self.repository
            .fetch(&mask, page)
            .await
            .map_err(|err| self.map_repository_error(err))
    }

    async fn fetch_by_id(&self, id: &str, mask: FieldMask) -> Result<CourseList, Error> {
        let id = Self::parse_id(id)?;
        let list = self
            .repository
            .fetch_by_id(&id, &mask)
            .await
            .map_err(|err| self.map_repository_error(err))?;
        self.hydrate(list).await
    }

    async fn fetch_by_user_id(&self, user_id: &str, mask: FieldMask) -> Result<CourseList, Error> {
        let list = self
            .repository
            .fetch_by_user_id(user_id, &mask)
            .await
            .map_err(|err| self.map_repository_error(err))?;
        self.hydrate(list).await
    }
}

#[async_trait]
impl<R, C> CourseListCommand for CourseListService<R, C>
where
    R: CourseListRepository,
    C: CourseCatalogue,
{
    async fn create(&self, request: CreateCourseListRequest) -> Result<CourseList, Error> {
        let course_ids = self
            .policy
            .malformed_ids_on_create
            .resolve(request.course_ids.iter().map(String::as_str));
        self.insert(&request.user_id, course_ids).await
    }

    async fn add_courses(&self, user_id: &str, selection: CourseSelection) -> Result<bool, Error> {
        self.ensure_selection(&selection)?;
        let raw = selection.course_ids.iter().map(String::as_str);

        match self
            .repository
            .fetch_by_user_id(user_id, &FieldMask::none())
            .await
        {
            Ok(_) => {}
            Err(CourseListRepositoryError::NotFound { .. })
                if self.policy.auto_vivify_on_missing =>
            {
                let course_ids = self.policy.malformed_ids_on_create.resolve(raw.clone());
                let list = CourseList::new(
                    ObjectId::generate(),
                    user_id,
                    course_ids,
                    self.clock.utc(),
                );
                match self.repository.create(&list).await {
                    Ok(_) => {
                        info!(kind = %self.kind, %user_id, id = %list.id, "created list on first add");
                        return Ok(true);
                    }
                    // A concurrent add created the list first; merge into it.
                    Err(CourseListRepositoryError::DuplicateKey { .. }) => {
                        debug!(kind = %self.kind, %user_id, "list created concurrently, merging");
                    }
                    Err(err) => return Err(self.map_repository_error(err)),
                }
            }
            Err(err) => return Err(self.map_repository_error(err)),
        }

        let course_ids = self.policy.malformed_ids.resolve(raw);
        match self.repository.add_courses(user_id, &course_ids).await {
            Ok(()) => Ok(true),
            Err(CourseListRepositoryError::NotModified { message })
                if self.policy.tolerate_zero_effect_add =>
            {
                debug!(kind = %self.kind, %user_id, %message, "ignoring zero-effect add");
                Ok(true)
            }
            Err(err) => Err(self.map_repository_error(err)),
        }
    }

    async fn revoke_courses(
        &self,
        user_id: &str,
        selection: CourseSelection,
    ) -> Result<bool, Error> {
        self.ensure_selection(&selection)?;
        let course_ids = self
            .policy
            .malformed_ids
            .resolve(selection.course_ids.iter().map(String::as_str));

        let outcome = self
            .repository
            .revoke_courses(user_id, &course_ids)
            .await
            .map_err(|err| self.map_repository_error(err))?;
        if outcome == UpdateOutcome::Unchanged && !self.policy.tolerate_zero_effect_revoke {
            return Err(Error::not_modified(format!(
                "{} not modified: no listed course was present for user {user_id}",
                self.kind
            )));
        }
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool, Error> {
        if !self.policy.supports_delete {
            return Err(Error::invalid_request(format!(
                "{} lists cannot be deleted",
                self.kind
            )));
        }
        let id = Self::parse_id(id)?;
        self.repository
            .delete(&id)
            .await
            .map_err(|err| self.map_repository_error(err))?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "course_list_service_tests.rs"]
mod tests;
