//! PostgreSQL-backed `CourseListRepository` using Diesel.
//!
//! The `bookmarks` and `carts` tables share one layout. A macro stamps out the
//! query functions for each table and the repository dispatches on its
//! [`CourseListKind`]. Add and revoke lock the owning row with
//! `SELECT ... FOR UPDATE`, compute the new identifier set and write it back
//! inside one transaction, so concurrent mutations serialise per list.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{CourseListRepository, CourseListRepositoryError, UpdateOutcome};
use crate::domain::{
    CourseList, CourseListKind, FieldMask, ObjectId, Page, merge_course_ids, remove_course_ids,
};

use super::models::{CourseListRow, decode_course_ids, encode_course_ids};
use super::pool::{DbPool, PoolError};

macro_rules! course_list_table {
    ($ops:ident, $table:ident) => {
        mod $ops {
            use chrono::{DateTime, Utc};
            use diesel::prelude::*;
            use diesel_async::{AsyncPgConnection, RunQueryDsl};

            use crate::outbound::persistence::models::CourseListRow;
            use crate::outbound::persistence::schema::$table;

            pub(super) async fn page(
                conn: &mut AsyncPgConnection,
                limit: i64,
                offset: i64,
            ) -> QueryResult<Vec<CourseListRow>> {
                $table::table
                    .filter($table::deleted_at.is_null())
                    .order($table::id.asc())
                    .limit(limit)
                    .offset(offset)
                    .load(conn)
                    .await
            }

            pub(super) async fn by_id(
                conn: &mut AsyncPgConnection,
                id: &[u8],
            ) -> QueryResult<Option<CourseListRow>> {
                $table::table
                    .filter($table::id.eq(id))
                    .filter($table::deleted_at.is_null())
                    .first(conn)
                    .await
                    .optional()
            }

            pub(super) async fn by_user_id(
                conn: &mut AsyncPgConnection,
                user_id: &str,
            ) -> QueryResult<Option<CourseListRow>> {
                $table::table
                    .filter($table::user_id.eq(user_id))
                    .filter($table::deleted_at.is_null())
                    .first(conn)
                    .await
                    .optional()
            }

            pub(super) async fn insert(
                conn: &mut AsyncPgConnection,
                row: &CourseListRow,
            ) -> QueryResult<usize> {
                diesel::insert_into($table::table)
                    .values((
                        $table::id.eq(&row.id),
                        $table::user_id.eq(&row.user_id),
                        $table::course_ids.eq(&row.course_ids),
                        $table::created_at.eq(row.created_at),
                        $table::updated_at.eq(row.updated_at),
                        $table::deleted_at.eq(row.deleted_at),
                    ))
                    .execute(conn)
                    .await
            }

            pub(super) async fn lock_course_ids(
                conn: &mut AsyncPgConnection,
                user_id: &str,
            ) -> QueryResult<Option<(Vec<u8>, Vec<Vec<u8>>)>> {
                $table::table
                    .filter($table::user_id.eq(user_id))
                    .filter($table::deleted_at.is_null())
                    .select(($table::id, $table::course_ids))
                    .for_update()
                    .first(conn)
                    .await
                    .optional()
            }

            pub(super) async fn store_course_ids(
                conn: &mut AsyncPgConnection,
                id: &[u8],
                course_ids: &[Vec<u8>],
                now: DateTime<Utc>,
            ) -> QueryResult<usize> {
                diesel::update($table::table.filter($table::id.eq(id)))
                    .set((
                        $table::course_ids.eq(course_ids),
                        $table::updated_at.eq(Some(now)),
                    ))
                    .execute(conn)
                    .await
            }

            pub(super) async fn delete(conn: &mut AsyncPgConnection, id: &[u8]) -> QueryResult<usize> {
                diesel::delete($table::table.filter($table::id.eq(id)))
                    .execute(conn)
                    .await
            }
        }
    };
}

course_list_table!(bookmark_rows, bookmarks);
course_list_table!(cart_rows, carts);

/// Run `$body` with `$ops` bound to the query module for `$kind`.
macro_rules! with_table {
    ($kind:expr, |$ops:ident| $body:expr) => {
        match $kind {
            CourseListKind::Bookmark => {
                use bookmark_rows as $ops;
                $body
            }
            CourseListKind::Cart => {
                use cart_rows as $ops;
                $body
            }
        }
    };
}

/// Outcome of a locked read-modify-write.
enum LockedUpdate {
    Missing,
    Unchanged,
    Modified,
}

/// Which set operation a locked update applies.
#[derive(Clone, Copy)]
enum SetOperation {
    Union,
    Difference,
}

/// Diesel-backed implementation of the `CourseListRepository` port.
#[derive(Clone)]
pub struct DieselCourseListRepository {
    kind: CourseListKind,
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselCourseListRepository {
    pub fn new(kind: CourseListKind, pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { kind, pool, clock }
    }

    async fn update_locked(
        &self,
        user_id: &str,
        course_ids: &[ObjectId],
        operation: SetOperation,
    ) -> Result<LockedUpdate, CourseListRepositoryError> {
        let kind = self.kind;
        let now = self.clock.utc();
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                let locked = with_table!(kind, |ops| ops::lock_course_ids(conn, user_id).await)?;
                let Some((id, stored)) = locked else {
                    return Ok(LockedUpdate::Missing);
                };
                let mut ids = decode_course_ids(stored)
                    .map_err(|err| DieselError::DeserializationError(Box::new(err)))?;
                let changed = match operation {
                    SetOperation::Union => merge_course_ids(&mut ids, course_ids.iter().copied()),
                    SetOperation::Difference => remove_course_ids(&mut ids, course_ids),
                };
                if !changed {
                    return Ok(LockedUpdate::Unchanged);
                }
                let encoded = encode_course_ids(&ids);
                with_table!(kind, |ops| {
                    ops::store_course_ids(conn, &id, &encoded, now).await
                })?;
                Ok(LockedUpdate::Modified)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

fn map_pool_error(error: PoolError) -> CourseListRepositoryError {
    CourseListRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: DieselError) -> CourseListRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            CourseListRepositoryError::duplicate_key(
                info.constraint_name().unwrap_or("user_id").to_owned(),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CourseListRepositoryError::connection("database connection error")
        }
        DieselError::DeserializationError(err) => {
            CourseListRepositoryError::query(format!("stored course list is corrupt: {err}"))
        }
        DieselError::QueryBuilderError(_) => {
            CourseListRepositoryError::query("database query error")
        }
        _ => CourseListRepositoryError::query("database error"),
    }
}

fn row_to_list(row: CourseListRow, mask: &FieldMask) -> Result<CourseList, CourseListRepositoryError> {
    row.into_domain()
        .map(|list| list.project(mask))
        .map_err(|err| CourseListRepositoryError::query(format!("stored course list is corrupt: {err}")))
}

fn list_to_row(list: &CourseList) -> CourseListRow {
    CourseListRow {
        id: list.id.bytes().to_vec(),
        user_id: list.user_id.clone(),
        course_ids: encode_course_ids(&list.course_ids()),
        created_at: list.created_at,
        updated_at: list.updated_at,
        deleted_at: list.deleted_at,
    }
}

fn to_sql_bound(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl CourseListRepository for DieselCourseListRepository {
    async fn fetch(
        &self,
        mask: &FieldMask,
        page: Page,
    ) -> Result<Vec<CourseList>, CourseListRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let (limit, offset) = (to_sql_bound(page.limit()), to_sql_bound(page.skip()));

        let rows = with_table!(self.kind, |ops| ops::page(conn, limit, offset).await)
            .map_err(map_diesel_error)?;
        rows.into_iter().map(|row| row_to_list(row, mask)).collect()
    }

    async fn fetch_by_id(
        &self,
        id: &ObjectId,
        mask: &FieldMask,
    ) -> Result<CourseList, CourseListRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        let row = with_table!(self.kind, |ops| ops::by_id(conn, id.bytes()).await)
            .map_err(map_diesel_error)?
            .ok_or_else(|| CourseListRepositoryError::not_found(format!("id {id}")))?;
        row_to_list(row, mask)
    }

    async fn fetch_by_user_id(
        &self,
        user_id: &str,
        mask: &FieldMask,
    ) -> Result<CourseList, CourseListRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        let row = with_table!(self.kind, |ops| ops::by_user_id(conn, user_id).await)
            .map_err(map_diesel_error)?
            .ok_or_else(|| CourseListRepositoryError::not_found(format!("user {user_id}")))?;
        row_to_list(row, mask)
    }

    async fn create(&self, list: &CourseList) -> Result<ObjectId, CourseListRepositoryError> {
        let kind = self.kind;
        let row = list_to_row(list);
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction::<_, DieselError, _>(|conn| {
            async move { with_table!(kind, |ops| ops::insert(conn, &row).await) }.scope_boxed()
        })
        .await
        .map_err(|err| match map_diesel_error(err) {
            CourseListRepositoryError::DuplicateKey { .. } => {
                CourseListRepositoryError::duplicate_key(format!("user {}", list.user_id))
            }
            other => other,
        })?;
        debug!(%kind, id = %list.id, user_id = %list.user_id, "course list created");
        Ok(list.id)
    }

    async fn add_courses(
        &self,
        user_id: &str,
        course_ids: &[ObjectId],
    ) -> Result<(), CourseListRepositoryError> {
        match self
            .update_locked(user_id, course_ids, SetOperation::Union)
            .await?
        {
            LockedUpdate::Modified => Ok(()),
            LockedUpdate::Unchanged => Err(CourseListRepositoryError::not_modified(format!(
                "user {user_id}"
            ))),
            LockedUpdate::Missing => Err(CourseListRepositoryError::not_found(format!(
                "user {user_id}"
            ))),
        }
    }

    async fn revoke_courses(
        &self,
        user_id: &str,
        course_ids: &[ObjectId],
    ) -> Result<UpdateOutcome, CourseListRepositoryError> {
        match self
            .update_locked(user_id, course_ids, SetOperation::Difference)
            .await?
        {
            LockedUpdate::Modified => Ok(UpdateOutcome::Modified),
            LockedUpdate::Unchanged => Ok(UpdateOutcome::Unchanged),
            LockedUpdate::Missing => Err(CourseListRepositoryError::not_found(format!(
                "user {user_id}"
            ))),
        }
    }

    async fn delete(&self, id: &ObjectId) -> Result<(), CourseListRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        let deleted = with_table!(self.kind, |ops| ops::delete(conn, id.bytes()).await)
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(CourseListRepositoryError::not_found(format!("id {id}")));
        }
        Ok(())
    }
}
