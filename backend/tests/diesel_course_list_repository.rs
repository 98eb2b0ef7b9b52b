//! Integration tests for `DieselCourseListRepository` against embedded
//! PostgreSQL.
//!
//! Each test gets a freshly migrated database; suites skip when the cluster
//! cannot start and `SKIP_TEST_CLUSTER` is set.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use course_lists::domain::ports::{
    CourseListRepository, CourseListRepositoryError, UpdateOutcome,
};
use course_lists::domain::{CourseList, CourseListKind, FieldMask, ListField, ObjectId, Page};
use course_lists::outbound::persistence::{DbPool, DieselCourseListRepository, PoolConfig};
use course_lists::test_support::FixedClock;
use mockable::Clock;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

mod support;

use support::{
    format_postgres_error, handle_cluster_setup_failure, migrate_schema, reset_database,
    test_cluster,
};

const TEST_DB: &str = "diesel_course_list_repo_test";

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    database_url: String,
    pool: DbPool,
    clock: Arc<FixedClock>,
}

impl TestContext {
    fn repository(&self, kind: CourseListKind) -> DieselCourseListRepository {
        DieselCourseListRepository::new(kind, self.pool.clone(), self.clock.clone())
    }

    fn execute(&self, sql: &str) -> Result<(), String> {
        let mut client =
            Client::connect(&self.database_url, NoTls).map_err(|err| format_postgres_error(&err))?;
        client
            .batch_execute(sql)
            .map_err(|err| format_postgres_error(&err))
    }
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    let database_url = reset_database(&cluster, TEST_DB)?;
    migrate_schema(&database_url)?;

    let config = PoolConfig::new(&database_url)
        .with_max_size(4)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        database_url,
        pool,
        clock: Arc::new(FixedClock::fixture()),
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn list_for(user_id: &str, course_ids: &[ObjectId]) -> CourseList {
    let created = Utc
        .with_ymd_and_hms(2024, 11, 1, 9, 30, 0)
        .single()
        .expect("valid time");
    CourseList::new(
        ObjectId::generate(),
        user_id,
        course_ids.iter().copied(),
        created,
    )
}

#[rstest]
fn create_then_fetch_round_trips_every_column(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: create_then_fetch_round_trips_every_column skipped");
        return;
    };
    let repository = context.repository(CourseListKind::Bookmark);
    let courses = [ObjectId::generate(), ObjectId::generate()];
    let list = list_for("42", &courses);

    let fetched = context.runtime.block_on(async {
        let id = repository.create(&list).await.expect("create");
        assert_eq!(id, list.id);
        repository
            .fetch_by_id(&id, &FieldMask::none())
            .await
            .expect("fetch by id")
    });

    assert_eq!(fetched.user_id, "42");
    assert_eq!(fetched.course_ids(), courses);
    assert_eq!(fetched.created_at, list.created_at);
    assert!(fetched.deleted_at.is_none());
}

#[rstest]
fn duplicate_users_are_rejected(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_users_are_rejected skipped");
        return;
    };
    let repository = context.repository(CourseListKind::Cart);

    let (second, page) = context.runtime.block_on(async {
        repository
            .create(&list_for("7", &[]))
            .await
            .expect("first create");
        let second = repository.create(&list_for("7", &[])).await;
        let page = repository
            .fetch(&FieldMask::none(), Page::numbered(1, 25))
            .await
            .expect("list carts");
        (second, page)
    });

    assert!(matches!(
        second,
        Err(CourseListRepositoryError::DuplicateKey { .. })
    ));
    assert_eq!(page.len(), 1);
}

#[rstest]
fn tables_are_independent(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: tables_are_independent skipped");
        return;
    };
    let bookmarks = context.repository(CourseListKind::Bookmark);
    let carts = context.repository(CourseListKind::Cart);

    let cart_lookup = context.runtime.block_on(async {
        bookmarks
            .create(&list_for("42", &[]))
            .await
            .expect("bookmark create");
        carts.create(&list_for("42", &[])).await.expect("cart create");
        carts.fetch_by_user_id("43", &FieldMask::none()).await
    });

    assert!(matches!(
        cart_lookup,
        Err(CourseListRepositoryError::NotFound { .. })
    ));
}

#[rstest]
fn add_is_a_set_union_that_reports_no_ops(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: add_is_a_set_union_that_reports_no_ops skipped");
        return;
    };
    let repository = context.repository(CourseListKind::Bookmark);
    let first = ObjectId::generate();
    let second = ObjectId::generate();
    let later = context.clock.utc() + Duration::hours(1);

    let (repeat, stored) = context.runtime.block_on(async {
        repository
            .create(&list_for("42", &[first]))
            .await
            .expect("create");
        context.clock.set(later);
        repository
            .add_courses("42", &[second, first])
            .await
            .expect("add");
        let repeat = repository.add_courses("42", &[first, second]).await;
        let stored = repository
            .fetch_by_user_id("42", &FieldMask::none())
            .await
            .expect("fetch");
        (repeat, stored)
    });

    assert!(matches!(
        repeat,
        Err(CourseListRepositoryError::NotModified { .. })
    ));
    assert_eq!(stored.course_ids(), vec![first, second]);
    assert_eq!(stored.updated_at, Some(later));
}

#[rstest]
fn revoke_reports_whether_anything_changed(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: revoke_reports_whether_anything_changed skipped");
        return;
    };
    let repository = context.repository(CourseListKind::Cart);
    let kept = ObjectId::generate();
    let revoked = ObjectId::generate();

    let (modified, unchanged, missing, stored) = context.runtime.block_on(async {
        repository
            .create(&list_for("88", &[kept, revoked]))
            .await
            .expect("create");
        let modified = repository.revoke_courses("88", &[revoked]).await;
        let unchanged = repository.revoke_courses("88", &[revoked]).await;
        let missing = repository.revoke_courses("nobody", &[kept]).await;
        let stored = repository
            .fetch_by_user_id("88", &FieldMask::none())
            .await
            .expect("fetch");
        (modified, unchanged, missing, stored)
    });

    assert_eq!(modified, Ok(UpdateOutcome::Modified));
    assert_eq!(unchanged, Ok(UpdateOutcome::Unchanged));
    assert!(matches!(
        missing,
        Err(CourseListRepositoryError::NotFound { .. })
    ));
    assert_eq!(stored.course_ids(), vec![kept]);
}

#[rstest]
fn concurrent_adds_both_apply(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_adds_both_apply skipped");
        return;
    };
    let repository = context.repository(CourseListKind::Bookmark);
    let left = [ObjectId::generate()];
    let right = [ObjectId::generate()];

    let stored = context.runtime.block_on(async {
        repository
            .create(&list_for("42", &[]))
            .await
            .expect("create");
        let (a, b) = tokio::join!(
            repository.add_courses("42", &left),
            repository.add_courses("42", &right),
        );
        a.expect("left add");
        b.expect("right add");
        repository
            .fetch_by_user_id("42", &FieldMask::none())
            .await
            .expect("fetch")
    });

    let ids = stored.course_ids();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&left[0]) && ids.contains(&right[0]));
}

#[rstest]
fn soft_deleted_rows_are_invisible(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: soft_deleted_rows_are_invisible skipped");
        return;
    };
    let repository = context.repository(CourseListKind::Bookmark);
    let list = list_for("42", &[]);

    context
        .runtime
        .block_on(async { repository.create(&list).await })
        .expect("create");
    context
        .execute("UPDATE bookmarks SET deleted_at = now()")
        .expect("soft delete");

    let (by_id, page, add) = context.runtime.block_on(async {
        (
            repository.fetch_by_id(&list.id, &FieldMask::none()).await,
            repository
                .fetch(&FieldMask::none(), Page::numbered(1, 25))
                .await,
            repository.add_courses("42", &[ObjectId::generate()]).await,
        )
    });

    assert!(matches!(by_id, Err(CourseListRepositoryError::NotFound { .. })));
    assert_eq!(page.map(|lists| lists.len()), Ok(0));
    assert!(matches!(add, Err(CourseListRepositoryError::NotFound { .. })));
}

#[rstest]
fn listing_pages_in_insertion_order_with_projection(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: listing_pages_in_insertion_order_with_projection skipped");
        return;
    };
    let repository = context.repository(CourseListKind::Bookmark);
    let mask: FieldMask = [ListField::Courses, ListField::UserId].into_iter().collect();

    let (first_page, second_page) = context.runtime.block_on(async {
        for user in ["a", "b", "c"] {
            repository
                .create(&list_for(user, &[ObjectId::generate()]))
                .await
                .expect("create");
        }
        (
            repository
                .fetch(&FieldMask::none(), Page::new(2, 0))
                .await
                .expect("first page"),
            repository
                .fetch(&mask, Page::new(2, 2))
                .await
                .expect("second page"),
        )
    });

    let users: Vec<_> = first_page.iter().map(|list| list.user_id.as_str()).collect();
    assert_eq!(users, ["a", "b"]);
    assert_eq!(second_page.len(), 1);
    assert!(second_page[0].user_id.is_empty());
    assert!(second_page[0].courses.is_empty());
    assert!(second_page[0].created_at.is_some());
}

#[rstest]
fn delete_removes_the_row(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: delete_removes_the_row skipped");
        return;
    };
    let repository = context.repository(CourseListKind::Bookmark);
    let list = list_for("42", &[]);

    let (deleted, again, fresh) = context.runtime.block_on(async {
        repository.create(&list).await.expect("create");
        (
            repository.delete(&list.id).await,
            repository.delete(&list.id).await,
            repository.create(&list_for("42", &[])).await,
        )
    });

    assert_eq!(deleted, Ok(()));
    assert!(matches!(again, Err(CourseListRepositoryError::NotFound { .. })));
    assert!(fresh.is_ok(), "user may create a new list after delete");
}
