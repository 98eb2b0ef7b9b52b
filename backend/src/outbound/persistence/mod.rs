//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between row structs and domain types only; the
//! course list rules live in the domain service. Rows and table definitions
//! stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use course_lists::domain::CourseListKind;
//! use course_lists::outbound::persistence::{DbPool, DieselCourseListRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/course_lists")).await?;
//! let bookmarks = DieselCourseListRepository::new(CourseListKind::Bookmark, pool, clock);
//! ```

mod diesel_course_list_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_course_list_repository::DieselCourseListRepository;
pub use migrations::{MIGRATIONS, MigrationError, apply_blocking, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
