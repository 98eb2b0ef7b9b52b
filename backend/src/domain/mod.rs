//! Domain primitives, aggregates and services.
//!
//! Purpose: model bookmark lists and carts independently of storage and
//! transport. Adapters reach the domain through the traits in [`ports`].
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `ObjectId`: twelve-byte document identifier.
//! - `CourseList`, `CourseRef`, `CourseListKind`: the aggregate.
//! - `FieldMask`, `ListField`, `Page`: read-side projection and paging.
//! - `CourseListPolicy`, `MalformedIdPolicy`: flavour behaviour switches.
//! - `CourseListService`: orchestration implementing the driving ports.

pub mod course_list;
pub mod course_list_service;
pub mod error;
pub mod object_id;
pub mod policy;
pub mod ports;
pub mod trace_id;

pub use self::course_list::{
    CourseList, CourseListKind, CourseRef, DEFAULT_PAGE_SIZE, FieldMask, ListField, Page,
    UnknownFieldError, merge_course_ids, remove_course_ids,
};
pub use self::course_list_service::CourseListService;
pub use self::error::{Error, ErrorCode};
pub use self::object_id::{ObjectId, ObjectIdError};
pub use self::policy::{CourseListPolicy, MalformedIdPolicy};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
