//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled only for tests or with the `test-support` feature.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{CourseCatalogue, CourseCatalogueError};
use crate::domain::{CourseListKind, CourseListService, CourseRef, ObjectId};
use crate::inbound::http::state::CourseListPorts;
use crate::outbound::memory::InMemoryCourseListRepository;

/// Clock frozen at a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// 2024-11-04T12:00:00Z.
    pub fn fixture() -> Self {
        Self::new(Utc.with_ymd_and_hms(2024, 11, 4, 12, 0, 0).single().unwrap_or_default())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Catalogue answering from a fixed set of known courses.
///
/// Unknown identifiers are left out of the answer, as the real catalogue
/// does. Every call is recorded so tests can assert when the catalogue was
/// consulted.
#[derive(Debug, Default)]
pub struct StaticCourseCatalogue {
    courses: HashMap<ObjectId, String>,
    calls: Mutex<Vec<Vec<ObjectId>>>,
    unavailable: bool,
}

impl StaticCourseCatalogue {
    pub fn new<I, S>(courses: I) -> Self
    where
        I: IntoIterator<Item = (ObjectId, S)>,
        S: Into<String>,
    {
        Self {
            courses: courses
                .into_iter()
                .map(|(id, name)| (id, name.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// A catalogue whose every lookup times out.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Identifiers passed to each lookup so far.
    pub fn calls(&self) -> Vec<Vec<ObjectId>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CourseCatalogue for StaticCourseCatalogue {
    async fn list(&self, course_ids: &[ObjectId]) -> Result<Vec<CourseRef>, CourseCatalogueError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(course_ids.to_vec());
        if self.unavailable {
            return Err(CourseCatalogueError::timeout("catalogue unavailable"));
        }
        Ok(course_ids
            .iter()
            .filter_map(|id| {
                self.courses
                    .get(id)
                    .map(|name| CourseRef::new(*id, name.clone()))
            })
            .collect())
    }
}

/// Service wired to an in-memory store, with handles kept for assertions.
pub struct InMemoryHarness {
    pub service: Arc<CourseListService<InMemoryCourseListRepository, StaticCourseCatalogue>>,
    pub repository: Arc<InMemoryCourseListRepository>,
    pub catalogue: Arc<StaticCourseCatalogue>,
    pub clock: Arc<FixedClock>,
}

impl InMemoryHarness {
    pub fn new(kind: CourseListKind, catalogue: StaticCourseCatalogue) -> Self {
        let clock = Arc::new(FixedClock::fixture());
        let repository = Arc::new(InMemoryCourseListRepository::new(clock.clone()));
        let catalogue = Arc::new(catalogue);
        let service = match kind {
            CourseListKind::Bookmark => {
                CourseListService::bookmarks(repository.clone(), catalogue.clone(), clock.clone())
            }
            CourseListKind::Cart => {
                CourseListService::carts(repository.clone(), catalogue.clone(), clock.clone())
            }
        };
        Self {
            service: Arc::new(service),
            repository,
            catalogue,
            clock,
        }
    }

    /// Driving ports backed by this harness's service.
    pub fn ports(&self) -> CourseListPorts {
        CourseListPorts::from_service(self.service.clone())
    }
}
