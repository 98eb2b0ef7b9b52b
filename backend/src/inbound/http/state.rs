//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CourseListCommand, CourseListQuery};

/// Driving ports for one course list flavour.
#[derive(Clone)]
pub struct CourseListPorts {
    pub query: Arc<dyn CourseListQuery>,
    pub command: Arc<dyn CourseListCommand>,
}

impl CourseListPorts {
    /// Use a single service for both the read and the write side.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use course_lists::domain::CourseListService;
    /// use course_lists::domain::ports::{CourseListRepository, CourseCatalogue};
    /// use course_lists::inbound::http::state::CourseListPorts;
    ///
    /// fn ports<R, C>(service: CourseListService<R, C>) -> CourseListPorts
    /// where
    ///     R: CourseListRepository + 'static,
    ///     C: CourseCatalogue + 'static,
    /// {
    ///     CourseListPorts::from_service(Arc::new(service))
    /// }
    /// ```
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: CourseListQuery + CourseListCommand + 'static,
    {
        Self {
            query: service.clone(),
            command: service,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub bookmarks: CourseListPorts,
    pub carts: CourseListPorts,
}

impl HttpState {
    pub fn new(bookmarks: CourseListPorts, carts: CourseListPorts) -> Self {
        Self { bookmarks, carts }
    }
}
