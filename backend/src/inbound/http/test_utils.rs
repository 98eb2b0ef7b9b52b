//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::ports::{MockCourseListCommand, MockCourseListQuery};
use crate::inbound::http::state::{CourseListPorts, HttpState};

/// Wrap mocked driving ports for one flavour.
pub fn ports(query: MockCourseListQuery, command: MockCourseListCommand) -> CourseListPorts {
    CourseListPorts {
        query: Arc::new(query),
        command: Arc::new(command),
    }
}

/// Ports with no expectations; any call fails the test.
pub fn unused_ports() -> CourseListPorts {
    ports(MockCourseListQuery::new(), MockCourseListCommand::new())
}

pub fn state_with_bookmarks(bookmarks: CourseListPorts) -> HttpState {
    HttpState::new(bookmarks, unused_ports())
}

pub fn state_with_carts(carts: CourseListPorts) -> HttpState {
    HttpState::new(unused_ports(), carts)
}
