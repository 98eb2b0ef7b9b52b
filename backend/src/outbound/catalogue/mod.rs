//! Course catalogue outbound adapters.
//!
//! A thin HTTP/JSON implementation of the `CourseCatalogue` port.

mod dto;
mod http_catalogue;

pub use http_catalogue::HttpCourseCatalogue;
