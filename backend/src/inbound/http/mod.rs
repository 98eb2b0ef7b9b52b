//! HTTP inbound adapter exposing REST endpoints.

pub mod bookmarks;
pub mod carts;
pub mod course_lists;
pub mod error;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
