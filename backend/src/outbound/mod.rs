//! Outbound adapters implementing domain ports.

pub mod catalogue;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod persistence;
