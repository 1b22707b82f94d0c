//! Test utilities
//!
//! In-memory repositories and fixtures for exercising the services,
//! controllers and front ends without a database.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
