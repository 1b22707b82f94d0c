//! Integration tests against a live database and a running server
//!
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

mod repository_tests;
mod web_tests;
