//! Integration tests against a real SQLite database file.
//!
//! 1. End-to-end user workflow
//! 2. Manager lifecycle and persistence

pub mod end_to_end_tests;
pub mod helpers;
pub mod manager_tests;
