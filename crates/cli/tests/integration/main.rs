//! CLI integration tests for depstrap.

mod apply_tests;
mod common;
mod plan_tests;
