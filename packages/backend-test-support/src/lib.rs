//! Shared helpers for the backend's integration tests: one-time logging
//! and problem-details assertions that do not depend on backend types.

pub mod logging;
pub mod problem_details;
