//! Tests for the test database and sample user fixtures.
//!
//! This module verifies the fixture lifecycle as seen by consuming tests: every test gets
//! an isolated database, release happens on every exit path, and the sample user record is
//! stable across invocations.

mod isolation;
mod lifecycle;
mod test_user;
