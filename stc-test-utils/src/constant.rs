//! Test configuration constants.
//!
//! This module defines the standard values used across all tests for database setup and
//! the sample user record. None of them are real credentials.

/// Logical database name of every test database handle.
pub static TEST_DATABASE_NAME: &str = "stc-db-test";

/// Username of the sample user record.
pub static TEST_USERNAME: &str = "testuser";

/// Email of the sample user record.
pub static TEST_EMAIL: &str = "test@example.com";

/// Plaintext password of the sample user record.
pub static TEST_PASSWORD: &str = "testpass123";

/// Full name of the sample user record.
pub static TEST_FULL_NAME: &str = "Test User";
