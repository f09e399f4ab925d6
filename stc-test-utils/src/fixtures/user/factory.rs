//! Factory functions for generating user records.
//!
//! Provides pure functions creating user records with standard test values. These are plain
//! values that don't require database interaction.

use stc::model::user::NewUser;

use crate::constant::{TEST_EMAIL, TEST_FULL_NAME, TEST_PASSWORD, TEST_USERNAME};

/// Create the sample user record.
///
/// Returns a freshly constructed `NewUser` on every call:
/// username `testuser`, email `test@example.com`, password `testpass123`, full name `Test User`.
pub fn mock_user() -> NewUser {
    NewUser {
        username: TEST_USERNAME.to_string(),
        email: TEST_EMAIL.to_string(),
        password: TEST_PASSWORD.to_string(),
        full_name: TEST_FULL_NAME.to_string(),
    }
}

/// Create a user record distinct from the sample user.
///
/// Derives email and full name from `username` so several of these can be registered in the
/// same database.
///
/// # Arguments
/// - `username` - Username of the record
pub fn mock_user_with_username(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: TEST_PASSWORD.to_string(),
        full_name: format!("Test User {}", username),
    }
}
