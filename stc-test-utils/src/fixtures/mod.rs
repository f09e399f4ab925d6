//! Test fixtures injectable into `rstest` test functions.
//!
//! - [`test_db`] - a fresh in-memory test database, released when the context drops
//! - [`test_user`] - the sample user record
//!
//! The `user` submodule holds factories for user records and helpers inserting them
//! through a [`TestContext`].
//!
//! ```ignore
//! use rstest::rstest;
//! use stc_test_utils::prelude::*;
//!
//! #[rstest]
//! #[tokio::test]
//! async fn registers_user(#[future] test_db: TestContext, test_user: NewUser) {
//!     let test = test_db.await;
//!     // ...
//! }
//! ```

pub mod user;

use rstest::fixture;
use stc::model::user::NewUser;

use crate::context::TestContext;

/// Fresh in-memory test database.
///
/// Every invocation builds a new client, so no test observes documents written by another.
#[fixture]
pub async fn test_db() -> TestContext {
    TestContext::new()
        .await
        .expect("Failed to create in-memory test database")
}

/// The sample user record.
#[fixture]
pub fn test_user() -> NewUser {
    user::factory::mock_user()
}
