//! User fixture utilities.
//!
//! This module provides factory functions for in-memory user records and methods inserting
//! users into a test database through the user repository.

pub mod data;
pub mod factory;

use crate::TestContext;

impl TestContext {
    pub fn user(&self) -> UserFixtures<'_> {
        UserFixtures { setup: self }
    }
}

pub struct UserFixtures<'a> {
    setup: &'a TestContext,
}
