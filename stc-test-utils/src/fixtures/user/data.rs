//! User database insertion utilities.

use stc::{
    model::user::{NewUser, User},
    server::data::user::UserRepository,
};

use crate::{error::TestError, fixtures::user::factory, fixtures::user::UserFixtures};

impl<'a> UserFixtures<'a> {
    /// Insert the sample user into the test database.
    ///
    /// # Returns
    /// - `Ok(User)` - The stored user record
    /// - `Err(TestError::StcError)` - The sample user already exists or the insert failed
    pub async fn insert_test_user(&self) -> Result<User, TestError> {
        self.insert_user(&factory::mock_user()).await
    }

    /// Insert a user into the test database.
    ///
    /// # Arguments
    /// - `new_user` - The user to register
    ///
    /// # Returns
    /// - `Ok(User)` - The stored user record
    /// - `Err(TestError::StcError)` - Username or email already taken, or the insert failed
    pub async fn insert_user(&self, new_user: &NewUser) -> Result<User, TestError> {
        Ok(UserRepository::new(&self.setup.db).create(new_user).await?)
    }
}
