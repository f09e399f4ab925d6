use chrono::Utc;
use serde_json::json;

use crate::{
    model::user::{NewUser, User},
    server::{
        db::{object_id, Collection, DocumentDatabase},
        error::{user::UserError, Error},
    },
};

/// Name of the collection holding user documents.
pub static USERS_COLLECTION: &str = "users";

pub struct UserRepository {
    users: Collection,
}

impl UserRepository {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &DocumentDatabase) -> Self {
        Self {
            users: db.collection(USERS_COLLECTION),
        }
    }

    /// Creates a new user
    ///
    /// Usernames and emails are unique, registering either twice fails without writing. The
    /// checks and the insert run in one transaction, so concurrent registrations of the same
    /// username or email cannot both succeed.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, Error> {
        let txn = self.users.begin().await?;

        if self
            .users
            .find_one_with(&txn, json!({ "username": new_user.username }))
            .await?
            .is_some()
        {
            return Err(UserError::UsernameTaken(new_user.username.clone()).into());
        }

        if self
            .users
            .find_one_with(&txn, json!({ "email": new_user.email }))
            .await?
            .is_some()
        {
            return Err(UserError::EmailTaken(new_user.email.clone()).into());
        }

        let user = User {
            id: object_id::generate(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password: new_user.password.clone(),
            full_name: new_user.full_name.clone(),
            created_at: Utc::now(),
        };

        self.users.insert_one_with(&txn, &user).await?;
        txn.commit().await?;

        tracing::debug!(user_id = %user.id, username = %user.username, "Created user");

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, Error> {
        self.users.find_one_as(json!({ "_id": user_id })).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        self.users.find_one_as(json!({ "username": username })).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        self.users.find_one_as(json!({ "email": email })).await
    }

    /// Lists all users in registration order
    pub async fn list(&self) -> Result<Vec<User>, Error> {
        self.users.find_as(json!({})).await
    }

    /// Deletes a user
    ///
    /// Returns OK regardless of user existing, to confirm the deletion check the returned
    /// count of removed documents.
    pub async fn delete(&self, user_id: &str) -> Result<u64, Error> {
        let result = self.users.delete_one(json!({ "_id": user_id })).await?;

        Ok(result.deleted_count)
    }
}
