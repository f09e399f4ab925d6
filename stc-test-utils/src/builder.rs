//! Declarative test builder.
//!
//! This module provides the `TestBuilder` API for configuring a test database before the test
//! body runs. Methods can be chained together, all operations are queued and executed during
//! the final `build()` call.

use serde_json::Value;
use stc::model::user::NewUser;

use crate::{error::TestError, fixtures::user::factory, TestContext};

/// Builder for declarative test initialization.
///
/// Provides an interface for seeding a fresh test database with raw documents and users.
/// Finalize with `build()` to create the [`TestContext`].
#[derive(Default)]
pub struct TestBuilder {
    documents: Vec<(String, Value)>, // (collection, document)
    users: Vec<NewUser>,
}

impl TestBuilder {
    /// Create a new TestBuilder.
    ///
    /// Initializes an empty builder with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document into a collection.
    ///
    /// # Arguments
    /// - `collection` - Name of the collection
    /// - `document` - JSON object to insert, a `_id` is generated when missing
    ///
    /// # Returns
    /// - `Self` - The builder instance for method chaining
    pub fn with_document(mut self, collection: impl Into<String>, document: Value) -> Self {
        self.documents.push((collection.into(), document));
        self
    }

    /// Insert several documents into a collection, in order.
    pub fn with_documents<I>(mut self, collection: impl Into<String>, documents: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let collection = collection.into();
        self.documents.extend(
            documents
                .into_iter()
                .map(|document| (collection.clone(), document)),
        );
        self
    }

    /// Register the sample user.
    ///
    /// # Returns
    /// - `Self` - The builder instance for method chaining
    pub fn with_test_user(self) -> Self {
        self.with_user(factory::mock_user())
    }

    /// Register a user through the user repository.
    ///
    /// # Arguments
    /// - `user` - The user to register
    ///
    /// # Returns
    /// - `Self` - The builder instance for method chaining
    pub fn with_user(mut self, user: NewUser) -> Self {
        self.users.push(user);
        self
    }

    /// Build the test context by executing all queued operations.
    ///
    /// Executes all queued operations in the following order:
    /// 1. Creates a fresh in-memory client and test database
    /// 2. Inserts raw documents in the order they were queued
    /// 3. Registers users in the order they were queued
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully seeded test environment ready for use
    /// - `Err(TestError::StcError)` - Store creation or a seeding operation failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let setup = TestContext::new().await?;

        for (collection, document) in self.documents {
            setup.collection(&collection).insert_one(&document).await?;
        }

        for user in &self.users {
            setup.user().insert_user(user).await?;
        }

        Ok(setup)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stc::server::data::user::UserRepository;

    use super::*;
    use crate::fixtures::user::factory::mock_user_with_username;

    /// Expect an empty builder to produce an empty database
    #[tokio::test]
    async fn test_builder_empty() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;

        assert!(test.db.list_collection_names().await?.is_empty());

        Ok(())
    }

    /// Expect chained seeding methods to all be applied
    #[tokio::test]
    async fn test_builder_chains_methods() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_document("items", json!({"_id": 1, "name": "x"}))
            .with_documents("items", vec![json!({"_id": 2}), json!({"_id": 3})])
            .with_test_user()
            .with_user(mock_user_with_username("other"))
            .build()
            .await?;

        assert_eq!(test.collection("items").count_documents(json!({})).await?, 3);

        let users = UserRepository::new(&test.db).list().await?;
        let usernames: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(usernames, vec!["testuser", "other"]);

        Ok(())
    }

    /// Expect Error when seeding the same _id twice
    #[tokio::test]
    async fn test_builder_duplicate_document() {
        let result = TestBuilder::new()
            .with_document("items", json!({"_id": 1}))
            .with_document("items", json!({"_id": 1}))
            .build()
            .await;

        assert!(result.is_err());
    }

    /// Expect Error when registering the sample user twice
    #[tokio::test]
    async fn test_builder_duplicate_user() {
        let result = TestBuilder::new()
            .with_test_user()
            .with_test_user()
            .build()
            .await;

        assert!(result.is_err());
    }
}
