//! Test context structure and utilities.
//!
//! This module provides the `TestContext` handed to a test body. The context owns a fresh
//! in-memory document client and exposes the database handle derived from it. The client is
//! released either explicitly through [`TestContext::release`] or, as a fallback, when the
//! context is dropped.

use stc::server::db::{Collection, DocumentClient, DocumentDatabase};

use crate::{constant::TEST_DATABASE_NAME, error::TestError};

/// Test context structure returned by `TestBuilder` and the `test_db` fixture
///
/// Each context owns its own in-memory store, so no document written through one context is
/// ever visible through another.
///
/// # Usage
///
/// ```ignore
/// let test = TestBuilder::new().with_test_user().build().await?;
///
/// // Access the database handle
/// let users = test.db.collection("users");
///
/// // Access fixture helpers
/// test.user().insert_user(&factory::mock_user_with_username("other")).await?;
///
/// // Release explicitly to observe release errors
/// test.release().await?;
/// ```
pub struct TestContext {
    /// Handle to the `stc-db-test` database of this context's client
    pub db: DocumentDatabase,

    /// Owning client, `None` once released
    client: Option<DocumentClient>,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// Constructs a new in-memory client and derives the test database handle from it.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context
    /// - `Err(TestError::StcError)` - The in-memory store could not be created
    pub async fn new() -> Result<Self, TestError> {
        let client = DocumentClient::in_memory().await?;
        let db = client.database(TEST_DATABASE_NAME);

        Ok(Self {
            db,
            client: Some(client),
        })
    }

    /// Get a handle to a collection of the test database.
    pub fn collection(&self, name: &str) -> Collection {
        self.db.collection(name)
    }

    /// Returns true once the owning client has been released.
    pub fn is_released(&self) -> bool {
        self.db.is_closed()
    }

    /// Release the owning client.
    ///
    /// # Returns
    /// - `Ok(())` - Client released
    /// - `Err(TestError::StcError)` - Shutting down the connection pool failed
    pub async fn release(mut self) -> Result<(), TestError> {
        if let Some(client) = self.client.take() {
            client.close().await?;
        }

        Ok(())
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        // Handles are marked closed synchronously by `close`, only the pool shutdown is deferred
        if let Some(client) = self.client.take() {
            let release = client.close();

            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    if let Err(e) = release.await {
                        tracing::warn!("Failed to release test database client: {}", e);
                    }
                });
            }
        }
    }
}
