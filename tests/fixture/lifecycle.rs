//! Tests for acquisition and release of test databases.

use std::sync::{Arc, Mutex};

use serde_json::json;
use stc::server::{db::DocumentDatabase, error::document::DocumentError};
use stc_test_utils::prelude::*;

/// Tests acquiring a test database and releasing it without using it.
///
/// Expected: Ok
#[tokio::test]
async fn noop_body_releases_cleanly() -> Result<(), TestError> {
    with_test_database(|_db| async { Ok::<_, TestError>(()) }).await?;

    let test = TestContext::new().await?;
    test.release().await
}

/// Tests the test database name handed to the body.
///
/// Expected: Ok with the `stc-db-test` database
#[tokio::test]
async fn body_receives_test_database() -> Result<(), TestError> {
    let name = with_test_database(|db| async move { Ok::<_, TestError>(db.name().to_string()) })
        .await?;

    assert_eq!(name, "stc-db-test");

    Ok(())
}

/// Tests release after a failing test body.
///
/// Verifies that the handle is released and that the body's own error reaches the caller
/// unchanged.
///
/// Expected: Err from the body with the handle closed afterwards
#[tokio::test]
async fn failing_body_still_releases() {
    let slot: Arc<Mutex<Option<DocumentDatabase>>> = Arc::default();
    let body_slot = slot.clone();

    let result = with_test_database(|db| async move {
        *body_slot.lock().unwrap() = Some(db.clone());
        db.collection("items").insert_one(&json!(42)).await?;
        Ok::<_, TestError>(())
    })
    .await;

    assert!(matches!(
        result,
        Err(TestError::StcError(stc::server::error::Error::DocumentError(
            DocumentError::NotADocument(_)
        )))
    ));

    let db = slot.lock().unwrap().clone().unwrap();
    assert!(db.is_closed());
}

/// Tests release after a panicking test body.
///
/// Expected: the panic reaches the caller with the handle closed afterwards
#[tokio::test]
async fn panicking_body_still_releases() {
    let slot: Arc<Mutex<Option<DocumentDatabase>>> = Arc::default();
    let body_slot = slot.clone();

    let handle = tokio::spawn(with_test_database(move |db| async move {
        *body_slot.lock().unwrap() = Some(db);
        assert_eq!(1 + 1, 3, "test body assertion failed");
        Ok::<_, TestError>(())
    }));

    assert!(handle.await.unwrap_err().is_panic());

    let db = slot.lock().unwrap().clone().unwrap();
    assert!(db.is_closed());
}

/// Tests that handles kept past release stop accepting work.
///
/// Expected: ClientClosed for every operation after release
#[tokio::test]
async fn handles_fail_after_release() -> Result<(), TestError> {
    let test = TestBuilder::new().with_test_user().build().await?;
    let users = test.collection("users");

    test.release().await?;

    let result = users.count_documents(json!({})).await;
    assert!(matches!(
        result,
        Err(stc::server::error::Error::DocumentError(
            DocumentError::ClientClosed
        ))
    ));

    Ok(())
}
