//! Tests for the sample user fixture.

use rstest::rstest;
use serde_json::{json, Value};
use stc::model::user::NewUser;
use stc_test_utils::prelude::*;

/// Tests the fields of the sample user record.
///
/// Expected: exactly username, email, password and full_name with the standard values
#[rstest]
fn has_exactly_the_standard_fields(test_user: NewUser) {
    let value = serde_json::to_value(&test_user).unwrap();

    assert_eq!(
        value,
        json!({
            "username": "testuser",
            "email": "test@example.com",
            "password": "testpass123",
            "full_name": "Test User"
        })
    );
    assert_eq!(value.as_object().map(|fields| fields.len()), Some(4));
    assert!(value.get("_id").is_none());
}

/// Tests that every invocation builds an equal but independent record.
///
/// Expected: mutating one record leaves the next invocation untouched
#[rstest]
fn is_fresh_per_invocation(test_user: NewUser) {
    let mut mutated = test_user;
    mutated.username.push_str("-mutated");

    let next = factory::mock_user();

    assert_eq!(next.username, "testuser");
    assert_ne!(mutated, next);
}

/// Tests registering the sample user in a fixture database.
///
/// Expected: Ok with the stored user found by username and email
#[rstest]
#[tokio::test]
async fn registers_in_test_database(
    #[future] test_db: TestContext,
    test_user: NewUser,
) -> Result<(), TestError> {
    let test = test_db.await;

    let stored = test.user().insert_user(&test_user).await?;

    let document = test
        .collection("users")
        .find_one(json!({"username": "testuser"}))
        .await?
        .expect("sample user should be stored");
    assert_eq!(document.get("_id"), Some(&Value::String(stored.id.clone())));
    assert_eq!(document.get("email"), Some(&json!(test_user.email)));

    test.release().await
}
