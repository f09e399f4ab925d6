//! Tests for UserRepository against seeded test databases.
//!
//! This module verifies registration, lookups and deletion of users, using the builder and
//! fixtures to seed each test database.

use rstest::rstest;
use serde_json::json;
use stc::{
    model::user::NewUser,
    server::{
        data::user::{UserRepository, USERS_COLLECTION},
        error::{user::UserError, Error},
    },
};
use stc_test_utils::prelude::*;

/// Tests registering the sample user into an empty database.
///
/// Expected: Ok with the user retrievable by id
#[rstest]
#[tokio::test]
async fn creates_sample_user(
    #[future] test_db: TestContext,
    test_user: NewUser,
) -> Result<(), TestError> {
    let test = test_db.await;
    let user_repository = UserRepository::new(&test.db);

    let user = user_repository.create(&test_user).await?;

    assert_eq!(user.username, test_user.username);
    assert_eq!(user.full_name, test_user.full_name);
    assert_eq!(user_repository.find_by_id(&user.id).await?, Some(user));

    Ok(())
}

/// Tests registering a username that the builder already seeded.
///
/// Expected: Err with UsernameTaken and no second document written
#[tokio::test]
async fn rejects_taken_username() -> Result<(), TestError> {
    let test = TestBuilder::new().with_test_user().build().await?;
    let user_repository = UserRepository::new(&test.db);

    let mut duplicate = factory::mock_user();
    duplicate.email = "someone-else@example.com".to_string();
    let result = user_repository.create(&duplicate).await;

    assert!(matches!(
        result,
        Err(Error::UserError(UserError::UsernameTaken(_)))
    ));
    assert_eq!(
        test.collection(USERS_COLLECTION)
            .count_documents(json!({}))
            .await?,
        1
    );

    Ok(())
}

/// Tests registering an email that the builder already seeded.
///
/// Expected: Err with EmailTaken
#[tokio::test]
async fn rejects_taken_email() -> Result<(), TestError> {
    let test = TestBuilder::new().with_test_user().build().await?;
    let user_repository = UserRepository::new(&test.db);

    let duplicate = NewUser {
        username: "another".to_string(),
        ..factory::mock_user()
    };
    let result = user_repository.create(&duplicate).await;

    assert!(matches!(
        result,
        Err(Error::UserError(UserError::EmailTaken(ref email))) if email == "test@example.com"
    ));

    Ok(())
}

/// Tests lookups against a database seeded with several users.
///
/// Expected: Ok with each lookup resolving to the matching user only
#[tokio::test]
async fn finds_seeded_users() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_test_user()
        .with_user(factory::mock_user_with_username("alice"))
        .with_user(factory::mock_user_with_username("bob"))
        .build()
        .await?;
    let user_repository = UserRepository::new(&test.db);

    let alice = user_repository
        .find_by_username("alice")
        .await?
        .expect("alice should be seeded");
    assert_eq!(alice.email, "alice@example.com");

    let by_email = user_repository.find_by_email("bob@example.com").await?;
    assert_eq!(by_email.map(|user| user.username), Some("bob".to_string()));

    assert!(user_repository.find_by_username("carol").await?.is_none());
    assert_eq!(user_repository.list().await?.len(), 3);

    Ok(())
}

/// Tests deleting a seeded user.
///
/// Expected: Ok with one document removed and the user no longer found
#[tokio::test]
async fn deletes_user() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let user = test.user().insert_test_user().await?;
    let user_repository = UserRepository::new(&test.db);

    assert_eq!(user_repository.delete(&user.id).await?, 1);
    assert_eq!(user_repository.delete(&user.id).await?, 0);
    assert!(user_repository.find_by_username("testuser").await?.is_none());

    test.release().await
}

/// Tests that users written through the repository are plain documents of the users
/// collection.
///
/// Expected: Ok with the stored fields matching the registered record
#[tokio::test]
async fn stores_users_as_documents() -> Result<(), TestError> {
    let test = TestBuilder::new().with_test_user().build().await?;

    let document = test
        .collection(USERS_COLLECTION)
        .find_one(json!({"email": "test@example.com"}))
        .await?
        .expect("sample user should be stored");

    assert_eq!(document.get("username"), Some(&json!("testuser")));
    assert_eq!(document.get("full_name"), Some(&json!("Test User")));
    assert!(document.contains_key("_id"));
    assert!(document.contains_key("created_at"));

    Ok(())
}
