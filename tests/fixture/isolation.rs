//! Tests for isolation between test database handles.

use futures::future::try_join_all;
use rstest::rstest;
use serde_json::json;
use stc_test_utils::prelude::*;

/// Tests the insert-then-read scenario followed by a fresh fixture.
///
/// Verifies that a document written and read back through one test database is not
/// visible through the handle of a later test.
///
/// Expected: Ok with the later collection empty
#[tokio::test]
async fn later_test_finds_collection_empty() -> Result<(), TestError> {
    with_test_database(|db| async move {
        let items = db.collection("items");
        items.insert_one(&json!({"_id": 1, "name": "x"})).await?;

        let found = items.find_one(json!({"_id": 1})).await?;
        assert_eq!(found.unwrap().get("name"), Some(&json!("x")));

        Ok::<_, TestError>(())
    })
    .await?;

    with_test_database(|db| async move {
        assert_eq!(db.collection("items").count_documents(json!({})).await?, 0);
        assert!(db.list_collection_names().await?.is_empty());

        Ok::<_, TestError>(())
    })
    .await
}

/// Tests two fixture-injected tests writing the same `_id`.
///
/// Whichever of the two runs second would hit a duplicate key if the databases were
/// shared.
///
/// Expected: both tests insert successfully into an empty collection
#[rstest]
#[case::first("first")]
#[case::second("second")]
#[tokio::test]
async fn fixture_databases_do_not_leak(#[future] test_db: TestContext, #[case] name: &str) {
    let test = test_db.await;
    let items = test.collection("items");

    assert_eq!(items.count_documents(json!({})).await.unwrap(), 0);
    items
        .insert_one(&json!({"_id": 1, "name": name}))
        .await
        .expect("a fresh database has no document with _id 1");
}

/// Tests concurrently held test databases.
///
/// Verifies that mutating one of several simultaneously open handles leaves the others
/// untouched.
///
/// Expected: Ok with only the mutated database holding documents
#[tokio::test]
async fn concurrent_databases_are_independent() -> Result<(), TestError> {
    let contexts = try_join_all((0..4).map(|_| TestContext::new())).await?;

    contexts[0]
        .collection("items")
        .insert_many(&[json!({"_id": 1}), json!({"_id": 2})])
        .await?;

    let collections: Vec<_> = contexts.iter().map(|test| test.collection("items")).collect();
    let counts = try_join_all(
        collections
            .iter()
            .map(|items| items.count_documents(json!({}))),
    )
    .await?;

    assert_eq!(counts, vec![2, 0, 0, 0]);

    Ok(())
}

/// Tests test databases used from parallel tasks.
///
/// Expected: each task only observes its own writes
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn parallel_tasks_see_own_writes() -> Result<(), TestError> {
    let tasks: Vec<_> = (0..4)
        .map(|task| {
            tokio::spawn(with_test_database(move |db| async move {
                let items = db.collection("items");
                for n in 0..=task {
                    items.insert_one(&json!({"task": task, "n": n})).await?;
                }

                Ok::<_, TestError>(items.count_documents(json!({})).await?)
            }))
        })
        .collect();

    for (task, handle) in tasks.into_iter().enumerate() {
        let count = handle.await.expect("task panicked")?;
        assert_eq!(count, task as u64 + 1);
    }

    Ok(())
}
