//! Scoped test database acquisition.

use std::{future::Future, panic::AssertUnwindSafe};

use futures::FutureExt;
use stc::server::db::DocumentDatabase;

use crate::{context::TestContext, error::TestError};

/// Run `body` against a fresh test database and release it afterwards.
///
/// Setup strictly precedes the body and release strictly follows it, whether the body
/// returns `Ok`, returns `Err` or panics. The body may await freely in between.
///
/// # Arguments
/// - `body` - Test body receiving the database handle
///
/// # Returns
/// - `Ok(T)` - Body succeeded and the client was released
/// - `Err(E)` - Setup failed, the body failed, or the release failed after a successful body.
///   When both the body and the release fail, the body's error is returned and the release
///   error is logged.
///
/// # Panics
/// Resumes the body's panic once the client has been released
///
/// # Example
///
/// ```no_run
/// use serde_json::json;
/// use stc_test_utils::{with_test_database, TestError};
///
/// # async fn example() -> Result<(), TestError> {
/// with_test_database(|db| async move {
///     db.collection("items").insert_one(&json!({"_id": 1, "name": "x"})).await?;
///     Ok::<_, TestError>(())
/// })
/// .await
/// # }
/// ```
pub async fn with_test_database<F, Fut, T, E>(body: F) -> Result<T, E>
where
    F: FnOnce(DocumentDatabase) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<TestError>,
{
    let test = TestContext::new().await.map_err(E::from)?;

    let outcome = AssertUnwindSafe(body(test.db.clone())).catch_unwind().await;
    let released = test.release().await;

    match outcome {
        Ok(Ok(value)) => {
            released.map_err(E::from)?;
            Ok(value)
        }
        Ok(Err(err)) => {
            if let Err(e) = released {
                tracing::error!("Failed to release test database after test failure: {}", e);
            }
            Err(err)
        }
        Err(panic) => {
            if let Err(e) = released {
                tracing::error!("Failed to release test database after test panic: {}", e);
            }
            std::panic::resume_unwind(panic)
        }
    }
}
