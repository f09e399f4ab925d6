use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::{
    db::Collection,
    error::{document::DocumentError, Error},
};

/// Handle to a logical database of a [`DocumentClient`](crate::server::db::DocumentClient).
///
/// Cheap to clone, clones share the client's pool and closed flag.
#[derive(Clone, Debug)]
pub struct DocumentDatabase {
    conn: DatabaseConnection,
    closed: Arc<AtomicBool>,
    name: String,
}

impl DocumentDatabase {
    pub(crate) fn new(conn: DatabaseConnection, closed: Arc<AtomicBool>, name: &str) -> Self {
        Self {
            conn,
            closed,
            name: name.to_string(),
        }
    }

    /// Name of this database.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true once the owning client has been released.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Get a handle to the collection `name`.
    ///
    /// Collections exist implicitly, the first insert creates them.
    pub fn collection(&self, name: &str) -> Collection {
        Collection::new(
            self.conn.clone(),
            self.closed.clone(),
            &self.name,
            name,
        )
    }

    /// List the names of all collections holding at least one document, sorted by name.
    pub async fn list_collection_names(&self) -> Result<Vec<String>, Error> {
        self.ensure_open()?;

        let names = entity::prelude::Document::find()
            .select_only()
            .column(entity::document::Column::Collection)
            .distinct()
            .filter(entity::document::Column::Database.eq(self.name.clone()))
            .order_by_asc(entity::document::Column::Collection)
            .into_tuple::<String>()
            .all(&self.conn)
            .await?;

        Ok(names)
    }

    /// Remove every document of every collection in this database.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of documents removed
    /// - `Err(Error)` - Client closed or delete failed
    pub async fn drop(&self) -> Result<u64, Error> {
        self.ensure_open()?;

        let result = entity::prelude::Document::delete_many()
            .filter(entity::document::Column::Database.eq(self.name.clone()))
            .exec(&self.conn)
            .await?;

        tracing::debug!(
            database = %self.name,
            deleted = result.rows_affected,
            "Dropped database"
        );

        Ok(result.rows_affected)
    }

    fn ensure_open(&self) -> Result<(), DocumentError> {
        if self.is_closed() {
            return Err(DocumentError::ClientClosed);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::server::{error::Error, util::test::setup::test_setup};

    /// Expect collections to be listed in name order once they hold documents
    #[tokio::test]
    async fn test_list_collection_names() -> Result<(), Error> {
        let test = test_setup().await;

        assert!(test.db.list_collection_names().await?.is_empty());

        test.db.collection("users").insert_one(&json!({})).await?;
        test.db.collection("sessions").insert_one(&json!({})).await?;
        test.db.collection("users").insert_one(&json!({})).await?;

        assert_eq!(
            test.db.list_collection_names().await?,
            vec!["sessions", "users"]
        );

        Ok(())
    }

    /// Expect drop to only remove documents of its own database
    #[tokio::test]
    async fn test_drop_is_scoped_to_database() -> Result<(), Error> {
        let test = test_setup().await;
        let other = test.client.database("other");

        test.db.collection("users").insert_one(&json!({})).await?;
        test.db.collection("items").insert_one(&json!({})).await?;
        other.collection("users").insert_one(&json!({})).await?;

        assert_eq!(test.db.drop().await?, 2);

        assert!(test.db.list_collection_names().await?.is_empty());
        assert_eq!(other.collection("users").count_documents(json!({})).await?, 1);

        Ok(())
    }
}
