use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use sea_orm::{
    sea_query::Index, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    QueryOrder, QuerySelect, Schema,
};

use crate::server::{
    db::DocumentDatabase,
    error::{document::DocumentError, Error},
};

/// Connection URL of a private in-memory SQLite database.
pub static IN_MEMORY_URL: &str = "sqlite::memory:";

/// Unique index over the key of a document inside its collection.
static IDX_DOCUMENT_KEY: &str = "idx_document_database_collection_document_id";

/// Client owning the connection pool of a document store.
///
/// Database handles created through [`DocumentClient::database`] share the pool and the
/// closed flag with the client, so releasing the client stops every handle derived from it.
pub struct DocumentClient {
    conn: DatabaseConnection,
    closed: Arc<AtomicBool>,
}

impl DocumentClient {
    /// Create a client backed by a fresh in-memory store.
    ///
    /// Every call yields an isolated store, nothing written through one client is visible to
    /// another.
    ///
    /// # Returns
    /// - `Ok(DocumentClient)` - Client ready for use
    /// - `Err(Error::DbErr)` - Connection or schema creation failed
    pub async fn in_memory() -> Result<Self, Error> {
        Self::connect(IN_MEMORY_URL, 1).await
    }

    /// Connect to the store at `url` and create the document table if it is missing.
    ///
    /// # Arguments
    /// - `url` - SeaORM connection URL
    /// - `max_connections` - Upper bound of the connection pool
    ///
    /// # Returns
    /// - `Ok(DocumentClient)` - Client ready for use
    /// - `Err(Error::DbErr)` - Connection or schema creation failed
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, Error> {
        // Connections to one in-memory store share a cache, concurrent writers deadlock on it
        let max_connections = if is_in_memory(url) {
            1
        } else {
            max_connections
        };

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(max_connections)
            .min_connections(1)
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        let schema = Schema::new(conn.get_database_backend());
        let mut stmt = schema.create_table_from_entity(entity::prelude::Document);
        stmt.if_not_exists();
        conn.execute(&stmt).await?;

        let index = Index::create()
            .name(IDX_DOCUMENT_KEY)
            .table(entity::prelude::Document)
            .col(entity::document::Column::Database)
            .col(entity::document::Column::Collection)
            .col(entity::document::Column::DocumentId)
            .unique()
            .if_not_exists()
            .to_owned();
        conn.execute(&index).await?;

        tracing::debug!(max_connections, "Connected document client");

        Ok(Self {
            conn,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get a handle to the logical database `name`.
    ///
    /// Databases exist implicitly, the handle can be used right away.
    pub fn database(&self, name: &str) -> DocumentDatabase {
        DocumentDatabase::new(self.conn.clone(), self.closed.clone(), name)
    }

    /// List the names of all databases holding at least one document.
    pub async fn list_database_names(&self) -> Result<Vec<String>, Error> {
        if self.is_closed() {
            return Err(DocumentError::ClientClosed.into());
        }

        let names = entity::prelude::Document::find()
            .select_only()
            .column(entity::document::Column::Database)
            .distinct()
            .order_by_asc(entity::document::Column::Database)
            .into_tuple::<String>()
            .all(&self.conn)
            .await?;

        Ok(names)
    }

    /// Returns true once [`DocumentClient::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Release the client.
    ///
    /// The client and all of its handles are marked closed as soon as this is called, the
    /// returned future then shuts the connection pool down. Errors from the shutdown are
    /// returned to the caller.
    pub fn close(self) -> impl Future<Output = Result<(), Error>> + Send + 'static {
        self.closed.store(true, Ordering::SeqCst);
        let conn = self.conn;

        async move {
            conn.close().await?;
            tracing::debug!("Closed document client");

            Ok(())
        }
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
