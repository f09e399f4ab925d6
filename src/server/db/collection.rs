use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
    TransactionTrait,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::server::{
    db::{
        filter::{canonical, json_kind, Filter},
        object_id,
        result::{DeleteResult, InsertManyResult, InsertOneResult, UpdateResult},
        update::Update,
        Document, ID_FIELD,
    },
    error::{document::DocumentError, Error},
    model::db::DocumentModel,
};

/// Handle to a collection of JSON documents.
///
/// Reads return documents in insertion order.
#[derive(Clone, Debug)]
pub struct Collection {
    conn: DatabaseConnection,
    closed: Arc<AtomicBool>,
    database: String,
    name: String,
}

/// Document ready to be written: serialized `_id` key, `_id` value and body.
struct PreparedDocument {
    key: String,
    id: Value,
    body: String,
}

impl Collection {
    pub(crate) fn new(
        conn: DatabaseConnection,
        closed: Arc<AtomicBool>,
        database: &str,
        name: &str,
    ) -> Self {
        Self {
            conn,
            closed,
            database: database.to_string(),
            name: name.to_string(),
        }
    }

    /// Name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the database holding this collection.
    pub fn database_name(&self) -> &str {
        &self.database
    }

    /// Insert a single document.
    ///
    /// A `_id` is generated when the document has none.
    ///
    /// # Returns
    /// - `Ok(InsertOneResult)` - The `_id` of the inserted document
    /// - `Err(DocumentError::NotADocument)` - Value does not serialize to a JSON object
    /// - `Err(DocumentError::DuplicateKey)` - A document with the same `_id` exists
    /// - `Err(Error)` - Client closed, serialization or database failure
    pub async fn insert_one<T>(&self, document: &T) -> Result<InsertOneResult, Error>
    where
        T: Serialize + ?Sized,
    {
        let txn = self.begin().await?;
        let inserted_id = self.insert_one_with(&txn, document).await?;
        txn.commit().await?;

        Ok(InsertOneResult { inserted_id })
    }

    /// Insert several documents atomically.
    ///
    /// Either every document is inserted or, on the first failure, none is.
    pub async fn insert_many<T>(&self, documents: &[T]) -> Result<InsertManyResult, Error>
    where
        T: Serialize,
    {
        self.ensure_open()?;
        let prepared = documents
            .iter()
            .map(|document| -> Result<PreparedDocument, Error> {
                prepare(serde_json::to_value(document)?)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let txn = self.conn.begin().await?;
        let mut inserted_ids = Vec::with_capacity(prepared.len());
        for document in prepared {
            inserted_ids.push(self.insert_prepared(&txn, document).await?);
        }
        txn.commit().await?;

        tracing::debug!(
            database = %self.database,
            collection = %self.name,
            count = inserted_ids.len(),
            "Inserted documents"
        );

        Ok(InsertManyResult { inserted_ids })
    }

    /// Find the first document matching `filter`.
    pub async fn find_one(&self, filter: Value) -> Result<Option<Document>, Error> {
        self.find_one_with(&self.conn, filter).await
    }

    /// Find the first document matching `filter` and deserialize it into `T`.
    pub async fn find_one_as<T>(&self, filter: Value) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
    {
        self.find_one(filter)
            .await?
            .map(|document| serde_json::from_value(Value::Object(document)))
            .transpose()
            .map_err(Error::from)
    }

    /// Find every document matching `filter`.
    pub async fn find(&self, filter: Value) -> Result<Vec<Document>, Error> {
        self.ensure_open()?;
        let filter = Filter::parse(&filter)?;

        Ok(self
            .load(&self.conn, &filter, None)
            .await?
            .into_iter()
            .map(|(_, document)| document)
            .collect())
    }

    /// Find every document matching `filter` and deserialize them into `T`.
    pub async fn find_as<T>(&self, filter: Value) -> Result<Vec<T>, Error>
    where
        T: DeserializeOwned,
    {
        self.find(filter)
            .await?
            .into_iter()
            .map(|document| serde_json::from_value(Value::Object(document)).map_err(Error::from))
            .collect()
    }

    /// Count the documents matching `filter`.
    pub async fn count_documents(&self, filter: Value) -> Result<u64, Error> {
        self.ensure_open()?;
        let filter = Filter::parse(&filter)?;

        if filter.is_empty() {
            return Ok(entity::prelude::Document::find()
                .filter(entity::document::Column::Database.eq(self.database.clone()))
                .filter(entity::document::Column::Collection.eq(self.name.clone()))
                .count(&self.conn)
                .await?);
        }

        Ok(self.load(&self.conn, &filter, None).await?.len() as u64)
    }

    /// Apply `update` to the first document matching `filter`.
    pub async fn update_one(&self, filter: Value, update: Value) -> Result<UpdateResult, Error> {
        self.update(filter, update, Some(1)).await
    }

    /// Apply `update` to every document matching `filter`.
    pub async fn update_many(&self, filter: Value, update: Value) -> Result<UpdateResult, Error> {
        self.update(filter, update, None).await
    }

    /// Delete the first document matching `filter`.
    pub async fn delete_one(&self, filter: Value) -> Result<DeleteResult, Error> {
        self.delete(filter, Some(1)).await
    }

    /// Delete every document matching `filter`.
    pub async fn delete_many(&self, filter: Value) -> Result<DeleteResult, Error> {
        self.delete(filter, None).await
    }

    /// Remove every document of this collection.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of documents removed
    pub async fn drop(&self) -> Result<u64, Error> {
        self.ensure_open()?;

        let result = entity::prelude::Document::delete_many()
            .filter(entity::document::Column::Database.eq(self.database.clone()))
            .filter(entity::document::Column::Collection.eq(self.name.clone()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Begin a transaction on the store backing this collection.
    ///
    /// Used with the `*_with` methods to run several reads and writes as one unit.
    pub(crate) async fn begin(&self) -> Result<DatabaseTransaction, Error> {
        self.ensure_open()?;

        Ok(self.conn.begin().await?)
    }

    /// [`Collection::find_one`] on the given connection or transaction.
    pub(crate) async fn find_one_with<C>(
        &self,
        conn: &C,
        filter: Value,
    ) -> Result<Option<Document>, Error>
    where
        C: ConnectionTrait,
    {
        self.ensure_open()?;
        let filter = Filter::parse(&filter)?;

        Ok(self
            .load(conn, &filter, Some(1))
            .await?
            .into_iter()
            .next()
            .map(|(_, document)| document))
    }

    /// [`Collection::insert_one`] on the given connection or transaction.
    ///
    /// # Returns
    /// - `Ok(Value)` - The `_id` of the inserted document
    pub(crate) async fn insert_one_with<C, T>(&self, conn: &C, document: &T) -> Result<Value, Error>
    where
        C: ConnectionTrait,
        T: Serialize + ?Sized,
    {
        self.ensure_open()?;
        let prepared = prepare(serde_json::to_value(document)?)?;
        let inserted_id = self.insert_prepared(conn, prepared).await?;

        tracing::debug!(
            database = %self.database,
            collection = %self.name,
            id = %inserted_id,
            "Inserted document"
        );

        Ok(inserted_id)
    }

    async fn update(
        &self,
        filter: Value,
        update: Value,
        limit: Option<usize>,
    ) -> Result<UpdateResult, Error> {
        self.ensure_open()?;
        let filter = Filter::parse(&filter)?;
        let update = Update::parse(&update)?;

        let txn = self.conn.begin().await?;
        let matched = self.load(&txn, &filter, limit).await?;

        let mut result = UpdateResult {
            matched_count: matched.len() as u64,
            modified_count: 0,
        };

        for (model, mut document) in matched {
            if !update.apply(&mut document)? {
                continue;
            }

            let mut active: entity::document::ActiveModel = model.into();
            active.body = ActiveValue::Set(serde_json::to_string(&document)?);
            active.updated_at = ActiveValue::Set(Utc::now().naive_utc());
            active.update(&txn).await?;

            result.modified_count += 1;
        }
        txn.commit().await?;

        Ok(result)
    }

    async fn delete(&self, filter: Value, limit: Option<usize>) -> Result<DeleteResult, Error> {
        self.ensure_open()?;
        let filter = Filter::parse(&filter)?;

        let txn = self.conn.begin().await?;
        let ids: Vec<i32> = self
            .load(&txn, &filter, limit)
            .await?
            .into_iter()
            .map(|(model, _)| model.id)
            .collect();

        if ids.is_empty() {
            return Ok(DeleteResult::default());
        }

        let result = entity::prelude::Document::delete_many()
            .filter(entity::document::Column::Id.is_in(ids))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        tracing::debug!(
            database = %self.database,
            collection = %self.name,
            deleted = result.rows_affected,
            "Deleted documents"
        );

        Ok(DeleteResult {
            deleted_count: result.rows_affected,
        })
    }

    async fn insert_prepared<C>(&self, conn: &C, document: PreparedDocument) -> Result<Value, Error>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now().naive_utc();
        let result = entity::document::ActiveModel {
            database: ActiveValue::Set(self.database.clone()),
            collection: ActiveValue::Set(self.name.clone()),
            document_id: ActiveValue::Set(document.key.clone()),
            body: ActiveValue::Set(document.body),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await;

        match result {
            Ok(_) => Ok(document.id),
            Err(e) if is_unique_violation(&e) => Err(DocumentError::DuplicateKey {
                collection: self.name.clone(),
                id: document.key,
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load the decoded documents matching `filter`, oldest first, up to `limit`.
    async fn load<C>(
        &self,
        conn: &C,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<(DocumentModel, Document)>, Error>
    where
        C: ConnectionTrait,
    {
        self.ensure_open()?;

        let models = entity::prelude::Document::find()
            .filter(entity::document::Column::Database.eq(self.database.clone()))
            .filter(entity::document::Column::Collection.eq(self.name.clone()))
            .order_by_asc(entity::document::Column::Id)
            .all(conn)
            .await?;

        let mut matched = Vec::new();
        for model in models {
            if limit.is_some_and(|limit| matched.len() >= limit) {
                break;
            }

            let document: Document = serde_json::from_str(&model.body)?;
            if filter.matches(&document) {
                matched.push((model, document));
            }
        }

        Ok(matched)
    }

    fn ensure_open(&self) -> Result<(), DocumentError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DocumentError::ClientClosed);
        }

        Ok(())
    }
}

fn prepare(value: Value) -> Result<PreparedDocument, Error> {
    let mut document = match value {
        Value::Object(document) => document,
        other => return Err(DocumentError::NotADocument(json_kind(&other).to_string()).into()),
    };

    let id = document
        .entry(ID_FIELD)
        .or_insert_with(|| Value::String(object_id::generate()))
        .clone();

    Ok(PreparedDocument {
        key: serde_json::to_string(&canonical(&id))?,
        id,
        body: serde_json::to_string(&document)?,
    })
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
