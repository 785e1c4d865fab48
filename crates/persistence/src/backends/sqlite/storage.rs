//! DocumentStorage and CascadingStorage implementations for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Transaction, params, params_from_iter};
use serde_json::{Map, Value};

use crate::core::{CascadeDeleteResult, CascadingStorage, DependentRelation, DocumentStorage};
use crate::error::{
    BackendError, ResourceError, StorageError, StorageResult, TransactionError, ValidationError,
};
use crate::types::{
    CREATED_AT_FIELD, FilterExpression, FindQuery, ID_FIELD, METADATA_FIELDS, StoredDocument,
    UPDATED_AT_FIELD, format_timestamp, is_valid_document_id, new_document_id,
};

use super::SqliteBackend;
use super::backend::internal_error;
use super::query_builder::QueryBuilder;

fn serialization_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::SerializationError { message })
}

fn transaction_error(reason: String) -> StorageError {
    StorageError::Transaction(TransactionError::RolledBack { reason })
}

fn ensure_valid_id(collection: &str, id: &str) -> StorageResult<()> {
    if is_valid_document_id(id) {
        Ok(())
    } else {
        Err(StorageError::Validation(ValidationError::InvalidId {
            collection: collection.to_string(),
            id: id.to_string(),
        }))
    }
}

fn into_object(value: Value) -> StorageResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StorageError::Validation(ValidationError::InvalidDocument {
            message: format!("expected a JSON object, got {}", json_kind(&other)),
        })),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_timestamp(raw: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| internal_error(format!("Failed to parse timestamp '{}': {}", raw, e)))
}

/// Builds a [`StoredDocument`] from the columns of a `documents` row.
fn to_document(
    collection: &str,
    id: String,
    data: &str,
    created_at: &str,
    updated_at: &str,
) -> StorageResult<StoredDocument> {
    let content: Value = serde_json::from_str(data)
        .map_err(|e| serialization_error(format!("Failed to deserialize document: {}", e)))?;

    Ok(StoredDocument::from_storage(
        collection,
        id,
        content,
        parse_timestamp(created_at)?,
        parse_timestamp(updated_at)?,
    ))
}

/// Runs a filtered delete inside an open transaction.
fn delete_matching(
    tx: &Transaction<'_>,
    collection: &str,
    filter: &FilterExpression,
) -> StorageResult<u64> {
    let fragment = QueryBuilder::new(collection).build_delete(filter)?;
    let removed = tx
        .execute(&fragment.sql, params_from_iter(fragment.params.iter()))
        .map_err(|e| internal_error(format!("Failed to delete documents: {}", e)))?;
    Ok(removed as u64)
}

#[async_trait]
impl DocumentStorage for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(&self, collection: &str, document: Value) -> StorageResult<StoredDocument> {
        let mut content = into_object(document)?;
        let conn = self.get_connection()?;

        let id = new_document_id();
        let now = Utc::now();
        let timestamp = format_timestamp(now);

        for field in METADATA_FIELDS {
            content.remove(field);
        }
        content.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        content.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(timestamp.clone()),
        );
        content.insert(
            UPDATED_AT_FIELD.to_string(),
            Value::String(timestamp.clone()),
        );

        let content = Value::Object(content);
        let data = serde_json::to_string(&content)
            .map_err(|e| serialization_error(format!("Failed to serialize document: {}", e)))?;

        conn.execute(
            "INSERT INTO documents (collection, id, data, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![collection, id, data, timestamp],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StorageError::Resource(ResourceError::AlreadyExists {
                    collection: collection.to_string(),
                    id: id.clone(),
                })
            }
            other => internal_error(format!("Failed to insert document: {}", other)),
        })?;

        tracing::debug!(collection = %collection, id = %id, "Document created");

        Ok(StoredDocument::from_storage(collection, id, content, now, now))
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> StorageResult<Option<StoredDocument>> {
        ensure_valid_id(collection, id)?;
        let conn = self.get_connection()?;

        let row = conn
            .query_row(
                "SELECT data, created_at, updated_at
                 FROM documents
                 WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| internal_error(format!("Failed to read document: {}", e)))?;

        row.map(|(data, created_at, updated_at)| {
            to_document(collection, id.to_string(), &data, &created_at, &updated_at)
        })
        .transpose()
    }

    async fn find_by_id_and_update(
        &self,
        collection: &str,
        id: &str,
        changes: Value,
    ) -> StorageResult<Option<StoredDocument>> {
        ensure_valid_id(collection, id)?;
        let changes = into_object(changes)?;

        let mut conn = self.get_connection()?;
        let tx = conn
            .transaction()
            .map_err(|e| StorageError::Transaction(TransactionError::BeginFailed {
                message: e.to_string(),
            }))?;

        let current = tx
            .query_row(
                "SELECT data, created_at FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .map_err(|e| internal_error(format!("Failed to read document: {}", e)))?;

        let Some((data, created_at)) = current else {
            return Ok(None);
        };

        let stored: Value = serde_json::from_str(&data)
            .map_err(|e| serialization_error(format!("Failed to deserialize document: {}", e)))?;
        let mut content = into_object(stored)?;

        for (field, value) in changes {
            if !METADATA_FIELDS.contains(&field.as_str()) {
                content.insert(field, value);
            }
        }

        let now = Utc::now();
        let timestamp = format_timestamp(now);
        content.insert(
            UPDATED_AT_FIELD.to_string(),
            Value::String(timestamp.clone()),
        );

        let content = Value::Object(content);
        let data = serde_json::to_string(&content)
            .map_err(|e| serialization_error(format!("Failed to serialize document: {}", e)))?;

        tx.execute(
            "UPDATE documents SET data = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
            params![data, timestamp, collection, id],
        )
        .map_err(|e| internal_error(format!("Failed to update document: {}", e)))?;

        tx.commit()
            .map_err(|e| transaction_error(format!("Failed to commit update: {}", e)))?;

        tracing::debug!(collection = %collection, id = %id, "Document updated");

        Ok(Some(StoredDocument::from_storage(
            collection,
            id,
            content,
            parse_timestamp(&created_at)?,
            now,
        )))
    }

    async fn delete_one(&self, collection: &str, id: &str) -> StorageResult<bool> {
        ensure_valid_id(collection, id)?;
        let conn = self.get_connection()?;

        let removed = conn
            .execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )
            .map_err(|e| internal_error(format!("Failed to delete document: {}", e)))?;

        Ok(removed > 0)
    }

    async fn delete_many(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> StorageResult<u64> {
        let fragment = QueryBuilder::new(collection).build_delete(filter)?;
        let conn = self.get_connection()?;

        let removed = conn
            .execute(&fragment.sql, params_from_iter(fragment.params.iter()))
            .map_err(|e| internal_error(format!("Failed to delete documents: {}", e)))?;

        Ok(removed as u64)
    }

    async fn count_documents(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> StorageResult<u64> {
        let fragment = QueryBuilder::new(collection).build_count(filter)?;
        let conn = self.get_connection()?;

        let count: i64 = conn
            .query_row(
                &fragment.sql,
                params_from_iter(fragment.params.iter()),
                |row| row.get(0),
            )
            .map_err(|e| internal_error(format!("Failed to count documents: {}", e)))?;

        Ok(count.max(0) as u64)
    }

    async fn find(
        &self,
        collection: &str,
        query: &FindQuery,
    ) -> StorageResult<Vec<StoredDocument>> {
        let fragment = QueryBuilder::new(collection).build_find(query)?;
        let conn = self.get_connection()?;

        let mut stmt = conn
            .prepare(&fragment.sql)
            .map_err(|e| internal_error(format!("Failed to prepare find: {}", e)))?;

        let rows = stmt
            .query_map(params_from_iter(fragment.params.iter()), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| internal_error(format!("Failed to execute find: {}", e)))?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, data, created_at, updated_at) =
                row.map_err(|e| internal_error(format!("Failed to read row: {}", e)))?;
            let document = to_document(collection, id, &data, &created_at, &updated_at)?;

            documents.push(match &query.projection {
                Some(projection) => {
                    let projected = projection.apply(document.content());
                    StoredDocument::from_storage(
                        collection,
                        document.id(),
                        projected,
                        document.created_at(),
                        document.updated_at(),
                    )
                }
                None => document,
            });
        }

        Ok(documents)
    }

    async fn health_check(&self) -> StorageResult<()> {
        let conn = self.get_connection().map_err(|_| {
            StorageError::Backend(BackendError::Unavailable {
                backend_name: "sqlite".to_string(),
                message: "Failed to get connection".to_string(),
            })
        })?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| internal_error(format!("Health check failed: {}", e)))
    }
}

#[async_trait]
impl CascadingStorage for SqliteBackend {
    async fn delete_cascade(
        &self,
        collection: &str,
        id: &str,
        dependents: &[DependentRelation],
    ) -> StorageResult<CascadeDeleteResult> {
        ensure_valid_id(collection, id)?;

        let mut conn = self.get_connection()?;
        let tx = conn
            .transaction()
            .map_err(|e| StorageError::Transaction(TransactionError::BeginFailed {
                message: e.to_string(),
            }))?;

        let mut dependents_deleted = 0;
        for relation in dependents {
            let removed = delete_matching(&tx, &relation.collection, &relation.filter_for(id))?;
            tracing::debug!(
                collection = %relation.collection,
                field = %relation.field,
                target = %id,
                removed,
                "Removed dependent documents"
            );
            dependents_deleted += removed;
        }

        let removed = tx
            .execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )
            .map_err(|e| internal_error(format!("Failed to delete document: {}", e)))?;

        tx.commit()
            .map_err(|e| transaction_error(format!("Failed to commit cascade delete: {}", e)))?;

        Ok(CascadeDeleteResult {
            deleted: removed > 0,
            dependents_deleted,
        })
    }
}
