//! Core document storage traits.
//!
//! This module defines [`DocumentStorage`], the collection-level operations the
//! service relies on, and [`CascadingStorage`], which removes a document together
//! with the documents that reference it.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageResult;
use crate::types::{FilterExpression, FindQuery, StoredDocument};

/// Collection-oriented document storage.
///
/// Documents are JSON objects grouped into named collections. The storage layer
/// assigns `_id`, `createdAt` and `updatedAt`; identifiers that are not
/// well-formed are rejected with a validation error rather than treated as
/// missing.
///
/// # Example
///
/// ```ignore
/// use vacq_persistence::core::DocumentStorage;
/// use vacq_persistence::types::{FilterExpression, FindQuery, SortDirective};
///
/// async fn example<S: DocumentStorage>(storage: &S) -> StorageResult<()> {
///     let created = storage
///         .create("hospitals", serde_json::json!({"name": "Chulalongkorn"}))
///         .await?;
///
///     let found = storage.find_by_id("hospitals", created.id()).await?;
///     assert!(found.is_some());
///
///     let page = storage
///         .find(
///             "hospitals",
///             &FindQuery::new()
///                 .with_sort(SortDirective::desc("createdAt"))
///                 .with_limit(25),
///         )
///         .await?;
///     println!("{} hospitals", page.len());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Inserts a new document.
    ///
    /// The document must be a JSON object. Any client-supplied metadata fields
    /// are replaced by storage-assigned values.
    ///
    /// # Errors
    ///
    /// * `StorageError::Validation` - If the document is not an object
    async fn create(&self, collection: &str, document: Value) -> StorageResult<StoredDocument>;

    /// Reads a document by identifier.
    ///
    /// # Returns
    ///
    /// The document if present, or `None`.
    ///
    /// # Errors
    ///
    /// * `StorageError::Validation(InvalidId)` - If `id` is malformed
    async fn find_by_id(&self, collection: &str, id: &str)
    -> StorageResult<Option<StoredDocument>>;

    /// Applies `changes` to a document and returns the updated version.
    ///
    /// Top-level fields of `changes` replace the stored fields of the same name
    /// (`$set` semantics); metadata fields in `changes` are ignored.
    ///
    /// # Returns
    ///
    /// The post-update document, or `None` if no document has this id.
    async fn find_by_id_and_update(
        &self,
        collection: &str,
        id: &str,
        changes: Value,
    ) -> StorageResult<Option<StoredDocument>>;

    /// Deletes a document by identifier.
    ///
    /// # Returns
    ///
    /// `true` if a document was removed.
    async fn delete_one(&self, collection: &str, id: &str) -> StorageResult<bool>;

    /// Deletes every document matching the filter.
    ///
    /// # Returns
    ///
    /// The number of removed documents.
    async fn delete_many(&self, collection: &str, filter: &FilterExpression)
    -> StorageResult<u64>;

    /// Counts documents matching the filter.
    async fn count_documents(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> StorageResult<u64>;

    /// Finds documents with filtering, projection, sorting and paging.
    async fn find(&self, collection: &str, query: &FindQuery)
    -> StorageResult<Vec<StoredDocument>>;

    /// Checks if a document exists.
    async fn exists(&self, collection: &str, id: &str) -> StorageResult<bool> {
        Ok(self.find_by_id(collection, id).await?.is_some())
    }

    /// Verifies the backend can serve requests.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// A collection whose documents reference another collection's documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependentRelation {
    /// The referencing collection (e.g. `appointments`).
    pub collection: String,
    /// The field holding the referenced document's id (e.g. `hospital`).
    pub field: String,
}

impl DependentRelation {
    /// Creates a relation.
    pub fn new(collection: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            field: field.into(),
        }
    }

    /// Returns the filter selecting the documents that reference `id`.
    pub fn filter_for(&self, id: &str) -> FilterExpression {
        FilterExpression::new().eq(self.field.clone(), id)
    }
}

/// Outcome of a cascading delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeDeleteResult {
    /// Whether the target document was removed.
    pub deleted: bool,
    /// How many dependent documents were removed.
    pub dependents_deleted: u64,
}

/// Storage that can delete a document and its dependents as one unit.
#[async_trait]
pub trait CascadingStorage: DocumentStorage {
    /// Deletes the documents referencing `id` through each relation, then the
    /// document itself.
    ///
    /// Either every deletion is applied or none is.
    async fn delete_cascade(
        &self,
        collection: &str,
        id: &str,
        dependents: &[DependentRelation],
    ) -> StorageResult<CascadeDeleteResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldFilter;

    #[test]
    fn test_dependent_relation_filter() {
        let relation = DependentRelation::new("appointments", "hospital");
        let filter = relation.filter_for("abc");
        assert_eq!(
            filter.get("hospital"),
            Some(&FieldFilter::Equals("abc".to_string()))
        );
    }
}
