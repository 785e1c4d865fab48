//! Application state for the VacQ REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the storage backend and the server configuration.

use std::sync::Arc;

use vacq_persistence::core::DocumentStorage;

use crate::config::ServerConfig;
use crate::query::ListQueryBuilder;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`DocumentStorage`])
///
/// # Example
///
/// ```rust,ignore
/// use vacq_rest::{AppState, ServerConfig};
/// use vacq_persistence::backends::sqlite::SqliteBackend;
/// use std::sync::Arc;
///
/// let backend = SqliteBackend::in_memory()?;
/// let config = ServerConfig::default();
/// let state = AppState::new(Arc::new(backend), config);
/// ```
pub struct AppState<S> {
    /// The storage backend.
    storage: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: DocumentStorage> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a clone of the storage Arc.
    pub fn storage_arc(&self) -> Arc<S> {
        Arc::clone(&self.storage)
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the page size used when a list request has no usable `limit`.
    pub fn default_page_size(&self) -> u64 {
        self.config.default_page_size
    }

    /// Returns a list query builder configured for this server.
    pub fn list_query_builder(&self) -> ListQueryBuilder {
        ListQueryBuilder::new(self.config.operator_rewrite, self.config.default_page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OperatorRewriteMode;
    use async_trait::async_trait;
    use serde_json::Value;
    use vacq_persistence::error::StorageResult;
    use vacq_persistence::types::{FilterExpression, FindQuery, StoredDocument};

    // Mock storage for testing
    struct MockStorage;

    #[async_trait]
    impl DocumentStorage for MockStorage {
        fn backend_name(&self) -> &'static str {
            "mock"
        }

        async fn create(&self, _collection: &str, _document: Value) -> StorageResult<StoredDocument> {
            unimplemented!()
        }

        async fn find_by_id(
            &self,
            _collection: &str,
            _id: &str,
        ) -> StorageResult<Option<StoredDocument>> {
            unimplemented!()
        }

        async fn find_by_id_and_update(
            &self,
            _collection: &str,
            _id: &str,
            _changes: Value,
        ) -> StorageResult<Option<StoredDocument>> {
            unimplemented!()
        }

        async fn delete_one(&self, _collection: &str, _id: &str) -> StorageResult<bool> {
            unimplemented!()
        }

        async fn delete_many(
            &self,
            _collection: &str,
            _filter: &FilterExpression,
        ) -> StorageResult<u64> {
            unimplemented!()
        }

        async fn count_documents(
            &self,
            _collection: &str,
            _filter: &FilterExpression,
        ) -> StorageResult<u64> {
            unimplemented!()
        }

        async fn find(
            &self,
            _collection: &str,
            _query: &FindQuery,
        ) -> StorageResult<Vec<StoredDocument>> {
            unimplemented!()
        }
    }

    #[test]
    fn test_app_state_creation() {
        let storage = Arc::new(MockStorage);
        let config = ServerConfig::default();
        let state = AppState::new(storage, config);

        assert_eq!(state.storage().backend_name(), "mock");
        assert_eq!(state.default_page_size(), 25);
    }

    #[test]
    fn test_app_state_builder_follows_config() {
        let storage = Arc::new(MockStorage);
        let config = ServerConfig {
            default_page_size: 10,
            operator_rewrite: OperatorRewriteMode::Textual,
            ..Default::default()
        };
        let state = AppState::new(storage, config);

        let builder = state.list_query_builder();
        assert_eq!(builder.mode(), OperatorRewriteMode::Textual);
        assert_eq!(builder.default_limit(), 10);
    }

    #[test]
    fn test_app_state_clone() {
        let storage = Arc::new(MockStorage);
        let config = ServerConfig::default();
        let state = AppState::new(storage, config);
        let cloned = state.clone();

        assert_eq!(state.config().port, cloned.config().port);
    }
}
