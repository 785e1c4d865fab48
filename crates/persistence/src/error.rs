//! Error types for the persistence layer.
//!
//! Errors are grouped by category so that callers can map them onto their own
//! failure taxonomy: resource state, document validation, query construction,
//! transactions, and backend failures.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Resource state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Query construction errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Transaction errors
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to document state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested document was not found.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// A document with the given ID already exists.
    #[error("document already exists: {collection}/{id}")]
    AlreadyExists { collection: String, id: String },
}

/// Errors raised when a document or identifier is rejected.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The identifier is not a well-formed document ID.
    #[error("invalid document id '{id}' for {collection}")]
    InvalidId { collection: String, id: String },

    /// The document body is not acceptable.
    #[error("invalid document: {message}")]
    InvalidDocument { message: String },

    /// A required field is missing.
    #[error("missing required field: {field}")]
    MissingRequiredField { field: String },

    /// A field value violates a schema rule.
    #[error("invalid value for '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// A unique field already holds this value in another document.
    #[error("duplicate value for unique field '{field}'")]
    DuplicateValue { field: String, value: String },
}

/// Errors related to query construction.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The field path cannot be addressed.
    #[error("invalid field path '{path}'")]
    InvalidFieldPath { path: String },

    /// The projection mixes inclusion and exclusion.
    #[error("projection cannot mix inclusion and exclusion: {fields}")]
    MixedProjection { fields: String },
}

/// Errors related to transactions.
#[derive(Error, Debug)]
pub enum TransactionError {
    /// Transaction could not be started.
    #[error("failed to begin transaction: {message}")]
    BeginFailed { message: String },

    /// Transaction was rolled back.
    #[error("transaction rolled back: {reason}")]
    RolledBack { reason: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Returns true if this error means the document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Resource(ResourceError::NotFound { .. }))
    }

    /// Returns true if this error was caused by client input rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StorageError::Resource(_) | StorageError::Validation(_) | StorageError::Query(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StorageError::from(ResourceError::NotFound {
            collection: "hospitals".to_string(),
            id: "abc".to_string(),
        });
        assert_eq!(err.to_string(), "document not found: hospitals/abc");
        assert!(err.is_not_found());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_backend_error_is_not_client_error() {
        let err = StorageError::from(BackendError::Unavailable {
            backend_name: "sqlite".to_string(),
            message: "pool closed".to_string(),
        });
        assert!(!err.is_client_error());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_mixed_projection_display() {
        let err = QueryError::MixedProjection {
            fields: "name,-tel".to_string(),
        };
        assert!(err.to_string().contains("name,-tel"));
    }
}
