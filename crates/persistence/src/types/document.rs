//! Stored document type.
//!
//! A [`StoredDocument`] wraps the JSON content of a document together with the
//! metadata the storage layer manages on its behalf.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field holding the document identifier.
pub const ID_FIELD: &str = "_id";

/// Field holding the creation timestamp.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Field holding the last modification timestamp.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Fields owned by the storage layer; clients cannot overwrite them.
pub const METADATA_FIELDS: [&str; 3] = [ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD];

/// Generates a new document identifier.
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Returns true if `id` is a well-formed document identifier.
///
/// Only the hyphenated form produced by [`new_document_id`] is accepted.
pub fn is_valid_document_id(id: &str) -> bool {
    id.len() == 36 && uuid::Uuid::parse_str(id).is_ok()
}

/// Formats a timestamp the way it is stored inside documents.
///
/// Microsecond precision with a `Z` suffix keeps the textual form sortable.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// A document as persisted in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    collection: String,
    id: String,
    content: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Builds a document from values read back from storage.
    pub fn from_storage(
        collection: impl Into<String>,
        id: impl Into<String>,
        content: Value,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
            content,
            created_at,
            updated_at,
        }
    }

    /// Returns the collection this document belongs to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the document identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the JSON content, including metadata fields.
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Consumes the document and returns its JSON content.
    pub fn into_content(self) -> Value {
        self.content
    }

    /// Returns a top-level field of the content.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.content.get(name)
    }

    /// Returns when the document was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the document was last modified.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_ids_are_valid() {
        let id = new_document_id();
        assert!(is_valid_document_id(&id));
        assert_ne!(id, new_document_id());
    }

    #[test]
    fn test_malformed_ids_are_rejected() {
        assert!(!is_valid_document_id(""));
        assert!(!is_valid_document_id("12345"));
        assert!(!is_valid_document_id("5f8d0d55b54764421b7156c9"));
    }

    #[test]
    fn test_alternate_uuid_forms_are_rejected() {
        let id = new_document_id();
        assert!(!is_valid_document_id(&format!("{{{}}}", id)));
        assert!(!is_valid_document_id(&format!("urn:uuid:{}", id)));
        assert!(!is_valid_document_id(&id.replace('-', "")));
    }

    #[test]
    fn test_timestamp_format_is_sortable() {
        let earlier = DateTime::parse_from_rfc3339("2024-01-01T09:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);
        let later = DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let (a, b) = (format_timestamp(earlier), format_timestamp(later));
        assert_eq!(a, "2024-01-01T09:00:00.500000Z");
        assert!(a < b);
    }

    #[test]
    fn test_accessors() {
        let now = Utc::now();
        let doc = StoredDocument::from_storage(
            "hospitals",
            "id-1",
            json!({"_id": "id-1", "name": "Chula"}),
            now,
            now,
        );
        assert_eq!(doc.collection(), "hospitals");
        assert_eq!(doc.id(), "id-1");
        assert_eq!(doc.field("name"), Some(&json!("Chula")));
        assert_eq!(doc.into_content()["_id"], "id-1");
    }
}
