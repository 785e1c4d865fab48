//! SQLite backend integration tests.
//!
//! These tests exercise the document storage traits against an in-memory
//! SQLite database.

use serde_json::{Value, json};

use vacq_persistence::backends::sqlite::SqliteBackend;
use vacq_persistence::core::{CascadingStorage, DependentRelation, DocumentStorage};
use vacq_persistence::error::{StorageError, ValidationError};
use vacq_persistence::types::{
    ComparisonOperator, FilterExpression, FindQuery, Projection, SortDirective,
};

fn create_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    backend
}

fn hospital(name: &str, region: &str, postalcode: &str) -> Value {
    json!({
        "name": name,
        "address": "1873 Rama IV Rd",
        "district": "Pathum Wan",
        "province": "Bangkok",
        "postalcode": postalcode,
        "region": region
    })
}

async fn seed(backend: &SqliteBackend) -> Vec<String> {
    let mut ids = Vec::new();
    for (name, region, postalcode) in [
        ("Alpha", "Central", "10100"),
        ("Bravo", "North", "50200"),
        ("Charlie", "Central", "10330"),
        ("Delta", "South", "90110"),
    ] {
        let created = backend
            .create("hospitals", hospital(name, region, postalcode))
            .await
            .unwrap();
        ids.push(created.id().to_string());
    }
    ids
}

fn names(documents: &[vacq_persistence::types::StoredDocument]) -> Vec<String> {
    documents
        .iter()
        .map(|d| d.field("name").and_then(Value::as_str).unwrap_or("").to_string())
        .collect()
}

// ============================================================================
// Create / Read
// ============================================================================

#[tokio::test]
async fn test_create_assigns_metadata() {
    let backend = create_backend();

    let created = backend
        .create("hospitals", hospital("Siriraj", "Central", "10700"))
        .await
        .unwrap();

    assert_eq!(created.collection(), "hospitals");
    assert_eq!(created.field("_id"), Some(&json!(created.id())));
    assert!(created.field("createdAt").is_some());
    assert_eq!(created.field("createdAt"), created.field("updatedAt"));
    assert_eq!(created.field("name"), Some(&json!("Siriraj")));
}

#[tokio::test]
async fn test_create_ignores_client_metadata() {
    let backend = create_backend();

    let mut doc = hospital("Ramathibodi", "Central", "10400");
    doc["_id"] = json!("client-chosen");
    doc["createdAt"] = json!("1999-01-01T00:00:00Z");

    let created = backend.create("hospitals", doc).await.unwrap();
    assert_ne!(created.id(), "client-chosen");
    assert_ne!(created.field("createdAt"), Some(&json!("1999-01-01T00:00:00Z")));
}

#[tokio::test]
async fn test_create_rejects_non_object() {
    let backend = create_backend();

    let result = backend.create("hospitals", json!(["not", "an", "object"])).await;
    assert!(matches!(
        result,
        Err(StorageError::Validation(ValidationError::InvalidDocument { .. }))
    ));
}

#[tokio::test]
async fn test_find_by_id_roundtrip() {
    let backend = create_backend();

    let created = backend
        .create("hospitals", hospital("Vajira", "Central", "10300"))
        .await
        .unwrap();

    let found = backend
        .find_by_id("hospitals", created.id())
        .await
        .unwrap()
        .expect("document should exist");
    assert_eq!(found.content(), created.content());
}

#[tokio::test]
async fn test_find_by_id_missing_is_none() {
    let backend = create_backend();

    let id = uuid::Uuid::new_v4().to_string();
    assert!(backend.find_by_id("hospitals", &id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_by_id_malformed_id() {
    let backend = create_backend();

    let result = backend.find_by_id("hospitals", "12345").await;
    assert!(matches!(
        result,
        Err(StorageError::Validation(ValidationError::InvalidId { .. }))
    ));
}

#[tokio::test]
async fn test_find_by_id_braced_form_is_invalid() {
    let backend = create_backend();

    let created = backend
        .create("hospitals", hospital("Vajira", "Central", "10300"))
        .await
        .unwrap();

    let braced = format!("{{{}}}", created.id());
    let result = backend.find_by_id("hospitals", &braced).await;
    assert!(matches!(
        result,
        Err(StorageError::Validation(ValidationError::InvalidId { .. }))
    ));
}

#[tokio::test]
async fn test_collections_are_isolated() {
    let backend = create_backend();

    let created = backend
        .create("hospitals", hospital("Alpha", "Central", "10100"))
        .await
        .unwrap();

    assert!(
        backend
            .find_by_id("appointments", created.id())
            .await
            .unwrap()
            .is_none()
    );
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_merges_fields() {
    let backend = create_backend();

    let created = backend
        .create("hospitals", hospital("Alpha", "Central", "10100"))
        .await
        .unwrap();

    let updated = backend
        .find_by_id_and_update(
            "hospitals",
            created.id(),
            json!({"tel": "02-123-4567", "_id": "ignored"}),
        )
        .await
        .unwrap()
        .expect("document should exist");

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.field("_id"), Some(&json!(created.id())));
    assert_eq!(updated.field("tel"), Some(&json!("02-123-4567")));
    assert_eq!(updated.field("name"), Some(&json!("Alpha")));
    assert_eq!(updated.field("createdAt"), created.field("createdAt"));
    assert!(updated.updated_at() >= created.updated_at());
}

#[tokio::test]
async fn test_update_missing_returns_none() {
    let backend = create_backend();

    let id = uuid::Uuid::new_v4().to_string();
    let result = backend
        .find_by_id_and_update("hospitals", &id, json!({"name": "Ghost"}))
        .await
        .unwrap();
    assert!(result.is_none());
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_one() {
    let backend = create_backend();
    let ids = seed(&backend).await;

    assert!(backend.delete_one("hospitals", &ids[0]).await.unwrap());
    assert!(!backend.delete_one("hospitals", &ids[0]).await.unwrap());
    assert!(!backend.exists("hospitals", &ids[0]).await.unwrap());
}

#[tokio::test]
async fn test_delete_many_by_filter() {
    let backend = create_backend();
    seed(&backend).await;

    let removed = backend
        .delete_many("hospitals", &FilterExpression::new().eq("region", "Central"))
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let remaining = backend
        .count_documents("hospitals", &FilterExpression::new())
        .await
        .unwrap();
    assert_eq!(remaining, 2);
}

#[tokio::test]
async fn test_delete_cascade_removes_dependents() {
    let backend = create_backend();
    let ids = seed(&backend).await;

    for hospital_id in [&ids[0], &ids[0], &ids[1]] {
        backend
            .create(
                "appointments",
                json!({"apptDate": "2021-09-01", "hospital": hospital_id}),
            )
            .await
            .unwrap();
    }

    let relations = [DependentRelation::new("appointments", "hospital")];
    let result = backend
        .delete_cascade("hospitals", &ids[0], &relations)
        .await
        .unwrap();

    assert!(result.deleted);
    assert_eq!(result.dependents_deleted, 2);
    assert!(!backend.exists("hospitals", &ids[0]).await.unwrap());

    let left = backend
        .count_documents("appointments", &FilterExpression::new())
        .await
        .unwrap();
    assert_eq!(left, 1);
}

#[tokio::test]
async fn test_delete_cascade_missing_target() {
    let backend = create_backend();
    seed(&backend).await;

    let id = uuid::Uuid::new_v4().to_string();
    let result = backend
        .delete_cascade(
            "hospitals",
            &id,
            &[DependentRelation::new("appointments", "hospital")],
        )
        .await
        .unwrap();

    assert!(!result.deleted);
    assert_eq!(result.dependents_deleted, 0);
}

// ============================================================================
// Find
// ============================================================================

#[tokio::test]
async fn test_find_default_insertion_order() {
    let backend = create_backend();
    seed(&backend).await;

    let all = backend.find("hospitals", &FindQuery::new()).await.unwrap();
    assert_eq!(names(&all), vec!["Alpha", "Bravo", "Charlie", "Delta"]);
}

#[tokio::test]
async fn test_find_numeric_comparison_on_text() {
    let backend = create_backend();
    seed(&backend).await;

    // postalcode is stored as text, so comparisons are lexical
    let filter = FilterExpression::new().compare("postalcode", ComparisonOperator::Gte, "50200");
    let found = backend
        .find("hospitals", &FindQuery::new().with_filter(filter))
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Bravo", "Delta"]);
}

#[tokio::test]
async fn test_find_numeric_comparison() {
    let backend = create_backend();
    for (name, beds) in [("Small", 40), ("Medium", 300), ("Large", 1200)] {
        backend
            .create("hospitals", json!({"name": name, "beds": beds}))
            .await
            .unwrap();
    }

    let filter = FilterExpression::new()
        .compare("beds", ComparisonOperator::Gt, "100")
        .compare("beds", ComparisonOperator::Lte, "1200");
    let found = backend
        .find("hospitals", &FindQuery::new().with_filter(filter))
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Medium", "Large"]);
}

#[tokio::test]
async fn test_find_in_operator() {
    let backend = create_backend();
    seed(&backend).await;

    let filter = FilterExpression::new().compare("region", ComparisonOperator::In, "North,South");
    let found = backend
        .find("hospitals", &FindQuery::new().with_filter(filter))
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Bravo", "Delta"]);
}

#[tokio::test]
async fn test_find_in_operator_with_large_set() {
    let backend = create_backend();
    let ids = seed(&backend).await;
    backend
        .create("appointments", json!({"hospital": ids[1], "user": "u-1"}))
        .await
        .unwrap();

    let mut members: Vec<String> = (0..1500).map(|i| format!("unknown-{}", i)).collect();
    members.push(ids[1].clone());
    let filter =
        FilterExpression::new().compare("hospital", ComparisonOperator::In, &members.join(","));

    let found = backend
        .find("appointments", &FindQuery::new().with_filter(filter.clone()))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].field("hospital"), Some(&json!(ids[1])));

    let counted = backend.count_documents("appointments", &filter).await.unwrap();
    assert_eq!(counted, 1);
}

#[tokio::test]
async fn test_find_in_operator_is_type_aware() {
    let backend = create_backend();
    for (name, beds, open) in [
        ("Alpha", json!(120), json!(true)),
        ("Bravo", json!(80.5), json!(false)),
    ] {
        backend
            .create("hospitals", json!({"name": name, "beds": beds, "open": open}))
            .await
            .unwrap();
    }

    let beds = FilterExpression::new().compare("beds", ComparisonOperator::In, "80.5,7");
    let found = backend
        .find("hospitals", &FindQuery::new().with_filter(beds))
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Bravo"]);

    let open = FilterExpression::new().compare("open", ComparisonOperator::In, "true");
    let found = backend
        .find("hospitals", &FindQuery::new().with_filter(open))
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Alpha"]);
}

#[tokio::test]
async fn test_find_sort_and_paging() {
    let backend = create_backend();
    seed(&backend).await;

    let query = FindQuery::new()
        .with_sort(SortDirective::desc("name"))
        .with_skip(1)
        .with_limit(2);
    let found = backend.find("hospitals", &query).await.unwrap();
    assert_eq!(names(&found), vec!["Charlie", "Bravo"]);
}

#[tokio::test]
async fn test_find_with_projection() {
    let backend = create_backend();
    seed(&backend).await;

    let projection = Projection::parse(["name", "region"]).unwrap();
    let found = backend
        .find(
            "hospitals",
            &FindQuery::new().with_projection(projection).with_limit(1),
        )
        .await
        .unwrap();

    let content = found[0].content().as_object().unwrap();
    let mut keys: Vec<&str> = content.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["_id", "name", "region"]);
}

#[tokio::test]
async fn test_count_with_filter() {
    let backend = create_backend();
    seed(&backend).await;

    let count = backend
        .count_documents("hospitals", &FilterExpression::new().eq("region", "Central"))
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_health_check() {
    let backend = create_backend();
    assert!(backend.health_check().await.is_ok());
    assert_eq!(backend.backend_name(), "sqlite");
}
