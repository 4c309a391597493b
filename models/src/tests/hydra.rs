use crate::{HydraCollection, PicklistNameRecord, iri_last_segment};

use serde_json::json;

#[test]
fn given_paged_collection_when_deserialized_then_members_and_total_are_read() {
    let body = json!({
        "@context": "/api/3/contexts/Picklist",
        "@type": "hydra:PagedCollection",
        "hydra:member": [
            {"@id": "/api/3/picklist_names/456", "@type": "PicklistName", "name": "AlertStatus"}
        ],
        "hydra:totalItems": 1
    });

    let collection: HydraCollection<PicklistNameRecord> = serde_json::from_value(body).unwrap();

    assert_eq!(collection.total_items, Some(1));
    assert_eq!(collection.first().unwrap().iri, "/api/3/picklist_names/456");
}

/// **BUG THIS CATCHES**: Some endpoints omit `hydra:member` entirely when nothing matches;
/// that must read as "no results" rather than a decode failure.
#[test]
fn given_collection_without_members_when_deserialized_then_is_empty() {
    let collection: HydraCollection<PicklistNameRecord> =
        serde_json::from_value(json!({"hydra:totalItems": 0})).unwrap();

    assert!(collection.is_empty());
    assert!(collection.into_first().is_none());
}

#[test]
fn given_iris_when_last_segment_taken_then_returns_identifier() {
    assert_eq!(iri_last_segment("/api/3/export_templates/abc-123"), "abc-123");
    assert_eq!(iri_last_segment("/api/3/files/xyz/"), "xyz");
    assert_eq!(iri_last_segment("plain"), "plain");
}
