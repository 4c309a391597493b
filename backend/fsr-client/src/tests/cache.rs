use crate::cache::ResolutionCache;

use models::ConnectorInfo;

#[test]
fn given_resolved_name_when_inserted_again_then_first_value_wins() {
    let mut cache = ResolutionCache::new();

    let first = cache.insert_picklist("AlertStatus", String::from("/api/3/picklist_names/1"));
    let second = cache.insert_picklist("AlertStatus", String::from("/api/3/picklist_names/2"));

    assert_eq!(first, "/api/3/picklist_names/1");
    assert_eq!(second, "/api/3/picklist_names/1");
    assert_eq!(cache.picklist("AlertStatus").as_deref(), Some("/api/3/picklist_names/1"));
}

#[test]
fn given_entries_in_each_map_when_cleared_then_empty() {
    let mut cache = ResolutionCache::new();
    cache.insert_picklist("AlertStatus", String::from("/api/3/picklist_names/1"));
    cache.insert_template("Nightly", String::from("uuid-1"));
    cache.insert_connector(
        "OpenAI",
        ConnectorInfo {
            value: String::from("cyops-connector-openai-1.0.0"),
            version: String::from("1.0.0"),
            label: String::from("OpenAI"),
        },
    );
    assert_eq!(cache.len(), 3);

    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.template("Nightly"), None);
    assert_eq!(cache.connector("OpenAI"), None);
}

#[test]
fn given_same_name_in_different_maps_when_looked_up_then_maps_are_independent() {
    let mut cache = ResolutionCache::new();
    cache.insert_template("Shared", String::from("uuid-1"));

    assert_eq!(cache.picklist("Shared"), None);
    assert_eq!(cache.playbook_collection("Shared"), None);
}
