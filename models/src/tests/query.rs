use crate::{Direction, Filter, Logic, Query};

use serde_json::json;

#[test]
fn given_nested_query_when_serialized_then_matches_platform_dsl() {
    let query = Query::new("SOAR", 1)
        .sort_by("label", Direction::Asc)
        .filter(Filter::condition("type", "in", vec!["solutionpack"]))
        .filter(Filter::group(
            Logic::Or,
            vec![Filter::equals("development", false)],
        ));

    let value = serde_json::to_value(&query).unwrap();

    assert_eq!(
        value,
        json!({
            "sort": [{"field": "label", "direction": "ASC"}],
            "limit": 1,
            "logic": "AND",
            "filters": [
                {"field": "type", "operator": "in", "value": ["solutionpack"]},
                {"logic": "OR", "filters": [
                    {"field": "development", "operator": "eq", "value": false}
                ]}
            ],
            "search": "SOAR"
        })
    );
}

#[test]
fn given_select_fields_when_serialized_then_uses_dunder_key() {
    let query = Query::new("", 30).select(["name", "version"]);

    let value = serde_json::to_value(&query).unwrap();

    assert_eq!(value["__selectFields"], json!(["name", "version"]));
}
