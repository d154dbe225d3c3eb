//! Predicates arriving as JSON, compiled and run against a graph

use tessera::{
    CompileOptions, DroppedPredicatePolicy, Error, MemoryGraph, Property, PropertyValue,
    SearchOptions, SearchPredicate,
};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

fn staff_graph() -> MemoryGraph {
    let graph = MemoryGraph::new("staff");
    let rows = [
        ("Alice", 34i64, Some("engineering")),
        ("Bob", 17, Some("support")),
        ("Carol", 45, None),
        ("Dan", 29, Some("")),
    ];
    for (name, age, team) in rows {
        let mut props = Property::with("name", name).and("age", age);
        if let Some(team) = team {
            props.set("team", team);
        }
        graph.create_node_with_properties(["Person"], props).unwrap();
    }
    graph.create_node_with_properties(["Robot"], Property::with("age", 3i64)).unwrap();
    graph
}

fn names(result: &tessera::SearchResult<tessera::Node>) -> Vec<String> {
    let mut names: Vec<String> = result
        .items
        .iter()
        .filter_map(|n| n.get_property("name").and_then(PropertyValue::as_str).map(String::from))
        .collect();
    names.sort();
    names
}

#[test]
fn json_predicates_run_end_to_end() {
    init_logging();
    let graph = staff_graph();

    let json = r#"[
        {"occurrence": "Must", "kind": {"Type": {"label": "Person", "source": null, "target": null}}},
        {"occurrence": "Must", "kind": {"Comparison": {
            "attribute": {"name": "age", "kind": "Integer"},
            "operation": "GreaterOrEqual",
            "value": {"String": "18"}
        }}}
    ]"#;
    let predicates = SearchPredicate::list_from_json(json).unwrap();
    assert_eq!(
        serde_json::to_value(&predicates[0]).unwrap()["kind"]["Type"]["label"],
        "Person"
    );

    let result = graph
        .find_nodes(&predicates, &CompileOptions::default(), &SearchOptions::for_testing())
        .unwrap();
    assert_eq!(names(&result), vec!["Alice", "Carol", "Dan"]);
    assert_eq!(result.stats.strategy, "type_bucket");
}

#[test]
fn missing_team_matches_empty_team() {
    init_logging();
    let graph = staff_graph();
    let predicates = [
        SearchPredicate::of_type("Person"),
        SearchPredicate::keyword("team", tessera::ValueKind::String, "", true),
    ];
    let result = graph
        .find_nodes(&predicates, &CompileOptions::default(), &SearchOptions::default())
        .unwrap();
    assert_eq!(names(&result), vec!["Carol", "Dan"]);
}

#[test]
fn options_from_json_control_policy() {
    init_logging();
    let graph = staff_graph();
    let unbounded = [SearchPredicate::range("age", tessera::ValueKind::Integer, None, None)];

    let lenient = CompileOptions::from_json("{}").unwrap();
    let all = graph
        .find_nodes(&unbounded, &lenient, &SearchOptions::default())
        .unwrap();
    assert_eq!(all.len(), 5);

    let strict = CompileOptions::from_json(r#"{"dropped_predicates": "reject"}"#).unwrap();
    assert_eq!(strict.dropped_predicates, DroppedPredicatePolicy::Reject);
    let err = graph
        .find_nodes(&unbounded, &strict, &SearchOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::DroppedPredicate(_)));

    let search = SearchOptions::from_json(r#"{"limit": 2, "parallel": false}"#).unwrap();
    let limited = graph
        .find_nodes(&[SearchPredicate::of_type("Person")], &lenient, &search)
        .unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited.stats.matches, 4);
}
