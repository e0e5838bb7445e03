use dsexport_types::{IdOrName, Key, PathElement};
use serde_json::json;

fn nested_key() -> Key {
    Key::root("app")
        .child("Company", 7)
        .child("Team", "core")
        .child("Member", 42)
}

// ── Accessors ─────────────────────────────────────────────────────

#[test]
fn leaf_kind_and_id() {
    let key = nested_key();
    assert_eq!(key.kind(), Some("Member"));
    assert_eq!(key.id_or_name(), Some(IdOrName::Id(42)));
    assert_eq!(key.ancestor_count(), 2);
}

#[test]
fn parent_walks_up_to_root() {
    let key = nested_key();
    let parent = key.parent().unwrap();
    assert_eq!(parent.kind(), Some("Team"));
    assert_eq!(parent.id_or_name(), Some(IdOrName::Name("core".into())));

    let root = parent.parent().unwrap();
    assert_eq!(root.kind(), Some("Company"));
    assert!(root.parent().is_none());
}

#[test]
fn parent_keeps_app_and_namespace() {
    let key = Key::root("app").with_namespace("ns").child("A", 1).child("B", 2);
    let parent = key.parent().unwrap();
    assert_eq!(parent.app, "app");
    assert_eq!(parent.name_space.as_deref(), Some("ns"));
}

#[test]
fn empty_key_has_no_kind() {
    let key = Key::root("app");
    assert_eq!(key.kind(), None);
    assert_eq!(key.id_or_name(), None);
    assert!(!key.is_complete());
}

#[test]
fn id_wins_over_name() {
    let element = PathElement {
        kind: "K".into(),
        id: Some(3),
        name: Some("three".into()),
    };
    assert_eq!(element.id_or_name(), Some(IdOrName::Id(3)));
}

// ── Completeness ──────────────────────────────────────────────────

#[test]
fn resolved_path_rejects_incomplete_element() {
    let key = Key::from_path(
        "app",
        vec![
            PathElement::new("A", 1),
            PathElement {
                kind: "B".into(),
                id: None,
                name: None,
            },
        ],
    );
    assert!(!key.is_complete());
    let err = key.resolved_path().unwrap_err();
    assert!(err.to_string().contains("incomplete key"));
}

#[test]
fn resolved_path_rejects_empty_key() {
    assert!(Key::root("app").resolved_path().is_err());
}

#[test]
fn resolved_path_lists_pairs() {
    let key = nested_key();
    let pairs = key.resolved_path().unwrap();
    assert_eq!(
        pairs,
        vec![
            ("Company", IdOrName::Id(7)),
            ("Team", IdOrName::Name("core".into())),
            ("Member", IdOrName::Id(42)),
        ]
    );
}

// ── Display ───────────────────────────────────────────────────────

#[test]
fn display_joins_elements() {
    assert_eq!(nested_key().to_string(), "Company:7/Team:core/Member:42");
}

#[test]
fn id_or_name_key_strings() {
    assert_eq!(IdOrName::Id(-5).to_key_string(), "-5");
    assert_eq!(IdOrName::from("x").to_key_string(), "x");
}

// ── Mapping form ──────────────────────────────────────────────────

#[test]
fn key_from_reference_mapping() {
    let mapping = json!({
        "app": "s~demo",
        "nameSpace": "tenant",
        "pathelement": [
            {"type": "Parent", "id": "12"},
            {"type": "Child", "name": "leaf"}
        ]
    });
    let key: Key = serde_json::from_value(mapping).unwrap();
    assert_eq!(key.app, "s~demo");
    assert_eq!(key.name_space.as_deref(), Some("tenant"));
    assert_eq!(key.path()[0].id, Some(12));
    assert_eq!(key.id_or_name(), Some(IdOrName::Name("leaf".into())));
}

#[test]
fn key_mapping_writes_id_as_string() {
    let key = Key::root("app").child("A", 9);
    let value = serde_json::to_value(&key).unwrap();
    assert_eq!(value["pathelement"][0]["id"], "9");
    assert_eq!(value["pathelement"][0]["type"], "A");
}
