use dsexport_entity::wire::WireWriter;
use dsexport_entity::{EntityRecord, Meaning, Property};
use dsexport_types::{Key, TaggedValue, UserValue};
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample_record() -> EntityRecord {
    let key = Key::root("s~demo").child("Shop", 1).child("Order", "o-17");
    let mut record = EntityRecord::new(Some(key.clone()));
    record.entity_group = key.path()[..1].to_vec();
    record.properties = vec![
        Property::new("total", TaggedValue::int64(1999)),
        Property::new("tags", TaggedValue::string(b"red".to_vec())).multiple(),
        Property::new("tags", TaggedValue::string(b"blue".to_vec())).multiple(),
        Property::new("where", TaggedValue::point(52.5, 13.4)).with_meaning(Meaning::GeorssPoint),
    ];
    record.raw_properties = vec![
        Property::new("notes", TaggedValue::string(b"fragile".to_vec())).with_meaning(Meaning::Text),
        Property::new(
            "buyer",
            TaggedValue::user(UserValue {
                email: "ann@example.com".into(),
                auth_domain: "example.com".into(),
                nickname: Some("ann".into()),
                ..UserValue::default()
            }),
        ),
        Property::new(
            "shop",
            TaggedValue::reference(Key::root("s~demo").with_namespace("eu").child("Shop", 1)),
        ),
        Property::new("paid", TaggedValue::boolean(true)),
        Property::new("ratio", TaggedValue::double(0.25)),
    ];
    record
}

// ── Decode / encode ───────────────────────────────────────────────

#[test]
fn encoded_record_decodes_to_same_record() {
    let record = sample_record();
    let decoded = EntityRecord::decode(&record.encode()).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn empty_input_is_empty_record() {
    let record = EntityRecord::decode(&[]).unwrap();
    assert_eq!(record, EntityRecord::default());
}

#[test]
fn unknown_fields_are_skipped() {
    let mut w = WireWriter::new();
    w.int32_field(4, 1);
    w.message_field(17, |owner| owner.string_field(1, "a@b.c"));
    w.message_field(15, |p| {
        p.string_field(3, "title");
        p.bool_field(4, false);
        p.message_field(5, |v| v.bytes_field(3, b"hello"));
        p.int64_field(42, 9);
    });
    w.int32_field(18, 3);
    w.fixed32_field(99, 7);

    let record = EntityRecord::decode(&w.into_bytes()).unwrap();
    assert!(record.key.is_none());
    assert!(record.properties.is_empty());
    assert_eq!(record.raw_properties.len(), 1);
    assert_eq!(record.raw_properties[0].name, "title");
    assert_eq!(
        record.raw_properties[0].value.string_value.as_deref(),
        Some(b"hello".as_slice())
    );
}

#[test]
fn truncated_record_is_error() {
    let bytes = sample_record().encode();
    assert!(EntityRecord::decode(&bytes[..bytes.len() - 3]).is_err());
}

#[test]
fn unknown_meaning_is_preserved() {
    let mut w = WireWriter::new();
    w.message_field(15, |p| {
        p.int32_field(1, 77);
        p.string_field(3, "odd");
        p.message_field(5, |v| v.int64_field(1, 1));
    });
    let record = EntityRecord::decode(&w.into_bytes()).unwrap();
    assert_eq!(record.raw_properties[0].meaning, Meaning::Unknown(77));
    assert_eq!(record.raw_properties[0].meaning.code(), 77);
}

// ── Meaning ───────────────────────────────────────────────────────

#[test]
fn meaning_codes_and_names() {
    assert_eq!(Meaning::from_code(19), Meaning::EntityProto);
    assert_eq!(Meaning::EntityProto.name(), "ENTITY_PROTO");
    assert_eq!(Meaning::from_code(24), Meaning::EmptyList);
    assert_eq!(Meaning::GdWhen.code(), 7);
    assert_eq!(Meaning::Unknown(99).name(), "99");
}

// ── Field mapping ─────────────────────────────────────────────────

#[test]
fn field_map_follows_printer_shape() {
    let key = Key::root("app").child("Doc", 5);
    let mut record = EntityRecord::new(Some(key));
    record.raw_properties = vec![
        Property::new("title", TaggedValue::string(b"hi".to_vec())),
        Property::new("child", TaggedValue::string(vec![0x7a])).with_meaning(Meaning::EntityProto),
    ];

    let map = record.to_field_map().unwrap();
    assert_eq!(
        map,
        json!({
            "key": {
                "app": "app",
                "path": {"element": [{"type": "Doc", "id": "5"}]}
            },
            "rawProperty": [
                {"name": "title", "multiple": false, "value": {"stringValue": "aGk="}},
                {
                    "meaning": "ENTITY_PROTO",
                    "name": "child",
                    "multiple": false,
                    "value": {"stringValue": "eg=="}
                }
            ]
        })
    );
}

#[test]
fn all_properties_lists_indexed_first() {
    let record = sample_record();
    let names: Vec<_> = record.all_properties().map(|p| p.name.as_str()).collect();
    assert_eq!(names.first(), Some(&"total"));
    assert_eq!(names.last(), Some(&"ratio"));
    assert_eq!(names.len(), 9);
}
