use chrono::{DateTime, NaiveDate};
use dsexport_types::{
    ExportValue, Key, PropertyMap, TaggedValue, UserValue, decode_utf8_ignore, encoding,
};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── TaggedValue mapping form ──────────────────────────────────────

#[test]
fn string_value_is_base64_decoded() {
    let value = TaggedValue::from_mapping(&json!({"stringValue": "aGk="})).unwrap();
    assert_eq!(value.string_value.as_deref(), Some(b"hi".as_slice()));
    assert!(value.int64_value.is_none());
}

#[test]
fn url_safe_base64_is_accepted() {
    let value = TaggedValue::from_mapping(&json!({"stringValue": "-_8="})).unwrap();
    assert_eq!(value.string_value, Some(vec![0xfb, 0xff]));
}

#[test]
fn invalid_base64_is_rejected() {
    assert!(TaggedValue::from_mapping(&json!({"stringValue": "***"})).is_err());
}

#[test]
fn int64_accepts_string_and_number() {
    let from_text = TaggedValue::from_mapping(&json!({"int64Value": "42"})).unwrap();
    let from_number = TaggedValue::from_mapping(&json!({"int64Value": 42})).unwrap();
    assert_eq!(from_text.int64_value, Some(42));
    assert_eq!(from_number.int64_value, Some(42));
}

#[test]
fn int64_zero_is_present() {
    let value = TaggedValue::from_mapping(&json!({"int64Value": "0"})).unwrap();
    assert_eq!(value.int64_value, Some(0));
}

#[test]
fn int64_garbage_is_rejected() {
    let err = TaggedValue::from_mapping(&json!({"int64Value": "4x2"})).unwrap_err();
    assert!(err.to_string().contains("int64"));
}

#[test]
fn double_accepts_non_finite_literals() {
    let nan = TaggedValue::from_mapping(&json!({"doubleValue": "NaN"})).unwrap();
    assert!(nan.double_value.unwrap().is_nan());
    let inf = TaggedValue::from_mapping(&json!({"doubleValue": "-Infinity"})).unwrap();
    assert_eq!(inf.double_value, Some(f64::NEG_INFINITY));
    let int = TaggedValue::from_mapping(&json!({"doubleValue": 3})).unwrap();
    assert_eq!(int.double_value, Some(3.0));
}

#[test]
fn structured_variants_parse() {
    let value = TaggedValue::from_mapping(&json!({
        "pointvalue": {"x": 1.5, "y": -2.0},
    }))
    .unwrap();
    assert_eq!(value.point_value.unwrap().y, -2.0);

    let value = TaggedValue::from_mapping(&json!({
        "uservalue": {"email": "a@b.c", "authDomain": "gmail.com"},
    }))
    .unwrap();
    assert_eq!(value.user_value.unwrap().auth_domain, "gmail.com");

    let value = TaggedValue::from_mapping(&json!({
        "referencevalue": {"app": "a", "pathelement": [{"type": "K", "name": "n"}]},
    }))
    .unwrap();
    assert_eq!(value.reference_value.unwrap().kind(), Some("K"));
}

#[test]
fn to_mapping_matches_printer_shape() {
    let value = TaggedValue::string(b"hi".to_vec());
    assert_eq!(value.to_mapping().unwrap(), json!({"stringValue": "aGk="}));

    let value = TaggedValue::int64(-7);
    assert_eq!(value.to_mapping().unwrap(), json!({"int64Value": "-7"}));

    let value = TaggedValue::double(f64::INFINITY);
    assert_eq!(value.to_mapping().unwrap(), json!({"doubleValue": "Infinity"}));
}

#[test]
fn empty_mapping_is_empty_value() {
    let value = TaggedValue::from_mapping(&json!({})).unwrap();
    assert!(value.is_empty());
    assert!(!TaggedValue::boolean(false).is_empty());
}

// ── Lossy UTF-8 ───────────────────────────────────────────────────

#[test]
fn decode_utf8_ignore_drops_invalid_bytes() {
    let (text, dropped) = decode_utf8_ignore(b"ab\xffcd\xc3");
    assert_eq!(text, "abcd");
    assert!(dropped);
}

#[test]
fn decode_utf8_ignore_keeps_valid_text() {
    let (text, dropped) = decode_utf8_ignore("héllo".as_bytes());
    assert_eq!(text, "héllo");
    assert!(!dropped);
}

// ── ExportValue ───────────────────────────────────────────────────

#[test]
fn json_native_variants() {
    assert!(ExportValue::Null.is_json_native());
    assert!(ExportValue::Double(1.0).is_json_native());
    assert!(!ExportValue::Double(f64::NAN).is_json_native());
    assert!(!ExportValue::Blob(vec![1]).is_json_native());
    assert!(!ExportValue::Reference(Key::root("a").child("K", 1)).is_json_native());
}

#[test]
fn display_renderings() {
    let ts = DateTime::parse_from_rfc3339("2021-01-01T00:00:00+02:00").unwrap();
    assert_eq!(ExportValue::Timestamp(ts).to_string(), "2021-01-01T00:00:00+02:00");

    let naive = NaiveDate::from_ymd_opt(2020, 5, 17)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();
    assert_eq!(ExportValue::NaiveTimestamp(naive).to_string(), "2020-05-17 08:30:00");

    assert_eq!(ExportValue::GeoPoint { lat: 1.5, lng: 2.0 }.to_string(), "1.5,2");
    assert_eq!(ExportValue::Bytes(b"hi".to_vec()).to_string(), "aGk=");

    let user = UserValue {
        email: "x@y.z".into(),
        ..UserValue::default()
    };
    assert_eq!(ExportValue::User(user).to_string(), "x@y.z");

    let list = ExportValue::List(vec![ExportValue::Int(1), ExportValue::from("a")]);
    assert_eq!(list.to_string(), "[1, a]");

    let mut map = PropertyMap::new();
    map.insert("k".into(), ExportValue::Bool(true));
    assert_eq!(ExportValue::Map(map).to_string(), "{k: true}");
}

#[test]
fn as_map_mut_edits_in_place() {
    let mut value = ExportValue::Map(PropertyMap::new());
    value
        .as_map_mut()
        .unwrap()
        .insert("a".into(), ExportValue::Int(1));
    assert_eq!(value.as_map().unwrap().len(), 1);
    assert!(ExportValue::Int(1).as_map().is_none());
}

// ── Literal parsing ───────────────────────────────────────────────

#[test]
fn parse_literals() {
    assert_eq!(encoding::parse_int64(" 12 ").unwrap(), 12);
    assert!(encoding::parse_double("abc").is_err());
    assert_eq!(encoding::parse_double("Infinity").unwrap(), f64::INFINITY);
    assert_eq!(encoding::decode_base64(&encoding::encode_base64(b"\x00\x01")).unwrap(), vec![0, 1]);
}
