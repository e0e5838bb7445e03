//! The `EntityProto` record model and its wire encoding.

use crate::EntityResult;
use crate::wire::{WireReader, WireType, WireWriter};
use dsexport_types::{Key, PathElement, PointValue, TaggedValue, UserValue};
use serde_json::{Map, Value, json};
use std::borrow::Cow;

mod entity_field {
    pub const KEY: u32 = 13;
    pub const PROPERTY: u32 = 14;
    pub const RAW_PROPERTY: u32 = 15;
    pub const ENTITY_GROUP: u32 = 16;
}

mod reference_field {
    pub const APP: u32 = 13;
    pub const PATH: u32 = 14;
    pub const NAME_SPACE: u32 = 20;
    pub const DATABASE_ID: u32 = 23;
}

mod path_field {
    pub const ELEMENT: u32 = 1;
    pub const TYPE: u32 = 2;
    pub const ID: u32 = 3;
    pub const NAME: u32 = 4;
}

mod property_field {
    pub const MEANING: u32 = 1;
    pub const MEANING_URI: u32 = 2;
    pub const NAME: u32 = 3;
    pub const MULTIPLE: u32 = 4;
    pub const VALUE: u32 = 5;
    pub const STASHED: u32 = 6;
    pub const COMPUTED: u32 = 7;
}

mod value_field {
    pub const INT64: u32 = 1;
    pub const BOOLEAN: u32 = 2;
    pub const STRING: u32 = 3;
    pub const DOUBLE: u32 = 4;
    pub const POINT: u32 = 5;
    pub const POINT_X: u32 = 6;
    pub const POINT_Y: u32 = 7;
    pub const USER: u32 = 8;
    pub const USER_EMAIL: u32 = 9;
    pub const USER_AUTH_DOMAIN: u32 = 10;
    pub const USER_NICKNAME: u32 = 11;
    pub const USER_FEDERATED_IDENTITY: u32 = 21;
    pub const USER_FEDERATED_PROVIDER: u32 = 22;
    pub const REFERENCE: u32 = 12;
    pub const REFERENCE_APP: u32 = 13;
    pub const REFERENCE_PATH_ELEMENT: u32 = 14;
    pub const REFERENCE_ELEMENT_TYPE: u32 = 15;
    pub const REFERENCE_ELEMENT_ID: u32 = 16;
    pub const REFERENCE_ELEMENT_NAME: u32 = 17;
    pub const REFERENCE_NAME_SPACE: u32 = 20;
    pub const REFERENCE_DATABASE_ID: u32 = 23;
}

/// Semantic tag attached to a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Meaning {
    #[default]
    NoMeaning,
    AtomCategory,
    AtomLink,
    AtomTitle,
    AtomContent,
    AtomSummary,
    AtomAuthor,
    GdWhen,
    GdEmail,
    GeorssPoint,
    GdIm,
    GdPhonenumber,
    GdPostaladdress,
    GdRating,
    Blob,
    Text,
    Bytestring,
    Blobkey,
    IndexValue,
    EntityProto,
    EmptyList,
    /// Code not known to this decoder; kept as is.
    Unknown(i32),
}

impl Meaning {
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::NoMeaning,
            1 => Self::AtomCategory,
            2 => Self::AtomLink,
            3 => Self::AtomTitle,
            4 => Self::AtomContent,
            5 => Self::AtomSummary,
            6 => Self::AtomAuthor,
            7 => Self::GdWhen,
            8 => Self::GdEmail,
            9 => Self::GeorssPoint,
            10 => Self::GdIm,
            11 => Self::GdPhonenumber,
            12 => Self::GdPostaladdress,
            13 => Self::GdRating,
            14 => Self::Blob,
            15 => Self::Text,
            16 => Self::Bytestring,
            17 => Self::Blobkey,
            18 => Self::IndexValue,
            19 => Self::EntityProto,
            24 => Self::EmptyList,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::NoMeaning => 0,
            Self::AtomCategory => 1,
            Self::AtomLink => 2,
            Self::AtomTitle => 3,
            Self::AtomContent => 4,
            Self::AtomSummary => 5,
            Self::AtomAuthor => 6,
            Self::GdWhen => 7,
            Self::GdEmail => 8,
            Self::GeorssPoint => 9,
            Self::GdIm => 10,
            Self::GdPhonenumber => 11,
            Self::GdPostaladdress => 12,
            Self::GdRating => 13,
            Self::Blob => 14,
            Self::Text => 15,
            Self::Bytestring => 16,
            Self::Blobkey => 17,
            Self::IndexValue => 18,
            Self::EntityProto => 19,
            Self::EmptyList => 24,
            Self::Unknown(code) => code,
        }
    }

    /// The enum name used in the field mapping, e.g. `ENTITY_PROTO`.
    #[must_use]
    pub fn name(self) -> Cow<'static, str> {
        let name = match self {
            Self::NoMeaning => "NO_MEANING",
            Self::AtomCategory => "ATOM_CATEGORY",
            Self::AtomLink => "ATOM_LINK",
            Self::AtomTitle => "ATOM_TITLE",
            Self::AtomContent => "ATOM_CONTENT",
            Self::AtomSummary => "ATOM_SUMMARY",
            Self::AtomAuthor => "ATOM_AUTHOR",
            Self::GdWhen => "GD_WHEN",
            Self::GdEmail => "GD_EMAIL",
            Self::GeorssPoint => "GEORSS_POINT",
            Self::GdIm => "GD_IM",
            Self::GdPhonenumber => "GD_PHONENUMBER",
            Self::GdPostaladdress => "GD_POSTALADDRESS",
            Self::GdRating => "GD_RATING",
            Self::Blob => "BLOB",
            Self::Text => "TEXT",
            Self::Bytestring => "BYTESTRING",
            Self::Blobkey => "BLOBKEY",
            Self::IndexValue => "INDEX_VALUE",
            Self::EntityProto => "ENTITY_PROTO",
            Self::EmptyList => "EMPTY_LIST",
            Self::Unknown(code) => return Cow::Owned(code.to_string()),
        };
        Cow::Borrowed(name)
    }
}

/// One named property of a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property {
    pub name: String,
    pub meaning: Meaning,
    pub meaning_uri: Option<String>,
    pub multiple: bool,
    pub value: TaggedValue,
    pub stashed: Option<i32>,
    pub computed: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, value: TaggedValue) -> Self {
        Self {
            name: name.into(),
            value,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_meaning(mut self, meaning: Meaning) -> Self {
        self.meaning = meaning;
        self
    }

    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }
}

/// A decoded `EntityProto`.
///
/// Embedded entities usually come without a key; top-level records carry
/// one. Indexed properties live in `properties`, unindexed ones in
/// `raw_properties`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityRecord {
    pub key: Option<Key>,
    pub entity_group: Vec<PathElement>,
    pub properties: Vec<Property>,
    pub raw_properties: Vec<Property>,
}

impl EntityRecord {
    /// Creates an empty record, optionally keyed.
    #[must_use]
    pub fn new(key: Option<Key>) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    /// Parses a serialized `EntityProto`.
    pub fn decode(bytes: &[u8]) -> EntityResult<Self> {
        let mut reader = WireReader::new(bytes);
        let mut record = Self::default();
        while !reader.is_empty() {
            match reader.read_tag()? {
                (entity_field::KEY, WireType::LengthDelimited) => {
                    record.key = Some(decode_reference(reader.read_bytes()?)?);
                }
                (entity_field::ENTITY_GROUP, WireType::LengthDelimited) => {
                    record.entity_group = decode_path(reader.read_bytes()?)?;
                }
                (entity_field::PROPERTY, WireType::LengthDelimited) => {
                    record.properties.push(decode_property(reader.read_bytes()?)?);
                }
                (entity_field::RAW_PROPERTY, WireType::LengthDelimited) => {
                    record
                        .raw_properties
                        .push(decode_property(reader.read_bytes()?)?);
                }
                (field, wire_type) => reader.skip(field, wire_type)?,
            }
        }
        Ok(record)
    }

    /// Serializes the record back to `EntityProto` bytes.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = WireWriter::new();
        if let Some(key) = &self.key {
            writer.message_field(entity_field::KEY, |w| encode_reference(w, key));
        }
        for property in &self.properties {
            writer.message_field(entity_field::PROPERTY, |w| encode_property(w, property));
        }
        for property in &self.raw_properties {
            writer.message_field(entity_field::RAW_PROPERTY, |w| encode_property(w, property));
        }
        if !self.entity_group.is_empty() {
            writer.message_field(entity_field::ENTITY_GROUP, |w| {
                encode_path(w, &self.entity_group);
            });
        }
        writer.into_bytes()
    }

    /// Indexed properties followed by unindexed ones.
    pub fn all_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().chain(self.raw_properties.iter())
    }

    /// Renders the record as a generic field mapping.
    ///
    /// The shape follows a protobuf JSON printer: camelCase field names,
    /// base64 string values, int64 as decimal strings, meaning by enum name,
    /// and empty repeated fields omitted.
    pub fn to_field_map(&self) -> EntityResult<Value> {
        let mut map = Map::new();
        if let Some(key) = &self.key {
            let mut key_map = Map::new();
            key_map.insert("app".into(), json!(key.app));
            if let Some(ns) = &key.name_space {
                key_map.insert("nameSpace".into(), json!(ns));
            }
            key_map.insert("path".into(), path_mapping(&key.path)?);
            if let Some(db) = &key.database_id {
                key_map.insert("databaseId".into(), json!(db));
            }
            map.insert("key".into(), Value::Object(key_map));
        }
        if !self.entity_group.is_empty() {
            map.insert("entityGroup".into(), path_mapping(&self.entity_group)?);
        }
        if !self.properties.is_empty() {
            map.insert("property".into(), property_mappings(&self.properties)?);
        }
        if !self.raw_properties.is_empty() {
            map.insert("rawProperty".into(), property_mappings(&self.raw_properties)?);
        }
        Ok(Value::Object(map))
    }
}

fn path_mapping(path: &[PathElement]) -> EntityResult<Value> {
    let elements = serde_json::to_value(path).map_err(dsexport_types::Error::from)?;
    Ok(json!({ "element": elements }))
}

fn property_mappings(properties: &[Property]) -> EntityResult<Value> {
    properties
        .iter()
        .map(|property| -> EntityResult<Value> {
            let mut map = Map::new();
            if property.meaning != Meaning::NoMeaning {
                map.insert("meaning".into(), json!(property.meaning.name()));
            }
            if let Some(uri) = &property.meaning_uri {
                map.insert("meaningUri".into(), json!(uri));
            }
            map.insert("name".into(), json!(property.name));
            map.insert("multiple".into(), json!(property.multiple));
            map.insert("value".into(), property.value.to_mapping()?);
            if let Some(stashed) = property.stashed {
                map.insert("stashed".into(), json!(stashed));
            }
            if property.computed {
                map.insert("computed".into(), json!(true));
            }
            Ok(Value::Object(map))
        })
        .collect::<EntityResult<Vec<_>>>()
        .map(Value::Array)
}

fn decode_reference(bytes: &[u8]) -> EntityResult<Key> {
    let mut reader = WireReader::new(bytes);
    let mut key = Key::default();
    while !reader.is_empty() {
        match reader.read_tag()? {
            (reference_field::APP, WireType::LengthDelimited) => {
                key.app = reader.read_string(reference_field::APP)?;
            }
            (reference_field::NAME_SPACE, WireType::LengthDelimited) => {
                key.name_space = Some(reader.read_string(reference_field::NAME_SPACE)?);
            }
            (reference_field::PATH, WireType::LengthDelimited) => {
                key.path = decode_path(reader.read_bytes()?)?;
            }
            (reference_field::DATABASE_ID, WireType::LengthDelimited) => {
                key.database_id = Some(reader.read_string(reference_field::DATABASE_ID)?);
            }
            (field, wire_type) => reader.skip(field, wire_type)?,
        }
    }
    Ok(key)
}

fn decode_path(bytes: &[u8]) -> EntityResult<Vec<PathElement>> {
    let mut reader = WireReader::new(bytes);
    let mut path = Vec::new();
    while !reader.is_empty() {
        match reader.read_tag()? {
            (path_field::ELEMENT, WireType::StartGroup) => {
                path.push(decode_path_element(
                    &mut reader,
                    path_field::ELEMENT,
                    [path_field::TYPE, path_field::ID, path_field::NAME],
                )?);
            }
            (field, wire_type) => reader.skip(field, wire_type)?,
        }
    }
    Ok(path)
}

/// Reads a `{type, id, name}` group body up to its end tag.
fn decode_path_element(
    reader: &mut WireReader<'_>,
    group: u32,
    [type_field, id_field, name_field]: [u32; 3],
) -> EntityResult<PathElement> {
    let mut element = PathElement::default();
    while let Some(tag) = reader.read_group_tag(group)? {
        match tag {
            (f, WireType::LengthDelimited) if f == type_field => {
                element.kind = reader.read_string(f)?;
            }
            (f, WireType::Varint) if f == id_field => element.id = Some(reader.read_int64()?),
            (f, WireType::LengthDelimited) if f == name_field => {
                element.name = Some(reader.read_string(f)?);
            }
            (field, wire_type) => reader.skip(field, wire_type)?,
        }
    }
    Ok(element)
}

fn decode_property(bytes: &[u8]) -> EntityResult<Property> {
    let mut reader = WireReader::new(bytes);
    let mut property = Property::default();
    while !reader.is_empty() {
        match reader.read_tag()? {
            (property_field::MEANING, WireType::Varint) => {
                property.meaning = Meaning::from_code(reader.read_int32()?);
            }
            (property_field::MEANING_URI, WireType::LengthDelimited) => {
                property.meaning_uri = Some(reader.read_string(property_field::MEANING_URI)?);
            }
            (property_field::NAME, WireType::LengthDelimited) => {
                property.name = reader.read_string(property_field::NAME)?;
            }
            (property_field::MULTIPLE, WireType::Varint) => {
                property.multiple = reader.read_bool()?;
            }
            (property_field::VALUE, WireType::LengthDelimited) => {
                property.value = decode_value(reader.read_bytes()?)?;
            }
            (property_field::STASHED, WireType::Varint) => {
                property.stashed = Some(reader.read_int32()?);
            }
            (property_field::COMPUTED, WireType::Varint) => {
                property.computed = reader.read_bool()?;
            }
            (field, wire_type) => reader.skip(field, wire_type)?,
        }
    }
    Ok(property)
}

fn decode_value(bytes: &[u8]) -> EntityResult<TaggedValue> {
    let mut reader = WireReader::new(bytes);
    let mut value = TaggedValue::default();
    while !reader.is_empty() {
        match reader.read_tag()? {
            (value_field::INT64, WireType::Varint) => {
                value.int64_value = Some(reader.read_int64()?);
            }
            (value_field::BOOLEAN, WireType::Varint) => {
                value.boolean_value = Some(reader.read_bool()?);
            }
            (value_field::STRING, WireType::LengthDelimited) => {
                value.string_value = Some(reader.read_bytes()?.to_vec());
            }
            (value_field::DOUBLE, WireType::Fixed64) => {
                value.double_value = Some(reader.read_double()?);
            }
            (value_field::POINT, WireType::StartGroup) => {
                value.point_value = Some(decode_point(&mut reader)?);
            }
            (value_field::USER, WireType::StartGroup) => {
                value.user_value = Some(decode_user(&mut reader)?);
            }
            (value_field::REFERENCE, WireType::StartGroup) => {
                value.reference_value = Some(decode_reference_value(&mut reader)?);
            }
            (field, wire_type) => reader.skip(field, wire_type)?,
        }
    }
    Ok(value)
}

fn decode_point(reader: &mut WireReader<'_>) -> EntityResult<PointValue> {
    let mut point = PointValue::default();
    while let Some(tag) = reader.read_group_tag(value_field::POINT)? {
        match tag {
            (value_field::POINT_X, WireType::Fixed64) => point.x = reader.read_double()?,
            (value_field::POINT_Y, WireType::Fixed64) => point.y = reader.read_double()?,
            (field, wire_type) => reader.skip(field, wire_type)?,
        }
    }
    Ok(point)
}

fn decode_user(reader: &mut WireReader<'_>) -> EntityResult<UserValue> {
    let mut user = UserValue::default();
    while let Some(tag) = reader.read_group_tag(value_field::USER)? {
        match tag {
            (f @ value_field::USER_EMAIL, WireType::LengthDelimited) => {
                user.email = reader.read_string(f)?;
            }
            (f @ value_field::USER_AUTH_DOMAIN, WireType::LengthDelimited) => {
                user.auth_domain = reader.read_string(f)?;
            }
            (f @ value_field::USER_NICKNAME, WireType::LengthDelimited) => {
                user.nickname = Some(reader.read_string(f)?);
            }
            (f @ value_field::USER_FEDERATED_IDENTITY, WireType::LengthDelimited) => {
                user.federated_identity = Some(reader.read_string(f)?);
            }
            (f @ value_field::USER_FEDERATED_PROVIDER, WireType::LengthDelimited) => {
                user.federated_provider = Some(reader.read_string(f)?);
            }
            (field, wire_type) => reader.skip(field, wire_type)?,
        }
    }
    Ok(user)
}

fn decode_reference_value(reader: &mut WireReader<'_>) -> EntityResult<Key> {
    let mut key = Key::default();
    while let Some(tag) = reader.read_group_tag(value_field::REFERENCE)? {
        match tag {
            (f @ value_field::REFERENCE_APP, WireType::LengthDelimited) => {
                key.app = reader.read_string(f)?;
            }
            (f @ value_field::REFERENCE_NAME_SPACE, WireType::LengthDelimited) => {
                key.name_space = Some(reader.read_string(f)?);
            }
            (f @ value_field::REFERENCE_DATABASE_ID, WireType::LengthDelimited) => {
                key.database_id = Some(reader.read_string(f)?);
            }
            (value_field::REFERENCE_PATH_ELEMENT, WireType::StartGroup) => {
                key.path.push(decode_path_element(
                    reader,
                    value_field::REFERENCE_PATH_ELEMENT,
                    [
                        value_field::REFERENCE_ELEMENT_TYPE,
                        value_field::REFERENCE_ELEMENT_ID,
                        value_field::REFERENCE_ELEMENT_NAME,
                    ],
                )?);
            }
            (field, wire_type) => reader.skip(field, wire_type)?,
        }
    }
    Ok(key)
}

fn encode_reference(writer: &mut WireWriter, key: &Key) {
    writer.string_field(reference_field::APP, &key.app);
    writer.message_field(reference_field::PATH, |w| encode_path(w, &key.path));
    if let Some(ns) = &key.name_space {
        writer.string_field(reference_field::NAME_SPACE, ns);
    }
    if let Some(db) = &key.database_id {
        writer.string_field(reference_field::DATABASE_ID, db);
    }
}

fn encode_path(writer: &mut WireWriter, path: &[PathElement]) {
    for element in path {
        writer.group_field(path_field::ELEMENT, |w| {
            w.string_field(path_field::TYPE, &element.kind);
            if let Some(id) = element.id {
                w.int64_field(path_field::ID, id);
            }
            if let Some(name) = &element.name {
                w.string_field(path_field::NAME, name);
            }
        });
    }
}

fn encode_property(writer: &mut WireWriter, property: &Property) {
    if property.meaning != Meaning::NoMeaning {
        writer.int32_field(property_field::MEANING, property.meaning.code());
    }
    if let Some(uri) = &property.meaning_uri {
        writer.string_field(property_field::MEANING_URI, uri);
    }
    writer.string_field(property_field::NAME, &property.name);
    writer.bool_field(property_field::MULTIPLE, property.multiple);
    writer.message_field(property_field::VALUE, |w| encode_value(w, &property.value));
    if let Some(stashed) = property.stashed {
        writer.int32_field(property_field::STASHED, stashed);
    }
    if property.computed {
        writer.bool_field(property_field::COMPUTED, true);
    }
}

fn encode_value(writer: &mut WireWriter, value: &TaggedValue) {
    if let Some(n) = value.int64_value {
        writer.int64_field(value_field::INT64, n);
    }
    if let Some(b) = value.boolean_value {
        writer.bool_field(value_field::BOOLEAN, b);
    }
    if let Some(bytes) = &value.string_value {
        writer.bytes_field(value_field::STRING, bytes);
    }
    if let Some(x) = value.double_value {
        writer.double_field(value_field::DOUBLE, x);
    }
    if let Some(point) = &value.point_value {
        writer.group_field(value_field::POINT, |w| {
            w.double_field(value_field::POINT_X, point.x);
            w.double_field(value_field::POINT_Y, point.y);
        });
    }
    if let Some(user) = &value.user_value {
        writer.group_field(value_field::USER, |w| {
            w.string_field(value_field::USER_EMAIL, &user.email);
            w.string_field(value_field::USER_AUTH_DOMAIN, &user.auth_domain);
            if let Some(nickname) = &user.nickname {
                w.string_field(value_field::USER_NICKNAME, nickname);
            }
            if let Some(identity) = &user.federated_identity {
                w.string_field(value_field::USER_FEDERATED_IDENTITY, identity);
            }
            if let Some(provider) = &user.federated_provider {
                w.string_field(value_field::USER_FEDERATED_PROVIDER, provider);
            }
        });
    }
    if let Some(key) = &value.reference_value {
        writer.group_field(value_field::REFERENCE, |w| {
            w.string_field(value_field::REFERENCE_APP, &key.app);
            for element in &key.path {
                w.group_field(value_field::REFERENCE_PATH_ELEMENT, |w| {
                    w.string_field(value_field::REFERENCE_ELEMENT_TYPE, &element.kind);
                    if let Some(id) = element.id {
                        w.int64_field(value_field::REFERENCE_ELEMENT_ID, id);
                    }
                    if let Some(name) = &element.name {
                        w.string_field(value_field::REFERENCE_ELEMENT_NAME, name);
                    }
                });
            }
            if let Some(ns) = &key.name_space {
                w.string_field(value_field::REFERENCE_NAME_SPACE, ns);
            }
            if let Some(db) = &key.database_id {
                w.string_field(value_field::REFERENCE_DATABASE_ID, db);
            }
        });
    }
}
