//! Tagged property values and the exported value model.

use crate::encoding::{self, base64_opt, double_opt, int64_opt};
use crate::{Key, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Property name → value mapping for one entity.
pub type PropertyMap = BTreeMap<String, ExportValue>;

/// A geographic point (`pointvalue` group).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointValue {
    pub x: f64,
    pub y: f64,
}

/// A user reference (`uservalue` group).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserValue {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub auth_domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub federated_identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub federated_provider: Option<String>,
}

/// A tagged property value.
///
/// At most one variant is populated. The serde form is the camelCase mapping
/// a protobuf JSON printer produces, so `stringValue` is base64 text and
/// `int64Value` a decimal string; both are decoded on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedValue {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_opt")]
    pub string_value: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "int64_opt")]
    pub int64_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_opt")]
    pub double_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
    #[serde(rename = "pointvalue", default, skip_serializing_if = "Option::is_none")]
    pub point_value: Option<PointValue>,
    #[serde(rename = "uservalue", default, skip_serializing_if = "Option::is_none")]
    pub user_value: Option<UserValue>,
    #[serde(rename = "referencevalue", default, skip_serializing_if = "Option::is_none")]
    pub reference_value: Option<Key>,
}

impl TaggedValue {
    #[must_use]
    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            string_value: Some(bytes.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn int64(value: i64) -> Self {
        Self {
            int64_value: Some(value),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn double(value: f64) -> Self {
        Self {
            double_value: Some(value),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self {
            boolean_value: Some(value),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn point(x: f64, y: f64) -> Self {
        Self {
            point_value: Some(PointValue { x, y }),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn user(user: UserValue) -> Self {
        Self {
            user_value: Some(user),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn reference(key: Key) -> Self {
        Self {
            reference_value: Some(key),
            ..Self::default()
        }
    }

    /// Parses a value from its mapping form, e.g. `{"stringValue": "aGk="}`.
    pub fn from_mapping(mapping: &serde_json::Value) -> Result<Self> {
        Ok(Self::deserialize(mapping)?)
    }

    /// Renders the value in its mapping form.
    pub fn to_mapping(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Returns true when no variant is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.string_value.is_none()
            && self.int64_value.is_none()
            && self.double_value.is_none()
            && self.boolean_value.is_none()
            && self.point_value.is_none()
            && self.user_value.is_none()
            && self.reference_value.is_none()
    }
}

/// A value in the destination tree.
///
/// Null, bool, int, finite double, text, list and map are JSON-native. The
/// other variants are rendered by the exporter's fallback hook.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    /// Short byte string, rendered as base64.
    Bytes(Vec<u8>),
    /// Binary payload written out as a side file.
    Blob(Vec<u8>),
    Timestamp(DateTime<FixedOffset>),
    /// Timestamp without zone information, taken as UTC.
    NaiveTimestamp(NaiveDateTime),
    GeoPoint { lat: f64, lng: f64 },
    User(UserValue),
    Reference(Key),
    List(Vec<ExportValue>),
    Map(PropertyMap),
}

impl ExportValue {
    #[must_use]
    pub fn as_map(&self) -> Option<&PropertyMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map_mut(&mut self) -> Option<&mut PropertyMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns true for variants JSON can carry without the fallback hook.
    #[must_use]
    pub fn is_json_native(&self) -> bool {
        match self {
            Self::Null | Self::Bool(_) | Self::Int(_) | Self::Text(_) => true,
            Self::Double(x) => x.is_finite(),
            Self::List(_) | Self::Map(_) => true,
            _ => false,
        }
    }

    /// Short variant name, for log lines.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Blob(_) => "blob",
            Self::Timestamp(_) => "timestamp",
            Self::NaiveTimestamp(_) => "naive_timestamp",
            Self::GeoPoint { .. } => "geo_point",
            Self::User(_) => "user",
            Self::Reference(_) => "reference",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl From<&str> for ExportValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ExportValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for ExportValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for ExportValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for ExportValue {
    fn from(x: f64) -> Self {
        Self::Double(x)
    }
}

impl From<PropertyMap> for ExportValue {
    fn from(map: PropertyMap) -> Self {
        Self::Map(map)
    }
}

impl fmt::Display for ExportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Double(x) => write!(f, "{x}"),
            Self::Text(text) => f.write_str(text),
            Self::Bytes(bytes) | Self::Blob(bytes) => f.write_str(&encoding::encode_base64(bytes)),
            Self::Timestamp(ts) => f.write_str(&ts.to_rfc3339()),
            Self::NaiveTimestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f")),
            Self::GeoPoint { lat, lng } => write!(f, "{lat},{lng}"),
            Self::User(user) => f.write_str(&user.email),
            Self::Reference(key) => write!(f, "{key}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (name, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}
