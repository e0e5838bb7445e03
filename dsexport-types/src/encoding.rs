//! Serde helpers for the protobuf JSON mapping of scalar fields.
//!
//! Bytes travel as base64 text, int64 as a decimal string (numbers are
//! accepted too), and doubles as numbers or the `"NaN"` / `"Infinity"` /
//! `"-Infinity"` literals.

use crate::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};

/// Decodes base64 text, accepting both the standard and URL-safe alphabets.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    match STANDARD.decode(text) {
        Ok(bytes) => Ok(bytes),
        Err(first) => URL_SAFE.decode(text).map_err(|_| Error::InvalidBase64(first)),
    }
}

/// Encodes bytes as standard, padded base64.
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Parses an int64 literal as printed by a protobuf JSON encoder.
pub fn parse_int64(text: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidInt64(text.to_string()))
}

/// Parses a double literal, including the non-finite spellings.
pub fn parse_double(text: &str) -> Result<f64> {
    match text.trim() {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        other => other
            .parse::<f64>()
            .map_err(|_| Error::InvalidDouble(text.to_string())),
    }
}

/// `Option<Vec<u8>>` as optional base64 text.
pub mod base64_opt {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => s.serialize_str(&super::encode_base64(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|text| super::decode_base64(&text).map_err(D::Error::custom))
            .transpose()
    }
}

/// `Option<i64>` as an optional decimal string or number.
pub mod int64_opt {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<i64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(n) => s.serialize_str(&n.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Option::<Repr>::deserialize(d)?
            .map(|repr| match repr {
                Repr::Number(n) => Ok(n),
                Repr::Text(text) => super::parse_int64(&text).map_err(D::Error::custom),
            })
            .transpose()
    }
}

/// `Option<f64>` as an optional number or non-finite literal.
pub mod double_opt {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(x) if x.is_nan() => s.serialize_str("NaN"),
            Some(x) if x.is_infinite() && *x > 0.0 => s.serialize_str("Infinity"),
            Some(x) if x.is_infinite() => s.serialize_str("-Infinity"),
            Some(x) => s.serialize_f64(*x),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Option::<Repr>::deserialize(d)?
            .map(|repr| match repr {
                Repr::Number(x) => Ok(x),
                Repr::Text(text) => super::parse_double(&text).map_err(D::Error::custom),
            })
            .transpose()
    }
}
