//! Scalar extraction from tagged values.

use dsexport_types::{ExportValue, TaggedValue, decode_utf8_ignore};
use tracing::warn;

/// Extracts the populated scalar variant of a tagged value.
///
/// Checks run in a fixed order: string, then int64, then double, then
/// boolean. A string is UTF-8 decoded with invalid bytes dropped, or handed
/// back untouched when `raw` is set. Presence decides each branch, so an
/// int64 of zero or an empty string is returned as such. A value with none
/// of the four variants yields `Null`.
#[must_use]
pub fn extract(value: &TaggedValue, raw: bool) -> ExportValue {
    if let Some(bytes) = &value.string_value {
        if raw {
            return ExportValue::Bytes(bytes.clone());
        }
        let (text, dropped) = decode_utf8_ignore(bytes);
        if dropped {
            warn!(len = bytes.len(), "dropped invalid UTF-8 from string value");
        }
        return ExportValue::Text(text);
    }

    if let Some(n) = value.int64_value {
        return ExportValue::Int(n);
    }

    match (value.double_value, value.boolean_value) {
        (Some(x), _) => ExportValue::Double(x),
        (None, Some(b)) => ExportValue::Bool(b),
        (None, None) => ExportValue::Null,
    }
}

/// Decoded scalar, strings as text.
#[must_use]
pub fn scalar_value(value: &TaggedValue) -> ExportValue {
    extract(value, false)
}

/// Decoded scalar, strings as raw bytes.
#[must_use]
pub fn raw_value(value: &TaggedValue) -> ExportValue {
    extract(value, true)
}
