//! Meaning-aware conversion of top-level record properties.

use crate::embedded::decode_embedded;
use crate::extract::extract;
use crate::record::{EntityRecord, Meaning, Property};
use crate::{EntityError, EntityResult, insert_property};
use chrono::DateTime;
use dsexport_types::{ExportValue, PropertyMap};

/// Converts one property into an exported value.
///
/// The meaning tag and structured variants are looked at first:
/// embedded entities become nested maps, `EMPTY_LIST` an empty list,
/// `BLOB` a blob, `BYTESTRING` raw bytes and `GD_WHEN` integers a UTC
/// timestamp (microseconds since the epoch). Points, users and references
/// map to their own variants. Everything else is a plain scalar.
pub fn property_value(property: &Property) -> EntityResult<ExportValue> {
    let value = &property.value;

    match property.meaning {
        Meaning::EntityProto => {
            let bytes = value
                .string_value
                .as_deref()
                .ok_or_else(|| EntityError::MissingEmbeddedPayload(property.name.clone()))?;
            return Ok(ExportValue::Map(decode_embedded(bytes)?));
        }
        Meaning::EmptyList => return Ok(ExportValue::List(Vec::new())),
        Meaning::Blob => {
            if let Some(bytes) = &value.string_value {
                return Ok(ExportValue::Blob(bytes.clone()));
            }
        }
        Meaning::Bytestring => {
            if let Some(bytes) = &value.string_value {
                return Ok(ExportValue::Bytes(bytes.clone()));
            }
        }
        Meaning::GdWhen => {
            if let Some(micros) = value.int64_value
                && let Some(ts) = DateTime::from_timestamp_micros(micros)
            {
                return Ok(ExportValue::Timestamp(ts.fixed_offset()));
            }
        }
        _ => {}
    }

    if let Some(point) = &value.point_value {
        return Ok(ExportValue::GeoPoint {
            lat: point.x,
            lng: point.y,
        });
    }
    if let Some(user) = &value.user_value {
        return Ok(ExportValue::User(user.clone()));
    }
    if let Some(key) = &value.reference_value {
        return Ok(ExportValue::Reference(key.clone()));
    }

    Ok(extract(value, false))
}

/// Writes every property of a record (indexed, then unindexed) into `data`.
pub fn fill_properties(record: &EntityRecord, data: &mut PropertyMap) -> EntityResult<()> {
    for property in record.all_properties() {
        let value = property_value(property)?;
        let multiple = property.multiple && property.meaning != Meaning::EmptyList;
        insert_property(data, &property.name, value, multiple);
    }
    Ok(())
}
