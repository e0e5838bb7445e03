//! Recursive decoding of embedded entities.

use crate::extract::extract;
use crate::record::{EntityRecord, Meaning};
use crate::wire::MAX_NESTING;
use crate::{EntityError, EntityResult, insert_property};
use dsexport_types::{ExportValue, PropertyMap};
use tracing::debug;

/// Decodes an embedded entity's bytes into a flat property mapping.
pub fn decode_embedded(bytes: &[u8]) -> EntityResult<PropertyMap> {
    let mut data = PropertyMap::new();
    decode_embedded_into(bytes, &mut data)?;
    Ok(data)
}

/// Decodes an embedded entity's raw properties into `data`.
///
/// Properties tagged `ENTITY_PROTO` recurse into a nested mapping; all
/// others go through the scalar extractor. Only `raw_property` entries are
/// read.
pub fn decode_embedded_into(bytes: &[u8], data: &mut PropertyMap) -> EntityResult<()> {
    decode_nested(bytes, data, 0)
}

fn decode_nested(bytes: &[u8], data: &mut PropertyMap, depth: usize) -> EntityResult<()> {
    if depth >= MAX_NESTING {
        return Err(EntityError::TooDeep(MAX_NESTING));
    }
    let record = EntityRecord::decode(bytes)?;
    debug!(depth, properties = record.raw_properties.len(), "decoding embedded entity");

    for property in &record.raw_properties {
        let value = if property.meaning == Meaning::EntityProto {
            let payload = property
                .value
                .string_value
                .as_deref()
                .ok_or_else(|| EntityError::MissingEmbeddedPayload(property.name.clone()))?;
            let mut nested = PropertyMap::new();
            decode_nested(payload, &mut nested, depth + 1)?;
            ExportValue::Map(nested)
        } else {
            extract(&property.value, false)
        };
        insert_property(data, &property.name, value, property.multiple);
    }
    Ok(())
}
