//! Entity record decoding for dsexport.
//!
//! Reads serialized `EntityProto` records (the datastore backup format) and
//! turns their properties into [`ExportValue`]s:
//! - [`wire`]: protobuf wire primitives
//! - [`EntityRecord`]: the record model, decode / encode / field mapping
//! - [`extract`]: scalar extraction from tagged values
//! - [`embedded`]: recursive decoding of embedded entities
//! - [`convert`]: meaning-aware conversion of top-level properties

mod error;
mod record;

pub mod convert;
pub mod embedded;
pub mod extract;
pub mod wire;

pub use convert::{fill_properties, property_value};
pub use embedded::{decode_embedded, decode_embedded_into};
pub use error::{EntityError, EntityResult};
pub use extract::{extract, raw_value, scalar_value};
pub use record::{EntityRecord, Meaning, Property};

use dsexport_types::{ExportValue, PropertyMap};

/// Stores a property value in `data`.
///
/// Single-valued properties replace any previous value. Values of a
/// `multiple` property accumulate into a list, in record order.
pub fn insert_property(data: &mut PropertyMap, name: &str, value: ExportValue, multiple: bool) {
    if !multiple {
        data.insert(name.to_string(), value);
        return;
    }
    match data.remove(name) {
        Some(ExportValue::List(mut items)) => {
            items.push(value);
            data.insert(name.to_string(), ExportValue::List(items));
        }
        Some(previous) => {
            data.insert(name.to_string(), ExportValue::List(vec![previous, value]));
        }
        None => {
            data.insert(name.to_string(), ExportValue::List(vec![value]));
        }
    }
}
