//! JSON rendering with a fallback hook for non-native values.

use crate::{EntityTree, ExportConfig, ExportResult};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use dsexport_blob::BlobWriter;
use dsexport_types::{ExportValue, PropertyMap};
use serde_json::{Map, Value};
use std::io::Write;
use tracing::debug;

/// Milliseconds since the Unix epoch, after normalizing to UTC.
///
/// Sub-millisecond precision is truncated toward zero, so -499.5ms maps to
/// -499. Nanoseconds below the microsecond are ignored.
#[must_use]
pub fn epoch_millis(ts: &DateTime<FixedOffset>) -> i64 {
    utc_millis(&ts.with_timezone(&Utc))
}

/// Milliseconds since the Unix epoch for a timestamp taken as UTC.
#[must_use]
pub fn naive_epoch_millis(ts: &NaiveDateTime) -> i64 {
    utc_millis(&ts.and_utc())
}

fn utc_millis(ts: &DateTime<Utc>) -> i64 {
    let micros = ts
        .timestamp()
        .saturating_mul(1_000_000)
        .saturating_add(i64::from(ts.timestamp_subsec_micros()));
    micros / 1000
}

/// Renders exported values as JSON, writing blobs as side files.
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    blobs: BlobWriter,
    pretty: bool,
}

impl JsonSerializer {
    /// Serializer writing blobs to `<dest_dir>/blob`.
    pub fn new(dest_dir: impl AsRef<std::path::Path>) -> Self {
        Self {
            blobs: BlobWriter::new(dest_dir),
            pretty: true,
        }
    }

    #[must_use]
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            blobs: config.blob_writer(),
            pretty: config.pretty,
        }
    }

    #[must_use]
    pub fn blob_writer(&self) -> &BlobWriter {
        &self.blobs
    }

    /// Converts a value JSON has no native form for.
    ///
    /// Timestamps become epoch milliseconds, blobs are written out and
    /// replaced by their relative path, and anything else becomes its string
    /// rendering.
    pub fn fallback(&self, value: &ExportValue) -> ExportResult<Value> {
        match value {
            ExportValue::Timestamp(ts) => Ok(Value::from(epoch_millis(ts))),
            ExportValue::NaiveTimestamp(ts) => Ok(Value::from(naive_epoch_millis(ts))),
            ExportValue::Blob(bytes) => {
                let blob = self.blobs.write(bytes)?;
                Ok(Value::String(blob.relative_path))
            }
            other => {
                debug!(kind = other.type_name(), "rendering value as string");
                Ok(Value::String(other.to_string()))
            }
        }
    }

    /// Converts a value, calling [`JsonSerializer::fallback`] where needed.
    pub fn to_json(&self, value: &ExportValue) -> ExportResult<Value> {
        match value {
            ExportValue::Null => Ok(Value::Null),
            ExportValue::Bool(b) => Ok(Value::Bool(*b)),
            ExportValue::Int(n) => Ok(Value::from(*n)),
            ExportValue::Text(text) => Ok(Value::String(text.clone())),
            ExportValue::Double(x) => match serde_json::Number::from_f64(*x) {
                Some(number) => Ok(Value::Number(number)),
                None => self.fallback(value),
            },
            ExportValue::List(items) => items
                .iter()
                .map(|item| self.to_json(item))
                .collect::<ExportResult<Vec<_>>>()
                .map(Value::Array),
            ExportValue::Map(map) => self.map_to_json(map),
            other => self.fallback(other),
        }
    }

    pub fn map_to_json(&self, map: &PropertyMap) -> ExportResult<Value> {
        let mut object = Map::new();
        for (name, value) in map {
            object.insert(name.clone(), self.to_json(value)?);
        }
        Ok(Value::Object(object))
    }

    /// Renders the whole destination tree.
    pub fn tree_to_json(&self, tree: &EntityTree) -> ExportResult<Value> {
        self.map_to_json(tree.root())
    }

    /// Renders the tree and writes it to `writer`.
    pub fn write_json<W: Write>(&self, tree: &EntityTree, writer: W) -> ExportResult<()> {
        let value = self.tree_to_json(tree)?;
        if self.pretty {
            serde_json::to_writer_pretty(writer, &value)?;
        } else {
            serde_json::to_writer(writer, &value)?;
        }
        Ok(())
    }
}
