//! The destination tree and the key-path resolver.
//!
//! Entities land at `tree[kind][id_or_name]`. A child entity nests inside its
//! parent's mapping, again keyed by kind and then id or name, so a key with N
//! ancestors sits N kind/id levels below the root.

use crate::{ExportError, ExportResult};
use dsexport_entity::{EntityError, EntityRecord, fill_properties};
use dsexport_types::{ExportValue, Key, PropertyMap};
use std::collections::HashSet;
use tracing::warn;

/// Nested kind → id_or_name → properties mapping, built one entity at a time.
///
/// The tree remembers which slots were created by key resolution, so a
/// property that happens to share a name with a child kind never merges
/// with or replaces the nested entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityTree {
    root: PropertyMap,
    /// Slot paths (kind and id levels) that hold nested entities.
    entity_slots: HashSet<Vec<String>>,
}

impl EntityTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level kind mappings.
    #[must_use]
    pub fn root(&self) -> &PropertyMap {
        &self.root
    }

    #[must_use]
    pub fn into_inner(self) -> PropertyMap {
        self.root
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Returns the mapping for `key`, creating missing levels.
    ///
    /// Fails with [`ExportError::PathConflict`] when a slot on the path is
    /// already taken by a property, whatever the property's value.
    pub fn resolve(&mut self, key: &Key) -> ExportResult<&mut PropertyMap> {
        let slots = slot_path(key)?;
        let mut current = &mut self.root;
        for depth in 1..=slots.len() {
            let owned = &slots[..depth];
            let slot = &slots[depth - 1];
            if !self.entity_slots.contains(owned) {
                if let Some(existing) = current.get(slot) {
                    warn!(%key, %slot, "slot already holds a property");
                    return Err(conflict(key, slot, existing));
                }
                self.entity_slots.insert(owned.to_vec());
            }
            current = child_map(current, slot, key)?;
        }
        Ok(current)
    }

    /// Looks up the mapping for `key` without creating anything.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&PropertyMap> {
        let pairs = key.resolved_path().ok()?;
        let mut current = &self.root;
        for (kind, id_or_name) in pairs {
            current = current.get(kind)?.as_map()?;
            current = current.get(&id_or_name.to_key_string())?.as_map()?;
        }
        Some(current)
    }

    /// Places a decoded record's properties under its key.
    ///
    /// A property named like a child kind that already holds nested
    /// entities is logged and dropped, whether or not its value is a map.
    pub fn insert_record(&mut self, record: &EntityRecord) -> ExportResult<&mut PropertyMap> {
        let key = record.key.as_ref().ok_or(EntityError::MissingKey)?;
        let mut properties = PropertyMap::new();
        fill_properties(record, &mut properties)?;

        let mut slots = slot_path(key)?;
        properties.retain(|name, _| {
            slots.push(name.clone());
            let taken = self.entity_slots.contains(&slots);
            slots.pop();
            if taken {
                warn!(%key, property = %name, "property collides with nested entities, dropped");
            }
            !taken
        });

        let dest = self.resolve(key)?;
        dest.extend(properties);
        Ok(dest)
    }

    /// Decodes a serialized record and inserts it.
    pub fn insert_bytes(&mut self, bytes: &[u8]) -> ExportResult<&mut PropertyMap> {
        let record = EntityRecord::decode(bytes)?;
        self.insert_record(&record)
    }
}

/// Kind and id slots from the root ancestor down to the leaf.
fn slot_path(key: &Key) -> ExportResult<Vec<String>> {
    Ok(key
        .resolved_path()?
        .into_iter()
        .flat_map(|(kind, id_or_name)| [kind.to_string(), id_or_name.to_key_string()])
        .collect())
}

fn conflict(key: &Key, slot: &str, found: &ExportValue) -> ExportError {
    ExportError::PathConflict {
        key: key.to_string(),
        slot: slot.to_string(),
        found: found.type_name(),
    }
}

/// Walks `key` from its root ancestor down, creating empty mappings on
/// demand, and returns the leaf entity's mapping.
///
/// Calling it again with the same key returns the same mapping. Existing
/// entries are never replaced; a non-mapping value on the path is an error.
/// A bare map cannot tell a map-valued property from nested entities;
/// [`EntityTree::resolve`] tracks that and rejects both.
pub fn resolve_dest<'a>(key: &Key, tree: &'a mut PropertyMap) -> ExportResult<&'a mut PropertyMap> {
    let pairs = key.resolved_path()?;
    let mut current = tree;
    for (kind, id_or_name) in pairs {
        current = child_map(current, kind, key)?;
        current = child_map(current, &id_or_name.to_key_string(), key)?;
    }
    Ok(current)
}

fn child_map<'a>(map: &'a mut PropertyMap, slot: &str, key: &Key) -> ExportResult<&'a mut PropertyMap> {
    match map
        .entry(slot.to_string())
        .or_insert_with(|| ExportValue::Map(PropertyMap::new()))
    {
        ExportValue::Map(child) => Ok(child),
        other => Err(conflict(key, slot, other)),
    }
}
