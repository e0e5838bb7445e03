//! Hierarchical datastore keys.
//!
//! A key is a path of `(kind, id_or_name)` pairs from the root ancestor down
//! to the entity itself. The serde form matches the `referencevalue` group of
//! a property value as a protobuf JSON printer emits it.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric id or string name of one path element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdOrName {
    Id(i64),
    Name(String),
}

impl IdOrName {
    /// Returns the string used as a mapping key in the destination tree.
    #[must_use]
    pub fn to_key_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for IdOrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for IdOrName {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for IdOrName {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for IdOrName {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// One `(kind, id_or_name)` step of a key path.
///
/// Both `id` and `name` may be absent for an incomplete key (an entity that
/// was never assigned an id).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathElement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::encoding::int64_opt"
    )]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PathElement {
    /// Creates a path element from a kind and an id or name.
    pub fn new(kind: impl Into<String>, id_or_name: impl Into<IdOrName>) -> Self {
        let kind = kind.into();
        match id_or_name.into() {
            IdOrName::Id(id) => Self {
                kind,
                id: Some(id),
                name: None,
            },
            IdOrName::Name(name) => Self {
                kind,
                id: None,
                name: Some(name),
            },
        }
    }

    /// The id if one is set, otherwise the name.
    #[must_use]
    pub fn id_or_name(&self) -> Option<IdOrName> {
        match (&self.id, &self.name) {
            (Some(id), _) => Some(IdOrName::Id(*id)),
            (None, Some(name)) => Some(IdOrName::Name(name.clone())),
            (None, None) => None,
        }
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id_or_name() {
            Some(id_or_name) => write!(f, "{}:{}", self.kind, id_or_name),
            None => write!(f, "{}:?", self.kind),
        }
    }
}

/// A datastore key: app, optional namespace and an ancestor path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    #[serde(default)]
    pub app: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_space: Option<String>,
    #[serde(rename = "pathelement", default)]
    pub path: Vec<PathElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
}

impl Key {
    /// Creates an empty key for an app. Extend it with [`Key::child`].
    pub fn root(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            ..Self::default()
        }
    }

    /// Creates a key from an explicit path.
    pub fn from_path(app: impl Into<String>, path: Vec<PathElement>) -> Self {
        Self {
            app: app.into(),
            path,
            ..Self::default()
        }
    }

    /// Returns this key extended by one child element.
    #[must_use]
    pub fn child(mut self, kind: impl Into<String>, id_or_name: impl Into<IdOrName>) -> Self {
        self.path.push(PathElement::new(kind, id_or_name));
        self
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.name_space = Some(namespace.into());
        self
    }

    /// The path from root ancestor to leaf.
    #[must_use]
    pub fn path(&self) -> &[PathElement] {
        &self.path
    }

    /// The leaf element's kind.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.path.last().map(|e| e.kind.as_str())
    }

    /// The leaf element's id or name.
    #[must_use]
    pub fn id_or_name(&self) -> Option<IdOrName> {
        self.path.last().and_then(PathElement::id_or_name)
    }

    /// The parent key, or `None` for a root entity (or an empty key).
    #[must_use]
    pub fn parent(&self) -> Option<Key> {
        if self.path.len() < 2 {
            return None;
        }
        Some(Self {
            path: self.path[..self.path.len() - 1].to_vec(),
            ..self.clone()
        })
    }

    /// Number of ancestors above the leaf.
    #[must_use]
    pub fn ancestor_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Returns true when every path element has an id or a name.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.path.is_empty() && self.path.iter().all(|e| e.id_or_name().is_some())
    }

    /// Returns the `(kind, id_or_name)` pairs, failing on an incomplete key.
    pub fn resolved_path(&self) -> Result<Vec<(&str, IdOrName)>> {
        if self.path.is_empty() {
            return Err(Error::IncompleteKey("empty path".to_string()));
        }
        self.path
            .iter()
            .map(|e| {
                e.id_or_name()
                    .map(|id_or_name| (e.kind.as_str(), id_or_name))
                    .ok_or_else(|| Error::IncompleteKey(self.to_string()))
            })
            .collect()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}
