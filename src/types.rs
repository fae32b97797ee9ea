//! Plain data types shared across the crate: scalar values, ordered
//! group/key tables, entry bookkeeping, and config actions.
//!
//! [`Table`] is the structure both directions meet in. The store keeps the
//! parsed file as a `Table<String>`; encoding produces a `Table<Value>`.
//! Groups and keys iterate in insertion order, and inserting an existing key
//! replaces its value in place (last write wins).

use std::any::TypeId;
use std::fmt;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::error::BindError;

/// Name of the unnamed group holding keys that appear before any `[section]`
/// header.
pub const GENERAL: &str = "";

/// A scalar produced by encoding a mapped member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Long(l) => write!(f, "{l}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<i64> for Value {
    fn from(l: i64) -> Self {
        Value::Long(l)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// One named group: an ordered `key -> value` mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<V = Value> {
    name: String,
    entries: Vec<(String, V)>,
}

impl<V> Section<V> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(String, V)> {
        self.entries
    }
}

/// Ordered `group -> (key -> value)` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<V = Value> {
    sections: Vec<Section<V>>,
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
        }
    }
}

impl<V> Table<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, group: &str) -> Option<&Section<V>> {
        self.sections.iter().find(|s| s.name == group)
    }

    pub fn section_mut(&mut self, group: &str) -> Option<&mut Section<V>> {
        self.sections.iter_mut().find(|s| s.name == group)
    }

    /// Get a group, creating an empty one at the end if it does not exist.
    pub fn section_or_insert(&mut self, group: &str) -> &mut Section<V> {
        let idx = match self.sections.iter().position(|s| s.name == group) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(group));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    pub fn get(&self, group: &str, key: &str) -> Option<&V> {
        self.section(group)?.get(key)
    }

    pub fn insert(&mut self, group: &str, key: impl Into<String>, value: V) -> Option<V> {
        self.section_or_insert(group).insert(key, value)
    }

    pub fn remove(&mut self, group: &str, key: &str) -> Option<V> {
        self.section_mut(group)?.remove(key)
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section<V>> {
        self.sections.iter()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub(crate) fn into_sections(self) -> Vec<Section<V>> {
        self.sections
    }
}

impl<V: fmt::Display> Table<V> {
    /// Render as INI text lines: a `[group]` header followed by one
    /// `key = value` line per entry, groups and keys in table order.
    ///
    /// Keys of the unnamed [`GENERAL`] group are emitted first and without a
    /// header, since they can only be read back from before the first header.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(general) = self.section(GENERAL) {
            for (key, value) in general.iter() {
                lines.push(format!("{key} = {value}"));
            }
        }
        for section in self.sections.iter().filter(|s| s.name != GENERAL) {
            lines.push(format!("[{}]", section.name));
            for (key, value) in section.iter() {
                lines.push(format!("{key} = {value}"));
            }
        }
        lines
    }
}

/// Reject an entry that would not survive as a single `key = value` line.
pub(crate) fn ensure_single_line(group: &str, key: &str, value: &str) -> Result<(), BindError> {
    let breaks = |s: &str| s.contains(['\n', '\r']);
    if breaks(group) || breaks(key) || breaks(value) {
        return Err(BindError::LineBreak {
            group: group.to_string(),
            key: key.to_string(),
        });
    }
    Ok(())
}

impl<V: fmt::Display> Table<V> {
    /// Fails on the first entry [`to_lines`](Self::to_lines) could not
    /// render faithfully.
    pub(crate) fn ensure_single_lines(&self) -> Result<(), BindError> {
        for section in &self.sections {
            for (key, value) in section.iter() {
                ensure_single_line(&section.name, key, &value.to_string())?;
            }
        }
        Ok(())
    }
}

impl<'a, V> IntoIterator for &'a Table<V> {
    type Item = &'a Section<V>;
    type IntoIter = std::slice::Iter<'a, Section<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

impl<V: Serialize> Serialize for Section<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<V: Serialize> Serialize for Table<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.name, section)?;
        }
        map.end()
    }
}

/// Bookkeeping for one resolved `(group, key)` of a decode pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryInfo {
    /// Declared type of the member, e.g. `"i32"`.
    pub value_type: &'static str,
    #[serde(skip)]
    pub type_id: TypeId,
    /// The model type that owns the member.
    pub owner: &'static str,
    /// Declared member name.
    pub member: &'static str,
}

/// A config operation, independent of any CLI framework.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Every entry of the decoded model, flattened to `group.key = value`.
    List,
    /// The decoded model rendered as INI lines.
    Lines,
    Get { group: String, key: String },
    Set {
        group: String,
        key: String,
        value: String,
    },
    Unset { group: String, key: String },
}
