//! The key/value store: INI text parsed into ordered groups of string values.
//!
//! Parsing is delegated to [`rust-ini`](https://docs.rs/rust-ini); the parsed
//! document is copied into a [`Table<String>`] so lookups, typed reads, and
//! rendering don't depend on the parser's own representation. Escape and
//! quote processing are turned off, so a value comes back as written between
//! the `=` and the end of the line. Whitespace around keys and values is
//! trimmed; a value with meaningful leading or trailing spaces does not
//! survive a round trip.
//!
//! Reads never create groups. Only [`Store::set`] does.

use std::fmt;
use std::io::Read;
use std::path::Path;

use ini::{Ini, ParseOption};
use tracing::debug;

use crate::convert;
use crate::error::BindError;
use crate::types::{GENERAL, Section, Table};

/// Upper bound on nested `${...}` substitutions in [`Store::get_expanded`].
const MAX_EXPANSION_DEPTH: usize = 16;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    table: Table<String>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI text. Keys before the first header land in the unnamed
    /// [`GENERAL`] group. A key repeated within a group keeps its last value.
    pub fn parse(text: &str) -> Result<Self, BindError> {
        Self::parse_named(text, "<text>")
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, BindError> {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(BindError::Read)?;
        Self::parse_named(&text, "<stream>")
    }

    pub fn load(path: &Path) -> Result<Self, BindError> {
        let text = std::fs::read_to_string(path).map_err(|e| BindError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse_named(&text, &path.display().to_string())
    }

    fn parse_named(text: &str, origin: &str) -> Result<Self, BindError> {
        let options = ParseOption {
            enabled_escape: false,
            enabled_quote: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, options).map_err(|e| BindError::Parse {
            origin: origin.to_string(),
            source: e,
        })?;

        let mut table = Table::new();
        for (name, properties) in ini.iter() {
            let group = name.unwrap_or(GENERAL);
            if group == GENERAL && properties.iter().next().is_none() {
                continue;
            }
            let section = table.section_or_insert(group);
            for (key, value) in properties.iter() {
                section.insert(key, value.to_string());
            }
        }
        debug!(origin, groups = table.len(), "parsed store");
        Ok(Self { table })
    }

    pub fn get(&self, group: &str, key: &str) -> Option<&str> {
        self.table.get(group, key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, group: &str, key: &str, fallback: &'a str) -> &'a str {
        self.get(group, key).unwrap_or(fallback)
    }

    pub fn contains(&self, group: &str, key: &str) -> bool {
        self.get(group, key).is_some()
    }

    pub fn get_int(&self, group: &str, key: &str) -> Result<Option<i32>, BindError> {
        self.get_parsed(group, key)
    }

    pub fn get_int_or(&self, group: &str, key: &str, fallback: i32) -> Result<i32, BindError> {
        Ok(self.get_int(group, key)?.unwrap_or(fallback))
    }

    pub fn get_long(&self, group: &str, key: &str) -> Result<Option<i64>, BindError> {
        self.get_parsed(group, key)
    }

    pub fn get_long_or(&self, group: &str, key: &str, fallback: i64) -> Result<i64, BindError> {
        Ok(self.get_long(group, key)?.unwrap_or(fallback))
    }

    pub fn get_float(&self, group: &str, key: &str) -> Result<Option<f32>, BindError> {
        self.get_parsed(group, key)
    }

    pub fn get_float_or(&self, group: &str, key: &str, fallback: f32) -> Result<f32, BindError> {
        Ok(self.get_float(group, key)?.unwrap_or(fallback))
    }

    /// `Some(true)` only for the exact value `"true"`; any other present
    /// value is `Some(false)`.
    pub fn get_bool(&self, group: &str, key: &str) -> Option<bool> {
        self.get(group, key).map(convert::parse_bool)
    }

    pub fn get_bool_or(&self, group: &str, key: &str, fallback: bool) -> bool {
        self.get_bool(group, key).unwrap_or(fallback)
    }

    fn get_parsed<T>(&self, group: &str, key: &str) -> Result<Option<T>, BindError>
    where
        T: std::str::FromStr,
        T::Err: fmt::Display,
    {
        let Some(raw) = self.get(group, key) else {
            return Ok(None);
        };
        convert::parse_number::<T>(raw).map(Some).map_err(|reason| {
            BindError::conversion(group, key, std::any::type_name::<T>(), raw, reason)
        })
    }

    /// Value with `${key}` (same group) and `${group|key}` references
    /// substituted. Unknown references are kept verbatim.
    pub fn get_expanded(&self, group: &str, key: &str) -> Option<String> {
        let raw = self.get(group, key)?;
        Some(self.expand(group, raw, 0))
    }

    fn expand(&self, group: &str, raw: &str, depth: usize) -> String {
        if depth >= MAX_EXPANSION_DEPTH {
            return raw.to_string();
        }
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };
            let reference = &after[..end];
            let (ref_group, ref_key) = reference.split_once('|').unwrap_or((group, reference));
            match self.get(ref_group, ref_key) {
                Some(value) => out.push_str(&self.expand(ref_group, value, depth + 1)),
                None => out.push_str(&rest[start..start + 2 + end + 1]),
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }

    /// Set a value, creating the group if needed. Replaces an existing key.
    pub fn set(&mut self, group: &str, key: &str, value: impl fmt::Display) {
        self.table.insert(group, key, value.to_string());
    }

    pub fn remove(&mut self, group: &str, key: &str) -> Option<String> {
        self.table.remove(group, key)
    }

    /// Keys of a group in file order. Empty for a missing group.
    pub fn keys(&self, group: &str) -> Vec<&str> {
        self.table.section(group).map(|s| s.keys().collect()).unwrap_or_default()
    }

    /// Values of a group in key order. Empty for a missing group.
    pub fn values(&self, group: &str) -> Vec<&str> {
        self.table
            .section(group)
            .map(|s| s.values().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.table.groups()
    }

    pub fn section(&self, group: &str) -> Option<&Section<String>> {
        self.table.section(group)
    }

    pub fn table(&self) -> &Table<String> {
        &self.table
    }

    pub fn to_lines(&self) -> Vec<String> {
        self.table.to_lines()
    }
}
