//! Config operations: key lookup, listing, and result types.
//!
//! Provides the logic behind the `get` and `list` actions and the
//! `ConfigResult` enum that callers use to display results.

use std::fmt;

use crate::error::BindError;
use crate::store::Store;
use crate::types::{GENERAL, Table};

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// The decoded model rendered as INI lines.
    Lines(Vec<String>),
    /// A key's effective value.
    KeyValue {
        group: String,
        key: String,
        value: String,
    },
    /// Confirmation that a value was set.
    ValueSet {
        group: String,
        key: String,
        value: String,
    },
    /// Confirmation that a value was removed.
    ValueUnset { group: String, key: String },
    /// All mapped entries as `(qualified key, value)` pairs.
    Listing { entries: Vec<(String, String)> },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Lines(lines) => write!(f, "{}", lines.join("\n")),
            ConfigResult::KeyValue { group, key, value } => {
                write!(f, "{} = {value}", qualified(group, key))
            }
            ConfigResult::ValueSet { group, key, value } => {
                write!(f, "Set {} = {value}", qualified(group, key))
            }
            ConfigResult::ValueUnset { group, key } => {
                write!(f, "Unset {}", qualified(group, key))
            }
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
        }
    }
}

/// `group.key`, or just `key` for the unnamed general group.
pub fn qualified(group: &str, key: &str) -> String {
    if group == GENERAL {
        key.to_string()
    } else {
        format!("{group}.{key}")
    }
}

/// Inverse of [`qualified`]: split at the last dot. No dot means the
/// general group.
pub fn split_qualified(qualified: &str) -> (String, String) {
    match qualified.rsplit_once('.') {
        Some((group, key)) => (group.to_string(), key.to_string()),
        None => (GENERAL.to_string(), qualified.to_string()),
    }
}

/// Effective value of `[group] key`: the encoded model's value when the key
/// is mapped, otherwise the raw store value.
pub fn get_value(
    encoded: &Table,
    store: &Store,
    group: &str,
    key: &str,
) -> Result<ConfigResult, BindError> {
    let value = encoded
        .get(group, key)
        .map(ToString::to_string)
        .or_else(|| store.get(group, key).map(str::to_string))
        .ok_or_else(|| BindError::KeyNotFound {
            group: group.into(),
            key: key.into(),
        })?;

    Ok(ConfigResult::KeyValue {
        group: group.into(),
        key: key.into(),
        value,
    })
}

/// List every entry of an encoded model as flattened `group.key` pairs.
pub fn list_values(encoded: &Table) -> ConfigResult {
    let entries = encoded
        .iter()
        .flat_map(|section| {
            section
                .iter()
                .map(|(key, value)| (qualified(section.name(), key), value.to_string()))
        })
        .collect();

    ConfigResult::Listing { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn encoded() -> Table {
        let mut table = Table::new();
        table.insert("General", "Enable", Value::Bool(true));
        table.insert("Authentication", "Username", Value::from("alice"));
        table.insert(GENERAL, "Version", Value::Int(2));
        table
    }

    #[test]
    fn get_mapped_key() {
        let result = get_value(&encoded(), &Store::new(), "General", "Enable").unwrap();
        match result {
            ConfigResult::KeyValue { value, .. } => assert_eq!(value, "true"),
            other => panic!("Expected KeyValue, got {other:?}"),
        }
    }

    #[test]
    fn get_falls_back_to_store() {
        let store = Store::parse("[Extra]\nNote = hi\n").unwrap();
        let result = get_value(&encoded(), &store, "Extra", "Note").unwrap();
        match result {
            ConfigResult::KeyValue { value, .. } => assert_eq!(value, "hi"),
            other => panic!("Expected KeyValue, got {other:?}"),
        }
    }

    #[test]
    fn get_nonexistent_key() {
        let result = get_value(&encoded(), &Store::new(), "General", "Nope");
        assert!(matches!(result, Err(BindError::KeyNotFound { .. })));
    }

    #[test]
    fn list_flattens_groups() {
        let result = list_values(&encoded());
        assert_eq!(
            result,
            ConfigResult::Listing {
                entries: vec![
                    ("General.Enable".into(), "true".into()),
                    ("Authentication.Username".into(), "alice".into()),
                    ("Version".into(), "2".into()),
                ]
            }
        );
    }

    #[test]
    fn split_qualified_keys() {
        assert_eq!(split_qualified("Server.Port"), ("Server".into(), "Port".into()));
        assert_eq!(split_qualified("a.b.Key"), ("a.b".into(), "Key".into()));
        assert_eq!(split_qualified("Top"), (GENERAL.into(), "Top".into()));
    }

    #[test]
    fn display_formats() {
        let set = ConfigResult::ValueSet {
            group: "Server".into(),
            key: "Port".into(),
            value: "80".into(),
        };
        assert_eq!(set.to_string(), "Set Server.Port = 80");

        let unset = ConfigResult::ValueUnset {
            group: GENERAL.into(),
            key: "Top".into(),
        };
        assert_eq!(unset.to_string(), "Unset Top");

        let lines = ConfigResult::Lines(vec!["[A]".into(), "x = 1".into()]);
        assert_eq!(lines.to_string(), "[A]\nx = 1");

        let listing = list_values(&encoded());
        assert_eq!(
            listing.to_string(),
            "General.Enable = true\nAuthentication.Username = alice\nVersion = 2"
        );
    }
}
