use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BindError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Cannot convert '{value}' at [{group}] {key} to {target}: {reason}")]
    Conversion {
        group: String,
        key: String,
        target: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid default '{value}' for [{group}] {key} ({target}): {reason}")]
    DefaultValue {
        group: String,
        key: String,
        target: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        source: ini::ParseError,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read config stream: {0}")]
    Read(#[source] std::io::Error),

    #[error("Line break in [{group}] {key}: INI entries must fit on one line")]
    LineBreak { group: String, key: String },

    #[error("Key not found: [{group}] {key}")]
    KeyNotFound { group: String, key: String },

    #[error("No save location: load the mapper from a path or pass one to save()")]
    NoLocation,
}

/// A malformed data model. Raised when a mapper is built, or when a member
/// ends up with no group during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{model} declares a member with an empty name")]
    EmptyMemberName { model: &'static str },

    #[error("{model} declares member '{member}' more than once")]
    DuplicateMember {
        model: &'static str,
        member: &'static str,
    },

    #[error("Member '{member}' of {model} has an empty explicit key")]
    EmptyKey {
        model: &'static str,
        member: &'static str,
    },

    #[error("Composite member '{member}' of {model} cannot carry an entry annotation")]
    EntryOnComposite {
        model: &'static str,
        member: &'static str,
    },

    #[error("{model} nests composites deeper than {limit} levels")]
    TooDeep { model: &'static str, limit: usize },

    #[error(
        "Member '{member}' of {model} resolves to no group; annotate it or set a default group"
    )]
    UnresolvedGroup {
        model: &'static str,
        member: &'static str,
    },
}

impl BindError {
    pub(crate) fn conversion(
        group: &str,
        key: &str,
        target: &'static str,
        value: &str,
        reason: String,
    ) -> Self {
        BindError::Conversion {
            group: group.into(),
            key: key.into(),
            target,
            value: value.into(),
            reason,
        }
    }

    pub(crate) fn default_value(
        group: &str,
        key: &str,
        target: &'static str,
        value: &str,
        reason: String,
    ) -> Self {
        BindError::DefaultValue {
            group: group.into(),
            key: key.into(),
            target,
            value: value.into(),
            reason,
        }
    }
}
