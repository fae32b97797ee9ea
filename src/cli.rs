//! Clap adapter for inibind.
//!
//! Compiled only with the `clap` Cargo feature (on by default). Embed
//! [`ConfigArgs`] in a clap `#[derive(Parser)]` struct to get
//! `config list|lines|get|set|unset` subcommands, then hand the result of
//! [`ConfigArgs::into_action()`] to [`Mapper::handle()`](crate::Mapper::handle).
//!
//! Keys are written qualified, `Group.Key`, the same form `config list`
//! prints. A key without a dot lives in the unnamed general group.

use clap::{Args, Subcommand};

use crate::ops::split_qualified;
use crate::types::ConfigAction;

/// Clap-derived args for the `config` subcommand group.
///
/// ```ignore
/// #[derive(Subcommand)]
/// enum Commands {
///     Config(ConfigArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show every mapped entry as `Group.Key = value`.
    List,
    /// Print the mapped model as INI lines.
    Lines,
    /// Show the effective value of a key.
    Get {
        /// Qualified key (e.g. "Server.Port").
        key: String,
    },
    /// Set a value in the file.
    Set {
        /// Qualified key (e.g. "Server.Port").
        key: String,
        /// Value to set.
        value: String,
    },
    /// Remove a value from the file.
    Unset {
        /// Qualified key (e.g. "Server.Port").
        key: String,
    },
}

impl ConfigArgs {
    /// Convert clap-parsed args into a framework-agnostic `ConfigAction`.
    ///
    /// Bare `config` (no subcommand) and explicit `config list` both map to
    /// `ConfigAction::List`.
    pub fn into_action(self) -> ConfigAction {
        match self.action {
            None | Some(ConfigSubcommand::List) => ConfigAction::List,
            Some(ConfigSubcommand::Lines) => ConfigAction::Lines,
            Some(ConfigSubcommand::Get { key }) => {
                let (group, key) = split_qualified(&key);
                ConfigAction::Get { group, key }
            }
            Some(ConfigSubcommand::Set { key, value }) => {
                let (group, key) = split_qualified(&key);
                ConfigAction::Set { group, key, value }
            }
            Some(ConfigSubcommand::Unset { key }) => {
                let (group, key) = split_qualified(&key);
                ConfigAction::Unset { group, key }
            }
        }
    }
}
