//! Models for the inibind demo application.
//!
//! [`DemoConfig`] puts one flag in `[General]` through a member-level group
//! and flattens [`AuthConfig`] into `[Authentication]` through its type-level
//! group. [`ServerConfig`] adds numeric members, explicit defaults, and a
//! custom [`Level`] type that only maps once a converter is registered.
//!
//! | Member                          | INI location                   |
//! |---------------------------------|--------------------------------|
//! | `enable`                        | `[General] Enable`             |
//! | `authentication.username`       | `[Authentication] Username`    |
//! | `authentication.token`          | `[Authentication] Token`       |
//! | `authentication.remember`       | `[Authentication] Remember`    |
//! | `server.host`                   | `[Server] Host`                |
//! | `server.port`                   | `[Server] Port`                |
//! | `server.timeout_ms`             | `[Server] TimeoutMs`           |
//! | `server.ratio`                  | `[Server] Ratio`               |
//! | `server.log_level`              | `[Logging] level`              |

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use inibind::{Annotations, Entry, Mapped, Schema};

#[derive(Serialize, Debug, Default)]
pub struct DemoConfig {
    pub enable: bool,
    pub authentication: AuthConfig,
    pub server: ServerConfig,
}

impl Mapped for DemoConfig {
    fn describe(schema: Schema<Self>) -> Schema<Self> {
        schema
            .field_with(
                "Enable",
                |c| &c.enable,
                |c| &mut c.enable,
                Annotations::new().group("General"),
            )
            .nested("Authentication", |c| &c.authentication, |c| &mut c.authentication)
            .nested("Server", |c| &c.server, |c| &mut c.server)
    }
}

#[derive(Serialize, Debug, Default)]
pub struct AuthConfig {
    pub username: String,
    pub token: String,
    pub remember: bool,
}

impl Mapped for AuthConfig {
    fn describe(schema: Schema<Self>) -> Schema<Self> {
        schema
            .group("Authentication")
            .field("Username", |a| &a.username, |a| &mut a.username)
            .field("Token", |a| &a.token, |a| &mut a.token)
            .field("Remember", |a| &a.remember, |a| &mut a.remember)
    }
}

#[derive(Serialize, Debug, Default)]
pub struct ServerConfig {
    pub host: String,
    pub port: i32,
    pub timeout_ms: i64,
    pub ratio: f32,
    pub log_level: Level,
}

impl Mapped for ServerConfig {
    fn describe(schema: Schema<Self>) -> Schema<Self> {
        schema
            .group("Server")
            .field_with(
                "Host",
                |s| &s.host,
                |s| &mut s.host,
                Annotations::new().entry(Entry::new().default_value("127.0.0.1")),
            )
            .field_with(
                "Port",
                |s| &s.port,
                |s| &mut s.port,
                Annotations::new().entry(Entry::new().default_value("3000")),
            )
            .field("TimeoutMs", |s| &s.timeout_ms, |s| &mut s.timeout_ms)
            .field("Ratio", |s| &s.ratio, |s| &mut s.ratio)
            .field_with(
                "LogLevel",
                |s| &s.log_level,
                |s| &mut s.log_level,
                Annotations::new().entry(Entry::new().group("Logging").key("level")),
            )
    }
}

/// A custom member type, mapped through a registered converter.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
        };
        f.write_str(name)
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "error" => Ok(Level::Error),
            "warn" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            other => Err(format!("unknown level '{other}'")),
        }
    }
}
