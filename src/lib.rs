//! Map typed Rust structs to and from grouped INI files. Describe the struct
//! once, point it at a file, and go.
//!
//! Inibind reads `[section]` / `key = value` text into a [`Store`], walks a
//! model's [`Schema`] to assign every member from it, and walks the same
//! schema in reverse to render a model back to INI lines.
//!
//! ```ignore
//! let mut mapper = Inibind::builder::<AppConfig>().load_path("app.ini")?;
//! let mut config = mapper.decode()?;
//! config.enable = false;
//! mapper.save(&config, None)?;
//! ```
//!
//! # Describing a model
//!
//! A model implements [`Mapped`] by listing its members with plain accessor
//! functions. Nothing is discovered at run time; the list is the schema.
//!
//! ```ignore
//! #[derive(Default)]
//! struct AppConfig {
//!     enable: bool,
//!     authentication: AuthConfig,
//! }
//!
//! impl Mapped for AppConfig {
//!     fn describe(schema: Schema<Self>) -> Schema<Self> {
//!         schema
//!             .field_with("Enable", |c| &c.enable, |c| &mut c.enable,
//!                 Annotations::new().group("General"))
//!             .nested("Authentication", |c| &c.authentication, |c| &mut c.authentication)
//!     }
//! }
//!
//! #[derive(Default)]
//! struct AuthConfig {
//!     username: String,
//!     remember: bool,
//! }
//!
//! impl Mapped for AuthConfig {
//!     fn describe(schema: Schema<Self>) -> Schema<Self> {
//!         schema
//!             .group("Authentication")
//!             .field("Username", |a| &a.username, |a| &mut a.username)
//!             .field("Remember", |a| &a.remember, |a| &mut a.remember)
//!     }
//! }
//! ```
//!
//! maps this file in both directions:
//!
//! ```text
//! [General]
//! Enable = true
//! [Authentication]
//! Username = alice
//! Remember = false
//! ```
//!
//! # Where a member lives
//!
//! The key is the declared member name unless an [`Entry`] annotation names
//! one. The group comes from the first of:
//!
//! ```text
//! Entry annotation        Entry::new().group("G")
//!        ↓ else
//! Member group            Annotations::new().group("G")
//!        ↓ else
//! Frame group             composite member's group, else the type's
//!                         Schema::group, else the parent frame's group
//!                         (the mapper's default group at the root)
//! ```
//!
//! Composite members never become sections of their own. Their leaf members
//! are flattened into whatever group their frame resolves to.
//!
//! # Conversions
//!
//! `String`, `i32`, `i64`, `f32`, and `bool` are built in, and every
//! [`Converters`] starts with converters for the other primitives (`f64`,
//! `u8` through `u128`, `i8`, `i16`, `i128`, `usize`, `isize`, `char`).
//! Booleans are literal: only `true` (exactly, see [`TRUE_TOKEN`]) decodes to
//! `true`. Any other member type needs a converter registered on the builder
//! or the mapper; members without one are left untouched by decoding and
//! omitted by encoding.
//!
//! Values are taken as written: quotes and backslashes are kept, surrounding
//! whitespace is trimmed. A value, key, or group containing a line break
//! cannot be written as INI and fails with [`BindError::LineBreak`].
//!
//! Absent keys fall back to the member's explicit default, or else to the
//! value the member already holds. A malformed numeric default is reported
//! as [`BindError::DefaultValue`] rather than silently becoming zero.
//!
//! # Core library, no CLI framework required
//!
//! Everything above works through [`Mapper`] and [`ConfigAction`]. For
//! [clap](https://docs.rs/clap) users, the `cli` module (behind the `clap`
//! Cargo feature, on by default) provides [`ConfigArgs`], a drop-in
//! `config list|lines|get|set|unset` subcommand group.
//!
//! # Logging
//!
//! Inibind logs through [`tracing`](https://docs.rs/tracing) and installs no
//! subscriber. Passes log at `debug`, frames and individual entries at
//! `trace`; key collisions while flattening composites log at `warn`.
//!
//! # Error handling
//!
//! All fallible operations return [`BindError`]. Malformed models surface as
//! [`SchemaError`] when the mapper is built, before any file is read into
//! them.

pub mod error;
pub mod schema;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod convert;
mod decode;
mod encode;
mod merge;
mod ops;
mod persist;
mod resolve;
mod store;

#[cfg(test)]
mod fixtures;

pub use builder::{Inibind, Mapper, MapperBuilder};
#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSubcommand};
pub use convert::{Converters, TRUE_TOKEN};
pub use error::{BindError, SchemaError};
pub use ops::ConfigResult;
pub use schema::{Annotations, Entry, MAX_NESTING_DEPTH, Mapped, Schema, schema_of};
pub use store::Store;
pub use types::{ConfigAction, EntryInfo, GENERAL, Section, Table, Value};
