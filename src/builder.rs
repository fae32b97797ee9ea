//! Mapper construction and the passes it drives.
//!
//! [`Inibind::builder`] collects the default group and converters, and the
//! terminal `load_*` methods validate the model's schema before any store is
//! mapped. [`Mapper`] then runs decode and encode passes and handles config
//! actions against its store.

use std::any::Any;
use std::fmt;
use std::io::Read;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::convert::Converters;
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::BindError;
use crate::ops::{self, ConfigResult};
use crate::persist;
use crate::schema::{self, Mapped};
use crate::store::Store;
use crate::types::{ConfigAction, EntryInfo, Table, ensure_single_line};

/// Entry point for building a mapper.
pub struct Inibind;

impl Inibind {
    pub fn builder<M: Mapped>() -> MapperBuilder<M> {
        MapperBuilder::new()
    }
}

/// Builder for a [`Mapper`] over model type `M`.
///
/// Setters configure how members resolve and convert; the terminal methods
/// ([`load_str`](Self::load_str), [`load_reader`](Self::load_reader),
/// [`load_path`](Self::load_path), [`from_store`](Self::from_store)) supply
/// the store and validate `M`'s schema.
pub struct MapperBuilder<M: Mapped> {
    default_group: Option<String>,
    converters: Converters,
    _phantom: PhantomData<fn() -> M>,
}

impl<M: Mapped> MapperBuilder<M> {
    fn new() -> Self {
        Self {
            default_group: None,
            converters: Converters::new(),
            _phantom: PhantomData,
        }
    }

    /// Group for members that resolve no group of their own. Use
    /// [`GENERAL`](crate::GENERAL) for keys above the first section header.
    pub fn default_group(mut self, group: &str) -> Self {
        self.default_group = Some(group.to_string());
        self
    }

    /// Register a converter for a custom member type. Encoding uses `Display`.
    pub fn converter<T, E, F>(mut self, decode: F) -> Self
    where
        T: Any + fmt::Display,
        E: fmt::Display,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.converters.register(decode);
        self
    }

    /// Register a converter with an explicit encoder.
    pub fn converter_with<T, E, D, S>(mut self, decode: D, encode: S) -> Self
    where
        T: Any,
        E: fmt::Display,
        D: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        S: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.converters.register_with(decode, encode);
        self
    }

    pub fn load_str(self, text: &str) -> Result<Mapper<M>, BindError> {
        let store = Store::parse(text)?;
        self.build(store, None)
    }

    pub fn load_reader<R: Read>(self, reader: R) -> Result<Mapper<M>, BindError> {
        let store = Store::from_reader(reader)?;
        self.build(store, None)
    }

    /// Load from a file. The path becomes the mapper's save location.
    pub fn load_path(self, path: impl AsRef<Path>) -> Result<Mapper<M>, BindError> {
        let path = path.as_ref();
        let store = Store::load(path)?;
        self.build(store, Some(path.to_path_buf()))
    }

    pub fn from_store(self, store: Store) -> Result<Mapper<M>, BindError> {
        self.build(store, None)
    }

    fn build(self, store: Store, location: Option<PathBuf>) -> Result<Mapper<M>, BindError> {
        schema::validate::<M>()?;
        debug!(
            model = std::any::type_name::<M>(),
            converters = ?self.converters,
            location = ?location,
            "mapper built"
        );
        Ok(Mapper {
            store,
            converters: self.converters,
            default_group: self.default_group,
            entries: Table::new(),
            location,
            _phantom: PhantomData,
        })
    }
}

/// Maps model type `M` to and from a [`Store`].
///
/// Decoding takes `&mut self` because each pass rewrites the
/// [`entries`](Self::entries) log.
pub struct Mapper<M: Mapped> {
    store: Store,
    converters: Converters,
    default_group: Option<String>,
    entries: Table<EntryInfo>,
    location: Option<PathBuf>,
    _phantom: PhantomData<fn() -> M>,
}

impl<M: Mapped> fmt::Debug for Mapper<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("model", &std::any::type_name::<M>())
            .field("default_group", &self.default_group)
            .field("converters", &self.converters)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl<M: Mapped> Mapper<M> {
    /// Decode a fresh `M::default()` using the builder's default group.
    pub fn decode(&mut self) -> Result<M, BindError> {
        let mut model = M::default();
        let group = self.default_group.clone();
        self.run_decode(&mut model, group.as_deref())?;
        Ok(model)
    }

    /// Decode a fresh `M::default()` with `group` as the default group.
    pub fn decode_with_group(&mut self, group: &str) -> Result<M, BindError> {
        let mut model = M::default();
        self.run_decode(&mut model, Some(group))?;
        Ok(model)
    }

    /// Decode into an existing instance. Its current values are the
    /// fallbacks for absent keys.
    ///
    /// On error the instance may be partially updated.
    pub fn decode_into(&mut self, target: &mut M) -> Result<(), BindError> {
        let group = self.default_group.clone();
        self.run_decode(target, group.as_deref())
    }

    fn run_decode(&mut self, target: &mut M, group: Option<&str>) -> Result<(), BindError> {
        debug!(model = std::any::type_name::<M>(), default_group = ?group, "decode pass");
        self.entries = Table::new();
        Decoder::new(&self.store, &self.converters, &mut self.entries)
            .decode_frame(target, None, group)
    }

    /// Encode the live values of `model` into an ordered group/key table.
    pub fn encode_to_table(&self, model: &M) -> Result<Table, BindError> {
        debug!(model = std::any::type_name::<M>(), "encode pass");
        Encoder::new(&self.converters).encode_frame(model, None, self.default_group.as_deref())
    }

    /// Encode `model` as INI text lines.
    pub fn encode_to_lines(&self, model: &M) -> Result<Vec<String>, BindError> {
        Ok(self.encode_to_table(model)?.to_lines())
    }

    /// Register a converter after the mapper is built. Takes effect on the
    /// next pass.
    pub fn register_converter<T, E, F>(&mut self, decode: F)
    where
        T: Any + fmt::Display,
        E: fmt::Display,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.converters.register(decode);
    }

    pub fn converters(&self) -> &Converters {
        &self.converters
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Member bookkeeping of the last decode pass, keyed by resolved
    /// group and key.
    pub fn entries(&self) -> &Table<EntryInfo> {
        &self.entries
    }

    /// The file this mapper was loaded from, if any.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Write `model` as INI text to `path`, or to [`location`](Self::location)
    /// when `path` is `None`. Returns the path written.
    pub fn save(&self, model: &M, path: Option<&Path>) -> Result<PathBuf, BindError> {
        let target = path
            .or(self.location.as_deref())
            .ok_or(BindError::NoLocation)?
            .to_path_buf();
        let lines = self.encode_to_lines(model)?;
        persist::write_lines(&target, &lines)?;
        Ok(target)
    }

    /// Handle a `ConfigAction` and print the result to stdout.
    pub fn handle_and_print(&mut self, action: &ConfigAction) -> Result<(), BindError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }

    /// Handle a `ConfigAction` (list / lines / get / set / unset).
    ///
    /// `Set` and `Unset` edit the store and, when the mapper has a location,
    /// write the store back to it.
    pub fn handle(&mut self, action: &ConfigAction) -> Result<ConfigResult, BindError> {
        match action {
            ConfigAction::List => {
                let model = self.decode()?;
                Ok(ops::list_values(&self.encode_to_table(&model)?))
            }
            ConfigAction::Lines => {
                let model = self.decode()?;
                Ok(ConfigResult::Lines(self.encode_to_lines(&model)?))
            }
            ConfigAction::Get { group, key } => {
                let model = self.decode()?;
                let encoded = self.encode_to_table(&model)?;
                ops::get_value(&encoded, &self.store, group, key)
            }
            ConfigAction::Set { group, key, value } => {
                ensure_single_line(group, key, value)?;
                self.store.set(group, key, value);
                self.persist_store()?;
                Ok(ConfigResult::ValueSet {
                    group: group.clone(),
                    key: key.clone(),
                    value: value.clone(),
                })
            }
            ConfigAction::Unset { group, key } => {
                self.store.remove(group, key);
                self.persist_store()?;
                Ok(ConfigResult::ValueUnset {
                    group: group.clone(),
                    key: key.clone(),
                })
            }
        }
    }

    fn persist_store(&self) -> Result<(), BindError> {
        match &self.location {
            Some(path) => {
                self.store.table().ensure_single_lines()?;
                persist::write_lines(path, &self.store.to_lines())
            }
            None => Ok(()),
        }
    }
}
