//! String conversion for mapped members.
//!
//! Built-in scalars (`String`, `i32`, `i64`, `f32`, `bool`) are handled by the
//! engine directly. The remaining primitives (`f64`, the other integer
//! widths, `char`) come pre-registered in every [`Converters`]. Any other
//! member type needs a converter registered by the caller; members whose type
//! has none are left untouched on decode and omitted on encode.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The only raw value that decodes to `true`. Comparison is case-sensitive.
pub const TRUE_TOKEN: &str = "true";

type DecodeFn = Box<dyn Fn(&str) -> Result<Box<dyn Any>, String> + Send + Sync>;
type EncodeFn = Box<dyn Fn(&dyn Any) -> Option<String> + Send + Sync>;

struct Converter {
    type_name: &'static str,
    decode: DecodeFn,
    encode: EncodeFn,
    assign: fn(Box<dyn Any>, &mut dyn Any) -> bool,
}

/// Registry of `string <-> value` converters keyed by member type.
pub struct Converters {
    by_type: HashMap<TypeId, Converter>,
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.by_type.values().map(|c| c.type_name).collect();
        names.sort_unstable();
        f.debug_struct("Converters").field("types", &names).finish()
    }
}

impl Default for Converters {
    fn default() -> Self {
        let mut converters = Self {
            by_type: HashMap::new(),
        };
        converters.register_primitive::<f64>();
        converters.register_primitive::<i8>();
        converters.register_primitive::<i16>();
        converters.register_primitive::<i128>();
        converters.register_primitive::<isize>();
        converters.register_primitive::<u8>();
        converters.register_primitive::<u16>();
        converters.register_primitive::<u32>();
        converters.register_primitive::<u64>();
        converters.register_primitive::<u128>();
        converters.register_primitive::<usize>();
        converters.register(|raw: &str| raw.parse::<char>());
        converters
    }
}

impl Converters {
    /// A registry holding the primitive converters.
    pub fn new() -> Self {
        Self::default()
    }

    fn register_primitive<T>(&mut self)
    where
        T: Any + FromStr + fmt::Display,
        T::Err: fmt::Display,
    {
        self.register(parse_number::<T>);
    }

    /// Register a decoder for `T`. Encoding uses `T`'s `Display`.
    ///
    /// Registering a type twice replaces the earlier converter.
    pub fn register<T, E, F>(&mut self, decode: F)
    where
        T: Any + fmt::Display,
        E: fmt::Display,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.register_with(decode, |value: &T| value.to_string());
    }

    /// Register a decoder and an explicit encoder for `T`.
    pub fn register_with<T, E, D, S>(&mut self, decode: D, encode: S)
    where
        T: Any,
        E: fmt::Display,
        D: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        S: Fn(&T) -> String + Send + Sync + 'static,
    {
        let converter = Converter {
            type_name: type_name::<T>(),
            decode: Box::new(move |raw: &str| {
                decode(raw)
                    .map(|value| Box::new(value) as Box<dyn Any>)
                    .map_err(|e| e.to_string())
            }),
            encode: Box::new(move |value: &dyn Any| value.downcast_ref::<T>().map(&encode)),
            assign: assign::<T>,
        };
        self.by_type.insert(TypeId::of::<T>(), converter);
    }

    pub fn has<T: Any>(&self) -> bool {
        self.contains(TypeId::of::<T>())
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.by_type.contains_key(&type_id)
    }

    /// Decode `raw` as `T`. `None` when no converter is registered for `T`.
    pub fn decode<T: Any>(&self, raw: &str) -> Option<Result<T, String>> {
        let converter = self.by_type.get(&TypeId::of::<T>())?;
        Some((converter.decode)(raw).and_then(|boxed| {
            boxed
                .downcast::<T>()
                .map(|value| *value)
                .map_err(|_| format!("converter did not produce a {}", type_name::<T>()))
        }))
    }

    /// Decode `raw` and store it into `slot`, whose concrete type is `type_id`.
    pub(crate) fn decode_into(
        &self,
        type_id: TypeId,
        raw: &str,
        slot: &mut dyn Any,
    ) -> Option<Result<(), String>> {
        let converter = self.by_type.get(&type_id)?;
        Some((converter.decode)(raw).and_then(|value| {
            if (converter.assign)(value, slot) {
                Ok(())
            } else {
                Err(format!("converter did not produce a {}", converter.type_name))
            }
        }))
    }

    /// Encode a live member value. `None` when no converter is registered.
    pub(crate) fn encode(&self, type_id: TypeId, value: &dyn Any) -> Option<String> {
        let converter = self.by_type.get(&type_id)?;
        (converter.encode)(value)
    }
}

fn assign<T: Any>(value: Box<dyn Any>, slot: &mut dyn Any) -> bool {
    match (value.downcast::<T>(), slot.downcast_mut::<T>()) {
        (Ok(value), Some(slot)) => {
            *slot = *value;
            true
        }
        _ => false,
    }
}

/// Parse a numeric raw value, surrounding whitespace ignored.
pub(crate) fn parse_number<T>(raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| e.to_string())
}

/// Literal, case-sensitive boolean decoding.
pub(crate) fn parse_bool(raw: &str) -> bool {
    raw == TRUE_TOKEN
}
