//! Store to model: walk a schema and assign each member from the store.
//!
//! Each frame (the root model or one composite member) resolves its group
//! once, then visits members in declaration order. Scalars are read with
//! fallback; composites recurse with the frame group as their inherited
//! group, so their leaf keys flatten into the parent's namespace unless they
//! carry a group of their own.

use std::any::type_name;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::convert::{self, Converters};
use crate::error::BindError;
use crate::resolve::{Resolved, frame_group, resolve_member};
use crate::schema::{Mapped, MemberKind, ScalarAccess, schema_of};
use crate::store::Store;
use crate::types::{EntryInfo, Table};

pub(crate) struct Decoder<'a> {
    store: &'a Store,
    converters: &'a Converters,
    entries: &'a mut Table<EntryInfo>,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(
        store: &'a Store,
        converters: &'a Converters,
        entries: &'a mut Table<EntryInfo>,
    ) -> Self {
        Self {
            store,
            converters,
            entries,
        }
    }

    pub(crate) fn decode_frame<N: Mapped>(
        &mut self,
        target: &mut N,
        member_group: Option<&str>,
        inherited: Option<&str>,
    ) -> Result<(), BindError> {
        let schema = schema_of::<N>();
        let model = type_name::<N>();
        let frame = frame_group(member_group, schema.type_group(), inherited);
        trace!(model, group = ?frame, "decoding frame");

        for member in schema.members() {
            if member.annotations.is_ignored() {
                continue;
            }
            match &member.kind {
                MemberKind::Scalar(access) => {
                    let at = resolve_member(model, member.name, &member.annotations, frame)?;
                    if self.decode_scalar(access.as_ref(), target, &at)? {
                        trace!(group = at.group, key = at.key, "bound entry");
                        self.entries.insert(
                            at.group,
                            at.key,
                            EntryInfo {
                                value_type: access.value_type_name(),
                                type_id: access.value_type(),
                                owner: model,
                                member: member.name,
                            },
                        );
                    }
                }
                MemberKind::Nested(access) => {
                    access.decode(target, self, member.annotations.group, frame)?;
                }
            }
        }
        Ok(())
    }

    /// Assign one scalar. Returns `false` when the member's type has no
    /// converter and was left as it was.
    fn decode_scalar<N>(
        &self,
        access: &dyn ScalarAccess<N>,
        target: &mut N,
        at: &Resolved<'_>,
    ) -> Result<bool, BindError> {
        let raw = self.store.get(at.group, at.key);
        let slot = access.value_mut(target);

        if let Some(text) = slot.downcast_mut::<String>() {
            if let Some(value) = raw.or(at.default) {
                *text = value.to_string();
            }
            return Ok(true);
        }
        if let Some(n) = slot.downcast_mut::<i32>() {
            *n = self.read_number(at, raw, *n)?;
            return Ok(true);
        }
        if let Some(n) = slot.downcast_mut::<i64>() {
            *n = self.read_number(at, raw, *n)?;
            return Ok(true);
        }
        if let Some(n) = slot.downcast_mut::<f32>() {
            *n = self.read_number(at, raw, *n)?;
            return Ok(true);
        }
        if let Some(flag) = slot.downcast_mut::<bool>() {
            if let Some(value) = raw.or(at.default) {
                *flag = convert::parse_bool(value);
            }
            return Ok(true);
        }

        let type_id = access.value_type();
        if !self.converters.contains(type_id) {
            debug!(
                group = at.group,
                key = at.key,
                value_type = access.value_type_name(),
                "no converter registered, leaving member unchanged"
            );
            return Ok(false);
        }
        let (value, from_default) = match (raw, at.default) {
            (Some(value), _) => (value, false),
            (None, Some(default)) => (default, true),
            (None, None) => return Ok(true),
        };
        let target = access.value_type_name();
        match self.converters.decode_into(type_id, value, slot) {
            Some(Ok(())) => Ok(true),
            Some(Err(reason)) if from_default => {
                Err(BindError::default_value(at.group, at.key, target, value, reason))
            }
            Some(Err(reason)) => {
                Err(BindError::conversion(at.group, at.key, target, value, reason))
            }
            None => Ok(false),
        }
    }

    /// Numeric read with fallback. An explicit default is parsed even when
    /// the key is present, so a bad default fails on every pass.
    fn read_number<T>(
        &self,
        at: &Resolved<'_>,
        raw: Option<&str>,
        current: T,
    ) -> Result<T, BindError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let fallback = match at.default {
            Some(default) => convert::parse_number::<T>(default).map_err(|reason| {
                BindError::default_value(at.group, at.key, type_name::<T>(), default, reason)
            })?,
            None => current,
        };
        match raw {
            Some(value) => convert::parse_number::<T>(value).map_err(|reason| {
                BindError::conversion(at.group, at.key, type_name::<T>(), value, reason)
            }),
            None => Ok(fallback),
        }
    }
}
