//! Model to table: the mirror image of [`decode`](crate::decode).
//!
//! Frames resolve groups exactly as decoding does, so a value read from
//! `[G] K` is written back to `[G] K`. Scalars are taken from the live model,
//! never re-read from the store. Composite members produce their own table
//! which is merged into the parent's.

use std::any::{Any, TypeId, type_name};

use tracing::{debug, trace};

use crate::convert::Converters;
use crate::error::BindError;
use crate::merge::merge_tables;
use crate::resolve::{frame_group, resolve_member};
use crate::schema::{Mapped, MemberKind, schema_of};
use crate::types::{Table, Value, ensure_single_line};

pub(crate) struct Encoder<'a> {
    converters: &'a Converters,
}

impl<'a> Encoder<'a> {
    pub(crate) fn new(converters: &'a Converters) -> Self {
        Self { converters }
    }

    pub(crate) fn encode_frame<N: Mapped>(
        &self,
        source: &N,
        member_group: Option<&str>,
        inherited: Option<&str>,
    ) -> Result<Table, BindError> {
        let schema = schema_of::<N>();
        let model = type_name::<N>();
        let frame = frame_group(member_group, schema.type_group(), inherited);
        trace!(model, group = ?frame, "encoding frame");

        let mut table = Table::new();
        for member in schema.members() {
            if member.annotations.is_ignored() {
                continue;
            }
            match &member.kind {
                MemberKind::Scalar(access) => {
                    let at = resolve_member(model, member.name, &member.annotations, frame)?;
                    let value = access.value(source);
                    match self.scalar_value(value, access.value_type()) {
                        Some(value) => {
                            ensure_single_line(at.group, at.key, &value.to_string())?;
                            trace!(group = at.group, key = at.key, "encoded entry");
                            table.insert(at.group, at.key, value);
                        }
                        None => debug!(
                            group = at.group,
                            key = at.key,
                            value_type = access.value_type_name(),
                            "no converter registered, omitting member"
                        ),
                    }
                }
                MemberKind::Nested(access) => {
                    let nested = access.encode(source, self, member.annotations.group, frame)?;
                    table = merge_tables(table, nested);
                }
            }
        }
        Ok(table)
    }

    fn scalar_value(&self, value: &dyn Any, type_id: TypeId) -> Option<Value> {
        if let Some(text) = value.downcast_ref::<String>() {
            return Some(Value::Text(text.clone()));
        }
        if let Some(n) = value.downcast_ref::<i32>() {
            return Some(Value::Int(*n));
        }
        if let Some(n) = value.downcast_ref::<i64>() {
            return Some(Value::Long(*n));
        }
        if let Some(n) = value.downcast_ref::<f32>() {
            return Some(Value::Float(*n));
        }
        if let Some(flag) = value.downcast_ref::<bool>() {
            return Some(Value::Bool(*flag));
        }
        self.converters.encode(type_id, value).map(Value::Text)
    }
}
