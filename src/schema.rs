//! Describing data models: which members map, under which annotations.
//!
//! A model implements [`Mapped`] by extending the empty [`Schema`] it is
//! handed with its members and their plain accessor functions. The schema is
//! the only source of truth for both directions; decoding and encoding walk
//! the same list in the same order.
//!
//! ```ignore
//! #[derive(Default)]
//! struct Config {
//!     enable: bool,
//!     auth: AuthConfig,
//! }
//!
//! impl Mapped for Config {
//!     fn describe(schema: Schema<Self>) -> Schema<Self> {
//!         schema
//!             .field_with(
//!                 "Enable",
//!                 |c| &c.enable,
//!                 |c| &mut c.enable,
//!                 Annotations::new().group("General"),
//!             )
//!             .nested("Authentication", |c| &c.auth, |c| &mut c.auth)
//!     }
//! }
//! ```
//!
//! Annotations mirror the three precedence levels used by the resolver:
//!
//! - [`Entry`] — explicit group, key, and default for one member (highest).
//! - [`Annotations::group`] — a group-only annotation on the member.
//! - [`Schema::group`] — a type-level group inherited by every member of the
//!   type and by nested composites that don't declare their own (lowest,
//!   together with the group passed down from the parent).

use std::any::{Any, TypeId, type_name};
use std::collections::HashSet;

use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::{BindError, SchemaError};
use crate::types::Table;

/// Maximum nesting depth of composite members accepted at registration.
pub const MAX_NESTING_DEPTH: usize = 32;

/// A data model that can be decoded from and encoded to grouped key/value
/// entries.
///
/// `Default` provides the empty value the engine instantiates for the root
/// and for absent optional composites.
pub trait Mapped: Default + 'static {
    /// Add this model's members (and type-level group, if any) to `schema`.
    fn describe(schema: Schema<Self>) -> Schema<Self>;
}

/// The full schema of `M`.
pub fn schema_of<M: Mapped>() -> Schema<M> {
    M::describe(Schema::new())
}

/// Explicit entry annotation: group, key, and default for one member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Entry {
    pub(crate) group: Option<&'static str>,
    pub(crate) key: Option<&'static str>,
    pub(crate) default: Option<&'static str>,
}

impl Entry {
    pub const fn new() -> Self {
        Self {
            group: None,
            key: None,
            default: None,
        }
    }

    pub const fn group(mut self, group: &'static str) -> Self {
        self.group = Some(group);
        self
    }

    pub const fn key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    /// Fallback used when the key is absent, written as it would appear in
    /// the file. Numeric defaults must parse; a malformed one fails decoding.
    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }
}

/// Per-member metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Annotations {
    pub(crate) entry: Option<Entry>,
    pub(crate) group: Option<&'static str>,
    pub(crate) ignored: bool,
}

impl Annotations {
    pub const fn new() -> Self {
        Self {
            entry: None,
            group: None,
            ignored: false,
        }
    }

    pub const fn entry(mut self, entry: Entry) -> Self {
        self.entry = Some(entry);
        self
    }

    /// Group-only annotation. On a composite member it becomes the group of
    /// every member below it that isn't annotated more specifically.
    pub const fn group(mut self, group: &'static str) -> Self {
        self.group = Some(group);
        self
    }

    /// Exclude the member from decoding and encoding.
    pub const fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }
}

/// The member list of a model type, plus its type-level group.
pub struct Schema<M> {
    group: Option<&'static str>,
    members: Vec<Member<M>>,
}

pub(crate) struct Member<M> {
    pub(crate) name: &'static str,
    pub(crate) annotations: Annotations,
    pub(crate) kind: MemberKind<M>,
}

pub(crate) enum MemberKind<M> {
    Scalar(Box<dyn ScalarAccess<M>>),
    Nested(Box<dyn NestedAccess<M>>),
}

impl<M: Mapped> Schema<M> {
    fn new() -> Self {
        Self {
            group: None,
            members: Vec::new(),
        }
    }

    /// Type-level group annotation.
    pub fn group(mut self, group: &'static str) -> Self {
        self.group = Some(group);
        self
    }

    /// A scalar member with no annotations: keyed by `name`, grouped by the
    /// enclosing group, defaulting to its current value.
    pub fn field<T: Any>(
        self,
        name: &'static str,
        get: fn(&M) -> &T,
        get_mut: fn(&mut M) -> &mut T,
    ) -> Self {
        self.field_with(name, get, get_mut, Annotations::new())
    }

    pub fn field_with<T: Any>(
        mut self,
        name: &'static str,
        get: fn(&M) -> &T,
        get_mut: fn(&mut M) -> &mut T,
        annotations: Annotations,
    ) -> Self {
        self.members.push(Member {
            name,
            annotations,
            kind: MemberKind::Scalar(Box::new(FieldAccess { get, get_mut })),
        });
        self
    }

    /// A composite member whose leaf entries are flattened into the enclosing
    /// group namespace.
    pub fn nested<N: Mapped>(
        self,
        name: &'static str,
        get: fn(&M) -> &N,
        get_mut: fn(&mut M) -> &mut N,
    ) -> Self {
        self.nested_with(name, get, get_mut, Annotations::new())
    }

    pub fn nested_with<N: Mapped>(
        mut self,
        name: &'static str,
        get: fn(&M) -> &N,
        get_mut: fn(&mut M) -> &mut N,
        annotations: Annotations,
    ) -> Self {
        self.members.push(Member {
            name,
            annotations,
            kind: MemberKind::Nested(Box::new(NestedAccessor { get, get_mut })),
        });
        self
    }

    /// A composite held as `Option<N>`. An absent value is replaced by
    /// `N::default()` when decoding and encoded as `N::default()`.
    pub fn nested_opt<N: Mapped>(
        self,
        name: &'static str,
        get: fn(&M) -> &Option<N>,
        get_mut: fn(&mut M) -> &mut Option<N>,
    ) -> Self {
        self.nested_opt_with(name, get, get_mut, Annotations::new())
    }

    pub fn nested_opt_with<N: Mapped>(
        mut self,
        name: &'static str,
        get: fn(&M) -> &Option<N>,
        get_mut: fn(&mut M) -> &mut Option<N>,
        annotations: Annotations,
    ) -> Self {
        self.members.push(Member {
            name,
            annotations,
            kind: MemberKind::Nested(Box::new(OptionalAccessor { get, get_mut })),
        });
        self
    }

    pub fn type_group(&self) -> Option<&'static str> {
        self.group
    }

    /// Declared member names, in declaration order.
    pub fn member_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.iter().map(|m| m.name)
    }

    pub(crate) fn members(&self) -> &[Member<M>] {
        &self.members
    }
}

// --- Type-erased member access ---

pub(crate) trait ScalarAccess<M> {
    fn value<'a>(&self, model: &'a M) -> &'a dyn Any;
    fn value_mut<'a>(&self, model: &'a mut M) -> &'a mut dyn Any;
    fn value_type(&self) -> TypeId;
    fn value_type_name(&self) -> &'static str;
}

struct FieldAccess<M, T> {
    get: fn(&M) -> &T,
    get_mut: fn(&mut M) -> &mut T,
}

impl<M: 'static, T: Any> ScalarAccess<M> for FieldAccess<M, T> {
    fn value<'a>(&self, model: &'a M) -> &'a dyn Any {
        (self.get)(model)
    }

    fn value_mut<'a>(&self, model: &'a mut M) -> &'a mut dyn Any {
        (self.get_mut)(model)
    }

    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Recursion hooks for a composite member. `member_group` is the composite
/// member's own group annotation; `inherited` is the parent frame's group.
pub(crate) trait NestedAccess<M> {
    fn decode(
        &self,
        model: &mut M,
        decoder: &mut Decoder<'_>,
        member_group: Option<&str>,
        inherited: Option<&str>,
    ) -> Result<(), BindError>;

    fn encode(
        &self,
        model: &M,
        encoder: &Encoder<'_>,
        member_group: Option<&str>,
        inherited: Option<&str>,
    ) -> Result<Table, BindError>;

    fn validate(&self, depth: usize) -> Result<(), SchemaError>;
}

struct NestedAccessor<M, N> {
    get: fn(&M) -> &N,
    get_mut: fn(&mut M) -> &mut N,
}

impl<M: 'static, N: Mapped> NestedAccess<M> for NestedAccessor<M, N> {
    fn decode(
        &self,
        model: &mut M,
        decoder: &mut Decoder<'_>,
        member_group: Option<&str>,
        inherited: Option<&str>,
    ) -> Result<(), BindError> {
        decoder.decode_frame((self.get_mut)(model), member_group, inherited)
    }

    fn encode(
        &self,
        model: &M,
        encoder: &Encoder<'_>,
        member_group: Option<&str>,
        inherited: Option<&str>,
    ) -> Result<Table, BindError> {
        encoder.encode_frame((self.get)(model), member_group, inherited)
    }

    fn validate(&self, depth: usize) -> Result<(), SchemaError> {
        validate_at::<N>(depth)
    }
}

struct OptionalAccessor<M, N> {
    get: fn(&M) -> &Option<N>,
    get_mut: fn(&mut M) -> &mut Option<N>,
}

impl<M: 'static, N: Mapped> NestedAccess<M> for OptionalAccessor<M, N> {
    fn decode(
        &self,
        model: &mut M,
        decoder: &mut Decoder<'_>,
        member_group: Option<&str>,
        inherited: Option<&str>,
    ) -> Result<(), BindError> {
        let inner = (self.get_mut)(model).get_or_insert_with(N::default);
        decoder.decode_frame(inner, member_group, inherited)
    }

    fn encode(
        &self,
        model: &M,
        encoder: &Encoder<'_>,
        member_group: Option<&str>,
        inherited: Option<&str>,
    ) -> Result<Table, BindError> {
        match (self.get)(model) {
            Some(inner) => encoder.encode_frame(inner, member_group, inherited),
            None => encoder.encode_frame(&N::default(), member_group, inherited),
        }
    }

    fn validate(&self, depth: usize) -> Result<(), SchemaError> {
        validate_at::<N>(depth)
    }
}

// --- Registration-time validation ---

/// Check a model and every composite below it for structural errors.
pub(crate) fn validate<M: Mapped>() -> Result<(), SchemaError> {
    validate_at::<M>(0)
}

fn validate_at<M: Mapped>(depth: usize) -> Result<(), SchemaError> {
    let model = type_name::<M>();
    if depth > MAX_NESTING_DEPTH {
        return Err(SchemaError::TooDeep {
            model,
            limit: MAX_NESTING_DEPTH,
        });
    }

    let schema = schema_of::<M>();
    let mut seen = HashSet::new();
    for member in schema.members() {
        if member.name.is_empty() {
            return Err(SchemaError::EmptyMemberName { model });
        }
        if !seen.insert(member.name) {
            return Err(SchemaError::DuplicateMember {
                model,
                member: member.name,
            });
        }
        if member.annotations.entry.and_then(|e| e.key) == Some("") {
            return Err(SchemaError::EmptyKey {
                model,
                member: member.name,
            });
        }
        if let MemberKind::Nested(access) = &member.kind {
            if member.annotations.entry.is_some() {
                return Err(SchemaError::EntryOnComposite {
                    model,
                    member: member.name,
                });
            }
            access.validate(depth + 1)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{AppConfig, AuthConfig, Deep32, Deep33, ServerConfig};

    #[test]
    fn member_names_in_declaration_order() {
        let names: Vec<&str> = schema_of::<AuthConfig>().member_names().collect();
        assert_eq!(names, vec!["Username", "Token", "Remember"]);
    }

    #[test]
    fn type_group_recorded() {
        assert_eq!(schema_of::<AuthConfig>().type_group(), Some("Authentication"));
        assert_eq!(schema_of::<AppConfig>().type_group(), None);
    }

    #[test]
    fn entry_builder_sets_all_parts() {
        let entry = Entry::new().group("G").key("k").default_value("1");
        assert_eq!(entry.group, Some("G"));
        assert_eq!(entry.key, Some("k"));
        assert_eq!(entry.default, Some("1"));
    }

    #[test]
    fn valid_models_pass() {
        assert_eq!(validate::<AppConfig>(), Ok(()));
        assert_eq!(validate::<ServerConfig>(), Ok(()));
    }

    #[derive(Default)]
    struct Duplicated {
        a: i32,
        b: i32,
    }

    impl Mapped for Duplicated {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema
                .group("G")
                .field("Value", |d| &d.a, |d| &mut d.a)
                .field("Value", |d| &d.b, |d| &mut d.b)
        }
    }

    #[test]
    fn duplicate_member_rejected() {
        assert!(matches!(
            validate::<Duplicated>(),
            Err(SchemaError::DuplicateMember { member: "Value", .. })
        ));
    }

    #[derive(Default)]
    struct EmptyKey {
        a: i32,
    }

    impl Mapped for EmptyKey {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema.field_with(
                "A",
                |d| &d.a,
                |d| &mut d.a,
                Annotations::new().entry(Entry::new().key("")),
            )
        }
    }

    #[test]
    fn empty_key_rejected() {
        assert!(matches!(
            validate::<EmptyKey>(),
            Err(SchemaError::EmptyKey { member: "A", .. })
        ));
    }

    #[derive(Default)]
    struct EntryOnNested {
        auth: AuthConfig,
    }

    impl Mapped for EntryOnNested {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema.nested_with(
                "Auth",
                |d| &d.auth,
                |d| &mut d.auth,
                Annotations::new().entry(Entry::new().key("auth")),
            )
        }
    }

    #[test]
    fn entry_on_composite_rejected() {
        assert!(matches!(
            validate::<EntryOnNested>(),
            Err(SchemaError::EntryOnComposite { member: "Auth", .. })
        ));
    }

    #[test]
    fn nesting_at_the_limit_passes() {
        assert_eq!(validate::<Deep32>(), Ok(()));
    }

    #[test]
    fn nesting_past_the_limit_rejected() {
        assert!(matches!(
            validate::<Deep33>(),
            Err(SchemaError::TooDeep { limit: MAX_NESTING_DEPTH, .. })
        ));
    }

    #[test]
    fn errors_in_nested_types_surface() {
        #[derive(Default)]
        struct Outer {
            inner: Duplicated,
        }
        impl Mapped for Outer {
            fn describe(schema: Schema<Self>) -> Schema<Self> {
                schema.nested("Inner", |o| &o.inner, |o| &mut o.inner)
            }
        }
        assert!(matches!(
            validate::<Outer>(),
            Err(SchemaError::DuplicateMember { .. })
        ));
    }
}
