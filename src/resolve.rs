//! Group and key resolution for mapped members.
//!
//! Pure functions with no store access, called once per member per pass by
//! both the decoder and the encoder so the two directions always agree on
//! where a member lives.
//!
//! Group precedence for a scalar member, highest first:
//!
//! 1. the group of its explicit [`Entry`](crate::Entry) annotation
//! 2. its group-only annotation
//! 3. the frame group
//!
//! The frame group of a model is its composite member's own group
//! annotation, else the model's type-level group, else the group inherited
//! from the parent frame (the mapper's default group at the root).

use crate::error::SchemaError;
use crate::schema::Annotations;

/// Where one member maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub group: &'a str,
    pub key: &'a str,
    /// Explicit default from the entry annotation. `None` means the member's
    /// current value is the fallback.
    pub default: Option<&'a str>,
}

/// Compute the group every member of a frame inherits.
pub fn frame_group<'a>(
    member_group: Option<&'a str>,
    type_group: Option<&'a str>,
    inherited: Option<&'a str>,
) -> Option<&'a str> {
    member_group.or(type_group).or(inherited)
}

/// Resolve the `(group, key, default)` of one scalar member.
pub fn resolve_member<'a>(
    model: &'static str,
    member: &'static str,
    annotations: &Annotations,
    frame: Option<&'a str>,
) -> Result<Resolved<'a>, SchemaError> {
    let entry = annotations.entry.unwrap_or_default();

    let group = entry
        .group
        .or(annotations.group)
        .or(frame)
        .ok_or(SchemaError::UnresolvedGroup { model, member })?;

    Ok(Resolved {
        group,
        key: entry.key.unwrap_or(member),
        default: entry.default,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Entry;

    #[test]
    fn frame_group_prefers_member_annotation() {
        assert_eq!(frame_group(Some("M"), Some("T"), Some("P")), Some("M"));
        assert_eq!(frame_group(None, Some("T"), Some("P")), Some("T"));
        assert_eq!(frame_group(None, None, Some("P")), Some("P"));
        assert_eq!(frame_group(None, None, None), None);
    }

    #[test]
    fn bare_member_uses_frame_and_declared_name() {
        let resolved =
            resolve_member("Cfg", "Username", &Annotations::new(), Some("Auth")).unwrap();
        assert_eq!(
            resolved,
            Resolved {
                group: "Auth",
                key: "Username",
                default: None,
            }
        );
    }

    #[test]
    fn key_default_preserves_case() {
        let resolved =
            resolve_member("Cfg", "maxConn_Count", &Annotations::new(), Some("G")).unwrap();
        assert_eq!(resolved.key, "maxConn_Count");
    }

    #[test]
    fn group_only_annotation_overrides_frame() {
        let annotations = Annotations::new().group("General");
        let resolved = resolve_member("Cfg", "Enable", &annotations, Some("Auth")).unwrap();
        assert_eq!(resolved.group, "General");
        assert_eq!(resolved.key, "Enable");
    }

    #[test]
    fn entry_group_beats_group_annotation_and_frame() {
        let annotations = Annotations::new()
            .group("FromGroup")
            .entry(Entry::new().group("FromEntry"));
        let resolved = resolve_member("Cfg", "X", &annotations, Some("Frame")).unwrap();
        assert_eq!(resolved.group, "FromEntry");
    }

    #[test]
    fn entry_without_group_falls_through_to_group_annotation() {
        let annotations = Annotations::new()
            .group("FromGroup")
            .entry(Entry::new().key("x"));
        let resolved = resolve_member("Cfg", "X", &annotations, Some("Frame")).unwrap();
        assert_eq!(resolved.group, "FromGroup");
        assert_eq!(resolved.key, "x");
    }

    #[test]
    fn entry_default_is_reported() {
        let annotations = Annotations::new().entry(Entry::new().default_value("8080"));
        let resolved = resolve_member("Cfg", "Port", &annotations, Some("Server")).unwrap();
        assert_eq!(resolved.default, Some("8080"));
    }

    #[test]
    fn no_group_anywhere_is_schema_error() {
        let err = resolve_member("Cfg", "Orphan", &Annotations::new(), None).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnresolvedGroup {
                model: "Cfg",
                member: "Orphan",
            }
        );
    }
}
