use tracing::warn;

use crate::types::Table;

/// Merge `overlay` into `base`, group by group.
/// Groups present on both sides are unioned; on a key collision `overlay`'s
/// value wins in the position `base` gave it.
pub fn merge_tables<V>(mut base: Table<V>, overlay: Table<V>) -> Table<V> {
    for section in overlay.into_sections() {
        let group = section.name().to_string();
        let target = base.section_or_insert(&group);
        for (key, value) in section.into_entries() {
            if target.insert(key.as_str(), value).is_some() {
                warn!(%group, %key, "duplicate entry while merging, later value wins");
            }
        }
    }
    base
}
