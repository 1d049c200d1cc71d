//! Which listed entries get downloaded.

use crate::drive::RemoteEntry;

/// Keeps non-folder entries, restricted to an exact title match when `name`
/// is given and non-empty. Listing order is preserved.
pub fn select_entries<'a>(
    entries: &'a [RemoteEntry],
    name: Option<&str>,
) -> Vec<&'a RemoteEntry> {
    let name = name.filter(|n| !n.is_empty());
    entries
        .iter()
        .filter(|e| !e.is_folder())
        .filter(|e| name.map_or(true, |n| e.title == n))
        .collect()
}
