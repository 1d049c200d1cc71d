//! Local file names for remote entries.

/// Maps a Drive title to a single path component under the destination.
///
/// - Replaces NUL, `/` and control characters with `_`
/// - Leaves spaces, dots and everything else as-is
/// - Falls back to `id` when the result is empty, `.` or `..`
pub fn local_file_name(title: &str, id: &str) -> String {
    let name: String = title
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if name.is_empty() || name == "." || name == ".." {
        id.to_string()
    } else {
        name
    }
}
