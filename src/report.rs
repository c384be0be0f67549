use std::path::Path;

use crate::compare_engine::PresenceBitmask;

/// Short name for a folder: its last path component, or the whole path when
/// there is none (e.g. `/`).
pub fn folder_label(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Human-readable title for a pattern group, with 1-based folder numbers
pub fn describe_pattern(mask: &PresenceBitmask) -> String {
    let folders: Vec<String> = mask
        .present_indices()
        .map(|index| format!("folder {}", index + 1))
        .collect();

    match folders.as_slice() {
        [only] => format!("Only in {only}"),
        _ => format!("In {}", folders.join(" and ")),
    }
}

/// Title with the group size appended, e.g. `Only in folder 2 (3 files)`
pub fn describe_group(mask: &PresenceBitmask, file_count: usize) -> String {
    let noun = if file_count == 1 { "file" } else { "files" };
    format!("{} ({file_count} {noun})", describe_pattern(mask))
}
