use std::path::{Component, Path, PathBuf};

/// Clean up a path the way a user tends to paste it: surrounding whitespace
/// and one pair of enclosing quotes are removed, then the path is normalized.
pub fn sanitize_path(raw: &str) -> String {
    let unquoted = strip_enclosing_quotes(raw.trim());
    normalize_path(unquoted)
}

/// Remove one matching pair of `"` or `'` around the whole string
pub fn strip_enclosing_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Lexically normalize a path without touching the filesystem.
///
/// Repeated separators and `.` segments disappear, `name/..` pairs cancel,
/// `..` directly under the root is dropped, and an empty result becomes `"."`.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let mut normalized = PathBuf::new();
    let mut has_root = false;
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in Path::new(path).components() {
        match component {
            Component::Prefix(_) => normalized.push(component.as_os_str()),
            Component::RootDir => {
                normalized.push(component.as_os_str());
                has_root = true;
            }
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                _ if has_root => {}
                _ => parts.push(component),
            },
            Component::Normal(_) => parts.push(component),
        }
    }

    for part in parts {
        normalized.push(part.as_os_str());
    }

    if normalized.as_os_str().is_empty() {
        return ".".to_string();
    }

    normalized.to_string_lossy().into_owned()
}
