//! Profile ids derived from display names.

use crate::error::{ProfileError, ProfileResult};

/// Derives a filename-safe id from a display name.
///
/// Lowercases, collapses each whitespace run into one `_`, then drops every
/// character outside `[a-z0-9_]`. Non-Latin letters are stripped, not
/// transliterated, so a name made only of them yields a validation error.
/// An id made only of separators (`"_"`, `"__"`) counts as empty.
pub fn derive_id(display_name: &str) -> ProfileResult<String> {
    let lower = display_name.trim().to_lowercase();

    let mut id = String::with_capacity(lower.len());
    let mut in_space = false;
    for c in lower.chars() {
        if c.is_whitespace() {
            if !in_space {
                id.push('_');
                in_space = true;
            }
            continue;
        }
        in_space = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            id.push(c);
        }
    }

    if id.chars().all(|c| c == '_') {
        return Err(ProfileError::Validation(format!(
            "display name {display_name:?} produces an empty id"
        )));
    }
    Ok(id)
}

/// Reports whether `id` is a non-empty `[a-z0-9_]` slug.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
