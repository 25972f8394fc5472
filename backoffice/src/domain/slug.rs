//! Slug validation and derivation shared by content entities.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits, and hyphens. `derive_slug` produces one from free
//! text (titles, category names) for the editor's "generate from title"
//! affordance.

/// Return `true` when `value` is a valid slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    is_trimmed_non_empty(value) && has_allowed_slug_chars(value)
}

fn is_trimmed_non_empty(value: &str) -> bool {
    !value.is_empty() && value.trim() == value
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

/// Derive a slug from free text: lowercase alphanumerics kept, runs of
/// everything else collapsed into single hyphens. Returns `None` when no
/// usable characters remain.
pub(crate) fn derive_slug(text: &str) -> Option<String> {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() { None } else { Some(slug) }
}
