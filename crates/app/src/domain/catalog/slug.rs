//! URL-safe slug derivation.

/// Derive a URL-safe slug from a display name.
///
/// Lowercases ASCII alphanumerics and collapses every other run of
/// characters into a single hyphen. Leading and trailing separators are
/// dropped, so the result never starts or ends with a hyphen.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}
