use unicode_normalization::UnicodeNormalization;

/// Slug used when a name has no ASCII alphanumerics left after normalization
pub const FALLBACK_SLUG: &str = "venue";

/// Turns arbitrary text into a lowercase, URL-safe slug.
///
/// Accents are stripped through NFKD decomposition, every run of
/// non-alphanumeric characters becomes a single `-`, and leading or trailing
/// dashes are removed. May return an empty string.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for c in value.nfkd().filter(char::is_ascii) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// The slug a new venue named `name` would like to have
pub fn slug_base(name: &str) -> String {
    let base = slugify(name);
    if base.is_empty() {
        FALLBACK_SLUG.to_owned()
    } else {
        base
    }
}

/// Final slug for a freshly inserted venue.
///
/// When another venue already holds `base`, the new row's id is appended to
/// keep slugs globally unique.
pub fn disambiguate(base: &str, id: i64, taken: bool) -> String {
    if taken {
        format!("{base}-{id}")
    } else {
        base.to_owned()
    }
}
