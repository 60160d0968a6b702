//! Path canonicalization.
//!
//! Every user-supplied path, router prefix, group prefix and request URI goes
//! through [`format_path`] before it is stored, composed or matched, so the
//! rest of the crate can assume the canonical form: exactly one leading `/`
//! and no trailing `/` unless the whole path is `/`.

/// Canonicalize a path.
///
/// Trims leading and trailing slashes, backslashes and whitespace, then
/// prepends a single `/`. Interior characters are left untouched.
///
/// ```
/// use fnrouter::path::format_path;
///
/// assert_eq!(format_path("users/"), "/users");
/// assert_eq!(format_path(" \\admin\\users// "), "/admin\\users");
/// assert_eq!(format_path(""), "/");
/// assert_eq!(format_path("///"), "/");
/// ```
#[must_use]
pub fn format_path(path: &str) -> String {
    let trimmed = path.trim_matches(is_separator_or_space);
    let mut out = String::with_capacity(trimmed.len() + 1);
    out.push('/');
    out.push_str(trimmed);
    out
}

/// Join two path pieces and canonicalize the result.
///
/// Used for prefix composition: `join_paths("/api", "/")` is `/api`,
/// `join_paths("/", "/users")` is `/users`.
#[must_use]
pub fn join_paths(prefix: &str, path: &str) -> String {
    let mut joined = String::with_capacity(prefix.len() + path.len() + 1);
    joined.push_str(prefix.trim_end_matches(is_separator_or_space));
    joined.push('/');
    joined.push_str(path.trim_start_matches(is_separator_or_space));
    format_path(&joined)
}

/// Drop the query string from a request URI (everything from the first `?`).
#[inline]
#[must_use]
pub fn strip_query(uri: &str) -> &str {
    match uri.find('?') {
        Some(pos) => &uri[..pos],
        None => uri,
    }
}

fn is_separator_or_space(c: char) -> bool {
    c == '/' || c == '\\' || c.is_whitespace()
}
