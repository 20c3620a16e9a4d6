//! Key classification heuristics
//!
//! Decides whether an object key looks like an account identifier (a
//! GitHub-style username plus an optional extension), which the views use
//! to show an avatar badge instead of a generic file icon.

use crate::constants::MAX_IDENTIFIER_LEN;

/// Strip the trailing extension from a key
///
/// The extension is the last `.` and what follows it. It is only removed
/// when the dot is not the first character and the extension is a
/// non-empty run without `/`.
///
/// # Examples
///
/// ```
/// use cloudsim_pilot_core::classify::strip_extension;
///
/// assert_eq!(strip_extension("octocat.png"), "octocat");
/// assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
/// assert_eq!(strip_extension(".bashrc"), ".bashrc");
/// assert_eq!(strip_extension("README"), "README");
/// ```
pub fn strip_extension(key: &str) -> &str {
    match key.rfind('.') {
        Some(dot) if dot > 0 => {
            let ext = &key[dot + 1..];
            if ext.is_empty() || ext.contains('/') {
                key
            } else {
                &key[..dot]
            }
        }
        _ => key,
    }
}

/// Whether `key` names an identifier-like object
///
/// After stripping the extension the stem must be 1..=39 ASCII
/// alphanumerics and hyphens, starting and ending with an alphanumeric.
///
/// # Examples
///
/// ```
/// use cloudsim_pilot_core::classify::looks_like_identifier;
///
/// assert!(looks_like_identifier("octocat.png"));
/// assert!(looks_like_identifier("mona-lisa"));
/// assert!(!looks_like_identifier("-abc"));
/// assert!(!looks_like_identifier("photos/cat.jpg"));
/// ```
pub fn looks_like_identifier(key: &str) -> bool {
    let stem = strip_extension(key);
    let bytes = stem.as_bytes();

    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return false;
    };
    if bytes.len() > MAX_IDENTIFIER_LEN {
        return false;
    }
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

/// Avatar URL for identifier-like keys
pub fn avatar_url(key: &str) -> Option<String> {
    looks_like_identifier(key).then(|| format!("https://github.com/{}.png", strip_extension(key)))
}
