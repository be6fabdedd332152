//! URL path helpers for resolving catalog-relative references
//!
//! Index documents reference libraries, presets, and samples by relative
//! path. The engine only ever needs prefix joins and parent-directory
//! computation, so these are plain string operations rather than a full URL
//! parser.

/// Whether a reference is already an absolute URL.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Join a relative path onto a base URL, normalizing the separating slash.
///
/// Absolute paths are returned unchanged.
pub fn join(base: &str, path: &str) -> String {
    if is_absolute(path) {
        return path.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Parent directory of a document URL (everything before the last slash).
///
/// A library index fetched from `{root}/FluidR3_GM/index.json` resolves its
/// relative preset paths against `{root}/FluidR3_GM`, however deeply nested
/// the document sits.
pub fn parent(url: &str) -> String {
    match url.rfind('/') {
        Some(idx) => url[..idx].to_string(),
        None => url.to_string(),
    }
}
