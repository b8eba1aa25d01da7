//! Storage key derivation
//!
//! A storage key is derived from the client's declared filename only after
//! policy validation has passed. Keys never contain path separators or
//! whitespace, keep the original extension lower-cased, and carry a uuid v4
//! prefix so that two uploads of the same display name never collide.

use crate::error::AppError;
use uuid::Uuid;

/// Sanitize a declared filename into a safe base name.
///
/// Drops any directory component (both slash styles), collapses whitespace
/// runs to a single `_`, and strips everything outside `[A-Za-z0-9._-]`.
/// Fails with `UnsafeFilename` when nothing usable remains.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let mut sanitized = String::with_capacity(base.len());
    let mut in_whitespace = false;
    for c in base.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                sanitized.push('_');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            sanitized.push(c);
        }
    }

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        return Err(AppError::UnsafeFilename(filename.to_string()));
    }

    Ok(sanitized)
}

/// Derive a unique storage key: `{uuid}_{sanitized_stem}.{ext_lowercase}`.
///
/// The caller must have validated the extension already; a filename that
/// still has no extension here is rejected as unsafe.
pub fn storage_key(filename: &str) -> Result<String, AppError> {
    let sanitized = sanitize_filename(filename)?;

    let (stem, extension) = sanitized
        .rsplit_once('.')
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .ok_or_else(|| AppError::UnsafeFilename(filename.to_string()))?;

    Ok(format!(
        "{}_{}.{}",
        Uuid::new_v4(),
        stem,
        extension.to_lowercase()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_passes_clean_names_through() {
        assert_eq!(sanitize_filename("image.png").unwrap(), "image.png");
        assert_eq!(sanitize_filename("my-file_1.jpg").unwrap(), "my-file_1.jpg");
    }

    #[test]
    fn test_sanitize_strips_directory_components() {
        assert_eq!(sanitize_filename("../../etc/passwd.txt").unwrap(), "passwd.txt");
        assert_eq!(
            sanitize_filename("..\\..\\windows\\system32\\config.txt").unwrap(),
            "config.txt"
        );
        assert_eq!(sanitize_filename("/var/tmp/a.pdf").unwrap(), "a.pdf");
    }

    #[test]
    fn test_sanitize_collapses_whitespace_runs() {
        assert_eq!(sanitize_filename("my  holiday photo.jpg").unwrap(), "my_holiday_photo.jpg");
        assert_eq!(sanitize_filename("tab\there.txt").unwrap(), "tab_here.txt");
    }

    #[test]
    fn test_sanitize_strips_unsafe_characters() {
        assert_eq!(sanitize_filename("r\u{e9}sum\u{e9}!.pdf").unwrap(), "rsum.pdf");
        assert_eq!(sanitize_filename("a<b>c?.txt").unwrap(), "abc.txt");
        assert_eq!(sanitize_filename("nul\0byte.txt").unwrap(), "nulbyte.txt");
    }

    #[test]
    fn test_sanitize_rejects_empty_and_dots_only() {
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("....").is_err());
        assert!(sanitize_filename("\u{30c6}\u{30b9}\u{30c8}").is_err());
        assert!(sanitize_filename("dir/").is_err());
    }

    #[test]
    fn test_sanitize_is_idempotent_on_base_name() {
        let once = sanitize_filename("my  holiday photo.jpg").unwrap();
        let twice = sanitize_filename(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_storage_key_has_no_traversal_and_keeps_extension() {
        let key = storage_key("../../etc/passwd.txt").unwrap();
        assert!(!key.contains('/'));
        assert!(!key.contains(".."));
        assert!(key.ends_with(".txt"));
    }

    #[test]
    fn test_storage_key_lowercases_extension() {
        let key = storage_key("PHOTO.JPG").unwrap();
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn test_storage_key_is_unique_per_call() {
        let a = storage_key("photo.png").unwrap();
        let b = storage_key("photo.png").unwrap();
        assert_ne!(a, b);
        assert!(a.ends_with("_photo.png"));
        assert!(b.ends_with("_photo.png"));
    }

    #[test]
    fn test_storage_key_contains_no_whitespace() {
        let key = storage_key("my  holiday photo.jpg").unwrap();
        assert!(!key.chars().any(char::is_whitespace));
    }
}
