//! Upload policy validation
//!
//! Pure checks against the process-wide upload policy. Both functions are
//! deterministic and do no I/O. The orchestrator runs the extension check
//! before the size check; that ordering is part of the contract (the cheaper
//! check runs first) and is covered by tests.

use crate::error::AppError;

/// Process-wide upload limits, immutable after startup.
///
/// Extensions are stored lower-cased; matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub allowed_extensions: Vec<String>,
    pub max_bytes: u64,
}

impl UploadPolicy {
    pub fn new(allowed_extensions: Vec<String>, max_bytes: u64) -> Self {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            allowed_extensions,
            max_bytes,
        }
    }
}

/// Validate the filename extension against the policy allow-list.
///
/// Returns the lower-cased extension on success. A filename without a `.`
/// (or with nothing after the last `.`) is rejected as `NoExtension`.
pub fn validate_extension(filename: &str, policy: &UploadPolicy) -> Result<String, AppError> {
    let extension = match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
        _ => return Err(AppError::NoExtension(filename.to_string())),
    };

    if !policy.allowed_extensions.iter().any(|e| *e == extension) {
        return Err(AppError::ExtensionNotAllowed {
            extension,
            allowed: policy.allowed_extensions.clone(),
        });
    }

    Ok(extension)
}

/// Validate the buffered file size. Exactly `max_bytes` is allowed.
pub fn validate_size(size: u64, policy: &UploadPolicy) -> Result<(), AppError> {
    if size > policy.max_bytes {
        return Err(AppError::TooLarge {
            size,
            max: policy.max_bytes,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorMetadata;

    fn policy() -> UploadPolicy {
        UploadPolicy::new(
            vec!["jpg".into(), "jpeg".into(), "png".into(), "pdf".into(), "txt".into()],
            10 * 1024 * 1024,
        )
    }

    #[test]
    fn test_validate_extension_accepts_allowed() {
        assert_eq!(validate_extension("photo.png", &policy()).unwrap(), "png");
        assert_eq!(validate_extension("report.pdf", &policy()).unwrap(), "pdf");
    }

    #[test]
    fn test_validate_extension_is_case_insensitive() {
        assert_eq!(validate_extension("PHOTO.JPG", &policy()).unwrap(), "jpg");
    }

    #[test]
    fn test_validate_extension_rejects_missing_dot() {
        let err = validate_extension("README", &policy()).unwrap_err();
        assert_eq!(err.reason(), Some("no_extension"));
    }

    #[test]
    fn test_validate_extension_rejects_trailing_dot() {
        let err = validate_extension("archive.", &policy()).unwrap_err();
        assert_eq!(err.reason(), Some("no_extension"));
    }

    #[test]
    fn test_validate_extension_rejects_disallowed() {
        let err = validate_extension("malware.exe", &policy()).unwrap_err();
        match err {
            AppError::ExtensionNotAllowed { extension, allowed } => {
                assert_eq!(extension, "exe");
                assert!(allowed.contains(&"jpg".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_size_boundary() {
        let p = policy();
        assert!(validate_size(p.max_bytes, &p).is_ok());
        assert!(validate_size(0, &p).is_ok());

        let err = validate_size(p.max_bytes + 1, &p).unwrap_err();
        match err {
            AppError::TooLarge { size, max } => {
                assert_eq!(size, p.max_bytes + 1);
                assert_eq!(max, p.max_bytes);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_policy_normalizes_extensions() {
        let p = UploadPolicy::new(vec![" JPG ".into(), "".into(), "Png".into()], 1024);
        assert_eq!(p.allowed_extensions, vec!["jpg", "png"]);
    }
}
