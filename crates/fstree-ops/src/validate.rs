//! Filename validation.

use crate::error::NameError;

/// Validate a filename for cross-platform use.
pub fn validate_filename(name: &str) -> Result<(), NameError> {
    let invalid = |reason: &str| NameError::Invalid {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }

    if name.len() > 255 {
        return Err(invalid("name is too long (max 255 bytes)"));
    }

    if name.contains('/') {
        return Err(invalid("name cannot contain '/'"));
    }

    if name.contains('\0') {
        return Err(invalid("name cannot contain NUL"));
    }

    if name.starts_with(' ') || name.ends_with(' ') {
        return Err(invalid("name cannot start or end with spaces"));
    }

    if name == "." || name == ".." {
        return Err(invalid("'.' and '..' are reserved names"));
    }

    if name.ends_with('.') {
        return Err(invalid("name cannot end with a dot"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename_valid() {
        assert!(validate_filename("test.txt").is_ok());
        assert!(validate_filename("my-file-1").is_ok());
        assert!(validate_filename(".hidden").is_ok());
        assert!(validate_filename("file with spaces").is_ok());
    }

    #[test]
    fn test_validate_filename_invalid() {
        assert!(validate_filename("").is_err());
        assert!(validate_filename("test/file").is_err());
        assert!(validate_filename("nul\0byte").is_err());
        assert!(validate_filename(".").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename("file ").is_err());
        assert!(validate_filename(" file").is_err());
        assert!(validate_filename("file.").is_err());
        assert!(validate_filename(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_reserved_name_reason() {
        match validate_filename("..") {
            Err(NameError::Invalid { reason, .. }) => assert!(reason.contains("reserved")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
