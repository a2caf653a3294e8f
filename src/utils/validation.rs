use crate::utils::error::{Result, VerifyError};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(VerifyError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Checks the roster before anything is loaded: it must exist and carry one
/// of the allowed extensions. Returns the lowercased extension.
pub fn validate_input_file(path: &Path, allowed_extensions: &[&str]) -> Result<String> {
    if !path.is_file() {
        return Err(VerifyError::InputNotFound {
            path: path.display().to_string(),
        });
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| VerifyError::UnsupportedInput {
            path: path.display().to_string(),
            reason: "file has no extension".to_string(),
        })?;

    if !allowed_extensions.contains(&extension.as_str()) {
        return Err(VerifyError::UnsupportedInput {
            path: path.display().to_string(),
            reason: format!(
                "unsupported extension '{}', allowed: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        });
    }

    Ok(extension)
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(VerifyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("endpoints.codeforces.profile_url", "https://codeforces.com/profile/").is_ok());
        assert!(validate_url("endpoints.codeforces.profile_url", "http://127.0.0.1:8080/").is_ok());
        assert!(validate_url("endpoints.codeforces.profile_url", "").is_err());
        assert!(validate_url("endpoints.codeforces.profile_url", "codeforces.com").is_err());
        assert!(validate_url("endpoints.codeforces.profile_url", "ftp://codeforces.com").is_err());
    }

    #[test]
    fn test_validate_input_file() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("roster.CSV");
        std::fs::write(&csv_path, "Admn No:,Name\n").unwrap();
        assert_eq!(validate_input_file(&csv_path, &["xlsx", "csv"]).unwrap(), "csv");

        let txt_path = dir.path().join("roster.txt");
        std::fs::write(&txt_path, "").unwrap();
        assert!(matches!(
            validate_input_file(&txt_path, &["xlsx", "csv"]),
            Err(VerifyError::UnsupportedInput { .. })
        ));

        let missing = dir.path().join("missing.csv");
        assert!(matches!(
            validate_input_file(&missing, &["xlsx", "csv"]),
            Err(VerifyError::InputNotFound { .. })
        ));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("http.timeout_seconds", 30, 1, 600).is_ok());
        assert!(validate_range("http.timeout_seconds", 0, 1, 600).is_err());
    }
}
