use crate::utils::error::{LaunchError, Result};
use regex::Regex;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LaunchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LaunchError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LaunchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LaunchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LaunchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LaunchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_list<T>(field_name: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(LaunchError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

/// Python 模組路徑，例如 `numpy` 或 `OpenGL.GL`
pub fn validate_module_name(field_name: &str, module: &str) -> Result<()> {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").map_err(|e| {
        LaunchError::ConfigError {
            message: format!("module name pattern: {}", e),
        }
    })?;

    if !re.is_match(module) {
        return Err(LaunchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: module.to_string(),
            reason: "Not a valid Python module name".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("runtime.download_url", "https://www.python.org/downloads/").is_ok());
        assert!(validate_url("runtime.download_url", "http://example.com").is_ok());
        assert!(validate_url("runtime.download_url", "").is_err());
        assert!(validate_url("runtime.download_url", "python.org").is_err());
        assert!(validate_url("runtime.download_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("entry.script", "editor_main.py").is_ok());
        assert!(validate_path("entry.script", "").is_err());
        assert!(validate_path("entry.script", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_module_name() {
        assert!(validate_module_name("dependencies.packages", "PyQt5").is_ok());
        assert!(validate_module_name("dependencies.packages", "OpenGL.GL").is_ok());
        assert!(validate_module_name("dependencies.packages", "_private").is_ok());
        assert!(validate_module_name("dependencies.packages", "os; import sys").is_err());
        assert!(validate_module_name("dependencies.packages", "9lives").is_err());
        assert!(validate_module_name("dependencies.packages", "").is_err());
    }

    #[test]
    fn test_validate_non_empty_list() {
        assert!(validate_non_empty_list::<String>("runtime.candidates", &[]).is_err());
        assert!(validate_non_empty_list("runtime.candidates", &["python3"]).is_ok());
    }
}
