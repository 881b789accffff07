//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    /// A credential or endpoint the chosen command needs is empty.
    #[error("Missing {section}.{key}: set it under [{section}] or export {env}")]
    MissingField {
        section: &'static str,
        key: &'static str,
        env: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_names_section_and_env() {
        let err = ConfigError::MissingField {
            section: "allocations",
            key: "url",
            env: "QUOTA_AUDIT_ALLOCATIONS_URL",
        };
        assert_eq!(
            err.to_string(),
            "Missing allocations.url: set it under [allocations] or export QUOTA_AUDIT_ALLOCATIONS_URL"
        );
    }
}
