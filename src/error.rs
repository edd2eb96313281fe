//! Error types for barrelgen
//!
//! Uses `thiserror` for library errors; `anyhow` stays at the binary boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for barrelgen operations
pub type GenResult<T> = Result<T, GenError>;

/// Main error type for barrelgen operations
#[derive(Error, Debug)]
pub enum GenError {
    /// Invalid or incomplete options, raised before any watch starts
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Glob pattern failed to compile
    #[error("invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Failure reported by the underlying watch primitive
    #[error("watch error: {message}")]
    Watch { message: String },

    /// A single write attempt to the output file failed
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file's location cannot be expressed as a supported relative import
    #[error("unsupported relative layout: {file} is not reachable from {out_dir} by an upward traversal")]
    Path { file: PathBuf, out_dir: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_display_config() {
        let err = GenError::Config {
            message: "no formatter matches output extension 'txt'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration: no formatter matches output extension 'txt'"
        );
    }

    #[test]
    fn test_error_display_path() {
        let err = GenError::Path {
            file: PathBuf::from("src/deep/a.ts"),
            out_dir: PathBuf::from("src"),
        };
        assert_eq!(
            err.to_string(),
            "unsupported relative layout: src/deep/a.ts is not reachable from src by an upward traversal"
        );
    }

    #[test]
    fn test_error_display_pattern() {
        let err = GenError::Pattern {
            pattern: "src/[".to_string(),
            message: "unclosed character class".to_string(),
        };
        assert!(err.to_string().contains("src/["));
    }
}
