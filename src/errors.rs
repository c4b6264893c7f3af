use glob::PatternError;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Custom error type for the uniquifier
#[derive(Debug)]
pub enum Error {
    /// Error related to file operations
    FileOperation {
        source: io::Error,
        path: PathBuf,
        operation: String,
    },
    /// Error related to glob pattern matching
    GlobPattern {
        source: PatternError,
        pattern: String,
    },
    /// Error related to path operations
    PathOperation { path: PathBuf, operation: String },
    /// Error when a filename is not valid Unicode
    InvalidFilename { path: PathBuf },
    /// Error when the target path does not exist
    PathNotFound { path: PathBuf },
    /// Generic error with a message
    Generic { message: String },
}

impl Error {
    /// Short tag identifying the failure family
    ///
    /// I/O failures are tagged with the name of their [`io::ErrorKind`]
    /// (`PermissionDenied`, `AlreadyExists`, ...), which is what ends up in
    /// the `code` field of the run log's error entries.
    pub fn code(&self) -> String {
        match self {
            Error::FileOperation { source, .. } => format!("{:?}", source.kind()),
            Error::GlobPattern { .. } => "GLOB".to_string(),
            Error::PathNotFound { .. } => "NotFound".to_string(),
            Error::InvalidFilename { .. } => "InvalidFilename".to_string(),
            _ => "ERR".to_string(),
        }
    }

    /// Path the failure is about, if it names one
    pub fn path(&self) -> Option<&Path> {
        let path = match self {
            Error::FileOperation { path, .. }
            | Error::PathOperation { path, .. }
            | Error::InvalidFilename { path }
            | Error::PathNotFound { path } => path,
            _ => return None,
        };
        (!path.as_os_str().is_empty()).then_some(path.as_path())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileOperation {
                source,
                path,
                operation,
            } => {
                write!(
                    f,
                    "Failed to {} file: {} ({})",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::GlobPattern { pattern, .. } => {
                write!(f, "Invalid glob pattern: {pattern}")
            }
            Error::PathOperation { path, operation } => {
                write!(f, "Failed to {} path: {}", operation, path.display())
            }
            Error::InvalidFilename { path } => {
                write!(f, "Filename is not valid unicode: {}", path.display())
            }
            Error::PathNotFound { path } => {
                write!(f, "Path not found: {}", path.display())
            }
            Error::Generic { message } => {
                write!(f, "{message}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::FileOperation { source, .. } => Some(source),
            Error::GlobPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::FileOperation {
            source: err,
            path: PathBuf::new(),
            operation: "perform operation on".to_string(),
        }
    }
}

impl From<PatternError> for Error {
    fn from(err: PatternError) -> Self {
        Error::GlobPattern {
            source: err,
            pattern: String::new(),
        }
    }
}

/// Custom Result type for the uniquifier
///
/// This type alias simplifies error handling throughout the application by
/// using the custom Error type. It's used as the return type for most functions
/// that can fail.
///
/// # Examples
/// ```
/// use uniquifier::prelude::{Result, generic_error};
///
/// fn example_function() -> Result<String> {
///     // Return success
///     Ok("success".to_string())
///
///     // Or return an error
///     // Err(generic_error("Something went wrong"))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Helper function to create a file operation error
pub fn file_operation_error(err: io::Error, path: PathBuf, operation: &str) -> Error {
    Error::FileOperation {
        source: err,
        path,
        operation: operation.to_string(),
    }
}

/// Helper function to create a glob pattern error
pub fn glob_pattern_error(err: PatternError, pattern: &str) -> Error {
    Error::GlobPattern {
        source: err,
        pattern: pattern.to_string(),
    }
}

/// Helper function to create a path operation error
pub fn path_operation_error(path: PathBuf, operation: &str) -> Error {
    Error::PathOperation {
        path,
        operation: operation.to_string(),
    }
}

/// Helper function to create an invalid filename error
pub fn invalid_filename_error(path: PathBuf) -> Error {
    Error::InvalidFilename { path }
}

/// Helper function to create a path not found error
pub fn path_not_found_error(path: PathBuf) -> Error {
    Error::PathNotFound { path }
}

/// Helper function to create a generic error
pub fn generic_error(message: &str) -> Error {
    Error::Generic {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_operation_error() {
        let path = PathBuf::from("/test/path");
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = file_operation_error(io_error, path.clone(), "rename");

        let error_string = format!("{error}");
        assert!(
            error_string.contains("rename"),
            "Error message should contain the operation"
        );
        assert!(
            error_string.contains("/test/path"),
            "Error message should contain the path"
        );
        assert!(
            error_string.contains("File not found"),
            "Error message should contain the underlying cause"
        );
    }

    #[test]
    fn test_glob_pattern_error() {
        let pattern_error = glob::Pattern::new("[").err().unwrap();
        let error = glob_pattern_error(pattern_error, "test-glob-pattern");

        assert!(format!("{error}").contains("test-glob-pattern"));
        assert_eq!(error.code(), "GLOB");
    }

    #[test]
    fn test_path_operation_error() {
        let error = path_operation_error(PathBuf::from("/test/path"), "get filename");

        let error_string = format!("{error}");
        assert!(error_string.contains("get filename"));
        assert!(error_string.contains("/test/path"));
    }

    #[test]
    fn test_error_path() {
        let invalid = invalid_filename_error(PathBuf::from("/data/bad"));
        assert_eq!(invalid.path(), Some(Path::new("/data/bad")));

        let denied = file_operation_error(
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            PathBuf::from("/locked"),
            "rename",
        );
        assert_eq!(denied.path(), Some(Path::new("/locked")));

        // conversions from io::Error carry no path
        let converted: Error = io::Error::other("boom").into();
        assert_eq!(converted.path(), None);
        assert_eq!(generic_error("boom").path(), None);
    }

    #[test]
    fn test_path_not_found_error() {
        let error = path_not_found_error(PathBuf::from("/test/nonexistent"));

        assert!(format!("{error}").contains("/test/nonexistent"));
        assert_eq!(error.code(), "NotFound");
    }

    #[test]
    fn test_generic_error() {
        let error = generic_error("Something went wrong");

        assert_eq!(format!("{error}"), "Something went wrong");
        assert_eq!(error.code(), "ERR");
    }

    #[test]
    fn test_code_uses_io_error_kind() {
        let denied = file_operation_error(
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            PathBuf::from("/locked"),
            "rename",
        );
        assert_eq!(denied.code(), "PermissionDenied");

        let exists = file_operation_error(
            io::Error::new(io::ErrorKind::AlreadyExists, "exists"),
            PathBuf::from("/taken"),
            "rename",
        );
        assert_eq!(exists.code(), "AlreadyExists");
    }

    #[test]
    fn test_error_conversion() {
        // Test conversion from io::Error to Error
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        assert!(
            format!("{error}").contains("Failed to perform operation on file"),
            "Error message should contain the underlying error"
        );

        // Test conversion from PatternError to Error
        let pattern_error = glob::Pattern::new("[").err().unwrap();
        let error: Error = pattern_error.into();
        assert!(format!("{error}").contains("Invalid glob pattern"));
    }
}
