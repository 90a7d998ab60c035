use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes let callers (CI jobs, dashboards polling the CLI) tell a
/// missing definition apart from an infrastructure or I/O failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - a snapshot was produced (possibly with unknown sections)
    Success = 0,
    /// The requested application or environment is not defined
    DefinitionNotFound = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (config, file I/O, deadline exceeded, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Maps an error chain to the exit code the CLI should terminate with.
    pub fn for_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<SnapshotError>() {
            Some(err) if err.is_definition_error() => ExitCode::DefinitionNotFound,
            Some(SnapshotError::Validation { .. }) => ExitCode::InvalidArguments,
            _ => ExitCode::ApplicationError,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::DefinitionNotFound => write!(f, "Definition Not Found (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Errors that abort a snapshot resolution request.
///
/// Infrastructure lookups never surface here: they degrade to sentinel values
/// inside the snapshot. Only definition problems, invalid input, I/O on the
/// outer surface, and an exceeded request deadline are reported as failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Application definition not found: {app_name}\n\n💡 Hint: {suggestion}")]
    ApplicationNotFound {
        app_name: String,
        suggestion: String,
    },

    #[error("Environment '{environment}' is not defined for application '{app_name}'\n\n💡 Hint: Defined environments: {available}")]
    EnvironmentNotFound {
        app_name: String,
        environment: String,
        available: String,
    },

    #[error("Invalid application definition: {path}\nDetails: {details}\n\n💡 Hint: Please verify the definition file against the documented format")]
    InvalidDefinition { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    DefinitionReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    /// Validation error for request and configuration input
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Snapshot resolution for {app_name}/{environment} exceeded its deadline of {deadline_secs}s\n\n💡 Hint: Increase request_deadline_secs or check gateway latency")]
    DeadlineExceeded {
        app_name: String,
        environment: String,
        deadline_secs: u64,
    },
}

impl SnapshotError {
    /// Whether this error means the definition store has no usable entry
    /// for the request.
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            SnapshotError::ApplicationNotFound { .. } | SnapshotError::EnvironmentNotFound { .. }
        )
    }
}
