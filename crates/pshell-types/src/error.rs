//! Error types for PShell.
//!
//! The taxonomy is closed: every failure a command can hit maps to exactly one
//! variant. Executors match on the variant to pick their own wording; anything
//! that escapes a command is printed with [`ShellError::report`].

use std::io;

/// Errors produced by the shell and its filesystem backends.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Unexpected argument {arg} for command {command}")]
    UnexpectedArgument { command: String, arg: String },

    #[error("Missing argument for command {command}")]
    MissingArgument { command: String },

    #[error("Error: Arg{index} invalid file/directory path")]
    InvalidPath { index: usize },

    #[error("Error: Arg{index} must be a file")]
    ExpectedFile { index: usize },

    #[error("Error: Arg{index} must be a directory")]
    ExpectedDirectory { index: usize },

    #[error("no such file or directory: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("Error: In root directory already")]
    AtRoot,

    #[error("Unknown command {0}")]
    UnknownCommand(String),

    #[error("An error has occured: {0}")]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Classify an I/O error raised while operating on `path`.
    ///
    /// Kinds with a dedicated variant lose the OS error text and keep the path;
    /// everything else is carried unchanged in [`ShellError::Io`].
    pub fn from_io(err: io::Error, path: &str) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_string()),
            io::ErrorKind::NotADirectory => Self::NotADirectory(path.to_string()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_string()),
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_string()),
            _ => Self::Io(err),
        }
    }

    /// Text printed at the prompt when this error ends a command.
    ///
    /// Filesystem classifications get an `Error: ` prefix; every other
    /// variant already reads as a complete message.
    pub fn report(&self) -> String {
        match self {
            Self::NotFound(_)
            | Self::NotADirectory(_)
            | Self::PermissionDenied(_)
            | Self::AlreadyExists(_) => format!("Error: {self}"),
            _ => self.to_string(),
        }
    }

    /// True for the argument-count failures reported by the dispatcher.
    pub fn is_arity(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedArgument { .. } | Self::MissingArgument { .. }
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
