//! Path precondition checks.
//!
//! Each check resolves the argument against the working directory and fails
//! with an error tagged by the argument's 1-based position. They are meant to
//! be chained with `?` so the first failure short-circuits the rest.

use pshell_types::error::{Result, ShellError};

use crate::interpreter::Environment;

/// The argument names something that exists (dangling links do not).
pub fn check_exists(env: &Environment<'_>, arg: &str, index: usize) -> Result<()> {
    if env.vfs.exists(&env.resolve(arg)) {
        Ok(())
    } else {
        Err(ShellError::InvalidPath { index })
    }
}

/// The argument resolves to a regular file.
pub fn check_file(env: &Environment<'_>, arg: &str, index: usize) -> Result<()> {
    if env.vfs.is_file(&env.resolve(arg)) {
        Ok(())
    } else {
        Err(ShellError::ExpectedFile { index })
    }
}

/// The argument resolves to a directory.
pub fn check_dir(env: &Environment<'_>, arg: &str, index: usize) -> Result<()> {
    if env.vfs.is_dir(&env.resolve(arg)) {
        Ok(())
    } else {
        Err(ShellError::ExpectedDirectory { index })
    }
}
