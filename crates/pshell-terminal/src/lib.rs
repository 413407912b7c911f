//! Command interpreter and shell loop.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name with a fixed argument count.
//! The registry tokenizes input lines, checks arity and path preconditions,
//! and dispatches `execute()`. `Shell` wraps the registry in a prompt loop.

mod checks;
mod commands;
mod interpreter;
mod shell;
pub mod table;

/// Path precondition checks run before a command executes.
pub use checks::{check_dir, check_exists, check_file};
/// Register the filesystem commands (files, info, delete, move, into, out, make, finish).
pub use commands::register_builtins;
/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command (text, table, signals).
pub use interpreter::CommandOutput;
/// Registry of available commands with dispatch.
pub use interpreter::CommandRegistry;
/// Shared mutable environment passed to every command.
pub use interpreter::Environment;
/// Argument-count check and path helpers.
pub use interpreter::{check_args, file_name, parent_path, resolve_path, tokenize};
/// The read-eval-print loop.
pub use shell::Shell;
