//! Command trait, registry, and dispatch logic.
//!
//! A line is split on runs of whitespace; there is no quoting, escaping or
//! glob expansion. Field 0 names the command, the rest are positional
//! arguments whose count must match the command's arity exactly.

use std::cmp::Ordering;
use std::collections::HashMap;

use pshell_types::error::{Result, ShellError};
use pshell_vfs::Vfs;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Fixed-width table: every column is padded to its width.
    Table {
        headers: Vec<String>,
        widths: Vec<usize>,
        rows: Vec<Vec<String>>,
    },
    /// Command produced no visible output.
    None,
    /// Signal to the shell loop to terminate.
    Exit,
}

/// Shared mutable environment passed to every command.
pub struct Environment<'a> {
    /// Current working directory (absolute, normalized).
    pub cwd: String,
    /// The filesystem commands operate on.
    pub vfs: &'a mut dyn Vfs,
}

impl<'a> Environment<'a> {
    pub fn new(cwd: impl Into<String>, vfs: &'a mut dyn Vfs) -> Self {
        Self {
            cwd: cwd.into(),
            vfs,
        }
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve(&self, input: &str) -> String {
        resolve_path(&self.cwd, input)
    }
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// Exact number of positional arguments.
    fn arity(&self) -> usize;

    /// Preconditions on the arguments, run after the arity check and before
    /// `execute`. Nothing is executed if this fails.
    fn check(&self, _args: &[&str], _env: &Environment<'_>) -> Result<()> {
        Ok(())
    }

    /// Execute the command with the given arguments and environment.
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput>;
}

/// Registry of available commands with dispatch.
///
/// Built once at startup and never modified while the shell runs.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Look up a command by exact name.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    /// Parse and execute a command line.
    ///
    /// A blank line is not an error and produces no output. Command names are
    /// case-sensitive.
    pub fn execute(&self, line: &str, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let fields = tokenize(line);
        let Some(&name) = fields.first() else {
            return Ok(CommandOutput::None);
        };
        let cmd = self
            .get(name)
            .ok_or_else(|| ShellError::UnknownCommand(name.to_string()))?;

        check_args(&fields, cmd.arity())?;
        let args = &fields[1..];
        cmd.check(args, env)?;

        log::debug!("dispatch {name} {args:?} (cwd {})", env.cwd);
        cmd.execute(args, env)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a line into whitespace-separated fields.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Check that `fields` (command name included) carries exactly `expected`
/// arguments.
pub fn check_args(fields: &[&str], expected: usize) -> Result<()> {
    let command = fields.first().copied().unwrap_or_default().to_string();
    let given = fields.len().saturating_sub(1);
    match given.cmp(&expected) {
        Ordering::Equal => Ok(()),
        Ordering::Greater => Err(ShellError::UnexpectedArgument {
            command,
            arg: fields[expected + 1].to_string(),
        }),
        Ordering::Less => Err(ShellError::MissingArgument { command }),
    }
}

/// Resolve a path relative to the current working directory.
///
/// `.` components are dropped and `..` removes the previous component, never
/// climbing above `/`. The result is absolute with no trailing slash.
pub fn resolve_path(cwd: &str, input: &str) -> String {
    let raw = if input.starts_with('/') {
        input.to_string()
    } else if cwd == "/" {
        format!("/{input}")
    } else {
        format!("{cwd}/{input}")
    };

    let mut parts: Vec<&str> = Vec::new();
    for component in raw.split('/') {
        match component {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Parent of a resolved path, or `None` at the root.
pub fn parent_path(path: &str) -> Option<String> {
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) | None => Some("/".to_string()),
        Some(i) => Some(path[..i].to_string()),
    }
}

/// Final component of a resolved path (empty for the root).
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}
