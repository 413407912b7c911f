//! Built-in filesystem commands.
//!
//! Executors translate a validated argument list into filesystem calls and
//! turn the expected failure modes into the messages users see. Only `move`
//! (and `info`/`files` on unexpected I/O failures) hands errors back to the
//! shell loop.

use pshell_platform::Timestamp;
use pshell_types::error::{Result, ShellError};
use pshell_vfs::EntryKind;

use crate::checks::{check_dir, check_exists, check_file};
use crate::interpreter::{
    Command, CommandOutput, CommandRegistry, Environment, file_name, parent_path, resolve_path,
};

/// Column headers of the `info` table.
pub const INFO_HEADERS: [&str; 6] = [
    "File Name",
    "Type",
    "Owner",
    "Modification Time",
    "Size",
    "Executable",
];

/// Column widths of the `info` table.
pub const INFO_WIDTHS: [usize; 6] = [25, 21, 15, 25, 25, 20];

/// Register all built-in commands into a registry.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(FilesCmd));
    reg.register(Box::new(InfoCmd));
    reg.register(Box::new(DeleteCmd));
    reg.register(Box::new(MoveCmd));
    reg.register(Box::new(IntoCmd));
    reg.register(Box::new(OutCmd));
    reg.register(Box::new(MakeCmd));
    reg.register(Box::new(FinishCmd));
}

/// Message for a failure no command has a dedicated wording for.
fn unclassified(err: ShellError) -> String {
    log::warn!("unclassified failure: {err}");
    if matches!(err, ShellError::Io(_)) {
        err.to_string()
    } else {
        format!("An error has occured: {err}")
    }
}

fn text(msg: impl Into<String>) -> Result<CommandOutput> {
    Ok(CommandOutput::Text(msg.into()))
}

/// Make `target` the working directory, or say why not.
fn change_dir(env: &mut Environment<'_>, target: String) -> std::result::Result<(), String> {
    match env.vfs.check_enter(&target) {
        Ok(()) => {
            log::debug!("cwd {} -> {target}", env.cwd);
            env.cwd = target;
            Ok(())
        },
        Err(ShellError::NotFound(_)) => Err("Error: directory does not exist".to_string()),
        Err(ShellError::NotADirectory(_)) => {
            Err("Error: Argument must be a directory".to_string())
        },
        Err(ShellError::PermissionDenied(_)) => Err("Error: Permissions required".to_string()),
        Err(e) => Err(unclassified(e)),
    }
}

// ---------------------------------------------------------------------------
// files
// ---------------------------------------------------------------------------

struct FilesCmd;
impl Command for FilesCmd {
    fn name(&self) -> &str {
        "files"
    }
    fn arity(&self) -> usize {
        0
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let entries = env.vfs.readdir(&env.cwd)?;
        if entries.is_empty() {
            return Ok(CommandOutput::None);
        }
        let lines: Vec<String> = entries
            .iter()
            .map(|e| match e.kind {
                EntryKind::Directory => format!("dir: {}", e.name),
                _ => format!("file: {}", e.name),
            })
            .collect();
        text(lines.join("\n"))
    }
}

// ---------------------------------------------------------------------------
// info
// ---------------------------------------------------------------------------

struct InfoCmd;
impl Command for InfoCmd {
    fn name(&self) -> &str {
        "info"
    }
    fn arity(&self) -> usize {
        1
    }
    fn check(&self, args: &[&str], env: &Environment<'_>) -> Result<()> {
        check_exists(env, args[0], 1)
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let meta = env.vfs.stat(&env.resolve(args[0]))?;
        let kind = match meta.kind {
            EntryKind::Symlink => "Symbolic Link",
            EntryKind::File => "Regular File",
            EntryKind::Directory => "Directory",
            EntryKind::Other => "Unknown",
        };
        let (size, executable) = if meta.kind == EntryKind::File {
            let executable = if meta.executable { "Yes" } else { "No" };
            (meta.size.to_string(), executable.to_string())
        } else {
            ("N/A".to_string(), "N/A".to_string())
        };
        let row = vec![
            args[0].to_string(),
            kind.to_string(),
            meta.uid.to_string(),
            Timestamp::from_unix_secs(meta.modified).to_string(),
            size,
            executable,
        ];
        Ok(CommandOutput::Table {
            headers: INFO_HEADERS.iter().map(|h| h.to_string()).collect(),
            widths: INFO_WIDTHS.to_vec(),
            rows: vec![row],
        })
    }
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

struct DeleteCmd;
impl Command for DeleteCmd {
    fn name(&self) -> &str {
        "delete"
    }
    fn arity(&self) -> usize {
        1
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(args[0]);
        match env.vfs.remove_file(&path) {
            Ok(()) => text("Delete successful"),
            Err(ShellError::NotFound(_)) => text("Error: File does not exist"),
            Err(ShellError::PermissionDenied(_)) => text("Error: Permissions required"),
            Err(e) => text(unclassified(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// move
// ---------------------------------------------------------------------------

struct MoveCmd;
impl Command for MoveCmd {
    fn name(&self) -> &str {
        "move"
    }
    fn arity(&self) -> usize {
        2
    }
    fn check(&self, args: &[&str], env: &Environment<'_>) -> Result<()> {
        check_exists(env, args[0], 1)?;
        check_file(env, args[0], 1)?;
        check_exists(env, args[1], 2)?;
        check_dir(env, args[1], 2)
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let src = env.resolve(args[0]);
        let dst = resolve_path(&env.resolve(args[1]), file_name(&src));
        // Never clobber: moving onto an existing name is refused.
        if env.vfs.exists(&dst) {
            return Err(ShellError::AlreadyExists(dst));
        }
        env.vfs.rename(&src, &dst)?;
        log::debug!("moved {src} -> {dst}");
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// into
// ---------------------------------------------------------------------------

struct IntoCmd;
impl Command for IntoCmd {
    fn name(&self) -> &str {
        "into"
    }
    fn arity(&self) -> usize {
        1
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let target = env.resolve(args[0]);
        match change_dir(env, target) {
            Ok(()) => text("Successful"),
            Err(msg) => text(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// out
// ---------------------------------------------------------------------------

struct OutCmd;
impl Command for OutCmd {
    fn name(&self) -> &str {
        "out"
    }
    fn arity(&self) -> usize {
        1
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let Some(parent) = parent_path(&env.cwd) else {
            return text(ShellError::AtRoot.to_string());
        };
        match change_dir(env, parent) {
            Ok(()) => Ok(CommandOutput::None),
            Err(msg) => text(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// make
// ---------------------------------------------------------------------------

struct MakeCmd;
impl Command for MakeCmd {
    fn name(&self) -> &str {
        "make"
    }
    fn arity(&self) -> usize {
        1
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(args[0]);
        match env.vfs.mkdir(&path) {
            Ok(()) => text("Directory successfully created"),
            Err(ShellError::AlreadyExists(_)) => {
                text("Error: A directory with this name already exists")
            },
            Err(e) => text(unclassified(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// finish
// ---------------------------------------------------------------------------

struct FinishCmd;
impl Command for FinishCmd {
    fn name(&self) -> &str {
        "finish"
    }
    fn arity(&self) -> usize {
        0
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Exit)
    }
}
