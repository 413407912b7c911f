//! Filesystem abstraction for PShell.
//!
//! Commands never touch `std::fs` directly. They go through the [`Vfs`]
//! trait with absolute, already-resolved paths, so the same dispatcher runs
//! against the host filesystem ([`HostVfs`]) or an in-memory fake
//! ([`MemoryVfs`]) in tests.

#[cfg(unix)]
mod host;
mod memory;

#[cfg(unix)]
pub use host::HostVfs;
pub use memory::{MEMORY_UID, MemoryVfs};

use pshell_types::error::Result;

/// What a path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// Sockets, FIFOs, device nodes.
    Other,
}

/// A single directory entry as returned by [`Vfs::readdir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsEntry {
    pub name: String,
    /// `Directory` when the entry is a directory after following links,
    /// `File` for everything else.
    pub kind: EntryKind,
}

/// Metadata for one path, as returned by [`Vfs::stat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsMetadata {
    /// Classified without following a final symlink.
    pub kind: EntryKind,
    /// Size in bytes of the (followed) target.
    pub size: u64,
    /// Numeric owner id of the (followed) target.
    pub uid: u32,
    /// Last modification, seconds since the Unix epoch (negative before 1970).
    pub modified: i64,
    /// Whether the current process may execute the target.
    pub executable: bool,
}

/// The filesystem operations the shell needs.
///
/// All paths are absolute. Predicates and `stat` sizes follow symlinks;
/// `remove_file` and `rename` act on the link itself.
pub trait Vfs {
    /// List the direct children of a directory.
    fn readdir(&self, path: &str) -> Result<Vec<VfsEntry>>;

    /// Metadata for a path.
    fn stat(&self, path: &str) -> Result<VfsMetadata>;

    /// True if the path resolves to anything. A dangling link does not exist.
    fn exists(&self, path: &str) -> bool;

    /// True if the path resolves to a regular file.
    fn is_file(&self, path: &str) -> bool;

    /// True if the path resolves to a directory.
    fn is_dir(&self, path: &str) -> bool;

    /// Remove a file or symlink. Directories are refused.
    fn remove_file(&mut self, path: &str) -> Result<()>;

    /// Move `from` to the exact path `to`.
    fn rename(&mut self, from: &str, to: &str) -> Result<()>;

    /// Create a single directory. The parent must exist.
    fn mkdir(&mut self, path: &str) -> Result<()>;

    /// Check that `path` could become the working directory.
    fn check_enter(&self, path: &str) -> Result<()>;
}
