//! In-memory VFS implementation.
//!
//! Used by unit tests and anywhere the host filesystem must not be touched.
//! The entire tree lives in a `BTreeMap<String, Node>` keyed by normalized
//! absolute paths. Symlinks are resolved only at the final path component;
//! intermediate components must be real directories.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::io;

use pshell_types::error::{Result, ShellError};

use crate::{EntryKind, Vfs, VfsEntry, VfsMetadata};

/// Owner id reported for every node.
pub const MEMORY_UID: u32 = 1000;

/// Maximum number of symlinks followed before giving up.
const MAX_LINK_DEPTH: usize = 8;

#[derive(Debug, Clone)]
enum Node {
    File {
        data: Vec<u8>,
        executable: bool,
        modified: i64,
    },
    Dir {
        modified: i64,
    },
    Symlink {
        target: String,
        modified: i64,
    },
}

impl Node {
    fn modified(&self) -> i64 {
        match self {
            Node::File { modified, .. } | Node::Dir { modified } | Node::Symlink { modified, .. } => {
                *modified
            },
        }
    }
}

/// A fully in-memory virtual file system.
#[derive(Debug)]
pub struct MemoryVfs {
    /// Map of normalized paths to nodes.
    nodes: BTreeMap<String, Node>,
    /// Paths the current "process" has no permission on.
    locked: BTreeSet<String>,
    /// Timestamp stamped onto nodes as they are created or written.
    clock: i64,
}

impl MemoryVfs {
    /// Create a new in-memory VFS with only the root directory.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Dir { modified: 0 });
        Self {
            nodes,
            locked: BTreeSet::new(),
            clock: 0,
        }
    }

    /// Set the time (Unix seconds) recorded on subsequently created nodes.
    pub fn set_clock(&mut self, secs: i64) {
        self.clock = secs;
    }

    /// Create or overwrite a regular file. The parent directory must exist.
    pub fn write(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let path = normalize(path);
        self.require_parent_dir(&path)?;
        if let Some(Node::Dir { .. }) = self.nodes.get(path.as_ref()) {
            return Err(is_a_directory(&path));
        }
        let node = Node::File {
            data: data.to_vec(),
            executable: false,
            modified: self.clock,
        };
        self.nodes.insert(path.into_owned(), node);
        Ok(())
    }

    /// Read a regular file, following symlinks.
    pub fn read(&self, path: &str) -> Result<Vec<u8>> {
        match self.follow(path) {
            Some((_, Node::File { data, .. })) => Ok(data.clone()),
            Some((real, _)) => Err(is_a_directory(&real)),
            None => Err(ShellError::NotFound(normalize(path).into_owned())),
        }
    }

    /// Set or clear the execute permission of a regular file.
    pub fn set_executable(&mut self, path: &str, value: bool) -> Result<()> {
        let path = normalize(path);
        match self.nodes.get_mut(path.as_ref()) {
            Some(Node::File { executable, .. }) => {
                *executable = value;
                Ok(())
            },
            Some(_) => Err(is_a_directory(&path)),
            None => Err(ShellError::NotFound(path.into_owned())),
        }
    }

    /// Create a symlink at `link` pointing to `target`.
    ///
    /// A relative target is interpreted against the link's parent directory.
    pub fn symlink(&mut self, target: &str, link: &str) -> Result<()> {
        let link = normalize(link);
        self.require_parent_dir(&link)?;
        if self.nodes.contains_key(link.as_ref()) {
            return Err(ShellError::AlreadyExists(link.into_owned()));
        }
        let node = Node::Symlink {
            target: target.to_string(),
            modified: self.clock,
        };
        self.nodes.insert(link.into_owned(), node);
        Ok(())
    }

    /// Revoke all permissions on `path`: it can no longer be entered,
    /// listed or executed, and nothing inside it can be created or removed.
    pub fn lock(&mut self, path: &str) {
        self.locked.insert(normalize(path).into_owned());
    }

    /// Undo [`MemoryVfs::lock`].
    pub fn unlock(&mut self, path: &str) {
        self.locked.remove(normalize(path).as_ref());
    }

    fn is_locked(&self, path: &str) -> bool {
        self.locked.contains(path)
    }

    /// Resolve a path through symlinks at its final component.
    ///
    /// Returns the real path and node, or `None` for missing paths, dangling
    /// links and link chains longer than [`MAX_LINK_DEPTH`].
    fn follow(&self, path: &str) -> Option<(String, &Node)> {
        let mut current = normalize(path).into_owned();
        for _ in 0..=MAX_LINK_DEPTH {
            match self.nodes.get(&current)? {
                Node::Symlink { target, .. } => {
                    current = if target.starts_with('/') {
                        normalize(target).into_owned()
                    } else {
                        normalize(&format!("{}/{target}", parent(&current))).into_owned()
                    };
                },
                node => return Some((current, node)),
            }
        }
        None
    }

    fn require_parent_dir(&self, path: &str) -> Result<()> {
        let par = parent(path);
        match self.nodes.get(par) {
            Some(Node::Dir { .. }) => Ok(()),
            Some(_) => Err(ShellError::NotADirectory(par.to_string())),
            None => Err(ShellError::NotFound(par.to_string())),
        }
    }
}

impl Default for MemoryVfs {
    fn default() -> Self {
        Self::new()
    }
}

fn is_a_directory(path: &str) -> ShellError {
    ShellError::Io(io::Error::new(
        io::ErrorKind::IsADirectory,
        format!("is a directory: {path}"),
    ))
}

/// Check whether a path is already in normal form (starts with `/`, no `//`,
/// no trailing `/` unless root).
fn is_normalized(path: &str) -> bool {
    if !path.starts_with('/') {
        return false;
    }
    if path.len() > 1 && path.ends_with('/') {
        return false;
    }
    !path.contains("//")
}

/// Normalize a path: ensure leading `/`, collapse `//`, strip trailing `/`
/// (except for root). Returns the input unchanged (zero-alloc) when already
/// in normal form.
fn normalize(path: &str) -> Cow<'_, str> {
    if is_normalized(path) {
        return Cow::Borrowed(path);
    }
    let path_str = if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    };
    let mut result = String::with_capacity(path_str.len());
    let mut prev_slash = false;
    for ch in path_str.chars() {
        if ch == '/' {
            if !prev_slash {
                result.push(ch);
            }
            prev_slash = true;
        } else {
            result.push(ch);
            prev_slash = false;
        }
    }
    if result.len() > 1 && result.ends_with('/') {
        result.pop();
    }
    Cow::Owned(result)
}

/// Return the parent of a normalized path.
fn parent(path: &str) -> &str {
    if path == "/" {
        return "/";
    }
    match path.rfind('/') {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => "/",
    }
}

impl Vfs for MemoryVfs {
    fn readdir(&self, path: &str) -> Result<Vec<VfsEntry>> {
        let (real, node) = self
            .follow(path)
            .ok_or_else(|| ShellError::NotFound(normalize(path).into_owned()))?;
        if !matches!(node, Node::Dir { .. }) {
            return Err(ShellError::NotADirectory(real));
        }
        if self.is_locked(&real) {
            return Err(ShellError::PermissionDenied(real));
        }

        let prefix = if real == "/" {
            "/".to_string()
        } else {
            format!("{real}/")
        };

        let mut entries = Vec::new();
        for (key, node) in self.nodes.range(prefix.clone()..) {
            if !key.starts_with(&prefix) {
                break;
            }
            // Direct child only: non-empty name with no `/` after the prefix.
            let rest = &key[prefix.len()..];
            if rest.is_empty() || rest.contains('/') {
                continue;
            }
            let is_dir = match node {
                Node::Dir { .. } => true,
                Node::Symlink { .. } => {
                    matches!(self.follow(key), Some((_, Node::Dir { .. })))
                },
                Node::File { .. } => false,
            };
            entries.push(VfsEntry {
                name: rest.to_string(),
                kind: if is_dir {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                },
            });
        }
        Ok(entries)
    }

    fn stat(&self, path: &str) -> Result<VfsMetadata> {
        let path = normalize(path);
        let node = self
            .nodes
            .get(path.as_ref())
            .ok_or_else(|| ShellError::NotFound(path.to_string()))?;
        let kind = match node {
            Node::Symlink { .. } => EntryKind::Symlink,
            Node::File { .. } => EntryKind::File,
            Node::Dir { .. } => EntryKind::Directory,
        };
        let (real, target) = match self.follow(&path) {
            Some(found) => found,
            // Dangling link: report the link itself.
            None => (path.to_string(), node),
        };
        let (size, executable) = match target {
            Node::File {
                data, executable, ..
            } => (data.len() as u64, *executable && !self.is_locked(&real)),
            Node::Dir { .. } => (0, !self.is_locked(&real)),
            Node::Symlink { target, .. } => (target.len() as u64, false),
        };
        Ok(VfsMetadata {
            kind,
            size,
            uid: MEMORY_UID,
            modified: target.modified(),
            executable,
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.follow(path).is_some()
    }

    fn is_file(&self, path: &str) -> bool {
        matches!(self.follow(path), Some((_, Node::File { .. })))
    }

    fn is_dir(&self, path: &str) -> bool {
        matches!(self.follow(path), Some((_, Node::Dir { .. })))
    }

    fn remove_file(&mut self, path: &str) -> Result<()> {
        let path = normalize(path);
        match self.nodes.get(path.as_ref()) {
            Some(Node::Dir { .. }) => return Err(is_a_directory(&path)),
            Some(_) => {},
            None => return Err(ShellError::NotFound(path.into_owned())),
        }
        if self.is_locked(&path) || self.is_locked(parent(&path)) {
            return Err(ShellError::PermissionDenied(path.into_owned()));
        }
        self.nodes.remove(path.as_ref());
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let from = normalize(from).into_owned();
        let to = normalize(to).into_owned();
        if !self.nodes.contains_key(&from) {
            return Err(ShellError::NotFound(from));
        }
        self.require_parent_dir(&to)?;
        if self.is_locked(parent(&from)) || self.is_locked(parent(&to)) {
            return Err(ShellError::PermissionDenied(from));
        }
        if from == to {
            return Ok(());
        }
        if let Some(Node::Dir { .. }) = self.nodes.get(&to) {
            return Err(is_a_directory(&to));
        }
        let child_prefix = format!("{from}/");
        if to.starts_with(&child_prefix) {
            return Err(ShellError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot move {from} into itself"),
            )));
        }

        // Move the node and, for directories, everything beneath it.
        let moved: Vec<String> = self
            .nodes
            .range(from.clone()..)
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(from.as_str()))
            .filter(|k| **k == from || k.starts_with(&child_prefix))
            .cloned()
            .collect();
        for key in moved {
            if let Some(node) = self.nodes.remove(&key) {
                let new_key = format!("{to}{}", &key[from.len()..]);
                self.nodes.insert(new_key, node);
            }
        }
        Ok(())
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        let path = normalize(path);
        if self.nodes.contains_key(path.as_ref()) {
            return Err(ShellError::AlreadyExists(path.into_owned()));
        }
        self.require_parent_dir(&path)?;
        if self.is_locked(parent(&path)) {
            return Err(ShellError::PermissionDenied(path.into_owned()));
        }
        let node = Node::Dir {
            modified: self.clock,
        };
        self.nodes.insert(path.into_owned(), node);
        Ok(())
    }

    fn check_enter(&self, path: &str) -> Result<()> {
        match self.follow(path) {
            Some((real, Node::Dir { .. })) => {
                if self.is_locked(&real) {
                    Err(ShellError::PermissionDenied(real))
                } else {
                    Ok(())
                }
            },
            Some((real, _)) => Err(ShellError::NotADirectory(real)),
            None => Err(ShellError::NotFound(normalize(path).into_owned())),
        }
    }
}
