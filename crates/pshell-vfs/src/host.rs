//! Host filesystem backend.
//!
//! Thin wrapper over `std::fs`. Execute/search permission is checked with
//! `access(2)` so the answer reflects the real uid of this process.

use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use nix::errno::Errno;
use nix::unistd::{AccessFlags, access};
use pshell_types::error::{Result, ShellError};

use crate::{EntryKind, Vfs, VfsEntry, VfsMetadata};

/// The real filesystem of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostVfs;

impl HostVfs {
    pub fn new() -> Self {
        Self
    }
}

fn can_execute(path: &str) -> std::result::Result<(), Errno> {
    access(path, AccessFlags::X_OK)
}

impl Vfs for HostVfs {
    fn readdir(&self, path: &str) -> Result<Vec<VfsEntry>> {
        let dir = fs::read_dir(path).map_err(|e| ShellError::from_io(e, path))?;
        let mut entries = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|e| ShellError::from_io(e, path))?;
            let kind = if entry.path().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(VfsEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        Ok(entries)
    }

    fn stat(&self, path: &str) -> Result<VfsMetadata> {
        let link_meta = fs::symlink_metadata(path).map_err(|e| ShellError::from_io(e, path))?;
        let file_type = link_meta.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::Other
        };
        // A dangling link still has metadata of its own.
        let meta = match fs::metadata(path) {
            Ok(m) => m,
            Err(_) => link_meta,
        };
        Ok(VfsMetadata {
            kind,
            size: meta.len(),
            uid: meta.uid(),
            modified: meta.mtime(),
            executable: can_execute(path).is_ok(),
        })
    }

    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn is_file(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn is_dir(&self, path: &str) -> bool {
        Path::new(path).is_dir()
    }

    fn remove_file(&mut self, path: &str) -> Result<()> {
        fs::remove_file(path).map_err(|e| ShellError::from_io(e, path))
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if e.raw_os_error() == Some(Errno::EXDEV as i32) => {
                log::debug!("rename {from} -> {to} crosses devices, copying");
                fs::copy(from, to).map_err(|e| ShellError::from_io(e, to))?;
                fs::remove_file(from).map_err(|e| ShellError::from_io(e, from))
            },
            Err(e) => Err(ShellError::from_io(e, from)),
        }
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        fs::create_dir(path).map_err(|e| ShellError::from_io(e, path))
    }

    fn check_enter(&self, path: &str) -> Result<()> {
        let meta = fs::metadata(path).map_err(|e| ShellError::from_io(e, path))?;
        if !meta.is_dir() {
            return Err(ShellError::NotADirectory(path.to_string()));
        }
        can_execute(path).map_err(|errno| ShellError::from_io(io::Error::from(errno), path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::{PermissionsExt, symlink};
    use tempfile::TempDir;

    fn setup() -> (TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_string_lossy().into_owned();
        (dir, root)
    }

    #[test]
    fn readdir_classifies_entries() {
        let (_guard, root) = setup();
        fs::write(format!("{root}/a.txt"), b"hi").unwrap();
        fs::create_dir(format!("{root}/sub")).unwrap();
        let mut entries = HostVfs.readdir(&root).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].name, "sub");
        assert_eq!(entries[1].kind, EntryKind::Directory);
    }

    #[test]
    fn readdir_empty() {
        let (_guard, root) = setup();
        assert!(HostVfs.readdir(&root).unwrap().is_empty());
    }

    #[test]
    fn readdir_missing_is_not_found() {
        let (_guard, root) = setup();
        let err = HostVfs.readdir(&format!("{root}/nope")).unwrap_err();
        assert!(matches!(err, ShellError::NotFound(_)));
    }

    #[test]
    fn stat_regular_file() {
        let (_guard, root) = setup();
        let path = format!("{root}/data.bin");
        fs::write(&path, [0u8; 42]).unwrap();
        let meta = HostVfs.stat(&path).unwrap();
        assert_eq!(meta.kind, EntryKind::File);
        assert_eq!(meta.size, 42);
        assert_eq!(meta.uid, fs::metadata(&path).unwrap().uid());
        assert!(meta.modified > 0);
    }

    #[test]
    fn stat_keeps_mtime_before_epoch() {
        use std::time::{Duration, UNIX_EPOCH};

        let (_guard, root) = setup();
        let path = format!("{root}/old.txt");
        let file = fs::File::create(&path).unwrap();
        // 1960-03-04 05:06:07 UTC
        file.set_modified(UNIX_EPOCH - Duration::from_secs(310_157_633))
            .unwrap();
        drop(file);
        assert_eq!(HostVfs.stat(&path).unwrap().modified, -310_157_633);
    }

    #[test]
    fn stat_executable_bit() {
        let (_guard, root) = setup();
        let path = format!("{root}/run.sh");
        fs::write(&path, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(HostVfs.stat(&path).unwrap().executable);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!HostVfs.stat(&path).unwrap().executable);
    }

    #[test]
    fn stat_symlink_is_classified_first() {
        let (_guard, root) = setup();
        fs::create_dir(format!("{root}/target")).unwrap();
        let link = format!("{root}/link");
        symlink(format!("{root}/target"), &link).unwrap();
        assert_eq!(HostVfs.stat(&link).unwrap().kind, EntryKind::Symlink);
        assert!(HostVfs.is_dir(&link));
    }

    #[test]
    fn dangling_link_does_not_exist() {
        let (_guard, root) = setup();
        let link = format!("{root}/dangling");
        symlink(format!("{root}/gone"), &link).unwrap();
        assert!(!HostVfs.exists(&link));
        assert_eq!(HostVfs.stat(&link).unwrap().kind, EntryKind::Symlink);
    }

    #[test]
    fn remove_file_then_gone() {
        let (_guard, root) = setup();
        let path = format!("{root}/x");
        fs::write(&path, b"x").unwrap();
        let mut vfs = HostVfs::new();
        vfs.remove_file(&path).unwrap();
        assert!(!vfs.exists(&path));
        let err = vfs.remove_file(&path).unwrap_err();
        assert!(matches!(err, ShellError::NotFound(_)));
    }

    #[test]
    fn remove_file_refuses_directory() {
        let (_guard, root) = setup();
        let path = format!("{root}/dir");
        fs::create_dir(&path).unwrap();
        let err = HostVfs.remove_file(&path).unwrap_err();
        assert!(matches!(err, ShellError::Io(_)));
        assert!(Path::new(&path).is_dir());
    }

    #[test]
    fn rename_into_directory() {
        let (_guard, root) = setup();
        let src = format!("{root}/f.txt");
        fs::write(&src, b"payload").unwrap();
        fs::create_dir(format!("{root}/dst")).unwrap();
        let dst = format!("{root}/dst/f.txt");
        HostVfs.rename(&src, &dst).unwrap();
        assert!(!Path::new(&src).exists());
        assert_eq!(fs::read(&dst).unwrap(), b"payload");
    }

    #[test]
    fn mkdir_twice_reports_already_exists() {
        let (_guard, root) = setup();
        let path = format!("{root}/new");
        let mut vfs = HostVfs;
        vfs.mkdir(&path).unwrap();
        let err = vfs.mkdir(&path).unwrap_err();
        assert!(matches!(err, ShellError::AlreadyExists(_)));
    }

    #[test]
    fn mkdir_without_parent_is_not_found() {
        let (_guard, root) = setup();
        let err = HostVfs.mkdir(&format!("{root}/a/b")).unwrap_err();
        assert!(matches!(err, ShellError::NotFound(_)));
    }

    #[test]
    fn check_enter_classifies() {
        let (_guard, root) = setup();
        fs::write(format!("{root}/file"), b"").unwrap();
        assert!(HostVfs.check_enter(&root).is_ok());
        assert!(matches!(
            HostVfs.check_enter(&format!("{root}/missing")),
            Err(ShellError::NotFound(_))
        ));
        assert!(matches!(
            HostVfs.check_enter(&format!("{root}/file")),
            Err(ShellError::NotADirectory(_))
        ));
    }
}
