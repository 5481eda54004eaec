//! Filesystem entry snapshots.
//!
//! An [`Entry`] captures the metadata of one filesystem node at the moment it
//! was observed. Entries are immutable: a later change to the underlying node
//! is never reflected in an already-yielded snapshot.

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::errors::{FinderError, FinderResult};

/// The kind of a snapshotted entry.
///
/// A symbolic link that is not followed reports [`EntryKind::Other`], the
/// same way `find -type f` does not match symlinks without `-L`. When link
/// following is enabled the kind describes the link target instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Dir,

    /// Anything else (symlinks not followed, pipes, sockets, devices).
    Other,
}

/// Immutable metadata snapshot of one filesystem node.
#[derive(Debug, Clone)]
pub struct Entry {
    path: PathBuf,
    name: String,
    parent: PathBuf,
    kind: EntryKind,
    size: u64,
    modified: SystemTime,
    changed: SystemTime,
    accessed: SystemTime,
    permissions: u32,
    readable: bool,
}

impl Entry {
    /// Snapshot a single node without following symlinks.
    ///
    /// Relative paths are resolved against the current working directory so
    /// the snapshot always carries an absolute path.
    pub fn snapshot(path: impl AsRef<Path>) -> FinderResult<Self> {
        let path = absolutize(path.as_ref())?;
        let metadata = fs::symlink_metadata(&path).map_err(|e| FinderError::io(&path, e))?;
        Ok(Self::build(path, &metadata))
    }

    /// Snapshot a node yielded by the walker.
    ///
    /// Metadata is taken through `DirEntry::metadata`, which follows the
    /// symlink exactly when the walk itself was configured to follow links.
    pub(crate) fn from_walk(entry: &walkdir::DirEntry) -> FinderResult<Self> {
        let metadata = entry.metadata()?;
        Ok(Self::build(entry.path().to_path_buf(), &metadata))
    }

    fn build(path: PathBuf, metadata: &Metadata) -> Self {
        let kind = if metadata.file_type().is_dir() {
            EntryKind::Dir
        } else if metadata.file_type().is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let readable = probe_readable(&path, kind, metadata);

        Self {
            name,
            parent,
            kind,
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            changed: status_changed(metadata),
            accessed: metadata.accessed().unwrap_or(SystemTime::UNIX_EPOCH),
            permissions: permission_bits(metadata),
            readable,
            path,
        }
    }

    /// Absolute path of the node.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Basename of the node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the containing directory.
    pub fn parent(&self) -> &Path {
        &self.parent
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Last modification time.
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Last status-change time (falls back to the modification time on
    /// platforms without a ctime).
    pub fn changed(&self) -> SystemTime {
        self.changed
    }

    /// Last access time.
    pub fn accessed(&self) -> SystemTime {
        self.accessed
    }

    /// Permission bits (the low mode bits on Unix, a synthesized
    /// read-only/read-write value elsewhere).
    pub fn permissions(&self) -> u32 {
        self.permissions
    }

    /// Whether the node was readable when snapshotted.
    ///
    /// Directories are probed with `read_dir` and regular files with `open`;
    /// other kinds report the permission-bit approximation since opening a
    /// FIFO would block.
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Extension of the basename, if any.
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }

    /// Full path with separators normalized to `/`, the form every
    /// path-pattern rule matches against.
    pub fn normalized_path(&self) -> String {
        normalize_slashes(&self.path)
    }
}

/// Render a path with forward slashes regardless of host separator.
pub(crate) fn normalize_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolve a possibly-relative path against the current working directory
/// and collapse `.` components and redundant separators.
pub(crate) fn absolutize(path: &Path) -> FinderResult<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| FinderError::io(path, e))?;
        cwd.join(path)
    };
    Ok(joined.components().collect())
}

fn probe_readable(path: &Path, kind: EntryKind, metadata: &Metadata) -> bool {
    match kind {
        EntryKind::Dir => fs::read_dir(path).is_ok(),
        EntryKind::File => fs::File::open(path).is_ok(),
        EntryKind::Other => permission_bits(metadata) & 0o444 != 0,
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

#[cfg(unix)]
fn status_changed(metadata: &Metadata) -> SystemTime {
    use std::os::unix::fs::MetadataExt;
    let secs = metadata.ctime();
    if secs >= 0 {
        SystemTime::UNIX_EPOCH + Duration::new(secs as u64, metadata.ctime_nsec() as u32)
    } else {
        SystemTime::UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs())
    }
}

#[cfg(not(unix))]
fn status_changed(metadata: &Metadata) -> SystemTime {
    metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH)
}
