//! Sort key comparators
//!
//! Each function builds one comparison key over [`Entry`]. Keys are applied
//! as successive stable sort passes, so the most recently added key becomes
//! the primary order and earlier keys break its ties.

use std::cmp::Ordering;

use crate::entry::{Entry, EntryKind};

/// A boxed comparison key over two entries.
pub type Comparator = Box<dyn Fn(&Entry, &Entry) -> Ordering + Send + Sync>;

/// Compare by basename.
pub fn by_name() -> Comparator {
    Box::new(|a, b| a.name().cmp(b.name()))
}

/// Compare by kind: directories first, then files, then everything else.
pub fn by_kind() -> Comparator {
    Box::new(|a, b| kind_rank(a.kind()).cmp(&kind_rank(b.kind())))
}

/// Compare by size in bytes.
pub fn by_size() -> Comparator {
    Box::new(|a, b| a.size().cmp(&b.size()))
}

/// Compare by extension; entries without one sort first.
pub fn by_extension() -> Comparator {
    Box::new(|a, b| a.extension().cmp(&b.extension()))
}

/// Compare by full path.
pub fn by_path() -> Comparator {
    Box::new(|a, b| a.path().cmp(b.path()))
}

/// Compare by permission bits.
pub fn by_permissions() -> Comparator {
    Box::new(|a, b| a.permissions().cmp(&b.permissions()))
}

/// Compare by last access time.
pub fn by_accessed() -> Comparator {
    Box::new(|a, b| a.accessed().cmp(&b.accessed()))
}

/// Compare by last modification time.
pub fn by_modified() -> Comparator {
    Box::new(|a, b| a.modified().cmp(&b.modified()))
}

/// Compare by last status-change time.
pub fn by_changed() -> Comparator {
    Box::new(|a, b| a.changed().cmp(&b.changed()))
}

fn kind_rank(kind: EntryKind) -> u8 {
    match kind {
        EntryKind::Dir => 0,
        EntryKind::File => 1,
        EntryKind::Other => 2,
    }
}
