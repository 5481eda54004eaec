//! Options for directory traversal
//!
//! This module provides options for configuring the traversal process.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Directory names dropped into a tree by version control systems and
/// desktop tooling. They are excluded by default and can be restored with
/// `ignore_vcs(false)`.
pub const VCS_EXCLUDES: [&str; 6] = [".svn", ".cvs", ".idea", ".DS_Store", ".git", ".hg"];

/// Which entry kinds a search yields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalMode {
    /// Yield every entry kind
    Any,

    /// Yield only entries that are not directories
    FilesOnly,

    /// Yield only directories
    DirectoriesOnly,
}

impl Default for TraversalMode {
    fn default() -> Self {
        TraversalMode::Any
    }
}

/// Options for configuring the traversal process
#[derive(Debug, Clone)]
pub struct FinderOptions {
    /// Directories the search starts from
    pub roots: Vec<PathBuf>,

    /// Basenames pruned from the walk
    pub excluded_names: BTreeSet<String>,

    /// Which entry kinds are yielded
    pub mode: TraversalMode,

    /// Maximum depth relative to each root, `-1` meaning unbounded
    pub max_depth: i64,

    /// Whether to follow symbolic links
    pub follow_links: bool,

    /// Whether entries whose name starts with a dot are pruned
    pub skip_dots: bool,

    /// Whether the built-in VCS names join the exclusion set
    pub ignore_vcs: bool,

    /// Whether unreadable directories are dropped from the results
    pub ignore_unreadable_dirs: bool,
}

impl FinderOptions {
    /// Create a new FinderOptions with default values
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            excluded_names: BTreeSet::new(),
            mode: TraversalMode::Any,
            max_depth: -1,
            follow_links: false,
            skip_dots: true,
            ignore_vcs: true,
            ignore_unreadable_dirs: true,
        }
    }

    /// Set the maximum depth to search
    ///
    /// Values below `-1` are coerced to `-1`.
    pub fn with_max_depth(mut self, max_depth: i64) -> Self {
        self.max_depth = max_depth.max(-1);
        self
    }

    /// Set which entry kinds are yielded
    pub fn with_mode(mut self, mode: TraversalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Set whether dot entries are pruned
    pub fn with_skip_dots(mut self, skip: bool) -> Self {
        self.skip_dots = skip;
        self
    }

    /// Set whether the built-in VCS names are excluded
    pub fn with_ignore_vcs(mut self, ignore: bool) -> Self {
        self.ignore_vcs = ignore;
        self
    }

    /// Set whether unreadable directories are dropped from the results
    pub fn with_ignore_unreadable_dirs(mut self, ignore: bool) -> Self {
        self.ignore_unreadable_dirs = ignore;
        self
    }

    /// Add a search root, ignoring exact duplicates
    pub fn add_root(&mut self, root: PathBuf) {
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
    }

    /// Add a basename to the exclusion set
    pub fn add_exclude(&mut self, name: impl Into<String>) {
        self.excluded_names.insert(name.into());
    }

    /// The exclusion set a walk actually uses: the user-supplied names plus
    /// the VCS names while `ignore_vcs` is on.
    ///
    /// The set is computed per call, so toggling `ignore_vcs` later never
    /// leaves stale names behind.
    pub fn effective_excludes(&self) -> BTreeSet<String> {
        let mut set = self.excluded_names.clone();
        if self.ignore_vcs {
            set.extend(VCS_EXCLUDES.iter().map(|s| s.to_string()));
        }
        set
    }
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finder_options_defaults() {
        let options = FinderOptions::new();
        assert!(options.roots.is_empty());
        assert!(options.excluded_names.is_empty());
        assert_eq!(options.mode, TraversalMode::Any);
        assert_eq!(options.max_depth, -1);
        assert_eq!(options.follow_links, false);
        assert_eq!(options.skip_dots, true);
        assert_eq!(options.ignore_vcs, true);
        assert_eq!(options.ignore_unreadable_dirs, true);
    }

    #[test]
    fn test_finder_options_with_max_depth() {
        let options = FinderOptions::new().with_max_depth(3);
        assert_eq!(options.max_depth, 3);
    }

    #[test]
    fn test_finder_options_coerces_negative_depth() {
        let options = FinderOptions::new().with_max_depth(-42);
        assert_eq!(options.max_depth, -1);
    }

    #[test]
    fn test_add_root_skips_duplicates() {
        let mut options = FinderOptions::new();
        options.add_root(PathBuf::from("/tmp/a"));
        options.add_root(PathBuf::from("/tmp/b"));
        options.add_root(PathBuf::from("/tmp/a"));
        assert_eq!(options.roots.len(), 2);
    }

    #[test]
    fn test_effective_excludes_includes_vcs_by_default() {
        let mut options = FinderOptions::new();
        options.add_exclude("target");

        let excludes = options.effective_excludes();
        assert!(excludes.contains("target"));
        assert!(excludes.contains(".git"));
        assert!(excludes.contains(".svn"));
        assert!(excludes.contains(".DS_Store"));
    }

    #[test]
    fn test_effective_excludes_without_vcs() {
        let mut options = FinderOptions::new().with_ignore_vcs(false);
        options.add_exclude("target");

        let excludes = options.effective_excludes();
        assert!(excludes.contains("target"));
        assert!(!excludes.contains(".git"));
    }
}
