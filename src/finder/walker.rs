//! 文件系统遍历功能
//!
//! 本模块提供按规则遍历目录树并收集条目快照的功能。遍历总是前序且
//! 确定性的：同一目录下的条目按文件名排序访问。

use std::collections::BTreeSet;
use std::path::Path;

use log::debug;
use walkdir::{DirEntry, WalkDir};

use crate::entry::Entry;
use crate::finder::filter::Predicate;
use crate::finder::options::{FinderOptions, TraversalMode};

/// 使用给定选项和规则遍历目录树
pub struct TreeWalker<'a> {
    options: &'a FinderOptions,
    excludes: &'a BTreeSet<String>,
    predicates: &'a [Predicate],
}

impl<'a> TreeWalker<'a> {
    /// 创建新的 TreeWalker
    pub fn new(
        options: &'a FinderOptions,
        excludes: &'a BTreeSet<String>,
        predicates: &'a [Predicate],
    ) -> Self {
        Self {
            options,
            excludes,
            predicates,
        }
    }

    /// 从给定根目录开始遍历，返回通过全部规则的条目
    ///
    /// 根目录本身不会出现在结果中。作为根给出的符号链接总是被进入，
    /// `follow_links` 只约束根以下遇到的链接。根目录不存在时返回空结果，
    /// 遍历过程中的瞬时 I/O 错误只会跳过对应条目。
    pub fn walk(&self, root: &Path) -> Vec<Entry> {
        if !root.is_dir() {
            debug!("skipping missing root {}", root.display());
            return Vec::new();
        }

        let mut entries = Vec::new();
        for result in self.init_walker(root).into_iter().filter_entry(|e| self.should_visit(e)) {
            let dir_entry = match result {
                Ok(dir_entry) => dir_entry,
                Err(err) => {
                    debug!("skipping unreadable entry: {}", err);
                    continue;
                }
            };
            // 根目录本身不计入结果
            if dir_entry.depth() == 0 {
                continue;
            }

            let entry = match Entry::from_walk(&dir_entry) {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("skipping entry without metadata: {}", err);
                    continue;
                }
            };
            if self.keep(&entry) {
                entries.push(entry);
            }
        }

        entries
    }

    /// 使用配置的选项初始化目录遍历器
    fn init_walker(&self, root: &Path) -> WalkDir {
        // 根链接总是进入，follow_links 只作用于根以下的链接
        let mut walker = WalkDir::new(root)
            .follow_root_links(true)
            .follow_links(self.options.follow_links)
            .sort_by_file_name();

        if self.options.max_depth >= 0 {
            walker = walker.max_depth(self.options.max_depth as usize + 1);
        }

        walker
    }

    /// 判断条目是否进入遍历
    ///
    /// 被排除的名称和以点开头的名称会剪掉整个子树。
    fn should_visit(&self, dir_entry: &DirEntry) -> bool {
        if dir_entry.depth() == 0 {
            return true;
        }

        let name = dir_entry.file_name().to_string_lossy();
        if self.excludes.contains(name.as_ref()) {
            return false;
        }
        if self.options.skip_dots && name.starts_with('.') {
            return false;
        }

        true
    }

    /// 判断条目是否进入结果
    fn keep(&self, entry: &Entry) -> bool {
        // 不可读目录仅从结果中剔除，其子树仍会尝试遍历
        if entry.is_dir() && self.options.ignore_unreadable_dirs && !entry.is_readable() {
            return false;
        }

        let mode_ok = match self.options.mode {
            TraversalMode::Any => true,
            TraversalMode::FilesOnly => !entry.is_dir(),
            TraversalMode::DirectoriesOnly => entry.is_dir(),
        };
        if !mode_ok {
            return false;
        }

        self.predicates.iter().all(|predicate| predicate(entry))
    }
}
