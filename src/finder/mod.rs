//! 文件查找模块
//!
//! 本模块提供基于规则组合的文件系统查找功能,
//! 包括流式构建器、内置匹配规则和多键排序机制。

pub mod compare;
pub mod filter;
pub mod options;
mod time;
pub mod walker;

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use glob::glob;
use log::{debug, info, warn};

use crate::entry::{absolutize, Entry};
use crate::errors::{FinderError, FinderResult};

pub use self::compare::Comparator;
pub use self::filter::Predicate;
pub use self::options::{FinderOptions, TraversalMode, VCS_EXCLUDES};
pub use self::walker::TreeWalker;

/// 文件查找器
///
/// 通过流式构建器累积根目录、匹配规则与排序键,
/// 调用 [`Finder::find`] 时执行一次确定性的前序遍历。
pub struct Finder {
    options: FinderOptions,
    predicates: Vec<Predicate>,
    comparators: Vec<Comparator>,
}

impl Finder {
    /// 创建新的文件查找器实例
    pub fn new() -> Self {
        Self {
            options: FinderOptions::new(),
            predicates: Vec::new(),
            comparators: Vec::new(),
        }
    }

    /// 只返回非目录条目
    pub fn files(mut self) -> Self {
        self.options = self.options.with_mode(TraversalMode::FilesOnly);
        self
    }

    /// 只返回目录条目
    pub fn directories(mut self) -> Self {
        self.options = self.options.with_mode(TraversalMode::DirectoriesOnly);
        self
    }

    /// 添加搜索根目录
    ///
    /// 已存在的目录直接成为根;其他字符串按 glob 模式展开,
    /// 仅目录匹配项成为根。指向目录的符号链接也可以作为根,
    /// 无论 [`Finder::follow_links`] 如何设置,遍历时总会进入其目标。
    /// 非法模式与无匹配不会报错,只会记录日志。根目录按规范化路径去重。
    pub fn within(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.is_dir() {
            self.push_root(path);
            return self;
        }

        let pattern = path.to_string_lossy();
        match glob(&pattern) {
            Ok(matches) => {
                for matched in matches {
                    match matched {
                        Ok(candidate) if candidate.is_dir() => self.push_root(&candidate),
                        Ok(_) => {}
                        Err(err) => debug!("skipping unreadable glob match: {}", err),
                    }
                }
            }
            Err(err) => warn!("malformed root pattern '{}': {}", pattern, err),
        }

        self
    }

    fn push_root(&mut self, path: &Path) {
        match absolutize(path) {
            Ok(root) => self.options.add_root(root),
            Err(err) => warn!("cannot resolve root {}: {}", path.display(), err),
        }
    }

    /// 排除指定名称的条目及其整个子树
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.options.add_exclude(name);
        self
    }

    /// 设置是否从结果中剔除不可读目录
    pub fn ignore_unreadable_dirs(mut self, ignore: bool) -> Self {
        self.options = self.options.with_ignore_unreadable_dirs(ignore);
        self
    }

    /// 设置是否跟随符号链接
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.options = self.options.with_follow_links(follow);
        self
    }

    /// 设置是否跳过以点开头的条目
    pub fn ignore_dots(mut self, ignore: bool) -> Self {
        self.options = self.options.with_skip_dots(ignore);
        self
    }

    /// 设置是否排除版本控制系统目录
    pub fn ignore_vcs(mut self, ignore: bool) -> Self {
        self.options = self.options.with_ignore_vcs(ignore);
        self
    }

    /// 设置最大搜索深度,`-1` 表示不限制
    ///
    /// 深度 0 表示根目录的直接子条目。
    pub fn depth(mut self, max_depth: i64) -> Self {
        self.options = self.options.with_max_depth(max_depth);
        self
    }

    /// 按名称保留条目
    ///
    /// 模式依次按精确、glob、正则三种方式匹配文件名,任一命中即保留。
    pub fn name(mut self, pattern: &str) -> Self {
        self.predicates.push(filter::name_rule(pattern, true));
        self
    }

    /// 按名称排除条目
    pub fn not_name(mut self, pattern: &str) -> Self {
        self.predicates.push(filter::name_rule(pattern, false));
        self
    }

    /// [`Finder::name`] 的忽略大小写版本
    pub fn iname(mut self, pattern: &str) -> Self {
        self.predicates.push(filter::iname_rule(pattern, true));
        self
    }

    /// [`Finder::not_name`] 的忽略大小写版本
    pub fn not_iname(mut self, pattern: &str) -> Self {
        self.predicates.push(filter::iname_rule(pattern, false));
        self
    }

    /// 保留内容匹配模式的文件
    ///
    /// 目录、空文件与不可读文件永远不匹配。
    pub fn contains(mut self, pattern: &str) -> Self {
        self.predicates.push(filter::contains_rule(pattern, true));
        self
    }

    /// 排除内容匹配模式的文件
    pub fn not_contains(mut self, pattern: &str) -> Self {
        self.predicates.push(filter::contains_rule(pattern, false));
        self
    }

    /// 保留完整路径匹配模式的条目
    pub fn with_path(mut self, pattern: &str) -> Self {
        self.predicates.push(filter::path_rule(pattern, true));
        self
    }

    /// 排除完整路径匹配模式的条目
    pub fn without_path(mut self, pattern: &str) -> Self {
        self.predicates.push(filter::path_rule(pattern, false));
        self
    }

    /// 保留状态变更时间不早于给定日期的条目
    ///
    /// 支持 RFC 3339、`YYYY-MM-DD HH:MM:SS`、`YYYY-MM-DD`
    /// 以及 `2d`、`36h` 等相对写法。
    pub fn date(mut self, value: &str) -> Self {
        self.predicates.push(filter::date_rule(value));
        self
    }

    /// 保留大小不小于给定字节数的条目
    pub fn size(mut self, min: u64) -> Self {
        self.predicates.push(filter::size_rule(min));
        self
    }

    /// 追加自定义匹配规则
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Entry) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// 追加自定义排序键
    ///
    /// 排序键按添加顺序依次稳定排序,最后添加者成为主序,
    /// 之前的键只决定并列条目的先后。
    pub fn sort<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&Entry, &Entry) -> Ordering + Send + Sync + 'static,
    {
        self.comparators.push(Box::new(comparator));
        self
    }

    /// 按文件名排序
    pub fn sort_by_name(mut self) -> Self {
        self.comparators.push(compare::by_name());
        self
    }

    /// 按类型排序,目录在前
    pub fn sort_by_kind(mut self) -> Self {
        self.comparators.push(compare::by_kind());
        self
    }

    /// 按大小排序
    pub fn sort_by_size(mut self) -> Self {
        self.comparators.push(compare::by_size());
        self
    }

    /// 按扩展名排序
    pub fn sort_by_extension(mut self) -> Self {
        self.comparators.push(compare::by_extension());
        self
    }

    /// 按完整路径排序
    pub fn sort_by_path(mut self) -> Self {
        self.comparators.push(compare::by_path());
        self
    }

    /// 按权限位排序
    pub fn sort_by_permissions(mut self) -> Self {
        self.comparators.push(compare::by_permissions());
        self
    }

    /// 按访问时间排序
    pub fn sort_by_accessed(mut self) -> Self {
        self.comparators.push(compare::by_accessed());
        self
    }

    /// 按修改时间排序
    pub fn sort_by_modified(mut self) -> Self {
        self.comparators.push(compare::by_modified());
        self
    }

    /// 按状态变更时间排序
    pub fn sort_by_changed(mut self) -> Self {
        self.comparators.push(compare::by_changed());
        self
    }

    /// 合并其他来源的根目录
    ///
    /// 来源可以是另一个查找器、路径集合或字符串集合,路径按原样
    /// 作为根目录加入(不做 glob 展开)。包含空路径时返回
    /// [`FinderError::InvalidInput`]。
    pub fn merge(mut self, source: impl Into<MergeSource>) -> FinderResult<Self> {
        for path in source.into().paths {
            if path.as_os_str().is_empty() {
                return Err(FinderError::InvalidInput(
                    "cannot merge an empty path".to_string(),
                ));
            }
            let root = absolutize(&path)?;
            self.options.add_root(root);
        }
        Ok(self)
    }

    /// 执行查找并返回排序后的条目
    ///
    /// 每次调用都重新遍历:先计算生效的排除集合,按添加顺序遍历
    /// 各根目录,连接结果后依次应用排序键。不存在的根目录贡献零条目。
    pub fn find(&self) -> Vec<Entry> {
        info!(
            "searching {} root(s) with {} rule(s)",
            self.options.roots.len(),
            self.predicates.len()
        );

        let excludes = self.options.effective_excludes();
        let walker = TreeWalker::new(&self.options, &excludes, &self.predicates);

        let mut entries = Vec::new();
        for root in &self.options.roots {
            entries.extend(walker.walk(root));
        }

        for comparator in &self.comparators {
            entries.sort_by(|a, b| comparator(a, b));
        }

        entries
    }

    /// 返回一次查找的条目数量
    pub fn count(&self) -> usize {
        self.find().len()
    }

    /// 当前累积的根目录
    pub fn roots(&self) -> &[PathBuf] {
        &self.options.roots
    }
}

impl Default for Finder {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Finder::merge`] 接受的根目录来源
pub struct MergeSource {
    paths: Vec<PathBuf>,
}

impl From<&Finder> for MergeSource {
    fn from(other: &Finder) -> Self {
        Self {
            paths: other.options.roots.clone(),
        }
    }
}

impl From<Vec<PathBuf>> for MergeSource {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl From<Vec<String>> for MergeSource {
    fn from(paths: Vec<String>) -> Self {
        Self {
            paths: paths.into_iter().map(PathBuf::from).collect(),
        }
    }
}

impl From<&[&str]> for MergeSource {
    fn from(paths: &[&str]) -> Self {
        Self {
            paths: paths.iter().map(PathBuf::from).collect(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for MergeSource {
    fn from(paths: [&str; N]) -> Self {
        Self {
            paths: paths.iter().map(PathBuf::from).collect(),
        }
    }
}

impl From<&str> for MergeSource {
    fn from(path: &str) -> Self {
        Self {
            paths: vec![PathBuf::from(path)],
        }
    }
}
