//! 用于查找文件和目录的库
//!
//! 本库提供了基于规则组合的文件查找功能,支持:
//! - 按名称、内容、路径、日期和大小过滤
//! - 确定性的前序目录遍历
//! - 多根目录搜索与结果合并
//! - 多键稳定排序
//!
//! ## 使用场景
//!
//! - 在项目中查找特定类型的文件
//! - 清理过时或大文件
//! - 构建自动化工具链
//!
//! # 示例
//!
//! 基本用法:
//! ```no_run
//! use rust_finder::Finder;
//!
//! // 查找 src 下所有大于 1 KiB 的 Rust 源文件,按大小排序
//! let results = Finder::new()
//!     .within("src")
//!     .files()
//!     .name("*.rs")
//!     .size(1024)
//!     .sort_by_size()
//!     .find();
//!
//! for entry in results {
//!     println!("找到文件: {}", entry.path().display());
//! }
//! ```
//!
//! 更多用法请参考各模块文档。

pub mod entry;
pub mod errors;
pub mod finder;

// Re-export main types for convenience
pub use entry::{Entry, EntryKind};
pub use errors::{FinderError, FinderResult};
pub use finder::{Finder, MergeSource, TraversalMode};
