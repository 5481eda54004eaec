use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for operations that can produce FinderError
pub type FinderResult<T> = Result<T, FinderError>;

/// rust-finder 的自定义错误类型
#[derive(Error, Debug)]
pub enum FinderError {
    /// 无法解释为搜索根的输入（仅由 merge 等配置方法抛出）
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// 模式编译失败；规则内部将其折叠为“不匹配”，不会向外传播
    #[error("malformed pattern '{pattern}': {message}")]
    MalformedPattern { pattern: String, message: String },

    /// 遍历期间单个节点上的 IO 失败
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FinderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FinderError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(pattern: &str, message: impl ToString) -> Self {
        FinderError::MalformedPattern {
            pattern: pattern.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<walkdir::Error> for FinderError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
        let message = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
        FinderError::Io { path, source }
    }
}
