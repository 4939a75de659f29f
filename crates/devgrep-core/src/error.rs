//! 错误类型（配置错误 / 扫描错误）
use std::path::PathBuf;
use thiserror::Error;

/// 配置错误：在遍历开始前检出，整次运行直接失败
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one <pattern> is required")]
    NoPatterns,

    #[error("<pattern>s can't be empty")]
    EmptyPattern,

    #[error("<pattern>s can't be equal: {0:?}")]
    DuplicatePattern(String),

    #[error("with --replace you must specify 2 <pattern>s (got {0})")]
    ReplaceArity(usize),

    #[error("can't use --ignore-case with --replace")]
    ReplaceIgnoreCase,

    #[error("no extensions given")]
    EmptyExtensions,

    #[error("invalid extension {0:?}")]
    InvalidExtension(String),

    #[error("failed to build pattern automaton: {0}")]
    Automaton(#[from] aho_corasick::BuildError),
}

/// 扫描过程中的错误
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl ScanError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    /// 是否属于“单文件”错误（可按策略跳过）；扫描根本身（深度 0）出错始终致命
    pub fn is_per_file(&self) -> bool {
        match self {
            Self::Io { .. } => true,
            Self::Walk(err) => err.depth() > 0,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
