//! 递归文本查找/替换核心库
//!
//! 设计要点：
//! - 字面量子串匹配，不是正则引擎。
//! - 查找模式下多个 pattern 为“同一行同时出现”（AND）；单 pattern 且区分大小写时先整文件预筛。
//! - 替换模式原地改写文件，不保留备份。
//! - 输出与着色通过 `Reporter` / `Highlight` 注入，核心不持有任何全局状态。

mod engine;
mod error;
mod findings;
mod options;
mod output;
mod prefilter;
mod replace;
mod scan;
mod settings;
mod walk;

pub use engine::{context_after, context_before};
pub use error::{ConfigError, Result, ScanError};
pub use findings::MatchLine;
pub use options::{
    ExtensionFilter, IoErrorPolicy, ScanConfig, ScanMode, ScanStats, DEFAULT_EXTS, IGNORE_ROOT_DIRS,
    IGNORE_ROOT_SUFFIXES, SPECIAL_NAMES,
};
pub use output::{Highlight, Plain, Reporter, TextReporter};
pub use prefilter::PatternSet;
pub use scan::scan;
pub use settings::Settings;
