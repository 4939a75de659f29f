//! 扫描选项与统计信息（模块）
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::ConfigError;

/// 默认扫描的扩展名（不含前导点）
pub const DEFAULT_EXTS: &[&str] = &["c", "h", "in", "ini", "md", "py", "rst", "txt", "yaml", "yml"];
/// 无论扩展名如何都扫描的特殊文件名
pub const SPECIAL_NAMES: &[&str] = &["README", "Makefile"];
/// 根目录下直接跳过的目录
pub const IGNORE_ROOT_DIRS: &[&str] = &[".git", "build", "dist"];
/// 根目录下以这些后缀结尾的目录同样跳过（打包元数据）
pub const IGNORE_ROOT_SUFFIXES: &[&str] = &[".egg-info"];

/// 工作模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// 查找：所有 pattern 需出现在同一行
    #[default]
    Find,
    /// 替换：第一个 pattern 替换为第二个，原地写回
    Replace,
}

/// 单文件 I/O 错误的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoErrorPolicy {
    /// 立即终止整次运行
    #[default]
    Abort,
    /// 记录 warn 日志后继续下一个文件
    Skip,
}

/// 扩展名过滤器
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionFilter {
    /// 通配：所有文件
    All,
    /// 仅接受这些扩展名（均带前导点，如 ".py"）
    Only(BTreeSet<String>),
}

impl ExtensionFilter {
    /// 解析并校验扩展名列表
    /// - 空列表报错；
    /// - 允许一个前导点，统一补齐为 ".ext"；
    /// - 其余部分必须为 ASCII 字母数字，或为通配符 "*"；
    /// - 列表中任一项为 "*" 即扫描所有文件（`py,*` 等同于 `*`），而非仅在整个列表恰为 "*" 时。
    pub fn parse<I, S>(items: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut exts = BTreeSet::new();
        let mut wildcard = false;
        for item in items {
            let raw = item.as_ref().trim();
            let bare = raw.strip_prefix('.').unwrap_or(raw);
            if bare == "*" {
                wildcard = true;
                continue;
            }
            if bare.is_empty() || !bare.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::InvalidExtension(raw.to_string()));
            }
            exts.insert(format!(".{bare}"));
        }
        if wildcard {
            return Ok(Self::All);
        }
        if exts.is_empty() {
            return Err(ConfigError::EmptyExtensions);
        }
        Ok(Self::Only(exts))
    }

    /// 判断文件名是否应被扫描（特殊文件名始终放行）
    pub fn accepts(&self, file_name: &str, special_names: &BTreeSet<String>) -> bool {
        let exts = match self {
            Self::All => return true,
            Self::Only(exts) => exts,
        };
        if special_names.contains(file_name) { return true; }
        match Path::new(file_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => exts.contains(&format!(".{ext}")),
            None => false,
        }
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::Only(DEFAULT_EXTS.iter().map(|e| format!(".{e}")).collect())
    }
}

/// 扫描选项
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// 字面量 pattern（替换模式下依次为 源、目标）
    pub patterns: Vec<String>,
    pub mode: ScanMode,
    /// 大小写不敏感（仅查找模式）
    pub ignore_case: bool,
    /// 命中行前后各打印的上下文行数
    pub context_lines: usize,
    pub extensions: ExtensionFilter,
    pub special_names: BTreeSet<String>,
    /// 根目录下需要跳过的目录名
    pub ignore_dirs: BTreeSet<String>,
    /// 根目录下需要跳过的目录名后缀
    pub ignore_suffixes: Vec<String>,
    pub on_io_error: IoErrorPolicy,
}

impl ScanConfig {
    /// 以默认过滤规则构建查找配置
    pub fn find<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { patterns: patterns.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    /// 以默认过滤规则构建替换配置
    pub fn replace(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self { patterns: vec![src.into(), dst.into()], mode: ScanMode::Replace, ..Self::default() }
    }

    /// 校验 pattern 集合与标志组合；必须在触碰任何文件之前调用
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.patterns.is_empty() {
            return Err(ConfigError::NoPatterns);
        }
        if self.patterns.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::EmptyPattern);
        }
        // 大小写折叠后再判重：-i 模式下 "Foo" 与 "foo" 视为相同
        let mut seen = BTreeSet::new();
        for p in self.search_patterns() {
            if !seen.insert(p.clone()) {
                return Err(ConfigError::DuplicatePattern(p));
            }
        }
        if self.mode == ScanMode::Replace {
            if self.patterns.len() != 2 {
                return Err(ConfigError::ReplaceArity(self.patterns.len()));
            }
            if self.ignore_case {
                return Err(ConfigError::ReplaceIgnoreCase);
            }
        }
        Ok(())
    }

    /// 用于匹配的 pattern（大小写不敏感时转为小写）
    pub fn search_patterns(&self) -> Vec<String> {
        if self.ignore_case {
            self.patterns.iter().map(|p| p.to_lowercase()).collect()
        } else {
            self.patterns.clone()
        }
    }

    /// 是否走“单 pattern 整文件预筛”快路径
    pub fn uses_whole_file_prefilter(&self) -> bool {
        self.mode == ScanMode::Find && self.patterns.len() == 1 && !self.ignore_case
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            mode: ScanMode::Find,
            ignore_case: false,
            context_lines: 0,
            extensions: ExtensionFilter::default(),
            special_names: SPECIAL_NAMES.iter().map(|s| s.to_string()).collect(),
            ignore_dirs: IGNORE_ROOT_DIRS.iter().map(|s| s.to_string()).collect(),
            ignore_suffixes: IGNORE_ROOT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            on_io_error: IoErrorPolicy::Abort,
        }
    }
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    /// 查找模式：命中行数；替换模式：被替换的子串个数
    pub occurrences: usize,
    /// 至少命中一次的文件数
    pub files_matching: usize,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

impl ScanStats {
    pub(crate) fn record(&mut self, occurrences: usize) {
        self.files_scanned += 1;
        self.occurrences += occurrences;
        if occurrences > 0 { self.files_matching += 1; }
    }
}
