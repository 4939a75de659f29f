//! 扫描主流程（串行）
use std::path::Path;

use tracing::{debug, warn};

use crate::engine::grep_file;
use crate::error::{Result, ScanError};
use crate::options::{IoErrorPolicy, ScanConfig, ScanMode, ScanStats};
use crate::output::Reporter;
use crate::prefilter::PatternSet;
use crate::replace::replace_in_file;
use crate::walk::candidate_files;

/// 扫描 `root` 下的文件，结果写入 `reporter`
/// - 配置在遍历前整体校验，任何文件都不会被触碰；
/// - 单文件 I/O 错误按 `IoErrorPolicy` 处理；
/// - 存在命中时最后输出汇总行。
pub fn scan(root: &Path, config: &ScanConfig, reporter: &mut dyn Reporter) -> Result<ScanStats> {
    config.validate()?;
    let patterns = PatternSet::new(&config.search_patterns(), config.ignore_case)?;
    let mut stats = ScanStats::default();

    for entry in candidate_files(root, config) {
        let outcome = entry.map_err(ScanError::from).and_then(|path| {
            debug!(path = %path.display(), "scanning");
            match config.mode {
                ScanMode::Find => grep_file(&path, &patterns, config, reporter),
                ScanMode::Replace => replace_in_file(&path, &config.patterns[0], &config.patterns[1], reporter),
            }
        });
        match outcome {
            Ok(occurrences) => stats.record(occurrences),
            Err(err) if err.is_per_file() && config.on_io_error == IoErrorPolicy::Skip => {
                warn!(error = %err, "skipping file");
                stats.files_skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    if stats.occurrences > 0 {
        reporter.summary(&stats).map_err(ScanError::Output)?;
    }
    Ok(stats)
}
