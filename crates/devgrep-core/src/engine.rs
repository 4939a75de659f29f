//! 查找模式：单文件行级匹配与上下文输出
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::ops::RangeInclusive;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, ScanError};
use crate::findings::MatchLine;
use crate::options::ScanConfig;
use crate::output::Reporter;
use crate::prefilter::PatternSet;

/// 命中行 `k` 之前的上下文行号：`max(1, k-n) ..= k-1`
pub fn context_before(k: usize, n: usize) -> RangeInclusive<usize> {
    k.saturating_sub(n).max(1)..=k.saturating_sub(1)
}

/// 命中行 `k` 之后的上下文行号：`k+1 ..= min(m, k+n)`，`m` 为总行数
pub fn context_after(k: usize, n: usize, m: usize) -> RangeInclusive<usize> {
    k + 1..=k.saturating_add(n).min(m)
}

/// 在单个文件中查找，返回命中行数
/// - 单 pattern 且区分大小写：整读文件，全文不含 pattern 时直接返回 0；
/// - 其余情况：逐行读取，每行要求所有 pattern 同时出现。
pub(crate) fn grep_file(
    path: &Path,
    patterns: &PatternSet,
    config: &ScanConfig,
    reporter: &mut dyn Reporter,
) -> Result<usize> {
    if config.uses_whole_file_prefilter() {
        let data = match read_text(path)? { Some(d) => d, None => return Ok(0) };
        if !patterns.occurs_in(&data) {
            return Ok(0);
        }
        let lines: Vec<&str> = data.lines().collect();
        report_matches(path, &lines, patterns, config, reporter).map_err(ScanError::Output)
    } else {
        let lines = match read_lines(path)? { Some(l) => l, None => return Ok(0) };
        report_matches(path, &lines, patterns, config, reporter).map_err(ScanError::Output)
    }
}

/// 逐行匹配并输出；文件头仅在首次命中时打印
fn report_matches<S: AsRef<str>>(
    path: &Path,
    lines: &[S],
    patterns: &PatternSet,
    config: &ScanConfig,
    reporter: &mut dyn Reporter,
) -> io::Result<usize> {
    let n = config.context_lines;
    let mut occurrences = 0;

    for (idx, text) in lines.iter().enumerate() {
        let line = MatchLine::new(idx + 1, text.as_ref(), config.ignore_case);
        if !patterns.matches_line(line.haystack()) {
            continue;
        }
        if occurrences == 0 {
            reporter.file_header(path)?;
        }
        if n > 0 {
            reporter.context_separator()?;
            for k in context_before(line.number, n) {
                reporter.context_line(&MatchLine::new(k, lines[k - 1].as_ref(), false))?;
            }
        }
        reporter.match_line(&line, patterns)?;
        if n > 0 {
            for k in context_after(line.number, n, lines.len()) {
                reporter.context_line(&MatchLine::new(k, lines[k - 1].as_ref(), false))?;
            }
        }
        occurrences += 1;
    }

    if occurrences > 0 {
        reporter.file_end()?;
    }
    Ok(occurrences)
}

/// 整读文件；非 UTF-8 内容视为非文本，返回 `None`
pub(crate) fn read_text(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            debug!(path = %path.display(), "not valid UTF-8, skipped");
            Ok(None)
        }
        Err(e) => Err(ScanError::io(path, e)),
    }
}

/// 逐行读取（上下文输出需要回看，故收集为 Vec）
fn read_lines(path: &Path) -> Result<Option<Vec<String>>> {
    let file = File::open(path).map_err(|e| ScanError::io(path, e))?;
    match BufReader::new(file).lines().collect::<io::Result<Vec<String>>>() {
        Ok(lines) => Ok(Some(lines)),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            debug!(path = %path.display(), "not valid UTF-8, skipped");
            Ok(None)
        }
        Err(e) => Err(ScanError::io(path, e)),
    }
}
