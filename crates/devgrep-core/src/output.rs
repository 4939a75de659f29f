//! 输出接口：引擎只通过 `Reporter` 写结果，着色由注入的 `Highlight` 决定
use std::io::{self, Write};
use std::path::Path;

use crate::findings::MatchLine;
use crate::options::ScanStats;
use crate::prefilter::PatternSet;

/// 高亮能力（纯展示层）
pub trait Highlight {
    fn path(&self, s: &str) -> String;
    fn line_number(&self, n: usize) -> String;
    /// 行内命中的 pattern 片段
    fn pattern(&self, s: &str) -> String;
    fn count(&self, n: usize) -> String;
}

/// 不着色
#[derive(Debug, Default, Clone, Copy)]
pub struct Plain;

impl Highlight for Plain {
    fn path(&self, s: &str) -> String { s.to_string() }
    fn line_number(&self, n: usize) -> String { n.to_string() }
    fn pattern(&self, s: &str) -> String { s.to_string() }
    fn count(&self, n: usize) -> String { n.to_string() }
}

/// 扫描结果的输出端
pub trait Reporter {
    /// 文件首次命中时调用一次
    fn file_header(&mut self, path: &Path) -> io::Result<()>;
    /// 每组上下文之前的分隔行
    fn context_separator(&mut self) -> io::Result<()>;
    fn context_line(&mut self, line: &MatchLine<'_>) -> io::Result<()>;
    fn match_line(&mut self, line: &MatchLine<'_>, patterns: &PatternSet) -> io::Result<()>;
    /// 文件最后一次命中之后调用
    fn file_end(&mut self) -> io::Result<()>;
    /// 替换模式：文件被改写
    fn replaced(&mut self, path: &Path, occurrences: usize) -> io::Result<()>;
    /// 仅在存在命中时调用
    fn summary(&mut self, stats: &ScanStats) -> io::Result<()>;
}

/// 文本输出：`<行号>: <文本>`，按文件分组
pub struct TextReporter<W: Write, H: Highlight = Plain> {
    out: W,
    style: H,
}

impl<W: Write> TextReporter<W, Plain> {
    pub fn plain(out: W) -> Self {
        Self { out, style: Plain }
    }
}

impl<W: Write, H: Highlight> TextReporter<W, H> {
    pub fn new(out: W, style: H) -> Self {
        Self { out, style }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// 按高亮区间拼接展示文本
    fn mark(&self, text: &str, patterns: &PatternSet) -> String {
        let mut marked = String::with_capacity(text.len());
        let mut last = 0;
        for span in patterns.spans(text) {
            marked.push_str(&text[last..span.start]);
            marked.push_str(&self.style.pattern(&text[span.clone()]));
            last = span.end;
        }
        marked.push_str(&text[last..]);
        marked
    }
}

impl<W: Write, H: Highlight> Reporter for TextReporter<W, H> {
    fn file_header(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "{}", self.style.path(&path.display().to_string()))
    }

    fn context_separator(&mut self) -> io::Result<()> {
        writeln!(self.out, "--")
    }

    fn context_line(&mut self, line: &MatchLine<'_>) -> io::Result<()> {
        writeln!(self.out, "{}: {}", self.style.line_number(line.number), line.display_text())
    }

    fn match_line(&mut self, line: &MatchLine<'_>, patterns: &PatternSet) -> io::Result<()> {
        let text = self.mark(line.display_text(), patterns);
        writeln!(self.out, "{}: {}", self.style.line_number(line.number), text)
    }

    fn file_end(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    fn replaced(&mut self, path: &Path, occurrences: usize) -> io::Result<()> {
        writeln!(
            self.out,
            "{} ({} occurrences)",
            self.style.path(&path.display().to_string()),
            self.style.count(occurrences)
        )
    }

    fn summary(&mut self, stats: &ScanStats) -> io::Result<()> {
        writeln!(
            self.out,
            "occurrences={}, files-matching={}",
            self.style.count(stats.occurrences),
            self.style.count(stats.files_matching)
        )?;
        self.out.flush()
    }
}
