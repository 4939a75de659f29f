//! 预筛与多 pattern 匹配（Aho-Corasick）
//!
//! 自动机为 Standard 语义，使用重叠迭代：pattern 之间可能互为子串或相互重叠
//! （如 "foo" 与 "oo"、"foo" 与 "o bar"），非重叠查找会漏掉其中一部分。
//! - 判定“所有 pattern 是否同时出现在一行”；
//! - 生成高亮区间（重叠区间合并）。大小写不敏感时按与匹配相同的小写规则折叠原文，
//!   再把命中位置映射回原文字节偏移。
use std::collections::BTreeSet;
use std::ops::Range;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

use crate::error::ConfigError;

/// 去重后的 pattern 集合
pub struct PatternSet {
    patterns: Vec<String>,
    overlapping: AhoCorasick,
    ignore_case: bool,
}

impl PatternSet {
    /// 构建 pattern 集合；`ignore_case` 时 pattern 应已转为小写
    pub fn new<S: AsRef<str>>(patterns: &[S], ignore_case: bool) -> Result<Self, ConfigError> {
        let patterns: Vec<String> = patterns
            .iter()
            .map(|p| p.as_ref().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let overlapping = AhoCorasickBuilder::new()
            .match_kind(MatchKind::Standard)
            .build(&patterns)?;
        Ok(Self { patterns, overlapping, ignore_case })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// 整段文本中是否出现任一 pattern（单 pattern 快路径的整文件预筛）
    pub fn occurs_in(&self, haystack: &str) -> bool {
        self.overlapping.is_match(haystack)
    }

    /// 是否所有 pattern 都出现在该行（逻辑 AND）
    pub fn matches_line(&self, line: &str) -> bool {
        if self.patterns.is_empty() { return false; }
        let mut seen = vec![false; self.patterns.len()];
        let mut remaining = self.patterns.len();
        for m in self.overlapping.find_overlapping_iter(line) {
            let slot = &mut seen[m.pattern().as_usize()];
            if !*slot {
                *slot = true;
                remaining -= 1;
                if remaining == 0 { return true; }
            }
        }
        false
    }

    /// 文本中所有 pattern 的出现位置（原文字节区间，已排序并合并重叠），用于高亮
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = if self.ignore_case {
            let folded = FoldedText::new(text);
            self.overlapping
                .find_overlapping_iter(folded.text.as_str())
                .map(|m| folded.original_span(m.start()..m.end()))
                .collect()
        } else {
            self.overlapping.find_overlapping_iter(text).map(|m| m.start()..m.end()).collect()
        };
        spans.sort_by_key(|s| (s.start, s.end));

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
                _ => merged.push(span),
            }
        }
        merged
    }
}

/// 逐字符小写后的文本，以及每个字节对应的原文字符区间
struct FoldedText {
    text: String,
    /// folded 第 i 个字节所属原文字符的 (起始, 结束) 偏移
    origin: Vec<(usize, usize)>,
}

impl FoldedText {
    fn new(text: &str) -> Self {
        let mut folded = String::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len());
        for (start, ch) in text.char_indices() {
            let end = start + ch.len_utf8();
            for lower in ch.to_lowercase() {
                folded.push(lower);
                origin.extend(std::iter::repeat((start, end)).take(lower.len_utf8()));
            }
        }
        Self { text: folded, origin }
    }

    /// 折叠文本中的非空区间映射回原文（按整字符扩展）
    fn original_span(&self, span: Range<usize>) -> Range<usize> {
        self.origin[span.start].0..self.origin[span.end - 1].1
    }
}
