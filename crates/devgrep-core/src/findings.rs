//! 命中行

/// 文件中的一行：1 起始的行号、原始文本，以及大小写不敏感时的小写副本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLine<'a> {
    pub number: usize,
    pub text: &'a str,
    folded: Option<String>,
}

impl<'a> MatchLine<'a> {
    pub fn new(number: usize, text: &'a str, ignore_case: bool) -> Self {
        let folded = ignore_case.then(|| text.to_lowercase());
        Self { number, text, folded }
    }

    /// 参与匹配的文本（小写副本优先）；只用于匹配，从不用于展示
    pub fn haystack(&self) -> &str {
        self.folded.as_deref().unwrap_or(self.text)
    }

    /// 展示用文本（去掉行尾空白）
    pub fn display_text(&self) -> &'a str {
        self.text.trim_end()
    }
}
