//! 终端着色（基于 colored）
use std::io::IsTerminal;

use clap::ValueEnum;
use colored::Colorize;
use devgrep_core::Highlight;

/// `--color` 取值
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// 是否着色：auto 时仅在 stdout 为终端时着色
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => {
                colored::control::set_override(true);
                true
            }
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}

/// ANSI 高亮：路径/行号/计数加粗，命中片段绿色
#[derive(Debug, Default, Clone, Copy)]
pub struct Ansi;

impl Highlight for Ansi {
    fn path(&self, s: &str) -> String {
        s.bold().to_string()
    }

    fn line_number(&self, n: usize) -> String {
        n.to_string().bold().to_string()
    }

    fn pattern(&self, s: &str) -> String {
        s.green().to_string()
    }

    fn count(&self, n: usize) -> String {
        n.to_string().green().bold().to_string()
    }
}
