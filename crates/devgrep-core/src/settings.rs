//! 设置文件加载（TOML）
//!
//! 示例：
//! ```toml
//! extensions = ["py", "rs", "toml"]
//! special_names = ["README", "Makefile", "Dockerfile"]
//! ignore_dirs = [".git", "build", "dist", "target"]
//! ignore_suffixes = [".egg-info"]
//! ```
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::options::{ExtensionFilter, ScanConfig};

/// 设置文件结构；缺省字段沿用内置默认值
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub special_names: Option<Vec<String>>,
    #[serde(default)]
    pub ignore_dirs: Option<Vec<String>>,
    #[serde(default)]
    pub ignore_suffixes: Option<Vec<String>>,
}

impl Settings {
    /// 从 TOML 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        Self::from_toml(&txt).with_context(|| format!("parse settings file {}", path.display()))
    }

    pub fn from_toml(txt: &str) -> Result<Self> {
        Ok(toml::from_str(txt)?)
    }

    /// 将设置叠加到配置上（仅覆盖文件中出现的字段）
    pub fn apply(&self, config: &mut ScanConfig) -> Result<()> {
        if let Some(exts) = &self.extensions {
            config.extensions = ExtensionFilter::parse(exts).context("invalid `extensions` in settings")?;
        }
        if let Some(names) = &self.special_names {
            config.special_names = names.iter().cloned().collect();
        }
        if let Some(dirs) = &self.ignore_dirs {
            config.ignore_dirs = dirs.iter().cloned().collect();
        }
        if let Some(suffixes) = &self.ignore_suffixes {
            config.ignore_suffixes = suffixes.clone();
        }
        Ok(())
    }
}
